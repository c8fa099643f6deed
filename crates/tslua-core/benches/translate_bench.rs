//! Performance benchmarks for tslua-core translation
//!
//! Run with: cargo bench

#![allow(clippy::unwrap_used)] // Unwrapping is acceptable in benchmarks

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use tslua_core::ast::{
    BinaryOp, Expr, FunctionDecl, Param, BindingPattern, ScriptContext, ScriptType, SourceFile,
    Stmt, Ty, VarKind, VariableDeclarator,
};
use tslua_core::config::TranspileConfig;
use tslua_core::resolver::FixedTableResolver;
use tslua_core::translate_source_file;

fn number_param(name: &str) -> Param {
    Param {
        pattern: BindingPattern::Identifier {
            name: name.to_string(),
            captured_into_this: false,
        },
        default: None,
        is_rest: false,
        ty: Ty::number(),
    }
}

fn ident(name: &str) -> Expr {
    Expr::Identifier {
        name: name.to_string(),
        symbol: None,
        ty: Ty::number(),
    }
}

/// `function funcN(a: number, b: number): number { const c = a + b; return c; }`
fn make_function(i: usize) -> Stmt {
    Stmt::FunctionDecl(FunctionDecl {
        name: Some(format!("func{i}")),
        params: vec![number_param("a"), number_param("b")],
        body: vec![
            Stmt::VariableDeclaration {
                kind: VarKind::Const,
                declarators: vec![VariableDeclarator {
                    pattern: BindingPattern::Identifier {
                        name: "c".to_string(),
                        captured_into_this: false,
                    },
                    init: Some(Expr::Binary {
                        op: BinaryOp::Add,
                        left: Box::new(ident("a")),
                        right: Box::new(ident("b")),
                    }),
                    ty: Ty::number(),
                }],
                exported: false,
            },
            Stmt::Return(Some(ident("c"))),
        ],
        returns_tuple: false,
        exported: true,
    })
}

fn generate_source_file(num_functions: usize) -> SourceFile {
    SourceFile {
        file_name: "generated.ts".to_string(),
        script_context: ScriptContext::None,
        script_type: ScriptType::Module,
        statements: (0..num_functions).map(make_function).collect(),
    }
}

fn bench_scaling(c: &mut Criterion) {
    let mut group = c.benchmark_group("scaling");
    let resolver = FixedTableResolver::new();
    let config = TranspileConfig::default();

    for size in [10, 50, 100, 500, 1000] {
        let source = generate_source_file(size);
        group.bench_with_input(BenchmarkId::new("functions", size), &source, |b, input| {
            b.iter(|| translate_source_file(black_box(input), &resolver, &config).unwrap())
        });
    }

    group.finish();
}

fn bench_single_function(c: &mut Criterion) {
    let resolver = FixedTableResolver::new();
    let config = TranspileConfig::default();
    let source = generate_source_file(1);

    c.bench_function("single_function", |b| {
        b.iter(|| translate_source_file(black_box(&source), &resolver, &config).unwrap())
    });
}

criterion_group!(benches, bench_single_function, bench_scaling);
criterion_main!(benches);
