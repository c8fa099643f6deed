//! tslc CLI - Command-line interface for tslua-core
//!
//! ARCHITECTURE: Thin I/O layer over the tslua-core library.
//! This binary handles:
//! - File I/O (reading `*.tsast.json` from disk/stdin)
//! - CLI argument parsing (clap)
//! - Output formatting (stdout/stderr)
//! - Process exit codes
//! - Multi-file glob pattern matching
//! - File-based caching with mtime invalidation

mod cache;
mod resolver;

use clap::{CommandFactory, Parser};
use clap_complete::{generate, Shell};
use colored::Colorize;
use glob::glob;
use rayon::prelude::*;
use std::fs;
use std::io::{self, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use resolver::PathResolver;
use tslua_core::ast::{ScriptType, SourceFile};
use tslua_core::config::TranspileConfig;
use tslua_core::translate_source_file;

/// Maximum input size to prevent memory exhaustion (50MB)
const MAX_INPUT_SIZE: usize = 50 * 1024 * 1024;

/// Maximum number of parallel jobs (threads) to prevent resource exhaustion
const MAX_JOBS: usize = 128;

/// tslc - type-directed source-to-source transpiler
///
/// Translate pre-parsed `*.tsast.json` units into a Lua-family target,
/// following the rules in the transpiler's construct catalogue.
#[derive(Parser, Debug)]
#[command(name = "tslc")]
#[command(author, version, about, long_about = None)]
#[command(after_help = "EXAMPLES:\n  \
    tslc file.tsast.json                    Translate a single parsed unit\n  \
    tslc src/                               Translate every *.tsast.json under a directory\n  \
    tslc 'src/**/*.tsast.json'               Translate files matched by a glob pattern\n  \
    cat file.tsast.json | tslc -             Read a SourceFile from stdin\n  \
    tslc . --jobs 8                         Translate the current directory with 8 threads\n  \
    tslc file.tsast.json --no-cache         Disable caching for this run\n  \
    tslc --clear-cache                      Clear all cached output\n  \
    tslc --completions bash > tslc.bash     Generate a shell completion script")]
struct Args {
    /// File, directory, or glob pattern to process (use '-' for stdin)
    #[arg(value_name = "FILE", required_unless_present_any = ["clear_cache", "completions"])]
    file: Option<String>,

    /// Disable the `@rbx-client`/`@rbx-server` JSDoc cross-context checks
    #[arg(long, help = "Skip script-context directive checks")]
    no_heuristics: bool,

    /// Module specifier the emitted runtime import binds to
    #[arg(long, default_value = "@rbx/ts")]
    runtime_module: String,

    /// Force a script type when a unit's own context can't determine one
    #[arg(long, value_enum, help = "Force Module or Script semantics")]
    script_type: Option<ScriptTypeArg>,

    /// Disable file headers when processing multiple files
    #[arg(long, help = "Don't print file path headers for multi-file output")]
    no_header: bool,

    /// Number of parallel jobs (default: number of CPUs)
    #[arg(short, long, help = "Number of parallel jobs for multi-file processing")]
    jobs: Option<usize>,

    /// Disable caching (caching is enabled by default for performance)
    #[arg(long, help = "Disable caching of translated output")]
    no_cache: bool,

    /// Clear the entire cache directory (~/.cache/tslc/)
    #[arg(long, help = "Clear all cached output and exit")]
    clear_cache: bool,

    /// Show translation statistics (output to stderr)
    #[arg(long, help = "Show translated-file and synthetic-identifier counts")]
    stats: bool,

    /// Generate a shell completion script and exit
    #[arg(long, value_enum, help = "Print a completion script for the given shell")]
    completions: Option<Shell>,
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum ScriptTypeArg {
    Module,
    Script,
}

impl From<ScriptTypeArg> for ScriptType {
    fn from(arg: ScriptTypeArg) -> Self {
        match arg {
            ScriptTypeArg::Module => ScriptType::Module,
            ScriptTypeArg::Script => ScriptType::Script,
        }
    }
}

/// Options for processing a file (reduces function parameters)
#[derive(Debug, Clone)]
struct ProcessOptions {
    config: TranspileConfig,
    use_cache: bool,
    include_stats: bool,
}

/// Result of processing a file (replaces tuple return)
#[derive(Debug)]
struct ProcessResult {
    /// Translated output
    output: String,
    /// Count of synthetic `_<n>` identifiers in the output, if computed
    synthetic_ids: Option<usize>,
}

impl ProcessResult {
    fn new(output: String, synthetic_ids: Option<usize>) -> Self {
        Self { output, synthetic_ids }
    }
}

/// Counts distinct synthetic identifiers (tokens exactly matching `_<digits>`)
/// appearing in translated output.
fn count_synthetic_ids(output: &str) -> usize {
    let mut count = 0;
    for token in output.split(|c: char| !(c.is_alphanumeric() || c == '_')) {
        if let Some(rest) = token.strip_prefix('_') {
            if !rest.is_empty() && rest.bytes().all(|b| b.is_ascii_digit()) {
                count += 1;
            }
        }
    }
    count
}

/// Report translation statistics to stderr
fn report_stats(file_count: usize, synthetic_ids: usize) {
    eprintln!(
        "{}",
        format!(
            "[tslc] translated {} file(s), {} synthetic identifier(s)",
            file_count, synthetic_ids
        )
        .dimmed()
    );
}

/// Check if path contains glob pattern characters
fn has_glob_pattern(path: &str) -> bool {
    path.contains('*') || path.contains('?') || path.contains('[')
}

/// Validate glob pattern to prevent path traversal attacks
fn validate_glob_pattern(pattern: &str) -> anyhow::Result<()> {
    if pattern.starts_with('/') {
        anyhow::bail!(
            "Glob pattern must be relative (cannot start with '/')\n\
             Pattern: {}\n\
             Use relative paths like 'src/**/*.tsast.json' instead of '/src/**/*.tsast.json'",
            pattern
        );
    }

    if pattern.contains("..") {
        anyhow::bail!(
            "Glob pattern cannot contain '..' (parent directory traversal)\n\
             Pattern: {}\n\
             This prevents accessing files outside the current directory",
            pattern
        );
    }

    Ok(())
}

fn translate_json(path: &Path, contents: &str, options: &ProcessOptions) -> anyhow::Result<ProcessResult> {
    let source: SourceFile = serde_json::from_str(contents)
        .map_err(|e| anyhow::anyhow!("failed to parse {}: {}", path.display(), e))?;

    let resolver = PathResolver::new(options.config.no_heuristics);
    let output = translate_source_file(&source, &resolver, &options.config)
        .map_err(|e| anyhow::anyhow!("{}: {}", path.display(), e))?;

    let synthetic_ids = if options.include_stats {
        Some(count_synthetic_ids(&output))
    } else {
        None
    };

    Ok(ProcessResult::new(output, synthetic_ids))
}

/// Process a single file and return translated content
fn process_file(path: &Path, options: &ProcessOptions) -> anyhow::Result<ProcessResult> {
    if options.use_cache {
        if let Some(cached) = cache::read_cache(path, &options.config) {
            let synthetic_ids = if options.include_stats {
                Some(count_synthetic_ids(&cached))
            } else {
                None
            };
            return Ok(ProcessResult::new(cached, synthetic_ids));
        }
    }

    let contents = fs::read_to_string(path)?;

    if contents.len() > MAX_INPUT_SIZE {
        anyhow::bail!(
            "File too large: {} bytes exceeds maximum of {} bytes ({}MB)",
            contents.len(),
            MAX_INPUT_SIZE,
            MAX_INPUT_SIZE / 1024 / 1024
        );
    }

    let result = translate_json(path, &contents, options)?;

    if options.use_cache {
        let _ = cache::write_cache(path, &options.config, &result.output);
    }

    Ok(result)
}

/// Options for multi-file processing
#[derive(Debug, Clone)]
struct MultiFileOptions {
    config: TranspileConfig,
    no_header: bool,
    jobs: Option<usize>,
    use_cache: bool,
    show_stats: bool,
}

/// Process multiple files (with parallel processing)
///
/// ARCHITECTURE: Generic file processor used by both glob and directory
/// inputs. Handles parallel processing, error aggregation, and statistics.
fn process_files(paths: Vec<PathBuf>, source_description: &str, options: MultiFileOptions) -> anyhow::Result<()> {
    if paths.is_empty() {
        anyhow::bail!("No files found: {}", source_description);
    }

    let process_options = ProcessOptions {
        config: options.config,
        use_cache: options.use_cache,
        include_stats: options.show_stats,
    };

    let progress = if paths.len() > 1 {
        let bar = indicatif::ProgressBar::new(paths.len() as u64);
        bar.set_style(
            indicatif::ProgressStyle::with_template("{bar:40.cyan/blue} {pos}/{len} {msg}")
                .unwrap_or_else(|_| indicatif::ProgressStyle::default_bar()),
        );
        Some(bar)
    } else {
        None
    };

    let process_with_progress = |path: &PathBuf| {
        let result = process_file(path, &process_options);
        if let Some(bar) = &progress {
            bar.inc(1);
        }
        result
    };

    let results: Vec<_> = if let Some(num_jobs) = options.jobs {
        rayon::ThreadPoolBuilder::new()
            .num_threads(num_jobs)
            .build()?
            .install(|| {
                paths
                    .par_iter()
                    .map(|path| (path, process_with_progress(path)))
                    .collect()
            })
    } else {
        paths
            .par_iter()
            .map(|path| (path, process_with_progress(path)))
            .collect()
    };

    if let Some(bar) = progress {
        bar.finish_and_clear();
    }

    let stdout = io::stdout();
    let mut writer = BufWriter::new(stdout.lock());

    let mut success_count = 0;
    let mut error_count = 0;
    let mut total_synthetic_ids = 0usize;

    for (idx, (path, result)) in results.iter().enumerate() {
        match result {
            Ok(process_result) => {
                if !options.no_header && paths.len() > 1 {
                    if idx > 0 {
                        writeln!(writer)?;
                    }
                    writeln!(writer, "-- === {} ===", path.display())?;
                }

                write!(writer, "{}", process_result.output)?;
                success_count += 1;

                if let Some(ids) = process_result.synthetic_ids {
                    total_synthetic_ids += ids;
                }
            }
            Err(e) => {
                eprintln!("{} {}: {}", "error:".red().bold(), path.display(), e);
                error_count += 1;
            }
        }
    }

    writer.flush()?;

    if success_count == 0 {
        anyhow::bail!("All {} file(s) failed to process", error_count);
    }

    if error_count > 0 {
        eprintln!(
            "{}",
            format!("Processed {} file(s) successfully, {} failed", success_count, error_count).yellow()
        );
    }

    if options.show_stats {
        report_stats(success_count, total_synthetic_ids);
    }

    Ok(())
}

/// Process multiple files matched by glob pattern (with parallel processing)
fn process_glob(pattern: &str, options: MultiFileOptions) -> anyhow::Result<()> {
    validate_glob_pattern(pattern)?;

    let paths: Vec<_> = glob(pattern)?
        .filter_map(|entry| entry.ok())
        .filter(|p| {
            if !p.is_file() {
                return false;
            }

            if let Ok(metadata) = p.symlink_metadata() {
                if metadata.file_type().is_symlink() {
                    eprintln!("{} skipping symlink: {}", "warning:".yellow(), p.display());
                    return false;
                }
            }

            true
        })
        .collect();

    process_files(paths, &format!("pattern '{}'", pattern), options)
}

/// Collect all `*.tsast.json` files from a directory recursively
fn collect_files_from_directory(dir: &Path) -> anyhow::Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    fn visit_dir(dir: &Path, files: &mut Vec<PathBuf>) -> anyhow::Result<()> {
        if !dir.is_dir() {
            return Ok(());
        }

        for entry in fs::read_dir(dir)? {
            let entry = entry?;
            let path = entry.path();

            let symlink_metadata = path.symlink_metadata()?;
            if symlink_metadata.file_type().is_symlink() {
                eprintln!("{} skipping symlink: {}", "warning:".yellow(), path.display());
                continue;
            }

            let metadata = entry.metadata()?;

            if metadata.is_dir() {
                visit_dir(&path, files)?;
            } else if metadata.is_file() && path.to_string_lossy().ends_with(".tsast.json") {
                files.push(path);
            }
        }

        Ok(())
    }

    visit_dir(dir, &mut files)?;
    files.sort();

    Ok(files)
}

/// Process all `*.tsast.json` files in a directory recursively
fn process_directory(dir: &Path, options: MultiFileOptions) -> anyhow::Result<()> {
    let paths = collect_files_from_directory(dir)?;
    process_files(paths, &format!("directory '{}'", dir.display()), options)
}

fn build_config(args: &Args) -> TranspileConfig {
    let mut config = TranspileConfig::new()
        .no_heuristics(args.no_heuristics)
        .runtime_module(args.runtime_module.clone());
    if let Some(script_type) = args.script_type {
        config = config.script_type_override(script_type.into());
    }
    config
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    if let Some(shell) = args.completions {
        let mut cmd = Args::command();
        let name = cmd.get_name().to_string();
        generate(shell, &mut cmd, name, &mut io::stdout());
        return Ok(());
    }

    if let Some(jobs) = args.jobs {
        if jobs == 0 {
            anyhow::bail!("--jobs must be at least 1");
        }
        if jobs > MAX_JOBS {
            anyhow::bail!(
                "--jobs value too high: {} (maximum: {})\n\
                 Using too many threads can exhaust system resources.\n\
                 Recommended: Use default (number of CPUs) or specify a moderate value.",
                jobs,
                MAX_JOBS
            );
        }
    }

    if args.clear_cache {
        cache::clear_cache()?;
        println!("Cache cleared successfully");
        return Ok(());
    }

    let config = build_config(&args);
    let use_cache = !args.no_cache;

    let file = args.file.expect("FILE is required");

    if file == "-" {
        let mut buffer = String::new();
        let bytes_read = io::stdin().take(MAX_INPUT_SIZE as u64 + 1).read_to_string(&mut buffer)?;

        if bytes_read > MAX_INPUT_SIZE {
            anyhow::bail!(
                "Input too large: {} bytes exceeds maximum of {} bytes ({}MB)",
                bytes_read,
                MAX_INPUT_SIZE,
                MAX_INPUT_SIZE / 1024 / 1024
            );
        }

        let source: SourceFile = serde_json::from_str(&buffer)
            .map_err(|e| anyhow::anyhow!("failed to parse stdin as a SourceFile: {}", e))?;
        let resolver = PathResolver::new(config.no_heuristics);
        let result = translate_source_file(&source, &resolver, &config)?;

        let stdout = io::stdout();
        let mut writer = BufWriter::new(stdout.lock());
        write!(writer, "{}", result)?;
        writer.flush()?;

        if args.stats {
            report_stats(1, count_synthetic_ids(&result));
        }

        return Ok(());
    }

    let path = PathBuf::from(&file);
    let multi_options = MultiFileOptions {
        config: config.clone(),
        no_header: args.no_header,
        jobs: args.jobs,
        use_cache,
        show_stats: args.stats,
    };

    if path.is_dir() {
        return process_directory(&path, multi_options);
    }

    if has_glob_pattern(&file) {
        return process_glob(&file, multi_options);
    }

    let process_options = ProcessOptions {
        config,
        use_cache,
        include_stats: args.stats,
    };
    let process_result = process_file(&path, &process_options)?;

    let stdout = io::stdout();
    let mut writer = BufWriter::new(stdout.lock());
    write!(writer, "{}", process_result.output)?;
    writer.flush()?;

    if args.stats {
        report_stats(1, process_result.synthetic_ids.unwrap_or(0));
    }

    Ok(())
}
