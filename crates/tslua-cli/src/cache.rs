//! File-based caching layer for translated output
//!
//! ARCHITECTURE: caches translated Lua-family output with mtime-based
//! invalidation.
//! - Cache key: SHA256(canonical_path + mtime_secs + config fingerprint)
//! - Cache location: ~/.cache/tslc/ (platform-specific)
//! - Invalidation: file mtime change or config fingerprint change
//! - Storage format: JSON with metadata

use anyhow::Result;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use tslua_core::config::TranspileConfig;

/// Cache entry with metadata for validation.
#[derive(Debug, Serialize, Deserialize)]
struct CacheEntry {
    /// Original file path (for debugging).
    path: String,
    /// File modification time (seconds since UNIX epoch).
    mtime_secs: u64,
    /// Config fingerprint the entry was produced under.
    fingerprint: String,
    /// Cached translated output.
    content: String,
}

/// Config fingerprint: a config change (runtime module, heuristics gate,
/// script-type override) must invalidate the cache, since any of the
/// three can change the translated output for an otherwise-unmodified file.
fn config_fingerprint(config: &TranspileConfig) -> String {
    format!(
        "{}|{}|{:?}",
        config.runtime_module, config.no_heuristics, config.script_type_override
    )
}

/// Get platform-specific cache directory (~/.cache/tslc/ on Linux/macOS).
fn get_cache_dir() -> Result<PathBuf> {
    let cache_dir = dirs::cache_dir()
        .ok_or_else(|| anyhow::anyhow!("Failed to determine cache directory"))?
        .join("tslc");

    #[cfg(unix)]
    {
        use std::fs::DirBuilder;
        use std::os::unix::fs::DirBuilderExt;

        if !cache_dir.exists() {
            let mut builder = DirBuilder::new();
            builder.mode(0o700); // rwx------ (owner-only)
            builder.recursive(true);
            builder.create(&cache_dir)?;
        }
    }

    #[cfg(not(unix))]
    {
        fs::create_dir_all(&cache_dir)?;
    }

    Ok(cache_dir)
}

fn cache_key(path: &Path, mtime: SystemTime, fingerprint: &str) -> Result<String> {
    let canonical_path = path.canonicalize()?;
    let mtime_secs = mtime.duration_since(SystemTime::UNIX_EPOCH)?.as_secs();
    let hash_input = format!("{}|{}|{}", canonical_path.display(), mtime_secs, fingerprint);

    let mut hasher = Sha256::new();
    hasher.update(hash_input.as_bytes());
    Ok(format!("{:x}", hasher.finalize()))
}

/// Reads cached output if valid (mtime and config fingerprint both match).
pub fn read_cache(path: &Path, config: &TranspileConfig) -> Option<String> {
    let metadata = fs::metadata(path).ok()?;
    let mtime = metadata.modified().ok()?;
    let fingerprint = config_fingerprint(config);

    let key = cache_key(path, mtime, &fingerprint).ok()?;
    let cache_dir = get_cache_dir().ok()?;
    let cache_file = cache_dir.join(format!("{}.json", key));

    if !cache_file.exists() {
        return None;
    }

    let cache_content = fs::read_to_string(&cache_file).ok()?;
    let entry: CacheEntry = serde_json::from_str(&cache_content).ok()?;

    let mtime_secs = mtime.duration_since(SystemTime::UNIX_EPOCH).ok()?.as_secs();
    if entry.mtime_secs == mtime_secs && entry.fingerprint == fingerprint {
        Some(entry.content)
    } else {
        let _ = fs::remove_file(&cache_file);
        None
    }
}

/// Writes translated output to cache.
pub fn write_cache(path: &Path, config: &TranspileConfig, content: &str) -> Result<()> {
    let metadata = fs::metadata(path)?;
    let mtime = metadata.modified()?;
    let fingerprint = config_fingerprint(config);

    let key = cache_key(path, mtime, &fingerprint)?;
    let cache_dir = get_cache_dir()?;
    let cache_file = cache_dir.join(format!("{}.json", key));

    let mtime_secs = mtime.duration_since(SystemTime::UNIX_EPOCH)?.as_secs();
    let entry = CacheEntry {
        path: path.display().to_string(),
        mtime_secs,
        fingerprint,
        content: content.to_string(),
    };

    let json = serde_json::to_string(&entry)?;
    fs::write(&cache_file, json)?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let perms = std::fs::Permissions::from_mode(0o600);
        std::fs::set_permissions(&cache_file, perms)?;
    }

    Ok(())
}

/// Clears the entire cache directory.
pub fn clear_cache() -> Result<()> {
    let cache_dir = get_cache_dir()?;

    if cache_dir.exists() {
        fs::remove_dir_all(&cache_dir)?;
        fs::create_dir_all(&cache_dir)?;
    }

    Ok(())
}
