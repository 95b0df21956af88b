//! File and path helpers

use std::fs::{self, File};
use std::io::Read;
use std::path::{Path, PathBuf};

use tracing::debug;
use url::Url;

use crate::error::{KitError, Result};

/// True when a file or directory exists at `path`
pub fn exists(path: impl AsRef<Path>) -> bool {
    path.as_ref().exists()
}

/// File name without its last extension; dotfiles keep their name
/// (`a/b.tar.gz` → `b.tar`, `.env` → `.env`)
pub fn file_stem(path: impl AsRef<Path>) -> String {
    path.as_ref()
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Remove every listed file, skipping the ones already gone
pub fn remove_files<P: AsRef<Path>>(paths: &[P]) -> Result<()> {
    for path in paths {
        let path = path.as_ref();
        if !path.exists() {
            continue;
        }
        fs::remove_file(path).map_err(|e| KitError::File {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
    }
    Ok(())
}

/// Extension of a URL path or file path, without the dot.
///
/// URLs (anything starting with `http`) are parsed so query strings do not
/// leak into the extension. Falls back to `default` when there is none.
pub fn ext_of(uri: &str, default: &str) -> String {
    let path = if uri.starts_with("http") {
        match Url::parse(uri) {
            Ok(url) => url.path().to_string(),
            Err(e) => {
                debug!(uri, error = %e, "unparseable url");
                return default.to_string();
            }
        }
    } else {
        uri.to_string()
    };

    match Path::new(&path).extension() {
        Some(ext) if !ext.is_empty() => ext.to_string_lossy().into_owned(),
        _ => default.to_string(),
    }
}

/// Create the parent directory of `path` if it is missing
pub fn ensure_parent_dir(path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()?.join(path)
    };
    if let Some(dir) = absolute.parent() {
        if !dir.exists() {
            fs::create_dir_all(dir).map_err(|e| KitError::File {
                path: dir.display().to_string(),
                reason: format!("create dir failed: {e}"),
            })?;
        }
    }
    Ok(())
}

/// Create (or truncate) a file, creating missing parent directories
pub fn create(path: impl AsRef<Path>) -> Result<File> {
    let path = path.as_ref();
    ensure_parent_dir(path)?;
    Ok(File::create(path)?)
}

/// Walk up from `start` to the first directory holding `marker`
/// (e.g. `Cargo.toml`)
pub fn infer_root_dir(start: impl AsRef<Path>, marker: &str) -> Result<PathBuf> {
    let start = start.as_ref();
    start
        .ancestors()
        .find(|dir| dir.join(marker).exists())
        .map(Path::to_path_buf)
        .ok_or_else(|| KitError::RootNotFound {
            start: start.display().to_string(),
            marker: marker.to_string(),
        })
}

/// Lexically cleaned components of a `/`-separated path. Relative paths
/// are treated as rooted at `/`.
fn clean_components(path: &str) -> Vec<&str> {
    let mut parts: Vec<&str> = Vec::new();
    for part in path.split('/') {
        match part {
            "" | "." => {}
            ".." => {
                parts.pop();
            }
            p => parts.push(p),
        }
    }
    parts
}

/// Longest shared directory prefix of two paths (`/a/b/c`, `/a/b/d` →
/// `/a/b`). The bare root does not count, so unrelated paths give `""`.
pub fn common_path(path1: &str, path2: &str) -> String {
    let a = clean_components(path1);
    let b = clean_components(path2);
    let shared: Vec<&str> = a
        .iter()
        .zip(&b)
        .take_while(|(x, y)| x == y)
        .map(|(x, _)| *x)
        .collect();
    if shared.is_empty() {
        String::new()
    } else {
        format!("/{}", shared.join("/"))
    }
}

/// True when [`common_path`] is non-empty
pub fn has_common_path(path1: &str, path2: &str) -> bool {
    !common_path(path1, path2).is_empty()
}

// ═══════════════════════════════════════════
// CONTENT TYPE
// ═══════════════════════════════════════════

/// Extensions (without the dot) matching the content of `data`.
///
/// Magic bytes are checked first. Content without a known signature that
/// is valid UTF-8 counts as `txt`. Unknown binary gives an empty list.
pub fn detect_content_type(data: &[u8]) -> Vec<String> {
    if let Some(kind) = infer::get(data) {
        return vec![kind.extension().to_string()];
    }
    if std::str::from_utf8(data).is_ok() {
        return vec!["txt".to_string()];
    }
    Vec::new()
}

/// [`detect_content_type`] over everything `reader` yields
pub fn detect_content_type_reader<R: Read>(mut reader: R) -> Result<Vec<String>> {
    let mut data = Vec::new();
    reader.read_to_end(&mut data)?;
    Ok(detect_content_type(&data))
}

/// True when the detected type is one of `accept` (extensions without dot)
pub fn is_allow_type(data: &[u8], accept: &[&str]) -> bool {
    detect_content_type(data)
        .iter()
        .any(|ext| accept.contains(&ext.as_str()))
}

/// The detected extension, checked against `accept`.
///
/// An empty `accept` list takes the first detected type.
/// [`KitError::FileTypeNotAllowed`] carries what was detected when nothing
/// matches.
pub fn check_and_get_type(data: &[u8], accept: &[&str]) -> Result<String> {
    let detected = detect_content_type(data);
    if accept.is_empty() {
        if let Some(first) = detected.first() {
            return Ok(first.clone());
        }
    }
    match detected.iter().find(|ext| accept.contains(&ext.as_str())) {
        Some(ext) => Ok(ext.clone()),
        None => Err(KitError::FileTypeNotAllowed {
            detected: detected.join(","),
        }),
    }
}
