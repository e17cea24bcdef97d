//! Small helpers for text cleanup and file replacement.

use std::io;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, instrument};

/// Join text nodes and collapse every run of whitespace into one space.
///
/// Returns `None` when nothing but whitespace is left.
///
/// ```ignore
/// assert_eq!(collapse_text(["  Paid\n", "leave "]), Some("Paid leave".into()));
/// ```
pub fn collapse_text<'a, I>(parts: I) -> Option<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let joined = parts.into_iter().collect::<String>();
    let text = joined.split_whitespace().collect::<Vec<_>>().join(" ");
    (!text.is_empty()).then_some(text)
}

/// Truncate a string for logging purposes.
///
/// Long strings are cut at `max` characters with `"…(+N bytes)"` appended.
pub fn truncate_for_log(s: &str, max: usize) -> String {
    match s.char_indices().nth(max) {
        None => s.to_string(),
        Some((cut, _)) => format!("{}…(+{} bytes)", &s[..cut], s.len() - cut),
    }
}

/// Sibling path used while a replacement for `path` is being written.
fn temp_path_for(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    path.with_file_name(format!(".{name}.tmp"))
}

/// Replace the file at `path` with `contents` without ever exposing a
/// partially written file.
///
/// The bytes go to a hidden sibling file first, are flushed to disk, and the
/// sibling is renamed over `path`. Parent directories are created as needed.
/// On failure the temporary file is removed and `path` is left as it was.
#[instrument(level = "info", skip_all, fields(path = %path.display(), bytes = contents.len()))]
pub async fn write_atomic(path: &Path, contents: &[u8]) -> io::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).await?;
    }

    let tmp = temp_path_for(path);
    let result: io::Result<()> = async {
        let mut file = fs::File::create(&tmp).await?;
        file.write_all(contents).await?;
        file.sync_all().await?;
        drop(file);
        fs::rename(&tmp, path).await
    }
    .await;

    if result.is_err() {
        let _ = fs::remove_file(&tmp).await;
    } else {
        debug!(tmp = %tmp.display(), "Renamed temporary file into place");
    }
    result
}
