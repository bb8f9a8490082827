//! JSON-lines persistence for the document collections and the registry snapshot.

use crate::error::Result;

use serde::Serialize;
use serde::de::DeserializeOwned;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;

pub const PHOTOS_FILE: &str = "photos_collection.jsonl";
pub const ALBUMS_FILE: &str = "albums_collection.jsonl";

/// Replaces `path` with `content` through a temp file and a rename, so readers
/// of the file never see a half-written snapshot.
pub async fn write_atomic(path: &Path, content: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        tokio::fs::create_dir_all(parent).await?;
    }

    let temp_path = temp_path_for(path);
    let mut file = tokio::fs::File::create(&temp_path).await?;
    file.write_all(content).await?;
    file.sync_all().await?;
    drop(file);

    tokio::fs::rename(&temp_path, path).await?;
    Ok(())
}

/// `<file>.tmp` next to `path`. The full file name is kept so that two
/// targets differing only by extension never share a temp file.
pub fn temp_path_for(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(OsString::from).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

/// Encodes one JSON document per line.
pub fn encode_lines<'a, T, I>(items: I) -> Result<Vec<u8>>
where
    T: Serialize + 'a,
    I: IntoIterator<Item = &'a T>,
{
    let mut buf = Vec::new();
    for item in items {
        serde_json::to_writer(&mut buf, item)?;
        buf.push(b'\n');
    }
    Ok(buf)
}

/// Reads a JSON-lines collection. A missing file is an empty collection.
///
/// Lines that do not decode are logged and skipped; the rest of the
/// collection still loads.
pub async fn read_lines<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    let content = match tokio::fs::read_to_string(path).await {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(e.into()),
    };

    let mut items = Vec::new();
    for (lineno, line) in content.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        match serde_json::from_str::<T>(line) {
            Ok(item) => items.push(item),
            Err(e) => {
                tracing::warn!(
                    "Skipping undecodable record at {}:{}: {}",
                    path.display(),
                    lineno + 1,
                    e
                );
            }
        }
    }
    Ok(items)
}
