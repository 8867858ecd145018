//! Write-replace helper shared by the file caches.

use std::io;
use std::path::Path;
use tokio::fs;
use tokio::io::AsyncWriteExt;

/// Atomic save using the write-replace pattern:
/// 1. Write to a sibling temp file
/// 2. sync_all() to flush to disk
/// 3. Rename over the target
///
/// A crash mid-write leaves the previous file intact.
pub async fn write_atomic(path: &Path, contents: &[u8]) -> io::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).await?;
    }

    let mut temp_name = path.as_os_str().to_owned();
    temp_name.push(".tmp");
    let temp_path = std::path::PathBuf::from(temp_name);

    let mut f = fs::File::create(&temp_path).await?;
    f.write_all(contents).await?;
    f.sync_all().await?;
    drop(f); // close before rename

    fs::rename(&temp_path, path).await
}
