use std::io;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use tracing::{debug, warn};

/// A directory entry as reported by [`MetadataFs::list_entries`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntry {
    pub name: String,
    pub is_dir: bool,
}

/// File-system capability the reader and writer depend on.
#[async_trait::async_trait]
pub trait MetadataFs: Send + Sync {
    async fn read(&self, path: &Path) -> io::Result<Vec<u8>>;

    /// Replace the file at `path` with `bytes`. A failed write must not
    /// leave a partial file behind.
    async fn write(&self, path: &Path, bytes: &[u8]) -> io::Result<()>;

    async fn list_entries(&self, dir: &Path) -> io::Result<Vec<DirEntry>>;

    async fn last_write_time(&self, path: &Path) -> io::Result<DateTime<Utc>>;

    async fn exists(&self, path: &Path) -> bool;
}

/// [`MetadataFs`] over the local disk.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFs;

fn temp_path(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    path.with_file_name(format!(".{name}.tmp"))
}

async fn write_then_rename(tmp: &Path, path: &Path, bytes: &[u8]) -> io::Result<()> {
    use tokio::io::AsyncWriteExt;

    let mut file = tokio::fs::File::create(tmp).await?;
    file.write_all(bytes).await?;
    file.sync_all().await?;
    drop(file);
    tokio::fs::rename(tmp, path).await
}

#[async_trait::async_trait]
impl MetadataFs for LocalFs {
    async fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
        tokio::fs::read(path).await
    }

    async fn write(&self, path: &Path, bytes: &[u8]) -> io::Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        let tmp = temp_path(path);
        if let Err(e) = write_then_rename(&tmp, path, bytes).await {
            if let Err(cleanup) = tokio::fs::remove_file(&tmp).await {
                if cleanup.kind() != io::ErrorKind::NotFound {
                    warn!(path = %tmp.display(), error = %cleanup, "cannot remove partial file");
                }
            }
            return Err(e);
        }
        debug!(path = %path.display(), bytes = bytes.len(), "wrote file");
        Ok(())
    }

    async fn list_entries(&self, dir: &Path) -> io::Result<Vec<DirEntry>> {
        let mut read_dir = tokio::fs::read_dir(dir).await?;
        let mut entries = Vec::new();
        while let Some(entry) = read_dir.next_entry().await? {
            let is_dir = match entry.file_type().await {
                Ok(t) => t.is_dir(),
                Err(e) => {
                    debug!(path = %entry.path().display(), error = %e, "cannot stat entry");
                    continue;
                }
            };
            entries.push(DirEntry {
                name: entry.file_name().to_string_lossy().into_owned(),
                is_dir,
            });
        }
        Ok(entries)
    }

    async fn last_write_time(&self, path: &Path) -> io::Result<DateTime<Utc>> {
        let modified = tokio::fs::metadata(path).await?.modified()?;
        Ok(DateTime::<Utc>::from(modified))
    }

    async fn exists(&self, path: &Path) -> bool {
        tokio::fs::try_exists(path).await.unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn write_creates_parents_and_replaces() {
        let tmp = tempfile::tempdir().unwrap();
        let target = tmp.path().join("Movie (2020)").join("movie.nfo");

        LocalFs.write(&target, b"<movie/>").await.unwrap();
        assert_eq!(LocalFs.read(&target).await.unwrap(), b"<movie/>");

        LocalFs.write(&target, b"<movie></movie>").await.unwrap();
        assert_eq!(LocalFs.read(&target).await.unwrap(), b"<movie></movie>");

        // no temp file left behind
        let entries = LocalFs.list_entries(target.parent().unwrap()).await.unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].name, "movie.nfo");
    }

    #[tokio::test]
    async fn failed_write_leaves_nothing() {
        let tmp = tempfile::tempdir().unwrap();
        // the target is an existing directory, so the rename fails
        let target = tmp.path().join("occupied");
        std::fs::create_dir(&target).unwrap();
        std::fs::write(target.join("keep"), "x").unwrap();

        assert!(LocalFs.write(&target, b"data").await.is_err());
        let names: Vec<String> = LocalFs
            .list_entries(tmp.path())
            .await
            .unwrap()
            .into_iter()
            .map(|e| e.name)
            .collect();
        assert_eq!(names, vec!["occupied".to_string()]);
    }

    #[tokio::test]
    async fn list_marks_directories() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::create_dir(tmp.path().join("VIDEO_TS")).unwrap();
        std::fs::write(tmp.path().join("a.nfo"), "").unwrap();

        let mut entries = LocalFs.list_entries(tmp.path()).await.unwrap();
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        assert_eq!(
            entries,
            vec![
                DirEntry { name: "VIDEO_TS".into(), is_dir: true },
                DirEntry { name: "a.nfo".into(), is_dir: false },
            ]
        );
        assert!(LocalFs.exists(&tmp.path().join("a.nfo")).await);
        assert!(!LocalFs.exists(&tmp.path().join("b.nfo")).await);
        assert!(LocalFs.last_write_time(&tmp.path().join("a.nfo")).await.is_ok());
    }
}
