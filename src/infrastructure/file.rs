use crate::domain::ports::CollectionBackend;
use async_trait::async_trait;
use std::io;
use std::path::{Path, PathBuf};

/// Stores each collection as `<dir>/<name>.json`.
///
/// A snapshot is written to a sibling `.tmp` file and renamed over the target,
/// so readers see either the previous snapshot or the new one.
#[derive(Debug, Clone)]
pub struct FileBackend {
    dir: PathBuf,
}

impl FileBackend {
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    pub fn location(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{name}.json"))
    }
}

#[async_trait]
impl CollectionBackend for FileBackend {
    async fn read(&self, name: &str) -> io::Result<Option<Vec<u8>>> {
        match tokio::fs::read(self.location(name)).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    async fn write(&self, name: &str, bytes: Vec<u8>) -> io::Result<()> {
        tokio::fs::create_dir_all(&self.dir).await?;

        let target = self.location(name);
        let staging = target.with_extension("json.tmp");
        tokio::fs::write(&staging, bytes).await?;
        tokio::fs::rename(&staging, &target).await
    }
}
