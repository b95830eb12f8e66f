use std::path::{Path, PathBuf};

use tokio::fs::{self, File, OpenOptions};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;
use tracing::{debug, error, warn};

use super::{ApplicationStore, StoreError};
use crate::applications::domain::{Application, ApplicationId, NewApplication};

/// Append-only document file: one JSON-encoded application per line.
///
/// Writes are appended and synced before `create` returns. Reads rescan the file, so
/// `list_all` yields documents in the order they were written. The writer lock is held
/// for reads as well so a scan never observes a half-written line.
///
/// Every committed document ends with a newline. A failed append is truncated back to the
/// last committed length, and `open` repairs a tail left behind by a crash.
#[derive(Debug)]
pub struct FileApplicationStore {
    path: PathBuf,
    writer: Mutex<File>,
}

impl FileApplicationStore {
    /// Open (creating if needed) the document file and check that existing content parses.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        if let Some(parent) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await?;
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .await?;

        repair_tail(&path, &mut file).await?;
        let existing = read_documents(&path).await?;
        debug!(path = %path.display(), documents = existing.len(), "opened application file store");

        Ok(Self {
            path,
            writer: Mutex::new(file),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ApplicationStore for FileApplicationStore {
    async fn create(&self, application: NewApplication) -> Result<Application, StoreError> {
        let record = application.into_application(ApplicationId::generate());
        let mut line = serde_json::to_vec(&record).map_err(StoreError::Encode)?;
        line.push(b'\n');

        let mut file = self.writer.lock().await;
        let committed = file.metadata().await?.len();
        if let Err(err) = append_synced(&mut file, &line).await {
            if let Err(rollback) = file.set_len(committed).await {
                error!(
                    path = %self.path.display(),
                    error = %rollback,
                    "unable to roll back failed append"
                );
            }
            return Err(err.into());
        }

        Ok(record)
    }

    async fn list_all(&self) -> Result<Vec<Application>, StoreError> {
        let _writer = self.writer.lock().await;
        read_documents(&self.path).await
    }
}

async fn append_synced(file: &mut File, line: &[u8]) -> std::io::Result<()> {
    file.write_all(line).await?;
    file.flush().await?;
    file.sync_data().await
}

/// Terminate a complete final document that lacks its newline, or drop an incomplete one.
async fn repair_tail(path: &Path, file: &mut File) -> Result<(), StoreError> {
    let contents = fs::read(path).await?;
    if contents.is_empty() || contents.ends_with(b"\n") {
        return Ok(());
    }

    let tail_start = contents
        .iter()
        .rposition(|byte| *byte == b'\n')
        .map_or(0, |index| index + 1);

    if serde_json::from_slice::<Application>(&contents[tail_start..]).is_ok() {
        debug!(path = %path.display(), "terminating final document");
        append_synced(file, b"\n").await?;
    } else {
        warn!(
            path = %path.display(),
            discarded_bytes = contents.len() - tail_start,
            "discarding incomplete trailing document"
        );
        file.set_len(tail_start as u64).await?;
        file.sync_data().await?;
    }

    Ok(())
}

async fn read_documents(path: &Path) -> Result<Vec<Application>, StoreError> {
    let contents = fs::read_to_string(path).await?;
    contents
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(index, line)| {
            serde_json::from_str(line).map_err(|source| StoreError::Corrupt {
                line: index + 1,
                source,
            })
        })
        .collect()
}
