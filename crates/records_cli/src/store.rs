use anyhow::{Context, Result};
use async_trait::async_trait;
use fs2::FileExt;
use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use uuid::Uuid;

use records_core::lifecycle::Action;
use records_core::session::{Session, SessionToken};
use records_core::{DocumentRequest, NewDocumentRequest};
use records_service::gateway::{RemoteFailure, RemoteResult, RequestGateway};
use records_service::memory::InMemoryGateway;

/// Reads the JSON request store. A missing or empty file is an empty queue.
pub fn load(path: &Path) -> Result<Vec<DocumentRequest>> {
    if !path.exists() {
        return Ok(Vec::new());
    }

    let raw = fs::read_to_string(path)
        .with_context(|| format!("Failed to read request store: {:?}", path))?;
    if raw.trim().is_empty() {
        return Ok(Vec::new());
    }

    serde_json::from_str(&raw).with_context(|| format!("Request store {:?} is not valid JSON", path))
}

/// Writes the store through a sibling temp file so a crash never leaves half a file behind.
pub fn save(path: &Path, requests: &[DocumentRequest]) -> Result<()> {
    let json = serde_json::to_string_pretty(requests)?;
    let tmp = path.with_extension("json.tmp");

    fs::write(&tmp, json).with_context(|| format!("Failed to write {:?}", tmp))?;
    fs::rename(&tmp, path).with_context(|| format!("Failed to replace request store {:?}", path))?;
    Ok(())
}

// Exclusive hold on `<store>.lock` for the lifetime of the value.
struct StoreLock(File);

impl StoreLock {
    fn acquire(store: &Path) -> io::Result<Self> {
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .open(store.with_extension("json.lock"))?;
        file.lock_exclusive()?;
        Ok(Self(file))
    }
}

impl Drop for StoreLock {
    fn drop(&mut self) {
        let _ = FileExt::unlock(&self.0);
    }
}

/// The JSON store acting as the records service.
///
/// Every write takes the store lock, re-reads the file and re-checks the
/// call against what is on disk before saving. Two operators working off
/// the same list cannot overwrite each other: the later transition is
/// refused the same way the remote service refuses a stale one.
pub struct StoreGateway {
    path: PathBuf,
    inner: InMemoryGateway,
}

impl StoreGateway {
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let requests = load(&path)?;
        tracing::debug!(path = ?path, count = requests.len(), "request store loaded");

        Ok(Self {
            inner: InMemoryGateway::with_requests(requests),
            path,
        })
    }

    pub fn register_session(&self, session: &Session) {
        self.inner.register_session(session);
    }

    fn pull(&self) -> RemoteResult<()> {
        let requests = load(&self.path).map_err(unavailable)?;
        self.inner.replace_all(requests);
        Ok(())
    }

    fn push(&self) -> RemoteResult<()> {
        save(&self.path, &self.inner.snapshot()).map_err(unavailable)
    }

    fn lock(&self) -> RemoteResult<StoreLock> {
        StoreLock::acquire(&self.path)
            .map_err(|e| RemoteFailure::new(format!("Request store is locked or unreadable: {}", e)))
    }
}

fn unavailable(error: anyhow::Error) -> RemoteFailure {
    tracing::error!(error = %format!("{:#}", error), "request store access failed");
    RemoteFailure::new(format!("Request store unavailable: {:#}", error))
}

#[async_trait]
impl RequestGateway for StoreGateway {
    async fn list(&self, token: &SessionToken) -> RemoteResult<Vec<DocumentRequest>> {
        self.pull()?;
        self.inner.list(token).await
    }

    async fn get(&self, token: &SessionToken, id: Uuid) -> RemoteResult<DocumentRequest> {
        self.pull()?;
        self.inner.get(token, id).await
    }

    async fn create(&self, token: &SessionToken, request: NewDocumentRequest) -> RemoteResult<DocumentRequest> {
        let _lock = self.lock()?;
        self.pull()?;
        let created = self.inner.create(token, request).await?;
        self.push()?;
        Ok(created)
    }

    async fn submit_transition(
        &self,
        token: &SessionToken,
        id: Uuid,
        action: Action,
    ) -> RemoteResult<DocumentRequest> {
        let _lock = self.lock()?;
        self.pull()?;
        let updated = self.inner.submit_transition(token, id, action).await?;
        self.push()?;
        Ok(updated)
    }
}
