//! Exporting the composed document as a downloadable `project.html`.
//!
//! The bytes are registered under a temporary object URL, handed to a [`Downloader`]
//! exactly once and revoked right after. [`ObjectUrl`] revokes on drop, so the handle
//! is released on every path, including download failures.

use dashmap::DashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::buffer::Buffers;
use crate::error::{PlaygroundError, PlaygroundResult};
use crate::notify::NotificationService;

pub const EXPORT_FILE_NAME: &str = "project.html";
pub const EXPORT_MIME_TYPE: &str = "text/html";

pub const EXPORT_SUCCESS_MESSAGE: &str = "Project saved successfully!";

/// Immutable typed bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Blob {
    pub mime: &'static str,
    pub bytes: Arc<[u8]>,
}

impl Blob {
    pub fn new(mime: &'static str, bytes: impl Into<Arc<[u8]>>) -> Self {
        Self {
            mime,
            bytes: bytes.into(),
        }
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Registry of live object URLs.
#[derive(Clone, Default)]
pub struct BlobStore {
    blobs: Arc<DashMap<String, Arc<Blob>>>,
}

impl BlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create_object_url(&self, blob: Blob) -> ObjectUrl {
        let href = format!("blob:devsync/{}", Uuid::new_v4());
        self.blobs.insert(href.clone(), Arc::new(blob));
        ObjectUrl {
            href,
            store: self.clone(),
        }
    }

    pub fn resolve(&self, href: &str) -> PlaygroundResult<Arc<Blob>> {
        self.blobs
            .get(href)
            .map(|b| Arc::clone(b.value()))
            .ok_or_else(|| PlaygroundError::ObjectUrlRevoked {
                href: href.to_string(),
            })
    }

    /// Number of URLs not yet revoked.
    pub fn live_count(&self) -> usize {
        self.blobs.len()
    }
}

/// A temporary reference to a registered blob. Revoked when dropped.
pub struct ObjectUrl {
    href: String,
    store: BlobStore,
}

impl ObjectUrl {
    pub fn href(&self) -> &str {
        &self.href
    }

    pub fn resolve(&self) -> PlaygroundResult<Arc<Blob>> {
        self.store.resolve(&self.href)
    }

    pub fn revoke(self) {}
}

impl Drop for ObjectUrl {
    fn drop(&mut self) {
        self.store.blobs.remove(&self.href);
    }
}

impl std::fmt::Debug for ObjectUrl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("ObjectUrl").field(&self.href).finish()
    }
}

/// Platform side of a download: take the URL and offer it to the user as `file_name`.
///
/// Success means the artifact was handed over, not that a file was confirmed written
/// by the user.
pub trait Downloader {
    fn download(&mut self, url: &ObjectUrl, file_name: &str) -> PlaygroundResult<()>;
}

/// Saves downloads into a fixed directory.
#[derive(Debug, Clone)]
pub struct DirectoryDownloader {
    dir: PathBuf,
    last_saved: Option<PathBuf>,
}

impl DirectoryDownloader {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            last_saved: None,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn last_saved(&self) -> Option<&Path> {
        self.last_saved.as_deref()
    }
}

impl Downloader for DirectoryDownloader {
    fn download(&mut self, url: &ObjectUrl, file_name: &str) -> PlaygroundResult<()> {
        let blob = url.resolve()?;
        fs::create_dir_all(&self.dir).map_err(|e| PlaygroundError::io(&self.dir, e))?;
        let path = self.dir.join(file_name);
        fs::write(&path, &blob.bytes[..]).map_err(|e| PlaygroundError::DownloadFailed {
            file_name: file_name.to_string(),
            reason: format!("{}: {}", path.display(), e),
        })?;
        self.last_saved = Some(path);
        Ok(())
    }
}

pub struct ExportService<D> {
    blobs: BlobStore,
    downloader: D,
}

impl<D: Downloader> ExportService<D> {
    pub fn new(downloader: D) -> Self {
        Self {
            blobs: BlobStore::new(),
            downloader,
        }
    }

    pub fn downloader(&self) -> &D {
        &self.downloader
    }

    pub fn blobs(&self) -> &BlobStore {
        &self.blobs
    }

    /// Compose `buffers` as they are right now and hand the result to the downloader.
    ///
    /// Always reports through `notifier`: success on hand-off, error-kind otherwise.
    #[tracing::instrument(skip_all)]
    pub fn export_current(
        &mut self,
        buffers: &Buffers,
        notifier: &NotificationService,
    ) -> PlaygroundResult<()> {
        let document = buffers.compose();
        let blob = Blob::new(EXPORT_MIME_TYPE, document.as_bytes());
        let url = self.blobs.create_object_url(blob);
        let result = self.downloader.download(&url, EXPORT_FILE_NAME);
        url.revoke();

        match result {
            Ok(()) => {
                info!(bytes = document.len(), "exported {}", EXPORT_FILE_NAME);
                notifier.success(EXPORT_SUCCESS_MESSAGE);
                Ok(())
            }
            Err(e) => {
                warn!("export failed: {}", e);
                notifier.error(format!("Failed to save project: {}", e));
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::NotificationKind;

    /// Records what it was handed; optionally refuses.
    #[derive(Default)]
    struct RecordingDownloader {
        refuse: bool,
        received: Vec<(String, Blob)>,
    }

    impl Downloader for RecordingDownloader {
        fn download(&mut self, url: &ObjectUrl, file_name: &str) -> PlaygroundResult<()> {
            if self.refuse {
                return Err(PlaygroundError::DownloadFailed {
                    file_name: file_name.to_string(),
                    reason: "blocked by platform".to_string(),
                });
            }
            let blob = url.resolve()?;
            self.received.push((file_name.to_string(), (*blob).clone()));
            Ok(())
        }
    }

    #[test]
    fn test_object_url_revoked_on_drop() {
        let store = BlobStore::new();
        let url = store.create_object_url(Blob::new("text/plain", b"x".to_vec()));
        let href = url.href().to_string();
        assert_eq!(store.live_count(), 1);
        url.revoke();
        assert_eq!(store.live_count(), 0);
        assert!(store.resolve(&href).is_err());
    }

    #[test]
    fn test_export_hands_over_html_and_releases_url() {
        let notifier = NotificationService::new();
        let mut svc = ExportService::new(RecordingDownloader::default());
        let buffers = Buffers::new("<p>a</p>", "p{}", "1");

        svc.export_current(&buffers, &notifier).unwrap();

        let (name, blob) = &svc.downloader().received[0];
        assert_eq!(name, EXPORT_FILE_NAME);
        assert_eq!(blob.mime, EXPORT_MIME_TYPE);
        assert_eq!(&blob.bytes[..], buffers.compose().as_bytes());
        assert_eq!(svc.blobs().live_count(), 0);

        let n = notifier.current().unwrap();
        assert_eq!(n.kind, NotificationKind::Success);
        assert_eq!(n.message, EXPORT_SUCCESS_MESSAGE);
    }

    #[test]
    fn test_refused_download_emits_error_notification() {
        let notifier = NotificationService::new();
        let mut svc = ExportService::new(RecordingDownloader {
            refuse: true,
            ..Default::default()
        });

        let err = svc.export_current(&Buffers::default(), &notifier).unwrap_err();
        assert!(matches!(err, PlaygroundError::DownloadFailed { .. }));
        assert_eq!(svc.blobs().live_count(), 0);

        let n = notifier.current().unwrap();
        assert_eq!(n.kind, NotificationKind::Error);
        assert!(n.message.starts_with("Failed to save project"));
    }

    #[test]
    fn test_directory_downloader_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let notifier = NotificationService::new();
        let mut svc = ExportService::new(DirectoryDownloader::new(dir.path().join("out")));
        let buffers = Buffers::default();

        svc.export_current(&buffers, &notifier).unwrap();

        let saved = svc.downloader().last_saved().unwrap().to_path_buf();
        assert_eq!(saved, dir.path().join("out").join(EXPORT_FILE_NAME));
        let written = fs::read_to_string(saved).unwrap();
        assert_eq!(written, buffers.compose().as_str());
    }
}
