use thiserror::Error;

pub type PlaygroundResult<T> = Result<T, PlaygroundError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum PlaygroundError {
    #[error("Unknown buffer language '{tag}'. Expected one of: html, css, js")]
    UnknownLanguage { tag: String },

    #[error("Render context rejected the document: {reason}")]
    RenderRejected { reason: String },

    #[error("Object URL '{href}' is not registered (already revoked?)")]
    ObjectUrlRevoked { href: String },

    #[error("Download of '{file_name}' failed: {reason}")]
    DownloadFailed { file_name: String, reason: String },

    #[error("I/O error on '{path}': {message}")]
    Io { path: String, message: String },

    #[error("Invalid page URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },
}

impl PlaygroundError {
    pub fn io(path: impl AsRef<std::path::Path>, err: std::io::Error) -> Self {
        PlaygroundError::Io {
            path: path.as_ref().display().to_string(),
            message: err.to_string(),
        }
    }
}
