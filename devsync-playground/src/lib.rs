//! # DevSync Playground
//!
//! The live preview compositor behind the DevSync code editor page.
//!
//! Three buffers (markup, style, script) are merged into one document on every change
//! or on an explicit run, rendered inside a sandboxed frame, and exported as
//! `project.html`. Outcomes are reported through short-lived notifications.
//!
//! ## Example
//! ```ignore
//! use devsync_playground::{
//!     DirectoryDownloader, ExecutionSandbox, Language, NotificationService, Playground,
//!     SrcdocFrame,
//! };
//!
//! let mut playground = Playground::new(
//!     ExecutionSandbox::new(SrcdocFrame::default()),
//!     DirectoryDownloader::new("."),
//!     NotificationService::new(),
//! );
//! playground.set(Language::Style, "h1 { color: tomato; }");
//! playground.export()?;
//! ```

pub mod buffer;
pub mod compose;
pub mod error;
pub mod export;
pub mod host;
pub mod notify;
pub mod playground;
pub mod sandbox;
pub mod signal;

pub use buffer::{BufferChange, Buffers, Language, SourceBufferStore, Subscription};
pub use compose::{compose, ComposedDocument};
pub use error::{PlaygroundError, PlaygroundResult};
pub use export::{
    Blob, BlobStore, DirectoryDownloader, Downloader, ExportService, ObjectUrl, EXPORT_FILE_NAME,
    EXPORT_MIME_TYPE,
};
pub use host::host_page;
pub use notify::{Notification, NotificationKind, NotificationService, DISMISS_AFTER};
pub use playground::{LivePreview, Playground};
pub use sandbox::{ExecutionSandbox, RenderContext, RenderOutcome, SrcdocFrame};
pub use signal::{InboundSignal, OAUTH_SUCCESS_SENTINEL};
