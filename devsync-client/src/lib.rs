//! DevSync front end.
//!
//! Owns what surrounds the playground: the login session (one per process, injected into
//! each page), the page-load `?message=` signal, the route table and configuration.

pub mod auth;
pub mod config;
pub mod credentials;
pub mod error;
pub mod page_load;
pub mod project;
pub mod routes;
pub mod session;

pub use config::{ClientConfig, SignalPolicy};
pub use credentials::{CredentialStore, FileCredentialStore, MemoryCredentialStore};
pub use error::{ClientError, ClientResult};
pub use page_load::{PageLoad, PageLoadReport};
pub use project::Project;
pub use routes::{nav_items, NavItem, Route};
pub use session::{LoginResponse, Session};
