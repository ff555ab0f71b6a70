//! # urxiv-backend
//!
//! The backend collaborator surface: the asynchronous [`BackendService`]
//! trait covering workspace selection, block CRUD, connections, file reads
//! and the OS shell hand-off, plus the [`Backend`] handle that wraps a
//! service with typed readiness state and call-site logging.
//!
//! The native backend itself (persistence, indexing, OS integration) lives
//! outside this repository; [`StubBackend`] is an in-memory double that
//! mirrors its observable semantics for tests and the headless demo.

pub mod error;
pub mod handle;
pub mod service;
pub mod stub;

pub use error::{BackendError, Result};
pub use handle::{Backend, Readiness};
pub use service::{BackendService, NewAnnotation};
pub use stub::StubBackend;
