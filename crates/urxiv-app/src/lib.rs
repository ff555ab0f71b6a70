//! # urxiv-app
//!
//! The view-model layer of the urXiv front-end: the generic [`Browser`]
//! over adapted items, and the view composition that loads data from the
//! injected [`Backend`](urxiv_backend::Backend) handle, converts it through
//! the core adapters and exposes render snapshots.
//!
//! All rendering here is headless: views produce typed snapshots (render
//! states, rows, cards) that the embedding GUI draws. Data flows one way
//! per render: backend -> blocks -> adapters -> items -> filter/sort ->
//! snapshot; interaction flows back as synchronous state updates or typed
//! events consumed by the owning layer.

pub mod browser;
pub mod config;
pub mod generation;
pub mod views;

pub use browser::{Browser, BrowserRow, BrowserView};
pub use config::AppConfig;
pub use generation::Generations;
