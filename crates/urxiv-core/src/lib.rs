//! # urxiv-core
//!
//! The pure data layer of the urXiv front-end:
//! - **Block**: the universal tagged content entity owned by the backend
//!   (file, channel, annotation, text, or an unrecognized type carried
//!   generically).
//! - **BrowserItem**: a normalized, display-ready projection of a Block,
//!   recomputed on every render and never persisted.
//! - **Adapters**: pure, total functions mapping any Block to a BrowserItem.
//! - **Filter/sort engine**: search filtering and ordering over item lists,
//!   overridable per call site.
//!
//! Nothing in this crate performs I/O or suspends; everything operates on
//! already-resident data.

pub mod adapt;
pub mod block;
pub mod engine;
pub mod item;
pub mod text;
pub mod types;

pub use adapt::to_browser_item;
pub use block::{AnnotationContent, Block, BlockContent, ChannelContent, FileContent, TextContent};
pub use engine::{apply_search, apply_sort, filter_sort, FilterSortFn, FilterSortOptions};
pub use item::{BrowserItem, SortOption};
pub use types::{BlockId, FileKind, Icon, SortKey};
