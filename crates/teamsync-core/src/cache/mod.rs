//! Per-run memoizing caches over the directory and the group API.
//!
//! Both caches are created for one reconciliation pass and dropped with it.

mod directory;
mod groups;

pub use directory::DirectoryCache;
pub use groups::GroupCache;
