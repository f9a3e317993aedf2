//! Client-side logic for the BugBee forum that does not need a browser:
//! the application store, the remote API contract, vote orchestration,
//! background polling and the rich-text content pipeline.

pub mod api;
pub mod catalog;
pub mod config;
pub mod content;
pub mod dialog;
pub mod error;
pub mod layout;
pub mod notify;
pub mod profile;
pub mod store;
pub mod sync;
pub mod time;
pub mod toast;
pub mod vote;

#[cfg(test)]
pub(crate) mod testing;

pub use api::ForumApi;
pub use error::{ApiError, ErrorKind};
pub use store::{Action, Store};
