//! Story catalog.
//!
//! The read path (`QueryEngine`) and the write path (`SubmissionHandler`) both
//! go through an injected `RecordStore`, so either can run against the JSON
//! file store or an in-memory one.
//!
//! Re-exports:
//! - [`QueryEngine`]: filtered, paginated listing and lookup by id.
//! - [`SubmissionHandler`]: validation and creation of new stories.
//! - [`IdGenerator`] and its implementations.
//! - [`StoryQuery`], [`StoryPage`], [`NewStory`]: request and response types.

pub mod id_generator;
pub mod query_engine;
pub mod story_filter;
pub mod submission_handler;
#[cfg(test)]
pub mod tests;
pub mod types;

pub use id_generator::{IdGenerator, SequentialIdGenerator, TimestampIdGenerator};
pub use query_engine::QueryEngine;
pub use story_filter::StoryFilter;
pub use submission_handler::SubmissionHandler;
pub use types::{NewStory, StoryPage, StoryQuery};
