//! State module for tracking crawl progress
//!
//! Each cached skin page carries a [`RecordState`] describing whether it still
//! needs to be fetched, was resolved to a workshop id and item shortname, or
//! was permanently skipped.

mod record_state;

pub use record_state::RecordState;
