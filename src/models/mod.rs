//! Domain models for ghostwriter.
//!
//! # Core Concepts
//!
//! - [`OutlinePoint`]: one bullet line of the outline, the unit of work for the
//!   interview and write phases.
//! - [`InterviewRecord`]: the questions asked about one outline point and the
//!   author's answers. At most one record exists per distinct point string.
//! - [`AuthorContext`]: who the memoir is about, substituted into prompts.
//! - [`DraftMode`]: whether the write phase appends to or replaces the draft.

mod author;
mod draft;
mod interview;
mod outline;

pub use author::*;
pub use draft::*;
pub use interview::*;
pub use outline::*;
