//! Collaborator trait seams.
//!
//! The pipeline consumes external services through these narrow contracts;
//! real clients live in [`crate::providers`], [`crate::fetchers`],
//! [`crate::summarizers`], and [`crate::mailers`], and call-tracking mocks
//! in [`crate::testing`].

pub mod classifier;
pub mod enricher;
pub mod fetcher;
pub mod mail;
pub mod searcher;
pub mod summarizer;
