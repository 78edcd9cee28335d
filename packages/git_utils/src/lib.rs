// ABOUTME: Git integration utilities for codecheck.
// ABOUTME: Parses GitHub references (SSH/HTTPS formats) and clones them into workspaces.

pub mod fetcher;
pub mod reference;

pub use fetcher::{
    classify_clone_failure, verify_checkout, FetchError, FetchReport, FetchResult,
    GitCliFetcher, RepositoryFetcher,
};
pub use reference::{parse_reference, ReferenceError};
