//! Domain logic for PageDock: archive extraction, entry-file location,
//! static-asset path resolution, and verification-code generation.
//!
//! This crate is deliberately free of HTTP and database concerns so the
//! upload/serve pipeline can be tested against plain directories.

pub mod archive;
pub mod entry;
pub mod error;
pub mod resolve;
pub mod types;
pub mod verification;
