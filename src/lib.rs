//! eaglebridge: Eagle library scanning and export
//!
//! Reads an Eagle library directly from disk, classifies every item folder
//! as accepted, skipped or errored, and feeds the accepted items to XMP
//! sidecar generation or an Immich upload. Thin clients for the Eagle and
//! Immich HTTP APIs round it out.

pub mod catalog;
pub mod config;
pub mod error;
pub mod logging;
pub mod remote;
pub mod report;
pub mod sidecar;
pub mod tooling;
pub mod transfer;
pub mod types;
