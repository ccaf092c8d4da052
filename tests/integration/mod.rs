//! Integration tests for eaglebridge

mod catalog_scan;
mod cli_contracts;
mod parse_contracts;
mod support;
