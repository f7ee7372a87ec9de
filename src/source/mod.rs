// src/source/mod.rs
// =============================================================================
// Where the endpoint list comes from.
//
// Currently implements:
// - Reading a plain text file with one endpoint per line
// =============================================================================

mod file;

pub use file::load_endpoints;
