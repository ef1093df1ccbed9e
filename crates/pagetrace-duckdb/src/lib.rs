pub mod backend;
pub mod clicks;
pub mod queries;
pub mod schema;
pub mod settings;
pub mod visitors;

pub use backend::DuckDbBackend;

/// Re-export the `duckdb` crate so consumers (especially tests) can use
/// `pagetrace_duckdb::duckdb::params!` without an extra dependency.
pub use duckdb;
