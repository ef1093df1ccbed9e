pub mod config;
pub mod plan;
pub mod source;
pub mod visitor;
