pub mod domain;
pub mod error;
pub mod mcp;
pub mod output;
pub mod panther;
