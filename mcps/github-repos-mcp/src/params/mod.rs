//! Parameter types for the repository tools
//!
//! Each struct is both the tool's published JSON schema and the contract
//! the dispatcher validates incoming arguments against.

mod repo;

pub use repo::*;
