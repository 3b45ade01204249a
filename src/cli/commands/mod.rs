//! Command implementations.

pub mod init;
pub mod seed;
pub mod snapshots;
pub mod status;
pub mod update;
pub mod version;
