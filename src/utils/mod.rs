//! Utility modules shared by deployment methods.

pub mod date;
pub mod exec;
pub mod fs;
pub mod git;
pub mod log;
