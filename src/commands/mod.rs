use thiserror::Error;

pub mod config;
pub mod filter;
pub mod org;
pub mod repos;

/// The operator declined a confirmation prompt.
#[derive(Debug, Error)]
#[error("Aborted by operator")]
pub struct Aborted;
