pub mod client;
pub mod error;
pub mod models;
pub mod pagination;

pub use client::{Endpoint, GitHubClient};
