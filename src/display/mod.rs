pub mod configuration;
pub mod diff;
pub mod org;
pub mod repo;
pub mod ui;
