pub mod configuration;
pub mod diff;
