pub mod classifier;
pub mod matcher;
