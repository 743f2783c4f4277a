pub mod actions;
pub mod setup;

// Re-export main utilities for use by test files
#[allow(unused_imports)]
pub use actions::{minus, plus};
#[allow(unused_imports)]
pub use setup::{TestSetup, TestSetupBuilder};
