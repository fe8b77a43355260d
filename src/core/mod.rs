pub mod config;
pub mod eip712;
pub mod errors;
pub mod kernel;
pub mod traits;
pub mod types;
