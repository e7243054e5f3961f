pub mod config;
pub mod date_key;
pub mod task;

pub use config::*;
pub use date_key::*;
pub use task::*;
