pub mod error;
pub mod logger;
pub mod monitor;
pub mod network;
pub mod validation;
