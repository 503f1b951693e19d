pub mod client;
pub mod coordinator;
pub mod health;
pub mod launcher;
pub mod materializer;
pub mod readiness;
pub mod report;

pub use crate::domain::model::{RunSummary, ServiceDescriptor, ServiceStatus};
pub use crate::domain::ports::{HealthProbe, ProcessSpawner, Storage};
pub use crate::utils::error::Result;
