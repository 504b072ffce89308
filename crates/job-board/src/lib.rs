pub mod config;
pub mod error;
pub mod gateways;
pub mod telemetry;
pub mod workflows;
