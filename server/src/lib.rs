pub mod configuration;
pub mod telemetry;
