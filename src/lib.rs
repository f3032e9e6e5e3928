/// REST clients for outside services
pub mod client;
/// Domain objects
pub mod domain;
/// Error enums
pub mod error;
/// Data model and temporal logic
pub mod model;
/// Expiration-notification pipeline
pub mod notification;
/// Repositories
pub mod repo;
/// Cron-driven trigger for the notification pipeline
pub mod scheduler;
/// Application settings
pub mod settings;
/// Application telemetry for tracing and logging
pub mod telemetry;
