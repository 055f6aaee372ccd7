pub mod auth;
pub mod clock;
pub mod configuration;
pub mod db;
pub mod error;
pub mod logger;
pub mod routes;
pub mod startup;
pub mod state;
pub mod telemetry;
pub mod validators;
pub mod workflow;
