pub mod checkout_client;
pub mod configuration;
pub mod constants;
pub mod domain;
pub mod errors;
pub mod migration;
pub mod openapi;
pub mod routes;
pub mod schemas;
pub mod startup;
pub mod telemetry;
pub mod utils;
