/// NASA dashboard backend library

pub mod clients;
pub mod config;
pub mod domain;
pub mod engine;
pub mod errors;
pub mod handlers;
pub mod ingest;
pub mod routes;
pub mod services;
pub mod utils;
