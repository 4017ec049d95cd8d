//! HTTP surface of the catalog service: configuration, authentication,
//! routing and the external integrations it depends on.

pub mod app;
pub mod config;
pub mod error;
pub mod extractors;
pub mod middleware;
pub mod routes;
pub mod services;
