//! HTTP front end for the live tracking engine.

pub mod config;
pub mod error;
pub mod routes;
pub mod seed;
pub mod server;
pub mod views;

pub use config::Config;
pub use server::Server;
