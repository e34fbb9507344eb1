//! manage-api library
//!
//! Products spotlight and user management endpoints backed by stored
//! procedures in the `manage` PostgreSQL schema.

use shadow_rs::shadow;
shadow!(build);

pub mod api;
pub mod cli;
pub mod config;
pub mod db;
pub mod error;
pub mod logger;
pub mod models;
pub mod procedure;
pub mod repositories;
pub mod server;
pub mod state;
pub mod utils;

#[cfg(test)]
pub mod testing;

pub use state::AppState;

pub fn pkg_version() -> &'static str {
    build::PKG_VERSION
}

pub fn clap_long_version() -> &'static str {
    build::CLAP_LONG_VERSION
}
