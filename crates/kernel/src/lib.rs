//! Dodo Pet Store Kernel Library
//!
//! This library exposes kernel internals for integration testing.
//! The main entry point for running the server is the `dodo` binary.

pub mod config;
pub mod content;
pub mod db;
pub mod error;
pub mod form;
pub mod models;
pub mod password;
pub mod routes;
pub mod session;
pub mod state;
pub mod store;
pub mod theme;

pub use config::Config;
pub use state::AppState;
