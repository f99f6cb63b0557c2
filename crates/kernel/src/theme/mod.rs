//! Theme engine and template rendering.
//!
//! Provides Tera-based template rendering with template suggestion resolution.

mod engine;

pub use engine::ThemeEngine;
