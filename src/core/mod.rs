//! Core module - configuration, logging and core errors
//!
//! Ambient infrastructure shared by the library and the replay binary. Nothing
//! in here knows about branches or moves.
//!
//! # Module Structure
//!
//! - `config` - [`GameConfig`] loading (JSON, default fallback)
//! - `logging` - `tracing` subscriber installation
//! - `error` - [`CoreError`] and [`CoreResult`]

pub mod config;
pub mod error;
pub mod logging;

pub use config::GameConfig;
pub use error::{CoreError, CoreResult};
pub use logging::init_logging;
