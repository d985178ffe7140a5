//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! built-in defaults
//!     → optional TOML file named by ATTO_CONFIG (loader.rs)
//!     → ATTO_NODE_URL / ATTO_REPRESENTATIVE overrides (loader.rs)
//!     → validation.rs (semantic checks, all errors collected)
//!     → AttoConfig (validated, immutable)
//!     → passed by reference into the pipeline
//! ```
//!
//! # Design Decisions
//! - Config is built once in `main` and never read from globals afterwards
//! - All fields have defaults, so no file is needed or read by default
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load, ConfigError};
pub use schema::{AttoConfig, NodeConfig, ObservabilityConfig, WalletConfig};
