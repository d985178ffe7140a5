//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → tracing events (ledger calls, published blocks, config loading)
//!
//! Consumers:
//!     → logging.rs subscriber, writing to standard error
//! ```
//!
//! # Design Decisions
//! - Standard output is reserved for command results, so logs never go there
//! - Default level is quiet (warn); `RUST_LOG` opens it up when debugging
//! - User-facing progress narration is not logging and bypasses this

pub mod logging;
