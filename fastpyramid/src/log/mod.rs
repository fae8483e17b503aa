//! Logging abstraction used by the pyramid engine.
//!
//! The engine reports progress through the [`Logger`] trait instead of
//! calling `tracing` directly, so library users decide where messages go:
//!
//! - [`TracingLogger`] forwards to the `tracing` macros (the CLI uses this)
//! - [`NoOpLogger`] drops everything
//! - [`MemoryLogger`] keeps messages in memory for assertions in tests
//!
//! ```
//! use fastpyramid::log::{Logger, NoOpLogger};
//! use fastpyramid::log_info;
//! use std::sync::Arc;
//!
//! let logger: Arc<dyn Logger> = Arc::new(NoOpLogger);
//! log_info!(logger, "generating version {}", 0);
//! ```

mod memory;
mod noop;
mod tracing_adapter;
mod r#trait;

pub use memory::MemoryLogger;
pub use noop::NoOpLogger;
pub use r#trait::{LogLevel, Logger};
pub use tracing_adapter::TracingLogger;
