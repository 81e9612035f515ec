//! Console plumbing shared by the inventory binaries.
//!
//! This crate provides:
//! - Line input with prompts
//! - Notices and table rendering for stdout
//! - Opt-in JSONL action log
//! - Tracing initialisation

pub mod debug;
pub mod input;
pub mod logging;
pub mod output;

pub use debug::{ActionLog, is_debug_enabled, log_action};
pub use input::LineInput;
pub use output::{Notice, NoticeLevel, Table};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::debug::{ActionLog, is_debug_enabled, log_action};
    pub use crate::input::LineInput;
    pub use crate::output::{Notice, NoticeLevel, Table};
    pub use anyhow::{Context, Result};
}
