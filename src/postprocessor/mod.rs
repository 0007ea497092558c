pub mod arcs;
pub mod block;
pub mod config;
pub mod dispatch;
pub mod formatter;
pub mod modes;
pub mod motion;
pub mod program;
pub mod state;
pub mod tooling;

use std::io;
use std::path::PathBuf;

use crate::gcode::ParseError;

pub use config::Config;
pub use dispatch::{Instruction, Translator};
pub use program::{PostProcessor, Reviewer, RETURN_ONLY_SINK};

/// Internal error type for post-processor failures.
/// The binary maps these to AppError::PostProcessor at the boundary.
#[derive(Debug, thiserror::Error)]
pub enum PostProcessorError {
    #[error("config error: {0}")]
    Config(String),
    #[error("cannot parse `{line}`: {source}")]
    Parse {
        line: String,
        #[source]
        source: ParseError,
    },
    #[error("unknown command `{command}` in operation `{operation}`")]
    UnknownCommand { command: String, operation: String },
    #[error("`{command}` is missing required parameter {letter}")]
    MissingParameter { command: String, letter: char },
    #[error("`{command}`: {letter} must be a non-negative whole number")]
    InvalidParameter { command: String, letter: char },
    #[error("review failed: {0}")]
    Review(String),
    #[error("cannot write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}
