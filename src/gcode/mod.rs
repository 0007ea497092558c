//! G-code input side: the command record and the text parser.

pub mod command;
pub mod parser;

pub use command::{Axis, Command};
pub use parser::{CommandParser, GcodeParser, ParseError};
