//! Command classification and the per-run translator.
//!
//! [`Instruction::decode`] maps a [`Command`] name onto the closed set of
//! command families OpenSBP can express. [`Translator`] owns the
//! [`TranslationState`] for one run and routes each decoded instruction to its
//! emitter (`motion`, `arcs`, `tooling`, `modes`), applying duplicate-command
//! elision and the unknown-command policy on the way.

use tracing::{debug, warn};

use super::config::Config;
use super::formatter::Formatter;
use super::state::{DistanceMode, MoveClass, TranslationState};
use super::PostProcessorError;
use crate::gcode::Command;
use crate::models::ToolController;

/// The command families the translator understands.
#[derive(Debug, Clone, PartialEq)]
pub enum Instruction {
    Move(MoveClass),
    Arc { clockwise: bool },
    ToolChange { tool: u32 },
    Spindle { speed: i64 },
    SetRelative,
    SetAbsolute,
    /// Work offset by index: `G54` is 1, `G59` is 6, `G59.1`–`G59.3` are 7–9.
    CoordinateOffset { index: u32 },
    Pause,
    /// Comment text with the surrounding parentheses removed.
    Comment(String),
    Unknown,
}

impl Instruction {
    pub fn decode(command: &Command) -> Result<Self, PostProcessorError> {
        let name = command.name();
        if let Some(text) = name.strip_prefix('(') {
            let text = text.strip_suffix(')').unwrap_or(text);
            return Ok(Instruction::Comment(text.to_string()));
        }

        let instruction = match name {
            "G0" | "G00" => Instruction::Move(MoveClass::Rapid),
            "G1" | "G01" => Instruction::Move(MoveClass::Feed),
            "G2" | "G02" => Instruction::Arc { clockwise: true },
            "G3" | "G03" => Instruction::Arc { clockwise: false },
            "M6" | "M06" => Instruction::ToolChange {
                tool: whole_number(command, 'T', required(command, 'T')?)?,
            },
            "M3" | "M03" => Instruction::Spindle {
                speed: required(command, 'S')?.trunc() as i64,
            },
            "G91" => Instruction::SetRelative,
            "G90" => Instruction::SetAbsolute,
            "G54" => Instruction::CoordinateOffset { index: 1 },
            "G59" => Instruction::CoordinateOffset {
                index: match command.get('P') {
                    Some(p) => whole_number(command, 'P', p)?,
                    None => 6,
                },
            },
            "G59.1" => Instruction::CoordinateOffset { index: 7 },
            "G59.2" => Instruction::CoordinateOffset { index: 8 },
            "G59.3" => Instruction::CoordinateOffset { index: 9 },
            "M0" | "M00" | "M1" | "M01" => Instruction::Pause,
            _ => Instruction::Unknown,
        };
        Ok(instruction)
    }

    /// Rapid, feed and arc moves.
    pub fn is_motion(&self) -> bool {
        matches!(self, Instruction::Move(_) | Instruction::Arc { .. })
    }
}

/// Value of a parameter the command cannot be translated without.
pub(super) fn required(command: &Command, letter: char) -> Result<f64, PostProcessorError> {
    command
        .get(letter)
        .ok_or_else(|| PostProcessorError::MissingParameter {
            command: command.raw_text(),
            letter,
        })
}

/// `value` as an index-like number (tool or offset). Negative and fractional
/// values are rejected.
fn whole_number(command: &Command, letter: char, value: f64) -> Result<u32, PostProcessorError> {
    if value < 0.0 || value.fract() != 0.0 || value > f64::from(u32::MAX) {
        return Err(PostProcessorError::InvalidParameter {
            command: command.raw_text(),
            letter,
        });
    }
    Ok(value as u32)
}

/// Translates commands to OpenSBP text for one export run.
///
/// Holds the only [`TranslationState`] of the run; commands must be fed in
/// program order.
pub struct Translator<'a> {
    pub(super) config: &'a Config,
    pub(super) fmt: Formatter,
    pub(super) state: TranslationState<'a>,
}

impl<'a> Translator<'a> {
    pub fn new(config: &'a Config) -> Self {
        Translator {
            config,
            fmt: Formatter::new(config),
            state: TranslationState::new(),
        }
    }

    pub fn state(&self) -> &TranslationState<'a> {
        &self.state
    }

    /// Makes `label` the active operation and, when given, `tool_controller`
    /// the active tool controller. A missing controller keeps the previous one.
    pub fn begin_operation(&mut self, label: &str, tool_controller: Option<&'a ToolController>) {
        self.state.active_operation = label.to_string();
        if tool_controller.is_some() {
            self.state.active_tool_controller = tool_controller;
        }
    }

    /// Translates one command, returning zero or more newline-terminated lines.
    pub fn translate(&mut self, command: &Command) -> Result<String, PostProcessorError> {
        let instruction = Instruction::decode(command)?;
        let raw = command.raw_text();

        if self.config.modal.commands
            && self.state.last_raw_text.as_deref() == Some(raw.as_str())
            && (!instruction.is_motion() || self.state.mode == DistanceMode::Absolute)
        {
            debug!(command = %raw, "duplicate command elided");
            return Ok(String::new());
        }

        let text = match &instruction {
            Instruction::Move(class) => self.emit_move(command, *class),
            Instruction::Arc { clockwise } => self.emit_arc(command, *clockwise)?,
            Instruction::ToolChange { tool } => self.emit_tool_change(command, *tool),
            Instruction::Spindle { speed } => self.emit_spindle(*speed),
            Instruction::SetRelative => self.set_mode(DistanceMode::Relative),
            Instruction::SetAbsolute => self.set_mode(DistanceMode::Absolute),
            Instruction::CoordinateOffset { index } => self.emit_offset(command, *index),
            Instruction::Pause => self.emit_pause(),
            Instruction::Comment(text) => self.comment(text),
            Instruction::Unknown => return self.unknown(command, &raw),
        };

        self.state.record(command);
        self.state.last_comment = match instruction {
            Instruction::Comment(text) => Some(text),
            _ => None,
        };
        self.state.last_raw_text = Some(raw);
        Ok(text)
    }

    pub fn translate_all<'c, I>(&mut self, commands: I) -> Result<String, PostProcessorError>
    where
        I: IntoIterator<Item = &'c Command>,
    {
        let mut out = String::new();
        for command in commands {
            out.push_str(&self.translate(command)?);
        }
        Ok(out)
    }

    /// A `'` comment line, or nothing when comments are disabled.
    pub fn comment(&self, text: &str) -> String {
        if self.config.output.comments {
            self.forced_comment(text)
        } else {
            debug!(text, "comment suppressed");
            String::new()
        }
    }

    /// A `'` comment line emitted regardless of the comment setting.
    pub fn forced_comment(&self, text: &str) -> String {
        format!("'{text}\n")
    }

    /// Raw command text for the trailing debug comment, when enabled.
    pub(super) fn echo(&self, command: &Command) -> Option<String> {
        self.config.output.debug.then(|| command.raw_text())
    }

    fn unknown(&mut self, command: &Command, raw: &str) -> Result<String, PostProcessorError> {
        if self.config.aborts_on(command.name()) {
            return Err(PostProcessorError::UnknownCommand {
                command: raw.to_string(),
                operation: self.state.active_operation.clone(),
            });
        }
        warn!(
            command = %raw,
            operation = %self.state.active_operation,
            "no OpenSBP translation; passed through as a comment"
        );
        self.state.last_comment = None;
        Ok(self.forced_comment(&format!("Unhandled: {raw}")))
    }
}

/// Parses `lines` and runs them through a fresh translator.
#[cfg(test)]
pub(crate) fn translate_lines(cfg: &Config, lines: &[&str]) -> Result<String, PostProcessorError> {
    use crate::gcode::{CommandParser, GcodeParser};

    let commands: Vec<Command> = lines
        .iter()
        .map(|line| GcodeParser.parse(line).expect("test line parses"))
        .collect();
    Translator::new(cfg).translate_all(&commands)
}
