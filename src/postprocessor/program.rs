//! Whole-program assembly.
//!
//! [`PostProcessor::generate`] builds the complete OpenSBP text for a job:
//!
//! ```text
//! header → preamble → native preamble → operations → return-to → postamble → native postamble
//! ```
//!
//! [`PostProcessor::export`] adds the review step and writes the result.

use std::fs;

use chrono::Local;
use tracing::{debug, error, info, info_span, warn};

use super::config::{self, Config};
use super::dispatch::Translator;
use super::PostProcessorError;
use crate::gcode::{Axis, Command, CommandParser, GcodeParser};
use crate::models::Postable;

/// Sink name meaning "return the text, write nothing".
pub const RETURN_ONLY_SINK: &str = "-";

const NAME: &str = env!("CARGO_PKG_NAME");
const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Last look at the finished program before it is written.
pub trait Reviewer {
    /// Returns the replacement text, or `None` to keep `text` as it is.
    fn review(&self, text: &str) -> Result<Option<String>, PostProcessorError>;
}

/// Converts job trees to OpenSBP programs.
///
/// Holds only immutable configuration; every [`generate`](Self::generate)
/// call starts from a fresh translation state.
pub struct PostProcessor {
    config: Config,
    parser: Box<dyn CommandParser + Send + Sync>,
}

impl PostProcessor {
    pub fn new(config: Config) -> Result<Self, PostProcessorError> {
        config::validate(&config)?;
        Ok(PostProcessor {
            config,
            parser: Box::new(GcodeParser),
        })
    }

    /// Replaces the parser used for preamble and postamble text.
    pub fn with_parser(mut self, parser: impl CommandParser + Send + Sync + 'static) -> Self {
        self.parser = Box::new(parser);
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Builds the program text. Returns an empty string, without error, when
    /// any top-level item has no command stream.
    pub fn generate(&self, items: &[Postable]) -> Result<String, PostProcessorError> {
        if !exportable(items) {
            return Ok(String::new());
        }
        info!(items = items.len(), "post-processing started");

        let program = &self.config.program;
        let mut translator = Translator::new(&self.config);
        let mut out = String::new();

        if self.config.output.header {
            out.push_str(&header());
        }
        out.push_str(&self.amble(&mut translator, "preamble", &program.preamble)?);
        out.push_str(&native(&program.native_preamble));

        for item in items {
            let _span = info_span!("operation", label = item.label()).entered();
            out.push_str(&translator.comment(&format!("(begin operation: {})", item.label())));
            out.push_str(&walk(&mut translator, item)?);
            out.push_str(&translator.comment(&format!("(finish operation: {})", item.label())));
        }

        if let Some(target) = program.return_to.as_deref() {
            out.push_str(&return_to(&mut translator, target)?);
        }
        out.push_str(&self.amble(&mut translator, "postamble", &program.postamble)?);
        out.push_str(&native(&program.native_postamble));

        info!(bytes = out.len(), "post-processing finished");
        Ok(out)
    }

    /// Generates the program, offers it to `reviewer` when review is enabled,
    /// then writes it to `sink` unless the sink is [`RETURN_ONLY_SINK`].
    ///
    /// Returns the final text. A job that fails validation returns an empty
    /// string and nothing is written.
    pub fn export(
        &self,
        items: &[Postable],
        sink: &str,
        reviewer: Option<&dyn Reviewer>,
    ) -> Result<String, PostProcessorError> {
        if !exportable(items) {
            return Ok(String::new());
        }
        let text = self.generate(items)?;

        let text = match reviewer {
            Some(reviewer) if self.config.output.show_editor => {
                reviewer.review(&text)?.unwrap_or(text)
            }
            _ => text,
        };

        if sink != RETURN_ONLY_SINK {
            fs::write(sink, &text).map_err(|source| PostProcessorError::Write {
                path: sink.into(),
                source,
            })?;
            info!(path = sink, "program written");
        }
        Ok(text)
    }

    /// Translates preamble or postamble G-code after a `(begin …)` marker.
    /// The marker is written even for an empty section; `(end …)` closes a
    /// non-empty one.
    fn amble(
        &self,
        translator: &mut Translator<'_>,
        name: &str,
        text: &str,
    ) -> Result<String, PostProcessorError> {
        let mut out = translator.comment(&format!("(begin {name})"));
        let lines = program_lines(text);
        if lines.is_empty() {
            return Ok(out);
        }

        for line in &lines {
            let command = self
                .parser
                .parse(line)
                .map_err(|source| PostProcessorError::Parse {
                    line: line.clone(),
                    source,
                })?;
            out.push_str(&translator.translate(&command)?);
        }
        out.push_str(&translator.comment(&format!("(end {name})")));
        Ok(out)
    }
}

fn exportable(items: &[Postable]) -> bool {
    match items.iter().find(|item| !item.has_commands()) {
        Some(item) => {
            warn!(label = item.label(), "top-level item has no command stream; nothing exported");
            false
        }
        None => true,
    }
}

fn header() -> String {
    format!(
        "'Exported by {NAME}\n'Post Processor: {NAME} {VERSION}\n'Output Time: {}\n",
        Local::now().format("%Y-%m-%d %H:%M:%S")
    )
}

/// Depth-first walk of one job item.
fn walk<'a>(translator: &mut Translator<'a>, item: &'a Postable) -> Result<String, PostProcessorError> {
    match item {
        Postable::Compound { label, group } => {
            let mut out = translator.comment(&format!("(compound: {label})"));
            for child in group {
                out.push_str(&walk(translator, child)?);
            }
            Ok(out)
        }
        Postable::Path(path) => {
            let Some(commands) = &path.commands else {
                debug!(label = %path.label, "no command stream; skipped");
                return Ok(String::new());
            };
            let mut out = translator.comment(&format!("(Path: {})", path.label));
            translator.begin_operation(&path.label, path.tool_controller.as_ref());
            out.push_str(&translator.translate_all(commands)?);
            Ok(out)
        }
    }
}

/// Rapid move to the configured return position. A malformed target is
/// reported and skipped; the run continues.
fn return_to(translator: &mut Translator<'_>, target: &str) -> Result<String, PostProcessorError> {
    if target.trim().is_empty() {
        return Ok(String::new());
    }
    match parse_return_to(target) {
        Ok(command) => translator.translate(&command),
        Err(reason) => {
            error!(target, %reason, "bad return-to position; skipped");
            Ok(translator.forced_comment(&format!("return-to ignored: {reason}")))
        }
    }
}

/// Parses `X,Y,Z,A,B` into a `G0`. Blank components leave that axis out and
/// trailing components may be omitted.
pub fn parse_return_to(text: &str) -> Result<Command, String> {
    let parts: Vec<&str> = text.split(',').collect();
    if parts.len() > Axis::SUPPORTED.len() {
        return Err(format!(
            "at most {} values allowed, got {}",
            Axis::SUPPORTED.len(),
            parts.len()
        ));
    }

    let mut command = Command::new("G0");
    for (axis, part) in Axis::SUPPORTED.into_iter().zip(parts) {
        let part = part.trim();
        if part.is_empty() {
            continue;
        }
        let value = part
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .ok_or_else(|| format!("`{part}` is not a number"))?;
        command = command.with(axis.letter(), value);
    }
    Ok(command)
}

/// Splits multi-line program text, expanding literal `\n` escapes and
/// dropping blank lines.
pub fn program_lines(text: &str) -> Vec<String> {
    text.replace("\\n", "\n")
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// Native OpenSBP text, copied as is and newline-terminated.
fn native(text: &str) -> String {
    let text = text.replace("\\n", "\n");
    if text.is_empty() || text.ends_with('\n') {
        text
    } else {
        text + "\n"
    }
}
