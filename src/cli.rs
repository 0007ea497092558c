//! Command-line arguments.
//!
//! Every option mirrors a [`Config`] field. Options given on the command line
//! override the TOML configuration file; paired `--x`/`--no-x` flags resolve to
//! whichever appears last.

use std::path::PathBuf;

use clap::Parser;

use crate::error::AppError;
use crate::postprocessor::config::{self, Config, Units};
use crate::postprocessor::RETURN_ONLY_SINK;

#[derive(Parser, Debug)]
#[command(author, version, about = "Post-process CAM jobs into OpenSBP programs.", long_about = None)]
pub struct Args {
    /// Job file: a JSON list of postable items.
    #[arg()]
    pub input: PathBuf,

    /// TOML configuration file.
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Output file; `-` prints the program instead of writing it.
    #[arg(short, long, default_value = RETURN_ONLY_SINK)]
    pub output: String,

    /// Write the identity/timestamp header.
    #[arg(long, overrides_with = "no_header")]
    pub header: bool,
    #[arg(long, overrides_with = "header")]
    pub no_header: bool,

    /// Write marker and pass-through comments.
    #[arg(long, overrides_with = "no_comments")]
    pub comments: bool,
    #[arg(long, overrides_with = "comments")]
    pub no_comments: bool,

    /// Open the program in $VISUAL/$EDITOR before writing it.
    #[arg(long, overrides_with = "no_show_editor")]
    pub show_editor: bool,
    #[arg(long, overrides_with = "show_editor")]
    pub no_show_editor: bool,

    /// Decimal digits for coordinates and feeds.
    #[arg(long)]
    pub precision: Option<u32>,

    /// G-code run before the first operation; `\n` separates lines.
    #[arg(long)]
    pub preamble: Option<String>,

    /// G-code run after the last operation; `\n` separates lines.
    #[arg(long)]
    pub postamble: Option<String>,

    /// OpenSBP text copied after the preamble.
    #[arg(long)]
    pub native_preamble: Option<String>,

    /// OpenSBP text copied at the very end.
    #[arg(long)]
    pub native_postamble: Option<String>,

    /// Rapid to `X,Y,Z,A,B` before the postamble; blank values stay put.
    #[arg(long)]
    pub return_to: Option<String>,

    /// Output inches.
    #[arg(long, overrides_with = "metric")]
    pub inches: bool,
    /// Output millimetres.
    #[arg(long, overrides_with = "inches")]
    pub metric: bool,

    /// Drop axis values that would not move the machine.
    #[arg(long, overrides_with = "no_axis_modal")]
    pub axis_modal: bool,
    #[arg(long, overrides_with = "axis_modal")]
    pub no_axis_modal: bool,

    /// Drop a command identical to the one before it.
    #[arg(long, overrides_with = "no_modal")]
    pub modal: bool,
    #[arg(long, overrides_with = "modal")]
    pub no_modal: bool,

    /// Treat A and B as distances and unit-convert them.
    #[arg(long)]
    pub ab_is_distance: bool,

    /// Fail on commands OpenSBP cannot express.
    #[arg(long, overrides_with = "no_abort_on_unknown")]
    pub abort_on_unknown: bool,
    #[arg(long, overrides_with = "abort_on_unknown")]
    pub no_abort_on_unknown: bool,

    /// Command name that never aborts the run; repeatable.
    #[arg(long = "allow-unknown", value_name = "NAME")]
    pub allow_unknown: Vec<String>,

    /// Tool changes run the C9 toolchanger macro.
    #[arg(long, overrides_with = "no_toolchanger")]
    pub toolchanger: bool,
    #[arg(long, overrides_with = "toolchanger")]
    pub no_toolchanger: bool,

    /// Spindle speed changes run the C6 spindle macro.
    #[arg(long, overrides_with = "no_spindle_controller")]
    pub spindle_controller: bool,
    #[arg(long, overrides_with = "spindle_controller")]
    pub no_spindle_controller: bool,

    /// Seconds to wait after the spindle macro; 0 disables the wait.
    #[arg(long, value_name = "SECONDS")]
    pub wait_for_spindle: Option<u32>,

    /// Echo each source command as a trailing comment.
    #[arg(long)]
    pub debug: bool,
}

/// `Some(true)` for `--x`, `Some(false)` for `--no-x`, `None` when neither was given.
fn toggle(on: bool, off: bool) -> Option<bool> {
    match (on, off) {
        (true, _) => Some(true),
        (_, true) => Some(false),
        _ => None,
    }
}

impl Args {
    /// Loads the configuration file (or defaults), applies the command-line
    /// overrides and validates the result.
    pub fn load_config(&self) -> Result<Config, AppError> {
        let mut cfg = match &self.config {
            Some(path) => {
                let text = std::fs::read_to_string(path)?;
                config::parse(&text)?
            }
            None => Config::default(),
        };
        self.apply(&mut cfg);
        config::validate(&cfg)?;
        Ok(cfg)
    }

    pub fn apply(&self, cfg: &mut Config) {
        let output = &mut cfg.output;
        if let Some(on) = toggle(self.header, self.no_header) {
            output.header = on;
        }
        if let Some(on) = toggle(self.comments, self.no_comments) {
            output.comments = on;
        }
        if let Some(on) = toggle(self.show_editor, self.no_show_editor) {
            output.show_editor = on;
        }
        if let Some(imperial) = toggle(self.inches, self.metric) {
            output.units = if imperial { Units::Imperial } else { Units::Metric };
        }
        if self.precision.is_some() {
            output.precision = self.precision;
        }
        output.debug |= self.debug;

        if let Some(on) = toggle(self.axis_modal, self.no_axis_modal) {
            cfg.modal.axes = on;
        }
        if let Some(on) = toggle(self.modal, self.no_modal) {
            cfg.modal.commands = on;
        }

        let machine = &mut cfg.machine;
        machine.ab_is_distance |= self.ab_is_distance;
        if let Some(on) = toggle(self.toolchanger, self.no_toolchanger) {
            machine.toolchanger = on;
        }
        if let Some(on) = toggle(self.spindle_controller, self.no_spindle_controller) {
            machine.spindle_controller = on;
        }
        if let Some(wait) = self.wait_for_spindle {
            machine.spindle_wait = wait;
        }

        if let Some(on) = toggle(self.abort_on_unknown, self.no_abort_on_unknown) {
            cfg.unknown.abort = on;
        }
        cfg.unknown.allow.extend(self.allow_unknown.iter().cloned());

        let program = &mut cfg.program;
        let texts = [
            (&self.preamble, &mut program.preamble),
            (&self.postamble, &mut program.postamble),
            (&self.native_preamble, &mut program.native_preamble),
            (&self.native_postamble, &mut program.native_postamble),
        ];
        for (arg, field) in texts {
            if let Some(text) = arg {
                *field = text.clone();
            }
        }
        if self.return_to.is_some() {
            program.return_to = self.return_to.clone();
        }
    }
}
