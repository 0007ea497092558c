use super::PostProcessorError;

/// Output units for the generated OpenSBP program.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Units {
    #[default]
    Metric,
    Imperial,
}

/// Upper bound for `output.precision`.
pub const MAX_PRECISION: u32 = 10;

/// Upper bound for `machine.spindle_wait`, in seconds.
pub const MAX_SPINDLE_WAIT: u32 = 3600;

/// Every option that shapes one export run. Loaded from TOML and/or the
/// command line; read-only while a run is in progress.
#[derive(Debug, Clone, Default, PartialEq, serde::Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "snake_case")]
pub struct Config {
    pub output: OutputConfig,
    pub modal: ModalConfig,
    pub machine: MachineConfig,
    pub unknown: UnknownConfig,
    pub program: ProgramConfig,
}

/// `[output]`: units, number formatting and what extra text is produced.
#[derive(Debug, Clone, PartialEq, serde::Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "snake_case")]
pub struct OutputConfig {
    pub units: Units,
    /// Decimal digits for rendered values. When unset: 4 for imperial, 3 for metric.
    pub precision: Option<u32>,
    /// Identity/timestamp block at the top of the program.
    pub header: bool,
    /// Marker and pass-through comments.
    pub comments: bool,
    /// Hand the finished program to the reviewer before writing it.
    pub show_editor: bool,
    /// Echo each source command as a trailing comment.
    pub debug: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            units: Units::Metric,
            precision: None,
            header: true,
            comments: false,
            show_editor: true,
            debug: false,
        }
    }
}

/// `[modal]`: redundant-output elision.
#[derive(Debug, Clone, Default, PartialEq, serde::Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "snake_case")]
pub struct ModalConfig {
    /// Drop a command identical to the previous one.
    pub commands: bool,
    /// Drop axis values that would not move the machine.
    pub axes: bool,
}

/// `[machine]`: controller capabilities.
#[derive(Debug, Clone, PartialEq, serde::Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "snake_case")]
pub struct MachineConfig {
    /// Tool changes run the toolchanger macro instead of pausing for the operator.
    pub toolchanger: bool,
    /// Spindle speed changes run the spindle macro instead of pausing.
    pub spindle_controller: bool,
    /// Seconds to wait after the spindle macro; 0 disables the wait.
    pub spindle_wait: u32,
    /// A and B are linear distances (unit-converted) rather than degrees.
    pub ab_is_distance: bool,
}

impl Default for MachineConfig {
    fn default() -> Self {
        Self {
            toolchanger: false,
            spindle_controller: false,
            spindle_wait: 3,
            ab_is_distance: false,
        }
    }
}

/// `[unknown]`: what to do with commands OpenSBP has no translation for.
#[derive(Debug, Clone, PartialEq, serde::Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "snake_case")]
pub struct UnknownConfig {
    /// Fail the run on an unknown command.
    pub abort: bool,
    /// Command names that never abort, even when `abort` is set.
    pub allow: Vec<String>,
}

impl Default for UnknownConfig {
    fn default() -> Self {
        Self {
            abort: true,
            allow: Vec::new(),
        }
    }
}

/// `[program]`: text placed around the operations.
#[derive(Debug, Clone, Default, PartialEq, serde::Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "snake_case")]
pub struct ProgramConfig {
    /// G-code translated before the first operation; `\n` separates lines.
    pub preamble: String,
    /// G-code translated after the last operation; `\n` separates lines.
    pub postamble: String,
    /// OpenSBP text copied verbatim after the preamble.
    pub native_preamble: String,
    /// OpenSBP text copied verbatim at the very end.
    pub native_postamble: String,
    /// `X,Y,Z,A,B` rapid target issued before the postamble; blank components stay put.
    pub return_to: Option<String>,
}

impl Config {
    /// Effective number of decimal digits.
    pub fn precision(&self) -> u32 {
        self.output.precision.unwrap_or(match self.output.units {
            Units::Imperial => 4,
            Units::Metric => 3,
        })
    }

    /// `true` when an unknown command with this name must fail the run.
    pub fn aborts_on(&self, name: &str) -> bool {
        self.unknown.abort && !self.unknown.allow.iter().any(|n| n == name)
    }
}

/// Parse a TOML string into a [`Config`], running validation.
pub fn parse(toml_str: &str) -> Result<Config, PostProcessorError> {
    let cfg: Config =
        toml::from_str(toml_str).map_err(|e| PostProcessorError::Config(e.to_string()))?;
    validate(&cfg)?;
    Ok(cfg)
}

pub fn validate(cfg: &Config) -> Result<(), PostProcessorError> {
    if let Some(precision) = cfg.output.precision {
        if precision > MAX_PRECISION {
            return Err(PostProcessorError::Config(format!(
                "output.precision must be at most {MAX_PRECISION}, got {precision}"
            )));
        }
    }

    if cfg.machine.spindle_wait > MAX_SPINDLE_WAIT {
        return Err(PostProcessorError::Config(format!(
            "machine.spindle_wait must be at most {MAX_SPINDLE_WAIT} seconds"
        )));
    }

    if cfg.unknown.allow.iter().any(|name| name.trim().is_empty()) {
        return Err(PostProcessorError::Config(
            "unknown.allow must not contain blank command names".to_string(),
        ));
    }

    Ok(())
}
