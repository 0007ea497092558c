use super::config::{Config, Units};

/// Millimetres per inch.
pub const MM_PER_INCH: f64 = 25.4;

/// Formats a value with exactly `decimal_places` digits after the point.
pub fn format_fixed(value: f64, decimal_places: u32) -> String {
    format!("{:.prec$}", value, prec = decimal_places as usize)
}

/// Unit conversion and number rendering for one run.
///
/// Job values are always millimetres (and degrees for A/B). In imperial mode
/// linear values are divided by 25.4; A and B pass through untouched unless
/// the machine treats them as distances.
#[derive(Debug, Clone, Copy)]
pub struct Formatter {
    units: Units,
    precision: u32,
    ab_is_distance: bool,
}

impl Formatter {
    pub fn new(cfg: &Config) -> Self {
        Formatter {
            units: cfg.output.units,
            precision: cfg.precision(),
            ab_is_distance: cfg.machine.ab_is_distance,
        }
    }

    pub fn precision(&self) -> u32 {
        self.precision
    }

    /// Converts a job value for `letter` into output units.
    pub fn convert(&self, value: f64, letter: char) -> f64 {
        let angular = matches!(letter.to_ascii_uppercase(), 'A' | 'B') && !self.ab_is_distance;
        match self.units {
            Units::Imperial if !angular => value / MM_PER_INCH,
            _ => value,
        }
    }

    /// Renders an already-converted value at the configured precision.
    pub fn render(&self, value: f64) -> String {
        format_fixed(value, self.precision)
    }

    /// Renders an already-converted value at an explicit precision.
    pub fn render_with(&self, value: f64, decimal_places: u32) -> String {
        format_fixed(value, decimal_places)
    }

    /// Converts then renders a job value for `letter`.
    pub fn coord(&self, value: f64, letter: char) -> String {
        self.render(self.convert(value, letter))
    }
}
