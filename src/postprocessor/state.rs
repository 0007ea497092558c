use crate::gcode::{Axis, Command};
use crate::models::ToolController;

/// Tolerance for floating-point register comparisons (positions, speeds).
/// Values closer than this are treated as unchanged.
const NUMERIC_TOLERANCE: f64 = 1e-6;

/// Returns `true` when `a` and `b` differ by at least [`NUMERIC_TOLERANCE`].
pub fn differs(a: f64, b: f64) -> bool {
    (a - b).abs() >= NUMERIC_TOLERANCE
}

/// Coordinate interpretation set by `G90`/`G91`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DistanceMode {
    #[default]
    Absolute,
    Relative,
}

/// Rapid (jog) versus cutting (move) motion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveClass {
    Rapid,
    Feed,
}

impl MoveClass {
    /// OpenSBP move-command prefix (`J2`, `MZ`, …).
    pub fn prefix(self) -> char {
        match self {
            MoveClass::Rapid => 'J',
            MoveClass::Feed => 'M',
        }
    }

    /// OpenSBP speed-setting command for this class.
    pub fn speed_command(self) -> &'static str {
        match self {
            MoveClass::Rapid => "JS",
            MoveClass::Feed => "MS",
        }
    }
}

/// OpenSBP keeps separate speeds for XY travel and Z travel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AxisGroup {
    Xy,
    Z,
}

/// Last speed emitted for every (class, group) pair, in output units.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct FeedRegisters {
    rapid_xy: f64,
    rapid_z: f64,
    feed_xy: f64,
    feed_z: f64,
}

impl FeedRegisters {
    fn slot(&mut self, class: MoveClass, group: AxisGroup) -> &mut f64 {
        match (class, group) {
            (MoveClass::Rapid, AxisGroup::Xy) => &mut self.rapid_xy,
            (MoveClass::Rapid, AxisGroup::Z) => &mut self.rapid_z,
            (MoveClass::Feed, AxisGroup::Xy) => &mut self.feed_xy,
            (MoveClass::Feed, AxisGroup::Z) => &mut self.feed_z,
        }
    }

    pub fn get(&self, class: MoveClass, group: AxisGroup) -> f64 {
        match (class, group) {
            (MoveClass::Rapid, AxisGroup::Xy) => self.rapid_xy,
            (MoveClass::Rapid, AxisGroup::Z) => self.rapid_z,
            (MoveClass::Feed, AxisGroup::Xy) => self.feed_xy,
            (MoveClass::Feed, AxisGroup::Z) => self.feed_z,
        }
    }

    /// Returns `true` and stores `speed` if it differs from the register.
    pub fn should_emit(&mut self, class: MoveClass, group: AxisGroup, speed: f64) -> bool {
        let slot = self.slot(class, group);
        if !differs(*slot, speed) {
            return false;
        }
        *slot = speed;
        true
    }
}

/// Registers carried across the whole command stream of one export run.
///
/// Created fresh for every run; nothing here outlives the run except the
/// borrowed tool controller, which belongs to the caller's job tree.
#[derive(Debug, Default)]
pub struct TranslationState<'a> {
    /// Last known X, Y, Z, A, B values, indexed by [`Axis::index`].
    axis_position: [f64; 5],
    pub feed: FeedRegisters,
    pub mode: DistanceMode,
    /// `None` until the first tool change; the first tool is assumed loaded.
    pub active_tool: Option<u32>,
    pub active_tool_controller: Option<&'a ToolController>,
    /// Label of the operation being translated, for diagnostics.
    pub active_operation: String,
    /// Raw text of the last handled command, for duplicate elision.
    pub last_raw_text: Option<String>,
    /// Text of the last handled command when it was a comment.
    pub last_comment: Option<String>,
}

impl<'a> TranslationState<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current position of a supported axis; `None` for C/U/V/W.
    pub fn position(&self, axis: Axis) -> Option<f64> {
        axis.index().map(|i| self.axis_position[i])
    }

    /// Would `value` on `axis` move the machine in the current distance mode?
    pub fn moves(&self, axis: Axis, value: f64) -> bool {
        match self.mode {
            DistanceMode::Absolute => self
                .position(axis)
                .map_or(true, |current| differs(current, value)),
            DistanceMode::Relative => differs(value, 0.0),
        }
    }

    /// Copies every supported axis parameter of `command` into the position
    /// registers.
    pub fn record(&mut self, command: &Command) {
        for axis in Axis::SUPPORTED {
            if let (Some(i), Some(value)) = (axis.index(), command.get(axis.letter())) {
                self.axis_position[i] = value;
            }
        }
    }
}
