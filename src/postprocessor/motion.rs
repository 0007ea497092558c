//! Rapid and feed moves: axis-set analysis, format selection and the
//! feed-rate registers.

use tracing::{debug, error, warn};

use super::block::Block;
use super::dispatch::Translator;
use super::state::{AxisGroup, MoveClass};
use crate::gcode::{Axis, Command};

/// Supported axes a move addresses, kept in X Y Z A B order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AxisSet([bool; 5]);

impl AxisSet {
    pub fn insert(&mut self, axis: Axis) {
        if let Some(i) = axis.index() {
            self.0[i] = true;
        }
    }

    pub fn contains(&self, axis: Axis) -> bool {
        axis.index().is_some_and(|i| self.0[i])
    }

    pub fn len(&self) -> usize {
        self.0.iter().filter(|present| **present).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn axes(&self) -> impl Iterator<Item = Axis> + '_ {
        Axis::SUPPORTED.into_iter().filter(|a| self.contains(*a))
    }

    fn has_rotary(&self) -> bool {
        self.contains(Axis::A) || self.contains(Axis::B)
    }
}

/// The OpenSBP move command shape for an [`AxisSet`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveFormat {
    /// Nothing moves.
    Empty,
    /// `JX,…`, `MZ,…`
    Single(Axis),
    /// `J2,X,Y`
    Planar,
    /// `J3,X,Y,Z`
    ThreeAxis,
    /// `J5,X,Y,Z,A,B`
    FiveAxis,
    Unsupported,
}

impl MoveFormat {
    pub fn select(axes: &AxisSet) -> Self {
        let mut present = axes.axes();
        match (present.next(), axes.len()) {
            (None, _) => MoveFormat::Empty,
            (Some(axis), 1) => MoveFormat::Single(axis),
            _ if axes.has_rotary() => MoveFormat::FiveAxis,
            (_, 2) if axes.contains(Axis::X) && axes.contains(Axis::Y) => MoveFormat::Planar,
            _ if axes.contains(Axis::Z) => MoveFormat::ThreeAxis,
            _ => MoveFormat::Unsupported,
        }
    }
}

impl<'a> Translator<'a> {
    pub(super) fn emit_move(&mut self, command: &Command, class: MoveClass) -> String {
        if let Some(axis) = Axis::UNSUPPORTED.iter().find(|a| command.has(a.letter())) {
            error!(
                command = %command,
                axis = %axis.letter(),
                "OpenSBP has no such axis; move dropped"
            );
            return String::new();
        }

        let axes = self.included_axes(command);
        let mut out = String::new();
        if let Some(speed) = command.get('F') {
            out.push_str(&self.feed_line(command, class, &axes, speed));
        }
        out.push_str(&self.move_line(command, class, &axes));
        out
    }

    /// Axes whose value goes on the move line. With axis elision enabled an
    /// axis is dropped when it would not move the machine.
    pub(super) fn included_axes(&self, command: &Command) -> AxisSet {
        let mut axes = AxisSet::default();
        for axis in Axis::SUPPORTED {
            if let Some(value) = command.get(axis.letter()) {
                if !self.config.modal.axes || self.state.moves(axis, value) {
                    axes.insert(axis);
                }
            }
        }
        axes
    }

    fn feed_line(&mut self, command: &Command, class: MoveClass, axes: &AxisSet, speed: f64) -> String {
        let speed = self.fmt.convert(speed, 'F');

        let z = (axes.contains(Axis::Z) && self.state.feed.should_emit(class, AxisGroup::Z, speed))
            .then(|| self.fmt.render(speed));
        let planar = axes.contains(Axis::X) || axes.contains(Axis::Y);
        let xy = (planar && self.state.feed.should_emit(class, AxisGroup::Xy, speed))
            .then(|| self.fmt.render(speed));

        if axes.has_rotary() {
            warn!(command = %command, "feed rate for A/B motion is not supported");
        }

        if xy.is_none() && z.is_none() {
            return String::new();
        }
        Block::new(class.speed_command())
            .slot(xy)
            .slot(z)
            .comment(self.echo(command).as_deref())
            .render()
    }

    fn move_line(&self, command: &Command, class: MoveClass, axes: &AxisSet) -> String {
        let prefix = class.prefix();
        let value = |axis: Axis| {
            command
                .get(axis.letter())
                .filter(|_| axes.contains(axis))
                .map(|v| self.fmt.coord(v, axis.letter()))
        };

        let block = match MoveFormat::select(axes) {
            MoveFormat::Empty => {
                debug!(command = %command, "duplicate move suppressed");
                return String::new();
            }
            MoveFormat::Single(axis) => {
                Block::new(format!("{prefix}{}", axis.letter())).slot(value(axis))
            }
            MoveFormat::Planar => Block::new(format!("{prefix}2"))
                .slot(value(Axis::X))
                .slot(value(Axis::Y)),
            MoveFormat::ThreeAxis => Block::new(format!("{prefix}3"))
                .slot(value(Axis::X))
                .slot(value(Axis::Y))
                .slot(value(Axis::Z)),
            MoveFormat::FiveAxis => Axis::SUPPORTED
                .into_iter()
                .fold(Block::new(format!("{prefix}5")), |block, axis| {
                    block.slot(value(axis))
                }),
            MoveFormat::Unsupported => {
                error!(command = %command, "don't know how to handle this axis combination");
                return String::new();
            }
        };
        block.comment(self.echo(command).as_deref()).render()
    }
}
