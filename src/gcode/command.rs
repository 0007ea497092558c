//! The normalized command record consumed by the post-processor.
//!
//! A [`Command`] is one G-code instruction: a name (`"G0"`, `"M6"`, or a
//! `"( … )"` comment) plus a set of letter-keyed numeric parameters. Commands
//! are immutable once built; the translator only reads them.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::parser::{CommandParser, GcodeParser, ParseError};

/// Parameter letters with a fixed position in canonical output. Any other
/// letter follows these in alphabetical order.
pub const PARAMETER_LETTERS: [char; 15] = [
    'X', 'Y', 'Z', 'A', 'B', 'C', 'U', 'V', 'W', 'I', 'J', 'F', 'S', 'T', 'P',
];

/// A machine axis letter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    X,
    Y,
    Z,
    A,
    B,
    C,
    U,
    V,
    W,
}

impl Axis {
    /// Axes the OpenSBP dialect can address, in output order.
    pub const SUPPORTED: [Axis; 5] = [Axis::X, Axis::Y, Axis::Z, Axis::A, Axis::B];

    /// Axes with no OpenSBP channel.
    pub const UNSUPPORTED: [Axis; 4] = [Axis::C, Axis::U, Axis::V, Axis::W];

    pub fn letter(self) -> char {
        match self {
            Axis::X => 'X',
            Axis::Y => 'Y',
            Axis::Z => 'Z',
            Axis::A => 'A',
            Axis::B => 'B',
            Axis::C => 'C',
            Axis::U => 'U',
            Axis::V => 'V',
            Axis::W => 'W',
        }
    }

    /// Position of a supported axis in [`Axis::SUPPORTED`]; `None` for C/U/V/W.
    pub fn index(self) -> Option<usize> {
        Axis::SUPPORTED.iter().position(|a| *a == self)
    }

    /// `true` for the rotary A and B axes.
    pub fn is_rotary(self) -> bool {
        matches!(self, Axis::A | Axis::B)
    }
}

/// One G-code instruction.
///
/// Serialized as its canonical G-code text, so job files can list commands
/// as plain strings (`"G0 X10 Y20"`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Command {
    name: String,
    parameters: BTreeMap<char, f64>,
}

impl Command {
    pub fn new(name: impl Into<String>) -> Self {
        Command {
            name: name.into(),
            parameters: BTreeMap::new(),
        }
    }

    /// Builds a comment command; `text` is wrapped in parentheses.
    pub fn comment(text: &str) -> Self {
        Command::new(format!("({text})"))
    }

    /// Adds (or replaces) a parameter. Letters are stored upper-case.
    pub fn with(mut self, letter: char, value: f64) -> Self {
        self.parameters.insert(letter.to_ascii_uppercase(), value);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn get(&self, letter: char) -> Option<f64> {
        self.parameters.get(&letter.to_ascii_uppercase()).copied()
    }

    pub fn has(&self, letter: char) -> bool {
        self.get(letter).is_some()
    }

    pub fn is_comment(&self) -> bool {
        self.name.starts_with('(')
    }

    /// Parameters in canonical order (`X Y Z A B C U V W I J F S T P`, then
    /// the remaining letters alphabetically).
    pub fn parameters(&self) -> impl Iterator<Item = (char, f64)> + '_ {
        let listed = PARAMETER_LETTERS
            .iter()
            .filter_map(|l| self.parameters.get(l).map(|v| (*l, *v)));
        let others = self
            .parameters
            .iter()
            .filter(|(l, _)| !PARAMETER_LETTERS.contains(*l))
            .map(|(l, v)| (*l, *v));
        listed.chain(others)
    }

    /// Canonical G-code text: the name followed by each parameter with six
    /// decimal places, e.g. `G0 X10.000000 Y20.000000`.
    pub fn raw_text(&self) -> String {
        let mut text = self.name.clone();
        for (letter, value) in self.parameters() {
            text.push_str(&format!(" {letter}{value:.6}"));
        }
        text
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw_text())
    }
}

impl TryFrom<String> for Command {
    type Error = ParseError;

    fn try_from(line: String) -> Result<Self, Self::Error> {
        GcodeParser.parse(&line)
    }
}

impl From<Command> for String {
    fn from(command: Command) -> Self {
        command.raw_text()
    }
}
