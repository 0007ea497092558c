//! The job tree handed to the post-processor.
//!
//! A job is a list of [`Postable`] items. A compound groups other items; a
//! path carries the (already placement-resolved) command list for one
//! operation, and optionally the tool controller it belongs to.

use serde::{Deserialize, Serialize};

use super::tool::ToolController;
use crate::gcode::Command;

/// One node of the job tree.
///
/// Serialized with an internal `type` tag:
/// `{ "type": "compound", "label": "Job", "group": [ … ] }` or
/// `{ "type": "path", "label": "Profile", "commands": ["G0 X1", …] }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Postable {
    Compound {
        label: String,
        #[serde(default)]
        group: Vec<Postable>,
    },
    Path(PathItem),
}

/// A leaf item that may carry a command stream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PathItem {
    pub label: String,
    /// `None` for items without a path (stock, fixtures without geometry, …).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub commands: Option<Vec<Command>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_controller: Option<ToolController>,
}

impl Postable {
    pub fn label(&self) -> &str {
        match self {
            Postable::Compound { label, .. } => label,
            Postable::Path(item) => &item.label,
        }
    }

    /// `true` when the item can be post-processed: every compound can, a path
    /// only when it carries a command list.
    pub fn has_commands(&self) -> bool {
        match self {
            Postable::Compound { .. } => true,
            Postable::Path(item) => item.commands.is_some(),
        }
    }
}
