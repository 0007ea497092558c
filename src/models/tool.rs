//! Tool controller data supplied by the host job.
//!
//! A [`ToolController`] pairs a cutting [`Tool`] with the feed and rapid
//! rates the job wants for it. Rates are in mm/min, as CAM jobs store them;
//! the post-processor converts them to the controller's per-second units.

use serde::{Deserialize, Serialize};

/// The cutting tool held by a tool controller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tool {
    /// Human-readable tool name (e.g. `"Endmill"`).
    pub label: String,
}

/// Feed/rapid rates and display name for one tool.
///
/// Every rate is optional: a job may leave any of them unset, and the
/// post-processor reports each missing one instead of guessing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolController {
    pub label: String,
    pub tool: Tool,
    /// Horizontal (XY) cutting feed in mm/min.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub horiz_feed: Option<f64>,
    /// Vertical (Z) cutting feed in mm/min.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vert_feed: Option<f64>,
    /// Horizontal (XY) rapid rate in mm/min.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub horiz_rapid: Option<f64>,
    /// Vertical (Z) rapid rate in mm/min.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vert_rapid: Option<f64>,
}

impl ToolController {
    /// Name shown to the operator: `"{controller}, {tool}"`.
    pub fn display_name(&self) -> String {
        format!("{}, {}", self.label, self.tool.label)
    }
}
