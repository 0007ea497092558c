//! Operator-facing commands: tool changes, spindle speed and program pauses.

use tracing::{debug, info};

use super::block::Block;
use super::dispatch::Translator;
use super::state::MoveClass;
use crate::gcode::Command;

/// Digits used for the tool controller's `MS`/`JS` speed block.
pub const SPEED_PRECISION: u32 = 4;

/// Characters besides letters and digits allowed in `&ToolName`.
const TOOL_NAME_PUNCTUATION: &str = "/_ .-";

/// Strips everything OpenSBP string variables can't hold.
pub fn sanitize_tool_name(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_alphanumeric() || TOOL_NAME_PUNCTUATION.contains(*c))
        .collect()
}

impl<'a> Translator<'a> {
    pub(super) fn emit_tool_change(&mut self, command: &Command, tool: u32) -> String {
        let name = self.tool_display_name(tool);
        let mut out = self.comment("(tool change)");
        out.push_str(
            &Block::new(format!("&Tool={tool}"))
                .comment(self.echo(command).as_deref())
                .render(),
        );

        if self.config.machine.toolchanger {
            out.push_str(&Block::new("C9").comment(Some("toolchanger")).render());
        } else if self.state.active_tool.is_none() {
            info!(tool, "first tool assumed loaded");
            out.push_str(&self.comment(&format!(
                "(First change tool, should already be #{tool}: {name})"
            )));
        } else {
            out.push_str(&self.forced_comment(&format!("Change tool to #{tool}: {name}")));
            out.push_str(&Block::new("PAUSE").render());
        }
        self.state.active_tool = Some(tool);

        out.push_str(&format!("&ToolName=\"{}\"\n", sanitize_tool_name(&name)));
        out.push_str(&self.speed_block());
        out
    }

    /// Controller and tool label when a controller is active, else the tool number.
    fn tool_display_name(&self, tool: u32) -> String {
        self.state
            .active_tool_controller
            .map_or_else(|| tool.to_string(), |tc| tc.display_name())
    }

    /// `MS`/`JS` lines initialising feed and rapid speeds from the active
    /// tool controller. Rates arrive in mm/min and OpenSBP wants units per
    /// second. Each missing rate leaves its slot blank and is reported in a
    /// comment; a line with no rate at all is left out.
    fn speed_block(&self) -> String {
        let tc = self.state.active_tool_controller;
        let mut out = String::new();
        match tc {
            Some(tc) => out.push_str(&self.comment(&format!("set speeds: {}", tc.label))),
            None => debug!("no tool controller; speeds left unchanged"),
        }

        let lines = [
            (
                MoveClass::Feed,
                "feed",
                tc.and_then(|t| t.horiz_feed),
                tc.and_then(|t| t.vert_feed),
            ),
            (
                MoveClass::Rapid,
                "rapid",
                tc.and_then(|t| t.horiz_rapid),
                tc.and_then(|t| t.vert_rapid),
            ),
        ];
        for (class, kind, horiz, vert) in lines {
            let mut block = Block::new(class.speed_command());
            for (direction, rate) in [("horizontal", horiz), ("vertical", vert)] {
                let rendered = rate.map(|per_minute| {
                    self.fmt
                        .render_with(self.fmt.convert(per_minute / 60.0, 'F'), SPEED_PRECISION)
                });
                if rendered.is_none() {
                    out.push_str(&self.comment(&format!("(no {direction} {kind} rate)")));
                }
                block = block.slot(rendered);
            }
            if !block.is_blank() {
                out.push_str(&block.render());
            }
        }
        out
    }

    pub(super) fn emit_spindle(&self, speed: i64) -> String {
        let mut out = Block::new("TR").arg(speed.to_string()).render();
        if self.config.machine.spindle_controller {
            out.push_str(&Block::new("C6").comment(Some("spindle-controller")).render());
            let wait = self.config.machine.spindle_wait;
            if wait > 0 {
                out.push_str(&format!("PAUSE {wait}\n"));
            }
        } else {
            out.push_str(&self.forced_comment(&format!("Change spindle speed to {speed}")));
            out.push_str(&Block::new("PAUSE").render());
        }
        out
    }

    /// `M0`/`M1`. A comment right before the pause is the operator prompt.
    pub(super) fn emit_pause(&self) -> String {
        let prompt = match &self.state.last_comment {
            // already on its own line
            Some(_) if self.config.output.comments => String::new(),
            Some(text) => self.forced_comment(text),
            None => self.forced_comment("Continue?"),
        };
        prompt + "PAUSE\n"
    }
}
