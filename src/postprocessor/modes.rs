use tracing::warn;

use super::block::Block;
use super::dispatch::Translator;
use super::state::DistanceMode;
use crate::gcode::Command;

impl<'a> Translator<'a> {
    /// `G90`/`G91`: switches the distance mode and tells the controller.
    pub(super) fn set_mode(&mut self, mode: DistanceMode) -> String {
        self.state.mode = mode;
        let (marker, code, label) = match mode {
            DistanceMode::Relative => ("(set relative)", "SR", "RELATIVE"),
            DistanceMode::Absolute => ("(set absolute)", "SA", "ABSOLUTE"),
        };
        self.comment(marker) + &Block::new(code).comment(Some(label)).render()
    }

    /// Work offsets. Only the machine's default offset (index 1) can be
    /// honoured, and it needs no output.
    pub(super) fn emit_offset(&self, command: &Command, index: u32) -> String {
        if index == 1 {
            return self.comment(&format!("{} has no effect", command.name()));
        }
        warn!(command = %command, index, "coordinate offset not supported; ignored");
        String::new()
    }
}

#[cfg(test)]
mod tests {
    use crate::gcode::Axis;
    use crate::postprocessor::config::{self, Config};
    use crate::postprocessor::dispatch::{translate_lines, Translator};
    use crate::postprocessor::state::DistanceMode;

    fn cfg(toml: &str) -> Config {
        config::parse(toml).expect("test config is valid")
    }

    #[test]
    fn relative_and_absolute_lines() {
        let out = translate_lines(&cfg(""), &["G91", "G90"]).unwrap();
        assert_eq!(out, "SR 'RELATIVE\nSA 'ABSOLUTE\n");
    }

    #[test]
    fn mode_markers_when_comments_enabled() {
        let out = translate_lines(&cfg("[output]\ncomments = true\n"), &["G91"]).unwrap();
        assert_eq!(out, "'(set relative)\nSR 'RELATIVE\n");
    }

    #[test]
    fn mode_switch_updates_state() {
        let config = cfg("");
        let mut translator = Translator::new(&config);
        translator.translate(&crate::gcode::Command::new("G91")).unwrap();
        assert_eq!(translator.state().mode, DistanceMode::Relative);
        translator.translate(&crate::gcode::Command::new("G90")).unwrap();
        assert_eq!(translator.state().mode, DistanceMode::Absolute);
    }

    #[test]
    fn default_offset_has_no_effect() {
        let out = translate_lines(&cfg("[output]\ncomments = true\n"), &["G54"]).unwrap();
        assert_eq!(out, "'G54 has no effect\n");
        let out = translate_lines(&cfg("[output]\ncomments = true\n"), &["G59 P1"]).unwrap();
        assert_eq!(out, "'G59 has no effect\n");
    }

    #[test]
    fn other_offsets_emit_nothing() {
        let toml = "[output]\ncomments = true\n";
        let out = translate_lines(&cfg(toml), &["G59", "G59.2", "G59 P3"]).unwrap();
        assert_eq!(out, "");
    }

    #[test]
    fn offset_with_axis_words_still_records_position() {
        let config = cfg("");
        let mut translator = Translator::new(&config);
        let command = crate::gcode::Command::new("G59.1").with('X', 4.0);
        translator.translate(&command).unwrap();
        assert_eq!(translator.state().position(Axis::X), Some(4.0));
    }
}
