use super::block::Block;
use super::dispatch::{required, Translator};
use super::PostProcessorError;
use crate::gcode::Command;

/// Arc-centre words, in the order `CG` takes them after the blank diameter slot.
const ARC_WORDS: [char; 4] = ['X', 'Y', 'I', 'J'];

impl<'a> Translator<'a> {
    /// `G2`/`G3` as a circle-segment cut:
    /// `CG,,{X},{Y},{I},{J},T,{1 | -1}`.
    ///
    /// The end point (X, Y) and the centre offset (I, J) are all required; the
    /// leading slot (diameter) stays blank so OpenSBP takes the centre form.
    pub(super) fn emit_arc(
        &self,
        command: &Command,
        clockwise: bool,
    ) -> Result<String, PostProcessorError> {
        let mut block = Block::new("CG").slot(None);
        for letter in ARC_WORDS {
            let value = required(command, letter)?;
            block = block.arg(self.fmt.coord(value, letter));
        }
        let direction = if clockwise { "1" } else { "-1" };
        Ok(block
            .arg("T")
            .arg(direction)
            .comment(self.echo(command).as_deref())
            .render())
    }
}

#[cfg(test)]
mod tests {
    use crate::postprocessor::config::{self, Config};
    use crate::postprocessor::dispatch::translate_lines;
    use crate::postprocessor::PostProcessorError;

    fn cfg(toml: &str) -> Config {
        config::parse(toml).expect("test config is valid")
    }

    #[test]
    fn clockwise_arc() {
        let out = translate_lines(&cfg(""), &["G2 X10 Y20 I1 J2"]).unwrap();
        assert_eq!(out, "CG,,10.000,20.000,1.000,2.000,T,1\n");
    }

    #[test]
    fn counter_clockwise_arc() {
        let out = translate_lines(&cfg(""), &["G03 X-5 Y0 I-2.5 J0"]).unwrap();
        assert_eq!(out, "CG,,-5.000,0.000,-2.500,0.000,T,-1\n");
    }

    #[test]
    fn arc_ignores_k_word() {
        let out = translate_lines(&cfg(""), &["G2 X0 Y10 I-5 J0 K0"]).unwrap();
        assert_eq!(out, "CG,,0.000,10.000,-5.000,0.000,T,1\n");
    }

    #[test]
    fn debug_echo_on_arc_line() {
        let out = translate_lines(&cfg("[output]\ndebug = true\n"), &["G3 X1 Y1 I1 J0"]).unwrap();
        assert_eq!(
            out,
            "CG,,1.000,1.000,1.000,0.000,T,-1 'G3 X1.000000 Y1.000000 I1.000000 J0.000000\n"
        );
    }

    #[test]
    fn arc_converted_in_imperial() {
        let toml = "[output]\nunits = \"imperial\"\n";
        let out = translate_lines(&cfg(toml), &["G2 X25.4 Y50.8 I12.7 J0"]).unwrap();
        assert_eq!(out, "CG,,1.0000,2.0000,0.5000,0.0000,T,1\n");
    }

    #[test]
    fn arc_without_centre_offset_is_an_error() {
        let err = translate_lines(&cfg(""), &["G2 X10 Y20 I1"]).unwrap_err();
        assert!(matches!(
            err,
            PostProcessorError::MissingParameter { letter: 'J', .. }
        ));
    }

    #[test]
    fn arc_without_end_point_is_an_error() {
        let err = translate_lines(&cfg(""), &["G3 I1 J2"]).unwrap_err();
        assert!(matches!(
            err,
            PostProcessorError::MissingParameter { letter: 'X', .. }
        ));
    }

    #[test]
    fn arc_updates_position() {
        let out = translate_lines(
            &cfg("[modal]\naxes = true\n"),
            &["G2 X10 Y20 I1 J2", "G0 X10 Y20 Z5"],
        )
        .unwrap();
        assert_eq!(out, "CG,,10.000,20.000,1.000,2.000,T,1\nJZ,5.000\n");
    }
}
