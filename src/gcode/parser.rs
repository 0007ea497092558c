//! Text-to-[`Command`] parsing.
//!
//! The post-processor only depends on the [`CommandParser`] trait; the
//! [`GcodeParser`] here is the default implementation used for job files,
//! preambles and postambles.

use super::command::Command;

/// Reasons a line of G-code text could not be turned into a [`Command`].
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ParseError {
    #[error("empty line")]
    Empty,
    #[error("no G or M command word in `{0}`")]
    MissingCommand(String),
    #[error("unexpected character `{0}`")]
    UnexpectedCharacter(char),
    #[error("parameter `{0}` given more than once")]
    DuplicateWord(char),
    #[error("invalid number `{value}` for `{letter}`")]
    InvalidNumber { letter: char, value: String },
    #[error("unterminated comment")]
    UnterminatedComment,
}

/// Turns one line of text into a [`Command`].
pub trait CommandParser {
    fn parse(&self, line: &str) -> Result<Command, ParseError>;
}

/// Word-address G-code parser.
///
/// * A line wrapped in `( … )` is a comment command.
/// * Otherwise the first word must be a `G` or `M` word and names the command;
///   every following word is a parameter letter followed by a number. Any
///   letter is accepted; whether a command can use it is decided downstream.
/// * Anything after an inline `(` or `;` is ignored.
#[derive(Debug, Default, Clone, Copy)]
pub struct GcodeParser;

impl CommandParser for GcodeParser {
    fn parse(&self, line: &str) -> Result<Command, ParseError> {
        let line = line.trim();
        if line.is_empty() {
            return Err(ParseError::Empty);
        }

        if line.starts_with('(') {
            return if line.ends_with(')') {
                Ok(Command::new(line))
            } else {
                Err(ParseError::UnterminatedComment)
            };
        }

        let code = match line.find(['(', ';']) {
            Some(pos) => &line[..pos],
            None => line,
        };

        let mut words = Words { rest: code };
        let (letter, number) = words
            .next()
            .ok_or_else(|| ParseError::MissingCommand(line.to_string()))??;
        if !matches!(letter, 'G' | 'M') {
            return Err(ParseError::MissingCommand(line.to_string()));
        }
        parse_number(letter, number)?;

        let mut command = Command::new(format!("{letter}{number}"));
        for word in words {
            let (letter, number) = word?;
            if command.has(letter) {
                return Err(ParseError::DuplicateWord(letter));
            }
            command = command.with(letter, parse_number(letter, number)?);
        }
        Ok(command)
    }
}

fn parse_number(letter: char, text: &str) -> Result<f64, ParseError> {
    text.parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| ParseError::InvalidNumber {
            letter,
            value: text.to_string(),
        })
}

/// Iterator over `(letter, number text)` words of a code string.
struct Words<'a> {
    rest: &'a str,
}

impl<'a> Iterator for Words<'a> {
    type Item = Result<(char, &'a str), ParseError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.rest = self.rest.trim_start();
        let mut chars = self.rest.chars();
        let head = chars.next()?;
        if !head.is_ascii_alphabetic() {
            self.rest = "";
            return Some(Err(ParseError::UnexpectedCharacter(head)));
        }

        let body = &self.rest[1..];
        let end = body
            .find(|c: char| !(c.is_ascii_digit() || matches!(c, '.' | '+' | '-')))
            .unwrap_or(body.len());
        let number = &body[..end];
        self.rest = &body[end..];
        Some(Ok((head.to_ascii_uppercase(), number)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(line: &str) -> Result<Command, ParseError> {
        GcodeParser.parse(line)
    }

    // -------------------------------------------------------------------------
    // Well-formed input
    // -------------------------------------------------------------------------

    #[test]
    fn parses_rapid_with_axes() {
        let cmd = parse("G0 X10 Y20 Z30").unwrap();
        assert_eq!(cmd.name(), "G0");
        assert_eq!(cmd.get('X'), Some(10.0));
        assert_eq!(cmd.get('Y'), Some(20.0));
        assert_eq!(cmd.get('Z'), Some(30.0));
    }

    #[test]
    fn keeps_leading_zero_and_decimal_names() {
        assert_eq!(parse("G00 X1").unwrap().name(), "G00");
        assert_eq!(parse("G59.1").unwrap().name(), "G59.1");
    }

    #[test]
    fn accepts_lower_case_and_packed_words() {
        let cmd = parse("g1x-1.5y2f300").unwrap();
        assert_eq!(cmd.name(), "G1");
        assert_eq!(cmd.get('X'), Some(-1.5));
        assert_eq!(cmd.get('Y'), Some(2.0));
        assert_eq!(cmd.get('F'), Some(300.0));
    }

    #[test]
    fn tool_change_carries_tool_parameter() {
        let cmd = parse("M6 T2").unwrap();
        assert_eq!(cmd.name(), "M6");
        assert_eq!(cmd.get('T'), Some(2.0));
    }

    #[test]
    fn full_line_comment_becomes_comment_command() {
        let cmd = parse("(finish pass)").unwrap();
        assert!(cmd.is_comment());
        assert_eq!(cmd.name(), "(finish pass)");
    }

    #[test]
    fn inline_comments_are_dropped() {
        assert_eq!(parse("G0 X1 (move)").unwrap(), parse("G0 X1").unwrap());
        assert_eq!(parse("G0 X1 ; move").unwrap(), parse("G0 X1").unwrap());
    }

    // -------------------------------------------------------------------------
    // Malformed input
    // -------------------------------------------------------------------------

    #[test]
    fn empty_line_is_rejected() {
        assert_eq!(parse("   "), Err(ParseError::Empty));
    }

    #[test]
    fn missing_command_word_is_rejected() {
        assert!(matches!(parse("X10 Y20"), Err(ParseError::MissingCommand(_))));
    }

    #[test]
    fn bad_number_is_rejected() {
        assert_eq!(
            parse("G0 X1..5"),
            Err(ParseError::InvalidNumber {
                letter: 'X',
                value: "1..5".to_string()
            })
        );
        assert!(matches!(
            parse("G0 X"),
            Err(ParseError::InvalidNumber { letter: 'X', .. })
        ));
    }

    #[test]
    fn any_parameter_letter_is_accepted() {
        let cmd = parse("G81 X1 Y2 Z-3 R5 F100").unwrap();
        assert_eq!(cmd.get('R'), Some(5.0));
        assert_eq!(parse("G43 H1 Z5").unwrap().get('H'), Some(1.0));
    }

    #[test]
    fn arc_with_k_word_parses() {
        let cmd = parse("G2 X0 Y10 I-5 J0 K0").unwrap();
        assert_eq!(cmd.name(), "G2");
        assert_eq!(cmd.get('I'), Some(-5.0));
        assert_eq!(cmd.get('K'), Some(0.0));
    }

    #[test]
    fn repeated_parameter_is_rejected() {
        assert_eq!(parse("G0 X1 X2"), Err(ParseError::DuplicateWord('X')));
    }

    #[test]
    fn stray_character_is_rejected() {
        assert_eq!(parse("G0 #1"), Err(ParseError::UnexpectedCharacter('#')));
    }

    #[test]
    fn unterminated_comment_is_rejected() {
        assert_eq!(parse("(oops"), Err(ParseError::UnterminatedComment));
    }
}
