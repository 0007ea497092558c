//! Interactive review of the finished program in the user's text editor.

use std::fs;
use std::process::Command;

use tracing::{info, warn};

use crate::postprocessor::{PostProcessorError, Reviewer};

/// Opens the program in an external editor and takes back whatever was saved.
#[derive(Debug, Clone)]
pub struct EditorReviewer {
    /// Editor command line; extra words are passed before the file name.
    editor: String,
}

impl EditorReviewer {
    pub fn new(editor: impl Into<String>) -> Self {
        EditorReviewer {
            editor: editor.into(),
        }
    }

    /// Uses `$VISUAL`, falling back to `$EDITOR`. `None` when neither is set.
    pub fn from_env() -> Option<Self> {
        ["VISUAL", "EDITOR"]
            .into_iter()
            .filter_map(|var| std::env::var(var).ok())
            .find(|value| !value.trim().is_empty())
            .map(EditorReviewer::new)
    }
}

fn review_error(context: &str, e: std::io::Error) -> PostProcessorError {
    PostProcessorError::Review(format!("{context}: {e}"))
}

impl Reviewer for EditorReviewer {
    fn review(&self, text: &str) -> Result<Option<String>, PostProcessorError> {
        let dir = tempfile::tempdir().map_err(|e| review_error("temporary directory", e))?;
        let path = dir.path().join("program.sbp");
        fs::write(&path, text).map_err(|e| review_error("write temporary file", e))?;

        let mut words = self.editor.split_whitespace();
        let program = words
            .next()
            .ok_or_else(|| PostProcessorError::Review("editor command is empty".to_string()))?;
        info!(editor = %self.editor, "opening program for review");
        let status = Command::new(program)
            .args(words)
            .arg(&path)
            .status()
            .map_err(|e| review_error(&format!("run `{}`", self.editor), e))?;

        if !status.success() {
            warn!(editor = %self.editor, %status, "editor failed; keeping original program");
            return Ok(None);
        }

        let edited =
            fs::read_to_string(&path).map_err(|e| review_error("read temporary file", e))?;
        Ok((edited != text).then_some(edited))
    }
}
