/// A single OpenSBP line: a command code followed by comma-separated argument
/// slots and an optional trailing `'` comment.
///
/// Slots are positional. OpenSBP reads an empty slot as "leave unchanged", so
/// [`slot`](Block::slot) with `None` keeps the comma and renders nothing
/// between them: `J3,10.000,,30.000`.
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    code: String,
    slots: Vec<String>,
    comment: Option<String>,
}

impl Block {
    pub fn new(code: impl Into<String>) -> Self {
        Block {
            code: code.into(),
            slots: Vec::new(),
            comment: None,
        }
    }

    /// Appends a filled argument slot.
    pub fn arg(mut self, value: impl Into<String>) -> Self {
        self.slots.push(value.into());
        self
    }

    /// Appends a slot that is blank when `value` is `None`.
    pub fn slot(mut self, value: Option<String>) -> Self {
        self.slots.push(value.unwrap_or_default());
        self
    }

    /// Sets the trailing comment; `None` leaves the line bare.
    pub fn comment(mut self, text: Option<&str>) -> Self {
        self.comment = text.map(str::to_string);
        self
    }

    /// `true` when every slot is blank.
    pub fn is_blank(&self) -> bool {
        self.slots.iter().all(String::is_empty)
    }

    /// Renders the block as one newline-terminated line.
    pub fn render(&self) -> String {
        let mut line = self.code.clone();
        for slot in &self.slots {
            line.push(',');
            line.push_str(slot);
        }
        if let Some(text) = &self.comment {
            line.push_str(" '");
            line.push_str(text);
        }
        line.push('\n');
        line
    }
}
