/// The payload a user can submit: an uploaded file or pasted SQL text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    File { name: String, bytes: Vec<u8> },
    Text(String),
}

impl Input {
    /// Multipart field name the server expects for this variant.
    pub fn field_name(&self) -> &'static str {
        match self {
            Input::File { .. } => "sql_file",
            Input::Text(_) => "sql_code",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

/// Form selection. At most one of file/text is active at a time.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FormInput {
    file: Option<SelectedFile>,
    text: String,
}

impl FormInput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Selecting a file discards any pasted text.
    pub fn select_file(&mut self, name: impl Into<String>, bytes: Vec<u8>) {
        self.file = Some(SelectedFile {
            name: name.into(),
            bytes,
        });
        self.text.clear();
    }

    pub fn clear_file(&mut self) {
        self.file = None;
    }

    /// Typing non-blank text discards the selected file.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
        if !self.text.trim().is_empty() {
            self.file = None;
        }
    }

    pub fn file(&self) -> Option<&SelectedFile> {
        self.file.as_ref()
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn can_submit(&self) -> bool {
        self.file.is_some() || !self.text.trim().is_empty()
    }

    /// The active input, with text trimmed. `None` when nothing is submittable.
    pub fn current_input(&self) -> Option<Input> {
        if let Some(file) = &self.file {
            return Some(Input::File {
                name: file.name.clone(),
                bytes: file.bytes.clone(),
            });
        }
        let trimmed = self.text.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Input::Text(trimmed.to_string()))
        }
    }
}
