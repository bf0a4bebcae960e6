//! Clipboard access. The engine only ever reads from it, on an Insert-mode
//! paste request.

pub trait Clipboard: Send {
    /// Current clipboard text, if any.
    fn text(&mut self) -> Option<String>;
}

/// A clipboard that is always empty.
#[derive(Debug, Default)]
pub struct NoClipboard;

impl Clipboard for NoClipboard {
    fn text(&mut self) -> Option<String> {
        None
    }
}

/// In-process clipboard holding a fixed string.
#[derive(Debug, Default, Clone)]
pub struct MemoryClipboard {
    contents: Option<String>,
}

impl MemoryClipboard {
    pub fn new(contents: Option<String>) -> Self {
        Self { contents }
    }

    pub fn set(&mut self, text: impl Into<String>) {
        self.contents = Some(text.into());
    }
}

impl Clipboard for MemoryClipboard {
    fn text(&mut self) -> Option<String> {
        self.contents.clone()
    }
}
