//! The text the user edits.

use std::io;

#[derive(Debug, thiserror::Error)]
pub enum SurfaceError {
    #[error("failed to read text: {0}")]
    Read(#[source] io::Error),
    #[error("failed to write text: {0}")]
    Write(#[source] io::Error),
}

/// Get/set access to a plain-text editing surface.
pub trait TextSurface: Send {
    fn text(&mut self) -> Result<String, SurfaceError>;
    fn set_text(&mut self, text: &str) -> Result<(), SurfaceError>;
}

/// A surface backed by a `String`.
#[derive(Debug, Clone, Default)]
pub struct MemorySurface {
    text: String,
    writes: usize,
}

impl MemorySurface {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            writes: 0,
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// How many times `set_text` has been called.
    #[must_use]
    pub fn writes(&self) -> usize {
        self.writes
    }
}

impl TextSurface for MemorySurface {
    fn text(&mut self) -> Result<String, SurfaceError> {
        Ok(self.text.clone())
    }

    fn set_text(&mut self, text: &str) -> Result<(), SurfaceError> {
        text.clone_into(&mut self.text);
        self.writes += 1;
        Ok(())
    }
}
