//! Text surfaces over files and standard streams.

use std::fs;
use std::io::{self, Read, Write};
use std::path::PathBuf;

use lawyerify_engine::{SurfaceError, TextSurface};
use lawyerify_utils::replace_file;

/// Reads one file, writes the result to another (or the same) path.
#[derive(Debug, Clone)]
pub struct FileSurface {
    input: PathBuf,
    output: PathBuf,
}

impl FileSurface {
    pub fn new(input: PathBuf, output: PathBuf) -> Self {
        Self { input, output }
    }

    pub fn in_place(path: PathBuf) -> Self {
        Self {
            input: path.clone(),
            output: path,
        }
    }
}

impl TextSurface for FileSurface {
    fn text(&mut self) -> Result<String, SurfaceError> {
        fs::read_to_string(&self.input).map_err(SurfaceError::Read)
    }

    fn set_text(&mut self, text: &str) -> Result<(), SurfaceError> {
        replace_file(&self.output, text.as_bytes()).map_err(SurfaceError::Write)
    }
}

/// Reads all of `reader`, writes the result to `writer`.
pub struct StreamSurface<R, W> {
    reader: R,
    writer: W,
}

impl<R, W> StreamSurface<R, W> {
    pub fn new(reader: R, writer: W) -> Self {
        Self { reader, writer }
    }

    #[cfg(test)]
    pub fn into_writer(self) -> W {
        self.writer
    }
}

impl StreamSurface<io::Stdin, io::Stdout> {
    pub fn stdio() -> Self {
        Self::new(io::stdin(), io::stdout())
    }
}

impl<R: Read + Send, W: Write + Send> TextSurface for StreamSurface<R, W> {
    fn text(&mut self) -> Result<String, SurfaceError> {
        let mut text = String::new();
        self.reader
            .read_to_string(&mut text)
            .map_err(SurfaceError::Read)?;
        Ok(text)
    }

    fn set_text(&mut self, text: &str) -> Result<(), SurfaceError> {
        self.writer
            .write_all(text.as_bytes())
            .and_then(|()| self.writer.write_all(b"\n"))
            .and_then(|()| self.writer.flush())
            .map_err(SurfaceError::Write)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn stream_surface_round_trip() {
        let mut surface = StreamSurface::new(Cursor::new("The dog."), Vec::new());
        assert_eq!(surface.text().unwrap(), "The dog.");
        surface.set_text("The canine.").unwrap();
        assert_eq!(surface.into_writer(), b"The canine.\n");
    }

    #[test]
    fn file_surface_in_place() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("doc.txt");
        fs::write(&path, "happy").unwrap();

        let mut surface = FileSurface::in_place(path.clone());
        assert_eq!(surface.text().unwrap(), "happy");
        surface.set_text("content").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "content");
    }

    #[test]
    fn file_surface_missing_input_is_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut surface = FileSurface::new(dir.path().join("absent"), dir.path().join("out"));
        assert!(matches!(surface.text(), Err(SurfaceError::Read(_))));
    }
}
