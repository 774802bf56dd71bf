//! Sequential line-oriented access to a text file
//!
//! A [`LineFile`] is opened either for reading or for writing, never both.
//! Readers can rewind with [`LineFile::reset_stream`], which formats that
//! need a counting pass over the whole file use before their real pass.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, ErrorKind, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use crate::error::{FormatError, Result};

enum FileState {
    Unopened,
    Read(BufReader<File>),
    Write(BufWriter<File>),
}

/// A text file read or written one line at a time
pub struct LineFile {
    path: PathBuf,
    state: FileState,
    current_line: usize,
}

impl LineFile {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            state: FileState::Unopened,
            current_line: 0,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Opens the file for reading.
    ///
    /// Fails with `BadFileState` if the file is already open in either mode.
    pub fn open_read(&mut self) -> Result<()> {
        if !matches!(self.state, FileState::Unopened) {
            return Err(FormatError::bad_state(
                &self.path,
                "Attempting to re-open file for reading",
            ));
        }
        let file = File::open(&self.path).map_err(|e| FormatError::io(&self.path, e))?;
        self.state = FileState::Read(BufReader::new(file));
        self.current_line = 0;
        Ok(())
    }

    /// Opens (and truncates) the file for writing.
    ///
    /// Fails with `BadFileState` if the file is already open in either mode.
    pub fn open_write(&mut self) -> Result<()> {
        if !matches!(self.state, FileState::Unopened) {
            return Err(FormatError::bad_state(
                &self.path,
                "Attempting to re-open file for writing",
            ));
        }
        let file = File::create(&self.path).map_err(|e| FormatError::io(&self.path, e))?;
        self.state = FileState::Write(BufWriter::new(file));
        self.current_line = 0;
        Ok(())
    }

    pub fn is_open_read(&self) -> bool {
        matches!(self.state, FileState::Read(_))
    }

    pub fn is_open_write(&self) -> bool {
        matches!(self.state, FileState::Write(_))
    }

    /// The 1-based number of the last line read or written
    pub fn current_line(&self) -> usize {
        self.current_line
    }

    /// Reads the next line into `line` without its trailing newline.
    ///
    /// Returns `Ok(false)` at end of file.
    pub fn next_line(&mut self, line: &mut String) -> Result<bool> {
        let reader = match &mut self.state {
            FileState::Read(reader) => reader,
            _ => {
                return Err(FormatError::bad_state(
                    &self.path,
                    "File is not open for reading",
                ))
            }
        };

        line.clear();
        let n = reader.read_line(line).map_err(|e| match e.kind() {
            ErrorKind::InvalidData => FormatError::bad_file(
                &self.path,
                self.current_line + 1,
                "Line is not valid UTF-8",
            ),
            _ => FormatError::io(&self.path, e),
        })?;
        if n == 0 {
            return Ok(false);
        }

        if line.ends_with('\n') {
            line.pop();
            if line.ends_with('\r') {
                line.pop();
            }
        }
        self.current_line += 1;
        Ok(true)
    }

    /// Appends `line` followed by a newline
    pub fn set_next_line(&mut self, line: &str) -> Result<()> {
        let writer = match &mut self.state {
            FileState::Write(writer) => writer,
            _ => {
                return Err(FormatError::bad_state(
                    &self.path,
                    "File is not open for writing",
                ))
            }
        };

        writeln!(writer, "{}", line).map_err(|e| FormatError::io(&self.path, e))?;
        self.current_line += 1;
        Ok(())
    }

    /// Seeks back to the start of the file and resets the line counter
    pub fn reset_stream(&mut self) -> Result<()> {
        let reader = match &mut self.state {
            FileState::Read(reader) => reader,
            _ => {
                return Err(FormatError::bad_state(
                    &self.path,
                    "Only files open for reading can be rewound",
                ))
            }
        };

        reader
            .seek(SeekFrom::Start(0))
            .map_err(|e| FormatError::io(&self.path, e))?;
        self.current_line = 0;
        Ok(())
    }

    /// Flushes buffered output; a no-op for readers
    pub fn flush(&mut self) -> Result<()> {
        if let FileState::Write(writer) = &mut self.state {
            writer.flush().map_err(|e| FormatError::io(&self.path, e))?;
        }
        Ok(())
    }

    /// Builds a `BadFile` error pointing at the current line
    pub(crate) fn bad_line(&self, msg: impl Into<String>) -> FormatError {
        FormatError::bad_file(&self.path, self.current_line, msg)
    }
}

impl std::fmt::Debug for LineFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = match self.state {
            FileState::Unopened => "unopened",
            FileState::Read(_) => "read",
            FileState::Write(_) => "write",
        };
        f.debug_struct("LineFile")
            .field("path", &self.path)
            .field("state", &state)
            .field("current_line", &self.current_line)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_write_then_read() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("lines.txt");

        let mut out = LineFile::new(&path);
        out.open_write().unwrap();
        assert!(out.is_open_write());
        out.set_next_line("first").unwrap();
        out.set_next_line("").unwrap();
        out.set_next_line("third").unwrap();
        out.flush().unwrap();
        drop(out);

        let mut input = LineFile::new(&path);
        input.open_read().unwrap();
        let mut line = String::new();
        assert!(input.next_line(&mut line).unwrap());
        assert_eq!(line, "first");
        assert!(input.next_line(&mut line).unwrap());
        assert_eq!(line, "");
        assert!(input.next_line(&mut line).unwrap());
        assert_eq!(line, "third");
        assert_eq!(input.current_line(), 3);
        assert!(!input.next_line(&mut line).unwrap());
    }

    #[test]
    fn test_reset_stream() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("lines.txt");
        std::fs::write(&path, "a\r\nb\n").unwrap();

        let mut input = LineFile::new(&path);
        input.open_read().unwrap();
        let mut line = String::new();
        input.next_line(&mut line).unwrap();
        assert_eq!(line, "a");
        input.next_line(&mut line).unwrap();
        input.reset_stream().unwrap();
        assert_eq!(input.current_line(), 0);
        input.next_line(&mut line).unwrap();
        assert_eq!(line, "a");
        assert_eq!(input.current_line(), 1);
    }

    #[test]
    fn test_double_open_fails() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("lines.txt");

        let mut file = LineFile::new(&path);
        file.open_write().unwrap();
        assert!(matches!(
            file.open_read(),
            Err(FormatError::BadFileState { .. })
        ));
        assert!(matches!(
            file.open_write(),
            Err(FormatError::BadFileState { .. })
        ));
    }

    #[test]
    fn test_read_on_unopened_fails() {
        let mut file = LineFile::new("never-opened.txt");
        let mut line = String::new();
        assert!(file.next_line(&mut line).is_err());
        assert!(file.set_next_line("x").is_err());
    }

    #[test]
    fn test_invalid_utf8_names_line() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bytes.txt");
        std::fs::write(&path, b"first\n\xff\xfe\n").unwrap();

        let mut file = LineFile::new(&path);
        file.open_read().unwrap();
        let mut line = String::new();
        assert!(file.next_line(&mut line).unwrap());
        let err = file.next_line(&mut line).unwrap_err();
        assert!(matches!(err, FormatError::BadFile { line: 2, .. }), "{err}");
    }

    #[test]
    fn test_missing_file() {
        let dir = tempdir().unwrap();
        let mut file = LineFile::new(dir.path().join("missing.txt"));
        assert!(matches!(file.open_read(), Err(FormatError::Io { .. })));
    }
}
