//! Program persistence.
//!
//! The writer is the only I/O in this crate. A failed write reports its
//! cause and leaves the generated program string untouched, so the caller
//! can retry the write without regenerating.

use std::fs;
use std::path::PathBuf;

use tracing::info;

use crate::error::ProgramError;

/// Writes generated programs into a configured output directory.
#[derive(Debug, Clone)]
pub struct ProgramWriter {
    output_dir: PathBuf,
}

impl ProgramWriter {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    /// Write `program` under `name` with any extension stripped (motion
    /// controllers expect bare program names). Creates the output
    /// directory when absent and returns the path written.
    pub fn save_program(&self, program: &str, name: &str) -> Result<PathBuf, ProgramError> {
        let base = name.split('.').next().unwrap_or(name);

        if !self.output_dir.exists() {
            fs::create_dir_all(&self.output_dir)?;
        }

        let path = self.output_dir.join(base);
        fs::write(&path, program)?;

        info!(path = %path.display(), "program saved");
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_extension_from_name() {
        let dir = tempfile::tempdir().unwrap();
        let writer = ProgramWriter::new(dir.path());

        let path = writer.save_program("G0 X0\n", "PROGRAM.nc").unwrap();
        assert_eq!(path.file_name().unwrap(), "PROGRAM");
        assert_eq!(fs::read_to_string(&path).unwrap(), "G0 X0\n");
    }

    #[test]
    fn creates_missing_output_directory() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("out").join("programs");
        let writer = ProgramWriter::new(&nested);

        let path = writer.save_program("%\n", "FACE").unwrap();
        assert!(nested.exists());
        assert_eq!(path, nested.join("FACE"));
    }

    #[test]
    fn reports_write_failure_with_cause() {
        let dir = tempfile::tempdir().unwrap();
        let writer = ProgramWriter::new(dir.path());

        // An empty base name resolves to the directory itself.
        let err = writer.save_program("%\n", ".nc").unwrap_err();
        assert!(matches!(err, ProgramError::Io(_)));
    }
}
