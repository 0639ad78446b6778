use std::fs;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use log::debug;
use tempfile::NamedTempFile;

use crate::backend::LedgerStore;
use crate::core::{Entry, LedgerError, LedgerResult};

/// Ledger kept as a plain text file, one `date,category,amount,description`
/// line per entry.
pub struct TextStore {
    path: PathBuf
}

impl TextStore {
    pub fn new(path: impl AsRef<Path>) -> TextStore {
        TextStore { path: path.as_ref().to_owned() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: io::Error) -> LedgerError {
        LedgerError::Io { path: self.path.clone(), source }
    }

    /// Temporary files are created next to the ledger so the final rename
    /// stays on one filesystem.
    fn directory(&self) -> &Path {
        match self.path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir,
            _ => Path::new(".")
        }
    }
}

impl LedgerStore for TextStore {
    fn read(&self) -> LedgerResult<Vec<Entry>> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                debug!("no ledger at {}, starting empty", self.path.display());
                return Ok(Vec::new());
            },
            Err(err) => return Err(self.io_error(err))
        };

        let mut entries = Vec::new();
        // `lines` drops the line terminators; the rest of the line is kept
        // as written so text fields read back exactly as they were saved.
        for (number, line) in content.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            let entry = line.parse::<Entry>()
                .map_err(|source| LedgerError::Corrupt { line: number + 1, source })?;
            entries.push(entry);
        }

        debug!("read {} entries from {}", entries.len(), self.path.display());
        return Ok(entries);
    }

    fn save(&self, entries: &[Entry]) -> LedgerResult<()> {
        let file = NamedTempFile::new_in(self.directory())
            .map_err(|err| self.io_error(err))?;

        // the temporary file is private to its owner; replacing the ledger
        // must not change who can read it
        match fs::metadata(&self.path) {
            Ok(metadata) => file.as_file().set_permissions(metadata.permissions())
                .map_err(|err| self.io_error(err))?,
            Err(err) if err.kind() == io::ErrorKind::NotFound => (),
            Err(err) => return Err(self.io_error(err))
        }

        let mut writer = BufWriter::new(file);
        for entry in entries {
            writeln!(writer, "{}", entry.to_line()).map_err(|err| self.io_error(err))?;
        }
        let file = writer.into_inner()
            .map_err(|err| self.io_error(err.into_error()))?;

        file.persist(&self.path)
            .map_err(|err| self.io_error(err.error))?;

        debug!("wrote {} entries to {}", entries.len(), self.path.display());
        return Ok(());
    }
}
