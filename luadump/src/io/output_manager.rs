//! This module contains the [OutputManager], which owns the file an export is written to.

use std::{
    fs::File,
    io::{self, BufWriter, ErrorKind, IntoInnerError},
    path::{Path, PathBuf},
};

use crate::error::Error;

/// Contains all the needed information to create the output file.
#[derive(Debug, Default)]
pub struct OutputManager {
    /// The file the export is written to.
    path: PathBuf,
    /// Replace the file if it exists already.
    overwrite: bool,
}

impl OutputManager {
    /// Create a new [OutputManager] writing to `path`.
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            overwrite: false,
        }
    }

    /// Set whether an existing file may be replaced.
    pub fn overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }

    /// Return the path of the output file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// If overwriting is not allowed, check whether the output file exists already.
    ///
    /// This is inherently racy, the finished file is still moved into place without
    /// replacing anything; the check only serves to fail before the database is contacted.
    pub fn prevent_accidental_overwrite(&self) -> Result<(), Error> {
        if !self.overwrite && self.path.exists() {
            return Err(Error::IOExists {
                filename: self.path.clone(),
            });
        }

        Ok(())
    }

    /// Directory that receives the temporary file, next to the output file.
    fn directory(&self) -> &Path {
        self.path
            .parent()
            .filter(|parent| !parent.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."))
    }

    fn writing_error(&self, error: io::Error) -> Error {
        Error::IOWriting {
            error,
            filename: self.path.clone(),
        }
    }

    /// Write the export to a temporary file and move it into place once `export`
    /// succeeded.
    ///
    /// The temporary file lives in the directory of the output file. If `export`
    /// fails it is removed, and an existing output file is left untouched.
    pub fn write_with<T>(
        &self,
        export: impl FnOnce(&mut BufWriter<File>) -> Result<T, Error>,
    ) -> Result<T, Error> {
        let (file, temp_path) = tempfile::Builder::new()
            .prefix(".luadump-")
            .suffix(".tmp")
            .tempfile_in(self.directory())
            .map_err(|error| self.writing_error(error))?
            .into_parts();
        log::debug!("Writing to temporary file {:?}", &*temp_path);

        let mut writer = BufWriter::new(file);
        let value = match export(&mut writer) {
            Ok(value) => value,
            Err(error) => {
                log::warn!("Discarding incomplete output for {:?}", self.path);

                return Err(match error {
                    Error::IO(error) => self.writing_error(error),
                    error => error,
                });
            }
        };

        writer
            .into_inner()
            .map_err(IntoInnerError::into_error)
            .and_then(|file| file.sync_all())
            .map_err(|error| self.writing_error(error))?;

        log::info!("Creating {:?}", self.path);

        let persisted = if self.overwrite {
            temp_path.persist(&self.path)
        } else {
            temp_path.persist_noclobber(&self.path)
        };

        match persisted {
            Ok(()) => Ok(value),
            Err(error) if error.error.kind() == ErrorKind::AlreadyExists => Err(Error::IOExists {
                filename: self.path.clone(),
            }),
            Err(error) => Err(self.writing_error(error.error)),
        }
    }
}
