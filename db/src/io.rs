//! Output filesystem abstraction layer.
//!
//! The export ends up in a single file on local disk. This module owns that file: it validates
//! the destination up front and replaces it atomically, so a failed run never leaves a truncated
//! document behind.

use crate::error::{CustomKind, Error, Result};
use crate::jutil;
use serde::Serialize;
use std::env;
use std::fs;
use std::io::{BufWriter, Write};
#[cfg(unix)]
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use tracing::debug;

/// A structure representing the output file of an export.
#[non_exhaustive]
#[derive(Debug)]
pub struct Io {
    path: PathBuf,
}

impl Io {
    const TEMP_PREFIX: &'static str = ".dbexport";
    const TEMP_SUFFIX: &'static str = ".tmp";
    #[cfg(unix)]
    const NEW_FILE_MODE: u32 = 0o666;

    /// Create an output layer writing into `path`.
    ///
    /// Relative paths are resolved against the current working directory. The file itself does
    /// not need to exist, missing parent directories are created on the first write.
    ///
    /// # Errors
    /// The function returns a custom [`CustomKind::InvalidArgument`] error when the path is empty
    /// or points to a directory. Resolving a relative path may produce an OS specific error.
    pub fn new<P>(path: P) -> Result<Self>
    where
        P: AsRef<Path>,
    {
        let path = path.as_ref();
        if path.as_os_str().is_empty() {
            return Err(Error::custom_err(
                CustomKind::InvalidArgument,
                "Output path cannot be empty",
            ));
        }

        let path = if path.is_absolute() {
            path.to_path_buf()
        } else {
            env::current_dir()?.join(path)
        };

        // Checked here so the error carries the problematic path instead of a bare OS error
        if path.is_dir() {
            return Err(Error::custom_err(
                CustomKind::InvalidArgument,
                &format!("Output path is a directory: {}", path.display()),
            ));
        }

        Ok(Self { path })
    }

    /// Absolute path of the output file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    // Serialize a serializable object into a writer
    fn do_serialize<W, S>(writer: W, object: &S, pretty: bool) -> Result<()>
    where
        W: Write,
        S: Serialize + ?Sized,
    {
        if pretty {
            jutil::to_writer_indented(writer, object)?;
        } else {
            serde_json::to_writer(writer, object)?;
        }

        Ok(())
    }

    /// Serialize an object into the output file replacing any previous content.
    ///
    /// The document is written into a temporary file next to the destination and renamed over
    /// it once complete. Depending on `pretty` flag the output is either indented with four
    /// spaces or compact.
    ///
    /// # Errors
    /// The function may return an IO or a serde error. In either case a pre-existing output file
    /// is left untouched and the temporary file is removed.
    pub fn serialize<S>(&self, object: &S, pretty: bool) -> Result<()>
    where
        S: Serialize + ?Sized,
    {
        // Path is absolute, hence at least the root is always a parent
        let dir = self.path.parent().ok_or_else(|| {
            Error::custom_err(
                CustomKind::InvalidArgument,
                &format!("Output path has no parent: {}", self.path.display()),
            )
        })?;
        fs::create_dir_all(dir)?;

        let mut builder = tempfile::Builder::new();
        builder.prefix(Self::TEMP_PREFIX).suffix(Self::TEMP_SUFFIX);
        // Same mode a plainly created file gets, umask still applies
        #[cfg(unix)]
        builder.permissions(fs::Permissions::from_mode(Self::NEW_FILE_MODE));
        let mut temp = builder.tempfile_in(dir)?;
        debug!(temp = %temp.path().display(), "writing document into temporary file");

        {
            let mut writer = BufWriter::new(temp.as_file_mut());
            Self::do_serialize(&mut writer, object, pretty)?;
            writer.write_all(b"\n")?;
            writer.flush()?;
        }
        temp.as_file().sync_all()?;

        // Replacing an export keeps its permissions
        if let Ok(metadata) = fs::metadata(&self.path) {
            temp.as_file().set_permissions(metadata.permissions())?;
        }

        temp.persist(&self.path).map_err(|err| Error::Io(err.error))?;
        debug!(path = %self.path.display(), "document persisted");
        Ok(())
    }
}
