//! Local-disk byte source
//!
//! The uploaded spreadsheet is the only source of truth. It lives at
//! `<uploads>/memories.<ext>`; media files sit flat in `<uploads>/media`.
//! All operations are blocking std::fs calls; handlers run them on the
//! blocking pool.

use memories_common::config::RootFolderInitializer;
use memories_common::{Error, Result};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tracing::{debug, info};

/// Stem every stored memories file shares
const MEMORIES_STEM: &str = "memories";

/// Prefix of the per-upload temporary files
const UPLOAD_TEMP_PREFIX: &str = ".memories-upload";

/// Uploaded memories file and media on local disk
#[derive(Debug, Clone)]
pub struct FileStorage {
    uploads_dir: PathBuf,
    media_dir: PathBuf,
    /// Serializes memories-file replacement against itself and readers
    upload_lock: Arc<Mutex<()>>,
}

impl FileStorage {
    /// Open storage under a root folder, creating the layout if needed
    pub fn open(root_folder: PathBuf) -> Result<Self> {
        let initializer = RootFolderInitializer::new(root_folder);
        initializer.ensure_directories()?;

        Ok(Self {
            uploads_dir: initializer.uploads_dir(),
            media_dir: initializer.media_dir(),
            upload_lock: Arc::new(Mutex::new(())),
        })
    }

    pub fn uploads_dir(&self) -> &Path {
        &self.uploads_dir
    }

    /// Replace the memories file, keeping the uploaded extension
    ///
    /// The bytes go to a unique temporary file that is renamed over the
    /// target; other `memories.*` files are removed only afterwards, so a
    /// reader always finds a complete file. Replacements and reads of the
    /// memories file run one at a time.
    pub fn save_memories_file(&self, bytes: &[u8], original_filename: &str) -> Result<PathBuf> {
        let extension = Path::new(original_filename)
            .extension()
            .and_then(|e| e.to_str())
            .ok_or_else(|| {
                Error::InvalidInput(format!("No file extension in '{}'", original_filename))
            })?;
        let target = self
            .uploads_dir
            .join(format!("{}.{}", MEMORIES_STEM, extension));

        let _guard = self.upload_lock.lock().unwrap_or_else(|e| e.into_inner());

        let mut temp = tempfile::Builder::new()
            .prefix(UPLOAD_TEMP_PREFIX)
            .tempfile_in(&self.uploads_dir)?;
        temp.write_all(bytes)?;
        temp.as_file().sync_all()?;
        temp.persist(&target).map_err(|e| e.error)?;

        for existing in self.memories_files()? {
            if existing != target {
                fs::remove_file(&existing)?;
                debug!("Removed previous memories file {}", existing.display());
            }
        }

        info!(path = %target.display(), bytes = bytes.len(), "Saved memories file");
        Ok(target)
    }

    /// Current memories file as `(bytes, filename)`, if one was uploaded
    pub fn memories_file(&self) -> Result<Option<(Vec<u8>, String)>> {
        // Held so a replacement cannot delete the file between listing and reading
        let _guard = self.upload_lock.lock().unwrap_or_else(|e| e.into_inner());

        let Some(path) = self.memories_files()?.into_iter().next() else {
            return Ok(None);
        };

        let bytes = fs::read(&path)?;
        let filename = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        Ok(Some((bytes, filename)))
    }

    /// Every `memories.*` file in the uploads folder, sorted by name
    fn memories_files(&self) -> Result<Vec<PathBuf>> {
        let prefix = format!("{}.", MEMORIES_STEM);
        let mut files = Vec::new();

        for entry in fs::read_dir(&self.uploads_dir)? {
            let entry = entry?;
            let is_memories = entry
                .file_name()
                .to_str()
                .is_some_and(|name| name.starts_with(&prefix));
            if is_memories && entry.file_type()?.is_file() {
                files.push(entry.path());
            }
        }

        files.sort();
        Ok(files)
    }

    pub fn save_media_file(&self, filename: &str, bytes: &[u8]) -> Result<PathBuf> {
        let path = self.media_path(filename)?;
        fs::write(&path, bytes)?;
        info!(path = %path.display(), bytes = bytes.len(), "Saved media file");
        Ok(path)
    }

    /// Names of all media files, sorted
    pub fn list_media_files(&self) -> Result<Vec<String>> {
        if !self.media_dir.exists() {
            return Ok(Vec::new());
        }

        let mut names = Vec::new();
        for entry in fs::read_dir(&self.media_dir)? {
            let entry = entry?;
            if entry.file_type()?.is_file() {
                names.push(entry.file_name().to_string_lossy().into_owned());
            }
        }

        names.sort();
        Ok(names)
    }

    /// Delete a media file; `false` when there was nothing to delete
    pub fn delete_media_file(&self, filename: &str) -> Result<bool> {
        let path = self.media_path(filename)?;
        if !path.is_file() {
            return Ok(false);
        }
        fs::remove_file(&path)?;
        info!(path = %path.display(), "Deleted media file");
        Ok(true)
    }

    /// Location of a media file, after rejecting names that could escape
    /// the media folder
    pub fn media_path(&self, filename: &str) -> Result<PathBuf> {
        Ok(self.media_dir.join(validate_media_name(filename)?))
    }
}

/// Reject names that could escape the media folder
pub fn validate_media_name(filename: &str) -> Result<&str> {
    let invalid = filename.is_empty()
        || filename == "."
        || filename == ".."
        || filename.contains(['/', '\\', '\0']);

    if invalid {
        return Err(Error::InvalidInput(format!(
            "Invalid media filename: '{}'",
            filename
        )));
    }
    Ok(filename)
}

/// Content type served for a media file, chosen by extension
pub fn content_type_for(filename: &str) -> &'static str {
    let extension = Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    match extension.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "heic" => "image/heic",
        "mp4" => "video/mp4",
        "mov" => "video/quicktime",
        "mp3" => "audio/mpeg",
        "wav" => "audio/wav",
        "m4a" => "audio/mp4",
        _ => "application/octet-stream",
    }
}
