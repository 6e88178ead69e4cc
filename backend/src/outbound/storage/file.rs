//! File-backed session store.
//!
//! Each key is stored as `<key>.json` inside a state directory opened through
//! `cap-std`, so the store cannot reach outside that directory. Writes go to
//! a hidden temporary file that is renamed over the target.

use std::io::{self, Write};
use std::sync::atomic::{AtomicU64, Ordering};

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::ambient_authority;
use cap_std::fs::{Dir, OpenOptions};
use tracing::debug;

use crate::domain::ports::{SessionStore, SessionStoreError};

static TEMP_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Session store writing one JSON file per key.
#[derive(Debug)]
pub struct FileSessionStore {
    dir: Dir,
    root: Utf8PathBuf,
}

impl FileSessionStore {
    /// Open (creating if needed) the state directory at `root`.
    ///
    /// # Errors
    ///
    /// Returns an I/O error when the directory cannot be created or opened.
    pub fn open(root: &Utf8Path) -> io::Result<Self> {
        Dir::create_ambient_dir_all(root, ambient_authority())?;
        let dir = Dir::open_ambient_dir(root, ambient_authority())?;
        Ok(Self {
            dir,
            root: root.to_path_buf(),
        })
    }

    /// Directory holding the session files.
    pub fn root(&self) -> &Utf8Path {
        &self.root
    }

    /// Path of the file backing `key`.
    pub fn path_for(&self, key: &str) -> Result<Utf8PathBuf, SessionStoreError> {
        let name = file_name(key).map_err(|message| SessionStoreError::read(key, message))?;
        Ok(self.root.join(name))
    }

    fn write_atomic(&self, name: &str, contents: &str) -> io::Result<()> {
        let counter = TEMP_COUNTER.fetch_add(1, Ordering::Relaxed);
        let tmp_name = format!(".{name}.tmp.{}.{counter}", std::process::id());
        let mut options = OpenOptions::new();
        options.write(true).create_new(true);

        let written = self.dir.open_with(&tmp_name, &options).and_then(|mut file| {
            file.write_all(contents.as_bytes())?;
            file.sync_all()
        });
        let renamed = written.and_then(|()| self.dir.rename(&tmp_name, &self.dir, name));
        if renamed.is_err() {
            if let Err(error) = self.dir.remove_file(&tmp_name) {
                debug!(%error, file = %tmp_name, "temporary session file not removed");
            }
        }
        renamed
    }
}

fn file_name(key: &str) -> Result<String, String> {
    let valid = !key.is_empty()
        && key
            .chars()
            .all(|ch| ch.is_ascii_alphanumeric() || ch == '_' || ch == '-');
    if valid {
        Ok(format!("{key}.json"))
    } else {
        Err(format!("key '{key}' is not a valid file stem"))
    }
}

impl SessionStore for FileSessionStore {
    fn get(&self, key: &str) -> Result<Option<String>, SessionStoreError> {
        let name = file_name(key).map_err(|message| SessionStoreError::read(key, message))?;
        match self.dir.read_to_string(&name) {
            Ok(contents) => Ok(Some(contents)),
            Err(error) if error.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(error) => Err(SessionStoreError::read(key, error.to_string())),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), SessionStoreError> {
        let name = file_name(key).map_err(|message| SessionStoreError::write(key, message))?;
        self.write_atomic(&name, value)
            .map_err(|error| SessionStoreError::write(key, error.to_string()))
    }

    fn remove(&self, key: &str) -> Result<(), SessionStoreError> {
        let name = file_name(key).map_err(|message| SessionStoreError::remove(key, message))?;
        match self.dir.remove_file(&name) {
            Ok(()) => Ok(()),
            Err(error) if error.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(error) => Err(SessionStoreError::remove(key, error.to_string())),
        }
    }
}
