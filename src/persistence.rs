// File: src/persistence.rs
use crate::core::samples::SampleSet;
use crate::error::Result;
use crate::learning::PreferenceModel;
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, ErrorKind, Write as _};
use std::path::PathBuf;
use tempfile::NamedTempFile;
use tracing::debug;

/// Everything stored for one user: the feedback so far and the model
/// trained from it, if any.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserState {
    pub samples: SampleSet,
    pub model: Option<PreferenceModel>,
}

/// One bincode file per user under a data directory.
///
/// Saves go through a temp file in the same directory and are renamed into
/// place, so a reader sees either the old state or the new one.
#[derive(Debug, Clone)]
pub struct UserStore {
    dir: PathBuf,
}

impl UserStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// File for `user_id`. The id is hex-encoded so any string is a safe name.
    pub fn path_for(&self, user_id: &str) -> PathBuf {
        let mut name = String::with_capacity(user_id.len() * 2 + 4);
        for byte in user_id.bytes() {
            let _ = write!(name, "{byte:02x}");
        }
        name.push_str(".bin");
        self.dir.join(name)
    }

    /// A user with no file yet gets an empty state.
    pub fn load(&self, user_id: &str) -> Result<UserState> {
        let path = self.path_for(user_id);
        let file = match File::open(&path) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(user = user_id, "no stored state, starting fresh");
                return Ok(UserState::default());
            }
            Err(e) => return Err(e.into()),
        };
        let state: UserState = bincode::deserialize_from(BufReader::new(file))?;
        debug!(user = user_id, samples = state.samples.len(), has_model = state.model.is_some(), "loaded user state");
        Ok(state)
    }

    pub fn save(&self, user_id: &str, state: &UserState) -> Result<()> {
        fs::create_dir_all(&self.dir)?;
        let path = self.path_for(user_id);

        let temp_file = NamedTempFile::new_in(&self.dir)?;
        {
            let mut writer = BufWriter::new(temp_file.as_file());
            bincode::serialize_into(&mut writer, state)?;
            writer.flush()?;
        }
        temp_file.as_file().sync_all()?;
        temp_file.persist(&path).map_err(|e| e.error)?;

        debug!(user = user_id, path = %path.display(), "saved user state");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn missing_user_loads_empty_state() {
        let dir = tempfile::tempdir().unwrap();
        let store = UserStore::new(dir.path());
        assert_eq!(store.load("nobody").unwrap(), UserState::default());
    }

    #[test]
    fn state_round_trips_through_disk() {
        let dir = tempfile::tempdir().unwrap();
        let store = UserStore::new(dir.path().join("nested"));
        let mut state = UserState::default();
        state.samples.insert("かった", 1.0);
        store.save("user-1", &state).unwrap();
        assert_eq!(store.load("user-1").unwrap(), state);
        assert_eq!(store.load("user-2").unwrap(), UserState::default());
    }

    #[test]
    fn user_ids_are_hex_file_names() {
        let store = UserStore::new("/data");
        assert_eq!(store.path_for("a/"), Path::new("/data/612f.bin"));
    }

    #[test]
    fn corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = UserStore::new(dir.path());
        fs::write(store.path_for("u"), b"\xff\xff\xff").unwrap();
        assert!(store.load("u").is_err());
    }
}
