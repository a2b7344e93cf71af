//! Saved sessions, one record per user
use crate::util::DisplayChain;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Everything saved about a user: their progress, their best score, and
/// (optionally) the game they left off in
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub(crate) struct SessionRecord {
    pub(crate) user: String,
    pub(crate) level: u32,
    pub(crate) score: u32,
    pub(crate) high_score: u32,
    /// The serialized board; opaque to the store
    #[serde(default)]
    pub(crate) game_state: Option<String>,
    #[serde(default)]
    pub(crate) last_played: Option<DateTime<Utc>>,
}

impl SessionRecord {
    /// The record for a user who has never saved anything
    pub(crate) fn new(user: &str) -> SessionRecord {
        SessionRecord {
            user: user.to_owned(),
            level: 1,
            score: 0,
            high_score: 0,
            game_state: None,
            last_played: None,
        }
    }
}

/// Durable storage for session records
pub(crate) trait Store {
    /// Fetch the stored record for `user`, if there is one
    fn fetch(&self, user: &str) -> Result<Option<SessionRecord>, LoadError>;

    /// Store `user`'s level, score, and serialized board, creating their
    /// record if necessary.  The stored high score is left alone.
    fn save(&self, user: &str, level: u32, score: u32, game_state: &str) -> Result<(), SaveError>;

    /// Raise `user`'s stored high score to `score` if it is lower
    fn update_high_score(&self, user: &str, score: u32) -> Result<(), SaveError>;

    /// Return the stored record for `user`.  If there is none, or if it
    /// could not be read, the record for a new user is returned instead.
    fn load(&self, user: &str) -> SessionRecord {
        match self.fetch(user) {
            Ok(Some(record)) => record,
            Ok(None) => {
                log::info!("No saved session for {user:?}; starting afresh");
                SessionRecord::new(user)
            }
            Err(e) => {
                log::error!("{}; starting {user:?} afresh", DisplayChain(&e));
                SessionRecord::new(user)
            }
        }
    }
}

/// A [`Store`] that keeps every record in a single JSON file
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct JsonStore {
    path: PathBuf,
}

impl JsonStore {
    pub(crate) fn new(path: PathBuf) -> JsonStore {
        JsonStore { path }
    }

    pub(crate) fn path(&self) -> &Path {
        &self.path
    }

    fn read_records(&self) -> Result<Vec<SessionRecord>, LoadError> {
        let src = match fs_err::read(&self.path) {
            Ok(src) => src,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(LoadError::read(e)),
        };
        serde_json::from_slice(&src).map_err(LoadError::deserialize)
    }

    fn write_records(&self, records: &[SessionRecord]) -> Result<(), SaveError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs_err::create_dir_all(parent).map_err(SaveError::mkdir)?;
        }
        let mut src = serde_json::to_string_pretty(records).map_err(SaveError::serialize)?;
        src.push('\n');
        fs_err::write(&self.path, &src).map_err(SaveError::write)?;
        Ok(())
    }

    /// Where a sessions file that cannot be parsed is moved before it is
    /// replaced
    fn backup_path(&self) -> PathBuf {
        let mut name = self.path.as_os_str().to_owned();
        name.push(".bak");
        PathBuf::from(name)
    }

    /// Apply `f` to `user`'s record (creating it if needed) and write the
    /// result back.  A sessions file that cannot be parsed is moved aside
    /// with a `.bak` suffix and replaced.
    fn update<F>(&self, user: &str, f: F) -> Result<(), SaveError>
    where
        F: FnOnce(&mut SessionRecord),
    {
        let mut records = match self.read_records() {
            Ok(records) => records,
            Err(e) if e.is_corrupt() => {
                let backup = self.backup_path();
                log::warn!(
                    "{}; moving it to {} and starting a new file",
                    DisplayChain(&e),
                    backup.display()
                );
                fs_err::rename(&self.path, &backup).map_err(SaveError::backup)?;
                Vec::new()
            }
            Err(e) => return Err(SaveError::load(e)),
        };
        let i = records
            .iter()
            .position(|r| r.user == user)
            .unwrap_or_else(|| {
                records.push(SessionRecord::new(user));
                records.len() - 1
            });
        f(&mut records[i]);
        self.write_records(&records)
    }
}

impl Store for JsonStore {
    fn fetch(&self, user: &str) -> Result<Option<SessionRecord>, LoadError> {
        Ok(self.read_records()?.into_iter().find(|r| r.user == user))
    }

    fn save(&self, user: &str, level: u32, score: u32, game_state: &str) -> Result<(), SaveError> {
        self.update(user, |record| {
            record.level = level;
            record.score = score;
            record.game_state = Some(game_state.to_owned());
            record.last_played = Some(Utc::now());
        })
    }

    fn update_high_score(&self, user: &str, score: u32) -> Result<(), SaveError> {
        self.update(user, |record| {
            record.high_score = record.high_score.max(score);
        })
    }
}

#[derive(Debug, Error)]
#[error("Failed to save session to disk")]
pub(crate) struct SaveError(#[source] SaveErrorSource);

impl SaveError {
    fn load(e: LoadError) -> Self {
        SaveError(SaveErrorSource::Load(e))
    }

    fn backup(e: std::io::Error) -> Self {
        SaveError(SaveErrorSource::Backup(e))
    }

    fn mkdir(e: std::io::Error) -> Self {
        SaveError(SaveErrorSource::Mkdir(e))
    }

    fn serialize(e: serde_json::Error) -> Self {
        SaveError(SaveErrorSource::Serialize(e))
    }

    fn write(e: std::io::Error) -> Self {
        SaveError(SaveErrorSource::Write(e))
    }
}

#[derive(Debug, Error)]
enum SaveErrorSource {
    #[error("failed to read existing sessions")]
    Load(#[source] LoadError),
    #[error("failed to move damaged sessions file aside")]
    Backup(#[source] std::io::Error),
    #[error("failed to create parent directories")]
    Mkdir(#[source] std::io::Error),
    #[error("failed to serialize sessions")]
    Serialize(#[source] serde_json::Error),
    #[error("failed to write sessions to disk")]
    Write(#[source] std::io::Error),
}

#[derive(Debug, Error)]
#[error("Failed to read saved sessions from disk")]
pub(crate) struct LoadError(#[source] LoadErrorSource);

impl LoadError {
    fn read(e: std::io::Error) -> Self {
        LoadError(LoadErrorSource::Read(e))
    }

    fn deserialize(e: serde_json::Error) -> Self {
        LoadError(LoadErrorSource::Deserialize(e))
    }

    /// Whether the file was read but its contents could not be parsed
    fn is_corrupt(&self) -> bool {
        matches!(self.0, LoadErrorSource::Deserialize(_))
    }
}

#[derive(Debug, Error)]
enum LoadErrorSource {
    #[error("failed to read sessions file")]
    Read(#[source] std::io::Error),
    #[error("failed to deserialize sessions")]
    Deserialize(#[source] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    #[test]
    fn missing_file_is_empty() {
        let tmp = tempdir().unwrap();
        let store = JsonStore::new(tmp.path().join("saves.json"));
        assert!(store.fetch("alice").unwrap().is_none());
        assert_eq!(store.load("alice"), SessionRecord::new("alice"));
    }

    #[test]
    fn save_and_load() {
        let tmp = tempdir().unwrap();
        let store = JsonStore::new(tmp.path().join("nested").join("saves.json"));
        store.save("alice", 3, 120, r#"{"snake":[[1,1]]}"#).unwrap();
        store.save("bob", 1, 10, r#"{"snake":[[2,2]]}"#).unwrap();
        let alice = store.load("alice");
        assert_eq!(alice.user, "alice");
        assert_eq!(alice.level, 3);
        assert_eq!(alice.score, 120);
        assert_eq!(alice.high_score, 0);
        assert_eq!(alice.game_state.as_deref(), Some(r#"{"snake":[[1,1]]}"#));
        assert!(alice.last_played.is_some());
        assert_eq!(store.load("bob").level, 1);
    }

    #[test]
    fn save_updates_in_place() {
        let tmp = tempdir().unwrap();
        let store = JsonStore::new(tmp.path().join("saves.json"));
        store.save("alice", 1, 10, "{}").unwrap();
        store.save("alice", 2, 60, "[]").unwrap();
        let src = fs_err::read_to_string(store.path()).unwrap();
        let records = serde_json::from_str::<Vec<SessionRecord>>(&src).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].level, 2);
        assert_eq!(records[0].score, 60);
        assert_eq!(records[0].game_state.as_deref(), Some("[]"));
    }

    #[test]
    fn high_score_never_decreases() {
        let tmp = tempdir().unwrap();
        let store = JsonStore::new(tmp.path().join("saves.json"));
        store.update_high_score("alice", 70).unwrap();
        assert_eq!(store.load("alice").high_score, 70);
        store.update_high_score("alice", 70).unwrap();
        assert_eq!(store.load("alice").high_score, 70);
        store.update_high_score("alice", 30).unwrap();
        assert_eq!(store.load("alice").high_score, 70);
        store.update_high_score("alice", 90).unwrap();
        assert_eq!(store.load("alice").high_score, 90);
        store.save("alice", 1, 0, "{}").unwrap();
        assert_eq!(store.load("alice").high_score, 90);
    }

    #[test]
    fn corrupt_file_loads_default() {
        let tmp = tempdir().unwrap();
        let path = tmp.path().join("saves.json");
        fs_err::write(&path, "not json").unwrap();
        let store = JsonStore::new(path);
        assert!(store.fetch("alice").is_err());
        assert_eq!(store.load("alice"), SessionRecord::new("alice"));
    }

    #[test]
    fn corrupt_file_moved_aside_on_save() {
        let tmp = tempdir().unwrap();
        let path = tmp.path().join("saves.json");
        fs_err::write(&path, "not json").unwrap();
        let store = JsonStore::new(path);
        store.save("alice", 2, 60, "{}").unwrap();
        assert_eq!(
            fs_err::read_to_string(tmp.path().join("saves.json.bak")).unwrap(),
            "not json"
        );
        let alice = store.load("alice");
        assert_eq!(alice.level, 2);
        assert_eq!(alice.score, 60);
        store.update_high_score("bob", 10).unwrap();
        assert_eq!(store.load("bob").high_score, 10);
        assert_eq!(store.load("alice").level, 2);
    }

    #[test]
    fn unwritable_path() {
        let tmp = tempdir().unwrap();
        let store = JsonStore::new(tmp.path().to_path_buf());
        assert_eq!(store.load("alice"), SessionRecord::new("alice"));
        let e = store.update_high_score("alice", 10).unwrap_err();
        assert!(DisplayChain(&e).to_string().starts_with("Failed to save session to disk: "));
    }

    #[test]
    fn record_without_optional_fields() {
        let tmp = tempdir().unwrap();
        let path = tmp.path().join("saves.json");
        fs_err::write(
            &path,
            r#"[{"user": "carol", "level": 4, "score": 5, "high_score": 200}]"#,
        )
        .unwrap();
        let store = JsonStore::new(path);
        let carol = store.load("carol");
        assert_eq!(carol.level, 4);
        assert_eq!(carol.high_score, 200);
        assert_eq!(carol.game_state, None);
        assert_eq!(carol.last_played, None);
    }
}
