//! # Persistence
//!
//! The tune collection and the session history are saved as two JSON
//! documents under fixed keys in a key-value store. The store is a trait so
//! the application can persist to disk while tests use [`MemoryStore`].

use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::ReelError;
use crate::model::{PracticeSession, Tune};

pub const TUNES_KEY: &str = "reel-revision-tunes";
pub const SESSIONS_KEY: &str = "reel-revision-practice-sessions";

/// Minimal get/put storage for serialized collections.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, ReelError>;
    fn put(&mut self, key: &str, value: &str) -> Result<(), ReelError>;
}

/// In-process store, mostly for tests.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, ReelError> {
        Ok(self.entries.get(key).cloned())
    }

    fn put(&mut self, key: &str, value: &str) -> Result<(), ReelError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// One `<key>.json` file per key inside a data directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, ReelError> {
        if key.is_empty() || key.contains(['/', '\\']) || key.starts_with('.') {
            return Err(ReelError::Store(format!("invalid key: {:?}", key)));
        }
        Ok(self.dir.join(format!("{}.json", key)))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, ReelError> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path) {
            Ok(contents) => {
                debug!(path = %path.display(), "loaded");
                Ok(Some(contents))
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn put(&mut self, key: &str, value: &str) -> Result<(), ReelError> {
        let path = self.path_for(key)?;
        fs::create_dir_all(&self.dir)?;
        fs::write(&path, value)?;
        debug!(path = %path.display(), bytes = value.len(), "saved");
        Ok(())
    }
}

fn load_json<T, S>(store: &S, key: &str) -> Result<Vec<T>, ReelError>
where
    T: for<'de> serde::Deserialize<'de>,
    S: KeyValueStore + ?Sized,
{
    match store.get(key)? {
        Some(json) => Ok(serde_json::from_str(&json)?),
        None => Ok(Vec::new()),
    }
}

fn save_json<T, S>(store: &mut S, key: &str, items: &[T]) -> Result<(), ReelError>
where
    T: serde::Serialize,
    S: KeyValueStore + ?Sized,
{
    let json = serde_json::to_string_pretty(items)?;
    store.put(key, &json)
}

pub fn load_tunes<S: KeyValueStore + ?Sized>(store: &S) -> Result<Vec<Tune>, ReelError> {
    load_json(store, TUNES_KEY)
}

pub fn save_tunes<S: KeyValueStore + ?Sized>(
    store: &mut S,
    tunes: &[Tune],
) -> Result<(), ReelError> {
    save_json(store, TUNES_KEY, tunes)
}

pub fn load_sessions<S: KeyValueStore + ?Sized>(
    store: &S,
) -> Result<Vec<PracticeSession>, ReelError> {
    load_json(store, SESSIONS_KEY)
}

pub fn save_sessions<S: KeyValueStore + ?Sized>(
    store: &mut S,
    sessions: &[PracticeSession],
) -> Result<(), ReelError> {
    save_json(store, SESSIONS_KEY, sessions)
}
