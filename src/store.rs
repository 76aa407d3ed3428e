use serde::Serialize;
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::io::{self, Write};
use std::path::PathBuf;
use thiserror::Error;

pub const FAVORITES_KEY: &str = "ml_favs_v3";
pub const WISHLIST_KEY: &str = "ml_wish_v3";
pub const THEME_KEY: &str = "ml_theme_v3";

/// Failures the store absorbs. They never reach callers of `load`/`save`,
/// only the diagnostic hook.
#[derive(Error, Debug)]
pub enum PersistenceError {
    #[error("failed to read {key}: {source}")]
    Read { key: String, source: io::Error },

    #[error("failed to write {key}: {source}")]
    Write { key: String, source: io::Error },

    #[error("stored value for {key} is malformed: {source}")]
    Decode {
        key: String,
        source: serde_json::Error,
    },

    #[error("value for {key} could not be encoded: {source}")]
    Encode {
        key: String,
        source: serde_json::Error,
    },
}

/// Raw key/value storage underneath a [`Store`].
pub trait Backend: Send {
    /// `Ok(None)` when the key was never written.
    fn read(&self, key: &str) -> io::Result<Option<String>>;
    fn write(&mut self, key: &str, contents: &str) -> io::Result<()>;
}

/// One `<key>.json` file per key inside a directory.
#[derive(Debug, Clone)]
pub struct FileBackend {
    dir: PathBuf,
}

impl FileBackend {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

impl Backend for FileBackend {
    fn read(&self, key: &str) -> io::Result<Option<String>> {
        match std::fs::read_to_string(self.path_for(key)) {
            Ok(s) => Ok(Some(s)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn write(&mut self, key: &str, contents: &str) -> io::Result<()> {
        std::fs::create_dir_all(&self.dir)?;
        // Write next to the target and rename so a crash never leaves half a file
        let mut temp = tempfile::NamedTempFile::new_in(&self.dir)?;
        temp.write_all(contents.as_bytes())?;
        temp.flush()?;
        temp.persist(self.path_for(key)).map_err(|e| e.error)?;
        Ok(())
    }
}

/// In-process storage for `--ephemeral` runs and tests.
#[derive(Debug, Clone, Default)]
pub struct MemoryBackend {
    entries: HashMap<String, String>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Backend for MemoryBackend {
    fn read(&self, key: &str) -> io::Result<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn write(&mut self, key: &str, contents: &str) -> io::Result<()> {
        self.entries.insert(key.to_string(), contents.to_string());
        Ok(())
    }
}

type DiagnosticHook = Box<dyn Fn(&PersistenceError) + Send>;

/// Best-effort JSON persistence. Neither `load` nor `save` can fail.
pub struct Store {
    backend: Box<dyn Backend>,
    on_error: DiagnosticHook,
}

impl Store {
    pub fn new(backend: impl Backend + 'static) -> Self {
        Self {
            backend: Box::new(backend),
            on_error: Box::new(|err| tracing::warn!(error = %err, "persistence failure ignored")),
        }
    }

    pub fn in_memory() -> Self {
        Self::new(MemoryBackend::new())
    }

    /// Replace the hook that observes swallowed failures.
    pub fn with_diagnostics(mut self, hook: impl Fn(&PersistenceError) + Send + 'static) -> Self {
        self.on_error = Box::new(hook);
        self
    }

    /// Read `key`, falling back on absence, empty content, malformed JSON
    /// or an unreadable backend.
    pub fn load<T: DeserializeOwned>(&self, key: &str, fallback: T) -> T {
        let raw = match self.backend.read(key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return fallback,
            Err(source) => {
                (self.on_error)(&PersistenceError::Read {
                    key: key.to_string(),
                    source,
                });
                return fallback;
            }
        };
        if raw.trim().is_empty() {
            return fallback;
        }
        match serde_json::from_str(&raw) {
            Ok(value) => value,
            Err(source) => {
                (self.on_error)(&PersistenceError::Decode {
                    key: key.to_string(),
                    source,
                });
                fallback
            }
        }
    }

    pub fn save<T: Serialize + ?Sized>(&mut self, key: &str, value: &T) {
        let encoded = match serde_json::to_string(value) {
            Ok(s) => s,
            Err(source) => {
                (self.on_error)(&PersistenceError::Encode {
                    key: key.to_string(),
                    source,
                });
                return;
            }
        };
        if let Err(source) = self.backend.write(key, &encoded) {
            (self.on_error)(&PersistenceError::Write {
                key: key.to_string(),
                source,
            });
        } else {
            tracing::trace!(key, bytes = encoded.len(), "saved");
        }
    }
}

impl std::fmt::Debug for Store {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store").finish_non_exhaustive()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::sync::{Arc, Mutex};

    /// Backend whose reads and writes always fail, like a disabled or full disk.
    pub(crate) struct BrokenBackend;

    impl Backend for BrokenBackend {
        fn read(&self, _key: &str) -> io::Result<Option<String>> {
            Err(io::Error::new(io::ErrorKind::PermissionDenied, "storage disabled"))
        }

        fn write(&mut self, _key: &str, _contents: &str) -> io::Result<()> {
            Err(io::Error::new(io::ErrorKind::StorageFull, "quota exceeded"))
        }
    }

    /// Backend that records every write, shared with the test through an `Arc`.
    #[derive(Clone, Default)]
    pub(crate) struct RecordingBackend {
        pub(crate) writes: Arc<Mutex<Vec<(String, String)>>>,
        inner: MemoryBackend,
    }

    impl Backend for RecordingBackend {
        fn read(&self, key: &str) -> io::Result<Option<String>> {
            self.inner.read(key)
        }

        fn write(&mut self, key: &str, contents: &str) -> io::Result<()> {
            self.writes
                .lock()
                .unwrap()
                .push((key.to_string(), contents.to_string()));
            self.inner.write(key, contents)
        }
    }

    fn collecting(store: Store) -> (Store, Arc<Mutex<Vec<String>>>) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let store = store.with_diagnostics(move |err| sink.lock().unwrap().push(err.to_string()));
        (store, seen)
    }

    #[test]
    fn test_load_missing_key_returns_fallback() {
        let store = Store::in_memory();
        let value: Vec<u64> = store.load("never-written", vec![1, 2, 3]);
        assert_eq!(value, vec![1, 2, 3]);
        assert!(store.load(THEME_KEY, true));
    }

    #[test]
    fn test_malformed_content_falls_back_and_is_reported() {
        let mut backend = MemoryBackend::new();
        backend.write(FAVORITES_KEY, "{not json").unwrap();
        let (store, seen) = collecting(Store::new(backend));

        let value: Vec<u64> = store.load(FAVORITES_KEY, Vec::new());
        assert!(value.is_empty());

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert!(seen[0].contains("malformed"));
    }

    #[test]
    fn test_empty_content_is_treated_as_absent() {
        let mut backend = MemoryBackend::new();
        backend.write(THEME_KEY, "").unwrap();
        let (store, seen) = collecting(Store::new(backend));
        assert!(!store.load(THEME_KEY, false));
        assert!(seen.lock().unwrap().is_empty());
    }

    #[test]
    fn test_broken_backend_never_propagates() {
        let (mut store, seen) = collecting(Store::new(BrokenBackend));
        store.save(WISHLIST_KEY, &vec![1u64]);
        let value: Vec<u64> = store.load(WISHLIST_KEY, vec![9]);
        assert_eq!(value, vec![9]);

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 2);
        assert!(seen[0].contains("failed to write"));
        assert!(seen[1].contains("failed to read"));
    }

    #[test]
    fn test_file_backend_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = Store::new(FileBackend::new(dir.path().join("nested")));
        store.save(FAVORITES_KEY, &vec!["a".to_string(), "b".to_string()]);

        let reopened = Store::new(FileBackend::new(dir.path().join("nested")));
        let value: Vec<String> = reopened.load(FAVORITES_KEY, Vec::new());
        assert_eq!(value, vec!["a", "b"]);
        assert!(dir.path().join("nested").join("ml_favs_v3.json").exists());
    }

    #[test]
    fn test_file_backend_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = Store::new(FileBackend::new(dir.path()));
        store.save(THEME_KEY, &true);
        store.save(THEME_KEY, &false);
        assert!(!store.load(THEME_KEY, true));
    }

    proptest! {
        #[test]
        fn prop_save_then_load_returns_value(values in proptest::collection::vec(any::<(u64, String)>(), 0..16)) {
            let mut store = Store::in_memory();
            store.save("prop", &values);
            let loaded: Vec<(u64, String)> = store.load("prop", Vec::new());
            prop_assert_eq!(loaded, values);
        }
    }
}
