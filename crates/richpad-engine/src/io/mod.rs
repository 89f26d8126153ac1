use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::editing::Document;
use crate::raw::{RawContentState, RawError, convert_from_raw, convert_to_raw};

/// Storage key the document snapshot lives under
pub const EDITOR_CONTENT_KEY: &str = "editorContent";

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Storage file {path} is corrupt: {source}")]
    CorruptStore {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("Saved content under '{key}' is malformed: {source}")]
    MalformedSnapshot { key: String, source: RawError },
    #[error("Failed to encode content: {0}")]
    Encode(RawError),
}

/// Persistent string-to-string storage, in the manner of a browser's local
/// storage
pub trait KeyValueStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove_item(&mut self, key: &str) -> Result<(), StorageError>;
}

/// In-memory store, lost when dropped
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    items: BTreeMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.items.get(key).cloned())
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.items.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&mut self, key: &str) -> Result<(), StorageError> {
        self.items.remove(key);
        Ok(())
    }
}

/// Store kept as a single JSON object in a file.
///
/// The file is read on every lookup and rewritten whole on every change, via
/// a temporary file renamed over the original so a crash never leaves it
/// half written. A missing file is an empty store.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<BTreeMap<String, String>, StorageError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(e) => return Err(StorageError::Io(e)),
        };
        if content.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        serde_json::from_str(&content).map_err(|source| StorageError::CorruptStore {
            path: self.path.clone(),
            source,
        })
    }

    fn write_all(&self, items: &BTreeMap<String, String>) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }

        let content =
            serde_json::to_string_pretty(items).map_err(|source| StorageError::CorruptStore {
                path: self.path.clone(),
                source,
            })?;

        let mut tmp_name = self.path.as_os_str().to_owned();
        tmp_name.push(".tmp");
        let tmp_path = PathBuf::from(tmp_name);
        fs::write(&tmp_path, content)?;
        fs::rename(&tmp_path, &self.path)?;
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.read_all()?.remove(key))
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut items = self.read_all()?;
        items.insert(key.to_string(), value.to_string());
        self.write_all(&items)
    }

    fn remove_item(&mut self, key: &str) -> Result<(), StorageError> {
        let mut items = self.read_all()?;
        if items.remove(key).is_some() {
            self.write_all(&items)?;
        }
        Ok(())
    }
}

/// Write the document's raw JSON under [`EDITOR_CONTENT_KEY`], replacing
/// whatever was there
pub fn save_document(store: &mut impl KeyValueStore, doc: &Document) -> Result<(), StorageError> {
    let json = convert_to_raw(doc).to_json().map_err(StorageError::Encode)?;
    store.set_item(EDITOR_CONTENT_KEY, &json)?;
    log::info!(
        "saved {} blocks ({} bytes) under {}",
        doc.blocks().len(),
        json.len(),
        EDITOR_CONTENT_KEY
    );
    Ok(())
}

/// Load the saved document, or `None` when nothing has been saved yet
pub fn load_document(store: &impl KeyValueStore) -> Result<Option<Document>, StorageError> {
    let Some(json) = store.get_item(EDITOR_CONTENT_KEY)? else {
        log::debug!("no saved content under {}", EDITOR_CONTENT_KEY);
        return Ok(None);
    };

    let malformed = |source| StorageError::MalformedSnapshot {
        key: EDITOR_CONTENT_KEY.to_string(),
        source,
    };
    let raw = RawContentState::from_json(&json).map_err(malformed)?;
    let doc = convert_from_raw(&raw).map_err(malformed)?;

    log::info!("loaded {} blocks from {}", doc.blocks().len(), EDITOR_CONTENT_KEY);
    Ok(Some(doc))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editing::{BlockKey, ContentBlock, InlineStyle, StyleSet};
    use crate::tests::{create_test_store_dir, store_path};
    use pretty_assertions::assert_eq;

    fn sample_doc() -> Document {
        Document::from_blocks(vec![
            ContentBlock::styled(
                BlockKey::new("head1"),
                "Heading",
                &StyleSet::new().with(InlineStyle::HeaderOne),
            ),
            ContentBlock::new(BlockKey::new("body1"), "Body text"),
        ])
    }

    #[test]
    fn test_memory_store_basic_operations() {
        let mut store = MemoryStore::new();
        assert_eq!(store.get_item("a").unwrap(), None);

        store.set_item("a", "1").unwrap();
        store.set_item("a", "2").unwrap();
        assert_eq!(store.get_item("a").unwrap(), Some("2".to_string()));
        assert_eq!(store.len(), 1);

        store.remove_item("a").unwrap();
        assert!(store.is_empty());
    }

    #[test]
    fn test_file_store_missing_file_is_empty() {
        let dir = create_test_store_dir();
        let store = FileStore::new(store_path(&dir));

        assert_eq!(store.get_item(EDITOR_CONTENT_KEY).unwrap(), None);
    }

    #[test]
    fn test_file_store_persists_across_instances() {
        // Given a value written by one store
        let dir = create_test_store_dir();
        let mut store = FileStore::new(store_path(&dir));
        store.set_item("greeting", "hello").unwrap();
        store.set_item("other", "value").unwrap();

        // When a fresh store opens the same file
        let reopened = FileStore::new(store_path(&dir));

        // Then both values are there
        assert_eq!(
            reopened.get_item("greeting").unwrap(),
            Some("hello".to_string())
        );
        assert_eq!(reopened.get_item("other").unwrap(), Some("value".to_string()));
    }

    #[test]
    fn test_file_store_creates_parent_directories() {
        let dir = create_test_store_dir();
        let path = dir.path().join("nested").join("deeper").join("store.json");
        let mut store = FileStore::new(&path);

        store.set_item("k", "v").unwrap();

        assert!(path.exists());
        assert!(!dir.path().join("nested/deeper/store.json.tmp").exists());
    }

    #[test]
    fn test_file_store_remove_item() {
        let dir = create_test_store_dir();
        let mut store = FileStore::new(store_path(&dir));
        store.set_item("k", "v").unwrap();

        store.remove_item("k").unwrap();
        store.remove_item("never-set").unwrap();

        assert_eq!(store.get_item("k").unwrap(), None);
    }

    #[test]
    fn test_file_store_corrupt_file() {
        let dir = create_test_store_dir();
        let path = store_path(&dir);
        std::fs::write(&path, "this is not json").unwrap();

        let result = FileStore::new(&path).get_item("k");

        assert!(matches!(result, Err(StorageError::CorruptStore { .. })));
    }

    #[test]
    fn test_save_then_load_round_trip() {
        let mut store = MemoryStore::new();
        let doc = sample_doc();

        save_document(&mut store, &doc).unwrap();
        let loaded = load_document(&store).unwrap().unwrap();

        assert_eq!(loaded.blocks(), doc.blocks());
    }

    #[test]
    fn test_save_overwrites_previous_value() {
        let mut store = MemoryStore::new();
        save_document(&mut store, &Document::from_plain_text("first")).unwrap();

        save_document(&mut store, &Document::from_plain_text("second")).unwrap();

        let loaded = load_document(&store).unwrap().unwrap();
        assert_eq!(loaded.plain_text(), "second");
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_saved_value_is_raw_json() {
        let mut store = MemoryStore::new();
        save_document(&mut store, &sample_doc()).unwrap();

        let json = store.get_item(EDITOR_CONTENT_KEY).unwrap().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["blocks"][0]["key"], "head1");
        assert_eq!(value["blocks"][0]["inlineStyleRanges"][0]["style"], "header-one");
        assert_eq!(value["entityMap"], serde_json::json!({}));
    }

    #[test]
    fn test_load_without_saved_content() {
        let store = MemoryStore::new();
        assert!(load_document(&store).unwrap().is_none());
    }

    #[test]
    fn test_load_malformed_content() {
        let mut store = MemoryStore::new();
        store.set_item(EDITOR_CONTENT_KEY, "{\"blocks\": 7}").unwrap();

        let result = load_document(&store);

        match result {
            Err(StorageError::MalformedSnapshot { key, .. }) => {
                assert_eq!(key, EDITOR_CONTENT_KEY);
            }
            other => panic!("expected malformed snapshot, got {other:?}"),
        }
    }

    #[test]
    fn test_load_rejects_bad_style_range() {
        let mut store = MemoryStore::new();
        store
            .set_item(
                EDITOR_CONTENT_KEY,
                r#"{"blocks":[{"key":"k","text":"ab","inlineStyleRanges":[{"offset":0,"length":9,"style":"BOLD"}]}]}"#,
            )
            .unwrap();

        let result = load_document(&store);

        assert!(matches!(
            result,
            Err(StorageError::MalformedSnapshot {
                source: RawError::StyleRangeOutOfBounds { .. },
                ..
            })
        ));
    }

    #[test]
    fn test_file_store_round_trip() {
        let dir = create_test_store_dir();
        let mut store = FileStore::new(store_path(&dir));

        save_document(&mut store, &sample_doc()).unwrap();
        let loaded = load_document(&FileStore::new(store_path(&dir)))
            .unwrap()
            .unwrap();

        assert_eq!(loaded.blocks(), sample_doc().blocks());
    }
}
