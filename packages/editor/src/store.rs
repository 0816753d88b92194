//! # Collaborator Interfaces
//!
//! Pull-based boundaries to the world outside the core: document
//! persistence and the reusable-snippet registry. The core never subscribes
//! to ambient events; whoever owns a cache invalidates it themselves.

use crate::EditorError;
use pagecraft_model::{Node, Tree};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Stores and retrieves whole trees keyed by document name.
pub trait DocumentStore {
    fn load(&self, name: &str) -> Result<Tree, EditorError>;
    fn save(&self, name: &str, tree: &Tree) -> Result<(), EditorError>;
}

/// JSON-file document store: one `<name>.json` per document under a root
/// directory. The file content is the wire shape of [`Tree`].
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn document_path(&self, name: &str) -> PathBuf {
        self.root.join(format!("{}.json", name))
    }
}

impl DocumentStore for FileStore {
    fn load(&self, name: &str) -> Result<Tree, EditorError> {
        let content = std::fs::read_to_string(self.document_path(name))?;
        Ok(serde_json::from_str(&content)?)
    }

    fn save(&self, name: &str, tree: &Tree) -> Result<(), EditorError> {
        std::fs::create_dir_all(&self.root)?;
        let content = serde_json::to_string_pretty(tree)?;
        std::fs::write(self.document_path(name), content)?;
        Ok(())
    }
}

/// Resolves an opaque module identifier to a reusable subtree. The session
/// clones the result with fresh ids before inserting it.
pub trait ModuleRegistry {
    fn resolve(&self, module_id: &str) -> Option<Node>;
}

#[derive(Debug, Default)]
pub struct MemoryRegistry {
    modules: HashMap<String, Node>,
}

impl MemoryRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, module_id: impl Into<String>, subtree: Node) {
        self.modules.insert(module_id.into(), subtree);
    }
}

impl ModuleRegistry for MemoryRegistry {
    fn resolve(&self, module_id: &str) -> Option<Node> {
        self.modules.get(module_id).cloned()
    }
}
