use std::fs;
use std::path::{Path, PathBuf};

use hubspot_form_source::{ContentNode, NodeSink, SourceError};

/// Writes each node to `<dir>/<id>.json`.
pub struct DirectorySink {
    dir: PathBuf,
    written: Vec<PathBuf>,
}

impl DirectorySink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            written: Vec::new(),
        }
    }

    pub fn written(&self) -> &[PathBuf] {
        &self.written
    }

    fn path_for(&self, id: &str) -> PathBuf {
        let file_name: String = id
            .chars()
            .map(|ch| if ch.is_ascii_alphanumeric() || ch == '-' || ch == '_' { ch } else { '_' })
            .collect();
        self.dir.join(format!("{file_name}.json"))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl NodeSink for DirectorySink {
    fn create_node(&mut self, node: ContentNode) -> Result<(), SourceError> {
        let path = self.path_for(&node.id);
        let contents = serde_json::to_string_pretty(&node)?;
        fs::write(&path, contents)?;
        self.written.push(path);
        Ok(())
    }
}
