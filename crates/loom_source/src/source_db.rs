//! Central store of artifact text for a build session.

use crate::file_id::FileId;
use crate::location::Location;
use crate::source_file::SourceFile;
use std::collections::HashMap;

/// Owns the text of every artifact and include file known to a build,
/// addressable by name.
pub struct SourceDb {
    files: Vec<SourceFile>,
    by_name: HashMap<String, FileId>,
}

impl SourceDb {
    /// Creates an empty source database.
    pub fn new() -> Self {
        Self {
            files: Vec::new(),
            by_name: HashMap::new(),
        }
    }

    /// Adds an in-memory file. Adding a name twice replaces the earlier
    /// content for later lookups.
    pub fn add_source(&mut self, name: impl Into<String>, content: String) -> FileId {
        let name = name.into();
        let id = FileId::from_raw(self.files.len() as u32);
        self.by_name.insert(name.clone(), id);
        self.files.push(SourceFile::new(id, name, content));
        id
    }

    /// Finds a file by the name it was registered under.
    pub fn find(&self, name: &str) -> Option<&SourceFile> {
        self.by_name
            .get(name)
            .map(|id| &self.files[id.as_raw() as usize])
    }

    /// Returns the line of text containing `location`'s start, if the file is known.
    pub fn line_text(&self, location: &Location) -> Option<&str> {
        let file = self.find(&location.filename)?;
        file.content
            .lines()
            .nth(location.begin_line.saturating_sub(1) as usize)
    }
}

impl Default for SourceDb {
    fn default() -> Self {
        Self::new()
    }
}
