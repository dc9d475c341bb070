use std::path::{Path, PathBuf};

use eyre::Result;

use crate::Error;

fn write_file(path: &Path, content: &str) -> std::result::Result<(), Error> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|source| Error::CreateDir {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    std::fs::write(path, content).map_err(|source| Error::Write {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::debug!(path = %path.display(), bytes = content.len(), "wrote file");
    Ok(())
}

/// Result of a write operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteResult {
    /// File was written
    Written,
    /// File was skipped (already exists)
    Skipped,
}

/// A rendered translation unit waiting to be written
#[derive(Debug, Clone)]
pub struct File {
    path: PathBuf,
    content: String,
    rules: FileRules,
}

impl File {
    /// Create a new file with the given path and content (default rules: always overwrite)
    pub fn new(path: impl Into<PathBuf>, content: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
            rules: FileRules::default(),
        }
    }

    /// Replace the rules used by [`File::write`].
    pub fn with_rules(mut self, rules: FileRules) -> Self {
        self.rules = rules;
        self
    }

    /// Get the file path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Get the file content, without the header
    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn rules(&self) -> &FileRules {
        &self.rules
    }

    /// Check if the file exists
    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// The exact text [`File::write`] puts on disk.
    pub fn render(&self) -> String {
        match &self.rules.header {
            Some(header) => format!("{header}{}", self.content),
            None => self.content.clone(),
        }
    }

    /// Write the file according to its rules
    pub fn write(&self) -> Result<WriteResult> {
        match self.rules.overwrite {
            Overwrite::Always => {
                write_file(&self.path, &self.render())?;
                Ok(WriteResult::Written)
            }
            Overwrite::IfMissing => {
                if self.exists() {
                    tracing::debug!(path = %self.path.display(), "skipped existing file");
                    Ok(WriteResult::Skipped)
                } else {
                    write_file(&self.path, &self.render())?;
                    Ok(WriteResult::Written)
                }
            }
        }
    }
}

/// Rules that determine how a file should be written
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRules {
    pub overwrite: Overwrite,
    /// Text written verbatim before the rendered unit, e.g. a banner comment.
    pub header: Option<String>,
}

impl FileRules {
    pub fn if_missing() -> Self {
        Self {
            overwrite: Overwrite::IfMissing,
            header: None,
        }
    }

    pub fn with_header(mut self, header: impl Into<String>) -> Self {
        self.header = Some(header.into());
        self
    }
}

/// How to handle existing files
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Overwrite {
    /// Always overwrite (generated code)
    Always,
    /// Only create if file doesn't exist (hand-edited stubs)
    IfMissing,
}

impl Default for FileRules {
    fn default() -> Self {
        Self {
            overwrite: Overwrite::Always,
            header: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;

    #[test]
    fn test_write_file_creates_parent_dirs() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("gen").join("include").join("api.h");

        write_file(&path, "int f(void);").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "int f(void);");
    }

    #[test]
    fn test_write_file_reports_path_on_failure() {
        let temp = TempDir::new().unwrap();
        let blocker = temp.path().join("blocker");
        fs::write(&blocker, "").unwrap();

        let err = write_file(&blocker.join("unit.c"), "x").unwrap_err();

        assert!(matches!(err, Error::CreateDir { .. }));
        assert_eq!(err.path(), &blocker);
    }

    #[test]
    fn test_file_write_always_overwrites() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("unit.c");
        fs::write(&path, "original").unwrap();

        let result = File::new(&path, "int x;").write().unwrap();

        assert_eq!(result, WriteResult::Written);
        assert_eq!(fs::read_to_string(&path).unwrap(), "int x;");
    }

    #[test]
    fn test_file_write_if_missing_skips_existing() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("stub.c");
        fs::write(&path, "hand written").unwrap();

        let file = File::new(&path, "generated").with_rules(FileRules::if_missing());
        let result = file.write().unwrap();

        assert_eq!(result, WriteResult::Skipped);
        assert_eq!(fs::read_to_string(&path).unwrap(), "hand written");
    }

    #[test]
    fn test_file_write_if_missing_creates_new() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("stub.c");

        let file = File::new(&path, "generated").with_rules(FileRules::if_missing());

        assert_eq!(file.write().unwrap(), WriteResult::Written);
        assert!(file.exists());
    }

    #[test]
    fn test_header_is_prepended() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("unit.h");

        let rules = FileRules::default().with_header("/* generated */\n");
        File::new(&path, "int x;").with_rules(rules).write().unwrap();

        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "/* generated */\nint x;"
        );
    }
}
