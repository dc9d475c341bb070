//! A translation unit: one or more top levels rendered back to back.

use std::path::{Path, PathBuf};

use cemit_core::{CodeWriter, File, FileRules, WriteResult};
use eyre::{Result, WrapErr};

use crate::{Context, Emit, scope::TopLevelId};

/// A source or header file made of top-level containers.
///
/// ```
/// use cemit::{Context, Emit, SourceFile, StmtSink};
///
/// let mut cx = Context::c();
/// let file = SourceFile::new(&mut cx);
/// let int = cx.type_int();
/// let main = cx.top_level(file.first_top_level()).def_func("main", int, [], false);
/// let body = main.body(&mut cx);
/// let zero = cx.expr_int(0);
/// cx.func_scope(body).stmt_return(zero);
///
/// assert_eq!(file.to_code(&cx), "int main(){return 0;}\n\n");
/// ```
#[derive(Debug, Clone)]
pub struct SourceFile {
    top_levels: Vec<TopLevelId>,
}

impl SourceFile {
    /// A file with one empty top level.
    pub fn new(cx: &mut Context) -> Self {
        Self {
            top_levels: vec![cx.new_top_level()],
        }
    }

    pub fn first_top_level(&self) -> TopLevelId {
        self.top_levels[0]
    }

    /// Append another top level, rendered after the existing ones.
    pub fn add_top_level(&mut self, cx: &mut Context) -> TopLevelId {
        let top = cx.new_top_level();
        self.top_levels.push(top);
        top
    }

    pub fn top_levels(&self) -> &[TopLevelId] {
        &self.top_levels
    }

    /// The rendered unit, paired with a path and default rules.
    pub fn to_file(&self, cx: &Context, path: impl Into<PathBuf>) -> File {
        File::new(path, self.to_code(cx))
    }

    /// Render and write to `path`, replacing any existing file.
    pub fn write_to(&self, cx: &Context, path: impl AsRef<Path>) -> Result<WriteResult> {
        self.write_with(cx, path, FileRules::default())
    }

    /// Render and write to `path` following `rules`.
    #[tracing::instrument(level = "debug", skip_all, fields(path = %path.as_ref().display()))]
    pub fn write_with(
        &self,
        cx: &Context,
        path: impl AsRef<Path>,
        rules: FileRules,
    ) -> Result<WriteResult> {
        let path = path.as_ref();
        let file = self.to_file(cx, path).with_rules(rules);
        let result = file
            .write()
            .wrap_err_with(|| format!("failed to emit {} unit", cx.dialect().name()))?;
        tracing::debug!(?result, top_levels = self.top_levels.len(), "emitted unit");
        Ok(result)
    }
}

impl Emit for SourceFile {
    fn emit(&self, cx: &Context, w: &mut CodeWriter) {
        for top in &self.top_levels {
            top.emit(cx, w);
            w.push_newline();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DeclSink;
    use cemit_core::Overwrite;
    use tempfile::TempDir;

    #[test]
    fn test_top_levels_render_in_order() {
        let mut cx = Context::c();
        let mut file = SourceFile::new(&mut cx);
        let second = file.add_top_level(&mut cx);
        cx.top_level(second).def_raw("b");
        cx.top_level(file.first_top_level()).def_raw("a");

        assert_eq!(file.top_levels().len(), 2);
        assert_eq!(file.to_code(&cx), "a\n\nb\n\n");
    }

    #[test]
    fn test_write_to_creates_parent_dirs() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("gen/unit.c");
        let mut cx = Context::c();
        let file = SourceFile::new(&mut cx);
        cx.top_level(file.first_top_level()).def_raw("int x;");

        let result = file.write_to(&cx, &path).unwrap();

        assert_eq!(result, WriteResult::Written);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "int x;\n\n");
    }

    #[test]
    fn test_write_with_header_and_if_missing() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("unit.h");
        let mut cx = Context::c();
        let file = SourceFile::new(&mut cx);
        let rules = FileRules::if_missing().with_header("/* generated */\n");
        assert_eq!(rules.overwrite, Overwrite::IfMissing);

        let first = file.write_with(&cx, &path, rules.clone()).unwrap();
        let second = file.write_with(&cx, &path, rules).unwrap();

        assert_eq!(first, WriteResult::Written);
        assert_eq!(second, WriteResult::Skipped);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "/* generated */\n\n");
    }

    #[test]
    fn test_write_failure_names_dialect() {
        let temp = TempDir::new().unwrap();
        let blocker = temp.path().join("blocker");
        std::fs::write(&blocker, "").unwrap();
        let mut cx = Context::cxx();
        let file = SourceFile::new(&mut cx);

        let err = file.write_to(&cx, blocker.join("unit.cpp")).unwrap_err();

        assert!(err.to_string().contains("failed to emit C++ unit"));
    }
}
