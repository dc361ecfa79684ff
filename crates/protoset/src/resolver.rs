//! Import resolution: search roots, transitive closure, ordering.
//!
//! Depth-first traversal from the entry file. Files are keyed by the
//! logical import string they were reached by; the first visit parses,
//! later visits are no-ops, and a file already being visited (a cycle)
//! is skipped, so traversal always terminates. Output is post-order —
//! dependencies before dependants, the entry file last — which is the
//! order lowering expects.
//!
//! A missing import is not fatal: one line goes to the diagnostic
//! sink, the import is skipped, and the dependency entry still appears
//! in the lowered descriptor for downstream tooling to notice.

use std::path::{Path, PathBuf};

use indexmap::IndexSet;
use tracing::{debug, warn};

use crate::ast::ProtoFile;
use crate::compile::parse;
use crate::error::{Error, ResolveError};

/// File loader probing a list of root directories in order.
///
/// Import paths are logical, slash-separated names, not filesystem
/// paths; `..` segments are rejected before any probing.
#[derive(Debug, Clone)]
pub struct SearchPath {
    roots: Vec<PathBuf>,
}

impl SearchPath {
    pub fn new(roots: Vec<PathBuf>) -> Self {
        Self { roots }
    }

    pub fn roots(&self) -> &[PathBuf] {
        &self.roots
    }

    /// Resolve a logical import path to file contents. The first root
    /// holding a readable file wins.
    pub fn open(&self, logical: &str) -> Result<String, ResolveError> {
        if Path::new(logical)
            .components()
            .any(|c| matches!(c, std::path::Component::ParentDir))
        {
            return Err(ResolveError::InvalidPath {
                path: logical.to_string(),
            });
        }
        for root in &self.roots {
            let candidate = root.join(logical);
            if let Ok(contents) = std::fs::read_to_string(&candidate) {
                debug!(path = logical, root = %root.display(), "resolved import");
                return Ok(contents);
            }
        }
        Err(ResolveError::NotFound {
            path: logical.to_string(),
            roots_tried: self.roots.clone(),
        })
    }
}

/// Parse the entry file and its transitive imports.
///
/// `sink` receives one human-readable line per import that could not
/// be resolved; the function still succeeds in that case. Lex and
/// parse failures in any visited file abort the whole traversal.
pub fn read_protos(
    search: &SearchPath,
    entry_name: &str,
    entry_source: &str,
    sink: &mut dyn FnMut(&str),
) -> Result<Vec<ProtoFile>, Error> {
    let mut visited = IndexSet::new();
    visited.insert(entry_name.to_string());
    let mut files = Vec::new();
    visit(search, entry_name, entry_source, &mut visited, &mut files, sink)?;
    Ok(files)
}

fn visit(
    search: &SearchPath,
    name: &str,
    source: &str,
    visited: &mut IndexSet<String>,
    files: &mut Vec<ProtoFile>,
    sink: &mut dyn FnMut(&str),
) -> Result<(), Error> {
    let file = parse(name, source)?;
    for import in file.imports() {
        if visited.contains(&import.path) {
            continue;
        }
        visited.insert(import.path.clone());
        match search.open(&import.path) {
            Ok(contents) => visit(search, &import.path, &contents, visited, files, sink)?,
            Err(err) => {
                warn!(path = import.path.as_str(), "unresolved import");
                sink(&err.to_string());
            }
        }
    }
    files.push(file);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write(dir: &Path, name: &str, contents: &str) {
        let path = dir.join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, contents).unwrap();
    }

    #[test]
    fn test_search_path_probes_roots_in_order() {
        let first = tempfile::tempdir().unwrap();
        let second = tempfile::tempdir().unwrap();
        write(first.path(), "a.proto", "// from first");
        write(second.path(), "a.proto", "// from second");
        let search = SearchPath::new(vec![
            first.path().to_path_buf(),
            second.path().to_path_buf(),
        ]);
        assert_eq!(search.open("a.proto").unwrap(), "// from first");
    }

    #[test]
    fn test_search_path_not_found() {
        let root = tempfile::tempdir().unwrap();
        let search = SearchPath::new(vec![root.path().to_path_buf()]);
        let err = search.open("missing.proto").unwrap_err();
        assert!(matches!(err, ResolveError::NotFound { .. }));
        assert!(err.to_string().contains("missing.proto"));
    }

    #[test]
    fn test_search_path_rejects_parent_segments() {
        let root = tempfile::tempdir().unwrap();
        let search = SearchPath::new(vec![root.path().to_path_buf()]);
        let err = search.open("../escape.proto").unwrap_err();
        assert!(matches!(err, ResolveError::InvalidPath { .. }));
    }

    #[test]
    fn test_read_protos_post_order_entry_last() {
        let root = tempfile::tempdir().unwrap();
        write(root.path(), "leaf.proto", "syntax = \"proto3\";");
        write(
            root.path(),
            "mid.proto",
            "syntax = \"proto3\"; import \"leaf.proto\";",
        );
        let search = SearchPath::new(vec![root.path().to_path_buf()]);
        let entry = "syntax = \"proto3\"; import \"mid.proto\";";
        let mut diagnostics = Vec::new();
        let files = read_protos(&search, "entry.proto", entry, &mut |line| {
            diagnostics.push(line.to_string())
        })
        .unwrap();
        let names: Vec<_> = files.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, ["leaf.proto", "mid.proto", "entry.proto"]);
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_read_protos_deduplicates_shared_imports() {
        let root = tempfile::tempdir().unwrap();
        write(root.path(), "shared.proto", "syntax = \"proto3\";");
        write(
            root.path(),
            "a.proto",
            "syntax = \"proto3\"; import \"shared.proto\";",
        );
        write(
            root.path(),
            "b.proto",
            "syntax = \"proto3\"; import \"shared.proto\";",
        );
        let search = SearchPath::new(vec![root.path().to_path_buf()]);
        let entry = "import \"a.proto\"; import \"b.proto\";";
        let files = read_protos(&search, "entry.proto", entry, &mut |_| {}).unwrap();
        let names: Vec<_> = files.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, ["shared.proto", "a.proto", "b.proto", "entry.proto"]);
    }

    #[test]
    fn test_read_protos_reports_missing_and_continues() {
        let root = tempfile::tempdir().unwrap();
        let search = SearchPath::new(vec![root.path().to_path_buf()]);
        let entry = "import \"missing.proto\"; message M {}";
        let mut diagnostics = Vec::new();
        let files = read_protos(&search, "entry.proto", entry, &mut |line| {
            diagnostics.push(line.to_string())
        })
        .unwrap();
        assert_eq!(files.len(), 1);
        assert_eq!(diagnostics.len(), 1);
        assert!(diagnostics[0].contains("missing.proto"));
    }

    #[test]
    fn test_read_protos_tolerates_cycles() {
        let root = tempfile::tempdir().unwrap();
        write(
            root.path(),
            "a.proto",
            "syntax = \"proto3\"; import \"b.proto\";",
        );
        write(
            root.path(),
            "b.proto",
            "syntax = \"proto3\"; import \"a.proto\";",
        );
        let search = SearchPath::new(vec![root.path().to_path_buf()]);
        let entry = "import \"a.proto\";";
        let files = read_protos(&search, "entry.proto", entry, &mut |_| {}).unwrap();
        let names: Vec<_> = files.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, ["b.proto", "a.proto", "entry.proto"]);
    }
}
