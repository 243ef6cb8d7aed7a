//! Reading and parsing the source file of a call site.

use std::{
    env, fs,
    path::{Path, PathBuf},
};

use tree_sitter::{Parser, Tree};

use crate::IntrospectError;

/// A Rust source file together with its syntax tree.
///
/// Each instance is parsed from scratch; nothing is cached between calls.
pub struct SourceFile {
    path: PathBuf,
    text: String,
    tree: Tree,
}

impl SourceFile {
    /// Resolves `file` as recorded in a call site, reads it and parses it.
    ///
    /// Relative paths are tried against the current directory and then every
    /// ancestor of it. rustc records paths relative to the directory cargo
    /// ran it from, which for workspace members is the workspace root rather
    /// than the package directory tests run in.
    pub fn load(file: &str) -> Result<Self, IntrospectError> {
        let path = resolve(Path::new(file));
        let text = fs::read_to_string(&path).map_err(|source| {
            IntrospectError::SourceUnreadable {
                path: path.clone(),
                source,
            }
        })?;
        Self::parse(path, text)
    }

    /// Parses already loaded source text.
    ///
    /// Fails if the parser produced no tree or the tree contains error or
    /// missing nodes, e.g. because the file is saved mid-edit.
    pub fn parse(
        path: impl Into<PathBuf>,
        text: impl Into<String>,
    ) -> Result<Self, IntrospectError> {
        let path = path.into();
        let text = text.into();

        let mut parser = Parser::new();
        if let Err(error) = parser.set_language(&tree_sitter_rust::LANGUAGE.into()) {
            tracing::debug!(%error, "tree-sitter rejected the Rust grammar");
            return Err(IntrospectError::SourceUnparsable { path });
        }
        let Some(tree) = parser.parse(&text, None) else {
            return Err(IntrospectError::SourceUnparsable { path });
        };
        if tree.root_node().has_error() {
            return Err(IntrospectError::SourceUnparsable { path });
        }

        Ok(Self { path, text, tree })
    }

    /// The path the source was read from.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The full source text.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// The syntax tree of [`text`](Self::text).
    #[must_use]
    pub fn tree(&self) -> &Tree {
        &self.tree
    }
}

fn resolve(file: &Path) -> PathBuf {
    if file.is_absolute() {
        return file.to_path_buf();
    }
    match env::current_dir() {
        Ok(cwd) => resolve_from(&cwd, file),
        Err(_) => file.to_path_buf(),
    }
}

/// Looks for `file` in `cwd` and its ancestors.
///
/// A workspace root holding the file wins over any nearer directory, since
/// rustc records paths of workspace members relative to it. Otherwise the
/// nearest directory holding the file wins.
fn resolve_from(cwd: &Path, file: &Path) -> PathBuf {
    let mut nearest = None;
    for dir in cwd.ancestors() {
        let candidate = dir.join(file);
        if !candidate.is_file() {
            continue;
        }
        if is_workspace_root(dir) {
            return candidate;
        }
        nearest.get_or_insert(candidate);
    }
    nearest.unwrap_or_else(|| file.to_path_buf())
}

fn is_workspace_root(dir: &Path) -> bool {
    fs::read_to_string(dir.join("Cargo.toml"))
        .is_ok_and(|manifest| manifest.lines().any(|line| line.trim() == "[workspace]"))
}

impl std::fmt::Debug for SourceFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SourceFile")
            .field("path", &self.path)
            .field("len", &self.text.len())
            .finish_non_exhaustive()
    }
}
