//! The statement registry: namespace → tag → SQL text.
//!
//! A [`Registry`] is built once, either from files matched by a glob pattern
//! or from in-memory sources, and is read-only afterwards. Lookups take a
//! dotted `namespace.tag` name and either return the SQL text or a named
//! error; a miss never degrades into an empty query string.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::glob;
use crate::parse::StatementFile;

/// What to do when two statement files map to the same namespace.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OnDuplicate {
    /// The later file replaces the earlier namespace entirely.
    #[default]
    Replace,
    /// The later file's tags are laid over the earlier ones.
    Merge,
    /// Construction fails.
    Reject,
}

/// Loaded statements, keyed by namespace.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    files: BTreeMap<String, StatementFile>,
}

/// Derive the namespace of a statement file: its file name up to the first `.`.
pub fn namespace_of(path: &Path) -> Option<&str> {
    let file_name = path.file_name()?.to_str()?;
    file_name.split('.').next().filter(|ns| !ns.is_empty())
}

/// Split `namespace.tag` on the first `.`.
pub fn split_name(name: &str) -> Result<(&str, &str)> {
    name.split_once('.')
        .filter(|(ns, tag)| !ns.is_empty() && !tag.is_empty())
        .ok_or_else(|| Error::malformed_name(name))
}

impl Registry {
    /// Load every statement file matching `pattern`, replacing duplicate
    /// namespaces in load order.
    pub fn load(pattern: &str) -> Result<Self> {
        Self::load_with(pattern, OnDuplicate::default())
    }

    /// Load every statement file matching `pattern`.
    ///
    /// Files are loaded in sorted path order. Any read or parse failure
    /// aborts loading.
    pub fn load_with(pattern: &str, on_duplicate: OnDuplicate) -> Result<Self> {
        let paths = glob::discover(pattern)?;
        if paths.is_empty() {
            warn!("No statement files matched '{}'", pattern);
        }

        let mut registry = Self::default();
        for path in paths {
            let Some(namespace) = namespace_of(&path).map(str::to_string) else {
                warn!("Skipping {}: no namespace in file name", path.display());
                continue;
            };

            let text = std::fs::read_to_string(&path).map_err(|source| Error::Read {
                path: path.clone(),
                source,
            })?;
            let file = StatementFile::parse(&text)
                .map_err(|source| Error::Parse {
                    origin: path.display().to_string(),
                    source,
                })?
                .with_origin(&path);

            debug!(
                "Loaded {} statement(s) into '{}' from {}",
                file.len(),
                namespace,
                path.display()
            );
            registry.insert(namespace, file, on_duplicate)?;
        }

        info!(
            "Loaded {} statement(s) in {} namespace(s) from '{}'",
            registry.len(),
            registry.files.len(),
            pattern
        );
        Ok(registry)
    }

    /// Build a registry from in-memory `(namespace, text)` pairs, e.g.
    /// files embedded with `include_str!`.
    pub fn from_sources<I, N, S>(sources: I, on_duplicate: OnDuplicate) -> Result<Self>
    where
        I: IntoIterator<Item = (N, S)>,
        N: Into<String>,
        S: AsRef<str>,
    {
        let mut registry = Self::default();
        for (namespace, text) in sources {
            let namespace = namespace.into();
            let file = StatementFile::parse(text.as_ref()).map_err(|source| Error::Parse {
                origin: namespace.clone(),
                source,
            })?;
            registry.insert(namespace, file, on_duplicate)?;
        }
        Ok(registry)
    }

    fn insert(
        &mut self,
        namespace: String,
        file: StatementFile,
        on_duplicate: OnDuplicate,
    ) -> Result<()> {
        let Some(existing) = self.files.get_mut(&namespace) else {
            self.files.insert(namespace, file);
            return Ok(());
        };

        let describe = |f: &StatementFile| match f.origin() {
            Some(path) => path.display().to_string(),
            None => "<memory>".to_string(),
        };

        match on_duplicate {
            OnDuplicate::Replace => {
                warn!(
                    "Namespace '{}' from {} replaced by {}",
                    namespace,
                    describe(&*existing),
                    describe(&file)
                );
                *existing = file;
            }
            OnDuplicate::Merge => {
                debug!(
                    "Merging {} into namespace '{}'",
                    describe(&file),
                    namespace
                );
                existing.merge(file);
            }
            OnDuplicate::Reject => {
                return Err(Error::DuplicateNamespace {
                    first: describe(&*existing),
                    second: describe(&file),
                    namespace,
                });
            }
        }
        Ok(())
    }

    /// Resolve `namespace.tag` to its SQL text.
    pub fn lookup(&self, name: &str) -> Result<&str> {
        let (namespace, tag) = split_name(name)?;
        self.files
            .get(namespace)
            .and_then(|file| file.get(tag))
            .ok_or_else(|| Error::not_found(name))
    }

    /// Whether `name` resolves.
    pub fn contains(&self, name: &str) -> bool {
        self.lookup(name).is_ok()
    }

    /// Statements of one namespace.
    pub fn file(&self, namespace: &str) -> Option<&StatementFile> {
        self.files.get(namespace)
    }

    /// Namespaces in sorted order.
    pub fn namespaces(&self) -> impl Iterator<Item = &str> {
        self.files.keys().map(String::as_str)
    }

    /// Every `namespace.tag`, sorted.
    pub fn names(&self) -> Vec<String> {
        self.files
            .iter()
            .flat_map(|(ns, file)| file.tags().map(move |tag| format!("{ns}.{tag}")))
            .collect()
    }

    /// Total number of statements across all namespaces.
    pub fn len(&self) -> usize {
        self.files.values().map(StatementFile::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
