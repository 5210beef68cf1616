//! Glob-based statement file discovery.
//!
//! Supports `**` (zero or more directories), `*`, `?`, `[...]`, `[!...]` and
//! `{a,b}` alternation. The wildcard-free directory prefix of the pattern is
//! walked with `walkdir`; the rest is compiled to an anchored regex and
//! matched against each file's path relative to that prefix.

use std::path::{Path, PathBuf};

use regex::Regex;
use tracing::debug;
use walkdir::WalkDir;

use crate::error::{Error, Result};

const WILDCARDS: [char; 4] = ['*', '?', '[', '{'];

/// A compiled glob pattern.
#[derive(Debug, Clone)]
pub struct Glob {
    pattern: String,
    root: PathBuf,
    matcher: Option<Regex>,
}

impl Glob {
    /// Compile a glob pattern.
    pub fn new(pattern: &str) -> Result<Self> {
        let parts: Vec<&str> = pattern.split('/').collect();
        let Some(first_wild) = parts.iter().position(|p| p.contains(WILDCARDS)) else {
            // No wildcards: the pattern names a single file.
            return Ok(Self {
                pattern: pattern.to_string(),
                root: PathBuf::from(pattern),
                matcher: None,
            });
        };

        let prefix = parts[..first_wild].join("/");
        let root = if !prefix.is_empty() {
            PathBuf::from(prefix)
        } else if pattern.starts_with('/') {
            PathBuf::from("/")
        } else {
            PathBuf::from(".")
        };

        let rest = parts[first_wild..].join("/");
        let regex = translate(&rest).map_err(|reason| Error::pattern(pattern, reason))?;
        let matcher = Regex::new(&regex).map_err(|e| Error::pattern(pattern, e.to_string()))?;

        Ok(Self {
            pattern: pattern.to_string(),
            root,
            matcher: Some(matcher),
        })
    }

    /// The pattern this glob was compiled from.
    pub fn as_str(&self) -> &str {
        &self.pattern
    }

    /// Directory the walk starts from (or the file, for literal patterns).
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Whether a path relative to [`Glob::root`] matches.
    pub fn matches_relative(&self, relative: &Path) -> bool {
        match &self.matcher {
            Some(matcher) => matcher.is_match(&to_slash(relative)),
            None => relative.as_os_str().is_empty(),
        }
    }

    /// Walk the filesystem and return every matching file, sorted.
    pub fn walk(&self) -> Result<Vec<PathBuf>> {
        if self.matcher.is_none() {
            let metadata = std::fs::metadata(&self.root).map_err(|source| Error::Discovery {
                root: self.root.clone(),
                source,
            })?;
            return Ok(if metadata.is_file() {
                vec![self.root.clone()]
            } else {
                Vec::new()
            });
        }

        let mut matches = Vec::new();
        for entry in WalkDir::new(&self.root).follow_links(true) {
            let entry = entry.map_err(|e| Error::Discovery {
                root: self.root.clone(),
                source: e.into(),
            })?;

            if !entry.file_type().is_file() {
                continue;
            }

            let Ok(relative) = entry.path().strip_prefix(&self.root) else {
                continue;
            };
            if self.matches_relative(relative) {
                matches.push(entry.into_path());
            }
        }

        matches.sort();
        debug!(
            "Glob '{}' matched {} file(s) under {}",
            self.pattern,
            matches.len(),
            self.root.display()
        );
        Ok(matches)
    }
}

/// Resolve a glob pattern to a sorted list of files.
pub fn discover(pattern: &str) -> Result<Vec<PathBuf>> {
    Glob::new(pattern)?.walk()
}

fn to_slash(path: &Path) -> String {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

/// Translate the wildcard part of a glob into an anchored regex.
fn translate(glob: &str) -> std::result::Result<String, String> {
    let mut out = String::from("^");
    let mut chars = glob.chars().peekable();
    let mut brace_depth = 0usize;

    while let Some(c) = chars.next() {
        match c {
            '*' => {
                if chars.peek() == Some(&'*') {
                    chars.next();
                    if chars.peek() == Some(&'/') {
                        chars.next();
                        out.push_str("(?:.*/)?");
                    } else {
                        out.push_str(".*");
                    }
                } else {
                    out.push_str("[^/]*");
                }
            }
            '?' => out.push_str("[^/]"),
            '[' => {
                out.push('[');
                if matches!(chars.peek(), Some('!') | Some('^')) {
                    chars.next();
                    out.push('^');
                }
                let mut closed = false;
                let mut first = true;
                while let Some(c) = chars.next() {
                    match c {
                        ']' if !first => {
                            closed = true;
                            break;
                        }
                        '\\' | '[' | ']' | '&' | '~' => {
                            out.push('\\');
                            out.push(c);
                        }
                        _ => out.push(c),
                    }
                    first = false;
                }
                if !closed {
                    return Err("unclosed '['".to_string());
                }
                out.push(']');
            }
            '{' => {
                brace_depth += 1;
                out.push_str("(?:");
            }
            '}' => {
                if brace_depth == 0 {
                    return Err("unmatched '}'".to_string());
                }
                brace_depth -= 1;
                out.push(')');
            }
            ',' if brace_depth > 0 => out.push('|'),
            _ => out.push_str(&regex::escape(&c.to_string())),
        }
    }

    if brace_depth > 0 {
        return Err("unclosed '{'".to_string());
    }

    out.push('$');
    Ok(out)
}
