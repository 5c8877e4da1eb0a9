//! Icon assets for DAG nodes.
//!
//! A fixed vocabulary of vector icons is read from disk once and kept as an
//! immutable snapshot for the lifetime of the process. A missing or
//! unreadable file degrades to empty markup for that name; it is logged but
//! never fatal, so a broken asset install still renders a usable graph.

use std::collections::HashMap;
use std::path::Path;

use tracing::{debug, warn};

/// The fixed icon vocabulary: one per step status plus the two artifact kinds
pub const ICON_NAMES: [&str; 7] = [
    "failed",
    "completed",
    "cached",
    "initializing",
    "running",
    "database",
    "dataflow",
];

/// Immutable name-to-markup snapshot
#[derive(Debug, Clone)]
pub struct IconSet {
    icons: HashMap<&'static str, String>,
}

impl IconSet {
    /// Load the full vocabulary from `dir`, expecting `<name>.svg` per icon
    pub fn load(dir: &Path) -> Self {
        let mut icons = HashMap::new();
        for name in ICON_NAMES {
            let path = dir.join(format!("{name}.svg"));
            let markup = match std::fs::read_to_string(&path) {
                Ok(markup) => markup.trim().to_string(),
                Err(e) => {
                    warn!(icon = name, path = %path.display(), error = %e, "Icon asset unavailable");
                    String::new()
                }
            };
            icons.insert(name, markup);
        }
        debug!(dir = %dir.display(), "Icon set loaded");
        Self { icons }
    }

    /// An all-empty icon set, for tests and headless use
    pub fn empty() -> Self {
        Self {
            icons: ICON_NAMES.iter().map(|&name| (name, String::new())).collect(),
        }
    }

    /// Markup for a named icon; unknown names fall back to empty
    pub fn get(&self, name: &str) -> &str {
        self.icons.get(name).map(String::as_str).unwrap_or("")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_load_with_missing_files_yields_empty() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("completed.svg"),
            "<svg><circle r=\"4\"/></svg>\n",
        )
        .unwrap();

        let icons = IconSet::load(dir.path());
        assert_eq!(icons.get("completed"), "<svg><circle r=\"4\"/></svg>");
        // The other six are missing and degrade to empty markup
        assert_eq!(icons.get("failed"), "");
        assert_eq!(icons.get("dataflow"), "");
    }

    #[test]
    fn test_unknown_name_is_empty() {
        let icons = IconSet::empty();
        assert_eq!(icons.get("no-such-icon"), "");
    }
}
