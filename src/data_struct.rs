// src/data_struct.rs
use std::path::{self, Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::commands::global::VIRTPHP_DIR;

/// A teardown target. Built fresh for each invocation and never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvironmentRef {
    root_path: String,
}

impl EnvironmentRef {
    /// `None` targets the current directory.
    pub fn new(root_path: Option<&str>) -> Self {
        let mut env = Self {
            root_path: String::new(),
        };
        env.set_root_path(root_path.unwrap_or("."));
        env
    }

    pub fn root_path(&self) -> &str {
        &self.root_path
    }

    pub fn set_root_path(&mut self, path: &str) {
        self.root_path = path.to_string();
    }

    pub fn path(&self) -> &Path {
        Path::new(&self.root_path)
    }

    /// `<root>/.virtphp`, whose presence marks a managed environment.
    pub fn marker_path(&self) -> PathBuf {
        self.path().join(VIRTPHP_DIR)
    }

    /// Key of this environment in the environment list.
    pub fn name(&self) -> String {
        derive_name(&self.root_path)
    }
}

/// Last non-empty segment of `root_path` once a single trailing separator is dropped.
///
/// Purely syntactic: `envs/myenv` and `/abs/envs/myenv/` both give `myenv`, while `.`
/// stays `.`. Returns an empty string when the path has no segment at all (e.g. `/`).
pub fn derive_name(root_path: &str) -> String {
    let trimmed = match root_path.chars().last() {
        Some(c) if path::is_separator(c) => &root_path[..root_path.len() - c.len_utf8()],
        _ => root_path,
    };

    trimmed
        .split(path::is_separator)
        .filter(|segment| !segment.is_empty())
        .last()
        .unwrap_or_default()
        .to_string()
}

/// Contents of `environments.json`: environment name to the path it was registered with.
///
/// Values are kept as raw JSON and written back untouched.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EnvironmentList(Map<String, Value>);

impl EnvironmentList {
    /// Drop `name`, keeping the remaining entries in file order.
    pub fn remove(&mut self, name: &str) -> Option<Value> {
        self.0.shift_remove(name)
    }
}
