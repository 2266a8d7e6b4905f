// src/commands/registry.rs
use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::commands::global::environments_file;
use crate::data_struct::{EnvironmentList, EnvironmentRef};
use crate::error::{VirtphpError, VirtphpResult};
use crate::file_store::FileStore;

/// The shared `environments.json`, read and written as a whole document.
pub struct RegistryStore<'a, S: FileStore + ?Sized> {
    store: &'a S,
    path: PathBuf,
}

/// What `remove_from_registry` did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryRemoval {
    /// No environment list on disk; nothing was read or written.
    NoRegistry,
    Removed(String),
    NotListed(String),
}

impl<'a, S: FileStore + ?Sized> RegistryStore<'a, S> {
    pub fn new(store: &'a S, home_dir: &Path) -> Self {
        Self {
            store,
            path: environments_file(home_dir),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.store.exists(&self.path)
    }

    pub fn load(&self) -> VirtphpResult<EnvironmentList> {
        let data = self.store.read_file(&self.path)?;
        let corrupt = |source| VirtphpError::RegistryCorrupt {
            path: self.path.clone(),
            source,
        };

        match serde_json::from_slice::<Value>(&data).map_err(corrupt)? {
            // An emptied list may have been written out as `[]`.
            Value::Array(items) if items.is_empty() => Ok(EnvironmentList::default()),
            other => serde_json::from_value(other).map_err(corrupt),
        }
    }

    pub fn save(&self, list: &EnvironmentList) -> VirtphpResult<()> {
        let data = serde_json::to_vec(list)?;
        self.store
            .write_file(&self.path, &data)
            .map_err(|e| match e {
                VirtphpError::WriteFailed { path, source } => {
                    VirtphpError::RegistryWriteFailed { path, source }
                }
                other => other,
            })
    }
}

/// Drop `env` from the environment list, keyed by its derived name.
///
/// The stored path is not compared with `env`'s root path. A missing list or a missing
/// entry both count as success; the list is still rewritten in the latter case.
pub fn remove_from_registry<S: FileStore + ?Sized>(
    registry: &RegistryStore<'_, S>,
    env: &EnvironmentRef,
) -> VirtphpResult<RegistryRemoval> {
    tracing::info!("Removing environment from list");

    if !registry.exists() {
        tracing::debug!("no environment list at {}", registry.path().display());
        return Ok(RegistryRemoval::NoRegistry);
    }

    let mut list = registry.load()?;
    let name = env.name();

    let outcome = if list.remove(&name).is_some() {
        tracing::info!("Found path and removed from list. {}", name);
        RegistryRemoval::Removed(name)
    } else {
        tracing::info!("No matching environments in list archive. {}", name);
        RegistryRemoval::NotListed(name)
    };

    registry.save(&list)?;

    Ok(outcome)
}
