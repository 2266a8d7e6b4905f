// src/commands/destroy.rs
use std::path::{Path, PathBuf};

use crate::commands::registry::{remove_from_registry, RegistryRemoval, RegistryStore};
use crate::data_struct::EnvironmentRef;
use crate::error::{VirtphpError, VirtphpResult};
use crate::file_store::FileStore;

/// Tears down one environment: validate, delete the tree, drop it from the environment list.
pub struct Destroyer<'a, S: FileStore + ?Sized> {
    store: &'a S,
    home_dir: PathBuf,
    env: EnvironmentRef,
}

/// Outcome of both cleanup steps. Neither step is skipped because the other failed.
#[derive(Debug)]
pub struct TeardownReport {
    pub structure: VirtphpResult<()>,
    pub registry: VirtphpResult<RegistryRemoval>,
}

impl TeardownReport {
    /// First failure wins; a failure of the registry step after a failed removal is logged.
    pub fn into_result(self) -> VirtphpResult<RegistryRemoval> {
        match (self.structure, self.registry) {
            (Ok(()), registry) => registry,
            (Err(e), Ok(_)) => Err(e),
            (Err(e), Err(registry_err)) => {
                tracing::error!("{}", registry_err);
                Err(e)
            }
        }
    }
}

impl<'a, S: FileStore + ?Sized> Destroyer<'a, S> {
    pub fn new(store: &'a S, home_dir: impl Into<PathBuf>, root_path: Option<&str>) -> Self {
        Self {
            store,
            home_dir: home_dir.into(),
            env: EnvironmentRef::new(root_path),
        }
    }

    pub fn root_path(&self) -> &str {
        self.env.root_path()
    }

    pub fn set_root_path(&mut self, path: &str) {
        self.env.set_root_path(path);
    }

    pub fn home_dir(&self) -> &Path {
        &self.home_dir
    }

    /// Refuse anything that is not an existing directory holding a `.virtphp` marker.
    pub fn validate(&self) -> VirtphpResult<()> {
        if !self.store.exists(self.env.path()) {
            return Err(VirtphpError::NotFound(self.env.path().to_path_buf()));
        }

        if !self.store.exists(&self.env.marker_path()) {
            return Err(VirtphpError::NotManaged(self.env.path().to_path_buf()));
        }

        Ok(())
    }

    /// Delete the environment tree. Only call after `validate` succeeded.
    pub fn remove_structure(&self) -> VirtphpResult<()> {
        tracing::info!("Removing directory structure");
        self.store.remove(self.env.path())
    }

    pub fn remove_from_list(&self) -> VirtphpResult<RegistryRemoval> {
        let registry = RegistryStore::new(self.store, &self.home_dir);
        remove_from_registry(&registry, &self.env)
    }

    /// Run both cleanup steps and capture each outcome. Failures are left to the caller to report.
    pub fn teardown(&self) -> TeardownReport {
        TeardownReport {
            structure: self.remove_structure(),
            registry: self.remove_from_list(),
        }
    }

    /// `Ok(false)` when the target is rejected, `Ok(true)` once it is gone and unlisted.
    pub fn execute(&self) -> VirtphpResult<bool> {
        if let Err(e) = self.validate() {
            tracing::error!("{}", e);
            return Ok(false);
        }

        self.teardown().into_result()?;

        Ok(true)
    }
}
