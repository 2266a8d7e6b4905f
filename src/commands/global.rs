// src/commands/global.rs
use std::path::{Path, PathBuf};

use crate::error::{VirtphpError, VirtphpResult};

/// Marker directory inside every environment, and the per-user state directory under home.
pub const VIRTPHP_DIR: &str = ".virtphp";

pub const ENVIRONMENTS_FILE: &str = "environments.json";

/// Overrides the home directory used to locate the environment list.
pub const VIRTPHP_HOME_ENV_VAR: &str = "VIRTPHP_HOME";

/// Pick the home directory: explicit flag, then `VIRTPHP_HOME`, then the user's home.
pub fn resolve_home_dir(flag: Option<&Path>) -> VirtphpResult<PathBuf> {
    if let Some(home) = flag {
        return Ok(home.to_path_buf());
    }

    match std::env::var_os(VIRTPHP_HOME_ENV_VAR) {
        Some(home) if !home.is_empty() => Ok(PathBuf::from(home)),
        _ => dirs::home_dir().ok_or(VirtphpError::HomeDirNotFound),
    }
}

/// `<home>/.virtphp/environments.json`
pub fn environments_file(home_dir: &Path) -> PathBuf {
    home_dir.join(VIRTPHP_DIR).join(ENVIRONMENTS_FILE)
}
