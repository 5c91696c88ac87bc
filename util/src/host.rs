//! Host platform utility functions

use std::path::PathBuf;

/// Name of the environment variable giving the software root directory.
pub const SW_ROOT_ENV_VAR: &str = "BIPED_SW_ROOT";

/// Get the root directory of the software from the environment.
///
/// Parameter files and session directories are resolved relative to this
/// root.
pub fn get_biped_sw_root() -> Result<PathBuf, std::env::VarError> {
    let root = std::env::var(SW_ROOT_ENV_VAR)?;
    Ok(PathBuf::from(root))
}
