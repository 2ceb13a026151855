//! Platform-specific preset locations.
//!
//! - Linux: `~/.config/inflato/presets/`
//! - macOS: `~/Library/Application Support/inflato/presets/`
//! - Windows: `%APPDATA%\inflato\presets\`

use std::path::{Path, PathBuf};

use crate::ConfigError;

const APP_NAME: &str = "inflato";
const PRESETS_SUBDIR: &str = "presets";

/// Returns the user presets directory.
///
/// Falls back to `./inflato/presets` if the config directory cannot be
/// determined.
pub fn user_presets_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_NAME)
        .join(PRESETS_SUBDIR)
}

/// Create the user presets directory if needed and return it.
pub fn ensure_user_presets_dir() -> Result<PathBuf, ConfigError> {
    let dir = user_presets_dir();
    if !dir.exists() {
        std::fs::create_dir_all(&dir).map_err(|e| ConfigError::create_dir(&dir, e))?;
    }
    Ok(dir)
}

/// Resolve a preset file.
///
/// `name` may be a path to an existing file, or a preset name (with or
/// without `.toml`) looked up in the user presets directory.
pub fn find_preset(name: &str) -> Option<PathBuf> {
    find_preset_in(name, &user_presets_dir())
}

pub(crate) fn find_preset_in(name: &str, dir: &Path) -> Option<PathBuf> {
    let path = PathBuf::from(name);
    if path.is_file() {
        return Some(path);
    }

    let filename = if name.ends_with(".toml") {
        name.to_string()
    } else {
        format!("{name}.toml")
    };
    let candidate = dir.join(filename);
    candidate.is_file().then_some(candidate)
}

/// All `.toml` files in the user presets directory, sorted by path.
///
/// Returns an empty list if the directory is missing or unreadable.
pub fn list_user_presets() -> Vec<PathBuf> {
    list_presets_in_dir(&user_presets_dir())
}

/// All `.toml` files in `dir`, sorted by path.
pub fn list_presets_in_dir(dir: &Path) -> Vec<PathBuf> {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return Vec::new();
    };

    let mut presets: Vec<PathBuf> = entries
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|path| path.is_file() && path.extension().is_some_and(|ext| ext == "toml"))
        .collect();
    presets.sort();
    presets
}

/// The preset name for a file path (its stem).
///
/// ```rust
/// use inflato_config::paths::preset_name_from_path;
/// use std::path::Path;
///
/// assert_eq!(preset_name_from_path(Path::new("/p/loud.toml")), Some("loud".to_string()));
/// ```
pub fn preset_name_from_path(path: &Path) -> Option<String> {
    path.file_stem().and_then(|s| s.to_str()).map(str::to_string)
}
