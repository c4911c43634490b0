//! Shared path manipulation utilities.

use std::env;
use std::path::{Component, Path, PathBuf};

/// Resolve a path named inside a config file to an absolute, normalized path.
///
/// `~/` expands to `$HOME`. Relative paths are anchored at the directory of
/// `config_file` when that file exists, otherwise at the current directory.
/// `..`/`.` components are resolved syntactically; the target need not exist.
pub fn resolve_config_path(path: &Path, config_file: &Path) -> PathBuf {
    let expanded = expand_home(path);
    if expanded.is_absolute() {
        return normalize_syntactic(&expanded);
    }

    let base = config_file
        .parent()
        .filter(|_| config_file.is_file())
        .map(Path::to_path_buf)
        .or_else(|| env::current_dir().ok());

    match base {
        Some(base) => normalize_syntactic(&base.join(expanded)),
        None => expanded,
    }
}

fn expand_home(path: &Path) -> PathBuf {
    if let Ok(rest) = path.strip_prefix("~")
        && let Some(home) = env::var_os("HOME")
    {
        return PathBuf::from(home).join(rest);
    }
    path.to_path_buf()
}

fn normalize_syntactic(path: &Path) -> PathBuf {
    let mut components = Vec::new();
    for component in path.components() {
        match component {
            Component::Prefix(..) | Component::RootDir | Component::Normal(_) => {
                components.push(component);
            }
            Component::CurDir => {}
            Component::ParentDir => {
                if let Some(Component::Normal(_)) = components.last() {
                    components.pop();
                }
            }
        }
    }
    components.into_iter().collect()
}
