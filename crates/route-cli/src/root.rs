use std::path::{Path, PathBuf};

/// Walk upward from `start` for a directory containing `marker`.
fn find_upward(start: &Path, marker: &str) -> Option<PathBuf> {
    start
        .ancestors()
        .find(|dir| dir.join(marker).is_dir())
        .map(Path::to_path_buf)
}

/// Resolve the workspace root.
///
/// Priority:
/// 1. `--root` flag / `ROUTE_ROOT` env var (passed in as `explicit`)
/// 2. Nearest ancestor of the cwd with `.route/`
/// 3. Nearest ancestor with `.git/`
/// 4. The cwd
pub fn resolve_root(explicit: Option<&Path>) -> PathBuf {
    if let Some(p) = explicit {
        return p.to_path_buf();
    }
    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    resolve_from(&cwd)
}

fn resolve_from(cwd: &Path) -> PathBuf {
    find_upward(cwd, route_core::paths::ROUTE_DIR)
        .or_else(|| find_upward(cwd, ".git"))
        .unwrap_or_else(|| cwd.to_path_buf())
}
