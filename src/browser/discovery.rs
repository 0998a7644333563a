//! Chrome/Chromium executable discovery.
//!
//! Probes the platform's default install locations first, then the executable
//! search path. An explicit override (typically a portable Chrome for Testing
//! build) is only used when nothing is installed.

use std::path::{Path, PathBuf};

use tracing::{info, warn};

/// Executable names looked up on the search path, in preference order.
const PATH_EXECUTABLES: &[&str] = &["google-chrome", "chromium", "chromium-browser", "chrome"];

/// Environment variable that supplies an override executable.
pub const CHROME_ENV: &str = "DSPACE_HARVEST_CHROME";

/// Default install locations for the current platform.
#[cfg(target_os = "windows")]
pub fn default_locations() -> Vec<PathBuf> {
    let program_files =
        std::env::var("PROGRAMFILES").unwrap_or_else(|_| "C:\\Program Files".to_string());
    let program_files_x86 = std::env::var("PROGRAMFILES(X86)")
        .unwrap_or_else(|_| "C:\\Program Files (x86)".to_string());
    let local_app_data = std::env::var("LOCALAPPDATA").unwrap_or_default();

    let mut paths = Vec::new();
    for vendor in [["Google", "Chrome"], ["Chromium", ""]] {
        for root in [&program_files, &program_files_x86, &local_app_data] {
            let mut path = PathBuf::from(root);
            for part in vendor.iter().filter(|p| !p.is_empty()) {
                path.push(part);
            }
            path.push("Application");
            path.push("chrome.exe");
            paths.push(path);
        }
    }
    paths
}

/// Default install locations for the current platform.
#[cfg(target_os = "macos")]
pub fn default_locations() -> Vec<PathBuf> {
    vec![
        PathBuf::from("/Applications/Google Chrome.app/Contents/MacOS/Google Chrome"),
        PathBuf::from("/Applications/Chromium.app/Contents/MacOS/Chromium"),
    ]
}

/// Default install locations for the current platform.
#[cfg(not(any(target_os = "windows", target_os = "macos")))]
pub fn default_locations() -> Vec<PathBuf> {
    [
        "/usr/bin/google-chrome",
        "/usr/local/bin/google-chrome",
        "/usr/bin/google-chrome-stable",
        "/usr/local/bin/google-chrome-stable",
        "/usr/bin/chromium",
        "/usr/bin/chromium-browser",
        "/usr/local/bin/chromium",
        "/usr/local/bin/chromium-browser",
        "/snap/bin/chromium",
        "/opt/google/chrome/chrome",
        "/opt/google/chrome/google-chrome",
    ]
    .iter()
    .map(PathBuf::from)
    .collect()
}

/// Check that a path is a file we are allowed to execute.
pub fn is_valid_executable(path: &Path) -> bool {
    path.is_file() && has_execute_permission(path)
}

#[cfg(unix)]
fn has_execute_permission(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    path.metadata()
        .map(|m| m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

// Execute permission is not meaningful on Windows
#[cfg(not(unix))]
fn has_execute_permission(_path: &Path) -> bool {
    true
}

/// Locate an installed Chrome/Chromium, honoring `override_path` as a fallback.
///
/// Returns `None` (with a warning) when nothing usable is found, in which case
/// the launcher lets chromiumoxide apply its own lookup.
pub fn find_chrome_executable(override_path: Option<&Path>) -> Option<PathBuf> {
    resolve_executable(&default_locations(), |name| which::which(name).ok(), override_path)
}

/// Discovery logic with injectable candidates and search-path lookup.
pub fn resolve_executable<F>(
    candidates: &[PathBuf],
    lookup: F,
    override_path: Option<&Path>,
) -> Option<PathBuf>
where
    F: Fn(&str) -> Option<PathBuf>,
{
    if let Some(path) = candidates.iter().find(|p| is_valid_executable(p)) {
        info!("Found Chrome at: {}", path.display());
        return Some(path.clone());
    }

    for &name in PATH_EXECUTABLES {
        if let Some(path) = lookup(name) {
            info!("Found Chrome in PATH: {}", path.display());
            return Some(path);
        }
    }

    if let Some(path) = override_path {
        let expanded = PathBuf::from(shellexpand::tilde(&path.to_string_lossy()).as_ref());
        if is_valid_executable(&expanded) {
            info!("Using portable Chrome at: {}", expanded.display());
            return Some(expanded);
        }
        warn!(
            "Portable Chrome path '{}' does not exist or is not executable",
            expanded.display()
        );
    }

    warn!("Chrome executable not found; falling back to the automation layer's default lookup");
    None
}
