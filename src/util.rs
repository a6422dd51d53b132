use std::path::PathBuf;

/// Expands a leading `~` in a path to the user's home directory.
/// Also normalizes path separators for the current OS.
pub fn expand_tilde(path: &str) -> String {
    let result = if path.starts_with("~/") || path == "~" {
        match dirs::home_dir() {
            Some(home) if path.len() > 2 => home.join(&path[2..]).to_string_lossy().to_string(),
            Some(home) => home.to_string_lossy().to_string(),
            None => path.to_string(),
        }
    } else {
        path.to_string()
    };
    if cfg!(windows) {
        result.replace('/', "\\")
    } else {
        result
    }
}

/// Root of everything the shell keeps on disk (`~/.bluehearts`).
pub fn app_home() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".bluehearts"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[cfg(not(windows))]
    fn test_expand_tilde_leaves_absolute_paths() {
        assert_eq!(expand_tilde("/var/lib/bluehearts"), "/var/lib/bluehearts");
    }

    #[test]
    #[cfg(not(windows))]
    fn test_expand_tilde_resolves_home() {
        if let Some(home) = dirs::home_dir() {
            assert_eq!(expand_tilde("~/storage"), home.join("storage").to_string_lossy());
            assert_eq!(expand_tilde("~"), home.to_string_lossy());
        }
    }
}
