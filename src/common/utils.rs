//! Shared utility functions.

use std::path::Path;

/// Render a path for display, replacing the home directory with `~`.
pub fn private_path(path: &Path) -> String {
    if let Some(home) = dirs::home_dir()
        && let Ok(stripped) = path.strip_prefix(&home)
    {
        return format!("~/{}", stripped.display());
    }
    path.display().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_private_path_outside_home() {
        let path = PathBuf::from("/etc/nightfall/nightfall.toml");
        assert_eq!(private_path(&path), "/etc/nightfall/nightfall.toml");
    }

    #[test]
    fn test_private_path_inside_home() {
        if let Some(home) = dirs::home_dir() {
            let path = home.join(".config").join("nightfall.toml");
            assert_eq!(private_path(&path), "~/.config/nightfall.toml");
        }
    }
}
