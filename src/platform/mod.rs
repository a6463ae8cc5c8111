// Cobrowse platform paths
// Config: $XDG_CONFIG_HOME/cobrowse or ~/.config/cobrowse (Linux and other Unix)
//         ~/Library/Application Support/Cobrowse (macOS)
//         %APPDATA%/Cobrowse (Windows)

use std::env;
use std::path::PathBuf;

/// Returns the platform-specific configuration directory for Cobrowse.
pub fn get_config_dir() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        let appdata = env::var("APPDATA")
            .unwrap_or_else(|_| String::from("C:\\Users\\Default\\AppData\\Roaming"));
        PathBuf::from(appdata).join("Cobrowse")
    }
    #[cfg(target_os = "macos")]
    {
        home_dir()
            .join("Library")
            .join("Application Support")
            .join("Cobrowse")
    }
    #[cfg(not(any(target_os = "windows", target_os = "macos")))]
    {
        match env::var("XDG_CONFIG_HOME") {
            Ok(xdg) if !xdg.is_empty() => PathBuf::from(xdg).join("cobrowse"),
            _ => home_dir().join(".config").join("cobrowse"),
        }
    }
}

#[cfg(not(target_os = "windows"))]
fn home_dir() -> PathBuf {
    PathBuf::from(env::var("HOME").unwrap_or_else(|_| String::from("/tmp")))
}
