//! Light/dark theme preference.
//!
//! # Responsibility
//! - Hold the active theme as an explicit value passed to the shell.
//! - Persist the choice to a small JSON file when one is configured.
//!
//! # Invariants
//! - A missing preference file means the default theme, not an error.
//! - A toggle is only reported as applied once persistence succeeded.

use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Theme {
    Light,
    #[default]
    Dark,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }
}

impl Display for Theme {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Theme {
    type Err = ThemeError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "light" => Ok(Self::Light),
            "dark" => Ok(Self::Dark),
            other => Err(ThemeError::UnknownTheme(other.to_string())),
        }
    }
}

#[derive(Debug)]
pub enum ThemeError {
    UnknownTheme(String),
    Io { path: PathBuf, source: std::io::Error },
    Malformed { path: PathBuf, source: serde_json::Error },
}

impl Display for ThemeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownTheme(value) => {
                write!(f, "unknown theme `{value}`; expected light|dark")
            }
            Self::Io { path, source } => {
                write!(f, "theme preference io failed at `{}`: {source}", path.display())
            }
            Self::Malformed { path, source } => write!(
                f,
                "theme preference at `{}` is malformed: {source}",
                path.display()
            ),
        }
    }
}

impl Error for ThemeError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::UnknownTheme(_) => None,
            Self::Io { source, .. } => Some(source),
            Self::Malformed { source, .. } => Some(source),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct ThemeFile {
    theme: Theme,
}

/// Active theme plus optional backing file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThemePreference {
    theme: Theme,
    path: Option<PathBuf>,
}

impl ThemePreference {
    /// Preference kept only for the current process.
    pub fn in_memory(theme: Theme) -> Self {
        Self { theme, path: None }
    }

    /// Loads the preference stored at `path`, defaulting when absent.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, ThemeError> {
        let path = path.into();
        let theme = match std::fs::read_to_string(&path) {
            Ok(raw) => {
                let file: ThemeFile =
                    serde_json::from_str(&raw).map_err(|source| ThemeError::Malformed {
                        path: path.clone(),
                        source,
                    })?;
                file.theme
            }
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Theme::default(),
            Err(source) => return Err(ThemeError::Io { path, source }),
        };
        Ok(Self {
            theme,
            path: Some(path),
        })
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Switches light/dark and persists the result when file-backed.
    pub fn toggle(&mut self) -> Result<Theme, ThemeError> {
        self.set(self.theme.toggled())
    }

    pub fn set(&mut self, theme: Theme) -> Result<Theme, ThemeError> {
        if let Some(path) = self.path.as_deref() {
            if let Err(err) = persist(path, theme) {
                warn!("event=theme_set module=theme status=error error={err}");
                return Err(err);
            }
        }
        self.theme = theme;
        info!("event=theme_set module=theme status=ok theme={theme}");
        Ok(theme)
    }
}

fn persist(path: &Path, theme: Theme) -> Result<(), ThemeError> {
    let io_err = |source: std::io::Error| ThemeError::Io {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(io_err)?;
    }
    let body = serde_json::to_string(&ThemeFile { theme }).map_err(|source| {
        ThemeError::Malformed {
            path: path.to_path_buf(),
            source,
        }
    })?;
    std::fs::write(path, body).map_err(io_err)
}

#[cfg(test)]
mod tests {
    use super::{Theme, ThemeError, ThemePreference};

    #[test]
    fn default_theme_is_dark_and_toggles() {
        assert_eq!(Theme::default(), Theme::Dark);
        assert_eq!(Theme::Dark.toggled(), Theme::Light);
        assert_eq!(Theme::Light.toggled(), Theme::Dark);
    }

    #[test]
    fn parse_accepts_known_names_only() {
        assert_eq!(" LIGHT ".parse::<Theme>().unwrap(), Theme::Light);
        assert!(matches!(
            "sepia".parse::<Theme>(),
            Err(ThemeError::UnknownTheme(value)) if value == "sepia"
        ));
    }

    #[test]
    fn missing_file_loads_default_and_toggle_persists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prefs").join("theme.json");

        let mut pref = ThemePreference::load(&path).unwrap();
        assert_eq!(pref.theme(), Theme::Dark);
        assert_eq!(pref.toggle().unwrap(), Theme::Light);

        let reloaded = ThemePreference::load(&path).unwrap();
        assert_eq!(reloaded.theme(), Theme::Light);
    }

    #[test]
    fn malformed_file_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("theme.json");
        std::fs::write(&path, "{not json").unwrap();

        let err = ThemePreference::load(&path).unwrap_err();
        assert!(matches!(err, ThemeError::Malformed { .. }));
    }

    #[test]
    fn in_memory_toggle_never_touches_disk() {
        let mut pref = ThemePreference::in_memory(Theme::Light);
        assert_eq!(pref.toggle().unwrap(), Theme::Dark);
        assert!(pref.path().is_none());
    }
}
