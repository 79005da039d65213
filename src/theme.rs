//! Theme values: the logical mode a consumer is in and the concrete mode
//! that actually gets rendered.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ThemeError;

/// The user-facing theme mode.
///
/// `Auto` is a logical state only. It never reaches the document, which
/// always carries a [`ColorMode`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    /// Follow the operating system.
    #[default]
    Auto,
    Dark,
    Light,
}

impl Theme {
    /// Returns the string used for storage and the document attribute.
    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Auto => "auto",
            Theme::Dark => "dark",
            Theme::Light => "light",
        }
    }

    /// Interprets a persisted preference.
    ///
    /// Only the exact strings `"dark"` and `"light"` count as an explicit
    /// choice. Anything else, including absence, means [`Theme::Auto`].
    ///
    /// ```rust
    /// use expo_theme::Theme;
    ///
    /// assert_eq!(Theme::from_preference(Some("dark")), Theme::Dark);
    /// assert_eq!(Theme::from_preference(Some("Dark")), Theme::Auto);
    /// assert_eq!(Theme::from_preference(None), Theme::Auto);
    /// ```
    pub fn from_preference(value: Option<&str>) -> Self {
        match value {
            Some("dark") => Theme::Dark,
            Some("light") => Theme::Light,
            _ => Theme::Auto,
        }
    }

    /// The renderable mode, or `None` for [`Theme::Auto`].
    pub fn concrete(self) -> Option<ColorMode> {
        match self {
            Theme::Auto => None,
            Theme::Dark => Some(ColorMode::Dark),
            Theme::Light => Some(ColorMode::Light),
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Theme {
    type Err = ThemeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "auto" => Ok(Theme::Auto),
            "dark" => Ok(Theme::Dark),
            "light" => Ok(Theme::Light),
            other => Err(ThemeError::InvalidTheme(other.to_string())),
        }
    }
}

/// A concrete, rendered color mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorMode {
    Light,
    Dark,
}

impl ColorMode {
    pub fn as_str(self) -> &'static str {
        match self {
            ColorMode::Light => "light",
            ColorMode::Dark => "dark",
        }
    }
}

impl fmt::Display for ColorMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<ColorMode> for Theme {
    fn from(mode: ColorMode) -> Self {
        match mode {
            ColorMode::Light => Theme::Light,
            ColorMode::Dark => Theme::Dark,
        }
    }
}

/// Maps a "prefers dark" media-query result to the mode to render.
///
/// Shared by live change notifications and the one-off snapshot so both
/// call sites agree.
pub fn resolve_for_match(matches: bool) -> ColorMode {
    if matches {
        ColorMode::Dark
    } else {
        ColorMode::Light
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_theme_parse_exact_names() {
        assert_eq!("auto".parse::<Theme>().unwrap(), Theme::Auto);
        assert_eq!("dark".parse::<Theme>().unwrap(), Theme::Dark);
        assert_eq!("light".parse::<Theme>().unwrap(), Theme::Light);
    }

    #[test]
    fn test_theme_parse_rejects_unknown() {
        let err = "DARK".parse::<Theme>().unwrap_err();
        assert_eq!(err, ThemeError::InvalidTheme("DARK".into()));
    }

    #[test]
    fn test_from_preference_ignores_garbage() {
        assert_eq!(Theme::from_preference(Some("light")), Theme::Light);
        assert_eq!(Theme::from_preference(Some("auto")), Theme::Auto);
        assert_eq!(Theme::from_preference(Some("")), Theme::Auto);
        assert_eq!(Theme::from_preference(Some("sepia")), Theme::Auto);
    }

    #[test]
    fn test_concrete() {
        assert_eq!(Theme::Auto.concrete(), None);
        assert_eq!(Theme::Dark.concrete(), Some(ColorMode::Dark));
        assert_eq!(Theme::Light.concrete(), Some(ColorMode::Light));
    }

    #[test]
    fn test_resolve_for_match() {
        assert_eq!(resolve_for_match(true), ColorMode::Dark);
        assert_eq!(resolve_for_match(false), ColorMode::Light);
    }

    #[test]
    fn test_serde_lowercase() {
        assert_eq!(serde_json::to_string(&Theme::Dark).unwrap(), "\"dark\"");
        let parsed: Theme = serde_json::from_str("\"auto\"").unwrap();
        assert_eq!(parsed, Theme::Auto);
    }

    #[test]
    fn test_display_matches_as_str() {
        assert_eq!(Theme::Light.to_string(), "light");
        assert_eq!(ColorMode::Dark.to_string(), "dark");
        assert_eq!(Theme::from(ColorMode::Dark), Theme::Dark);
    }
}
