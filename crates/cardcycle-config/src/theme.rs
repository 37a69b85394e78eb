use std::fmt;

use serde::{de::Deserializer, Deserialize, Serialize, Serializer};

/// Color scheme applied by front ends. Persisted as its CSS class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Theme {
    #[default]
    Dark,
    BlueDark,
    GreenDark,
    PurpleDark,
    OrangeDark,
    RedDark,
    Light,
    Blue,
    Green,
    Purple,
    Orange,
    Red,
}

/// Presentation attributes of a [`Theme`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ThemeInfo {
    pub class: &'static str,
    pub name: &'static str,
    pub primary_color: &'static str,
    pub background_color: &'static str,
}

const DARK_BACKGROUND: &str = "#121212";

impl Theme {
    pub const ALL: [Theme; 12] = [
        Theme::Dark,
        Theme::BlueDark,
        Theme::GreenDark,
        Theme::PurpleDark,
        Theme::OrangeDark,
        Theme::RedDark,
        Theme::Light,
        Theme::Blue,
        Theme::Green,
        Theme::Purple,
        Theme::Orange,
        Theme::Red,
    ];

    pub fn info(self) -> ThemeInfo {
        let (class, name, primary_color, background_color) = match self {
            Theme::Dark => ("dark-theme", "Dark", "#60a5fa", DARK_BACKGROUND),
            Theme::BlueDark => ("blue-dark-theme", "Dark Blue", "#0077b6", DARK_BACKGROUND),
            Theme::GreenDark => ("green-dark-theme", "Dark Green", "#4caf50", DARK_BACKGROUND),
            Theme::PurpleDark => ("purple-dark-theme", "Dark Purple", "#8e24aa", DARK_BACKGROUND),
            Theme::OrangeDark => ("orange-dark-theme", "Dark Orange", "#ff9800", DARK_BACKGROUND),
            Theme::RedDark => ("red-dark-theme", "Dark Red", "#e53935", DARK_BACKGROUND),
            Theme::Light => ("light-theme", "Light", "#3b82f6", "#f4f7fc"),
            Theme::Blue => ("blue-theme", "Blue", "#0077b6", "#e0f2f7"),
            Theme::Green => ("green-theme", "Green", "#4caf50", "#e6ffe6"),
            Theme::Purple => ("purple-theme", "Purple", "#8e24aa", "#f2e7f7"),
            Theme::Orange => ("orange-theme", "Orange", "#ff9800", "#fff4e6"),
            Theme::Red => ("red-theme", "Red", "#e53935", "#fbe9e7"),
        };
        ThemeInfo {
            class,
            name,
            primary_color,
            background_color,
        }
    }

    pub fn class(self) -> &'static str {
        self.info().class
    }

    /// Looks a theme up by CSS class, ignoring case and surrounding blanks.
    pub fn from_class(value: &str) -> Option<Self> {
        let wanted = value.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|theme| theme.class() == wanted)
    }

    pub fn is_dark(self) -> bool {
        self.info().background_color == DARK_BACKGROUND
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.info().name)
    }
}

impl Serialize for Theme {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.class())
    }
}

impl<'de> Deserialize<'de> for Theme {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Option::<String>::deserialize(deserializer)?;
        Ok(value
            .as_deref()
            .and_then(Theme::from_class)
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classes_are_unique_and_round_trip() {
        for theme in Theme::ALL {
            assert_eq!(Theme::from_class(theme.class()), Some(theme));
        }
        let mut classes: Vec<_> = Theme::ALL.iter().map(|theme| theme.class()).collect();
        classes.sort();
        classes.dedup();
        assert_eq!(classes.len(), Theme::ALL.len());
    }

    #[test]
    fn unknown_class_deserializes_to_default() {
        let theme: Theme = serde_json::from_str("\"neon-theme\"").unwrap();
        assert_eq!(theme, Theme::Dark);
        let theme: Theme = serde_json::from_str("null").unwrap();
        assert_eq!(theme, Theme::Dark);
        let theme: Theme = serde_json::from_str("\" Purple-Theme \"").unwrap();
        assert_eq!(theme, Theme::Purple);
    }

    #[test]
    fn dark_variants_share_background() {
        assert!(Theme::RedDark.is_dark());
        assert!(!Theme::Red.is_dark());
        assert_eq!(Theme::Light.info().primary_color, "#3b82f6");
        assert_eq!(Theme::BlueDark.to_string(), "Dark Blue");
    }
}
