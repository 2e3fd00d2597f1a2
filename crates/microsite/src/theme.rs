use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::prefs::{PreferenceStore, THEME_KEY};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    /// Icon class for the toggle button; it shows the theme you would switch to.
    pub fn icon(self) -> &'static str {
        match self {
            Theme::Dark => "fa-sun",
            Theme::Light => "fa-moon",
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Theme {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            other => Err(format!("unknown theme '{other}'")),
        }
    }
}

pub fn is_night(hour: u32) -> bool {
    hour >= 20 || hour <= 6
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThemeController {
    theme: Theme,
    /// Last system colour scheme seen, so repeated reports are not changes.
    system_dark: bool,
}

impl ThemeController {
    /// Picks the starting theme: a saved preference wins, otherwise dark when
    /// the system asks for it or it is night at `hour`.
    pub fn init<S>(store: &S, prefers_dark: bool, hour: u32) -> Self
    where
        S: PreferenceStore + ?Sized,
    {
        let theme = match saved_theme(store) {
            Some(saved) => saved,
            None if prefers_dark || is_night(hour) => Theme::Dark,
            None => Theme::Light,
        };
        Self {
            theme,
            system_dark: prefers_dark,
        }
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn icon(&self) -> &'static str {
        self.theme.icon()
    }

    pub fn toggle<S>(&mut self, store: &mut S) -> Theme
    where
        S: PreferenceStore + ?Sized,
    {
        self.theme = self.theme.toggled();
        store.set(THEME_KEY, self.theme.as_str());
        tracing::debug!(theme = %self.theme, "theme toggled");
        self.theme
    }

    /// Follows a system colour-scheme change unless the user chose a theme.
    /// A report equal to the last known scheme is not a change. Returns
    /// whether the theme changed.
    pub fn system_changed<S>(&mut self, store: &S, prefers_dark: bool) -> bool
    where
        S: PreferenceStore + ?Sized,
    {
        if prefers_dark == self.system_dark {
            return false;
        }
        self.system_dark = prefers_dark;
        if saved_theme(store).is_some() {
            return false;
        }
        let next = if prefers_dark { Theme::Dark } else { Theme::Light };
        let changed = next != self.theme;
        self.theme = next;
        changed
    }
}

fn saved_theme<S>(store: &S) -> Option<Theme>
where
    S: PreferenceStore + ?Sized,
{
    let raw = store.get(THEME_KEY)?;
    match raw.parse() {
        Ok(theme) => Some(theme),
        Err(err) => {
            tracing::warn!(%err, "ignoring saved theme");
            None
        }
    }
}
