use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::prefs::{PreferenceStore, LANGUAGE_KEY};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Language {
    #[default]
    #[serde(rename = "en")]
    English,
    #[serde(rename = "hi")]
    Hindi,
}

impl Language {
    pub fn code(self) -> &'static str {
        match self {
            Language::English => "en",
            Language::Hindi => "hi",
        }
    }

    /// Text shown on the language button.
    pub fn label(self) -> String {
        self.code().to_ascii_uppercase()
    }

    pub fn toggled(self) -> Self {
        match self {
            Language::English => Language::Hindi,
            Language::Hindi => Language::English,
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Language {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "en" => Ok(Language::English),
            "hi" => Ok(Language::Hindi),
            other => Err(format!("unknown language '{other}'")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LanguageController {
    language: Language,
}

impl LanguageController {
    pub fn init<S>(store: &S) -> Self
    where
        S: PreferenceStore + ?Sized,
    {
        let language = store
            .get(LANGUAGE_KEY)
            .and_then(|raw| match raw.parse::<Language>() {
                Ok(language) => Some(language),
                Err(err) => {
                    tracing::warn!(%err, "ignoring saved language");
                    None
                }
            })
            .unwrap_or_default();
        Self { language }
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn label(&self) -> String {
        self.language.label()
    }

    pub fn toggle<S>(&mut self, store: &mut S) -> Language
    where
        S: PreferenceStore + ?Sized,
    {
        self.language = self.language.toggled();
        store.set(LANGUAGE_KEY, self.language.code());
        tracing::debug!(language = %self.language, "language toggled");
        self.language
    }
}
