//! Language type: a content language validated against the registry.

use crate::i18n::LanguageRegistry;
use anyhow::{bail, Result};

/// A validated Language Selector.
///
/// Only codes present in the registry can be turned into a `Language`; the
/// localization engine itself works on raw codes so that callers can pass
/// whatever they received.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Language {
    /// ISO 639-1 language code ("en" or "hi")
    code: &'static str,
}

impl Language {
    pub const ENGLISH: Language = Language { code: "en" };

    pub const HINDI: Language = Language { code: "hi" };

    /// Create a Language from a language code string.
    ///
    /// # Returns
    /// * `Ok(Language)` if the code is supported
    /// * `Err` if the code is unknown
    pub fn from_code(code: &str) -> Result<Language> {
        match LanguageRegistry::get().get_by_code(code) {
            Some(config) => Ok(Language { code: config.code }),
            None => bail!("Unknown language code: '{}'", code),
        }
    }

    /// Interpret a raw `lang` query value.
    ///
    /// Anything that is not exactly a supported code means "no localization
    /// requested" and yields `None`.
    pub fn from_query(raw: Option<&str>) -> Option<Language> {
        raw.and_then(|code| Language::from_code(code).ok())
    }

    /// The ultimate fallback language (English).
    pub fn canonical() -> Language {
        let config = LanguageRegistry::get().canonical();
        Language { code: config.code }
    }

    pub fn code(&self) -> &'static str {
        self.code
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code)
    }
}
