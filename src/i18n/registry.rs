//! Content languages. Every bilingual field carries exactly these two keys,
//! and the order of the table is the order `select` falls back through.

/// Metadata for one content language.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguageConfig {
    /// Key used inside a bilingual field ("en", "hi")
    pub code: &'static str,

    /// English name, shown in the language picker
    pub name: &'static str,

    /// Name in the language itself
    pub native_name: &'static str,

    pub is_canonical: bool,
}

static LANGUAGES: [LanguageConfig; 2] = [
    LanguageConfig {
        code: "en",
        name: "English",
        native_name: "English",
        is_canonical: true,
    },
    LanguageConfig {
        code: "hi",
        name: "Hindi",
        native_name: "हिन्दी",
        is_canonical: false,
    },
];

static REGISTRY: LanguageRegistry = LanguageRegistry {
    languages: &LANGUAGES,
};

/// Read-only view over the language table.
pub struct LanguageRegistry {
    languages: &'static [LanguageConfig],
}

impl LanguageRegistry {
    pub fn get() -> &'static LanguageRegistry {
        &REGISTRY
    }

    /// Exact, case-sensitive lookup.
    pub fn get_by_code(&self, code: &str) -> Option<&'static LanguageConfig> {
        self.languages.iter().find(|lang| lang.code == code)
    }

    pub fn list_all(&self) -> &'static [LanguageConfig] {
        self.languages
    }

    pub fn fallback_codes(&self) -> impl Iterator<Item = &'static str> {
        self.languages.iter().map(|lang| lang.code)
    }

    /// # Panics
    /// Panics if the table has no canonical entry.
    pub fn canonical(&self) -> &'static LanguageConfig {
        self.languages
            .iter()
            .find(|lang| lang.is_canonical)
            .expect("language table must mark one canonical language")
    }
}
