//! Translation loader and i18n management
//!
//! Translations are flat JSON dictionaries keyed by the English display text,
//! one file per language (`{translations_dir}/{lang}.json`). Lookups that
//! miss fall back to the default language and finally to the input text, so
//! an untranslated label is shown as-is rather than failing.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};
use tracing::{debug, error, info, warn};

use crate::config::I18nConfig;
use crate::utils::errors::{MeditripError, Result};

/// Translation collaborator consumed by the view layer
pub trait Translator {
    fn t(&self, text: &str) -> String;
}

/// Passes text through unchanged
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityTranslator;

impl Translator for IdentityTranslator {
    fn t(&self, text: &str) -> String {
        text.to_string()
    }
}

/// Main internationalization manager
#[derive(Debug, Clone)]
pub struct I18n {
    /// Loaded translations by language code
    translations: HashMap<String, Map<String, Value>>,
    default_language: String,
    supported_languages: Vec<String>,
    /// Language used by [`Translator::t`]
    language: String,
    translations_dir: PathBuf,
}

impl I18n {
    /// Create a new I18n instance
    pub fn new(config: &I18nConfig) -> Self {
        Self {
            translations: HashMap::new(),
            default_language: config.default_language.clone(),
            supported_languages: config.supported_languages.clone(),
            language: config.default_language.clone(),
            translations_dir: PathBuf::from(&config.translations_dir),
        }
    }

    /// Load all translation files from the translations directory
    ///
    /// Missing files are tolerated for every language: untranslated text is
    /// rendered verbatim. A file that exists but cannot be parsed is an error
    /// for the default language only.
    pub fn load_translations(&mut self) -> Result<()> {
        if !self.translations_dir.exists() {
            warn!(dir = %self.translations_dir.display(), "Translations directory not found");
            return Ok(());
        }

        let supported_languages = self.supported_languages.clone();
        for lang_code in &supported_languages {
            let file_path = self.translations_dir.join(format!("{}.json", lang_code));

            if !file_path.exists() {
                debug!("Translation file not found: {}", file_path.display());
                continue;
            }

            match self.load_language_file(&file_path, lang_code) {
                Ok(count) => info!("Loaded {} translations for language: {}", count, lang_code),
                Err(e) => {
                    error!("Failed to load translations for {}: {}", lang_code, e);
                    if lang_code == &self.default_language {
                        return Err(MeditripError::Config(format!(
                            "Failed to load default language translations: {}",
                            e
                        )));
                    }
                }
            }
        }

        Ok(())
    }

    /// Load a single language file, returning the number of entries
    fn load_language_file(&mut self, file_path: &Path, lang_code: &str) -> Result<usize> {
        let content = std::fs::read_to_string(file_path)?;
        match serde_json::from_str::<Value>(&content)? {
            Value::Object(map) => {
                let count = map.len();
                self.translations.insert(lang_code.to_string(), map);
                Ok(count)
            }
            _ => Err(MeditripError::Config(format!(
                "Invalid translation file format for {}",
                lang_code
            ))),
        }
    }

    /// Translate `text` into `lang`
    pub fn translate(&self, text: &str, lang: &str) -> String {
        let effective_lang = self.effective_language(lang);

        self.lookup(text, effective_lang)
            .or_else(|| self.lookup(text, &self.default_language))
            .unwrap_or_else(|| text.to_string())
    }

    fn lookup(&self, text: &str, lang: &str) -> Option<String> {
        match self.translations.get(lang)?.get(text)? {
            Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Check if a language is supported
    fn is_language_supported(&self, lang: &str) -> bool {
        self.supported_languages.iter().any(|l| l == lang)
    }

    fn effective_language<'a>(&'a self, lang: &'a str) -> &'a str {
        if self.is_language_supported(lang) && self.translations.contains_key(lang) {
            lang
        } else {
            &self.default_language
        }
    }

    /// Switch the active language; unsupported codes select the default
    pub fn set_language(&mut self, locale: Option<&str>) -> &str {
        self.language = self.detect_user_language(locale);
        &self.language
    }

    /// Detect a supported language from a locale such as `en-US` or `ms_MY.UTF-8`
    fn detect_user_language(&self, locale: Option<&str>) -> String {
        if let Some(locale) = locale {
            let lang_code = locale
                .split(['-', '_', '.'])
                .next()
                .unwrap_or(locale)
                .to_lowercase();

            if self.is_language_supported(&lang_code) {
                return lang_code;
            }
        }

        self.default_language.clone()
    }
}

impl Translator for I18n {
    fn t(&self, text: &str) -> String {
        self.translate(text, &self.language)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_config(dir: &str) -> I18nConfig {
        I18nConfig {
            default_language: "en".to_string(),
            supported_languages: vec!["en".to_string(), "ms".to_string()],
            translations_dir: dir.to_string(),
        }
    }

    #[test]
    fn test_language_detection() {
        let i18n = I18n::new(&create_test_config("translations"));

        assert_eq!(i18n.detect_user_language(Some("en-US")), "en");
        assert_eq!(i18n.detect_user_language(Some("ms_MY.UTF-8")), "ms");
        assert_eq!(i18n.detect_user_language(Some("fr")), "en");
        assert_eq!(i18n.detect_user_language(None), "en");
    }

    #[test]
    fn test_missing_translation_returns_input() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("ms.json"), r#"{"Doctors": "Doktor", "Packages": "Pakej"}"#).unwrap();

        let mut i18n = I18n::new(&create_test_config(dir.path().to_str().unwrap()));
        i18n.load_translations().unwrap();
        assert_eq!(i18n.set_language(Some("ms")), "ms");

        assert_eq!(i18n.t("Doctors"), "Doktor");
        assert_eq!(i18n.t("Sunway Medical"), "Sunway Medical");
    }

    #[test]
    fn test_unloaded_language_falls_back_to_default() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("en.json"), r#"{"Home": "Home Page"}"#).unwrap();

        let mut i18n = I18n::new(&create_test_config(dir.path().to_str().unwrap()));
        i18n.load_translations().unwrap();
        i18n.set_language(Some("ms_MY.UTF-8"));

        assert_eq!(i18n.t("Home"), "Home Page");
    }

    #[test]
    fn test_load_from_directory() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("ms.json"), r#"{"Home": "Laman Utama"}"#).unwrap();

        let mut i18n = I18n::new(&create_test_config(dir.path().to_str().unwrap()));
        i18n.load_translations().unwrap();
        i18n.set_language(Some("ms"));

        assert_eq!(i18n.t("Home"), "Laman Utama");
    }

    #[test]
    fn test_corrupt_default_language_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("en.json"), "[1, 2").unwrap();

        let mut i18n = I18n::new(&create_test_config(dir.path().to_str().unwrap()));
        assert!(i18n.load_translations().is_err());
    }
}
