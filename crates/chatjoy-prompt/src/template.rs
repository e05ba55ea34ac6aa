//! Core prompt template trait

use crate::{Language, PromptError, Result};

/// A named template with one variant per language
///
/// Variables are passed as `serde_json::Value` so the trait stays dyn-compatible.
pub trait PromptTemplate: Send + Sync {
    fn name(&self) -> &str;

    fn languages(&self) -> Vec<Language>;

    fn supports_language(&self, lang: &Language) -> bool {
        self.languages().contains(lang)
    }

    /// Render the variant for `lang`, failing if it does not exist
    fn render(&self, lang: &Language, vars: &serde_json::Value) -> Result<String>;

    /// Render `lang`, or fall back to Korean, then English, then any variant
    fn render_with_fallback(&self, lang: &Language, vars: &serde_json::Value) -> Result<String> {
        if self.supports_language(lang) {
            return self.render(lang, vars);
        }

        for fallback in [Language::Korean, Language::English] {
            if self.supports_language(&fallback) {
                return self.render(&fallback, vars);
            }
        }

        let first = self
            .languages()
            .into_iter()
            .next()
            .ok_or_else(|| PromptError::NoLanguageAvailable(self.name().to_string()))?;

        self.render(&first, vars)
    }

    fn raw_template(&self, lang: &Language) -> Option<&str>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::HashMap;

    struct FixedTemplate {
        variants: HashMap<Language, String>,
    }

    impl FixedTemplate {
        fn with(pairs: &[(Language, &str)]) -> Self {
            Self {
                variants: pairs
                    .iter()
                    .map(|(l, s)| (l.clone(), (*s).to_string()))
                    .collect(),
            }
        }
    }

    impl PromptTemplate for FixedTemplate {
        fn name(&self) -> &str {
            "fixed"
        }

        fn languages(&self) -> Vec<Language> {
            self.variants.keys().cloned().collect()
        }

        fn render(&self, lang: &Language, _vars: &serde_json::Value) -> Result<String> {
            self.variants
                .get(lang)
                .cloned()
                .ok_or_else(|| PromptError::TemplateNotFound {
                    name: "fixed".to_string(),
                    language: lang.code().to_string(),
                })
        }

        fn raw_template(&self, lang: &Language) -> Option<&str> {
            self.variants.get(lang).map(String::as_str)
        }
    }

    #[test]
    fn test_fallback_prefers_korean() {
        let t = FixedTemplate::with(&[(Language::English, "Hi"), (Language::Korean, "안녕")]);
        let out = t
            .render_with_fallback(&Language::Other("ja".to_string()), &json!({}))
            .unwrap();
        assert_eq!(out, "안녕");
    }

    #[test]
    fn test_fallback_to_english_then_any() {
        let t = FixedTemplate::with(&[(Language::English, "Hi")]);
        assert_eq!(
            t.render_with_fallback(&Language::Korean, &json!({})).unwrap(),
            "Hi"
        );

        let t = FixedTemplate::with(&[(Language::Other("ja".to_string()), "こんにちは")]);
        assert_eq!(
            t.render_with_fallback(&Language::Korean, &json!({})).unwrap(),
            "こんにちは"
        );
    }

    #[test]
    fn test_fallback_without_variants_fails() {
        let t = FixedTemplate::with(&[]);
        assert!(t.render_with_fallback(&Language::Korean, &json!({})).is_err());
    }
}
