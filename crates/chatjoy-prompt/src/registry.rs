//! Named templates with a current language

use crate::{Language, PromptError, PromptTemplate, Result};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// Templates by name plus the language used when the caller names none
#[derive(Clone, Default)]
pub struct PromptRegistry {
    templates: BTreeMap<String, Arc<dyn PromptTemplate>>,
    language: Language,
}

impl PromptRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_language(language: Language) -> Self {
        Self {
            templates: BTreeMap::new(),
            language,
        }
    }

    pub fn default_language(&self) -> Language {
        self.language.clone()
    }

    pub fn set_default_language(&mut self, language: Language) {
        self.language = language;
    }

    /// Returns the template previously registered under the same name
    pub fn register<T: PromptTemplate + 'static>(
        &mut self,
        template: T,
    ) -> Option<Arc<dyn PromptTemplate>> {
        self.templates
            .insert(template.name().to_string(), Arc::new(template))
    }

    pub fn get(&self, name: &str) -> Option<&Arc<dyn PromptTemplate>> {
        self.templates.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.templates.contains_key(name)
    }

    /// Render in the current language, falling back like
    /// [`PromptTemplate::render_with_fallback`]
    pub fn render(&self, name: &str, vars: &serde_json::Value) -> Result<String> {
        self.render_with_lang(name, &self.language, vars)
    }

    pub fn render_with_lang(
        &self,
        name: &str,
        language: &Language,
        vars: &serde_json::Value,
    ) -> Result<String> {
        self.get(name)
            .ok_or_else(|| PromptError::TemplateNotRegistered(name.to_string()))?
            .render_with_fallback(language, vars)
    }

    /// Registered names in sorted order
    pub fn list(&self) -> Vec<&str> {
        self.templates.keys().map(String::as_str).collect()
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}

impl fmt::Debug for PromptRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PromptRegistry")
            .field("language", &self.language)
            .field("templates", &self.list())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::JinjaTemplate;
    use serde_json::json;

    fn registry() -> PromptRegistry {
        let mut registry = PromptRegistry::new();
        registry.register(
            JinjaTemplate::bilingual("greet", "Hello, {{ who }}", "안녕하세요, {{ who }}").unwrap(),
        );
        registry
    }

    #[test]
    fn test_language_switch() {
        let mut registry = registry();
        assert_eq!(registry.default_language(), Language::Korean);
        assert_eq!(
            registry.render("greet", &json!({ "who": "철수" })).unwrap(),
            "안녕하세요, 철수"
        );

        registry.set_default_language(Language::English);
        assert_eq!(
            registry.render("greet", &json!({ "who": "Tom" })).unwrap(),
            "Hello, Tom"
        );
        assert_eq!(
            registry
                .render_with_lang("greet", &Language::Korean, &json!({ "who": "영희" }))
                .unwrap(),
            "안녕하세요, 영희"
        );
    }

    #[test]
    fn test_unregistered_template() {
        let err = registry().render("missing", &json!({})).unwrap_err();
        assert!(matches!(err, PromptError::TemplateNotRegistered(_)));
    }

    #[test]
    fn test_replace_and_list() {
        let mut registry = registry();
        assert!(registry.register(JinjaTemplate::new("greet", "v2").unwrap()).is_some());
        assert!(registry.register(JinjaTemplate::new("another", "x").unwrap()).is_none());

        assert_eq!(registry.render("greet", &json!({})).unwrap(), "v2");
        assert_eq!(registry.list(), vec!["another", "greet"]);
        assert_eq!(registry.len(), 2);
        assert!(registry.contains("another"));
        assert!(!registry.is_empty());
    }
}
