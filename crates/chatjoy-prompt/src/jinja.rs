//! MiniJinja-backed templates

use crate::{Language, PromptError, PromptTemplate, Result};
use minijinja::Environment;
use std::collections::HashMap;

/// A prompt template rendered with MiniJinja
pub struct JinjaTemplate {
    name: String,
    templates: HashMap<Language, String>,
}

impl JinjaTemplate {
    pub fn builder(name: impl Into<String>) -> JinjaTemplateBuilder {
        JinjaTemplateBuilder::new(name)
    }

    /// Create a Korean-only template
    pub fn new(name: impl Into<String>, korean: impl Into<String>) -> Result<Self> {
        Self::builder(name).korean(korean).build()
    }

    /// Create with English and Korean variants
    pub fn bilingual(
        name: impl Into<String>,
        english: impl Into<String>,
        korean: impl Into<String>,
    ) -> Result<Self> {
        Self::builder(name).english(english).korean(korean).build()
    }

}


impl PromptTemplate for JinjaTemplate {
    fn name(&self) -> &str {
        &self.name
    }

    fn languages(&self) -> Vec<Language> {
        self.templates.keys().cloned().collect()
    }

    fn render(&self, lang: &Language, vars: &serde_json::Value) -> Result<String> {
        let source = self
            .templates
            .get(lang)
            .ok_or_else(|| PromptError::TemplateNotFound {
                name: self.name.clone(),
                language: lang.code().to_string(),
            })?;

        let env = Environment::new();
        let value = minijinja::value::Value::from_serialize(vars);

        env.render_str(source, value)
            .map_err(|e| PromptError::RenderError {
                name: self.name.clone(),
                detail: e.to_string(),
            })
    }

    fn raw_template(&self, lang: &Language) -> Option<&str> {
        self.templates.get(lang).map(String::as_str)
    }
}

impl std::fmt::Debug for JinjaTemplate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JinjaTemplate")
            .field("name", &self.name)
            .field("languages", &self.templates.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// Builder for [`JinjaTemplate`]
pub struct JinjaTemplateBuilder {
    name: String,
    templates: HashMap<Language, String>,
}

impl JinjaTemplateBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            templates: HashMap::new(),
        }
    }

    pub fn template(mut self, lang: Language, content: impl Into<String>) -> Self {
        self.templates.insert(lang, content.into());
        self
    }

    pub fn korean(self, content: impl Into<String>) -> Self {
        self.template(Language::Korean, content)
    }

    pub fn english(self, content: impl Into<String>) -> Self {
        self.template(Language::English, content)
    }

    /// Build the template, checking that every variant parses
    pub fn build(self) -> Result<JinjaTemplate> {
        if self.templates.is_empty() {
            return Err(PromptError::NoTemplatesProvided(self.name));
        }

        let env = Environment::new();
        for (lang, content) in &self.templates {
            env.template_from_str(content)
                .map_err(|e| PromptError::TemplateParseFailed {
                    name: self.name.clone(),
                    language: lang.code().to_string(),
                    detail: e.to_string(),
                })?;
        }

        Ok(JinjaTemplate {
            name: self.name,
            templates: self.templates,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_bilingual_render() {
        let t = JinjaTemplate::bilingual("ask", "Analyze {{ name }}", "{{ name }} 분석").unwrap();

        let ko = t
            .render(&Language::Korean, &json!({ "name": "카카오" }))
            .unwrap();
        assert_eq!(ko, "카카오 분석");

        let en = t
            .render(&Language::English, &json!({ "name": "Kakao" }))
            .unwrap();
        assert_eq!(en, "Analyze Kakao");
    }


    #[test]
    fn test_conditional_block() {
        let t = JinjaTemplate::new(
            "rsi",
            "{% if rsi is none %}RSI 없음{% else %}RSI {{ rsi }}{% endif %}",
        )
        .unwrap();

        assert_eq!(
            t.render(&Language::Korean, &json!({ "rsi": null })).unwrap(),
            "RSI 없음"
        );
        assert_eq!(
            t.render(&Language::Korean, &json!({ "rsi": 55 })).unwrap(),
            "RSI 55"
        );
    }

    #[test]
    fn test_build_errors() {
        assert!(JinjaTemplate::builder("empty").build().is_err());
        assert!(JinjaTemplate::new("broken", "{{ unclosed").is_err());
    }

    #[test]
    fn test_missing_variant() {
        let t = JinjaTemplate::new("ko-only", "안녕").unwrap();
        assert!(t.render(&Language::English, &json!({})).is_err());
        assert_eq!(t.raw_template(&Language::Korean), Some("안녕"));
    }
}
