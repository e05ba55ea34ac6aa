//! Prompt templates for chatjoy
//!
//! Korean is the primary language of the bot, English is the secondary one.
//! Templates are written in Jinja2 syntax and rendered with MiniJinja.
//!
//! ```
//! use chatjoy_prompt::{JinjaTemplate, Language, PromptRegistry};
//! use serde_json::json;
//!
//! let mut registry = PromptRegistry::with_language(Language::Korean);
//! registry.register(
//!     JinjaTemplate::bilingual("ask", "Analyze {{ name }}", "{{ name }} 분석").unwrap(),
//! );
//!
//! let prompt = registry.render("ask", &json!({ "name": "삼성전자" })).unwrap();
//! assert_eq!(prompt, "삼성전자 분석");
//! ```

mod error;
mod jinja;
mod language;
mod registry;
mod template;

pub use error::{PromptError, Result};
pub use jinja::{JinjaTemplate, JinjaTemplateBuilder};
pub use language::Language;
pub use registry::PromptRegistry;
pub use template::PromptTemplate;
