use crate::error::ConfigError;

use common::ErrorLocation;

use std::panic::Location;
use std::path::Path;

use log::info;
use serde::Deserialize;

const DEFAULT_PROMPTS: &str = include_str!("../../config/prompts.toml");

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct PromptTemplate {
    pub template: String,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct PromptTemplates {
    pub file_discovery: PromptTemplate,
    pub code_analysis: PromptTemplate,
    pub final_answer: PromptTemplate,
}

#[derive(Debug, Deserialize)]
struct PromptsDocument {
    prompts: PromptTemplates,
}

impl PromptTemplates {
    /// The templates bundled with the crate.
    pub fn bundled() -> Result<Self, ConfigError> {
        Self::parse(DEFAULT_PROMPTS, Path::new("<bundled prompts.toml>"))
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            location: ErrorLocation::from(Location::caller()),
            path: path.to_path_buf(),
            source: e,
        })?;

        let templates = Self::parse(&contents, path)?;
        info!("Prompt templates loaded from {}", path.display());
        Ok(templates)
    }

    fn parse(contents: &str, origin: &Path) -> Result<Self, ConfigError> {
        let document: PromptsDocument =
            toml::from_str(contents).map_err(|e| ConfigError::ParseError {
                location: ErrorLocation::from(Location::caller()),
                path: origin.to_path_buf(),
                reason: e.to_string(),
            })?;

        let templates = document.prompts;
        for (name, prompt) in [
            ("file_discovery", &templates.file_discovery),
            ("code_analysis", &templates.code_analysis),
            ("final_answer", &templates.final_answer),
        ] {
            if prompt.template.trim().is_empty() {
                return Err(ConfigError::validation(format!(
                    "Prompt template '{name}' cannot be empty"
                )));
            }
        }

        Ok(templates)
    }
}

/// Replace the first `${key}` of each variable with its value, in order.
///
/// Later substitutions also see text inserted by earlier ones.
pub fn fill_template(template: &str, variables: &[(&str, &str)]) -> String {
    let mut result = template.to_string();
    for (key, value) in variables {
        let placeholder = format!("${{{key}}}");
        result = result.replacen(&placeholder, value, 1);
    }
    result
}
