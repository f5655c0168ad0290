//! Template rendering.

use std::collections::{BTreeSet, HashMap};
use std::fs;
use std::path::{Path, PathBuf};

use regex::Regex;
use tracing::{debug, info};

use crate::error::{TemplateError, TemplateResult};

/// Template renderer for `{{.name}}` placeholders.
pub struct TemplateRenderer {
    variable_pattern: Regex,
}

impl Default for TemplateRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl TemplateRenderer {
    /// Create a new template renderer.
    pub fn new() -> Self {
        Self {
            // Match {{.variable_name}}, {{ .variable_name }} and {{variable_name}}
            variable_pattern: Regex::new(r"\{\{\s*\.?([a-zA-Z_][a-zA-Z0-9_]*)\s*\}\}")
                .expect("placeholder pattern is a valid regex"),
        }
    }

    /// Names of all placeholders in `content`.
    pub fn placeholders(&self, content: &str) -> BTreeSet<String> {
        self.variable_pattern
            .captures_iter(content)
            .map(|caps| caps[1].to_string())
            .collect()
    }

    /// Render content by replacing placeholders.
    ///
    /// Fails on the first placeholder (in template order) that has no value.
    pub fn render_content(
        &self,
        content: &str,
        variables: &HashMap<String, String>,
    ) -> TemplateResult<String> {
        if let Some(missing) = self
            .variable_pattern
            .captures_iter(content)
            .map(|caps| caps[1].to_string())
            .find(|name| !variables.contains_key(name))
        {
            return Err(TemplateError::MissingVariable(missing));
        }

        Ok(self
            .variable_pattern
            .replace_all(content, |caps: &regex::Captures| {
                variables.get(&caps[1]).cloned().unwrap_or_default()
            })
            .to_string())
    }

    /// Render `template_path` into `output_path`, returning the absolute
    /// path of the written file.
    pub fn render_file(
        &self,
        template_path: &Path,
        output_path: &Path,
        variables: &HashMap<String, String>,
    ) -> TemplateResult<PathBuf> {
        if !template_path.exists() {
            return Err(TemplateError::NotFound(template_path.to_path_buf()));
        }

        let content = fs::read_to_string(template_path).map_err(|source| TemplateError::Read {
            path: template_path.to_path_buf(),
            source,
        })?;

        let rendered = self.render_content(&content, variables)?;

        if let Some(parent) = output_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        fs::write(output_path, rendered).map_err(|source| TemplateError::Write {
            path: output_path.to_path_buf(),
            source,
        })?;

        let absolute = fs::canonicalize(output_path)?;
        info!("Rendered {:?} to {:?}", template_path, absolute);

        let used = self.placeholders(&content);
        let unused: Vec<_> = variables
            .keys()
            .filter(|k| !used.contains(k.as_str()))
            .collect();
        if !unused.is_empty() {
            debug!("Variables not used by template: {:?}", unused);
        }

        Ok(absolute)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_render_content() {
        let renderer = TemplateRenderer::new();
        let vars = vars(&[("region", "us-east-2"), ("environment_name", "e2etest-abc123")]);

        let content = r#"region = "{{.region}}"
environment_name = "{{ .environment_name }}"
owner = "{{region}}""#;
        let rendered = renderer.render_content(content, &vars).unwrap();
        assert_eq!(
            rendered,
            "region = \"us-east-2\"\nenvironment_name = \"e2etest-abc123\"\nowner = \"us-east-2\""
        );
    }

    #[test]
    fn test_missing_variable_is_error() {
        let renderer = TemplateRenderer::new();
        let vars = vars(&[("region", "us-east-2")]);

        let err = renderer
            .render_content("{{.region}} {{.bamboo_license}}", &vars)
            .unwrap_err();
        assert!(
            matches!(err, TemplateError::MissingVariable(ref name) if name == "bamboo_license")
        );
    }

    #[test]
    fn test_empty_value_renders_empty() {
        let renderer = TemplateRenderer::new();
        let vars = vars(&[("bamboo_password", "")]);

        let rendered = renderer
            .render_content("bamboo_admin_password = \"{{.bamboo_password}}\"", &vars)
            .unwrap();
        assert_eq!(rendered, "bamboo_admin_password = \"\"");
    }

    #[test]
    fn test_placeholders() {
        let renderer = TemplateRenderer::new();
        let names = renderer.placeholders("{{.a}} {{ b }} {{.a}} {not} {{ 1x }}");
        assert_eq!(names.into_iter().collect::<Vec<_>>(), vec!["a", "b"]);
    }
}
