//! Template engine for prompt management using Jinja2 syntax.
//!
//! Built-in templates are compiled into the binary. An optional override
//! directory is loaded on top, so operators can tune prompt wording without a
//! rebuild. Rendering is strict: a placeholder missing from the context is an
//! error, never an empty string.

use minijinja::{Environment, UndefinedBehavior, Value};
use std::path::Path;
use thiserror::Error;

/// Built-in templates, keyed by their path under `templates/prompts/`
const BUILTIN_TEMPLATES: &[(&str, &str)] = &[
    (
        "intake/system.jinja",
        include_str!("../../../templates/prompts/intake/system.jinja"),
    ),
    (
        "intake/categorize.jinja",
        include_str!("../../../templates/prompts/intake/categorize.jinja"),
    ),
    (
        "intake/urgency.jinja",
        include_str!("../../../templates/prompts/intake/urgency.jinja"),
    ),
    (
        "intake/summary.jinja",
        include_str!("../../../templates/prompts/intake/summary.jinja"),
    ),
];

/// Errors that can occur during template operations
#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("Template '{0}' not found")]
    NotFound(String),

    #[error("Failed to render template: {0}")]
    RenderError(String),
}

pub struct PromptEngine {
    env: Environment<'static>,
}

impl PromptEngine {
    /// Create an engine with the built-in templates, then apply overrides
    /// from `override_dir` (same relative names, `.jinja` extension).
    pub fn new(override_dir: Option<&Path>) -> Self {
        let mut env = Environment::new();
        env.set_undefined_behavior(UndefinedBehavior::Strict);

        for (name, source) in BUILTIN_TEMPLATES {
            if let Err(e) = env.add_template(name, source) {
                tracing::error!("Built-in template {} failed to compile: {}", name, e);
            }
        }

        if let Some(dir) = override_dir {
            if dir.exists() {
                load_templates_recursive(&mut env, dir, dir);
            } else {
                tracing::warn!(
                    "Prompt template directory {} does not exist, using built-in prompts",
                    dir.display()
                );
            }
        }

        Self { env }
    }

    /// Engine with built-in templates only
    pub fn builtin() -> Self {
        Self::new(None)
    }

    /// Render a template with the given context
    pub fn render(&self, template_name: &str, ctx: Value) -> Result<String, TemplateError> {
        let template = self
            .env
            .get_template(template_name)
            .map_err(|_| TemplateError::NotFound(template_name.to_string()))?;

        template
            .render(ctx)
            .map_err(|e| TemplateError::RenderError(e.to_string()))
    }

    #[cfg(test)]
    pub fn template_exists(&self, template_name: &str) -> bool {
        self.env.get_template(template_name).is_ok()
    }
}

/// Recursively load all .jinja templates from a directory
fn load_templates_recursive(env: &mut Environment<'static>, base_path: &Path, current_path: &Path) {
    let Ok(entries) = std::fs::read_dir(current_path) else {
        return;
    };

    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            load_templates_recursive(env, base_path, &path);
            continue;
        }
        if !path.extension().is_some_and(|ext| ext == "jinja") {
            continue;
        }

        let Ok(relative) = path.strip_prefix(base_path) else {
            continue;
        };
        let content = match std::fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) => {
                tracing::warn!("Failed to read template {}: {}", path.display(), e);
                continue;
            }
        };
        let template_name = relative.to_string_lossy().replace('\\', "/");

        // Overrides live for the whole process, so leaking them is fine
        let static_name: &'static str = Box::leak(template_name.clone().into_boxed_str());
        let static_content: &'static str = Box::leak(content.into_boxed_str());
        match env.add_template(static_name, static_content) {
            Ok(()) => tracing::info!("Loaded prompt override: {}", template_name),
            Err(e) => tracing::warn!("Failed to load template {}: {}", template_name, e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use minijinja::context;

    #[test]
    fn test_builtin_templates_present() {
        let engine = PromptEngine::builtin();
        for (name, _) in BUILTIN_TEMPLATES {
            assert!(engine.template_exists(name), "missing {}", name);
        }
        assert!(!engine.template_exists("definitely_not_a_real_template.jinja"));
    }

    #[test]
    fn test_render_missing_template() {
        let engine = PromptEngine::builtin();
        let result = engine.render("nope.jinja", context! {});
        assert!(matches!(result, Err(TemplateError::NotFound(_))));
    }

    #[test]
    fn test_render_is_strict_about_placeholders() {
        let engine = PromptEngine::builtin();
        let result = engine.render("intake/categorize.jinja", context! {});
        assert!(matches!(result, Err(TemplateError::RenderError(_))));
    }

    #[test]
    fn test_render_substitutes_text_literally() {
        let engine = PromptEngine::builtin();
        let rendered = engine
            .render(
                "intake/summary.jinja",
                context! {
                    issue_title => "{{ 7 * 7 }} streetlight out",
                    issue_description => "Dark since Monday",
                },
            )
            .unwrap();
        assert!(rendered.contains("{{ 7 * 7 }} streetlight out"));
        assert!(!rendered.contains("49 streetlight"));
    }

    #[test]
    fn test_override_directory_replaces_builtin() {
        let dir = std::env::temp_dir().join(format!("prompt-overrides-{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(dir.join("intake")).unwrap();
        std::fs::write(
            dir.join("intake/summary.jinja"),
            "Custom summary prompt for {{ issue_title }}",
        )
        .unwrap();

        let engine = PromptEngine::new(Some(&dir));
        let rendered = engine
            .render(
                "intake/summary.jinja",
                context! { issue_title => "Flooded underpass", issue_description => "x" },
            )
            .unwrap();
        assert_eq!(rendered, "Custom summary prompt for Flooded underpass");

        std::fs::remove_dir_all(&dir).ok();
    }
}
