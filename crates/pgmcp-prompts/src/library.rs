//! Template registry and rendering.

use minijinja::{Environment, UndefinedBehavior};
use tracing::debug;

use crate::error::Result;
use crate::prompt::{PromptContext, PromptKind, PromptMessage};

const TEMPLATES: [(&str, &str); 5] = [
    (
        "validate_nl.md.jinja",
        include_str!("../templates/validate_nl.md.jinja"),
    ),
    (
        "generate_sql.md.jinja",
        include_str!("../templates/generate_sql.md.jinja"),
    ),
    (
        "justify_sql.md.jinja",
        include_str!("../templates/justify_sql.md.jinja"),
    ),
    (
        "generate_vega.md.jinja",
        include_str!("../templates/generate_vega.md.jinja"),
    ),
    (
        "nl_to_sql.md.jinja",
        include_str!("../templates/nl_to_sql.md.jinja"),
    ),
];

/// Compiled prompt templates.
///
/// Templates are embedded at build time and parsed once in [`PromptLibrary::new`].
/// Values are inserted verbatim: `.md` templates are never auto-escaped.
#[derive(Debug)]
pub struct PromptLibrary {
    env: Environment<'static>,
}

impl PromptLibrary {
    /// Parse every embedded template.
    pub fn new() -> Result<Self> {
        let mut env = Environment::new();
        env.set_undefined_behavior(UndefinedBehavior::Strict);
        for (name, source) in TEMPLATES {
            env.add_template(name, source)?;
        }
        Ok(Self { env })
    }

    /// Every available prompt.
    pub fn prompts(&self) -> impl Iterator<Item = PromptKind> {
        PromptKind::ALL.into_iter()
    }

    /// Render a prompt into its messages.
    ///
    /// Fails with [`crate::PromptError::MissingArgument`] when a required argument is
    /// absent or blank.
    pub fn render(&self, kind: PromptKind, context: &PromptContext) -> Result<Vec<PromptMessage>> {
        kind.check_arguments(context)?;

        let template = self.env.get_template(kind.template_name())?;
        let content = template.render(context)?;
        debug!(prompt = kind.name(), length = content.len(), "rendered prompt");

        Ok(vec![PromptMessage::user(content)])
    }

    /// Render a prompt looked up by its registered name.
    pub fn render_named(&self, name: &str, context: &PromptContext) -> Result<Vec<PromptMessage>> {
        self.render(name.parse()?, context)
    }
}
