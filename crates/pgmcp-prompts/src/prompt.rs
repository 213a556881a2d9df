//! Prompt definitions, arguments and messages.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::PromptError;

/// The available prompts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PromptKind {
    ValidateNl,
    GenerateSql,
    JustifySql,
    GenerateVega,
    NlToSql,
}

/// A named prompt argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PromptArgument {
    pub name: &'static str,
    pub description: &'static str,
    pub required: bool,
}

const DATABASE_INFO: PromptArgument = PromptArgument {
    name: "database_info",
    description: "JSON document describing every schema, table and column",
    required: true,
};

const NL_QUERY: PromptArgument = PromptArgument {
    name: "nl_query",
    description: "The user's question in natural language",
    required: true,
};

const SQL_QUERY: PromptArgument = PromptArgument {
    name: "sql_query",
    description: "The SQL query to explain or visualize",
    required: true,
};

const QUERY_METADATA: PromptArgument = PromptArgument {
    name: "query_metadata",
    description: "JSON field types, distinct counts, ranges and row count of the query result",
    required: true,
};

const SCHEMA_JSON: PromptArgument = PromptArgument {
    name: "schema_json",
    description: "Optional JSON representation of the database schema",
    required: false,
};

impl PromptKind {
    /// Every prompt, in listing order.
    pub const ALL: [PromptKind; 5] = [
        PromptKind::ValidateNl,
        PromptKind::GenerateSql,
        PromptKind::JustifySql,
        PromptKind::GenerateVega,
        PromptKind::NlToSql,
    ];

    /// Registered prompt name.
    pub fn name(&self) -> &'static str {
        match self {
            PromptKind::ValidateNl => "validate_nl",
            PromptKind::GenerateSql => "generate_sql",
            PromptKind::JustifySql => "justify_sql",
            PromptKind::GenerateVega => "generate_vega",
            PromptKind::NlToSql => "nl_to_sql",
        }
    }

    /// One-line description for prompt listings.
    pub fn description(&self) -> &'static str {
        match self {
            PromptKind::ValidateNl => {
                "Decide whether a question is clear and answerable from the database schema"
            }
            PromptKind::GenerateSql => "Convert a natural language question into PostgreSQL SQL",
            PromptKind::JustifySql => {
                "Explain a SQL query and evaluate whether it answers the question"
            }
            PromptKind::GenerateVega => {
                "Generate a Vega-Lite visualization for the results of a SQL query"
            }
            PromptKind::NlToSql => {
                "Standalone instruction for converting a question into PostgreSQL SQL"
            }
        }
    }

    /// Arguments the template consumes.
    pub fn arguments(&self) -> &'static [PromptArgument] {
        match self {
            PromptKind::ValidateNl | PromptKind::GenerateSql => &[DATABASE_INFO, NL_QUERY],
            PromptKind::JustifySql => &[DATABASE_INFO, NL_QUERY, SQL_QUERY],
            PromptKind::GenerateVega => &[DATABASE_INFO, NL_QUERY, SQL_QUERY, QUERY_METADATA],
            PromptKind::NlToSql => &[NL_QUERY, SCHEMA_JSON],
        }
    }

    /// Whether the prompt needs the connection's database document.
    pub fn needs_database_info(&self) -> bool {
        self.arguments().iter().any(|a| a.name == DATABASE_INFO.name)
    }

    /// Whether the prompt needs result metadata for its SQL query.
    pub fn needs_query_metadata(&self) -> bool {
        self.arguments().iter().any(|a| a.name == QUERY_METADATA.name)
    }

    /// Fail on the first required argument absent from `context`.
    pub fn check_arguments(&self, context: &PromptContext) -> Result<(), PromptError> {
        self.check_required(context, |_| true)
    }

    /// Like [`PromptKind::check_arguments`], but skips `database_info` and
    /// `query_metadata`, which a server fills in from the connection.
    pub fn check_user_arguments(&self, context: &PromptContext) -> Result<(), PromptError> {
        self.check_required(context, |argument| {
            argument.name != DATABASE_INFO.name && argument.name != QUERY_METADATA.name
        })
    }

    fn check_required(
        &self,
        context: &PromptContext,
        include: impl Fn(&PromptArgument) -> bool,
    ) -> Result<(), PromptError> {
        let missing = self
            .arguments()
            .iter()
            .filter(|a| a.required && include(*a))
            .find(|a| context.get(a.name).is_none());
        match missing {
            Some(argument) => Err(PromptError::MissingArgument {
                prompt: self.name(),
                argument: argument.name,
            }),
            None => Ok(()),
        }
    }

    pub(crate) fn template_name(&self) -> &'static str {
        match self {
            PromptKind::ValidateNl => "validate_nl.md.jinja",
            PromptKind::GenerateSql => "generate_sql.md.jinja",
            PromptKind::JustifySql => "justify_sql.md.jinja",
            PromptKind::GenerateVega => "generate_vega.md.jinja",
            PromptKind::NlToSql => "nl_to_sql.md.jinja",
        }
    }
}

impl fmt::Display for PromptKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for PromptKind {
    type Err = PromptError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PromptKind::ALL
            .into_iter()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| PromptError::UnknownPrompt(s.to_string()))
    }
}

/// Values available to a prompt template.
///
/// Every field is always present in the template context; unset fields
/// render as `none` and are falsy in `{% if %}` tests.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PromptContext {
    pub database_info: Option<String>,
    pub nl_query: Option<String>,
    pub sql_query: Option<String>,
    pub query_metadata: Option<String>,
    pub schema_json: Option<String>,
}

impl PromptContext {
    /// Create an empty context.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_database_info(mut self, value: impl Into<String>) -> Self {
        self.database_info = Some(value.into());
        self
    }

    pub fn with_nl_query(mut self, value: impl Into<String>) -> Self {
        self.nl_query = Some(value.into());
        self
    }

    pub fn with_sql_query(mut self, value: impl Into<String>) -> Self {
        self.sql_query = Some(value.into());
        self
    }

    pub fn with_query_metadata(mut self, value: impl Into<String>) -> Self {
        self.query_metadata = Some(value.into());
        self
    }

    pub fn with_schema_json(mut self, value: impl Into<String>) -> Self {
        self.schema_json = Some(value.into());
        self
    }

    /// Look up an argument by name. Blank values count as absent.
    pub fn get(&self, argument: &str) -> Option<&str> {
        let value = match argument {
            "database_info" => self.database_info.as_deref(),
            "nl_query" => self.nl_query.as_deref(),
            "sql_query" => self.sql_query.as_deref(),
            "query_metadata" => self.query_metadata.as_deref(),
            "schema_json" => self.schema_json.as_deref(),
            _ => None,
        };
        value.filter(|v| !v.trim().is_empty())
    }
}

/// Author of a prompt message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// A rendered prompt message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptMessage {
    pub role: Role,
    pub content: String,
}

impl PromptMessage {
    /// A message from the user.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}
