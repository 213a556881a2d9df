//! LLM prompt templates for natural-language access to a PostgreSQL database.
//!
//! Each prompt renders a single user message from a Jinja template. The
//! templates consume the database document produced by `pgmcp-catalog`
//! (as a JSON string, `database_info`) together with the user's question and,
//! for some prompts, a SQL query and result metadata:
//!
//! | prompt          | purpose                                          |
//! |-----------------|--------------------------------------------------|
//! | `validate_nl`   | is the question answerable from this schema?     |
//! | `generate_sql`  | write a PostgreSQL query for the question        |
//! | `justify_sql`   | explain and evaluate a query against a question  |
//! | `generate_vega` | build a Vega-Lite chart for a query's results    |
//! | `nl_to_sql`     | standalone question-to-SQL instruction           |
//!
//! ```
//! use pgmcp_prompts::{PromptContext, PromptKind, PromptLibrary};
//!
//! let library = PromptLibrary::new().unwrap();
//! let context = PromptContext::new()
//!     .with_database_info(r#"{"schemas": []}"#)
//!     .with_nl_query("How many orders were placed last week?");
//! let messages = library.render(PromptKind::GenerateSql, &context).unwrap();
//! assert!(messages[0].content.contains("How many orders were placed last week?"));
//! ```

pub mod error;
pub mod library;
pub mod prompt;

pub use error::{PromptError, Result};
pub use library::PromptLibrary;
pub use prompt::{PromptArgument, PromptContext, PromptKind, PromptMessage, Role};
