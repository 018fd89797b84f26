//! Parser for Turbo Gherkin feature files.
//!
//! Turbo Gherkin is a Gherkin dialect with English and Russian keyword
//! synonyms, business rules, typed step parameters, doc strings and data
//! tables. [`parse`] turns source text into a [`SyntaxTree`] whose nodes
//! carry an error flag instead of failing: malformed input is always
//! returned as a tree, with recovery sites flagged and described by
//! localised [`Diagnostic`]s.
//!
//! ```
//! use turbo_gherkin::{RuleKind, parse};
//!
//! let tree = parse(
//!     "Функционал: тестовый пример\n\
//!      Описание тестового сценария\n\
//!      Сценарий: тестовый сценарий",
//! );
//! let feature = tree.feature();
//! assert!(!tree.has_error());
//! assert_eq!(feature.name().text(), "тестовый пример");
//! assert_eq!(feature.description().text(), "Описание тестового сценария\n");
//! assert!(tree.root().descendants().iter().any(|n| n.kind() == RuleKind::Scenario));
//! ```

pub mod ast;
pub mod config;
mod diagnostics;
pub mod localization;
mod parser;
mod syntax;

pub use config::ParseOptions;
pub use diagnostics::{Diagnostic, DiagnosticKind, Severity};
pub use parser::{SyntaxTree, parse, parse_bytes, parse_with_options};
pub use syntax::{RuleKind, SyntaxElement, SyntaxNode};
pub use turbo_gherkin_lexer::{
    Channel, EncodingError, LexDiagnostic, LexErrorKind, ParameterKind, ParameterValue, Position,
    Token, TokenKind, TokenStream, tokenize, tokenize_bytes,
};
