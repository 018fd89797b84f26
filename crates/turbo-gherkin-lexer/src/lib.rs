//! Tokenizer for Turbo Gherkin feature files.
//!
//! The crate turns feature-file text into a flat, lossless token stream. It
//! understands English and Russian keyword synonyms, normalises `\r\n`, `\r`
//! and `\n` line breaks for position tracking, and switches modes for tag
//! lines, table rows and doc strings. Quoted strings and numbers inside free
//! text become literal tokens that the parser turns into step parameters.

mod errors;
mod keywords;
mod lexer;
mod parameters;
mod source;
mod token;

pub use errors::{LexDiagnostic, LexErrorKind};
pub use keywords::synonyms;
pub use lexer::{tokenize, tokenize_bytes};
pub use parameters::{ParameterKind, ParameterValue};
pub use source::{
    EncodingError, Position, decode, fold_case, folded, from_utf8, strip_bom,
};
pub use token::{Channel, Token, TokenKind, TokenStream};
