//! CSS engine: character classes, tokenizer, object model and parser.

pub mod chars;
pub mod model;
pub mod parser;
pub mod token;
pub mod tokenizer;

pub use model::{Declaration, DeclarationBlock, Diagnostic, Rule, StyleSheet};
pub use parser::{parse, ParseError};
pub use token::{Token, TokenKind};
pub use tokenizer::{tokenize, LexicalError, Tokenizer};
