//! Front end for Android Interface Definition Language files.

pub mod ast;
pub mod lexer;
pub mod parser;

pub use ast::{AidlDocument, Direction, InterfaceDecl, MethodDecl, Parameter, TypeRef};

use crate::error::Result;

/// Parse AIDL source text into a document.
pub fn parse(source: &str) -> Result<AidlDocument> {
    let tokens = lexer::Lexer::new(source).tokenize()?;
    parser::Parser::new(tokens).parse()
}
