//! AIDL parser - builds an [`AidlDocument`] from tokens.
//!
//! Only what a call schema needs is modelled: interfaces and their methods.
//! Parcelable, enum and union declarations, constants and annotations are
//! consumed and dropped.

use crate::aidl::ast::{AidlDocument, Direction, InterfaceDecl, MethodDecl, Parameter, TypeRef};
use crate::aidl::lexer::{parse_error, SpannedToken, Token};
use crate::error::Result;

pub struct Parser {
    tokens: Vec<SpannedToken>,
    pos: usize,
}

impl Parser {
    pub fn new(tokens: Vec<SpannedToken>) -> Self {
        Self { tokens, pos: 0 }
    }

    pub fn parse(mut self) -> Result<AidlDocument> {
        let mut document = AidlDocument::default();

        if self.eat_keyword("package") {
            document.package = Some(self.qualified_name()?);
            self.expect(';')?;
        }
        while self.eat_keyword("import") {
            document.imports.push(self.qualified_name()?);
            self.expect(';')?;
        }

        while !self.is_eof() {
            self.skip_annotations()?;
            let oneway = self.eat_keyword("oneway");
            match self.peek() {
                Token::Ident(word) if word == "interface" => {
                    self.advance();
                    document.interfaces.push(self.interface_body(oneway)?);
                }
                Token::Ident(word) if is_skipped_declaration(word) => {
                    self.skip_declaration()?;
                }
                _ => return Err(self.unexpected("a type declaration")),
            }
        }

        Ok(document)
    }

    fn interface_body(&mut self, oneway: bool) -> Result<InterfaceDecl> {
        let name = self.expect_ident()?;
        self.expect('{')?;

        let mut methods = Vec::new();
        while !self.eat('}') {
            if self.is_eof() {
                return Err(self.unexpected("'}'"));
            }
            self.skip_annotations()?;
            match self.peek() {
                Token::Ident(word) if word == "const" => self.skip_until(';')?,
                Token::Ident(word) if is_skipped_declaration(word) => self.skip_declaration()?,
                _ => methods.push(self.method(oneway)?),
            }
        }

        Ok(InterfaceDecl {
            name,
            oneway,
            methods,
        })
    }

    fn method(&mut self, interface_oneway: bool) -> Result<MethodDecl> {
        let oneway = self.eat_keyword("oneway") || interface_oneway;
        let return_type = self.type_ref()?;
        let name = self.expect_ident()?;
        self.expect('(')?;

        let mut parameters = Vec::new();
        if !self.eat(')') {
            loop {
                parameters.push(self.parameter()?);
                if self.eat(')') {
                    break;
                }
                self.expect(',')?;
            }
        }

        // Explicit transaction ids (`= 3`) are accepted; codes stay ordinal.
        if self.eat('=') {
            self.skip_until(';')?;
        } else {
            self.expect(';')?;
        }

        Ok(MethodDecl {
            name,
            oneway,
            return_type,
            parameters,
        })
    }

    fn parameter(&mut self) -> Result<Parameter> {
        self.skip_annotations()?;
        let direction = match self.peek() {
            Token::Ident(word) if word == "in" => Some(Direction::In),
            Token::Ident(word) if word == "out" => Some(Direction::Out),
            Token::Ident(word) if word == "inout" => Some(Direction::InOut),
            _ => None,
        };
        if direction.is_some() {
            self.advance();
        }
        let ty = self.type_ref()?;
        let name = self.expect_ident()?;
        Ok(Parameter {
            direction,
            ty,
            name,
        })
    }

    fn type_ref(&mut self) -> Result<TypeRef> {
        self.skip_annotations()?;
        let name = self.qualified_name()?;

        let mut generics = Vec::new();
        if self.eat('<') {
            loop {
                generics.push(self.type_ref()?);
                if self.eat('>') {
                    break;
                }
                self.expect(',')?;
            }
        }

        let mut dimensions = 0;
        while self.eat('[') {
            if matches!(self.peek(), Token::Number(_)) {
                self.advance();
            }
            self.expect(']')?;
            dimensions += 1;
        }

        Ok(TypeRef {
            name,
            generics,
            dimensions,
        })
    }

    fn qualified_name(&mut self) -> Result<String> {
        let mut name = self.expect_ident()?;
        while self.eat('.') {
            name.push('.');
            name.push_str(&self.expect_ident()?);
        }
        Ok(name)
    }

    fn skip_annotations(&mut self) -> Result<()> {
        while self.eat('@') {
            self.qualified_name()?;
            if self.peek() == &Token::Punct('(') {
                self.skip_balanced('(', ')')?;
            }
        }
        Ok(())
    }

    /// Skip `parcelable Foo;`, `parcelable Foo { ... }`, `enum Foo { ... }` and friends.
    fn skip_declaration(&mut self) -> Result<()> {
        loop {
            match self.peek() {
                Token::Punct(';') => {
                    self.advance();
                    return Ok(());
                }
                Token::Punct('{') => {
                    self.skip_balanced('{', '}')?;
                    self.eat(';');
                    return Ok(());
                }
                Token::Eof => return Err(self.unexpected("end of declaration")),
                _ => {
                    self.advance();
                }
            }
        }
    }

    fn skip_balanced(&mut self, open: char, close: char) -> Result<()> {
        self.expect(open)?;
        let mut depth = 1usize;
        while depth > 0 {
            match self.peek() {
                Token::Eof => return Err(self.unexpected(&format!("'{close}'"))),
                Token::Punct(c) if *c == open => depth += 1,
                Token::Punct(c) if *c == close => depth -= 1,
                _ => {}
            }
            self.advance();
        }
        Ok(())
    }

    fn skip_until(&mut self, terminator: char) -> Result<()> {
        while !self.eat(terminator) {
            if self.is_eof() {
                return Err(self.unexpected(&format!("'{terminator}'")));
            }
            self.advance();
        }
        Ok(())
    }

    fn peek(&self) -> &Token {
        &self.tokens[self.pos].token
    }

    fn advance(&mut self) {
        if self.pos < self.tokens.len() - 1 {
            self.pos += 1;
        }
    }

    fn is_eof(&self) -> bool {
        matches!(self.peek(), Token::Eof)
    }

    fn eat(&mut self, punct: char) -> bool {
        if self.peek() == &Token::Punct(punct) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn eat_keyword(&mut self, keyword: &str) -> bool {
        if matches!(self.peek(), Token::Ident(word) if word == keyword) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, punct: char) -> Result<()> {
        if self.eat(punct) {
            Ok(())
        } else {
            Err(self.unexpected(&format!("'{punct}'")))
        }
    }

    fn expect_ident(&mut self) -> Result<String> {
        match self.peek().clone() {
            Token::Ident(name) => {
                self.advance();
                Ok(name)
            }
            _ => Err(self.unexpected("identifier")),
        }
    }

    fn unexpected(&self, expected: &str) -> crate::error::SchemaError {
        let current = &self.tokens[self.pos];
        let found = match &current.token {
            Token::Ident(word) => format!("'{word}'"),
            Token::Number(text) => format!("number {text}"),
            Token::Literal(text) => format!("literal {text:?}"),
            Token::Punct(c) => format!("'{c}'"),
            Token::Eof => "end of input".to_string(),
        };
        parse_error(current.span, format!("expected {expected}, found {found}"))
    }
}

fn is_skipped_declaration(word: &str) -> bool {
    matches!(word, "parcelable" | "enum" | "union")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aidl::parse;
    use crate::error::SchemaError;

    #[test]
    fn package_imports_and_interface() {
        let document = parse(
            r#"
            package android.os;
            import android.os.Bundle;
            import java.util.List;

            interface IDemo {
                void ping();
                int add(int a, int b);
            }
            "#,
        )
        .unwrap();

        assert_eq!(document.package.as_deref(), Some("android.os"));
        assert_eq!(document.imports, vec!["android.os.Bundle", "java.util.List"]);
        let iface = document.interface("IDemo").unwrap();
        assert_eq!(iface.methods.len(), 2);
        assert_eq!(iface.methods[1].name, "add");
        assert_eq!(iface.methods[1].parameters[1].name, "b");
        assert_eq!(iface.methods[0].return_type, TypeRef::named("void"));
    }

    #[test]
    fn parameter_directions_and_types() {
        let document = parse(
            "interface I { void f(in byte[] sig, out List<String> names, inout Map<String, int> m, long[][] grid); }",
        )
        .unwrap();
        let params = &document.interfaces[0].methods[0].parameters;

        assert_eq!(params[0].direction, Some(Direction::In));
        assert_eq!(params[0].ty, TypeRef::array_of("byte"));
        assert_eq!(params[1].direction, Some(Direction::Out));
        assert_eq!(params[1].ty.to_string(), "List<String>");
        assert_eq!(params[2].direction, Some(Direction::InOut));
        assert_eq!(params[2].ty.generics.len(), 2);
        assert_eq!(params[3].direction, None);
        assert_eq!(params[3].ty.dimensions, 2);
    }

    #[test]
    fn annotations_constants_and_nested_declarations_are_skipped() {
        let document = parse(
            r#"
            @SystemApi
            @JavaDerive(toString=true)
            interface IThing {
                const int VERSION = 1 << 2;
                const String NAME = "thing";
                @nullable String name();
                parcelable Nested { int x; }
                enum Mode { A = 1, B }
                oneway void fire(@nullable in String s);
                boolean check() = 12;
            }
            "#,
        )
        .unwrap();
        let methods = &document.interfaces[0].methods;
        let names: Vec<_> = methods.iter().map(|m| m.name.as_str()).collect();

        assert_eq!(names, vec!["name", "fire", "check"]);
        assert!(methods[1].oneway);
        assert!(!methods[2].oneway);
    }

    #[test]
    fn oneway_interface_marks_all_methods() {
        let document = parse("oneway interface ICallback { void done(int code); }").unwrap();
        assert!(document.interfaces[0].oneway);
        assert!(document.interfaces[0].methods[0].oneway);
    }

    #[test]
    fn top_level_parcelables_are_skipped() {
        let document = parse(
            "parcelable Foo;\nparcelable Bar { int a; }\ninterface IOne { void a(); }\ninterface ITwo { void b(); }",
        )
        .unwrap();
        let names: Vec<_> = document.interfaces.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["IOne", "ITwo"]);
    }

    #[test]
    fn missing_semicolon_reports_position() {
        let err = parse("interface I {\n  void f()\n}").unwrap_err();
        match err {
            SchemaError::Parse { line, message, .. } => {
                assert_eq!(line, 3);
                assert!(message.contains("expected ';'"), "{message}");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn unterminated_interface_fails() {
        assert!(matches!(
            parse("interface I { void f();"),
            Err(SchemaError::Parse { .. })
        ));
    }
}
