// ==============================================================================
// TypeScript Front End: Lexer and Declaration Parser
// ==============================================================================
//
// Parses the TypeScript subset the compiler accepts into a `ParsedAst`. This
// is not a general TypeScript parser; it recognizes exported `interface` and
// `type` declarations with object bodies, the type expressions that can map
// to Avro (primitives, literals, references, arrays, unions, inline object
// types), `// @avro` annotation comments, and JSDoc blocks. `import`
// statements are skipped so that inputs can import the `Avro*` marker types.
//
// Every token carries its byte span, and all errors are `ParseDiagnostic`s
// pointing at the offending source range.

use miette::{NamedSource, SourceSpan};

use crate::error::ParseDiagnostic;
use crate::model::source::{
    Annotation, Declaration, FieldDecl, LiteralValue, ParsedAst, ReferenceMap, SourceType,
};

/// Parse TypeScript source text into declarations and a reference map.
/// `file_name` only labels diagnostics; it is not opened.
pub fn parse(file_name: &str, text: &str) -> Result<ParsedAst, ParseDiagnostic> {
    let tokens = Lexer::new(file_name, text).tokenize()?;
    Parser {
        file_name,
        text,
        tokens,
        pos: 0,
        references: ReferenceMap::new(),
    }
    .parse_file()
}

// ==============================================================================
// Tokens
// ==============================================================================

#[derive(Debug, Clone, PartialEq)]
enum TokenKind {
    Ident(String),
    Str(String),
    Number(f64),
    /// The content of a `/** ... */` block, comment markers stripped.
    Doc(String),
    /// The text after `// @avro `, trimmed.
    Annotation(String),
    LBrace,
    RBrace,
    LParen,
    RParen,
    LBracket,
    RBracket,
    Pipe,
    Semi,
    Colon,
    Comma,
    Question,
    Equals,
}

impl TokenKind {
    fn describe(&self) -> String {
        match self {
            TokenKind::Ident(name) => format!("`{name}`"),
            TokenKind::Str(_) => "string literal".to_string(),
            TokenKind::Number(_) => "number literal".to_string(),
            TokenKind::Doc(_) => "doc comment".to_string(),
            TokenKind::Annotation(_) => "annotation comment".to_string(),
            TokenKind::LBrace => "`{`".to_string(),
            TokenKind::RBrace => "`}`".to_string(),
            TokenKind::LParen => "`(`".to_string(),
            TokenKind::RParen => "`)`".to_string(),
            TokenKind::LBracket => "`[`".to_string(),
            TokenKind::RBracket => "`]`".to_string(),
            TokenKind::Pipe => "`|`".to_string(),
            TokenKind::Semi => "`;`".to_string(),
            TokenKind::Colon => "`:`".to_string(),
            TokenKind::Comma => "`,`".to_string(),
            TokenKind::Question => "`?`".to_string(),
            TokenKind::Equals => "`=`".to_string(),
        }
    }
}

#[derive(Debug, Clone)]
struct Token {
    kind: TokenKind,
    offset: usize,
    len: usize,
}

impl Token {
    fn span(&self) -> SourceSpan {
        (self.offset, self.len).into()
    }
}

// ==============================================================================
// Lexer
// ==============================================================================

struct Lexer<'a> {
    file_name: &'a str,
    text: &'a str,
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Lexer<'a> {
    fn new(file_name: &'a str, text: &'a str) -> Lexer<'a> {
        Lexer {
            file_name,
            text,
            bytes: text.as_bytes(),
            pos: 0,
        }
    }

    fn error(&self, offset: usize, len: usize, message: impl Into<String>) -> ParseDiagnostic {
        ParseDiagnostic {
            src: NamedSource::new(self.file_name, self.text.to_string()),
            span: (offset, len).into(),
            message: message.into(),
        }
    }

    fn tokenize(mut self) -> Result<Vec<Token>, ParseDiagnostic> {
        let mut tokens = Vec::new();
        while let Some(&b) = self.bytes.get(self.pos) {
            let start = self.pos;
            match b {
                b' ' | b'\t' | b'\r' | b'\n' => {
                    self.pos += 1;
                }
                b'/' => {
                    if let Some(token) = self.comment(start)? {
                        tokens.push(token);
                    }
                }
                b'\'' | b'"' => tokens.push(self.string(start, b)?),
                b'0'..=b'9' => tokens.push(self.number(start)?),
                b'{' => tokens.push(self.punct(TokenKind::LBrace)),
                b'}' => tokens.push(self.punct(TokenKind::RBrace)),
                b'(' => tokens.push(self.punct(TokenKind::LParen)),
                b')' => tokens.push(self.punct(TokenKind::RParen)),
                b'[' => tokens.push(self.punct(TokenKind::LBracket)),
                b']' => tokens.push(self.punct(TokenKind::RBracket)),
                b'|' => tokens.push(self.punct(TokenKind::Pipe)),
                b';' => tokens.push(self.punct(TokenKind::Semi)),
                b':' => tokens.push(self.punct(TokenKind::Colon)),
                b',' => tokens.push(self.punct(TokenKind::Comma)),
                b'?' => tokens.push(self.punct(TokenKind::Question)),
                b'=' => tokens.push(self.punct(TokenKind::Equals)),
                _ if b.is_ascii_alphabetic() || b == b'_' || b == b'$' => {
                    tokens.push(self.ident(start));
                }
                _ => {
                    let c = self.text[start..].chars().next().unwrap_or('?');
                    return Err(self.error(
                        start,
                        c.len_utf8(),
                        format!("unexpected character `{c}`"),
                    ));
                }
            }
        }
        Ok(tokens)
    }

    fn punct(&mut self, kind: TokenKind) -> Token {
        let token = Token {
            kind,
            offset: self.pos,
            len: 1,
        };
        self.pos += 1;
        token
    }

    fn ident(&mut self, start: usize) -> Token {
        while self
            .bytes
            .get(self.pos)
            .is_some_and(|&b| b.is_ascii_alphanumeric() || b == b'_' || b == b'$')
        {
            self.pos += 1;
        }
        Token {
            kind: TokenKind::Ident(self.text[start..self.pos].to_string()),
            offset: start,
            len: self.pos - start,
        }
    }

    fn string(&mut self, start: usize, quote: u8) -> Result<Token, ParseDiagnostic> {
        self.pos += 1;
        let mut value = String::new();
        loop {
            match self.bytes.get(self.pos) {
                None | Some(b'\n') => {
                    return Err(self.error(start, self.pos - start, "unterminated string literal"));
                }
                Some(&b) if b == quote => {
                    self.pos += 1;
                    break;
                }
                Some(b'\\') => {
                    // Escapes pass through verbatim minus the backslash.
                    self.pos += 1;
                    if let Some(&escaped) = self.bytes.get(self.pos) {
                        value.push(escaped as char);
                        self.pos += 1;
                    }
                }
                Some(&b) => {
                    value.push(b as char);
                    self.pos += 1;
                }
            }
        }
        Ok(Token {
            kind: TokenKind::Str(value),
            offset: start,
            len: self.pos - start,
        })
    }

    fn number(&mut self, start: usize) -> Result<Token, ParseDiagnostic> {
        while self
            .bytes
            .get(self.pos)
            .is_some_and(|&b| b.is_ascii_digit() || b == b'.' || b == b'e' || b == b'E')
        {
            self.pos += 1;
        }
        let raw = &self.text[start..self.pos];
        let value: f64 = raw
            .parse()
            .map_err(|_| self.error(start, raw.len(), format!("invalid number literal `{raw}`")))?;
        Ok(Token {
            kind: TokenKind::Number(value),
            offset: start,
            len: raw.len(),
        })
    }

    /// Lex a comment starting at `/`. Line comments of the form
    /// `// @avro <name>` become annotation tokens and `/** ... */` blocks
    /// become doc tokens; every other comment is dropped.
    fn comment(&mut self, start: usize) -> Result<Option<Token>, ParseDiagnostic> {
        match self.bytes.get(start + 1) {
            Some(b'/') => {
                let end = self.text[start..]
                    .find('\n')
                    .map(|n| start + n)
                    .unwrap_or(self.text.len());
                self.pos = end;
                let body = &self.text[start + 2..end];
                Ok(body.strip_prefix(" @avro ").map(|rest| Token {
                    kind: TokenKind::Annotation(rest.trim().to_string()),
                    offset: start,
                    len: end - start,
                }))
            }
            Some(b'*') => {
                let close = self.text[start + 2..]
                    .find("*/")
                    .ok_or_else(|| self.error(start, 2, "unterminated block comment"))?;
                let end = start + 2 + close + 2;
                self.pos = end;
                let body = &self.text[start + 2..end - 2];
                if let Some(doc) = body.strip_prefix('*') {
                    // JSDoc: strip the leading `*` gutter off every line.
                    let cleaned = doc
                        .lines()
                        .map(|line| line.trim_start().trim_start_matches('*').trim())
                        .filter(|line| !line.is_empty())
                        .collect::<Vec<_>>()
                        .join("\n");
                    Ok(Some(Token {
                        kind: TokenKind::Doc(cleaned),
                        offset: start,
                        len: end - start,
                    }))
                } else {
                    Ok(None)
                }
            }
            _ => Err(self.error(start, 1, "unexpected character `/`")),
        }
    }
}

// ==============================================================================
// Parser
// ==============================================================================

struct Parser<'a> {
    file_name: &'a str,
    text: &'a str,
    tokens: Vec<Token>,
    pos: usize,
    references: ReferenceMap,
}

impl Parser<'_> {
    fn error_at(&self, span: SourceSpan, message: impl Into<String>) -> ParseDiagnostic {
        ParseDiagnostic {
            src: NamedSource::new(self.file_name, self.text.to_string()),
            span,
            message: message.into(),
        }
    }

    fn eof_span(&self) -> SourceSpan {
        (self.text.len(), 0).into()
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn next(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn expect(&mut self, kind: &TokenKind) -> Result<Token, ParseDiagnostic> {
        match self.next() {
            Some(token) if token.kind == *kind => Ok(token),
            Some(token) => Err(self.error_at(
                token.span(),
                format!("expected {}, found {}", kind.describe(), token.kind.describe()),
            )),
            None => Err(self.error_at(
                self.eof_span(),
                format!("expected {}, found end of input", kind.describe()),
            )),
        }
    }

    fn expect_ident(&mut self, role: &str) -> Result<(String, Token), ParseDiagnostic> {
        match self.next() {
            Some(token) => match &token.kind {
                TokenKind::Ident(name) => Ok((name.clone(), token)),
                other => Err(self.error_at(
                    token.span(),
                    format!("expected {role}, found {}", other.describe()),
                )),
            },
            None => Err(self.error_at(
                self.eof_span(),
                format!("expected {role}, found end of input"),
            )),
        }
    }

    /// Consume `;` or `,` if one follows; property separators are optional.
    fn eat_separator(&mut self) {
        if matches!(
            self.peek().map(|t| &t.kind),
            Some(TokenKind::Semi | TokenKind::Comma)
        ) {
            self.pos += 1;
        }
    }

    fn parse_file(mut self) -> Result<ParsedAst, ParseDiagnostic> {
        let mut declarations = Vec::new();
        loop {
            // Doc comments between declarations attach to the next one.
            let mut doc = None;
            while let Some(token) = self.peek() {
                match &token.kind {
                    TokenKind::Doc(text) => {
                        doc = Some(text.clone());
                        self.pos += 1;
                    }
                    TokenKind::Annotation(_) => {
                        // Annotations are only meaningful on properties.
                        self.pos += 1;
                    }
                    _ => break,
                }
            }

            let Some(token) = self.next() else {
                break;
            };
            match &token.kind {
                TokenKind::Ident(word) if word == "import" => self.skip_import()?,
                TokenKind::Ident(word) if word == "export" => {
                    declarations.push(self.parse_declaration(doc)?);
                }
                TokenKind::Ident(word) if word == "interface" || word == "type" => {
                    let (name, name_token) = self.expect_ident("declaration name")?;
                    return Err(self.error_at(
                        name_token.span(),
                        format!("missing `export` modifier on `{name}`"),
                    ));
                }
                other => {
                    return Err(self.error_at(
                        token.span(),
                        format!("expected a declaration, found {}", other.describe()),
                    ));
                }
            }
        }
        Ok(ParsedAst {
            declarations,
            references: self.references,
        })
    }

    /// Skip an `import ... ;` statement wholesale.
    fn skip_import(&mut self) -> Result<(), ParseDiagnostic> {
        loop {
            match self.next() {
                Some(token) if token.kind == TokenKind::Semi => return Ok(()),
                Some(_) => {}
                None => {
                    return Err(
                        self.error_at(self.eof_span(), "unterminated `import` statement")
                    );
                }
            }
        }
    }

    /// Parse a declaration after its `export` keyword: either
    /// `interface Name { ... }` or `type Name = { ... };`.
    fn parse_declaration(
        &mut self,
        doc: Option<String>,
    ) -> Result<Declaration, ParseDiagnostic> {
        let (keyword, keyword_token) = self.expect_ident("`interface` or `type`")?;
        match keyword.as_str() {
            "interface" => {
                let (name, _) = self.expect_ident("interface name")?;
                let fields = self.parse_object_body(&name)?;
                Ok(Declaration { name, fields, doc })
            }
            "type" => {
                let (name, _) = self.expect_ident("type name")?;
                self.expect(&TokenKind::Equals)?;
                let body_span = match self.peek() {
                    Some(token) if token.kind == TokenKind::LBrace => None,
                    Some(token) => Some(token.span()),
                    None => Some(self.eof_span()),
                };
                if let Some(span) = body_span {
                    return Err(
                        self.error_at(span, format!("`{name}` must alias an object type literal"))
                    );
                }
                let fields = self.parse_object_body(&name)?;
                self.eat_separator();
                Ok(Declaration { name, fields, doc })
            }
            other => Err(self.error_at(
                keyword_token.span(),
                format!("expected `interface` or `type` after `export`, found `{other}`"),
            )),
        }
    }

    /// Parse `{ property* }` for the declaration (or inline object) named
    /// `owner`, which is charged as the referencer of any type references
    /// found inside.
    fn parse_object_body(&mut self, owner: &str) -> Result<Vec<FieldDecl>, ParseDiagnostic> {
        self.expect(&TokenKind::LBrace)?;
        let mut fields = Vec::new();
        loop {
            let mut doc = None;
            let mut annotations = Vec::new();
            loop {
                match self.peek().map(|t| (t.kind.clone(), t.span())) {
                    Some((TokenKind::Doc(text), _)) => {
                        doc = Some(text);
                        self.pos += 1;
                    }
                    Some((TokenKind::Annotation(text), span)) => {
                        let annotation = Annotation::parse(&text).ok_or_else(|| {
                            self.error_at(span, format!("unknown annotation `@avro {text}`"))
                        })?;
                        annotations.push(annotation);
                        self.pos += 1;
                    }
                    _ => break,
                }
            }

            match self.peek().map(|t| &t.kind) {
                Some(TokenKind::RBrace) => {
                    self.pos += 1;
                    return Ok(fields);
                }
                None => {
                    return Err(self.error_at(self.eof_span(), "unclosed `{`"));
                }
                _ => {}
            }

            let (name, _) = self.expect_ident("property name")?;
            let optional = if self.peek().map(|t| &t.kind) == Some(&TokenKind::Question) {
                self.pos += 1;
                true
            } else {
                false
            };
            self.expect(&TokenKind::Colon)?;
            let mut ty = self.parse_type(owner)?;
            name_inline_records(&mut ty, &name);
            self.eat_separator();
            fields.push(FieldDecl {
                name,
                ty,
                optional,
                annotations,
                doc,
            });
        }
    }

    /// `A | B | C`; a single branch is not wrapped in a union.
    fn parse_type(&mut self, owner: &str) -> Result<SourceType, ParseDiagnostic> {
        let mut members = vec![self.parse_postfix_type(owner)?];
        while self.peek().map(|t| &t.kind) == Some(&TokenKind::Pipe) {
            self.pos += 1;
            members.push(self.parse_postfix_type(owner)?);
        }
        Ok(if members.len() == 1 {
            members.remove(0)
        } else {
            SourceType::Union(members)
        })
    }

    /// A primary type followed by any number of `[]` suffixes.
    fn parse_postfix_type(&mut self, owner: &str) -> Result<SourceType, ParseDiagnostic> {
        let mut ty = self.parse_primary_type(owner)?;
        while self.peek().map(|t| &t.kind) == Some(&TokenKind::LBracket) {
            self.pos += 1;
            self.expect(&TokenKind::RBracket)?;
            ty = SourceType::Array(Box::new(ty));
        }
        Ok(ty)
    }

    fn parse_primary_type(&mut self, owner: &str) -> Result<SourceType, ParseDiagnostic> {
        let Some(token) = self.next() else {
            return Err(self.error_at(self.eof_span(), "expected a type, found end of input"));
        };
        match &token.kind {
            TokenKind::Ident(name) => Ok(match name.as_str() {
                "string" => SourceType::String,
                "number" => SourceType::Number,
                "boolean" => SourceType::Boolean,
                "Buffer" | "Uint8Array" => SourceType::Bytes,
                "null" => SourceType::Literal(LiteralValue::Null),
                "true" => SourceType::Literal(LiteralValue::Boolean(true)),
                "false" => SourceType::Literal(LiteralValue::Boolean(false)),
                _ => {
                    self.references
                        .entry(name.clone())
                        .or_default()
                        .insert(owner.to_string());
                    SourceType::Reference(name.clone())
                }
            }),
            TokenKind::Str(value) => Ok(SourceType::Literal(LiteralValue::String(value.clone()))),
            TokenKind::Number(value) => Ok(SourceType::Literal(LiteralValue::Number(*value))),
            TokenKind::LParen => {
                let ty = self.parse_type(owner)?;
                self.expect(&TokenKind::RParen)?;
                Ok(ty)
            }
            TokenKind::LBrace => {
                // Inline object type; rewind so parse_object_body sees `{`.
                // The record is named after its property once that is known.
                self.pos -= 1;
                let fields = self.parse_object_body(owner)?;
                Ok(SourceType::Inline(Declaration {
                    name: String::new(),
                    fields,
                    doc: None,
                }))
            }
            other => Err(self.error_at(
                token.span(),
                format!("expected a type, found {}", other.describe()),
            )),
        }
    }
}

/// Give anonymous inline object types the name of the property they
/// annotate, recursing through arrays and unions.
fn name_inline_records(ty: &mut SourceType, name: &str) {
    match ty {
        SourceType::Inline(decl) if decl.name.is_empty() => {
            decl.name = name.to_string();
        }
        SourceType::Array(item) => name_inline_records(item, name),
        SourceType::Union(members) => {
            for member in members {
                name_inline_records(member, name);
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn parse_ok(text: &str) -> ParsedAst {
        parse("test.ts", text).expect("parses")
    }

    fn parse_err(text: &str) -> ParseDiagnostic {
        parse("test.ts", text).expect_err("must not parse")
    }

    #[test]
    fn test_empty_interface() {
        let ast = parse_ok("export interface EmptyInterface {\n}");
        assert_eq!(ast.declarations.len(), 1);
        assert_eq!(ast.declarations[0].name, "EmptyInterface");
        assert!(ast.declarations[0].fields.is_empty());
        assert!(ast.references.is_empty());
    }

    #[test]
    fn test_empty_type_alias() {
        let ast = parse_ok("export type EmptyType = {\n};");
        assert_eq!(ast.declarations[0].name, "EmptyType");
        assert!(ast.declarations[0].fields.is_empty());
    }

    #[test]
    fn test_missing_export_is_an_error() {
        let err = parse_err("interface Foo {\n}");
        assert_eq!(err.message, "missing `export` modifier on `Foo`");
    }

    #[test]
    fn test_primitive_and_optional_properties() {
        let ast = parse_ok(
            "export interface I {\n    requiredBool: boolean;\n    optionalBool?: boolean;\n    requiredBytes: Buffer;\n    alt: Uint8Array;\n    requiredString: string;\n    requiredDouble: number;\n}",
        );
        let fields = &ast.declarations[0].fields;
        assert_eq!(fields.len(), 6);
        assert_eq!(fields[0].ty, SourceType::Boolean);
        assert!(!fields[0].optional);
        assert!(fields[1].optional);
        assert_eq!(fields[2].ty, SourceType::Bytes);
        assert_eq!(fields[3].ty, SourceType::Bytes);
        assert_eq!(fields[4].ty, SourceType::String);
        assert_eq!(fields[5].ty, SourceType::Number);
    }

    #[test]
    fn test_annotation_comments_attach_to_next_property() {
        let ast = parse_ok(
            "export interface I {\n    // @avro int\n    a: number;\n    b: number;\n}",
        );
        let fields = &ast.declarations[0].fields;
        assert_eq!(fields[0].annotations, vec![Annotation::Int]);
        assert!(fields[1].annotations.is_empty());
    }

    #[test]
    fn test_multiple_annotations_accumulate() {
        let ast = parse_ok(
            "export interface I {\n    // @avro int\n    // @avro float\n    a: number;\n}",
        );
        assert_eq!(
            ast.declarations[0].fields[0].annotations,
            vec![Annotation::Int, Annotation::Float]
        );
    }

    #[test]
    fn test_unknown_annotation_is_an_error() {
        let err = parse_err("export interface I {\n    // @avro decimal(1, 2)\n    a: number;\n}");
        assert_eq!(err.message, "unknown annotation `@avro decimal(1, 2)`");
    }

    #[test]
    fn test_plain_line_comments_are_skipped() {
        let ast = parse_ok(
            "export interface I {\n    // not an annotation\n    a: number;\n    // optionalDecimal?: string;\n}",
        );
        assert_eq!(ast.declarations[0].fields.len(), 1);
        assert!(ast.declarations[0].fields[0].annotations.is_empty());
    }

    #[test]
    fn test_jsdoc_attaches_to_declaration_and_property() {
        let ast = parse_ok(
            "/**\n * Information about the interface\n */\nexport interface Interface4 {\n    /**\n     * Information about the field\n     */\n    someField: string;\n}",
        );
        assert_eq!(
            ast.declarations[0].doc.as_deref(),
            Some("Information about the interface")
        );
        assert_eq!(
            ast.declarations[0].fields[0].doc.as_deref(),
            Some("Information about the field")
        );
    }

    #[test]
    fn test_non_doc_block_comments_are_skipped() {
        let ast = parse_ok("/* plain */ export interface I {\n}");
        assert_eq!(ast.declarations[0].doc, None);
    }

    #[test]
    fn test_imports_are_skipped() {
        let ast = parse_ok(
            "import {\n    AvroInt,\n    AvroUuid\n} from \"../types\";\n\nexport interface I {\n    a: AvroInt;\n}",
        );
        assert_eq!(ast.declarations.len(), 1);
        assert_eq!(
            ast.declarations[0].fields[0].ty,
            SourceType::Reference("AvroInt".to_string())
        );
    }

    #[test]
    fn test_literal_types() {
        let ast = parse_ok(
            "export interface I {\n    n: null;\n    t: true;\n    f: false;\n    i: 34;\n    d: 1.5;\n    s: 'foo';\n    q: \"bar\";\n}",
        );
        let fields = &ast.declarations[0].fields;
        assert_eq!(fields[0].ty, SourceType::Literal(LiteralValue::Null));
        assert_eq!(fields[1].ty, SourceType::Literal(LiteralValue::Boolean(true)));
        assert_eq!(
            fields[2].ty,
            SourceType::Literal(LiteralValue::Boolean(false))
        );
        assert_eq!(fields[3].ty, SourceType::Literal(LiteralValue::Number(34.0)));
        assert_eq!(fields[4].ty, SourceType::Literal(LiteralValue::Number(1.5)));
        assert_eq!(
            fields[5].ty,
            SourceType::Literal(LiteralValue::String("foo".to_string()))
        );
        assert_eq!(
            fields[6].ty,
            SourceType::Literal(LiteralValue::String("bar".to_string()))
        );
    }

    #[test]
    fn test_union_of_string_literals() {
        let ast = parse_ok("export interface I {\n    enum: 'a' | 'b' | 'c';\n}");
        assert_eq!(
            ast.declarations[0].fields[0].ty,
            SourceType::Union(vec![
                SourceType::Literal(LiteralValue::String("a".to_string())),
                SourceType::Literal(LiteralValue::String("b".to_string())),
                SourceType::Literal(LiteralValue::String("c".to_string())),
            ])
        );
    }

    #[test]
    fn test_arrays_and_nested_arrays() {
        let ast = parse_ok("export interface I {\n    a: boolean[];\n    e: number[][];\n}");
        let fields = &ast.declarations[0].fields;
        assert_eq!(fields[0].ty, SourceType::Array(Box::new(SourceType::Boolean)));
        assert_eq!(
            fields[1].ty,
            SourceType::Array(Box::new(SourceType::Array(Box::new(SourceType::Number))))
        );
    }

    #[test]
    fn test_parenthesized_union_array() {
        let ast = parse_ok("export interface I {\n    e: ('a' | 'b')[];\n}");
        assert_eq!(
            ast.declarations[0].fields[0].ty,
            SourceType::Array(Box::new(SourceType::Union(vec![
                SourceType::Literal(LiteralValue::String("a".to_string())),
                SourceType::Literal(LiteralValue::String("b".to_string())),
            ])))
        );
    }

    #[test]
    fn test_references_are_recorded_with_referencers() {
        let ast = parse_ok(
            "export type Referenced = {\n    z: string;\n}\n\nexport interface Interface {\n    f: Referenced[];\n    g: AvroDate;\n}",
        );
        assert_eq!(ast.declarations.len(), 2);
        let referencers: Vec<&String> = ast.references["Referenced"].iter().collect();
        assert_eq!(referencers, vec!["Interface"]);
        assert!(ast.references.contains_key("AvroDate"));
    }

    #[test]
    fn test_inline_object_is_named_after_its_property() {
        let ast = parse_ok("export interface I {\n    nested: { x: boolean };\n}");
        match &ast.declarations[0].fields[0].ty {
            SourceType::Inline(decl) => {
                assert_eq!(decl.name, "nested");
                assert_eq!(decl.fields[0].name, "x");
            }
            other => panic!("expected inline object, got {other:?}"),
        }
    }

    #[test]
    fn test_keywords_are_valid_property_names() {
        let ast = parse_ok("export interface I {\n    enum: 'a' | 'b';\n    type: string;\n}");
        assert_eq!(ast.declarations[0].fields[0].name, "enum");
        assert_eq!(ast.declarations[0].fields[1].name, "type");
    }

    #[test]
    fn test_comma_separators_are_accepted() {
        let ast = parse_ok("export interface I { a: string, b: number }");
        assert_eq!(ast.declarations[0].fields.len(), 2);
    }

    #[test]
    fn test_unterminated_string_has_a_span() {
        let err = parse_err("export interface I {\n    s: 'oops\n}");
        assert_eq!(err.message, "unterminated string literal");
    }

    #[test]
    fn test_type_alias_of_non_object_is_rejected() {
        let err = parse_err("export type T = string;");
        assert_eq!(err.message, "`T` must alias an object type literal");
    }

    #[test]
    fn test_unexpected_token_reports_expected() {
        let err = parse_err("export interface I {\n    a boolean;\n}");
        assert!(err.message.starts_with("expected `:`"), "{}", err.message);
    }
}
