use crate::ast::{Attr, Child, Document, Node};
use crate::error::ParseError;
use crate::lexer::{Lexer, Pos, Token};

// ── Parser ────────────────────────────────────────────────────────────────

pub struct Parser {
    tokens: Vec<(Token, Pos)>,
    pos: usize,
}

impl Parser {
    pub fn new(tokens: Vec<(Token, Pos)>) -> Self {
        Self { tokens, pos: 0 }
    }

    fn peek(&self) -> &Token {
        self.tokens.get(self.pos).map(|(t, _)| t).unwrap_or(&Token::Eof)
    }

    fn here(&self) -> Pos {
        self.tokens
            .get(self.pos)
            .or_else(|| self.tokens.last())
            .map(|(_, p)| *p)
            .unwrap_or(Pos { line: 1, col: 1 })
    }

    fn advance(&mut self) -> Token {
        let tok = self.tokens.get(self.pos).map(|(t, _)| t.clone()).unwrap_or(Token::Eof);
        if self.pos < self.tokens.len() {
            self.pos += 1;
        }
        tok
    }

    fn error(&self, msg: impl Into<String>) -> ParseError {
        let pos = self.here();
        ParseError::new(msg, pos.line, pos.col)
    }

    fn expect_ident(&mut self) -> Result<String, ParseError> {
        let pos = self.here();
        match self.advance() {
            Token::Ident(s) => Ok(s),
            tok => Err(ParseError::new(format!("expected name, got {tok:?}"), pos.line, pos.col)),
        }
    }

    // ── Document ──────────────────────────────────────────────────────────

    pub fn parse_document(&mut self) -> Result<Document, ParseError> {
        let root = match self.peek() {
            Token::Lt => self.parse_element()?,
            tok => return Err(self.error(format!("expected root element, got {tok:?}"))),
        };
        match self.peek() {
            Token::Eof => Ok(Document { root }),
            tok => Err(self.error(format!("trailing content after root element: {tok:?}"))),
        }
    }

    // ── Element ───────────────────────────────────────────────────────────

    fn parse_element(&mut self) -> Result<Node, ParseError> {
        self.advance(); // consume `<`
        let name = self.expect_ident()?;
        let attrs = self.parse_attrs()?;

        match self.advance() {
            Token::SlashGt => Ok(Node { name, attrs, children: Vec::new() }),
            Token::Gt => {
                let children = self.parse_children(&name)?;
                Ok(Node { name, attrs, children })
            }
            tok => Err(self.error(format!("expected `>` or `/>`, got {tok:?}"))),
        }
    }

    fn parse_attrs(&mut self) -> Result<Vec<Attr>, ParseError> {
        let mut attrs = Vec::new();
        while let Token::Ident(_) = self.peek() {
            let name = self.expect_ident()?;
            match self.advance() {
                Token::Eq => {}
                tok => return Err(self.error(format!("expected `=` after attribute `{name}`, got {tok:?}"))),
            }
            match self.advance() {
                Token::Str(value) => attrs.push(Attr { name, value }),
                tok => return Err(self.error(format!("expected quoted value for attribute `{name}`, got {tok:?}"))),
            }
        }
        Ok(attrs)
    }

    fn parse_children(&mut self, parent: &str) -> Result<Vec<Child>, ParseError> {
        let mut children = Vec::new();
        loop {
            match self.peek() {
                Token::Lt => children.push(Child::Element(self.parse_element()?)),
                Token::Text(_) => {
                    if let Token::Text(t) = self.advance() {
                        children.push(Child::Text(t));
                    }
                }
                Token::LtSlash => {
                    self.advance();
                    let name = self.expect_ident()?;
                    if name != parent {
                        return Err(self.error(format!(
                            "mismatched end tag: expected `</{parent}>`, got `</{name}>`"
                        )));
                    }
                    match self.advance() {
                        Token::Gt => return Ok(children),
                        tok => return Err(self.error(format!("expected `>` to close end tag, got {tok:?}"))),
                    }
                }
                Token::Eof => return Err(self.error(format!("unclosed element `<{parent}>`"))),
                tok => return Err(self.error(format!("unexpected {tok:?} inside `<{parent}>`"))),
            }
        }
    }
}

// ── Public parse entry point ──────────────────────────────────────────────

/// Parse an XML source string into a [`Document`].
pub fn parse_str(src: &str) -> Result<Document, ParseError> {
    let tokens = Lexer::new(src).tokenize()?;
    Parser::new(tokens).parse_document()
}
