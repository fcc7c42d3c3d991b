use crate::error::ParseError;

// ── Token ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    /// `<` opening a start tag.
    Lt,
    /// `</` opening an end tag.
    LtSlash,
    /// `>` closing a tag.
    Gt,
    /// `/>` closing a self-closing tag.
    SlashGt,
    /// `=` between an attribute name and its value.
    Eq,
    /// Tag or attribute name.
    Ident(String),
    /// Quoted attribute value (entities decoded).
    Str(String),
    /// Character data between tags (entities decoded, not all-whitespace).
    Text(String),
    /// Sentinel.
    Eof,
}

/// 1-based source position of a token.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pos {
    pub line: usize,
    pub col: usize,
}

// ── Lexer ─────────────────────────────────────────────────────────────────

/// Tokenizer for the XML subset kelp documents use.
///
/// Two modes: outside tags everything up to the next `<` is character data;
/// inside tags (between `<` and `>`) names, `=`, and quoted values are
/// tokenized individually. Comments (`<!-- -->`) and processing
/// instructions / declarations (`<? ?>`) are skipped entirely.
pub struct Lexer<'s> {
    src: &'s str,
    pos: usize,
    line: usize,
    col: usize,
    in_tag: bool,
}

impl<'s> Lexer<'s> {
    pub fn new(src: &'s str) -> Self {
        Self { src, pos: 0, line: 1, col: 1, in_tag: false }
    }

    pub fn tokenize(mut self) -> Result<Vec<(Token, Pos)>, ParseError> {
        let mut tokens = Vec::new();
        loop {
            let (tok, pos) = self.next_token()?;
            let eof = tok == Token::Eof;
            tokens.push((tok, pos));
            if eof {
                break;
            }
        }
        Ok(tokens)
    }

    fn here(&self) -> Pos {
        Pos { line: self.line, col: self.col }
    }

    fn err(&self, msg: impl Into<String>) -> ParseError {
        ParseError::new(msg, self.line, self.col)
    }

    fn peek(&self) -> Option<char> {
        self.src[self.pos..].chars().next()
    }

    fn advance(&mut self) -> Option<char> {
        let ch = self.src[self.pos..].chars().next()?;
        self.pos += ch.len_utf8();
        if ch == '\n' {
            self.line += 1;
            self.col = 1;
        } else {
            self.col += 1;
        }
        Some(ch)
    }

    fn starts_with(&self, s: &str) -> bool {
        self.src[self.pos..].starts_with(s)
    }

    /// Consume up to and including `until`; error at EOF.
    fn skip_until(&mut self, until: &str, what: &str) -> Result<(), ParseError> {
        while !self.starts_with(until) {
            if self.advance().is_none() {
                return Err(self.err(format!("unterminated {what}")));
            }
        }
        for _ in 0..until.chars().count() {
            self.advance();
        }
        Ok(())
    }

    fn next_token(&mut self) -> Result<(Token, Pos), ParseError> {
        if self.in_tag {
            self.next_in_tag()
        } else {
            self.next_in_content()
        }
    }

    // ── content mode ──────────────────────────────────────────────────────

    fn next_in_content(&mut self) -> Result<(Token, Pos), ParseError> {
        loop {
            // Skip comments and declarations before deciding what comes next.
            if self.starts_with("<!--") {
                self.skip_until("-->", "comment")?;
                continue;
            }
            if self.starts_with("<?") {
                self.skip_until("?>", "declaration")?;
                continue;
            }
            if self.starts_with("<!") {
                // DOCTYPE and friends are not part of the widget grammar.
                self.skip_until(">", "declaration")?;
                continue;
            }
            break;
        }

        let pos = self.here();
        match self.peek() {
            None => Ok((Token::Eof, pos)),
            Some('<') => {
                self.advance();
                self.in_tag = true;
                if self.peek() == Some('/') {
                    self.advance();
                    Ok((Token::LtSlash, pos))
                } else {
                    Ok((Token::Lt, pos))
                }
            }
            Some(_) => {
                let mut raw = String::new();
                while let Some(c) = self.peek() {
                    if c == '<' {
                        break;
                    }
                    raw.push(c);
                    self.advance();
                }
                if raw.trim().is_empty() {
                    // Inter-tag whitespace is not character data.
                    return self.next_token();
                }
                let text = decode_entities(&raw)
                    .map_err(|e| ParseError::new(e.message, pos.line, pos.col))?;
                Ok((Token::Text(text), pos))
            }
        }
    }

    // ── tag mode ──────────────────────────────────────────────────────────

    fn next_in_tag(&mut self) -> Result<(Token, Pos), ParseError> {
        while matches!(self.peek(), Some(c) if c.is_whitespace()) {
            self.advance();
        }
        let pos = self.here();
        match self.peek() {
            None => Err(self.err("unterminated tag")),
            Some('>') => {
                self.advance();
                self.in_tag = false;
                Ok((Token::Gt, pos))
            }
            Some('/') => {
                self.advance();
                if self.peek() == Some('>') {
                    self.advance();
                    self.in_tag = false;
                    Ok((Token::SlashGt, pos))
                } else {
                    Err(self.err("expected `>` after `/`"))
                }
            }
            Some('=') => {
                self.advance();
                Ok((Token::Eq, pos))
            }
            Some(q @ ('"' | '\'')) => {
                self.advance();
                let mut raw = String::new();
                loop {
                    match self.advance() {
                        None => return Err(self.err("unterminated attribute value")),
                        Some(c) if c == q => break,
                        Some(c) => raw.push(c),
                    }
                }
                let value = decode_entities(&raw)
                    .map_err(|e| ParseError::new(e.message, pos.line, pos.col))?;
                Ok((Token::Str(value), pos))
            }
            Some(c) if is_name_start(c) => {
                let mut name = String::new();
                while matches!(self.peek(), Some(c) if is_name_char(c)) {
                    name.push(self.advance().unwrap_or_default());
                }
                Ok((Token::Ident(name), pos))
            }
            Some(other) => Err(self.err(format!("unexpected character {other:?} in tag"))),
        }
    }
}

fn is_name_start(c: char) -> bool {
    c.is_alphabetic() || c == '_'
}

fn is_name_char(c: char) -> bool {
    c.is_alphanumeric() || matches!(c, '_' | '-' | '.' | ':')
}

/// Decode the five predefined XML entities. Unknown entities are an error.
fn decode_entities(raw: &str) -> Result<String, ParseError> {
    if !raw.contains('&') {
        return Ok(raw.to_string());
    }
    let mut out = String::with_capacity(raw.len());
    let mut rest = raw;
    while let Some(i) = rest.find('&') {
        out.push_str(&rest[..i]);
        rest = &rest[i..];
        let end = rest
            .find(';')
            .ok_or_else(|| ParseError::new("unterminated entity reference", 0, 0))?;
        match &rest[1..end] {
            "lt" => out.push('<'),
            "gt" => out.push('>'),
            "amp" => out.push('&'),
            "quot" => out.push('"'),
            "apos" => out.push('\''),
            other => {
                return Err(ParseError::new(format!("unknown entity `&{other};`"), 0, 0));
            }
        }
        rest = &rest[end + 1..];
    }
    out.push_str(rest);
    Ok(out)
}
