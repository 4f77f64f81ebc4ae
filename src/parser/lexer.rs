use std::iter::Peekable;
use std::str::Chars;
use thiserror::Error;

/// The handful of tokens needed to read a package clause and its imports.
/// Anything else in the file surfaces as `Other` and ends the scan.
///
/// A newline (or the end of input) following an identifier, a string or a
/// closing bracket is reported as `Semicolon`, the same way Go's scanner
/// inserts semicolons automatically.
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    Ident(String),
    Str(String),
    Dot,                   // .
    LeftParen,             // (
    RightParen,            // )
    Semicolon,             // ;
    Other(char),
    Eof,
}

#[derive(Debug, Clone, PartialEq, Error)]
#[error("line {line}: {message}")]
pub struct LexError {
    pub line: usize,
    pub message: String,
}

/// Keywords after which a line break ends the statement.
const TERMINATING_KEYWORDS: &[&str] = &["break", "continue", "fallthrough", "return"];

const KEYWORDS: &[&str] = &[
    "break", "case", "chan", "const", "continue", "default", "defer", "else", "fallthrough", "for",
    "func", "go", "goto", "if", "import", "interface", "map", "package", "range", "return", "select",
    "struct", "switch", "type", "var",
];

pub struct Lexer<'a> {
    input: Peekable<Chars<'a>>,
    line: usize,
    insert_semicolon: bool,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        let input = input.strip_prefix('\u{feff}').unwrap_or(input);
        Self {
            input: input.chars().peekable(),
            line: 1,
            insert_semicolon: false,
        }
    }

    /// Line of the last consumed character, 1-based.
    pub fn line(&self) -> usize {
        self.line
    }

    pub fn next_token(&mut self) -> Result<Token, LexError> {
        let start = self.line;
        self.skip_whitespace_and_comments()?;

        if self.insert_semicolon && (self.line > start || self.input.peek().is_none()) {
            self.insert_semicolon = false;
            return Ok(Token::Semicolon);
        }

        let ch = match self.bump() {
            Some(ch) => ch,
            None => return Ok(Token::Eof),
        };

        let token = match ch {
            '.' => Token::Dot,
            '(' => Token::LeftParen,
            ')' => Token::RightParen,
            ';' => Token::Semicolon,
            '"' => self.read_interpreted_string()?,
            '`' => self.read_raw_string()?,
            c if is_ident_start(c) => self.read_ident(c),
            c => Token::Other(c),
        };

        self.insert_semicolon = match &token {
            Token::Ident(name) => {
                !KEYWORDS.contains(&name.as_str()) || TERMINATING_KEYWORDS.contains(&name.as_str())
            }
            Token::Str(_) | Token::RightParen => true,
            Token::Other(c) => matches!(*c, ']' | '}') || c.is_ascii_digit(),
            _ => false,
        };

        Ok(token)
    }

    fn bump(&mut self) -> Option<char> {
        let ch = self.input.next()?;
        if ch == '\n' {
            self.line += 1;
        }
        Some(ch)
    }

    fn error(&self, message: impl Into<String>) -> LexError {
        LexError {
            line: self.line,
            message: message.into(),
        }
    }

    fn skip_whitespace_and_comments(&mut self) -> Result<(), LexError> {
        loop {
            match self.input.peek() {
                Some(c) if c.is_whitespace() => {
                    self.bump();
                }
                Some('/') => {
                    let mut lookahead = self.input.clone();
                    lookahead.next();
                    match lookahead.peek() {
                        Some('/') => self.skip_line_comment(),
                        Some('*') => self.skip_block_comment()?,
                        _ => return Ok(()),
                    }
                }
                _ => return Ok(()),
            }
        }
    }

    fn skip_line_comment(&mut self) {
        while let Some(&c) = self.input.peek() {
            if c == '\n' {
                break;
            }
            self.bump();
        }
    }

    fn skip_block_comment(&mut self) -> Result<(), LexError> {
        let start = self.line;
        self.bump();
        self.bump();

        let mut prev = '\0';
        while let Some(c) = self.bump() {
            if prev == '*' && c == '/' {
                return Ok(());
            }
            prev = c;
        }

        Err(LexError {
            line: start,
            message: "comment not terminated".to_string(),
        })
    }

    fn read_ident(&mut self, first: char) -> Token {
        let mut ident = String::new();
        ident.push(first);
        while let Some(&c) = self.input.peek() {
            if !is_ident_continue(c) {
                break;
            }
            ident.push(c);
            self.bump();
        }
        Token::Ident(ident)
    }

    fn read_raw_string(&mut self) -> Result<Token, LexError> {
        let start = self.line;
        let mut value = String::new();
        while let Some(c) = self.bump() {
            match c {
                '`' => return Ok(Token::Str(value)),
                '\r' => {}
                c => value.push(c),
            }
        }

        Err(LexError {
            line: start,
            message: "raw string literal not terminated".to_string(),
        })
    }

    fn read_interpreted_string(&mut self) -> Result<Token, LexError> {
        let mut value = String::new();
        loop {
            match self.input.peek().copied() {
                None | Some('\n') => return Err(self.error("string literal not terminated")),
                Some('"') => {
                    self.bump();
                    return Ok(Token::Str(value));
                }
                Some('\\') => {
                    self.bump();
                    value.push(self.read_escape()?);
                }
                Some(c) => {
                    self.bump();
                    value.push(c);
                }
            }
        }
    }

    fn read_escape(&mut self) -> Result<char, LexError> {
        let c = match self.bump() {
            Some(c) => c,
            None => return Err(self.error("escape sequence not terminated")),
        };

        match c {
            'a' => Ok('\u{07}'),
            'b' => Ok('\u{08}'),
            'f' => Ok('\u{0c}'),
            'n' => Ok('\n'),
            'r' => Ok('\r'),
            't' => Ok('\t'),
            'v' => Ok('\u{0b}'),
            '\\' => Ok('\\'),
            '"' => Ok('"'),
            'x' => self.read_code_point(2, 16),
            'u' => self.read_code_point(4, 16),
            'U' => self.read_code_point(8, 16),
            '0'..='7' => {
                let mut digits = String::new();
                digits.push(c);
                for _ in 0..2 {
                    match self.bump() {
                        Some(d @ '0'..='7') => digits.push(d),
                        _ => return Err(self.error("invalid octal escape")),
                    }
                }
                code_point(&digits, 8).ok_or_else(|| self.error("invalid octal escape"))
            }
            other => Err(self.error(format!("unknown escape sequence '\\{}'", other))),
        }
    }

    fn read_code_point(&mut self, len: usize, radix: u32) -> Result<char, LexError> {
        let mut digits = String::with_capacity(len);
        for _ in 0..len {
            match self.bump() {
                Some(d) if d.is_digit(radix) => digits.push(d),
                _ => return Err(self.error("invalid escape sequence")),
            }
        }
        code_point(&digits, radix).ok_or_else(|| self.error("escape is not a valid code point"))
    }
}

fn code_point(digits: &str, radix: u32) -> Option<char> {
    u32::from_str_radix(digits, radix).ok().and_then(char::from_u32)
}

fn is_ident_start(c: char) -> bool {
    c == '_' || c.is_alphabetic()
}

fn is_ident_continue(c: char) -> bool {
    c == '_' || c.is_alphanumeric()
}
