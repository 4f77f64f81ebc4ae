use super::lexer::{LexError, Lexer, Token};
use crate::error::{GenError, GenResult};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::str::Utf8Error;

/// Import of raw memory access; never a build dependency.
pub const UNSAFE_IMPORT: &str = "unsafe";

/// Import marking a file that links native code through cgo.
pub const CGO_IMPORT: &str = "C";

/// Non-empty, graphic, no spaces, none of the characters Go reserves.
static IMPORT_PATH_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r##"^[^\s\p{C}!"#$%&'()*,:;<=>?\[\\\]^{|}`\x{FFFD}]+$"##).unwrap()
});

/// Result of reading a file's import declarations.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ImportScan {
    pub imports: BTreeSet<String>,
    pub uses_cgo: bool,
}

/// Read `path` and scan its leading import declarations.
pub fn scan_file(path: &Path) -> GenResult<ImportScan> {
    let bytes = std::fs::read(path).map_err(|e| GenError::io(path, e))?;
    match std::str::from_utf8(&bytes) {
        Ok(source) => scan_source(path, source),
        Err(err) => scan_valid_prefix(path, &bytes, err),
    }
}

/// Only the header has to decode. The valid prefix is scanned on its own and
/// the file is rejected if the scan ran into the bad byte.
fn scan_valid_prefix(path: &Path, bytes: &[u8], err: Utf8Error) -> GenResult<ImportScan> {
    let valid = &bytes[..err.valid_up_to()];
    let bad_line = valid.iter().filter(|&&b| b == b'\n').count() + 1;
    let invalid = || GenError::scan(path, bad_line, "invalid UTF-8 encoding");

    let prefix = std::str::from_utf8(valid).map_err(|_| invalid())?;
    match ImportScanner::new(path, prefix).run() {
        Ok((scan, false)) => Ok(scan),
        Ok((_, true)) => Err(invalid()),
        Err(err) => {
            let before_bad_byte = matches!(&err, GenError::Scan { line, .. } if *line < bad_line);
            Err(if before_bad_byte { err } else { invalid() })
        }
    }
}

/// Scan the package clause and import declarations of `source`.
///
/// Scanning stops at the first top-level token that does not start an import
/// declaration, so function bodies are never tokenized.
pub fn scan_source(path: &Path, source: &str) -> GenResult<ImportScan> {
    ImportScanner::new(path, source).run().map(|(scan, _)| scan)
}

struct ImportScanner<'a> {
    path: PathBuf,
    lexer: Lexer<'a>,
    scan: ImportScan,
}

impl<'a> ImportScanner<'a> {
    fn new(path: &Path, source: &'a str) -> Self {
        Self {
            path: path.to_path_buf(),
            lexer: Lexer::new(source),
            scan: ImportScan::default(),
        }
    }

    /// Returns the scan and whether it stopped at the end of the input.
    fn run(mut self) -> GenResult<(ImportScan, bool)> {
        self.package_clause()?;

        let last = loop {
            match self.next()? {
                Token::Semicolon => continue,
                Token::Ident(ref kw) if kw == "import" => {
                    self.import_decl()?;
                    self.end_of_declaration("import declaration")?;
                }
                token => break token,
            }
        };

        Ok((self.scan, last == Token::Eof))
    }

    fn package_clause(&mut self) -> GenResult<()> {
        let token = self.next_skipping_semicolons()?;
        if token != Token::Ident("package".to_string()) {
            return Err(self.unexpected("expected 'package'", &token));
        }

        match self.next()? {
            Token::Ident(_) => self.end_of_declaration("package clause"),
            other => Err(self.unexpected("expected package name", &other)),
        }
    }

    fn end_of_declaration(&mut self, what: &str) -> GenResult<()> {
        match self.next()? {
            Token::Semicolon | Token::Eof => Ok(()),
            other => Err(self.unexpected(&format!("expected ';' after {}", what), &other)),
        }
    }

    fn import_decl(&mut self) -> GenResult<()> {
        match self.next()? {
            Token::LeftParen => loop {
                match self.next()? {
                    Token::Semicolon => continue,
                    Token::RightParen => return Ok(()),
                    token => {
                        self.import_spec(token)?;
                        match self.next()? {
                            Token::Semicolon => {}
                            Token::RightParen => return Ok(()),
                            other => return Err(self.unexpected("expected ';' or ')'", &other)),
                        }
                    }
                }
            },
            token => self.import_spec(token),
        }
    }

    fn import_spec(&mut self, first: Token) -> GenResult<()> {
        let path = match first {
            Token::Str(path) => path,
            Token::Ident(_) | Token::Dot => match self.next()? {
                Token::Str(path) => path,
                other => return Err(self.unexpected("expected import path", &other)),
            },
            other => return Err(self.unexpected("expected import path", &other)),
        };

        if !IMPORT_PATH_REGEX.is_match(&path) {
            return Err(GenError::scan(
                &self.path,
                self.lexer.line(),
                format!("invalid import path {:?}", path),
            ));
        }

        self.record(path);
        Ok(())
    }

    fn record(&mut self, path: String) {
        if path == CGO_IMPORT {
            self.scan.uses_cgo = true;
        } else if path != UNSAFE_IMPORT {
            self.scan.imports.insert(path);
        }
    }

    fn next(&mut self) -> GenResult<Token> {
        let path = &self.path;
        self.lexer
            .next_token()
            .map_err(|LexError { line, message }| GenError::scan(path, line, message))
    }

    fn next_skipping_semicolons(&mut self) -> GenResult<Token> {
        loop {
            let token = self.next()?;
            if token != Token::Semicolon {
                return Ok(token);
            }
        }
    }

    fn unexpected(&self, expected: &str, found: &Token) -> GenError {
        let found = match found {
            Token::Ident(name) => format!("'{}'", name),
            Token::Str(value) => format!("string {:?}", value),
            Token::Dot => "'.'".to_string(),
            Token::LeftParen => "'('".to_string(),
            Token::RightParen => "')'".to_string(),
            Token::Semicolon => "';'".to_string(),
            Token::Other(c) => format!("'{}'", c),
            Token::Eof => "end of file".to_string(),
        };
        GenError::scan(&self.path, self.lexer.line(), format!("{}, found {}", expected, found))
    }
}
