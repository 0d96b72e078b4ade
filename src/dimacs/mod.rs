// Copyright (c) 2015-2022 Frank Fischer <frank-fischer@shadow-soft.de>
//
// This program is free software: you can redistribute it and/or
// modify it under the terms of the GNU General Public License as
// published by the Free Software Foundation, either version 3 of the
// License, or (at your option) any later version.
//
// This program is distributed in the hope that it will be useful, but
// WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the GNU
// General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see  <http://www.gnu.org/licenses/>
//

//! Reading and writing max-flow instances in DIMACS format.

pub mod max;
pub use self::max::{Instance, Triplets};

use std::fmt::Display;
use std::io::{self, BufRead, BufReader, Lines, Read};
use std::str::{FromStr, SplitWhitespace};

use thiserror::Error;

/// Error when reading a file in DIMACS format.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error("Format error on line {line}: {msg}")]
    Format { line: usize, msg: String },
    #[error("Data error on line {line}: {msg}")]
    Data { line: usize, msg: String },
}

pub type Result<T> = std::result::Result<T, Error>;

fn format_error(line: usize, msg: impl Display) -> Error {
    Error::Format {
        line,
        msg: msg.to_string(),
    }
}

/// Reads the significant lines of a DIMACS file.
///
/// Empty lines and comment lines (starting with `c`) are skipped.
pub struct DimacsReader<R: Read> {
    lines: Lines<BufReader<R>>,
    current: String,
    line_number: usize,
}

impl<R: Read> DimacsReader<R> {
    pub fn new(reader: R) -> Self {
        DimacsReader {
            lines: BufReader::new(reader).lines(),
            current: String::new(),
            line_number: 0,
        }
    }

    /// Return the tokens of the next significant line, `None` at the end of the input.
    pub fn read_line(&mut self) -> Result<Option<Tokens<'_>>> {
        for line in &mut self.lines {
            self.line_number += 1;
            let line = line?;
            let content = line.trim_start();
            if !content.is_empty() && !content.starts_with('c') {
                self.current = line;
                return Ok(Some(Tokens {
                    it: self.current.split_whitespace(),
                    line: self.line_number,
                }));
            }
        }
        Ok(None)
    }

    /// Read the next significant line, which must start with `descriptor`.
    ///
    /// Returns the tokens following the descriptor.
    pub fn expect_line(&mut self, descriptor: &str) -> Result<Tokens<'_>> {
        let eof = self.line_number + 1;
        let mut toks = self
            .read_line()?
            .ok_or_else(|| format_error(eof, format!("unexpected end of file, expected '{}' line", descriptor)))?;
        toks.expect(descriptor)?;
        Ok(toks)
    }
}

/// The remaining tokens of a line.
pub struct Tokens<'a> {
    it: SplitWhitespace<'a>,
    pub line: usize,
}

impl<'a> Tokens<'a> {
    /// Return the next token.
    pub fn str(&mut self) -> Result<&'a str> {
        let line = self.line;
        self.it.next().ok_or_else(|| format_error(line, "missing token"))
    }

    /// Consume the next token, which must be `tok`.
    pub fn expect(&mut self, tok: &str) -> Result<()> {
        match self.str()? {
            t if t == tok => Ok(()),
            t => Err(format_error(self.line, format!("expected '{}', got '{}'", tok, t))),
        }
    }

    /// Parse the next token as a number.
    pub fn number<T>(&mut self) -> Result<T>
    where
        T: FromStr,
        T::Err: Display,
    {
        let tok = self.str()?;
        tok.parse()
            .map_err(|e| format_error(self.line, format!("invalid number '{}': {}", tok, e)))
    }

    /// Fail if the line has further tokens.
    pub fn end(&mut self) -> Result<()> {
        match self.it.next() {
            Some(t) => Err(format_error(self.line, format!("unexpected token at end of line: {}", t))),
            None => Ok(()),
        }
    }
}
