// Copyright (c) 2015-2025 Frank Fischer <frank-fischer@shadow-soft.de>
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

//! Reading files in DIMACS format.
//!
//! Node tokens are read as [labels](crate::Label), so besides the usual
//! node numbers `1..n` symbolic names such as `3p` are accepted.
//!
//! Besides min-cost-flow instances and solutions the same line format is
//! used for [tables](table) of recorded model results.

pub mod min;
pub mod table;

use std::fmt;
use std::io::{self, BufRead, BufReader, Read};
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

pub struct DimacsReader<R: Read> {
    io: BufReader<R>,

    line: String,
    line_number: usize,
}

impl<R: Read> DimacsReader<R> {
    pub fn new(reader: R) -> Self {
        DimacsReader {
            io: BufReader::new(reader),
            line: String::new(),
            line_number: 0,
        }
    }

    fn read_line(&mut self) -> Result<Option<Tokens>> {
        let line = &mut self.line;
        loop {
            line.clear();
            if self.io.read_line(line)? == 0 {
                return Ok(None);
            }

            self.line_number += 1;
            let mut it = line.char_indices();
            while let Some((i, c)) = it.next() {
                if char::is_whitespace(c) {
                    continue;
                }
                if c == 'c' || c == '\n' {
                    break;
                }
                return Ok(Some(Tokens {
                    it: line[i..].split_whitespace(),
                    line: self.line_number,
                }));
            }
        }
    }

    // Expect a line with the given descriptor.
    //
    // If the next line does not have this descriptor, an error is returned.
    // Otherwise the *remaining* tokens are returned.
    fn expect_line(&mut self, descriptor: char) -> Result<Tokens> {
        let line_number = self.line_number;
        let mut toks = self.read_line()?.ok_or_else(|| Error::Format {
            line: line_number,
            msg: format!("unexpected end of file, expected '{}' line", descriptor),
        })?;
        match toks.next() {
            Some(d) if d.len() == 1 && d.starts_with(descriptor) => Ok(toks),
            Some(d) => Err(Error::Format {
                line: toks.line,
                msg: format!("unexpected line, expected '{}', got '{}'", descriptor, d),
            }),
            None => Err(Error::Format {
                line: toks.line,
                msg: "unexpected empty line".to_string(),
            }),
        }
    }

    // Read the next line with one of the given descriptors.
    //
    // At the end of the file `Ok(None)` is returned. Otherwise the
    // descriptor and the *remaining* tokens are returned.
    fn read_one_line_of(&mut self, descriptors: &[&str]) -> Result<Option<(&str, Tokens)>> {
        if let Some(mut toks) = self.read_line()? {
            match toks.next() {
                Some(d) if descriptors.iter().any(|&desc| d == desc) => Ok(Some((d, toks))),
                Some(d) => Err(Error::Format {
                    line: toks.line,
                    msg: format!(
                        "unexpected line, expected one of '{}', got '{}'",
                        descriptors.join("', '"),
                        d
                    ),
                }),
                None => Err(Error::Format {
                    line: toks.line,
                    msg: "unexpected empty line".to_string(),
                }),
            }
        } else {
            Ok(None)
        }
    }
}

/// Iterates over the tokens in a line.
pub struct Tokens<'a> {
    it: SplitWhitespace<'a>,
    pub line: usize,
}

impl<'a> Iterator for Tokens<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<&'a str> {
        self.it.next()
    }
}

impl<'a> Tokens<'a> {
    /// Return an error if the next token is not the given token.
    pub fn expect(&mut self, tok: &str) -> Result<()> {
        let nxt = self.str()?;
        if nxt == tok {
            Ok(())
        } else {
            Err(Error::Format {
                line: self.line,
                msg: format!("expected '{}', got '{}'", tok, nxt),
            })
        }
    }

    /// Returns the next token as `&str`.
    pub fn str(&mut self) -> Result<&'a str> {
        self.it.next().ok_or_else(|| Error::Format {
            line: self.line,
            msg: "expected token".to_string(),
        })
    }

    /// Returns the next token converted to a number.
    pub fn number<T>(&mut self) -> Result<T>
    where
        T: FromStr,
        T::Err: fmt::Display,
    {
        let line = self.line;
        self.it
            .next()
            .ok_or_else(|| Error::Format {
                line,
                msg: "expected number".to_string(),
            })?
            .parse()
            .map_err(|e| Error::Format {
                line,
                msg: format!("{}", e),
            })
    }

    /// Ensures that there is no next token.
    pub fn end(&mut self) -> Result<()> {
        if let Some(s) = self.it.next() {
            Err(Error::Format {
                line: self.line,
                msg: format!("unexpected token at end of line: {}", s),
            })
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{DimacsReader, Error};
    use std::io::Cursor;

    #[test]
    fn test_skip_comments() {
        let mut r = DimacsReader::new(Cursor::new("c comment\n\n   \np min 2 1\n"));
        let mut toks = r.expect_line('p').unwrap();
        assert_eq!(toks.line, 4);
        toks.expect("min").unwrap();
        assert_eq!(toks.number::<usize>().unwrap(), 2);
        assert_eq!(toks.number::<usize>().unwrap(), 1);
        toks.end().unwrap();
        assert!(r.read_one_line_of(&["a"]).unwrap().is_none());
    }

    #[test]
    fn test_bad_descriptor() {
        let mut r = DimacsReader::new(Cursor::new("p min 2 1\nx 1 2\n"));
        r.expect_line('p').unwrap();
        match r.read_one_line_of(&["n", "a"]) {
            Err(Error::Format { line, .. }) => assert_eq!(line, 2),
            _ => panic!("expected format error"),
        }
    }

    #[test]
    fn test_bad_number() {
        let mut r = DimacsReader::new(Cursor::new("p min x 1\n"));
        let mut toks = r.expect_line('p').unwrap();
        toks.expect("min").unwrap();
        assert!(toks.number::<usize>().is_err());
    }
}
