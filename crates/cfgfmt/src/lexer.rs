use crate::error::Error;
use crate::location::Location;
use crate::token::{Token, TokenKind};

/// Turns source bytes into a token sequence.
///
/// Bytes are treated as 8-bit characters, not decoded as UTF-8: anything
/// `>= 0x80` inside a string is copied through verbatim. On the first fatal
/// error the whole token sequence is discarded and the error is returned —
/// there is no partial/recovering mode.
pub(crate) struct Lexer<'a> {
    source: &'a [u8],
    pos: usize,
    loc: Location,
}

impl<'a> Lexer<'a> {
    fn new(source: &'a [u8]) -> Self {
        Self {
            source,
            pos: 0,
            loc: Location::start(),
        }
    }

    fn peek_at(&self, offset: usize) -> Option<u8> {
        self.source.get(self.pos + offset).copied()
    }

    fn peek(&self) -> Option<u8> {
        self.peek_at(0)
    }

    fn bump(&mut self) -> Option<u8> {
        let byte = self.peek()?;
        self.pos += 1;
        if byte == b'\n' {
            self.loc.line += 1;
            self.loc.column = 1;
        } else {
            self.loc.column += 1;
        }
        self.loc.index = self.pos;
        Some(byte)
    }

    fn here(&self) -> Location {
        self.loc
    }

    fn skip_comment(&mut self) {
        while let Some(b) = self.peek() {
            if b == b'\n' {
                break;
            }
            self.bump();
        }
    }

    fn lex_ident(&mut self) -> TokenKind {
        let mut buf = String::new();
        while let Some(b) = self.peek() {
            if is_ident_continue(b) {
                buf.push(b as char);
                self.bump();
            } else {
                break;
            }
        }
        TokenKind::Ident(buf)
    }

    /// Scans a run of digits and `.`, then decides int vs. float and parses
    /// it. Base is inferred the way C's `strtoll(_, _, 0)` would: a `0x`/`0X`
    /// prefix means hex, a bare leading `0` with more digits means octal.
    fn lex_number(&mut self, start: Location) -> Result<TokenKind, Error> {
        let mut raw = String::new();
        let mut saw_dot = false;
        while let Some(b) = self.peek() {
            if b.is_ascii_digit() {
                raw.push(b as char);
                self.bump();
            } else if b == b'.' && !saw_dot && self.peek_at(1).is_some_and(|n| n.is_ascii_digit())
            {
                saw_dot = true;
                raw.push(b as char);
                self.bump();
            } else if b == b'.' && !saw_dot {
                // A lone trailing dot (e.g. the `.` in `a.b`) is not part of
                // the number; let the caller's Dot handling see it.
                break;
            } else {
                break;
            }
        }

        if raw.is_empty() {
            return Err(Error::MalformedNumber(start));
        }

        if saw_dot {
            raw.parse::<f64>()
                .map(TokenKind::Float)
                .map_err(|_| Error::MalformedNumber(start))
        } else if let Some(hex) = raw.strip_prefix("0x").or_else(|| raw.strip_prefix("0X")) {
            i64::from_str_radix(hex, 16)
                .map(TokenKind::Int)
                .map_err(|_| Error::MalformedNumber(start))
        } else if raw.len() > 1 && raw.starts_with('0') {
            i64::from_str_radix(&raw, 8)
                .map(TokenKind::Int)
                .map_err(|_| Error::MalformedNumber(start))
        } else {
            raw.parse::<i64>()
                .map(TokenKind::Int)
                .map_err(|_| Error::MalformedNumber(start))
        }
    }

    fn lex_string(&mut self, start: Location) -> Result<TokenKind, Error> {
        self.bump(); // opening quote
        let mut buf = Vec::new();
        loop {
            match self.bump() {
                None => return Err(Error::UnterminatedString(start)),
                Some(b'"') => break,
                Some(b'\\') => match self.bump() {
                    None => return Err(Error::UnterminatedString(start)),
                    Some(b'n') => buf.push(b'\n'),
                    Some(b't') => buf.push(b'\t'),
                    Some(other) => buf.push(other),
                },
                Some(other) => buf.push(other),
            }
        }
        Ok(TokenKind::String(buf))
    }

    fn next_token(&mut self) -> Result<Option<Token>, Error> {
        loop {
            match self.peek() {
                None => return Ok(None),
                Some(b' ') | Some(b'\n') => {
                    self.bump();
                    continue;
                }
                Some(b'#') => {
                    self.skip_comment();
                    continue;
                }
                _ => break,
            }
        }

        let start = self.here();
        let byte = self.peek().expect("checked above");

        let kind = match byte {
            b'+' => {
                self.bump();
                TokenKind::Plus
            }
            b'-' => {
                self.bump();
                TokenKind::Minus
            }
            b';' => {
                self.bump();
                TokenKind::Semicolon
            }
            b'.' => {
                self.bump();
                TokenKind::Dot
            }
            b'&' => {
                self.bump();
                TokenKind::And
            }
            b'[' => {
                self.bump();
                if self.peek() == Some(b'[') {
                    self.bump();
                    TokenKind::OpenDoubleBrace
                } else {
                    TokenKind::OpenBrace
                }
            }
            b']' => {
                self.bump();
                if self.peek() == Some(b']') {
                    self.bump();
                    TokenKind::CloseDoubleBrace
                } else {
                    TokenKind::CloseBrace
                }
            }
            b'"' => self.lex_string(start)?,
            b if is_ident_start(b) => self.lex_ident(),
            b if b.is_ascii_digit() => self.lex_number(start)?,
            _ => return Err(Error::UnrecognizedByte(start)),
        };

        let end = self.here();
        Ok(Some(Token { kind, start, end }))
    }

    fn tokenize(mut self) -> Result<Vec<Token>, Error> {
        let mut tokens = Vec::new();
        while let Some(token) = self.next_token()? {
            let is_number = matches!(token.kind, TokenKind::Int(_) | TokenKind::Float(_));
            tokens.push(token);

            if is_number {
                while self.peek() == Some(b'x') {
                    let cross_start = self.here();
                    self.bump();
                    tokens.push(Token {
                        kind: TokenKind::VectorCross,
                        start: cross_start,
                        end: self.here(),
                    });

                    let num_start = self.here();
                    match self.peek() {
                        Some(b) if b.is_ascii_digit() => {
                            let kind = self.lex_number(num_start)?;
                            tokens.push(Token {
                                kind,
                                start: num_start,
                                end: self.here(),
                            });
                        }
                        _ => return Err(Error::MalformedVector(cross_start)),
                    }
                }
            }

            log::trace!("lexed {:?}", tokens.last().expect("just pushed"));
        }
        Ok(tokens)
    }
}

pub(crate) fn tokenize(source: &[u8]) -> Result<Vec<Token>, Error> {
    Lexer::new(source).tokenize()
}

fn is_ident_start(b: u8) -> bool {
    b.is_ascii_alphabetic() || b == b'_'
}

fn is_ident_continue(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn kinds(src: &str) -> Vec<TokenKind> {
        tokenize(src.as_bytes())
            .unwrap()
            .into_iter()
            .map(|t| t.kind)
            .collect()
    }

    #[test]
    fn skips_whitespace_and_comments() {
        assert_eq!(
            kinds("a # a comment\n b"),
            vec![
                TokenKind::Ident("a".into()),
                TokenKind::Ident("b".into())
            ]
        );
    }

    #[test]
    fn lexes_vector_literal() {
        assert_eq!(
            kinds("180x190"),
            vec![
                TokenKind::Int(180),
                TokenKind::VectorCross,
                TokenKind::Int(190)
            ]
        );
    }

    #[test]
    fn lexes_float_vector() {
        assert_eq!(
            kinds("1.0x2.0x3.0"),
            vec![
                TokenKind::Float(1.0),
                TokenKind::VectorCross,
                TokenKind::Float(2.0),
                TokenKind::VectorCross,
                TokenKind::Float(3.0),
            ]
        );
    }

    #[test]
    fn lexes_escaped_string() {
        assert_eq!(
            kinds(r#""viva \"happy\"""#),
            vec![TokenKind::String(b"viva \"happy\"".to_vec())]
        );
    }

    #[test]
    fn unterminated_string_is_fatal() {
        assert!(matches!(
            tokenize(br#""oops"#),
            Err(Error::UnterminatedString(_))
        ));
    }

    #[test]
    fn dotted_key_is_dot_tokens_not_a_number() {
        assert_eq!(
            kinds("a.b.c"),
            vec![
                TokenKind::Ident("a".into()),
                TokenKind::Dot,
                TokenKind::Ident("b".into()),
                TokenKind::Dot,
                TokenKind::Ident("c".into()),
            ]
        );
    }

    #[test]
    fn line_counts_only_on_newline() {
        let tokens = tokenize(b"a\nb\nc").unwrap();
        assert_eq!(tokens[1].start.line, 2);
        assert_eq!(tokens[2].start.line, 3);
    }
}
