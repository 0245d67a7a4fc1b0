use crate::error::Error;
use crate::location::Location;
use crate::token::{Token, TokenKind};
use crate::value::{Array, Table, Value};

/// Recursive-descent parser over an already-lexed token stream. Every
/// production returns `Result<_, Error>`; on failure the caller destroys
/// whatever partial subtree it owns (in Rust this just means the `Result`
/// is never stitched into the tree) and propagates the same error upward.
pub(crate) struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

pub(crate) fn parse_root(tokens: Vec<Token>) -> Result<Value, Error> {
    let mut parser = Parser { tokens, pos: 0 };
    let value = match parser.peek_kind() {
        None => return Err(Error::UnexpectedEof),
        Some(TokenKind::OpenDoubleBrace) => parser.parse_array(),
        Some(TokenKind::OpenBrace) => parser.parse_table(true),
        _ => parser.parse_table(false),
    }?;
    Ok(value)
}

impl Parser {
    fn peek_kind(&self) -> Option<&TokenKind> {
        self.tokens.get(self.pos).map(|t| &t.kind)
    }

    fn peek_kind_at(&self, offset: usize) -> Option<&TokenKind> {
        self.tokens.get(self.pos + offset).map(|t| &t.kind)
    }

    fn here(&self) -> Location {
        self.tokens
            .get(self.pos)
            .map(|t| t.start)
            .or_else(|| self.tokens.last().map(|t| t.end))
            .unwrap_or_default()
    }

    fn bump(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn bump_kind(&mut self) -> Option<TokenKind> {
        self.bump().map(|t| t.kind)
    }

    fn expect_open_brace(&mut self) -> Result<(), Error> {
        match self.bump_kind() {
            Some(TokenKind::OpenBrace) => Ok(()),
            _ => Err(Error::ExpectedOpenBrace(self.here())),
        }
    }

    fn expect_close_brace(&mut self) -> Result<(), Error> {
        match self.bump_kind() {
            Some(TokenKind::CloseBrace) => Ok(()),
            _ => Err(Error::ExpectedCloseBrace(self.here())),
        }
    }

    fn expect_close_double_brace(&mut self) -> Result<(), Error> {
        match self.bump_kind() {
            Some(TokenKind::CloseDoubleBrace) => Ok(()),
            _ => Err(Error::ExpectedCloseDoubleBrace(self.here())),
        }
    }

    /// `table_body` in the grammar. `require_braces` selects between the
    /// implicit top-level table (run to end of input) and a `[ ... ]`
    /// literal (run until the matching `]`).
    fn parse_table(&mut self, require_braces: bool) -> Result<Value, Error> {
        if require_braces {
            self.expect_open_brace()?;
        }

        let mut table = Table::new();
        loop {
            match self.peek_kind() {
                None => break,
                Some(TokenKind::CloseBrace) if require_braces => break,
                _ => {}
            }
            self.parse_table_element(&mut table)?;
        }

        if require_braces {
            self.expect_close_brace()?;
        }

        Ok(Value::Table(table))
    }

    /// `table_entry` in the grammar: either a value-first shorthand or a
    /// `key_path value` pair, inserted under its (possibly dotted,
    /// possibly newly created) key.
    fn parse_table_element(&mut self, table: &mut Table) -> Result<(), Error> {
        let value_first = match self.peek_kind() {
            Some(TokenKind::Plus) => Some(Value::Bool(true)),
            Some(TokenKind::Minus) => Some(Value::Bool(false)),
            Some(TokenKind::Semicolon) => Some(Value::Null),
            _ => None,
        };
        if value_first.is_some() {
            self.bump();
        }

        let key_loc = self.here();
        let keys = self.parse_key_path()?;

        let value = match value_first {
            Some(v) => v,
            None => self.parse_value()?,
        };

        insert_dotted(table, &keys, value, key_loc)
    }

    /// `key_path = key { "." key }`.
    fn parse_key_path(&mut self) -> Result<Vec<String>, Error> {
        let mut keys = Vec::new();
        loop {
            let loc = self.here();
            let key = match self.bump_kind() {
                Some(TokenKind::Ident(s)) => s,
                Some(TokenKind::String(bytes)) => String::from_utf8_lossy(&bytes).into_owned(),
                _ => return Err(Error::ExpectedKey(loc)),
            };
            keys.push(key);

            if matches!(self.peek_kind(), Some(TokenKind::Dot)) {
                self.bump();
                continue;
            }
            break;
        }
        Ok(keys)
    }

    /// `value` in the grammar.
    fn parse_value(&mut self) -> Result<Value, Error> {
        let here = self.here();
        match self.peek_kind() {
            None => Err(Error::UnexpectedEof),
            Some(TokenKind::OpenDoubleBrace) => self.parse_array(),
            Some(TokenKind::OpenBrace) => self.parse_table(true),
            Some(TokenKind::Semicolon) => {
                self.bump();
                Ok(Value::Null)
            }
            Some(TokenKind::Int(_)) | Some(TokenKind::Float(_)) => self.parse_number_or_vector(),
            Some(TokenKind::String(_)) => match self.bump_kind() {
                Some(TokenKind::String(bytes)) => Ok(Value::String(bytes)),
                _ => unreachable!(),
            },
            Some(TokenKind::And) => self.parse_short_type(),
            Some(other) => Err(Error::UnexpectedToken {
                kind: other.name(),
                loc: here,
            }),
        }
    }

    /// `number_or_vector = number { "x" number }`, capped at 4 elements.
    fn parse_number_or_vector(&mut self) -> Result<Value, Error> {
        let start = self.here();
        let first = self.bump_kind().expect("caller checked Int/Float");

        if !matches!(self.peek_kind(), Some(TokenKind::VectorCross)) {
            return Ok(number_to_value(first));
        }

        let mut array = Array::new();
        array.push(number_to_value(first));

        while matches!(self.peek_kind(), Some(TokenKind::VectorCross)) {
            self.bump();
            let elem_loc = self.here();
            match self.bump_kind() {
                Some(kind @ TokenKind::Int(_)) | Some(kind @ TokenKind::Float(_)) => {
                    array.push(number_to_value(kind))
                }
                _ => return Err(Error::NonNumericVectorElement(elem_loc)),
            }
        }

        if array.len() > 4 {
            return Err(Error::VectorTooLong(start));
        }

        Ok(Value::Array(array))
    }

    /// `short_type = "&" ident { "." ident }`.
    fn parse_short_type(&mut self) -> Result<Value, Error> {
        let and_loc = self.here();
        self.bump();

        let mut parts = Vec::new();
        match self.bump_kind() {
            Some(TokenKind::Ident(s)) => parts.push(s),
            _ => return Err(Error::ShortTypeMissingIdent(and_loc)),
        }

        while matches!(self.peek_kind(), Some(TokenKind::Dot))
            && matches!(self.peek_kind_at(1), Some(TokenKind::Ident(_)))
        {
            self.bump();
            match self.bump_kind() {
                Some(TokenKind::Ident(s)) => parts.push(s),
                _ => unreachable!("just peeked an Ident"),
            }
        }

        Ok(Value::ShortType(parts.join(".")))
    }

    /// `array_literal = "[[" { value } "]]"`.
    fn parse_array(&mut self) -> Result<Value, Error> {
        self.bump(); // OpenDoubleBrace, checked by caller
        let mut array = Array::new();
        loop {
            match self.peek_kind() {
                None => return Err(Error::ExpectedCloseDoubleBrace(self.here())),
                Some(TokenKind::CloseDoubleBrace) => break,
                _ => {}
            }
            array.push(self.parse_value()?);
        }
        self.expect_close_double_brace()?;
        Ok(Value::Array(array))
    }
}

fn number_to_value(kind: TokenKind) -> Value {
    match kind {
        TokenKind::Int(i) => Value::Int(i),
        TokenKind::Float(f) => Value::Float(f),
        _ => unreachable!("caller only passes Int/Float"),
    }
}

/// Walks (creating as needed) all but the last key in `keys`, then inserts
/// `value` under the last one. Descending through an existing non-table
/// value is a parse error — the reference implementation silently
/// overwrote the scalar, which this crate treats as the bug it is.
fn insert_dotted(
    table: &mut Table,
    keys: &[String],
    value: Value,
    loc: Location,
) -> Result<(), Error> {
    match keys.split_first() {
        None => Err(Error::ExpectedKey(loc)),
        Some((head, [])) => {
            table.push(head.clone(), value);
            Ok(())
        }
        Some((head, rest)) => {
            if let Some(existing) = table.get_mut(head) {
                return match existing {
                    Value::Table(nested) => insert_dotted(nested, rest, value, loc),
                    _ => Err(Error::DottedKeyTraversesNonTable(loc)),
                };
            }
            let mut nested = Table::new();
            insert_dotted(&mut nested, rest, value, loc)?;
            table.push(head.clone(), Value::Table(nested));
            Ok(())
        }
    }
}
