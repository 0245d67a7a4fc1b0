use crate::location::Location;
use thiserror::Error;

/// Everything that can go wrong while lexing, parsing, or querying a
/// document. Carried as data rather than panicking — callers are expected
/// to check for an error and display it, not to unwind past us.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("Failed to parse number at {0}")]
    MalformedNumber(Location),

    #[error("Unrecognized character at {0}")]
    UnrecognizedByte(Location),

    #[error("Failed to parse vector at {0}")]
    MalformedVector(Location),

    #[error("Failed to parse string at {0}")]
    UnterminatedString(Location),

    #[error("Unexpected token {kind} at {loc}")]
    UnexpectedToken { kind: &'static str, loc: Location },

    #[error("Expected an identifier or string at {0}")]
    ExpectedKey(Location),

    #[error("Expected an opening brace at {0}")]
    ExpectedOpenBrace(Location),

    #[error("Expected a closing brace at {0}")]
    ExpectedCloseBrace(Location),

    #[error("Expected a closing double brace at {0}")]
    ExpectedCloseDoubleBrace(Location),

    #[error("Vector size is greater than 4 at {0}")]
    VectorTooLong(Location),

    #[error("Trying to use non-numeric value in vector at {0}")]
    NonNumericVectorElement(Location),

    #[error("ShortType needs to start with an identifier at {0}")]
    ShortTypeMissingIdent(Location),

    #[error("dotted key traverses non-table at {0}")]
    DottedKeyTraversesNonTable(Location),

    #[error("Unexpected end of input")]
    UnexpectedEof,
}
