/// A position in the source text.
///
/// `line` and `column` are 1-based; `index` is the 0-based byte offset.
/// Only `\n` advances the line counter — the reference implementation this
/// format was ported from also advanced it on `\t`, which inflated reported
/// line numbers; that bug is not reproduced here.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Location {
    pub line: usize,
    pub column: usize,
    pub index: usize,
}

impl Location {
    pub fn start() -> Self {
        Self {
            line: 1,
            column: 1,
            index: 0,
        }
    }
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}
