use std::cmp::{max, min};
use std::fmt::{self, Debug, Display, Formatter};
use std::hash::{Hash, Hasher};
use std::ops::Add;
use std::rc::Rc;

/// Shared, immutable bytes of one input file or of one name created while transforming.
#[derive(Clone)]
pub struct Source(Rc<[u8]>);

impl Source {
    pub fn new(code: Vec<u8>) -> Source {
        Source(code.into())
    }

    pub fn code(&self) -> &[u8] {
        &self.0
    }

    pub fn range(&self, start: usize, end: usize) -> SourceRange {
        debug_assert!(start <= end && end <= self.0.len());
        SourceRange {
            source: self.clone(),
            start,
            end,
        }
    }
}

/// Bytes `start..end` of a source.
///
/// A range compares, hashes and prints as its text, so names and literals from different sources
/// or positions are interchangeable when they are spelled the same. Position only matters for
/// error reporting.
#[derive(Clone)]
pub struct SourceRange {
    pub source: Source,
    pub start: usize,
    pub end: usize,
}

impl SourceRange {
    /// A range over a new source holding only `code`, for text with no position in the input.
    pub fn anonymous<T: Into<Vec<u8>>>(code: T) -> SourceRange {
        let code = code.into();
        let end = code.len();
        Source::new(code).range(0, end)
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.source.code()[self.start..self.end]
    }

    pub fn as_str(&self) -> &str {
        // Input is checked to be UTF-8 before lexing, and token boundaries never split a character.
        unsafe { std::str::from_utf8_unchecked(self.as_slice()) }
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Grows this range to also cover `other`, which must come from the same source.
    pub fn extend(&mut self, other: &SourceRange) {
        self.start = min(self.start, other.start);
        self.end = max(self.end, other.end);
    }
}

/// Smallest range covering both operands.
impl Add for &SourceRange {
    type Output = SourceRange;

    fn add(self, rhs: Self) -> SourceRange {
        let mut covering = self.clone();
        covering.extend(rhs);
        covering
    }
}

impl Display for SourceRange {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Debug for SourceRange {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}@{}..{}", self.as_str(), self.start, self.end)
    }
}

impl Hash for SourceRange {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.as_slice().hash(state);
    }
}

impl PartialEq for SourceRange {
    fn eq(&self, other: &SourceRange) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl Eq for SourceRange {}

impl PartialEq<[u8]> for SourceRange {
    fn eq(&self, other: &[u8]) -> bool {
        self.as_slice() == other
    }
}

impl PartialEq<str> for SourceRange {
    fn eq(&self, other: &str) -> bool {
        *self == *other.as_bytes()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::{Source, SourceRange};

    #[test]
    fn test_ranges_compare_by_text() {
        let source = Source::new(b"let ab = ab".to_vec());
        let first = source.range(4, 6);
        let second = source.range(9, 11);
        assert_eq!(first, second);
        assert_eq!(first, SourceRange::anonymous("ab"));
        assert!(first == *"ab");
        assert!(first != *"abc");
        let set: HashSet<_> = [first.clone(), second].into_iter().collect();
        assert_eq!(set.len(), 1);
        assert_eq!((&source.range(0, 3) + &first).as_str(), "let ab");
    }
}
