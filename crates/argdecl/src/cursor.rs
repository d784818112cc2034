use std::fmt;
use std::ops::Index;

use crate::error::CursorError;

/// A window over a borrowed token slice.
///
/// Indexing is relative to the window start. Advancing only moves the start
/// forward; the backing slice is never copied.
pub struct TokenCursor<'a, T = String> {
    tokens: &'a [T],
    start: usize,
    end: usize,
}

impl<'a, T> TokenCursor<'a, T> {
    /// A window covering every token.
    pub fn new(tokens: &'a [T]) -> Self {
        Self {
            tokens,
            start: 0,
            end: tokens.len(),
        }
    }

    /// A window over `tokens[start..end]`.
    pub fn window(tokens: &'a [T], start: usize, end: usize) -> Result<Self, CursorError> {
        if start > end || end > tokens.len() {
            return Err(CursorError::Window {
                start,
                end,
                len: tokens.len(),
            });
        }
        Ok(Self { tokens, start, end })
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Absolute index of the window start in the backing slice.
    pub fn start(&self) -> usize {
        self.start
    }

    /// Absolute, exclusive index of the window end in the backing slice.
    pub fn end(&self) -> usize {
        self.end
    }

    pub fn get(&self, index: usize) -> Option<&'a T> {
        if index < self.len() {
            self.tokens.get(self.start + index)
        } else {
            None
        }
    }

    pub fn head(&self) -> Option<&'a T> {
        self.get(0)
    }

    pub fn as_slice(&self) -> &'a [T] {
        &self.tokens[self.start..self.end]
    }

    pub fn iter(&self) -> std::slice::Iter<'a, T> {
        self.as_slice().iter()
    }

    /// Move the start forward by `by` tokens.
    pub fn advance(&mut self, by: usize) -> Result<(), CursorError> {
        if by > self.len() {
            return Err(CursorError::Overrun {
                by,
                remaining: self.len(),
            });
        }
        self.start += by;
        Ok(())
    }

    /// Consume everything left in the window.
    pub fn advance_to_end(&mut self) {
        self.start = self.end;
    }
}

impl<T> Clone for TokenCursor<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for TokenCursor<'_, T> {}

impl<T> Index<usize> for TokenCursor<'_, T> {
    type Output = T;

    fn index(&self, index: usize) -> &T {
        match self.get(index) {
            Some(token) => token,
            None => panic!(
                "cursor index {index} out of range for window of length {}",
                self.len()
            ),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for TokenCursor<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenCursor")
            .field("start", &self.start)
            .field("end", &self.end)
            .field("window", &self.as_slice())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn indexing_is_relative_to_start() {
        let argv = tokens(&["a", "b", "c", "d"]);
        let mut cursor = TokenCursor::new(&argv);
        cursor.advance(2).unwrap();
        assert_eq!(cursor.len(), 2);
        assert_eq!(cursor[0], "c");
        assert_eq!(cursor.get(1).map(String::as_str), Some("d"));
        assert_eq!(cursor.get(2), None);
        assert_eq!(cursor.start(), 2);
    }

    #[test]
    fn window_respects_exclusive_end() {
        let argv = tokens(&["a", "b", "c", "d"]);
        let cursor = TokenCursor::window(&argv, 1, 3).unwrap();
        assert_eq!(cursor.as_slice(), &argv[1..3]);
        assert_eq!(cursor.get(2), None);
        assert!(TokenCursor::window(&argv, 3, 5).is_err());
        assert!(TokenCursor::window(&argv, 3, 2).is_err());
    }

    #[test]
    fn advancing_past_end_is_rejected() {
        let argv = tokens(&["a", "b"]);
        let mut cursor = TokenCursor::new(&argv);
        assert_eq!(
            cursor.advance(3),
            Err(CursorError::Overrun { by: 3, remaining: 2 })
        );
        assert_eq!(cursor.len(), 2);
        cursor.advance(2).unwrap();
        assert!(cursor.is_empty());
        assert_eq!(cursor.head(), None);
    }

    #[test]
    fn advance_to_end_empties_window() {
        let argv = tokens(&["a", "b", "c"]);
        let mut cursor = TokenCursor::window(&argv, 0, 2).unwrap();
        cursor.advance_to_end();
        assert!(cursor.is_empty());
        assert_eq!(cursor.start(), 2);
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn index_out_of_window_panics() {
        let argv = tokens(&["a", "b"]);
        let cursor = TokenCursor::window(&argv, 0, 1).unwrap();
        let _ = &cursor[1];
    }
}
