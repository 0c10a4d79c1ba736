use crate::{Error, Result};

/// Infinitely repeating, read-only cursor over a non-empty slice.
///
/// When the last element has been returned the cursor starts over at the
/// first element. A fresh cursor is built for every frame and dropped once
/// the frame is drawn.
#[derive(Debug, Clone)]
pub struct RepeatingCursor<'a, T> {
    items: &'a [T],
    position: usize,
}

impl<'a, T> RepeatingCursor<'a, T> {
    pub fn new(items: &'a [T]) -> Result<Self> {
        if items.is_empty() {
            return Err(Error::EmptyPalette);
        }
        Ok(Self { items, position: 0 })
    }

    /// Return the element at the current position together with that
    /// position, then move to the next element, wrapping to 0 at the end.
    pub fn advance(&mut self) -> (&'a T, usize) {
        let position = self.position;
        self.position += 1;
        if self.position >= self.items.len() {
            self.position = 0;
        }
        (&self.items[position], position)
    }

    /// Map an unbounded external index onto a position in the slice
    #[inline]
    pub fn normalize(&self, index: usize) -> usize {
        index % self.items.len()
    }

    /// Place the cursor where `index` calls to [`advance`](Self::advance)
    /// from the start would have left it.
    pub fn skip_to(&mut self, index: usize) {
        self.position = self.normalize(index);
    }

    #[inline]
    pub fn position(&self) -> usize {
        self.position
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Always false; an empty cursor cannot be constructed
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl<'a, T> Iterator for RepeatingCursor<'a, T> {
    type Item = (&'a T, usize);

    fn next(&mut self) -> Option<Self::Item> {
        Some(self.advance())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (usize::MAX, None)
    }
}
