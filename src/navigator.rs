//! Wrap-around index navigation for the lightbox and hero carousel.

use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum NavigatorError {
    #[error("index {index} out of range for {len} items")]
    InvalidIndex { index: usize, len: usize },
    #[error("cannot navigate an empty list")]
    EmptyList,
}

/// A cursor over a non-empty list that wraps at both ends.
#[derive(Debug, Clone)]
pub struct IndexNavigator<T> {
    items: Vec<T>,
    index: usize,
}

impl<T> IndexNavigator<T> {
    /// Open at `start`. The list must be non-empty and `start` in range.
    pub fn new(items: Vec<T>, start: usize) -> Result<Self, NavigatorError> {
        if items.is_empty() {
            return Err(NavigatorError::EmptyList);
        }
        if start >= items.len() {
            return Err(NavigatorError::InvalidIndex {
                index: start,
                len: items.len(),
            });
        }
        Ok(Self {
            items,
            index: start,
        })
    }

    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> &T {
        self.index = self.peek_next_index();
        self.current()
    }

    pub fn previous(&mut self) -> &T {
        self.index = self.peek_previous_index();
        self.current()
    }

    /// Jump to `index`. An out-of-range index leaves the cursor unchanged.
    pub fn goto(&mut self, index: usize) -> Result<&T, NavigatorError> {
        if index >= self.items.len() {
            return Err(NavigatorError::InvalidIndex {
                index,
                len: self.items.len(),
            });
        }
        self.index = index;
        Ok(self.current())
    }

    /// Replace the list, clamping `start` into range.
    ///
    /// An empty replacement is rejected and the cursor keeps its old list.
    pub fn reset(&mut self, items: Vec<T>, start: usize) -> Result<(), NavigatorError> {
        if items.is_empty() {
            return Err(NavigatorError::EmptyList);
        }
        self.index = start.min(items.len() - 1);
        self.items = items;
        Ok(())
    }

    pub fn current(&self) -> &T {
        &self.items[self.index]
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Always false: construction and reset reject empty lists.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn peek_next_index(&self) -> usize {
        (self.index + 1) % self.items.len()
    }

    pub fn peek_previous_index(&self) -> usize {
        (self.index + self.items.len() - 1) % self.items.len()
    }
}
