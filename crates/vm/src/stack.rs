//! A LIFO stack with a configured empty-stack error.
//!
//! Used for the frame stack, the call stack and the data stack. Each
//! reports emptiness with its own [`Fault`].

use crate::error::Fault;

#[derive(Debug, Clone)]
pub struct Stack<T> {
    items: Vec<T>,
    on_empty: fn() -> Fault,
}

impl<T> Stack<T> {
    /// Create an empty stack that fails with `on_empty()` when popped empty.
    pub fn new(on_empty: fn() -> Fault) -> Self {
        Self {
            items: Vec::new(),
            on_empty,
        }
    }

    pub fn push(&mut self, item: T) {
        self.items.push(item);
    }

    pub fn pop(&mut self) -> Result<T, Fault> {
        self.items.pop().ok_or_else(self.on_empty)
    }

    pub fn top(&self) -> Result<&T, Fault> {
        self.items.last().ok_or_else(self.on_empty)
    }

    pub fn top_mut(&mut self) -> Result<&mut T, Fault> {
        let on_empty = self.on_empty;
        self.items.last_mut().ok_or_else(on_empty)
    }

    /// Like [`top`](Self::top), but an empty stack yields `None`.
    pub fn top_tolerant(&self) -> Option<&T> {
        self.items.last()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Items from bottom to top.
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }
}

impl<T: PartialEq> PartialEq for Stack<T> {
    fn eq(&self, other: &Self) -> bool {
        self.items == other.items
    }
}
