use alloc::vec::Vec;
use core::ops::Deref;

use crate::error::{GfxError, Result};

/// Insertion-ordered list with a fixed capacity.
///
/// Storage is reserved up front; pushing never reallocates. Removal shifts
/// the following elements down by one, preserving order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoundedList<T> {
    items: Vec<T>,
    capacity: usize,
}

impl<T> BoundedList<T> {
    /// Reserves room for exactly `capacity` items.
    pub fn try_new(capacity: usize) -> Result<Self> {
        let mut items = Vec::new();
        items.try_reserve_exact(capacity)?;
        Ok(Self { items, capacity })
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn is_full(&self) -> bool {
        self.items.len() >= self.capacity
    }

    /// Appends `item`, or fails with `ResourceExhausted` leaving the list
    /// untouched.
    pub fn push(&mut self, item: T) -> Result<()> {
        if self.is_full() {
            return Err(GfxError::ResourceExhausted);
        }
        self.items.push(item);
        Ok(())
    }

    pub fn remove(&mut self, index: usize) -> Option<T> {
        (index < self.items.len()).then(|| self.items.remove(index))
    }

    pub fn as_slice(&self) -> &[T] {
        &self.items
    }
}

impl<T: PartialEq> BoundedList<T> {
    pub fn position(&self, item: &T) -> Option<usize> {
        self.items.iter().position(|candidate| candidate == item)
    }

    /// Removes `item` by identity, returning the index it occupied.
    pub fn remove_item(&mut self, item: &T) -> Result<usize> {
        let index = self.position(item).ok_or(GfxError::NotFound)?;
        self.items.remove(index);
        Ok(index)
    }
}

impl<T> Deref for BoundedList<T> {
    type Target = [T];

    fn deref(&self) -> &[T] {
        self.as_slice()
    }
}

impl<'l, T> IntoIterator for &'l BoundedList<T> {
    type Item = &'l T;
    type IntoIter = core::slice::Iter<'l, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
