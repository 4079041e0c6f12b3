//! List-like proxy over a repeated field.

use std::fmt;

use crate::handle::Handle;

/// View over a repeated field of a message.
///
/// The proxy does not own the elements: it projects into the parent
/// message's storage, so pushes and replacements land in the parent and are
/// visible to every facade over it. Order is always insertion order.
///
/// A `RepeatedField` compares equal to a `Vec`, slice or array holding the
/// same elements in the same order.
///
/// ```ignore
/// let message = Test::new().with_repeated_field([1, 2]);
/// message.repeated_field().push(3);
/// assert_eq!(message.repeated_field(), [1, 2, 3]);
/// ```
pub struct RepeatedField<T: 'static> {
    handle: Handle<Vec<T>>,
}

impl<T: 'static> RepeatedField<T> {
    /// Wraps a handle that points at the repeated field's `Vec`.
    pub fn from_handle(handle: Handle<Vec<T>>) -> Self {
        RepeatedField { handle }
    }

    /// Number of elements.
    pub fn len(&self) -> usize {
        self.handle.read(Vec::len)
    }

    /// Returns `true` if the field holds no elements.
    pub fn is_empty(&self) -> bool {
        self.handle.read(Vec::is_empty)
    }

    /// Appends an element at the end.
    pub fn push(&self, value: T) {
        self.handle.write(move |values| values.push(value));
    }

    /// Removes and returns the last element.
    pub fn pop(&self) -> Option<T> {
        self.handle.write(Vec::pop)
    }

    /// Removes every element. The field itself stays in place.
    pub fn clear(&self) {
        self.handle.write(Vec::clear);
    }

    /// Replaces the contents with `values`, keeping their order.
    ///
    /// `values` is drained before the storage is borrowed, so it may read
    /// the message it is assigned into.
    pub fn assign<I: IntoIterator<Item = T>>(&self, values: I) {
        let values: Vec<T> = values.into_iter().collect();
        self.handle.replace(values);
    }

    /// Shared handle to the underlying `Vec`.
    pub fn handle(&self) -> &Handle<Vec<T>> {
        &self.handle
    }
}

impl<T: Clone + 'static> RepeatedField<T> {
    /// Returns a copy of the element at `index`.
    pub fn get(&self, index: usize) -> Option<T> {
        self.handle.read(|values| values.get(index).cloned())
    }

    /// Copies the elements out.
    pub fn to_vec(&self) -> Vec<T> {
        self.handle.snapshot()
    }
}

impl<T: 'static> Extend<T> for RepeatedField<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        let mut pending: Vec<T> = iter.into_iter().collect();
        self.handle.write(move |values| values.append(&mut pending));
    }
}

impl<T: fmt::Debug + 'static> fmt::Debug for RepeatedField<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.handle.read(|values| f.debug_list().entries(values).finish())
    }
}

impl<T: PartialEq + 'static> PartialEq for RepeatedField<T> {
    fn eq(&self, other: &RepeatedField<T>) -> bool {
        if self.handle.same_storage(&other.handle) {
            return true;
        }
        self.handle
            .read(|a| other.handle.read(|b| a.as_slice() == b.as_slice()))
    }
}

impl<T: PartialEq + 'static> PartialEq<[T]> for RepeatedField<T> {
    fn eq(&self, other: &[T]) -> bool {
        self.handle.read(|values| values.as_slice() == other)
    }
}

impl<T: PartialEq + 'static> PartialEq<&[T]> for RepeatedField<T> {
    fn eq(&self, other: &&[T]) -> bool {
        self == *other
    }
}

impl<T: PartialEq + 'static, const N: usize> PartialEq<[T; N]> for RepeatedField<T> {
    fn eq(&self, other: &[T; N]) -> bool {
        self == other.as_slice()
    }
}

impl<T: PartialEq + 'static> PartialEq<Vec<T>> for RepeatedField<T> {
    fn eq(&self, other: &Vec<T>) -> bool {
        self == other.as_slice()
    }
}

impl<T: PartialEq + 'static> PartialEq<RepeatedField<T>> for Vec<T> {
    fn eq(&self, other: &RepeatedField<T>) -> bool {
        other == self
    }
}
