//! Shared, projectable references to message storage.
//!
//! A facade never owns its storage directly. It holds a [`Handle`], which is
//! either the root of a storage tree or a projection into a field of some
//! parent handle. Reading a sub-message from a facade produces a new facade
//! whose handle projects into the parent's slot, so both observe the same
//! bytes without copying anything.
//!
//! ```text
//!   Handle<Test> (root) ──────────────► RefCell<Test>
//!        ▲                                  │ .nested
//!        │ parent                           ▼
//!   Handle<Nested> (projection "nested") ── Option<Nested>
//! ```
//!
//! # Borrowing
//!
//! Storage sits behind a [`RefCell`]. [`Handle::read`] and [`Handle::write`]
//! borrow for the duration of their closure only; calling back into a handle
//! on the same tree from inside `write` panics with a borrow error.
//!
//! Handles are `!Send` and `!Sync`, every facade built on one inherits that.

use std::any::Any;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use smallvec::SmallVec;

/// Field names walked from the root storage to the storage a handle points at.
pub type FieldPath = SmallVec<[&'static str; 4]>;

/// A place that can lend out a value of type `T`.
///
/// Object safe so projections can be chained to any depth without the
/// handle's type naming every parent.
trait Place<T> {
    fn read(&self, f: &mut dyn FnMut(&T));
    fn write(&self, f: &mut dyn FnMut(&mut T));
    /// Like `write`, but skips `f` instead of creating an unset slot.
    fn write_if_present(&self, f: &mut dyn FnMut(&mut T));
}

/// The top of a storage tree.
struct Root<T>(RefCell<T>);

impl<T> Place<T> for Root<T> {
    fn read(&self, f: &mut dyn FnMut(&T)) {
        f(&self.0.borrow());
    }

    fn write(&self, f: &mut dyn FnMut(&mut T)) {
        f(&mut self.0.borrow_mut());
    }

    fn write_if_present(&self, f: &mut dyn FnMut(&mut T)) {
        self.write(f);
    }
}

/// A field inside the storage of `parent`.
struct Projection<P: 'static, T> {
    parent: Handle<P>,
    /// Returns `None` when the slot is unset, e.g. an absent sub-message.
    get: fn(&P) -> Option<&T>,
    /// Returns the slot, creating it if needed.
    get_mut: fn(&mut P) -> &mut T,
}

impl<P: 'static, T: Default> Place<T> for Projection<P, T> {
    fn read(&self, f: &mut dyn FnMut(&T)) {
        let get = self.get;
        self.parent.place.read(&mut |parent| match get(parent) {
            Some(value) => f(value),
            // Unset slots read as the default without touching the parent.
            None => f(&T::default()),
        });
    }

    fn write(&self, f: &mut dyn FnMut(&mut T)) {
        let get_mut = self.get_mut;
        self.parent.place.write(&mut |parent| f(get_mut(parent)));
    }

    fn write_if_present(&self, f: &mut dyn FnMut(&mut T)) {
        let get = self.get;
        let get_mut = self.get_mut;
        self.parent.place.write_if_present(&mut |parent| {
            if get(parent).is_some() {
                f(get_mut(parent));
            }
        });
    }
}

/// Shared reference to a message, or to a field within one.
///
/// Cloning a handle is cheap and yields another reference to the same
/// storage. Use [`Handle::snapshot`] to copy the value out.
pub struct Handle<T: 'static> {
    place: Rc<dyn Place<T>>,
    /// Keeps the root alive and identifies the storage tree.
    anchor: Rc<dyn Any>,
    path: FieldPath,
}

impl<T: 'static> Handle<T> {
    /// Creates a handle that owns `value` as the root of a new storage tree.
    pub fn new(value: T) -> Self {
        let root = Rc::new(Root(RefCell::new(value)));
        Handle {
            place: Rc::clone(&root) as Rc<dyn Place<T>>,
            anchor: root as Rc<dyn Any>,
            path: FieldPath::new(),
        }
    }

    /// Projects this handle into one of the fields of `T`.
    ///
    /// `get` reads the field and returns `None` when the slot is unset, in
    /// which case readers observe `U::default()` and the parent is left as is.
    /// `get_mut` must return the slot, creating it when absent; it only runs
    /// for writes.
    pub fn project<U: Default + 'static>(
        &self,
        field: &'static str,
        get: fn(&T) -> Option<&U>,
        get_mut: fn(&mut T) -> &mut U,
    ) -> Handle<U> {
        let mut path = self.path.clone();
        path.push(field);

        let projection = Projection {
            parent: self.clone(),
            get,
            get_mut,
        };
        Handle {
            place: Rc::new(projection),
            anchor: Rc::clone(&self.anchor),
            path,
        }
    }

    /// Runs `f` with shared access to the storage.
    pub fn read<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        let mut f = Some(f);
        let mut out = None;
        self.place.read(&mut |value| {
            if let Some(f) = f.take() {
                out = Some(f(value));
            }
        });
        match out {
            Some(out) => out,
            None => unreachable!("storage place never lent a value"),
        }
    }

    /// Runs `f` with exclusive access to the storage.
    ///
    /// Writing through a projection creates any unset parent slots first.
    pub fn write<R>(&self, f: impl FnOnce(&mut T) -> R) -> R {
        let mut f = Some(f);
        let mut out = None;
        self.place.write(&mut |value| {
            if let Some(f) = f.take() {
                out = Some(f(value));
            }
        });
        match out {
            Some(out) => out,
            None => unreachable!("storage place never lent a value"),
        }
    }

    /// Runs `f` with exclusive access to the storage, if it exists.
    ///
    /// Returns `None` without touching the parent when this handle projects
    /// into an unset slot, at any depth.
    pub fn write_if_present<R>(&self, f: impl FnOnce(&mut T) -> R) -> Option<R> {
        let mut f = Some(f);
        let mut out = None;
        self.place.write_if_present(&mut |value| {
            if let Some(f) = f.take() {
                out = Some(f(value));
            }
        });
        out
    }

    /// Overwrites the storage with `value`.
    pub fn replace(&self, value: T) {
        self.write(move |slot| *slot = value);
    }

    /// Returns a deep copy of the storage.
    pub fn snapshot(&self) -> T
    where
        T: Clone,
    {
        self.read(T::clone)
    }

    /// Fields walked from the root to reach this handle's storage.
    pub fn path(&self) -> &[&'static str] {
        &self.path
    }

    /// Returns `true` if both handles point at the very same storage.
    ///
    /// Two facades read from the same parent field are different values, but
    /// they share storage and this returns `true` for their handles.
    pub fn same_storage(&self, other: &Handle<T>) -> bool {
        let a = Rc::as_ptr(&self.anchor).cast::<()>();
        let b = Rc::as_ptr(&other.anchor).cast::<()>();
        a == b && self.path == other.path
    }
}

impl<T: 'static> Clone for Handle<T> {
    fn clone(&self) -> Self {
        Handle {
            place: Rc::clone(&self.place),
            anchor: Rc::clone(&self.anchor),
            path: self.path.clone(),
        }
    }
}

impl<T: 'static> fmt::Debug for Handle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Handle")
            .field("path", &self.path.as_slice())
            .finish_non_exhaustive()
    }
}
