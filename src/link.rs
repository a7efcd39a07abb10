use std::cell::Cell;
use std::fmt;
use std::marker::PhantomData;
use std::ptr::NonNull;

use crate::color::Color;

/// Parent, left child, right child and color for one (element, tag) pair,
/// embedded directly inside the caller's element.
///
/// `Cell`s, not plain fields: elements are aliased (several `NonNull`s into
/// the same node at once during a rotation or swap), and a tree never gets a
/// unique `&mut` into more than one node.
pub struct Link<E, Tag> {
    parent: Cell<Option<NonNull<E>>>,
    left: Cell<Option<NonNull<E>>>,
    right: Cell<Option<NonNull<E>>>,
    color: Cell<Color>,
    _tag: PhantomData<Tag>,
}

impl<E, Tag> Link<E, Tag> {
    /// A fresh, detached linkage. Unspecified by the data model, but we zero
    /// it anyway — cheaper than debugging a stale pointer from some earlier
    /// tree later.
    pub const fn new() -> Self {
        Link {
            parent: Cell::new(None),
            left: Cell::new(None),
            right: Cell::new(None),
            color: Cell::new(Color::Red),
            _tag: PhantomData,
        }
    }

    #[inline]
    pub(crate) fn parent(&self) -> Option<NonNull<E>> {
        self.parent.get()
    }
    #[inline]
    pub(crate) fn set_parent(&self, p: Option<NonNull<E>>) {
        self.parent.set(p);
    }
    #[inline]
    pub(crate) fn left(&self) -> Option<NonNull<E>> {
        self.left.get()
    }
    #[inline]
    pub(crate) fn set_left(&self, l: Option<NonNull<E>>) {
        self.left.set(l);
    }
    #[inline]
    pub(crate) fn right(&self) -> Option<NonNull<E>> {
        self.right.get()
    }
    #[inline]
    pub(crate) fn set_right(&self, r: Option<NonNull<E>>) {
        self.right.set(r);
    }
    #[inline]
    pub(crate) fn color(&self) -> Color {
        self.color.get()
    }
    #[inline]
    pub(crate) fn set_color(&self, c: Color) {
        self.color.set(c);
    }
}

impl<E, Tag> Default for Link<E, Tag> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E, Tag> fmt::Debug for Link<E, Tag> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Link")
            .field("parent", &self.parent.get().map(|p| p.as_ptr()))
            .field("left", &self.left.get().map(|p| p.as_ptr()))
            .field("right", &self.right.get().map(|p| p.as_ptr()))
            .field("color", &self.color.get())
            .finish()
    }
}

/// Selects which of an element's embedded [`Link`]s a given tree operates on.
///
/// `Tag` is never instantiated; it only exists to let one element type carry
/// several independent linkage records (one tree per tag) without the trees
/// reading or writing each other's fields. Implement this once per tag a type
/// participates in:
///
/// ```ignore
/// struct ByName;
/// struct ByHealth;
///
/// struct Monster {
///     name: String,
///     health: u32,
///     by_name: Link<Monster, ByName>,
///     by_health: Link<Monster, ByHealth>,
/// }
///
/// impl Linked<ByName> for Monster {
///     fn link(&self) -> &Link<Monster, ByName> { &self.by_name }
/// }
/// impl Linked<ByHealth> for Monster {
///     fn link(&self) -> &Link<Monster, ByHealth> { &self.by_health }
/// }
/// ```
pub trait Linked<Tag>: Sized {
    fn link(&self) -> &Link<Self, Tag>;
}
