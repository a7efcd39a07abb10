//! Pointer navigation shared between the tree head (`tree.rs`) and the
//! in-order iterators (`cursor.rs`): fetching a node's `Link`, and walking to
//! the minimum, maximum, successor or predecessor of a node.
//!
//! These are free functions rather than methods on `Tree` because the
//! iterators need them without holding a `Tree` borrow alive any longer than
//! the element reference they hand out.

use std::ptr::NonNull;

use crate::color::Color;
use crate::link::{Link, Linked};

#[inline]
pub(crate) fn link_of<'a, E: Linked<Tag>, Tag>(n: NonNull<E>) -> &'a Link<E, Tag> {
    unsafe { n.as_ref() }.link()
}

#[inline]
pub(crate) fn color_of<E: Linked<Tag>, Tag>(n: Option<NonNull<E>>) -> Color {
    match n {
        None => Color::Black,
        Some(n) => link_of::<E, Tag>(n).color(),
    }
}

/// Leftmost descendant of (and including) `n`.
pub(crate) fn min_of<E: Linked<Tag>, Tag>(mut n: NonNull<E>) -> NonNull<E> {
    while let Some(l) = link_of::<E, Tag>(n).left() {
        n = l;
    }
    n
}

/// Rightmost descendant of (and including) `n`.
pub(crate) fn max_of<E: Linked<Tag>, Tag>(mut n: NonNull<E>) -> NonNull<E> {
    while let Some(r) = link_of::<E, Tag>(n).right() {
        n = r;
    }
    n
}

/// In-order successor: right-then-leftmost, or the first ancestor we reach by
/// climbing out of a left subtree.
pub(crate) fn successor<E: Linked<Tag>, Tag>(n: NonNull<E>) -> Option<NonNull<E>> {
    if let Some(r) = link_of::<E, Tag>(n).right() {
        return Some(min_of::<E, Tag>(r));
    }
    let mut cur = n;
    let mut parent = link_of::<E, Tag>(cur).parent();
    while let Some(p) = parent {
        if link_of::<E, Tag>(p).left() == Some(cur) {
            return Some(p);
        }
        cur = p;
        parent = link_of::<E, Tag>(p).parent();
    }
    None
}

/// In-order predecessor: the mirror image of [`successor`].
pub(crate) fn predecessor<E: Linked<Tag>, Tag>(n: NonNull<E>) -> Option<NonNull<E>> {
    if let Some(l) = link_of::<E, Tag>(n).left() {
        return Some(max_of::<E, Tag>(l));
    }
    let mut cur = n;
    let mut parent = link_of::<E, Tag>(cur).parent();
    while let Some(p) = parent {
        if link_of::<E, Tag>(p).right() == Some(cur) {
            return Some(p);
        }
        cur = p;
        parent = link_of::<E, Tag>(p).parent();
    }
    None
}
