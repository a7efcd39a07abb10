//! Integrity verification, kept in the core (not hidden behind a feature or
//! pushed out to a separate crate) because the test suite calls it after
//! every mutation and because, per the implementation budget, it is roughly
//! as large a piece of this crate as the balancing machinery itself.

use std::ptr::NonNull;

use crate::color::Color;
use crate::link::Linked;
use crate::nav::link_of;
use crate::order::Order;
use crate::tree::Tree;

impl<E, Tag, O, C, const MULTIPLE: bool> Tree<E, Tag, O, C, MULTIPLE>
where
    E: Linked<Tag>,
{
    /// Checks, in O(n):
    ///
    /// - every child's parent back-reference names this node,
    /// - BST order under this tree's ordering (non-strict when `MULTIPLE`) —
    ///   against every ancestor that bounds a node, not just its immediate
    ///   parent,
    /// - the root is black and has no parent,
    /// - no red node has a red child,
    /// - every root-to-nil path has the same black-height,
    /// - `len()` equals the reachable node count.
    ///
    /// This is test/debug tooling, not a hot-path operation; a `false`
    /// result indicates an implementation bug or a violated `unsafe`
    /// precondition, never a normal runtime outcome.
    pub fn verify_integrity(&self) -> bool
    where
        O: Order<E>,
    {
        if let Some(r) = self.root {
            let rl = link_of::<E, Tag>(r);
            if rl.color() != Color::Black || rl.parent().is_some() {
                return false;
            }
        }

        let mut count = 0usize;
        if check_subtree::<E, Tag, O>(self.root, None, None, None, &self.order, MULTIPLE, &mut count).is_none() {
            return false;
        }
        count == self.len
    }
}

/// Walks one subtree, checking every node against the tightest ancestor
/// bounds inherited so far rather than just its immediate parent — a node
/// two or more levels below a boundary is still bound by it (e.g. the left
/// child of a node's right child must still be `>=` that node), so the
/// bound has to travel down with the recursion, not reset at each level.
///
/// `lower`/`upper` are the nearest ancestor establishing a floor/ceiling for
/// this whole subtree (the ancestor under whose right/left subtree,
/// respectively, we currently are), or `None` if unbounded on that side.
/// Returns the subtree's black-height, or `None` on any violation.
fn check_subtree<E, Tag, O>(
    n: Option<NonNull<E>>,
    expected_parent: Option<NonNull<E>>,
    lower: Option<NonNull<E>>,
    upper: Option<NonNull<E>>,
    order: &O,
    multiple: bool,
    count: &mut usize,
) -> Option<usize>
where
    E: Linked<Tag>,
    O: Order<E>,
{
    let Some(n) = n else { return Some(1) };

    let link = link_of::<E, Tag>(n);
    if link.parent() != expected_parent {
        return None;
    }

    *count += 1;
    let is_red = link.color().is_red();
    if is_red {
        if link.left().map(|l| link_of::<E, Tag>(l).color().is_red()).unwrap_or(false) {
            return None;
        }
        if link.right().map(|r| link_of::<E, Tag>(r).color().is_red()).unwrap_or(false) {
            return None;
        }
    }

    let n_ref = unsafe { n.as_ref() };

    // `n` sits in `lower`'s right subtree: n must be >= lower.
    if let Some(lo) = lower {
        let lo_ref = unsafe { lo.as_ref() };
        let ok = if multiple { !order.less(n_ref, lo_ref) } else { order.less(lo_ref, n_ref) };
        if !ok {
            return None;
        }
    }
    // `n` sits in `upper`'s left subtree: n must be <= upper.
    if let Some(hi) = upper {
        let hi_ref = unsafe { hi.as_ref() };
        let ok = if multiple { !order.less(hi_ref, n_ref) } else { order.less(n_ref, hi_ref) };
        if !ok {
            return None;
        }
    }

    let lh = check_subtree::<E, Tag, O>(link.left(), Some(n), lower, Some(n), order, multiple, count)?;
    let rh = check_subtree::<E, Tag, O>(link.right(), Some(n), Some(n), upper, order, multiple, count)?;
    if lh != rh {
        return None;
    }
    Some(lh + if is_red { 0 } else { 1 })
}
