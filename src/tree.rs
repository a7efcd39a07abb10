use std::fmt;
use std::marker::PhantomData;
use std::ptr::NonNull;

use crate::callbacks::{Callbacks, NoopCallbacks};
use crate::color::Color;
use crate::cursor::Iter;
use crate::link::{Link, Linked};
use crate::nav::{self, color_of, link_of};
use crate::order::{Compare, NaturalOrder, Order};

/// Duplicate rejection: the one recoverable failure this crate reports to
/// the caller. See the crate-level docs for the other two failure kinds
/// (precondition violation, pushed into `unsafe`; invariant violation,
/// surfaced through [`Tree::verify_integrity`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertError {
    /// `MULTIPLE` is not set on this tree and an equivalent element is
    /// already linked. The tree is left unchanged.
    Duplicate,
}

impl fmt::Display for InsertError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InsertError::Duplicate => write!(f, "an equivalent element is already linked in this tree"),
        }
    }
}

impl std::error::Error for InsertError {}

/// The tree head: root pointer, element count, and the ordering/callback
/// policies. Does not own any element — dropping a `Tree` does not touch the
/// elements linked into it, matching the lifecycle rule that a tree's
/// destruction only drops the root reference.
///
/// `MULTIPLE` selects whether equivalent elements may coexist (see the
/// data model); it is a `const` generic rather than a runtime flag because
/// it is compile-time configuration, and monomorphizing on it lets the
/// duplicate-rejection branch disappear entirely when it's unset.
pub struct Tree<E, Tag, O = NaturalOrder, C = NoopCallbacks, const MULTIPLE: bool = false> {
    pub(crate) root: Option<NonNull<E>>,
    pub(crate) len: usize,
    pub(crate) order: O,
    pub(crate) callbacks: C,
    _tag: PhantomData<fn(&Tag)>,
}

impl<E, Tag, O: Default, C: Default, const MULTIPLE: bool> Default for Tree<E, Tag, O, C, MULTIPLE> {
    fn default() -> Self {
        Self::with_order_and_callbacks(O::default(), C::default())
    }
}

impl<E, Tag, O: Default, C: Default, const MULTIPLE: bool> Tree<E, Tag, O, C, MULTIPLE> {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<E, Tag, O, C: Default, const MULTIPLE: bool> Tree<E, Tag, O, C, MULTIPLE> {
    pub fn with_order(order: O) -> Self {
        Self::with_order_and_callbacks(order, C::default())
    }
}

impl<E, Tag, O, C, const MULTIPLE: bool> Tree<E, Tag, O, C, MULTIPLE> {
    pub fn with_order_and_callbacks(order: O, callbacks: C) -> Self {
        Tree { root: None, len: 0, order, callbacks, _tag: PhantomData }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub fn callbacks(&self) -> &C {
        &self.callbacks
    }

    #[inline]
    pub fn callbacks_mut(&mut self) -> &mut C {
        &mut self.callbacks
    }

    #[inline]
    pub fn order(&self) -> &O {
        &self.order
    }
}

impl<E, Tag, O, C, const MULTIPLE: bool> Tree<E, Tag, O, C, MULTIPLE>
where
    E: Linked<Tag>,
{
    #[inline]
    fn link<'a>(n: NonNull<E>) -> &'a Link<E, Tag> {
        link_of::<E, Tag>(n)
    }

    #[inline]
    fn color_of(n: Option<NonNull<E>>) -> Color {
        color_of::<E, Tag>(n)
    }

    /// First element in in-order (the minimum), if any.
    pub fn first(&self) -> Option<&E> {
        self.root.map(|r| unsafe { nav::min_of::<E, Tag>(r).as_ref() })
    }

    /// Last element in in-order (the maximum), if any.
    pub fn last(&self) -> Option<&E> {
        self.root.map(|r| unsafe { nav::max_of::<E, Tag>(r).as_ref() })
    }

    /// In-order traversal of every linked element.
    pub fn iter(&self) -> Iter<'_, E, Tag> {
        match self.root {
            None => Iter::empty(),
            Some(r) => Iter::new(Some(nav::min_of::<E, Tag>(r)), Some(nav::max_of::<E, Tag>(r))),
        }
    }

    /// Removes every node from the tree without invoking any destructor —
    /// the caller retains ownership of every element exactly as before,
    /// just detached.
    pub fn clear(&mut self) {
        // Detach every node so a stray read of a linkage field after clear()
        // sees None rather than a dangling pointer into a tree that no
        // longer exists. Walking is safe: we're the unique borrower of the
        // whole tree and every node's linkage is unreachable from outside it.
        fn detach_subtree<E: Linked<Tag>, Tag>(n: Option<NonNull<E>>) {
            let Some(n) = n else { return };
            let l = link_of::<E, Tag>(n);
            let (left, right) = (l.left(), l.right());
            l.set_parent(None);
            l.set_left(None);
            l.set_right(None);
            detach_subtree::<E, Tag>(left);
            detach_subtree::<E, Tag>(right);
        }
        detach_subtree::<E, Tag>(self.root);
        self.root = None;
        self.len = 0;
    }

    // ---- search -------------------------------------------------------

    pub fn find<K: ?Sized>(&self, key: &K) -> Option<&E>
    where
        O: Compare<E, K>,
    {
        let mut cur = self.root;
        while let Some(c) = cur {
            let c_ref = unsafe { c.as_ref() };
            if self.order.key_less_than(key, c_ref) {
                cur = Self::link(c).left();
            } else if self.order.less_than_key(c_ref, key) {
                cur = Self::link(c).right();
            } else {
                return Some(c_ref);
            }
        }
        None
    }

    /// First element `m` with `!less(m, key)`.
    pub fn lower_bound<K: ?Sized>(&self, key: &K) -> Option<&E>
    where
        O: Compare<E, K>,
    {
        let mut cur = self.root;
        let mut result = None;
        while let Some(c) = cur {
            let c_ref = unsafe { c.as_ref() };
            if !self.order.less_than_key(c_ref, key) {
                result = Some(c_ref);
                cur = Self::link(c).left();
            } else {
                cur = Self::link(c).right();
            }
        }
        result
    }

    /// First element `m` with `less(key, m)`.
    pub fn upper_bound<K: ?Sized>(&self, key: &K) -> Option<&E>
    where
        O: Compare<E, K>,
    {
        let mut cur = self.root;
        let mut result = None;
        while let Some(c) = cur {
            let c_ref = unsafe { c.as_ref() };
            if self.order.key_less_than(key, c_ref) {
                result = Some(c_ref);
                cur = Self::link(c).left();
            } else {
                cur = Self::link(c).right();
            }
        }
        result
    }

    // ---- insertion ------------------------------------------------------

    /// Descends from the root under this tree's order and attaches `node`.
    ///
    /// # Safety
    ///
    /// `node` must be detached from this (tree, tag) pair, must outlive the
    /// tree, and must not move while linked.
    pub unsafe fn insert(&mut self, node: &E) -> Result<(), InsertError>
    where
        O: Order<E>,
        C: Callbacks<E>,
    {
        let node_ptr = NonNull::from(node);
        let mut cur = self.root;
        let mut parent = None;
        let mut insert_left = false;

        while let Some(c) = cur {
            parent = Some(c);
            let c_ref = c.as_ref();
            if self.order.less(node, c_ref) {
                insert_left = true;
                cur = Self::link(c).left();
            } else if self.order.less(c_ref, node) {
                insert_left = false;
                cur = Self::link(c).right();
            } else if MULTIPLE {
                // Duplicate placement rule: ties break toward the right
                // subtree, so temporally-later equal insertions land later
                // in in-order traversal.
                insert_left = false;
                cur = Self::link(c).right();
            } else {
                return Err(InsertError::Duplicate);
            }
        }

        self.attach_leaf(parent, insert_left, node_ptr);
        Ok(())
    }

    /// Like [`Tree::insert`], but if `node` would land immediately before
    /// `hint` in-order (or at the end, for `hint = None`) this skips the
    /// root-to-leaf descent and attaches it directly. Falls back to a full
    /// [`Tree::insert`] whenever the hint turns out wrong — it's an
    /// optimization, never a way to override the order.
    ///
    /// # Safety
    ///
    /// Same contract as [`Tree::insert`]; `hint`, if present, must be linked
    /// in this (tree, tag) pair.
    pub unsafe fn insert_before(&mut self, node: &E, hint: Option<&E>) -> Result<(), InsertError>
    where
        O: Order<E>,
        C: Callbacks<E>,
    {
        let node_ptr = NonNull::from(node);

        match hint {
            Some(h) => {
                let h_ptr = NonNull::from(h);
                let pred = nav::predecessor::<E, Tag>(h_ptr);
                let pred_ok = match pred {
                    None => true,
                    Some(p) => self.order.less(p.as_ref(), node),
                };
                if pred_ok && self.order.less(node, h) {
                    if Self::link(h_ptr).left().is_none() {
                        self.attach_leaf(Some(h_ptr), true, node_ptr);
                    } else {
                        let p = pred.expect(
                            "h has a left child, so its in-order predecessor exists and has no right child",
                        );
                        self.attach_leaf(Some(p), false, node_ptr);
                    }
                    return Ok(());
                }
            }
            None => {
                let last = self.root.map(|r| nav::max_of::<E, Tag>(r));
                let ok = match last {
                    None => true,
                    Some(l) => self.order.less(l.as_ref(), node),
                };
                if ok {
                    self.attach_leaf(last, false, node_ptr);
                    return Ok(());
                }
            }
        }

        self.insert(node)
    }

    fn attach_leaf(&mut self, parent: Option<NonNull<E>>, insert_left: bool, node: NonNull<E>)
    where
        C: Callbacks<E>,
    {
        Self::link(node).set_parent(parent);
        Self::link(node).set_left(None);
        Self::link(node).set_right(None);
        Self::link(node).set_color(Color::Red);

        match parent {
            None => self.root = Some(node),
            Some(p) => {
                if insert_left {
                    Self::link(p).set_left(Some(node));
                } else {
                    Self::link(p).set_right(Some(node));
                }
            }
        }
        self.len += 1;
        self.callbacks.leaf_inserted(unsafe { node.as_ref() });
        self.insert_fixup(node);
    }

    fn insert_fixup(&mut self, mut z: NonNull<E>)
    where
        C: Callbacks<E>,
    {
        loop {
            let zp = match Self::link(z).parent() {
                Some(p) if Self::link(p).color().is_red() => p,
                _ => break,
            };
            // zp is red, and the root is always black, so zp has a parent.
            let zpp = Self::link(zp)
                .parent()
                .expect("a red node's parent cannot be the (always black) root");

            if Self::link(zpp).left() == Some(zp) {
                let uncle = Self::link(zpp).right();
                if Self::color_of(uncle) == Color::Red {
                    Self::link(zp).set_color(Color::Black);
                    Self::link(uncle.unwrap()).set_color(Color::Black);
                    Self::link(zpp).set_color(Color::Red);
                    z = zpp;
                } else {
                    if Self::link(zp).right() == Some(z) {
                        z = zp;
                        self.rotate_left(z);
                    }
                    let zp = Self::link(z).parent().unwrap();
                    let zpp = Self::link(zp).parent().unwrap();
                    Self::link(zp).set_color(Color::Black);
                    Self::link(zpp).set_color(Color::Red);
                    self.rotate_right(zpp);
                }
            } else {
                let uncle = Self::link(zpp).left();
                if Self::color_of(uncle) == Color::Red {
                    Self::link(zp).set_color(Color::Black);
                    Self::link(uncle.unwrap()).set_color(Color::Black);
                    Self::link(zpp).set_color(Color::Red);
                    z = zpp;
                } else {
                    if Self::link(zp).left() == Some(z) {
                        z = zp;
                        self.rotate_right(z);
                    }
                    let zp = Self::link(z).parent().unwrap();
                    let zpp = Self::link(zp).parent().unwrap();
                    Self::link(zp).set_color(Color::Black);
                    Self::link(zpp).set_color(Color::Red);
                    self.rotate_left(zpp);
                }
            }
        }
        Self::link(self.root.unwrap()).set_color(Color::Black);
    }

    // ---- removal ----------------------------------------------------

    /// Detaches a linked node from this tree.
    ///
    /// # Safety
    ///
    /// `node` must currently be linked in this (tree, tag) pair.
    pub unsafe fn remove(&mut self, node: &E)
    where
        O: Order<E>,
        C: Callbacks<E>,
    {
        let z = NonNull::from(node);
        let zl = Self::link(z).left();
        let zr = Self::link(z).right();

        let (victim, x, xp, removed_color) = if zl.is_some() && zr.is_some() {
            let s = nav::min_of::<E, Tag>(zr.unwrap());
            self.swap_nodes(z, s);
            self.callbacks.swapped(z.as_ref(), s.as_ref());
            // z now occupies s's former position, with z.left == None (s had
            // no left child) and at most one child, z.right.
            let removed_color = Self::link(z).color();
            let x = Self::link(z).right();
            let xp = Self::link(z).parent();
            (z, x, xp, removed_color)
        } else {
            let c = zl.or(zr);
            let removed_color = Self::link(z).color();
            let xp = Self::link(z).parent();
            (z, c, xp, removed_color)
        };

        self.transplant(victim, x);
        if removed_color == Color::Black {
            self.delete_fixup(x, xp);
        }

        self.callbacks.delete_leaf(victim.as_ref());

        Self::link(victim).set_parent(None);
        Self::link(victim).set_left(None);
        Self::link(victim).set_right(None);
        Self::link(victim).set_color(Color::Red);
        self.len -= 1;
    }

    /// Exchanges the tree positions of `n` and `s` by pointer relinkage —
    /// never by copying either element's contents. `s` must be `n`'s
    /// in-order successor (so `s.left` is `None`).
    ///
    // Two cases below: s is n's direct right child, or s is further down the
    // left spine of n's right subtree and has its own parent `q` to fix up.
    // TODO: the two branches only differ in how s's old parent slot and s's
    // left-child linkage get wired up; worth collapsing once a third case
    // shows up that actually needs the duplication split this way.
    fn swap_nodes(&mut self, n: NonNull<E>, s: NonNull<E>) {
        let n_parent = Self::link(n).parent();
        let n_left = Self::link(n).left();
        let n_right = Self::link(n).right();
        let n_color = Self::link(n).color();

        let s_right = Self::link(s).right();
        let s_color = Self::link(s).color();

        if n_right == Some(s) {
            // s is n's direct right child.
            Self::link(s).set_parent(n_parent);
            match n_parent {
                None => self.root = Some(s),
                Some(p) => {
                    if Self::link(p).left() == Some(n) {
                        Self::link(p).set_left(Some(s));
                    } else {
                        Self::link(p).set_right(Some(s));
                    }
                }
            }
            Self::link(s).set_left(n_left);
            if let Some(l) = n_left {
                Self::link(l).set_parent(Some(s));
            }
            Self::link(s).set_right(Some(n));
            Self::link(s).set_color(n_color);

            Self::link(n).set_parent(Some(s));
            Self::link(n).set_left(None);
            Self::link(n).set_right(s_right);
            if let Some(r) = s_right {
                Self::link(r).set_parent(Some(n));
            }
            Self::link(n).set_color(s_color);
        } else {
            let q = Self::link(s)
                .parent()
                .expect("s is n's in-order successor and not n's direct child, so s has a parent strictly below n");

            Self::link(s).set_parent(n_parent);
            match n_parent {
                None => self.root = Some(s),
                Some(p) => {
                    if Self::link(p).left() == Some(n) {
                        Self::link(p).set_left(Some(s));
                    } else {
                        Self::link(p).set_right(Some(s));
                    }
                }
            }
            Self::link(s).set_left(n_left);
            if let Some(l) = n_left {
                Self::link(l).set_parent(Some(s));
            }
            Self::link(s).set_right(n_right);
            if let Some(r) = n_right {
                Self::link(r).set_parent(Some(s));
            }
            Self::link(s).set_color(n_color);

            // s is always q's left child: it's reached by walking left from
            // n.right, and we've excluded the direct-child case above.
            Self::link(q).set_left(Some(n));
            Self::link(n).set_parent(Some(q));
            Self::link(n).set_left(None);
            Self::link(n).set_right(s_right);
            if let Some(r) = s_right {
                Self::link(r).set_parent(Some(n));
            }
            Self::link(n).set_color(s_color);
        }
    }

    fn transplant(&mut self, u: NonNull<E>, v: Option<NonNull<E>>) {
        let up = Self::link(u).parent();
        match up {
            None => self.root = v,
            Some(p) => {
                if Self::link(p).left() == Some(u) {
                    Self::link(p).set_left(v);
                } else {
                    Self::link(p).set_right(v);
                }
            }
        }
        if let Some(v) = v {
            Self::link(v).set_parent(up);
        }
    }

    fn delete_fixup(&mut self, mut x: Option<NonNull<E>>, mut xp: Option<NonNull<E>>)
    where
        C: Callbacks<E>,
    {
        while x != self.root && Self::color_of(x) == Color::Black {
            let p = xp.expect("x is not the root, so x has a parent");
            if Self::link(p).left() == x {
                let mut w = Self::link(p)
                    .right()
                    .expect("x's sibling subtree must have black-height >= 1, so it is never null");
                if Self::link(w).color().is_red() {
                    Self::link(w).set_color(Color::Black);
                    Self::link(p).set_color(Color::Red);
                    self.rotate_left(p);
                    w = Self::link(p).right().unwrap();
                }
                let wl_black = Self::color_of(Self::link(w).left()) == Color::Black;
                let wr_black = Self::color_of(Self::link(w).right()) == Color::Black;
                if wl_black && wr_black {
                    Self::link(w).set_color(Color::Red);
                    x = Some(p);
                    xp = Self::link(p).parent();
                } else {
                    if wr_black {
                        if let Some(wl) = Self::link(w).left() {
                            Self::link(wl).set_color(Color::Black);
                        }
                        Self::link(w).set_color(Color::Red);
                        self.rotate_right(w);
                        w = Self::link(p).right().unwrap();
                    }
                    Self::link(w).set_color(Self::link(p).color());
                    Self::link(p).set_color(Color::Black);
                    if let Some(wr) = Self::link(w).right() {
                        Self::link(wr).set_color(Color::Black);
                    }
                    self.rotate_left(p);
                    x = self.root;
                    xp = None;
                }
            } else {
                let mut w = Self::link(p)
                    .left()
                    .expect("x's sibling subtree must have black-height >= 1, so it is never null");
                if Self::link(w).color().is_red() {
                    Self::link(w).set_color(Color::Black);
                    Self::link(p).set_color(Color::Red);
                    self.rotate_right(p);
                    w = Self::link(p).left().unwrap();
                }
                let wr_black = Self::color_of(Self::link(w).right()) == Color::Black;
                let wl_black = Self::color_of(Self::link(w).left()) == Color::Black;
                if wr_black && wl_black {
                    Self::link(w).set_color(Color::Red);
                    x = Some(p);
                    xp = Self::link(p).parent();
                } else {
                    if wl_black {
                        if let Some(wr) = Self::link(w).right() {
                            Self::link(wr).set_color(Color::Black);
                        }
                        Self::link(w).set_color(Color::Red);
                        self.rotate_left(w);
                        w = Self::link(p).left().unwrap();
                    }
                    Self::link(w).set_color(Self::link(p).color());
                    Self::link(p).set_color(Color::Black);
                    if let Some(wl) = Self::link(w).left() {
                        Self::link(wl).set_color(Color::Black);
                    }
                    self.rotate_right(p);
                    x = self.root;
                    xp = None;
                }
            }
        }
        if let Some(x) = x {
            Self::link(x).set_color(Color::Black);
        }
    }

    // ---- rotations ----------------------------------------------------

    /// Rotates left at `x`. `x` moves down (becomes its former right
    /// child's left child); fires [`Callbacks::rotated_left`] on `x`.
    fn rotate_left(&mut self, x: NonNull<E>)
    where
        C: Callbacks<E>,
    {
        let y = Self::link(x).right().expect("rotate_left requires x to have a right child");
        Self::link(x).set_right(Self::link(y).left());
        if let Some(yl) = Self::link(y).left() {
            Self::link(yl).set_parent(Some(x));
        }
        Self::link(y).set_parent(Self::link(x).parent());
        match Self::link(x).parent() {
            None => self.root = Some(y),
            Some(p) => {
                if Self::link(p).left() == Some(x) {
                    Self::link(p).set_left(Some(y));
                } else {
                    Self::link(p).set_right(Some(y));
                }
            }
        }
        Self::link(y).set_left(Some(x));
        Self::link(x).set_parent(Some(y));
        self.callbacks.rotated_left(unsafe { x.as_ref() });
    }

    /// Symmetric to [`Tree::rotate_left`].
    fn rotate_right(&mut self, x: NonNull<E>)
    where
        C: Callbacks<E>,
    {
        let y = Self::link(x).left().expect("rotate_right requires x to have a left child");
        Self::link(x).set_left(Self::link(y).right());
        if let Some(yr) = Self::link(y).right() {
            Self::link(yr).set_parent(Some(x));
        }
        Self::link(y).set_parent(Self::link(x).parent());
        match Self::link(x).parent() {
            None => self.root = Some(y),
            Some(p) => {
                if Self::link(p).left() == Some(x) {
                    Self::link(p).set_left(Some(y));
                } else {
                    Self::link(p).set_right(Some(y));
                }
            }
        }
        Self::link(y).set_right(Some(x));
        Self::link(x).set_parent(Some(y));
        self.callbacks.rotated_right(unsafe { x.as_ref() });
    }
}

impl<E, Tag, O: fmt::Debug, C: fmt::Debug, const MULTIPLE: bool> fmt::Debug for Tree<E, Tag, O, C, MULTIPLE> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tree")
            .field("root", &self.root.map(|p| p.as_ptr()))
            .field("len", &self.len)
            .field("order", &self.order)
            .field("callbacks", &self.callbacks)
            .field("multiple", &MULTIPLE)
            .finish()
    }
}
