use std::cmp::Ordering as StdOrdering;
use std::marker::PhantomData;

/// A strict weak order over elements of type `E`.
///
/// `equivalent(a, b)` is never a separate customization point — it is always
/// `!less(a, b) && !less(b, a)`, computed by [`Order::equivalent`]'s default
/// body, exactly as the data model defines it.
pub trait Order<E: ?Sized> {
    fn less(&self, a: &E, b: &E) -> bool;

    #[inline]
    fn equivalent(&self, a: &E, b: &E) -> bool {
        !self.less(a, b) && !self.less(b, a)
    }
}

/// A relation between elements and a separate key type, used by `find` and
/// the `*_bound` queries. Any `Order<E>` is automatically a `Compare<E, E>`.
pub trait Compare<E: ?Sized, K: ?Sized> {
    /// Is `elem` strictly less than `key`?
    fn less_than_key(&self, elem: &E, key: &K) -> bool;
    /// Is `key` strictly less than `elem`?
    fn key_less_than(&self, key: &K, elem: &E) -> bool;

    #[inline]
    fn key_equivalent(&self, elem: &E, key: &K) -> bool {
        !self.less_than_key(elem, key) && !self.key_less_than(key, elem)
    }
}

impl<E: ?Sized, O: Order<E>> Compare<E, E> for O {
    #[inline]
    fn less_than_key(&self, elem: &E, key: &E) -> bool {
        self.less(elem, key)
    }
    #[inline]
    fn key_less_than(&self, key: &E, elem: &E) -> bool {
        self.less(key, elem)
    }
}

/// The default ordering: an element's own [`Ord`] implementation.
///
/// Used when a tree is constructed without an explicit external relation, per
/// "If no external ordering is supplied, the element's natural order is
/// used."
#[derive(Debug, Clone, Copy, Default)]
pub struct NaturalOrder;

impl<E: Ord + ?Sized> Order<E> for NaturalOrder {
    #[inline]
    fn less(&self, a: &E, b: &E) -> bool {
        a.cmp(b) == StdOrdering::Less
    }
}

/// Orders elements by a key projected out with a closure, for callers who
/// don't want to hand-write an `Order` impl for a one-off key.
///
/// ```
/// use intrusive_rbtree::{KeyOrder, Link, Linked, Tree};
///
/// struct Tag;
///
/// struct Item {
///     id: u32,
///     link: Link<Item, Tag>,
/// }
///
/// impl Linked<Tag> for Item {
///     fn link(&self) -> &Link<Item, Tag> {
///         &self.link
///     }
/// }
///
/// let mut tree: Tree<Item, Tag, _> = Tree::with_order(KeyOrder::new(|item: &Item| item.id));
///
/// let a = Item { id: 3, link: Link::new() };
/// let b = Item { id: 1, link: Link::new() };
/// unsafe {
///     tree.insert(&a).unwrap();
///     tree.insert(&b).unwrap();
/// }
/// assert_eq!(tree.first().map(|i| i.id), Some(1));
/// assert_eq!(tree.last().map(|i| i.id), Some(3));
/// ```
#[derive(Clone, Copy)]
pub struct KeyOrder<F, K> {
    key_fn: F,
    _key: PhantomData<fn() -> K>,
}

impl<F, K> KeyOrder<F, K> {
    pub fn new(key_fn: F) -> Self {
        KeyOrder { key_fn, _key: PhantomData }
    }
}

impl<E, F, K> Order<E> for KeyOrder<F, K>
where
    F: Fn(&E) -> K,
    K: Ord,
{
    #[inline]
    fn less(&self, a: &E, b: &E) -> bool {
        (self.key_fn)(a) < (self.key_fn)(b)
    }
}
