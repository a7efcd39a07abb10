//! An intrusive, allocation-free red-black tree for caller-owned elements.
//!
//! "Intrusive" means the linkage (parent/child pointers and color) lives
//! inside the element itself, via the [`Link`] field a type exposes through
//! [`Linked`], rather than inside nodes the tree allocates. Inserting and
//! removing an element never allocates or moves it, and a single element may
//! be linked into several independent trees at once by implementing
//! [`Linked`] for more than one marker `Tag`.
//!
//! ```
//! use intrusive_rbtree::{Link, Linked, Tree};
//!
//! struct ById;
//!
//! struct Account {
//!     id: u64,
//!     link: Link<Account, ById>,
//! }
//!
//! impl Linked<ById> for Account {
//!     fn link(&self) -> &Link<Account, ById> {
//!         &self.link
//!     }
//! }
//!
//! impl PartialEq for Account {
//!     fn eq(&self, other: &Self) -> bool { self.id == other.id }
//! }
//! impl Eq for Account {}
//! impl PartialOrd for Account {
//!     fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> { Some(self.cmp(other)) }
//! }
//! impl Ord for Account {
//!     fn cmp(&self, other: &Self) -> std::cmp::Ordering { self.id.cmp(&other.id) }
//! }
//!
//! let a = Account { id: 7, link: Link::new() };
//! let mut tree: Tree<Account, ById> = Tree::new();
//! unsafe { tree.insert(&a).unwrap(); }
//!
//! let probe = Account { id: 7, link: Link::new() };
//! assert_eq!(tree.find(&probe).map(|a| a.id), Some(7));
//! unsafe { tree.remove(&a); }
//! ```
//!
//! A tree never owns its elements: dropping a [`Tree`] or calling
//! [`Tree::clear`] only detaches linkage, it never runs an element's
//! destructor. The caller's container (an arena, a `Box` kept elsewhere, a
//! slab) owns storage and lifetime.
//!
//! # Safety
//!
//! [`Tree::insert`], [`Tree::insert_before`] and [`Tree::remove`] are
//! `unsafe`: the tree has no way to check, at runtime, that an element is
//! detached before insertion or linked before removal, or that a linked
//! element won't move or be dropped out from under the tree. Violating those
//! preconditions is undefined behavior. Every other operation — lookup,
//! bounds, iteration, `clear`, `verify_integrity` — is safe, and callers
//! should prefer a safe wrapper at their API boundary if they need one.

mod callbacks;
mod color;
mod cursor;
mod link;
mod nav;
mod order;
mod tree;
mod verify;

pub use callbacks::{Callbacks, NoopCallbacks};
pub use cursor::Iter;
pub use link::{Link, Linked};
pub use order::{Compare, KeyOrder, NaturalOrder, Order};
pub use tree::{InsertError, Tree};
