use intrusive_rbtree::{Link, Linked, Tree};
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

const TEST_SIZE: usize = 1000;

struct TagA;
struct TagB;

/// A single element linked into two independent trees at once, one keyed on
/// `data_a` and the other on `data_b` — the multi-tag scenario the data model
/// calls out explicitly.
struct Node {
    data_a: i64,
    data_b: i64,
    link_a: Link<Node, TagA>,
    link_b: Link<Node, TagB>,
}

impl Node {
    fn new(data_a: i64, data_b: i64) -> Self {
        Node { data_a, data_b, link_a: Link::new(), link_b: Link::new() }
    }
}

impl Linked<TagA> for Node {
    fn link(&self) -> &Link<Node, TagA> {
        &self.link_a
    }
}
impl Linked<TagB> for Node {
    fn link(&self) -> &Link<Node, TagB> {
        &self.link_b
    }
}

#[derive(Default)]
struct ByDataA;
impl intrusive_rbtree::Order<Node> for ByDataA {
    fn less(&self, a: &Node, b: &Node) -> bool {
        a.data_a < b.data_a
    }
}
impl intrusive_rbtree::Compare<Node, i64> for ByDataA {
    fn less_than_key(&self, elem: &Node, key: &i64) -> bool {
        elem.data_a < *key
    }
    fn key_less_than(&self, key: &i64, elem: &Node) -> bool {
        *key < elem.data_a
    }
}

#[derive(Default)]
struct ByDataB;
impl intrusive_rbtree::Order<Node> for ByDataB {
    fn less(&self, a: &Node, b: &Node) -> bool {
        a.data_b < b.data_b
    }
}

type TreeA = Tree<Node, TagA, ByDataA, intrusive_rbtree::NoopCallbacks, true>;
type TreeB = Tree<Node, TagB, ByDataB, intrusive_rbtree::NoopCallbacks, true>;

#[test]
fn trivial_insertion() {
    let mut ta = TreeA::new();
    let mut tb = TreeB::new();

    let n = Node::new(0, 0);
    unsafe {
        ta.insert(&n).unwrap();
        tb.insert(&n).unwrap();
    }

    assert!(ta.verify_integrity());
    assert!(tb.verify_integrity());
}

#[test]
fn minimal_interaction() {
    let mut ta = TreeA::new();
    let mut tb = TreeB::new();

    let n1 = Node::new(0, 0);
    let n2 = Node::new(-1, 1);

    unsafe {
        ta.insert(&n1).unwrap();
        ta.insert(&n2).unwrap();
    }

    // n2.data_a (-1) < n1.data_a (0), so n2 becomes n1's left child and n1 is
    // the root, regardless of what tb does with the same two elements.
    assert_eq!(ta.first().map(|n| n.data_a), Some(-1));
    assert_eq!(ta.last().map(|n| n.data_a), Some(0));

    unsafe {
        tb.insert(&n1).unwrap();
        tb.insert(&n2).unwrap();
    }

    // Under TagB's order (data_b), n1 (0) < n2 (1): independent linkage, same
    // two elements, opposite shape.
    assert_eq!(tb.first().map(|n| n.data_b), Some(0));
    assert_eq!(tb.last().map(|n| n.data_b), Some(1));

    assert!(ta.verify_integrity());
    assert!(tb.verify_integrity());
}

#[test]
fn random_insertion_stays_ordered_and_balanced() {
    let mut rng = SmallRng::seed_from_u64(4);
    let mut ta = TreeA::new();
    let mut tb = TreeB::new();

    let nodes: Vec<Node> = (0..TEST_SIZE)
        .map(|_| Node::new(rng.gen::<i32>() as i64, rng.gen::<i32>() as i64))
        .collect();

    for n in &nodes {
        unsafe {
            ta.insert(n).unwrap();
            tb.insert(n).unwrap();
        }
        assert!(ta.verify_integrity());
        assert!(tb.verify_integrity());
    }

    let mut last = i64::MIN;
    for n in ta.iter() {
        assert!(n.data_a >= last);
        last = n.data_a;
    }

    let mut last = i64::MIN;
    for n in tb.iter() {
        assert!(n.data_b >= last);
        last = n.data_b;
    }
}

#[test]
fn linear_insertion_stays_balanced() {
    let mut ta = TreeA::new();
    let mut tb = TreeB::new();

    let nodes: Vec<Node> = (0..TEST_SIZE as i64).map(|i| Node::new(i, i)).collect();

    for n in &nodes {
        unsafe {
            ta.insert(n).unwrap();
            tb.insert(n).unwrap();
        }
        assert!(ta.verify_integrity());
        assert!(tb.verify_integrity());
    }
}

#[test]
fn shuffled_insertion_then_shuffled_removal() {
    let mut rng = SmallRng::seed_from_u64(4);
    let mut tree: Tree<Node, TagA, ByDataA> = Tree::with_order(ByDataA);

    let nodes: Vec<Node> = (0..TEST_SIZE as i64).map(|i| Node::new(i, TEST_SIZE as i64 - i)).collect();
    let mut insert_order: Vec<&Node> = nodes.iter().collect();
    insert_order.shuffle(&mut rng);

    for n in &insert_order {
        unsafe { tree.insert(n).unwrap() };
    }
    assert!(tree.verify_integrity());

    let mut i = 0i64;
    for n in tree.iter() {
        assert_eq!(n.data_a, i);
        i += 1;
    }

    let mut remove_order: Vec<&Node> = nodes.iter().collect();
    remove_order.shuffle(&mut rng);

    for (removed, n) in remove_order.iter().enumerate() {
        unsafe { tree.remove(n) };
        assert!(tree.verify_integrity());
        assert_eq!(tree.len(), TEST_SIZE - removed - 1);
    }

    assert!(tree.is_empty());
    assert_eq!(tree.first().map(|n| n.data_a), None);
}

#[test]
fn hinted_insertion_matches_unhinted_order() {
    let nodes: Vec<Node> = (0..TEST_SIZE as i64).map(|i| Node::new(i, i)).collect();

    let mut unhinted: Tree<Node, TagA, ByDataA> = Tree::with_order(ByDataA);
    for n in &nodes {
        unsafe { unhinted.insert(n).unwrap() };
    }

    // Insert in reverse order, each one immediately before the node we
    // inserted last iteration — the hint that should make this descent-free.
    let mut hinted: Tree<Node, TagA, ByDataA> = Tree::with_order(ByDataA);
    let mut hint: Option<&Node> = None;
    for n in nodes.iter().rev() {
        unsafe { hinted.insert_before(n, hint).unwrap() };
        hint = Some(n);
        assert!(hinted.verify_integrity());
    }

    for (a, b) in unhinted.iter().zip(hinted.iter()) {
        assert_eq!(a.data_a, b.data_a);
    }
    assert_eq!(unhinted.len(), hinted.len());
}

#[test]
fn duplicate_rejected_without_multiple() {
    let mut tree: Tree<Node, TagA, ByDataA> = Tree::with_order(ByDataA);
    let n1 = Node::new(5, 0);
    let n2 = Node::new(5, 1);

    unsafe {
        tree.insert(&n1).unwrap();
        assert!(tree.insert(&n2).is_err());
    }
    assert_eq!(tree.len(), 1);
}

#[test]
fn duplicates_allowed_with_multiple_preserve_insertion_order() {
    let mut tree = TreeA::new();
    let nodes: Vec<Node> = (0..5).map(|i| Node::new(1, i)).collect();

    for n in &nodes {
        unsafe { tree.insert(n).unwrap() };
    }
    assert!(tree.verify_integrity());
    assert_eq!(tree.len(), 5);

    for (n, expected) in tree.iter().zip(0..5) {
        assert_eq!(n.data_b, expected);
    }
}

#[test]
fn bounds_queries() {
    let mut tree: Tree<Node, TagA, ByDataA> = Tree::with_order(ByDataA);
    let nodes: Vec<Node> = (0..TEST_SIZE as i64).map(|i| Node::new(2 * i, 0)).collect();
    for n in &nodes {
        unsafe { tree.insert(n).unwrap() };
    }

    for i in 0..TEST_SIZE - 1 {
        let key = 2 * i as i64 + 1;
        let found = tree.upper_bound(&key);
        assert_eq!(found.map(|n| n.data_a), Some(nodes[i + 1].data_a));
    }

    let key = 2 * (TEST_SIZE as i64 - 1) + 1;
    assert!(tree.upper_bound(&key).is_none());
}
