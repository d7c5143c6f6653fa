//! A binary search tree whose links are `OptionPtr`s. Nodes are only ever reached through the
//! pointer combinators, never by dereferencing a link.
use std::{cmp::Ordering, mem, ops::ControlFlow, str::FromStr};

use crate::{error::ParseOrderError, option_ptr::OptionPtr};

/// Total order used to place items. Fixed when the tree is built.
pub type Comparator<T> = fn(&T, &T) -> Ordering;

pub fn ascending<T: Ord>(a: &T, b: &T) -> Ordering {
    a.cmp(b)
}
pub fn descending<T: Ord>(a: &T, b: &T) -> Ordering {
    b.cmp(a)
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Order {
    #[default]
    Ascending,
    Descending,
}

impl Order {
    pub fn comparator<T: Ord>(self) -> Comparator<T> {
        match self {
            Order::Ascending => ascending,
            Order::Descending => descending,
        }
    }
}

impl FromStr for Order {
    type Err = ParseOrderError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ascending" | "asc" => Ok(Order::Ascending),
            "descending" | "desc" => Ok(Order::Descending),
            _ => Err(ParseOrderError(s.to_owned())),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TreeConfig {
    pub order: Order,
}

#[derive(Debug)]
struct Node<T> {
    item: T,
    left: OptionPtr<Node<T>>,
    right: OptionPtr<Node<T>>,
}

impl<T> Node<T> {
    fn leaf(item: T) -> Self {
        Node {
            item,
            left: OptionPtr::none(),
            right: OptionPtr::none(),
        }
    }
}

type Link<T> = OptionPtr<Node<T>>;

// The tree can degenerate into a chain as long as the input, so none of the walks below recurse.

/// Insert below `link`, growing a new leaf at the first empty link on the search path.
fn insert_at<T>(mut link: &mut Link<T>, item: T, cmp: Comparator<T>) -> bool {
    loop {
        if link.is_none() {
            *link = OptionPtr::some(Node::leaf(item));
            return true;
        }
        let step = link.match_with(
            |node| match cmp(&item, &node.item) {
                Ordering::Less => ControlFlow::Continue(&mut node.left),
                Ordering::Greater => ControlFlow::Continue(&mut node.right),
                Ordering::Equal => ControlFlow::Break(()),
            },
            // Checked non-empty just above.
            || unreachable!(),
        );
        match step {
            ControlFlow::Continue(next) => link = next,
            ControlFlow::Break(()) => return false,
        }
    }
}

fn search<T>(mut link: &Link<T>, item: &T, cmp: Comparator<T>) -> bool {
    loop {
        let step = link.match_ref(
            |node| match cmp(item, &node.item) {
                Ordering::Less => ControlFlow::Continue(&node.left),
                Ordering::Greater => ControlFlow::Continue(&node.right),
                Ordering::Equal => ControlFlow::Break(true),
            },
            || ControlFlow::Break(false),
        );
        match step {
            ControlFlow::Continue(next) => link = next,
            ControlFlow::Break(found) => return found,
        }
    }
}

fn walk_inorder<T>(mut link: &Link<T>, mut f: impl FnMut(&T)) {
    // Nodes whose left subtree is being visited.
    let mut pending: Vec<&Node<T>> = vec![];
    loop {
        while let Some(node) = link.match_ref(Some, || None) {
            pending.push(node);
            link = &node.left;
        }
        let Some(node) = pending.pop() else {
            return;
        };
        f(&node.item);
        link = &node.right;
    }
}

#[derive(Debug)]
pub struct SearchTree<T> {
    root: OptionPtr<Node<T>>,
    len: usize,
    cmp: Comparator<T>,
}

impl<T: Ord> SearchTree<T> {
    pub fn new() -> Self {
        Self::with_config(TreeConfig::default())
    }
    pub fn with_config(config: TreeConfig) -> Self {
        Self::with_comparator(config.order.comparator())
    }
}

impl<T: Ord> Default for SearchTree<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> SearchTree<T> {
    pub fn with_comparator(cmp: Comparator<T>) -> Self {
        SearchTree {
            root: OptionPtr::none(),
            len: 0,
            cmp,
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns `false` if an equal item is already in the tree.
    pub fn insert(&mut self, item: T) -> bool {
        let inserted = insert_at(&mut self.root, item, self.cmp);
        if inserted {
            self.len += 1;
        } else {
            tracing::debug!("duplicate item rejected");
        }
        inserted
    }

    pub fn contains(&self, item: &T) -> bool {
        search(&self.root, item, self.cmp)
    }

    /// Visit every item in comparator order.
    pub fn for_each_inorder(&self, f: impl FnMut(&T)) {
        walk_inorder(&self.root, f);
    }

    pub fn to_vec(&self) -> Vec<T>
    where
        T: Clone,
    {
        let mut items = Vec::with_capacity(self.len);
        self.for_each_inorder(|item| items.push(item.clone()));
        items
    }

    /// Transfer the whole tree. `self` is left empty with the same comparator.
    pub fn take(&mut self) -> Self {
        SearchTree {
            root: self.root.take(),
            len: mem::take(&mut self.len),
            cmp: self.cmp,
        }
    }
}

impl<T> Drop for SearchTree<T> {
    /// Detach children before each node is released so dropping a chain does not recurse.
    fn drop(&mut self) {
        let mut pending = vec![self.root.take()];
        while let Some(mut link) = pending.pop() {
            link.map_do(|node| {
                pending.push(node.left.take());
                pending.push(node.right.take());
            });
        }
    }
}

#[test]
fn test() {
    let display = |tag: &str, tree: &SearchTree<i32>| {
        println!("{tag: <15}: {:?}", tree.to_vec());
        let mut count = 0;
        tree.for_each_inorder(|_| count += 1);
        assert_eq!(count, tree.len());
    };

    let mut tree = SearchTree::new();
    for x in [50, 30, 70, 20, 40, 60, 80] {
        assert!(tree.insert(x));
    }
    display("start", &tree);
    assert!(!tree.insert(40));
    assert_eq!(tree.len(), 7);
    assert!(tree.contains(&60));
    assert!(!tree.contains(&65));
    assert_eq!(tree.to_vec(), vec![20, 30, 40, 50, 60, 70, 80]);

    let moved = tree.take();
    display("moved", &moved);
    assert!(tree.is_empty());
    assert!(!tree.contains(&50));
    assert_eq!(moved.len(), 7);
    assert!(tree.insert(1));
    display("reused", &tree);
}

#[test]
fn test_descending() {
    let config = TreeConfig {
        order: "descending".parse().unwrap(),
    };
    let mut tree = SearchTree::with_config(config);
    for x in ["m", "c", "x", "a"] {
        tree.insert(x);
    }
    assert_eq!(tree.to_vec(), vec!["x", "m", "c", "a"]);
    assert!(tree.contains(&"c"));
}

#[test]
fn test_custom_comparator() {
    let by_len: Comparator<String> = |a, b| a.len().cmp(&b.len());
    let mut tree = SearchTree::with_comparator(by_len);
    assert!(tree.insert("abc".to_owned()));
    // Equal under the comparator, so rejected.
    assert!(!tree.insert("xyz".to_owned()));
    assert!(tree.insert("a".to_owned()));
    assert_eq!(tree.to_vec(), vec!["a".to_owned(), "abc".to_owned()]);
}

#[test]
fn test_parse_order() {
    assert_eq!("Ascending".parse::<Order>(), Ok(Order::Ascending));
    assert_eq!(" desc ".parse::<Order>(), Ok(Order::Descending));
    assert_eq!(
        "sideways".parse::<Order>(),
        Err(ParseOrderError("sideways".to_owned()))
    );
}

#[cfg(test)]
fn ascending_chain(len: u32) -> SearchTree<u32> {
    // Built bottom-up so that constructing the chain is linear.
    let mut root = OptionPtr::none();
    for item in (0..len).rev() {
        root = OptionPtr::some(Node {
            item,
            left: OptionPtr::none(),
            right: root,
        });
    }
    SearchTree {
        root,
        len: len as usize,
        cmp: ascending,
    }
}

#[test]
fn test_sorted_inserts() {
    let mut tree = SearchTree::new();
    for x in 0..10_000u32 {
        assert!(tree.insert(x));
    }
    assert!(!tree.insert(9_999));
    assert_eq!(tree.len(), 10_000);
    assert!(tree.contains(&0));
    assert!(tree.contains(&9_999));
    assert!(!tree.contains(&10_000));
}

#[test]
fn test_deep_chain() {
    let mut tree = ascending_chain(200_000);
    assert!(tree.contains(&199_999));
    assert!(!tree.contains(&200_000));
    assert!(tree.insert(200_000));
    assert!(!tree.insert(123_456));

    let mut count = 0;
    let mut last = None;
    tree.for_each_inorder(|&x| {
        assert!(last < Some(x));
        last = Some(x);
        count += 1;
    });
    assert_eq!(count, 200_001);
    assert_eq!(tree.len(), 200_001);

    let moved = tree.take();
    drop(moved);
    drop(tree);
}
