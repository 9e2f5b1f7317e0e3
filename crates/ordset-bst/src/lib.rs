//! Arena-backed binary search tree storage for ordset.
//!
//! This crate provides the unbalanced half of the ordered collection: node
//! storage with parent back-references, the naive comparison-descent insert,
//! and the read-side walks (membership, size, in-order, level-order).
//! Balancing lives in `ordset-rbtree`, which drives this store through
//! [`Bst::place_by_comparison`] and the link accessors and never needs to
//! know how nodes are allocated.
//!
//! Nodes live in a `Vec` arena and refer to each other by [`NodeId`]. The
//! parent link is a plain index with no ownership attached, so the cyclic
//! shape of a parent-linked tree never turns into an ownership cycle.

use std::collections::VecDeque;
use std::fmt::Display;

/// Node color tag used by red-black balancing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Color {
    Red,
    Black,
}

/// Index of a node inside a [`Bst`] arena.
///
/// Ids are only meaningful for the arena that issued them and are
/// invalidated by [`Bst::clear`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeId(usize);

/// A single tree vertex: a key, a color tag, and parent/child links.
#[derive(Debug, Clone)]
pub struct Node<T> {
    pub key: T,
    pub color: Color,
    pub up: Option<NodeId>,
    pub left: Option<NodeId>,
    pub right: Option<NodeId>,
}

impl<T> Node<T> {
    /// Creates a fresh unlinked node. New nodes start red; balancing
    /// recolors them as needed.
    pub fn new(key: T) -> Self {
        Self {
            key,
            color: Color::Red,
            up: None,
            left: None,
            right: None,
        }
    }
}

/// An unbalanced binary search tree over an arena of nodes.
///
/// Duplicate keys are allowed: placement sends `<=` left, otherwise right.
/// Colors are carried on every node but the operations here never read or
/// change them; that is the balancing layer's job.
#[derive(Debug, Clone)]
pub struct Bst<T> {
    nodes: Vec<Node<T>>,
    root: Option<NodeId>,
}

impl<T> Default for Bst<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Bst<T> {
    /// Creates an empty tree.
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            root: None,
        }
    }

    /// Appends a fresh red, unlinked node to the arena and returns its id.
    pub fn alloc(&mut self, key: T) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node::new(key));
        id
    }

    pub fn node(&self, id: NodeId) -> &Node<T> {
        &self.nodes[id.0]
    }

    pub fn node_mut(&mut self, id: NodeId) -> &mut Node<T> {
        &mut self.nodes[id.0]
    }

    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    pub fn set_root(&mut self, root: Option<NodeId>) {
        self.root = root;
    }

    /// Wires `child` into `parent`'s left slot, including the back-reference.
    pub fn link_left(&mut self, parent: NodeId, child: NodeId) {
        self.nodes[parent.0].left = Some(child);
        self.nodes[child.0].up = Some(parent);
    }

    /// Wires `child` into `parent`'s right slot, including the back-reference.
    pub fn link_right(&mut self, parent: NodeId, child: NodeId) {
        self.nodes[parent.0].right = Some(child);
        self.nodes[child.0].up = Some(parent);
    }

    /// Returns true if the tree holds no nodes.
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Drops every node. Outstanding [`NodeId`]s become invalid.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.root = None;
    }

    /// Counts the nodes reachable from the root, duplicates included.
    /// Recomputed by traversal on every call; no count is cached.
    pub fn size(&self) -> usize {
        self.count_from(self.root)
    }

    fn count_from(&self, subtree: Option<NodeId>) -> usize {
        match subtree {
            Some(id) => {
                1 + self.count_from(self.node(id).left) + self.count_from(self.node(id).right)
            }
            None => 0,
        }
    }

    /// Collects keys in sorted (in-order) position.
    pub fn in_order_keys(&self) -> Vec<&T> {
        let mut keys = Vec::new();
        self.walk_in_order(self.root, &mut keys);
        keys
    }

    fn walk_in_order<'a>(&'a self, subtree: Option<NodeId>, keys: &mut Vec<&'a T>) {
        if let Some(id) = subtree {
            self.walk_in_order(self.node(id).left, keys);
            keys.push(&self.node(id).key);
            self.walk_in_order(self.node(id).right, keys);
        }
    }
}

impl<T: Ord> Bst<T> {
    /// Naive unbalanced insert: allocates a node and places it by
    /// comparison descent. No rebalancing, no recoloring.
    pub fn insert(&mut self, key: T) {
        let new_node = self.alloc(key);
        match self.root {
            Some(root) => self.place_by_comparison(new_node, root),
            None => self.root = Some(new_node),
        }
    }

    /// Recursively descends from `subtree` comparing keys (`<=` goes left,
    /// otherwise right) and wires `new_node` into the first empty slot,
    /// parent back-reference included. Color is left untouched.
    pub fn place_by_comparison(&mut self, new_node: NodeId, subtree: NodeId) {
        if self.nodes[new_node.0].key <= self.nodes[subtree.0].key {
            match self.nodes[subtree.0].left {
                Some(left) => self.place_by_comparison(new_node, left),
                None => self.link_left(subtree, new_node),
            }
        } else {
            match self.nodes[subtree.0].right {
                Some(right) => self.place_by_comparison(new_node, right),
                None => self.link_right(subtree, new_node),
            }
        }
    }

    /// Checks whether `key` is stored in the tree. O(height).
    pub fn contains(&self, key: &T) -> bool {
        self.get(key).is_some()
    }

    /// Ordered descent returning the id of a node holding `key`, if any.
    /// With duplicates present, any one of the matching nodes may be
    /// returned.
    pub fn get(&self, key: &T) -> Option<NodeId> {
        let mut current = self.root;
        while let Some(id) = current {
            current = match key.cmp(&self.node(id).key) {
                std::cmp::Ordering::Equal => return Some(id),
                std::cmp::Ordering::Less => self.node(id).left,
                std::cmp::Ordering::Greater => self.node(id).right,
            };
        }
        None
    }
}

impl<T: Display> Bst<T> {
    /// Renders the tree in level order, one `key(R)` or `key(B)` entry per
    /// node. Diagnostic output, not a stable machine format.
    pub fn level_order_string(&self) -> String {
        let Some(root) = self.root else {
            return "[ ]".to_string();
        };
        let mut queue = VecDeque::from([root]);
        let mut entries = Vec::new();
        while let Some(id) = queue.pop_front() {
            let node = self.node(id);
            let tag = match node.color {
                Color::Red => 'R',
                Color::Black => 'B',
            };
            entries.push(format!("{}({})", node.key, tag));
            if let Some(left) = node.left {
                queue.push_back(left);
            }
            if let Some(right) = node.right {
                queue.push_back(right);
            }
        }
        format!("[ {} ]", entries.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_new_node_is_red_and_unlinked() {
        let node = Node::new(5);
        assert_eq!(node.color, Color::Red);
        assert!(node.up.is_none());
        assert!(node.left.is_none());
        assert!(node.right.is_none());
    }

    #[test]
    fn test_insert_places_by_comparison() {
        let mut bst = Bst::new();
        bst.insert(5);
        bst.insert(3);
        bst.insert(8);
        bst.insert(7);

        let root = bst.root().unwrap();
        assert_eq!(bst.node(root).key, 5);
        let left = bst.node(root).left.unwrap();
        let right = bst.node(root).right.unwrap();
        assert_eq!(bst.node(left).key, 3);
        assert_eq!(bst.node(right).key, 8);
        assert_eq!(bst.node(left).up, Some(root));
        assert_eq!(bst.node(right).up, Some(root));

        // 7 descends right of 5, then left of 8.
        let inner = bst.node(right).left.unwrap();
        assert_eq!(bst.node(inner).key, 7);
        assert_eq!(bst.node(inner).up, Some(right));
    }

    #[test]
    fn test_duplicates_go_left() {
        let mut bst = Bst::new();
        bst.insert(5);
        bst.insert(5);

        let root = bst.root().unwrap();
        let left = bst.node(root).left.unwrap();
        assert_eq!(bst.node(left).key, 5);
        assert!(bst.node(root).right.is_none());
        assert_eq!(bst.size(), 2);
    }

    #[test]
    fn test_placement_leaves_color_untouched() {
        let mut bst = Bst::new();
        let root = bst.alloc(10);
        bst.node_mut(root).color = Color::Black;
        bst.set_root(Some(root));

        let new_node = bst.alloc(4);
        bst.place_by_comparison(new_node, root);

        assert_eq!(bst.node(root).color, Color::Black);
        assert_eq!(bst.node(new_node).color, Color::Red);
    }

    #[test]
    fn test_contains_and_get() {
        let mut bst = Bst::new();
        for key in [14, 7, 18, 23] {
            bst.insert(key);
        }

        assert!(bst.contains(&14));
        assert!(bst.contains(&23));
        assert!(!bst.contains(&9));
        assert!(bst.get(&42).is_none());

        let id = bst.get(&18).unwrap();
        assert_eq!(bst.node(id).key, 18);
    }

    #[test]
    fn test_size_counts_duplicates() {
        let mut bst = Bst::new();
        for key in [2, 2, 2, 1] {
            bst.insert(key);
        }
        assert_eq!(bst.size(), 4);
    }

    #[test]
    fn test_empty_and_clear() {
        let mut bst = Bst::new();
        assert!(bst.is_empty());
        assert_eq!(bst.size(), 0);

        bst.insert(1);
        assert!(!bst.is_empty());

        bst.clear();
        assert!(bst.is_empty());
        assert_eq!(bst.size(), 0);
        assert_eq!(bst.level_order_string(), "[ ]");
    }

    #[test]
    fn test_link_helpers_wire_both_directions() {
        let mut bst = Bst::new();
        let parent = bst.alloc(5);
        let left = bst.alloc(3);
        let right = bst.alloc(9);
        bst.link_left(parent, left);
        bst.link_right(parent, right);

        assert_eq!(bst.node(parent).left, Some(left));
        assert_eq!(bst.node(parent).right, Some(right));
        assert_eq!(bst.node(left).up, Some(parent));
        assert_eq!(bst.node(right).up, Some(parent));
    }

    #[test]
    fn test_level_order_string_with_colors() {
        let mut bst = Bst::new();
        let root = bst.alloc(5);
        let left = bst.alloc(3);
        let right = bst.alloc(9);
        bst.node_mut(root).color = Color::Black;
        bst.link_left(root, left);
        bst.link_right(root, right);
        bst.set_root(Some(root));

        assert_eq!(bst.level_order_string(), "[ 5(B), 3(R), 9(R) ]");
    }

    #[test]
    fn test_in_order_keys_sorted() {
        let mut bst = Bst::new();
        for key in [8, 3, 10, 1, 6, 14, 4, 7] {
            bst.insert(key);
        }
        let keys: Vec<i32> = bst.in_order_keys().into_iter().copied().collect();
        assert_eq!(keys, vec![1, 3, 4, 6, 7, 8, 10, 14]);
    }

    proptest! {
        #[test]
        fn in_order_walk_is_sorted(keys in proptest::collection::vec(0u32..1000, 0..100)) {
            let mut bst = Bst::new();
            for &key in &keys {
                bst.insert(key);
            }

            let walked: Vec<u32> = bst.in_order_keys().into_iter().copied().collect();
            let mut expected = keys.clone();
            expected.sort_unstable();
            prop_assert_eq!(walked, expected);
            prop_assert_eq!(bst.size(), keys.len());
        }
    }
}
