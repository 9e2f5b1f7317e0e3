//! Red-black balanced ordered key collection for ordset.
//!
//! The tree stores its nodes in the arena-backed store from `ordset-bst`.
//! An insert places a new red node by the store's naive comparison descent,
//! then [`RedBlackTree::ensure_red_property`] walks upward from it, clearing
//! red-red violations by rotation or recoloring until the red-black
//! invariants hold tree-wide:
//!
//! - the root is black;
//! - no red node has a red parent;
//! - every path from a node to an absent child crosses the same number of
//!   black nodes.
//!
//! Together these bound the tree height, so `insert` and `contains` are
//! O(log n). Duplicate keys are permitted; after repair a duplicate may sit
//! in either subtree of an equal ancestor, though in-order traversal stays
//! sorted. The structure is single-threaded: callers needing cross-thread
//! access must wrap the tree in their own synchronization.

use std::fmt;

use ordset_bst::{Bst, Color, NodeId};

/// Errors surfaced by tree operations.
///
/// Every failure is deterministic and local: the tree is left exactly as it
/// was before the failing call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TreeError {
    /// An absent key was passed to [`RedBlackTree::insert`]; nothing was
    /// stored.
    InvalidKey,
    /// [`RedBlackTree::rotate`] was called on a pair that is not a direct
    /// parent-child relation.
    MalformedRotation,
}

impl fmt::Display for TreeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TreeError::InvalidKey => write!(f, "cannot insert an absent key"),
            TreeError::MalformedRotation => {
                write!(f, "rotation child is not a direct child of the given parent")
            }
        }
    }
}

impl std::error::Error for TreeError {}

/// An ordered key collection backed by a red-black tree.
#[derive(Debug, Clone)]
pub struct RedBlackTree<T> {
    store: Bst<T>,
}

impl<T> Default for RedBlackTree<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> RedBlackTree<T> {
    /// Creates an empty tree.
    pub fn new() -> Self {
        Self { store: Bst::new() }
    }

    /// Wraps an existing store without validating its invariants. Intended
    /// for diagnostics and for tests that hand-build a shape before
    /// exercising rotation or repair.
    pub fn from_store(store: Bst<T>) -> Self {
        Self { store }
    }

    /// Read access to the underlying store.
    pub fn store(&self) -> &Bst<T> {
        &self.store
    }

    /// Number of stored keys, duplicates included. O(n): recomputed by
    /// traversal on every call.
    pub fn size(&self) -> usize {
        self.store.size()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    /// Drops every key.
    pub fn clear(&mut self) {
        self.store.clear();
    }

    fn force_root_black(&mut self) {
        if let Some(root) = self.store.root() {
            self.store.node_mut(root).color = Color::Black;
        }
    }

    /// Rotates `child` up over `parent`: a right rotation when `child` is
    /// `parent`'s left link, a left rotation when it is the right link.
    ///
    /// The child's displaced inner subtree is reattached under `parent` with
    /// its back-reference updated, `child` inherits `parent`'s old position
    /// (the grandparent's matching slot is redirected, or the tree root when
    /// `parent` was the root), and `parent` becomes `child`'s child. Keys
    /// and colors never change; only links move.
    ///
    /// Returns [`TreeError::MalformedRotation`] and leaves the tree
    /// untouched when `child` is not a direct child of `parent`.
    pub fn rotate(&mut self, child: NodeId, parent: NodeId) -> Result<(), TreeError> {
        let grandparent = self.store.node(parent).up;
        let parent_was_root = self.store.root() == Some(parent);

        if self.store.node(parent).left == Some(child) {
            // Right rotation: child's right subtree moves to parent's left.
            let displaced = self.store.node(child).right;
            self.store.node_mut(parent).left = displaced;
            if let Some(grandchild) = displaced {
                self.store.node_mut(grandchild).up = Some(parent);
            }
            self.store.node_mut(child).right = Some(parent);
            self.store.node_mut(parent).up = Some(child);
        } else if self.store.node(parent).right == Some(child) {
            // Left rotation: child's left subtree moves to parent's right.
            let displaced = self.store.node(child).left;
            self.store.node_mut(parent).right = displaced;
            if let Some(grandchild) = displaced {
                self.store.node_mut(grandchild).up = Some(parent);
            }
            self.store.node_mut(child).left = Some(parent);
            self.store.node_mut(parent).up = Some(child);
        } else {
            return Err(TreeError::MalformedRotation);
        }

        // The child takes over the parent's old position in the tree.
        match grandparent {
            Some(grandparent) => {
                self.store.node_mut(child).up = Some(grandparent);
                if self.store.node(grandparent).left == Some(parent) {
                    self.store.node_mut(grandparent).left = Some(child);
                } else if self.store.node(grandparent).right == Some(parent) {
                    self.store.node_mut(grandparent).right = Some(child);
                }
            }
            None => self.store.node_mut(child).up = None,
        }
        if parent_was_root {
            self.store.set_root(Some(child));
        }
        Ok(())
    }
}

impl<T: Ord> RedBlackTree<T> {
    /// Inserts a key. `insert(key)` accepts a plain key; `insert(None)`
    /// reproduces the rejected-absent-key path and returns
    /// [`TreeError::InvalidKey`] with no structural change.
    ///
    /// An empty tree gains a black root. Otherwise the key is placed as a
    /// red node by comparison descent (`<=` left, else right), repaired by
    /// [`Self::ensure_red_property`], and the possibly-new root is forced
    /// black.
    pub fn insert(&mut self, key: impl Into<Option<T>>) -> Result<(), TreeError> {
        let key = key.into().ok_or(TreeError::InvalidKey)?;
        match self.store.root() {
            None => {
                let new_node = self.store.alloc(key);
                self.store.node_mut(new_node).color = Color::Black;
                self.store.set_root(Some(new_node));
            }
            Some(root) => {
                // Allocated red; placement leaves the color alone.
                let new_node = self.store.alloc(key);
                self.store.place_by_comparison(new_node, root);
                self.ensure_red_property(new_node)?;
                self.force_root_black();
            }
        }
        Ok(())
    }

    /// Checks whether `key` is stored in the tree. O(log n).
    pub fn contains(&self, key: &T) -> bool {
        self.store.contains(key)
    }

    /// Repairs any red-red violation at `node`, a node just made red, and
    /// every violation the repair itself introduces further up, finishing
    /// with a black root.
    ///
    /// The violation dispatch follows the color of the aunt (the parent's
    /// sibling under the grandparent):
    ///
    /// - absent or black aunt: a rotation fixes the violation locally. When
    ///   `node` and its parent lean the same way the parent rotates up over
    ///   the grandparent; in the zig-zag shape `node` rotates up twice. The
    ///   promoted node turns black and the old grandparent red, and no
    ///   further ascent is needed.
    /// - red aunt: the grandparent turns red and both its children black,
    ///   which pushes the violation candidate up; repair recurses from the
    ///   grandparent. Each step moves strictly rootward, so the recursion
    ///   depth is bounded by the tree height.
    ///
    /// Calling this on a node whose parent is black (or on the root) is a
    /// no-op past the root-black re-assertion. Repair may land a duplicate
    /// key in the opposite subtree of an equal ancestor; ordering is still
    /// preserved.
    pub fn ensure_red_property(&mut self, node: NodeId) -> Result<(), TreeError> {
        let Some(parent) = self.store.node(node).up else {
            // The node is the root.
            self.store.node_mut(node).color = Color::Black;
            return Ok(());
        };
        if self.store.node(parent).color == Color::Black {
            self.force_root_black();
            return Ok(());
        }
        let Some(grandparent) = self.store.node(parent).up else {
            // A red parent at the root; blackening it clears the violation.
            self.store.node_mut(parent).color = Color::Black;
            return Ok(());
        };

        let parent_is_left = self.store.node(grandparent).left == Some(parent);
        let aunt = if parent_is_left {
            self.store.node(grandparent).right
        } else {
            self.store.node(grandparent).left
        };
        let aunt_is_red = aunt.is_some_and(|id| self.store.node(id).color == Color::Red);

        if aunt_is_red {
            // Recolor case: the grandparent becomes the new violation
            // candidate, its children stop being one.
            self.store.node_mut(grandparent).color = Color::Red;
            self.store.node_mut(parent).color = Color::Black;
            if let Some(aunt) = aunt {
                self.store.node_mut(aunt).color = Color::Black;
            }
            self.ensure_red_property(grandparent)?;
        } else {
            // Rotation case: a single or double rotation is terminal.
            let node_is_left = self.store.node(parent).left == Some(node);
            let promoted = if node_is_left == parent_is_left {
                self.rotate(parent, grandparent)?;
                parent
            } else {
                self.rotate(node, parent)?;
                self.rotate(node, grandparent)?;
                node
            };
            self.store.node_mut(promoted).color = Color::Black;
            self.store.node_mut(grandparent).color = Color::Red;
        }

        self.force_root_black();
        Ok(())
    }
}

impl<T: fmt::Display> fmt::Display for RedBlackTree<T> {
    /// Level-order keys with a color tag each, e.g.
    /// `[ 14(B), 7(B), 18(B), 23(R) ]`. Diagnostic output only.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.store.level_order_string())
    }
}
