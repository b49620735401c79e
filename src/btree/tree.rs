//! # Tree Traversal
//!
//! In-order traversal over a rooted b-tree: for each cell, the subtree
//! under its left child comes first, then the cell itself; after the last
//! cell comes the subtree under the node's right-most child. Table-interior
//! cells carry no payload and are never handed to the visitor.
//!
//! ## Iterative Walk
//!
//! Recursion depth on an adversarial file is unbounded, so the walk keeps
//! an explicit stack of `(node, next_cell, pending_cell)` frames bounded by
//! the configured depth limit (by default the declared page count, which is
//! an upper bound on the height of any well-formed tree). `pending_cell`
//! holds an interior cell whose left subtree is still being walked; it is
//! emitted when its frame surfaces again.
//!
//! The depth limit alone cannot catch a cycle threaded through right-child
//! pointers: an interior frame is popped before its right child is pushed,
//! so the right spine never deepens the stack. A separate count of nodes
//! visited, bounded by the declared page count (no well-formed tree visits
//! a page twice), turns such cycles into `Corruption`.
//!
//! ## Cancellation
//!
//! Any error returned by the visitor aborts the walk immediately and is
//! propagated verbatim to the caller. The walker neither sorts nor
//! verifies key order; it emits cells in the order the file stores them.

use super::cell::Cell;
use super::node::Node;
use crate::error::{Error, Result};
use crate::storage::{ByteSource, Pager};

/// A read handle on one b-tree of the database file.
pub struct Tree<'d, S> {
    pager: &'d Pager<S>,
    usable_size: u32,
    root: u32,
    max_depth: usize,
}

struct Frame<'s> {
    node: Node<'s>,
    next_cell: u16,
    pending: Option<Cell<'s>>,
}

impl<'d, S: ByteSource> Tree<'d, S> {
    pub fn new(pager: &'d Pager<S>, usable_size: u32, root: u32, max_depth: usize) -> Self {
        Self {
            pager,
            usable_size,
            root,
            max_depth,
        }
    }

    pub fn root_page(&self) -> u32 {
        self.root
    }

    /// Walks the tree in order, invoking `visit` for every payload-carrying
    /// cell.
    pub fn walk<F>(&self, mut visit: F) -> Result<()>
    where
        F: FnMut(&Cell<'d>) -> Result<()>,
    {
        tracing::debug!(root = self.root, "walking btree");

        let mut stack: Vec<Frame<'d>> = Vec::new();
        let mut visited: u32 = 0;
        self.push_node(&mut stack, &mut visited, self.root)?;

        while let Some(top) = stack.last_mut() {
            if let Some(cell) = top.pending.take() {
                visit(&cell)?;
            }

            if top.next_cell < top.node.num_cells() {
                let index = top.next_cell;
                top.next_cell += 1;

                let cell = Cell::read(&top.node, index, self.pager, self.usable_size)?;
                let emit = top.node.kind().has_payload();

                match cell.left_child() {
                    Some(child) => {
                        if emit {
                            top.pending = Some(cell);
                        }
                        self.push_node(&mut stack, &mut visited, child)?;
                    }
                    None => {
                        if emit {
                            visit(&cell)?;
                        }
                    }
                }
            } else {
                let right = top.node.right_child();
                stack.pop();
                if let Some(child) = right {
                    self.push_node(&mut stack, &mut visited, child)?;
                }
            }
        }

        Ok(())
    }

    fn push_node(&self, stack: &mut Vec<Frame<'d>>, visited: &mut u32, page_id: u32) -> Result<()> {
        if stack.len() >= self.max_depth {
            return Err(Error::corruption(format!(
                "tree under page {} exceeds depth limit {}",
                self.root, self.max_depth
            )));
        }
        *visited += 1;
        if *visited > self.pager.page_count() {
            return Err(Error::corruption(format!(
                "tree under page {} visits more nodes than the {} pages in the file",
                self.root,
                self.pager.page_count()
            )));
        }
        let page = self.pager.read_page(page_id)?;
        stack.push(Frame {
            node: Node::parse(page)?,
            next_cell: 0,
            pending: None,
        });
        Ok(())
    }
}
