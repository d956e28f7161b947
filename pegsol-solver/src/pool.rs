//! Recycling arena of search-tree nodes.
//!
//! Each node stores a board, a link to its parent node and the number of
//! live children referring to it. Nodes are addressed by [`NodeId`]; retired
//! slots go on a free list and are handed out again by [`StatePool::acquire`].
//!
//! Retirement cascades: releasing a dead-end node decrements its parent's
//! child count, and a parent whose count drops to zero is retired as well.
//! A node is only ever released after it has been expanded, so a parent with
//! no live children can never be needed again.

use pegsol_core::Board;

/// Handle to a node in a [`StatePool`].
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
pub struct NodeId(u32);

impl NodeId {
    /// Slot index inside the pool.
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Clone, Copy, Debug)]
struct Node {
    board: Board,
    parent: Option<NodeId>,
    /// Live children pointing at this node
    children: u32,
    live: bool,
}

/// Allocation counters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PoolStats {
    /// Slots created by growing the arena
    pub allocated: u64,
    /// Slots handed out again from the free list
    pub reused: u64,
    /// Nodes retired (directly or by cascade)
    pub released: u64,
    /// Highest number of simultaneously live nodes
    pub peak_live: usize,
}

/// Arena of search nodes with a free list.
pub struct StatePool {
    nodes: Vec<Node>,
    free: Vec<NodeId>,
    live: usize,
    stats: PoolStats,
}

impl StatePool {
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Create a pool with room for `capacity` nodes before the arena grows.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: Vec::with_capacity(capacity),
            free: Vec::new(),
            live: 0,
            stats: PoolStats::default(),
        }
    }

    /// Store `board` as a child of `parent` (None for a root).
    ///
    /// Reuses a retired slot when one is available.
    pub fn acquire(&mut self, board: Board, parent: Option<NodeId>) -> NodeId {
        if let Some(parent) = parent {
            let node = &mut self.nodes[parent.index()];
            assert!(node.live, "acquire under retired parent {parent:?}");
            node.children += 1;
        }

        let fresh = Node {
            board,
            parent,
            children: 0,
            live: true,
        };

        let id = match self.free.pop() {
            Some(id) => {
                self.nodes[id.index()] = fresh;
                self.stats.reused += 1;
                id
            }
            None => {
                let id = NodeId(self.nodes.len() as u32);
                self.nodes.push(fresh);
                self.stats.allocated += 1;
                id
            }
        };

        self.live += 1;
        self.stats.peak_live = self.stats.peak_live.max(self.live);
        id
    }

    /// Retire `id` and every ancestor left without live children.
    ///
    /// # Panics
    ///
    /// Panics if `id` is already retired or still has live children.
    pub fn release(&mut self, id: NodeId) {
        let node = &self.nodes[id.index()];
        assert!(node.live, "double release of {id:?}");
        assert_eq!(node.children, 0, "release of {id:?} with live children");

        let mut current = id;
        loop {
            let node = &mut self.nodes[current.index()];
            node.live = false;
            let parent = node.parent.take();
            self.free.push(current);
            self.live -= 1;
            self.stats.released += 1;

            let Some(parent) = parent else { break };
            let parent_node = &mut self.nodes[parent.index()];
            parent_node.children -= 1;
            if parent_node.children > 0 {
                break;
            }
            current = parent;
        }
    }

    /// Board stored in a live node.
    #[inline]
    pub fn board(&self, id: NodeId) -> &Board {
        let node = &self.nodes[id.index()];
        debug_assert!(node.live);
        &node.board
    }

    /// Parent of a live node, None for a root.
    #[inline]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        let node = &self.nodes[id.index()];
        debug_assert!(node.live);
        node.parent
    }

    /// Number of live children of a node.
    #[inline]
    pub fn children(&self, id: NodeId) -> u32 {
        self.nodes[id.index()].children
    }

    /// Whether `id` refers to a live node.
    #[inline]
    pub fn is_live(&self, id: NodeId) -> bool {
        self.nodes.get(id.index()).is_some_and(|node| node.live)
    }

    /// Number of live nodes.
    #[inline]
    pub fn live(&self) -> usize {
        self.live
    }

    /// Number of slots ever created.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.nodes.len()
    }

    pub fn stats(&self) -> PoolStats {
        self.stats
    }
}

impl Default for StatePool {
    fn default() -> Self {
        Self::new()
    }
}
