//! Search nodes and the per-search node arena.

use aion_device::TileWire;

/// How a search node was reached from its parent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum EdgeKind {
    /// A search seed; has no parent.
    Seed,
    /// A fixed wire connection.
    Wire,
    /// A configurable crossbar link.
    Pip,
    /// A link through a site's internal logic.
    RouteThrough,
}

/// One visit of a maze search: where it is and how it got there.
///
/// Nodes are addressed by arena index. Each wire is pushed at most once per
/// search, which `MazeSearch` enforces through its `visited` set rather than
/// through node equality.
#[derive(Debug, Clone, Copy)]
pub(crate) struct SearchNode {
    pub at: TileWire,
    pub parent: Option<u32>,
    pub level: u32,
    pub cost: i32,
    pub via: EdgeKind,
    /// `true` when the edge from the parent stays within one tile.
    pub same_tile: bool,
}

/// Arena of search nodes addressed by index, cleared between searches.
#[derive(Debug, Default)]
pub(crate) struct NodeArena {
    nodes: Vec<SearchNode>,
}

impl NodeArena {
    pub fn clear(&mut self) {
        self.nodes.clear();
    }

    pub fn push(&mut self, node: SearchNode) -> u32 {
        let index = self.nodes.len() as u32;
        self.nodes.push(node);
        index
    }

    pub fn get(&self, index: u32) -> &SearchNode {
        &self.nodes[index as usize]
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Walks parent links from `index` back to a seed, returning the chain
    /// in seed-to-`index` order.
    pub fn chain(&self, index: u32) -> Vec<&SearchNode> {
        let mut chain = Vec::new();
        let mut cursor = Some(index);
        while let Some(i) = cursor {
            let node = self.get(i);
            chain.push(node);
            cursor = node.parent;
        }
        chain.reverse();
        chain
    }
}
