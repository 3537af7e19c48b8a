//! Aho-Corasick piece automaton with lazily evaluated links.
//!
//! # Design
//!
//! The automaton is a single arena (`Vec<Node>`) indexed by `u32`. All
//! inter-node references (children, goto cache, suffix link, dictionary
//! link, parent) are arena indices, so ownership stays with the arena and
//! back-references never form reference cycles.
//!
//! The trie shape is fixed at construction; the three link functions are
//! computed on first demand and memoized in per-node slots:
//!
//! - `suffix_link`: longest proper suffix of the node's path that is itself
//!   a trie node,
//! - `next_state` (goto): total transition function, direct edge first,
//!   suffix-link fallback otherwise, root self-loop at the bottom,
//! - `dict_link`: nearest terminal node on the suffix-link chain, letting
//!   the scanner enumerate piece endings in time proportional to the number
//!   of matches rather than the chain length.
//!
//! Each resolver walks its chain with an explicit worklist and fills every
//! slot it passes, so a pathologically deep trie cannot exhaust the call
//! stack and a slot is computed exactly once.

use crate::error::Result;
use crate::mask::MaskQuery;
use crate::symbol::{symbol_index, ALPHABET_LEN};

/// Arena index of a node.
pub(crate) type NodeId = u32;

/// Index of the root node; the arena always places it first.
pub(crate) const ROOT: NodeId = 0;

/// One automaton state.
#[derive(Debug, Clone)]
pub(crate) struct Node {
    /// Trie edges; these own the tree shape.
    pub(crate) children: [Option<NodeId>; ALPHABET_LEN],
    /// Memoized goto targets, total once populated.
    pub(crate) goto_cache: [Option<NodeId>; ALPHABET_LEN],
    /// Memoized suffix link; the root's is preset to itself.
    pub(crate) suffix: Option<NodeId>,
    /// Memoized dictionary link; the root's is preset to itself.
    pub(crate) dict: Option<NodeId>,
    /// Parent index and incoming symbol; `None` only for the root.
    pub(crate) parent: Option<(NodeId, u8)>,
    /// True if some piece's path ends here.
    pub(crate) terminal: bool,
    /// Ids of the pieces ending exactly here. Duplicate pieces in one mask
    /// each keep their own id, so a single ending credits all of them.
    pub(crate) piece_ids: Vec<u32>,
}

impl Node {
    fn new(parent: Option<(NodeId, u8)>) -> Self {
        Self {
            children: [None; ALPHABET_LEN],
            goto_cache: [None; ALPHABET_LEN],
            suffix: None,
            dict: None,
            parent,
            terminal: false,
            piece_ids: Vec::new(),
        }
    }

    fn root() -> Self {
        let mut node = Self::new(None);
        // Every link chain bottoms out at the root, so its own links point
        // back at itself.
        node.suffix = Some(ROOT);
        node.dict = Some(ROOT);
        node
    }
}

/// Multi-pattern automaton over the literal pieces of one mask.
///
/// Built once from a [`MaskQuery`]; the trie shape is immutable afterwards,
/// while the link caches fill in lazily as a scan visits states. Obtain a
/// [`MaskScanner`](crate::MaskScanner) with
/// [`scanner()`](PieceAutomaton::scanner) to drive it over a text.
pub struct PieceAutomaton {
    pub(crate) nodes: Vec<Node>,
    /// Per-piece end offset within the mask (begin offset + piece length).
    piece_ends: Vec<usize>,
    mask_len: usize,
}

impl PieceAutomaton {
    /// Builds the trie over the query's pieces.
    pub fn build(query: &MaskQuery) -> Result<Self> {
        let mut automaton = Self {
            nodes: vec![Node::root()],
            piece_ends: Vec::with_capacity(query.piece_count()),
            mask_len: query.mask_len(),
        };

        for (piece_id, piece) in query.pieces().iter().enumerate() {
            automaton.insert(piece.text().as_bytes(), piece.offset(), piece_id as u32)?;
            automaton.piece_ends.push(piece.end());
        }

        Ok(automaton)
    }

    /// Inserts one piece as a path from the root, extending the trie as
    /// needed, and records the piece id at the terminal node.
    fn insert(&mut self, piece: &[u8], mask_offset: usize, piece_id: u32) -> Result<()> {
        let mut current = ROOT;
        for (pos, &byte) in piece.iter().enumerate() {
            let sym = symbol_index(byte, mask_offset + pos)?;
            current = match self.nodes[current as usize].children[sym] {
                Some(child) => child,
                None => {
                    let child = self.nodes.len() as NodeId;
                    self.nodes.push(Node::new(Some((current, sym as u8))));
                    self.nodes[current as usize].children[sym] = Some(child);
                    child
                }
            };
        }

        let node = &mut self.nodes[current as usize];
        node.terminal = true;
        node.piece_ids.push(piece_id);
        Ok(())
    }

    /// Suffix link of `node`: the longest proper suffix of its path that is
    /// also a trie node, the root if none.
    ///
    /// Uncached ancestors are resolved shortest-path-first, so each link is
    /// derived from an already-resolved strictly shorter one.
    pub(crate) fn suffix_link(&mut self, node: NodeId) -> NodeId {
        if let Some(link) = self.nodes[node as usize].suffix {
            return link;
        }

        let mut pending = Vec::new();
        let mut cur = node;
        while self.nodes[cur as usize].suffix.is_none() {
            pending.push(cur);
            match self.nodes[cur as usize].parent {
                Some((parent, _)) => cur = parent,
                None => break,
            }
        }

        while let Some(n) = pending.pop() {
            let link = match self.nodes[n as usize].parent {
                None | Some((ROOT, _)) => ROOT,
                Some((parent, sym)) => {
                    let parent_link = self.nodes[parent as usize].suffix.unwrap_or(ROOT);
                    self.goto_index(parent_link, sym as usize)
                }
            };
            self.nodes[n as usize].suffix = Some(link);
        }

        self.nodes[node as usize].suffix.unwrap_or(ROOT)
    }

    /// Total transition function on raw input bytes.
    ///
    /// `position` is the zero-based symbol index, used only for error
    /// reporting when `byte` is outside the alphabet.
    pub(crate) fn next_state(&mut self, node: NodeId, byte: u8, position: usize) -> Result<NodeId> {
        let sym = symbol_index(byte, position)?;
        Ok(self.goto_index(node, sym))
    }

    /// Transition on an alphabet index: direct child first, otherwise fall
    /// back through suffix links, with the root self-looping so the scan
    /// never stalls. Every node visited on the fallback chain resolves to
    /// the same target and is cached along the way.
    fn goto_index(&mut self, node: NodeId, sym: usize) -> NodeId {
        if let Some(target) = self.nodes[node as usize].goto_cache[sym] {
            return target;
        }

        let mut pending = Vec::new();
        let mut cur = node;
        let target = loop {
            if let Some(target) = self.nodes[cur as usize].goto_cache[sym] {
                break target;
            }
            if let Some(child) = self.nodes[cur as usize].children[sym] {
                pending.push(cur);
                break child;
            }
            if cur == ROOT {
                pending.push(cur);
                break ROOT;
            }
            pending.push(cur);
            cur = self.suffix_link(cur);
        };

        for n in pending {
            self.nodes[n as usize].goto_cache[sym] = Some(target);
        }
        target
    }

    /// Dictionary link of `node`: the nearest terminal node reachable by
    /// repeated suffix links, the root if none. All non-terminal nodes on
    /// the chain share the same link, so every slot passed is filled.
    pub(crate) fn dict_link(&mut self, node: NodeId) -> NodeId {
        if let Some(link) = self.nodes[node as usize].dict {
            return link;
        }

        let mut pending = Vec::new();
        let mut cur = node;
        let link = loop {
            if let Some(link) = self.nodes[cur as usize].dict {
                break link;
            }
            let suffix = self.suffix_link(cur);
            if self.nodes[suffix as usize].terminal {
                pending.push(cur);
                break suffix;
            }
            if suffix == ROOT {
                pending.push(cur);
                break ROOT;
            }
            pending.push(cur);
            cur = suffix;
        };

        for n in pending {
            self.nodes[n as usize].dict = Some(link);
        }
        link
    }

    pub(crate) fn is_terminal(&self, node: NodeId) -> bool {
        self.nodes[node as usize].terminal
    }

    pub(crate) fn piece_ids(&self, node: NodeId) -> &[u32] {
        &self.nodes[node as usize].piece_ids
    }

    pub(crate) fn piece_end(&self, piece_id: u32) -> usize {
        self.piece_ends[piece_id as usize]
    }

    /// Number of nodes in the arena, root included.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of pieces the automaton searches for.
    pub fn piece_count(&self) -> usize {
        self.piece_ends.len()
    }

    /// Length of the original mask, wildcards included.
    pub fn mask_len(&self) -> usize {
        self.mask_len
    }
}
