//! Persistent tree of speculative machine states.
//!
//! Every [`Node`] records the machine registers, the output produced so far
//! and at most one memory write on top of its parent. The memory seen by a
//! node is the union of the writes along its path to the root; a cell no
//! node on that path wrote is undecided. Nodes are immutable once created
//! and children share their ancestors.
//!
//! Nodes live in a [`NodeArena`] and are addressed by [`NodeId`]. Each slot
//! counts its holders: live handles plus children that link to it. Releasing
//! the last holder frees the slot and releases its parent in turn, so pruning
//! a frontier reclaims every ancestor no survivor still reaches.

use crate::virtual_machine::isa::{Instruction, encode};
use crate::virtual_machine::machine::Registers;
use crate::virtual_machine::ternary::Word;
use std::collections::BTreeMap;

/// Stable index of a node in a [`NodeArena`].
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    fn index(self) -> usize {
        self.0 as usize
    }
}

/// Origin of a recorded memory write.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum WriteKind {
    /// The search chose the instruction stored in an undecided cell.
    Decision,
    /// The machine wrote the cell while executing.
    Mutation,
}

/// One memory write recorded on a node.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct CellWrite {
    pub address: Word,
    pub value: Word,
    pub kind: WriteKind,
}

/// One speculative machine state.
#[derive(Clone, Debug, Default)]
pub struct Node {
    registers: Registers,
    output: Vec<u8>,
    write: Option<CellWrite>,
    parent: Option<NodeId>,
    depth: u32,
}

impl Node {
    pub fn registers(&self) -> &Registers {
        &self.registers
    }

    /// Bytes the machine has written so far.
    pub fn output(&self) -> &[u8] {
        &self.output
    }

    pub fn write(&self) -> Option<&CellWrite> {
        self.write.as_ref()
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Number of decisions on the path from the root.
    pub fn depth(&self) -> u32 {
        self.depth
    }
}

struct Slot {
    node: Node,
    holders: u32,
}

/// Reference-counted storage for [`Node`]s.
#[derive(Default)]
pub struct NodeArena {
    slots: Vec<Slot>,
    free: Vec<u32>,
    live: usize,
}

impl NodeArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a root: zeroed registers, no output and no decided memory.
    pub fn root(&mut self) -> NodeId {
        self.insert(Node::default())
    }

    /// Returns the node behind a live handle.
    pub fn get(&self, id: NodeId) -> &Node {
        debug_assert!(self.slots[id.index()].holders > 0, "{id:?} was released");
        &self.slots[id.index()].node
    }

    /// Adds a holder to a node.
    pub fn retain(&mut self, id: NodeId) {
        self.slots[id.index()].holders += 1;
    }

    /// Drops a holder, freeing the node and releasing its ancestors as they
    /// lose their last holder.
    pub fn release(&mut self, id: NodeId) {
        let mut next = Some(id);
        while let Some(id) = next {
            let slot = &mut self.slots[id.index()];
            debug_assert!(slot.holders > 0, "{id:?} released twice");
            slot.holders -= 1;
            if slot.holders > 0 {
                break;
            }
            next = std::mem::take(&mut slot.node).parent;
            self.free.push(id.0);
            self.live -= 1;
        }
    }

    /// Number of nodes currently held.
    pub fn live(&self) -> usize {
        self.live
    }

    /// Resolves a cell by walking from `id` towards the root.
    ///
    /// Returns `None` if no node on the path wrote `address`.
    pub fn resolve(&self, id: NodeId, address: Word) -> Option<Word> {
        let mut next = Some(id);
        while let Some(id) = next {
            let node = self.get(id);
            if let Some(write) = node.write
                && write.address == address
            {
                return Some(write.value);
            }
            next = node.parent;
        }
        None
    }

    /// Creates a branch child storing `instruction` in the undecided cell
    /// `address`.
    ///
    /// The child copies its parent's registers, output and phase and is one
    /// level deeper.
    pub fn decide(&mut self, parent: NodeId, address: Word, instruction: Instruction) -> NodeId {
        let node = self.get(parent);
        let child = Node {
            registers: node.registers,
            output: node.output.clone(),
            write: Some(CellWrite {
                address,
                value: encode(address, instruction),
                kind: WriteKind::Decision,
            }),
            parent: Some(parent),
            depth: node.depth + 1,
        };
        self.link(child)
    }

    /// Creates a child for one executed machine phase, at its parent's depth.
    pub(crate) fn derive(
        &mut self,
        parent: NodeId,
        registers: Registers,
        output: Vec<u8>,
        write: Option<CellWrite>,
    ) -> NodeId {
        let child = Node {
            registers,
            output,
            write,
            parent: Some(parent),
            depth: self.get(parent).depth,
        };
        self.link(child)
    }

    /// Collects the decisions along the path from `id` to the root.
    ///
    /// A cell decided more than once keeps the value closest to `id`.
    pub fn decisions(&self, id: NodeId) -> BTreeMap<Word, Word> {
        let mut decisions = BTreeMap::new();
        let mut next = Some(id);
        while let Some(id) = next {
            let node = self.get(id);
            if let Some(write) = node.write
                && write.kind == WriteKind::Decision
            {
                decisions.entry(write.address).or_insert(write.value);
            }
            next = node.parent;
        }
        decisions
    }

    /// Creates a root with preset registers and output.
    #[cfg(test)]
    pub(crate) fn root_with(&mut self, registers: Registers, output: &[u8]) -> NodeId {
        self.insert(Node {
            registers,
            output: output.to_vec(),
            ..Node::default()
        })
    }

    fn link(&mut self, child: Node) -> NodeId {
        if let Some(parent) = child.parent {
            self.retain(parent);
        }
        self.insert(child)
    }

    fn insert(&mut self, node: Node) -> NodeId {
        self.live += 1;
        let slot = Slot { node, holders: 1 };
        match self.free.pop() {
            Some(index) => {
                self.slots[index as usize] = slot;
                NodeId(index)
            }
            None => {
                self.slots.push(slot);
                NodeId(self.slots.len() as u32 - 1)
            }
        }
    }
}
