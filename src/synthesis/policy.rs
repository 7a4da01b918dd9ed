//! Search policy for producing a target string.
//!
//! [`TargetPolicy`] drives a node deterministically until it exits, fails,
//! strays from the target, or reads an undecided cell. Only the last case
//! branches: one child per instruction the cell could hold. Output is
//! compared to the target ASCII case-insensitively.

use crate::search::beam::{Expansion, Policy};
use crate::synthesis::arena::{NodeArena, NodeId};
use crate::synthesis::speculative::{Transition, transition};
use crate::virtual_machine::isa::Instruction;

/// Points per output byte in [`TargetPolicy::score`].
pub const OUTPUT_WEIGHT: i64 = 10;

/// [`Policy`] over arena nodes that searches for a program printing `target`.
pub struct TargetPolicy {
    arena: NodeArena,
    target: Vec<u8>,
    nop_fallback: bool,
}

impl TargetPolicy {
    pub fn new(target: impl Into<Vec<u8>>, nop_fallback: bool) -> Self {
        Self {
            arena: NodeArena::new(),
            target: target.into(),
            nop_fallback,
        }
    }

    /// Creates the root node every search starts from.
    pub fn root(&mut self) -> NodeId {
        self.arena.root()
    }

    pub fn arena(&self) -> &NodeArena {
        &self.arena
    }

    pub fn arena_mut(&mut self) -> &mut NodeArena {
        &mut self.arena
    }

    pub fn target(&self) -> &[u8] {
        &self.target
    }

    /// Whether `output` can still grow into the target.
    ///
    /// Earlier bytes were checked when they were written, so only the last
    /// one is compared.
    fn on_track(&self, output: &[u8]) -> bool {
        match output.len() {
            0 => true,
            len if len > self.target.len() => false,
            len => output[len - 1].eq_ignore_ascii_case(&self.target[len - 1]),
        }
    }

    fn is_goal(&self, output: &[u8]) -> bool {
        output.eq_ignore_ascii_case(&self.target)
    }

    /// Drops the handle of an intermediate node created during expansion.
    fn drop_intermediate(&mut self, expanded: NodeId, current: NodeId) {
        if current != expanded {
            self.arena.release(current);
        }
    }
}

impl Policy for TargetPolicy {
    type Node = NodeId;

    fn expand(&mut self, node: &NodeId) -> Expansion<NodeId> {
        let expanded = *node;
        let mut current = expanded;
        loop {
            match transition(&mut self.arena, current, self.nop_fallback) {
                Err(_) => break,
                Ok(Transition::Exited) => {
                    if !self.is_goal(self.arena.get(current).output()) {
                        break;
                    }
                    if current == expanded {
                        self.arena.retain(current);
                    }
                    return Expansion::Goal(current);
                }
                Ok(Transition::NeedsDecision(address)) => {
                    let children = Instruction::ALL
                        .iter()
                        .map(|&instruction| self.arena.decide(current, address, instruction))
                        .collect();
                    self.drop_intermediate(expanded, current);
                    return Expansion::Children(children);
                }
                Ok(Transition::Stepped(child)) => {
                    self.drop_intermediate(expanded, current);
                    current = child;
                    if !self.on_track(self.arena.get(current).output()) {
                        break;
                    }
                }
            }
        }
        self.drop_intermediate(expanded, current);
        Expansion::Children(Vec::new())
    }

    fn score(&self, node: &NodeId) -> i64 {
        let node = self.arena.get(*node);
        OUTPUT_WEIGHT * node.output().len() as i64 - node.depth() as i64
    }

    fn release(&mut self, node: NodeId) {
        self.arena.release(node);
    }
}
