//! Beam search over an abstract node type.
//!
//! [`BeamSearcher`] keeps one generation of nodes (the frontier). Each round
//! it asks the [`Policy`] to expand every frontier node, pools the children,
//! ranks them by score and keeps at most `beam_width` of them. Candidates that
//! share the score at the cutoff position are shuffled before truncation, so
//! the generation order of children never decides which of them survive.
//!
//! The searcher knows nothing about what a node means. Node lifetimes are
//! reported back to the policy through [`Policy::release`], which lets a
//! policy that hands out arena handles reclaim them.

use crate::search::errors::SearchError;
use rand::seq::SliceRandom;
use rand_core::RngCore;
use std::marker::PhantomData;
use std::ops::ControlFlow;

/// Result of expanding one frontier node.
#[derive(Debug, Eq, PartialEq)]
pub enum Expansion<N> {
    /// The node is a solution. It contributes no children.
    Goal(N),
    /// Children for the next generation. Empty when the node died out.
    Children(Vec<N>),
}

/// Domain logic plugged into a [`BeamSearcher`].
pub trait Policy {
    type Node;

    /// Expands a frontier node into a goal or its children.
    fn expand(&mut self, node: &Self::Node) -> Expansion<Self::Node>;

    /// Ranks a candidate. Higher is better.
    fn score(&self, node: &Self::Node) -> i64;

    /// Called once for every node the searcher discards.
    fn release(&mut self, node: Self::Node) {
        drop(node);
    }
}

/// [`Policy`] built from an expansion closure and a scoring closure.
pub struct FnPolicy<N, E, S> {
    expand: E,
    score: S,
    _node: PhantomData<fn() -> N>,
}

impl<N, E, S> FnPolicy<N, E, S>
where
    E: FnMut(&N) -> Expansion<N>,
    S: Fn(&N) -> i64,
{
    pub fn new(expand: E, score: S) -> Self {
        Self {
            expand,
            score,
            _node: PhantomData,
        }
    }
}

impl<N, E, S> Policy for FnPolicy<N, E, S>
where
    E: FnMut(&N) -> Expansion<N>,
    S: Fn(&N) -> i64,
{
    type Node = N;

    fn expand(&mut self, node: &N) -> Expansion<N> {
        (self.expand)(node)
    }

    fn score(&self, node: &N) -> i64 {
        (self.score)(node)
    }
}

/// How a call to [`BeamSearcher::run`] ended.
#[derive(Debug, Eq, PartialEq)]
pub enum SearchOutcome<N> {
    /// A round produced a goal.
    Found(N),
    /// The frontier died out.
    Exhausted,
    /// The observer asked to stop.
    Stopped,
}

/// Round-based beam search controller.
pub struct BeamSearcher<P: Policy, R> {
    beam_width: usize,
    policy: P,
    frontier: Vec<P::Node>,
    round: u64,
    rng: R,
}

impl<P: Policy, R: RngCore> BeamSearcher<P, R> {
    /// Creates a searcher whose first frontier is `root`.
    ///
    /// `rng` is only used to break ties at the cutoff score.
    pub fn new(beam_width: usize, policy: P, root: P::Node, rng: R) -> Result<Self, SearchError> {
        if beam_width == 0 {
            return Err(SearchError::ZeroBeamWidth);
        }
        Ok(Self {
            beam_width,
            policy,
            frontier: vec![root],
            round: 1,
            rng,
        })
    }

    /// Runs one round and returns the goals it found.
    ///
    /// The surviving children become the next frontier whether or not a goal
    /// was found.
    pub fn search_round(&mut self) -> Vec<P::Node> {
        let mut goals = Vec::new();
        let mut pool = Vec::new();
        for node in std::mem::take(&mut self.frontier) {
            match self.policy.expand(&node) {
                Expansion::Goal(goal) => goals.push(goal),
                Expansion::Children(children) => pool.extend(children),
            }
            self.policy.release(node);
        }

        let mut ranked: Vec<(i64, P::Node)> = pool
            .into_iter()
            .map(|node| (self.policy.score(&node), node))
            .collect();
        ranked.sort_by(|(left, _), (right, _)| right.cmp(left));

        if ranked.len() > self.beam_width {
            let cutoff = ranked[self.beam_width - 1].0;
            let ties_start = ranked.partition_point(|(score, _)| *score > cutoff);
            let ties_end = ranked.partition_point(|(score, _)| *score >= cutoff);
            ranked[ties_start..ties_end].shuffle(&mut self.rng);
            for (_, node) in ranked.drain(self.beam_width..) {
                self.policy.release(node);
            }
        }

        self.frontier = ranked.into_iter().map(|(_, node)| node).collect();
        self.round += 1;
        goals
    }

    /// Runs rounds until a goal is found, the frontier dies out, or `observer`
    /// breaks.
    ///
    /// `observer` sees the searcher before every round. When a round finds
    /// several goals the first one is returned and the rest are released.
    pub fn run<F>(&mut self, mut observer: F) -> SearchOutcome<P::Node>
    where
        F: FnMut(&Self) -> ControlFlow<()>,
    {
        loop {
            if self.frontier.is_empty() {
                return SearchOutcome::Exhausted;
            }
            if observer(self).is_break() {
                return SearchOutcome::Stopped;
            }
            let mut goals = self.search_round().into_iter();
            if let Some(goal) = goals.next() {
                for other in goals {
                    self.policy.release(other);
                }
                return SearchOutcome::Found(goal);
            }
        }
    }

    /// Number of the round about to run, starting at 1.
    pub fn round(&self) -> u64 {
        self.round
    }

    pub fn frontier(&self) -> &[P::Node] {
        &self.frontier
    }

    /// Highest scoring frontier node.
    pub fn best(&self) -> Option<&P::Node> {
        self.frontier.first()
    }

    pub fn beam_width(&self) -> usize {
        self.beam_width
    }

    pub fn policy(&self) -> &P {
        &self.policy
    }

    pub fn policy_mut(&mut self) -> &mut P {
        &mut self.policy
    }
}
