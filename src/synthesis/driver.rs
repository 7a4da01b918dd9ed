//! Search configuration and the top-level synthesis loop.

use crate::search::beam::{BeamSearcher, Policy, SearchOutcome};
use crate::search::errors::SearchError;
use crate::synthesis::policy::TargetPolicy;
use crate::virtual_machine::program::Program;
use crate::{debug, info, warn};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand_core::RngCore;
use std::ops::ControlFlow;

/// Default target string.
pub const DEFAULT_TARGET: &str = "Hello World";

/// Default number of nodes kept per round.
pub const DEFAULT_BEAM_WIDTH: usize = 10_000;

/// Parameters of one synthesis run.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SearchConfig {
    /// Output the program must produce, compared ASCII case-insensitively.
    pub target: String,
    pub beam_width: usize,
    /// Tie-break seed. `None` seeds from system entropy.
    pub seed: Option<u64>,
    /// Stop after this many rounds.
    pub max_rounds: Option<u64>,
    /// Execute printable cells that name no instruction as `NoOp`.
    pub nop_fallback: bool,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            target: DEFAULT_TARGET.to_string(),
            beam_width: DEFAULT_BEAM_WIDTH,
            seed: None,
            max_rounds: None,
            nop_fallback: true,
        }
    }
}

impl SearchConfig {
    /// Tie-break generator for this configuration.
    pub fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }
}

/// A program found by the search.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Solution {
    /// Program text reconstructed from the decisions of the solution node.
    pub program: Program,
    /// Output of the solution node.
    pub output: Vec<u8>,
    pub score: i64,
    /// Rounds run until the solution appeared.
    pub rounds: u64,
}

/// How a synthesis run ended.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Synthesis {
    Found(Solution),
    /// Every branch died out.
    Exhausted { rounds: u64 },
    /// The round limit was reached.
    Stopped { rounds: u64 },
}

/// Searches for a program that prints `config.target`.
///
/// Progress is logged once per round.
pub fn synthesize<R: RngCore>(config: &SearchConfig, rng: R) -> Result<Synthesis, SearchError> {
    let mut policy = TargetPolicy::new(config.target.as_bytes(), config.nop_fallback);
    let root = policy.root();
    let mut searcher = BeamSearcher::new(config.beam_width, policy, root, rng)?;

    info!(
        "Searching for {:?} with beam width {}",
        config.target, config.beam_width
    );

    let outcome = searcher.run(|searcher| {
        if config.max_rounds.is_some_and(|max| searcher.round() > max) {
            return ControlFlow::Break(());
        }
        if let Some(best) = searcher.best() {
            let policy = searcher.policy();
            info!(
                "Round {}: {} nodes, best {:?} (score {})",
                searcher.round(),
                searcher.frontier().len(),
                String::from_utf8_lossy(policy.arena().get(*best).output()),
                policy.score(best)
            );
            debug!("{} live nodes", policy.arena().live());
        }
        ControlFlow::Continue(())
    });

    let rounds = searcher.round() - 1;
    Ok(match outcome {
        SearchOutcome::Found(goal) => {
            let policy = searcher.policy_mut();
            let node = policy.arena().get(goal);
            let solution = Solution {
                program: Program::from_decisions(&policy.arena().decisions(goal)),
                output: node.output().to_vec(),
                score: policy.score(&goal),
                rounds,
            };
            policy.release(goal);
            info!("Found a solution after {} rounds", rounds);
            Synthesis::Found(solution)
        }
        SearchOutcome::Exhausted => {
            warn!("Search space exhausted after {} rounds", rounds);
            Synthesis::Exhausted { rounds }
        }
        SearchOutcome::Stopped => {
            warn!("Stopped after {} rounds", rounds);
            Synthesis::Stopped { rounds }
        }
    })
}
