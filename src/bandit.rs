//! Bandit selection policies over an arm registry.
//!
//! [`Bandit`] owns an [`ArmRegistry`] plus a seedable RNG and exposes the
//! three classic policies: epsilon-greedy, UCB1, and Thompson sampling.
//! Selection never mutates arm counters; only [`Bandit::observe`] does.
//!
//! Notes:
//! - Every stochastic branch draws from the engine's own RNG, so runs are
//!   reproducible with [`Bandit::with_seed`]. Default construction uses a
//!   fixed seed (deterministic by default).
//! - Deterministic ties always resolve to the earliest-registered arm.

use rand::rngs::StdRng;
use rand::Rng;
use rand::SeedableRng;
use rand_distr::{Beta, Distribution};
use tracing::{debug, trace};

use crate::error::{Error, Result};
use crate::registry::{ArmRegistry, BanditSnapshot};

/// Exploration constant used by [`SelectionPolicy::Ucb`] unless overridden.
pub const DEFAULT_UCB_C: f64 = 2.0;

/// Selection strategy for [`Bandit::select`].
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum SelectionPolicy {
    /// Explore uniformly with probability `epsilon`, otherwise exploit the
    /// highest average reward.
    EpsilonGreedy { epsilon: f64 },
    /// Average reward plus `c * sqrt(ln(total_pulls) / pulls)`.
    Ucb { c: f64 },
    /// One Beta(wins+1, losses+1) draw per arm; the highest sample wins.
    Thompson,
}

impl Default for SelectionPolicy {
    fn default() -> Self {
        Self::EpsilonGreedy { epsilon: 0.1 }
    }
}

/// Seedable bandit engine.
///
/// # Example
///
/// ```rust
/// use curator::{ArmRegistry, Bandit, SelectionPolicy};
///
/// let registry = ArmRegistry::new(["style-transfer", "diffusion"])?;
/// let mut bandit = Bandit::with_seed(registry, 42);
///
/// bandit.observe("diffusion", 0.9)?;
/// bandit.observe("style-transfer", 0.2)?;
///
/// let chosen = bandit.select(SelectionPolicy::EpsilonGreedy { epsilon: 0.0 })?;
/// assert_eq!(chosen, "diffusion");
/// # Ok::<(), curator::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct Bandit {
    registry: ArmRegistry,
    rng: StdRng,
}

impl Bandit {
    /// Create an engine with a deterministic fixed seed (0).
    pub fn new(registry: ArmRegistry) -> Self {
        Self::with_seed(registry, 0)
    }

    /// Create an engine with an explicit seed (reproducible).
    pub fn with_seed(registry: ArmRegistry, seed: u64) -> Self {
        Self {
            registry,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Read access to the underlying registry.
    pub fn registry(&self) -> &ArmRegistry {
        &self.registry
    }

    /// Select an arm with the given policy.
    pub fn select(&mut self, policy: SelectionPolicy) -> Result<String> {
        let chosen = match policy {
            SelectionPolicy::EpsilonGreedy { epsilon } => self.select_epsilon_greedy(epsilon),
            SelectionPolicy::Ucb { c } => self.select_ucb(c),
            SelectionPolicy::Thompson => self.select_thompson(),
        }?;
        debug!(?policy, chosen = %chosen, "selected arm");
        Ok(chosen)
    }

    /// Epsilon-greedy selection.
    ///
    /// With probability `epsilon` returns a uniformly random arm; otherwise
    /// the arm with the highest average reward (first registered wins ties).
    pub fn select_epsilon_greedy(&mut self, epsilon: f64) -> Result<String> {
        if !(0.0..=1.0).contains(&epsilon) {
            return Err(Error::EpsilonOutOfRange(epsilon));
        }
        let r: f64 = self.rng.random();
        if r < epsilon {
            let chosen = self.random_arm();
            trace!(chosen = %chosen, "epsilon-greedy explore");
            return Ok(chosen);
        }
        let (name, _) = self.leader();
        Ok(name.to_string())
    }

    /// UCB1 selection.
    ///
    /// Scores played arms as `average + c * sqrt(ln(total) / pulls)`. Arms
    /// with zero pulls are always preferred over played arms (registration
    /// order among themselves); with no pulls anywhere the choice is a
    /// uniform random bootstrap.
    pub fn select_ucb(&mut self, c: f64) -> Result<String> {
        if !c.is_finite() || c <= 0.0 {
            return Err(Error::ExplorationOutOfRange(c));
        }
        let total = self.registry.total_pulls();
        if total == 0 {
            let chosen = self.random_arm();
            trace!(chosen = %chosen, "ucb bootstrap");
            return Ok(chosen);
        }
        for (name, stats) in self.registry.iter() {
            if stats.pulls == 0 {
                trace!(chosen = name, "ucb explore-first");
                return Ok(name.to_string());
            }
        }
        let ln_total = (total as f64).ln();
        let mut best: Option<&str> = None;
        let mut best_score = f64::NEG_INFINITY;
        for (name, stats) in self.registry.iter() {
            let bonus = c * (ln_total / stats.pulls as f64).sqrt();
            let score = stats.average_reward + bonus;
            if best.is_none() || score > best_score {
                best_score = score;
                best = Some(name);
            }
        }
        Ok(best.unwrap_or_default().to_string())
    }

    /// Thompson-sampling selection.
    ///
    /// Draws one sample per arm from Beta(wins+1, losses+1) and returns the
    /// arm with the largest sample. Stochastic on every call, even with
    /// identical counters.
    pub fn select_thompson(&mut self) -> Result<String> {
        let mut best: Option<&str> = None;
        let mut best_sample = f64::NEG_INFINITY;
        for (name, stats) in self.registry.iter() {
            let draw = sample_beta(
                &mut self.rng,
                stats.wins as f64 + 1.0,
                stats.losses as f64 + 1.0,
            );
            if best.is_none() || draw > best_sample {
                best_sample = draw;
                best = Some(name);
            }
        }
        Ok(best.unwrap_or_default().to_string())
    }

    /// Record the observed reward for `arm`.
    pub fn observe(&mut self, arm: &str, reward: f64) -> Result<()> {
        self.registry.observe(arm, reward)
    }

    /// The arm with the highest average reward and that average.
    ///
    /// Deterministic reporting counterpart to the stochastic select paths
    /// (first registered wins ties).
    pub fn best_arm(&self) -> (String, f64) {
        let (name, average) = self.leader();
        (name.to_string(), average)
    }

    /// Regret against a caller-estimated per-pull optimal reward:
    /// `optimal_reward * total_pulls - total observed reward`.
    ///
    /// A noisy `optimal_reward` estimate can make this negative; that is an
    /// input assumption, not an invariant violation.
    pub fn cumulative_regret(&self, optimal_reward: f64) -> f64 {
        let earned: f64 = self.registry.iter().map(|(_, s)| s.total_reward).sum();
        optimal_reward * self.registry.total_pulls() as f64 - earned
    }

    /// Statistics record for reporting and persistence.
    pub fn snapshot(&self) -> BanditSnapshot {
        self.registry.snapshot()
    }

    fn random_arm(&mut self) -> String {
        let n = self.registry.len();
        let idx = self.rng.random_range(0..n);
        self.registry.names()[idx].clone()
    }

    fn leader(&self) -> (&str, f64) {
        let mut best: Option<&str> = None;
        let mut best_average = f64::NEG_INFINITY;
        for (name, stats) in self.registry.iter() {
            if best.is_none() || stats.average_reward > best_average {
                best_average = stats.average_reward;
                best = Some(name);
            }
        }
        // Registry construction rejects empty arm sets.
        (best.unwrap_or_default(), best_average)
    }
}

fn sample_beta(rng: &mut StdRng, alpha: f64, beta: f64) -> f64 {
    match Beta::new(alpha, beta) {
        Ok(dist) => dist.sample(rng),
        Err(_) => 0.5,
    }
}
