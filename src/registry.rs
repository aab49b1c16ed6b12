//! Per-arm reward accounting.
//!
//! [`ArmRegistry`] owns the lifetime counters for a fixed set of named arms.
//! It is the single piece of mutable state in the crate: selection policies
//! read it, and only [`ArmRegistry::observe`] writes it. Arms are iterated in
//! registration order, which is also the tie-break order for every
//! deterministic selection path.
//!
//! Notes:
//! - A reward of exactly `0.0` counts as neither a win nor a loss, so
//!   `wins + losses <= pulls`.
//! - [`BanditSnapshot`] is the persistence record. `restore` rebuilds
//!   cumulative reward as `average_reward * pulls`; a tiny float drift
//!   against the original sum is expected and tolerated.

use std::collections::BTreeMap;

use tracing::debug;

use crate::error::{Error, Result};

/// Lifetime counters for one arm.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ArmStats {
    /// Times this arm has been observed.
    pub pulls: u64,
    /// Observations with reward > 0.
    pub wins: u64,
    /// Observations with reward < 0.
    pub losses: u64,
    /// Sum of observed rewards.
    pub total_reward: f64,
    /// `total_reward / pulls`, or 0 when unpulled.
    pub average_reward: f64,
}

/// Point-in-time record of one arm, as persisted.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ArmSnapshot {
    pub name: String,
    pub pulls: u64,
    pub wins: u64,
    pub losses: u64,
    pub average_reward: f64,
}

/// Persistable record of a whole registry (arms in registration order).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BanditSnapshot {
    pub total_pulls: u64,
    pub arms: Vec<ArmSnapshot>,
}

/// Registration-ordered set of arms with their counters.
#[derive(Debug, Clone)]
pub struct ArmRegistry {
    names: Vec<String>,
    stats: BTreeMap<String, ArmStats>,
    total_pulls: u64,
}

impl ArmRegistry {
    /// Build a registry from unique arm names.
    ///
    /// Fails with [`Error::NoArms`] on an empty list and
    /// [`Error::DuplicateArm`] on a repeated name.
    pub fn new<I, S>(names: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut ordered: Vec<String> = Vec::new();
        let mut stats: BTreeMap<String, ArmStats> = BTreeMap::new();
        for name in names {
            let name = name.into();
            if stats.insert(name.clone(), ArmStats::default()).is_some() {
                return Err(Error::DuplicateArm(name));
            }
            ordered.push(name);
        }
        if ordered.is_empty() {
            return Err(Error::NoArms);
        }
        Ok(Self {
            names: ordered,
            stats,
            total_pulls: 0,
        })
    }

    /// Record an observed reward for `arm`.
    ///
    /// This is the only mutation point: increments pulls, accumulates the
    /// reward, counts a win (reward > 0) or loss (reward < 0), and recomputes
    /// the running average.
    pub fn observe(&mut self, arm: &str, reward: f64) -> Result<()> {
        let Some(stats) = self.stats.get_mut(arm) else {
            return Err(Error::UnknownArm(arm.to_string()));
        };
        stats.pulls += 1;
        stats.total_reward += reward;
        if reward > 0.0 {
            stats.wins += 1;
        } else if reward < 0.0 {
            stats.losses += 1;
        }
        stats.average_reward = stats.total_reward / stats.pulls as f64;
        self.total_pulls += 1;
        debug!(
            arm,
            reward,
            pulls = stats.pulls,
            average = stats.average_reward,
            "observed reward"
        );
        Ok(())
    }

    /// Counters for `arm`, if registered.
    pub fn get(&self, arm: &str) -> Option<&ArmStats> {
        self.stats.get(arm)
    }

    /// Arm names in registration order.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Number of arms.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Always false for a constructed registry; present for completeness.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Total observations across all arms.
    pub fn total_pulls(&self) -> u64 {
        self.total_pulls
    }

    /// Iterate `(name, stats)` in registration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ArmStats)> + '_ {
        self.names
            .iter()
            .filter_map(|name| self.stats.get(name).map(|stats| (name.as_str(), stats)))
    }

    /// Immutable statistics record, suitable for reporting and persistence.
    pub fn snapshot(&self) -> BanditSnapshot {
        BanditSnapshot {
            total_pulls: self.total_pulls,
            arms: self
                .iter()
                .map(|(name, stats)| ArmSnapshot {
                    name: name.to_string(),
                    pulls: stats.pulls,
                    wins: stats.wins,
                    losses: stats.losses,
                    average_reward: stats.average_reward,
                })
                .collect(),
        }
    }

    /// Rebuild a registry from a snapshot.
    ///
    /// Cumulative reward is reconstructed as `average_reward * pulls`.
    pub fn restore(snapshot: &BanditSnapshot) -> Result<Self> {
        let mut ordered: Vec<String> = Vec::with_capacity(snapshot.arms.len());
        let mut stats: BTreeMap<String, ArmStats> = BTreeMap::new();
        for arm in &snapshot.arms {
            let average_reward = if arm.pulls == 0 { 0.0 } else { arm.average_reward };
            let restored = ArmStats {
                pulls: arm.pulls,
                wins: arm.wins,
                losses: arm.losses,
                total_reward: average_reward * arm.pulls as f64,
                average_reward,
            };
            if stats.insert(arm.name.clone(), restored).is_some() {
                return Err(Error::DuplicateArm(arm.name.clone()));
            }
            ordered.push(arm.name.clone());
        }
        if ordered.is_empty() {
            return Err(Error::NoArms);
        }
        Ok(Self {
            names: ordered,
            stats,
            total_pulls: snapshot.total_pulls,
        })
    }
}
