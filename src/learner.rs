//! Preference learning from interaction history.
//!
//! [`PreferenceLearner::learn`] folds a user's labeled feedback into
//! per-category reward totals and softmax-normalizes them into a
//! [`PreferenceProfile`]. Learning is stateless: every call builds a fresh
//! profile from the full history, so there is no drift between incremental
//! and batch paths. [`PreferenceLearner::identify_patterns`] adds advisory
//! behavioral signals (temporal bias, consistency, exploration rate) once
//! enough history exists.

use std::collections::BTreeMap;

use chrono::Timelike;
use tracing::debug;

use crate::taxonomy::{Category, Taxonomy};
use crate::weights::{softmax_map, top_k};
use crate::{Features, Interaction};

/// Top-list length for styles, colors, and moods.
const TOP_FEATURES: usize = 3;
/// Top-list length for the preferred model.
const TOP_MODELS: usize = 1;
/// Minimum history length before pattern detection reports anything.
const MIN_PATTERN_RECORDS: usize = 5;
/// Compatibility score when profile and candidate share no category.
const NEUTRAL_SCORE: f64 = 0.5;

/// Normalized taste profile for one user.
///
/// Each category maps label to a softmax weight; weights in a non-empty
/// category sum to 1, and a category never seen in the history stays empty.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PreferenceProfile {
    pub styles: BTreeMap<String, f64>,
    pub colors: BTreeMap<String, f64>,
    pub moods: BTreeMap<String, f64>,
    pub models: BTreeMap<String, f64>,
    /// Heaviest styles, weight-descending (up to 3).
    pub top_styles: Vec<(String, f64)>,
    /// Heaviest colors, weight-descending (up to 3).
    pub top_colors: Vec<(String, f64)>,
    /// Heaviest moods, weight-descending (up to 3).
    pub top_moods: Vec<(String, f64)>,
    /// Heaviest model (at most one entry).
    pub preferred_model: Vec<(String, f64)>,
    /// Records the profile was learned from.
    pub total_interactions: u64,
}

impl PreferenceProfile {
    /// Weight map for `category`.
    pub fn weights(&self, category: Category) -> &BTreeMap<String, f64> {
        match category {
            Category::Styles => &self.styles,
            Category::Colors => &self.colors,
            Category::Moods => &self.moods,
            Category::Models => &self.models,
        }
    }

    /// Top list for `category`.
    pub fn top(&self, category: Category) -> &[(String, f64)] {
        match category {
            Category::Styles => &self.top_styles,
            Category::Colors => &self.top_colors,
            Category::Moods => &self.top_moods,
            Category::Models => &self.preferred_model,
        }
    }

    /// Sparse weight vector across all categories, keys namespaced as
    /// `"<category>:<label>"`. Used for profile-to-profile similarity.
    pub fn flattened(&self) -> BTreeMap<String, f64> {
        let mut out = BTreeMap::new();
        for category in Category::ALL {
            for (label, &weight) in self.weights(category) {
                out.insert(format!("{}:{}", category.key(), label), weight);
            }
        }
        out
    }
}

/// Advisory behavioral patterns, or the reason none are available yet.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PatternReport {
    /// Fewer than `required` records observed; detection is skipped, not failed.
    InsufficientHistory { observed: usize, required: usize },
    Patterns(BehaviorPatterns),
}

/// Patterns extracted from a sufficiently long history.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BehaviorPatterns {
    /// Hour of day (0-23) with the highest mean reward; lowest hour wins ties.
    pub best_hour: u32,
    /// `max(0, 1 - mean per-style reward variance)` over styles observed at
    /// least twice, or `None` when no style repeats.
    pub consistency: Option<f64>,
    /// Distinct styles tried divided by the taxonomy's style count.
    pub exploration_rate: f64,
}

/// Stateless preference learner over a fixed taxonomy.
#[derive(Debug, Clone)]
pub struct PreferenceLearner {
    taxonomy: Taxonomy,
}

impl PreferenceLearner {
    /// Learner over the stock taxonomy.
    pub fn new() -> Self {
        Self::with_taxonomy(Taxonomy::default())
    }

    /// Learner over a caller-supplied taxonomy.
    pub fn with_taxonomy(taxonomy: Taxonomy) -> Self {
        Self { taxonomy }
    }

    /// The taxonomy exploration rates are measured against.
    pub fn taxonomy(&self) -> &Taxonomy {
        &self.taxonomy
    }

    /// Build a profile from `history`.
    ///
    /// An empty history returns the canonical default profile (all categories
    /// empty, zero interactions) rather than failing: cold start is a normal
    /// state, not an error.
    pub fn learn(&self, history: &[Interaction]) -> PreferenceProfile {
        let mut profile = PreferenceProfile {
            total_interactions: history.len() as u64,
            ..PreferenceProfile::default()
        };
        if history.is_empty() {
            return profile;
        }
        for category in Category::ALL {
            let mut totals: BTreeMap<String, f64> = BTreeMap::new();
            for record in history {
                if let Some(label) = record.feature(category) {
                    *totals.entry(label.to_string()).or_insert(0.0) += record.reward;
                }
            }
            let weights = softmax_map(&totals);
            match category {
                Category::Styles => {
                    profile.top_styles = top_k(&weights, TOP_FEATURES);
                    profile.styles = weights;
                }
                Category::Colors => {
                    profile.top_colors = top_k(&weights, TOP_FEATURES);
                    profile.colors = weights;
                }
                Category::Moods => {
                    profile.top_moods = top_k(&weights, TOP_FEATURES);
                    profile.moods = weights;
                }
                Category::Models => {
                    profile.preferred_model = top_k(&weights, TOP_MODELS);
                    profile.models = weights;
                }
            }
        }
        debug!(
            interactions = history.len(),
            styles = profile.styles.len(),
            "learned preference profile"
        );
        profile
    }

    /// Score how well `candidate` matches `profile`, in `[0, 1]`.
    ///
    /// Averages the candidate label's weight over the categories present on
    /// both sides; a label the profile has never seen contributes 0. With no
    /// comparable category at all the answer is the neutral 0.5.
    pub fn predict(&self, profile: &PreferenceProfile, candidate: &Features) -> f64 {
        let mut score = 0.0;
        let mut compared = 0u32;
        for category in Category::ALL {
            let weights = profile.weights(category);
            if weights.is_empty() {
                continue;
            }
            let Some(label) = candidate.get(category) else {
                continue;
            };
            score += weights.get(label).copied().unwrap_or(0.0);
            compared += 1;
        }
        if compared == 0 {
            return NEUTRAL_SCORE;
        }
        score / compared as f64
    }

    /// Extract behavioral patterns from `history`.
    ///
    /// Below five records this returns
    /// [`PatternReport::InsufficientHistory`]; patterns are advisory, so thin
    /// history is a placeholder, not an error.
    pub fn identify_patterns(&self, history: &[Interaction]) -> PatternReport {
        if history.len() < MIN_PATTERN_RECORDS {
            return PatternReport::InsufficientHistory {
                observed: history.len(),
                required: MIN_PATTERN_RECORDS,
            };
        }

        // Mean reward per hour of day; ascending iteration plus a strict
        // comparison makes the lowest hour win ties.
        let mut hourly: BTreeMap<u32, (f64, u64)> = BTreeMap::new();
        for record in history {
            let entry = hourly.entry(record.timestamp.hour()).or_insert((0.0, 0));
            entry.0 += record.reward;
            entry.1 += 1;
        }
        let mut best_hour = 0;
        let mut best_mean = f64::NEG_INFINITY;
        for (&hour, &(sum, n)) in &hourly {
            let mean = sum / n as f64;
            if mean > best_mean {
                best_mean = mean;
                best_hour = hour;
            }
        }

        // Population variance of rewards per style, for styles seen twice or more.
        let mut by_style: BTreeMap<&str, Vec<f64>> = BTreeMap::new();
        for record in history {
            if let Some(style) = record.style.as_deref() {
                by_style.entry(style).or_default().push(record.reward);
            }
        }
        let mut variances: Vec<f64> = Vec::new();
        for rewards in by_style.values() {
            if rewards.len() < 2 {
                continue;
            }
            let mean = rewards.iter().sum::<f64>() / rewards.len() as f64;
            let variance =
                rewards.iter().map(|r| (r - mean).powi(2)).sum::<f64>() / rewards.len() as f64;
            variances.push(variance);
        }
        let consistency = if variances.is_empty() {
            None
        } else {
            let mean_variance = variances.iter().sum::<f64>() / variances.len() as f64;
            Some((1.0 - mean_variance).max(0.0))
        };

        let style_count = self.taxonomy.styles.len();
        let exploration_rate = if style_count == 0 {
            0.0
        } else {
            by_style.len() as f64 / style_count as f64
        };

        PatternReport::Patterns(BehaviorPatterns {
            best_hour,
            consistency,
            exploration_rate,
        })
    }

    /// Suggest up to `count` untried feature combinations from the profile's
    /// top lists, index-aligned (the i-th suggestion pairs the i-th top
    /// style, color, and mood; shorter lists leave their slot unset).
    pub fn suggest_features(&self, profile: &PreferenceProfile, count: usize) -> Vec<Features> {
        let mut out = Vec::new();
        for i in 0..count.min(profile.top_styles.len()) {
            out.push(Features {
                model: None,
                style: Some(profile.top_styles[i].0.clone()),
                color: profile.top_colors.get(i).map(|(label, _)| label.clone()),
                mood: profile.top_moods.get(i).map(|(label, _)| label.clone()),
            });
        }
        out
    }
}

impl Default for PreferenceLearner {
    fn default() -> Self {
        Self::new()
    }
}
