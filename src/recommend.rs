//! Recommendation assembly from profiles, peers, and recent activity.
//!
//! [`RecommendationEngine`] turns learned preferences into concrete prompt
//! candidates. Four sources feed it:
//!
//! - exploitation of a user's own [`PreferenceProfile`] top lists,
//! - uniform exploration over the full [`Taxonomy`],
//! - collaborative filtering against peer profiles (cosine similarity),
//! - trending aggregation over recent global interactions.
//!
//! All randomness (template choice, synonym choice, exploration picks) runs
//! on the engine's seedable RNG, so a seeded engine produces reproducible
//! candidate lists.

use std::collections::BTreeMap;

use rand::rngs::StdRng;
use rand::Rng;
use rand::SeedableRng;
use tracing::debug;

use crate::learner::PreferenceProfile;
use crate::prompts::PromptLibrary;
use crate::taxonomy::{Category, Taxonomy};
use crate::weights::{cosine_similarity, top_k};
use crate::Interaction;

/// Share of a request served from learned preferences when exploration is on.
const EXPLOIT_FRACTION: f64 = 0.7;
/// Confidence of the first exploitation item.
const EXPLOIT_BASE_CONFIDENCE: f64 = 0.8;
/// Confidence drop per successive exploitation item (floored at 0).
const EXPLOIT_CONFIDENCE_STEP: f64 = 0.1;
/// Confidence of every exploration item.
const EXPLORE_CONFIDENCE: f64 = 0.5;
/// Confidence of every trending item.
const TRENDING_CONFIDENCE: f64 = 0.7;
/// Peers considered by collaborative filtering.
const SIMILAR_USER_CAP: usize = 3;
/// Taxonomy entries used per category when a profile has no top list yet.
const COLD_START_PICKS: usize = 3;
/// Label cap per category when ranking trending weights.
const TRENDING_TOP: usize = 3;

/// What produced a recommendation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum RecommendationKind {
    /// Exploits the user's own learned preferences.
    Personalized,
    /// Uniform draw from the full taxonomy.
    Exploratory,
    /// Borrowed from a similar user's preferences.
    Collaborative,
    /// Aggregated from recent global activity.
    Trending,
}

/// A single prompt candidate.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Recommendation {
    /// Ready-to-use prompt text.
    pub prompt: String,
    pub style: String,
    pub color: String,
    pub mood: String,
    pub kind: RecommendationKind,
    /// In `[0, 1]`.
    pub confidence: f64,
    /// Peer the suggestion was borrowed from (collaborative only).
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub source_user: Option<String>,
}

/// Seedable recommendation engine.
#[derive(Debug, Clone)]
pub struct RecommendationEngine {
    taxonomy: Taxonomy,
    library: PromptLibrary,
    rng: StdRng,
}

impl RecommendationEngine {
    /// Stock taxonomy and prompt tables, deterministic fixed seed (0).
    pub fn new() -> Self {
        Self::with_seed(0)
    }

    /// Stock taxonomy and prompt tables with an explicit seed.
    pub fn with_seed(seed: u64) -> Self {
        Self::with_parts(Taxonomy::default(), PromptLibrary::default(), seed)
    }

    /// Fully custom construction.
    pub fn with_parts(taxonomy: Taxonomy, library: PromptLibrary, seed: u64) -> Self {
        Self {
            taxonomy,
            library,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// The taxonomy exploration draws from.
    pub fn taxonomy(&self) -> &Taxonomy {
        &self.taxonomy
    }

    /// Mutable access to the prompt tables, for registering vocabulary.
    pub fn library_mut(&mut self) -> &mut PromptLibrary {
        &mut self.library
    }

    /// Generate up to `count` candidates for one user.
    ///
    /// With `explore` set, 70% of `count` (rounded down) exploits the
    /// profile's top lists, cycled by index, and the remainder explores the
    /// full taxonomy at confidence 0.5. Without `explore` the entire request
    /// is exploitation. A profile with an empty top list falls back to the
    /// taxonomy's first entries for that category (cold start).
    pub fn generate(
        &mut self,
        profile: &PreferenceProfile,
        count: usize,
        explore: bool,
    ) -> Vec<Recommendation> {
        if count == 0 {
            return Vec::new();
        }
        let exploit_count = if explore {
            ((count as f64) * EXPLOIT_FRACTION).floor() as usize
        } else {
            count
        };

        let styles = self.exploit_labels(profile, Category::Styles);
        let colors = self.exploit_labels(profile, Category::Colors);
        let moods = self.exploit_labels(profile, Category::Moods);

        let mut out = Vec::with_capacity(count);
        if !(styles.is_empty() || colors.is_empty() || moods.is_empty()) {
            for i in 0..exploit_count {
                let style = &styles[i % styles.len()];
                let color = &colors[i % colors.len()];
                let mood = &moods[i % moods.len()];
                let prompt = self.library.compose(&mut self.rng, style, color, mood);
                out.push(Recommendation {
                    prompt,
                    style: style.clone(),
                    color: color.clone(),
                    mood: mood.clone(),
                    kind: RecommendationKind::Personalized,
                    confidence: (EXPLOIT_BASE_CONFIDENCE - EXPLOIT_CONFIDENCE_STEP * i as f64)
                        .max(0.0),
                    source_user: None,
                });
            }
        }
        if explore {
            while out.len() < count {
                let Some(rec) = self.explore_one() else { break };
                out.push(rec);
            }
        }
        debug!(count, explore, produced = out.len(), "generated candidates");
        out
    }

    /// Recommendations borrowed from the most similar peers.
    ///
    /// Requires `user_id` to be present in `profiles` (otherwise the answer
    /// is empty, not an error). Similarity is cosine over flattened weight
    /// vectors; the top three peers each contribute at most one candidate,
    /// tagged with the similarity as confidence and the peer as provenance.
    pub fn collaborative_filter(
        &mut self,
        user_id: &str,
        profiles: &BTreeMap<String, PreferenceProfile>,
        count: usize,
    ) -> Vec<Recommendation> {
        let Some(target) = profiles.get(user_id) else {
            return Vec::new();
        };
        let target_vec = target.flattened();

        let mut peers: Vec<(String, f64)> = Vec::new();
        for (peer_id, peer_profile) in profiles {
            if peer_id == user_id {
                continue;
            }
            let similarity = cosine_similarity(&target_vec, &peer_profile.flattened());
            peers.push((peer_id.clone(), similarity));
        }
        peers.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        peers.truncate(SIMILAR_USER_CAP);

        let mut out = Vec::new();
        for (peer_id, similarity) in peers {
            if out.len() >= count {
                break;
            }
            let Some(peer) = profiles.get(&peer_id) else {
                continue;
            };
            let Some((style, _)) = peer.top_styles.first() else {
                continue;
            };
            let style = style.clone();
            let Some(color) = self.random_label(Category::Colors) else {
                break;
            };
            let Some(mood) = self.random_label(Category::Moods) else {
                break;
            };
            let prompt = self.library.compose(&mut self.rng, &style, &color, &mood);
            out.push(Recommendation {
                prompt,
                style,
                color,
                mood,
                kind: RecommendationKind::Collaborative,
                confidence: similarity,
                source_user: Some(peer_id),
            });
        }
        debug!(user = user_id, produced = out.len(), "collaborative candidates");
        out
    }

    /// Recommendations from what recently performed well globally.
    ///
    /// `recent` is ordered most-recent-first; entry at rank `r` carries
    /// weight `1 / (r + 1)`. The heaviest styles (capped at three) drive the
    /// output; color and mood slots past their own top lists are filled with
    /// random taxonomy labels. Confidence is a fixed 0.7.
    pub fn trending(&mut self, recent: &[Interaction], count: usize) -> Vec<Recommendation> {
        if recent.is_empty() || count == 0 {
            return Vec::new();
        }
        let mut style_weights: BTreeMap<String, f64> = BTreeMap::new();
        let mut color_weights: BTreeMap<String, f64> = BTreeMap::new();
        let mut mood_weights: BTreeMap<String, f64> = BTreeMap::new();
        for (rank, record) in recent.iter().enumerate() {
            let weight = 1.0 / (rank as f64 + 1.0);
            if let Some(style) = record.style.as_deref() {
                *style_weights.entry(style.to_string()).or_insert(0.0) += weight;
            }
            if let Some(color) = record.color.as_deref() {
                *color_weights.entry(color.to_string()).or_insert(0.0) += weight;
            }
            if let Some(mood) = record.mood.as_deref() {
                *mood_weights.entry(mood.to_string()).or_insert(0.0) += weight;
            }
        }
        let top_styles = top_k(&style_weights, TRENDING_TOP);
        let top_colors = top_k(&color_weights, TRENDING_TOP);
        let top_moods = top_k(&mood_weights, TRENDING_TOP);

        let mut out = Vec::new();
        for i in 0..count.min(top_styles.len()) {
            let style = top_styles[i].0.clone();
            let color = match top_colors.get(i) {
                Some((label, _)) => Some(label.clone()),
                None => self.random_label(Category::Colors),
            };
            let mood = match top_moods.get(i) {
                Some((label, _)) => Some(label.clone()),
                None => self.random_label(Category::Moods),
            };
            let (Some(color), Some(mood)) = (color, mood) else {
                continue;
            };
            let prompt = self.library.compose(&mut self.rng, &style, &color, &mood);
            out.push(Recommendation {
                prompt,
                style,
                color,
                mood,
                kind: RecommendationKind::Trending,
                confidence: TRENDING_CONFIDENCE,
                source_user: None,
            });
        }
        debug!(
            window = recent.len(),
            produced = out.len(),
            "trending candidates"
        );
        out
    }

    fn exploit_labels(&self, profile: &PreferenceProfile, category: Category) -> Vec<String> {
        let tops = profile.top(category);
        if tops.is_empty() {
            self.taxonomy
                .labels(category)
                .iter()
                .take(COLD_START_PICKS)
                .cloned()
                .collect()
        } else {
            tops.iter().map(|(label, _)| label.clone()).collect()
        }
    }

    fn explore_one(&mut self) -> Option<Recommendation> {
        let style = self.random_label(Category::Styles)?;
        let color = self.random_label(Category::Colors)?;
        let mood = self.random_label(Category::Moods)?;
        let prompt = self.library.compose(&mut self.rng, &style, &color, &mood);
        Some(Recommendation {
            prompt,
            style,
            color,
            mood,
            kind: RecommendationKind::Exploratory,
            confidence: EXPLORE_CONFIDENCE,
            source_user: None,
        })
    }

    fn random_label(&mut self, category: Category) -> Option<String> {
        let labels = self.taxonomy.labels(category);
        if labels.is_empty() {
            return None;
        }
        let idx = self.rng.random_range(0..labels.len());
        Some(labels[idx].clone())
    }
}

impl Default for RecommendationEngine {
    fn default() -> Self {
        Self::new()
    }
}
