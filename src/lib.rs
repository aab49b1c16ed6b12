//! `curator`: seedable bandit selection and preference learning for
//! generative-art personalization.
//!
//! Designed for services that repeatedly choose between a small set of
//! generation arms (model versions, style pipelines, rendering backends) and
//! want to learn what each user likes from the rewards that come back.  You
//! define the reward signal for your domain (explicit rating, like/dislike,
//! dwell time mapped to a score); `curator` tracks per-arm statistics,
//! distills per-user taste, and assembles concrete prompt candidates.
//!
//! An [`Interaction`] is the single input record:
//! - `reward: f64`: caller-defined quality signal.  Positive counts as a win,
//!   negative as a loss, zero as neither.
//! - `style` / `color` / `mood` / `model`: optional labels describing what
//!   was generated.  Absent labels are skipped, never defaulted.
//! - `timestamp`: when it happened (drives time-of-day patterns).
//!
//! **Goals:**
//! - **Deterministic by default**: every stochastic component owns a seedable
//!   RNG; same history + same seed → same output.
//! - **Stateless learning**: profiles and patterns are recomputed from the
//!   history slice each call, never incrementally mutated.
//! - **Small K**: designed for a handful of arms and label vocabularies of
//!   tens of entries, not thousands.
//!
//! **Engines:**
//! - [`Bandit`] over an [`ArmRegistry`]: epsilon-greedy, UCB1, and Thompson
//!   sampling via [`SelectionPolicy`], plus regret accounting and
//!   [`BanditSnapshot`] state export.
//! - [`PreferenceLearner`]: softmax taste profiles ([`PreferenceProfile`]),
//!   candidate scoring, and behavior patterns (peak hour, consistency,
//!   exploration rate).
//! - [`RecommendationEngine`]: prompt candidates from the user's own taste,
//!   uniform exploration, similar users, and trending activity, rendered
//!   through a [`PromptLibrary`].
//!
//! **Non-goals:**
//! - No storage, sessions, or transport; callers own persistence and wiring.
//!   [`BanditSnapshot`] and the serde derives are the serialization boundary.
//! - Not a deep recommender: weights are interpretable softmax scores over
//!   labels, not learned embeddings.

#![forbid(unsafe_code)]

use chrono::{DateTime, Utc};

mod error;
pub use error::*;

mod taxonomy;
pub use taxonomy::*;

mod weights;
pub use weights::*;

mod registry;
pub use registry::*;

mod bandit;
pub use bandit::*;

mod learner;
pub use learner::*;

mod prompts;
pub use prompts::*;

mod recommend;
pub use recommend::*;

/// One observed generation event: what was produced and how it was scored.
///
/// All label fields are optional so callers can log partial metadata; every
/// consumer skips absent labels rather than defaulting them.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Interaction {
    /// Generation arm that produced the piece, if known.
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub model: Option<String>,
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub style: Option<String>,
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub color: Option<String>,
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub mood: Option<String>,
    /// Caller-defined quality signal.  Positive is a win, negative a loss.
    pub reward: f64,
    pub timestamp: DateTime<Utc>,
}

impl Interaction {
    /// A record with no labels attached.
    pub fn new(reward: f64, timestamp: DateTime<Utc>) -> Self {
        Self {
            model: None,
            style: None,
            color: None,
            mood: None,
            reward,
            timestamp,
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn with_style(mut self, style: impl Into<String>) -> Self {
        self.style = Some(style.into());
        self
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    pub fn with_mood(mut self, mood: impl Into<String>) -> Self {
        self.mood = Some(mood.into());
        self
    }

    /// Label recorded under `category`, if any.
    pub fn feature(&self, category: Category) -> Option<&str> {
        match category {
            Category::Styles => self.style.as_deref(),
            Category::Colors => self.color.as_deref(),
            Category::Moods => self.mood.as_deref(),
            Category::Models => self.model.as_deref(),
        }
    }

    /// The label set as a standalone value, dropping reward and timestamp.
    pub fn features(&self) -> Features {
        Features {
            model: self.model.clone(),
            style: self.style.clone(),
            color: self.color.clone(),
            mood: self.mood.clone(),
        }
    }
}

/// A label combination independent of any observed event.
///
/// Used as the candidate side of [`PreferenceLearner::predict`] and as the
/// output of [`PreferenceLearner::suggest_features`].
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Features {
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub model: Option<String>,
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub style: Option<String>,
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub color: Option<String>,
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub mood: Option<String>,
}

impl Features {
    /// Label under `category`, if set.
    pub fn get(&self, category: Category) -> Option<&str> {
        match category {
            Category::Styles => self.style.as_deref(),
            Category::Colors => self.color.as_deref(),
            Category::Moods => self.mood.as_deref(),
            Category::Models => self.model.as_deref(),
        }
    }
}
