//! Property tests for preference learning and recommendation shaping.

use std::collections::BTreeMap;

use chrono::{TimeZone, Utc};
use curator::{
    Category, Features, Interaction, PatternReport, PreferenceLearner, RecommendationEngine,
    RecommendationKind,
};
use proptest::prelude::*;

const STYLES: [&str; 4] = ["abstract", "surreal", "baroque", "minimalist"];
const COLORS: [&str; 3] = ["vibrant", "muted", "neon"];
const MOODS: [&str; 3] = ["peaceful", "dramatic", "playful"];

fn interactions() -> impl Strategy<Value = Interaction> {
    (
        prop::option::of(prop::sample::select(&STYLES[..])),
        prop::option::of(prop::sample::select(&COLORS[..])),
        prop::option::of(prop::sample::select(&MOODS[..])),
        -1.0f64..1.0,
        0u32..24,
        1u32..28,
    )
        .prop_map(|(style, color, mood, reward, hour, day)| {
            let ts = Utc.with_ymd_and_hms(2024, 3, day, hour, 0, 0).unwrap();
            let mut record = Interaction::new(reward, ts);
            if let Some(style) = style {
                record = record.with_style(style);
            }
            if let Some(color) = color {
                record = record.with_color(color);
            }
            if let Some(mood) = mood {
                record = record.with_mood(mood);
            }
            record
        })
}

// ---------------------------------------------------------------------------
// Property tests
// ---------------------------------------------------------------------------

proptest! {
    /// Non-empty category weights always form a distribution.
    #[test]
    fn learned_weights_sum_to_one(history in prop::collection::vec(interactions(), 0..40)) {
        let learner = PreferenceLearner::new();
        let profile = learner.learn(&history);
        prop_assert_eq!(profile.total_interactions, history.len() as u64);
        for category in Category::ALL {
            let weights = profile.weights(category);
            if weights.is_empty() {
                continue;
            }
            let total: f64 = weights.values().sum();
            prop_assert!((total - 1.0).abs() < 1e-9, "{:?} sums to {}", category, total);
            for weight in weights.values() {
                prop_assert!(*weight >= 0.0);
            }
        }
    }

    /// Top lists are weight-sorted and capped.
    #[test]
    fn top_lists_are_sorted_and_capped(history in prop::collection::vec(interactions(), 0..40)) {
        let learner = PreferenceLearner::new();
        let profile = learner.learn(&history);
        for (tops, cap) in [
            (&profile.top_styles, 3usize),
            (&profile.top_colors, 3),
            (&profile.top_moods, 3),
            (&profile.preferred_model, 1),
        ] {
            prop_assert!(tops.len() <= cap);
            for pair in tops.windows(2) {
                prop_assert!(pair[0].1 >= pair[1].1);
            }
        }
    }

    /// Compatibility scores stay inside the unit interval.
    #[test]
    fn predict_is_bounded(
        history in prop::collection::vec(interactions(), 0..40),
        style in prop::option::of(prop::sample::select(&STYLES[..])),
        color in prop::option::of(prop::sample::select(&COLORS[..])),
        mood in prop::option::of(prop::sample::select(&MOODS[..])),
    ) {
        let learner = PreferenceLearner::new();
        let profile = learner.learn(&history);
        let candidate = Features {
            model: None,
            style: style.map(|s| s.to_string()),
            color: color.map(|s| s.to_string()),
            mood: mood.map(|s| s.to_string()),
        };
        let score = learner.predict(&profile, &candidate);
        prop_assert!((0.0..=1.0).contains(&score), "score={}", score);
    }

    /// Pattern detection gates exactly on the history floor.
    #[test]
    fn pattern_gate_matches_history_length(history in prop::collection::vec(interactions(), 0..12)) {
        let learner = PreferenceLearner::new();
        match learner.identify_patterns(&history) {
            PatternReport::InsufficientHistory { observed, required } => {
                prop_assert_eq!(required, 5);
                prop_assert_eq!(observed, history.len());
                prop_assert!(history.len() < 5);
            }
            PatternReport::Patterns(patterns) => {
                prop_assert!(history.len() >= 5);
                prop_assert!(patterns.best_hour < 24);
                prop_assert!((0.0..=1.0).contains(&patterns.exploration_rate));
                if let Some(consistency) = patterns.consistency {
                    prop_assert!((0.0..=1.0).contains(&consistency));
                }
            }
        }
    }

    /// Candidate lists hit the requested count and label the blend.
    #[test]
    fn generate_respects_count(
        history in prop::collection::vec(interactions(), 0..30),
        count in 0usize..12,
        explore in any::<bool>(),
        seed in any::<u64>(),
    ) {
        let learner = PreferenceLearner::new();
        let profile = learner.learn(&history);
        let mut engine = RecommendationEngine::with_seed(seed);
        let recs = engine.generate(&profile, count, explore);
        prop_assert_eq!(recs.len(), count);
        for rec in &recs {
            prop_assert!((0.0..=1.0).contains(&rec.confidence));
            prop_assert!(!rec.style.is_empty());
            prop_assert!(!rec.prompt.is_empty());
        }
        if explore {
            let exploratory = recs
                .iter()
                .filter(|r| r.kind == RecommendationKind::Exploratory)
                .count();
            prop_assert_eq!(exploratory, count - (count as f64 * 0.7).floor() as usize);
        }
    }

    /// Trending output is capped by the request, the ranking depth, and the
    /// style variety actually present in the window.
    #[test]
    fn trending_is_capped(
        history in prop::collection::vec(interactions(), 0..30),
        count in 0usize..10,
        seed in any::<u64>(),
    ) {
        let mut engine = RecommendationEngine::with_seed(seed);
        let recs = engine.trending(&history, count);
        let distinct: std::collections::BTreeSet<&str> =
            history.iter().filter_map(|r| r.style.as_deref()).collect();
        prop_assert!(recs.len() <= count.min(3));
        prop_assert!(recs.len() <= distinct.len());
    }

    /// Collaborative candidates never cite the target, cap at three peers,
    /// and keep confidence in bounds even against an identical peer.
    #[test]
    fn collaborative_caps_and_provenance(
        histories in prop::collection::vec(prop::collection::vec(interactions(), 0..15), 0..6),
        count in 0usize..8,
        seed in any::<u64>(),
    ) {
        let learner = PreferenceLearner::new();
        let mut profiles = BTreeMap::new();
        for (i, history) in histories.iter().enumerate() {
            profiles.insert(format!("user{i}"), learner.learn(history));
        }
        // The target mirrors the first peer when one exists, so perfect
        // similarity is part of the explored space.
        let target = profiles.values().next().cloned().unwrap_or_default();
        profiles.insert("target".to_string(), target);

        let mut engine = RecommendationEngine::with_seed(seed);
        let recs = engine.collaborative_filter("target", &profiles, count);
        prop_assert!(recs.len() <= count.min(3));
        for rec in &recs {
            prop_assert!(rec.source_user.is_some());
            prop_assert_ne!(rec.source_user.as_deref(), Some("target"));
            prop_assert!((0.0..=1.0).contains(&rec.confidence));
        }
    }
}
