//! Property and statistical tests for bandit selection.

use curator::{ArmRegistry, Bandit, SelectionPolicy, DEFAULT_UCB_C};
use proptest::prelude::*;

fn arms(n: usize) -> Vec<String> {
    (0..n).map(|i| format!("arm{i}")).collect()
}

fn bandit(n_arms: usize, seed: u64) -> Bandit {
    Bandit::with_seed(ArmRegistry::new(arms(n_arms)).unwrap(), seed)
}

// ---------------------------------------------------------------------------
// Property tests
// ---------------------------------------------------------------------------

proptest! {
    /// Every select returns a registered arm, and pull counts stay conserved.
    #[test]
    fn selection_stays_in_the_registry(
        n_arms in 1usize..8,
        epsilon in 0.0f64..=1.0,
        rewards in prop::collection::vec(-1.0f64..1.0, 0..60),
        seed in any::<u64>(),
    ) {
        let names = arms(n_arms);
        let mut b = bandit(n_arms, seed);
        for (i, reward) in rewards.iter().enumerate() {
            let chosen = b
                .select(SelectionPolicy::EpsilonGreedy { epsilon })
                .unwrap();
            prop_assert!(names.contains(&chosen), "chosen {} not registered", chosen);
            b.observe(&names[i % n_arms], *reward).unwrap();
        }
        let snapshot = b.snapshot();
        let summed: u64 = snapshot.arms.iter().map(|a| a.pulls).sum();
        prop_assert_eq!(summed, snapshot.total_pulls);
        prop_assert_eq!(snapshot.total_pulls, rewards.len() as u64);
    }

    /// With epsilon 0 the greedy choice ignores the seed entirely.
    #[test]
    fn epsilon_zero_ignores_the_seed(
        n_arms in 1usize..6,
        rewards in prop::collection::vec(-1.0f64..1.0, 1..40),
        seed_a in any::<u64>(),
        seed_b in any::<u64>(),
    ) {
        let names = arms(n_arms);
        let mut ba = bandit(n_arms, seed_a);
        let mut bb = bandit(n_arms, seed_b);
        for (i, reward) in rewards.iter().enumerate() {
            ba.observe(&names[i % n_arms], *reward).unwrap();
            bb.observe(&names[i % n_arms], *reward).unwrap();
            prop_assert_eq!(
                ba.select_epsilon_greedy(0.0).unwrap(),
                bb.select_epsilon_greedy(0.0).unwrap()
            );
        }
    }

    /// UCB never returns a played arm while an unplayed one exists.
    #[test]
    fn ucb_prefers_unplayed_arms(
        n_arms in 2usize..8,
        n_played in 1usize..7,
        reward in -1.0f64..1.0,
        seed in any::<u64>(),
    ) {
        let names = arms(n_arms);
        let mut b = bandit(n_arms, seed);
        let played = n_played.min(n_arms - 1);
        for name in names.iter().take(played) {
            b.observe(name, reward).unwrap();
        }
        let chosen = b.select_ucb(DEFAULT_UCB_C).unwrap();
        // First unplayed arm in registration order.
        prop_assert_eq!(chosen, names[played].clone());
    }

    /// Regret against a true upper bound on rewards is never negative.
    #[test]
    fn regret_against_an_upper_bound_is_nonnegative(
        n_arms in 1usize..6,
        rewards in prop::collection::vec(0.0f64..1.0, 0..50),
        seed in any::<u64>(),
    ) {
        let names = arms(n_arms);
        let mut b = bandit(n_arms, seed);
        for (i, reward) in rewards.iter().enumerate() {
            b.observe(&names[i % n_arms], *reward).unwrap();
        }
        prop_assert!(b.cumulative_regret(1.0) >= 0.0);
    }

    /// Restore rebuilds totals from averages without drifting counters.
    #[test]
    fn restore_preserves_counters(
        n_arms in 1usize..6,
        rewards in prop::collection::vec(-1.0f64..1.0, 0..40),
        seed in any::<u64>(),
    ) {
        let names = arms(n_arms);
        let mut b = bandit(n_arms, seed);
        for (i, reward) in rewards.iter().enumerate() {
            b.observe(&names[i % n_arms], *reward).unwrap();
        }
        let snapshot = b.snapshot();
        let restored = ArmRegistry::restore(&snapshot).unwrap();
        prop_assert_eq!(restored.total_pulls(), snapshot.total_pulls);
        for arm in &snapshot.arms {
            let stats = restored.get(&arm.name).unwrap();
            prop_assert_eq!(stats.pulls, arm.pulls);
            prop_assert_eq!(stats.wins, arm.wins);
            prop_assert_eq!(stats.losses, arm.losses);
            prop_assert!((stats.average_reward - arm.average_reward).abs() < 1e-9);
        }
    }
}

// ---------------------------------------------------------------------------
// Statistical behavior
// ---------------------------------------------------------------------------

/// Thompson sampling must concentrate on an arm with a far better win record.
#[test]
fn thompson_concentrates_on_the_dominant_arm() {
    let registry = ArmRegistry::new(["weak", "strong"]).unwrap();
    let mut b = Bandit::with_seed(registry, 1234);
    for _ in 0..100 {
        b.observe("strong", 1.0).unwrap();
        b.observe("weak", -1.0).unwrap();
    }
    b.observe("strong", -1.0).unwrap();
    b.observe("weak", 1.0).unwrap();

    const DRAWS: usize = 10_000;
    let mut strong = 0usize;
    for _ in 0..DRAWS {
        if b.select_thompson().unwrap() == "strong" {
            strong += 1;
        }
    }
    let rate = strong as f64 / DRAWS as f64;
    assert!(rate > 0.95, "strong picked at rate {rate}");
}

/// A long UCB run concentrates pulls on the better arm while still
/// sampling the weaker one occasionally.
#[test]
fn ucb_concentrates_pulls_on_the_better_arm() {
    let registry = ArmRegistry::new(["low", "high"]).unwrap();
    let mut b = Bandit::with_seed(registry, 99);
    for _ in 0..500 {
        let arm = b.select_ucb(DEFAULT_UCB_C).unwrap();
        let reward = if arm == "high" { 0.9 } else { 0.1 };
        b.observe(&arm, reward).unwrap();
    }

    let snapshot = b.snapshot();
    let pulls = |name: &str| {
        snapshot
            .arms
            .iter()
            .find(|a| a.name == name)
            .map(|a| a.pulls)
            .unwrap_or(0)
    };
    assert!(pulls("high") > 300, "high={} low={}", pulls("high"), pulls("low"));
    assert!(pulls("low") > 0, "the weaker arm is never starved completely");
}

/// Full-explore epsilon spreads pulls roughly uniformly.
#[test]
fn epsilon_one_explores_all_arms() {
    let registry = ArmRegistry::new(["a", "b", "c", "d"]).unwrap();
    let mut b = Bandit::with_seed(registry, 7);
    for _ in 0..400 {
        let arm = b.select_epsilon_greedy(1.0).unwrap();
        b.observe(&arm, 0.5).unwrap();
    }
    let snapshot = b.snapshot();
    for arm in &snapshot.arms {
        assert!(
            arm.pulls > 50,
            "{} pulled only {} times in 400 uniform draws",
            arm.name,
            arm.pulls
        );
    }
}
