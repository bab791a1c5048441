//! Click resolution: turning a zone into a score decision.
//!
//! The resolver is pure. Applying the decision (score update, forced
//! regeneration) is the session's job.

use tapgrid_types::{CellKind, DangerPolicy};

use crate::config::ScoringConfig;

/// What a click should do to the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoreDecision {
    /// Score change reported to the client.
    pub delta: i64,
    /// Whether `delta` is added to the authoritative score.
    pub applied: bool,
    /// Whether the grid must be regenerated immediately.
    pub regenerate: bool,
}

impl ScoreDecision {
    /// A click that changes nothing.
    pub const NONE: Self = Self {
        delta: 0,
        applied: false,
        regenerate: false,
    };
}

/// Fixed reward/penalty table for clicks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClickResolver {
    target_reward: i64,
    danger_penalty: i64,
    danger_policy: DangerPolicy,
}

impl ClickResolver {
    /// Build a resolver from scoring configuration.
    pub const fn new(config: &ScoringConfig) -> Self {
        Self {
            target_reward: config.target_reward,
            danger_penalty: config.danger_penalty,
            danger_policy: config.danger_policy,
        }
    }

    /// Decide the effect of a click that landed in `kind`.
    pub const fn resolve(&self, kind: CellKind) -> ScoreDecision {
        match kind {
            CellKind::Target => ScoreDecision {
                delta: self.target_reward,
                applied: true,
                regenerate: true,
            },
            CellKind::Danger => match self.danger_policy {
                DangerPolicy::Authoritative => ScoreDecision {
                    delta: self.danger_penalty.saturating_neg(),
                    applied: true,
                    regenerate: true,
                },
                DangerPolicy::Cosmetic => ScoreDecision {
                    delta: self.danger_penalty.saturating_neg(),
                    applied: false,
                    regenerate: false,
                },
            },
            CellKind::Empty => ScoreDecision::NONE,
        }
    }
}

impl Default for ClickResolver {
    fn default() -> Self {
        Self::new(&ScoringConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cosmetic() -> ClickResolver {
        ClickResolver::new(&ScoringConfig {
            danger_policy: DangerPolicy::Cosmetic,
            ..ScoringConfig::default()
        })
    }

    #[test]
    fn target_rewards_and_regenerates() {
        let decision = ClickResolver::default().resolve(CellKind::Target);
        assert_eq!(decision.delta, 10);
        assert!(decision.applied);
        assert!(decision.regenerate);
    }

    #[test]
    fn authoritative_danger_penalizes_and_regenerates() {
        let decision = ClickResolver::default().resolve(CellKind::Danger);
        assert_eq!(decision.delta, -10);
        assert!(decision.applied);
        assert!(decision.regenerate);
    }

    #[test]
    fn cosmetic_danger_is_advisory_only() {
        let decision = cosmetic().resolve(CellKind::Danger);
        assert_eq!(decision.delta, -10);
        assert!(!decision.applied);
        assert!(!decision.regenerate);
    }

    #[test]
    fn empty_zone_does_nothing() {
        assert_eq!(ClickResolver::default().resolve(CellKind::Empty), ScoreDecision::NONE);
        assert_eq!(cosmetic().resolve(CellKind::Empty), ScoreDecision::NONE);
    }

    #[test]
    fn custom_amounts() {
        let resolver = ClickResolver::new(&ScoringConfig {
            target_reward: 3,
            danger_penalty: 7,
            danger_policy: DangerPolicy::Authoritative,
        });
        assert_eq!(resolver.resolve(CellKind::Target).delta, 3);
        assert_eq!(resolver.resolve(CellKind::Danger).delta, -7);
    }
}
