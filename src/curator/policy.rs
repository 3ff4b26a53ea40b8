//! Fixed curator policy tables
//!
//! Every scoring constant lives here so tests assert against the same
//! tables the implementation uses: tier boundaries and multipliers, vote
//! milestones and their base points, daily vote quotas, and the weekly
//! reward bands.

use serde::{Deserialize, Serialize};

/// Curator tier, determined by how early an agent voted on a project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    /// Votes 1-10
    Pioneer,
    /// Votes 11-50
    Early,
    /// Votes 51-100
    Adopter,
    /// Votes 101+
    Standard,
}

impl Tier {
    /// Classify a 1-based vote position into a tier.
    pub fn for_position(position: i64) -> Self {
        if position <= 10 {
            Tier::Pioneer
        } else if position <= 50 {
            Tier::Early
        } else if position <= 100 {
            Tier::Adopter
        } else {
            Tier::Standard
        }
    }

    /// Milestone point multiplier for this tier.
    pub fn multiplier(&self) -> f64 {
        match self {
            Tier::Pioneer => 3.0,
            Tier::Early => 2.0,
            Tier::Adopter => 1.5,
            Tier::Standard => 1.0,
        }
    }

    /// Stable name used in the database and API payloads.
    pub fn as_str(&self) -> &'static str {
        match self {
            Tier::Pioneer => "pioneer",
            Tier::Early => "early",
            Tier::Adopter => "adopter",
            Tier::Standard => "standard",
        }
    }

    /// Parse a stored tier name. Unknown values fall back to `Standard`
    /// (multiplier 1) rather than failing a milestone payout.
    pub fn parse(s: &str) -> Self {
        match s {
            "pioneer" => Tier::Pioneer,
            "early" => Tier::Early,
            "adopter" => Tier::Adopter,
            _ => Tier::Standard,
        }
    }
}

/// Vote-count milestones, ascending. Processing stops at the first
/// threshold a project has not reached yet.
pub const MILESTONES: [i64; 5] = [50, 100, 250, 500, 1000];

/// Base points awarded to every curator when a project crosses a milestone,
/// before tier scaling.
pub fn milestone_base_points(milestone: i64) -> i64 {
    match milestone {
        50 => 10,
        100 => 25,
        250 => 50,
        500 => 100,
        1000 => 200,
        _ => 0,
    }
}

/// Points one curator earns for one milestone crossing: base points scaled
/// by tier multiplier, floored.
pub fn milestone_points(milestone: i64, tier: Tier) -> i64 {
    (milestone_base_points(milestone) as f64 * tier.multiplier()).floor() as i64
}

/// Daily vote quota for a given karma level.
pub fn daily_vote_limit(karma: i64) -> i64 {
    if karma >= 1000 {
        15
    } else if karma >= 500 {
        10
    } else if karma >= 100 {
        7
    } else {
        5
    }
}

/// Weekly MOLTH reward for a leaderboard rank (1-based).
pub fn molth_reward(rank: usize) -> i64 {
    match rank {
        1 => 1000,
        2 => 750,
        3 => 500,
        4..=5 => 300,
        6..=10 => 150,
        11..=25 => 75,
        26..=50 => 25,
        _ => 0,
    }
}
