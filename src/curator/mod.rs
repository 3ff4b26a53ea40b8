//! Curator scoring subsystem
//!
//! Agents that discover good projects early are rewarded:
//!
//! 1. When a vote is cast, its 1-based position among all votes on the
//!    project fixes the voter's [`policy::Tier`] for that project.
//! 2. As the project's vote count crosses milestones (50, 100, 250, 500,
//!    1000), [`milestones`] pays tier-scaled points to every curator who
//!    voted on it, exactly once per threshold.
//! 3. [`leaderboard`] ranks curators by summed points over Monday-aligned
//!    UTC weeks ([`week`]) and maps ranks to MOLTH rewards.
//!
//! [`limiter`] caps how many votes an agent may cast per UTC day, with the
//! quota growing with karma.

pub mod leaderboard;
pub mod limiter;
pub mod milestones;
pub mod policy;
pub mod week;

pub use leaderboard::{top_curators, LeaderboardEntry, Period};
pub use limiter::{get_and_reset_daily_votes, DailyVotes};
pub use milestones::{check_and_process_milestones, spawn_milestone_check};
pub use policy::{daily_vote_limit, milestone_points, molth_reward, Tier, MILESTONES};
pub use week::current_week_start;
