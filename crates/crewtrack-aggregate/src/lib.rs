//! Crewtrack Aggregate - derived progress summaries
//!
//! Pure computations over domain values: per-project completion, a
//! per-member breakdown of the team's progress, and the dashboard roll-up
//! across every visible project. Nothing here holds state; every summary
//! is re-derived from the store's current snapshot after each update.
//!
//! One rounding rule everywhere: `round(completed / total * 100)`, and 0
//! whenever the total is 0. The result is always in `[0, 100]`.

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod dashboard;
pub mod progress;

pub use dashboard::{dashboard, DashboardStats};
pub use progress::{
    member_progress, project_progress, team_breakdown, MemberProgress, ProjectProgress,
    TeamBreakdown,
};

/// Completion percentage with round-half-up, 0 for an empty total
///
/// Integer arithmetic only, so the result is exact and always in
/// `[0, 100]` for `completed <= total`.
#[inline]
#[must_use]
pub fn percentage(completed: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    let rounded = (200 * completed + total) / (2 * total);
    u8::try_from(rounded).unwrap_or(100)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn empty_total_is_zero() {
        assert_eq!(percentage(0, 0), 0);
    }

    #[test]
    fn rounds_half_up() {
        assert_eq!(percentage(1, 2), 50);
        assert_eq!(percentage(1, 3), 33);
        assert_eq!(percentage(2, 3), 67);
        assert_eq!(percentage(1, 8), 13); // 12.5 rounds up
        assert_eq!(percentage(3, 3), 100);
    }

    proptest! {
        #[test]
        fn always_in_range(total in 0usize..10_000, completed_frac in 0.0f64..=1.0) {
            #[allow(clippy::cast_sign_loss, clippy::cast_possible_truncation, clippy::cast_precision_loss)]
            let completed = ((total as f64) * completed_frac) as usize;
            let pct = percentage(completed, total);
            prop_assert!(pct <= 100);
            if total == 0 {
                prop_assert_eq!(pct, 0);
            }
        }
    }
}
