//! Captain and vice-captain selection

use crate::config::CaptaincyConfig;
use crate::error::{LineupError, Result};
use crate::ordering::priority_order;
use crate::scoring::Scored;
use crate::types::CandidateId;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Captaincy {
    pub captain_id: CandidateId,
    pub vice_id: CandidateId,

    /// Roles were swapped on a near tie in favor of the likelier starter
    pub swapped_for_reliability: bool,
}

/// Pick captain and vice from the starting XI.
///
/// The two highest-priority starters take the roles in order. When the
/// near-tie policy is on and their scores are within `epsilon`, the one with
/// the strictly higher start probability is captain. Nobody below rank 2 is
/// ever considered.
pub fn select_captains(xi: &[Scored<'_>], config: &CaptaincyConfig) -> Result<Captaincy> {
    config.validate()?;
    if xi.len() < 2 {
        return Err(LineupError::CaptaincyUnavailable(xi.len()));
    }

    let mut ranked = xi.to_vec();
    ranked.sort_by(priority_order);
    let (first, second) = (ranked[0], ranked[1]);

    let near_tie = (first.score - second.score).abs() <= config.epsilon;
    let swap = config.prefer_reliability_on_near_tie
        && near_tie
        && second.candidate.effective_start_probability()
            > first.candidate.effective_start_probability();

    if swap {
        debug!(
            captain = second.candidate.id,
            vice = first.candidate.id,
            gap = first.score - second.score,
            "Near tie for captain resolved by start probability"
        );
        Ok(Captaincy {
            captain_id: second.candidate.id,
            vice_id: first.candidate.id,
            swapped_for_reliability: true,
        })
    } else {
        Ok(Captaincy {
            captain_id: first.candidate.id,
            vice_id: second.candidate.id,
            swapped_for_reliability: false,
        })
    }
}
