use chrono::{DateTime, NaiveDate, Utc};

use crate::error::{Result, TrackerError};
use crate::models::{Challenge, ChallengeParticipant};
use crate::utils::date::{days_between, format_date};

/// Number of days in the inclusive range, never less than one.
pub fn total_days_inclusive(start: NaiveDate, end: NaiveDate) -> i64 {
    (days_between(end, start) + 1).max(1)
}

/// `completed` days out of the challenge length as a rounded percentage,
/// capped at 100. Days outside the range still count, hence the cap.
pub fn progress_percent(completed: usize, start: NaiveDate, end: NaiveDate) -> u8 {
    let total = total_days_inclusive(start, end) as f64;
    (completed as f64 / total * 100.0).round().min(100.0) as u8
}

pub fn validate_range(start: NaiveDate, end: NaiveDate) -> Result<()> {
    if end < start {
        return Err(TrackerError::InvalidRange {
            start: format_date(start),
            end: format_date(end),
        });
    }
    Ok(())
}

/// Record or clear a completed day for `user_id` and recompute their
/// progress. Both directions are idempotent. Returns the updated
/// participant; the challenge itself is not modified.
pub fn update_progress(
    challenge: &Challenge,
    user_id: &str,
    date: NaiveDate,
    completed: bool,
) -> Result<ChallengeParticipant> {
    let mut participant = challenge
        .participant(user_id)
        .cloned()
        .ok_or_else(|| TrackerError::not_found("participant", user_id))?;

    if completed {
        participant.completed_days.insert(date);
    } else {
        participant.completed_days.remove(&date);
    }
    participant.progress = progress_percent(
        participant.completed_days.len(),
        challenge.start_date,
        challenge.end_date,
    );
    Ok(participant)
}

/// New challenge with `participant` replacing the entry for the same user,
/// or appended when the user is not in it yet.
pub fn with_participant(challenge: &Challenge, participant: ChallengeParticipant) -> Challenge {
    let mut updated = challenge.clone();
    match updated
        .participants
        .iter_mut()
        .find(|p| p.user_id == participant.user_id)
    {
        Some(slot) => *slot = participant,
        None => updated.participants.push(participant),
    }
    updated
}

/// Add `user_id` to the challenge. Joining twice returns the existing
/// participant and leaves the challenge as it was.
pub fn join(
    challenge: &Challenge,
    user_id: &str,
    joined_at: DateTime<Utc>,
) -> (Challenge, ChallengeParticipant) {
    if let Some(existing) = challenge.participant(user_id) {
        return (challenge.clone(), existing.clone());
    }
    let participant = ChallengeParticipant::new(user_id, joined_at);
    (with_participant(challenge, participant.clone()), participant)
}

/// Remove `user_id` from the challenge. `None` when they were not a participant.
pub fn leave(challenge: &Challenge, user_id: &str) -> Option<Challenge> {
    if !challenge.has_participant(user_id) {
        return None;
    }
    let mut updated = challenge.clone();
    updated.participants.retain(|p| p.user_id != user_id);
    Some(updated)
}
