use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::models::{Category, NewHabit};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChallengeParticipant {
    pub user_id: String,
    pub joined_at: DateTime<Utc>,
    /// Percentage 0-100
    pub progress: u8,
    #[serde(default)]
    pub completed_days: BTreeSet<NaiveDate>,
}

impl ChallengeParticipant {
    pub fn new(user_id: impl Into<String>, joined_at: DateTime<Utc>) -> Self {
        Self {
            user_id: user_id.into(),
            joined_at,
            progress: 0,
            completed_days: BTreeSet::new(),
        }
    }

    pub fn is_complete(&self) -> bool {
        self.progress >= 100
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Challenge {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub creator_id: String,
    /// First day of the challenge, inclusive
    pub start_date: NaiveDate,
    /// Last day of the challenge, inclusive
    pub end_date: NaiveDate,
    pub category: Category,
    #[serde(default)]
    pub is_public: bool,
    #[serde(default)]
    pub participants: Vec<ChallengeParticipant>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub habit_template: Option<NewHabit>,
    pub created_at: DateTime<Utc>,
}

impl Challenge {
    pub fn participant(&self, user_id: &str) -> Option<&ChallengeParticipant> {
        self.participants.iter().find(|p| p.user_id == user_id)
    }

    pub fn has_participant(&self, user_id: &str) -> bool {
        self.participant(user_id).is_some()
    }

    pub fn involves(&self, user_id: &str) -> bool {
        self.creator_id == user_id || self.has_participant(user_id)
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start_date <= date && date <= self.end_date
    }

    /// Days the participant marked that fall inside the challenge window.
    /// Days marked outside the window still count towards `progress`.
    pub fn completed_in_range(&self, participant: &ChallengeParticipant) -> usize {
        participant
            .completed_days
            .iter()
            .filter(|date| self.contains(**date))
            .count()
    }
}

/// Fields a caller provides when creating a challenge.
#[derive(Debug, Clone, PartialEq)]
pub struct NewChallenge {
    pub title: String,
    pub description: String,
    pub creator_id: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub category: Category,
    pub is_public: bool,
    pub habit_template: Option<NewHabit>,
}

impl NewChallenge {
    pub fn into_challenge(self, id: impl Into<String>, created_at: DateTime<Utc>) -> Challenge {
        Challenge {
            id: id.into(),
            title: self.title,
            description: self.description,
            creator_id: self.creator_id,
            start_date: self.start_date,
            end_date: self.end_date,
            category: self.category,
            is_public: self.is_public,
            participants: Vec::new(),
            habit_template: self.habit_template,
            created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_challenge_json_shape() {
        let json = r#"{
            "id": "c1",
            "title": "30 days of reading",
            "description": "",
            "creatorId": "u1",
            "startDate": "2024-01-01",
            "endDate": "2024-01-10",
            "category": "learning",
            "isPublic": true,
            "participants": [{
                "userId": "u2",
                "joinedAt": "2024-01-01T08:00:00Z",
                "progress": 20,
                "completedDays": ["2024-01-02", "2024-01-01"]
            }],
            "createdAt": "2023-12-30T10:00:00Z"
        }"#;
        let challenge: Challenge = serde_json::from_str(json).unwrap();
        assert_eq!(challenge.category, Category::Learning);
        assert!(challenge.involves("u1"));
        assert!(challenge.involves("u2"));
        assert!(!challenge.involves("u3"));

        let p = challenge.participant("u2").unwrap();
        assert_eq!(p.completed_days.len(), 2);

        let value = serde_json::to_value(&challenge).unwrap();
        assert_eq!(value["participants"][0]["completedDays"][0], "2024-01-01");
        assert_eq!(value["endDate"], "2024-01-10");
        assert!(value.get("habitTemplate").is_none());
    }

    #[test]
    fn test_contains_is_inclusive() {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2024, 1, 10).unwrap();
        let challenge = NewChallenge {
            title: "t".into(),
            description: String::new(),
            creator_id: "u".into(),
            start_date: start,
            end_date: end,
            category: Category::Other,
            is_public: false,
            habit_template: None,
        }
        .into_challenge("c", Utc::now());
        assert!(challenge.contains(start));
        assert!(challenge.contains(end));
        assert!(!challenge.contains(end.succ_opt().unwrap()));
    }

    #[test]
    fn test_completed_in_range_skips_days_outside_window() {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2024, 1, 10).unwrap();
        let challenge = NewChallenge {
            title: "t".into(),
            description: String::new(),
            creator_id: "u".into(),
            start_date: start,
            end_date: end,
            category: Category::Other,
            is_public: false,
            habit_template: None,
        }
        .into_challenge("c", Utc::now());
        let mut participant = ChallengeParticipant::new("u", Utc::now());
        participant.completed_days = BTreeSet::from([
            start.pred_opt().unwrap(),
            start,
            NaiveDate::from_ymd_opt(2024, 1, 5).unwrap(),
            end,
            end.succ_opt().unwrap(),
        ]);
        assert_eq!(challenge.completed_in_range(&participant), 3);
    }
}
