use chrono::{DateTime, NaiveDate, Utc};
use log::{info, warn};
use serde::{de::DeserializeOwned, Serialize};

use crate::db::store::Store;
use crate::engine::{self, progress::validate_range};
use crate::error::{Result, TrackerError};
use crate::models::{Challenge, ChallengeParticipant, Habit, NewChallenge, NewHabit};

pub const HABITS_KEY: &str = "habits";
pub const CHALLENGES_KEY: &str = "challenges";

/// Read a whole collection. Missing data is an empty collection; malformed
/// data is logged and treated as empty.
fn load_collection<T: DeserializeOwned>(store: &dyn Store, key: &str) -> Result<Vec<T>> {
    let Some(raw) = store.read(key)? else {
        return Ok(Vec::new());
    };
    match serde_json::from_str(&raw) {
        Ok(items) => Ok(items),
        Err(e) => {
            warn!("Discarding malformed '{}' data: {}", key, e);
            Ok(Vec::new())
        }
    }
}

fn save_collection<T: Serialize>(store: &dyn Store, key: &str, items: &[T]) -> Result<()> {
    let raw = serde_json::to_string(items)?;
    store.write(key, &raw)
}

// ─── Habit repo ──────────────────────────────────────────────────────────────

pub struct HabitRepo;

impl HabitRepo {
    pub fn load(store: &dyn Store) -> Result<Vec<Habit>> {
        load_collection(store, HABITS_KEY)
    }

    pub fn save(store: &dyn Store, habits: &[Habit]) -> Result<()> {
        save_collection(store, HABITS_KEY, habits)
    }

    /// Habits owned by `user_id`. Habits without an owner are not included.
    pub fn get_by_user(store: &dyn Store, user_id: &str) -> Result<Vec<Habit>> {
        Ok(Self::load(store)?
            .into_iter()
            .filter(|h| h.user_id.as_deref() == Some(user_id))
            .collect())
    }

    pub fn get_by_id(store: &dyn Store, id: &str) -> Result<Habit> {
        Self::load(store)?
            .into_iter()
            .find(|h| h.id == id)
            .ok_or_else(|| TrackerError::not_found("habit", id))
    }

    /// Look a habit up by exact id, falling back to a case-insensitive name.
    pub fn find(store: &dyn Store, query: &str) -> Result<Option<Habit>> {
        let habits = Self::load(store)?;
        if let Some(h) = habits.iter().find(|h| h.id == query) {
            return Ok(Some(h.clone()));
        }
        let lowered = query.to_lowercase();
        Ok(habits.into_iter().find(|h| h.name.to_lowercase() == lowered))
    }

    pub fn create(
        store: &dyn Store,
        draft: NewHabit,
        id: &str,
        created_at: DateTime<Utc>,
    ) -> Result<Habit> {
        let mut habits = Self::load(store)?;
        let habit = draft.into_habit(id, created_at);
        habits.push(habit.clone());
        Self::save(store, &habits)?;
        info!("Created habit {} ({})", habit.id, habit.name);
        Ok(habit)
    }

    /// Replace the stored record with the same id.
    pub fn update(store: &dyn Store, habit: Habit) -> Result<Habit> {
        let mut habits = Self::load(store)?;
        let slot = habits
            .iter_mut()
            .find(|h| h.id == habit.id)
            .ok_or_else(|| TrackerError::not_found("habit", habit.id.clone()))?;
        *slot = habit.clone();
        Self::save(store, &habits)?;
        Ok(habit)
    }

    pub fn delete(store: &dyn Store, id: &str) -> Result<bool> {
        let mut habits = Self::load(store)?;
        let before = habits.len();
        habits.retain(|h| h.id != id);
        if habits.len() == before {
            return Ok(false);
        }
        Self::save(store, &habits)?;
        info!("Deleted habit {}", id);
        Ok(true)
    }

    pub fn toggle_completion(
        store: &dyn Store,
        id: &str,
        date: NaiveDate,
        today: NaiveDate,
    ) -> Result<Habit> {
        let habit = Self::get_by_id(store, id)?;
        let updated = engine::toggle_completion(&habit, date, today);
        Self::update(store, updated)
    }
}

// ─── Challenge repo ──────────────────────────────────────────────────────────

pub struct ChallengeRepo;

impl ChallengeRepo {
    pub fn load(store: &dyn Store) -> Result<Vec<Challenge>> {
        load_collection(store, CHALLENGES_KEY)
    }

    pub fn save(store: &dyn Store, challenges: &[Challenge]) -> Result<()> {
        save_collection(store, CHALLENGES_KEY, challenges)
    }

    pub fn get_public(store: &dyn Store) -> Result<Vec<Challenge>> {
        Ok(Self::load(store)?
            .into_iter()
            .filter(|c| c.is_public)
            .collect())
    }

    /// Challenges the user created or participates in.
    pub fn get_by_user(store: &dyn Store, user_id: &str) -> Result<Vec<Challenge>> {
        Ok(Self::load(store)?
            .into_iter()
            .filter(|c| c.involves(user_id))
            .collect())
    }

    pub fn get_by_id(store: &dyn Store, id: &str) -> Result<Challenge> {
        Self::load(store)?
            .into_iter()
            .find(|c| c.id == id)
            .ok_or_else(|| TrackerError::not_found("challenge", id))
    }

    pub fn create(
        store: &dyn Store,
        draft: NewChallenge,
        id: &str,
        created_at: DateTime<Utc>,
    ) -> Result<Challenge> {
        validate_range(draft.start_date, draft.end_date)?;
        let mut challenges = Self::load(store)?;
        let challenge = draft.into_challenge(id, created_at);
        challenges.push(challenge.clone());
        Self::save(store, &challenges)?;
        info!("Created challenge {} ({})", challenge.id, challenge.title);
        Ok(challenge)
    }

    pub fn update(store: &dyn Store, challenge: Challenge) -> Result<Challenge> {
        let mut challenges = Self::load(store)?;
        let slot = challenges
            .iter_mut()
            .find(|c| c.id == challenge.id)
            .ok_or_else(|| TrackerError::not_found("challenge", challenge.id.clone()))?;
        *slot = challenge.clone();
        Self::save(store, &challenges)?;
        Ok(challenge)
    }

    pub fn delete(store: &dyn Store, id: &str) -> Result<bool> {
        let mut challenges = Self::load(store)?;
        let before = challenges.len();
        challenges.retain(|c| c.id != id);
        if challenges.len() == before {
            return Ok(false);
        }
        Self::save(store, &challenges)?;
        info!("Deleted challenge {}", id);
        Ok(true)
    }

    pub fn join(
        store: &dyn Store,
        id: &str,
        user_id: &str,
        joined_at: DateTime<Utc>,
    ) -> Result<ChallengeParticipant> {
        let challenge = Self::get_by_id(store, id)?;
        if let Some(existing) = challenge.participant(user_id) {
            return Ok(existing.clone());
        }
        let (updated, participant) = engine::join(&challenge, user_id, joined_at);
        Self::update(store, updated)?;
        info!("{} joined challenge {}", user_id, id);
        Ok(participant)
    }

    /// `false` when the challenge does not exist or the user was not in it.
    pub fn leave(store: &dyn Store, id: &str, user_id: &str) -> Result<bool> {
        let challenge = match Self::get_by_id(store, id) {
            Ok(c) => c,
            Err(e) if e.is_not_found() => return Ok(false),
            Err(e) => return Err(e),
        };
        match engine::leave(&challenge, user_id) {
            Some(updated) => {
                Self::update(store, updated)?;
                info!("{} left challenge {}", user_id, id);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    pub fn update_progress(
        store: &dyn Store,
        id: &str,
        user_id: &str,
        date: NaiveDate,
        completed: bool,
    ) -> Result<ChallengeParticipant> {
        let challenge = Self::get_by_id(store, id)?;
        let participant = engine::update_progress(&challenge, user_id, date, completed)?;
        Self::update(store, engine::with_participant(&challenge, participant.clone()))?;
        Ok(participant)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::store::MemoryStore;
    use crate::models::{Category, HabitFrequency};
    use crate::utils::date::parse_date;

    fn d(s: &str) -> NaiveDate {
        parse_date(s).unwrap()
    }

    fn draft(name: &str) -> NewHabit {
        NewHabit {
            name: name.into(),
            frequency: HabitFrequency::Daily,
            ..Default::default()
        }
    }

    fn challenge_draft(start: &str, end: &str) -> NewChallenge {
        NewChallenge {
            title: "Walk every day".into(),
            description: "10k steps".into(),
            creator_id: "owner".into(),
            start_date: d(start),
            end_date: d(end),
            category: Category::Fitness,
            is_public: true,
            habit_template: Some(draft("Walk")),
        }
    }

    #[test]
    fn test_empty_store_loads_empty() {
        let store = MemoryStore::new();
        assert!(HabitRepo::load(&store).unwrap().is_empty());
        assert!(ChallengeRepo::load(&store).unwrap().is_empty());
    }

    #[test]
    fn test_malformed_data_falls_back_to_empty() {
        let store = MemoryStore::new();
        store.write(HABITS_KEY, "{not json").unwrap();
        store.write(CHALLENGES_KEY, r#"[{"id": 4}]"#).unwrap();
        assert!(HabitRepo::load(&store).unwrap().is_empty());
        assert!(ChallengeRepo::load(&store).unwrap().is_empty());
    }

    #[test]
    fn test_habit_crud() {
        let store = MemoryStore::new();
        let created = HabitRepo::create(&store, draft("Read"), "h1", Utc::now()).unwrap();
        HabitRepo::create(&store, draft("Run"), "h2", Utc::now()).unwrap();

        assert_eq!(HabitRepo::get_by_id(&store, "h1").unwrap(), created);
        assert_eq!(HabitRepo::find(&store, "run").unwrap().unwrap().id, "h2");
        assert_eq!(HabitRepo::find(&store, "h1").unwrap().unwrap().name, "Read");
        assert!(HabitRepo::find(&store, "swim").unwrap().is_none());

        let mut renamed = created.clone();
        renamed.name = "Read more".into();
        HabitRepo::update(&store, renamed).unwrap();
        assert_eq!(HabitRepo::get_by_id(&store, "h1").unwrap().name, "Read more");

        assert!(HabitRepo::delete(&store, "h1").unwrap());
        assert!(!HabitRepo::delete(&store, "h1").unwrap());
        assert_eq!(HabitRepo::load(&store).unwrap().len(), 1);
    }

    #[test]
    fn test_get_by_user_filters_on_owner() {
        let store = MemoryStore::new();
        let owned = |name: &str, user: Option<&str>| NewHabit {
            user_id: user.map(str::to_string),
            ..draft(name)
        };
        HabitRepo::create(&store, owned("Read", Some("sam")), "h1", Utc::now()).unwrap();
        HabitRepo::create(&store, owned("Run", Some("alex")), "h2", Utc::now()).unwrap();
        HabitRepo::create(&store, owned("Swim", None), "h3", Utc::now()).unwrap();

        let mine = HabitRepo::get_by_user(&store, "sam").unwrap();
        assert_eq!(mine.len(), 1);
        assert_eq!(mine[0].id, "h1");
        assert!(HabitRepo::get_by_user(&store, "nobody").unwrap().is_empty());
    }

    #[test]
    fn test_missing_habit_is_not_found() {
        let store = MemoryStore::new();
        let today = d("2024-01-10");
        let err = HabitRepo::toggle_completion(&store, "nope", today, today).unwrap_err();
        assert!(err.is_not_found());

        let ghost = Habit::new("ghost", "Ghost", HabitFrequency::Daily, Utc::now());
        assert!(HabitRepo::update(&store, ghost).unwrap_err().is_not_found());
    }

    #[test]
    fn test_toggle_persists_and_recomputes() {
        let store = MemoryStore::new();
        let today = d("2024-01-10");
        HabitRepo::create(&store, draft("Read"), "h1", Utc::now()).unwrap();

        HabitRepo::toggle_completion(&store, "h1", d("2024-01-09"), today).unwrap();
        let habit = HabitRepo::toggle_completion(&store, "h1", today, today).unwrap();
        assert_eq!(habit.current_streak, 2);

        let stored = HabitRepo::get_by_id(&store, "h1").unwrap();
        assert_eq!(stored, habit);
        assert_eq!(stored.longest_streak, 2);
    }

    #[test]
    fn test_challenge_create_rejects_inverted_range() {
        let store = MemoryStore::new();
        let err = ChallengeRepo::create(
            &store,
            challenge_draft("2024-01-10", "2024-01-01"),
            "c1",
            Utc::now(),
        )
        .unwrap_err();
        assert!(matches!(err, TrackerError::InvalidRange { .. }));
        assert!(ChallengeRepo::load(&store).unwrap().is_empty());
    }

    #[test]
    fn test_challenge_queries() {
        let store = MemoryStore::new();
        ChallengeRepo::create(&store, challenge_draft("2024-01-01", "2024-01-10"), "c1", Utc::now())
            .unwrap();
        let mut private = challenge_draft("2024-01-01", "2024-01-10");
        private.is_public = false;
        private.creator_id = "someone".into();
        ChallengeRepo::create(&store, private, "c2", Utc::now()).unwrap();

        assert_eq!(ChallengeRepo::get_public(&store).unwrap().len(), 1);
        assert_eq!(ChallengeRepo::get_by_user(&store, "owner").unwrap().len(), 1);
        assert!(ChallengeRepo::get_by_user(&store, "me").unwrap().is_empty());

        ChallengeRepo::join(&store, "c2", "me", Utc::now()).unwrap();
        let mine = ChallengeRepo::get_by_user(&store, "me").unwrap();
        assert_eq!(mine.len(), 1);
        assert_eq!(mine[0].id, "c2");

        assert!(ChallengeRepo::delete(&store, "c1").unwrap());
        assert!(!ChallengeRepo::delete(&store, "c1").unwrap());
        assert!(ChallengeRepo::get_by_id(&store, "c1").unwrap_err().is_not_found());
    }

    #[test]
    fn test_challenge_progress_flow() {
        let store = MemoryStore::new();
        ChallengeRepo::create(&store, challenge_draft("2024-01-01", "2024-01-10"), "c1", Utc::now())
            .unwrap();

        let err = ChallengeRepo::update_progress(&store, "c1", "me", d("2024-01-01"), true)
            .unwrap_err();
        assert!(err.is_not_found(), "non-participant");
        let err = ChallengeRepo::update_progress(&store, "zz", "me", d("2024-01-01"), true)
            .unwrap_err();
        assert!(err.is_not_found(), "unknown challenge");

        let joined = ChallengeRepo::join(&store, "c1", "me", Utc::now()).unwrap();
        let again = ChallengeRepo::join(&store, "c1", "me", Utc::now()).unwrap();
        assert_eq!(joined, again);

        for day in ["2024-01-01", "2024-01-02", "2024-01-03", "2024-01-04", "2024-01-05"] {
            ChallengeRepo::update_progress(&store, "c1", "me", d(day), true).unwrap();
        }
        let p = ChallengeRepo::update_progress(&store, "c1", "me", d("2024-01-05"), true).unwrap();
        assert_eq!(p.progress, 50);

        let stored = ChallengeRepo::get_by_id(&store, "c1").unwrap();
        assert_eq!(stored.participant("me").unwrap().progress, 50);
        assert_eq!(stored.participants.len(), 1);

        assert!(ChallengeRepo::leave(&store, "c1", "me").unwrap());
        assert!(!ChallengeRepo::leave(&store, "c1", "me").unwrap());
        assert!(!ChallengeRepo::leave(&store, "missing", "me").unwrap());
    }
}
