//! # Repertoire
//!
//! Owns the in-memory tune collection and session history, and wires the
//! pure core (extraction, scheduling, serialization) to a
//! [`KeyValueStore`]. Callers load once, mutate, then save; there is no
//! internal locking.
//!
//! Deleting a tune leaves its practice sessions in place.

use chrono::{DateTime, Utc};
use tracing::info;
use uuid::Uuid;

use crate::error::ReelError;
use crate::model::{Difficulty, PracticeSession, QualityRating, Tune};
use crate::scheduler::{due_tunes, next_due, schedule};
use crate::store::{load_sessions, load_tunes, save_sessions, save_tunes, KeyValueStore};
use crate::tunebook::{export_all_with, import_tunebook, HeaderDefaults};

#[derive(Debug, Clone, Default)]
pub struct Repertoire {
    tunes: Vec<Tune>,
    sessions: Vec<PracticeSession>,
    headers: HeaderDefaults,
}

impl Repertoire {
    pub fn new(headers: HeaderDefaults) -> Self {
        Self {
            headers,
            ..Self::default()
        }
    }

    pub fn load<S: KeyValueStore + ?Sized>(
        store: &S,
        headers: HeaderDefaults,
    ) -> Result<Self, ReelError> {
        let tunes = load_tunes(store)?;
        let sessions = load_sessions(store)?;
        info!(tunes = tunes.len(), sessions = sessions.len(), "loaded repertoire");
        Ok(Self {
            tunes,
            sessions,
            headers,
        })
    }

    pub fn save<S: KeyValueStore + ?Sized>(&self, store: &mut S) -> Result<(), ReelError> {
        save_tunes(store, &self.tunes)?;
        save_sessions(store, &self.sessions)?;
        Ok(())
    }

    pub fn tunes(&self) -> &[Tune] {
        &self.tunes
    }

    pub fn sessions(&self) -> &[PracticeSession] {
        &self.sessions
    }

    pub fn get(&self, id: Uuid) -> Option<&Tune> {
        self.tunes.iter().find(|t| t.id == id)
    }

    fn get_mut(&mut self, id: Uuid) -> Result<&mut Tune, ReelError> {
        self.tunes
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or(ReelError::TuneNotFound(id))
    }

    /// Add a tune typed in by the user. Missing headers fall back to
    /// defaults.
    pub fn add_tune<I, S>(&mut self, notation: &str, difficulty: Difficulty, tags: I) -> Uuid
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let tune = Tune::from_notation(notation, difficulty, tags);
        let id = tune.id;
        info!(id = %id, title = %tune.title, "added tune");
        self.tunes.push(tune);
        id
    }

    pub fn update_notation(&mut self, id: Uuid, notation: &str) -> Result<&Tune, ReelError> {
        let tune = self.get_mut(id)?;
        tune.set_notation(notation);
        info!(id = %id, title = %tune.title, "updated notation");
        Ok(&*tune)
    }

    pub fn set_tags<I, S>(&mut self, id: Uuid, tags: I) -> Result<&Tune, ReelError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let tune = self.get_mut(id)?;
        tune.set_tags(tags);
        info!(id = %id, tags = ?tune.tags, "updated tags");
        Ok(&*tune)
    }

    pub fn set_difficulty(&mut self, id: Uuid, difficulty: Difficulty) -> Result<&Tune, ReelError> {
        let tune = self.get_mut(id)?;
        tune.difficulty = difficulty;
        info!(id = %id, difficulty = difficulty.get(), "updated difficulty");
        Ok(&*tune)
    }

    /// Replace the tune's notes; blank text clears them.
    pub fn set_notes(&mut self, id: Uuid, notes: Option<&str>) -> Result<&Tune, ReelError> {
        let tune = self.get_mut(id)?;
        tune.notes = notes
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .map(str::to_string);
        info!(id = %id, "updated notes");
        Ok(&*tune)
    }

    /// Remove a tune. Its sessions stay in the history.
    pub fn delete_tune(&mut self, id: Uuid) -> Result<Tune, ReelError> {
        let index = self
            .tunes
            .iter()
            .position(|t| t.id == id)
            .ok_or(ReelError::TuneNotFound(id))?;
        let tune = self.tunes.remove(index);
        info!(id = %id, title = %tune.title, "deleted tune");
        Ok(tune)
    }

    /// Record a finished practice session and reschedule the tune.
    pub fn practice(
        &mut self,
        id: Uuid,
        rating: u8,
        duration_minutes: u32,
        notes: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<&Tune, ReelError> {
        let rating = QualityRating::new(rating)?;
        let tune = self.get_mut(id)?;
        let update = schedule(tune, rating, now);
        tune.apply_review(&update);
        info!(
            id = %id,
            rating = rating.get(),
            next_review = %update.next_review,
            "recorded practice session"
        );

        self.sessions
            .push(PracticeSession::new(id, now, duration_minutes, rating, notes));
        self.get(id).ok_or(ReelError::TuneNotFound(id))
    }

    /// Sessions for one tune, newest first.
    pub fn recent_sessions(&self, id: Uuid, limit: usize) -> Vec<&PracticeSession> {
        let mut sessions: Vec<&PracticeSession> =
            self.sessions.iter().filter(|s| s.tune_id == id).collect();
        sessions.sort_by(|a, b| b.date.cmp(&a.date));
        sessions.truncate(limit);
        sessions
    }

    pub fn due(&self, now: DateTime<Utc>) -> Vec<&Tune> {
        due_tunes(&self.tunes, now)
    }

    pub fn next_due(&self, now: DateTime<Utc>) -> Option<&Tune> {
        next_due(&self.tunes, now)
    }

    pub fn export(&self) -> String {
        export_all_with(&self.tunes, &self.headers)
    }

    /// Import a pasted tunebook. Either every block is added or none is.
    pub fn import(&mut self, text: &str) -> Result<Vec<Uuid>, ReelError> {
        let imported = import_tunebook(text)?;
        let ids = imported.iter().map(|t| t.id).collect::<Vec<_>>();
        info!(count = imported.len(), "imported tunes");
        self.tunes.extend(imported);
        Ok(ids)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use chrono::{Duration, TimeZone};

    const KESH: &str = "X:1\nT:The Kesh\nR:jig\nK:G\n|:GAG GAB|";

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 8, 0, 0).unwrap()
    }

    fn no_tags() -> Vec<String> {
        Vec::new()
    }

    #[test]
    fn test_practice_reschedules_and_logs_session() {
        let mut rep = Repertoire::default();
        let id = rep.add_tune(KESH, Difficulty::default(), no_tags());

        let tune = rep.practice(id, 5, 10, Some("tidy"), now()).unwrap();
        assert_eq!(tune.next_review, Some(now() + Duration::days(1)));

        let later = now() + Duration::days(3);
        let tune = rep.practice(id, 4, 12, None, later).unwrap();
        assert_eq!(tune.last_practiced, Some(later));
        assert_eq!(tune.next_review, Some(later + Duration::days(6)));

        assert_eq!(rep.sessions().len(), 2);
        let recent = rep.recent_sessions(id, 5);
        assert_eq!(recent[0].date, later);
        assert_eq!(recent[1].notes.as_deref(), Some("tidy"));
    }

    #[test]
    fn test_invalid_rating_records_nothing() {
        let mut rep = Repertoire::default();
        let id = rep.add_tune(KESH, Difficulty::default(), no_tags());
        assert!(matches!(rep.practice(id, 9, 5, None, now()), Err(ReelError::InvalidRating(9))));
        assert!(rep.sessions().is_empty());
        assert!(rep.get(id).unwrap().next_review.is_none());
    }

    #[test]
    fn test_unknown_tune() {
        let mut rep = Repertoire::default();
        let missing = Uuid::new_v4();
        assert!(matches!(
            rep.practice(missing, 3, 5, None, now()),
            Err(ReelError::TuneNotFound(id)) if id == missing
        ));
        assert!(rep.delete_tune(missing).is_err());
    }

    #[test]
    fn test_delete_keeps_sessions() {
        let mut rep = Repertoire::default();
        let id = rep.add_tune(KESH, Difficulty::default(), no_tags());
        rep.practice(id, 3, 5, None, now()).unwrap();
        rep.delete_tune(id).unwrap();
        assert!(rep.get(id).is_none());
        assert_eq!(rep.sessions().len(), 1);
        assert_eq!(rep.sessions()[0].tune_id, id);
    }

    #[test]
    fn test_recent_sessions_limit() {
        let mut rep = Repertoire::default();
        let id = rep.add_tune(KESH, Difficulty::default(), no_tags());
        for day in 0..7 {
            rep.practice(id, 2, 5, None, now() + Duration::days(day)).unwrap();
        }
        let recent = rep.recent_sessions(id, 5);
        assert_eq!(recent.len(), 5);
        assert_eq!(recent[0].date, now() + Duration::days(6));
        assert_eq!(recent[4].date, now() + Duration::days(2));
    }

    #[test]
    fn test_edit_rederives_metadata() {
        let mut rep = Repertoire::default();
        let id = rep.add_tune(KESH, Difficulty::default(), ["jigs"]);
        let tune = rep.update_notation(id, "T:Out on the Ocean\nR:jig\nK:G").unwrap();
        assert_eq!(tune.title, "Out on the Ocean");
        assert_eq!(tune.tags, vec!["jigs"]);

        rep.set_difficulty(id, Difficulty::new(5).unwrap()).unwrap();
        let tune = rep.set_tags(id, ["a", "a", "b"]).unwrap();
        assert_eq!(tune.tags, vec!["a", "b"]);
        assert_eq!(tune.difficulty.get(), 5);
    }

    #[test]
    fn test_notes_set_and_cleared() {
        let mut store = MemoryStore::new();
        let mut rep = Repertoire::default();
        let id = rep.add_tune(KESH, Difficulty::default(), no_tags());

        let tune = rep.set_notes(id, Some("  learned from Kevin Burke  ")).unwrap();
        assert_eq!(tune.notes.as_deref(), Some("learned from Kevin Burke"));
        rep.save(&mut store).unwrap();
        let loaded = Repertoire::load(&store, HeaderDefaults::default()).unwrap();
        assert_eq!(loaded.get(id).unwrap().notes, rep.get(id).unwrap().notes);

        assert!(rep.set_notes(id, Some("   ")).unwrap().notes.is_none());
        assert!(matches!(rep.set_notes(Uuid::new_v4(), None), Err(ReelError::TuneNotFound(_))));
    }

    #[test]
    fn test_add_tune_trims_notation_for_export() {
        let mut rep = Repertoire::default();
        rep.add_tune("X:1\nT:A\nR:reel\nK:D\nabc\n", Difficulty::default(), no_tags());
        rep.add_tune("", Difficulty::default(), no_tags());
        let book = rep.export();
        assert!(!book.contains("\n\n\n"));
        assert!(book.ends_with("Z:Reel Revision"));
    }

    #[test]
    fn test_import_is_all_or_nothing() {
        let mut rep = Repertoire::default();
        let bad = "X:1\nT:A\nR:reel\nK:D\nabc\nX:2\nR:reel\nK:D\ndef";
        assert!(rep.import(bad).is_err());
        assert!(rep.tunes().is_empty());

        let good = "X:1\nT:A\nR:reel\nK:D\nabc\nX:2\nT:B\nR:reel\nK:D\ndef";
        let ids = rep.import(good).unwrap();
        assert_eq!(ids.len(), 2);
        assert_eq!(rep.tunes().len(), 2);
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let mut store = MemoryStore::new();
        let mut rep = Repertoire::default();
        let id = rep.add_tune(KESH, Difficulty::default(), ["jigs"]);
        rep.practice(id, 4, 15, None, now()).unwrap();
        rep.save(&mut store).unwrap();

        let loaded = Repertoire::load(&store, HeaderDefaults::default()).unwrap();
        assert_eq!(loaded.tunes(), rep.tunes());
        assert_eq!(loaded.sessions(), rep.sessions());
        assert!(loaded.next_due(now()).is_none());
        assert_eq!(loaded.next_due(now() + Duration::days(1)).map(|t| t.id), Some(id));
    }

    #[test]
    fn test_export_uses_configured_headers() {
        let headers = HeaderDefaults {
            tool_id: "Test Rig".to_string(),
            ..HeaderDefaults::default()
        };
        let mut rep = Repertoire::new(headers);
        rep.add_tune("|:GAG GAB|", Difficulty::default(), no_tags());
        assert!(rep.export().contains("\nZ:Test Rig\n"));
    }
}
