use std::collections::{BTreeSet, HashMap};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Duration as ChronoDuration, NaiveDate, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::StoreError;

const SESSIONS_FILE: &str = "sessions.json";
const PROGRESS_FILE: &str = "progress.json";
const MAX_LEVEL: u32 = 10;

pub const ACHIEVEMENTS: [(&str, &str); 6] = [
    ("first-session", "First Steps"),
    ("five-sessions", "Finding Rhythm"),
    ("ten-sessions", "Calm Regular"),
    ("perfect-score", "Full Release"),
    ("three-day-streak", "Three Days Strong"),
    ("explorer", "Explorer"),
];

pub fn achievement_title(id: &str) -> &str {
    ACHIEVEMENTS
        .iter()
        .find(|(key, _)| *key == id)
        .map_or(id, |(_, title)| *title)
}

/// What the shell hands over when a game finishes.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionReport {
    pub mood: String,
    pub game: String,
    pub duration_secs: u32,
    pub score: u32,
    pub timestamp: DateTime<Utc>,
}

/// One completed play-through. Never modified once stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionRecord {
    pub id: Uuid,
    pub mood: String,
    pub game: String,
    pub duration_secs: u32,
    pub score: u32,
    pub timestamp: DateTime<Utc>,
    /// Score normalised to 0..=100, used as the stress-reduction proxy.
    pub effectiveness: u32,
}

impl SessionRecord {
    fn from_report(report: SessionReport) -> Self {
        Self {
            id: Uuid::new_v4(),
            effectiveness: report.score.min(100),
            mood: report.mood,
            game: report.game,
            duration_secs: report.duration_secs,
            score: report.score,
            timestamp: report.timestamp,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Progress {
    pub total_sessions: u32,
    pub favorite_game: Option<String>,
    pub average_stress_reduction: u32,
    pub streak_days: u32,
    pub achievements: BTreeSet<String>,
}

impl Progress {
    pub fn level(&self) -> u32 {
        let from_sessions = self.total_sessions / 5 + 1;
        (from_sessions + self.achievements.len() as u32).min(MAX_LEVEL)
    }

    /// Replay the whole history, for when the progress file is missing or
    /// damaged but sessions survived.
    fn rebuild(sessions: &[SessionRecord], catalog: &[String]) -> Self {
        let mut progress = Progress::default();
        for end in 1..=sessions.len() {
            progress.update(&sessions[..end], catalog);
        }
        progress
    }

    /// Recompute the aggregates after `sessions` gained its newest entry.
    /// Returns the achievements unlocked by this update.
    fn update(&mut self, sessions: &[SessionRecord], catalog: &[String]) -> Vec<String> {
        self.total_sessions += 1;
        self.favorite_game = favorite_game(sessions);
        self.average_stress_reduction = average_effectiveness(sessions);
        self.streak_days = streak_days(sessions);

        let played: BTreeSet<&str> = sessions.iter().map(|s| s.game.as_str()).collect();
        let latest_perfect = sessions.last().is_some_and(|s| s.effectiveness >= 100);
        let candidates = [
            ("first-session", self.total_sessions >= 1),
            ("five-sessions", self.total_sessions >= 5),
            ("ten-sessions", self.total_sessions >= 10),
            ("perfect-score", latest_perfect),
            ("three-day-streak", self.streak_days >= 3),
            (
                "explorer",
                !catalog.is_empty() && catalog.iter().all(|g| played.contains(g.as_str())),
            ),
        ];

        candidates
            .into_iter()
            .filter(|(_, earned)| *earned)
            .filter_map(|(id, _)| self.achievements.insert(id.to_string()).then(|| id.to_string()))
            .collect()
    }
}

// Most played game; ties go to whichever was played most recently.
fn favorite_game(sessions: &[SessionRecord]) -> Option<String> {
    let mut counts: HashMap<&str, (usize, usize)> = HashMap::new();
    for (index, session) in sessions.iter().enumerate() {
        let entry = counts.entry(session.game.as_str()).or_insert((0, index));
        entry.0 += 1;
        entry.1 = index;
    }
    counts
        .into_iter()
        .max_by_key(|(_, (count, last))| (*count, *last))
        .map(|(game, _)| game.to_string())
}

fn average_effectiveness(sessions: &[SessionRecord]) -> u32 {
    if sessions.is_empty() {
        return 0;
    }
    let total: u64 = sessions.iter().map(|s| u64::from(s.effectiveness)).sum();
    (total as f64 / sessions.len() as f64).round() as u32
}

// Consecutive calendar days ending on the day of the latest session.
fn streak_days(sessions: &[SessionRecord]) -> u32 {
    let days: BTreeSet<NaiveDate> = sessions.iter().map(|s| s.timestamp.date_naive()).collect();
    let Some(mut day) = days.last().copied() else {
        return 0;
    };
    let mut streak = 0;
    while days.contains(&day) {
        streak += 1;
        day -= ChronoDuration::days(1);
    }
    streak
}

/// Append-only session history plus the derived progress, persisted as JSON
/// files in the data directory. Last write wins.
pub struct SessionStore {
    dir: PathBuf,
    sessions: Vec<SessionRecord>,
    progress: Progress,
    catalog: Vec<String>,
}

impl SessionStore {
    /// Open the store in `dir`. `catalog` lists every game id, used for the
    /// explorer achievement.
    pub fn open(dir: &Path, catalog: &[&str]) -> Result<Self, StoreError> {
        fs::create_dir_all(dir).map_err(|source| StoreError::Io {
            path: dir.to_path_buf(),
            source,
        })?;

        let catalog: Vec<String> = catalog.iter().map(|g| g.to_string()).collect();
        let sessions: Vec<SessionRecord> =
            read_json(&dir.join(SESSIONS_FILE))?.unwrap_or_default();
        let progress = match read_json(&dir.join(PROGRESS_FILE))? {
            Some(progress) => progress,
            None if sessions.is_empty() => Progress::default(),
            None => {
                info!(sessions = sessions.len(), "rebuilding progress from history");
                Progress::rebuild(&sessions, &catalog)
            }
        };
        Ok(Self {
            dir: dir.to_path_buf(),
            sessions,
            progress,
            catalog,
        })
    }

    pub fn sessions(&self) -> &[SessionRecord] {
        &self.sessions
    }

    pub fn progress(&self) -> &Progress {
        &self.progress
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Newest first.
    pub fn recent(&self, limit: usize) -> impl Iterator<Item = &SessionRecord> {
        self.sessions.iter().rev().take(limit)
    }

    pub fn best_score(&self, game: &str) -> Option<u32> {
        self.sessions
            .iter()
            .filter(|s| s.game == game)
            .map(|s| s.score)
            .max()
    }

    /// Append a completed session, refresh progress and persist both.
    /// The in-memory state is updated even when writing fails.
    pub fn record(&mut self, report: SessionReport) -> Result<Vec<String>, StoreError> {
        let record = SessionRecord::from_report(report);
        info!(game = %record.game, score = record.score, "recording session");
        self.sessions.push(record);
        let unlocked = self.progress.update(&self.sessions, &self.catalog);
        for id in &unlocked {
            info!(achievement = %id, "achievement unlocked");
        }

        write_json(&self.dir.join(SESSIONS_FILE), &self.sessions, "sessions")?;
        write_json(&self.dir.join(PROGRESS_FILE), &self.progress, "progress")?;
        Ok(unlocked)
    }
}

/// `None` when the file is missing or unreadable. An unreadable file is moved
/// aside to `*.json.corrupt` so the next write doesn't destroy it.
fn read_json<T: DeserializeOwned>(path: &Path) -> Result<Option<T>, StoreError> {
    let data = match fs::read(path) {
        Ok(data) => data,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(source) => {
            return Err(StoreError::Io {
                path: path.to_path_buf(),
                source,
            })
        }
    };
    match serde_json::from_slice(&data) {
        Ok(value) => Ok(Some(value)),
        Err(e) => {
            let aside = path.with_extension("json.corrupt");
            warn!(path = %path.display(), aside = %aside.display(), error = %e, "moving unreadable store file aside");
            if let Err(e) = fs::rename(path, &aside) {
                warn!(path = %path.display(), error = %e, "could not move damaged file");
            }
            Ok(None)
        }
    }
}

// Write to a sibling temp file, then rename over the target.
fn write_json<T: Serialize>(path: &Path, value: &T, what: &'static str) -> Result<(), StoreError> {
    let json =
        serde_json::to_vec_pretty(value).map_err(|source| StoreError::Encode { what, source })?;
    let tmp = path.with_extension("json.tmp");
    let io_err = |source: io::Error| StoreError::Io {
        path: path.to_path_buf(),
        source,
    };
    fs::write(&tmp, json).map_err(io_err)?;
    fs::rename(&tmp, path).map_err(io_err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    const CATALOG: [&str; 2] = ["bubble-pop", "anger-smash"];

    fn report(game: &str, score: u32, day: u32) -> SessionReport {
        SessionReport {
            mood: "stressed".to_string(),
            game: game.to_string(),
            duration_secs: 60,
            score,
            timestamp: Utc.with_ymd_and_hms(2026, 3, day, 12, 0, 0).unwrap(),
        }
    }

    #[test]
    fn records_are_appended_and_persisted() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = SessionStore::open(dir.path(), &CATALOG).unwrap();
        store.record(report("bubble-pop", 40, 1)).unwrap();
        store.record(report("anger-smash", 180, 1)).unwrap();

        let reopened = SessionStore::open(dir.path(), &CATALOG).unwrap();
        assert_eq!(reopened.sessions(), store.sessions());
        assert_eq!(reopened.progress(), store.progress());
        assert_eq!(reopened.sessions()[0].game, "bubble-pop");
        assert_eq!(reopened.sessions()[1].effectiveness, 100);
        assert_eq!(reopened.best_score("anger-smash"), Some(180));
    }

    #[test]
    fn progress_tracks_favorite_average_and_streak() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = SessionStore::open(dir.path(), &CATALOG).unwrap();
        store.record(report("anger-smash", 30, 1)).unwrap();
        store.record(report("bubble-pop", 60, 2)).unwrap();
        store.record(report("bubble-pop", 90, 3)).unwrap();

        let progress = store.progress();
        assert_eq!(progress.total_sessions, 3);
        assert_eq!(progress.favorite_game.as_deref(), Some("bubble-pop"));
        assert_eq!(progress.average_stress_reduction, 60);
        assert_eq!(progress.streak_days, 3);
    }

    #[test]
    fn favorite_ties_go_to_the_most_recent_game() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = SessionStore::open(dir.path(), &CATALOG).unwrap();
        store.record(report("bubble-pop", 10, 1)).unwrap();
        store.record(report("anger-smash", 10, 1)).unwrap();
        assert_eq!(store.progress().favorite_game.as_deref(), Some("anger-smash"));
    }

    #[test]
    fn streak_breaks_on_a_missed_day() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = SessionStore::open(dir.path(), &CATALOG).unwrap();
        store.record(report("bubble-pop", 10, 1)).unwrap();
        store.record(report("bubble-pop", 10, 3)).unwrap();
        store.record(report("bubble-pop", 10, 4)).unwrap();
        assert_eq!(store.progress().streak_days, 2);
    }

    #[test]
    fn achievements_unlock_once() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = SessionStore::open(dir.path(), &CATALOG).unwrap();

        let first = store.record(report("bubble-pop", 100, 1)).unwrap();
        assert_eq!(first, vec!["first-session".to_string(), "perfect-score".to_string()]);

        let second = store.record(report("anger-smash", 20, 2)).unwrap();
        assert_eq!(second, vec!["explorer".to_string()]);

        let third = store.record(report("anger-smash", 100, 3)).unwrap();
        assert_eq!(third, vec!["three-day-streak".to_string()]);
        assert_eq!(store.progress().level(), 1 + 4);
    }

    #[test]
    fn level_is_capped() {
        let progress = Progress {
            total_sessions: 60,
            achievements: ACHIEVEMENTS.iter().map(|(id, _)| id.to_string()).collect(),
            ..Progress::default()
        };
        assert_eq!(progress.level(), 10);
    }

    #[test]
    fn damaged_history_is_kept_aside() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(SESSIONS_FILE), b"{ not json").unwrap();
        let mut store = SessionStore::open(dir.path(), &CATALOG).unwrap();
        assert!(store.sessions().is_empty());
        assert_eq!(store.progress().total_sessions, 0);

        store.record(report("bubble-pop", 40, 1)).unwrap();
        let aside = fs::read(dir.path().join("sessions.json.corrupt")).unwrap();
        assert_eq!(aside, b"{ not json");
    }

    #[test]
    fn damaged_progress_is_rebuilt_from_history() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = SessionStore::open(dir.path(), &CATALOG).unwrap();
        store.record(report("bubble-pop", 40, 1)).unwrap();
        store.record(report("anger-smash", 180, 2)).unwrap();
        store.record(report("bubble-pop", 70, 3)).unwrap();
        let expected = store.progress().clone();

        fs::write(dir.path().join(PROGRESS_FILE), b"[[[").unwrap();
        let reopened = SessionStore::open(dir.path(), &CATALOG).unwrap();
        assert_eq!(reopened.sessions().len(), 3);
        assert_eq!(reopened.progress(), &expected);
        assert!(dir.path().join("progress.json.corrupt").exists());
    }

    #[test]
    fn unknown_achievement_ids_keep_their_id_as_title() {
        assert_eq!(achievement_title("explorer"), "Explorer");
        assert_eq!(achievement_title("mystery"), "mystery");
    }
}
