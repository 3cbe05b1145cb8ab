use std::collections::BTreeMap;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::{error::QuizError, store::LocalStore};

/// Key under which the whole score map is stored
pub const SCORES_KEY: &str = "quiz-scores";

/// When a participant last answered, serialized as RFC 3339 or `"Never"`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum LastActivity {
    #[default]
    Never,
    At(DateTime<Utc>),
}

impl From<LastActivity> for String {
    fn from(value: LastActivity) -> Self {
        match value {
            LastActivity::Never => "Never".to_string(),
            LastActivity::At(at) => at.to_rfc3339_opts(SecondsFormat::Millis, true),
        }
    }
}

impl TryFrom<String> for LastActivity {
    type Error = chrono::ParseError;
    fn try_from(value: String) -> Result<Self, Self::Error> {
        if value == "Never" {
            return Ok(LastActivity::Never);
        }
        Ok(LastActivity::At(DateTime::parse_from_rfc3339(&value)?.with_timezone(&Utc)))
    }
}

impl std::fmt::Display for LastActivity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LastActivity::Never => write!(f, "Never"),
            LastActivity::At(at) => write!(f, "{}", at.format("%Y-%m-%d %H:%M:%S")),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParticipantScore {
    pub total_bonus: i64,
    pub questions_answered: u32,
    pub correct_answers: u32,
    pub last_activity: LastActivity,
}

impl ParticipantScore {
    /// Share of correct answers in percent, 0 when nothing was answered
    pub fn accuracy(&self) -> u32 {
        if self.questions_answered == 0 {
            return 0;
        }
        self.correct_answers * 100 / self.questions_answered
    }
}

/// Participant scores, loaded once from a [`LocalStore`] and written back whole on every change
pub struct ScoreBoard {
    store: LocalStore,
    scores: BTreeMap<String, ParticipantScore>,
}

impl ScoreBoard {
    pub fn load(store: LocalStore) -> Self {
        let scores = match store.get(SCORES_KEY) {
            None => BTreeMap::new(),
            Some(raw) => serde_json::from_str(raw).unwrap_or_else(|e| {
                warn!("ScoreBoard: ignoring unreadable snapshot: {e}");
                BTreeMap::new()
            }),
        };
        info!("ScoreBoard: loaded {} participants", scores.len());
        Self { store, scores }
    }

    pub fn get(&self, name: &str) -> Option<&ParticipantScore> { self.scores.get(name) }

    pub fn contains(&self, name: &str) -> bool { self.scores.contains_key(name) }

    pub fn participants(&self) -> impl Iterator<Item = (&str, &ParticipantScore)> { self.scores.iter().map(|(k, v)| (k.as_str(), v)) }

    /// Participants ordered by bonus, highest first, ties by name
    pub fn leaderboard(&self) -> Vec<(&str, &ParticipantScore)> {
        let mut rows: Vec<_> = self.participants().collect();
        rows.sort_by(|a, b| b.1.total_bonus.cmp(&a.1.total_bonus).then_with(|| a.0.cmp(b.0)));
        rows
    }

    pub fn add_participant(&mut self, name: &str) -> Result<(), QuizError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(QuizError::EmptyParticipantName);
        }
        if self.scores.contains_key(name) {
            return Err(QuizError::DuplicateParticipant(name.to_string()));
        }
        self.update(|scores| {
            scores.insert(name.to_string(), ParticipantScore::default());
            Ok(())
        })
    }

    pub fn remove_participant(&mut self, name: &str) -> Result<ParticipantScore, QuizError> {
        self.update(|scores| scores.remove(name).ok_or_else(|| QuizError::UnknownParticipant(name.to_string())))
    }

    /// Record one answered question
    pub fn record(&mut self, name: &str, correct: bool, bonus: i64, at: DateTime<Utc>) -> Result<&ParticipantScore, QuizError> {
        self.update(|scores| {
            let score = entry(scores, name)?;
            score.questions_answered += 1;
            if correct {
                score.correct_answers += 1;
            }
            score.total_bonus += bonus;
            score.last_activity = LastActivity::At(at);
            Ok(())
        })?;
        self.scores.get(name).ok_or_else(|| QuizError::UnknownParticipant(name.to_string()))
    }

    /// Zero a participant's record, keeping them on the board
    pub fn reset_participant(&mut self, name: &str) -> Result<(), QuizError> {
        self.update(|scores| {
            *entry(scores, name)? = ParticipantScore::default();
            Ok(())
        })
    }

    pub fn reset_all(&mut self) -> Result<(), QuizError> {
        self.update(|scores| {
            scores.clear();
            Ok(())
        })
    }

    /// Apply `change` to a copy of the scores, write the copy, and only then adopt it
    fn update<T>(&mut self, change: impl FnOnce(&mut BTreeMap<String, ParticipantScore>) -> Result<T, QuizError>) -> Result<T, QuizError> {
        let mut next = self.scores.clone();
        let output = change(&mut next)?;
        let snapshot = serde_json::to_string(&next).map_err(crate::error::StoreError::from)?;
        self.store.set(SCORES_KEY, snapshot)?;
        self.scores = next;
        Ok(output)
    }
}

fn entry<'a>(scores: &'a mut BTreeMap<String, ParticipantScore>, name: &str) -> Result<&'a mut ParticipantScore, QuizError> {
    scores.get_mut(name).ok_or_else(|| QuizError::UnknownParticipant(name.to_string()))
}
