use chrono::Utc;
use tracing::info;

use crate::{error::QuizError, scores::ScoreBoard};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    pub prompt: &'static str,
    pub choices: &'static [&'static str],
    pub correct: usize,
    pub bonus: i64,
    pub explanation: &'static str,
}

pub const QUESTIONS: &[Question] = &[
    Question {
        prompt: "An interval is started once on mount with a tick closure. Later renders supply new closures. Which one runs on each tick?",
        choices: &["The newest closure", "The closure captured on mount", "None, the interval restarts", "It depends on timing"],
        correct: 1,
        bonus: 10,
        explanation: "The interval holds the closure it was given; later closures never reach it.",
    },
    Question {
        prompt: "What does a stable event handle do when it is called?",
        choices: &[
            "Runs the closure from the render that created it",
            "Looks up the most recently supplied closure and runs it",
            "Queues the call until the next render",
            "Runs every closure ever supplied",
        ],
        correct: 1,
        bonus: 10,
        explanation: "The handle reads the cell at call time, so it always resolves the latest closure.",
    },
    Question {
        prompt: "Why can an effect list the handle as its only dependency without re-running?",
        choices: &["The handle is compared by value", "The handle's identity never changes", "Effects ignore handles", "The effect is memoized globally"],
        correct: 1,
        bonus: 15,
        explanation: "Construction returns the very same handle on every render, so the dependency never changes.",
    },
    Question {
        prompt: "When must the new closure be written into the cell?",
        choices: &[
            "Synchronously during render, before effects and timers can run",
            "Lazily, on the first call after render",
            "In a later effect",
            "On the next timer tick",
        ],
        correct: 0,
        bonus: 20,
        explanation: "A deferred write leaves a window in which a timer would call the stale closure.",
    },
    Question {
        prompt: "A timer fires just after its component was disposed. What happens when it calls the handle?",
        choices: &["It panics", "It calls an empty cell", "It runs the last supplied closure", "It is silently skipped"],
        correct: 2,
        bonus: 15,
        explanation: "The cell is never emptied; clearing the timer on teardown is the consumer's job.",
    },
];

/// What happened to one answer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerOutcome {
    pub question: usize,
    pub correct: bool,
    pub bonus: i64,
    pub total_bonus: i64,
    pub explanation: &'static str,
}

/// A quiz round: who is answering, and where their answers are recorded
pub struct QuizSession {
    questions: &'static [Question],
    board: ScoreBoard,
    selected: Option<String>,
}

impl QuizSession {
    pub fn new(board: ScoreBoard) -> Self { Self::with_questions(board, QUESTIONS) }

    pub fn with_questions(board: ScoreBoard, questions: &'static [Question]) -> Self { Self { questions, board, selected: None } }

    pub fn questions(&self) -> &'static [Question] { self.questions }

    pub fn board(&self) -> &ScoreBoard { &self.board }

    pub fn board_mut(&mut self) -> &mut ScoreBoard { &mut self.board }

    pub fn selected(&self) -> Option<&str> { self.selected.as_deref() }

    /// Select an existing participant
    pub fn select(&mut self, name: &str) -> Result<(), QuizError> {
        if !self.board.contains(name) {
            return Err(QuizError::UnknownParticipant(name.to_string()));
        }
        self.selected = Some(name.to_string());
        Ok(())
    }

    /// Select a participant, adding them to the board first if needed
    pub fn join(&mut self, name: &str) -> Result<(), QuizError> {
        let name = name.trim();
        if !self.board.contains(name) {
            self.board.add_participant(name)?;
        }
        self.select(name)
    }

    pub fn deselect(&mut self) { self.selected = None }

    /// Answer `question` with `choice` for the selected participant
    pub fn answer(&mut self, question: usize, choice: usize) -> Result<AnswerOutcome, QuizError> {
        let name = self.selected.clone().ok_or(QuizError::NoParticipantSelected)?;
        let questions = self.questions;
        let q = questions.get(question).ok_or(QuizError::UnknownQuestion(question))?;
        if choice >= q.choices.len() {
            return Err(QuizError::InvalidChoice { question, choice });
        }

        let correct = choice == q.correct;
        let bonus = if correct { q.bonus } else { 0 };
        let score = self.board.record(&name, correct, bonus, Utc::now())?;
        info!("quiz: {name} answered question {question} {}", if correct { "correctly" } else { "incorrectly" });

        Ok(AnswerOutcome { question, correct, bonus, total_bonus: score.total_bonus, explanation: q.explanation })
    }
}
