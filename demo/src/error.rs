use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Store I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Store JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Error, Debug)]
pub enum QuizError {
    #[error("No participant selected")]
    NoParticipantSelected,
    #[error("Participant {0:?} not found")]
    UnknownParticipant(String),
    #[error("Participant {0:?} already exists")]
    DuplicateParticipant(String),
    #[error("Participant name cannot be empty")]
    EmptyParticipantName,
    #[error("Question {0} not found")]
    UnknownQuestion(usize),
    #[error("Choice {choice} is not valid for question {question}")]
    InvalidChoice { question: usize, choice: usize },
    #[error(transparent)]
    Store(#[from] StoreError),
}
