use std::fmt;

/// Reasons the engine rejects an operation. All are local and non-fatal;
/// a rejected operation leaves the game state untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GoError {
    NotOnBoard,
    Occupied,
    Suicide,
    KoViolation,
    OutOfTurn,
    GameOver,
    ScoringInProgress,
}

impl fmt::Display for GoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GoError::NotOnBoard => write!(f, "point is not on the board"),
            GoError::Occupied => write!(f, "point is already occupied"),
            GoError::Suicide => write!(f, "suicide"),
            GoError::KoViolation => write!(f, "ko violation"),
            GoError::OutOfTurn => write!(f, "out of turn"),
            GoError::GameOver => write!(f, "game is over"),
            GoError::ScoringInProgress => write!(f, "scoring in progress"),
        }
    }
}

impl std::error::Error for GoError {}
