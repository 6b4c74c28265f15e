use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::Point;
use crate::board::Board;
use crate::error::GoError;
use crate::handicap;
use crate::scoring::{self, ScoreSheet};
use crate::stone::Stone;

/// Standard compensation added to White's score for moving second.
pub const DEFAULT_KOMI: f64 = 6.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Playing,
    Scoring,
    Resigned,
}

impl Stage {
    pub fn is_play(&self) -> bool {
        matches!(self, Stage::Playing)
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Playing => write!(f, "playing"),
            Stage::Scoring => write!(f, "scoring"),
            Stage::Resigned => write!(f, "resigned"),
        }
    }
}

/// Captured stone tallies indexed by the capturing color.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Captures {
    pub black: u32,
    pub white: u32,
}

impl Captures {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, stone: Stone) -> u32 {
        match stone {
            Stone::Black => self.black,
            Stone::White => self.white,
        }
    }

    fn add(&mut self, stone: Stone, count: u32) {
        match stone {
            Stone::Black => self.black += count,
            Stone::White => self.white += count,
        }
    }
}

/// The most recent stone placement, kept for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LastMove {
    pub point: Point,
    pub stone: Stone,
}

/// Snapshot of everything the presentation layer needs to render.
#[derive(Debug, Serialize)]
pub struct GameState {
    pub board: Vec<i8>,
    pub size: u8,
    pub turn: Stone,
    pub stage: Stage,
    pub captures: Captures,
    pub pass_count: u8,
    pub last_move: Option<LastMove>,
    pub dead: Vec<bool>,
    pub forbidden: Vec<Point>,
    pub score: Option<ScoreSheet>,
    pub status: String,
    pub result: Option<String>,
}

/// A single game session: board, turn state, ko history, dead marks.
///
/// Every public operation is synchronous and atomic: a rejected operation
/// leaves the session untouched.
#[derive(Debug, Clone)]
pub struct Game {
    board: Board,
    turn: Stone,
    stage: Stage,
    pass_count: u8,
    captures: Captures,
    komi: f64,
    last_move: Option<LastMove>,
    /// Board snapshots after every move and pass; the entry from two plies
    /// ago is the simple-ko reference position.
    history: Vec<Vec<i8>>,
    /// Dead marks parallel to the board, meaningful only while scoring.
    dead: Vec<bool>,
    /// Illegal points for the side to move, for UI highlighting.
    forbidden: HashSet<Point>,
    status: String,
    result: Option<String>,
}

impl Game {
    pub fn new(size: u8) -> Self {
        Self::create(size, 0, DEFAULT_KOMI)
    }

    pub fn with_komi(size: u8, komi: f64) -> Self {
        Self::create(size, 0, komi)
    }

    /// Pre-populates Black handicap stones and gives White the first move.
    /// Unsupported sizes or counts leave the board empty.
    pub fn with_handicap(size: u8, handicap: u8) -> Self {
        Self::create(size, handicap, DEFAULT_KOMI)
    }

    fn create(size: u8, handicap: u8, komi: f64) -> Self {
        let board = Board::new(size);
        let mut game = Game {
            history: vec![board.cells().to_vec()],
            dead: vec![false; board.cells().len()],
            board,
            turn: Stone::Black,
            stage: Stage::Playing,
            pass_count: 0,
            captures: Captures::new(),
            komi,
            last_move: None,
            forbidden: HashSet::new(),
            status: String::new(),
            result: None,
        };

        if let Some(points) = handicap::handicap_points(size, handicap) {
            for p in points {
                game.board.set_stone(p, Stone::Black);
            }
            game.turn = Stone::White;
            game.history.push(game.board.cells().to_vec());
        }

        game.status = format!("New game: {} to move.", game.turn);
        game.rebuild_forbidden();
        game
    }

    // -- Accessors --

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn size(&self) -> u8 {
        self.board.size()
    }

    pub fn turn(&self) -> Stone {
        self.turn
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn pass_count(&self) -> u8 {
        self.pass_count
    }

    pub fn captures(&self) -> &Captures {
        &self.captures
    }

    pub fn komi(&self) -> f64 {
        self.komi
    }

    pub fn last_move(&self) -> Option<LastMove> {
        self.last_move
    }

    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn result(&self) -> Option<&str> {
        self.result.as_deref()
    }

    pub fn dead_marks(&self) -> &[bool] {
        &self.dead
    }

    pub fn is_dead(&self, point: Point) -> bool {
        self.board.on_board(point) && self.dead[self.idx(point)]
    }

    // -- Legality --

    /// Pure legality predicate: capture/suicide simulation plus the simple
    /// two-ply ko check. Callable for any point without side effects.
    pub fn is_legal(&self, stone: Stone, point: Point) -> bool {
        match self.board.place(point, stone) {
            Ok((next, _)) => !self.repeats_two_ago(next.cells()),
            Err(_) => false,
        }
    }

    pub fn is_forbidden(&self, point: Point) -> bool {
        self.forbidden.contains(&point)
    }

    pub fn forbidden_points(&self) -> &HashSet<Point> {
        &self.forbidden
    }

    /// Simple ko: only the position from exactly two plies back is compared,
    /// not full positional superko.
    fn repeats_two_ago(&self, cells: &[i8]) -> bool {
        self.history.len() >= 2 && self.history[self.history.len() - 2] == cells
    }

    // -- Game actions --

    pub fn try_play(&mut self, stone: Stone, point: Point) -> Result<Stage, GoError> {
        match self.stage {
            Stage::Resigned => return Err(GoError::GameOver),
            Stage::Scoring => return Err(GoError::ScoringInProgress),
            Stage::Playing => {}
        }
        if stone != self.turn {
            return Err(GoError::OutOfTurn);
        }

        let (next, removed) = self.board.place(point, stone)?;
        if self.repeats_two_ago(next.cells()) {
            return Err(GoError::KoViolation);
        }

        self.board = next;
        self.captures.add(stone, removed.len() as u32);
        self.last_move = Some(LastMove { point, stone });
        self.history.push(self.board.cells().to_vec());
        self.turn = stone.opp();
        self.pass_count = 0;
        self.status = self.move_status(stone, point, removed.len());
        self.rebuild_forbidden();
        Ok(self.stage)
    }

    /// Pass the turn. Two consecutive passes enter scoring; passes while
    /// scoring or after resignation are no-ops rather than errors.
    pub fn pass(&mut self) -> Stage {
        match self.stage {
            Stage::Resigned => return self.stage,
            Stage::Scoring => {
                self.status = "Scoring in progress: pass has no effect.".to_string();
                return self.stage;
            }
            Stage::Playing => {}
        }

        let passer = self.turn;
        self.pass_count += 1;
        self.history.push(self.board.cells().to_vec());
        self.turn = passer.opp();
        self.rebuild_forbidden();

        if self.pass_count >= 2 {
            self.stage = Stage::Scoring;
            let sheet = scoring::score(&self.board, &self.dead, &self.captures, self.komi);
            self.status = format!(
                "Two consecutive passes.\n{}",
                Self::score_summary(&sheet)
            );
        } else {
            self.status = format!("{passer} passed ({}/2 consecutive).", self.pass_count);
        }
        self.stage
    }

    /// The side to move resigns. Terminal: no further moves, passes, or
    /// scoring are accepted.
    pub fn resign(&mut self) -> Stage {
        if self.stage == Stage::Resigned {
            return self.stage;
        }
        let resigner = self.turn;
        self.stage = Stage::Resigned;
        self.result = Some(format!("{}+R", resigner.opp().letter()));
        self.status = format!("{resigner} resigned. Game over.");
        self.stage
    }

    /// Force the session into scoring (or recompute while already scoring).
    /// Ignored after resignation.
    pub fn enter_scoring(&mut self) -> Option<ScoreSheet> {
        if self.stage == Stage::Resigned {
            return None;
        }
        self.stage = Stage::Scoring;
        let sheet = scoring::score(&self.board, &self.dead, &self.captures, self.komi);
        self.status = Self::score_summary(&sheet);
        Some(sheet)
    }

    /// Current score, available only while scoring. Pure over the current
    /// board and dead marks.
    pub fn score(&self) -> Option<ScoreSheet> {
        if self.stage != Stage::Scoring {
            return None;
        }
        Some(scoring::score(&self.board, &self.dead, &self.captures, self.komi))
    }

    /// Flip the dead flag of the whole group at `point`, all members at once.
    /// Only meaningful while scoring; empty points are ignored.
    pub fn toggle_dead(&mut self, point: Point) {
        if self.stage != Stage::Scoring {
            return;
        }
        let Some(group) = self.board.group_at(point) else {
            return;
        };

        let flag = !self.dead[self.idx(group.stones[0])];
        for &p in &group.stones {
            let i = self.idx(p);
            self.dead[i] = flag;
        }

        let sheet = scoring::score(&self.board, &self.dead, &self.captures, self.komi);
        self.status = Self::score_summary(&sheet);
    }

    // -- Snapshot --

    pub fn game_state(&self) -> GameState {
        let mut forbidden: Vec<Point> = self.forbidden.iter().copied().collect();
        forbidden.sort_unstable();

        GameState {
            board: self.board.cells().to_vec(),
            size: self.board.size(),
            turn: self.turn,
            stage: self.stage,
            captures: self.captures.clone(),
            pass_count: self.pass_count,
            last_move: self.last_move,
            dead: self.dead.clone(),
            forbidden,
            score: self.score(),
            status: self.status.clone(),
            result: self.result.clone(),
        }
    }

    // -- Internal helpers --

    fn rebuild_forbidden(&mut self) {
        self.forbidden.clear();
        for point in self.board.empty_points() {
            if !self.is_legal(self.turn, point) {
                self.forbidden.insert(point);
            }
        }
    }

    /// Status line for a committed move, with atari advisories for both
    /// sides. Advisory only, never game state.
    fn move_status(&self, mover: Stone, point: Point, captured: usize) -> String {
        let mut msg = format!(
            "{mover} played ({},{}). {} to move.",
            point.0 + 1,
            point.1 + 1,
            self.turn
        );
        if captured > 0 {
            msg.push_str(&format!(" Captured {captured} stone(s)."));
        }

        let mut opponent_atari = 0;
        let mut own_atari = 0;
        for group in self.board.groups() {
            if group.in_atari() {
                if group.stone == mover {
                    own_atari += 1;
                } else {
                    opponent_atari += 1;
                }
            }
        }
        if opponent_atari > 0 {
            msg.push_str(&format!(
                "\nAtari: {} {} group(s) down to one liberty.",
                opponent_atari,
                mover.opp()
            ));
        }
        if own_atari > 0 {
            msg.push_str(&format!(
                "\nWatch out: {mover} has {own_atari} group(s) in atari."
            ));
        }
        msg
    }

    fn score_summary(sheet: &ScoreSheet) -> String {
        format!(
            "Scoring: click a group to toggle it dead or alive.\n\
             Black: territory {} + captures {} = {}\n\
             White: territory {} + captures {} + komi {} = {}\n\
             Result: {}",
            sheet.black.territory,
            sheet.black.captures,
            sheet.black_total(),
            sheet.white.territory,
            sheet.white.captures,
            sheet.komi,
            sheet.white_total(),
            sheet.result()
        )
    }

    #[inline]
    fn idx(&self, (col, row): Point) -> usize {
        row as usize * self.board.size() as usize + col as usize
    }

    /// Test-only constructor from a prepared position.
    #[cfg(test)]
    pub(crate) fn from_board(board: Board, turn: Stone) -> Self {
        let mut game = Game {
            history: vec![board.cells().to_vec()],
            dead: vec![false; board.cells().len()],
            board,
            turn,
            stage: Stage::Playing,
            pass_count: 0,
            captures: Captures::new(),
            komi: DEFAULT_KOMI,
            last_move: None,
            forbidden: HashSet::new(),
            status: String::new(),
            result: None,
        };
        game.rebuild_forbidden();
        game
    }
}
