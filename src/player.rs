use crate::Point;
use crate::engine::Game;
use crate::stone::Stone;

/// Weight per captured opponent stone: any capture outranks any quiet move.
const CAPTURE_WEIGHT: f64 = 100.0;
/// Penalty when the move would leave the mover's own group in atari.
const SELF_ATARI_PENALTY: f64 = 8.0;

/// Greedy one-ply opponent: rank every legal point by immediate captures
/// and self-atari risk, with a random tie-break. No look-ahead.
#[derive(Debug)]
pub struct HeuristicPlayer {
    rng: fastrand::Rng,
}

impl HeuristicPlayer {
    pub fn new() -> Self {
        Self {
            rng: fastrand::Rng::new(),
        }
    }

    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: fastrand::Rng::with_seed(seed),
        }
    }

    /// The best candidate point for `stone`, or `None` to pass when no
    /// legal move exists.
    pub fn choose_move(&mut self, game: &Game, stone: Stone) -> Option<Point> {
        let mut best: Option<(f64, Point)> = None;

        for point in game.board().empty_points() {
            if !game.is_legal(stone, point) {
                continue;
            }
            let Ok((next, removed)) = game.board().place(point, stone) else {
                continue;
            };

            let captured = removed.len() as f64;
            let self_atari = next.group_at(point).is_some_and(|g| g.in_atari());
            let risk = if self_atari { SELF_ATARI_PENALTY } else { 0.0 };
            let score = captured * CAPTURE_WEIGHT - risk + self.rng.f64();

            if best.is_none_or(|(b, _)| score > b) {
                best = Some((score, point));
            }
        }

        best.map(|(_, point)| point)
    }
}

impl Default for HeuristicPlayer {
    fn default() -> Self {
        Self::new()
    }
}
