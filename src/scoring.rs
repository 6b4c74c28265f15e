use serde::Serialize;

use crate::Point;
use crate::board::Board;
use crate::engine::Captures;
use crate::stone::Stone;

/// Per-color score breakdown: territory (empty points) and captures
/// (prisoners plus the opponent's dead stones).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PlayerPoints {
    pub territory: u32,
    pub captures: u32,
}

impl PlayerPoints {
    pub fn total(&self) -> u32 {
        self.territory + self.captures
    }
}

/// Full score for both players plus the per-point ownership map.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreSheet {
    pub black: PlayerPoints,
    pub white: PlayerPoints,
    pub komi: f64,
    /// Same layout as `Board::cells()`: `1` Black territory, `-1` White, `0` neutral.
    pub ownership: Vec<i8>,
}

impl ScoreSheet {
    pub fn black_total(&self) -> f64 {
        self.black.total() as f64
    }

    /// White's total includes komi.
    pub fn white_total(&self) -> f64 {
        self.white.total() as f64 + self.komi
    }

    /// Result string: "B+{diff}", "W+{diff}", or "Draw".
    pub fn result(&self) -> String {
        let diff = self.black_total() - self.white_total();
        if diff > 0.0 {
            format!("B+{}", diff)
        } else if diff < 0.0 {
            format!("W+{}", -diff)
        } else {
            "Draw".to_string()
        }
    }
}

/// Territory ownership for every point, with dead stones treated as empty.
///
/// Flood-fills each maximal empty region of the working board; a region
/// bordered by exactly one color is that color's territory, otherwise dame.
pub fn territory(board: &Board, dead: &[bool]) -> Vec<i8> {
    let size = board.size();
    let len = size as usize * size as usize;

    // Working board with dead stones blanked out
    let mut working = board.cells().to_vec();
    for (i, cell) in working.iter_mut().enumerate() {
        if dead.get(i).copied().unwrap_or(false) {
            *cell = 0;
        }
    }

    let mut ownership = vec![0i8; len];
    let mut visited = vec![false; len];

    for row in 0..size {
        for col in 0..size {
            let idx = row as usize * size as usize + col as usize;
            if visited[idx] || working[idx] != 0 {
                continue;
            }

            let mut region = Vec::new();
            let mut border_colors: u8 = 0; // bit 0 = Black seen, bit 1 = White seen
            let mut stack: Vec<Point> = vec![(col, row)];

            while let Some(p) = stack.pop() {
                let pi = p.1 as usize * size as usize + p.0 as usize;
                if visited[pi] {
                    continue;
                }
                visited[pi] = true;
                region.push(pi);

                for n in board.neighbors(p) {
                    let ni = n.1 as usize * size as usize + n.0 as usize;
                    if visited[ni] {
                        continue;
                    }
                    match working[ni].signum() {
                        1 => border_colors |= 1,
                        -1 => border_colors |= 2,
                        _ => stack.push(n),
                    }
                }
            }

            let owner = match border_colors {
                1 => 1i8,
                2 => -1i8,
                _ => 0i8,
            };
            for &pi in &region {
                ownership[pi] = owner;
            }
        }
    }

    ownership
}

/// Compute the final score from the current position and dead marks.
///
/// Japanese-style: score = territory + prisoners + opponent's dead stones,
/// with komi added to White. Pure over its inputs, so re-invocable after
/// every dead-group toggle.
pub fn score(board: &Board, dead: &[bool], captures: &Captures, komi: f64) -> ScoreSheet {
    let ownership = territory(board, dead);

    let mut black_territory: u32 = 0;
    let mut white_territory: u32 = 0;
    for &o in &ownership {
        match o {
            1 => black_territory += 1,
            -1 => white_territory += 1,
            _ => {}
        }
    }

    let mut dead_black: u32 = 0;
    let mut dead_white: u32 = 0;
    for (i, &cell) in board.cells().iter().enumerate() {
        if !dead.get(i).copied().unwrap_or(false) {
            continue;
        }
        match Stone::from_int(cell) {
            Some(Stone::Black) => dead_black += 1,
            Some(Stone::White) => dead_white += 1,
            None => {}
        }
    }

    ScoreSheet {
        black: PlayerPoints {
            territory: black_territory,
            captures: captures.get(Stone::Black) + dead_white,
        },
        white: PlayerPoints {
            territory: white_territory,
            captures: captures.get(Stone::White) + dead_black,
        },
        komi,
        ownership,
    }
}
