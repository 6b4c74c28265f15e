use arrayvec::ArrayVec;

use crate::Point;
use crate::error::GoError;
use crate::stone::Stone;

/// A maximal 4-connected set of same-colored stones and its liberties.
///
/// Derived on demand by flood fill; never stored on the board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group {
    pub stone: Stone,
    pub stones: Vec<Point>,
    pub liberties: Vec<Point>,
}

impl Group {
    /// A group with exactly one liberty is in atari.
    pub fn in_atari(&self) -> bool {
        self.liberties.len() == 1
    }
}

/// Square Go board stored as a flat array of i8 cells (0 = empty).
///
/// Pure data plus analysis: captures, ko history and turn state live on the
/// session object, so a `Board` can be cloned freely for simulate-then-commit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    cells: Vec<i8>,
    size: u8,
}

impl Board {
    /// Create an empty `size` x `size` board.
    pub fn new(size: u8) -> Self {
        Board {
            cells: vec![0i8; size as usize * size as usize],
            size,
        }
    }

    /// Build a board from a matrix of i8 values (rows of equal length).
    pub fn from_matrix(matrix: Vec<Vec<i8>>) -> Self {
        let size = matrix.len() as u8;
        assert!(
            matrix.iter().all(|row| row.len() == size as usize),
            "malformed board matrix"
        );
        Board {
            cells: matrix.into_iter().flatten().collect(),
            size,
        }
    }

    // -- Accessors --

    pub fn cells(&self) -> &[i8] {
        &self.cells
    }

    pub fn size(&self) -> u8 {
        self.size
    }

    pub fn on_board(&self, (col, row): Point) -> bool {
        col < self.size && row < self.size
    }

    pub fn stone_at(&self, point: Point) -> Option<Stone> {
        if self.on_board(point) {
            Stone::from_int(self.cells[self.idx(point)])
        } else {
            None
        }
    }

    pub fn is_empty(&self) -> bool {
        self.cells.iter().all(|&c| c == 0)
    }

    /// All empty points, row-major.
    pub fn empty_points(&self) -> Vec<Point> {
        let mut pts = Vec::new();
        for row in 0..self.size {
            for col in 0..self.size {
                if self.cells[self.idx((col, row))] == 0 {
                    pts.push((col, row));
                }
            }
        }
        pts
    }

    // -- Mutation (session-internal) --

    pub(crate) fn set_stone(&mut self, point: Point, stone: Stone) {
        if self.on_board(point) {
            let i = self.idx(point);
            self.cells[i] = stone.to_int();
        }
    }

    fn clear_stone(&mut self, point: Point) {
        if self.on_board(point) {
            let i = self.idx(point);
            self.cells[i] = 0;
        }
    }

    // -- Group analysis --

    /// The 4-connected neighbors that are on the board.
    pub fn neighbors(&self, (col, row): Point) -> ArrayVec<Point, 4> {
        let mut result = ArrayVec::new();
        if col > 0 {
            result.push((col - 1, row));
        }
        if col + 1 < self.size {
            result.push((col + 1, row));
        }
        if row > 0 {
            result.push((col, row - 1));
        }
        if row + 1 < self.size {
            result.push((col, row + 1));
        }
        result
    }

    /// Flood-fill the group containing `point` together with its liberties.
    ///
    /// Returns `None` when the point is empty or off the board. Every member
    /// is visited exactly once; liberties are deduplicated.
    pub fn group_at(&self, point: Point) -> Option<Group> {
        let stone = self.stone_at(point)?;
        let mut visited = vec![false; self.cells.len()];
        let stones = self.chain_from(point, &mut visited);
        let liberties = self.chain_liberties(&stones);
        Some(Group {
            stone,
            stones,
            liberties,
        })
    }

    /// Every maximal group on the board, each computed once.
    pub fn groups(&self) -> Vec<Group> {
        let mut visited = vec![false; self.cells.len()];
        let mut groups = Vec::new();
        for row in 0..self.size {
            for col in 0..self.size {
                let p = (col, row);
                if visited[self.idx(p)] {
                    continue;
                }
                let Some(stone) = self.stone_at(p) else {
                    continue;
                };
                let stones = self.chain_from(p, &mut visited);
                let liberties = self.chain_liberties(&stones);
                groups.push(Group {
                    stone,
                    stones,
                    liberties,
                });
            }
        }
        groups
    }

    /// Chain flood-fill using a shared visited bitset.
    fn chain_from(&self, point: Point, visited: &mut [bool]) -> Vec<Point> {
        let stone = match self.stone_at(point) {
            Some(s) => s,
            None => return Vec::new(),
        };

        let mut result = Vec::new();
        let mut stack = vec![point];

        while let Some(p) = stack.pop() {
            let vi = self.idx(p);
            if visited[vi] {
                continue;
            }
            visited[vi] = true;
            result.push(p);
            for n in self.neighbors(p) {
                if self.stone_at(n) == Some(stone) && !visited[self.idx(n)] {
                    stack.push(n);
                }
            }
        }

        result
    }

    /// Deduplicated liberties of a pre-computed chain.
    pub fn chain_liberties(&self, chain: &[Point]) -> Vec<Point> {
        let mut seen = vec![false; self.cells.len()];
        let mut libs = Vec::new();
        for &p in chain {
            for n in self.neighbors(p) {
                let ni = self.idx(n);
                if !seen[ni] && self.stone_at(n).is_none() {
                    seen[ni] = true;
                    libs.push(n);
                }
            }
        }
        libs
    }

    /// Distinct opponent chains adjacent to `point`.
    fn opponent_neighbor_chains(&self, point: Point) -> Vec<Vec<Point>> {
        let stone = match self.stone_at(point) {
            Some(s) => s,
            None => return Vec::new(),
        };
        let opponent = stone.opp();

        let mut chains = Vec::new();
        let mut visited = vec![false; self.cells.len()];

        for n in self.neighbors(point) {
            if self.stone_at(n) != Some(opponent) || visited[self.idx(n)] {
                continue;
            }
            let ch = self.chain_from(n, &mut visited);
            if !ch.is_empty() {
                chains.push(ch);
            }
        }

        chains
    }

    // -- Capture simulation --

    /// Simulate placing `stone` at `point`: resolve captures, check suicide.
    ///
    /// Returns the resulting board and the removed opponent stones. Ko is not
    /// checked here; the session compares the result against its position
    /// history. Never mutates `self`.
    pub fn place(&self, point: Point, stone: Stone) -> Result<(Board, Vec<Point>), GoError> {
        if !self.on_board(point) {
            return Err(GoError::NotOnBoard);
        }
        if self.stone_at(point).is_some() {
            return Err(GoError::Occupied);
        }

        let mut next = self.clone();
        next.set_stone(point, stone);

        let mut removed = Vec::new();
        for chain in next.opponent_neighbor_chains(point) {
            if next.chain_liberties(&chain).is_empty() {
                removed.extend(chain);
            }
        }
        for &p in &removed {
            next.clear_stone(p);
        }

        // Suicide: the placed group ends with no liberties and nothing was captured
        if removed.is_empty() && next.chain_liberties(&next.chain_only(point)).is_empty() {
            return Err(GoError::Suicide);
        }

        Ok((next, removed))
    }

    fn chain_only(&self, point: Point) -> Vec<Point> {
        let mut visited = vec![false; self.cells.len()];
        self.chain_from(point, &mut visited)
    }

    #[inline]
    fn idx(&self, (col, row): Point) -> usize {
        row as usize * self.size as usize + col as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Test helper: build a board from an ASCII layout.
    /// 'B' = Black, 'W' = White, anything else = empty.
    fn board_from_layout(layout: &[&str]) -> Board {
        let matrix: Vec<Vec<i8>> = layout
            .iter()
            .map(|row| {
                row.chars()
                    .map(|c| match c {
                        'B' => Stone::Black.to_int(),
                        'W' => Stone::White.to_int(),
                        _ => 0,
                    })
                    .collect()
            })
            .collect();
        Board::from_matrix(matrix)
    }

    #[test]
    fn creates_empty_board() {
        let board = Board::new(9);
        assert!(board.is_empty());
        assert_eq!(board.size(), 9);
        assert_eq!(board.cells().len(), 81);
    }

    #[test]
    #[should_panic(expected = "malformed")]
    fn rejects_malformed_matrix() {
        Board::from_matrix(vec![vec![0], vec![0, 0]]);
    }

    #[test]
    fn on_board_check() {
        let board = Board::new(4);
        assert!(board.on_board((0, 0)));
        assert!(board.on_board((3, 3)));
        assert!(!board.on_board((4, 0)));
        assert!(!board.on_board((0, 4)));
    }

    #[test]
    fn neighbors_clip_at_edges() {
        let board = Board::new(4);
        assert_eq!(board.neighbors((0, 0)).len(), 2);
        assert_eq!(board.neighbors((3, 0)).len(), 2);
        assert_eq!(board.neighbors((1, 0)).len(), 3);
        assert_eq!(board.neighbors((1, 1)).len(), 4);
    }

    #[test]
    fn group_at_empty_is_none() {
        let board = Board::new(4);
        assert!(board.group_at((1, 1)).is_none());
        assert!(board.group_at((9, 9)).is_none());
    }

    #[test]
    fn single_stone_group() {
        let board = board_from_layout(&["++++", "+B++", "++++", "++++"]);
        let g = board.group_at((1, 1)).unwrap();
        assert_eq!(g.stone, Stone::Black);
        assert_eq!(g.stones, vec![(1, 1)]);
        assert_eq!(g.liberties.len(), 4);
    }

    #[test]
    fn connected_group_members_once() {
        let board = board_from_layout(&["BB++", "BB++", "++++", "++++"]);
        let g = board.group_at((0, 0)).unwrap();
        assert_eq!(g.stones.len(), 4);
        // no duplicates
        let mut sorted = g.stones.clone();
        sorted.sort();
        sorted.dedup();
        assert_eq!(sorted.len(), 4);
        assert_eq!(g.liberties.len(), 4);
    }

    #[test]
    fn liberties_deduplicated_and_adjacent() {
        let board = board_from_layout(&["B+B+", "++++", "++++", "++++"]);
        // two separate single-stone groups share the liberty at (1,0)
        let g = board.group_at((0, 0)).unwrap();
        assert_eq!(g.stones.len(), 1);
        for &lib in &g.liberties {
            assert!(board.stone_at(lib).is_none());
            assert!(g.stones.iter().any(|&s| board.neighbors(s).contains(&lib)));
        }
    }

    #[test]
    fn diagonal_stones_are_separate_groups() {
        let board = board_from_layout(&["B+++", "+B++", "++++", "++++"]);
        assert_eq!(board.group_at((0, 0)).unwrap().stones.len(), 1);
        assert_eq!(board.group_at((1, 1)).unwrap().stones.len(), 1);
    }

    #[test]
    fn groups_enumerates_all_once() {
        let board = board_from_layout(&["BB+W", "+++W", "++++", "+B++"]);
        let groups = board.groups();
        assert_eq!(groups.len(), 3);
        let total: usize = groups.iter().map(|g| g.stones.len()).sum();
        assert_eq!(total, 5);
    }

    #[test]
    fn atari_detection() {
        let board = board_from_layout(&["BW++", "++++", "++++", "++++"]);
        let g = board.group_at((0, 0)).unwrap();
        assert_eq!(g.liberties, vec![(0, 1)]);
        assert!(g.in_atari());
        assert!(!board.group_at((1, 0)).unwrap().in_atari());
    }

    #[test]
    fn place_rejects_off_board() {
        let board = Board::new(4);
        assert_eq!(
            board.place((4, 0), Stone::Black),
            Err(GoError::NotOnBoard)
        );
    }

    #[test]
    fn place_rejects_occupied() {
        let board = board_from_layout(&["B+++", "++++", "++++", "++++"]);
        assert_eq!(board.place((0, 0), Stone::White), Err(GoError::Occupied));
    }

    #[test]
    fn place_rejects_suicide() {
        let board = board_from_layout(&["+B++", "B+++", "++++", "++++"]);
        assert_eq!(board.place((0, 0), Stone::White), Err(GoError::Suicide));
    }

    #[test]
    fn place_allows_capture_on_last_liberty() {
        // White stone at (1,1) surrounded except (1,2); Black takes it
        let board = board_from_layout(&["+B++", "BWB+", "++++", "++++"]);
        let (next, removed) = board.place((1, 2), Stone::Black).unwrap();
        assert_eq!(removed, vec![(1, 1)]);
        assert_eq!(next.stone_at((1, 1)), None);
        assert_eq!(next.stone_at((1, 2)), Some(Stone::Black));
    }

    #[test]
    fn place_captures_whole_chain() {
        // white chain (1,1)-(1,2) has its last liberty at (1,3)
        let board = board_from_layout(&["+B++", "BWB+", "BWB+", "++++"]);
        let (next, removed) = board.place((1, 3), Stone::Black).unwrap();
        assert_eq!(removed.len(), 2);
        assert!(removed.contains(&(1, 1)));
        assert!(removed.contains(&(1, 2)));
        assert_eq!(next.stone_at((1, 1)), None);
        assert_eq!(next.stone_at((1, 2)), None);
        assert_eq!(next.stone_at((1, 3)), Some(Stone::Black));
    }

    #[test]
    fn capture_beats_suicide() {
        // Filling the surrounded white chain's last liberty is legal because it captures
        let board = board_from_layout(&["+BBB", "BWWB", "BW+B", "BBBB"]);
        let (next, removed) = board.place((2, 2), Stone::Black).unwrap();
        assert_eq!(removed.len(), 3);
        assert_eq!(next.stone_at((2, 2)), Some(Stone::Black));
    }

    #[test]
    fn place_does_not_mutate_original() {
        let board = board_from_layout(&["+B++", "BWB+", "++++", "++++"]);
        let before = board.cells().to_vec();
        let _ = board.place((1, 2), Stone::Black).unwrap();
        assert_eq!(board.cells(), &before[..]);
    }

    #[test]
    fn empty_points_count() {
        let board = board_from_layout(&["B+++", "++++", "++++", "+++W"]);
        assert_eq!(board.empty_points().len(), 14);
    }
}
