//! Line of sight over the board: walk from a square in one direction until
//! something is in the way or the board ends.

use tracing::trace;

use crate::chess::board::Board;
use crate::chess::core::{Direction, Piece, Player, Square};

/// The first occupied square met by a scan.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Blocker {
    #[allow(missing_docs)]
    pub square: Square,
    #[allow(missing_docs)]
    pub piece: Piece,
}

/// Outcome of [`scan`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScanResult {
    /// Steps to the blocker if there is one. Otherwise, the number of empty
    /// squares walked before reaching either the maximum distance or the edge
    /// of the board.
    pub distance: u8,
    /// The piece that stopped the scan.
    pub blocker: Option<Blocker>,
}

impl ScanResult {
    /// Whether the scan stopped at an occupied square.
    #[must_use]
    pub const fn is_blocked(&self) -> bool {
        self.blocker.is_some()
    }

    /// Owner of the blocking piece.
    #[must_use]
    pub fn blocker_color(&self) -> Option<Player> {
        self.blocker.map(|blocker| blocker.piece.owner)
    }
}

/// Walks `origin + k * direction` for `k = 1..=max_distance` and stops at the
/// first occupied square. The origin itself is never considered, so the
/// scanning piece does not block its own sight.
///
/// ```
/// use sightline::chess::board::Board;
/// use sightline::chess::core::{Direction, Square};
/// use sightline::chess::scan::scan;
///
/// let board = Board::starting();
/// let ray = scan(&board, Square::E2, Direction::Up, 7);
/// assert!(ray.is_blocked());
/// assert_eq!(ray.distance, 5);
/// assert_eq!(ray.blocker.unwrap().square, Square::E7);
///
/// let ray = scan(&board, Square::E2, Direction::Up, 2);
/// assert!(!ray.is_blocked());
/// assert_eq!(ray.distance, 2);
/// ```
#[must_use]
pub fn scan(board: &Board, origin: Square, direction: Direction, max_distance: u8) -> ScanResult {
    let step = direction.offset();
    let mut current = origin;
    let mut distance = 0;
    let mut blocker = None;
    while distance < max_distance {
        let Some(next) = current.shift(step) else {
            break;
        };
        distance += 1;
        if let Some(piece) = board.at(next) {
            blocker = Some(Blocker {
                square: next,
                piece,
            });
            break;
        }
        current = next;
    }
    trace!(%origin, ?direction, distance, ?blocker, "scanned");
    ScanResult { distance, blocker }
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::chess::core::PieceKind;

    #[test]
    fn empty_board_reaches_the_edge() {
        let board = Board::empty();
        for (direction, expected) in [
            (Direction::Up, 3),
            (Direction::Down, 4),
            (Direction::Left, 4),
            (Direction::Right, 3),
            (Direction::UpRight, 3),
            (Direction::UpLeft, 3),
            (Direction::DownRight, 3),
            (Direction::DownLeft, 4),
        ] {
            assert_eq!(
                scan(&board, Square::E5, direction, 7),
                ScanResult {
                    distance: expected,
                    blocker: None
                },
                "{direction:?}"
            );
        }
        assert_eq!(scan(&board, Square::A1, Direction::Left, 7).distance, 0);
        assert_eq!(scan(&board, Square::A1, Direction::UpRight, 7).distance, 7);
    }

    #[test]
    fn max_distance_limits_the_walk() {
        let board = Board::empty();
        assert_eq!(scan(&board, Square::A1, Direction::Up, 1).distance, 1);
        assert_eq!(scan(&board, Square::A1, Direction::Up, 0).distance, 0);
        assert!(!scan(&board, Square::A1, Direction::Up, 5).is_blocked());
    }

    #[test]
    fn stops_at_the_first_piece() {
        let mut board = Board::empty();
        let rook = Piece::new(Player::Black, PieceKind::Rook);
        board.place(Square::E7, rook);
        board.place(Square::E8, Piece::new(Player::Black, PieceKind::King));
        let ray = scan(&board, Square::E2, Direction::Up, 7);
        assert_eq!(ray.distance, 5);
        assert_eq!(
            ray.blocker,
            Some(Blocker {
                square: Square::E7,
                piece: rook
            })
        );
        assert_eq!(ray.blocker_color(), Some(Player::Black));
        // The blocker is out of reach.
        let ray = scan(&board, Square::E2, Direction::Up, 4);
        assert_eq!(ray.distance, 4);
        assert_eq!(ray.blocker_color(), None);
        // Adjacent piece.
        let ray = scan(&board, Square::E6, Direction::Up, 7);
        assert_eq!(ray.distance, 1);
        assert!(ray.is_blocked());
    }

    #[test]
    fn never_mutates_the_board() {
        let board = Board::starting();
        let copy = board.clone();
        for direction in Direction::ALL {
            let _ = scan(&board, Square::D4, direction, 7);
        }
        assert_eq!(board, copy);
    }
}
