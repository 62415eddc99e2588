//! Pseudo-legal move generation for a single selected piece.
//!
//! Every piece kind has its own rule. Sliding pieces, the king and pawn pushes
//! look along their lines with [`scan`] and stop at the first piece in the way:
//! an opponent's piece can be captured, an own piece cannot. Knights test
//! their eight landing squares directly. Castling and en passant are resolved
//! in [`crate::chess::special`].
//!
//! The candidates are **pseudo-legal**: whether the move leaves the mover's
//! own king in check is not verified.

use tracing::debug;

use crate::chess::board::Board;
use crate::chess::core::{Direction, Offset, Piece, PieceKind, Rank, Square};
use crate::chess::error::Error;
use crate::chess::moves::{MoveAttributes, MoveSet};
use crate::chess::scan::scan;
use crate::chess::special;

/// Longest possible line on the board.
pub const BOARD_SPAN: u8 = 7;
/// King steps and pushes of a pawn that has already moved.
pub const SINGLE_STEP: u8 = 1;
/// First push of a pawn.
pub const DOUBLE_STEP: u8 = 2;
/// How far along each forward diagonal a pawn looks for something to capture.
///
/// NOTE: This is one square farther than chess allows. An opponent's piece
/// two squares away diagonally still makes the adjacent diagonal square a
/// candidate, even when that square is empty.
pub const PAWN_CAPTURE_REACH: u8 = 2;
/// Farthest a rook can start from the king on the backrank.
pub const CASTLE_REACH: u8 = 5;

const KNIGHT_JUMPS: [Offset; 8] = [
    Offset::new(2, 1),
    Offset::new(2, -1),
    Offset::new(-2, 1),
    Offset::new(-2, -1),
    Offset::new(1, 2),
    Offset::new(1, -2),
    Offset::new(-1, 2),
    Offset::new(-1, -2),
];

/// Produces the candidates of the piece standing on `from`.
///
/// ```
/// use sightline::chess::board::Board;
/// use sightline::chess::core::{Offset, Square};
/// use sightline::generate_moves;
///
/// let moves = generate_moves(&Board::starting(), Square::E2).unwrap();
/// assert_eq!(
///     moves.offsets().collect::<Vec<_>>(),
///     vec![Offset::new(0, 1), Offset::new(0, 2)]
/// );
/// ```
///
/// # Errors
///
/// Returns [`Error::EmptySelection`] if there is no piece on `from`.
pub fn generate_moves(board: &Board, from: Square) -> Result<MoveSet, Error> {
    let mut moves = MoveSet::new();
    generate_moves_into(board, from, &mut moves)?;
    Ok(moves)
}

/// Same as [`generate_moves`] but fills a buffer owned by the caller. The
/// buffer is cleared first, even when there is nothing to select: candidates of
/// a previous selection never leak into the next one.
///
/// # Errors
///
/// Returns [`Error::EmptySelection`] if there is no piece on `from`.
pub fn generate_moves_into(board: &Board, from: Square, moves: &mut MoveSet) -> Result<(), Error> {
    moves.clear();
    let piece = board.at(from).ok_or(Error::EmptySelection(from))?;
    match piece.kind {
        PieceKind::Pawn => pawn_moves(board, from, piece, moves),
        PieceKind::Knight => knight_moves(board, from, piece, moves),
        PieceKind::Bishop => {
            sliding_moves(board, from, piece, &Direction::DIAGONAL, BOARD_SPAN, moves);
        },
        PieceKind::Rook => {
            sliding_moves(board, from, piece, &Direction::ORTHOGONAL, BOARD_SPAN, moves);
        },
        PieceKind::Queen => {
            sliding_moves(board, from, piece, &Direction::ALL, BOARD_SPAN, moves);
        },
        PieceKind::King => king_moves(board, from, piece, moves),
    }
    debug!(%from, %piece, candidates = moves.len(), "generated moves");
    Ok(())
}

/// Walks each direction up to `reach` squares. Every empty square is a
/// candidate; the blocking square is one too if it holds an opponent's piece.
fn sliding_moves(
    board: &Board,
    from: Square,
    piece: Piece,
    directions: &[Direction],
    reach: u8,
    moves: &mut MoveSet,
) {
    for &direction in directions {
        let ray = scan(board, from, direction, reach);
        let capture = ray.blocker_color().is_some_and(|owner| owner != piece.owner);
        let free = if ray.is_blocked() {
            ray.distance - 1
        } else {
            ray.distance
        };
        for step in 1..=free {
            moves.push(direction.offset() * step, MoveAttributes::empty());
        }
        if capture {
            moves.push(direction.offset() * ray.distance, MoveAttributes::CAPTURE);
        }
    }
}

fn king_moves(board: &Board, from: Square, king: Piece, moves: &mut MoveSet) {
    sliding_moves(board, from, king, &Direction::ALL, SINGLE_STEP, moves);
    for castle in special::castling(board, from, king) {
        moves.push(castle, MoveAttributes::CASTLE);
    }
}

fn knight_moves(board: &Board, from: Square, knight: Piece, moves: &mut MoveSet) {
    for jump in KNIGHT_JUMPS {
        let Some(to) = from.shift(jump) else {
            continue;
        };
        match board.at(to) {
            None => moves.push(jump, MoveAttributes::empty()),
            Some(target) if target.owner != knight.owner => {
                moves.push(jump, MoveAttributes::CAPTURE);
            },
            Some(_) => {},
        }
    }
}

fn pawn_moves(board: &Board, from: Square, pawn: Piece, moves: &mut MoveSet) {
    let promotion_rank = Rank::backrank(pawn.owner.opponent());
    let promotes = |offset: Offset| {
        if from.shift(offset).is_some_and(|to| to.rank() == promotion_rank) {
            MoveAttributes::PROMOTION
        } else {
            MoveAttributes::empty()
        }
    };

    // Pushes never capture: stop right before whatever is in front.
    let forward = pawn.owner.push_direction();
    let reach = if pawn.has_moved {
        SINGLE_STEP
    } else {
        DOUBLE_STEP
    };
    let ray = scan(board, from, forward, reach);
    let free = if ray.is_blocked() {
        ray.distance - 1
    } else {
        ray.distance
    };
    for step in 1..=free {
        let offset = forward.offset() * step;
        let mut attributes = promotes(offset);
        if step == DOUBLE_STEP {
            attributes |= MoveAttributes::DOUBLE_PAWN_PUSH;
        }
        moves.push(offset, attributes);
    }

    for diagonal in pawn.owner.capture_directions() {
        let ray = scan(board, from, diagonal, PAWN_CAPTURE_REACH);
        if !ray.blocker_color().is_some_and(|owner| owner != pawn.owner) {
            continue;
        }
        let offset = diagonal.offset();
        let mut attributes = promotes(offset);
        if from.shift(offset).and_then(|to| board.at(to)).is_some() {
            attributes |= MoveAttributes::CAPTURE;
        }
        moves.push(offset, attributes);
    }

    if let Some(offset) = special::en_passant(board, from, pawn) {
        moves.push(offset, MoveAttributes::CAPTURE | MoveAttributes::EN_PASSANT);
    }
}
