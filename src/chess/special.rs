//! Moves that depend on more than the piece pattern: [castling] needs the
//! history of the king and the rook, [en passant] needs the last move.
//!
//! Neither of them checks whether the king is in check or passes through an
//! attacked square: the candidates are pseudo-legal.
//!
//! [castling]: https://www.chessprogramming.org/Castling
//! [en passant]: https://www.chessprogramming.org/En_passant

use arrayvec::ArrayVec;
use tracing::debug;

use crate::chess::board::Board;
use crate::chess::core::{Direction, Offset, Piece, PieceKind, Rank, Square};
use crate::chess::movegen::CASTLE_REACH;
use crate::chess::scan::scan;

/// The king always moves two squares towards the rook when castling.
const CASTLE_STEPS: u8 = 2;

/// Offsets of the castles available to the `king` standing on `from`:
/// h-side first, then a-side.
///
/// A side is available when the king has never moved and the first piece met
/// towards that side within [`CASTLE_REACH`] squares is a rook of the same
/// color that has never moved either. The rook's distance does not matter:
/// with the rook one or two squares away the king lands on or past it. Only a
/// destination off the board drops the castle.
#[must_use]
pub fn castling(board: &Board, from: Square, king: Piece) -> ArrayVec<Offset, 2> {
    let mut castles = ArrayVec::new();
    if king.kind != PieceKind::King || king.has_moved {
        return castles;
    }
    for direction in [Direction::Right, Direction::Left] {
        let castle = direction.offset() * CASTLE_STEPS;
        if from.shift(castle).is_none() {
            continue;
        }
        let ray = scan(board, from, direction, CASTLE_REACH);
        let Some(rook) = ray.blocker else {
            continue;
        };
        let eligible = rook.piece.kind == PieceKind::Rook
            && rook.piece.owner == king.owner
            && !rook.piece.has_moved;
        debug!(%from, rook = %rook.square, eligible, "castling");
        if eligible {
            castles.push(castle);
        }
    }
    castles
}

/// The square of the pawn that skipped over `target` with a double push.
#[must_use]
pub fn en_passant_victim(target: Square) -> Option<Square> {
    match target.rank() {
        Rank::Three => Some(Square::new(target.file(), Rank::Four)),
        Rank::Six => Some(Square::new(target.file(), Rank::Five)),
        _ => None,
    }
}

/// Offset of the en passant capture available to the `pawn` standing on
/// `from`, if any.
///
/// The capture needs the board's en passant target to be diagonally in front
/// of the pawn and an opponent's pawn flagged as
/// [`Piece::en_passant_eligible`] right beside it.
#[must_use]
pub fn en_passant(board: &Board, from: Square, pawn: Piece) -> Option<Offset> {
    if pawn.kind != PieceKind::Pawn {
        return None;
    }
    let target = board.en_passant_target()?;
    let offset = target - from;
    if offset.dy != pawn.owner.push_direction().offset().dy || offset.dx.abs() != 1 {
        return None;
    }
    let victim_square = en_passant_victim(target)?;
    if victim_square.rank() != from.rank() || board.at(target).is_some() {
        return None;
    }
    let victim = board.at(victim_square)?;
    let eligible = victim.kind == PieceKind::Pawn
        && victim.owner != pawn.owner
        && victim.en_passant_eligible;
    debug!(%from, %target, eligible, "en passant");
    eligible.then_some(offset)
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::chess::core::Player;

    fn setup(diagram: &str) -> Board {
        Board::try_from(diagram).unwrap()
    }

    fn king(board: &Board, square: Square) -> ArrayVec<Offset, 2> {
        castling(board, square, board.at(square).unwrap())
    }

    #[test]
    fn both_sides() {
        let board = setup("r...k..r/......../......../......../......../......../......../R...K..R");
        assert_eq!(
            king(&board, Square::E1).as_slice(),
            &[Offset::new(2, 0), Offset::new(-2, 0)]
        );
        assert_eq!(
            king(&board, Square::E8).as_slice(),
            &[Offset::new(2, 0), Offset::new(-2, 0)]
        );
    }

    #[test]
    fn blocked_path() {
        let board = setup("rn..k.Nr/......../......../......../......../......../......../R..QKB.R");
        assert!(king(&board, Square::E1).is_empty());
        // Knights are in the way on both sides, own and opponent's alike.
        assert!(king(&board, Square::E8).is_empty());
    }

    #[test]
    fn moved_pieces() {
        let mut board = setup("....k.../......../......../......../......../......../......../R...K..R");
        board.mark_moved(Square::H1).unwrap();
        assert_eq!(king(&board, Square::E1).as_slice(), &[Offset::new(-2, 0)]);
        board.mark_moved(Square::E1).unwrap();
        assert!(king(&board, Square::E1).is_empty());
    }

    #[test]
    fn opponent_rook() {
        let mut board = Board::empty();
        board.place(Square::E1, Piece::new(Player::White, PieceKind::King));
        board.place(Square::H1, Piece::new(Player::Black, PieceKind::Rook));
        assert!(king(&board, Square::E1).is_empty());
    }

    #[test]
    fn rook_out_of_reach() {
        let mut board = Board::empty();
        board.place(Square::B1, Piece::new(Player::White, PieceKind::King));
        board.place(Square::H1, Piece::new(Player::White, PieceKind::Rook));
        board.place(Square::A1, Piece::new(Player::White, PieceKind::Rook));
        // H1 is 6 squares away, A1 is adjacent and the king would leave the
        // board.
        assert!(king(&board, Square::B1).is_empty());
    }

    #[test]
    fn rook_next_to_the_king() {
        let mut board = Board::empty();
        board.place(Square::F1, Piece::new(Player::White, PieceKind::King));
        board.place(Square::H1, Piece::new(Player::White, PieceKind::Rook));
        // Two squares away: the king lands on the rook.
        assert_eq!(king(&board, Square::F1).as_slice(), &[Offset::new(2, 0)]);
        // One square away: the king jumps over the rook.
        let _ = board.remove(Square::H1);
        board.place(Square::G1, Piece::new(Player::White, PieceKind::Rook));
        assert_eq!(king(&board, Square::F1).as_slice(), &[Offset::new(2, 0)]);
        // One square away next to the edge: the destination is off the board.
        let mut edge = Board::empty();
        edge.place(Square::G1, Piece::new(Player::White, PieceKind::King));
        edge.place(Square::H1, Piece::new(Player::White, PieceKind::Rook));
        assert!(king(&edge, Square::G1).is_empty());
    }

    #[test]
    fn victim_squares() {
        assert_eq!(en_passant_victim(Square::E3), Some(Square::E4));
        assert_eq!(en_passant_victim(Square::D6), Some(Square::D5));
        assert_eq!(en_passant_victim(Square::D5), None);
    }

    #[test]
    fn en_passant_capture() {
        let mut board = setup("....k.../......../......../...pP.../......../......../......../....K...");
        let pawn = board.at(Square::E5).unwrap();
        assert_eq!(en_passant(&board, Square::E5, pawn), None);
        board.set_en_passant_target(Some(Square::D6));
        assert_eq!(en_passant(&board, Square::E5, pawn), Some(Offset::new(-1, 1)));
        // The victim has to be right beside the capturing pawn.
        let mut far = board.clone();
        let _ = far.remove(Square::E5);
        far.place(Square::F5, pawn);
        assert_eq!(en_passant(&far, Square::F5, pawn), None);
        // Only pawns capture en passant.
        let knight = Piece::new(Player::White, PieceKind::Knight);
        assert_eq!(en_passant(&board, Square::E5, knight), None);
        // Eligibility expires with the next ply.
        board.set_en_passant_target(None);
        assert_eq!(en_passant(&board, Square::E5, pawn), None);
    }

    #[test]
    fn en_passant_black() {
        let mut board = setup("....k.../......../......../......../.....Pp./......../......../....K...");
        board.set_en_passant_target(Some(Square::F3));
        let pawn = board.at(Square::G4).unwrap();
        assert_eq!(en_passant(&board, Square::G4, pawn), Some(Offset::new(-1, -1)));
        // White pawns only capture upwards.
        let white = Piece::new(Player::White, PieceKind::Pawn).moved();
        board.place(Square::E4, white);
        assert_eq!(en_passant(&board, Square::E4, white), None);
    }
}
