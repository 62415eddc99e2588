//! Failures reported at the boundary of move generation. None of them are
//! fatal: the caller may inspect the error and carry on with the same board.

use crate::chess::core::Square;

/// Errors produced by the board model and the move generator.
#[allow(missing_docs)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// Coordinates fall outside of the 8x8 board.
    #[error("square ({file}, {rank}) is outside of the board")]
    OutOfBoard { file: i8, rank: i8 },
    /// Move generation was requested for a square without a piece.
    #[error("there is no piece to select on {0}")]
    EmptySelection(Square),
    /// A piece symbol does not name any of the six standard pieces.
    #[error("piece symbol should be within \"KQRBNPkqrbnp\", got '{0}'")]
    UnknownPieceKind(char),
    /// The requested destination is not among the candidates of the selected
    /// piece.
    #[error("{from}{to} is not among the candidate moves")]
    NotACandidate { from: Square, to: Square },
    /// Promotion was requested for a square that does not hold a pawn on its
    /// farthest rank.
    #[error("there is no pawn to promote on {0}")]
    NothingToPromote(Square),
}
