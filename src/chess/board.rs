//! Square-centric board representation: every square either holds a
//! [`Piece`] or is empty. The board also carries the en passant target square
//! for the current ply since it is a property of the position rather than of
//! any single piece.
//!
//! The move generator only ever reads the board. Relocating pieces is up to
//! the caller, which is expected to keep [`Piece::has_moved`] and the en
//! passant target up to date.

use std::fmt::{self, Write};

use anyhow::{bail, Context};

use crate::chess::core::{
    File,
    Piece,
    PieceKind,
    Player,
    Promotion,
    Rank,
    Square,
    BOARD_SIZE,
    BOARD_WIDTH,
};
use crate::chess::error::Error;
use crate::chess::special;

/// Piece placement together with the en passant target.
///
/// [`Board::try_from`] reads a plain diagram: eight lines (or `/`-separated
/// chunks) from rank 8 down to rank 1, `.` for an empty square and the usual
/// `KQRBNPkqrbnp` symbols for pieces. This is not FEN: there are no digit runs
/// and no side to move or castling fields.
///
/// ```
/// use sightline::chess::board::Board;
/// use sightline::chess::core::Square;
///
/// assert!(Board::try_from("4k3/8/8/8/8/8/8/4K2R").is_err());
/// let board = Board::try_from(
///     "....k.../......../......../......../......../......../......../....K..R",
/// )
/// .unwrap();
/// assert!(board.at(Square::H1).is_some());
/// assert!(board.at(Square::G1).is_none());
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct Board {
    squares: [Option<Piece>; BOARD_SIZE as usize],
    en_passant_target: Option<Square>,
}

impl Board {
    /// Creates a board without any pieces.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            squares: [None; BOARD_SIZE as usize],
            en_passant_target: None,
        }
    }

    /// Creates the starting position of the standard chess variant.
    ///
    /// ```
    /// use sightline::chess::board::Board;
    ///
    /// assert_eq!(
    ///     &Board::starting().to_string(),
    ///     "rnbqkbnr/pppppppp/......../......../......../......../PPPPPPPP/RNBQKBNR"
    /// );
    /// ```
    #[must_use]
    pub fn starting() -> Self {
        const BACKRANK: [PieceKind; BOARD_WIDTH as usize] = [
            PieceKind::Rook,
            PieceKind::Knight,
            PieceKind::Bishop,
            PieceKind::Queen,
            PieceKind::King,
            PieceKind::Bishop,
            PieceKind::Knight,
            PieceKind::Rook,
        ];
        let mut board = Self::empty();
        for player in [Player::White, Player::Black] {
            for (file, kind) in File::ALL.into_iter().zip(BACKRANK) {
                board.place(
                    Square::new(file, Rank::backrank(player)),
                    Piece::new(player, kind),
                );
                board.place(
                    Square::new(file, Rank::pawns_starting(player)),
                    Piece::new(player, PieceKind::Pawn),
                );
            }
        }
        board
    }

    /// Returns the piece on the square, if any.
    #[must_use]
    pub const fn at(&self, square: Square) -> Option<Piece> {
        self.squares[square as usize]
    }

    /// Puts the piece on the square, replacing whatever was there.
    pub fn place(&mut self, square: Square, piece: Piece) {
        self.squares[square as usize] = Some(piece);
    }

    /// Puts the piece on the square the way a diagram would: anything outside
    /// of its starting square counts as moved.
    pub fn set_up(&mut self, square: Square, piece: Piece) {
        self.place(square, infer_history(square, piece));
    }

    /// Clears the square and returns the piece that stood on it.
    pub fn remove(&mut self, square: Square) -> Option<Piece> {
        self.squares[square as usize].take()
    }

    /// Flags the piece on the square as moved.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptySelection`] if the square is empty.
    pub fn mark_moved(&mut self, square: Square) -> Result<(), Error> {
        match self.squares[square as usize].as_mut() {
            Some(piece) => {
                piece.has_moved = true;
                Ok(())
            },
            None => Err(Error::EmptySelection(square)),
        }
    }

    /// Occupied squares from [`Square::A1`] to [`Square::H8`].
    pub fn pieces(&self) -> impl Iterator<Item = (Square, Piece)> + '_ {
        Square::iter().filter_map(|square| self.at(square).map(|piece| (square, piece)))
    }

    /// The square a pawn capturing en passant would land on, if the last move
    /// was a double pawn push.
    #[must_use]
    pub const fn en_passant_target(&self) -> Option<Square> {
        self.en_passant_target
    }

    /// Records the en passant target for the current ply. Only the pawn that
    /// has just passed the target stays eligible for an en passant capture,
    /// every other pawn loses the eligibility.
    pub fn set_en_passant_target(&mut self, target: Option<Square>) {
        for piece in self.squares.iter_mut().flatten() {
            piece.en_passant_eligible = false;
        }
        self.en_passant_target = target;
        let Some(victim) = target.and_then(special::en_passant_victim) else {
            return;
        };
        if let Some(pawn) = self.squares[victim as usize].as_mut() {
            if pawn.kind == PieceKind::Pawn {
                pawn.en_passant_eligible = true;
            }
        }
    }

    /// Replaces a pawn that has reached the farthest rank with the piece
    /// chosen by the player. The new piece keeps the pawn's owner and counts as
    /// moved.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NothingToPromote`] if the square does not hold a pawn
    /// on its farthest rank.
    pub fn promote(&mut self, square: Square, promotion: Promotion) -> Result<Piece, Error> {
        let pawn = match self.at(square) {
            Some(piece)
                if piece.kind == PieceKind::Pawn
                    && square.rank() == Rank::backrank(piece.owner.opponent()) =>
            {
                piece
            },
            _ => return Err(Error::NothingToPromote(square)),
        };
        let promoted = Piece::new(pawn.owner, promotion.into()).moved();
        self.place(square, promoted);
        Ok(promoted)
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::empty()
    }
}

/// Pieces placed from a diagram have no history. Assume anything outside of
/// its starting square has already moved: this keeps pawns from double pushing
/// out of the middle of the board and kings and rooks from castling out of
/// thin air.
fn infer_history(square: Square, piece: Piece) -> Piece {
    let at_home = match piece.kind {
        PieceKind::Pawn => square.rank() == Rank::pawns_starting(piece.owner),
        PieceKind::King => square == Square::new(File::E, Rank::backrank(piece.owner)),
        PieceKind::Rook => {
            square.rank() == Rank::backrank(piece.owner)
                && matches!(square.file(), File::A | File::H)
        },
        PieceKind::Queen | PieceKind::Bishop | PieceKind::Knight => true,
    };
    if at_home {
        piece
    } else {
        piece.moved()
    }
}

impl TryFrom<&str> for Board {
    type Error = anyhow::Error;

    fn try_from(diagram: &str) -> anyhow::Result<Self> {
        let ranks: Vec<&str> = diagram
            .split(['/', '\n'])
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect();
        if ranks.len() != BOARD_WIDTH as usize {
            bail!(
                "board diagram should have {BOARD_WIDTH} ranks, got {}",
                ranks.len()
            );
        }
        let mut board = Self::empty();
        for (rank, line) in Rank::ALL.into_iter().rev().zip(ranks) {
            let symbols: Vec<char> = line.chars().filter(|ch| !ch.is_whitespace()).collect();
            if symbols.len() != BOARD_WIDTH as usize {
                bail!(
                    "rank {rank} should have {BOARD_WIDTH} squares, got {} in \"{line}\"",
                    symbols.len()
                );
            }
            for (file, symbol) in File::ALL.into_iter().zip(symbols) {
                if symbol == EMPTY_SQUARE {
                    continue;
                }
                let square = Square::new(file, rank);
                let piece = Piece::try_from(symbol)
                    .with_context(|| format!("reading the piece on {square}"))?;
                board.set_up(square, piece);
            }
        }
        Ok(board)
    }
}

impl fmt::Display for Board {
    /// Prints the diagram on a single line, ranks separated by `/`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for rank in Rank::ALL.into_iter().rev() {
            for file in File::ALL {
                match self.at(Square::new(file, rank)) {
                    Some(piece) => write!(f, "{piece}"),
                    None => f.write_char(EMPTY_SQUARE),
                }?;
            }
            if rank != Rank::One {
                f.write_char(RANK_SEPARATOR)?;
            }
        }
        Ok(())
    }
}

impl fmt::Debug for Board {
    /// Dumps the board in a simple format ('.' for empty square, algebraic
    /// symbol for piece) a-la Stockfish "debug" command in UCI mode.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for rank in Rank::ALL.into_iter().rev() {
            for file in File::ALL {
                match self.at(Square::new(file, rank)) {
                    Some(piece) => write!(f, "{piece}"),
                    None => f.write_char(EMPTY_SQUARE),
                }?;
                if file != File::H {
                    write!(f, "{SQUARE_SEPARATOR}")?;
                }
            }
            writeln!(f)?;
        }
        match self.en_passant_target {
            Some(square) => write!(f, "En Passant: {square}"),
            None => write!(f, "En Passant: -"),
        }
    }
}

const EMPTY_SQUARE: char = '.';
const RANK_SEPARATOR: char = '/';
const SQUARE_SEPARATOR: &str = " ";

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn starting() {
        let board = Board::starting();
        assert_eq!(board.pieces().count(), 32);
        assert_eq!(
            board.at(Square::E1),
            Some(Piece::new(Player::White, PieceKind::King))
        );
        assert_eq!(
            board.at(Square::D8),
            Some(Piece::new(Player::Black, PieceKind::Queen))
        );
        assert_eq!(
            board.at(Square::H7),
            Some(Piece::new(Player::Black, PieceKind::Pawn))
        );
        assert!(board.pieces().all(|(_, piece)| !piece.has_moved));
        assert_eq!(board.en_passant_target(), None);
    }

    #[test]
    fn diagram() {
        let diagram = "rnbqkbnr/pppppppp/......../......../......../......../PPPPPPPP/RNBQKBNR";
        assert_eq!(Board::try_from(diagram).unwrap(), Board::starting());
        assert_eq!(Board::starting().to_string(), diagram);
        // Whitespace-separated multi-line diagrams are accepted too.
        let board = Board::try_from(
            "
            . . . . k . . .
            . . . . . . . .
            . . . . . . . .
            . . . . . . . .
            . . . . P . . .
            . . . . . . . .
            . . . . . . . .
            R . . . K . . .
            ",
        )
        .unwrap();
        assert_eq!(board.pieces().count(), 4);
        assert_eq!(
            format!("{board:?}"),
            ". . . . k . . .\n\
             . . . . . . . .\n\
             . . . . . . . .\n\
             . . . . . . . .\n\
             . . . . P . . .\n\
             . . . . . . . .\n\
             . . . . . . . .\n\
             R . . . K . . .\n\
             En Passant: -"
        );
    }

    #[test]
    fn diagram_history() {
        let board = Board::try_from(
            "r...k..r/......../......../...p..../....P.../......../PP....../.R..K...",
        )
        .unwrap();
        // Rooks, kings and pawns on their starting squares have not moved.
        assert!(!board.at(Square::A8).unwrap().has_moved);
        assert!(!board.at(Square::E8).unwrap().has_moved);
        assert!(!board.at(Square::E1).unwrap().has_moved);
        assert!(!board.at(Square::A2).unwrap().has_moved);
        // Everything else has.
        assert!(board.at(Square::B1).unwrap().has_moved);
        assert!(board.at(Square::E4).unwrap().has_moved);
        assert!(board.at(Square::D5).unwrap().has_moved);
    }

    #[test]
    fn incorrect_diagrams() {
        assert!(Board::try_from("").is_err());
        assert!(Board::try_from("8/8/8/8/8/8/8/8").is_err());
        assert!(Board::try_from(
            "......../......../......../......../......../......../......../......."
        )
        .is_err());
        let error = Board::try_from(
            "......../......../......../......../......../......../......../...x....",
        )
        .unwrap_err();
        assert_eq!(error.to_string(), "reading the piece on d1");
        assert_eq!(
            error.root_cause().to_string(),
            "piece symbol should be within \"KQRBNPkqrbnp\", got 'x'"
        );
    }

    #[test]
    fn place_and_remove() {
        let mut board = Board::empty();
        let knight = Piece::new(Player::White, PieceKind::Knight);
        board.place(Square::C3, knight);
        assert_eq!(board.at(Square::C3), Some(knight));
        assert_eq!(board.remove(Square::C3), Some(knight));
        assert_eq!(board.remove(Square::C3), None);
        assert_eq!(board.mark_moved(Square::C3), Err(Error::EmptySelection(Square::C3)));
        board.place(Square::C3, knight);
        assert_eq!(board.mark_moved(Square::C3), Ok(()));
        assert!(board.at(Square::C3).unwrap().has_moved);
    }

    #[test]
    fn set_up_infers_history() {
        let mut board = Board::empty();
        board.set_up(Square::E4, Piece::new(Player::White, PieceKind::Pawn));
        board.set_up(Square::E2, Piece::new(Player::White, PieceKind::Pawn));
        board.set_up(Square::H8, Piece::new(Player::Black, PieceKind::Rook));
        board.set_up(Square::H1, Piece::new(Player::Black, PieceKind::Rook));
        assert!(board.at(Square::E4).unwrap().has_moved);
        assert!(!board.at(Square::E2).unwrap().has_moved);
        assert!(!board.at(Square::H8).unwrap().has_moved);
        assert!(board.at(Square::H1).unwrap().has_moved);
    }

    #[test]
    fn en_passant_eligibility() {
        let mut board = Board::try_from(
            "....k.../......../......../...pP.../......../......../......../....K...",
        )
        .unwrap();
        board.set_en_passant_target(Some(Square::D6));
        assert_eq!(board.en_passant_target(), Some(Square::D6));
        assert!(board.at(Square::D5).unwrap().en_passant_eligible);
        assert!(!board.at(Square::E5).unwrap().en_passant_eligible);
        board.set_en_passant_target(None);
        assert_eq!(board.en_passant_target(), None);
        assert!(board.pieces().all(|(_, piece)| !piece.en_passant_eligible));
    }

    #[test]
    fn promotion() {
        let mut board = Board::try_from(
            "....P.../......../......../......../......../......../p......./....K...",
        )
        .unwrap();
        assert_eq!(
            board.promote(Square::A2, Promotion::Queen),
            Err(Error::NothingToPromote(Square::A2))
        );
        assert_eq!(
            board.promote(Square::E1, Promotion::Queen),
            Err(Error::NothingToPromote(Square::E1))
        );
        let knight = board.promote(Square::E8, Promotion::Knight).unwrap();
        assert_eq!(knight.kind, PieceKind::Knight);
        assert_eq!(knight.owner, Player::White);
        assert_eq!(board.at(Square::E8), Some(knight));
    }
}
