//! Candidate moves of the selected piece and the checks the caller runs
//! against them when the piece is dropped on a destination square.

use std::fmt;

use arrayvec::ArrayVec;
use tracing::debug;

use crate::chess::board::Board;
use crate::chess::core::{Offset, Piece, Square};
use crate::chess::error::Error;
use crate::chess::movegen::generate_moves;

/// The most candidates a single piece can have is 27 (queen in the center of
/// an empty board). King with both castles has 10.
const MAX_CANDIDATES: usize = 32;

bitflags::bitflags! {
    /// More information about a [`Candidate`] that the caller might want to
    /// show (e.g. highlight captures differently) or act upon (e.g. move the
    /// rook when castling or remove the pawn captured en passant).
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct MoveAttributes: u8 {
        /// Destination holds an opponent's piece.
        const CAPTURE = 0b0000_0001;
        /// Pawn advancement by 2 squares from the starting rank.
        const DOUBLE_PAWN_PUSH = 0b0000_0010;
        /// Capture of the opponent's pawn "in passing": the destination is
        /// the square the pawn skipped over.
        const EN_PASSANT = 0b0000_0100;
        /// King moves two squares towards a rook that has not moved.
        const CASTLE = 0b0000_1000;
        /// Pawn lands on the opponent's backrank.
        const PROMOTION = 0b0001_0000;
    }
}

/// A single move the selected piece could make, relative to its square.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Candidate {
    #[allow(missing_docs)]
    pub offset: Offset,
    #[allow(missing_docs)]
    pub attributes: MoveAttributes,
}

/// Ordered candidates of one piece, in the order the rules produced them.
///
/// Each offset appears at most once: pushing an offset that is already there
/// merges the attributes into the existing candidate.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MoveSet {
    candidates: ArrayVec<Candidate, MAX_CANDIDATES>,
}

impl MoveSet {
    /// Creates an empty set.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            candidates: ArrayVec::new_const(),
        }
    }

    /// Drops all candidates. Buffers reused across selections must be
    /// cleared before they are refilled.
    pub fn clear(&mut self) {
        self.candidates.clear();
    }

    pub(super) fn push(&mut self, offset: Offset, attributes: MoveAttributes) {
        if let Some(existing) = self
            .candidates
            .iter_mut()
            .find(|candidate| candidate.offset == offset)
        {
            existing.attributes |= attributes;
            return;
        }
        self.candidates.push(Candidate { offset, attributes });
    }

    /// Looks up the candidate with given offset.
    #[must_use]
    pub fn get(&self, offset: Offset) -> Option<&Candidate> {
        self.candidates
            .iter()
            .find(|candidate| candidate.offset == offset)
    }

    /// Exact component-wise membership test.
    #[must_use]
    pub fn contains(&self, offset: Offset) -> bool {
        self.get(offset).is_some()
    }

    #[allow(missing_docs)]
    #[must_use]
    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    #[allow(missing_docs)]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    #[allow(missing_docs)]
    pub fn iter(&self) -> impl Iterator<Item = &Candidate> {
        self.candidates.iter()
    }

    /// Offsets only, in generation order.
    pub fn offsets(&self) -> impl Iterator<Item = Offset> + '_ {
        self.candidates.iter().map(|candidate| candidate.offset)
    }

    /// Squares the piece standing on `from` could move to. Offsets leading
    /// off the board are skipped, although the generator never produces
    /// them.
    pub fn destinations(&self, from: Square) -> impl Iterator<Item = Square> + '_ {
        self.offsets().filter_map(move |offset| from.shift(offset))
    }
}

impl<'a> IntoIterator for &'a MoveSet {
    type IntoIter = std::slice::Iter<'a, Candidate>;
    type Item = &'a Candidate;

    fn into_iter(self) -> Self::IntoIter {
        self.candidates.iter()
    }
}

/// Checks whether moving a piece from `initial` to `destination` matches one
/// of the generated candidates.
///
/// ```
/// use sightline::chess::board::Board;
/// use sightline::chess::core::Square;
/// use sightline::{generate_moves, valid_move};
///
/// let board = Board::starting();
/// let moves = generate_moves(&board, Square::E2).unwrap();
/// assert!(valid_move(&moves, Square::E2, Square::E4));
/// assert!(!valid_move(&moves, Square::E2, Square::E5));
/// ```
#[must_use]
pub fn valid_move(candidates: &MoveSet, initial: Square, destination: Square) -> bool {
    candidates.contains(destination - initial)
}

/// Emitted when an accepted move brings a pawn to the farthest rank. The
/// caller has to ask the player which piece to promote to and apply the choice
/// with [`Board::promote`] once the pawn has been moved.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PromotionPending {
    /// Where the pawn lands.
    pub square: Square,
    /// The pawn being promoted.
    pub piece: Piece,
}

/// A destination confirmed by [`Selection::accept`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Accepted {
    #[allow(missing_docs)]
    pub candidate: Candidate,
    #[allow(missing_docs)]
    pub promotion: Option<PromotionPending>,
}

/// The piece picked up by the player together with its candidates. The
/// candidates are computed once when the piece is selected; the board must not
/// change until the selection is dropped.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Selection {
    from: Square,
    piece: Piece,
    moves: MoveSet,
}

impl Selection {
    /// Selects the piece standing on `from` and generates its candidates.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptySelection`] if there is no piece on `from`.
    pub fn new(board: &Board, from: Square) -> Result<Self, Error> {
        let piece = board.at(from).ok_or(Error::EmptySelection(from))?;
        let moves = generate_moves(board, from)?;
        Ok(Self { from, piece, moves })
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn from(&self) -> Square {
        self.from
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn piece(&self) -> Piece {
        self.piece
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn moves(&self) -> &MoveSet {
        &self.moves
    }

    /// Confirms the destination the piece was dropped on.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotACandidate`] if the destination is not among the
    /// candidates.
    pub fn accept(&self, to: Square) -> Result<Accepted, Error> {
        let not_a_candidate = Error::NotACandidate {
            from: self.from,
            to,
        };
        if !valid_move(&self.moves, self.from, to) {
            return Err(not_a_candidate);
        }
        let candidate = *self.moves.get(to - self.from).ok_or(not_a_candidate)?;
        let promotion = candidate
            .attributes
            .contains(MoveAttributes::PROMOTION)
            .then_some(PromotionPending {
                square: to,
                piece: self.piece,
            });
        if promotion.is_some() {
            debug!(from = %self.from, %to, "promotion pending");
        }
        Ok(Accepted {
            candidate,
            promotion,
        })
    }
}

impl fmt::Display for Selection {
    /// Lists the candidates as `from` and `to` square pairs.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut destinations = self.moves.destinations(self.from).peekable();
        while let Some(to) = destinations.next() {
            write!(f, "{}{to}", self.from)?;
            if destinations.peek().is_some() {
                f.write_str(" ")?;
            }
        }
        Ok(())
    }
}
