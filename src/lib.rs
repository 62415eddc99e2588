//! Pseudo-legal chess move generation built on "line of sight" scans over a
//! grid board.
//!
//! Selecting a piece produces the set of offsets it could move by under the
//! movement rules: sliding pieces stop at the first obstruction, knights jump,
//! pawns push and capture diagonally (including en passant) and the king can
//! castle when neither it nor the rook has moved and the path between them is
//! clear. Positions are **not** checked for leaving the mover's king in check.
//!
//! ```
//! use sightline::chess::board::Board;
//! use sightline::chess::core::Square;
//! use sightline::{generate_moves, valid_move};
//!
//! let board = Board::starting();
//! let moves = generate_moves(&board, Square::G1).unwrap();
//! assert_eq!(moves.len(), 2);
//! assert!(valid_move(&moves, Square::G1, Square::F3));
//! assert!(!valid_move(&moves, Square::G1, Square::G3));
//! ```

// Rustdoc lints.
#![warn(
    rustdoc::private_doc_tests,
    rustdoc::missing_crate_level_docs,
    rustdoc::invalid_codeblock_attributes,
    rustdoc::invalid_html_tags,
    rustdoc::bare_urls
)]

pub mod chess;

pub use chess::error::Error;
pub use chess::movegen::{generate_moves, generate_moves_into};
pub use chess::moves::{valid_move, MoveSet, PromotionPending, Selection};
use shadow_rs::shadow;

shadow!(build);

/// Returns the full version that can be used to identify how the binary was
/// built in the first place.
fn version() -> String {
    format!(
        "{} (commit {}, branch {})",
        build::PKG_VERSION,
        build::SHORT_COMMIT,
        build::BRANCH
    )
}

/// Prints the version on startup.
pub fn print_engine_info() {
    println!("Sightline move generator {}", version());
}

/// Prints the build type and whether the build is clean on startup.
pub fn print_binary_info() {
    println!("Release build: {}", !shadow_rs::is_debug());
    if !shadow_rs::git_clean() {
        println!("Warning: built with uncommitted changes");
    }
    println!();
}
