#![no_main]
use libfuzzer_sys::fuzz_target;
use sightline::chess::board::Board;
use sightline::chess::core::{Piece, Square};
use sightline::chess::moves::MoveAttributes;
use sightline::{generate_moves, valid_move};

// Every byte pair places a piece: the first one picks the square, the second
// one the piece symbol.
fuzz_target!(|data: &[u8]| {
    let mut board = Board::empty();
    for pair in data.chunks_exact(2) {
        let Ok(square) = Square::try_from(pair[0] % 64) else {
            continue;
        };
        let Ok(piece) = Piece::try_from(char::from(pair[1])) else {
            continue;
        };
        board.place(square, piece);
    }
    for (from, piece) in board.pieces() {
        let moves = generate_moves(&board, from).expect("the square holds a piece");
        for candidate in &moves {
            let to = from
                .shift(candidate.offset)
                .expect("candidates stay on the board");
            assert!(valid_move(&moves, from, to));
            if !candidate.attributes.contains(MoveAttributes::CASTLE) {
                assert!(board.at(to).map_or(true, |target| target.owner != piece.owner));
            }
        }
        assert_eq!(generate_moves(&board, from).as_ref(), Ok(&moves));
    }
});
