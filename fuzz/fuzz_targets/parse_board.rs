#![no_main]
use libfuzzer_sys::fuzz_target;
use sightline::chess::board::Board;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        if let Ok(board) = Board::try_from(s) {
            let printed = board.to_string();
            let reparsed = Board::try_from(printed.as_str())
                .expect("printed board should be accepted by the parser");
            assert_eq!(reparsed.to_string(), printed);
        }
    }
});
