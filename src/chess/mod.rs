//! Chess board model and the rules that produce candidate moves for a single
//! selected piece.

pub mod board;
pub mod core;
pub mod error;
pub mod movegen;
pub mod moves;
pub mod scan;
pub mod special;
