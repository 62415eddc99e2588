use std::io::{self, BufRead, Write};

use anyhow::{bail, Context};
use sightline::chess::board::Board;
use sightline::chess::core::{Piece, Promotion, Square};
use sightline::Selection;
use tracing::warn;
use tracing_subscriber::EnvFilter;

fn parse_square(token: Option<&str>) -> anyhow::Result<Square> {
    let token = token.context("missing square")?;
    Square::try_from(token)
}

fn single_char(token: Option<&str>, what: &str) -> anyhow::Result<char> {
    let token = token.with_context(|| format!("missing {what}"))?;
    let mut chars = token.chars();
    match (chars.next(), chars.next()) {
        (Some(symbol), None) => Ok(symbol),
        _ => bail!("{what} should be a single character, got \"{token}\""),
    }
}

/// Executes a single command. Returns `false` when the session is over.
fn execute(line: &str, board: &mut Board, out: &mut impl Write) -> anyhow::Result<bool> {
    let mut tokens = line.split_whitespace();
    let Some(command) = tokens.next() else {
        return Ok(true);
    };
    match command {
        "quit" => return Ok(false),
        "startpos" => *board = Board::starting(),
        "empty" => *board = Board::empty(),
        "board" => {
            let diagram = tokens.collect::<Vec<_>>().join("");
            *board = Board::try_from(diagram.as_str())?;
        },
        "place" => {
            let square = parse_square(tokens.next())?;
            let piece = Piece::try_from(single_char(tokens.next(), "piece")?)?;
            board.set_up(square, piece);
        },
        "remove" => {
            let square = parse_square(tokens.next())?;
            if board.remove(square).is_none() {
                writeln!(out, "{square} is already empty")?;
            }
        },
        "moved" => board.mark_moved(parse_square(tokens.next())?)?,
        "ep" => match tokens.next() {
            Some("-") => board.set_en_passant_target(None),
            token => board.set_en_passant_target(Some(parse_square(token)?)),
        },
        "moves" => {
            let selection = Selection::new(board, parse_square(tokens.next())?)?;
            writeln!(out, "{selection}")?;
        },
        "valid" => {
            let selection = Selection::new(board, parse_square(tokens.next())?)?;
            let to = parse_square(tokens.next())?;
            match selection.accept(to) {
                Ok(accepted) => {
                    writeln!(out, "true")?;
                    if let Some(pending) = accepted.promotion {
                        writeln!(out, "promotion pending {}", pending.square)?;
                    }
                },
                Err(_) => writeln!(out, "false")?,
            }
        },
        "promote" => {
            let square = parse_square(tokens.next())?;
            let promotion = Promotion::try_from(single_char(tokens.next(), "promotion")?)?;
            let piece = board.promote(square, promotion)?;
            writeln!(out, "{square} is now {piece}")?;
        },
        "d" => writeln!(out, "{board:?}")?,
        _ => bail!("unknown command: {command}"),
    }
    Ok(true)
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    sightline::print_engine_info();
    sightline::print_binary_info();

    let mut board = Board::starting();
    let stdin = io::stdin();
    let mut stdout = io::stdout().lock();
    for line in stdin.lock().lines() {
        let line = line?;
        match execute(&line, &mut board, &mut stdout) {
            Ok(true) => {},
            Ok(false) => break,
            Err(e) => {
                warn!("{line}: {e:#}");
                writeln!(stdout, "Error: {e:#}")?;
            },
        }
        stdout.flush()?;
    }
    Ok(())
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;

    use super::*;

    fn run(commands: &[&str]) -> String {
        let mut board = Board::starting();
        let mut out = Vec::new();
        for command in commands {
            let _ = execute(command, &mut board, &mut out).unwrap();
        }
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn moves() {
        assert_eq!(run(&["moves g1"]), "g1h3 g1f3\n");
        assert_eq!(run(&["moves e2"]), "e2e3 e2e4\n");
    }

    #[test]
    fn valid() {
        assert_eq!(run(&["valid e2 e4", "valid e2 e5"]), "true\nfalse\n");
    }

    #[test]
    fn setup_commands() {
        assert_eq!(
            run(&[
                "empty",
                "place e1 K",
                "place a7 P",
                "moved a7",
                "valid a7 a8",
                "remove a7",
                "remove a7",
                "place a8 P",
                "promote a8 q",
            ]),
            "true\npromotion pending a8\n\
             a7 is already empty\n\
             a8 is now Q\n"
        );
    }

    #[test]
    fn placed_pieces_have_history() {
        assert_eq!(
            run(&["empty", "place e4 P", "moves e4", "place d2 P", "moves d2"]),
            "e4e5\nd2d3 d2d4\n"
        );
    }

    #[test]
    fn errors() {
        let mut board = Board::starting();
        let mut out = Vec::new();
        assert!(execute("moves e4", &mut board, &mut out).is_err());
        assert!(execute("moves", &mut board, &mut out).is_err());
        assert!(execute("place e4 x", &mut board, &mut out).is_err());
        assert!(execute("frobnicate", &mut board, &mut out).is_err());
        assert!(!execute("quit", &mut board, &mut out).unwrap());
        assert!(execute("", &mut board, &mut out).unwrap());
    }
}
