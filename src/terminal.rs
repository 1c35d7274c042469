//! Plain line-based terminal play: the board is printed after every turn and
//! moves are typed as coordinates.

use std::io::BufRead;
use std::sync::mpsc::{self, Receiver, TryRecvError};

use game_core::error::Error;
use game_core::{
    Allegiance, GameCommand, GameSession, Informant, NarrativeSink, PieceType, TurnEvent,
    BOARD_SIZE,
};

const TEXT_WIDTH: usize = 72;

const HELP: &str = "Type a square as \"x y\" to select a piece, then another to move it. \
\"cancel\" drops the selection, \"restart\" starts a new war and \"quit\" leaves.";

#[derive(Debug)]
pub struct TerminalInformant {
    commands: Receiver<GameCommand>,
    hung_up: bool,
}

impl TerminalInformant {
    pub fn new(session: &GameSession) -> Self {
        let (tx, rx) = mpsc::channel();
        std::thread::spawn(move || {
            let stdin = std::io::stdin();
            for line in stdin.lock().lines() {
                let Ok(line) = line else {
                    break;
                };
                match parse_line(&line) {
                    Some(command) => {
                        if tx.send(command).is_err() {
                            return;
                        }
                    },
                    None => println!("{}", textwrap::fill(HELP, TEXT_WIDTH)),
                }
            }
            // Stdin closed, nobody is left to play.
            let _ = tx.send(GameCommand::ShutDown);
        });
        println!("{}", textwrap::fill(HELP, TEXT_WIDTH));
        println!("{}", render_board(session));
        TerminalInformant {
            commands: rx,
            hung_up: false,
        }
    }
}

impl Informant for TerminalInformant {
    fn tick(&mut self, _session: &GameSession) -> Option<GameCommand> {
        match self.commands.try_recv() {
            Ok(command) => Some(command),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) if !self.hung_up => {
                self.hung_up = true;
                Some(GameCommand::ShutDown)
            },
            Err(TryRecvError::Disconnected) => None,
        }
    }

    fn collect(&mut self, event: &TurnEvent, session: &GameSession) {
        match event {
            TurnEvent::Selected { piece, .. } => {
                if let Some(piece) = session.piece(*piece) {
                    println!("{} selected.", piece.name());
                }
                println!("{}", render_board(session));
            },
            TurnEvent::TurnPassed { to } => {
                println!("{}", render_board(session));
                println!("{} to move.", to);
            },
            TurnEvent::Promoted { at, .. } => println!("A soldier at {:?} is crowned Queen.", at),
            TurnEvent::PieceDied { name, mourners, .. } if !mourners.is_empty() => println!(
                "The {} is dead and {} comrade(s) swear revenge.",
                name,
                mourners.len()
            ),
            TurnEvent::GameOver { winner } => {
                println!("{} has won the war!", winner);
                println!("{}", render_board(session));
            },
            TurnEvent::Restarted => {
                println!("The war begins anew.");
                println!("{}", render_board(session));
            },
            _ => {},
        }
    }

    fn fail(&mut self, error: &Error, _command: &GameCommand, _session: &GameSession) {
        println!("{}", textwrap::fill(&error.to_string(), TEXT_WIDTH));
    }
}

/// Prints the tale of the war as it is written.
#[derive(Debug, Default)]
pub struct TerminalSink;

impl NarrativeSink for TerminalSink {
    fn update_game_log(&mut self, new_text: &str, _previous_text: &str) {
        let text = new_text.trim();
        if !text.is_empty() {
            println!("\n{}\n", textwrap::fill(text, TEXT_WIDTH));
        }
    }

    fn set_short_description(&mut self, text: &str) {
        println!("{}", textwrap::fill(&format!("[{}]", text), TEXT_WIDTH));
    }
}

fn parse_line(line: &str) -> Option<GameCommand> {
    let line = line.trim();
    match line.to_ascii_lowercase().as_str() {
        "q" | "quit" | "exit" => return Some(GameCommand::ShutDown),
        "restart" => return Some(GameCommand::Restart),
        "c" | "cancel" => return Some(GameCommand::Deselect),
        _ => {},
    }
    let mut coords = line
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|word| !word.is_empty())
        .map(str::parse::<i32>);
    match (coords.next(), coords.next(), coords.next()) {
        (Some(Ok(x)), Some(Ok(y)), None) => Some(GameCommand::Tile { x, y }),
        _ => None,
    }
}

fn glyph(allegiance: Allegiance, piece_type: PieceType) -> char {
    let glyph = match piece_type {
        PieceType::King => 'k',
        PieceType::Queen => 'q',
        PieceType::Rook => 'r',
        PieceType::Bishop => 'b',
        PieceType::Knight => 'n',
        PieceType::Pawn => 'p',
    };
    match allegiance {
        Allegiance::White => glyph.to_ascii_uppercase(),
        Allegiance::Black => glyph,
    }
}

/// White at the bottom. Squares the selected piece may reach are marked `*`.
pub fn render_board(session: &GameSession) -> String {
    let legality = session.turn().legality().as_ref();
    let mut out = String::new();
    for y in (0..BOARD_SIZE).rev() {
        out.push_str(&format!("{} ", y));
        for x in 0..BOARD_SIZE {
            let cell = match session.board().piece_at((x, y)) {
                Some(piece) => glyph(piece.allegiance(), piece.piece_type()),
                None if legality.is_some_and(|mask| mask.allows((x, y))) => '*',
                None => '.',
            };
            out.push(' ');
            out.push(cell);
        }
        out.push('\n');
    }
    out.push_str("  ");
    for x in 0..BOARD_SIZE {
        out.push_str(&format!(" {}", x));
    }
    out
}

#[cfg(test)]
mod test {
    use game_core::GameConfiguration;
    use test_log::test;

    use super::*;

    #[test]
    fn coordinates_become_tiles() {
        assert_eq!(parse_line("4 1"), Some(GameCommand::Tile { x: 4, y: 1 }));
        assert_eq!(parse_line(" 4,3 "), Some(GameCommand::Tile { x: 4, y: 3 }));
        assert_eq!(parse_line("-1 9"), Some(GameCommand::Tile { x: -1, y: 9 }));
        assert_eq!(parse_line("4"), None);
        assert_eq!(parse_line("4 1 2"), None);
        assert_eq!(parse_line("e4"), None);
    }

    #[test]
    fn words_become_commands() {
        assert_eq!(parse_line("QUIT"), Some(GameCommand::ShutDown));
        assert_eq!(parse_line("restart"), Some(GameCommand::Restart));
        assert_eq!(parse_line("cancel"), Some(GameCommand::Deselect));
    }

    #[test]
    fn opening_board_renders_both_armies() {
        let session = GameSession::new(GameConfiguration::default()).unwrap();
        let board = render_board(&session);
        let lines: Vec<_> = board.lines().collect();
        assert_eq!(lines.len(), BOARD_SIZE + 1);
        assert_eq!(lines[0], "7  r n b q k b n r");
        assert_eq!(lines[1], "6  p p p p p p p p");
        assert_eq!(lines[6], "1  P P P P P P P P");
        assert_eq!(lines[7], "0  R N B K Q B N R");
        assert_eq!(lines[8], "   0 1 2 3 4 5 6 7");
    }
}
