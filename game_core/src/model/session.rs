use getset::{CopyGetters, Getters};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use super::board::Board;
use super::layout;
use super::piece::{Allegiance, Piece, PieceId};
use crate::combat::Combat;
use crate::configuration::GameConfiguration;
use crate::error::Result;
use crate::event::{EventLog, LoggedEvent, TurnEvent};
use crate::moves;
use crate::narrative::Transcript;
use crate::social;
use crate::{LegalityMask, Point};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    #[default]
    Idle,
    Selected,
    /// A fight is being narrated. All player input is ignored.
    ResolvingCombat,
    GameOver,
}

#[derive(Clone, Debug, PartialEq, Eq, Getters, CopyGetters, Serialize, Deserialize)]
pub struct TurnState {
    #[get_copy = "pub"]
    active: Allegiance,
    #[get_copy = "pub"]
    selected: Option<PieceId>,
    #[get = "pub"]
    legality: Option<LegalityMask>,
    #[get_copy = "pub"]
    phase: Phase,
    #[get = "pub"]
    combat: Option<Combat>,
}

impl Default for TurnState {
    fn default() -> Self {
        TurnState {
            active: Allegiance::White,
            selected: None,
            legality: None,
            phase: Phase::Idle,
            combat: None,
        }
    }
}

impl TurnState {
    pub(crate) fn select(&mut self, piece: PieceId, legality: LegalityMask) {
        self.selected = Some(piece);
        self.legality = Some(legality);
        self.phase = Phase::Selected;
    }

    pub(crate) fn deselect(&mut self) {
        self.selected = None;
        self.legality = None;
        self.combat = None;
        self.phase = Phase::Idle;
    }

    pub(crate) fn start_combat(&mut self, combat: Combat) {
        self.combat = Some(combat);
        self.phase = Phase::ResolvingCombat;
    }

    pub(crate) fn pass_turn(&mut self) {
        self.deselect();
        self.active = self.active.other();
    }

    pub(crate) fn set_phase(&mut self, phase: Phase) {
        self.phase = phase;
    }
}

/// Everything the game knows, handed explicitly to whoever needs it.
#[derive(Debug, Getters, CopyGetters)]
pub struct GameSession {
    #[get = "pub"]
    board: Board,
    /// The square a pawn skipped over on the last move.
    #[get_copy = "pub"]
    en_passant: Option<Point>,
    #[get = "pub"]
    turn: TurnState,
    #[get = "pub"]
    transcript: Transcript,
    #[get = "pub"]
    config: GameConfiguration,
    #[get = "pub"]
    event_log: EventLog,
    #[get_copy = "pub"]
    last_winner: Option<Allegiance>,
    rng: StdRng,
}

impl GameSession {
    /// A fresh game in the standard layout.
    pub fn new(config: GameConfiguration) -> Result<Self> {
        let mut session = Self::with_board(config.validate()?, Board::new());
        session.reseed()?;
        Ok(session)
    }

    /// A game picked up from an arbitrary position, White to move.
    pub fn with_board(config: GameConfiguration, board: Board) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        GameSession {
            board,
            en_passant: None,
            turn: TurnState::default(),
            transcript: Transcript::default(),
            config,
            event_log: EventLog::default(),
            last_winner: None,
            rng,
        }
    }

    /// Clears the board and sets out both armies again, with new friendships.
    pub fn reseed(&mut self) -> Result<()> {
        self.board.clear();
        let mut pieces = layout::standard_pieces();
        social::roll_friendships(&mut pieces, self.config.friendship_probability, &mut self.rng);
        for piece in pieces {
            self.board.place(piece)?;
        }
        self.en_passant = None;
        self.turn = TurnState::default();
        self.board.check_invariants()
    }

    pub fn phase(&self) -> Phase {
        self.turn.phase
    }

    pub fn active(&self) -> Allegiance {
        self.turn.active
    }

    pub fn piece(&self, id: PieceId) -> Option<&Piece> {
        self.board.piece(id)
    }

    pub fn legal_moves(&self, piece: &Piece) -> LegalityMask {
        moves::possible_moves(piece, &self.board, self.en_passant)
    }

    pub(crate) fn board_mut(&mut self) -> &mut Board {
        &mut self.board
    }

    pub(crate) fn turn_mut(&mut self) -> &mut TurnState {
        &mut self.turn
    }

    pub(crate) fn transcript_mut(&mut self) -> &mut Transcript {
        &mut self.transcript
    }

    pub(crate) fn take_en_passant(&mut self) -> Option<Point> {
        self.en_passant.take()
    }

    pub(crate) fn set_en_passant(&mut self, en_passant: Option<Point>) {
        self.en_passant = en_passant;
    }

    pub(crate) fn set_last_winner(&mut self, winner: Allegiance) {
        self.last_winner = Some(winner);
    }

    pub(crate) fn record(&mut self, event: TurnEvent) -> LoggedEvent {
        self.event_log.push_event(event).clone()
    }
}
