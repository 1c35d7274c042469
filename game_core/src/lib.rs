// Level 0
mod common;
pub mod configuration;
pub mod error;
// Level 1
pub mod model;
// Level 2
pub mod moves;
pub mod social;
// Level 3
pub mod combat;
pub mod narrative;
// Level 4
pub mod event;
// Level 5
mod game_master;

pub use common::{
    offset, on_board, tile_from_input, LegalityMask, Point, Step, BOARD_SIZE, DIAGONAL_STEPS,
    KNIGHT_STEPS, ORTHOGONAL_STEPS,
};
pub use combat::{Combat, CombatOrchestrator, CombatReport, Combatant, PendingCombat};
pub use configuration::GameConfiguration;
pub use event::{EventLog, LoggedEvent, TurnEvent};
pub use game_master::{GameCommand, Informant, TurnController};
pub use model::{Allegiance, Board, GameSession, Phase, Piece, PieceId, PieceType, TurnState};
pub use narrative::{
    CoinFlipNarrator, NarrativeService, NarrativeSink, NarratorError, ScriptedNarrator, Transcript,
    Victor,
};
