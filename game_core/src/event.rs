use serde::{Deserialize, Serialize};

use crate::combat::Combat;
use crate::error::CombatFailure;
use crate::model::{Allegiance, PieceId};
use crate::narrative::Victor;
use crate::Point;

/// Something that happened to the game, in the order it happened.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TurnEvent {
    Selected {
        piece: PieceId,
        at: Point,
    },
    Deselected {
        piece: PieceId,
    },
    Moved {
        piece: PieceId,
        from: Point,
        to: Point,
    },
    EnPassantCapture {
        piece: PieceId,
        victim: PieceId,
        at: Point,
    },
    Promoted {
        piece: PieceId,
        at: Point,
    },
    CombatStarted(Combat),
    CombatResolved {
        combat: Combat,
        victor: Victor,
        story: String,
    },
    CombatFailed {
        combat: Combat,
        failure: CombatFailure,
    },
    PieceDied {
        piece: PieceId,
        name: String,
        mourners: Vec<PieceId>,
    },
    GameOver {
        winner: Allegiance,
    },
    /// The board was set out again on request, the war abandoned.
    Restarted,
    TurnPassed {
        to: Allegiance,
    },
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggedEvent {
    pub id: usize,
    pub event: TurnEvent,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventLog(Vec<LoggedEvent>);

impl EventLog {
    pub fn push_event(&mut self, event: TurnEvent) -> &LoggedEvent {
        let id = self.last_event_id() + 1;
        self.0.push(LoggedEvent { id, event });
        &self.0[self.0.len() - 1]
    }

    pub fn last_event_id(&self) -> usize {
        self.0.last().map(|logged| logged.id).unwrap_or(0)
    }

    pub fn last(&self) -> Option<&TurnEvent> {
        self.0.last().map(|logged| &logged.event)
    }

    pub fn events(&self) -> impl Iterator<Item = &TurnEvent> {
        self.0.iter().map(|logged| &logged.event)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn ids_increase_from_one() {
        let mut log = EventLog::default();
        assert_eq!(log.last_event_id(), 0);
        assert_eq!(
            log.push_event(TurnEvent::TurnPassed {
                to: Allegiance::Black
            })
            .id,
            1
        );
        log.push_event(TurnEvent::GameOver {
            winner: Allegiance::White,
        });
        assert_eq!(log.last_event_id(), 2);
        assert_eq!(
            log.last(),
            Some(&TurnEvent::GameOver {
                winner: Allegiance::White
            })
        );
        assert_eq!(log.len(), 2);
    }

    #[test]
    fn log_serializes_for_recording() {
        let mut log = EventLog::default();
        log.push_event(TurnEvent::Moved {
            piece: PieceId(12),
            from: (4, 1),
            to: (4, 3),
        });
        let json = serde_json::to_string(&log).unwrap();
        let back: EventLog = serde_json::from_str(&json).unwrap();
        assert_eq!(back, log);
    }
}
