//! Fights between two pieces, settled by the story generator.
//!
//! A fight runs on its own worker thread. The worker asks for a verdict,
//! then for the tale of the fight, and hands both back through a channel
//! with room for exactly one message. The turn controller keeps the
//! [`PendingCombat`] and refuses other input until the verdict arrives, fails
//! or times out.

use std::sync::mpsc::{self, Receiver, RecvTimeoutError, TryRecvError};
use std::sync::Arc;
use std::time::{Duration, Instant};

use getset::{CopyGetters, Getters};
use serde::{Deserialize, Serialize};

use crate::error::{CombatFailure, ErrorMsg as _, Result};
use crate::model::{Board, Piece, PieceId};
use crate::narrative::{decide_victor, NarrativeRequest, NarrativeService, Victor};
use crate::social;
use crate::Point;

/// What the story generator knows about one side of a fight, captured when
/// the fight starts.
#[derive(Clone, Debug, PartialEq, Eq, CopyGetters, Serialize, Deserialize)]
pub struct Combatant {
    #[get_copy = "pub"]
    id: PieceId,
    name: String,
    modifier: String,
}

impl Combatant {
    pub fn new<S: ToString, M: ToString>(id: PieceId, name: S, modifier: M) -> Self {
        Combatant {
            id,
            name: name.to_string(),
            modifier: modifier.to_string(),
        }
    }

    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    pub fn modifier(&self) -> &str {
        self.modifier.as_str()
    }
}

impl From<&Piece> for Combatant {
    fn from(piece: &Piece) -> Self {
        Combatant::new(piece.id(), piece.name(), piece.modifier())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Getters, CopyGetters, Serialize, Deserialize)]
pub struct Combat {
    #[get = "pub"]
    attacker: Combatant,
    #[get = "pub"]
    defender: Combatant,
    #[get_copy = "pub"]
    from: Point,
    #[get_copy = "pub"]
    to: Point,
}

impl Combat {
    pub fn new(attacker: &Piece, defender: &Piece) -> Self {
        Combat {
            attacker: attacker.into(),
            defender: defender.into(),
            from: attacker.position(),
            to: defender.position(),
        }
    }

    pub fn winner(&self, victor: Victor) -> &Combatant {
        match victor {
            Victor::Attacker => &self.attacker,
            Victor::Defender => &self.defender,
        }
    }

    pub fn loser(&self, victor: Victor) -> &Combatant {
        match victor {
            Victor::Attacker => &self.defender,
            Victor::Defender => &self.attacker,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Getters, CopyGetters, Serialize, Deserialize)]
pub struct CombatReport {
    #[get_copy = "pub"]
    victor: Victor,
    /// The raw reply to the verdict prompt.
    #[get = "pub"]
    verdict: String,
    #[get = "pub"]
    story: String,
}

pub type CombatResult = std::result::Result<CombatReport, CombatFailure>;

/// Runs the two-prompt exchange for a fight.
#[derive(Clone, Debug)]
pub struct CombatOrchestrator {
    narrator: Arc<dyn NarrativeService>,
    prompt_prefix: String,
    timeout: Option<Duration>,
}

impl CombatOrchestrator {
    pub fn new(narrator: Arc<dyn NarrativeService>, prompt_prefix: String, timeout: Option<Duration>) -> Self {
        CombatOrchestrator {
            narrator,
            prompt_prefix,
            timeout,
        }
    }

    /// The whole exchange, on the calling thread. The story prompt is only
    /// sent once the verdict is in.
    pub fn resolve(&self, combat: &Combat) -> CombatResult {
        let verdict = self.ask(&NarrativeRequest::Verdict {
            attacker: &combat.attacker,
            defender: &combat.defender,
        })?;
        let victor = decide_victor(&verdict, combat.defender.name());
        log::debug!("Verdict [{}] means {:?} wins", verdict, victor);
        let story = self.ask(&NarrativeRequest::Story {
            attacker: &combat.attacker,
            defender: &combat.defender,
            victor,
        })?;
        Ok(CombatReport {
            victor,
            verdict,
            story,
        })
    }

    /// Starts the exchange on a worker thread.
    pub fn begin(&self, combat: Combat) -> PendingCombat {
        let (tx, rx) = mpsc::sync_channel(1);
        let orchestrator = self.clone();
        let worker_combat = combat.clone();
        std::thread::spawn(move || {
            let result = orchestrator.resolve(&worker_combat);
            if tx.send(result).is_err() {
                log::debug!(
                    "Nobody waiting on the fight between {} and {} anymore",
                    worker_combat.attacker.id,
                    worker_combat.defender.id
                );
            }
        });
        PendingCombat {
            combat,
            receiver: rx,
            started: Instant::now(),
            timeout: self.timeout,
        }
    }

    fn ask(&self, request: &NarrativeRequest<'_>) -> std::result::Result<String, CombatFailure> {
        let response = self
            .narrator
            .respond(request, &self.prompt_prefix)
            .map_err(|err| CombatFailure::Service(err.to_string()))?;
        if response.trim().is_empty() {
            return Err(CombatFailure::EmptyResponse);
        }
        Ok(response)
    }
}

/// A fight whose verdict has not been collected yet.
#[derive(Debug)]
pub struct PendingCombat {
    combat: Combat,
    receiver: Receiver<CombatResult>,
    started: Instant,
    timeout: Option<Duration>,
}

impl PendingCombat {
    pub fn combat(&self) -> &Combat {
        &self.combat
    }

    /// Never blocks. `None` means the fight is still going.
    pub fn poll(&self) -> Option<CombatResult> {
        match self.receiver.try_recv() {
            Ok(result) => Some(result),
            Err(TryRecvError::Disconnected) => Some(Err(CombatFailure::Disconnected)),
            Err(TryRecvError::Empty) => match self.timeout {
                Some(timeout) if self.started.elapsed() >= timeout => {
                    Some(Err(CombatFailure::TimedOut(timeout)))
                },
                _ => None,
            },
        }
    }

    /// Blocks until the fight is over or the time allowed runs out.
    pub fn wait(&self) -> CombatResult {
        match self.timeout {
            None => self
                .receiver
                .recv()
                .unwrap_or(Err(CombatFailure::Disconnected)),
            Some(timeout) => {
                let remaining = timeout.saturating_sub(self.started.elapsed());
                match self.receiver.recv_timeout(remaining) {
                    Ok(result) => result,
                    Err(RecvTimeoutError::Timeout) => Err(CombatFailure::TimedOut(timeout)),
                    Err(RecvTimeoutError::Disconnected) => Err(CombatFailure::Disconnected),
                }
            },
        }
    }
}

/// What a finished fight did to the board.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Casualty {
    pub fallen: Piece,
    pub mourners: Vec<PieceId>,
}

/// Removes the loser and lets its friends grieve. Moving the winner is left
/// to the caller.
pub fn apply_consequences(board: &mut Board, combat: &Combat, victor: Victor) -> Result<Casualty> {
    let loser = combat.loser(victor);
    let fallen = board.remove(loser.id()).ok_or_else(|| {
        format!("{} fell in battle but was not on the board", loser.id()).fail_critical_msg()
    })?;
    let mourners = social::apply_death_reaction(board, fallen.id(), fallen.name());
    Ok(Casualty { fallen, mourners })
}
