mod game_command;
mod informant;

use std::sync::Arc;
use std::time::{Duration, Instant};

pub use game_command::GameCommand;
pub use informant::Informant;
use informant::InformantManager;

use crate::combat::{self, Combat, CombatOrchestrator, CombatReport, CombatResult, PendingCombat};
use crate::configuration::GameConfiguration;
use crate::error::{CombatFailure, Error, ErrorMsg as _, Result};
use crate::event::{LoggedEvent, TurnEvent};
use crate::model::{Allegiance, Board, GameSession, Phase, PieceId, PieceType};
use crate::narrative::{self, NarrativeService, NarrativeSink, Victor, AFTER_BATTLE_STATUS, LOG_PLACEHOLDER};
use crate::{offset, social, Point};

// The only thing that changes the game session. It fulfills the following roles:
// * Translation of player "commands" into moves, fights and events
// * Holding the single fight in flight, and refusing input until it is over
// * Telling informants and narrative sinks what happened
#[derive(Debug)]
pub struct TurnController {
    running: bool,
    session: GameSession,
    orchestrator: CombatOrchestrator,
    pending: Option<PendingCombat>,
    sinks: Vec<Box<dyn NarrativeSink>>,
    informants: InformantManager,
    // Recorded but not yet told to informants
    undelivered: Vec<LoggedEvent>,
}

const FRAME_DELAY: Duration = Duration::from_millis(100);

impl TurnController {
    pub fn new(config: GameConfiguration, narrator: Arc<dyn NarrativeService>) -> Result<Self> {
        let orchestrator = orchestrator_for(&config, narrator);
        Ok(Self::from_parts(GameSession::new(config)?, orchestrator))
    }

    /// Starts from an arbitrary position instead of the standard layout.
    pub fn with_board(
        config: GameConfiguration,
        board: Board,
        narrator: Arc<dyn NarrativeService>,
    ) -> Result<Self> {
        board.check_invariants()?;
        let config = config.validate()?;
        let orchestrator = orchestrator_for(&config, narrator);
        Ok(Self::from_parts(GameSession::with_board(config, board), orchestrator))
    }

    fn from_parts(session: GameSession, orchestrator: CombatOrchestrator) -> Self {
        TurnController {
            running: true,
            session,
            orchestrator,
            pending: None,
            sinks: Vec::new(),
            informants: InformantManager::default(),
            undelivered: Vec::new(),
        }
    }

    pub fn session(&self) -> &GameSession {
        &self.session
    }

    pub fn pending_combat(&self) -> Option<&PendingCombat> {
        self.pending.as_ref()
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn add_sink<S: NarrativeSink + 'static>(&mut self, sink: S) {
        self.sinks.push(Box::new(sink));
    }

    pub fn add_informant<I: Informant + 'static>(&mut self, informant: I) {
        self.informants.add_informant(informant);
    }

    /// Ticks informants and collects finished fights until something shuts
    /// the game down. Only a critical error is returned.
    pub fn run(&mut self) -> Result<()> {
        while self.running {
            let start_frame = Instant::now();
            let commands = self.informants.tick(&self.session);
            for (_informant_id, command) in commands {
                if let Err(error) = self.apply_command(command) {
                    if error.is_critical() {
                        self.running = false;
                        return Err(error);
                    }
                }
            }
            match self.poll_combat() {
                Err(error) if error.is_critical() => {
                    self.running = false;
                    return Err(error);
                },
                Err(error) => log::info!("Battle abandoned: {}", error),
                Ok(_) => {},
            }
            std::thread::sleep(FRAME_DELAY.saturating_sub(start_frame.elapsed()));
        }
        Ok(())
    }

    pub fn apply_command(&mut self, command: GameCommand) -> Result<()> {
        let result = game_command::apply_command_dispatch(self, &command);
        self.deliver_events();
        if let Err(error) = &result {
            log::debug!("Command {:?} failed: {}", command, error);
            self.informants.fail(error, &command, &self.session);
        }
        result
    }

    /// Collects the pending fight if it is over. `Ok(true)` means a fight was
    /// settled by this call.
    pub fn poll_combat(&mut self) -> Result<bool> {
        let result = match self.pending.as_ref().map(PendingCombat::poll) {
            Some(Some(result)) => result,
            _ => return Ok(false),
        };
        let settled = self.settle_combat(result);
        self.deliver_events();
        settled.map(|_| true)
    }

    /// Blocks until the pending fight is settled.
    pub fn wait_for_combat(&mut self) -> Result<()> {
        let result = match &self.pending {
            Some(pending) => pending.wait(),
            None => return "No battle is being fought".invalid(),
        };
        let settled = self.settle_combat(result);
        self.deliver_events();
        settled
    }

    fn handle_tile(&mut self, tile: Option<Point>) -> Result<()> {
        match (self.session.phase(), tile) {
            (Phase::Selected, Some(pt)) => self.target(pt),
            (Phase::Selected, None) => self.deselect(),
            (_, Some(pt)) => self.select(pt),
            (_, None) => Ok(()),
        }
    }

    fn select(&mut self, pt: Point) -> Result<()> {
        let Some(piece) = self.session.board().piece_at(pt) else {
            log::debug!("Nothing to select at {:?}", pt);
            return Ok(());
        };
        if piece.allegiance() != self.session.active() {
            log::debug!("{} does not answer to {}", piece.id(), self.session.active());
            return Ok(());
        }
        let legality = self.session.legal_moves(piece);
        if !legality.any() {
            log::debug!("{} has nowhere to go", piece.id());
            return Ok(());
        }
        let id = piece.id();
        self.session.turn_mut().select(id, legality);
        self.record(TurnEvent::Selected { piece: id, at: pt });
        Ok(())
    }

    fn deselect(&mut self) -> Result<()> {
        if let Some(piece) = self.session.turn().selected() {
            self.session.turn_mut().deselect();
            self.record(TurnEvent::Deselected { piece });
        }
        Ok(())
    }

    fn target(&mut self, pt: Point) -> Result<()> {
        let turn = self.session.turn();
        let (Some(id), Some(legality)) = (turn.selected(), *turn.legality()) else {
            return "No piece selected to move".invalid();
        };
        if !legality.allows(pt) {
            log::debug!("{} cannot reach {:?}", id, pt);
            return self.deselect();
        }
        let board = self.session.board();
        let attacker = board
            .piece(id)
            .ok_or_else(|| format!("Selected piece {} is not on the board", id).fail_critical_msg())?;
        match board.piece_at(pt) {
            None => {
                self.commit_move(id, pt)?;
                self.finish_turn();
                Ok(())
            },
            Some(defender) if !defender.is_enemy_of(attacker) => {
                format!("{} was allowed to attack its comrade {}", id, defender.id()).fail_critical()
            },
            Some(defender) if defender.piece_type() == PieceType::King => {
                let winner = attacker.allegiance();
                self.game_over(winner)
            },
            Some(defender) => {
                let combat = Combat::new(attacker, defender);
                self.start_combat(combat);
                Ok(())
            },
        }
    }

    /// Moves a piece to an empty square and does the pawn bookkeeping that
    /// goes with it. The turn is not passed.
    fn commit_move(&mut self, id: PieceId, to: Point) -> Result<()> {
        let en_passant = self.session.take_en_passant();
        let mover = self
            .session
            .piece(id)
            .ok_or_else(|| format!("No piece {} to move", id).fail_critical_msg())?
            .clone();
        let from = mover.position();
        self.session.board_mut().move_piece(id, to)?;
        self.record(TurnEvent::Moved { piece: id, from, to });

        if mover.piece_type() == PieceType::Pawn {
            let forward = mover.allegiance().forward();
            if en_passant == Some(to) {
                let victim = offset(to, (0, -forward))
                    .and_then(|behind| self.session.board().piece_at(behind))
                    .filter(|victim| {
                        victim.piece_type() == PieceType::Pawn && victim.is_enemy_of(&mover)
                    })
                    .map(|victim| (victim.id(), victim.position()));
                if let Some((victim, at)) = victim {
                    self.record(TurnEvent::EnPassantCapture { piece: id, victim, at });
                    self.kill(victim)?;
                }
            }
            if to.1 == mover.allegiance().promotion_rank() {
                if let Some(pawn) = self.session.board_mut().piece_mut(id) {
                    pawn.promote();
                }
                log::info!("{} ({}) was promoted to Queen", mover.name(), id);
                self.record(TurnEvent::Promoted { piece: id, at: to });
            }
            if from.1 == mover.allegiance().pawn_start_rank()
                && offset(from, (0, 2 * forward)) == Some(to)
            {
                self.session.set_en_passant(offset(from, (0, forward)));
            }
        }
        self.session.board().check_invariants()
    }

    fn kill(&mut self, id: PieceId) -> Result<()> {
        let fallen = self
            .session
            .board_mut()
            .remove(id)
            .ok_or_else(|| format!("{} died but was not on the board", id).fail_critical_msg())?;
        let mourners = social::apply_death_reaction(self.session.board_mut(), id, fallen.name());
        self.record(TurnEvent::PieceDied {
            piece: id,
            name: fallen.name().to_string(),
            mourners,
        });
        Ok(())
    }

    fn finish_turn(&mut self) {
        self.session.turn_mut().pass_turn();
        let to = self.session.active();
        self.record(TurnEvent::TurnPassed { to });
    }

    fn start_combat(&mut self, combat: Combat) {
        log::info!(
            "{} ({}) attacks {} ({})",
            combat.attacker().name(),
            combat.attacker().id(),
            combat.defender().name(),
            combat.defender().id()
        );
        self.set_status(&narrative::battle_status(combat.attacker(), combat.defender()));
        self.append_log(LOG_PLACEHOLDER);
        self.session.turn_mut().start_combat(combat.clone());
        self.record(TurnEvent::CombatStarted(combat.clone()));
        self.pending = Some(self.orchestrator.begin(combat));
    }

    fn settle_combat(&mut self, result: CombatResult) -> Result<()> {
        let Some(pending) = self.pending.take() else {
            return "No battle is being fought".invalid();
        };
        let combat = pending.combat().clone();
        let settled = match result {
            Ok(report) => self.resolve_combat(combat, report),
            Err(failure) => self.fail_combat(combat, failure),
        };
        // Input must never stay locked once the fight is gone.
        if self.session.phase() == Phase::ResolvingCombat {
            self.session.turn_mut().deselect();
        }
        settled
    }

    fn resolve_combat(&mut self, combat: Combat, report: CombatReport) -> Result<()> {
        let victor = report.victor();
        self.append_log(report.story());
        self.set_status(AFTER_BATTLE_STATUS);
        log::info!(
            "{} defeated {}",
            combat.winner(victor).name(),
            combat.loser(victor).name()
        );
        self.record(TurnEvent::CombatResolved {
            combat: combat.clone(),
            victor,
            story: report.story().clone(),
        });
        let casualty = combat::apply_consequences(self.session.board_mut(), &combat, victor)?;
        let fallen_king = (casualty.fallen.piece_type() == PieceType::King)
            .then(|| casualty.fallen.allegiance());
        self.record(TurnEvent::PieceDied {
            piece: casualty.fallen.id(),
            name: casualty.fallen.name().to_string(),
            mourners: casualty.mourners,
        });
        if let Some(fallen) = fallen_king {
            // A king only enters a fight as the attacker, and it lost.
            return self.game_over(fallen.other());
        }
        match victor {
            Victor::Attacker => self.commit_move(combat.attacker().id(), combat.to())?,
            Victor::Defender => {
                // The defender holds its square, but the attempt still used up the turn.
                self.session.set_en_passant(None);
                self.session.board().check_invariants()?;
            },
        }
        self.finish_turn();
        Ok(())
    }

    fn fail_combat(&mut self, combat: Combat, failure: CombatFailure) -> Result<()> {
        log::warn!(
            "Battle between {} and {} abandoned: {}",
            combat.attacker().id(),
            combat.defender().id(),
            failure
        );
        self.append_log(&format!(
            "The battle between the {} and the {} was lost in the fog of war. ",
            combat.attacker().name(),
            combat.defender().name()
        ));
        self.set_status(&format!(
            "The battle could not be told ({}). The {} awaits new orders.",
            failure,
            combat.attacker().name()
        ));
        self.session.turn_mut().deselect();
        self.record(TurnEvent::CombatFailed {
            combat,
            failure: failure.clone(),
        });
        Err(Error::CombatResolutionFailed(failure))
    }

    fn game_over(&mut self, winner: Allegiance) -> Result<()> {
        log::info!("The {} king has fallen, {} wins the war", winner.other(), winner);
        self.session.turn_mut().set_phase(Phase::GameOver);
        self.session.set_last_winner(winner);
        self.record(TurnEvent::GameOver { winner });
        self.set_status(&format!("{} has won the war. A new war begins.", winner));
        self.session.reseed()
    }

    fn restart(&mut self) -> Result<()> {
        log::info!("Restarting the war");
        self.session.reseed()?;
        self.record(TurnEvent::Restarted);
        Ok(())
    }

    fn append_log(&mut self, text: &str) {
        let previous = self.session.transcript_mut().append(text);
        for sink in self.sinks.iter_mut() {
            sink.update_game_log(text, &previous);
        }
    }

    fn set_status(&mut self, text: &str) {
        self.session.transcript_mut().set_status(text);
        for sink in self.sinks.iter_mut() {
            sink.set_short_description(text);
        }
    }

    fn record(&mut self, event: TurnEvent) {
        log::debug!("Event: {:?}", event);
        let logged = self.session.record(event);
        self.undelivered.push(logged);
    }

    /// Informants hear about events once the command that caused them is
    /// done, so they always see the board the events led to.
    fn deliver_events(&mut self) {
        for logged in std::mem::take(&mut self.undelivered) {
            self.informants.collect(&logged.event, &self.session);
        }
    }
}

fn orchestrator_for(config: &GameConfiguration, narrator: Arc<dyn NarrativeService>) -> CombatOrchestrator {
    CombatOrchestrator::new(narrator, config.prompt_prefix.clone(), config.combat_timeout())
}
