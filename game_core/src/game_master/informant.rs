use std::collections::BTreeMap;
use std::fmt::Debug;

use super::GameCommand;
use crate::error::Error;
use crate::event::TurnEvent;
use crate::model::GameSession;

/**
 * Informant metaphor:
 *
 * Like a spy, they go in and are the eyes on the inside, and usually
 * say what they are told to.
 *
 * An informant is both where player input comes from and where news of the
 * war goes. A terminal, a network peer or a recorder are all informants.
 */
pub trait Informant: Debug {
    fn tick(&mut self, session: &GameSession) -> Option<GameCommand>;
    fn collect(&mut self, event: &TurnEvent, session: &GameSession);
    fn fail(&mut self, error: &Error, command: &GameCommand, session: &GameSession);
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub(super) struct InformantId(usize);

#[derive(Debug, Default)]
pub(super) struct InformantManager {
    informants: BTreeMap<InformantId, Box<dyn Informant>>,
    informant_id_counter: usize,
}

impl InformantManager {
    pub(super) fn tick(&mut self, session: &GameSession) -> Vec<(InformantId, GameCommand)> {
        self.informants
            .iter_mut()
            .filter_map(|(informant_id, informant)| Some((*informant_id, informant.tick(session)?)))
            .collect()
    }

    pub(super) fn add_informant<I: Informant + 'static>(&mut self, informant: I) -> InformantId {
        self.informant_id_counter += 1;
        let id = InformantId(self.informant_id_counter);
        self.informants.insert(id, Box::new(informant));
        id
    }

    pub(super) fn collect(&mut self, event: &TurnEvent, session: &GameSession) {
        for informant in self.informants.values_mut() {
            informant.collect(event, session);
        }
    }

    pub(super) fn fail(&mut self, error: &Error, command: &GameCommand, session: &GameSession) {
        for informant in self.informants.values_mut() {
            informant.fail(error, command, session);
        }
    }
}
