//! The story generator that settles fights, and the places its words end up.
//!
//! The generator is opaque: it takes a prompt and eventually returns text.
//! Two prompts are sent per fight, one asking for a winner and one asking for
//! the tale of how it went.

mod narrators;
mod sink;

use std::fmt::Debug;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::combat::Combatant;

pub use narrators::{CoinFlipNarrator, ScriptedNarrator};
pub use sink::{NarrativeSink, Transcript};

pub const LOG_PLACEHOLDER: &str = "\n ... \n";
pub const AFTER_BATTLE_STATUS: &str = "The war continues...";

#[derive(Debug, Error)]
pub enum NarratorError {
    #[error("narrator unavailable: {0}")]
    Unavailable(String),
    #[error("narrator io: {0}")]
    Io(#[from] std::io::Error),
}

pub trait NarrativeService: Debug + Send + Sync {
    fn generate(&self, prompt: &str) -> Result<String, NarratorError>;

    /// Narrators that do not understand free text can look at the request
    /// itself instead of its prompt.
    fn respond(&self, request: &NarrativeRequest<'_>, prefix: &str) -> Result<String, NarratorError> {
        self.generate(&format!("{}{}", prefix, request.prompt()))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Victor {
    Attacker,
    Defender,
}

#[derive(Clone, Copy, Debug)]
pub enum NarrativeRequest<'a> {
    Verdict {
        attacker: &'a Combatant,
        defender: &'a Combatant,
    },
    Story {
        attacker: &'a Combatant,
        defender: &'a Combatant,
        victor: Victor,
    },
}

impl NarrativeRequest<'_> {
    pub fn prompt(&self) -> String {
        match self {
            NarrativeRequest::Verdict { attacker, defender } => {
                let (a, d) = (attacker.name(), defender.name());
                format!(
                    "The {a} attacks the {d}. Determine the winner. If {a} wins say {a}. If {d} wins say {d}. Say nothing else."
                )
            },
            NarrativeRequest::Story {
                attacker,
                defender,
                victor,
            } => {
                let (a, d) = (attacker.name(), defender.name());
                let ending = match victor {
                    Victor::Attacker => format!(" and the {a} won the fight and killed the {d}."),
                    Victor::Defender => format!(" but the {d} won the fight and killed the {a}."),
                };
                format!(
                    "Write a story in two sentences with the following plot: {}{}The {a} launched an attack on the {d}{ending}",
                    attacker.modifier(),
                    defender.modifier(),
                )
            },
        }
    }
}

/// The defender only wins when the reply starts with its name. Anything else,
/// however garbled, is a win for the attacker.
pub fn decide_victor(response: &str, defender_name: &str) -> Victor {
    if response.starts_with(defender_name) {
        Victor::Defender
    } else {
        Victor::Attacker
    }
}

pub fn battle_status(attacker: &Combatant, defender: &Combatant) -> String {
    format!(
        "The {} has launched an attack on the {}. Please stand by as the battle takes place!",
        attacker.name(),
        defender.name()
    )
}
