use std::fmt::Debug;

use getset::Getters;
use serde::{Deserialize, Serialize};

/// Somewhere to show the tale of the war. Nothing written here ever feeds back
/// into the game.
pub trait NarrativeSink: Debug {
    /// `previous_text` is the whole log before `new_text` was added.
    fn update_game_log(&mut self, new_text: &str, previous_text: &str);
    fn set_short_description(&mut self, text: &str);
}

/// The battle log as the game itself remembers it.
#[derive(Clone, Debug, Default, PartialEq, Eq, Getters, Serialize, Deserialize)]
pub struct Transcript {
    #[get = "pub"]
    log: String,
    #[get = "pub"]
    status: String,
}

impl Transcript {
    /// Appends to the log and returns what it held before.
    pub fn append(&mut self, new_text: &str) -> String {
        let previous = self.log.clone();
        self.log.push_str(new_text);
        previous
    }

    pub fn set_status(&mut self, status: &str) {
        self.status = status.to_string();
    }
}

impl NarrativeSink for Transcript {
    fn update_game_log(&mut self, new_text: &str, previous_text: &str) {
        self.log = format!("{}{}", previous_text, new_text);
    }

    fn set_short_description(&mut self, text: &str) {
        self.set_status(text);
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn append_reports_previous_text() {
        let mut transcript = Transcript::default();
        assert_eq!(transcript.append("one"), "");
        assert_eq!(transcript.append(" two"), "one");
        assert_eq!(transcript.log(), "one two");
    }

    #[test]
    fn sink_rebuilds_from_previous_text() {
        let mut mirror = Transcript::default();
        mirror.update_game_log("\n ... \n", "");
        mirror.update_game_log("A story.", "\n ... \n");
        assert_eq!(mirror.log(), "\n ... \nA story.");
        mirror.set_short_description("The war continues...");
        assert_eq!(mirror.status(), "The war continues...");
    }
}
