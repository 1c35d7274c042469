use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::{NarrativeRequest, NarrativeService, NarratorError, Victor};

#[derive(Debug)]
enum Line {
    Reply(String),
    Fail(String),
}

/// Replies from a fixed script, in order. Every prompt it receives is kept so
/// it can be inspected afterwards.
#[derive(Debug, Default)]
pub struct ScriptedNarrator {
    lines: Mutex<VecDeque<Line>>,
    prompts: Mutex<Vec<String>>,
    delay: Option<Duration>,
}

impl ScriptedNarrator {
    pub fn new<S: ToString, I: IntoIterator<Item = S>>(replies: I) -> Self {
        let narrator = ScriptedNarrator::default();
        for reply in replies {
            narrator.push(Line::Reply(reply.to_string()));
        }
        narrator
    }

    pub fn reply<S: ToString>(self, reply: S) -> Self {
        self.push(Line::Reply(reply.to_string()));
        self
    }

    pub fn fail<S: ToString>(self, reason: S) -> Self {
        self.push(Line::Fail(reason.to_string()));
        self
    }

    /// Every reply takes this long to arrive.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts
            .lock()
            .map(|prompts| prompts.clone())
            .unwrap_or_default()
    }

    pub fn remaining(&self) -> usize {
        self.lines.lock().map(|lines| lines.len()).unwrap_or(0)
    }

    fn push(&self, line: Line) {
        if let Ok(mut lines) = self.lines.lock() {
            lines.push_back(line);
        }
    }
}

impl NarrativeService for ScriptedNarrator {
    fn generate(&self, prompt: &str) -> Result<String, NarratorError> {
        if let Ok(mut prompts) = self.prompts.lock() {
            prompts.push(prompt.to_string());
        }
        if let Some(delay) = self.delay {
            std::thread::sleep(delay);
        }
        let line = self
            .lines
            .lock()
            .map_err(|_| NarratorError::Unavailable("script lock poisoned".to_string()))?
            .pop_front();
        match line {
            Some(Line::Reply(reply)) => Ok(reply),
            Some(Line::Fail(reason)) => Err(NarratorError::Unavailable(reason)),
            None => Err(NarratorError::Unavailable("script exhausted".to_string())),
        }
    }
}

/// Settles fights with a fair coin and tells the same short tale every time.
/// Useful when no real story generator is around.
#[derive(Debug)]
pub struct CoinFlipNarrator {
    rng: Mutex<StdRng>,
}

impl CoinFlipNarrator {
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        CoinFlipNarrator {
            rng: Mutex::new(rng),
        }
    }

    fn flip(&self) -> Result<bool, NarratorError> {
        self.rng
            .lock()
            .map(|mut rng| rng.random_bool(0.5))
            .map_err(|_| NarratorError::Unavailable("coin lost".to_string()))
    }
}

impl NarrativeService for CoinFlipNarrator {
    fn generate(&self, _prompt: &str) -> Result<String, NarratorError> {
        Ok("The clash was brief and brutal.".to_string())
    }

    fn respond(&self, request: &NarrativeRequest<'_>, _prefix: &str) -> Result<String, NarratorError> {
        match request {
            NarrativeRequest::Verdict { attacker, defender } => {
                let attacker_wins = self.flip()?;
                log::debug!("Coin says attacker wins: {}", attacker_wins);
                Ok(if attacker_wins { attacker.name() } else { defender.name() }.to_string())
            },
            NarrativeRequest::Story {
                attacker,
                defender,
                victor,
            } => {
                let (winner, loser) = match victor {
                    Victor::Attacker => (attacker.name(), defender.name()),
                    Victor::Defender => (defender.name(), attacker.name()),
                };
                Ok(format!(
                    "The {} charged the {} across the field. When the dust settled, the {} stood alone over the fallen {}.",
                    attacker.name(),
                    defender.name(),
                    winner,
                    loser
                ))
            },
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::combat::Combatant;
    use crate::model::PieceId;

    #[test]
    fn script_plays_in_order_then_runs_dry() {
        let narrator = ScriptedNarrator::new(["first"]).fail("offline").reply("third");
        assert_eq!(narrator.generate("a").unwrap(), "first");
        assert!(narrator.generate("b").is_err());
        assert_eq!(narrator.generate("c").unwrap(), "third");
        assert!(matches!(
            narrator.generate("d"),
            Err(NarratorError::Unavailable(_))
        ));
        assert_eq!(narrator.prompts(), vec!["a", "b", "c", "d"]);
        assert_eq!(narrator.remaining(), 0);
    }

    #[test]
    fn coin_flip_names_one_of_the_fighters() {
        let narrator = CoinFlipNarrator::new(Some(4));
        let a = Combatant::new(PieceId(1), "Queen of England", "");
        let d = Combatant::new(PieceId(17), "Queen of France", "");
        let request = NarrativeRequest::Verdict {
            attacker: &a,
            defender: &d,
        };
        let mut seen = std::collections::HashSet::new();
        for _ in 0..64 {
            let verdict = narrator.respond(&request, "").unwrap();
            assert!(verdict == a.name() || verdict == d.name());
            seen.insert(verdict);
        }
        assert_eq!(seen.len(), 2);

        let story = narrator
            .respond(
                &NarrativeRequest::Story {
                    attacker: &a,
                    defender: &d,
                    victor: Victor::Defender,
                },
                "",
            )
            .unwrap();
        assert!(story.ends_with("the Queen of France stood alone over the fallen Queen of England."));
    }
}
