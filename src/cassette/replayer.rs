//! Replays recorded interactions from a cassette.

use super::format::{Cassette, Interaction};

/// Serves the interactions of a loaded cassette in recorded order.
pub struct CassetteReplayer {
    interactions: Vec<Interaction>,
    cursor: usize,
}

impl CassetteReplayer {
    /// Create a new replayer from a loaded cassette.
    #[must_use]
    pub fn new(cassette: &Cassette) -> Self {
        Self { interactions: cassette.interactions.clone(), cursor: 0 }
    }

    /// Number of interactions not yet served.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.interactions.len() - self.cursor
    }

    /// Return the next recorded interaction.
    ///
    /// # Panics
    ///
    /// Panics if every interaction has already been served.
    pub fn next_interaction(&mut self) -> &Interaction {
        assert!(
            self.cursor < self.interactions.len(),
            "Cassette exhausted: all {count} interactions have been consumed. \
             Last interaction was seq={last_seq}.",
            count = self.interactions.len(),
            last_seq = self.interactions.last().map_or(0, |i| i.seq),
        );
        let interaction = &self.interactions[self.cursor];
        self.cursor += 1;
        interaction
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cassette::format::{Cassette, Interaction};
    use chrono::Utc;
    use serde_json::json;

    fn make_cassette(interactions: Vec<Interaction>) -> Cassette {
        Cassette {
            name: "test".into(),
            recorded_at: Utc::now(),
            host: "node1".into(),
            interactions,
        }
    }

    fn shell_run(seq: u64, command: &str, stdout: &str) -> Interaction {
        Interaction {
            seq,
            port: "shell".into(),
            method: "run".into(),
            input: json!({ "command": command }),
            output: json!({ "ok": { "exit_code": 0, "stdout": stdout, "stderr": "" } }),
        }
    }

    #[test]
    fn replay_cassette_in_order() {
        let cassette = make_cassette(vec![
            shell_run(0, "nmcli -g GENERAL.CONNECTION device show eth0", "eth0\n"),
            shell_run(1, "nmcli connection down 'eth0'", ""),
        ]);

        let mut replayer = CassetteReplayer::new(&cassette);
        assert_eq!(replayer.remaining(), 2);

        let first = replayer.next_interaction();
        assert_eq!(first.seq, 0);
        assert_eq!(first.output["ok"]["stdout"], json!("eth0\n"));

        let second = replayer.next_interaction();
        assert_eq!(second.seq, 1);
        assert_eq!(replayer.remaining(), 0);
    }

    #[test]
    #[should_panic(expected = "Cassette exhausted")]
    fn exhausted_replayer_panics_with_descriptive_message() {
        let cassette = make_cassette(vec![shell_run(0, "whoami", "root\n")]);

        let mut replayer = CassetteReplayer::new(&cassette);
        let _ = replayer.next_interaction(); // consumes the only one
        let _ = replayer.next_interaction(); // should panic
    }

    #[test]
    #[should_panic(expected = "all 0 interactions")]
    fn empty_cassette_panics() {
        let mut replayer = CassetteReplayer::new(&make_cassette(vec![]));
        let _ = replayer.next_interaction();
    }
}
