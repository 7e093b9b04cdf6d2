//! Replays recorded interactions from a cassette.

use std::collections::HashMap;

use super::format::{Cassette, Interaction};

/// Key for indexing interactions by port and method.
#[derive(Debug, Clone, Hash, Eq, PartialEq)]
struct PortMethodKey {
    port: String,
    method: String,
}

/// Replays interactions from a loaded cassette, serving them sequentially
/// per port/method pair.
pub struct CassetteReplayer {
    queues: HashMap<PortMethodKey, Vec<Interaction>>,
    cursors: HashMap<PortMethodKey, usize>,
}

impl CassetteReplayer {
    /// Create a new replayer from a loaded cassette.
    #[must_use]
    pub fn new(cassette: &Cassette) -> Self {
        let mut queues: HashMap<PortMethodKey, Vec<Interaction>> = HashMap::new();
        for interaction in &cassette.interactions {
            let key = PortMethodKey {
                port: interaction.port.clone(),
                method: interaction.method.clone(),
            };
            queues.entry(key).or_default().push(interaction.clone());
        }
        let cursors = queues.keys().map(|k| (k.clone(), 0)).collect();
        Self { queues, cursors }
    }

    /// Return the next interaction for the given port and method, checking
    /// that every field of the recorded input matches `input`.
    ///
    /// Fields present in `input` but absent from the recording are ignored,
    /// so hand-written cassettes may record only the `path`.
    ///
    /// # Panics
    ///
    /// Panics if the cassette has no (more) interactions for the given
    /// port/method combination, or if the recorded input disagrees with the
    /// actual call. Replay drift is a test failure, not a recoverable error.
    pub fn next_interaction(
        &mut self,
        port: &str,
        method: &str,
        input: &serde_json::Value,
    ) -> &Interaction {
        let key = PortMethodKey { port: port.to_string(), method: method.to_string() };

        let queue = self.queues.get(&key).unwrap_or_else(|| {
            let available: Vec<String> =
                self.queues.keys().map(|k| format!("{}::{}", k.port, k.method)).collect();
            panic!(
                "Cassette exhausted: no interactions recorded for port={port:?} method={method:?}. \
                 Available port::method pairs: [{}]",
                available.join(", ")
            );
        });

        let cursor = self.cursors.get_mut(&key).expect("cursor must exist");
        assert!(
            *cursor < queue.len(),
            "Cassette exhausted: all {count} interactions for port={port:?} method={method:?} \
             have been consumed. Last interaction was seq={last_seq}.",
            count = queue.len(),
            last_seq = queue.last().map_or(0, |i| i.seq),
        );

        let interaction = &queue[*cursor];
        *cursor += 1;

        if let Some(recorded) = interaction.input.as_object() {
            for (field, expected) in recorded {
                let actual = input.get(field).unwrap_or(&serde_json::Value::Null);
                assert!(
                    actual == expected,
                    "Replay mismatch at seq={seq} {port}::{method}: field {field:?} \
                     recorded as {expected} but called with {actual}",
                    seq = interaction.seq,
                );
            }
        }
        interaction
    }

    /// Number of interactions not yet consumed, across all ports.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.queues.iter().map(|(key, queue)| queue.len() - self.cursors[key]).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use serde_json::json;

    fn make_cassette(interactions: Vec<Interaction>) -> Cassette {
        Cassette { name: "test".into(), recorded_at: Utc::now(), commit: "abc".into(), interactions }
    }

    fn fs_call(seq: u64, method: &str, path: &str, output: serde_json::Value) -> Interaction {
        Interaction {
            seq,
            port: "fs".into(),
            method: method.into(),
            input: json!({"path": path}),
            output,
        }
    }

    #[test]
    fn replays_each_method_queue_in_order() {
        let cassette = make_cassette(vec![
            fs_call(0, "exists", "a/index.ts", json!(true)),
            fs_call(1, "read_to_string", "x.ts", json!({"Ok": "one"})),
            fs_call(2, "exists", "b/index.ts", json!(false)),
        ]);
        let mut replayer = CassetteReplayer::new(&cassette);
        assert_eq!(replayer.remaining(), 3);

        let first = replayer.next_interaction("fs", "exists", &json!({"path": "a/index.ts"}));
        assert_eq!(first.output, json!(true));
        let read = replayer.next_interaction("fs", "read_to_string", &json!({"path": "x.ts"}));
        assert_eq!(read.seq, 1);
        let second = replayer.next_interaction("fs", "exists", &json!({"path": "b/index.ts"}));
        assert_eq!(second.output, json!(false));
        assert_eq!(replayer.remaining(), 0);
    }

    #[test]
    fn extra_actual_fields_are_ignored() {
        let cassette = make_cassette(vec![fs_call(0, "write", "x.ts", json!({"Ok": null}))]);
        let mut replayer = CassetteReplayer::new(&cassette);
        let call = replayer.next_interaction("fs", "write", &json!({"path": "x.ts", "contents": "c"}));
        assert_eq!(call.seq, 0);
    }

    #[test]
    #[should_panic(expected = "Replay mismatch")]
    fn mismatched_input_panics() {
        let cassette = make_cassette(vec![fs_call(0, "exists", "a/index.ts", json!(true))]);
        let mut replayer = CassetteReplayer::new(&cassette);
        let _ = replayer.next_interaction("fs", "exists", &json!({"path": "b/index.ts"}));
    }

    #[test]
    #[should_panic(expected = "Cassette exhausted")]
    fn exhausted_replayer_panics_with_descriptive_message() {
        let cassette = make_cassette(vec![fs_call(0, "exists", "x", json!(true))]);
        let mut replayer = CassetteReplayer::new(&cassette);
        let _ = replayer.next_interaction("fs", "exists", &json!({"path": "x"}));
        let _ = replayer.next_interaction("fs", "exists", &json!({"path": "x"}));
    }

    #[test]
    #[should_panic(expected = "no interactions recorded")]
    fn unknown_method_panics() {
        let cassette = make_cassette(vec![]);
        let mut replayer = CassetteReplayer::new(&cassette);
        let _ = replayer.next_interaction("fs", "list_dir", &json!({}));
    }
}
