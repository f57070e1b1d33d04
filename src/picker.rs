use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::VecDeque;

/// Strategy for drawing the next word out of a candidate list
pub trait WordPicker {
    /// Return the index of the chosen word, or None when `words` is empty
    fn pick(&mut self, words: &[String]) -> Option<usize>;
}

/// Uniform random draw
pub struct RandomPicker {
    rng: StdRng,
}

impl RandomPicker {
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for RandomPicker {
    fn default() -> Self {
        Self::new()
    }
}

impl WordPicker for RandomPicker {
    fn pick(&mut self, words: &[String]) -> Option<usize> {
        if words.is_empty() {
            return None;
        }
        Some(self.rng.gen_range(0..words.len()))
    }
}

/// Deterministic picker replaying a list of indices.
/// Indices past the end of the candidate list are clamped to the last word;
/// once the script runs out the first word is picked.
#[derive(Debug, Default, Clone)]
pub struct ScriptedPicker {
    script: VecDeque<usize>,
}

impl ScriptedPicker {
    pub fn new<I: IntoIterator<Item = usize>>(script: I) -> Self {
        Self {
            script: script.into_iter().collect(),
        }
    }
}

impl WordPicker for ScriptedPicker {
    fn pick(&mut self, words: &[String]) -> Option<usize> {
        if words.is_empty() {
            return None;
        }
        let idx = self.script.pop_front().unwrap_or(0);
        Some(idx.min(words.len() - 1))
    }
}
