//! Word selection and completion tracking.
//!
//! A [`Session`] owns the active pack, the pool of words not yet answered in
//! the current cycle, the displayed word and the typed input. Every
//! transition is a method call; rendering and timing live elsewhere.

pub mod feedback;
pub mod matching;

pub use feedback::Feedback;
pub use matching::answer_matches;

use crate::pack::{sanitize_packs, PackError, WordPack};
use crate::picker::{RandomPicker, WordPicker};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, error, info};

const MISSING_HINT: &str = "❓";

/// Handle for one deferred advance. Only the most recently issued ticket
/// is honoured; a pack switch or reload invalidates it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdvanceTicket {
    generation: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Answer accepted; schedule the ticket to move on
    Correct(AdvanceTicket),
    /// The word was already answered and its advance is still pending
    AlreadyAnswered,
    Incorrect,
    /// No pack is active
    Ignored,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Packless,
    Ready,
    AwaitingAdvance,
}

pub struct Session {
    packs: Vec<Arc<WordPack>>,
    selected: Option<Arc<WordPack>>,
    remaining: Vec<String>,
    current_word: Option<String>,
    input: String,
    feedback: Feedback,
    hint_visible: bool,
    generation: u64,
    pending: Option<u64>,
    picker: Box<dyn WordPicker>,
}

impl Session {
    pub fn new(picker: Box<dyn WordPicker>) -> Self {
        Self {
            packs: Vec::new(),
            selected: None,
            remaining: Vec::new(),
            current_word: None,
            input: String::new(),
            feedback: Feedback::None,
            hint_visible: false,
            generation: 0,
            pending: None,
            picker,
        }
    }

    /// Load a fresh pack list and auto-select the first pack
    pub fn initialize(&mut self, packs: Vec<WordPack>) {
        self.packs = sanitize_packs(packs).into_iter().map(Arc::new).collect();
        self.invalidate_pending();
        self.selected = self.packs.first().cloned();
        self.remaining = self
            .selected
            .as_ref()
            .map(|p| p.words.clone())
            .unwrap_or_default();
        self.current_word = None;
        self.input.clear();
        self.feedback = Feedback::None;
        self.hint_visible = false;

        match &self.selected {
            Some(pack) => info!(packs = self.packs.len(), selected = pack.id, "word packs loaded"),
            None => info!("no word packs available"),
        }

        self.select_next_word();
    }

    /// Record a provider failure: no packs, no word, a visible error message
    pub fn initialize_failed(&mut self, err: &PackError) {
        error!(error = %err, "error loading word packs");
        self.packs.clear();
        self.invalidate_pending();
        self.selected = None;
        self.remaining.clear();
        self.current_word = None;
        self.input.clear();
        self.hint_visible = false;
        self.feedback = Feedback::LoadFailed;
    }

    /// Draw the next word from the pool, restarting the cycle when the pool is empty
    pub fn select_next_word(&mut self) {
        let Some(pack) = self.selected.clone() else {
            return;
        };

        if self.remaining.is_empty() {
            info!(pack = pack.id, "all words completed, starting over");
            self.remaining = pack.words.clone();
            self.feedback = Feedback::Exhausted;
            self.current_word = draw(self.picker.as_mut(), &pack.words);
            return;
        }

        self.current_word = draw(self.picker.as_mut(), &self.remaining);
    }

    /// Check the typed input against the current word
    pub fn submit(&mut self) -> SubmitOutcome {
        let (Some(pack), Some(word)) = (&self.selected, &self.current_word) else {
            return SubmitOutcome::Ignored;
        };

        if !answer_matches(&self.input, word, pack.case_insensitive) {
            self.feedback = Feedback::Incorrect;
            return SubmitOutcome::Incorrect;
        }

        let word = word.clone();
        self.feedback = Feedback::Correct;
        self.input.clear();
        self.hint_visible = false;

        if self.pending.is_some() {
            debug!(word = %word, "word already answered, advance pending");
            return SubmitOutcome::AlreadyAnswered;
        }

        self.remaining.retain(|w| *w != word);
        self.generation += 1;
        self.pending = Some(self.generation);
        debug!(word = %word, remaining = self.remaining.len(), "correct answer");

        SubmitOutcome::Correct(AdvanceTicket {
            generation: self.generation,
        })
    }

    /// Replace the input and submit it
    pub fn submit_text(&mut self, text: &str) -> SubmitOutcome {
        self.set_input(text);
        self.submit()
    }

    /// Run a deferred advance. Returns false when the ticket is stale.
    pub fn advance(&mut self, ticket: AdvanceTicket) -> bool {
        if self.pending != Some(ticket.generation) {
            debug!(
                ticket = ticket.generation,
                current = self.generation,
                "dropping stale advance"
            );
            return false;
        }

        self.pending = None;
        self.feedback = Feedback::None;
        self.select_next_word();
        true
    }

    /// Select another pack and draw a word from all of its words. Unknown ids are ignored.
    pub fn switch_pack(&mut self, id: u32) -> bool {
        let Some(pack) = self.packs.iter().find(|p| p.id == id).cloned() else {
            debug!(id, "ignoring switch to unknown pack");
            return false;
        };

        info!(id = pack.id, name = %pack.name, "switching word pack");
        self.invalidate_pending();
        self.remaining = pack.words.clone();
        self.feedback = Feedback::None;
        self.hint_visible = false;
        self.current_word = draw(self.picker.as_mut(), &pack.words);
        self.selected = Some(pack);
        true
    }

    /// Switch to the pack after (or before) the selected one, wrapping around
    pub fn cycle_pack(&mut self, forward: bool) -> bool {
        if self.packs.is_empty() {
            return false;
        }
        let len = self.packs.len();
        let idx = self
            .selected
            .as_ref()
            .and_then(|sel| self.packs.iter().position(|p| p.id == sel.id))
            .map(|pos| if forward { (pos + 1) % len } else { (pos + len - 1) % len })
            .unwrap_or(0);
        let id = self.packs[idx].id;
        self.switch_pack(id)
    }

    pub fn set_input(&mut self, text: &str) {
        self.input = text.to_string();
    }

    pub fn push_char(&mut self, c: char) {
        self.input.push(c);
    }

    pub fn backspace(&mut self) {
        self.input.pop();
    }

    /// Show or hide the hint. Packs without hints never show one.
    pub fn toggle_hint(&mut self) -> bool {
        let has_hints = self.selected.as_ref().is_some_and(|p| p.has_hints());
        if has_hints && self.current_word.is_some() {
            self.hint_visible = !self.hint_visible;
        }
        self.hint_visible
    }

    pub fn hint(&self) -> Option<&str> {
        if !self.hint_visible {
            return None;
        }
        let pack = self.selected.as_ref()?;
        let word = self.current_word.as_ref()?;
        Some(pack.hints.get(word).map(String::as_str).unwrap_or(MISSING_HINT))
    }

    pub fn packs(&self) -> &[Arc<WordPack>] {
        &self.packs
    }

    pub fn selected_pack(&self) -> Option<&WordPack> {
        self.selected.as_deref()
    }

    pub fn current_word(&self) -> Option<&str> {
        self.current_word.as_deref()
    }

    pub fn remaining_words(&self) -> &[String] {
        &self.remaining
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn feedback(&self) -> Feedback {
        self.feedback
    }

    pub fn hint_visible(&self) -> bool {
        self.hint_visible
    }

    pub fn is_case_insensitive(&self) -> bool {
        self.selected.as_ref().is_some_and(|p| p.case_insensitive)
    }

    #[cfg(test)]
    fn generation(&self) -> u64 {
        self.generation
    }

    pub fn phase(&self) -> Phase {
        match (&self.selected, self.pending) {
            (None, _) => Phase::Packless,
            (Some(_), Some(_)) => Phase::AwaitingAdvance,
            (Some(_), None) => Phase::Ready,
        }
    }

    fn invalidate_pending(&mut self) {
        self.generation += 1;
        self.pending = None;
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new(Box::new(RandomPicker::new()))
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("selected", &self.selected.as_ref().map(|p| p.id))
            .field("remaining", &self.remaining)
            .field("current_word", &self.current_word)
            .field("input", &self.input)
            .field("feedback", &self.feedback)
            .field("generation", &self.generation)
            .field("pending", &self.pending)
            .finish_non_exhaustive()
    }
}

fn draw(picker: &mut dyn WordPicker, words: &[String]) -> Option<String> {
    picker.pick(words).and_then(|idx| words.get(idx)).cloned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::picker::ScriptedPicker;
    use assert_matches::assert_matches;
    use std::collections::HashSet;

    fn words(list: &[&str]) -> Vec<String> {
        list.iter().map(|w| w.to_string()).collect()
    }

    fn mock_pack() -> WordPack {
        WordPack::new(1, "Mock Pack", words(&["MOCK1", "MOCK2"]))
    }

    fn kindergarten() -> WordPack {
        WordPack::new(4, "Kindergarten", words(&["Cat", "Dog"]))
            .case_insensitive()
            .with_hints([("Cat", "🐱")])
    }

    fn session_with(packs: Vec<WordPack>, script: Vec<usize>) -> Session {
        let mut session = Session::new(Box::new(ScriptedPicker::new(script)));
        session.initialize(packs);
        session
    }

    fn answer_current(session: &mut Session) -> SubmitOutcome {
        let word = session.current_word().unwrap().to_string();
        session.submit_text(&word)
    }

    #[test]
    fn test_initialize_selects_first_pack() {
        let session = session_with(
            vec![mock_pack(), WordPack::new(2, "Other", words(&["X"]))],
            vec![1],
        );

        assert_eq!(session.selected_pack().unwrap().id, 1);
        assert_eq!(session.current_word(), Some("MOCK2"));
        assert_eq!(session.remaining_words(), &words(&["MOCK1", "MOCK2"])[..]);
        assert_eq!(session.feedback(), Feedback::None);
        assert_eq!(session.phase(), Phase::Ready);
    }

    #[test]
    fn test_initialize_with_no_packs_stays_packless() {
        let session = session_with(vec![], vec![]);

        assert!(session.packs().is_empty());
        assert!(session.selected_pack().is_none());
        assert!(session.current_word().is_none());
        assert_eq!(session.feedback(), Feedback::None);
        assert_eq!(session.phase(), Phase::Packless);
    }

    #[test]
    fn test_initialize_failed_surfaces_error() {
        let mut session = session_with(vec![mock_pack()], vec![]);
        session.initialize_failed(&PackError::Missing("test".into()));

        assert!(session.packs().is_empty());
        assert!(session.current_word().is_none());
        assert_eq!(session.feedback(), Feedback::LoadFailed);
        assert_eq!(session.phase(), Phase::Packless);
        assert_eq!(session.submit_text("MOCK1"), SubmitOutcome::Ignored);
    }

    #[test]
    fn test_correct_submission_shrinks_pool_and_clears_input() {
        let mut session = session_with(vec![mock_pack()], vec![0]);

        let outcome = session.submit_text("mock1");

        assert_matches!(outcome, SubmitOutcome::Correct(_));
        assert_eq!(session.feedback(), Feedback::Correct);
        assert_eq!(session.remaining_words(), &words(&["MOCK2"])[..]);
        assert_eq!(session.input(), "");
        assert_eq!(session.current_word(), Some("MOCK1"));
        assert_eq!(session.phase(), Phase::AwaitingAdvance);
    }

    #[test]
    fn test_incorrect_submission_changes_nothing_but_feedback() {
        let mut session = session_with(vec![mock_pack()], vec![0]);
        let before_pool = session.remaining_words().to_vec();

        let outcome = session.submit_text("WRONG");

        assert_eq!(outcome, SubmitOutcome::Incorrect);
        assert_eq!(session.feedback(), Feedback::Incorrect);
        assert_eq!(session.current_word(), Some("MOCK1"));
        assert_eq!(session.remaining_words(), &before_pool[..]);
        assert_eq!(session.input(), "WRONG");
        assert_eq!(session.phase(), Phase::Ready);
    }

    #[test]
    fn test_resubmit_after_incorrect() {
        let mut session = session_with(vec![mock_pack()], vec![0]);

        session.submit_text("MOCK");
        session.push_char('1');

        assert_matches!(session.submit(), SubmitOutcome::Correct(_));
    }

    #[test]
    fn test_advance_clears_feedback_and_draws_from_pool() {
        let mut session = session_with(vec![mock_pack()], vec![0, 0]);

        let SubmitOutcome::Correct(ticket) = answer_current(&mut session) else {
            panic!("expected a correct answer");
        };
        assert!(session.advance(ticket));

        assert_eq!(session.feedback(), Feedback::None);
        assert_eq!(session.current_word(), Some("MOCK2"));
        assert_eq!(session.phase(), Phase::Ready);
    }

    #[test]
    fn test_exhaustion_restarts_cycle() {
        let mut session = session_with(vec![mock_pack()], vec![0, 0, 1]);

        let SubmitOutcome::Correct(first) = answer_current(&mut session) else {
            panic!("expected a correct answer");
        };
        session.advance(first);
        let SubmitOutcome::Correct(second) = answer_current(&mut session) else {
            panic!("expected a correct answer");
        };
        assert!(session.remaining_words().is_empty());

        session.advance(second);

        assert_eq!(session.feedback(), Feedback::Exhausted);
        assert_eq!(session.remaining_words(), &words(&["MOCK1", "MOCK2"])[..]);
        assert_eq!(session.current_word(), Some("MOCK2"));
    }

    #[test]
    fn test_every_word_shown_once_per_cycle() {
        let pack = WordPack::new(
            2,
            "Fruit",
            words(&["APPLE", "BANANA", "CHERRY", "DATE", "FIG"]),
        );
        let mut session = Session::new(Box::new(RandomPicker::seeded(3)));
        session.initialize(vec![pack.clone()]);

        let mut seen = HashSet::new();
        for _ in 0..pack.words.len() {
            let word = session.current_word().unwrap().to_string();
            assert!(seen.insert(word.clone()), "{word} repeated inside a cycle");
            let SubmitOutcome::Correct(ticket) = session.submit_text(&word) else {
                panic!("expected a correct answer");
            };
            assert_ne!(session.feedback(), Feedback::Exhausted);
            session.advance(ticket);
        }

        assert_eq!(seen.len(), pack.words.len());
        assert_eq!(session.feedback(), Feedback::Exhausted);
        assert_eq!(session.remaining_words(), &pack.words[..]);
    }

    #[test]
    fn test_single_word_pack_always_yields_that_word() {
        let pack = WordPack::new(5, "Solo", words(&["ONLY"]));
        let mut session = Session::new(Box::new(RandomPicker::new()));
        session.initialize(vec![pack]);

        for _ in 0..3 {
            assert_eq!(session.current_word(), Some("ONLY"));
            let SubmitOutcome::Correct(ticket) = session.submit_text("only") else {
                panic!("expected a correct answer");
            };
            session.advance(ticket);
            assert_eq!(session.feedback(), Feedback::Exhausted);
        }
    }

    #[test]
    fn test_resubmission_during_delay_is_not_double_counted() {
        let mut session = session_with(vec![mock_pack()], vec![0, 0]);

        let SubmitOutcome::Correct(ticket) = session.submit_text("MOCK1") else {
            panic!("expected a correct answer");
        };
        let generation = session.generation();

        assert_eq!(session.submit_text("MOCK1"), SubmitOutcome::AlreadyAnswered);
        assert_eq!(session.feedback(), Feedback::Correct);
        assert_eq!(session.remaining_words(), &words(&["MOCK2"])[..]);
        assert_eq!(session.generation(), generation);

        assert_eq!(session.submit_text("NOPE"), SubmitOutcome::Incorrect);
        assert!(session.advance(ticket));
        assert_eq!(session.current_word(), Some("MOCK2"));
    }

    #[test]
    fn test_ticket_fires_only_once() {
        let mut session = session_with(vec![mock_pack()], vec![0, 0]);

        let SubmitOutcome::Correct(ticket) = answer_current(&mut session) else {
            panic!("expected a correct answer");
        };

        assert!(session.advance(ticket));
        assert!(!session.advance(ticket));
        assert_eq!(session.current_word(), Some("MOCK2"));
    }

    #[test]
    fn test_switch_pack_cancels_pending_advance() {
        let other = WordPack::new(2, "Other", words(&["X", "Y"]));
        let mut session = session_with(vec![mock_pack(), other], vec![0, 1]);

        let SubmitOutcome::Correct(ticket) = answer_current(&mut session) else {
            panic!("expected a correct answer");
        };
        assert!(session.switch_pack(2));

        assert!(!session.advance(ticket));
        assert_eq!(session.current_word(), Some("Y"));
        assert_eq!(session.feedback(), Feedback::None);
        assert_eq!(session.phase(), Phase::Ready);
    }

    #[test]
    fn test_switch_pack_resets_pool_and_draws_immediately() {
        let other = WordPack::new(2, "Other", words(&["X", "Y", "Z"]));
        let mut session = session_with(vec![mock_pack(), other.clone()], vec![0, 2]);
        session.submit_text("WRONG");

        assert!(session.switch_pack(2));

        assert_eq!(session.selected_pack().unwrap().id, 2);
        assert_eq!(session.remaining_words(), &other.words[..]);
        assert_eq!(session.current_word(), Some("Z"));
        assert_eq!(session.feedback(), Feedback::None);
    }

    #[test]
    fn test_switch_to_same_pack_restarts_cycle() {
        let mut session = session_with(vec![mock_pack()], vec![0, 1]);
        let SubmitOutcome::Correct(_) = answer_current(&mut session) else {
            panic!("expected a correct answer");
        };

        assert!(session.switch_pack(1));

        assert_eq!(session.remaining_words(), &words(&["MOCK1", "MOCK2"])[..]);
        assert_eq!(session.current_word(), Some("MOCK2"));
    }

    #[test]
    fn test_switch_with_empty_pool_skips_exhaustion() {
        let single = WordPack::new(1, "Single", words(&["ONE"]));
        let mut session = session_with(vec![single.clone()], vec![0, 0]);

        let SubmitOutcome::Correct(ticket) = session.submit_text("one") else {
            panic!("expected a correct answer");
        };
        assert!(session.remaining_words().is_empty());

        assert!(session.switch_pack(1));

        assert_eq!(session.feedback(), Feedback::None);
        assert_eq!(session.remaining_words(), &single.words[..]);
        assert_eq!(session.current_word(), Some("ONE"));
        assert!(!session.advance(ticket));
        assert_eq!(session.feedback(), Feedback::None);
    }

    #[test]
    fn test_switch_to_unknown_pack_is_noop() {
        let mut session = session_with(vec![mock_pack()], vec![1]);
        session.submit_text("WRONG");
        let generation = session.generation();

        assert!(!session.switch_pack(99));

        assert_eq!(session.selected_pack().unwrap().id, 1);
        assert_eq!(session.current_word(), Some("MOCK2"));
        assert_eq!(session.feedback(), Feedback::Incorrect);
        assert_eq!(session.generation(), generation);
    }

    #[test]
    fn test_cycle_pack_wraps_around() {
        let packs = vec![
            mock_pack(),
            WordPack::new(2, "Two", words(&["TWO"])),
            WordPack::new(3, "Three", words(&["THREE"])),
        ];
        let mut session = session_with(packs, vec![]);

        session.cycle_pack(true);
        assert_eq!(session.selected_pack().unwrap().id, 2);
        session.cycle_pack(true);
        session.cycle_pack(true);
        assert_eq!(session.selected_pack().unwrap().id, 1);
        session.cycle_pack(false);
        assert_eq!(session.selected_pack().unwrap().id, 3);
    }

    #[test]
    fn test_cycle_pack_without_packs() {
        let mut session = session_with(vec![], vec![]);
        assert!(!session.cycle_pack(true));
    }

    #[test]
    fn test_case_insensitive_pack() {
        let mut session = session_with(vec![kindergarten()], vec![0]);

        assert!(session.is_case_insensitive());
        assert_matches!(session.submit_text("cat"), SubmitOutcome::Correct(_));
    }

    #[test]
    fn test_uppercase_pack_rule() {
        let pack = WordPack::new(1, "Animals", words(&["CAT"]));
        let mut session = session_with(vec![pack], vec![0]);

        assert!(!session.is_case_insensitive());
        assert_matches!(session.submit_text("CAT"), SubmitOutcome::Correct(_));
    }

    #[test]
    fn test_hint_toggle() {
        let mut session = session_with(vec![kindergarten()], vec![0]);

        assert_eq!(session.hint(), None);
        assert!(session.toggle_hint());
        assert_eq!(session.hint(), Some("🐱"));

        session.submit_text("cat");
        assert!(!session.hint_visible());
    }

    #[test]
    fn test_hint_missing_for_word() {
        let mut session = session_with(vec![kindergarten()], vec![1]);

        session.toggle_hint();
        assert_eq!(session.hint(), Some("❓"));
    }

    #[test]
    fn test_hint_unavailable_without_hints() {
        let mut session = session_with(vec![mock_pack()], vec![0]);

        assert!(!session.toggle_hint());
        assert_eq!(session.hint(), None);
    }

    #[test]
    fn test_switch_pack_hides_hint() {
        let mut session = session_with(vec![kindergarten(), mock_pack()], vec![0, 0]);
        session.toggle_hint();

        session.switch_pack(1);

        assert!(!session.hint_visible());
    }

    #[test]
    fn test_input_editing() {
        let mut session = session_with(vec![mock_pack()], vec![0]);

        session.push_char('M');
        session.push_char('X');
        session.backspace();
        assert_eq!(session.input(), "M");

        session.set_input("anything at all");
        assert_eq!(session.input(), "anything at all");

        session.set_input("");
        session.backspace();
        assert_eq!(session.input(), "");
    }

    #[test]
    fn test_initialize_skips_unusable_packs() {
        let session = session_with(
            vec![WordPack::new(1, "Empty", vec![]), mock_pack()],
            vec![0],
        );

        assert_eq!(session.packs().len(), 1);
        assert_eq!(session.current_word(), Some("MOCK1"));
    }
}
