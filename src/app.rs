use std::time::{Duration, Instant};

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use tracing::debug;

use crate::pack::{PackError, WordPack};
use crate::runtime::AppEvent;
use crate::scheduler::Scheduler;
use crate::session::{Session, SubmitOutcome};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    /// Waiting for the pack provider
    Loading,
    Ready,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Continue,
    Quit,
}

/// Glue between runtime events, the session and the advance timer
#[derive(Debug)]
pub struct App {
    pub session: Session,
    pub state: AppState,
    scheduler: Scheduler,
    preferred_pack: Option<u32>,
}

impl App {
    pub fn new(session: Session, advance_delay: Duration) -> Self {
        Self {
            session,
            state: AppState::Loading,
            scheduler: Scheduler::new(advance_delay),
            preferred_pack: None,
        }
    }

    /// Pack to switch to once packs arrive, instead of the first one
    pub fn with_preferred_pack(mut self, id: Option<u32>) -> Self {
        self.preferred_pack = id;
        self
    }

    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    pub fn handle_event(&mut self, event: AppEvent, now: Instant) -> Control {
        match event {
            AppEvent::Key(key) => self.on_key(key, now),
            AppEvent::Tick => {
                self.on_tick(now);
                Control::Continue
            }
            AppEvent::Resize => Control::Continue,
            AppEvent::PacksLoaded(result) => {
                self.on_packs_loaded(result);
                Control::Continue
            }
        }
    }

    pub fn on_packs_loaded(&mut self, result: Result<Vec<WordPack>, PackError>) {
        self.scheduler.cancel();
        match result {
            Ok(packs) => {
                self.session.initialize(packs);
                if let Some(id) = self.preferred_pack {
                    if !self.session.switch_pack(id) {
                        debug!(id, "preferred pack not found, keeping the first pack");
                    }
                }
            }
            Err(err) => self.session.initialize_failed(&err),
        }
        self.state = AppState::Ready;
    }

    /// Fire the pending advance once it is due. Returns true when the session changed.
    pub fn on_tick(&mut self, now: Instant) -> bool {
        match self.scheduler.take_due(now) {
            Some(ticket) => self.session.advance(ticket),
            None => false,
        }
    }

    pub fn on_key(&mut self, key: KeyEvent, now: Instant) -> Control {
        if key.kind != KeyEventKind::Press {
            return Control::Continue;
        }

        match key.code {
            KeyCode::Esc => return Control::Quit,
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                return Control::Quit
            }
            _ => {}
        }

        if self.state == AppState::Loading {
            return Control::Continue;
        }

        match key.code {
            KeyCode::Enter => {
                if let SubmitOutcome::Correct(ticket) = self.session.submit() {
                    self.scheduler.schedule(ticket, now);
                }
            }
            KeyCode::Backspace => self.session.backspace(),
            KeyCode::Tab => self.switch(true),
            KeyCode::BackTab => self.switch(false),
            KeyCode::F(1) => {
                self.session.toggle_hint();
            }
            KeyCode::Char(c)
                if !key
                    .modifiers
                    .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) =>
            {
                self.session.push_char(c)
            }
            _ => {}
        }

        Control::Continue
    }

    fn switch(&mut self, forward: bool) {
        if self.session.cycle_pack(forward) {
            self.scheduler.cancel();
        }
    }
}
