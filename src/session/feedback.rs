/// Transient message shown under the input box
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, strum_macros::Display)]
pub enum Feedback {
    #[default]
    #[strum(to_string = "")]
    None,
    #[strum(to_string = "Great job! 🎉")]
    Correct,
    #[strum(to_string = "Try again! 🤔")]
    Incorrect,
    #[strum(to_string = "All words completed! Starting over...")]
    Exhausted,
    #[strum(to_string = "Error loading word packs")]
    LoadFailed,
}

impl Feedback {
    pub fn is_none(&self) -> bool {
        matches!(self, Feedback::None)
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Feedback::Correct)
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, Feedback::Incorrect | Feedback::LoadFailed)
    }
}
