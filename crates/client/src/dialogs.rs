/// Severity shown alongside a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    Information,
    Warning,
    Error,
}

/// User-facing prompts raised by the screens.
pub trait Dialogs {
    /// Shows a message. `title` may be empty.
    fn message(&mut self, kind: MessageKind, title: &str, text: &str);

    /// Asks a yes/no question and returns `true` on yes.
    fn confirm(&mut self, title: &str, text: &str) -> bool;
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::{Dialogs, MessageKind};
    use std::collections::VecDeque;

    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct Shown {
        pub kind: MessageKind,
        pub title: String,
        pub text: String,
    }

    /// Records every message and answers confirmations from a queue.
    #[derive(Default)]
    pub struct RecordingDialogs {
        pub shown: Vec<Shown>,
        pub confirmations: Vec<String>,
        answers: VecDeque<bool>,
    }

    impl RecordingDialogs {
        pub fn answering(answers: impl IntoIterator<Item = bool>) -> Self {
            Self {
                answers: answers.into_iter().collect(),
                ..Self::default()
            }
        }

        pub fn texts(&self) -> Vec<&str> {
            self.shown.iter().map(|shown| shown.text.as_str()).collect()
        }
    }

    impl Dialogs for RecordingDialogs {
        fn message(&mut self, kind: MessageKind, title: &str, text: &str) {
            self.shown.push(Shown {
                kind,
                title: title.to_string(),
                text: text.to_string(),
            });
        }

        fn confirm(&mut self, _title: &str, text: &str) -> bool {
            self.confirmations.push(text.to_string());
            self.answers.pop_front().unwrap_or(false)
        }
    }
}
