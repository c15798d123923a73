use std::sync::mpsc;

/// Requests emitted by the tree for the controller. None of them mutate the
/// tree; the controller applies the change later through the inbound API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TreeEvent {
    /// A filter was chosen; an empty hash clears the selection.
    FilterSelected(String),
    FaveRemovalRequested(String),
    FaveAdditionRequested(String),
    FaveRenamed {
        hash: String,
        new_name: String,
    },
    /// `path` is the fave path of the folder before renaming.
    FaveSubfolderRenamed {
        path: String,
        old_name: String,
        new_name: String,
    },
    FaveSubfolderCreationRequested(String),
}

/// Yes/no confirmation for destructive actions.
pub trait UserPrompt {
    fn confirm(&mut self, title: &str, text: &str) -> bool;
}

/// Prompt answering with a fixed value; handy for headless controllers.
#[derive(Debug, Clone, Copy)]
pub struct FixedAnswer(pub bool);

impl UserPrompt for FixedAnswer {
    fn confirm(&mut self, _title: &str, _text: &str) -> bool {
        self.0
    }
}

/// Collects everything currently queued without blocking.
pub fn drain_events(rx: &mpsc::Receiver<TreeEvent>) -> Vec<TreeEvent> {
    rx.try_iter().collect()
}
