//! Enumerations for TUI state management.

/// Which screen has the keyboard.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum AppState {
    TaskList,
    Input,
    Confirm,
    Help,
}

/// Severity of the status bar message.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum StatusKind {
    Info,
    Success,
    Warning,
    Error,
}
