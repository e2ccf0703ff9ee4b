use crate::session::Outcome;

/// Events emitted by the app loop that renderers can handle
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderEvent {
    /// Run started
    Started,

    /// A command was applied to the session
    Command(Outcome),

    /// The character gained a level during the last evaluation
    LeveledUp,

    /// The character ran out of life
    Defeated,

    /// Input closed or the player quit
    Completed,
}
