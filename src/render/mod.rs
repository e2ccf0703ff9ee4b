pub mod events;
pub mod text_renderer;

pub use events::RenderEvent;
pub use text_renderer::TextRenderer;

use crate::session::Session;

/// Presentation side of a run. The session never calls into a renderer; the
/// app loop feeds it events and snapshots.
pub trait Renderer {
    type Error;

    /// Called once before the first command
    fn initialize(&mut self, session: &Session) -> Result<(), Self::Error>;

    /// Handle an event emitted by the app loop
    fn handle_event(&mut self, event: &RenderEvent) -> Result<(), Self::Error>;

    /// Draw the current state
    fn update(&mut self, session: &Session) -> Result<(), Self::Error>;

    /// Check if the renderer wants the run to stop
    fn should_quit(&mut self) -> bool {
        false
    }

    /// Final summary once the run is over
    fn finalize(&mut self, session: &Session) -> Result<(), Self::Error>;
}
