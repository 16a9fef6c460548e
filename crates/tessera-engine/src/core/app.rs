use winit::event::WindowEvent;
use winit::window::WindowId;

use super::ctx::FrameCtx;

/// What the runtime should do after an application callback.
#[derive(Debug, Default, Copy, Clone, Eq, PartialEq)]
pub enum AppControl {
    #[default]
    Continue,
    Exit,
}

impl AppControl {
    pub fn is_exit(self) -> bool {
        self == AppControl::Exit
    }
}

/// Drawing application hosted by [`Runtime`](crate::window::Runtime).
///
/// Each redraw hands the app a [`FrameCtx`]; the canvas it renders with lives
/// for that frame only.
pub trait App {
    /// Sees every window event first. Returning [`AppControl::Exit`] stops the
    /// runtime before it handles the event itself.
    fn on_window_event(&mut self, window_id: WindowId, event: &WindowEvent) -> AppControl {
        let _ = (window_id, event);
        AppControl::Continue
    }

    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl;

    /// The window and its GPU resources are gone. Texture ids registered for it
    /// are no longer valid.
    fn on_window_closed(&mut self, window_id: WindowId) {
        let _ = window_id;
    }
}
