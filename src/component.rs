//! Component trait shared by the home screen, the drill table and the dialogs
//!
//! Input becomes an `Action`, the action changes state in `update`, and `draw`
//! renders the result. The table emits `Action::Table` from `update`; the app
//! routes those to the event log and the row detail dialog.

use crate::action::Action;
use anyhow::Result;
use crossterm::event::{KeyEvent, MouseEvent};
use ratatui::{layout::Rect, Frame};

pub trait Component {
    fn init(&mut self) -> Result<()> {
        Ok(())
    }

    /// Map a key press to an action. Keys a component does not bind return
    /// `None` so the caller can try its own bindings.
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        let _ = key;
        Ok(None)
    }

    /// Map a mouse event to an action.
    ///
    /// Coordinates are resolved against the regions recorded by the last
    /// `draw`: the drill table keeps a hit map of header cells, expand glyphs,
    /// drillable cells, action buttons and footer page buttons. A component
    /// that has not drawn yet has nothing to hit.
    fn handle_mouse_event(&mut self, mouse: MouseEvent) -> Result<Option<Action>> {
        let _ = mouse;
        Ok(None)
    }

    /// Apply an action. A follow-up action is returned when the change must
    /// reach the app, e.g. `Activate` on a drillable cell becomes
    /// `Table(TableEvent::DrillDown { .. })`.
    fn update(&mut self, action: Action) -> Result<Option<Action>> {
        let _ = action;
        Ok(None)
    }

    /// Render into `area`.
    ///
    /// Besides drawing, this may clamp scroll offsets to the content height and
    /// replace the hit map used by `handle_mouse_event`.
    fn draw(&mut self, frame: &mut Frame, area: Rect) -> Result<()>;
}
