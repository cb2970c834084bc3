//! UI Components
//!
//! Each component encapsulates its own state, event handling, and rendering logic.
//! Components communicate through Actions rather than direct state mutation.

pub mod event_log_dialog;
pub mod help_dialog;
pub mod home;
pub mod layout;
pub mod quit_dialog;
pub mod row_detail;
pub mod table;

pub use event_log_dialog::EventLogDialog;
pub use help_dialog::HelpDialog;
pub use home::{draw_home_screen, HomeComponent, HomeRenderContext};
pub use layout::{calculate_main_layout, centered_popup};
pub use quit_dialog::QuitDialog;
pub use row_detail::RowDetailDialog;
pub use table::DrillTableComponent;
