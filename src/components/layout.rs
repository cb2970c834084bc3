//! Layout calculations for the UI

use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Main screen layout areas
pub struct MainLayout {
    pub tabs: Rect,
    pub table: Rect,
    pub status: Rect,
    pub help: Rect,
}

/// Calculate centered popup area
pub fn centered_popup(area: Rect, width: u16, height: u16) -> Rect {
    let popup_x = area.x + (area.width.saturating_sub(width)) / 2;
    let popup_y = area.y + (area.height.saturating_sub(height)) / 2;

    Rect::new(
        popup_x,
        popup_y,
        width.min(area.width),
        height.min(area.height),
    )
}

/// Area inset by `margin` on every side, for full-screen overlays
pub fn overlay_area(area: Rect, margin: u16) -> Rect {
    Rect::new(
        area.x + margin,
        area.y + margin,
        area.width.saturating_sub(margin * 2),
        area.height.saturating_sub(margin * 2),
    )
}

/// Calculate main screen layout: tabs, table, status line and help bar
pub fn calculate_main_layout(area: Rect) -> MainLayout {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Min(0),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(area);

    MainLayout {
        tabs: chunks[0],
        table: chunks[1],
        status: chunks[2],
        help: chunks[3],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_centered_popup_clamps_to_area() {
        let area = Rect::new(0, 0, 30, 10);
        let popup = centered_popup(area, 40, 7);
        assert_eq!(popup.width, 30);
        assert_eq!(popup.y, 1);
    }

    #[test]
    fn test_main_layout_fills_area() {
        let layout = calculate_main_layout(Rect::new(0, 0, 80, 24));
        assert_eq!(layout.tabs.height, 2);
        assert_eq!(layout.table.height, 20);
        assert_eq!(layout.help.y, 23);
    }
}
