use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Modifier;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use unicode_width::UnicodeWidthStr;

use crate::app::Mode;
use crate::portal::auth::Role;
use crate::router::PageId;

use super::Screen;
use super::style::ThemeStyle;

/// Top bar: brand, one tab per page (digit shortcut first), user badge on the right.
pub fn draw_nav_bar(frame: &mut Frame<'_>, area: Rect, screen: &Screen<'_>, style: &ThemeStyle) {
    let mut spans = vec![Span::styled(" BiTS Connect ", style.heading())];
    for (idx, page) in PageId::ALL.into_iter().enumerate() {
        let label = format!(" {}:{} ", idx + 1, page.label());
        let tab_style = if screen.router.chrome().highlighted == Some(page) {
            style.selected().fg(style.accent).add_modifier(Modifier::BOLD)
        } else if screen.router.is_protected(page) && !screen.app.authenticated {
            style.muted()
        } else {
            style.base()
        };
        spans.push(Span::styled(label, tab_style));
    }

    let badge = user_badge(screen);
    let used: usize = spans.iter().map(|span| span.content.width()).sum();
    let padding = (area.width as usize).saturating_sub(used + badge.width() + 1);
    spans.push(Span::raw(" ".repeat(padding)));
    spans.push(Span::styled(badge, style.accent()));

    frame.render_widget(Paragraph::new(Line::from(spans)).style(style.base()), area);
}

fn user_badge(screen: &Screen<'_>) -> String {
    let theme = screen.portal.theme.label();
    match screen.portal.auth.current_user() {
        Some(user) => {
            let role = match user.role {
                Role::Admin => "admin",
                Role::Student => "student",
            };
            format!("[{theme}] {} ({role})", user.name)
        }
        None => format!("[{theme}] guest | L to log in"),
    }
}

pub fn draw_status_bar(frame: &mut Frame<'_>, area: Rect, screen: &Screen<'_>, style: &ThemeStyle) {
    let mode = match screen.app.mode {
        Mode::Normal => "NORMAL",
        Mode::Palette => "PALETTE",
        Mode::Login => "LOGIN",
    };
    let fragment = screen.app.fragment.as_deref().unwrap_or("#");
    let message = if screen.app.status.message.is_empty() {
        "-"
    } else {
        screen.app.status.message.as_str()
    };

    let line = Line::from(vec![
        Span::styled(format!(" {mode} "), style.selected().add_modifier(Modifier::BOLD)),
        Span::styled(format!(" {fragment} "), style.accent()),
        Span::styled(format!("| {} ", screen.router.chrome().title), style.muted()),
        Span::raw(format!("| {message}")),
    ]);
    frame.render_widget(Paragraph::new(line).style(style.base()), area);
}
