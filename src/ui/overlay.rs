use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use unicode_width::UnicodeWidthStr;

use crate::input::LoginForm;
use crate::notify::Toast;
use crate::palette::PaletteView;
use crate::portal::auth::AuthMode;
use crate::router::PageId;

use super::layout::centered_rect;
use super::style::ThemeStyle;

const TOAST_WIDTH: u16 = 48;

pub fn draw_palette_overlay(
    frame: &mut Frame<'_>,
    area: Rect,
    view: &PaletteView,
    style: &ThemeStyle,
) {
    if area.width == 0 || area.height == 0 {
        return;
    }

    let popup_width = area.width.min(72);
    let popup_height = area.height.clamp(7, 20);
    let popup = centered_rect(area, popup_width, popup_height);
    frame.render_widget(Clear, popup);

    let block = Block::default()
        .title(format!(" {} ", view.title))
        .borders(Borders::ALL)
        .style(style.base())
        .border_style(style.muted());
    let inner = block.inner(popup);
    frame.render_widget(block, popup);

    if inner.width == 0 || inner.height < 3 {
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(1),
        ])
        .split(inner);

    let input_line = build_input_line("> ", &view.input, view.cursor, chunks[0].width as usize);
    frame.render_widget(Paragraph::new(input_line), chunks[0]);
    frame.render_widget(
        Paragraph::new("─".repeat(inner.width as usize)).style(style.muted()),
        chunks[1],
    );

    let list_area = chunks[2];
    let mut lines = Vec::new();
    if let Some(assistive) = view.assistive_text.as_deref()
        && !assistive.is_empty()
    {
        lines.push(Line::from(vec![
            Span::raw("   "),
            Span::styled(assistive.to_string(), style.muted()),
        ]));
    }

    let max_items = (list_area.height as usize).saturating_sub(lines.len());
    if max_items > 0 && !view.items.is_empty() {
        let selected_idx = view.selected_idx.min(view.items.len() - 1);
        // keep the selection roughly centered once the list scrolls
        let start_idx = if view.items.len() <= max_items || selected_idx < max_items / 2 {
            0
        } else if selected_idx >= view.items.len() - max_items / 2 {
            view.items.len().saturating_sub(max_items)
        } else {
            selected_idx.saturating_sub(max_items / 2)
        };

        for item in view.items.iter().skip(start_idx).take(max_items) {
            let mut spans = vec![if item.selected {
                Span::styled(" ┃ ", style.accent())
            } else {
                Span::raw("   ")
            }];
            spans.push(Span::raw(item.label.clone()));
            if let Some(detail) = &item.detail {
                spans.push(Span::raw("  "));
                spans.push(Span::styled(detail.clone(), style.muted()));
            }
            let used: usize = spans.iter().map(|span| span.content.width()).sum();
            spans.push(Span::raw(
                " ".repeat((inner.width as usize).saturating_sub(used)),
            ));

            let line_style = if item.selected {
                style.selected()
            } else {
                Style::default()
            };
            lines.push(Line::from(spans).style(line_style));
        }
    }

    frame.render_widget(Paragraph::new(lines), list_area);
}

/// Login/register form. `pending` shows that a submission is being processed.
pub fn draw_login_overlay(
    frame: &mut Frame<'_>,
    area: Rect,
    form: &LoginForm,
    pending: bool,
    style: &ThemeStyle,
) {
    if area.width == 0 || area.height == 0 {
        return;
    }

    let fields = form.fields();
    let height = (fields.len() as u16) * 2 + 5;
    let popup = centered_rect(area, area.width.min(56), height);
    frame.render_widget(Clear, popup);

    let title = match form.mode() {
        AuthMode::Login => " Log In ",
        AuthMode::Register => " Create Account ",
    };
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .style(style.base())
        .border_style(style.accent());
    let inner = block.inner(popup);
    frame.render_widget(block, popup);
    if inner.width == 0 || inner.height == 0 {
        return;
    }

    let width = inner.width as usize;
    let mut lines = Vec::new();
    for field in fields {
        let focused = form.focused() == *field;
        let label_style = if focused {
            style.accent().add_modifier(Modifier::BOLD)
        } else {
            style.muted()
        };
        lines.push(Line::from(Span::styled(field.label(), label_style)));
        let value = form.display_value(*field);
        if focused {
            lines.push(build_input_line("> ", &value, form.cursor(*field), width));
        } else {
            lines.push(Line::from(format!("   {value}")));
        }
    }

    lines.push(Line::default());
    let password_hint = if form.password_visible() {
        "hide"
    } else {
        "show"
    };
    let switch_hint = match form.mode() {
        AuthMode::Login => "register",
        AuthMode::Register => "log in",
    };
    lines.push(Line::from(Span::styled(
        format!("Ctrl-R {switch_hint}  Ctrl-V {password_hint} password"),
        style.muted(),
    )));
    lines.push(Line::from(Span::styled(
        if pending {
            "Authenticating...".to_string()
        } else {
            "Enter submit  Tab next  Esc close".to_string()
        },
        style.muted(),
    )));

    frame.render_widget(Paragraph::new(lines), inner);
}

/// Toasts stacked in the bottom-right corner, newest at the bottom.
pub fn draw_toasts<'a>(
    frame: &mut Frame<'_>,
    area: Rect,
    toasts: impl DoubleEndedIterator<Item = &'a Toast>,
    style: &ThemeStyle,
) {
    let width = area.width.min(TOAST_WIDTH);
    if width < 4 {
        return;
    }

    let mut bottom = area.y + area.height;
    for toast in toasts.rev() {
        if bottom < area.y + 1 {
            break;
        }
        bottom -= 1;
        let rect = Rect::new(area.x + area.width - width, bottom, width, 1);
        let text = format!(" {}: {}", toast.kind.label(), toast.message);
        frame.render_widget(Clear, rect);
        frame.render_widget(
            Paragraph::new(text).style(style.selected().patch(style.toast(toast.kind))),
            rect,
        );
    }
}

/// Collapsible navigation menu listing every page with its digit shortcut.
pub fn draw_menu_overlay(
    frame: &mut Frame<'_>,
    area: Rect,
    highlighted: Option<PageId>,
    style: &ThemeStyle,
) {
    let height = (PageId::ALL.len() as u16 + 2).min(area.height);
    let rect = Rect::new(area.x, area.y, area.width.min(24), height);
    frame.render_widget(Clear, rect);

    let lines = PageId::ALL
        .into_iter()
        .enumerate()
        .map(|(idx, page)| {
            let text = format!("{} {}", idx + 1, page.label());
            if highlighted == Some(page) {
                Line::from(Span::styled(text, style.accent())).style(style.selected())
            } else {
                Line::from(text)
            }
        })
        .collect::<Vec<_>>();
    let block = Block::default()
        .title(" Menu ")
        .borders(Borders::ALL)
        .style(style.base());
    frame.render_widget(
        Paragraph::new(lines).block(block).wrap(Wrap { trim: true }),
        rect,
    );
}

/// Single-line editor with a software caret so the terminal cursor can stay hidden.
fn build_input_line(prefix: &str, input: &str, cursor: usize, width: usize) -> Line<'static> {
    let prefix_width = prefix.width() + 1;
    let max_text_width = width.saturating_sub(prefix_width);

    let chars: Vec<char> = input.chars().collect();
    let char_count = chars.len();
    let cursor = cursor.min(char_count);

    let start = if max_text_width == 0 {
        char_count
    } else if cursor >= max_text_width {
        cursor
            .saturating_sub(max_text_width.saturating_sub(1))
            .min(char_count)
    } else {
        0
    };

    let text_width = max_text_width.max(1);
    let end = (start + text_width).min(char_count);
    let mut visible: Vec<char> = chars[start..end].to_vec();
    if visible.len() < text_width {
        visible.extend(std::iter::repeat_n(' ', text_width - visible.len()));
    }

    let caret_idx = cursor
        .saturating_sub(start)
        .min(text_width.saturating_sub(1));

    let mut spans = vec![Span::raw(" "), Span::raw(prefix.to_string())];
    for (idx, ch) in visible.into_iter().enumerate() {
        if idx == caret_idx {
            spans.push(Span::styled(
                ch.to_string(),
                Style::default().add_modifier(Modifier::REVERSED),
            ));
        } else {
            spans.push(Span::raw(ch.to_string()));
        }
    }
    Line::from(spans)
}
