mod chrome;
mod layout;
mod overlay;
mod pages;
mod style;

use ratatui::Frame;
use ratatui::widgets::Block;

use crate::app::AppState;
use crate::input::LoginForm;
use crate::palette::PaletteView;
use crate::portal::Portal;
use crate::router::Router;

pub use chrome::{draw_nav_bar, draw_status_bar};
pub use layout::{UiLayout, split_layout};
pub use overlay::{draw_login_overlay, draw_menu_overlay, draw_palette_overlay, draw_toasts};
pub use pages::draw_page_body;
pub use style::ThemeStyle;

/// Everything one frame reads. Drawing never mutates state.
pub struct Screen<'a> {
    pub app: &'a AppState,
    pub router: &'a Router<Portal>,
    pub portal: &'a Portal,
    pub palette: Option<&'a PaletteView>,
    pub login_form: Option<&'a LoginForm>,
}

pub fn draw(frame: &mut Frame<'_>, screen: &Screen<'_>) {
    let style = ThemeStyle::for_theme(screen.portal.theme);
    let area = frame.area();
    frame.render_widget(Block::default().style(style.base()), area);

    let layout = split_layout(area);
    draw_nav_bar(frame, layout.nav, screen, &style);
    draw_page_body(frame, layout.body, screen, &style);
    draw_status_bar(frame, layout.status, screen, &style);

    let chrome = screen.router.chrome();
    if chrome.menu_open {
        draw_menu_overlay(frame, layout.body, chrome.highlighted, &style);
    }
    draw_toasts(frame, layout.body, screen.portal.toasts.iter(), &style);
    if let Some(form) = screen.login_form {
        draw_login_overlay(
            frame,
            layout.body,
            form,
            screen.portal.auth.is_pending(),
            &style,
        );
    }
    if let Some(view) = screen.palette {
        draw_palette_overlay(frame, layout.body, view, &style);
    }
}
