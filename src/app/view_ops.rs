use crate::error::AppResult;
use crate::ui::{self, Screen};

use super::core::App;
use super::state::Mode;
use super::terminal_session::TerminalSurface;

impl App {
    pub(crate) fn render_frame(&mut self, session: &mut impl TerminalSurface) -> AppResult<()> {
        let palette_view = self.interaction.palette_view();
        let login_form = (self.state.mode == Mode::Login).then_some(&self.interaction.login_form);
        let screen = Screen {
            app: &self.state,
            router: &self.router,
            portal: &self.portal,
            palette: palette_view.as_ref(),
            login_form,
        };
        session.set_title(self.router.chrome().title)?;
        session.draw(|frame| ui::draw(frame, &screen))?;
        Ok(())
    }
}
