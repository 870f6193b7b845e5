/// Tracks whether the next loop turn has to repaint.
pub(crate) struct UiActor {
    needs_redraw: bool,
}

impl Default for UiActor {
    fn default() -> Self {
        Self { needs_redraw: true }
    }
}

impl UiActor {
    pub(crate) fn mark_redraw(&mut self) {
        self.needs_redraw = true;
    }

    pub(crate) fn clear_redraw(&mut self) {
        self.needs_redraw = false;
    }

    pub(crate) fn needs_redraw(&self) -> bool {
        self.needs_redraw
    }

    pub(crate) fn needs_redraw_mut(&mut self) -> &mut bool {
        &mut self.needs_redraw
    }
}

#[cfg(test)]
mod tests {
    use super::UiActor;

    #[test]
    fn ui_actor_redraw_flag_roundtrip() {
        let mut actor = UiActor::default();
        assert!(actor.needs_redraw());
        actor.clear_redraw();
        assert!(!actor.needs_redraw());
        *actor.needs_redraw_mut() = true;
        assert!(actor.needs_redraw());
        actor.clear_redraw();
        actor.mark_redraw();
        assert!(actor.needs_redraw());
    }
}
