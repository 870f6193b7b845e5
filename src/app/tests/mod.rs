mod terminal_surface;

use crate::app::App;
use crate::config::Config;
use crate::portal::ManualScheduler;
use crate::storage::MemoryStore;

/// App over an in-memory store whose timers are released by the test.
fn test_app(config: Config, fragment: Option<&str>) -> (App, ManualScheduler) {
    let scheduler = ManualScheduler::default();
    let app = App::with_scheduler(
        config,
        Box::new(MemoryStore::default()),
        Box::new(scheduler.clone()),
        fragment.map(str::to_string),
    );
    (app, scheduler)
}

/// Delivers every recorded timer to the app, as the runtime would after the delays.
fn fire_timers(app: &mut App, scheduler: &ManualScheduler) -> usize {
    let mut fired = 0;
    for scheduled in scheduler.take_all() {
        let events = app.handle_portal_event(scheduled.event);
        for event in &events {
            app.handle_app_event(event);
        }
        fired += 1;
    }
    fired
}
