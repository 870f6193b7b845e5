use std::collections::VecDeque;
use std::path::Path;

use tracing::debug;

use crate::app::{AppState, Mode, PaletteRequest};
use crate::error::AppResult;
use crate::event::{AppEvent, NavReason};
use crate::palette::PaletteKind;
use crate::portal::{FEATURED_PAGES, Portal};
use crate::router::{AuthGate, NavOutcome, PageId, Router};

use super::core::{
    apply_portal_effects, move_selection, report_history_step, report_nav, sync_app_state,
};
use super::types::{Command, CommandOutcome, SearchScope};

#[derive(Debug, Clone)]
pub struct CommandDispatchResult {
    pub outcome: CommandOutcome,
    pub emitted_events: Vec<AppEvent>,
}

pub fn dispatch(
    app: &mut AppState,
    cmd: Command,
    router: &mut Router<Portal>,
    portal: &mut Portal,
    palette_requests: &mut VecDeque<PaletteRequest>,
) -> AppResult<CommandDispatchResult> {
    let previous_page = router.current();
    let prev_mode = app.mode;
    let dispatched_command = cmd.clone();
    let action_id = dispatched_command.action_id();
    app.status.last_action_id = Some(action_id);
    let mut login_requested = None;

    let outcome = match cmd {
        Command::Goto { name } => {
            let nav = router.navigate_to_name(&name, true, portal);
            note_login_required(nav, &mut login_requested);
            Ok(report_nav(app, nav))
        }
        Command::HistoryBack => {
            let nav = router.go_back(portal);
            if let Some(step) = nav {
                note_login_required(step, &mut login_requested);
            }
            Ok(report_history_step(app, nav))
        }
        Command::HistoryForward => {
            let nav = router.go_forward(portal);
            if let Some(step) = nav {
                note_login_required(step, &mut login_requested);
            }
            Ok(report_history_step(app, nav))
        }
        Command::HistoryGo { delta } => {
            let nav = router.go(delta, portal);
            if let Some(step) = nav {
                note_login_required(step, &mut login_requested);
            }
            Ok(report_history_step(app, nav))
        }
        Command::OpenHistory => Ok(open_palette(app, palette_requests, PaletteKind::History)),
        Command::OpenSearch => Ok(open_palette(app, palette_requests, PaletteKind::Search)),
        Command::SubmitSearch { query, scope } => {
            submit_search(app, router, portal, &query, scope, &mut login_requested)
        }
        Command::ClearSearch => {
            portal.library.set_search("");
            portal.blog.set_search("");
            portal.chat.set_filter("");
            app.status.message = "search cleared".to_string();
            Ok(CommandOutcome::Applied)
        }
        Command::FilterDepartment { department } => {
            portal.library.set_department(&department)?;
            app.status.message = format!("department: {department}");
            Ok(CommandOutcome::Applied)
        }
        Command::FilterCategory { category } => {
            if router.current() == PageId::Blog {
                portal.blog.set_category(&category)?;
            } else {
                portal.library.set_category(&category)?;
            }
            app.status.message = format!("category: {category}");
            Ok(CommandOutcome::Applied)
        }
        Command::Login => {
            if portal.is_authenticated() {
                app.status.message = "already logged in".to_string();
                Ok(CommandOutcome::Noop)
            } else {
                portal.request_login();
                app.status.message = "log in or create an account".to_string();
                Ok(CommandOutcome::Applied)
            }
        }
        Command::Logout => {
            if portal.is_authenticated() {
                portal.logout()?;
                app.status.message = "logged out".to_string();
                Ok(CommandOutcome::Applied)
            } else {
                app.status.message = "not logged in".to_string();
                Ok(CommandOutcome::Noop)
            }
        }
        Command::SubmitAuth(submission) => {
            portal.submit_auth(&submission)?;
            app.status.message = "authenticating...".to_string();
            Ok(CommandOutcome::Applied)
        }
        Command::ThemeToggle => {
            let theme = portal.toggle_theme()?;
            app.status.message = format!("theme: {}", theme.label());
            Ok(CommandOutcome::Applied)
        }
        Command::MenuToggle => {
            let open = router.chrome_mut().toggle_menu();
            app.status.message = if open { "menu open" } else { "menu closed" }.to_string();
            Ok(CommandOutcome::Applied)
        }
        Command::AddCourse { name } => {
            let index = portal.gpa.add_course(name.as_deref());
            if router.current() == PageId::Gpa {
                app.selection = index;
            }
            app.status.message = format!("course {} added", index + 1);
            Ok(CommandOutcome::Applied)
        }
        Command::RenameCourse { index, name } => {
            portal.gpa.rename_course(index, &name)?;
            app.status.message = format!("course {} renamed", index + 1);
            Ok(CommandOutcome::Applied)
        }
        Command::SetCredits { index, credits } => {
            portal.gpa.set_credits(index, credits)?;
            app.status.message = format!("course {} credits: {credits}", index + 1);
            Ok(CommandOutcome::Applied)
        }
        Command::SetGrade { index, grade } => {
            portal.gpa.set_grade(index, grade)?;
            app.status.message = format!("course {} grade: {grade}", index + 1);
            Ok(CommandOutcome::Applied)
        }
        Command::RemoveCourse { index } => {
            let removed = portal.gpa.remove_course(index)?;
            app.status.message = format!("removed {}", removed.name);
            Ok(CommandOutcome::Applied)
        }
        Command::SemesterName { name } => {
            portal.gpa.set_semester_name(&name)?;
            app.status.message = format!("semester: {}", portal.gpa.semester_name());
            Ok(CommandOutcome::Applied)
        }
        Command::SaveSemester => {
            portal.save_semester()?;
            app.status.message = "semester saved".to_string();
            Ok(CommandOutcome::Applied)
        }
        Command::ExportGpa => {
            let report = portal.export_gpa();
            app.status.message = report.lines().next().unwrap_or_default().to_string();
            Ok(CommandOutcome::Applied)
        }
        Command::ViewResource { id } => applied(app, portal.view_resource(id), "resource opened"),
        Command::DownloadResource { id } => {
            applied(app, portal.download_resource(id), "download started")
        }
        Command::Bookmark { id } => applied(app, portal.toggle_bookmark(id), "bookmarks updated"),
        Command::UploadFile { path } => guarded(
            app,
            router,
            portal,
            PageId::Upload,
            &mut login_requested,
            |portal| portal.upload_file(Path::new(&path)),
            "upload started",
        ),
        Command::ConvertUrl { url } => guarded(
            app,
            router,
            portal,
            PageId::Upload,
            &mut login_requested,
            |portal| portal.convert_url(&url),
            "converting url",
        ),
        Command::RemoveFile { index } => guarded(
            app,
            router,
            portal,
            PageId::Upload,
            &mut login_requested,
            |portal| portal.remove_file(index),
            "file removed",
        ),
        Command::PreviewFile { index } => guarded(
            app,
            router,
            portal,
            PageId::Upload,
            &mut login_requested,
            |portal| portal.preview_file(index),
            "preview opened",
        ),
        Command::DownloadFile { index } => guarded(
            app,
            router,
            portal,
            PageId::Upload,
            &mut login_requested,
            |portal| portal.download_file(index),
            "download started",
        ),
        Command::OpenChat { id } => applied(app, portal.open_chat(id), "conversation opened"),
        Command::Send { message } => applied(app, portal.send_message(&message), "message sent"),
        Command::DownloadRecent { id } => guarded(
            app,
            router,
            portal,
            PageId::Dashboard,
            &mut login_requested,
            |portal| portal.download_recent(id),
            "download started",
        ),
        Command::SelectNext => Ok(move_selection(app, portal, true)),
        Command::SelectPrev => Ok(move_selection(app, portal, false)),
        Command::Activate => activate(app, router, portal, &mut login_requested),
        Command::OpenPalette { kind, seed } => {
            palette_requests.push_back(PaletteRequest::Open { kind, seed });
            app.status.message = "opening palette".to_string();
            Ok(CommandOutcome::Applied)
        }
        Command::ClosePalette => {
            palette_requests.push_back(PaletteRequest::Close);
            app.status.message = "closing palette".to_string();
            Ok(CommandOutcome::Applied)
        }
        Command::Cancel => Ok(cancel(app, router, portal, palette_requests)),
        Command::Quit => {
            app.status.message = "quit requested".to_string();
            Ok(CommandOutcome::QuitRequested)
        }
    }?;

    let redirected = apply_portal_effects(router, portal);
    sync_app_state(app, router, portal);

    let reason = if redirected {
        NavReason::Auth
    } else {
        derive_nav_reason(&dispatched_command)
    };
    let mut emitted_events =
        collect_transition_events(app, previous_page, prev_mode, reason, login_requested);
    emitted_events.push(AppEvent::CommandExecuted {
        id: action_id,
        outcome,
    });

    Ok(CommandDispatchResult {
        outcome,
        emitted_events,
    })
}

/// Applies queued portal effects outside of a command, e.g. after an auth completion.
pub fn drain_portal_effects(
    app: &mut AppState,
    router: &mut Router<Portal>,
    portal: &mut Portal,
) -> Vec<AppEvent> {
    let previous_page = router.current();
    let prev_mode = app.mode;
    apply_portal_effects(router, portal);
    sync_app_state(app, router, portal);
    collect_transition_events(app, previous_page, prev_mode, NavReason::Auth, None)
}

fn applied(app: &mut AppState, result: AppResult<()>, message: &str) -> AppResult<CommandOutcome> {
    result?;
    app.status.message = message.to_string();
    Ok(CommandOutcome::Applied)
}

/// Runs an action owned by `page`. When that page is protected and nobody is
/// signed in, the login prompt is raised instead and nothing changes.
fn guarded(
    app: &mut AppState,
    router: &Router<Portal>,
    portal: &mut Portal,
    page: PageId,
    login_requested: &mut Option<PageId>,
    action: impl FnOnce(&mut Portal) -> AppResult<()>,
    message: &str,
) -> AppResult<CommandOutcome> {
    if router.is_protected(page) && !portal.is_authenticated() {
        debug!(page = %page, "action blocked: login required");
        portal.request_login();
        let nav = NavOutcome::LoginRequired(page);
        note_login_required(nav, login_requested);
        return Ok(report_nav(app, nav));
    }
    applied(app, action(portal), message)
}

fn note_login_required(nav: NavOutcome, login_requested: &mut Option<PageId>) {
    if let NavOutcome::LoginRequired(page) = nav {
        *login_requested = Some(page);
    }
}

fn open_palette(
    app: &mut AppState,
    palette_requests: &mut VecDeque<PaletteRequest>,
    kind: PaletteKind,
) -> CommandOutcome {
    palette_requests.push_back(PaletteRequest::Open { kind, seed: None });
    app.status.message = format!("opening {} palette", kind.id());
    CommandOutcome::Applied
}

fn submit_search(
    app: &mut AppState,
    router: &mut Router<Portal>,
    portal: &mut Portal,
    query: &str,
    scope: Option<SearchScope>,
    login_requested: &mut Option<PageId>,
) -> AppResult<CommandOutcome> {
    let scope = scope
        .or_else(|| SearchScope::for_page(router.current()))
        .unwrap_or(SearchScope::Library);

    // navigate first: the chat initializer clears its filter
    if router.current() != scope.page() {
        let nav = router.navigate(scope.page(), true, portal);
        note_login_required(nav, login_requested);
        if !nav.is_applied() {
            return Ok(report_nav(app, nav));
        }
    }

    let matches = match scope {
        SearchScope::Library => {
            portal.library.set_search(query);
            portal.library.visible_len()
        }
        SearchScope::Blog => {
            portal.blog.set_search(query);
            portal.blog.visible_len()
        }
        SearchScope::Chat => {
            portal.chat.set_filter(query);
            portal.chat.visible().len()
        }
    };
    app.selection = 0;
    app.status.message = format!("{matches} result(s) for \"{query}\" in {}", scope.id());
    debug!(query, scope = scope.id(), matches, "search submitted");
    Ok(CommandOutcome::Applied)
}

fn activate(
    app: &mut AppState,
    router: &mut Router<Portal>,
    portal: &mut Portal,
    login_requested: &mut Option<PageId>,
) -> AppResult<CommandOutcome> {
    let selection = app.selection;
    match router.current() {
        PageId::Home => {
            let Some(target) = FEATURED_PAGES.get(selection).copied() else {
                return Ok(CommandOutcome::Noop);
            };
            let nav = router.navigate(target, true, portal);
            note_login_required(nav, login_requested);
            Ok(report_nav(app, nav))
        }
        PageId::Library => {
            let Some(id) = portal.library.visible_at(selection).map(|resource| resource.id) else {
                return Ok(nothing_selected(app));
            };
            applied(app, portal.view_resource(id), "resource opened")
        }
        PageId::Upload => {
            if portal.upload.file(selection).is_none() {
                return Ok(nothing_selected(app));
            }
            applied(app, portal.preview_file(selection), "preview opened")
        }
        PageId::Chat => {
            let Some(id) = portal.chat.visible().get(selection).map(|chat| chat.id) else {
                return Ok(nothing_selected(app));
            };
            applied(app, portal.open_chat(id), "conversation opened")
        }
        PageId::Blog => {
            let Some(post) = portal.blog.visible_at(selection) else {
                return Ok(nothing_selected(app));
            };
            let message = format!("Opening {} on {}...", post.title, post.source);
            portal.toasts.info(message);
            app.status.message = post.url.to_string();
            Ok(CommandOutcome::Applied)
        }
        PageId::Dashboard => {
            let Some(id) = portal
                .dashboard
                .recent_files()
                .get(selection)
                .map(|file| file.id)
            else {
                return Ok(nothing_selected(app));
            };
            applied(app, portal.download_recent(id), "download started")
        }
        PageId::Gpa => Ok(nothing_selected(app)),
    }
}

fn nothing_selected(app: &mut AppState) -> CommandOutcome {
    app.status.message = "nothing to activate".to_string();
    CommandOutcome::Noop
}

fn cancel(
    app: &mut AppState,
    router: &mut Router<Portal>,
    portal: &mut Portal,
    palette_requests: &mut VecDeque<PaletteRequest>,
) -> CommandOutcome {
    if app.mode == Mode::Palette {
        palette_requests.push_back(PaletteRequest::Close);
    } else if portal.auth.dismiss_prompt() {
        app.mode = Mode::Normal;
    } else if router.chrome().menu_open {
        router.chrome_mut().toggle_menu();
    } else {
        app.status.message = "nothing to cancel".to_string();
        return CommandOutcome::Noop;
    }
    app.status.message = "canceled".to_string();
    CommandOutcome::Applied
}

fn collect_transition_events(
    app: &AppState,
    prev_page: PageId,
    prev_mode: Mode,
    reason: NavReason,
    login_requested: Option<PageId>,
) -> Vec<AppEvent> {
    let mut events = Vec::new();
    if app.current_page != prev_page {
        events.push(AppEvent::PageChanged {
            from: prev_page,
            to: app.current_page,
            reason,
        });
    }

    if let Some(page) = login_requested {
        events.push(AppEvent::LoginRequested(page));
    }

    if app.mode != prev_mode {
        events.push(AppEvent::ModeChanged {
            from: prev_mode,
            to: app.mode,
        });
    }
    events
}

fn derive_nav_reason(command: &Command) -> NavReason {
    match command {
        Command::HistoryBack | Command::HistoryForward | Command::HistoryGo { .. } => {
            NavReason::History
        }
        Command::SubmitSearch { .. } => NavReason::Search,
        Command::Login | Command::Logout | Command::SubmitAuth(_) => NavReason::Auth,
        _ => NavReason::Link,
    }
}
