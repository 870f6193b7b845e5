//! Page collaborators and the service bundle handed to the router.
//!
//! [`Portal`] owns every collaborator together with the persistent store, the
//! delayed-work scheduler and the toast queue. Page initializers receive it
//! mutably; asynchronous completions come back as [`PortalEvent`]s.

pub mod auth;
pub mod blog;
pub mod chat;
pub mod dashboard;
pub mod gpa;
pub mod library;
pub mod scheduler;
pub mod theme;
pub mod upload;

use std::collections::BTreeSet;
use std::path::Path;

use chrono::Utc;
use tracing::{debug, info, warn};

use crate::config::TimingConfig;
use crate::error::AppResult;
use crate::notify::ToastQueue;
use crate::router::{AuthGate, InitializerRegistry, PageId};
use crate::storage::KeyValueStore;

use self::auth::{AuthManager, AuthMode, AuthSubmission};
use self::blog::Blog;
use self::chat::ChatHub;
use self::dashboard::Dashboard;
use self::gpa::GpaCalculator;
use self::library::Library;
use self::scheduler::Scheduler;
use self::theme::Theme;
use self::upload::{TickOutcome, UploadManager};

pub use self::scheduler::{ManualScheduler, ScheduledEvent};

/// Pages advertised on the home screen, in display order.
pub const FEATURED_PAGES: [PageId; 6] = [
    PageId::Library,
    PageId::Upload,
    PageId::Gpa,
    PageId::Chat,
    PageId::Blog,
    PageId::Dashboard,
];

/// Delayed completions delivered by the scheduler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PortalEvent {
    AuthCompleted { ticket: u64 },
    UploadTick { file_id: String },
    UrlConverted { ticket: u64 },
}

/// Requests the portal cannot fulfil itself; the app applies them through the router.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PortalEffect {
    Navigate(PageId),
}

pub struct Portal {
    pub auth: AuthManager,
    pub library: Library,
    pub upload: UploadManager,
    pub gpa: GpaCalculator,
    pub chat: ChatHub,
    pub blog: Blog,
    pub dashboard: Dashboard,
    pub theme: Theme,
    pub toasts: ToastQueue,
    store: Box<dyn KeyValueStore>,
    scheduler: Box<dyn Scheduler>,
    timing: TimingConfig,
    effects: Vec<PortalEffect>,
    ticking: BTreeSet<String>,
}

impl Portal {
    pub fn new(
        store: Box<dyn KeyValueStore>,
        scheduler: Box<dyn Scheduler>,
        timing: TimingConfig,
    ) -> Self {
        let now = Utc::now();
        let auth = AuthManager::restore(store.as_ref());
        let library = Library::restore(store.as_ref(), now);
        let upload = UploadManager::restore(store.as_ref());
        let gpa = GpaCalculator::restore(store.as_ref());
        let theme = Theme::restore(store.as_ref());
        Self {
            auth,
            library,
            upload,
            gpa,
            chat: ChatHub::seeded(now),
            blog: Blog::seeded(now),
            dashboard: Dashboard::seeded(now),
            theme,
            toasts: ToastQueue::new(timing.toast_duration()),
            store,
            scheduler,
            timing,
            effects: Vec::new(),
            ticking: BTreeSet::new(),
        }
    }

    /// Registers the per-page setup run by the router after each navigation.
    pub fn initializers() -> InitializerRegistry<Self> {
        let mut registry = InitializerRegistry::default();
        registry.register(PageId::Library, |portal: &mut Self| {
            portal.library.apply_filters()
        });
        registry.register(PageId::Upload, |portal: &mut Self| portal.resume_uploads());
        registry.register(PageId::Gpa, |portal: &mut Self| {
            portal.gpa.reload(portal.store.as_ref())
        });
        registry.register(PageId::Chat, |portal: &mut Self| portal.chat.refresh());
        registry.register(PageId::Blog, |portal: &mut Self| portal.blog.apply_filters());
        registry.register(PageId::Dashboard, |portal: &mut Self| {
            portal.refresh_dashboard()
        });
        registry
    }

    pub fn store(&self) -> &dyn KeyValueStore {
        self.store.as_ref()
    }

    pub fn timing(&self) -> &TimingConfig {
        &self.timing
    }

    /// Swaps the scheduler, replaying requests the previous one never delivered.
    pub fn set_scheduler(&mut self, scheduler: Box<dyn Scheduler>) {
        let pending = self.scheduler.drain_pending();
        self.scheduler = scheduler;
        for request in pending {
            self.scheduler.schedule(request.delay, request.event);
        }
    }

    pub fn take_effects(&mut self) -> Vec<PortalEffect> {
        std::mem::take(&mut self.effects)
    }

    pub fn current_user_name(&self) -> Option<&str> {
        self.auth.current_user().map(|user| user.name.as_str())
    }

    pub fn submit_auth(&mut self, submission: &AuthSubmission) -> AppResult<()> {
        let ticket = self.auth.begin(submission)?;
        debug!(ticket, mode = ?submission.mode, "authentication requested");
        self.scheduler
            .schedule(self.timing.auth_delay(), PortalEvent::AuthCompleted { ticket });
        Ok(())
    }

    pub fn logout(&mut self) -> AppResult<()> {
        if self.auth.logout(self.store.as_mut())? {
            self.toasts.info("Logged out successfully");
            self.effects.push(PortalEffect::Navigate(PageId::Home));
        }
        Ok(())
    }

    pub fn toggle_theme(&mut self) -> AppResult<Theme> {
        self.theme.toggle(self.store.as_mut())
    }

    pub fn view_resource(&mut self, id: u32) -> AppResult<()> {
        let message = self.library.view(id)?;
        self.toasts.info(message);
        Ok(())
    }

    pub fn download_resource(&mut self, id: u32) -> AppResult<()> {
        let message = self.library.download(id)?;
        self.toasts.success(message);
        Ok(())
    }

    pub fn toggle_bookmark(&mut self, id: u32) -> AppResult<()> {
        if self
            .library
            .toggle_bookmark(id, self.store.as_mut(), Utc::now())?
        {
            self.toasts.success("Added to bookmarks!");
        } else {
            self.toasts.info("Removed from bookmarks");
        }
        Ok(())
    }

    pub fn upload_file(&mut self, path: &Path) -> AppResult<()> {
        let id = self
            .upload
            .upload_path(path, self.store.as_mut(), Utc::now())?;
        self.toasts.success("1 file(s) uploaded successfully!");
        self.start_ticking(id);
        Ok(())
    }

    pub fn convert_url(&mut self, url: &str) -> AppResult<()> {
        let ticket = self.upload.begin_conversion(url)?;
        self.toasts.info("Converting URL to PDF...");
        self.scheduler.schedule(
            self.timing.convert_delay(),
            PortalEvent::UrlConverted { ticket },
        );
        Ok(())
    }

    pub fn remove_file(&mut self, index: usize) -> AppResult<()> {
        let removed = self.upload.remove(index, self.store.as_mut())?;
        self.ticking.remove(&removed.id);
        self.toasts.info("File removed");
        Ok(())
    }

    pub fn preview_file(&mut self, index: usize) -> AppResult<()> {
        let message = self.upload.preview(index)?;
        self.toasts.info(message);
        Ok(())
    }

    pub fn download_file(&mut self, index: usize) -> AppResult<()> {
        let message = self.upload.download(index)?;
        self.toasts.success(message);
        Ok(())
    }

    pub fn save_semester(&mut self) -> AppResult<()> {
        self.gpa.save_semester(self.store.as_mut(), Utc::now())?;
        self.toasts.success("Semester saved successfully!");
        Ok(())
    }

    pub fn export_gpa(&mut self) -> String {
        let report = self.gpa.export_report();
        info!(lines = report.lines().count(), "gpa report exported");
        self.toasts.success("GPA report exported successfully!");
        report
    }

    pub fn open_chat(&mut self, id: u32) -> AppResult<()> {
        self.chat.select(id)?;
        Ok(())
    }

    pub fn send_message(&mut self, text: &str) -> AppResult<()> {
        let sender = self.auth.current_user().map(|user| user.name.as_str());
        self.chat.send(text, sender, Utc::now())
    }

    pub fn download_recent(&mut self, id: u32) -> AppResult<()> {
        let message = self.dashboard.download(id)?;
        self.toasts.success(message);
        Ok(())
    }

    pub fn refresh_dashboard(&mut self) {
        let name = self.auth.current_user().map(|user| user.name.as_str());
        self.dashboard
            .refresh(name, self.library.bookmarks(), &self.chat);
    }

    /// Reloads the upload list and restarts ticks for files still in flight.
    pub fn resume_uploads(&mut self) {
        self.upload.reload(self.store.as_ref());
        for id in self.upload.uploading_ids() {
            if !self.ticking.contains(&id) {
                self.start_ticking(id);
            }
        }
    }

    /// Applies a scheduler delivery. Returns `true` when visible state changed.
    pub fn handle_event(&mut self, event: PortalEvent) -> bool {
        match event {
            PortalEvent::AuthCompleted { ticket } => self.finish_auth(ticket),
            PortalEvent::UploadTick { file_id } => self.advance_upload(file_id),
            PortalEvent::UrlConverted { ticket } => self.finish_conversion(ticket),
        }
    }

    fn finish_auth(&mut self, ticket: u64) -> bool {
        match self.auth.complete(ticket, self.store.as_mut(), Utc::now()) {
            Ok(Some((_, mode))) => {
                self.toasts.success(match mode {
                    AuthMode::Login => "Welcome back!",
                    AuthMode::Register => "Account created successfully!",
                });
                self.effects.push(PortalEffect::Navigate(PageId::Dashboard));
                true
            }
            Ok(None) => false,
            Err(err) => {
                warn!(%err, "authentication failed");
                self.toasts.error("Authentication failed. Please try again.");
                true
            }
        }
    }

    fn advance_upload(&mut self, file_id: String) -> bool {
        match self.upload.tick(&file_id, self.store.as_mut()) {
            Ok(TickOutcome::Progressed(_)) => {
                self.scheduler
                    .schedule(self.timing.upload_tick(), PortalEvent::UploadTick { file_id });
                true
            }
            Ok(TickOutcome::Completed(_)) => {
                self.ticking.remove(&file_id);
                true
            }
            Ok(TickOutcome::Stopped) => {
                self.ticking.remove(&file_id);
                false
            }
            Err(err) => {
                self.ticking.remove(&file_id);
                self.toasts.error(err.to_string());
                true
            }
        }
    }

    fn finish_conversion(&mut self, ticket: u64) -> bool {
        match self
            .upload
            .complete_conversion(ticket, self.store.as_mut(), Utc::now())
        {
            Ok(Some(_)) => {
                self.toasts.success("URL converted to PDF successfully!");
                true
            }
            Ok(None) => false,
            Err(err) => {
                self.toasts.error(err.to_string());
                true
            }
        }
    }

    fn start_ticking(&mut self, file_id: String) {
        self.ticking.insert(file_id.clone());
        self.scheduler
            .schedule(self.timing.upload_tick(), PortalEvent::UploadTick { file_id });
    }
}

impl AuthGate for Portal {
    fn is_authenticated(&self) -> bool {
        self.auth.is_authenticated()
    }

    fn request_login(&mut self) {
        self.auth.show_prompt();
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::{ManualScheduler, Portal, PortalEffect, PortalEvent};
    use crate::config::TimingConfig;
    use crate::portal::auth::AuthSubmission;
    use crate::router::{AuthGate, PageId};
    use crate::storage::MemoryStore;

    fn portal() -> (Portal, ManualScheduler) {
        let scheduler = ManualScheduler::default();
        let portal = Portal::new(
            Box::new(MemoryStore::default()),
            Box::new(scheduler.clone()),
            TimingConfig::default(),
        );
        (portal, scheduler)
    }

    fn deliver_all(portal: &mut Portal, scheduler: &ManualScheduler) {
        for request in scheduler.take_all() {
            portal.handle_event(request.event);
        }
    }

    #[test]
    fn login_completes_after_scheduled_delay() {
        let (mut portal, scheduler) = portal();
        portal.request_login();
        assert!(portal.auth.prompt_visible());

        portal
            .submit_auth(&AuthSubmission::login("ana@bits.edu", "secret1"))
            .expect("valid submission");
        assert!(!portal.is_authenticated());

        let pending = scheduler.take_all();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].delay, TimingConfig::default().auth_delay());
        assert!(portal.handle_event(pending[0].event.clone()));

        assert!(portal.is_authenticated());
        assert_eq!(portal.take_effects(), vec![PortalEffect::Navigate(PageId::Dashboard)]);
        assert_eq!(
            portal.toasts.latest().map(|toast| toast.message.as_str()),
            Some("Welcome back!")
        );

        portal.logout().expect("logout succeeds");
        assert!(!portal.is_authenticated());
        assert_eq!(portal.take_effects(), vec![PortalEffect::Navigate(PageId::Home)]);
    }

    #[test]
    fn upload_ticks_until_complete_without_duplicate_chains() {
        let (mut portal, scheduler) = portal();
        let id = portal
            .upload
            .accept("notes.pdf", 1024, portal.store.as_mut(), chrono::Utc::now())
            .expect("pdf accepted");

        portal.resume_uploads();
        portal.resume_uploads();
        assert_eq!(scheduler.pending(), 1);

        let mut rounds = 0;
        while scheduler.pending() > 0 && rounds < 1000 {
            deliver_all(&mut portal, &scheduler);
            rounds += 1;
        }
        let file = portal
            .upload
            .files()
            .iter()
            .find(|file| file.id == id)
            .expect("file kept");
        assert_eq!(file.progress, 100.0);
        assert!(portal.upload.uploading_ids().is_empty());
    }

    #[test]
    fn conversion_event_adds_completed_file() {
        let (mut portal, scheduler) = portal();
        portal
            .convert_url("https://example.org/article")
            .expect("valid url");
        deliver_all(&mut portal, &scheduler);

        assert_eq!(portal.upload.files()[0].name, "example.org.pdf");
        assert_eq!(
            portal.toasts.latest().map(|toast| toast.message.as_str()),
            Some("URL converted to PDF successfully!")
        );
    }

    #[test]
    fn initializers_cover_every_page_but_home() {
        let registry = Portal::initializers();
        let registered: BTreeSet<PageId> = registry.registered().collect();
        let expected: BTreeSet<PageId> = super::FEATURED_PAGES.into_iter().collect();
        assert_eq!(registered, expected);
        assert!(!registry.has_initializer(PageId::Home));
    }

    #[test]
    fn replacing_scheduler_replays_pending_requests() {
        let (mut portal, first) = portal();
        portal.convert_url("https://docs.rs").expect("valid url");
        assert_eq!(first.pending(), 1);

        let second = ManualScheduler::default();
        portal.set_scheduler(Box::new(second.clone()));
        assert_eq!(first.pending(), 0);
        assert!(matches!(
            second.take_all().as_slice(),
            [request] if matches!(request.event, PortalEvent::UrlConverted { .. })
        ));
    }
}
