use chrono::{DateTime, Utc};
use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::Modifier;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};

use crate::portal::upload::UploadStatus;
use crate::portal::{FEATURED_PAGES, Portal, blog, library};
use crate::router::PageId;
use crate::util::{format_file_size, format_time_ago, truncate_chars};

use super::Screen;
use super::style::ThemeStyle;

const PROGRESS_CELLS: usize = 20;

pub fn draw_page_body(frame: &mut Frame<'_>, area: Rect, screen: &Screen<'_>, style: &ThemeStyle) {
    if area.width == 0 || area.height == 0 {
        return;
    }
    let page = screen.app.current_page;
    let ctx = PageContext {
        portal: screen.portal,
        selection: screen.app.selection,
        style,
        now: Utc::now(),
    };
    if page == PageId::Chat {
        draw_chat(frame, area, &ctx);
        return;
    }

    let lines = match page {
        PageId::Home => home_lines(&ctx),
        PageId::Library => library_lines(&ctx),
        PageId::Upload => upload_lines(&ctx),
        PageId::Gpa => gpa_lines(&ctx),
        PageId::Blog => blog_lines(&ctx),
        PageId::Dashboard => dashboard_lines(&ctx),
        PageId::Chat => Vec::new(),
    };
    let block = Block::default()
        .title(format!(" {} ", page.label()))
        .borders(Borders::TOP)
        .border_style(style.muted());
    frame.render_widget(
        Paragraph::new(lines)
            .block(block)
            .style(style.base())
            .wrap(Wrap { trim: false }),
        area,
    );
}

struct PageContext<'a> {
    portal: &'a Portal,
    selection: usize,
    style: &'a ThemeStyle,
    now: DateTime<Utc>,
}

impl PageContext<'_> {
    fn row(&self, index: usize, spans: Vec<Span<'static>>) -> Line<'static> {
        let selected = index == self.selection;
        let mut all = vec![if selected {
            Span::styled(" ┃ ", self.style.accent())
        } else {
            Span::raw("   ")
        }];
        all.extend(spans);
        let line = Line::from(all);
        if selected {
            line.style(self.style.selected())
        } else {
            line
        }
    }

    fn heading(&self, text: impl Into<String>) -> Line<'static> {
        Line::from(Span::styled(text.into(), self.style.heading()))
    }

    fn note(&self, text: impl Into<String>) -> Line<'static> {
        Line::from(Span::styled(text.into(), self.style.muted()))
    }
}

fn page_blurb(page: PageId) -> &'static str {
    match page {
        PageId::Home => "Start here",
        PageId::Library => "Lecture notes, books and videos by department",
        PageId::Upload => "Upload documents or convert a web page to PDF",
        PageId::Gpa => "Track courses and compute your GPA",
        PageId::Chat => "Talk with classmates and study groups",
        PageId::Blog => "Articles on AI, web development and careers",
        PageId::Dashboard => "Your files, bookmarks and conversations",
    }
}

fn home_lines(ctx: &PageContext<'_>) -> Vec<Line<'static>> {
    let mut lines = vec![
        Line::default(),
        ctx.heading("  BiTS Connect"),
        ctx.note("  Educational platform for BiTS students"),
        Line::default(),
    ];
    for (idx, page) in FEATURED_PAGES.into_iter().enumerate() {
        let mut spans = vec![Span::styled(
            format!("{:<10}", page.label()),
            ctx.style.accent().add_modifier(Modifier::BOLD),
        )];
        spans.push(Span::raw(page_blurb(page)));
        lines.push(ctx.row(idx, spans));
    }
    lines.push(Line::default());
    lines.push(ctx.note("  j/k select  Enter open  : commands  / search"));
    lines
}

fn library_lines(ctx: &PageContext<'_>) -> Vec<Line<'static>> {
    let library = &ctx.portal.library;
    let filters = library.filters();
    let department = if filters.department == library::ALL {
        "All Departments"
    } else {
        library::department_name(&filters.department)
    };
    let mut lines = vec![ctx.note(format!(
        "search: \"{}\"  department: {department}  category: {}",
        filters.search, filters.category
    ))];

    if library.visible_len() == 0 {
        lines.push(ctx.note("No resources match the current filters."));
        return lines;
    }
    for (idx, resource) in library.visible().enumerate() {
        let marker = if library.is_bookmarked(resource.id) {
            "★ "
        } else {
            "  "
        };
        lines.push(ctx.row(
            idx,
            vec![
                Span::styled(marker, ctx.style.accent()),
                Span::raw(format!("[{}] {}", resource.id, resource.title)),
                Span::styled(
                    format!(
                        "  {} | {} | {:.1} | {} downloads | {} {}",
                        resource.author,
                        library::department_name(&resource.department),
                        resource.rating,
                        resource.downloads,
                        resource.file_type,
                        format_file_size(resource.size),
                    ),
                    ctx.style.muted(),
                ),
            ],
        ));
    }
    lines
}

fn progress_bar(progress: f64) -> String {
    let filled = ((progress.clamp(0.0, 100.0) / 100.0) * PROGRESS_CELLS as f64).round() as usize;
    format!(
        "[{}{}] {:>3.0}%",
        "#".repeat(filled),
        "-".repeat(PROGRESS_CELLS - filled),
        progress.min(100.0)
    )
}

fn upload_lines(ctx: &PageContext<'_>) -> Vec<Line<'static>> {
    let upload = &ctx.portal.upload;
    let mut lines = vec![ctx.note(
        "upload-file <path> (pdf, epub, txt, doc, docx; max 100MB)  convert-url <url>",
    )];
    if upload.is_converting() {
        lines.push(Line::from(Span::styled(
            "Converting URL to PDF...",
            ctx.style.accent(),
        )));
    }
    if upload.files().is_empty() {
        lines.push(ctx.note("No files uploaded yet."));
        return lines;
    }

    for (idx, file) in upload.files().iter().enumerate() {
        let status = match file.status {
            UploadStatus::Uploading => progress_bar(file.progress),
            UploadStatus::Completed => "completed".to_string(),
            UploadStatus::Error => "error".to_string(),
        };
        lines.push(ctx.row(
            idx,
            vec![
                Span::raw(format!("{}. {}", idx + 1, file.name)),
                Span::styled(
                    format!(
                        "  {} | {} | ",
                        format_file_size(file.size),
                        format_time_ago(file.uploaded_at, ctx.now)
                    ),
                    ctx.style.muted(),
                ),
                Span::raw(status),
            ],
        ));
    }
    lines
}

fn gpa_lines(ctx: &PageContext<'_>) -> Vec<Line<'static>> {
    let gpa = &ctx.portal.gpa;
    let stats = gpa.stats();
    let mut lines = vec![
        ctx.heading(format!("{}  GPA {:.2}", gpa.semester_name(), stats.current)),
        ctx.note(format!(
            "cumulative {:.2} over {} saved semester(s), {} course(s)",
            stats.cumulative, stats.semesters, stats.courses
        )),
        Line::default(),
    ];
    if gpa.courses().is_empty() {
        lines.push(ctx.note("No courses yet. add-course [name]"));
    }
    for (idx, course) in gpa.courses().iter().enumerate() {
        lines.push(ctx.row(
            idx,
            vec![
                Span::raw(format!("{}. {:<28}", idx + 1, truncate_chars(&course.name, 25))),
                Span::raw(format!("{} cr  ", course.credits)),
                Span::styled(format!("{:<3}", course.grade), ctx.style.accent()),
                Span::styled(
                    format!(" ({:.1})", course.grade.points()),
                    ctx.style.muted(),
                ),
            ],
        ));
    }
    if !gpa.semesters().is_empty() {
        lines.push(Line::default());
        lines.push(ctx.heading("Saved semesters"));
        for semester in gpa.semesters() {
            lines.push(Line::from(format!(
                "   {}  GPA {:.2}  {} course(s)",
                semester.name,
                semester.gpa,
                semester.courses.len()
            )));
        }
    }
    lines
}

fn blog_lines(ctx: &PageContext<'_>) -> Vec<Line<'static>> {
    let blog = &ctx.portal.blog;
    let mut lines = vec![ctx.note(format!(
        "search: \"{}\"  category: {}",
        blog.search(),
        blog::category_name(blog.category())
    ))];
    if blog.visible_len() == 0 {
        lines.push(ctx.note("No articles match the current filters."));
        return lines;
    }
    for (idx, post) in blog.visible().enumerate() {
        lines.push(ctx.row(
            idx,
            vec![
                Span::raw(post.title.to_string()),
                Span::styled(
                    format!(
                        "  {} | {} | {} min | {}",
                        post.author,
                        blog::category_name(post.category),
                        post.read_minutes,
                        post.source
                    ),
                    ctx.style.muted(),
                ),
            ],
        ));
        lines.push(ctx.note(format!("     {}", post.excerpt)));
    }
    lines
}

fn dashboard_lines(ctx: &PageContext<'_>) -> Vec<Line<'static>> {
    let dashboard = &ctx.portal.dashboard;
    let snapshot = dashboard.snapshot();
    let mut lines = vec![ctx.heading(snapshot.greeting.clone()), Line::default()];

    lines.push(ctx.heading("Recent files"));
    for (idx, file) in dashboard.recent_files().iter().enumerate() {
        lines.push(ctx.row(
            idx,
            vec![
                Span::raw(format!("[{}] {}", file.id, file.name)),
                Span::styled(
                    format!(
                        "  {} {} | {}",
                        file.file_type,
                        format_file_size(file.size),
                        format_time_ago(file.opened_at, ctx.now)
                    ),
                    ctx.style.muted(),
                ),
            ],
        ));
    }

    lines.push(Line::default());
    lines.push(ctx.heading("Bookmarks"));
    if snapshot.bookmarks.is_empty() {
        lines.push(ctx.note("   Nothing bookmarked yet."));
    }
    for bookmark in &snapshot.bookmarks {
        lines.push(Line::from(format!(
            "   {} | {} | {}",
            bookmark.title, bookmark.author, bookmark.category
        )));
    }

    lines.push(Line::default());
    lines.push(ctx.heading("Chats"));
    for chat in &snapshot.chats {
        let unread = if chat.unread > 0 {
            format!(" ({} new)", chat.unread)
        } else {
            String::new()
        };
        lines.push(Line::from(format!(
            "   {}{unread}: {}",
            chat.name,
            truncate_chars(&chat.last_message, 40)
        )));
    }
    lines
}

fn draw_chat(frame: &mut Frame<'_>, area: Rect, ctx: &PageContext<'_>) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(area);
    let chat = &ctx.portal.chat;
    let selected_id = chat.selected().map(|conversation| conversation.id);

    let mut list = Vec::new();
    if !chat.filter().is_empty() {
        list.push(ctx.note(format!("filter: \"{}\"", chat.filter())));
    }
    for (idx, conversation) in chat.visible().into_iter().enumerate() {
        let open = if selected_id == Some(conversation.id) {
            "> "
        } else {
            "  "
        };
        let unread = if conversation.unread > 0 {
            format!(" ({})", conversation.unread)
        } else {
            String::new()
        };
        list.push(ctx.row(
            idx,
            vec![
                Span::styled(open, ctx.style.accent()),
                Span::raw(format!("[{}] {}{unread}", conversation.id, conversation.name)),
            ],
        ));
        list.push(ctx.note(format!(
            "     {}",
            truncate_chars(&conversation.last_message, 32)
        )));
    }
    let list_block = Block::default()
        .title(" Chat ")
        .borders(Borders::TOP | Borders::RIGHT)
        .border_style(ctx.style.muted());
    frame.render_widget(
        Paragraph::new(list).block(list_block).style(ctx.style.base()),
        chunks[0],
    );

    let (title, messages) = match chat.selected() {
        Some(conversation) => {
            let mut lines = vec![ctx.note(conversation.status_line())];
            for message in chat.messages(conversation.id) {
                let sender_style = if message.own {
                    ctx.style.accent()
                } else {
                    ctx.style.heading()
                };
                lines.push(Line::from(vec![
                    Span::styled(format!("{}: ", message.sender), sender_style),
                    Span::raw(message.text.clone()),
                    Span::styled(
                        format!("  {}", format_time_ago(message.sent_at, ctx.now)),
                        ctx.style.muted(),
                    ),
                ]));
            }
            (format!(" {} ", conversation.name), lines)
        }
        None => (
            " Messages ".to_string(),
            vec![ctx.note("Select a conversation (Enter) to read it.")],
        ),
    };
    let message_block = Block::default()
        .title(title)
        .borders(Borders::TOP)
        .border_style(ctx.style.muted());
    frame.render_widget(
        Paragraph::new(messages)
            .block(message_block)
            .style(ctx.style.base())
            .wrap(Wrap { trim: false }),
        chunks[1],
    );
}
