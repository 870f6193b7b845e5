use chrono::{DateTime, TimeDelta, Utc};

use crate::error::{AppError, AppResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatKind {
    Group { members: u32 },
    Direct { online: bool },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conversation {
    pub id: u32,
    pub name: String,
    pub kind: ChatKind,
    pub last_message: String,
    pub last_at: DateTime<Utc>,
    pub unread: u32,
}

impl Conversation {
    pub fn status_line(&self) -> String {
        match self.kind {
            ChatKind::Group { members } => format!("{members} members"),
            ChatKind::Direct { online: true } => "Online".to_string(),
            ChatKind::Direct { online: false } => "Last seen recently".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub chat_id: u32,
    pub sender: String,
    pub text: String,
    pub sent_at: DateTime<Utc>,
    pub own: bool,
}

#[derive(Debug)]
pub struct ChatHub {
    conversations: Vec<Conversation>,
    messages: Vec<Message>,
    filter: String,
    selected: Option<u32>,
}

impl ChatHub {
    pub fn seeded(now: DateTime<Utc>) -> Self {
        let minutes = |n| now - TimeDelta::minutes(n);
        let conversation = |id, name: &str, kind, last: &str, at, unread| Conversation {
            id,
            name: name.to_string(),
            kind,
            last_message: last.to_string(),
            last_at: at,
            unread,
        };
        let message = |sender: &str, text: &str, at, own| Message {
            chat_id: 1,
            sender: sender.to_string(),
            text: text.to_string(),
            sent_at: at,
            own,
        };

        Self {
            conversations: vec![
                conversation(
                    1,
                    "CS Study Group",
                    ChatKind::Group { members: 12 },
                    "Hey everyone, ready for the exam?",
                    minutes(5),
                    3,
                ),
                conversation(
                    2,
                    "Sarah Johnson",
                    ChatKind::Direct { online: true },
                    "Thanks for sharing those notes!",
                    minutes(15),
                    1,
                ),
                conversation(
                    3,
                    "Math Tutoring",
                    ChatKind::Group { members: 8 },
                    "Can someone help with problem 15?",
                    minutes(30),
                    0,
                ),
                conversation(
                    4,
                    "Alex Kumar",
                    ChatKind::Direct { online: false },
                    "See you in the library tomorrow",
                    minutes(120),
                    0,
                ),
            ],
            messages: vec![
                message(
                    "Sarah Johnson",
                    "Hey everyone! I just uploaded the lecture notes from today's class. Check them out in the library section.",
                    minutes(60),
                    false,
                ),
                message(
                    "Alex Kumar",
                    "Thanks Sarah! That's really helpful. I was struggling with the recursion examples.",
                    minutes(58),
                    false,
                ),
                message(
                    "You",
                    "Same here! The binary tree traversal part was confusing. Can we schedule a study session?",
                    minutes(55),
                    true,
                ),
            ],
            filter: String::new(),
            selected: None,
        }
    }

    pub fn filter(&self) -> &str {
        &self.filter
    }

    pub fn set_filter(&mut self, term: impl Into<String>) {
        self.filter = term.into();
    }

    /// Clears the filter so the full list shows again.
    pub fn refresh(&mut self) {
        self.filter.clear();
    }

    pub fn visible(&self) -> Vec<&Conversation> {
        let term = self.filter.trim().to_lowercase();
        self.conversations
            .iter()
            .filter(|chat| term.is_empty() || chat.name.to_lowercase().contains(&term))
            .collect()
    }

    pub fn conversation(&self, id: u32) -> Option<&Conversation> {
        self.conversations.iter().find(|chat| chat.id == id)
    }

    pub fn selected(&self) -> Option<&Conversation> {
        self.selected.and_then(|id| self.conversation(id))
    }

    pub fn select(&mut self, id: u32) -> AppResult<&Conversation> {
        let chat = self
            .conversations
            .iter_mut()
            .find(|chat| chat.id == id)
            .ok_or_else(|| AppError::invalid_argument(format!("unknown chat: {id}")))?;
        chat.unread = 0;
        self.selected = Some(id);
        Ok(chat)
    }

    pub fn messages(&self, chat_id: u32) -> impl Iterator<Item = &Message> {
        self.messages
            .iter()
            .filter(move |message| message.chat_id == chat_id)
    }

    pub fn send(&mut self, text: &str, sender: Option<&str>, now: DateTime<Utc>) -> AppResult<()> {
        let Some(chat_id) = self.selected else {
            return Err(AppError::validation("Select a conversation first"));
        };
        let text = text.trim();
        if text.is_empty() {
            return Err(AppError::validation("Message cannot be empty"));
        }
        let Some(sender) = sender else {
            return Err(AppError::validation("Please log in to send messages"));
        };

        self.messages.push(Message {
            chat_id,
            sender: sender.to_string(),
            text: text.to_string(),
            sent_at: now,
            own: true,
        });
        if let Some(chat) = self.conversations.iter_mut().find(|chat| chat.id == chat_id) {
            chat.last_message = text.to_string();
            chat.last_at = now;
        }
        Ok(())
    }

    pub fn recent(&self, limit: usize) -> Vec<&Conversation> {
        self.conversations.iter().take(limit).collect()
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::ChatHub;

    #[test]
    fn filter_matches_names_and_refresh_clears() {
        let mut hub = ChatHub::seeded(Utc::now());
        hub.set_filter("math");
        let names: Vec<_> = hub.visible().iter().map(|chat| chat.name.clone()).collect();
        assert_eq!(names, vec!["Math Tutoring".to_string()]);

        hub.refresh();
        assert_eq!(hub.visible().len(), 4);
    }

    #[test]
    fn select_marks_read_and_reports_status() {
        let mut hub = ChatHub::seeded(Utc::now());
        let chat = hub.select(1).expect("chat exists");
        assert_eq!(chat.unread, 0);
        assert_eq!(chat.status_line(), "12 members");
        assert_eq!(hub.messages(1).count(), 3);
        assert!(hub.select(9).is_err());
        assert_eq!(
            hub.conversation(4).map(|chat| chat.status_line()),
            Some("Last seen recently".to_string())
        );
    }

    #[test]
    fn send_requires_selection_text_and_user() {
        let now = Utc::now();
        let mut hub = ChatHub::seeded(now);
        assert!(hub.send("hi", Some("ana"), now).is_err());

        hub.select(2).expect("chat exists");
        assert!(hub.send("   ", Some("ana"), now).is_err());
        assert_eq!(
            hub.send("hi", None, now).map_err(|err| err.to_string()),
            Err("Please log in to send messages".to_string())
        );

        hub.send("See you at 5", Some("ana"), now)
            .expect("message is sent");
        assert_eq!(
            hub.selected().map(|chat| chat.last_message.as_str()),
            Some("See you at 5")
        );
        assert_eq!(hub.messages(2).count(), 1);
        assert_eq!(hub.recent(3).len(), 3);
    }
}
