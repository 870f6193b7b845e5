use chrono::{DateTime, TimeDelta, Utc};

use crate::error::{AppError, AppResult};

pub const CATEGORIES: [(&str, &str); 5] = [
    ("all", "All Articles"),
    ("ai", "AI & ML"),
    ("webdev", "Web Dev"),
    ("tools", "Dev Tools"),
    ("careers", "Tech Careers"),
];

pub fn category_name(id: &str) -> &str {
    CATEGORIES
        .iter()
        .find(|(key, _)| *key == id)
        .map_or(id, |(_, name)| name)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Post {
    pub id: u32,
    pub title: &'static str,
    pub excerpt: &'static str,
    pub author: &'static str,
    pub published_at: DateTime<Utc>,
    pub category: &'static str,
    pub read_minutes: u32,
    pub source: &'static str,
    pub url: &'static str,
}

#[derive(Debug)]
pub struct Blog {
    posts: Vec<Post>,
    search: String,
    category: String,
    visible: Vec<usize>,
}

impl Blog {
    pub fn seeded(now: DateTime<Utc>) -> Self {
        let mut blog = Self {
            posts: seed_posts(now),
            search: String::new(),
            category: "all".to_string(),
            visible: Vec::new(),
        };
        blog.apply_filters();
        blog
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn set_search(&mut self, term: impl Into<String>) {
        self.search = term.into();
        self.apply_filters();
    }

    pub fn set_category(&mut self, category: &str) -> AppResult<()> {
        if !CATEGORIES.iter().any(|(id, _)| *id == category) {
            return Err(AppError::invalid_argument(format!(
                "unknown category: {category}"
            )));
        }
        self.category = category.to_string();
        self.apply_filters();
        Ok(())
    }

    pub fn apply_filters(&mut self) {
        let term = self.search.trim().to_lowercase();
        self.visible = self
            .posts
            .iter()
            .enumerate()
            .filter(|(_, post)| {
                (self.category == "all" || post.category == self.category)
                    && (term.is_empty()
                        || post.title.to_lowercase().contains(&term)
                        || post.excerpt.to_lowercase().contains(&term)
                        || post.author.to_lowercase().contains(&term))
            })
            .map(|(index, _)| index)
            .collect();
    }

    pub fn visible(&self) -> impl Iterator<Item = &Post> {
        self.visible.iter().filter_map(|index| self.posts.get(*index))
    }

    pub fn visible_len(&self) -> usize {
        self.visible.len()
    }

    pub fn visible_at(&self, position: usize) -> Option<&Post> {
        self.visible
            .get(position)
            .and_then(|index| self.posts.get(*index))
    }
}

fn seed_posts(now: DateTime<Utc>) -> Vec<Post> {
    let days = |n| now - TimeDelta::days(n);
    vec![
        Post {
            id: 1,
            title: "The Future of Artificial Intelligence in Education",
            excerpt: "Exploring how AI is revolutionizing the way we learn and teach, from personalized learning paths to intelligent tutoring systems.",
            author: "Dr. Sarah Chen",
            published_at: days(2),
            category: "ai",
            read_minutes: 8,
            source: "TechCrunch",
            url: "https://techcrunch.com/ai-education",
        },
        Post {
            id: 2,
            title: "React 18: What's New and Why It Matters",
            excerpt: "A comprehensive look at React 18's new features including Concurrent Features, Suspense improvements, and automatic batching.",
            author: "Alex Thompson",
            published_at: days(1),
            category: "webdev",
            read_minutes: 12,
            source: "React Blog",
            url: "https://blog.react.dev",
        },
        Post {
            id: 3,
            title: "Top 10 VS Code Extensions for Developers in 2024",
            excerpt: "Boost your productivity with these essential Visual Studio Code extensions that every developer should know about.",
            author: "Maria Rodriguez",
            published_at: days(3),
            category: "tools",
            read_minutes: 6,
            source: "FreeCodeCamp",
            url: "https://freecodecamp.org/vscode-extensions",
        },
        Post {
            id: 4,
            title: "Breaking into Tech: A Complete Roadmap for 2024",
            excerpt: "Everything you need to know about starting a career in technology, from choosing the right path to landing your first job.",
            author: "David Kim",
            published_at: days(4),
            category: "careers",
            read_minutes: 15,
            source: "Hacker Noon",
            url: "https://hackernoon.com/tech-careers-2024",
        },
        Post {
            id: 5,
            title: "Machine Learning for Beginners: A Practical Guide",
            excerpt: "Start your machine learning journey with this comprehensive guide covering the fundamentals and practical applications.",
            author: "Prof. Robert Singh",
            published_at: days(6),
            category: "ai",
            read_minutes: 20,
            source: "Towards Data Science",
            url: "https://towardsdatascience.com/ml-beginners",
        },
        Post {
            id: 6,
            title: "CSS Grid vs Flexbox: When to Use Which",
            excerpt: "A detailed comparison of CSS Grid and Flexbox, helping you choose the right layout method for your projects.",
            author: "Emma Johnson",
            published_at: days(7),
            category: "webdev",
            read_minutes: 8,
            source: "CSS-Tricks",
            url: "https://css-tricks.com/grid-vs-flexbox",
        },
    ]
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::{Blog, category_name};

    #[test]
    fn category_and_search_filters_intersect() {
        let mut blog = Blog::seeded(Utc::now());
        assert_eq!(blog.visible_len(), 6);

        blog.set_category("ai").expect("known category");
        let ids: Vec<u32> = blog.visible().map(|post| post.id).collect();
        assert_eq!(ids, vec![1, 5]);

        blog.set_search("beginners");
        assert_eq!(blog.visible_at(0).map(|post| post.id), Some(5));
        assert_eq!(blog.visible_len(), 1);

        assert!(blog.set_category("gaming").is_err());
        assert_eq!(blog.category(), "ai");
    }

    #[test]
    fn category_names_cover_all_ids() {
        assert_eq!(category_name("webdev"), "Web Dev");
        assert_eq!(category_name("all"), "All Articles");
        assert_eq!(category_name("misc"), "misc");
    }
}
