use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::storage::{KeyValueStore, KeyValueStoreExt};
use crate::util::generate_id;

pub const SEMESTERS_KEY: &str = "semesters";
const FIRST_SEMESTER: &str = "Fall 2024";
const DEFAULT_CREDITS: u8 = 3;
const CREDIT_RANGE: std::ops::RangeInclusive<u8> = 1..=6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Grade {
    #[serde(rename = "A+")]
    APlus,
    #[serde(rename = "A")]
    A,
    #[serde(rename = "A-")]
    AMinus,
    #[serde(rename = "B+")]
    BPlus,
    #[serde(rename = "B")]
    B,
    #[serde(rename = "B-")]
    BMinus,
    #[serde(rename = "C+")]
    CPlus,
    #[serde(rename = "C")]
    C,
    #[serde(rename = "C-")]
    CMinus,
    #[serde(rename = "D+")]
    DPlus,
    #[serde(rename = "D")]
    D,
    #[serde(rename = "F")]
    F,
}

impl Grade {
    pub const ALL: [Self; 12] = [
        Self::APlus,
        Self::A,
        Self::AMinus,
        Self::BPlus,
        Self::B,
        Self::BMinus,
        Self::CPlus,
        Self::C,
        Self::CMinus,
        Self::DPlus,
        Self::D,
        Self::F,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::APlus => "A+",
            Self::A => "A",
            Self::AMinus => "A-",
            Self::BPlus => "B+",
            Self::B => "B",
            Self::BMinus => "B-",
            Self::CPlus => "C+",
            Self::C => "C",
            Self::CMinus => "C-",
            Self::DPlus => "D+",
            Self::D => "D",
            Self::F => "F",
        }
    }

    pub fn points(self) -> f64 {
        match self {
            Self::APlus | Self::A => 4.0,
            Self::AMinus => 3.7,
            Self::BPlus => 3.3,
            Self::B => 3.0,
            Self::BMinus => 2.7,
            Self::CPlus => 2.3,
            Self::C => 2.0,
            Self::CMinus => 1.7,
            Self::DPlus => 1.3,
            Self::D => 1.0,
            Self::F => 0.0,
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        Self::ALL
            .into_iter()
            .find(|grade| grade.label().eq_ignore_ascii_case(raw))
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Course {
    pub id: String,
    pub name: String,
    pub credits: u8,
    pub grade: Grade,
    pub points: f64,
}

impl Course {
    fn new(name: String) -> Self {
        Self {
            id: generate_id(),
            name,
            credits: DEFAULT_CREDITS,
            grade: Grade::A,
            points: Grade::A.points(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Semester {
    pub id: String,
    pub name: String,
    pub courses: Vec<Course>,
    pub gpa: f64,
    pub completed_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct GpaStats {
    pub cumulative: f64,
    pub current: f64,
    pub semesters: usize,
    pub courses: usize,
}

/// Credit-weighted grade point average, 0 for an empty list.
pub fn compute_gpa(courses: &[Course]) -> f64 {
    let credits: u32 = courses.iter().map(|course| u32::from(course.credits)).sum();
    if credits == 0 {
        return 0.0;
    }
    let weighted: f64 = courses
        .iter()
        .map(|course| course.grade.points() * f64::from(course.credits))
        .sum();
    weighted / f64::from(credits)
}

#[derive(Debug)]
pub struct GpaCalculator {
    semester_name: String,
    courses: Vec<Course>,
    semesters: Vec<Semester>,
    stats: GpaStats,
}

impl GpaCalculator {
    pub fn restore(store: &dyn KeyValueStore) -> Self {
        let mut calc = Self {
            semester_name: FIRST_SEMESTER.to_string(),
            courses: Vec::new(),
            semesters: store.load(SEMESTERS_KEY, Vec::new()),
            stats: GpaStats::default(),
        };
        calc.recompute();
        calc
    }

    pub fn reload(&mut self, store: &dyn KeyValueStore) {
        self.semesters = store.load(SEMESTERS_KEY, Vec::new());
        self.recompute();
    }

    pub fn semester_name(&self) -> &str {
        &self.semester_name
    }

    pub fn courses(&self) -> &[Course] {
        &self.courses
    }

    pub fn semesters(&self) -> &[Semester] {
        &self.semesters
    }

    pub fn stats(&self) -> GpaStats {
        self.stats
    }

    pub fn set_semester_name(&mut self, name: &str) -> AppResult<()> {
        let name = name.trim();
        if name.is_empty() {
            return Err(AppError::invalid_argument("semester name cannot be empty"));
        }
        self.semester_name = name.to_string();
        Ok(())
    }

    pub fn add_course(&mut self, name: Option<&str>) -> usize {
        let name = name
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map_or_else(|| format!("Course {}", self.courses.len() + 1), str::to_string);
        self.courses.push(Course::new(name));
        self.recompute();
        self.courses.len() - 1
    }

    pub fn rename_course(&mut self, index: usize, name: &str) -> AppResult<()> {
        self.course_mut(index)?.name = name.trim().to_string();
        Ok(())
    }

    pub fn set_credits(&mut self, index: usize, credits: u8) -> AppResult<()> {
        if !CREDIT_RANGE.contains(&credits) {
            return Err(AppError::invalid_argument(format!(
                "credits must be between {} and {}",
                CREDIT_RANGE.start(),
                CREDIT_RANGE.end()
            )));
        }
        self.course_mut(index)?.credits = credits;
        self.recompute();
        Ok(())
    }

    pub fn set_grade(&mut self, index: usize, grade: Grade) -> AppResult<()> {
        let course = self.course_mut(index)?;
        course.grade = grade;
        course.points = grade.points();
        self.recompute();
        Ok(())
    }

    pub fn remove_course(&mut self, index: usize) -> AppResult<Course> {
        if index >= self.courses.len() {
            return Err(unknown_course(index));
        }
        let removed = self.courses.remove(index);
        self.recompute();
        Ok(removed)
    }

    pub fn save_semester(
        &mut self,
        store: &mut dyn KeyValueStore,
        now: DateTime<Utc>,
    ) -> AppResult<&Semester> {
        if self.courses.is_empty() {
            return Err(AppError::validation("Please add at least one course"));
        }
        let semester = Semester {
            id: generate_id(),
            name: self.semester_name.clone(),
            gpa: compute_gpa(&self.courses),
            courses: std::mem::take(&mut self.courses),
            completed_at: now,
        };
        self.semesters.push(semester);
        if let Err(err) = store.save(SEMESTERS_KEY, &self.semesters) {
            if let Some(semester) = self.semesters.pop() {
                self.courses = semester.courses;
            }
            return Err(err);
        }

        self.semester_name = format!("Semester {}", self.semesters.len() + 1);
        self.recompute();
        self.semesters
            .last()
            .ok_or_else(|| AppError::validation("semester was not recorded"))
    }

    /// Plain-text report of every saved semester and the one in progress.
    pub fn export_report(&self) -> String {
        let mut lines = vec![format!("Cumulative GPA: {:.2}", self.stats.cumulative)];
        for semester in &self.semesters {
            lines.push(format!("{}: {:.2}", semester.name, semester.gpa));
            for course in &semester.courses {
                lines.push(format!(
                    "  {} ({} cr) {}",
                    course.name, course.credits, course.grade
                ));
            }
        }
        if !self.courses.is_empty() {
            lines.push(format!("{} (current): {:.2}", self.semester_name, self.stats.current));
        }
        lines.join("\n")
    }

    fn course_mut(&mut self, index: usize) -> AppResult<&mut Course> {
        self.courses.get_mut(index).ok_or_else(|| unknown_course(index))
    }

    fn recompute(&mut self) {
        let all: Vec<Course> = self
            .semesters
            .iter()
            .flat_map(|semester| semester.courses.iter().cloned())
            .chain(self.courses.iter().cloned())
            .collect();
        self.stats = GpaStats {
            cumulative: compute_gpa(&all),
            current: compute_gpa(&self.courses),
            semesters: self.semesters.len(),
            courses: all.len(),
        };
    }
}

fn unknown_course(index: usize) -> AppError {
    AppError::invalid_argument(format!("no course at position {}", index + 1))
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::{GpaCalculator, Grade, SEMESTERS_KEY};
    use crate::storage::{JsonFileStore, KeyValueStore, MemoryStore};

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn grade_labels_parse_case_insensitively() {
        assert_eq!(Grade::parse("b+"), Some(Grade::BPlus));
        assert_eq!(Grade::parse("A"), Some(Grade::A));
        assert_eq!(Grade::parse("E"), None);
        assert!(approx(Grade::CMinus.points(), 1.7));
    }

    #[test]
    fn current_gpa_is_credit_weighted() {
        let store = MemoryStore::default();
        let mut calc = GpaCalculator::restore(&store);
        assert!(approx(calc.stats().current, 0.0));

        let first = calc.add_course(Some("Algorithms"));
        let second = calc.add_course(None);
        assert_eq!(calc.courses()[second].name, "Course 2");
        calc.set_credits(first, 4).expect("valid credits");
        calc.set_grade(second, Grade::B).expect("course exists");

        // (4*4.0 + 3*3.0) / 7
        assert!(approx(calc.stats().current, 25.0 / 7.0));
        assert!(calc.set_credits(first, 7).is_err());
        assert!(calc.set_grade(5, Grade::F).is_err());
    }

    #[test]
    fn save_semester_requires_courses_and_resets() {
        let mut store = MemoryStore::default();
        let mut calc = GpaCalculator::restore(&store);
        assert_eq!(
            calc.save_semester(&mut store, Utc::now())
                .map(|s| s.name.clone())
                .map_err(|err| err.to_string()),
            Err("Please add at least one course".to_string())
        );

        calc.add_course(Some("Physics"));
        let saved = calc
            .save_semester(&mut store, Utc::now())
            .expect("semester saves");
        assert_eq!(saved.name, "Fall 2024");
        assert!(approx(saved.gpa, 4.0));
        assert_eq!(calc.semester_name(), "Semester 2");
        assert!(calc.courses().is_empty());
        assert!(store.get_raw(SEMESTERS_KEY).is_some());

        calc.add_course(Some("Chemistry"));
        calc.set_grade(0, Grade::C).expect("course exists");
        assert!(approx(calc.stats().cumulative, 3.0));

        let reloaded = GpaCalculator::restore(&store);
        assert_eq!(reloaded.semesters().len(), 1);
        assert_eq!(reloaded.stats().courses, 1);
        assert!(calc.export_report().starts_with("Cumulative GPA: 3.00"));
    }

    #[test]
    fn failed_save_is_not_restored_by_reload() {
        let mut path = std::env::temp_dir();
        path.push(format!(
            "bits_gpa_blocked_{}_{}.json",
            std::process::id(),
            Utc::now().timestamp_nanos_opt().unwrap_or_default()
        ));
        let mut store = JsonFileStore::open(&path).expect("store should open");
        let temp_path = path.with_extension("json.tmp");
        std::fs::create_dir(&temp_path).expect("blocking dir should be created");

        let mut calc = GpaCalculator::restore(&store);
        calc.add_course(Some("Networks"));
        assert!(calc.save_semester(&mut store, Utc::now()).is_err());
        assert!(calc.semesters().is_empty());
        assert_eq!(calc.courses().len(), 1);

        calc.reload(&store);
        assert!(calc.semesters().is_empty());
        assert_eq!(calc.courses().len(), 1);

        std::fs::remove_dir(&temp_path).expect("blocking dir should be removed");
        let _ = std::fs::remove_file(&path);
    }
}
