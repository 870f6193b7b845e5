use crate::palette::PaletteCandidate;

pub trait CandidateMatcher: Send + Sync {
    fn select(&self, input: &str, candidates: &[PaletteCandidate]) -> Vec<usize>;
}

/// Case-insensitive substring matcher over label and detail. Label prefix
/// hits come first, then label hits, then detail-only hits.
#[derive(Debug, Default)]
pub struct ContainsMatcher;

impl CandidateMatcher for ContainsMatcher {
    fn select(&self, input: &str, candidates: &[PaletteCandidate]) -> Vec<usize> {
        let query = input.trim().to_lowercase();
        if query.is_empty() {
            return (0..candidates.len()).collect();
        }

        let mut tiers: [Vec<usize>; 3] = Default::default();
        for (idx, candidate) in candidates.iter().enumerate() {
            let label = candidate.label.to_lowercase();
            let tier = if label.starts_with(&query) {
                0
            } else if label.contains(&query) {
                1
            } else if candidate
                .detail
                .as_deref()
                .is_some_and(|detail| detail.to_lowercase().contains(&query))
            {
                2
            } else {
                continue;
            };
            tiers[tier].push(idx);
        }

        tiers.into_iter().flatten().collect()
    }
}

#[cfg(test)]
mod tests {
    use crate::palette::{PaletteCandidate, PalettePayload};

    use super::{CandidateMatcher, ContainsMatcher};

    fn candidate(label: &str, detail: Option<&str>) -> PaletteCandidate {
        PaletteCandidate {
            id: label.to_string(),
            label: label.to_string(),
            detail: detail.map(str::to_string),
            payload: PalettePayload::CommandId("test"),
        }
    }

    #[test]
    fn prefix_then_contains_then_detail() {
        let matcher = ContainsMatcher;
        let all = vec![
            candidate("#blog", Some("Tech Blog")),
            candidate("#library", Some("Digital Library")),
            candidate("#dashboard", Some("Dashboard")),
            candidate("#chat", Some("Student Chat")),
        ];

        assert_eq!(matcher.select("#b", &all), vec![0]);
        assert_eq!(matcher.select("b", &all), vec![0, 1, 2]);
        assert_eq!(matcher.select("STUDENT", &all), vec![3]);
        assert_eq!(matcher.select("  ", &all).len(), 4);
    }
}
