//! Text normalization and résumé section extraction.

use serde::Serialize;

/// The three résumé content categories a comparison scores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Section {
    Experience,
    Education,
    Skills,
}

impl Section {
    /// Scoring order. Also the order sections are embedded in.
    pub const ALL: [Section; 3] = [Section::Experience, Section::Education, Section::Skills];

    /// Order in which per-section explanation lines are emitted.
    pub const EXPLANATION_ORDER: [Section; 3] =
        [Section::Experience, Section::Skills, Section::Education];

    /// Literal header keyword searched for in normalized text.
    pub fn keyword(self) -> &'static str {
        match self {
            Section::Experience => "experience",
            Section::Education => "education",
            Section::Skills => "skills",
        }
    }
}

/// Section text extracted from one normalized résumé. Absent sections are empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SectionedText {
    pub experience: String,
    pub education: String,
    pub skills: String,
}

impl SectionedText {
    pub fn get(&self, section: Section) -> &str {
        match section {
            Section::Experience => &self.experience,
            Section::Education => &self.education,
            Section::Skills => &self.skills,
        }
    }

    pub fn is_empty(&self) -> bool {
        Section::ALL.iter().all(|&s| self.get(s).is_empty())
    }
}

/// Lowercases `text` and drops everything except ASCII letters and whitespace.
pub fn normalize(text: &str) -> String {
    text.to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_whitespace())
        .collect()
}

/// Splits normalized résumé text into sections.
///
/// A section starts right after the first `<keyword>\n` header and runs to the
/// next occurrence of either *other* keyword, or to the end of the text. Only
/// the first header counts; later repeats of the same keyword stay inside the
/// span. Keywords are matched literally, so "skillset" ends a span just like
/// "skills" does, and a section titled "work history" is never found.
pub fn extract_sections(normalized: &str) -> SectionedText {
    // Every keyword position, sorted, so each span ends at the next distinct keyword.
    // `match_indices` skips self-overlapping repeats ("skillskills"), which never
    // hides the first terminator after a header, but can hide the header itself.
    let mut hits: Vec<(usize, Section)> = Section::ALL
        .iter()
        .flat_map(|&section| {
            normalized
                .match_indices(section.keyword())
                .map(move |(idx, _)| (idx, section))
        })
        .collect();
    hits.sort_unstable();

    let capture = |section: Section| -> String {
        let header = format!("{}\n", section.keyword());
        let start = normalized.find(&header).map(|idx| idx + header.len());

        let Some(start) = start else {
            return String::new();
        };

        let end = hits
            .iter()
            .find(|(idx, s)| *idx >= start && *s != section)
            .map(|(idx, _)| *idx)
            .unwrap_or(normalized.len());

        normalized[start..end].trim().to_string()
    };

    SectionedText {
        experience: capture(Section::Experience),
        education: capture(Section::Education),
        skills: capture(Section::Skills),
    }
}
