//! Comparator: scores two résumés against one job description, section by
//! section, and explains which one fits better.
//!
//! Algorithm:
//! 1. Normalize the JD; normalize and section-split both résumés.
//! 2. Embed the JD once.
//! 3. Embed each non-empty section and take its cosine similarity to the JD.
//!    Empty sections score exactly 0.0 and are never embedded.
//! 4. Overall score = Σ similarity × section weight.
//! 5. Strictly higher overall score wins; exact equality is a tie.
//! 6. Explanation lines compare similarities rounded to 4 decimals, so
//!    differences past the 4th decimal never produce a line.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info, info_span, Instrument};
use uuid::Uuid;

use crate::embedding::{cosine_similarity, Embedder, EmbeddingError};
use crate::matching::normalizer::{extract_sections, normalize, Section, SectionedText};
use crate::matching::weights::WeightConfig;

/// Cosine similarity of each section to the job description. Missing sections are 0.0.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct SimilarityVector {
    pub experience: f64,
    pub education: f64,
    pub skills: f64,
}

impl SimilarityVector {
    pub fn get(&self, section: Section) -> f64 {
        match section {
            Section::Experience => self.experience,
            Section::Education => self.education,
            Section::Skills => self.skills,
        }
    }

    fn set(&mut self, section: Section, value: f64) {
        match section {
            Section::Experience => self.experience = value,
            Section::Education => self.education = value,
            Section::Skills => self.skills = value,
        }
    }

    /// Similarities as 4-decimal strings, the form shown to users.
    pub fn formatted(&self) -> BTreeMap<Section, String> {
        Section::ALL
            .iter()
            .map(|&section| (section, format!("{:.4}", self.get(section))))
            .collect()
    }

    /// The displayed value parsed back, used for explanation comparisons.
    fn rounded(&self, section: Section) -> f64 {
        let value = self.get(section);
        format!("{value:.4}").parse().unwrap_or(value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Winner {
    #[serde(rename = "Resume A")]
    ResumeA,
    #[serde(rename = "Resume B")]
    ResumeB,
    #[serde(rename = "Both are equally suited")]
    Tie,
}

impl fmt::Display for Winner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Winner::ResumeA => "Resume A",
            Winner::ResumeB => "Resume B",
            Winner::Tie => "Both are equally suited",
        })
    }
}

/// Per-candidate section similarities, formatted for display.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CandidateAnalysis {
    #[serde(rename = "Resume A")]
    pub resume_a: BTreeMap<Section, String>,
    #[serde(rename = "Resume B")]
    pub resume_b: BTreeMap<Section, String>,
}

/// Everything the presentation layer gets back from one comparison.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonResult {
    pub score_a: f64,
    pub score_b: f64,
    pub winner: Winner,
    pub analysis: CandidateAnalysis,
    pub explanation: Vec<String>,
}

pub struct Comparator {
    embedder: Arc<dyn Embedder>,
    weights: WeightConfig,
}

impl Comparator {
    pub fn new(embedder: Arc<dyn Embedder>, weights: WeightConfig) -> Self {
        Self { embedder, weights }
    }

    /// Compares two raw résumé texts against a raw job description.
    ///
    /// Inputs are not checked for emptiness; an all-empty résumé simply
    /// scores 0.0. Only embedding-service failures are returned as errors.
    pub async fn compare(
        &self,
        job_description: &str,
        resume_a: &str,
        resume_b: &str,
    ) -> Result<ComparisonResult, EmbeddingError> {
        let span = info_span!(
            "compare",
            comparison_id = %Uuid::new_v4(),
            embedder = self.embedder.name()
        );

        async move {
            let job_description = normalize(job_description);
            let sections_a = extract_sections(&normalize(resume_a));
            let sections_b = extract_sections(&normalize(resume_b));
            for (label, sections) in [("Resume A", &sections_a), ("Resume B", &sections_b)] {
                if sections.is_empty() {
                    debug!("{label} has no recognizable sections; it will score 0.0");
                }
            }

            let job_embedding = self.embedder.embed(&job_description).await?;

            let sim_a = self.score_sections(&job_embedding, &sections_a).await?;
            let sim_b = self.score_sections(&job_embedding, &sections_b).await?;
            debug!(?sim_a, ?sim_b, "Section similarities");

            let score_a = self.weights.weighted_score(&sim_a);
            let score_b = self.weights.weighted_score(&sim_b);
            let winner = decide_winner(score_a, score_b);
            info!(score_a, score_b, %winner, "Comparison complete");

            Ok(ComparisonResult {
                score_a,
                score_b,
                winner,
                analysis: CandidateAnalysis {
                    resume_a: sim_a.formatted(),
                    resume_b: sim_b.formatted(),
                },
                explanation: build_explanation(winner, &sim_a, &sim_b, &self.weights),
            })
        }
        .instrument(span)
        .await
    }

    /// Embeds each non-empty section in turn. Calls are sequential.
    async fn score_sections(
        &self,
        job_embedding: &[f32],
        sections: &SectionedText,
    ) -> Result<SimilarityVector, EmbeddingError> {
        let mut similarities = SimilarityVector::default();
        for section in Section::ALL {
            let text = sections.get(section);
            if text.is_empty() {
                continue;
            }
            let embedding = self.embedder.embed(text).await?;
            similarities.set(section, cosine_similarity(job_embedding, &embedding) as f64);
        }
        Ok(similarities)
    }
}

/// Strict comparison, no epsilon: only bit-equal scores tie.
fn decide_winner(score_a: f64, score_b: f64) -> Winner {
    if score_a > score_b {
        Winner::ResumeA
    } else if score_b > score_a {
        Winner::ResumeB
    } else {
        Winner::Tie
    }
}

fn build_explanation(
    winner: Winner,
    sim_a: &SimilarityVector,
    sim_b: &SimilarityVector,
    weights: &WeightConfig,
) -> Vec<String> {
    let (best, other) = match winner {
        Winner::ResumeA => (sim_a, sim_b),
        Winner::ResumeB => (sim_b, sim_a),
        Winner::Tie => {
            return vec![
                "- Both resumes have equal overall scores, suggesting similar suitability for the role."
                    .to_string(),
            ];
        }
    };

    let mut lines = vec![format!(
        "- {winner} has a higher overall score, indicating stronger relevance to the job description."
    )];

    for section in Section::EXPLANATION_ORDER {
        if best.rounded(section) > other.rounded(section) {
            lines.push(section_line(section, weights));
        }
    }

    lines
}

fn section_line(section: Section, weights: &WeightConfig) -> String {
    let pct = weights.percent(section);
    match section {
        Section::Experience if weights.is_heaviest(section) => format!(
            "- Stronger match in the Experience section, which carries the most weight ({pct}%)."
        ),
        Section::Experience => {
            format!("- Stronger match in the Experience section, which carries {pct}% of the weight.")
        }
        Section::Skills => {
            format!("- Better alignment of Skills ({pct}% weight) with the job requirements.")
        }
        Section::Education => format!("- More relevant Education background ({pct}% weight)."),
    }
}
