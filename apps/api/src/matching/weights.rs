#[cfg(test)]
use thiserror::Error;

use crate::matching::comparator::SimilarityVector;
use crate::matching::normalizer::Section;

#[cfg(test)]
const SUM_TOLERANCE: f64 = 1e-9;

/// Rejections for hand-built weight tables.
#[cfg(test)]
#[derive(Debug, Error, PartialEq)]
pub enum WeightError {
    #[error("Weight for {section:?} must be within [0, 1], got {weight}")]
    OutOfRange { section: Section, weight: f64 },

    #[error("Section weights must sum to 1.0, got {0}")]
    BadSum(f64),
}

/// Per-section importance weights. Immutable once built; always sums to 1.0.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeightConfig {
    experience: f64,
    skills: f64,
    education: f64,
}

impl Default for WeightConfig {
    fn default() -> Self {
        Self {
            experience: 0.5,
            skills: 0.3,
            education: 0.2,
        }
    }
}

impl WeightConfig {
    pub fn weight(&self, section: Section) -> f64 {
        match section {
            Section::Experience => self.experience,
            Section::Education => self.education,
            Section::Skills => self.skills,
        }
    }

    /// Weight as a whole percentage, for explanation text.
    pub fn percent(&self, section: Section) -> u32 {
        (self.weight(section) * 100.0).round() as u32
    }

    /// True when no other section carries more weight than `section`.
    pub fn is_heaviest(&self, section: Section) -> bool {
        let weight = self.weight(section);
        Section::ALL.iter().all(|&other| self.weight(other) <= weight)
    }

    /// Σ similarity × weight, summed in `Section::ALL` order.
    pub fn weighted_score(&self, similarities: &SimilarityVector) -> f64 {
        Section::ALL
            .iter()
            .map(|&section| similarities.get(section) * self.weight(section))
            .sum()
    }
}

/// Non-default tables exist only to exercise the explanation wording.
#[cfg(test)]
impl WeightConfig {
    pub fn new(experience: f64, skills: f64, education: f64) -> Result<Self, WeightError> {
        let config = Self {
            experience,
            skills,
            education,
        };
        for section in Section::ALL {
            let weight = config.weight(section);
            if !(0.0..=1.0).contains(&weight) {
                return Err(WeightError::OutOfRange { section, weight });
            }
        }
        let sum = experience + skills + education;
        if (sum - 1.0).abs() > SUM_TOLERANCE {
            return Err(WeightError::BadSum(sum));
        }
        Ok(config)
    }
}
