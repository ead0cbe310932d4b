// Résumé comparison: section extraction, per-section embedding similarity,
// weighted scoring and the winner explanation.
// All embedding calls go through the `Embedder` held by the comparator.

pub mod comparator;
pub mod handlers;
pub mod normalizer;
pub mod weights;
