use crate::error::{IndexingError, RetrievalError};
use crate::models::{EmbeddedSegment, ScoredSegment};

/// In-memory nearest-neighbor index over embedded segments. Built wholesale
/// during indexing and immutable afterwards; re-indexing replaces the whole
/// store.
#[derive(Debug, Clone)]
pub struct VectorStore {
    segments: Vec<EmbeddedSegment>,
    dimensions: usize,
}

impl VectorStore {
    pub fn new(segments: Vec<EmbeddedSegment>, dimensions: usize) -> Result<Self, IndexingError> {
        for embedded in &segments {
            if embedded.vector.len() != dimensions {
                return Err(IndexingError::EmbeddingDimension {
                    expected: dimensions,
                    actual: embedded.vector.len(),
                });
            }
        }

        Ok(Self {
            segments,
            dimensions,
        })
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn dimensions(&self) -> usize {
        self.dimensions
    }

    /// Return the `top_k` segments most similar to the query vector by
    /// cosine similarity, best first. Ties keep insertion order.
    pub fn search(
        &self,
        query_vector: &[f32],
        top_k: usize,
    ) -> Result<Vec<ScoredSegment>, RetrievalError> {
        if self.segments.is_empty() {
            return Err(RetrievalError::EmptyIndex);
        }

        if query_vector.len() != self.dimensions {
            return Err(RetrievalError::DimensionMismatch {
                expected: self.dimensions,
                actual: query_vector.len(),
            });
        }

        let mut scored: Vec<ScoredSegment> = self
            .segments
            .iter()
            .map(|embedded| ScoredSegment {
                segment: embedded.segment.clone(),
                score: cosine_similarity(&embedded.vector, query_vector),
            })
            .collect();

        scored.sort_by(|left, right| right.score.total_cmp(&left.score));
        scored.truncate(top_k);
        Ok(scored)
    }
}

fn cosine_similarity(left: &[f32], right: &[f32]) -> f32 {
    let dot: f32 = left.iter().zip(right).map(|(a, b)| a * b).sum();
    let left_norm: f32 = left.iter().map(|value| value * value).sum::<f32>().sqrt();
    let right_norm: f32 = right.iter().map(|value| value * value).sum::<f32>().sqrt();

    if left_norm == 0.0 || right_norm == 0.0 {
        return 0.0;
    }

    dot / (left_norm * right_norm)
}
