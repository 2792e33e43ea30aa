use crate::error::EmbeddingError;
use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};
use url::Url;

pub const DEFAULT_EMBEDDING_DIMENSIONS: usize = 384;

/// Interface implemented by embedding backends.
#[async_trait]
pub trait Embedder: Send + Sync {
    fn dimensions(&self) -> usize;

    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError>;

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        let mut vectors = Vec::with_capacity(texts.len());
        for text in texts {
            vectors.push(self.embed(text).await?);
        }
        Ok(vectors)
    }
}

#[async_trait]
impl Embedder for Box<dyn Embedder + Send + Sync> {
    fn dimensions(&self) -> usize {
        self.as_ref().dimensions()
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        self.as_ref().embed(text).await
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        self.as_ref().embed_batch(texts).await
    }
}

/// Deterministic local embedder hashing word unigrams and bigrams into a
/// fixed-size L2-normalized vector. Useful offline and in tests; similarity
/// is lexical rather than semantic.
#[derive(Debug, Clone, Copy)]
pub struct HashEmbedder {
    dimensions: usize,
}

impl Default for HashEmbedder {
    fn default() -> Self {
        Self {
            dimensions: DEFAULT_EMBEDDING_DIMENSIONS,
        }
    }
}

impl HashEmbedder {
    pub fn new(dimensions: usize) -> Self {
        Self {
            dimensions: dimensions.max(1),
        }
    }

    fn encode(&self, text: &str) -> Vec<f32> {
        let mut vector = vec![0f32; self.dimensions];
        let lowered = text.to_lowercase();
        let tokens: Vec<&str> = lowered
            .split(|character: char| !character.is_alphanumeric())
            .filter(|token| !token.is_empty())
            .collect();

        if tokens.is_empty() {
            return vector;
        }

        for token in &tokens {
            let bucket = (fnv1a(token.as_bytes()) % self.dimensions as u64) as usize;
            vector[bucket] += 1.0;
        }

        for pair in tokens.windows(2) {
            let joined = format!("{} {}", pair[0], pair[1]);
            let bucket = (fnv1a(joined.as_bytes()) % self.dimensions as u64) as usize;
            vector[bucket] += 0.5;
        }

        let magnitude = vector.iter().map(|value| value * value).sum::<f32>().sqrt();
        if magnitude > 0.0 {
            for value in &mut vector {
                *value /= magnitude;
            }
        }

        vector
    }
}

fn fnv1a(bytes: &[u8]) -> u64 {
    let mut hash = 0xcbf2_9ce4_8422_2325u64;
    for byte in bytes {
        hash ^= u64::from(*byte);
        hash = hash.wrapping_mul(0x0000_0100_0000_01b3);
    }
    hash
}

#[async_trait]
impl Embedder for HashEmbedder {
    fn dimensions(&self) -> usize {
        self.dimensions
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        Ok(self.encode(text))
    }
}

/// Remote embedding endpoint speaking the `{"inputs": [...]}` JSON contract.
pub struct HttpEmbedder {
    client: Client,
    endpoint: Url,
    dimensions: usize,
}

impl HttpEmbedder {
    pub fn new(endpoint: &str, dimensions: usize) -> Result<Self, EmbeddingError> {
        Ok(Self {
            client: Client::new(),
            endpoint: Url::parse(endpoint)?,
            dimensions,
        })
    }

    fn parse_rows(&self, payload: &Value) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        let rows = payload
            .as_array()
            .or_else(|| payload.pointer("/embeddings").and_then(Value::as_array))
            .ok_or_else(|| {
                EmbeddingError::BackendResponse("payload is not a list of vectors".to_string())
            })?;

        let mut vectors = Vec::with_capacity(rows.len());
        for row in rows {
            let values = row.as_array().ok_or_else(|| {
                EmbeddingError::BackendResponse("vector entry is not a list".to_string())
            })?;

            let vector = values
                .iter()
                .map(|value| value.as_f64().map(|number| number as f32))
                .collect::<Option<Vec<f32>>>()
                .ok_or_else(|| {
                    EmbeddingError::BackendResponse("vector entry is not numeric".to_string())
                })?;

            if vector.len() != self.dimensions {
                return Err(EmbeddingError::BackendResponse(format!(
                    "vector dimension {} is not {}",
                    vector.len(),
                    self.dimensions
                )));
            }

            vectors.push(vector);
        }

        Ok(vectors)
    }
}

#[async_trait]
impl Embedder for HttpEmbedder {
    fn dimensions(&self) -> usize {
        self.dimensions
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        let mut vectors = self.embed_batch(&[text.to_string()]).await?;
        vectors.pop().ok_or_else(|| {
            EmbeddingError::BackendResponse("service returned no vector".to_string())
        })
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let response = self
            .client
            .post(self.endpoint.clone())
            .json(&json!({ "inputs": texts }))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(EmbeddingError::BackendResponse(format!(
                "embedding service returned {}",
                response.status()
            )));
        }

        let payload: Value = response.json().await?;
        let vectors = self.parse_rows(&payload)?;

        if vectors.len() != texts.len() {
            return Err(EmbeddingError::BackendResponse(format!(
                "requested {} vectors, received {}",
                texts.len(),
                vectors.len()
            )));
        }

        Ok(vectors)
    }
}
