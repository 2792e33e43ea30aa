use thiserror::Error;

/// Errors encountered while loading configuration from environment variables.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing environment variable: {0}")]
    MissingVariable(String),

    #[error("invalid value for environment variable {0}: {1}")]
    InvalidValue(String, String),
}

/// Errors raised by embedding backends.
#[derive(Debug, Error)]
pub enum EmbeddingError {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("url parse error: {0}")]
    Url(#[from] url::ParseError),

    #[error("invalid response from embedding service: {0}")]
    BackendResponse(String),
}

/// Errors raised while building a document index.
#[derive(Debug, Error)]
pub enum IndexingError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("pdf parse error in {file}: {details}")]
    PdfParse { file: String, details: String },

    #[error("path has no file name: {0}")]
    MissingFileName(String),

    #[error("invalid chunking config: {0}")]
    InvalidChunkConfig(String),

    #[error("embedding dimension {actual} does not match expected {expected}")]
    EmbeddingDimension { expected: usize, actual: usize },

    #[error("embedding failed: {0}")]
    Embedding(#[from] EmbeddingError),
}

/// Errors raised while retrieving context segments for a question.
#[derive(Debug, Error)]
pub enum RetrievalError {
    #[error("question is empty")]
    EmptyQuery,

    #[error("no document index has been built yet")]
    NoIndex,

    #[error("document index holds no segments")]
    EmptyIndex,

    #[error("query vector dimension {actual} does not match index dimension {expected}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("embedding failed: {0}")]
    Embedding(#[from] EmbeddingError),
}

/// Errors raised by the answer-generation backend.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("url parse error: {0}")]
    Url(#[from] url::ParseError),

    #[error("answer service rejected the credential: {0}")]
    Auth(String),

    #[error("answer service rate limit hit: {0}")]
    RateLimited(String),

    #[error("invalid response from answer service: {0}")]
    BackendResponse(String),
}

/// Failure of a single question/answer interaction.
#[derive(Debug, Error)]
pub enum QueryError {
    #[error(transparent)]
    Retrieval(#[from] RetrievalError),

    #[error(transparent)]
    Generation(#[from] GenerationError),
}

pub type Result<T, E = IndexingError> = std::result::Result<T, E>;
