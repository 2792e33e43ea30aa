pub mod chunking;
pub mod config;
pub mod embeddings;
pub mod error;
pub mod extractor;
pub mod generator;
pub mod ingest;
pub mod models;
pub mod prompt;
pub mod session;
pub mod sources;
pub mod store;

pub use chunking::{split_page, split_text, ChunkingConfig, DEFAULT_CHUNK_CHARS, DEFAULT_OVERLAP_CHARS};
pub use config::Config;
pub use embeddings::{Embedder, HashEmbedder, HttpEmbedder, DEFAULT_EMBEDDING_DIMENSIONS};
pub use error::{
    ConfigError, EmbeddingError, GenerationError, IndexingError, QueryError, RetrievalError,
};
pub use extractor::{LopdfExtractor, PdfExtractor};
pub use generator::{
    AnswerGenerator, GroqGenerator, DEFAULT_MODEL, DEFAULT_TEMPERATURE, GROQ_CHAT_ENDPOINT,
};
pub use ingest::{discover_pdf_files, read_uploads, stage_upload};
pub use models::{
    ConversationTurn, DocumentRecord, EmbeddedSegment, IndexReport, PageNumber, PageRecord,
    QueryResult, ScoredSegment, Segment, Speaker, UploadedDocument,
};
pub use prompt::{build_user_prompt, REFUSAL_ANSWER, SYSTEM_PROMPT};
pub use session::{Session, DEFAULT_TOP_K};
pub use sources::format_sources;
pub use store::VectorStore;
