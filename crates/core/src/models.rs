use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// A named PDF blob handed over by the user. Lives only for the duration of
/// one indexing operation.
#[derive(Debug, Clone)]
pub struct UploadedDocument {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl UploadedDocument {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes,
        }
    }
}

/// Page position inside a source document. `Known` values are 0-indexed raw
/// metadata; display is 1-indexed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PageNumber {
    Known(u32),
    Unknown,
}

impl fmt::Display for PageNumber {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PageNumber::Known(page) => write!(formatter, "{}", page + 1),
            PageNumber::Unknown => write!(formatter, "Unknown"),
        }
    }
}

/// One physical page of extracted text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageRecord {
    pub text: String,
    pub page: PageNumber,
    pub source_file: String,
}

/// A bounded slice of page text used as a retrieval unit. Segments from one
/// page share that page's metadata.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Segment {
    pub text: String,
    pub page: PageNumber,
    pub source_file: String,
}

impl Segment {
    /// File name component of the originating document, used for display.
    pub fn source_basename(&self) -> &str {
        Path::new(&self.source_file)
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or(&self.source_file)
    }
}

/// A segment plus its embedding vector. Created once at index build, never
/// mutated afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddedSegment {
    pub segment: Segment,
    pub vector: Vec<f32>,
}

/// A retrieval hit with its similarity score.
#[derive(Debug, Clone)]
pub struct ScoredSegment {
    pub segment: Segment,
    pub score: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Speaker {
    User,
    Assistant,
}

impl Speaker {
    /// Role string used by chat-completion APIs.
    pub fn role(self) -> &'static str {
        match self {
            Speaker::User => "user",
            Speaker::Assistant => "assistant",
        }
    }
}

/// One entry of the chat transcript, appended in strict chronological order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationTurn {
    pub speaker: Speaker,
    pub message: String,
}

impl ConversationTurn {
    pub fn user(message: impl Into<String>) -> Self {
        Self {
            speaker: Speaker::User,
            message: message.into(),
        }
    }

    pub fn assistant(message: impl Into<String>) -> Self {
        Self {
            speaker: Speaker::Assistant,
            message: message.into(),
        }
    }
}

/// Answer plus the exact retrieved segments, in retrieval-rank order.
#[derive(Debug, Clone)]
pub struct QueryResult {
    pub answer: String,
    pub sources: Vec<Segment>,
}

/// Provenance record for one indexed document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentRecord {
    pub document_id: String,
    pub file_name: String,
    pub staged_path: String,
    pub checksum: String,
    pub page_count: usize,
    pub ingested_at: DateTime<Utc>,
}

/// Summary of one indexing run.
#[derive(Debug, Clone, Default)]
pub struct IndexReport {
    pub documents: Vec<DocumentRecord>,
    pub segment_count: usize,
}
