use crate::chunking::{split_page, ChunkingConfig};
use crate::embeddings::Embedder;
use crate::error::{IndexingError, QueryError, RetrievalError};
use crate::extractor::{LopdfExtractor, PdfExtractor};
use crate::generator::AnswerGenerator;
use crate::ingest::{document_record, stage_upload};
use crate::models::{
    ConversationTurn, EmbeddedSegment, IndexReport, QueryResult, UploadedDocument,
};
use crate::prompt::{build_user_prompt, SYSTEM_PROMPT};
use crate::store::VectorStore;
use std::fs;
use std::path::PathBuf;
use tracing::{debug, info};
use uuid::Uuid;

/// Default retrieval depth, matching the default retriever of the vector
/// store the workflow was designed around.
pub const DEFAULT_TOP_K: usize = 4;

/// One user's interactive run. Owns at most one vector index and exactly one
/// chat history; both are dropped with the session. All operations are
/// strictly sequential.
pub struct Session<E, G> {
    id: Uuid,
    staging_dir: PathBuf,
    chunking: ChunkingConfig,
    top_k: usize,
    embedder: E,
    generator: G,
    extractor: Box<dyn PdfExtractor + Send + Sync>,
    index: Option<VectorStore>,
    history: Vec<ConversationTurn>,
}

impl<E, G> Session<E, G>
where
    E: Embedder,
    G: AnswerGenerator,
{
    pub fn new(embedder: E, generator: G, staging_dir: impl Into<PathBuf>) -> Self {
        Self {
            id: Uuid::new_v4(),
            staging_dir: staging_dir.into(),
            chunking: ChunkingConfig::default(),
            top_k: DEFAULT_TOP_K,
            embedder,
            generator,
            extractor: Box::new(LopdfExtractor),
            index: None,
            history: Vec::new(),
        }
    }

    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k.max(1);
        self
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn has_index(&self) -> bool {
        self.index.is_some()
    }

    pub fn segment_count(&self) -> usize {
        self.index.as_ref().map_or(0, VectorStore::len)
    }

    pub fn history(&self) -> &[ConversationTurn] {
        &self.history
    }

    /// Stage, parse, chunk, and embed the uploaded documents, then replace
    /// the session's index with a freshly built store.
    ///
    /// An empty upload set is a no-op that leaves any prior index in place.
    /// A parse failure of any document fails the whole operation; the prior
    /// index and the chat history stay untouched on every failure path.
    pub async fn index_documents(
        &mut self,
        uploads: &[UploadedDocument],
    ) -> Result<IndexReport, IndexingError> {
        if uploads.is_empty() {
            debug!(session = %self.id, "no documents supplied, skipping indexing");
            return Ok(IndexReport::default());
        }

        self.chunking.validate()?;
        fs::create_dir_all(&self.staging_dir)?;

        let mut records = Vec::with_capacity(uploads.len());
        let mut segments = Vec::new();

        for upload in uploads {
            let staged = stage_upload(&self.staging_dir, upload)?;
            let pages = self.extractor.extract_pages(&staged)?;

            // A document with zero extractable text contributes zero
            // segments without failing the run.
            for page in &pages {
                segments.extend(split_page(page, self.chunking));
            }

            records.push(document_record(&staged, &upload.file_name, pages.len())?);
        }

        let texts: Vec<String> = segments
            .iter()
            .map(|segment| segment.text.clone())
            .collect();
        let vectors = self.embedder.embed_batch(&texts).await?;

        let embedded: Vec<EmbeddedSegment> = segments
            .into_iter()
            .zip(vectors)
            .map(|(segment, vector)| EmbeddedSegment { segment, vector })
            .collect();

        let store = VectorStore::new(embedded, self.embedder.dimensions())?;
        let segment_count = store.len();
        self.index = Some(store);

        info!(
            session = %self.id,
            documents = records.len(),
            segments = segment_count,
            "index built"
        );

        Ok(IndexReport {
            documents: records,
            segment_count,
        })
    }

    /// Answer one question against the current index. The history sent to
    /// the generator is the history as recorded before this question; the
    /// question and answer are appended only after generation succeeds.
    pub async fn ask(&mut self, question: &str) -> Result<QueryResult, QueryError> {
        let question = question.trim();
        if question.is_empty() {
            return Err(RetrievalError::EmptyQuery.into());
        }

        let index = self.index.as_ref().ok_or(RetrievalError::NoIndex)?;

        let query_vector = self
            .embedder
            .embed(question)
            .await
            .map_err(RetrievalError::Embedding)?;
        let hits = index.search(&query_vector, self.top_k)?;

        let user_prompt = build_user_prompt(&hits, question);
        let answer = self
            .generator
            .generate(SYSTEM_PROMPT, &self.history, &user_prompt)
            .await?;

        self.history.push(ConversationTurn::user(question));
        self.history.push(ConversationTurn::assistant(&answer));

        debug!(
            session = %self.id,
            retrieved = hits.len(),
            turns = self.history.len(),
            "question answered"
        );

        Ok(QueryResult {
            answer,
            sources: hits.into_iter().map(|hit| hit.segment).collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embeddings::HashEmbedder;
    use crate::error::GenerationError;
    use crate::models::{PageNumber, PageRecord, Speaker};
    use crate::prompt::REFUSAL_ANSWER;
    use crate::sources::format_sources;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct FakeGenerator {
        answer: Result<String, ()>,
        calls: Arc<AtomicUsize>,
    }

    impl FakeGenerator {
        fn answering(answer: &str) -> Self {
            Self {
                answer: Ok(answer.to_string()),
                calls: Arc::new(AtomicUsize::new(0)),
            }
        }

        fn failing() -> Self {
            Self {
                answer: Err(()),
                calls: Arc::new(AtomicUsize::new(0)),
            }
        }
    }

    #[async_trait]
    impl AnswerGenerator for FakeGenerator {
        async fn generate(
            &self,
            _system_prompt: &str,
            _history: &[ConversationTurn],
            _user_prompt: &str,
        ) -> Result<String, GenerationError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.answer
                .clone()
                .map_err(|()| GenerationError::BackendResponse("boom".to_string()))
        }
    }

    async fn session_with_pages(
        generator: FakeGenerator,
        pages: &[PageRecord],
    ) -> Session<HashEmbedder, FakeGenerator> {
        let embedder = HashEmbedder::default();
        let mut session = Session::new(embedder, generator, "data/uploads");

        let mut segments = Vec::new();
        for page in pages {
            segments.extend(split_page(page, session.chunking));
        }

        let texts: Vec<String> = segments
            .iter()
            .map(|segment| segment.text.clone())
            .collect();
        let vectors = session.embedder.embed_batch(&texts).await.unwrap();
        let embedded = segments
            .into_iter()
            .zip(vectors)
            .map(|(segment, vector)| EmbeddedSegment { segment, vector })
            .collect();

        session.index =
            Some(VectorStore::new(embedded, session.embedder.dimensions()).unwrap());
        session
    }

    fn vacation_page() -> PageRecord {
        PageRecord {
            text: "Vacation policy: 15 days per year.".to_string(),
            page: PageNumber::Known(0),
            source_file: "policy.pdf".to_string(),
        }
    }

    #[tokio::test]
    async fn asking_without_an_index_never_calls_the_generator() {
        let generator = FakeGenerator::answering("should not run");
        let calls = generator.calls.clone();
        let mut session = Session::new(HashEmbedder::default(), generator, "data/uploads");

        let result = session.ask("How many vacation days?").await;
        assert!(matches!(
            result,
            Err(QueryError::Retrieval(RetrievalError::NoIndex))
        ));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert!(session.history().is_empty());
    }

    #[tokio::test]
    async fn empty_question_is_rejected() {
        let mut session =
            session_with_pages(FakeGenerator::answering("x"), &[vacation_page()]).await;
        assert!(matches!(
            session.ask("   ").await,
            Err(QueryError::Retrieval(RetrievalError::EmptyQuery))
        ));
    }

    #[tokio::test]
    async fn answer_carries_the_source_page_label() {
        let mut session = session_with_pages(
            FakeGenerator::answering("You get 15 days per year."),
            &[vacation_page()],
        )
        .await;

        let result = session.ask("How many vacation days?").await.unwrap();
        assert!(result.answer.contains("15 days"));
        assert_eq!(
            format_sources(&result.sources),
            vec!["policy.pdf - Page 1".to_string()]
        );
    }

    #[tokio::test]
    async fn refusal_sentence_passes_through_exactly() {
        let mut session = session_with_pages(
            FakeGenerator::answering(REFUSAL_ANSWER),
            &[vacation_page()],
        )
        .await;

        let result = session.ask("What is the dress code on Mars?").await.unwrap();
        assert_eq!(result.answer, REFUSAL_ANSWER);
    }

    #[tokio::test]
    async fn history_alternates_user_then_assistant() {
        let mut session = session_with_pages(
            FakeGenerator::answering("15 days per year."),
            &[vacation_page()],
        )
        .await;

        session.ask("How many vacation days?").await.unwrap();
        session.ask("Do they roll over?").await.unwrap();
        session.ask("Who approves them?").await.unwrap();

        let history = session.history();
        assert_eq!(history.len(), 6);
        for (index, turn) in history.iter().enumerate() {
            let expected = if index % 2 == 0 {
                Speaker::User
            } else {
                Speaker::Assistant
            };
            assert_eq!(turn.speaker, expected);
        }
        assert_eq!(history[0].message, "How many vacation days?");
    }

    #[tokio::test]
    async fn failed_generation_appends_no_turns() {
        let mut session =
            session_with_pages(FakeGenerator::failing(), &[vacation_page()]).await;

        let result = session.ask("How many vacation days?").await;
        assert!(matches!(result, Err(QueryError::Generation(_))));
        assert!(session.history().is_empty());
    }

    #[tokio::test]
    async fn empty_upload_set_is_a_noop() {
        let mut session = Session::new(
            HashEmbedder::default(),
            FakeGenerator::answering("x"),
            "data/uploads",
        );

        let report = session.index_documents(&[]).await.unwrap();
        assert_eq!(report.segment_count, 0);
        assert!(report.documents.is_empty());
        assert!(!session.has_index());
    }

    #[tokio::test]
    async fn failed_indexing_leaves_the_prior_index_in_place() {
        let mut session =
            session_with_pages(FakeGenerator::answering("x"), &[vacation_page()]).await;
        let staging = tempfile::tempdir().unwrap();
        session.staging_dir = staging.path().to_path_buf();

        let broken = UploadedDocument::new("broken.pdf", b"%PDF-1.4\n%nope".to_vec());
        let result = session.index_documents(&[broken]).await;

        assert!(matches!(result, Err(IndexingError::PdfParse { .. })));
        assert!(session.has_index());
        assert_eq!(session.segment_count(), 1);
    }

    #[tokio::test]
    async fn retrieval_prefers_the_matching_page() {
        let pages = vec![
            vacation_page(),
            PageRecord {
                text: "Expense reports are due within thirty days of travel.".to_string(),
                page: PageNumber::Known(1),
                source_file: "policy.pdf".to_string(),
            },
        ];
        let mut session = session_with_pages(FakeGenerator::answering("15 days."), &pages).await;
        session.top_k = 1;

        let result = session.ask("How many vacation days per year?").await.unwrap();
        assert_eq!(result.sources.len(), 1);
        assert_eq!(result.sources[0].page, PageNumber::Known(0));
    }
}
