use crate::models::ScoredSegment;

/// Fixed sentence the assistant must emit when the retrieved context does
/// not cover the question.
pub const REFUSAL_ANSWER: &str = "The policy document does not contain this information.";

/// Strict instruction block sent as the system message of every generation
/// call.
pub const SYSTEM_PROMPT: &str = "You are a policy assistant AI.\n\n\
Rules:\n\
1. Answer ONLY from the provided context.\n\
2. If the answer is not in the context, say:\n   \
\"The policy document does not contain this information.\"\n\
3. Do not make assumptions.\n\
4. Be clear and professional.\n\
5. Mention page number if available.";

/// Render the retrieved segments and the question into the user message.
/// Each segment is labeled with its source file and displayed page number so
/// the model can cite them.
pub fn build_user_prompt(hits: &[ScoredSegment], question: &str) -> String {
    let context = if hits.is_empty() {
        "(no matching policy text)".to_string()
    } else {
        hits.iter()
            .map(|hit| {
                format!(
                    "[{} - Page {}]\n{}",
                    hit.segment.source_basename(),
                    hit.segment.page,
                    hit.segment.text.trim()
                )
            })
            .collect::<Vec<_>>()
            .join("\n\n")
    };

    format!("Context:\n{context}\n\nQuestion:\n{question}\n\nAnswer:")
}
