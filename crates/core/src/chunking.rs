use crate::error::IndexingError;
use crate::models::{PageRecord, Segment};

pub const DEFAULT_CHUNK_CHARS: usize = 1_000;
pub const DEFAULT_OVERLAP_CHARS: usize = 200;

#[derive(Debug, Clone, Copy)]
pub struct ChunkingConfig {
    pub max_chars: usize,
    pub overlap_chars: usize,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            max_chars: DEFAULT_CHUNK_CHARS,
            overlap_chars: DEFAULT_OVERLAP_CHARS,
        }
    }
}

impl ChunkingConfig {
    pub fn validate(&self) -> Result<(), IndexingError> {
        if self.max_chars == 0 {
            return Err(IndexingError::InvalidChunkConfig(
                "max_chars must be greater than zero".to_string(),
            ));
        }

        if self.overlap_chars >= self.max_chars {
            return Err(IndexingError::InvalidChunkConfig(format!(
                "overlap {} must be smaller than window {}",
                self.overlap_chars, self.max_chars
            )));
        }

        Ok(())
    }
}

/// Split text into overlapping fixed-size character windows. Adjacent
/// windows share exactly `overlap_chars` characters; re-running on the same
/// input yields byte-identical output.
pub fn split_text(text: &str, config: ChunkingConfig) -> Vec<String> {
    if text.trim().is_empty() {
        return Vec::new();
    }

    let chars: Vec<char> = text.chars().collect();
    if chars.len() <= config.max_chars {
        return vec![text.to_string()];
    }

    let stride = config
        .max_chars
        .saturating_sub(config.overlap_chars)
        .max(1);
    let mut segments = Vec::new();
    let mut start = 0;

    while start < chars.len() {
        let end = (start + config.max_chars).min(chars.len());
        segments.push(chars[start..end].iter().collect());
        if end == chars.len() {
            break;
        }
        start += stride;
    }

    segments
}

/// Chunk one page, carrying the page's metadata onto every segment.
pub fn split_page(page: &PageRecord, config: ChunkingConfig) -> Vec<Segment> {
    split_text(&page.text, config)
        .into_iter()
        .map(|text| Segment {
            text,
            page: page.page,
            source_file: page.source_file.clone(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PageNumber;

    fn config(max_chars: usize, overlap_chars: usize) -> ChunkingConfig {
        ChunkingConfig {
            max_chars,
            overlap_chars,
        }
    }

    #[test]
    fn short_text_is_a_single_segment() {
        let segments = split_text("short policy paragraph", config(1_000, 200));
        assert_eq!(segments, vec!["short policy paragraph".to_string()]);
    }

    #[test]
    fn whitespace_only_text_produces_no_segments() {
        assert!(split_text("   \n\t ", config(1_000, 200)).is_empty());
        assert!(split_text("", config(1_000, 200)).is_empty());
    }

    #[test]
    fn adjacent_segments_share_the_overlap() {
        let text: String = ('a'..='z').cycle().take(2_500).collect();
        let cfg = config(1_000, 200);
        let segments = split_text(&text, cfg);

        assert!(segments.len() > 1);
        for pair in segments.windows(2) {
            let earlier: Vec<char> = pair[0].chars().collect();
            let later: Vec<char> = pair[1].chars().collect();
            let tail: String = earlier[earlier.len() - cfg.overlap_chars..].iter().collect();
            let head: String = later[..cfg.overlap_chars].iter().collect();
            assert_eq!(tail, head);
        }
    }

    #[test]
    fn chunking_is_idempotent() {
        let text: String = "Vacation accrual resets every January. ".repeat(80);
        let cfg = config(1_000, 200);
        assert_eq!(split_text(&text, cfg), split_text(&text, cfg));
    }

    #[test]
    fn every_window_is_bounded() {
        let text: String = "x".repeat(5_000);
        for segment in split_text(&text, config(1_000, 200)) {
            assert!(segment.chars().count() <= 1_000);
        }
    }

    #[test]
    fn segments_inherit_page_metadata() {
        let page = PageRecord {
            text: "Sick leave requires a doctor's note after three days.".to_string(),
            page: PageNumber::Known(2),
            source_file: "handbook.pdf".to_string(),
        };

        let segments = split_page(&page, ChunkingConfig::default());
        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].page, PageNumber::Known(2));
        assert_eq!(segments[0].source_file, "handbook.pdf");
    }

    #[test]
    fn zero_window_is_rejected() {
        assert!(config(0, 0).validate().is_err());
        assert!(config(100, 100).validate().is_err());
        assert!(config(1_000, 200).validate().is_ok());
    }
}
