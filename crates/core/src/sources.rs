use crate::models::Segment;
use std::collections::HashSet;

/// Format segments into display labels `"<basename> - Page <N>"`,
/// deduplicated by the (basename, displayed page) pair while preserving
/// first-occurrence order.
pub fn format_sources(segments: &[Segment]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut labels = Vec::new();

    for segment in segments {
        let label = format!("{} - Page {}", segment.source_basename(), segment.page);
        if seen.insert(label.clone()) {
            labels.push(label);
        }
    }

    labels
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PageNumber;

    fn segment(text: &str, source_file: &str, page: PageNumber) -> Segment {
        Segment {
            text: text.to_string(),
            page,
            source_file: source_file.to_string(),
        }
    }

    #[test]
    fn labels_are_one_indexed_and_use_the_basename() {
        let labels = format_sources(&[segment(
            "a",
            "data/uploads/handbook.pdf",
            PageNumber::Known(0),
        )]);
        assert_eq!(labels, vec!["handbook.pdf - Page 1".to_string()]);
    }

    #[test]
    fn duplicate_file_page_pairs_collapse_preserving_order() {
        let labels = format_sources(&[
            segment("a", "handbook.pdf", PageNumber::Known(2)),
            segment("b", "handbook.pdf", PageNumber::Known(0)),
            segment("c", "handbook.pdf", PageNumber::Known(2)),
            segment("d", "travel.pdf", PageNumber::Known(2)),
        ]);

        assert_eq!(
            labels,
            vec![
                "handbook.pdf - Page 3".to_string(),
                "handbook.pdf - Page 1".to_string(),
                "travel.pdf - Page 3".to_string(),
            ]
        );
    }

    #[test]
    fn unknown_pages_render_verbatim() {
        let labels = format_sources(&[segment("a", "scan.pdf", PageNumber::Unknown)]);
        assert_eq!(labels, vec!["scan.pdf - Page Unknown".to_string()]);
    }

    #[test]
    fn same_basename_in_different_directories_collapses() {
        // Display labels only carry the basename, so both entries render
        // identically and the second is dropped.
        let labels = format_sources(&[
            segment("a", "2023/handbook.pdf", PageNumber::Known(0)),
            segment("b", "2024/handbook.pdf", PageNumber::Known(0)),
        ]);
        assert_eq!(labels.len(), 1);
    }
}
