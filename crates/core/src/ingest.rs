use crate::error::IndexingError;
use crate::models::{DocumentRecord, UploadedDocument};
use chrono::Utc;
use sha2::{Digest, Sha256};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Recursively collect PDF files under a folder, sorted for stable order.
pub fn discover_pdf_files(folder: &Path) -> Vec<PathBuf> {
    let mut files = Vec::new();

    for entry in WalkDir::new(folder)
        .into_iter()
        .filter_map(|item| item.ok())
    {
        if !entry.file_type().is_file() {
            continue;
        }

        let is_pdf = entry
            .path()
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"));

        if is_pdf {
            files.push(entry.path().to_path_buf());
        }
    }

    files.sort_unstable();
    files
}

/// Read the given paths into uploaded documents. Directories are expanded
/// to the PDF files they contain.
pub fn read_uploads(paths: &[PathBuf]) -> Result<Vec<UploadedDocument>, IndexingError> {
    let mut files = Vec::new();
    for path in paths {
        if path.is_dir() {
            files.extend(discover_pdf_files(path));
        } else {
            files.push(path.clone());
        }
    }

    let mut uploads = Vec::new();
    for path in files {
        let file_name = path
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| IndexingError::MissingFileName(path.to_string_lossy().to_string()))?
            .to_string();

        uploads.push(UploadedDocument {
            file_name,
            bytes: fs::read(&path)?,
        });
    }

    Ok(uploads)
}

/// Write an uploaded blob into the staging directory under its basename.
/// Re-uploading a same-named file overwrites the staged copy; the staging
/// directory is a transient cache, not a durable store.
pub fn stage_upload(dir: &Path, upload: &UploadedDocument) -> Result<PathBuf, IndexingError> {
    let name = Path::new(&upload.file_name)
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| IndexingError::MissingFileName(upload.file_name.clone()))?;

    let target = dir.join(name);
    fs::write(&target, &upload.bytes)?;
    Ok(target)
}

pub fn digest_file(path: &Path) -> Result<String, IndexingError> {
    let bytes = fs::read(path)?;
    let mut hasher = Sha256::new();
    hasher.update(&bytes);
    Ok(format!("{:x}", hasher.finalize()))
}

/// Assemble the provenance record for one staged document.
pub fn document_record(
    staged_path: &Path,
    file_name: &str,
    page_count: usize,
) -> Result<DocumentRecord, IndexingError> {
    let checksum = digest_file(staged_path)?;

    Ok(DocumentRecord {
        document_id: derive_document_id(file_name, &checksum),
        file_name: file_name.to_string(),
        staged_path: staged_path.to_string_lossy().to_string(),
        checksum,
        page_count,
        ingested_at: Utc::now(),
    })
}

fn derive_document_id(file_name: &str, checksum: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(file_name.as_bytes());
    hasher.update(checksum.as_bytes());
    format!("{:x}", hasher.finalize())
}
