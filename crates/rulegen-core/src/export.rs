//! Writing generated documents to a directory, a zip archive, or stdout

use crate::generate::Document;
use anyhow::{Context, Result};
use std::collections::HashMap;
use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};
use tokio::fs;
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

/// Reject names that would escape the output directory
fn checked_file_name(document: &Document) -> Result<&str> {
    let name = document.file_name.as_str();
    let has_separator = name.contains(|c: char| c == '/' || c == '\\');
    if name.is_empty() || name == "." || name == ".." || has_separator {
        anyhow::bail!("Refusing to write document with file name '{}'", name);
    }
    Ok(name)
}

/// Fail when two documents would land on the same file
fn ensure_unique_file_names(documents: &[Document]) -> Result<()> {
    let mut labels: HashMap<&str, &str> = HashMap::new();
    for document in documents {
        if let Some(first) = labels.insert(document.file_name.as_str(), document.label.as_str()) {
            anyhow::bail!(
                "Documents '{}' and '{}' share the file name '{}'",
                first,
                document.label,
                document.file_name
            );
        }
    }
    Ok(())
}

/// Write each document to `<target_dir>/<file_name>`, returning the written paths
pub async fn write_documents(documents: &[Document], target_dir: &Path) -> Result<Vec<PathBuf>> {
    ensure_unique_file_names(documents)?;

    // Ensure target directory exists
    fs::create_dir_all(target_dir)
        .await
        .with_context(|| format!("Failed to create directory: {}", target_dir.display()))?;

    let mut written = Vec::with_capacity(documents.len());
    for document in documents {
        let target_path = target_dir.join(checked_file_name(document)?);
        fs::write(&target_path, &document.markdown)
            .await
            .with_context(|| format!("Failed to write file: {}", target_path.display()))?;
        written.push(target_path);
    }

    Ok(written)
}

/// Bundle all documents into an in-memory zip archive
pub fn build_zip(documents: &[Document]) -> Result<Vec<u8>> {
    ensure_unique_file_names(documents)?;

    let mut zip_buffer = Vec::new();
    {
        let mut zip = ZipWriter::new(Cursor::new(&mut zip_buffer));
        let options =
            SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);

        for document in documents {
            zip.start_file(checked_file_name(document)?, options)?;
            zip.write_all(document.markdown.as_bytes())?;
        }

        zip.finish()?;
    }

    Ok(zip_buffer)
}

/// Write the zip archive to `path`, returning its size in bytes
pub async fn write_zip(documents: &[Document], path: &Path) -> Result<usize> {
    let zip_bytes = build_zip(documents)?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .await
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }
    fs::write(path, &zip_bytes)
        .await
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(zip_bytes.len())
}

/// Concatenate documents for terminal output; multiple documents get a file banner each
pub fn render_markdown(documents: &[Document]) -> String {
    if let [only] = documents {
        return only.markdown.clone();
    }

    let mut out = String::new();
    for document in documents {
        out.push_str(&format!(
            "<!-- {} ({}) -->\n\n",
            document.file_name, document.label
        ));
        out.push_str(&document.markdown);
    }
    out
}

/// Documents as a pretty-printed JSON array of `{ markdown, label, fileName }`
pub fn render_json(documents: &[Document]) -> Result<String> {
    serde_json::to_string_pretty(documents).context("Failed to serialize documents")
}
