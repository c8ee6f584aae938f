use ammonia::Builder;
use epub::doc::EpubDoc;
use std::collections::HashSet;
use std::path::Path;

#[derive(Debug, thiserror::Error)]
pub enum EpubError {
    #[error("Failed to open EPUB: {0}")]
    Open(String),
}

pub struct ExtractedText {
    pub full_text: String,
    pub chapter_count: usize,
}

/// Build HTML cleaner - strip all tags, keep only text
fn text_cleaner() -> Builder<'static> {
    let mut cleaner = Builder::new();
    cleaner
        .tags(HashSet::new())
        .clean_content_tags(HashSet::from(["script", "style"]));
    cleaner
}

/// Strip markup from one spine document and collapse whitespace.
fn chapter_text(cleaner: &Builder<'_>, html: &str) -> String {
    // Keep words in adjacent block elements apart once the tags are gone
    let spaced = html.replace('<', " <");
    let clean = cleaner.clean(&spaced).to_string();
    unescape(&clean).split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Undo the escaping the cleaner applies to text nodes.
fn unescape(text: &str) -> String {
    text.replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&amp;", "&")
}

pub fn extract_text(epub_path: &Path) -> Result<ExtractedText, EpubError> {
    let mut doc = EpubDoc::new(epub_path).map_err(|e| EpubError::Open(e.to_string()))?;
    let cleaner = text_cleaner();

    let mut full_text = String::new();
    let mut chapter_count = 0;

    // Spine order is reading order; the cursor starts on the first item
    loop {
        if let Some((content, _mime)) = doc.get_current_str() {
            let normalized = chapter_text(&cleaner, &content);
            if !normalized.is_empty() {
                if !full_text.is_empty() {
                    full_text.push_str("\n\n");
                }
                full_text.push_str(&normalized);
                chapter_count += 1;
            }
        }
        if !doc.go_next() {
            break;
        }
    }

    log::info!("Extracted {} chapters from {:?}", chapter_count, epub_path);
    Ok(ExtractedText {
        full_text,
        chapter_count,
    })
}
