//! Plain-text rendering for terminal output.

use chrono::{DateTime, Utc};
use dd_core::document::parse_timestamp_millis;
use dd_core::{ChatExchange, Document, VisiblePage};

const SIZE_UNITS: [&str; 5] = ["Bytes", "KB", "MB", "GB", "TB"];

/// Human readable size with 1024-based units, e.g. `1.5 KB`.
pub fn format_file_size(bytes: u64) -> String {
    if bytes == 0 {
        return "0 Bytes".to_string();
    }

    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < SIZE_UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }

    let rounded = format!("{value:.2}");
    let trimmed = rounded.trim_end_matches('0').trim_end_matches('.');
    format!("{trimmed} {}", SIZE_UNITS[unit])
}

/// Upload date as `Mar 1, 2024`, or `-` when missing or unparsable.
pub fn format_date(raw: Option<&str>) -> String {
    raw.and_then(parse_timestamp_millis)
        .and_then(DateTime::<Utc>::from_timestamp_millis)
        .map(|at| at.format("%b %-d, %Y").to_string())
        .unwrap_or_else(|| "-".to_string())
}

/// Cut `text` to `max` characters, marking the cut with `...`.
pub fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let kept: String = text.chars().take(max.saturating_sub(3)).collect();
    format!("{kept}...")
}

pub fn page_table(page: &VisiblePage) -> String {
    if page.is_empty() {
        return "No documents found.\n".to_string();
    }

    let mut out = format!(
        "{:<26} {:<11} {:<13} {:>10}  {}\n",
        "ID", "STATUS", "UPLOADED", "SIZE", "TITLE"
    );
    for doc in &page.items {
        out.push_str(&format!(
            "{:<26} {:<11} {:<13} {:>10}  {}\n",
            truncate(doc.id.as_str(), 26),
            doc.status.as_str(),
            format_date(doc.uploaded_at.as_deref()),
            doc.file_size.map(format_file_size).unwrap_or_else(|| "-".to_string()),
            truncate(&doc.filename, 48),
        ));
    }
    out.push_str(&format!(
        "page {}/{} ({} documents)\n",
        page.page,
        page.total_pages.max(1),
        page.total_count
    ));
    out
}

pub fn document_detail(doc: &Document, full_text: bool) -> String {
    let mut out = format!("{}\n", doc.filename);
    out.push_str(&format!("  id:       {}\n", doc.id));
    out.push_str(&format!("  status:   {}\n", doc.status));
    out.push_str(&format!("  uploaded: {}\n", format_date(doc.uploaded_at.as_deref())));
    if let Some(size) = doc.file_size {
        out.push_str(&format!("  size:     {}\n", format_file_size(size)));
    }
    if let Some(doc_type) = &doc.doc_type {
        out.push_str(&format!("  type:     {doc_type}\n"));
    }
    if let Some(file_type) = &doc.file_type {
        out.push_str(&format!("  file:     {file_type}\n"));
    }

    match doc.extracted_text.as_deref().map(str::trim) {
        Some(text) if !text.is_empty() => {
            let body = if full_text { text.to_string() } else { truncate(text, 200) };
            out.push('\n');
            out.push_str(&body);
            out.push('\n');
        }
        _ => out.push_str("\n(no extracted text)\n"),
    }
    out
}

pub fn chat_exchange(exchange: &ChatExchange) -> String {
    let mut out = format!("> {}\n{}\n", exchange.user_message, exchange.ai_response);
    for tool in &exchange.used_tools {
        match &tool.query {
            Some(query) => out.push_str(&format!("  [{}: {query}]\n", tool.tool_name)),
            None => out.push_str(&format!("  [{}]\n", tool.tool_name)),
        }
    }
    out
}
