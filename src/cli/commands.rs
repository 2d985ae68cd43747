use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use bytes::Bytes;
use dd_app::AppDeps;
use dd_core::config::SearchConfig;
use dd_core::ports::{UploadFile, UploadRequest};
use dd_core::{DocumentId, FilterState, LocalSearchEngine};
use tokio::sync::mpsc;

use super::render;
use super::ListArgs;

pub async fn list(deps: &AppDeps, search: &SearchConfig, args: ListArgs) -> Result<()> {
    let documents = deps.list_documents().execute(args.search.as_deref()).await?;

    // The server already applied the term; locally only sort, filter and page.
    let filters = FilterState {
        sort_by: args.sort,
        sort_direction: args.order,
        status_filter: args.status,
        page: args.page.max(1),
        ..FilterState::default()
    };
    let page = LocalSearchEngine::new(search.page_size).compute(&documents, &filters);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&page)?);
    } else {
        print!("{}", render::page_table(&page));
    }
    Ok(())
}

pub async fn show(deps: &AppDeps, id: &str, full_text: bool) -> Result<()> {
    let document = deps.get_document().execute(&DocumentId::from(id)).await?;
    print!("{}", render::document_detail(&document, full_text));
    Ok(())
}

pub async fn delete(deps: &AppDeps, id: &str) -> Result<()> {
    deps.delete_document().execute(&DocumentId::from(id), None).await?;
    println!("Deleted {id}");
    Ok(())
}

pub async fn rename(deps: &AppDeps, id: &str, title: &str) -> Result<()> {
    let document = deps
        .rename_document()
        .execute(&DocumentId::from(id), title, None)
        .await?;
    println!("Renamed {} to {:?}", document.id, document.filename);
    Ok(())
}

pub async fn edit(deps: &AppDeps, id: &str, from: &Path) -> Result<()> {
    let content = tokio::fs::read_to_string(from)
        .await
        .with_context(|| format!("Failed to read {}", from.display()))?;
    let document = deps
        .update_document_content()
        .execute(&DocumentId::from(id), &content)
        .await?;
    println!("Updated content of {}", document.filename);
    Ok(())
}

pub async fn upload(deps: &AppDeps, paths: &[PathBuf], doc_type: Option<String>) -> Result<()> {
    let mut files = Vec::with_capacity(paths.len());
    for path in paths {
        files.push(read_upload_file(path).await?);
    }
    let request = UploadRequest { files, doc_type };

    let (progress_tx, mut progress_rx) = mpsc::unbounded_channel::<u8>();
    let printer = tokio::spawn(async move {
        let mut stderr = std::io::stderr();
        while let Some(percent) = progress_rx.recv().await {
            let _ = write!(stderr, "\rUploading... {percent:>3}%");
            let _ = stderr.flush();
        }
        let _ = writeln!(stderr);
    });

    let uploaded = deps.upload_documents().execute(request, Some(progress_tx)).await;
    // The sender is gone once execute returns, so the printer finishes.
    let _ = printer.await;

    for document in uploaded? {
        println!("Uploaded {} ({})", document.filename, document.id);
    }
    Ok(())
}

pub async fn chat_ask(deps: &AppDeps, id: &str, message: &str) -> Result<()> {
    let exchange = deps
        .send_chat_message()
        .execute(&DocumentId::from(id), message)
        .await?;
    print!("{}", render::chat_exchange(&exchange));
    Ok(())
}

pub async fn chat_history(deps: &AppDeps, id: &str) -> Result<()> {
    let history = deps.get_chat_history().execute(&DocumentId::from(id)).await?;
    if history.is_empty() {
        println!("No conversation yet.");
    }
    for exchange in &history {
        println!("{}", render::chat_exchange(exchange));
    }
    Ok(())
}

pub async fn chat_clear(deps: &AppDeps, id: &str) -> Result<()> {
    deps.clear_chat_history().execute(&DocumentId::from(id)).await?;
    println!("Conversation cleared.");
    Ok(())
}

async fn read_upload_file(path: &Path) -> Result<UploadFile> {
    let bytes = tokio::fs::read(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .with_context(|| format!("{} is not a file", path.display()))?;

    Ok(UploadFile {
        content_type: guess_content_type(path).map(str::to_string),
        file_name,
        bytes: Bytes::from(bytes),
    })
}

/// MIME type for the formats the backend accepts, by file extension.
fn guess_content_type(path: &Path) -> Option<&'static str> {
    let extension = path.extension()?.to_str()?.to_ascii_lowercase();
    Some(match extension.as_str() {
        "pdf" => "application/pdf",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "bmp" => "image/bmp",
        "tif" | "tiff" => "image/tiff",
        _ => return None,
    })
}
