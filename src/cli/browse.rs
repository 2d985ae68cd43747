//! Interactive browser: a line-based REPL over one [`DocumentBrowser`].
//!
//! Plain text becomes the search term; lines starting with `:` are commands.
//! The page is redrawn after each command, once the local debounce has
//! elapsed after a new term, and whenever a server search is accepted.

use std::io::Write;
use std::time::Duration;

use anyhow::Result;
use dd_app::{AppDeps, DocumentBrowser};
use dd_core::config::SearchConfig;
use dd_core::{DocumentId, RemoteSearchEvent, RemoteSearchState};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::time::{sleep_until, Instant};
use tracing::warn;

use super::render;

const HELP: &str = "\
type text to search, or one of:
  :sort <uploaded_at|filename|status|file_size> [asc|desc]
  :status <all|processed|processing|failed>
  :page <n>   :next   :prev
  :show <row|id>   :rm <id>
  :clear   :refresh   :help   :quit";

#[derive(Debug, Clone, PartialEq, Eq)]
enum BrowseCommand {
    Search(String),
    Redraw,
    Clear,
    Sort { field: String, direction: Option<String> },
    Status(String),
    Page(usize),
    Next,
    Prev,
    Refresh,
    Show(String),
    Delete(String),
    Help,
    Quit,
}

fn parse_command(line: &str) -> Result<BrowseCommand, String> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(BrowseCommand::Redraw);
    }
    let Some(command) = line.strip_prefix(':') else {
        return Ok(BrowseCommand::Search(line.to_string()));
    };

    let mut words = command.split_whitespace();
    let name = words.next().unwrap_or_default();
    let arg = words.next();
    let missing = || format!(":{name} needs an argument");

    Ok(match name {
        "sort" => BrowseCommand::Sort {
            field: arg.ok_or_else(missing)?.to_string(),
            direction: words.next().map(str::to_string),
        },
        "status" => BrowseCommand::Status(arg.ok_or_else(missing)?.to_string()),
        "page" => {
            let raw = arg.ok_or_else(missing)?;
            BrowseCommand::Page(raw.parse().map_err(|_| format!("not a page number: {raw}"))?)
        }
        "next" | "n" => BrowseCommand::Next,
        "prev" | "p" => BrowseCommand::Prev,
        "clear" | "c" => BrowseCommand::Clear,
        "refresh" | "r" => BrowseCommand::Refresh,
        "show" => BrowseCommand::Show(arg.ok_or_else(missing)?.to_string()),
        "rm" | "delete" => BrowseCommand::Delete(arg.ok_or_else(missing)?.to_string()),
        "help" | "h" | "?" => BrowseCommand::Help,
        "quit" | "q" | "exit" => BrowseCommand::Quit,
        other => return Err(format!("unknown command :{other} (try :help)")),
    })
}

fn header(browser: &DocumentBrowser) -> String {
    let state = browser.state();
    let mut out = format!(
        "search: {:?} | sort: {} {} | status: {}",
        state.search_term,
        state.sort_by.as_str(),
        state.sort_direction.as_str(),
        state.status_filter.as_str()
    );
    match browser.remote_state() {
        RemoteSearchState::Debouncing { .. } | RemoteSearchState::Fetching { .. } => {
            out.push_str(" | searching server...")
        }
        RemoteSearchState::Error { message, .. } => {
            out.push_str(&format!(" | server search failed: {message}"))
        }
        RemoteSearchState::Idle => {}
    }
    out
}

fn draw(browser: &DocumentBrowser) {
    println!("{}", header(browser));
    print!("{}", render::page_table(&browser.visible_page()));
    prompt();
}

fn prompt() {
    print!("> ");
    let _ = std::io::stdout().flush();
}

/// Row numbers on the current page (1-based) resolve to ids; anything else
/// is taken as an id.
fn resolve_target(browser: &DocumentBrowser, target: &str) -> DocumentId {
    target
        .parse::<usize>()
        .ok()
        .and_then(|row| row.checked_sub(1))
        .and_then(|index| browser.visible_page().items.get(index).map(|doc| doc.id.clone()))
        .unwrap_or_else(|| DocumentId::from(target))
}

pub async fn run(
    deps: &AppDeps,
    search: &SearchConfig,
    mut events: UnboundedReceiver<RemoteSearchEvent>,
    initial_search: Option<String>,
) -> Result<()> {
    let documents = match deps.list_documents().execute(None).await {
        Ok(documents) => documents,
        Err(err) => {
            warn!(error = %err, "initial document load failed");
            eprintln!("Could not load documents: {err:#}");
            Vec::new()
        }
    };
    let browser = deps.document_browser(documents, None, search);
    let local_debounce = Duration::from_millis(search.local_debounce_ms);

    println!("{HELP}");
    let mut redraw_at = None;
    match initial_search {
        Some(term) if !term.trim().is_empty() => {
            browser.set_search_term(term);
            redraw_at = Some(Instant::now() + local_debounce);
        }
        _ => draw(&browser),
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                match parse_command(&line) {
                    Ok(BrowseCommand::Quit) => break,
                    Ok(BrowseCommand::Search(term)) => {
                        browser.set_search_term(term);
                        redraw_at = Some(Instant::now() + local_debounce);
                        prompt();
                    }
                    Ok(command) => {
                        execute(deps, &browser, command).await;
                        draw(&browser);
                    }
                    Err(message) => {
                        eprintln!("{message}");
                        prompt();
                    }
                }
            }
            Some(event) = events.recv() => match event {
                RemoteSearchEvent::Started { .. } => {}
                RemoteSearchEvent::Succeeded { documents, .. } => {
                    println!("\n{} documents from the server", documents.len());
                    draw(&browser);
                }
                RemoteSearchEvent::Failed { error, .. } => {
                    eprintln!("\nserver search failed: {error}");
                    prompt();
                }
            },
            _ = sleep_until(redraw_at.unwrap_or_else(Instant::now)), if redraw_at.is_some() => {
                redraw_at = None;
                println!();
                draw(&browser);
            }
        }
    }

    browser.shutdown();
    Ok(())
}

async fn execute(deps: &AppDeps, browser: &DocumentBrowser, command: BrowseCommand) {
    match command {
        BrowseCommand::Search(term) => browser.set_search_term(term),
        BrowseCommand::Redraw | BrowseCommand::Quit => {}
        BrowseCommand::Clear => browser.clear(),
        BrowseCommand::Sort { field, direction } => browser.set_sort_str(&field, direction.as_deref()),
        BrowseCommand::Status(status) => browser.set_status_filter_str(&status),
        BrowseCommand::Page(page) => {
            browser.set_page(page);
        }
        BrowseCommand::Next => {
            browser.set_page(browser.state().page + 1);
        }
        BrowseCommand::Prev => {
            browser.set_page(browser.state().page.saturating_sub(1));
        }
        BrowseCommand::Refresh => browser.refresh(),
        BrowseCommand::Help => println!("{HELP}"),
        BrowseCommand::Show(target) => {
            let id = resolve_target(browser, &target);
            match deps.get_document().execute(&id).await {
                Ok(document) => print!("{}", render::document_detail(&document, false)),
                Err(err) => eprintln!("{err:#}"),
            }
        }
        BrowseCommand::Delete(target) => {
            let id = resolve_target(browser, &target);
            match deps.delete_document().execute(&id, Some(browser)).await {
                Ok(()) => println!("Deleted {id}"),
                Err(err) => eprintln!("{err:#}"),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use dd_app::{BrowserOptions, DocumentBrowser};
    use dd_core::ports::{ApiError, DocumentRepositoryPort, NoopSearchEvents};
    use dd_core::{Document, DocumentStatus};

    struct Offline;

    #[async_trait::async_trait]
    impl DocumentRepositoryPort for Offline {
        async fn list_documents(&self, _search: Option<&str>) -> Result<Vec<Document>, ApiError> {
            Err(ApiError::Transport("offline".into()))
        }
        async fn get_document(&self, id: &DocumentId) -> Result<Document, ApiError> {
            Err(ApiError::NotFound(id.clone()))
        }
        async fn delete_document(&self, _id: &DocumentId) -> Result<(), ApiError> {
            Ok(())
        }
        async fn update_title(&self, id: &DocumentId, _title: &str) -> Result<Document, ApiError> {
            Err(ApiError::NotFound(id.clone()))
        }
        async fn update_content(&self, id: &DocumentId, _content: &str) -> Result<Document, ApiError> {
            Err(ApiError::NotFound(id.clone()))
        }
    }

    fn browser() -> DocumentBrowser {
        DocumentBrowser::initialize(
            vec![
                Document::new("a1", "lease.pdf", DocumentStatus::Processed)
                    .with_uploaded_at("2024-01-01"),
                Document::new("b2", "receipt.png", DocumentStatus::Failed)
                    .with_uploaded_at("2024-02-01"),
            ],
            None,
            Arc::new(Offline),
            Arc::new(NoopSearchEvents),
            BrowserOptions::default(),
        )
    }

    #[test]
    fn plain_text_is_a_search() {
        assert_eq!(
            parse_command("  tax 2023 "),
            Ok(BrowseCommand::Search("tax 2023".into()))
        );
        assert_eq!(parse_command(""), Ok(BrowseCommand::Redraw));
    }

    #[test]
    fn commands_take_arguments() {
        assert_eq!(
            parse_command(":sort filename asc"),
            Ok(BrowseCommand::Sort {
                field: "filename".into(),
                direction: Some("asc".into())
            })
        );
        assert_eq!(
            parse_command(":sort file_size"),
            Ok(BrowseCommand::Sort {
                field: "file_size".into(),
                direction: None
            })
        );
        assert_eq!(parse_command(":page 3"), Ok(BrowseCommand::Page(3)));
        assert_eq!(parse_command(":q"), Ok(BrowseCommand::Quit));
        assert_eq!(parse_command(":rm a1"), Ok(BrowseCommand::Delete("a1".into())));
    }

    #[test]
    fn bad_commands_are_explained() {
        assert_eq!(parse_command(":page two"), Err("not a page number: two".into()));
        assert_eq!(parse_command(":status"), Err(":status needs an argument".into()));
        assert!(parse_command(":frobnicate").unwrap_err().contains("unknown command"));
    }

    #[test]
    fn header_shows_filters() {
        let browser = browser();
        browser.set_status_filter_str("failed");
        assert_eq!(
            header(&browser),
            "search: \"\" | sort: uploaded_at desc | status: failed"
        );
    }

    #[test]
    fn rows_resolve_to_ids_on_the_current_page() {
        let browser = browser();
        assert_eq!(resolve_target(&browser, "1"), DocumentId::from("b2"));
        assert_eq!(resolve_target(&browser, "2"), DocumentId::from("a1"));
        assert_eq!(resolve_target(&browser, "7"), DocumentId::from("7"));
        assert_eq!(resolve_target(&browser, "a1"), DocumentId::from("a1"));
    }

    #[tokio::test]
    async fn delete_command_drops_the_row() {
        let browser = browser();
        let (tx, _rx) = tokio::sync::mpsc::unbounded_channel();
        let deps = AppDeps {
            documents: Arc::new(Offline),
            uploads: Arc::new(NoUploads),
            chat: Arc::new(NoChat),
            search_events: Arc::new(tx),
        };

        execute(&deps, &browser, BrowseCommand::Delete("1".into())).await;
        assert_eq!(browser.documents().len(), 1);
        assert_eq!(browser.visible_page().items[0].id, DocumentId::from("a1"));
    }

    struct NoUploads;

    #[async_trait::async_trait]
    impl dd_core::ports::DocumentUploadPort for NoUploads {
        async fn upload(
            &self,
            _request: dd_core::ports::UploadRequest,
            _progress: Option<dd_core::ports::UploadProgressSender>,
        ) -> Result<Vec<Document>, ApiError> {
            Ok(Vec::new())
        }
    }

    struct NoChat;

    #[async_trait::async_trait]
    impl dd_core::ports::ChatPort for NoChat {
        async fn history(&self, _document_id: &DocumentId) -> Result<Vec<dd_core::ChatExchange>, ApiError> {
            Ok(Vec::new())
        }
        async fn send(&self, document_id: &DocumentId, _message: &str) -> Result<dd_core::ChatExchange, ApiError> {
            Err(ApiError::NotFound(document_id.clone()))
        }
        async fn clear(&self, _document_id: &DocumentId) -> Result<(), ApiError> {
            Ok(())
        }
    }
}
