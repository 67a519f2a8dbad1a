//! Catalog command handlers.

use tabled::Tabled;

use booknook_core::{Book, BorrowRequest, Library};

use crate::cli::{BooksArgs, BooksCommand, GlobalOpts, PageArgs};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table rows ──────────────────────────────────────────────────────

#[derive(Tabled)]
pub(crate) struct BookRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Title")]
    title: String,
    #[tabled(rename = "Author")]
    author: String,
    #[tabled(rename = "Year")]
    year: String,
    #[tabled(rename = "Status")]
    status: String,
}

impl BookRow {
    pub(crate) fn new(book: &Book, color: bool) -> Self {
        Self {
            id: book.id.clone(),
            title: book.title.clone(),
            author: book.author.clone(),
            year: book.year.map_or_else(|| "-".into(), |y| y.to_string()),
            status: output::availability_label(book.available, color),
        }
    }
}

pub(crate) fn book_detail(book: &Book, color: bool) -> String {
    let mut lines = vec![
        format!("ID:        {}", book.id),
        format!("Title:     {}", book.title),
        format!("Author:    {}", book.author),
        format!(
            "Year:      {}",
            book.year.map_or_else(|| "-".into(), |y| y.to_string())
        ),
        format!("Status:    {}", output::availability_label(book.available, color)),
    ];
    if let Some(ref url) = book.image_url {
        lines.push(format!("Cover:     {url}"));
    }
    lines.join("\n")
}

fn request_detail(request: &BorrowRequest, color: bool) -> String {
    [
        format!("Request:   {}", request.id),
        format!("Book:      {} ({})", request.book.title, request.book.id),
        format!("Status:    {}", output::status_label(request.status, color)),
        format!("Requested: {}", util::short_date(Some(request.request_date))),
    ]
    .join("\n")
}

// ── Handler ─────────────────────────────────────────────────────────

async fn load_catalog(library: &Library, global: &GlobalOpts) -> Result<(), CliError> {
    let spinner = output::spinner("Fetching books...", global.quiet);
    let ok = library.catalog().list_books().await;
    spinner.finish_and_clear();
    if ok {
        Ok(())
    } else {
        Err(util::catalog_failure(library, "books list"))
    }
}

fn print_books(library: &Library, term: &str, page: &PageArgs, global: &GlobalOpts) {
    let color = output::should_color(&global.color);
    let catalog = library.catalog();

    let books = if page.all {
        catalog.search(term)
    } else {
        let selected = catalog.page(term, page.page);
        if selected.total_items == 0 {
            output::notice("No books found", global.quiet);
        } else if selected.items.is_empty() {
            output::notice(
                &format!("Page {} is past the end ({} pages)", selected.number, selected.total_pages),
                global.quiet,
            );
        } else {
            let mut footer = format!(
                "Page {} of {} ({} books)",
                selected.number, selected.total_pages, selected.total_items
            );
            if selected.has_next() {
                footer.push_str(&format!("; next: --page {}", selected.number + 1));
            }
            output::notice(&footer, global.quiet);
        }
        selected.items
    };

    let out = output::render_list(
        &global.output,
        &books,
        |b| BookRow::new(b, color),
        |b| b.id.clone(),
    );
    output::print_output(&out, global.quiet);
}

pub async fn handle(library: &Library, args: BooksArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let color = output::should_color(&global.color);

    match args.command {
        BooksCommand::List(page) => {
            load_catalog(library, global).await?;
            print_books(library, "", &page, global);
            Ok(())
        }

        BooksCommand::Search { term, page } => {
            load_catalog(library, global).await?;
            print_books(library, &term, &page, global);
            Ok(())
        }

        BooksCommand::Show { id } => {
            let book = library
                .catalog()
                .get_book(&id)
                .await
                .ok_or_else(|| util::catalog_failure(library, "books list"))?;
            let out = output::render_single(
                &global.output,
                &book,
                |b| book_detail(b, color),
                |b| b.id.clone(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        BooksCommand::Featured { seed } => {
            load_catalog(library, global).await?;
            let seed = seed.unwrap_or_else(rand::random);
            tracing::debug!(seed, "sampling featured books");
            let books = library.catalog().featured(seed);
            let out = output::render_list(
                &global.output,
                &books,
                |b| BookRow::new(b, color),
                |b| b.id.clone(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        BooksCommand::Borrow { id } => {
            util::require(library, booknook_core::View::MyRequests)?;
            let spinner = output::spinner("Sending request...", global.quiet);
            let request = library.catalog().request_borrow(&id).await;
            spinner.finish_and_clear();
            let request = request.ok_or_else(|| util::catalog_failure(library, "books list"))?;

            output::notice(
                &format!("Requested \"{}\"; an administrator will review it", request.book.title),
                global.quiet,
            );
            let out = output::render_single(
                &global.output,
                &request,
                |r| request_detail(r, color),
                |r| r.id.clone(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}
