//! Member views: own requests, loans, and the dashboard.

use chrono::NaiveDate;
use tabled::Tabled;

use booknook_core::{BorrowRequest, DashboardSummary, Library, View};

use crate::cli::{GlobalOpts, MeArgs, MeCommand};
use crate::error::CliError;
use crate::output;

use super::util;

#[derive(Tabled)]
struct RequestRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Book")]
    book: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Requested")]
    requested: String,
    #[tabled(rename = "Due")]
    due: String,
}

impl RequestRow {
    fn new(r: &BorrowRequest, color: bool) -> Self {
        Self {
            id: r.id.clone(),
            book: r.book.title.clone(),
            status: output::status_label(r.status, color),
            requested: util::short_date(Some(r.request_date)),
            due: util::short_date(r.due_date),
        }
    }
}

#[derive(Tabled)]
pub(crate) struct LoanRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Book")]
    book: String,
    #[tabled(rename = "Borrower")]
    borrower: String,
    #[tabled(rename = "Due")]
    due: String,
    #[tabled(rename = "Overdue")]
    overdue: String,
}

impl LoanRow {
    pub(crate) fn new(r: &BorrowRequest, today: NaiveDate) -> Self {
        let days = r.days_overdue(today);
        Self {
            id: r.id.clone(),
            book: r.book.title.clone(),
            borrower: r.user.username.clone(),
            due: util::short_date(r.due_date),
            overdue: if days > 0 {
                format!("{days}d")
            } else {
                "-".into()
            },
        }
    }
}

fn dashboard_detail(summary: &DashboardSummary, today: NaiveDate, color: bool) -> String {
    let mut out = format!("Borrowed ({})\n", summary.borrowed_total);
    if summary.borrowed.is_empty() {
        out.push_str("  You have no books out.\n");
    } else {
        let rows: Vec<_> = summary
            .borrowed
            .iter()
            .map(|r| LoanRow::new(r, today))
            .collect();
        out.push_str(&output::render_table(&rows));
        out.push('\n');
    }

    out.push_str(&format!("\nPending requests ({})\n", summary.pending_total));
    if summary.pending.is_empty() {
        out.push_str("  Nothing awaiting review.");
    } else {
        let rows: Vec<_> = summary
            .pending
            .iter()
            .map(|r| RequestRow::new(r, color))
            .collect();
        out.push_str(&output::render_table(&rows));
    }
    out
}

async fn fetch(library: &Library, requests: bool, borrowed: bool) -> Result<(), CliError> {
    let catalog = library.catalog();
    let (requests_ok, borrowed_ok) = tokio::join!(
        async { !requests || catalog.list_my_requests().await },
        async { !borrowed || catalog.list_my_borrowed().await },
    );
    if requests_ok && borrowed_ok {
        Ok(())
    } else {
        Err(util::catalog_failure(library, "me requests"))
    }
}

pub async fn handle(library: &Library, args: MeArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let color = output::should_color(&global.color);
    let today = util::today();

    match args.command {
        MeCommand::Requests { pending } => {
            util::require(library, View::MyRequests)?;
            fetch(library, true, false).await?;
            let requests = if pending {
                library.catalog().pending_requests()
            } else {
                library.catalog().my_requests().to_vec()
            };
            let out = output::render_list(
                &global.output,
                &requests,
                |r| RequestRow::new(r, color),
                |r| r.id.clone(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        MeCommand::Borrowed => {
            util::require(library, View::Borrowed)?;
            fetch(library, false, true).await?;
            let borrowed = library.catalog().my_borrowed();
            let out = output::render_list(
                &global.output,
                borrowed.as_slice(),
                |r| LoanRow::new(r, today),
                |r| r.id.clone(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        MeCommand::Dashboard => {
            util::require(library, View::Dashboard)?;
            let spinner = output::spinner("Loading dashboard...", global.quiet);
            let fetched = fetch(library, true, true).await;
            spinner.finish_and_clear();
            fetched?;

            let summary = library.catalog().dashboard();
            let out = output::render_single(
                &global.output,
                &summary,
                |s| dashboard_detail(s, today, color),
                |s| {
                    s.borrowed
                        .iter()
                        .chain(&s.pending)
                        .map(|r| r.id.clone())
                        .collect::<Vec<_>>()
                        .join("\n")
                },
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}
