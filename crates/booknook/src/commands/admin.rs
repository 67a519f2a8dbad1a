//! Administrator command handlers: users, inventory, request queue, statistics.

use chrono::NaiveDate;
use tabled::Tabled;

use booknook_core::{
    AdminDashboard, BookInput, BorrowRequest, Library, NewUser, Statistics, User, UserUpdate, View,
};

use crate::cli::{
    AdminArgs, AdminBooksArgs, AdminBooksCommand, AdminCommand, AdminUsersArgs,
    AdminUsersCommand, BookFields, GlobalOpts,
};
use crate::error::CliError;
use crate::output;

use super::books::{BookRow, book_detail};
use super::me::LoanRow;
use super::util;

// ── Table rows ──────────────────────────────────────────────────────

#[derive(Tabled)]
struct UserRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Username")]
    username: String,
    #[tabled(rename = "Email")]
    email: String,
    #[tabled(rename = "Role")]
    role: String,
}

impl UserRow {
    fn new(u: &User) -> Self {
        Self {
            id: u.id.clone(),
            username: u.username.clone(),
            email: u.email.clone(),
            role: u.role.to_string(),
        }
    }
}

#[derive(Tabled)]
struct QueueRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Book")]
    book: String,
    #[tabled(rename = "User")]
    user: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Requested")]
    requested: String,
    #[tabled(rename = "Due")]
    due: String,
}

impl QueueRow {
    fn new(r: &BorrowRequest, color: bool) -> Self {
        Self {
            id: r.id.clone(),
            book: r.book.title.clone(),
            user: r.user.username.clone(),
            status: output::status_label(r.status, color),
            requested: util::short_date(Some(r.request_date)),
            due: util::short_date(r.due_date),
        }
    }
}

#[derive(Tabled)]
struct PopularRow {
    #[tabled(rename = "Title")]
    title: String,
    #[tabled(rename = "Borrows")]
    borrows: u64,
}

// ── Detail views ────────────────────────────────────────────────────

fn user_detail(user: &User) -> String {
    [
        format!("ID:        {}", user.id),
        format!("Username:  {}", user.username),
        format!("Email:     {}", user.email),
        format!("Role:      {}", user.role),
    ]
    .join("\n")
}

fn request_detail(r: &BorrowRequest, color: bool) -> String {
    [
        format!("Request:   {}", r.id),
        format!("Book:      {} ({})", r.book.title, r.book.id),
        format!("User:      {}", r.user.username),
        format!("Status:    {}", output::status_label(r.status, color)),
        format!("Requested: {}", util::short_date(Some(r.request_date))),
        format!("Due:       {}", util::short_date(r.due_date)),
        format!("Returned:  {}", util::short_date(r.return_date)),
    ]
    .join("\n")
}

fn stats_detail(stats: &Statistics, today: NaiveDate) -> String {
    let mut out = [
        format!("Books:            {}", stats.total_books),
        format!("  available:      {}", stats.available_books),
        format!("  on loan:        {}", stats.borrowed_books),
        format!("Users:            {}", stats.total_users),
        format!("  borrowing now:  {}", stats.active_borrowers),
        format!("Pending requests: {}", stats.pending_requests),
        format!("This month:       {} borrowed, {} returned", stats.borrowed_this_month, stats.returned_this_month),
    ]
    .join("\n");

    if !stats.popular_books.is_empty() {
        let rows: Vec<_> = stats
            .popular_books
            .iter()
            .map(|p| PopularRow {
                title: p.title.clone(),
                borrows: p.borrow_count,
            })
            .collect();
        out.push_str("\n\nMost borrowed\n");
        out.push_str(&output::render_table(&rows));
    }
    if !stats.overdue_books.is_empty() {
        let rows: Vec<_> = stats.overdue_books.iter().map(|r| LoanRow::new(r, today)).collect();
        out.push_str(&format!("\n\nOverdue ({})\n", stats.overdue_books.len()));
        out.push_str(&output::render_table(&rows));
    }
    if !stats.books_due_soon.is_empty() {
        let rows: Vec<_> = stats.books_due_soon.iter().map(|r| LoanRow::new(r, today)).collect();
        out.push_str("\n\nDue soon\n");
        out.push_str(&output::render_table(&rows));
    }
    out
}

fn dashboard_detail(dash: &AdminDashboard, today: NaiveDate, color: bool) -> String {
    let mut out = match dash.statistics {
        Some(ref s) => format!(
            "Books: {} ({} available, {} on loan)   Users: {}   Pending: {}",
            s.total_books, s.available_books, s.borrowed_books, s.total_users, s.pending_requests
        ),
        None => "Statistics unavailable".into(),
    };

    out.push_str(&format!("\n\nPending requests ({})\n", dash.pending_total));
    if dash.pending.is_empty() {
        out.push_str("  The queue is empty.");
    } else {
        let rows: Vec<_> = dash.pending.iter().map(|r| QueueRow::new(r, color)).collect();
        out.push_str(&output::render_table(&rows));
        if dash.pending_total > dash.pending.len() {
            out.push_str("\n  More: booknook admin pending");
        }
    }

    if !dash.due_soon.is_empty() {
        let rows: Vec<_> = dash.due_soon.iter().map(|r| LoanRow::new(r, today)).collect();
        out.push_str("\n\nDue soon\n");
        out.push_str(&output::render_table(&rows));
    }
    if !dash.overdue.is_empty() {
        let rows: Vec<_> = dash.overdue.iter().map(|r| LoanRow::new(r, today)).collect();
        out.push_str(&format!("\n\nOverdue ({})\n", dash.overdue_total));
        out.push_str(&output::render_table(&rows));
    }
    out
}

fn book_input(fields: BookFields) -> BookInput {
    BookInput {
        title: fields.title,
        author: fields.author,
        year: fields.year,
        image_url: fields.image_url,
    }
}

fn print_request(request: &BorrowRequest, global: &GlobalOpts) {
    let color = output::should_color(&global.color);
    let out = output::render_single(
        &global.output,
        request,
        |r| request_detail(r, color),
        |r| r.id.clone(),
    );
    output::print_output(&out, global.quiet);
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(library: &Library, args: AdminArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let color = output::should_color(&global.color);
    let today = util::today();
    let admin = library.admin();

    match args.command {
        AdminCommand::Dashboard => {
            util::require(library, View::AdminDashboard)?;
            let spinner = output::spinner("Loading dashboard...", global.quiet);
            let (stats, pending_ok) =
                tokio::join!(admin.get_statistics(), admin.list_pending_requests());
            spinner.finish_and_clear();
            if stats.is_none() || !pending_ok {
                return Err(util::admin_failure(library, "admin requests"));
            }

            let dash = admin.dashboard();
            let out = output::render_single(
                &global.output,
                &dash,
                |d| dashboard_detail(d, today, color),
                |d| d.pending.iter().map(|r| r.id.clone()).collect::<Vec<_>>().join("\n"),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        AdminCommand::Users(args) => handle_users(library, args, global).await,

        AdminCommand::Books(args) => handle_books(library, args, global).await,

        AdminCommand::Requests { status } => {
            util::require(library, View::RequestQueue)?;
            if !admin.list_all_requests().await {
                return Err(util::admin_failure(library, "admin requests"));
            }
            let requests = admin.filter_requests(util::request_filter(status));
            let out = output::render_list(
                &global.output,
                &requests,
                |r| QueueRow::new(r, color),
                |r| r.id.clone(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        AdminCommand::Pending => {
            util::require(library, View::RequestQueue)?;
            if !admin.list_pending_requests().await {
                return Err(util::admin_failure(library, "admin requests"));
            }
            let pending = admin.pending();
            let out = output::render_list(
                &global.output,
                pending.as_slice(),
                |r| QueueRow::new(r, color),
                |r| r.id.clone(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        AdminCommand::Approve { id, due } => {
            util::require(library, View::RequestQueue)?;
            let due = match due {
                Some(raw) => util::parse_date("due", &raw)?,
                None => admin.default_due_date(today),
            };
            let request = admin
                .approve_request(&id, due)
                .await
                .ok_or_else(|| util::admin_failure(library, "admin pending"))?;
            output::notice(&format!("Approved; due {due}"), global.quiet);
            print_request(&request, global);
            Ok(())
        }

        AdminCommand::Reject { id } => {
            util::require(library, View::RequestQueue)?;
            let request = admin
                .reject_request(&id)
                .await
                .ok_or_else(|| util::admin_failure(library, "admin pending"))?;
            output::notice("Rejected", global.quiet);
            print_request(&request, global);
            Ok(())
        }

        AdminCommand::Return { id } => {
            util::require(library, View::RequestQueue)?;
            let request = admin
                .process_return(&id)
                .await
                .ok_or_else(|| util::admin_failure(library, "admin requests --status approved"))?;
            output::notice("Return recorded", global.quiet);
            print_request(&request, global);
            Ok(())
        }

        AdminCommand::Stats => {
            util::require(library, View::Statistics)?;
            let stats = admin
                .get_statistics()
                .await
                .ok_or_else(|| util::admin_failure(library, "admin dashboard"))?;
            let out = output::render_single(
                &global.output,
                &stats,
                |s| stats_detail(s, today),
                |s| s.total_books.to_string(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}

async fn handle_users(
    library: &Library,
    args: AdminUsersArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    util::require(library, View::ManageUsers)?;
    let admin = library.admin();

    match args.command {
        AdminUsersCommand::List { search } => {
            if !admin.list_users().await {
                return Err(util::admin_failure(library, "admin users list"));
            }
            let users = admin.filter_users(search.as_deref().unwrap_or(""));
            let out = output::render_list(&global.output, &users, UserRow::new, |u| u.id.clone());
            output::print_output(&out, global.quiet);
            Ok(())
        }

        AdminUsersCommand::Add {
            username,
            email,
            role,
        } => {
            let password = util::read_password("Password for the new user: ", false)?;
            let user = admin
                .add_user(&NewUser {
                    username,
                    email,
                    password,
                    role: util::role(role),
                })
                .await
                .ok_or_else(|| util::admin_failure(library, "admin users list"))?;
            output::notice(&format!("Created user {}", user.username), global.quiet);
            let out = output::render_single(&global.output, &user, user_detail, |u| u.id.clone());
            output::print_output(&out, global.quiet);
            Ok(())
        }

        AdminUsersCommand::Update {
            id,
            username,
            email,
            role,
            reset_password,
        } => {
            let password = if reset_password {
                Some(util::read_password("New password: ", false)?)
            } else {
                None
            };
            let user = admin
                .update_user(
                    &id,
                    &UserUpdate {
                        username,
                        email,
                        role: util::role(role),
                        password,
                    },
                )
                .await
                .ok_or_else(|| util::admin_failure(library, "admin users list"))?;
            output::notice(&format!("Updated user {}", user.username), global.quiet);
            let out = output::render_single(&global.output, &user, user_detail, |u| u.id.clone());
            output::print_output(&out, global.quiet);
            Ok(())
        }

        AdminUsersCommand::Delete { id } => {
            if !util::confirm(&format!("Delete user {id}?"), global.yes)? {
                return Ok(());
            }
            if !admin.delete_user(&id).await {
                return Err(util::admin_failure(library, "admin users list"));
            }
            output::notice(&format!("Deleted user {id}"), global.quiet);
            Ok(())
        }
    }
}

async fn handle_books(
    library: &Library,
    args: AdminBooksArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    util::require(library, View::ManageBooks)?;
    let admin = library.admin();
    let color = output::should_color(&global.color);

    match args.command {
        AdminBooksCommand::List { search } => {
            admin.books_view().await;
            if let Some(failure) = admin.state().status().error() {
                return Err(util::failed(library, Some(failure), "admin books list"));
            }
            let books = admin.filter_books(search.as_deref().unwrap_or(""));
            let out = output::render_list(
                &global.output,
                &books,
                |b| BookRow::new(b, color),
                |b| b.id.clone(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        AdminBooksCommand::Add(fields) => {
            let book = admin
                .add_book(&book_input(fields))
                .await
                .ok_or_else(|| util::admin_failure(library, "admin books list"))?;
            output::notice(&format!("Added \"{}\"", book.title), global.quiet);
            let out = output::render_single(
                &global.output,
                &book,
                |b| book_detail(b, color),
                |b| b.id.clone(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        AdminBooksCommand::Update { id, fields } => {
            let book = admin
                .update_book(&id, &book_input(fields))
                .await
                .ok_or_else(|| util::admin_failure(library, "admin books list"))?;
            output::notice(&format!("Updated \"{}\"", book.title), global.quiet);
            let out = output::render_single(
                &global.output,
                &book,
                |b| book_detail(b, color),
                |b| b.id.clone(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        AdminBooksCommand::Delete { id } => {
            if !util::confirm(&format!("Delete book {id}?"), global.yes)? {
                return Ok(());
            }
            if !admin.delete_book(&id).await {
                return Err(util::admin_failure(library, "admin books list"));
            }
            output::notice(&format!("Deleted book {id}"), global.quiet);
            Ok(())
        }
    }
}
