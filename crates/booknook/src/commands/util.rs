//! Shared helpers for command handlers.

use std::io::{BufRead, IsTerminal};

use chrono::NaiveDate;
use secrecy::SecretString;

use booknook_core::{Access, Failure, Library, RequestFilter, RequestStatus, Role, View};

use crate::cli::{RoleArg, StatusArg};
use crate::error::CliError;

/// Prompt for confirmation, auto-approving if `--yes` was passed.
pub fn confirm(message: &str, yes_flag: bool) -> Result<bool, CliError> {
    if yes_flag {
        return Ok(true);
    }
    if !std::io::stdin().is_terminal() {
        return Err(CliError::NonInteractiveRequiresYes {
            action: message.into(),
        });
    }
    let confirmed = dialoguer::Confirm::new()
        .with_prompt(message)
        .default(false)
        .interact()
        .map_err(|e| CliError::Io(std::io::Error::other(e)))?;
    Ok(confirmed)
}

/// Refuse a view the current session may not open.
pub fn require(library: &Library, view: View) -> Result<(), CliError> {
    match library.access(view) {
        Access::Granted | Access::Pending => Ok(()),
        Access::LoginRequired => {
            // A restore that could not reach the service reads as signed out;
            // report the real cause instead.
            let session = library.session().session();
            if let Some(failure) = session.last_error() {
                if failure.kind == booknook_core::ErrorKind::Network {
                    return Err(failed(library, Some(failure), "books list"));
                }
            }
            Err(CliError::AuthRequired {
                message: "You must be logged in".into(),
            })
        }
        Access::AdminRequired => Err(CliError::PermissionDenied {
            message: "Administrator access required".into(),
        }),
    }
}

/// Turn a manager's error slot into a CLI error.
pub fn failed(library: &Library, failure: Option<&Failure>, list_command: &str) -> CliError {
    match failure {
        Some(failure) => CliError::from_failure(
            failure.clone(),
            library.config().api_url.as_str(),
            list_command,
        ),
        None => CliError::ApiError {
            message: "Request failed".into(),
        },
    }
}

pub fn catalog_failure(library: &Library, list_command: &str) -> CliError {
    let state = library.catalog().state();
    failed(library, state.status().error(), list_command)
}

pub fn admin_failure(library: &Library, list_command: &str) -> CliError {
    let state = library.admin().state();
    failed(library, state.status().error(), list_command)
}

pub fn session_failure(library: &Library) -> CliError {
    let session = library.session().session();
    failed(library, session.last_error(), "whoami")
}

/// Map a dialoguer / interactive I/O failure into CliError.
pub fn prompt_err(e: impl std::fmt::Display) -> CliError {
    CliError::Validation {
        field: "interactive".into(),
        reason: format!("prompt failed: {e}"),
    }
}

/// Use `value` when given, else ask for it.
pub fn text_or_prompt(value: Option<String>, prompt: &str) -> Result<String, CliError> {
    match value {
        Some(v) => Ok(v),
        None => dialoguer::Input::new()
            .with_prompt(prompt)
            .interact_text()
            .map_err(prompt_err),
    }
}

/// Read a password from the first stdin line, or prompt without echo.
pub fn read_password(prompt: &str, from_stdin: bool) -> Result<SecretString, CliError> {
    let raw = if from_stdin {
        let mut line = String::new();
        std::io::stdin().lock().read_line(&mut line)?;
        line.trim_end_matches(['\r', '\n']).to_owned()
    } else {
        rpassword::prompt_password(prompt).map_err(prompt_err)?
    };
    if raw.is_empty() {
        return Err(CliError::Validation {
            field: "password".into(),
            reason: "cannot be empty".into(),
        });
    }
    Ok(SecretString::from(raw))
}

pub fn parse_date(field: &str, raw: &str) -> Result<NaiveDate, CliError> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|e| CliError::Validation {
        field: field.into(),
        reason: format!("expected YYYY-MM-DD ({e})"),
    })
}

pub fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

pub fn role(arg: RoleArg) -> Role {
    match arg {
        RoleArg::User => Role::User,
        RoleArg::Admin => Role::Admin,
    }
}

pub fn request_filter(arg: StatusArg) -> RequestFilter {
    match arg {
        StatusArg::All => RequestFilter::All,
        StatusArg::Pending => RequestFilter::Only(RequestStatus::Pending),
        StatusArg::Approved => RequestFilter::Only(RequestStatus::Approved),
        StatusArg::Rejected => RequestFilter::Only(RequestStatus::Rejected),
        StatusArg::Returned => RequestFilter::Only(RequestStatus::Returned),
    }
}

/// `2025-06-01` from a server timestamp, or a dash.
pub fn short_date(value: Option<chrono::DateTime<chrono::Utc>>) -> String {
    value.map_or_else(|| "-".into(), |d| d.date_naive().to_string())
}
