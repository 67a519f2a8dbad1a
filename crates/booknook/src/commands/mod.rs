//! Command dispatch: bridges CLI args -> library managers -> output formatting.

pub mod admin;
pub mod auth;
pub mod books;
pub mod config_cmd;
pub mod me;
pub mod util;

use booknook_core::Library;

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Dispatch a library-bound command to the appropriate handler.
pub async fn dispatch(cmd: Command, library: &Library, global: &GlobalOpts) -> Result<(), CliError> {
    match cmd {
        Command::Login(args) => auth::login(library, args, global).await,
        Command::Logout => auth::logout(library, global),
        Command::Register(args) => auth::register(library, args, global).await,
        Command::Whoami => auth::whoami(library, global),
        Command::Profile(args) => auth::profile(library, args, global).await,
        Command::Books(args) => books::handle(library, args, global).await,
        Command::Me(args) => me::handle(library, args, global).await,
        Command::Admin(args) => admin::handle(library, args, global).await,
        // Config and Completions are handled before dispatch
        Command::Config(_) | Command::Completions(_) => unreachable!(),
    }
}
