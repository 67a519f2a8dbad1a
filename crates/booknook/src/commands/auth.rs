//! Account command handlers: login, logout, register, whoami, profile.

use booknook_core::{Credentials, ErrorKind, Library, NewAccount, PasswordChange, ProfileChanges, User, View};

use crate::cli::{GlobalOpts, LoginArgs, ProfileArgs, ProfileCommand, RegisterArgs};
use crate::error::CliError;
use crate::output;

use super::util;

fn user_detail(user: &User) -> String {
    [
        format!("ID:        {}", user.id),
        format!("Username:  {}", user.username),
        format!("Email:     {}", user.email),
        format!("Role:      {}", user.role),
    ]
    .join("\n")
}

fn print_user(user: &User, global: &GlobalOpts) {
    let out = output::render_single(&global.output, user, user_detail, |u| u.id.clone());
    output::print_output(&out, global.quiet);
}

fn signed_in_user(library: &Library) -> Result<User, CliError> {
    library
        .session()
        .session()
        .user
        .ok_or_else(|| CliError::AuthRequired {
            message: "You must be logged in".into(),
        })
}

pub async fn login(library: &Library, args: LoginArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let email = util::text_or_prompt(args.email, "Email")?;
    let password = util::read_password("Password: ", args.password_stdin)?;

    let spinner = output::spinner("Signing in...", global.quiet);
    let ok = library
        .session()
        .login(&Credentials { email, password })
        .await;
    spinner.finish_and_clear();
    if !ok {
        // The service answers bad credentials with a 400.
        let session = library.session().session();
        return Err(match session.last_error() {
            Some(failure) if failure.kind == ErrorKind::Validation => CliError::AuthRequired {
                message: failure.message.clone(),
            },
            other => util::failed(library, other, "whoami"),
        });
    }

    let user = signed_in_user(library)?;
    output::notice(&format!("Signed in as {}", user.username), global.quiet);
    print_user(&user, global);
    Ok(())
}

pub fn logout(library: &Library, global: &GlobalOpts) -> Result<(), CliError> {
    let was_signed_in = library.session().is_authenticated();
    library.logout();
    if was_signed_in {
        output::notice("Signed out", global.quiet);
    } else {
        output::notice("Not signed in; cleared any stored token", global.quiet);
    }
    Ok(())
}

pub async fn register(
    library: &Library,
    args: RegisterArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let username = util::text_or_prompt(args.username, "Username")?;
    let email = util::text_or_prompt(args.email, "Email")?;
    let password = util::read_password("Password: ", args.password_stdin)?;

    let spinner = output::spinner("Creating account...", global.quiet);
    let ok = library
        .session()
        .register(&NewAccount {
            username,
            email: email.clone(),
            password,
        })
        .await;
    spinner.finish_and_clear();
    if !ok {
        return Err(util::session_failure(library));
    }

    output::notice(
        &format!("Account created. Sign in with: booknook login --email {email}"),
        global.quiet,
    );
    Ok(())
}

pub fn whoami(library: &Library, global: &GlobalOpts) -> Result<(), CliError> {
    util::require(library, View::Profile)?;
    let user = signed_in_user(library)?;
    print_user(&user, global);
    Ok(())
}

pub async fn profile(
    library: &Library,
    args: ProfileArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    util::require(library, View::Profile)?;
    let current = signed_in_user(library)?;

    match args.command.unwrap_or(ProfileCommand::Show) {
        ProfileCommand::Show => {
            print_user(&current, global);
            Ok(())
        }

        ProfileCommand::Update {
            username,
            email,
            change_password,
        } => {
            let password = if change_password {
                Some(PasswordChange {
                    current: util::read_password("Current password: ", false)?,
                    new: util::read_password("New password: ", false)?,
                    confirm: util::read_password("Confirm new password: ", false)?,
                })
            } else {
                None
            };
            let changes = ProfileChanges {
                username: username.unwrap_or(current.username),
                email: email.unwrap_or(current.email),
                password,
            };

            let spinner = output::spinner("Saving profile...", global.quiet);
            let ok = library.session().update_profile(&changes).await;
            spinner.finish_and_clear();
            if !ok {
                return Err(util::session_failure(library));
            }

            output::notice("Profile updated", global.quiet);
            let user = signed_in_user(library)?;
            print_user(&user, global);
            Ok(())
        }
    }
}
