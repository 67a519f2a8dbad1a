// ── View gating ──
//
// Which screens a session may open and which navigation entries it sees.
// Derived purely from the session snapshot; the server still enforces
// every call.

use serde::Serialize;
use strum::{Display, EnumIter, IntoEnumIterator};

use crate::session::Session;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Display, EnumIter)]
#[strum(serialize_all = "kebab-case")]
pub enum View {
    // Public
    Catalog,
    BookDetail,
    Login,
    Register,
    // Signed in, plain user
    Dashboard,
    MyRequests,
    Borrowed,
    Profile,
    // Administrator
    AdminDashboard,
    ManageBooks,
    ManageUsers,
    RequestQueue,
    Statistics,
}

/// Who may open a view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Requirement {
    Public,
    Authenticated,
    Admin,
}

/// Outcome of asking to open a view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Granted,
    /// A session restore is still in flight; show a spinner.
    Pending,
    /// Send the visitor to the login form.
    LoginRequired,
    /// Signed in but not an admin; send them back to the catalog.
    AdminRequired,
}

impl View {
    pub fn requirement(self) -> Requirement {
        match self {
            Self::Catalog | Self::BookDetail | Self::Login | Self::Register => Requirement::Public,
            Self::Dashboard | Self::MyRequests | Self::Borrowed | Self::Profile => {
                Requirement::Authenticated
            }
            Self::AdminDashboard
            | Self::ManageBooks
            | Self::ManageUsers
            | Self::RequestQueue
            | Self::Statistics => Requirement::Admin,
        }
    }
}

impl Session {
    pub fn access(&self, view: View) -> Access {
        match view.requirement() {
            Requirement::Public => Access::Granted,
            _ if !self.is_authenticated && self.pending() => Access::Pending,
            _ if !self.is_authenticated => Access::LoginRequired,
            Requirement::Admin if !self.is_admin => Access::AdminRequired,
            _ => Access::Granted,
        }
    }

    /// Navigation entries, in menu order.
    ///
    /// Visitors get the catalog plus the auth forms; users get their own
    /// pages; admins get the console pages.
    pub fn nav(&self) -> Vec<View> {
        View::iter()
            .filter(|view| match view {
                View::BookDetail => false,
                View::Catalog => true,
                View::Login | View::Register => !self.is_authenticated,
                other => {
                    self.is_authenticated
                        && (other.requirement() == Requirement::Admin) == self.is_admin
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Role, User};

    fn signed_in(role: Role) -> Session {
        Session::signed_in(User {
            id: "u1".into(),
            username: "ada".into(),
            email: "ada@example.com".into(),
            role,
        })
    }

    #[test]
    fn visitors_are_sent_to_login() {
        let session = Session::default();
        assert_eq!(session.access(View::Catalog), Access::Granted);
        assert_eq!(session.access(View::MyRequests), Access::LoginRequired);
        assert_eq!(session.access(View::Statistics), Access::LoginRequired);
    }

    #[test]
    fn plain_users_cannot_open_admin_views() {
        let session = signed_in(Role::User);
        assert_eq!(session.access(View::Borrowed), Access::Granted);
        assert_eq!(session.access(View::ManageUsers), Access::AdminRequired);
    }

    #[test]
    fn admins_open_everything() {
        let session = signed_in(Role::Admin);
        for view in View::iter() {
            assert_eq!(session.access(view), Access::Granted, "{view}");
        }
    }

    #[test]
    fn nav_matches_role() {
        assert_eq!(
            Session::default().nav(),
            vec![View::Catalog, View::Login, View::Register]
        );
        assert_eq!(
            signed_in(Role::User).nav(),
            vec![
                View::Catalog,
                View::Dashboard,
                View::MyRequests,
                View::Borrowed,
                View::Profile
            ]
        );
        assert_eq!(
            signed_in(Role::Admin).nav(),
            vec![
                View::Catalog,
                View::AdminDashboard,
                View::ManageBooks,
                View::ManageUsers,
                View::RequestQueue,
                View::Statistics
            ]
        );
    }
}
