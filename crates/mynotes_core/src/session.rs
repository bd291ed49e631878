//! Session shell: authentication state and view gating.
//!
//! # Responsibility
//! - Own the signed-in session as an explicit value with a clear lifecycle.
//! - Decide which route may render for the current authentication state.
//! - Carry the theme preference for the header.
//!
//! # Invariants
//! - A [`Session`] exists only between a successful resolve/sign-in and the
//!   next successful sign-out.
//! - Protected routes never render while signed out or resolving.

use crate::model::note::{parse_note_id, NoteId, UserId};
use crate::theme::{Theme, ThemeError, ThemePreference};
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Authenticated principal as reported by the auth provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub user_id: UserId,
    pub email: String,
}

/// Live session for one principal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    principal: Principal,
}

impl Session {
    pub fn new(principal: Principal) -> Self {
        Self { principal }
    }

    pub fn principal(&self) -> &Principal {
        &self.principal
    }

    pub fn user_id(&self) -> &UserId {
        &self.principal.user_id
    }

    pub fn email(&self) -> &str {
        self.principal.email.as_str()
    }
}

/// Failure reported by the external authentication provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthError {
    message: String,
}

impl AuthError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        self.message.as_str()
    }
}

impl Display for AuthError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "authentication failed: {}", self.message)
    }
}

impl Error for AuthError {}

/// External authentication provider contract.
pub trait AuthProvider {
    /// Returns the principal of an already established session, if any.
    fn resolve_session(&self) -> Result<Option<Principal>, AuthError>;
    /// Runs the provider's sign-in flow.
    fn sign_in(&self) -> Result<Principal, AuthError>;
    /// Ends the provider-side session.
    fn sign_out(&self) -> Result<(), AuthError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    /// Provider has not answered yet.
    Resolving,
    SignedOut,
    SignedIn(Session),
}

/// Application views addressable by path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Login,
    Dashboard,
    NewNote,
    EditNote(NoteId),
}

impl Route {
    /// Maps a path to a route; anything unrecognized lands on the dashboard.
    pub fn parse(path: &str) -> Self {
        let trimmed = path.trim().trim_end_matches('/');
        match trimmed {
            "/login" => Self::Login,
            "/notes/new" => Self::NewNote,
            _ => match trimmed.strip_prefix("/notes/") {
                Some(raw_id) if !raw_id.contains('/') => match parse_note_id(raw_id) {
                    Ok(note_id) => Self::EditNote(note_id),
                    Err(_) => Self::Dashboard,
                },
                _ => Self::Dashboard,
            },
        }
    }

    pub fn path(&self) -> String {
        match self {
            Self::Login => "/login".to_string(),
            Self::Dashboard => "/".to_string(),
            Self::NewNote => "/notes/new".to_string(),
            Self::EditNote(note_id) => format!("/notes/{note_id}"),
        }
    }

    pub fn is_protected(&self) -> bool {
        !matches!(self, Self::Login)
    }
}

/// Gate decision for one navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gate {
    Loading,
    Redirect(Route),
    Render(Route),
}

/// Header data shown while signed in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderModel {
    pub email: String,
    pub theme: Theme,
    /// Theme the toggle switches to.
    pub toggle_target: Theme,
}

/// Top-level shell tying auth state, gating and theme together.
pub struct AppShell<A: AuthProvider> {
    provider: A,
    state: SessionState,
    theme: ThemePreference,
}

impl<A: AuthProvider> AppShell<A> {
    /// Starts in [`SessionState::Resolving`]; call [`AppShell::resolve`] next.
    pub fn new(provider: A, theme: ThemePreference) -> Self {
        Self {
            provider,
            state: SessionState::Resolving,
            theme,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn session(&self) -> Option<&Session> {
        match &self.state {
            SessionState::SignedIn(session) => Some(session),
            _ => None,
        }
    }

    pub fn is_resolving(&self) -> bool {
        matches!(self.state, SessionState::Resolving)
    }

    /// Asks the provider for an existing session; `Ok(true)` when signed in.
    ///
    /// A provider error leaves the shell signed out.
    pub fn resolve(&mut self) -> Result<bool, AuthError> {
        match self.provider.resolve_session() {
            Ok(Some(principal)) => {
                info!("event=session_resolve module=session status=ok signed_in=true");
                self.state = SessionState::SignedIn(Session::new(principal));
            }
            Ok(None) => {
                info!("event=session_resolve module=session status=ok signed_in=false");
                self.state = SessionState::SignedOut;
            }
            Err(err) => {
                warn!("event=session_resolve module=session status=error error={err}");
                self.state = SessionState::SignedOut;
                return Err(err);
            }
        }
        Ok(self.session().is_some())
    }

    /// Runs the provider sign-in and starts a fresh session.
    pub fn sign_in(&mut self) -> Result<(), AuthError> {
        let principal = self.provider.sign_in().inspect_err(|err| {
            warn!("event=session_sign_in module=session status=error error={err}");
        })?;
        info!("event=session_sign_in module=session status=ok");
        self.state = SessionState::SignedIn(Session::new(principal));
        Ok(())
    }

    /// Ends the session and hands the torn-down value back to the caller.
    ///
    /// On provider failure the session stays active.
    pub fn sign_out(&mut self) -> Result<Option<Session>, AuthError> {
        self.provider.sign_out().inspect_err(|err| {
            warn!("event=session_sign_out module=session status=error error={err}");
        })?;
        info!("event=session_sign_out module=session status=ok");
        match std::mem::replace(&mut self.state, SessionState::SignedOut) {
            SessionState::SignedIn(session) => Ok(Some(session)),
            _ => Ok(None),
        }
    }

    pub fn gate(&self, route: Route) -> Gate {
        match (&self.state, route) {
            (SessionState::Resolving, route) if route.is_protected() => Gate::Loading,
            (SessionState::SignedOut, route) if route.is_protected() => {
                Gate::Redirect(Route::Login)
            }
            (SessionState::SignedIn(_), Route::Login) => Gate::Redirect(Route::Dashboard),
            (_, route) => Gate::Render(route),
        }
    }

    pub fn header(&self) -> Option<HeaderModel> {
        self.session().map(|session| HeaderModel {
            email: session.email().to_string(),
            theme: self.theme.theme(),
            toggle_target: self.theme.theme().toggled(),
        })
    }

    pub fn theme(&self) -> Theme {
        self.theme.theme()
    }

    pub fn toggle_theme(&mut self) -> Result<Theme, ThemeError> {
        self.theme.toggle()
    }
}
