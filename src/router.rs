// ABOUTME: Routes and the route guard — decides which screen the user may see.
// ABOUTME: The guard reads the session; navigation goes through an injected Navigator.

use crate::session::SessionStore;

/// The screens of the application, addressed by path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// `/`, which always forwards to the auth screen.
    Root,
    /// `/auth`, public.
    Auth,
    /// `/chat`, requires a session.
    Chat,
}

impl Route {
    pub fn path(self) -> &'static str {
        match self {
            Route::Root => "/",
            Route::Auth => "/auth",
            Route::Chat => "/chat",
        }
    }

    pub fn parse(path: &str) -> Option<Self> {
        match path {
            "/" | "" => Some(Route::Root),
            "/auth" => Some(Route::Auth),
            "/chat" => Some(Route::Chat),
            _ => None,
        }
    }

    pub fn is_protected(self) -> bool {
        matches!(self, Route::Chat)
    }
}

impl std::str::FromStr for Route {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Route::parse(s).ok_or_else(|| format!("unknown route {:?} (expected /, /auth or /chat)", s))
    }
}

/// Capability to change the current screen.
pub trait Navigator {
    fn navigate(&mut self, route: Route);
    fn current(&self) -> Route;
}

/// How many routes `History` remembers; older entries are dropped.
pub const MAX_HISTORY: usize = 16;

/// Navigator that remembers the most recent routes visited.
#[derive(Debug, Clone)]
pub struct History {
    stack: Vec<Route>,
}

impl History {
    pub fn new(initial: Route) -> Self {
        Self {
            stack: vec![initial],
        }
    }

    pub fn entries(&self) -> &[Route] {
        &self.stack
    }
}

impl Navigator for History {
    fn navigate(&mut self, route: Route) {
        tracing::debug!("navigate {} -> {}", self.current().path(), route.path());
        self.stack.push(route);
        if self.stack.len() > MAX_HISTORY {
            let excess = self.stack.len() - MAX_HISTORY;
            self.stack.drain(..excess);
        }
    }

    fn current(&self) -> Route {
        self.stack.last().copied().unwrap_or(Route::Root)
    }
}

/// Where a request for `route` actually lands given the session state.
pub fn guard(route: Route, session: &SessionStore) -> Route {
    match route {
        Route::Root => Route::Auth,
        r if r.is_protected() && !session.is_authenticated() => Route::Auth,
        other => other,
    }
}

/// Redirect the navigator if its current route is not allowed. Returns the route shown.
pub fn resolve(session: &SessionStore, navigator: &mut dyn Navigator) -> Route {
    let current = navigator.current();
    let target = guard(current, session);
    if target != current {
        navigator.navigate(target);
    }
    target
}
