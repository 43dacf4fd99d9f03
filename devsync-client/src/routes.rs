use std::str::FromStr;

use crate::error::ClientError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Home,
    Contact,
    Login,
    Register,
    CodeEditor,
    About,
    Pricing,
    Docs,
}

impl Route {
    pub const ALL: [Route; 8] = [
        Route::Home,
        Route::Contact,
        Route::Login,
        Route::Register,
        Route::CodeEditor,
        Route::About,
        Route::Pricing,
        Route::Docs,
    ];

    pub fn path(self) -> &'static str {
        match self {
            Route::Home => "/",
            Route::Contact => "/contact",
            Route::Login => "/login",
            Route::Register => "/register",
            Route::CodeEditor => "/codeEditor",
            Route::About => "/about",
            Route::Pricing => "/pricing",
            Route::Docs => "/docs",
        }
    }
}

impl FromStr for Route {
    type Err = ClientError;

    /// Matches on the path only; query and fragment are ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let path = s.split(['?', '#']).next().unwrap_or("");
        let path = if path.is_empty() { "/" } else { path };
        Route::ALL
            .into_iter()
            .find(|r| r.path() == path)
            .ok_or_else(|| ClientError::UnknownRoute(s.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavItem {
    pub name: &'static str,
    pub route: Route,
}

/// Header navigation. The editor link only shows for a logged-in session.
pub fn nav_items(logged_in: bool) -> Vec<NavItem> {
    let mut items = vec![
        NavItem {
            name: "Pricing",
            route: Route::Pricing,
        },
        NavItem {
            name: "About",
            route: Route::About,
        },
        NavItem {
            name: "Contact",
            route: Route::Contact,
        },
    ];
    if logged_in {
        items.push(NavItem {
            name: "CodeEditor",
            route: Route::CodeEditor,
        });
    }
    items
}
