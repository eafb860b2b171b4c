//! Where to send a user after they sign in.

use serde::{Deserialize, Serialize};
use yew_router::Routable;
use yew_router::prelude::Navigator;

use crate::Route;

/// Query string of the sign-in page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SignInQuery {
    pub redirect: Option<String>,
}

/// The sign-in query that brings the user back to `path` and `query`, as
/// given by the router location (`query` may keep its leading `?`).
pub fn sign_in_query(path: &str, query: &str) -> SignInQuery {
    let query = query.strip_prefix('?').unwrap_or(query);
    let redirect = if query.is_empty() {
        path.to_string()
    } else {
        format!("{path}?{query}")
    };
    SignInQuery {
        redirect: Some(redirect),
    }
}

/// A route plus the decoded query parameters it was opened with.
#[derive(Debug, Clone, PartialEq)]
pub struct RedirectTarget {
    pub route: Route,
    pub query: Vec<(String, String)>,
}

impl From<Route> for RedirectTarget {
    fn from(route: Route) -> Self {
        Self {
            route,
            query: Vec::new(),
        }
    }
}

impl RedirectTarget {
    pub fn navigate(&self, navigator: &Navigator) {
        if self.query.is_empty() {
            navigator.replace(&self.route);
            return;
        }
        if let Err(e) = navigator.replace_with_query(&self.route, &self.query)
        {
            tracing::warn!("could not restore query: {e}");
            navigator.replace(&self.route);
        }
    }
}

/// The location to open after signing in.
///
/// Only same-origin absolute paths are honoured; anything else, and the
/// sign-in and not-found pages themselves, lead to the dashboard. The query
/// string of an accepted path is kept.
pub fn sign_in_redirect_target(redirect: Option<&str>) -> RedirectTarget {
    let Some(redirect) = redirect.filter(|path| is_local_path(path)) else {
        return Route::Home.into();
    };
    let (path, query) = redirect.split_once('?').unwrap_or((redirect, ""));
    match Route::recognize(path) {
        Some(Route::SignIn | Route::NotFound) | None => Route::Home.into(),
        Some(route) => RedirectTarget {
            route,
            query: query_pairs(query),
        },
    }
}

fn is_local_path(path: &str) -> bool {
    path.starts_with('/') && !path.starts_with("//") && !path.contains('\\')
}

fn query_pairs(query: &str) -> Vec<(String, String)> {
    query
        .split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            (decode(key), decode(value))
        })
        .collect()
}

fn decode(raw: &str) -> String {
    let raw = raw.replace('+', " ");
    match urlencoding::decode(&raw) {
        Ok(decoded) => decoded.into_owned(),
        Err(_) => raw,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn route(redirect: Option<&str>) -> Route {
        sign_in_redirect_target(redirect).route
    }

    #[test]
    fn known_paths_are_kept() {
        assert_eq!(route(Some("/appointments")), Route::Appointments);
        assert_eq!(route(Some("/statistics")), Route::Statistics);
        assert!(sign_in_redirect_target(Some("/statistics")).query.is_empty());
    }

    #[test]
    fn missing_or_foreign_targets_go_home() {
        assert_eq!(route(None), Route::Home);
        assert_eq!(route(Some("https://evil.example/")), Route::Home);
        assert_eq!(route(Some("//evil.example/appointments")), Route::Home);
        assert_eq!(route(Some("/\\evil.example")), Route::Home);
    }

    #[test]
    fn sign_in_and_unknown_pages_go_home() {
        assert_eq!(route(Some("/sign-in")), Route::Home);
        assert_eq!(route(Some("/no-such-page")), Route::Home);
        assert_eq!(route(Some("/no-such-page?a=b")), Route::Home);
    }

    #[test]
    fn query_survives_the_trip_through_sign_in() {
        let query = sign_in_query("/appointments", "?status=PENDING");
        assert_eq!(
            query.redirect.as_deref(),
            Some("/appointments?status=PENDING")
        );

        let target = sign_in_redirect_target(query.redirect.as_deref());
        assert_eq!(
            target,
            RedirectTarget {
                route: Route::Appointments,
                query: vec![("status".into(), "PENDING".into())],
            }
        );
    }

    #[test]
    fn query_values_are_decoded() {
        let query = sign_in_query(
            "/appointments",
            "status=APPROVED&note=second%20dose&from=2025-03-03&flag",
        );
        let target = sign_in_redirect_target(query.redirect.as_deref());
        assert_eq!(target.route, Route::Appointments);
        assert_eq!(
            target.query,
            vec![
                ("status".to_string(), "APPROVED".to_string()),
                ("note".to_string(), "second dose".to_string()),
                ("from".to_string(), "2025-03-03".to_string()),
                ("flag".to_string(), String::new()),
            ]
        );
    }

    #[test]
    fn path_without_query_is_saved_as_is() {
        assert_eq!(
            sign_in_query("/vaccination-plans", "").redirect.as_deref(),
            Some("/vaccination-plans")
        );
        assert_eq!(
            sign_in_query("/inventory", "?").redirect.as_deref(),
            Some("/inventory")
        );
    }
}
