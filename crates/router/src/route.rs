//! Route patterns and href matching.
//!
//! Matching is deliberately small: static segments and `:param` captures,
//! first registered match wins. Anything richer belongs to the host.

use rustc_hash::FxHashMap;

/// A registered route pattern.
#[derive(Debug, Clone)]
pub struct Route {
	id: &'static str,
	path: &'static str,
}

impl Route {
	/// Registers a pattern like `/user/:id`.
	pub fn new(id: &'static str, path: &'static str) -> Self {
		Self { id, path }
	}

	/// The route's identity, referenced by loaders.
	pub fn id(&self) -> &'static str {
		self.id
	}

	/// The registered pattern.
	pub fn path(&self) -> &'static str {
		self.path
	}
}

/// A matched route with captured `:param` segments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteMatch {
	/// The matched route's id.
	pub route_id: &'static str,
	/// Captured parameter values by name.
	pub params: FxHashMap<String, String>,
}

/// Splits an href into pathname and search text at the first `?`.
pub(crate) fn split_href(href: &str) -> (&str, &str) {
	match href.split_once('?') {
		Some((pathname, search)) => (pathname, search),
		None => (href, ""),
	}
}

/// Finds the first registered route matching `pathname`.
pub(crate) fn match_route(routes: &[Route], pathname: &str) -> Option<RouteMatch> {
	routes.iter().find_map(|route| match_path(route, pathname))
}

fn match_path(route: &Route, pathname: &str) -> Option<RouteMatch> {
	let pattern: Vec<&str> = segments(route.path);
	let actual: Vec<&str> = segments(pathname);
	if pattern.len() != actual.len() {
		return None;
	}
	let mut params = FxHashMap::default();
	for (pat, seg) in pattern.iter().zip(actual.iter()) {
		if let Some(name) = pat.strip_prefix(':') {
			params.insert(name.to_string(), (*seg).to_string());
		} else if pat != seg {
			return None;
		}
	}
	Some(RouteMatch { route_id: route.id, params })
}

fn segments(path: &str) -> Vec<&str> {
	path.split('/').filter(|segment| !segment.is_empty()).collect()
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn static_segments_must_match_exactly() {
		let routes = [Route::new("home", "/"), Route::new("about", "/about")];
		assert_eq!(match_route(&routes, "/about").unwrap().route_id, "about");
		assert!(match_route(&routes, "/missing").is_none());
	}

	#[test]
	fn params_are_captured_by_name() {
		let routes = [Route::new("user", "/user/:id/:tab")];
		let matched = match_route(&routes, "/user/42/posts").unwrap();
		assert_eq!(matched.params.get("id").map(String::as_str), Some("42"));
		assert_eq!(matched.params.get("tab").map(String::as_str), Some("posts"));
	}

	#[test]
	fn first_registered_match_wins() {
		let routes = [Route::new("exact", "/a/b"), Route::new("param", "/a/:x")];
		assert_eq!(match_route(&routes, "/a/b").unwrap().route_id, "exact");
		assert_eq!(match_route(&routes, "/a/c").unwrap().route_id, "param");
	}

	#[test]
	fn segment_count_must_agree() {
		let routes = [Route::new("user", "/user/:id")];
		assert!(match_route(&routes, "/user").is_none());
		assert!(match_route(&routes, "/user/1/extra").is_none());
	}

	#[test]
	fn href_splits_at_the_first_question_mark() {
		assert_eq!(split_href("/a/b?x=1&y=2"), ("/a/b", "x=1&y=2"));
		assert_eq!(split_href("/a/b"), ("/a/b", ""));
		assert_eq!(split_href("/a?x=?y"), ("/a", "x=?y"));
	}
}
