//! Hash-based routing.
//!
//! The only routed information is the URL fragment. A hash that ends with a
//! rover key shows that rover's gallery; anything else shows the home page.
//! There is no "not found" page.

use marsview_types::Rover;

/// A page the client can show.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// Navigation plus the picture of the day.
    Home,
    /// Photo gallery of one rover.
    Gallery(Rover),
}

/// Select the route for a `location.hash` value.
///
/// Rovers are tried in [`Rover::ALL`] order and the first whose key ends
/// the hash wins, so `#curiosity` and `#archive/curiosity` both route to
/// Curiosity. Matching is case-sensitive.
pub fn route_for(hash: &str) -> Route {
    Rover::ALL
        .into_iter()
        .find(|rover| hash.ends_with(rover.key()))
        .map_or(Route::Home, Route::Gallery)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_rover_hash() {
        assert_eq!(route_for("#curiosity"), Route::Gallery(Rover::Curiosity));
        assert_eq!(route_for("#spirit"), Route::Gallery(Rover::Spirit));
    }

    #[test]
    fn suffix_after_a_path() {
        assert_eq!(
            route_for("#foo/opportunity"),
            Route::Gallery(Rover::Opportunity)
        );
    }

    #[test]
    fn empty_and_unknown_hashes_go_home() {
        assert_eq!(route_for(""), Route::Home);
        assert_eq!(route_for("#"), Route::Home);
        assert_eq!(route_for("#home"), Route::Home);
        assert_eq!(route_for("#perseverance"), Route::Home);
    }

    #[test]
    fn rover_must_end_the_hash() {
        assert_eq!(route_for("#spirit/photos"), Route::Home);
    }

    #[test]
    fn matching_is_case_sensitive() {
        assert_eq!(route_for("#Curiosity"), Route::Home);
    }
}
