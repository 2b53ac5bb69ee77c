//! Well-known navigation routes.

pub const ROOT: &str = "/";
pub const LOGIN: &str = "/login";
pub const RESET_PASSWORD: &str = "/reset-password";
pub const CONFIRM: &str = "/confirm";

/// Routes reachable without a session.
pub const PUBLIC_ROUTES: [&str; 3] = [LOGIN, RESET_PASSWORD, CONFIRM];

/// Strips query string, fragment and trailing slashes so `/login/?next=x`
/// compares equal to `/login`.
pub fn normalize(location: &str) -> &str {
    let path = location
        .split(['?', '#'])
        .next()
        .unwrap_or(location);
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() { ROOT } else { trimmed }
}

pub fn is_public(location: &str) -> bool {
    let path = normalize(location);
    PUBLIC_ROUTES.contains(&path)
}

/// Locations from which an authenticated user is sent to their home route.
pub fn is_entry_point(location: &str) -> bool {
    matches!(normalize(location), ROOT | LOGIN)
}
