//! US state names, their USPS abbreviations, and the best-effort mapping
//! from a free-text location back to a state.

/// (full name, USPS abbreviation)
pub const STATES: &[(&str, &str)] = &[
    ("Alabama", "AL"),
    ("Alaska", "AK"),
    ("Arizona", "AZ"),
    ("Arkansas", "AR"),
    ("California", "CA"),
    ("Colorado", "CO"),
    ("Connecticut", "CT"),
    ("Delaware", "DE"),
    ("District of Columbia", "DC"),
    ("Florida", "FL"),
    ("Georgia", "GA"),
    ("Hawaii", "HI"),
    ("Idaho", "ID"),
    ("Illinois", "IL"),
    ("Indiana", "IN"),
    ("Iowa", "IA"),
    ("Kansas", "KS"),
    ("Kentucky", "KY"),
    ("Louisiana", "LA"),
    ("Maine", "ME"),
    ("Maryland", "MD"),
    ("Massachusetts", "MA"),
    ("Michigan", "MI"),
    ("Minnesota", "MN"),
    ("Mississippi", "MS"),
    ("Missouri", "MO"),
    ("Montana", "MT"),
    ("Nebraska", "NE"),
    ("Nevada", "NV"),
    ("New Hampshire", "NH"),
    ("New Jersey", "NJ"),
    ("New Mexico", "NM"),
    ("New York", "NY"),
    ("North Carolina", "NC"),
    ("North Dakota", "ND"),
    ("Ohio", "OH"),
    ("Oklahoma", "OK"),
    ("Oregon", "OR"),
    ("Pennsylvania", "PA"),
    ("Rhode Island", "RI"),
    ("South Carolina", "SC"),
    ("South Dakota", "SD"),
    ("Tennessee", "TN"),
    ("Texas", "TX"),
    ("Utah", "UT"),
    ("Vermont", "VT"),
    ("Virginia", "VA"),
    ("Washington", "WA"),
    ("West Virginia", "WV"),
    ("Wisconsin", "WI"),
    ("Wyoming", "WY"),
    ("Puerto Rico", "PR"),
    ("Guam", "GU"),
    ("Virgin Islands", "VI"),
];

/// Full state name for a two-letter abbreviation (case-insensitive).
pub fn name_for_abbreviation(abbr: &str) -> Option<&'static str> {
    STATES
        .iter()
        .find(|(_, a)| a.eq_ignore_ascii_case(abbr))
        .map(|(name, _)| *name)
}

/// Guess the state a location string belongs to.
///
/// - `"Dallas-Fort Worth, TX"` → `Texas` (a `", XX"` suffix naming a known
///   abbreviation; cross-state areas such as `", GA-SC"` resolve to the
///   first state listed)
/// - `"Texas"` → `Texas` (no comma: taken literally)
/// - `"Springfield, Somewhere"` → `None`
///
/// A bare city name without a suffix comes back as a "state" too; callers
/// treat the result as a hint, never as validated input.
pub fn derive_state(location: &str) -> Option<String> {
    let location = location.trim();
    if location.is_empty() {
        return None;
    }

    match location.rsplit_once(',') {
        Some((_, suffix)) => {
            let first = suffix.trim().split('-').next().unwrap_or_default();
            if first.len() == 2 {
                name_for_abbreviation(first).map(str::to_string)
            } else {
                None
            }
        }
        None => Some(location.to_string()),
    }
}
