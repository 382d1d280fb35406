//! Location extraction from free-form titles.
//!
//! Three ordered passes: city → district → neighborhood. The district and
//! neighborhood passes prefer the leftmost candidate the gazetteer confirms,
//! falling back to the leftmost raw candidate. Confidence is derived after
//! all three passes.

use super::gazetteer::Gazetteer;
use super::types::{Confidence, LocationResult};
use regex::Regex;
use std::sync::LazyLock;

/// Canonical name of the capital. Gazetteer districts belong to it.
pub const CAPITAL: &str = "서울특별시";

/// Recognised city short names and their canonical form.
const CITIES: &[(&str, &str)] = &[
    ("서울", CAPITAL),
    ("부산", "부산"),
    ("대구", "대구"),
    ("인천", "인천"),
    ("광주", "광주"),
    ("대전", "대전"),
    ("울산", "울산"),
    ("세종", "세종"),
];

static CITY_RE: LazyLock<Regex> = LazyLock::new(|| {
    let names: Vec<&str> = CITIES.iter().map(|(short, _)| *short).collect();
    Regex::new(&format!("({})", names.join("|"))).unwrap()
});

static DISTRICT_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[가-힣]+구").unwrap());

// 동 (urban), 읍 (town), 면 (rural township)
static NEIGHBORHOOD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[가-힣]+동|[가-힣]+읍|[가-힣]+면").unwrap());

/// Outcome of the district or neighborhood pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PassMatch {
    pub name: String,
    /// Confirmed by the gazetteer.
    pub validated: bool,
}

impl PassMatch {
    fn validated(name: &str) -> Self {
        Self { name: name.to_string(), validated: true }
    }

    fn raw(name: &str) -> Self {
        Self { name: name.to_string(), validated: false }
    }
}

/// Leftmost city short name, normalised to its canonical form.
pub fn resolve_city(label: &str) -> Option<String> {
    let short = CITY_RE.find(label)?.as_str();
    CITIES
        .iter()
        .find(|(s, _)| *s == short)
        .map(|(_, canonical)| canonical.to_string())
}

/// Leftmost district candidate that is a gazetteer key, else the leftmost
/// candidate unvalidated.
pub fn resolve_district(label: &str, gazetteer: &Gazetteer) -> Option<PassMatch> {
    let candidates: Vec<&str> = DISTRICT_RE.find_iter(label).map(|m| m.as_str()).collect();
    pick(&candidates, |d| gazetteer.contains_district(d))
}

/// Leftmost neighborhood candidate listed under `district`, else the
/// leftmost candidate unvalidated.
pub fn resolve_neighborhood(label: &str, district: &str, gazetteer: &Gazetteer) -> Option<PassMatch> {
    let candidates: Vec<&str> = NEIGHBORHOOD_RE.find_iter(label).map(|m| m.as_str()).collect();
    pick(&candidates, |n| gazetteer.is_neighborhood_of(district, n))
}

fn pick(candidates: &[&str], is_known: impl Fn(&str) -> bool) -> Option<PassMatch> {
    if let Some(known) = candidates.iter().find(|c| is_known(c)) {
        return Some(PassMatch::validated(known));
    }
    candidates.first().map(|c| PassMatch::raw(c))
}

/// Grade an extraction. Gazetteer validation of the neighborhood is the only
/// path to `High`; any unconfirmed neighborhood is `Medium`; a city or
/// district alone is `Low`.
///
/// An unconfirmed neighborhood stays `Medium` even when no city was found,
/// rather than dropping to `Low` as a city-and-district-and-neighborhood
/// rule would.
pub fn derive_confidence(
    city: Option<&str>,
    district: Option<&str>,
    neighborhood: Option<&PassMatch>,
) -> Confidence {
    match neighborhood {
        Some(n) if n.validated => Confidence::High,
        Some(_) => Confidence::Medium,
        None if city.is_some() || district.is_some() => Confidence::Low,
        None => Confidence::None,
    }
}

/// Extract city, district and neighborhood from one label.
pub fn extract(label: &str, gazetteer: &Gazetteer) -> LocationResult {
    let mut city = resolve_city(label);

    let district = resolve_district(label, gazetteer);
    if district.as_ref().is_some_and(|d| d.validated) {
        city = Some(CAPITAL.to_string());
    }

    let neighborhood = district
        .as_ref()
        .and_then(|d| resolve_neighborhood(label, &d.name, gazetteer));

    let confidence = derive_confidence(
        city.as_deref(),
        district.as_ref().map(|d| d.name.as_str()),
        neighborhood.as_ref(),
    );

    let result = LocationResult {
        city,
        district_validated: district.as_ref().is_some_and(|d| d.validated),
        district: district.map(|d| d.name),
        neighborhood_validated: neighborhood.as_ref().is_some_and(|n| n.validated),
        neighborhood: neighborhood.map(|n| n.name),
        confidence,
    };
    tracing::debug!(label, result = %result.display_line(), "extracted");
    result
}
