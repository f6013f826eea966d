//! Bundled discovery content: locations, their optional rich details, and the
//! load-time validation that keeps bad records out of the view.
//!
//! Content is read once and never mutated. Records that violate the schema
//! are excluded and reported as [`ContentIssue`]s rather than coerced; in
//! strict mode any issue fails the load.

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The closed set of discovery categories.
///
/// Declaration order is the display order of list-sheet buckets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Restaurant,
    Beach,
    Nightlife,
    Activity,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::Restaurant,
        Category::Beach,
        Category::Nightlife,
        Category::Activity,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Category::Restaurant => "restaurant",
            Category::Beach => "beach",
            Category::Nightlife => "nightlife",
            Category::Activity => "activity",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown category '{0}'")]
pub struct UnknownCategory(pub String);

impl FromStr for Category {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "restaurant" => Ok(Category::Restaurant),
            "beach" => Ok(Category::Beach),
            "nightlife" => Ok(Category::Nightlife),
            "activity" => Ok(Category::Activity),
            other => Err(UnknownCategory(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    /// Both components finite and inside the WGS84 ranges.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && (-90.0..=90.0).contains(&self.latitude)
            && (-180.0..=180.0).contains(&self.longitude)
    }
}

/// A point of interest shown on the discovery map.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Location {
    pub id: String,
    pub name: String,
    pub category: Category,
    pub description: String,
    pub address: String,
    #[serde(flatten)]
    pub coordinates: Coordinates,
}

/// Daily opening window. When `close <= open` the window crosses midnight and
/// closes on the following day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct OperatingHours {
    pub open: NaiveTime,
    pub close: NaiveTime,
}

impl OperatingHours {
    #[must_use]
    pub fn crosses_midnight(&self) -> bool {
        self.close <= self.open
    }
}

/// Optional rich detail for a [`Location`], keyed by location id.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LocationDetail {
    /// Average rating on a 0–5 scale.
    pub rating: f64,
    pub review_count: u32,
    pub price_range: String,
    pub cuisine: String,
    /// Free-text distance label, e.g. `"12 min walk"`.
    pub distance: String,
    pub photo: Option<String>,
    pub hours: Option<OperatingHours>,
}

// ---------------------------------------------------------------------------
// Issues and errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Error)]
pub enum IssueKind {
    #[error("unknown category '{0}'")]
    UnknownCategory(String),

    #[error("invalid coordinate ({latitude}, {longitude})")]
    InvalidCoordinate { latitude: f64, longitude: f64 },

    #[error("duplicate location id")]
    DuplicateId,

    #[error("required field '{0}' is empty")]
    EmptyField(&'static str),

    #[error("invalid time '{0}', expected HH:MM")]
    InvalidTime(String),

    #[error("rating {0} outside 0-5")]
    RatingOutOfRange(f64),

    #[error("detail has no matching location")]
    OrphanDetail,

    #[error("malformed record: {0}")]
    Malformed(String),
}

/// A single rejected record. `record` is the location id when one could be
/// read, otherwise the record's position as `#<index>`.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{record}: {kind}")]
pub struct ContentIssue {
    pub record: String,
    pub kind: IssueKind,
}

impl ContentIssue {
    fn new(record: impl Into<String>, kind: IssueKind) -> Self {
        Self {
            record: record.into(),
            kind,
        }
    }
}

#[derive(Debug, Error)]
pub enum ContentError {
    #[error("failed to read content file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse content file {path}: {reason}")]
    Parse { path: String, reason: String },

    #[error("content failed validation with {} issue(s)", .0.len())]
    Invalid(Vec<ContentIssue>),
}

// ---------------------------------------------------------------------------
// Raw wire shapes
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct RawLocation {
    id: String,
    name: String,
    category: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    address: String,
    latitude: f64,
    longitude: f64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawDetail {
    rating: f64,
    review_count: u32,
    #[serde(default)]
    price_range: String,
    #[serde(default)]
    cuisine: String,
    #[serde(default)]
    distance: String,
    photo: Option<String>,
    hours: Option<RawHours>,
}

#[derive(Debug, Deserialize)]
struct RawHours {
    open: String,
    close: String,
}

fn parse_wall_clock(raw: &str) -> Result<NaiveTime, IssueKind> {
    NaiveTime::parse_from_str(raw.trim(), "%H:%M")
        .map_err(|_| IssueKind::InvalidTime(raw.to_string()))
}

fn parse_location(index: usize, value: serde_json::Value) -> Result<Location, ContentIssue> {
    let fallback_record = value
        .get("id")
        .and_then(serde_json::Value::as_str)
        .map_or_else(|| format!("#{index}"), str::to_string);

    let raw: RawLocation = serde_json::from_value(value)
        .map_err(|e| ContentIssue::new(&fallback_record, IssueKind::Malformed(e.to_string())))?;

    let category = raw
        .category
        .parse::<Category>()
        .map_err(|UnknownCategory(c)| ContentIssue::new(&raw.id, IssueKind::UnknownCategory(c)))?;

    Ok(Location {
        id: raw.id,
        name: raw.name,
        category,
        description: raw.description,
        address: raw.address,
        coordinates: Coordinates {
            latitude: raw.latitude,
            longitude: raw.longitude,
        },
    })
}

fn parse_detail(id: &str, value: serde_json::Value) -> Result<LocationDetail, ContentIssue> {
    let raw: RawDetail = serde_json::from_value(value)
        .map_err(|e| ContentIssue::new(id, IssueKind::Malformed(e.to_string())))?;

    let hours = raw
        .hours
        .map(|h| -> Result<OperatingHours, IssueKind> {
            Ok(OperatingHours {
                open: parse_wall_clock(&h.open)?,
                close: parse_wall_clock(&h.close)?,
            })
        })
        .transpose()
        .map_err(|kind| ContentIssue::new(id, kind))?;

    Ok(LocationDetail {
        rating: raw.rating,
        review_count: raw.review_count,
        price_range: raw.price_range,
        cuisine: raw.cuisine,
        distance: raw.distance,
        photo: raw.photo.filter(|p| !p.trim().is_empty()),
        hours,
    })
}

// ---------------------------------------------------------------------------
// Store
// ---------------------------------------------------------------------------

/// Where the two content documents live. `.yaml`/`.yml` files are parsed as
/// YAML, everything else as JSON.
#[derive(Debug, Clone)]
pub struct ContentPaths {
    pub locations: PathBuf,
    pub details: PathBuf,
}

/// The outcome of a lenient load: the usable store plus everything that was
/// rejected on the way in.
#[derive(Debug)]
pub struct LoadedContent {
    pub store: ContentStore,
    pub issues: Vec<ContentIssue>,
}

impl LoadedContent {
    /// Convert into a store, failing if any record was rejected.
    ///
    /// # Errors
    ///
    /// Returns [`ContentError::Invalid`] carrying every issue.
    pub fn into_strict(self) -> Result<ContentStore, ContentError> {
        if self.issues.is_empty() {
            Ok(self.store)
        } else {
            Err(ContentError::Invalid(self.issues))
        }
    }
}

/// Immutable, read-only view of the bundled locations and their details.
#[derive(Debug, Clone, Default)]
pub struct ContentStore {
    locations: Vec<Location>,
    index: HashMap<String, usize>,
    details: HashMap<String, LocationDetail>,
}

impl ContentStore {
    /// Read and validate both content documents.
    ///
    /// # Errors
    ///
    /// Returns [`ContentError::Io`] or [`ContentError::Parse`] when a document
    /// cannot be read or is not the expected shape, and
    /// [`ContentError::Invalid`] when `strict` is set and any record was
    /// rejected.
    pub fn load(paths: &ContentPaths, strict: bool) -> Result<LoadedContent, ContentError> {
        let locations = read_document(&paths.locations)?;
        let serde_json::Value::Array(locations) = locations else {
            return Err(ContentError::Parse {
                path: paths.locations.display().to_string(),
                reason: "expected an array of locations".to_string(),
            });
        };

        let details = read_document(&paths.details)?;
        let serde_json::Value::Object(details) = details else {
            return Err(ContentError::Parse {
                path: paths.details.display().to_string(),
                reason: "expected an object keyed by location id".to_string(),
            });
        };

        let loaded = Self::from_values(locations, details);
        tracing::info!(
            locations = loaded.store.len(),
            details = loaded.store.details.len(),
            rejected = loaded.issues.len(),
            "loaded discovery content"
        );

        if strict && !loaded.issues.is_empty() {
            return Err(ContentError::Invalid(loaded.issues));
        }
        Ok(loaded)
    }

    /// Build a store from already-parsed JSON values, rejecting bad records.
    #[must_use]
    pub fn from_values(
        locations: Vec<serde_json::Value>,
        details: serde_json::Map<String, serde_json::Value>,
    ) -> LoadedContent {
        let mut issues = Vec::new();

        let parsed_locations = locations
            .into_iter()
            .enumerate()
            .filter_map(|(index, value)| match parse_location(index, value) {
                Ok(location) => Some(location),
                Err(issue) => {
                    issues.push(issue);
                    None
                }
            })
            .collect::<Vec<_>>();

        let parsed_details = details
            .into_iter()
            .filter_map(|(id, value)| match parse_detail(&id, value) {
                Ok(detail) => Some((id, detail)),
                Err(issue) => {
                    issues.push(issue);
                    None
                }
            })
            .collect::<Vec<_>>();

        let mut loaded = Self::from_parts(parsed_locations, parsed_details);
        issues.append(&mut loaded.issues);
        loaded.issues = issues;
        for issue in &loaded.issues {
            tracing::warn!(record = %issue.record, reason = %issue.kind, "rejected content record");
        }
        loaded
    }

    /// Build a store from typed records, applying the semantic checks
    /// (coordinates, required fields, duplicate ids, rating range, orphans).
    #[must_use]
    pub fn from_parts<I>(locations: Vec<Location>, details: I) -> LoadedContent
    where
        I: IntoIterator<Item = (String, LocationDetail)>,
    {
        let mut issues = Vec::new();
        let mut seen = HashSet::new();
        let mut kept = Vec::with_capacity(locations.len());

        for location in locations {
            if let Some(kind) = location_problem(&location) {
                issues.push(ContentIssue::new(&location.id, kind));
                continue;
            }
            if !seen.insert(location.id.clone()) {
                issues.push(ContentIssue::new(&location.id, IssueKind::DuplicateId));
                continue;
            }
            kept.push(location);
        }

        let index = kept
            .iter()
            .enumerate()
            .map(|(i, loc)| (loc.id.clone(), i))
            .collect::<HashMap<_, _>>();

        let mut detail_map = HashMap::new();
        for (id, detail) in details {
            if !index.contains_key(&id) {
                issues.push(ContentIssue::new(id, IssueKind::OrphanDetail));
                continue;
            }
            if !detail.rating.is_finite() || !(0.0..=5.0).contains(&detail.rating) {
                issues.push(ContentIssue::new(
                    id,
                    IssueKind::RatingOutOfRange(detail.rating),
                ));
                continue;
            }
            detail_map.insert(id, detail);
        }

        LoadedContent {
            store: ContentStore {
                locations: kept,
                index,
                details: detail_map,
            },
            issues,
        }
    }

    /// All locations in content order.
    #[must_use]
    pub fn locations(&self) -> &[Location] {
        &self.locations
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Location> {
        self.index.get(id).map(|&i| &self.locations[i])
    }

    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// Rich detail for a location. `None` is the normal case for locations
    /// without curated detail.
    #[must_use]
    pub fn detail(&self, id: &str) -> Option<&LocationDetail> {
        self.details.get(id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.locations.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }
}

fn location_problem(location: &Location) -> Option<IssueKind> {
    if location.id.trim().is_empty() {
        return Some(IssueKind::EmptyField("id"));
    }
    if location.name.trim().is_empty() {
        return Some(IssueKind::EmptyField("name"));
    }
    if !location.coordinates.is_valid() {
        return Some(IssueKind::InvalidCoordinate {
            latitude: location.coordinates.latitude,
            longitude: location.coordinates.longitude,
        });
    }
    None
}

fn read_document(path: &Path) -> Result<serde_json::Value, ContentError> {
    let content = std::fs::read_to_string(path).map_err(|e| ContentError::Io {
        path: path.display().to_string(),
        source: e,
    })?;

    let is_yaml = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml"));

    let parsed = if is_yaml {
        serde_yaml::from_str::<serde_json::Value>(&content).map_err(|e| e.to_string())
    } else {
        serde_json::from_str::<serde_json::Value>(&content).map_err(|e| e.to_string())
    };

    parsed.map_err(|reason| ContentError::Parse {
        path: path.display().to_string(),
        reason,
    })
}

#[cfg(test)]
#[path = "content_test.rs"]
mod tests;
