//! Category partitioning and segment filtering.
//!
//! Everything here is pure and cheap enough to recompute on every render.
//! Categories form a closed set; records with anything else never make it
//! past content loading, so there is no catch-all bucket.

use std::str::FromStr;

use guestapp_core::{Category, Location};
use serde::{Deserialize, Serialize};

/// The active filter: everything, or a single category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Segment {
    #[default]
    All,
    Only(Category),
}

impl Segment {
    #[must_use]
    pub fn matches(self, category: Category) -> bool {
        match self {
            Segment::All => true,
            Segment::Only(wanted) => wanted == category,
        }
    }

    /// `All` followed by one segment per category, in bucket order.
    pub fn options() -> impl Iterator<Item = Segment> {
        std::iter::once(Segment::All).chain(Category::ALL.into_iter().map(Segment::Only))
    }
}

impl std::fmt::Display for Segment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Segment::All => f.write_str("all"),
            Segment::Only(category) => write!(f, "{category}"),
        }
    }
}

impl FromStr for Segment {
    type Err = guestapp_core::content::UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "all" {
            Ok(Segment::All)
        } else {
            s.parse::<Category>().map(Segment::Only)
        }
    }
}

impl TryFrom<String> for Segment {
    type Error = guestapp_core::content::UnknownCategory;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Segment> for String {
    fn from(segment: Segment) -> Self {
        segment.to_string()
    }
}

/// Locations partitioned by category, content order preserved per bucket.
#[derive(Debug, Clone, Default)]
pub struct CategoryGroups<'a> {
    buckets: [Vec<&'a Location>; 4],
}

impl<'a> CategoryGroups<'a> {
    #[must_use]
    pub fn get(&self, category: Category) -> &[&'a Location] {
        &self.buckets[slot(category)]
    }

    #[must_use]
    pub fn count(&self, category: Category) -> usize {
        self.buckets[slot(category)].len()
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.buckets.iter().map(Vec::len).sum()
    }

    /// Buckets in category order, including empty ones.
    pub fn iter(&self) -> impl Iterator<Item = (Category, &[&'a Location])> + '_ {
        Category::ALL
            .into_iter()
            .map(move |category| (category, self.get(category)))
    }
}

fn slot(category: Category) -> usize {
    match category {
        Category::Restaurant => 0,
        Category::Beach => 1,
        Category::Nightlife => 2,
        Category::Activity => 3,
    }
}

#[must_use]
pub fn group_by_category(locations: &[Location]) -> CategoryGroups<'_> {
    let mut groups = CategoryGroups::default();
    for location in locations {
        groups.buckets[slot(location.category)].push(location);
    }
    groups
}

/// The order-preserving subsequence of `locations` selected by `segment`.
#[must_use]
pub fn filter(locations: &[Location], segment: Segment) -> Vec<&Location> {
    locations
        .iter()
        .filter(|location| segment.matches(location.category))
        .collect()
}

/// Per-segment counts over the unfiltered set, for segment labels.
#[must_use]
pub fn segment_counts(locations: &[Location]) -> Vec<(Segment, usize)> {
    let groups = group_by_category(locations);
    Segment::options()
        .map(|segment| {
            let count = match segment {
                Segment::All => locations.len(),
                Segment::Only(category) => groups.count(category),
            };
            (segment, count)
        })
        .collect()
}
