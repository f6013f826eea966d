//! Presentation of the marker-detail overlay.
//!
//! Turns a [`Location`] and its optional [`LocationDetail`] into display-ready
//! values, and decides whether a drag on the overlay dismisses it.

use std::sync::LazyLock;

use chrono::{Duration, NaiveDateTime, NaiveTime};
use guestapp_core::{AppConfig, Location, LocationDetail, OperatingHours};
use regex::Regex;
use serde::Serialize;

static MINUTES_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(\d+)\s+min\b").expect("valid minutes regex"));

/// Rewrite `"<N> min"` to `"<N>m"`, leaving the rest of the label alone.
#[must_use]
pub fn normalize_distance(label: &str) -> String {
    MINUTES_RE.replace_all(label, "${1}m").into_owned()
}

/// `"2:00 AM"`, `"11:30 PM"`.
#[must_use]
pub fn format_clock(time: NaiveTime) -> String {
    time.format("%-I:%M %p").to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HoursStatus {
    pub is_open: bool,
    /// `"Closes 2:00 AM"` while open, `"Opens 7:30 AM"` while closed.
    pub label: String,
}

/// Open/closed status at `now`.
///
/// The venue is open inside `[open, close)`. A close time at or before the
/// open time belongs to the following day, so a 22:00–02:00 window is open
/// at 23:30 and still open at 01:00 from the previous evening.
#[must_use]
pub fn hours_status(hours: &OperatingHours, now: NaiveDateTime) -> HoursStatus {
    let today = now.date();
    let open_at = today.and_time(hours.open);
    let mut close_at = today.and_time(hours.close);
    if hours.crosses_midnight() {
        close_at += Duration::days(1);
    }

    // Tail of yesterday's window.
    let carried_over = hours.crosses_midnight() && now < close_at - Duration::days(1);
    if carried_over {
        return HoursStatus {
            is_open: true,
            label: format!("Closes {}", format_clock(hours.close)),
        };
    }

    if now >= open_at && now < close_at {
        return HoursStatus {
            is_open: true,
            label: format!("Closes {}", format_clock(close_at.time())),
        };
    }

    HoursStatus {
        is_open: false,
        label: format!("Opens {}", format_clock(hours.open)),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Star {
    Full,
    Half,
    Empty,
}

/// Five star slots for a 0–5 rating.
#[must_use]
pub fn rating_stars(rating: f64) -> [Star; 5] {
    let mut stars = [Star::Empty; 5];
    for (star, lower) in stars.iter_mut().zip([0.0, 1.0, 2.0, 3.0, 4.0]) {
        *star = if rating >= lower + 1.0 {
            Star::Full
        } else if rating > lower {
            Star::Half
        } else {
            Star::Empty
        };
    }
    stars
}

/// en-US grouping: `1284` → `"1,284"`.
#[must_use]
pub fn format_count(count: u32) -> String {
    let digits = count.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DetailSummary {
    pub rating_label: String,
    pub stars: [Star; 5],
    pub review_count_label: String,
    pub price_range: String,
    pub cuisine: String,
    pub hours: Option<HoursStatus>,
    pub distance: String,
    pub photo: Option<String>,
}

impl DetailSummary {
    /// The status row under the cuisine line. Compact joins everything with
    /// `·`; the default variant leaves distance for its own line.
    #[must_use]
    pub fn status_line(&self, compact: bool) -> String {
        let mut parts = Vec::new();
        if let Some(hours) = &self.hours {
            parts.push(if hours.is_open { "Open now" } else { "Closed" }.to_string());
            parts.push(hours.label.clone());
        }
        if compact && !self.distance.is_empty() {
            parts.push(self.distance.clone());
        }
        parts.join(" · ")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum OverlayBody<'a> {
    Detailed(DetailSummary),
    /// No curated detail: raw description and address.
    Fallback {
        description: &'a str,
        address: &'a str,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OverlayPresentation<'a> {
    pub id: &'a str,
    pub title: &'a str,
    pub body: OverlayBody<'a>,
}

#[must_use]
pub fn present<'a>(
    location: &'a Location,
    detail: Option<&LocationDetail>,
    now: NaiveDateTime,
) -> OverlayPresentation<'a> {
    let body = match detail {
        Some(detail) => OverlayBody::Detailed(DetailSummary {
            rating_label: format!("{:.1}", detail.rating),
            stars: rating_stars(detail.rating),
            review_count_label: format!("({})", format_count(detail.review_count)),
            price_range: detail.price_range.clone(),
            cuisine: detail.cuisine.clone(),
            hours: detail.hours.as_ref().map(|h| hours_status(h, now)),
            distance: normalize_distance(&detail.distance),
            photo: detail.photo.clone(),
        }),
        None => OverlayBody::Fallback {
            description: &location.description,
            address: &location.address,
        },
    };

    OverlayPresentation {
        id: &location.id,
        title: &location.name,
        body,
    }
}

// ---------------------------------------------------------------------------
// Drag to dismiss
// ---------------------------------------------------------------------------

/// Pointer state when a drag on the overlay ends. Positive is downward.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, serde::Deserialize)]
pub struct DragRelease {
    pub offset_y: f64,
    pub velocity_y: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DismissThresholds {
    pub offset_px: f64,
    /// px/s
    pub velocity: f64,
}

impl Default for DismissThresholds {
    fn default() -> Self {
        Self {
            offset_px: 60.0,
            velocity: 400.0,
        }
    }
}

impl DismissThresholds {
    #[must_use]
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            offset_px: config.overlay_dismiss_offset_px,
            velocity: config.overlay_dismiss_velocity,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DragOutcome {
    Dismiss,
    SpringBack,
}

/// Either a long enough pull or a fast enough flick dismisses.
#[must_use]
pub fn resolve_drag(release: DragRelease, thresholds: DismissThresholds) -> DragOutcome {
    if release.offset_y > thresholds.offset_px || release.velocity_y > thresholds.velocity {
        DragOutcome::Dismiss
    } else {
        DragOutcome::SpringBack
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use guestapp_core::{Category, Coordinates};

    use super::*;

    fn at(hour: u32, minute: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 7, 14)
            .unwrap()
            .and_hms_opt(hour, minute, 0)
            .unwrap()
    }

    fn hours(open: (u32, u32), close: (u32, u32)) -> OperatingHours {
        OperatingHours {
            open: NaiveTime::from_hms_opt(open.0, open.1, 0).unwrap(),
            close: NaiveTime::from_hms_opt(close.0, close.1, 0).unwrap(),
        }
    }

    fn trattoria() -> Location {
        Location {
            id: "loc-7".to_string(),
            name: "Trattoria da Vincenzo".to_string(),
            category: Category::Restaurant,
            description: "Family-run trattoria".to_string(),
            address: "Via Pasitea 172".to_string(),
            coordinates: Coordinates {
                latitude: 40.6281,
                longitude: 14.4847,
            },
        }
    }

    fn detail() -> LocationDetail {
        LocationDetail {
            rating: 4.5,
            review_count: 1284,
            price_range: "€€".to_string(),
            cuisine: "Seafood".to_string(),
            distance: "12 min walk".to_string(),
            photo: None,
            hours: Some(hours((22, 0), (2, 0))),
        }
    }

    #[test]
    fn late_night_window_open_before_midnight() {
        let status = hours_status(&hours((22, 0), (2, 0)), at(23, 30));
        assert!(status.is_open);
        assert_eq!(status.label, "Closes 2:00 AM");
    }

    #[test]
    fn late_night_window_open_after_midnight() {
        let status = hours_status(&hours((22, 0), (2, 0)), at(1, 15));
        assert!(status.is_open);
        assert_eq!(status.label, "Closes 2:00 AM");
    }

    #[test]
    fn late_night_window_closes_at_close_time() {
        let status = hours_status(&hours((22, 0), (2, 0)), at(2, 0));
        assert!(!status.is_open);
        assert_eq!(status.label, "Opens 10:00 PM");
    }

    #[test]
    fn same_day_window_before_opening() {
        let status = hours_status(&hours((7, 30), (23, 0)), at(6, 0));
        assert!(!status.is_open);
        assert_eq!(status.label, "Opens 7:30 AM");
    }

    #[test]
    fn same_day_window_open_at_opening_time() {
        let status = hours_status(&hours((7, 30), (23, 0)), at(7, 30));
        assert!(status.is_open);
        assert_eq!(status.label, "Closes 11:00 PM");
    }

    #[test]
    fn same_day_window_after_closing_opens_next_morning() {
        let status = hours_status(&hours((7, 30), (23, 0)), at(23, 0));
        assert!(!status.is_open);
        assert_eq!(status.label, "Opens 7:30 AM");
    }

    #[test]
    fn identical_open_and_close_means_round_the_clock() {
        let status = hours_status(&hours((9, 0), (9, 0)), at(3, 0));
        assert!(status.is_open);
    }

    #[test]
    fn distance_minutes_are_shortened() {
        assert_eq!(normalize_distance("12 min walk"), "12m walk");
        assert_eq!(normalize_distance("5 MIN drive, 20 min bus"), "5m drive, 20m bus");
        assert_eq!(normalize_distance("1.2 km"), "1.2 km");
        assert_eq!(normalize_distance("10 minutes"), "10 minutes");
    }

    #[test]
    fn counts_get_thousands_separators() {
        assert_eq!(format_count(0), "0");
        assert_eq!(format_count(999), "999");
        assert_eq!(format_count(1284), "1,284");
        assert_eq!(format_count(1_000_000), "1,000,000");
    }

    #[test]
    fn stars_fill_full_and_half() {
        assert_eq!(
            rating_stars(3.5),
            [Star::Full, Star::Full, Star::Full, Star::Half, Star::Empty]
        );
        assert_eq!(rating_stars(5.0), [Star::Full; 5]);
        assert_eq!(rating_stars(0.0), [Star::Empty; 5]);
    }

    #[test]
    fn present_with_detail() {
        let location = trattoria();
        let detail = detail();
        let view = present(&location, Some(&detail), at(23, 30));
        assert_eq!(view.title, "Trattoria da Vincenzo");
        let OverlayBody::Detailed(summary) = view.body else {
            panic!("expected detailed body");
        };
        assert_eq!(summary.rating_label, "4.5");
        assert_eq!(summary.review_count_label, "(1,284)");
        assert_eq!(summary.distance, "12m walk");
        assert_eq!(
            summary.status_line(false),
            "Open now · Closes 2:00 AM"
        );
        assert_eq!(
            summary.status_line(true),
            "Open now · Closes 2:00 AM · 12m walk"
        );
    }

    #[test]
    fn present_without_detail_falls_back() {
        let location = trattoria();
        let view = present(&location, None, at(12, 0));
        assert_eq!(
            view.body,
            OverlayBody::Fallback {
                description: "Family-run trattoria",
                address: "Via Pasitea 172",
            }
        );
    }

    #[test]
    fn status_line_without_hours_is_distance_only_when_compact() {
        let location = trattoria();
        let mut detail = detail();
        detail.hours = None;
        let OverlayBody::Detailed(summary) = present(&location, Some(&detail), at(12, 0)).body
        else {
            panic!("expected detailed body");
        };
        assert_eq!(summary.status_line(true), "12m walk");
        assert_eq!(summary.status_line(false), "");
    }

    #[test]
    fn drag_past_offset_dismisses() {
        let release = DragRelease {
            offset_y: 61.0,
            velocity_y: 0.0,
        };
        assert_eq!(
            resolve_drag(release, DismissThresholds::default()),
            DragOutcome::Dismiss
        );
    }

    #[test]
    fn fast_flick_dismisses() {
        let release = DragRelease {
            offset_y: 5.0,
            velocity_y: 450.0,
        };
        assert_eq!(
            resolve_drag(release, DismissThresholds::default()),
            DragOutcome::Dismiss
        );
    }

    #[test]
    fn short_slow_drag_springs_back() {
        let release = DragRelease {
            offset_y: 60.0,
            velocity_y: 400.0,
        };
        assert_eq!(
            resolve_drag(release, DismissThresholds::default()),
            DragOutcome::SpringBack
        );
    }

    #[test]
    fn upward_drag_springs_back() {
        let release = DragRelease {
            offset_y: -200.0,
            velocity_y: -900.0,
        };
        assert_eq!(
            resolve_drag(release, DismissThresholds::default()),
            DragOutcome::SpringBack
        );
    }
}
