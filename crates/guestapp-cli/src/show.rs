//! Text rendering of the detail overlay for a single location.

use chrono::{Local, NaiveDateTime, NaiveTime};
use guestapp_core::ContentStore;
use guestapp_discover::overlay::{OverlayBody, OverlayPresentation, Star};
use guestapp_discover::{directions_url, present, MapsProvider};

#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct ShowFormat {
    pub compact: bool,
    pub json: bool,
}

/// Print the overlay for `id` as it would appear at `at` (default: now).
///
/// # Errors
///
/// Returns an error if no location has that id, or JSON encoding fails.
pub(crate) fn run_show(
    content: &ContentStore,
    id: &str,
    at: Option<NaiveTime>,
    user_agent: Option<&str>,
    format: ShowFormat,
) -> anyhow::Result<()> {
    let location = content.get(id).ok_or_else(|| {
        anyhow::anyhow!("location '{id}' not found; run `validate` to list rejected records")
    })?;

    let now = resolve_now(at, Local::now().naive_local());
    let presentation = present(location, content.detail(id), now);
    let directions = directions_url(location, MapsProvider::for_user_agent(user_agent));

    if format.json {
        let body = serde_json::json!({
            "overlay": presentation,
            "directions": directions,
        });
        println!("{}", serde_json::to_string_pretty(&body)?);
    } else {
        for line in render_lines(&presentation, format.compact) {
            println!("{line}");
        }
        println!("Directions: {directions}");
    }
    Ok(())
}

/// `at` on the current date, or `current` unchanged.
pub(crate) fn resolve_now(at: Option<NaiveTime>, current: NaiveDateTime) -> NaiveDateTime {
    at.map_or(current, |time| current.date().and_time(time))
}

fn star_glyph(star: Star) -> char {
    match star {
        Star::Full => '★',
        Star::Half => '⯪',
        Star::Empty => '☆',
    }
}

pub(crate) fn render_lines(presentation: &OverlayPresentation<'_>, compact: bool) -> Vec<String> {
    let mut lines = vec![presentation.title.to_string()];
    match &presentation.body {
        OverlayBody::Detailed(summary) => {
            let stars: String = summary.stars.iter().copied().map(star_glyph).collect();
            lines.push(format!(
                "{} {stars} {}",
                summary.rating_label, summary.review_count_label
            ));
            let kind = [summary.price_range.as_str(), summary.cuisine.as_str()]
                .into_iter()
                .filter(|s| !s.is_empty())
                .collect::<Vec<_>>()
                .join(" · ");
            if !kind.is_empty() {
                lines.push(kind);
            }
            let status = summary.status_line(compact);
            if !status.is_empty() {
                lines.push(status);
            }
            if !compact && !summary.distance.is_empty() {
                lines.push(summary.distance.clone());
            }
        }
        OverlayBody::Fallback {
            description,
            address,
        } => {
            if !description.is_empty() {
                lines.push((*description).to_string());
            }
            if !address.is_empty() {
                lines.push((*address).to_string());
            }
        }
    }
    lines
}
