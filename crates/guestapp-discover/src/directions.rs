//! Outbound "open directions" links for the detail overlay.

use guestapp_core::Location;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

/// Characters `encodeURIComponent` leaves untouched.
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MapsProvider {
    Apple,
    Google,
}

impl MapsProvider {
    /// Apple Maps for iPhone, iPad and Mac user agents; Google Maps otherwise,
    /// including when no user agent is known.
    #[must_use]
    pub fn for_user_agent(user_agent: Option<&str>) -> Self {
        let is_apple = user_agent.is_some_and(|ua| {
            ["iPhone", "iPad", "Macintosh"]
                .iter()
                .any(|needle| ua.contains(needle))
        });
        if is_apple {
            MapsProvider::Apple
        } else {
            MapsProvider::Google
        }
    }
}

#[must_use]
pub fn directions_url(location: &Location, provider: MapsProvider) -> String {
    let lat = location.coordinates.latitude;
    let lng = location.coordinates.longitude;
    match provider {
        MapsProvider::Apple => {
            let name = utf8_percent_encode(&location.name, URI_COMPONENT);
            format!("http://maps.apple.com/?daddr={lat},{lng}&q={name}")
        }
        MapsProvider::Google => {
            format!("https://www.google.com/maps/dir/?api=1&destination={lat},{lng}")
        }
    }
}
