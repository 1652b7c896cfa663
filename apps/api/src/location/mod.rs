//! Map placement for a lookup result.
//!
//! Model coordinates win when present; otherwise the country centroid;
//! otherwise a world view with no marker.

pub mod handlers;

use serde::Serialize;

/// Zoom used when the model supplied region coordinates.
const REGION_ZOOM: u8 = 6;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Centroid {
    pub lat: f64,
    pub lng: f64,
    pub zoom: u8,
}

pub const DEFAULT_CENTER: Centroid = Centroid {
    lat: 20.0,
    lng: 0.0,
    zoom: 2,
};

const COUNTRY_CENTROIDS: &[(&str, Centroid)] = &[
    ("US", Centroid { lat: 37.0902, lng: -95.7129, zoom: 4 }),
    ("GB", Centroid { lat: 55.3781, lng: -3.4360, zoom: 5 }),
    ("IN", Centroid { lat: 20.5937, lng: 78.9629, zoom: 4 }),
    ("DE", Centroid { lat: 51.1657, lng: 10.4515, zoom: 5 }),
    ("FR", Centroid { lat: 46.603354, lng: 1.8883335, zoom: 5 }),
    ("BR", Centroid { lat: -14.2350, lng: -51.9253, zoom: 4 }),
    ("AU", Centroid { lat: -25.2744, lng: 133.7751, zoom: 4 }),
    ("CA", Centroid { lat: 56.1304, lng: -106.3468, zoom: 3 }),
    ("JP", Centroid { lat: 36.2048, lng: 138.2529, zoom: 5 }),
    ("CN", Centroid { lat: 35.8617, lng: 104.1954, zoom: 4 }),
];

pub fn country_centroid(country_code: &str) -> Option<Centroid> {
    COUNTRY_CENTROIDS
        .iter()
        .find(|(code, _)| code.eq_ignore_ascii_case(country_code))
        .map(|(_, centroid)| *centroid)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MapSource {
    Region,
    Country,
    Default,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MapView {
    /// `[lat, lng]`
    pub center: [f64; 2],
    pub zoom: u8,
    pub marker_position: Option<[f64; 2]>,
    /// Upper-cased country code shown in the marker popup.
    pub popup_text: Option<String>,
    pub source: MapSource,
}

impl MapView {
    pub fn resolve(
        country_code: Option<&str>,
        latitude: Option<f64>,
        longitude: Option<f64>,
    ) -> Self {
        let popup_text = country_code
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(str::to_ascii_uppercase);

        if let (Some(lat), Some(lng)) = (latitude, longitude) {
            if lat.is_finite() && lng.is_finite() && lat.abs() <= 90.0 && lng.abs() <= 180.0 {
                return Self {
                    center: [lat, lng],
                    zoom: REGION_ZOOM,
                    marker_position: Some([lat, lng]),
                    popup_text,
                    source: MapSource::Region,
                };
            }
        }

        if let Some(centroid) = popup_text.as_deref().and_then(country_centroid) {
            return Self {
                center: [centroid.lat, centroid.lng],
                zoom: centroid.zoom,
                marker_position: Some([centroid.lat, centroid.lng]),
                popup_text,
                source: MapSource::Country,
            };
        }

        Self {
            center: [DEFAULT_CENTER.lat, DEFAULT_CENTER.lng],
            zoom: DEFAULT_CENTER.zoom,
            marker_position: None,
            popup_text: None,
            source: MapSource::Default,
        }
    }
}
