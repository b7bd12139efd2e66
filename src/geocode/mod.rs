use geo::Point;
use itertools::Itertools;
use serde::Serialize;
use thiserror::Error;

use crate::State;

pub mod nominatim;

pub use nominatim::Nominatim;

/// A resolved location.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
    pub display_name: String,
}

impl Coordinates {
    pub fn point(&self) -> Point {
        Point::new(self.lon, self.lat)
    }
}

/// What the user typed, plus the fixed country.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AddressQuery {
    pub street: String,
    pub city: String,
    pub state: State,
    pub country: String,
}

impl AddressQuery {
    pub fn to_query_string(&self) -> String {
        [
            self.street.as_str(),
            self.city.as_str(),
            self.state.code(),
            self.country.as_str(),
        ]
        .iter()
        .map(|x| x.trim())
        .filter(|x| !x.is_empty())
        .join(", ")
    }

    /// True when the user supplied neither a street nor a city.
    pub fn is_blank(&self) -> bool {
        self.street.trim().is_empty() && self.city.trim().is_empty()
    }
}

#[derive(Debug, Error)]
pub enum GeocodeError {
    #[error("no location found for {query:?}")]
    NotFound { query: String },
    #[error("geocoding request failed")]
    Http(#[from] Box<ureq::Error>),
    #[error("invalid geocoding response: {0}")]
    InvalidResponse(String),
}

/// Turns a free-text address into a coordinate.
pub trait Geocoder {
    fn geocode(&self, query: &AddressQuery) -> Result<Coordinates, GeocodeError>;
}
