use std::{
    cell::Cell,
    thread,
    time::{Duration, Instant},
};

use serde::Deserialize;
use ureq::{Agent, AgentBuilder};

use crate::config::GeocoderConfig;

use super::{AddressQuery, Coordinates, GeocodeError, Geocoder};

/// Forward geocoding against a Nominatim instance.
///
/// Requests from one backend are spaced at least `min_delay` apart, which is
/// what the public instance's usage policy asks for.
pub struct Nominatim {
    agent: Agent,
    base_url: String,
    email: Option<String>,
    country_codes: String,
    min_delay: Duration,
    last_request: Cell<Option<Instant>>,
}

impl Nominatim {
    pub fn new(config: &GeocoderConfig) -> Self {
        let agent = AgentBuilder::new()
            .user_agent(&config.user_agent)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build();

        Self {
            agent,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            email: config.email.clone().filter(|x| !x.is_empty()),
            country_codes: config.country_codes.trim().to_ascii_lowercase(),
            min_delay: Duration::from_millis(config.min_delay_ms),
            last_request: Cell::new(None),
        }
    }

    fn wait_for_slot(&self) {
        if let Some(last) = self.last_request.get() {
            let elapsed = last.elapsed();
            if elapsed < self.min_delay {
                let wait = self.min_delay - elapsed;
                log::debug!("waiting {wait:?} before the next geocoding request");
                thread::sleep(wait);
            }
        }
        self.last_request.set(Some(Instant::now()));
    }

    fn search_params<'a>(&'a self, q: &'a str) -> Vec<(&'static str, &'a str)> {
        let mut params = vec![("q", q), ("format", "json"), ("limit", "1")];
        if !self.country_codes.is_empty() {
            params.push(("countrycodes", self.country_codes.as_str()));
        }
        if let Some(email) = &self.email {
            params.push(("email", email.as_str()));
        }
        params
    }
}

impl Geocoder for Nominatim {
    fn geocode(&self, query: &AddressQuery) -> Result<Coordinates, GeocodeError> {
        let q = query.to_query_string();
        if query.is_blank() {
            return Err(GeocodeError::NotFound { query: q });
        }

        self.wait_for_slot();
        log::debug!("geocoding {q:?} via {}", self.base_url);

        let request = self
            .search_params(&q)
            .into_iter()
            .fold(self.agent.get(&format!("{}/search", self.base_url)), |req, (k, v)| {
                req.query(k, v)
            });

        let response: Vec<SearchResult> = request
            .call()
            .map_err(Box::new)?
            .into_json()
            .map_err(|e| GeocodeError::InvalidResponse(e.to_string()))?;

        match response.into_iter().next() {
            Some(x) => x.refine(),
            None => Err(GeocodeError::NotFound { query: q }),
        }
    }
}

#[derive(Debug, Deserialize)]
struct SearchResult {
    lat: String,
    lon: String,
    display_name: String,
}

impl SearchResult {
    fn refine(self) -> Result<Coordinates, GeocodeError> {
        let parse = |x: &str| {
            x.parse::<f64>()
                .map_err(|e| GeocodeError::InvalidResponse(format!("bad coordinate {x:?}: {e}")))
        };
        Ok(Coordinates {
            lat: parse(&self.lat)?,
            lon: parse(&self.lon)?,
            display_name: self.display_name,
        })
    }
}
