use std::{
    fs,
    io::{ErrorKind, Write},
    path::PathBuf,
};

use anyhow::{Context, Result};

use crate::{
    geocode::{AddressQuery, Geocoder},
    lookup::{lookup, Outcome},
    map::Scene,
    report,
    stores::Stores,
    utils::spinner,
    State,
};

/// Everything needed to answer queries: the loaded table, the geocoder, and
/// how results should be shown.
pub struct Session<G> {
    pub stores: Stores,
    pub geocoder: G,
    pub brand: String,
    pub country: String,
    pub limit: usize,
    pub json: bool,
    pub map: Option<MapOutput>,
}

pub struct MapOutput {
    pub path: PathBuf,
    pub zoom: f64,
    pub style: String,
}

impl<G: Geocoder> Session<G> {
    pub fn query(&self, street: &str, city: &str, state: State) -> AddressQuery {
        AddressQuery {
            street: street.to_string(),
            city: city.to_string(),
            state,
            country: self.country.clone(),
        }
    }

    /// Answers one query. Returns whether the address resolved; nothing but
    /// the revise message is written when it did not.
    pub fn answer(&self, query: AddressQuery, out: &mut impl Write) -> Result<bool> {
        let pb = spinner(format!("Looking up {}...", query.to_query_string()));
        let outcome = lookup(&self.stores, &self.geocoder, query, self.limit);
        pb.finish_and_clear();
        let outcome = outcome?;

        if self.json {
            out.write_all(report::json(&outcome)?.as_bytes())?;
        }

        match &outcome {
            Outcome::Found(found) => {
                if let Some(map) = &self.map {
                    Scene::for_lookup(found, map.zoom, &map.style).write(&map.path)?;
                }
                if !self.json {
                    out.write_all(report::markdown(found, &self.brand)?.as_bytes())?;
                }
                Ok(true)
            }
            Outcome::NotFound(query) => {
                // no map outlives an unresolved query
                if let Some(map) = &self.map {
                    match fs::remove_file(&map.path) {
                        Ok(()) => log::debug!("removed {}", map.path.display()),
                        Err(err) if err.kind() == ErrorKind::NotFound => {}
                        Err(err) => {
                            return Err(err).with_context(|| {
                                format!("failed to remove stale map {}", map.path.display())
                            })
                        }
                    }
                }
                if !self.json {
                    out.write_all(report::revise(query, &self.brand).as_bytes())?;
                }
                Ok(false)
            }
        }
    }
}
