use anyhow::{Context, Result};

use crate::{
    geocode::{AddressQuery, Coordinates, GeocodeError, Geocoder},
    nearest::{nearest, Nearby},
    stores::Stores,
};

/// One answered query.
#[derive(Debug)]
pub struct Lookup<'a> {
    pub query: AddressQuery,
    pub user: Coordinates,
    pub results: Vec<Nearby<'a>>,
}

#[derive(Debug)]
pub enum Outcome<'a> {
    Found(Lookup<'a>),
    /// The address could not be resolved; the user should revise it.
    NotFound(AddressQuery),
}

pub fn lookup<'a>(
    stores: &'a Stores,
    geocoder: &dyn Geocoder,
    query: AddressQuery,
    limit: usize,
) -> Result<Outcome<'a>> {
    let user = match geocoder.geocode(&query) {
        Ok(x) => x,
        Err(GeocodeError::NotFound { query: q }) => {
            log::info!("No location found for {q:?}");
            return Ok(Outcome::NotFound(query));
        }
        Err(err) => {
            return Err(err)
                .with_context(|| format!("failed to geocode {:?}", query.to_query_string()))
        }
    };
    log::debug!("Resolved to {} ({}, {})", user.display_name, user.lat, user.lon);

    let candidates = stores.in_state(query.state);
    log::debug!("{} stores in {}", candidates.len(), query.state);

    let results = nearest(candidates, &user.point(), limit);
    Ok(Outcome::Found(Lookup {
        query,
        user,
        results,
    }))
}
