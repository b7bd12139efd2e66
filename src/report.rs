use std::fmt::Write;

use anyhow::Result;
use serde::Serialize;

use crate::{
    geocode::{AddressQuery, Coordinates},
    lookup::{Lookup, Outcome},
};

pub fn markdown(lookup: &Lookup, brand: &str) -> Result<String> {
    let q = &lookup.query;
    let mut md = String::new();
    writeln!(
        md,
        "### Below is a list of the {} {} {brand} stores closest to: \n`{}, {}`\n",
        lookup.results.len(),
        q.state,
        q.street,
        q.city
    )?;

    writeln!(md, "| | address | city | phone | distance_km |")?;
    writeln!(md, "|--:|---|---|---|--:|")?;
    for (i, x) in lookup.results.iter().enumerate() {
        writeln!(
            md,
            "| {} | {} | {} | {} | {:.3} |",
            i + 1,
            cell(&x.store.address),
            cell(&x.store.city),
            cell(&x.store.phone),
            x.distance_km
        )?;
    }
    Ok(md)
}

pub fn revise(query: &AddressQuery, brand: &str) -> String {
    format!(
        "### Could not find {brand} stores near the address: \n`{}, {}, {}`\n### Please revise input to find stores!\n",
        query.street, query.city, query.state
    )
}

pub fn json(outcome: &Outcome) -> Result<String> {
    let report = match outcome {
        Outcome::Found(x) => JsonReport {
            found: true,
            query: &x.query,
            user: Some(&x.user),
            results: x
                .results
                .iter()
                .map(|x| Row {
                    address: &x.store.address,
                    city: &x.store.city,
                    phone: &x.store.phone,
                    lat: x.store.lat,
                    lon: x.store.lon,
                    distance_km: x.distance_km,
                })
                .collect(),
        },
        Outcome::NotFound(query) => JsonReport {
            found: false,
            query,
            user: None,
            results: Vec::new(),
        },
    };

    let mut output = serde_json::to_string_pretty(&report)?;
    output.push('\n');
    Ok(output)
}

fn cell(x: &str) -> String {
    x.replace('|', "\\|")
}

#[derive(Serialize)]
struct JsonReport<'a> {
    found: bool,
    query: &'a AddressQuery,
    #[serde(skip_serializing_if = "Option::is_none")]
    user: Option<&'a Coordinates>,
    results: Vec<Row<'a>>,
}

#[derive(Serialize)]
struct Row<'a> {
    address: &'a str,
    city: &'a str,
    phone: &'a str,
    lat: f64,
    lon: f64,
    distance_km: f64,
}
