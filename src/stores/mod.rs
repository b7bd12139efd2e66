use std::{collections::BTreeMap, fs::File, io::Read, path::Path};

use anyhow::{Context, Result};
use geo::Point;
use serde::Deserialize;

use crate::State;

/// One row of the cleaned store dataset.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Store {
    pub state: String,
    #[serde(rename = "X")]
    pub lon: f64,
    #[serde(rename = "Y")]
    pub lat: f64,
    pub address: String,
    pub city: String,
    #[serde(default)]
    pub phone: String,
}

impl Store {
    pub fn point(&self) -> Point {
        Point::new(self.lon, self.lat)
    }
}

/// The full dataset, loaded once and only ever read afterwards.
#[derive(Debug, Default)]
pub struct Stores {
    rows: Vec<Store>,
}

impl Stores {
    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path)
            .with_context(|| format!("failed to open dataset {}", path.display()))?;
        Self::from_reader(file).with_context(|| format!("failed to read {}", path.display()))
    }

    pub fn from_reader(reader: impl Read) -> Result<Self> {
        let mut rows = Vec::new();
        for row in csv::Reader::from_reader(reader).deserialize() {
            let row: Store = row.context("malformed dataset row")?;
            rows.push(row);
        }
        Ok(Self { rows })
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Rows whose state field is exactly `state`'s code, in dataset order.
    pub fn in_state(&self, state: State) -> Vec<&Store> {
        let code = state.code();
        self.rows.iter().filter(|x| x.state == code).collect()
    }

    /// Row count per raw state field, including codes outside [`State::all`].
    pub fn count_by_state(&self) -> BTreeMap<&str, usize> {
        let mut counts = BTreeMap::new();
        for x in &self.rows {
            *counts.entry(x.state.as_str()).or_insert(0) += 1;
        }
        counts
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub const SAMPLE: &str = "\
X,Y,storeNumber,address,city,state,phone
-71.2356,42.3765,1001,100 Main St,Waltham,MA,(781) 555-0100
-71.0589,42.3601,1002,1 Court St,Boston,MA,(617) 555-0101
-73.9857,40.7484,1003,350 5th Ave,New York,NY,(212) 555-0102
-71.4128,41.8240,1004,10 Dorrance St,Providence,RI,
-71.1097,42.3736,1005,1400 Mass Ave,Cambridge,MA,(617) 555-0104
";

    #[test]
    fn load_sample() {
        let stores = Stores::from_reader(SAMPLE.as_bytes()).unwrap();
        assert_eq!(stores.len(), 5);

        let first = stores.in_state(State::MA)[0];
        assert_eq!(first.address, "100 Main St");
        assert_eq!(first.point(), Point::new(-71.2356, 42.3765));

        let ri = stores.in_state(State::RI);
        assert_eq!(ri.len(), 1);
        assert_eq!(ri[0].phone, "");
    }

    #[test]
    fn in_state_excludes_other_states() {
        let stores = Stores::from_reader(SAMPLE.as_bytes()).unwrap();
        let ma = stores.in_state(State::MA);
        assert_eq!(ma.len(), 3);
        assert!(ma.iter().all(|x| x.state == "MA"));
        assert_eq!(
            ma.iter().map(|x| x.city.as_str()).collect::<Vec<_>>(),
            ["Waltham", "Boston", "Cambridge"]
        );
        assert!(stores.in_state(State::CA).is_empty());
    }

    #[test]
    fn count_by_state() {
        let stores = Stores::from_reader(SAMPLE.as_bytes()).unwrap();
        let counts = stores.count_by_state();
        assert_eq!(counts.get("MA"), Some(&3));
        assert_eq!(counts.get("NY"), Some(&1));
        assert_eq!(counts.get("CA"), None);
    }

    #[test]
    fn malformed_row() {
        let raw = "X,Y,address,city,state,phone\nnot-a-number,42.0,a,b,MA,c\n";
        assert!(Stores::from_reader(raw.as_bytes()).is_err());
    }

    #[test]
    fn missing_file() {
        let err = Stores::load(Path::new("does/not/exist.csv")).unwrap_err();
        assert!(err.to_string().contains("does/not/exist.csv"));
    }
}
