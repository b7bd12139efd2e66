use std::{fs, path::Path};

use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::{json, Value};

use crate::lookup::Lookup;

const TEMPLATE: &str = include_str!("map.html");

pub const STORE_COLOR: [u8; 4] = [200, 30, 0, 160];
pub const USER_COLOR: [u8; 4] = [0, 168, 81, 160];

/// A deck.gl scene: where the camera starts and which points to draw.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Scene {
    pub initial_view_state: ViewState,
    pub map_style: String,
    pub layers: Vec<ScatterplotLayer>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViewState {
    pub latitude: f64,
    pub longitude: f64,
    pub zoom: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScatterplotLayer {
    pub id: String,
    /// `[lon, lat]` pairs
    pub data: Vec<[f64; 2]>,
    pub get_color: [u8; 4],
    pub get_radius: f64,
    pub radius_min_pixels: f64,
}

impl ScatterplotLayer {
    fn new(id: &str, data: Vec<[f64; 2]>, color: [u8; 4]) -> Self {
        Self {
            id: id.to_string(),
            data,
            get_color: color,
            get_radius: 20.0,
            radius_min_pixels: 4.0,
        }
    }
}

impl Scene {
    pub fn for_lookup(lookup: &Lookup, zoom: f64, style: &str) -> Self {
        let stores = lookup
            .results
            .iter()
            .map(|x| [x.store.lon, x.store.lat])
            .collect();

        Self {
            initial_view_state: ViewState {
                latitude: lookup.user.lat,
                longitude: lookup.user.lon,
                zoom,
            },
            map_style: style.to_string(),
            layers: vec![
                ScatterplotLayer::new("stores", stores, STORE_COLOR),
                ScatterplotLayer::new("user", vec![[lookup.user.lon, lookup.user.lat]], USER_COLOR),
            ],
        }
    }

    /// Standalone page that renders the scene with deck.gl over a MapLibre basemap.
    pub fn to_html(&self) -> Result<String> {
        // keep "</script>" in data from closing the tag early
        let scene = serde_json::to_string(self)?.replace("</", "<\\/");
        Ok(TEMPLATE.replace("SCENE_JSON", &scene))
    }

    pub fn to_geojson(&self) -> Value {
        let mut features = Vec::new();
        for layer in &self.layers {
            let [r, g, b, _] = layer.get_color;
            for [lon, lat] in &layer.data {
                features.push(json!({
                    "type": "Feature",
                    "geometry": { "type": "Point", "coordinates": [lon, lat] },
                    "properties": {
                        "layer": layer.id,
                        "marker-color": format!("#{r:02x}{g:02x}{b:02x}"),
                    },
                }));
            }
        }
        json!({ "type": "FeatureCollection", "features": features })
    }

    /// Writes GeoJSON for `.geojson`/`.json` paths and HTML for anything else.
    pub fn write(&self, path: &Path) -> Result<()> {
        let contents = match path.extension().and_then(|x| x.to_str()) {
            Some("geojson" | "json") => {
                let mut x = serde_json::to_string_pretty(&self.to_geojson())?;
                x.push('\n');
                x
            }
            _ => self.to_html()?,
        };

        fs::write(path, contents).with_context(|| format!("failed to write {}", path.display()))?;
        log::info!("Wrote map to {}", path.display());
        Ok(())
    }
}
