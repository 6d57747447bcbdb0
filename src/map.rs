use std::{fs, path::PathBuf};

use anyhow::Context;
use maud::{html, Markup, PreEscaped, DOCTYPE};

const ZOOM: u8 = 12;
const TOOLTIP: &str = "Click for more info";
const LEAFLET_CSS: &str = "https://unpkg.com/leaflet@1.9.4/dist/leaflet.css";
const LEAFLET_JS: &str = "https://unpkg.com/leaflet@1.9.4/dist/leaflet.js";
const STYLE: &str = "html, body, #map { height: 100%; width: 100%; margin: 0; padding: 0; }";

pub trait Renderer {
    fn render(&self, latitude: f64, longitude: f64, label: &str) -> anyhow::Result<()>;
}

/// Writes a standalone Leaflet page with a single marker.
pub struct MapRenderer {
    output: PathBuf,
}

impl MapRenderer {
    pub fn new(output: impl Into<PathBuf>) -> Self {
        MapRenderer {
            output: output.into(),
        }
    }
}

impl Renderer for MapRenderer {
    fn render(&self, latitude: f64, longitude: f64, label: &str) -> anyhow::Result<()> {
        println!("Generating an interactive map...");
        let page = map_page(latitude, longitude, label)?;
        fs::write(&self.output, page)
            .with_context(|| format!("writing {}", self.output.display()))?;
        log::debug!("map written to {}", self.output.display());
        println!(
            "Map successfully created! Open '{}' to check it out",
            self.output.display()
        );
        Ok(())
    }
}

pub fn map_page(latitude: f64, longitude: f64, label: &str) -> anyhow::Result<String> {
    // popup content is HTML; escape first, then quote it as a JS string
    let popup = serde_json::to_string(&html! { (label) }.into_string())?;
    let tooltip = serde_json::to_string(TOOLTIP)?;
    let script = format!(
        r#"
        var map = L.map("map").setView([{lat}, {lon}], {zoom});
        L.tileLayer("https://{{s}}.tile.openstreetmap.org/{{z}}/{{x}}/{{y}}.png", {{
            maxZoom: 19,
            attribution: "&copy; OpenStreetMap contributors"
        }}).addTo(map);
        L.marker([{lat}, {lon}])
            .bindPopup({popup})
            .bindTooltip({tooltip})
            .addTo(map);
"#,
        lat = latitude,
        lon = longitude,
        zoom = ZOOM,
    );

    let page: Markup = html! {
        (DOCTYPE)
        html {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (label) }
                link rel="stylesheet" href=(LEAFLET_CSS);
                script src=(LEAFLET_JS) {}
                style { (PreEscaped(STYLE)) }
            }
            body {
                div #map {}
                script { (PreEscaped(script)) }
            }
        }
    };
    Ok(page.into_string())
}
