use crate::{map::Renderer, resolver::Resolver, structs::LocationRecord};

/// One full run: locate, refine an unknown city, print, render.
pub async fn track<R: Renderer>(
    resolver: &Resolver,
    renderer: &R,
    input: Option<&str>,
) -> Option<LocationRecord> {
    let Some(mut record) = resolver.get_location(input).await else {
        println!(" Sorry, we couldn't find location data. Try again later.");
        return None;
    };

    if record.has_unknown_city() {
        record.city = resolver
            .reverse_geocode(record.latitude, record.longitude)
            .await;
    }

    println!("\n📍 **Location Details:**");
    println!("{}\n", record);

    if let Err(e) = renderer.render(record.latitude, record.longitude, &record.city) {
        log::warn!("rendering map failed: {:#}", e);
        println!("Couldn't create the map: {}", e);
    }

    Some(record)
}
