use ridereel_types::{Event, Rider};

/// Build the admin CSV export: the import-compatible header plus one quoted
/// row per rider, labeled with its event's name. Riders whose event has
/// been deleted fall back to an `Event {id}` label rather than being
/// dropped.
pub fn riders_to_csv(riders: &[Rider], events: &[Event]) -> String {
    let mut out = String::from("Rider Name,Event,Price,Video URL,Thumbnail URL");

    for rider in riders {
        let event_name = events
            .iter()
            .find(|e| e.id == rider.event_id)
            .map(|e| e.name.clone())
            .unwrap_or_else(|| format!("Event {}", rider.event_id));

        out.push('\n');
        out.push_str(&format!(
            "\"{}\",\"{}\",{},\"{}\",\"{}\"",
            rider.name, event_name, rider.price, rider.video_url, rider.thumbnail_url
        ));
    }

    out
}
