//! First-boot seeding: the admin account and, when the catalog is empty,
//! the sample events and riders the storefront ships with.

use anyhow::Result;
use ridereel_types::{NewEvent, NewRider};
use tracing::info;

use crate::Store;

const EVENT_NAMES: [&str; 6] = [
    "Texas Barrel Racing Championship",
    "Oklahoma Summer Barrel Classic",
    "Wyoming Barrel Racing Showdown",
    "Montana State Barrel Racing",
    "Colorado Barrel Racing Festival",
    "Arizona Fall Barrel Championship",
];

const EVENT_DATES: [&str; 6] = [
    "June 15-17, 2023",
    "July 8-10, 2023",
    "August 5-7, 2023",
    "August 19-21, 2023",
    "September 2-4, 2023",
    "October 14-16, 2023",
];

const EVENT_IMAGES: [&str; 6] = [
    "https://images.unsplash.com/photo-1609626046544-66a356133387?ixlib=rb-4.0.3&auto=format&fit=crop&w=1000&q=80",
    "https://images.unsplash.com/photo-1575550959106-5a7defe28b56?ixlib=rb-4.0.3&auto=format&fit=crop&w=1000&q=80",
    "https://images.unsplash.com/photo-1529833981184-35f8dd0a4df5?ixlib=rb-4.0.3&auto=format&fit=crop&w=1000&q=80",
    "https://images.unsplash.com/photo-1580759028677-3d743a37113a?ixlib=rb-4.0.3&auto=format&fit=crop&w=1000&q=80",
    "https://images.unsplash.com/photo-1551143826-b99555ecad74?ixlib=rb-4.0.3&auto=format&fit=crop&w=1000&q=80",
    "https://images.unsplash.com/photo-1520244526258-daadec968c4c?ixlib=rb-4.0.3&auto=format&fit=crop&w=1000&q=80",
];

const RIDER_NAMES: [&str; 10] = [
    "Jessica Smith",
    "Michael Johnson",
    "Sarah Williams",
    "Emma Davis",
    "David Miller",
    "Ashley Brown",
    "Thomas Wilson",
    "Rebecca Martinez",
    "James Taylor",
    "Sophia Anderson",
];

const RIDER_IMAGES: [&str; 10] = [
    "https://images.unsplash.com/photo-1581375221876-8dbd773689c5?ixlib=rb-4.0.3&auto=format&fit=crop&w=1000&q=80",
    "https://images.unsplash.com/photo-1558591710-4b4a1ae0f04d?ixlib=rb-4.0.3&auto=format&fit=crop&w=1000&q=80",
    "https://images.unsplash.com/photo-1579202002179-8604d8c63ef5?ixlib=rb-4.0.3&auto=format&fit=crop&w=1000&q=80",
    "https://images.unsplash.com/photo-1532272029390-4f16fa56ca93?ixlib=rb-4.0.3&auto=format&fit=crop&w=1000&q=80",
    "https://images.unsplash.com/photo-1512073490563-2fca097a4dea?ixlib=rb-4.0.3&auto=format&fit=crop&w=1000&q=80",
    "https://images.unsplash.com/photo-1561045377-52d3c5db0359?ixlib=rb-4.0.3&auto=format&fit=crop&w=1000&q=80",
    "https://images.unsplash.com/photo-1548963607-e4ddf7d668ba?ixlib=rb-4.0.3&auto=format&fit=crop&w=1000&q=80",
    "https://images.unsplash.com/photo-1583771250139-b1d9458f866d?ixlib=rb-4.0.3&auto=format&fit=crop&w=1000&q=80",
    "https://images.unsplash.com/photo-1536844891345-c6e3f7457348?ixlib=rb-4.0.3&auto=format&fit=crop&w=1000&q=80",
    "https://images.unsplash.com/photo-1564697284179-980a11572e2e?ixlib=rb-4.0.3&auto=format&fit=crop&w=1000&q=80",
];

const SAMPLE_VIDEO_URL: &str =
    "https://storage.googleapis.com/gtv-videos-bucket/sample/BigBuckBunny.mp4";

const RIDERS_PER_EVENT: usize = 5;

/// Creates the admin account if it does not exist yet. Returns true when
/// the account was created on this call.
pub fn ensure_admin(store: &dyn Store, username: &str, password_hash: &str) -> Result<bool> {
    if store.get_user_by_username(username)?.is_some() {
        return Ok(false);
    }
    store.create_user(username, password_hash)?;
    info!("Created admin user '{}'", username);
    Ok(true)
}

/// Seeds the sample catalog when no events exist yet. Returns true when
/// seeding happened on this call.
pub fn seed_sample_catalog(store: &dyn Store) -> Result<bool> {
    if !store.list_events()?.is_empty() {
        return Ok(false);
    }

    for i in 0..EVENT_NAMES.len() {
        let event = store.create_event(&NewEvent {
            name: EVENT_NAMES[i].to_string(),
            date: EVENT_DATES[i].to_string(),
            thumbnail_url: EVENT_IMAGES[i].to_string(),
        })?;

        for j in 0..RIDERS_PER_EVENT {
            let name_index = i * RIDERS_PER_EVENT + j;
            let rider_name = RIDER_NAMES
                .get(name_index)
                .map(|n| n.to_string())
                .unwrap_or_else(|| format!("Rider {}", name_index + 1));

            store.create_rider(&NewRider {
                name: rider_name,
                event_id: event.id,
                price: 80,
                thumbnail_url: RIDER_IMAGES[name_index % RIDER_IMAGES.len()].to_string(),
                video_url: SAMPLE_VIDEO_URL.to_string(),
            })?;
        }
    }

    info!("Sample catalog seeded");
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MemStore;

    #[test]
    fn admin_seeded_once() {
        let store = MemStore::new();
        assert!(ensure_admin(&store, "admin", "hash").unwrap());
        assert!(!ensure_admin(&store, "admin", "other-hash").unwrap());
        // The first hash is kept.
        let user = store.get_user_by_username("admin").unwrap().unwrap();
        assert_eq!(user.password_hash, "hash");
    }

    #[test]
    fn catalog_seeded_only_when_empty() {
        let store = MemStore::new();
        assert!(seed_sample_catalog(&store).unwrap());
        let events = store.list_events().unwrap();
        assert_eq!(events.len(), 6);
        assert_eq!(
            store.riders_by_event(events[0].id).unwrap().len(),
            RIDERS_PER_EVENT
        );
        assert!(!seed_sample_catalog(&store).unwrap());
        assert_eq!(store.list_events().unwrap().len(), 6);
    }
}
