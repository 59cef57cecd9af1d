//! Event card details and summaries

use std::collections::HashSet;

use crate::core::types::{Myelin, Place, Plan};

/// What an event card shows for a plan or merged group
#[derive(Debug, Clone, PartialEq)]
pub struct EventDetails {
    pub title: String,
    pub description: String,
    pub main_tag: String,
    pub sub_tags: Vec<String>,
    pub photos: Vec<String>,
    /// Number of sub-events, at least one
    pub event_count: usize,
}

/// Build card details; the place wins over the myelin for title, description
/// and main tag. `None` when neither has a title.
pub fn event_details(place: Option<&Place>, myelin: Option<&Myelin>) -> Option<EventDetails> {
    let mut details = EventDetails {
        title: String::new(),
        description: String::new(),
        main_tag: String::new(),
        sub_tags: Vec::new(),
        photos: Vec::new(),
        event_count: 0,
    };

    if let Some(place) = place {
        details.title = place.place_name.title.clone();
        details.description = place.description.clone();
        details.main_tag = place.main_tag.clone();
        details.sub_tags.extend(place.sub_tags.iter().cloned());
        details.photos.extend(place.photos.iter().map(|p| p.url.clone()));
    }

    if let Some(myelin) = myelin {
        if details.title.is_empty() {
            details.title = myelin.place_name.title.clone();
            details.description = myelin.description.clone();
            details.main_tag = myelin.main_tag.clone();
        }
        details.sub_tags.extend(myelin.sub_tags.iter().cloned());
        if let Some(file) = &myelin.file {
            details.photos.push(file.display_url().to_string());
        }
    }

    if details.title.is_empty() {
        return None;
    }

    details.event_count = details.sub_tags.len().max(1);
    Some(details)
}

impl Plan {
    pub fn event_details(&self) -> Option<EventDetails> {
        event_details(self.place.as_ref(), self.myelin.as_ref())
    }
}

/// Totals for the "saved events" card
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SavedEvents {
    pub total_events: usize,
    pub photos: Vec<String>,
}

/// Sum sub-events (at least one per plan) and collect every photo
pub fn saved_events(plans: &[Plan]) -> SavedEvents {
    plans
        .iter()
        .filter(|p| p.is_renderable())
        .fold(SavedEvents::default(), |mut acc, plan| {
            let sub_tags = plan.place.as_ref().map_or(0, |p| p.sub_tags.len())
                + plan.myelin.as_ref().map_or(0, |m| m.sub_tags.len());
            acc.total_events += sub_tags.max(1);
            acc.photos.extend(plan.media_urls());
            acc
        })
}

/// `title-address` of each distinct place/myelin event, in first-seen order
pub fn distinct_events(plans: &[Plan]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut events = Vec::new();

    for plan in plans {
        let names = plan
            .place
            .as_ref()
            .map(|p| &p.place_name)
            .into_iter()
            .chain(plan.myelin.as_ref().map(|m| &m.place_name));

        for name in names {
            let key = format!("{}-{}", name.title, name.address);
            if seen.insert(key.clone()) {
                events.push(key);
            }
        }
    }

    events
}
