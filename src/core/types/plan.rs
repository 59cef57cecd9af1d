//! Plan record types
//!
//! Mirrors the JSON records served by the plan backend. Field names follow the
//! wire format through serde renames; the Rust side uses snake_case.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Authenticated user handed over by the login flow
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub name: String,
}

impl User {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            email: String::new(),
            name: String::new(),
        }
    }
}

/// Title and address of a place or myelin event
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlaceName {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub address: String,
}

/// A single photo reference
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Photo {
    pub url: String,
}

/// Curated place attached to a plan
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Place {
    #[serde(default)]
    pub place_name: PlaceName,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub main_tag: String,
    #[serde(default)]
    pub sub_tags: Vec<String>,
    #[serde(default)]
    pub photos: Vec<Photo>,
}

/// Uploaded media file of a myelin record
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaFile {
    pub url: String,
    /// Derived client-side for video files, never sent back to the server
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail_url: Option<String>,
}

impl MediaFile {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            thumbnail_url: None,
        }
    }

    /// URL to render: the thumbnail when one was generated, the raw file otherwise
    pub fn display_url(&self) -> &str {
        self.thumbnail_url.as_deref().unwrap_or(&self.url)
    }
}

/// User-generated media attachment ("myelin")
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Myelin {
    #[serde(default)]
    pub place_name: PlaceName,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub main_tag: String,
    #[serde(default)]
    pub sub_tags: Vec<String>,
    #[serde(default)]
    pub file: Option<MediaFile>,
    #[serde(default)]
    pub amount_paid: f64,
    #[serde(default)]
    pub currency: Option<String>,
    /// Liker ids; the like count is the length
    #[serde(default)]
    pub likes: Vec<String>,
    #[serde(default)]
    pub views: u64,
}

impl Myelin {
    pub fn like_count(&self) -> u64 {
        self.likes.len() as u64
    }
}

/// A scheduled or logged plan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Plan {
    #[serde(rename = "_id")]
    pub id: String,
    /// Category tag, e.g. "Quick" or "Weekend"
    #[serde(rename = "plan")]
    pub plan_type: String,
    #[serde(default)]
    pub user_id: String,
    /// Date exactly as serialized by the backend
    pub date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub place: Option<Place>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub myelin: Option<Myelin>,
}

impl Plan {
    pub fn new(
        id: impl Into<String>,
        plan_type: impl Into<String>,
        user_id: impl Into<String>,
        date: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            plan_type: plan_type.into(),
            user_id: user_id.into(),
            date: date.into(),
            place: None,
            myelin: None,
        }
    }

    pub fn with_place(mut self, place: Place) -> Self {
        self.place = Some(place);
        self
    }

    pub fn with_myelin(mut self, myelin: Myelin) -> Self {
        self.myelin = Some(myelin);
        self
    }

    /// A plan without place and myelin has nothing to render
    pub fn is_renderable(&self) -> bool {
        self.place.is_some() || self.myelin.is_some()
    }

    /// Calendar day of the plan, if the date parses
    pub fn calendar_day(&self) -> Option<NaiveDate> {
        parse_calendar_day(&self.date)
    }

    /// Media URL of the myelin file, if any
    pub fn media_url(&self) -> Option<&str> {
        self.myelin
            .as_ref()
            .and_then(|m| m.file.as_ref())
            .map(|f| f.url.as_str())
    }

    pub fn like_count(&self) -> u64 {
        self.myelin.as_ref().map(Myelin::like_count).unwrap_or(0)
    }

    pub fn amount_paid(&self) -> f64 {
        self.myelin.as_ref().map(|m| m.amount_paid).unwrap_or(0.0)
    }

    /// Place photos followed by the myelin display URL
    pub fn media_urls(&self) -> Vec<String> {
        let mut urls: Vec<String> = self
            .place
            .as_ref()
            .map(|p| p.photos.iter().map(|photo| photo.url.clone()).collect())
            .unwrap_or_default();
        if let Some(file) = self.myelin.as_ref().and_then(|m| m.file.as_ref()) {
            urls.push(file.display_url().to_string());
        }
        urls
    }
}

/// Parse a serialized plan date down to its calendar day.
///
/// Accepts RFC 3339 timestamps (the day is taken in UTC), naive
/// `YYYY-MM-DDTHH:MM:SS[.fff]` timestamps and bare `YYYY-MM-DD` dates.
pub fn parse_calendar_day(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.naive_utc().date());
    }
    if let Ok(ts) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(ts.date());
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()
}
