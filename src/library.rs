//! Library snapshot types
//!
//! Entities returned by the media device for a single resolution. A
//! snapshot is a plain `Vec` of these, owned by one request and never
//! mutated once fetched.

use serde::{Deserialize, Serialize};

/// Something the fuzzy matcher can score a query against
pub trait Candidate {
    /// Display label
    fn label(&self) -> &str;

    /// Channel number, for candidates that have one
    fn channel_number(&self) -> Option<u32> {
        None
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Movie {
    #[serde(rename = "movieid")]
    pub id: i64,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TvShow {
    #[serde(rename = "tvshowid")]
    pub id: i64,
    pub label: String,
}

/// A single episode. `playcount` is required: an episode list without
/// play counts is rejected when it is deserialized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Episode {
    #[serde(rename = "episodeid")]
    pub id: i64,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub showtitle: String,
    pub season: u32,
    pub episode: u32,
    pub playcount: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelGroup {
    #[serde(rename = "channelgroupid")]
    pub id: i64,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Channel {
    #[serde(rename = "channelid")]
    pub id: i64,
    pub label: String,
    #[serde(rename = "channelnumber", default)]
    pub number: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Addon {
    #[serde(rename = "addonid")]
    pub id: String,
    #[serde(rename = "type", default)]
    pub addon_type: String,
}

impl Candidate for Movie {
    fn label(&self) -> &str {
        &self.label
    }
}

impl Candidate for TvShow {
    fn label(&self) -> &str {
        &self.label
    }
}

impl Candidate for Episode {
    fn label(&self) -> &str {
        &self.label
    }
}

impl Candidate for Channel {
    fn label(&self) -> &str {
        &self.label
    }

    fn channel_number(&self) -> Option<u32> {
        Some(self.number)
    }
}

/// Opaque identifier of a playable item, serialized the way the device
/// expects it inside `item` (e.g. `{"episodeid": 42}`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MediaItem {
    #[serde(rename = "movieid")]
    Movie(i64),
    #[serde(rename = "episodeid")]
    Episode(i64),
    #[serde(rename = "channelid")]
    Channel(i64),
}
