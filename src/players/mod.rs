use crate::error::ControlResult;
use crate::library::{Addon, Channel, ChannelGroup, Episode, MediaItem, Movie, TvShow};
use async_trait::async_trait;

/// Playlist that video items are queued onto
pub const VIDEO_PLAYLIST: i64 = 1;

/// Restricts and orders an episode fetch
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EpisodeFilter {
    /// Only episodes from this season
    pub season: Option<u32>,
    /// Ask the device to sort ascending by episode number
    pub sort_by_episode: bool,
}

impl EpisodeFilter {
    /// Whole show, ascending by episode
    pub fn ordered() -> Self {
        Self {
            season: None,
            sort_by_episode: true,
        }
    }

    /// One season, in whatever order the device returns
    pub fn season(season: u32) -> Self {
        Self {
            season: Some(season),
            sort_by_episode: false,
        }
    }
}

/// The remote media device.
///
/// Fetches return `Ok(vec![])` when the device answered with no result
/// set, and `Err` only when the call itself failed.
#[async_trait]
pub trait MediaDevice: Send + Sync {
    /// All movies in the library
    async fn fetch_movies(&self) -> ControlResult<Vec<Movie>>;

    /// All TV shows in the library
    async fn fetch_shows(&self) -> ControlResult<Vec<TvShow>>;

    /// Episodes of one show
    async fn fetch_episodes(&self, show_id: i64, filter: EpisodeFilter)
        -> ControlResult<Vec<Episode>>;

    /// PVR channel groups of the given type ("tv" or "radio")
    async fn fetch_channel_groups(&self, channel_type: &str) -> ControlResult<Vec<ChannelGroup>>;

    /// Channels inside one group
    async fn fetch_channels(&self, group_id: i64) -> ControlResult<Vec<Channel>>;

    /// Installed addons
    async fn fetch_addons(&self) -> ControlResult<Vec<Addon>>;

    /// Play an item now, replacing current playback
    async fn open_item(&self, item: MediaItem) -> ControlResult<()>;

    /// Append an item to a playlist without interrupting playback
    async fn enqueue_item(&self, playlist_id: i64, item: MediaItem) -> ControlResult<()>;

    /// Run an addon, optionally with parameters
    async fn execute_addon(
        &self,
        addon_id: &str,
        params: Option<serde_json::Value>,
    ) -> ControlResult<()>;

    async fn set_volume(&self, percent: u8) -> ControlResult<()>;

    async fn toggle_mute(&self) -> ControlResult<()>;

    async fn play_pause(&self) -> ControlResult<()>;

    async fn stop(&self) -> ControlResult<()>;

    /// Check if the device is reachable
    async fn health_check(&self) -> bool;
}

pub mod kodi;

pub use kodi::KodiClient;
