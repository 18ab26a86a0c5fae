//! Mock Media Device for Testing
//!
//! Serves canned library snapshots and records every call made to it.

use async_trait::async_trait;
use kodivoice::error::{ControlError, ControlResult};
use kodivoice::library::{Addon, Channel, ChannelGroup, Episode, MediaItem, Movie, TvShow};
use kodivoice::players::{EpisodeFilter, MediaDevice};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

/// One recorded call
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    FetchMovies,
    FetchShows,
    FetchEpisodes(i64, EpisodeFilter),
    FetchChannelGroups(String),
    FetchChannels(i64),
    FetchAddons,
    Open(MediaItem),
    Enqueue(i64, MediaItem),
    ExecuteAddon(String, Option<serde_json::Value>),
    SetVolume(u8),
    ToggleMute,
    PlayPause,
    Stop,
}

impl Call {
    /// True for calls that change device state
    pub fn is_command(&self) -> bool {
        !matches!(
            self,
            Call::FetchMovies
                | Call::FetchShows
                | Call::FetchEpisodes(..)
                | Call::FetchChannelGroups(_)
                | Call::FetchChannels(_)
                | Call::FetchAddons
        )
    }
}

/// Mock device backed by in-memory snapshots
#[derive(Debug, Default)]
pub struct MockDevice {
    pub movies: Vec<Movie>,
    pub shows: Vec<TvShow>,
    pub episodes: HashMap<i64, Vec<Episode>>,
    pub groups: Vec<ChannelGroup>,
    pub channels: HashMap<i64, Vec<Channel>>,
    /// Groups whose channel fetch fails
    pub broken_groups: HashSet<i64>,
    pub addons: Vec<Addon>,
    /// Make every command fail
    pub fail_commands: bool,
    /// All calls, in the order they reached the device
    pub calls: Arc<Mutex<Vec<Call>>>,
}

impl MockDevice {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get all recorded calls
    pub fn get_calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    /// Only the calls that change device state
    pub fn commands(&self) -> Vec<Call> {
        self.get_calls().into_iter().filter(Call::is_command).collect()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    fn command(&self, call: Call) -> ControlResult<()> {
        self.record(call);
        if self.fail_commands {
            return Err(ControlError::DeviceCallFailed("Mock device failure".into()));
        }
        Ok(())
    }
}

#[async_trait]
impl MediaDevice for MockDevice {
    async fn fetch_movies(&self) -> ControlResult<Vec<Movie>> {
        self.record(Call::FetchMovies);
        Ok(self.movies.clone())
    }

    async fn fetch_shows(&self) -> ControlResult<Vec<TvShow>> {
        self.record(Call::FetchShows);
        Ok(self.shows.clone())
    }

    async fn fetch_episodes(
        &self,
        show_id: i64,
        filter: EpisodeFilter,
    ) -> ControlResult<Vec<Episode>> {
        self.record(Call::FetchEpisodes(show_id, filter.clone()));
        let episodes = self.episodes.get(&show_id).cloned().unwrap_or_default();
        Ok(episodes
            .into_iter()
            .filter(|e| filter.season.map_or(true, |s| e.season == s))
            .collect())
    }

    async fn fetch_channel_groups(&self, channel_type: &str) -> ControlResult<Vec<ChannelGroup>> {
        self.record(Call::FetchChannelGroups(channel_type.to_string()));
        Ok(self.groups.clone())
    }

    async fn fetch_channels(&self, group_id: i64) -> ControlResult<Vec<Channel>> {
        self.record(Call::FetchChannels(group_id));
        if self.broken_groups.contains(&group_id) {
            return Err(ControlError::DeviceCallFailed("Mock group failure".into()));
        }
        Ok(self.channels.get(&group_id).cloned().unwrap_or_default())
    }

    async fn fetch_addons(&self) -> ControlResult<Vec<Addon>> {
        self.record(Call::FetchAddons);
        Ok(self.addons.clone())
    }

    async fn open_item(&self, item: MediaItem) -> ControlResult<()> {
        self.command(Call::Open(item))
    }

    async fn enqueue_item(&self, playlist_id: i64, item: MediaItem) -> ControlResult<()> {
        self.command(Call::Enqueue(playlist_id, item))
    }

    async fn execute_addon(
        &self,
        addon_id: &str,
        params: Option<serde_json::Value>,
    ) -> ControlResult<()> {
        self.command(Call::ExecuteAddon(addon_id.to_string(), params))
    }

    async fn set_volume(&self, percent: u8) -> ControlResult<()> {
        self.command(Call::SetVolume(percent))
    }

    async fn toggle_mute(&self) -> ControlResult<()> {
        self.command(Call::ToggleMute)
    }

    async fn play_pause(&self) -> ControlResult<()> {
        self.command(Call::PlayPause)
    }

    async fn stop(&self) -> ControlResult<()> {
        self.command(Call::Stop)
    }

    async fn health_check(&self) -> bool {
        true
    }
}
