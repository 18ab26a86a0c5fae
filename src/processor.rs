//! Request Processor
//!
//! Resolves a validated [`Request`] against a fresh snapshot from the media
//! device and dispatches the resulting actions. Queries arrive already
//! normalized by [`Request::parse`]; they are only trimmed here.
//!
//! Every resolving request walks the same path: fetch a snapshot, run the
//! matcher or selector over it, then fire actions without waiting for them.
//! A request fails before dispatch with `NoResults` when a snapshot is empty
//! or nothing in it matches, and with a device error when a fetch fails.

use crate::channels::find_in_groups;
use crate::core::TextNormalizer;
use crate::dispatch::{Action, BestEffort};
use crate::error::{ControlError, ControlResult};
use crate::library::{Addon, Episode, MediaItem, TvShow};
use crate::players::{EpisodeFilter, MediaDevice, VIDEO_PLAYLIST};
use crate::request::{self, Request};
use crate::selection;
use crate::utils::fuzzy::{FuzzyMatcher, MatchKey};
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info};

/// CEC addon used to wake the TV and switch it to Kodi's input
const CEC_ADDON: &str = "script.json-cec";

/// Channel type searched by PVR requests
const TV_CHANNELS: &str = "tv";

/// What a request did
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Outcome {
    /// Actions were issued, in this order
    Dispatched { actions: Vec<Action> },
    /// The request resolved but there was nothing to play
    NothingToDo,
}

pub struct Processor {
    device: Arc<dyn MediaDevice>,
    dispatcher: BestEffort,
    matcher: FuzzyMatcher,
    normalizer: TextNormalizer,
    /// Wake the TV before starting playback
    activate_tv_on_play: bool,
}

impl Processor {
    pub fn new(device: Arc<dyn MediaDevice>, matcher: FuzzyMatcher, normalizer: TextNormalizer) -> Self {
        Self {
            dispatcher: BestEffort::new(Arc::clone(&device)),
            device,
            matcher,
            normalizer,
            activate_tv_on_play: false,
        }
    }

    /// Fire the TV activation addon ahead of every playback request
    pub fn with_tv_activation(mut self, enabled: bool) -> Self {
        self.activate_tv_on_play = enabled;
        self
    }

    pub fn normalizer(&self) -> &TextNormalizer {
        &self.normalizer
    }

    /// Check if the media device answers
    pub async fn device_reachable(&self) -> bool {
        self.device.health_check().await
    }

    /// Resolve and dispatch one request
    pub async fn handle(&self, request: Request) -> ControlResult<Outcome> {
        debug!("Handling {:?} ({:?})", request, request.policy());
        request.validate()?;

        if self.activate_tv_on_play && request.starts_playback() {
            info!("📺 Activating TV first..");
            self.dispatcher.fire(activate_tv_action());
        }

        match request {
            Request::PlayMovie { title } => self.play_movie(&title).await,
            Request::PlayTvShow { title } => self.play_tvshow(&title).await,
            Request::PlayEpisode {
                title,
                season,
                episode,
            } => self.play_episode(&title, season, episode).await,
            Request::PlayRandomEpisode { title } => self.play_random_episode(&title).await,
            Request::QueueRandomEpisode { title } => self.queue_random_episode(&title).await,
            Request::PlayRandomEpisodes { title, count } => {
                self.play_n_random_episodes(&title, count).await
            }
            Request::PlayChannelByName { name } => self.play_channel_by_name(&name).await,
            Request::PlayChannelByNumber { number } => self.play_channel_by_number(&number).await,
            Request::ExecuteAddon { name } => self.execute_addon(&name).await,
            Request::PlayPause => Ok(self.dispatch(vec![Action::PlayPause])),
            Request::Stop => Ok(self.dispatch(vec![Action::Stop])),
            Request::ToggleMute => Ok(self.dispatch(vec![Action::ToggleMute])),
            Request::SetVolume { percent } => self.set_volume(percent),
            Request::ActivateTv => Ok(self.dispatch(vec![activate_tv_action()])),
        }
    }

    /// Play the movie whose title best matches `title`
    pub async fn play_movie(&self, title: &str) -> ControlResult<Outcome> {
        let title = request::require_text(title)?;
        info!("🎬 Movie request received to play \"{}\"", title);

        let movies = non_empty(self.device.fetch_movies().await?)?;
        let movie = self
            .matcher
            .find_best(&movies, title, MatchKey::Label)
            .ok_or_else(|| ControlError::NoResults(format!("Couldn't find movie \"{}\"", title)))?;

        info!("🎯 Found movie \"{}\" ({})", movie.label, movie.id);
        Ok(self.dispatch(vec![Action::Open {
            item: MediaItem::Movie(movie.id),
        }]))
    }

    /// Play the first unwatched episode of a show.
    ///
    /// A show with nothing left unwatched is not an error; no action is
    /// dispatched and the outcome is [`Outcome::NothingToDo`].
    pub async fn play_tvshow(&self, title: &str) -> ControlResult<Outcome> {
        let title = request::require_text(title)?;
        info!("📺 TV Show request received to play \"{}\"", title);

        let show = self.find_show(title).await?;
        let episodes = self.fetch_episodes(&show, EpisodeFilter::ordered()).await?;

        match selection::next_unwatched(&episodes) {
            Some(episode) => {
                info!(
                    "▶️ Playing season {} episode {} (ID: {})",
                    episode.season, episode.episode, episode.id
                );
                Ok(self.dispatch(vec![open_episode(episode)]))
            }
            None => {
                info!("✅ No unwatched episodes left in \"{}\"", show.label);
                Ok(Outcome::NothingToDo)
            }
        }
    }

    /// Play an exact season and episode of a show
    pub async fn play_episode(&self, title: &str, season: u32, episode: u32) -> ControlResult<Outcome> {
        let title = request::require_text(title)?;
        let episode = request::check_episode(episode)?;
        info!(
            "📺 Specific Episode request received to play \"{}\" Season {} Episode {}",
            title, season, episode
        );

        let show = self.find_show(title).await?;
        let episodes = self.fetch_episodes(&show, EpisodeFilter::season(season)).await?;

        let found = selection::specific(&episodes, season, episode).ok_or_else(|| {
            ControlError::NoResults(format!(
                "\"{}\" has no season {} episode {}",
                show.label, season, episode
            ))
        })?;

        info!(
            "▶️ Playing season {} episode {} (ID: {})",
            found.season, found.episode, found.id
        );
        Ok(self.dispatch(vec![open_episode(found)]))
    }

    /// Play one weighted-random episode of a show
    pub async fn play_random_episode(&self, title: &str) -> ControlResult<Outcome> {
        let title = request::require_text(title)?;
        info!("🎲 Random Episode request received to play \"{}\"", title);

        let episode_ids = self.random_episodes(title, 1).await?;
        Ok(self.dispatch(episode_actions(&episode_ids, false)))
    }

    /// Queue one weighted-random episode of a show behind current playback
    pub async fn queue_random_episode(&self, title: &str) -> ControlResult<Outcome> {
        let title = request::require_text(title)?;
        info!("🎲 Random Episode request received to queue \"{}\"", title);

        let episode_ids = self.random_episodes(title, 1).await?;
        Ok(self.dispatch(episode_actions(&episode_ids, true)))
    }

    /// Play `count` independently drawn episodes: the first one opens and
    /// the rest are queued.
    ///
    /// All of them are fired at once, so the device may receive the queue
    /// additions before the open has taken effect.
    pub async fn play_n_random_episodes(&self, title: &str, count: u32) -> ControlResult<Outcome> {
        let title = request::require_text(title)?;
        let count = request::check_count(count)?;
        info!(
            "🎲 Random N={} episodes request received to queue \"{}\"",
            count, title
        );

        let episode_ids = self.random_episodes(title, count as usize).await?;
        Ok(self.dispatch(episode_actions(&episode_ids, false)))
    }

    pub async fn play_channel_by_name(&self, name: &str) -> ControlResult<Outcome> {
        self.play_channel(name, MatchKey::Label).await
    }

    pub async fn play_channel_by_number(&self, number: &str) -> ControlResult<Outcome> {
        self.play_channel(number, MatchKey::ChannelNumber).await
    }

    /// Execute the first addon whose id contains `name`
    pub async fn execute_addon(&self, name: &str) -> ControlResult<Outcome> {
        let name = request::require_text(name)?;
        info!("🧩 Addon request received to execute \"{}\"", name);

        let addons = non_empty(self.device.fetch_addons().await?)?;
        let addon = find_addon(&addons, name).ok_or_else(|| {
            ControlError::NoResults(format!(
                "Couldn't find addon \"{}\" in the {} addons listed",
                name,
                addons.len()
            ))
        })?;

        info!("🎯 Found addon \"{}\" (type {})", addon.id, addon.addon_type);
        Ok(self.dispatch(vec![Action::ExecuteAddon {
            addon_id: addon.id.clone(),
            params: None,
        }]))
    }

    pub fn set_volume(&self, percent: u8) -> ControlResult<Outcome> {
        let percent = request::check_volume(percent)?;
        info!("🔊 Set volume to {} percent", percent);
        Ok(self.dispatch(vec![Action::SetVolume { percent }]))
    }

    async fn play_channel(&self, query: &str, key: MatchKey) -> ControlResult<Outcome> {
        let query = request::require_text(query)?;
        info!("📡 PVR channel request received to play \"{}\"", query);

        let groups = self.device.fetch_channel_groups(TV_CHANNELS).await?;
        if groups.is_empty() {
            return Err(ControlError::NoResults(
                "no channel groups were found. Perhaps PVR is not setup?".into(),
            ));
        }

        let channel = find_in_groups(&self.matcher, &groups, query, key, |group| {
            self.device.fetch_channels(group.id)
        })
        .await
        .ok_or_else(|| ControlError::NoResults(format!("Couldn't find channel \"{}\"", query)))?;

        Ok(self.dispatch(vec![Action::Open {
            item: MediaItem::Channel(channel.id),
        }]))
    }

    /// Resolve a show and draw `n` episode ids from it
    async fn random_episodes(&self, title: &str, n: usize) -> ControlResult<Vec<i64>> {
        let show = self.find_show(title).await?;
        let episodes = self.fetch_episodes(&show, EpisodeFilter::ordered()).await?;
        info!("📚 Found {} episodes of {}", episodes.len(), show.label);

        let mut rng = rand::thread_rng();
        let ids = selection::pick_n(&episodes, n, &mut rng)
            .into_iter()
            .map(|e| e.id)
            .collect();
        Ok(ids)
    }

    async fn find_show(&self, title: &str) -> ControlResult<TvShow> {
        let shows = non_empty(self.device.fetch_shows().await?)?;
        let show = self
            .matcher
            .find_best(&shows, title, MatchKey::Label)
            .ok_or_else(|| ControlError::NoResults(format!("Couldn't find tv show \"{}\"", title)))?;

        info!("🎯 Found tv show \"{}\" ({})", show.label, show.id);
        Ok(show.clone())
    }

    async fn fetch_episodes(&self, show: &TvShow, filter: EpisodeFilter) -> ControlResult<Vec<Episode>> {
        debug!("Searching episodes of Show ID {} with {:?}", show.id, filter);
        non_empty(self.device.fetch_episodes(show.id, filter).await?)
    }

    fn dispatch(&self, actions: Vec<Action>) -> Outcome {
        self.dispatcher.fire_all(&actions);
        Outcome::Dispatched { actions }
    }
}

fn non_empty<T>(snapshot: Vec<T>) -> ControlResult<Vec<T>> {
    if snapshot.is_empty() {
        return Err(ControlError::NoResults("no results".into()));
    }
    Ok(snapshot)
}

fn open_episode(episode: &Episode) -> Action {
    Action::Open {
        item: MediaItem::Episode(episode.id),
    }
}

/// Open the first episode (unless queueing only) and enqueue the rest
fn episode_actions(episode_ids: &[i64], queue_only: bool) -> Vec<Action> {
    episode_ids
        .iter()
        .enumerate()
        .map(|(i, &id)| {
            let item = MediaItem::Episode(id);
            if i == 0 && !queue_only {
                Action::Open { item }
            } else {
                Action::Enqueue {
                    playlist_id: VIDEO_PLAYLIST,
                    item,
                }
            }
        })
        .collect()
}

/// First addon whose id contains `name`, ignoring case
fn find_addon<'a>(addons: &'a [Addon], name: &str) -> Option<&'a Addon> {
    let name = name.to_lowercase();
    addons.iter().find(|a| a.id.to_lowercase().contains(&name))
}

fn activate_tv_action() -> Action {
    Action::ExecuteAddon {
        addon_id: CEC_ADDON.to_string(),
        params: Some(serde_json::json!({ "command": "activate" })),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addon(id: &str) -> Addon {
        Addon {
            id: id.into(),
            addon_type: "xbmc.python.pluginsource".into(),
        }
    }

    #[test]
    fn test_find_addon_substring() {
        let addons = vec![addon("plugin.video.youtube"), addon("plugin.video.vimeo")];
        assert_eq!(
            find_addon(&addons, "YouTube").map(|a| a.id.as_str()),
            Some("plugin.video.youtube")
        );
        assert!(find_addon(&addons, "netflix").is_none());
    }

    #[test]
    fn test_find_addon_first_wins() {
        let addons = vec![addon("plugin.video.vimeo"), addon("plugin.video.vimeo.beta")];
        assert_eq!(
            find_addon(&addons, "vimeo").map(|a| a.id.as_str()),
            Some("plugin.video.vimeo")
        );
    }

    #[test]
    fn test_episode_actions() {
        let actions = episode_actions(&[4, 4, 9], false);
        assert_eq!(
            actions,
            vec![
                Action::Open {
                    item: MediaItem::Episode(4)
                },
                Action::Enqueue {
                    playlist_id: VIDEO_PLAYLIST,
                    item: MediaItem::Episode(4)
                },
                Action::Enqueue {
                    playlist_id: VIDEO_PLAYLIST,
                    item: MediaItem::Episode(9)
                },
            ]
        );

        let queued = episode_actions(&[4], true);
        assert!(matches!(queued[0], Action::Enqueue { .. }));
    }

    #[test]
    fn test_non_empty() {
        assert!(matches!(
            non_empty::<u32>(vec![]),
            Err(ControlError::NoResults(_))
        ));
        assert_eq!(non_empty(vec![1]).unwrap(), vec![1]);
    }
}
