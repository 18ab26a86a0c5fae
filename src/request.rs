//! Request parsing
//!
//! Turns the raw `q` / `e` / `n` parameters of an inbound request into a
//! validated [`Request`]. Anything malformed is rejected here, before the
//! device is contacted.

use crate::core::TextNormalizer;
use crate::error::{ControlError, ControlResult};
use serde::Deserialize;

/// Most episodes a single request may draw
pub const MAX_EPISODE_COUNT: u32 = 99;

/// How a request picks what to play
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionPolicy {
    BestFuzzyMatch,
    NextUnwatchedEpisode,
    SpecificSeasonEpisode,
    OneWeightedRandomEpisode,
    NWeightedRandomEpisodes,
    CascadingChannelMatch,
    AddonIdSubstringMatch,
}

/// Raw query string parameters
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawParams {
    pub q: Option<String>,
    pub e: Option<String>,
    pub n: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Request {
    PlayMovie { title: String },
    PlayTvShow { title: String },
    PlayEpisode { title: String, season: u32, episode: u32 },
    PlayRandomEpisode { title: String },
    QueueRandomEpisode { title: String },
    PlayRandomEpisodes { title: String, count: u32 },
    PlayChannelByName { name: String },
    PlayChannelByNumber { number: String },
    ExecuteAddon { name: String },
    PlayPause,
    Stop,
    ToggleMute,
    SetVolume { percent: u8 },
    ActivateTv,
}

impl Request {
    /// Build a request from its endpoint name and raw parameters
    pub fn parse(kind: &str, params: &RawParams, normalizer: &TextNormalizer) -> ControlResult<Self> {
        let request = match kind {
            "playmovie" => Request::PlayMovie {
                title: required_query(params, normalizer)?,
            },
            "playtvshow" => Request::PlayTvShow {
                title: required_query(params, normalizer)?,
            },
            "playepisode" => {
                let raw = params.q.as_deref().unwrap_or_default();
                let (title, season) = normalizer.split_season(raw);
                if title.is_empty() {
                    return Err(ControlError::InvalidInput("missing show title".into()));
                }
                let season = season.ok_or_else(|| {
                    ControlError::InvalidInput(format!("no season number in \"{}\"", raw.trim()))
                })?;
                let episode = params
                    .e
                    .as_deref()
                    .and_then(|e| normalizer.parse_number(e))
                    .ok_or_else(|| ControlError::InvalidInput("missing episode number".into()))?;
                Request::PlayEpisode {
                    title,
                    season,
                    episode,
                }
            }
            "playrandomepisode" => Request::PlayRandomEpisode {
                title: required_query(params, normalizer)?,
            },
            "queuerandomepisode" => Request::QueueRandomEpisode {
                title: required_query(params, normalizer)?,
            },
            "playnrandomepisodes" => {
                let title = required_query(params, normalizer)?;
                let count = params
                    .n
                    .as_deref()
                    .and_then(|n| normalizer.parse_number(n))
                    .ok_or_else(|| {
                        ControlError::InvalidInput("episode count must be a positive integer".into())
                    })?;
                Request::PlayRandomEpisodes {
                    title,
                    count: check_count(count)?,
                }
            }
            "playpvrchannelbyname" => Request::PlayChannelByName {
                name: required_query(params, normalizer)?,
            },
            "playpvrchannelbynumber" => Request::PlayChannelByNumber {
                number: required_query(params, normalizer)?,
            },
            "executeaddon" => Request::ExecuteAddon {
                name: required_query(params, normalizer)?,
            },
            "playpause" => Request::PlayPause,
            "stop" => Request::Stop,
            "mute" => Request::ToggleMute,
            "volume" => {
                let raw = params.q.as_deref().unwrap_or_default().trim();
                let percent = raw.parse::<u8>().map_err(|_| {
                    ControlError::InvalidInput(format!("volume \"{}\" is not 0-100", raw))
                })?;
                Request::SetVolume {
                    percent: check_volume(percent)?,
                }
            }
            "activatetv" => Request::ActivateTv,
            other => {
                return Err(ControlError::InvalidInput(format!(
                    "unknown request kind \"{}\"",
                    other
                )))
            }
        };

        Ok(request)
    }

    /// Reject malformed fields without touching the device.
    ///
    /// `parse` only builds requests that pass, but a `Request` can also be
    /// constructed directly.
    pub fn validate(&self) -> ControlResult<()> {
        match self {
            Request::PlayMovie { title }
            | Request::PlayTvShow { title }
            | Request::PlayRandomEpisode { title }
            | Request::QueueRandomEpisode { title } => require_text(title).map(drop),
            Request::PlayEpisode { title, episode, .. } => {
                require_text(title)?;
                check_episode(*episode).map(drop)
            }
            Request::PlayRandomEpisodes { title, count } => {
                require_text(title)?;
                check_count(*count).map(drop)
            }
            Request::PlayChannelByName { name: query }
            | Request::PlayChannelByNumber { number: query }
            | Request::ExecuteAddon { name: query } => require_text(query).map(drop),
            Request::SetVolume { percent } => check_volume(*percent).map(drop),
            Request::PlayPause | Request::Stop | Request::ToggleMute | Request::ActivateTv => Ok(()),
        }
    }

    /// Selection policy, for requests that resolve something
    pub fn policy(&self) -> Option<SelectionPolicy> {
        match self {
            Request::PlayMovie { .. } => Some(SelectionPolicy::BestFuzzyMatch),
            Request::PlayTvShow { .. } => Some(SelectionPolicy::NextUnwatchedEpisode),
            Request::PlayEpisode { .. } => Some(SelectionPolicy::SpecificSeasonEpisode),
            Request::PlayRandomEpisode { .. } | Request::QueueRandomEpisode { .. } => {
                Some(SelectionPolicy::OneWeightedRandomEpisode)
            }
            Request::PlayRandomEpisodes { .. } => Some(SelectionPolicy::NWeightedRandomEpisodes),
            Request::PlayChannelByName { .. } | Request::PlayChannelByNumber { .. } => {
                Some(SelectionPolicy::CascadingChannelMatch)
            }
            Request::ExecuteAddon { .. } => Some(SelectionPolicy::AddonIdSubstringMatch),
            _ => None,
        }
    }

    /// True for requests that start playback
    pub fn starts_playback(&self) -> bool {
        matches!(
            self,
            Request::PlayMovie { .. }
                | Request::PlayTvShow { .. }
                | Request::PlayEpisode { .. }
                | Request::PlayRandomEpisode { .. }
                | Request::QueueRandomEpisode { .. }
                | Request::PlayRandomEpisodes { .. }
                | Request::PlayChannelByName { .. }
                | Request::PlayChannelByNumber { .. }
        )
    }
}

fn required_query(params: &RawParams, normalizer: &TextNormalizer) -> ControlResult<String> {
    let query = normalizer.normalize(params.q.as_deref().unwrap_or_default());
    if query.is_empty() {
        return Err(ControlError::InvalidInput("missing query parameter q".into()));
    }
    Ok(query)
}

/// Trimmed `text`, or `InvalidInput` if nothing is left
pub(crate) fn require_text(text: &str) -> ControlResult<&str> {
    let text = text.trim();
    if text.is_empty() {
        return Err(ControlError::InvalidInput("missing query".into()));
    }
    Ok(text)
}

pub(crate) fn check_episode(episode: u32) -> ControlResult<u32> {
    if episode == 0 {
        return Err(ControlError::InvalidInput("episode number must be positive".into()));
    }
    Ok(episode)
}

pub(crate) fn check_count(count: u32) -> ControlResult<u32> {
    if count == 0 || count > MAX_EPISODE_COUNT {
        return Err(ControlError::InvalidInput(format!(
            "episode count must be between 1 and {}",
            MAX_EPISODE_COUNT
        )));
    }
    Ok(count)
}

pub(crate) fn check_volume(percent: u8) -> ControlResult<u8> {
    if percent > 100 {
        return Err(ControlError::InvalidInput(format!(
            "volume {} is not 0-100",
            percent
        )));
    }
    Ok(percent)
}
