use crate::config::Config;
use crate::error::{ControlError, ControlResult};
use crate::library::{Addon, Channel, ChannelGroup, Episode, MediaItem, Movie, TvShow};
use crate::players::{EpisodeFilter, MediaDevice};
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tracing::{debug, warn};

/// Video player id used for transport controls
const VIDEO_PLAYER: i64 = 1;

/// Properties requested for every episode fetch
const EPISODE_PROPERTIES: [&str; 4] = ["playcount", "showtitle", "season", "episode"];

/// JSON-RPC 2.0 response envelope
#[derive(Debug, Deserialize)]
struct RpcResponse {
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    error: Option<RpcError>,
}

#[derive(Debug, Deserialize)]
struct RpcError {
    code: i64,
    message: String,
}

/// Kodi media center via its JSON-RPC API
pub struct KodiClient {
    client: Client,
    url: String,
    user: Option<String>,
    password: Option<String>,
    next_id: AtomicU64,
}

impl KodiClient {
    pub fn new(config: &Config) -> ControlResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;
        let url = format!("http://{}:{}/jsonrpc", config.kodi_host, config.kodi_port);

        Ok(Self {
            client,
            url,
            user: (!config.kodi_user.is_empty()).then(|| config.kodi_user.clone()),
            password: (!config.kodi_password.is_empty()).then(|| config.kodi_password.clone()),
            next_id: AtomicU64::new(1),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Call a JSON-RPC method and return its `result`, if any
    async fn call(&self, method: &str, params: Value) -> ControlResult<Option<Value>> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let body = json!({
            "jsonrpc": "2.0",
            "id": id,
            "method": method,
            "params": params,
        });

        debug!("Kodi request: {} {}", method, body["params"]);

        let mut request = self.client.post(&self.url).json(&body);
        if let Some(user) = &self.user {
            request = request.basic_auth(user, self.password.as_deref());
        }

        let response = request.send().await.map_err(|e| {
            if e.is_connect() {
                ControlError::DeviceCallFailed(format!(
                    "Could not reach Kodi at {}. Is it running?",
                    self.url
                ))
            } else {
                e.into()
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ControlError::DeviceCallFailed(format!(
                "{} returned HTTP {}",
                method, status
            )));
        }

        let rpc: RpcResponse = response.json().await?;
        if let Some(err) = rpc.error {
            warn!("❌ Kodi {} error {}: {}", method, err.code, err.message);
            return Err(ControlError::DeviceCallFailed(format!(
                "{}: {} ({})",
                method, err.message, err.code
            )));
        }

        Ok(rpc.result)
    }

    /// Fire a command whose result only needs to exist
    async fn command(&self, method: &str, params: Value) -> ControlResult<()> {
        self.call(method, params).await.map(|_| ())
    }

    /// Fetch a list stored under `field` in the result
    async fn fetch_list<T: DeserializeOwned>(
        &self,
        method: &str,
        params: Value,
        field: &str,
    ) -> ControlResult<Vec<T>> {
        let result = self.call(method, params).await?;
        extract_list(result, field)
    }
}

/// Pull `result[field]` out as a list; an absent field is an empty result
fn extract_list<T: DeserializeOwned>(result: Option<Value>, field: &str) -> ControlResult<Vec<T>> {
    match result.and_then(|mut r| r.get_mut(field).map(Value::take)) {
        Some(Value::Null) | None => Ok(vec![]),
        Some(list) => Ok(serde_json::from_value(list)?),
    }
}

fn episode_params(show_id: i64, filter: &EpisodeFilter) -> Value {
    let mut params = json!({
        "tvshowid": show_id,
        "properties": EPISODE_PROPERTIES,
    });
    if let Some(season) = filter.season {
        params["season"] = json!(season);
    }
    if filter.sort_by_episode {
        params["sort"] = json!({
            "order": "ascending",
            "method": "episode",
            "ignorearticle": true,
        });
    }
    params
}

#[async_trait]
impl MediaDevice for KodiClient {
    async fn fetch_movies(&self) -> ControlResult<Vec<Movie>> {
        self.fetch_list("VideoLibrary.GetMovies", json!({}), "movies")
            .await
    }

    async fn fetch_shows(&self) -> ControlResult<Vec<TvShow>> {
        self.fetch_list("VideoLibrary.GetTVShows", json!({}), "tvshows")
            .await
    }

    async fn fetch_episodes(
        &self,
        show_id: i64,
        filter: EpisodeFilter,
    ) -> ControlResult<Vec<Episode>> {
        self.fetch_list(
            "VideoLibrary.GetEpisodes",
            episode_params(show_id, &filter),
            "episodes",
        )
        .await
    }

    async fn fetch_channel_groups(&self, channel_type: &str) -> ControlResult<Vec<ChannelGroup>> {
        self.fetch_list(
            "PVR.GetChannelGroups",
            json!({ "channeltype": channel_type }),
            "channelgroups",
        )
        .await
    }

    async fn fetch_channels(&self, group_id: i64) -> ControlResult<Vec<Channel>> {
        self.fetch_list(
            "PVR.GetChannels",
            json!({ "channelgroupid": group_id, "properties": ["channelnumber"] }),
            "channels",
        )
        .await
    }

    async fn fetch_addons(&self) -> ControlResult<Vec<Addon>> {
        self.fetch_list("Addons.GetAddons", json!({}), "addons")
            .await
    }

    async fn open_item(&self, item: MediaItem) -> ControlResult<()> {
        self.command("Player.Open", json!({ "item": item })).await
    }

    async fn enqueue_item(&self, playlist_id: i64, item: MediaItem) -> ControlResult<()> {
        self.command(
            "Playlist.Add",
            json!({ "playlistid": playlist_id, "item": item }),
        )
        .await
    }

    async fn execute_addon(&self, addon_id: &str, params: Option<Value>) -> ControlResult<()> {
        let mut body = json!({ "addonid": addon_id });
        if let Some(params) = params {
            body["params"] = params;
        }
        self.command("Addons.ExecuteAddon", body).await
    }

    async fn set_volume(&self, percent: u8) -> ControlResult<()> {
        self.command("Application.SetVolume", json!({ "volume": percent }))
            .await
    }

    async fn toggle_mute(&self) -> ControlResult<()> {
        self.command("Application.SetMute", json!({ "mute": "toggle" }))
            .await
    }

    async fn play_pause(&self) -> ControlResult<()> {
        self.command("Player.PlayPause", json!({ "playerid": VIDEO_PLAYER }))
            .await
    }

    async fn stop(&self) -> ControlResult<()> {
        self.command("Player.Stop", json!({ "playerid": VIDEO_PLAYER }))
            .await
    }

    async fn health_check(&self) -> bool {
        self.call("JSONRPC.Ping", json!({})).await.is_ok()
    }
}
