//! Best-effort dispatch
//!
//! Device commands are issued as detached tasks. The caller gets control
//! back as soon as the command is issued; its outcome is logged and then
//! dropped. Nothing awaits a dispatched action and nothing retries it.

use crate::error::ControlResult;
use crate::library::MediaItem;
use crate::players::MediaDevice;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, warn};

/// A command for the media device
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Action {
    /// Play now, replacing current playback
    Open { item: MediaItem },
    /// Append to a playlist without interrupting playback
    Enqueue { playlist_id: i64, item: MediaItem },
    ExecuteAddon {
        addon_id: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        params: Option<serde_json::Value>,
    },
    PlayPause,
    Stop,
    ToggleMute,
    SetVolume { percent: u8 },
}

impl Action {
    /// Run the action against `device` and wait for it
    pub async fn execute(&self, device: &dyn MediaDevice) -> ControlResult<()> {
        match self {
            Action::Open { item } => device.open_item(*item).await,
            Action::Enqueue { playlist_id, item } => device.enqueue_item(*playlist_id, *item).await,
            Action::ExecuteAddon { addon_id, params } => {
                device.execute_addon(addon_id, params.clone()).await
            }
            Action::PlayPause => device.play_pause().await,
            Action::Stop => device.stop().await,
            Action::ToggleMute => device.toggle_mute().await,
            Action::SetVolume { percent } => device.set_volume(*percent).await,
        }
    }
}

/// Fires actions without waiting for them
#[derive(Clone)]
pub struct BestEffort {
    device: Arc<dyn MediaDevice>,
}

impl BestEffort {
    pub fn new(device: Arc<dyn MediaDevice>) -> Self {
        Self { device }
    }

    /// Issue `action` on a detached task.
    ///
    /// Must be called from within a Tokio runtime. The join handle is
    /// dropped here, so a failure after this point is only visible in logs.
    pub fn fire(&self, action: Action) {
        let device = Arc::clone(&self.device);
        let _detached = tokio::spawn(async move {
            match action.execute(device.as_ref()).await {
                Ok(()) => debug!("✅ Dispatched {:?}", action),
                Err(e) => warn!("❌ Dispatch of {:?} failed: {}", action, e),
            }
        });
    }

    /// Issue several actions in order, none waiting on another
    pub fn fire_all(&self, actions: &[Action]) {
        for action in actions {
            self.fire(action.clone());
        }
    }
}
