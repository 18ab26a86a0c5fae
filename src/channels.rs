//! PVR channel lookup
//!
//! Channels live inside channel groups and are only fetched per group, so
//! a lookup walks the groups in order and stops at the first group whose
//! channels contain a match.

use crate::error::ControlResult;
use crate::library::{Channel, ChannelGroup};
use crate::utils::fuzzy::{FuzzyMatcher, MatchKey};
use std::future::Future;
use tracing::{debug, info, warn};

/// Search `groups` in order, fetching each group's channels lazily.
///
/// A group whose fetch fails or comes back empty is skipped. Groups after
/// the first match are never fetched.
pub async fn find_in_groups<F, Fut>(
    matcher: &FuzzyMatcher,
    groups: &[ChannelGroup],
    query: &str,
    key: MatchKey,
    mut fetch: F,
) -> Option<Channel>
where
    F: FnMut(&ChannelGroup) -> Fut,
    Fut: Future<Output = ControlResult<Vec<Channel>>>,
{
    for group in groups {
        debug!("📺 Searching channel group '{}' ({})", group.label, group.id);

        let channels = match fetch(group).await {
            Ok(channels) if channels.is_empty() => {
                debug!("No channels in group '{}'", group.label);
                continue;
            }
            Ok(channels) => channels,
            Err(e) => {
                warn!("⚠️ Failed to fetch channels for group '{}': {}", group.label, e);
                continue;
            }
        };

        if let Some(channel) = matcher.find_best(&channels, query, key) {
            info!(
                "🎯 Found PVR channel \"{}\" - {} ({}) in group '{}'",
                channel.label, channel.number, channel.id, group.label
            );
            return Some(channel.clone());
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ControlError;
    use std::cell::RefCell;

    fn group(id: i64, label: &str) -> ChannelGroup {
        ChannelGroup {
            id,
            label: label.into(),
        }
    }

    fn channel(id: i64, label: &str, number: u32) -> Channel {
        Channel {
            id,
            label: label.into(),
            number,
        }
    }

    fn lineup(group_id: i64) -> ControlResult<Vec<Channel>> {
        match group_id {
            1 => Ok(vec![channel(10, "News 24", 1), channel(11, "Weather", 2)]),
            2 => Ok(vec![channel(20, "Sports 1", 5)]),
            3 => Ok(vec![channel(30, "Sports 2", 6)]),
            _ => Err(ControlError::DeviceCallFailed("connection reset".into())),
        }
    }

    #[tokio::test]
    async fn test_stops_at_first_matching_group() {
        let matcher = FuzzyMatcher::default();
        let groups = vec![group(1, "A"), group(2, "B"), group(3, "C")];
        let fetched = RefCell::new(Vec::new());

        let found = find_in_groups(&matcher, &groups, "sport", MatchKey::Label, |g| {
            fetched.borrow_mut().push(g.id);
            let result = lineup(g.id);
            async move { result }
        })
        .await;

        assert_eq!(found.map(|c| c.label), Some("Sports 1".to_string()));
        assert_eq!(*fetched.borrow(), vec![1, 2]);
    }

    #[tokio::test]
    async fn test_failed_and_empty_groups_are_skipped() {
        let matcher = FuzzyMatcher::default();
        let groups = vec![group(9, "Broken"), group(4, "Empty"), group(3, "C")];

        let found = find_in_groups(&matcher, &groups, "sports", MatchKey::Label, |g| {
            let result = if g.id == 4 { Ok(vec![]) } else { lineup(g.id) };
            async move { result }
        })
        .await;

        assert_eq!(found.map(|c| c.id), Some(30));
    }

    #[tokio::test]
    async fn test_exhausted_groups_not_found() {
        let matcher = FuzzyMatcher::default();
        let groups = vec![group(1, "A"), group(9, "Broken")];

        let found = find_in_groups(&matcher, &groups, "cartoons", MatchKey::Label, |g| {
            let result = lineup(g.id);
            async move { result }
        })
        .await;

        assert!(found.is_none());
    }

    #[tokio::test]
    async fn test_match_by_number() {
        let matcher = FuzzyMatcher::default();
        let groups = vec![group(1, "A"), group(3, "C")];

        let found = find_in_groups(&matcher, &groups, "6", MatchKey::ChannelNumber, |g| {
            let result = lineup(g.id);
            async move { result }
        })
        .await;

        assert_eq!(found.map(|c| c.id), Some(30));
    }
}
