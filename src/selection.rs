//! Episode Selection
//!
//! Picks episodes at random, biased toward the ones watched least. Every
//! episode gets weight `(max_played - playcount) + 1`, so the most watched
//! episode can still come up, just less often.

use crate::library::Episode;
use rand::Rng;
use tracing::debug;

/// Integer weights for each episode, in input order
pub fn weights(episodes: &[Episode]) -> Vec<u64> {
    let max_played = episodes.iter().map(|e| e.playcount).max().unwrap_or(0);
    episodes
        .iter()
        .map(|e| u64::from(max_played - e.playcount) + 1)
        .collect()
}

/// Draw one episode, or `None` for an empty list
pub fn pick_one<'a, R: Rng + ?Sized>(episodes: &'a [Episode], rng: &mut R) -> Option<&'a Episode> {
    if episodes.is_empty() {
        return None;
    }

    let weights = weights(episodes);
    let total: u64 = weights.iter().sum();
    let picked = rng.gen_range(0..total);

    let mut cumulative = 0u64;
    for (episode, weight) in episodes.iter().zip(&weights) {
        cumulative += weight;
        if picked < cumulative {
            debug!(
                "🎲 Random selection: {} (out of {}), season {} episode {} played {} times",
                picked, total, episode.season, episode.episode, episode.playcount
            );
            return Some(episode);
        }
    }

    // cumulative == total > picked, so the loop always returns
    None
}

/// Draw `n` episodes independently from the same list.
///
/// Nothing is carried between draws, so the same episode may appear more
/// than once.
pub fn pick_n<'a, R: Rng + ?Sized>(
    episodes: &'a [Episode],
    n: usize,
    rng: &mut R,
) -> Vec<&'a Episode> {
    (0..n).filter_map(|_| pick_one(episodes, rng)).collect()
}

/// First episode with no plays, in list order
pub fn next_unwatched(episodes: &[Episode]) -> Option<&Episode> {
    episodes.iter().find(|e| e.playcount == 0)
}

/// First episode with the exact season and episode number, in list order
pub fn specific(episodes: &[Episode], season: u32, episode: u32) -> Option<&Episode> {
    episodes
        .iter()
        .find(|e| e.season == season && e.episode == episode)
}
