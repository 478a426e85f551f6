//! Maps user-facing episode numbers onto episode lists and computes
//! previous/next links.
//!
//! Episode number 1 is always the oldest episode. The content API lists
//! episodes newest first, so there number `n` lives at index `len - n`; the
//! JSON store keeps insertion order, where it lives at `n - 1`.

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EpisodeOrder {
    NewestFirst,
    OldestFirst,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Episode {number} not found ({len} available)")]
pub struct EpisodeNotFound {
    pub number: i64,
    pub len: usize,
}

/// Link to a neighbouring episode, disabled when it would fall outside the list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavLink {
    pub number: i64,
    pub enabled: bool,
}

#[derive(Debug, PartialEq, Eq)]
pub struct EpisodeNav<'a, T> {
    pub number: i64,
    pub index: usize,
    pub entry: &'a T,
    pub prev: NavLink,
    pub next: NavLink,
}

/// List index of episode `number`, if it exists
pub fn index_for_number(len: usize, number: i64, order: EpisodeOrder) -> Option<usize> {
    let n = usize::try_from(number).ok()?;
    if n == 0 || n > len {
        return None;
    }
    Some(match order {
        EpisodeOrder::NewestFirst => len - n,
        EpisodeOrder::OldestFirst => n - 1,
    })
}

/// Episode number of the entry at `index`
pub fn number_for_index(len: usize, index: usize, order: EpisodeOrder) -> i64 {
    let number = match order {
        EpisodeOrder::NewestFirst => len.saturating_sub(index),
        EpisodeOrder::OldestFirst => index + 1,
    };
    number as i64
}

/// Resolves episode `number`, reporting numbers outside `1..=len` as not found
pub fn locate<T>(
    episodes: &[T],
    number: i64,
    order: EpisodeOrder,
) -> Result<EpisodeNav<'_, T>, EpisodeNotFound> {
    let len = episodes.len();
    let index = index_for_number(len, number, order).ok_or(EpisodeNotFound { number, len })?;

    Ok(EpisodeNav {
        number,
        index,
        entry: &episodes[index],
        prev: NavLink {
            number: number - 1,
            enabled: number > 1,
        },
        next: NavLink {
            number: number + 1,
            enabled: number + 1 <= len as i64,
        },
    })
}

/// Parses the episode path/query value; a missing or non-numeric value is episode 1
pub fn parse_episode_number(raw: Option<&str>) -> i64 {
    raw.and_then(|value| value.trim().parse::<i64>().ok())
        .unwrap_or(1)
}
