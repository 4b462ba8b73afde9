//! In-memory state of one running giveaway.

use crate::board::Announcement;
use chrono::{DateTime, Utc};
use hearth_common::{ChannelId, MessageId, TenantId, UserId};
use rand::seq::IndexedRandom;
use std::collections::HashSet;

/// Lifecycle of a giveaway.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GiveawayState {
    /// Accepting entries.
    Active,
    /// Resolved; no further entries.
    Ended,
}

/// One giveaway, keyed by its announcement message. Never persisted.
#[derive(Debug, Clone)]
pub struct GiveawayInstance {
    /// Announcement message.
    pub message_id: MessageId,
    /// Owning tenant.
    pub tenant: TenantId,
    /// Channel holding the announcement.
    pub channel: ChannelId,
    /// What is being given away.
    pub prize: String,
    /// Who started it.
    pub host: UserId,
    /// When entries close.
    pub ends_at: DateTime<Utc>,
    /// Requested number of winners.
    pub winners: u32,
    /// Distinct entrants.
    pub entrants: HashSet<UserId>,
    /// Decorative emoji.
    pub emoji: String,
    /// Embed color.
    pub color: u32,
    /// Optional image.
    pub image_url: Option<String>,
    /// Lifecycle state.
    pub state: GiveawayState,
}

impl GiveawayInstance {
    /// Number of distinct entrants.
    #[must_use]
    pub fn entry_count(&self) -> usize {
        self.entrants.len()
    }

    /// Whether entries are still accepted.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.state == GiveawayState::Active
    }

    /// The announcement as it should currently look.
    #[must_use]
    pub fn announcement(&self) -> Announcement {
        Announcement {
            prize: self.prize.clone(),
            host: self.host,
            winners: self.winners,
            entries: self.entry_count(),
            ends_at: self.ends_at,
            emoji: self.emoji.clone(),
            color: self.color,
            image_url: self.image_url.clone(),
            ended: !self.is_active(),
        }
    }

    /// Draws up to `winners` distinct entrants uniformly at random.
    #[must_use]
    pub fn draw(&self) -> Vec<UserId> {
        let mut pool: Vec<UserId> = self.entrants.iter().copied().collect();
        pool.sort_unstable();
        draw_winners(&pool, self.winners as usize)
    }
}

/// Picks `min(count, pool.len())` distinct entries without replacement.
#[must_use]
pub fn draw_winners(pool: &[UserId], count: usize) -> Vec<UserId> {
    pool.choose_multiple(&mut rand::rng(), count).copied().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use hearth_common::test_utils::property_testing::user_id_strategy;
    use proptest::collection::hash_set;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn prop_draw_is_distinct_and_bounded(
            entrants in hash_set(user_id_strategy(), 0..40),
            count in 0usize..50,
        ) {
            let pool: Vec<UserId> = entrants.into_iter().collect();
            let drawn = draw_winners(&pool, count);

            prop_assert_eq!(drawn.len(), count.min(pool.len()));
            let unique: HashSet<UserId> = drawn.iter().copied().collect();
            prop_assert_eq!(unique.len(), drawn.len());
            prop_assert!(drawn.iter().all(|winner| pool.contains(winner)));
        }
    }
}
