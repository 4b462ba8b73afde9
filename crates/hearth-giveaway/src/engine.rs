//! Starting, joining and resolving giveaways.
//!
//! Running giveaways live in a concurrent map keyed by announcement message.
//! Each entry has its own async mutex, so joins on one giveaway are
//! serialized without blocking others. Resolution removes the entry from the
//! map before doing anything else; whoever removes it resolves it, and every
//! other caller sees [`Resolution::AlreadyResolved`].

use crate::board::{Announcement, AnnouncementBoard, ResultNotice};
use crate::duration::parse_duration;
use crate::error::{BoardError, GiveawayError};
use crate::instance::{GiveawayInstance, GiveawayState};
use chrono::Utc;
use dashmap::DashMap;
use hearth_common::{parse_color, ChannelId, MessageId, TenantId, UserId};
use hearth_config::ConfigStore;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

/// Parameters of a new giveaway. Unset options fall back to the tenant's
/// giveaway defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartRequest {
    /// Owning tenant.
    pub tenant: TenantId,
    /// Channel the command was used in.
    pub origin_channel: ChannelId,
    /// Channel to announce in, overriding the tenant default.
    pub channel: Option<ChannelId>,
    /// Who is starting it.
    pub host: UserId,
    /// What is being given away.
    pub prize: String,
    /// Duration text such as `2h`.
    pub duration: Option<String>,
    /// Number of winners.
    pub winners: Option<u32>,
}

/// A giveaway that was published and is now running.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartedGiveaway {
    /// Announcement message.
    pub message_id: MessageId,
    /// Channel it was announced in.
    pub channel: ChannelId,
    /// How long entries stay open.
    pub duration: Duration,
    /// What was published.
    pub announcement: Announcement,
}

/// Result of a join attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinOutcome {
    /// Entered; `entries` is the new entrant count.
    Joined {
        /// Entrants after joining.
        entries: usize,
    },
    /// Already entered; nothing changed.
    AlreadyJoined,
    /// No running giveaway for that message.
    NotFound,
    /// Bots cannot enter.
    BotRejected,
}

/// Result of resolving a giveaway.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Someone else resolved it first, or it never existed.
    AlreadyResolved,
    /// Winners were drawn and announced.
    Drawn {
        /// Winners in draw order.
        winners: Vec<UserId>,
        /// Entrants at close.
        entries: usize,
    },
    /// Nobody entered.
    NoEntries,
    /// The announcement's channel or message disappeared; nothing was drawn.
    Discarded,
}

/// Runs giveaways for every tenant.
pub struct GiveawayEngine<B> {
    store: Arc<ConfigStore>,
    board: Arc<B>,
    active: Arc<DashMap<MessageId, Arc<Mutex<GiveawayInstance>>>>,
}

impl<B> Clone for GiveawayEngine<B> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            board: Arc::clone(&self.board),
            active: Arc::clone(&self.active),
        }
    }
}

impl<B> std::fmt::Debug for GiveawayEngine<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GiveawayEngine")
            .field("active", &self.active.len())
            .finish_non_exhaustive()
    }
}

impl<B: AnnouncementBoard> GiveawayEngine<B> {
    /// Creates an engine reading tenant defaults from `store` and
    /// announcing through `board`.
    pub fn new(store: Arc<ConfigStore>, board: Arc<B>) -> Self {
        Self {
            store,
            board,
            active: Arc::new(DashMap::new()),
        }
    }

    /// The board announcements go through.
    #[must_use]
    pub fn board(&self) -> &Arc<B> {
        &self.board
    }

    /// Number of running giveaways.
    #[must_use]
    pub fn active_count(&self) -> usize {
        self.active.len()
    }

    /// Whether a giveaway announced by `message_id` is running.
    #[must_use]
    pub fn is_active(&self, message_id: MessageId) -> bool {
        self.active.contains_key(&message_id)
    }

    /// A copy of a running giveaway's state.
    pub async fn snapshot(&self, message_id: MessageId) -> Option<GiveawayInstance> {
        let slot = self.slot(message_id)?;
        let instance = slot.lock().await;
        Some(instance.clone())
    }

    /// Validates the request, publishes the announcement, registers the
    /// giveaway and schedules its resolution.
    pub async fn start(&self, request: StartRequest) -> Result<StartedGiveaway, GiveawayError> {
        let store = Arc::clone(&self.store);
        let tenant = request.tenant;
        let config = tokio::task::spawn_blocking(move || store.get_tenant(tenant)).await??;
        let defaults = config.giveaway;

        let prize = request.prize.trim().to_string();
        if prize.is_empty() {
            return Err(GiveawayError::EmptyPrize);
        }

        let duration_text = request.duration.as_deref().unwrap_or(&defaults.duration);
        let duration = parse_duration(duration_text)?;
        let ends_at = chrono::Duration::from_std(duration)
            .ok()
            .and_then(|delta| Utc::now().checked_add_signed(delta))
            .ok_or_else(|| GiveawayError::InvalidDuration {
                input: duration_text.to_string(),
            })?;

        let winners = request.winners.unwrap_or(defaults.winners);
        if winners < 1 {
            return Err(GiveawayError::InvalidWinners);
        }

        let channel = request
            .channel
            .or(defaults.channel_id)
            .unwrap_or(request.origin_channel);

        let mut instance = GiveawayInstance {
            message_id: MessageId(0),
            tenant: request.tenant,
            channel,
            prize,
            host: request.host,
            ends_at,
            winners,
            entrants: HashSet::new(),
            emoji: defaults.emoji,
            color: parse_color(&defaults.color),
            image_url: Some(defaults.image_url.trim().to_string()).filter(|url| !url.is_empty()),
            state: GiveawayState::Active,
        };

        let announcement = instance.announcement();
        let message_id = self.board.publish(channel, &announcement).await?;
        instance.message_id = message_id;

        self.active.insert(message_id, Arc::new(Mutex::new(instance)));
        self.schedule(message_id, duration);

        info!(
            tenant = %request.tenant,
            channel = %channel,
            message = %message_id,
            winners,
            seconds = duration.as_secs(),
            "Giveaway started"
        );

        Ok(StartedGiveaway {
            message_id,
            channel,
            duration,
            announcement,
        })
    }

    /// Enters `entrant` into the giveaway announced by `message_id`.
    pub async fn join(&self, message_id: MessageId, entrant: UserId, is_bot: bool) -> JoinOutcome {
        if is_bot {
            return JoinOutcome::BotRejected;
        }
        let Some(slot) = self.slot(message_id) else {
            return JoinOutcome::NotFound;
        };

        let mut instance = slot.lock().await;
        if !instance.is_active() {
            return JoinOutcome::NotFound;
        }
        if !instance.entrants.insert(entrant) {
            return JoinOutcome::AlreadyJoined;
        }

        let entries = instance.entry_count();
        debug!(message = %message_id, user = %entrant, entries, "Giveaway entry");

        if let Err(err) = self
            .board
            .refresh(instance.channel, message_id, &instance.announcement())
            .await
        {
            warn!(message = %message_id, error = %err, "Failed to update giveaway entry count");
        }

        JoinOutcome::Joined { entries }
    }

    /// Closes the giveaway announced by `message_id`, draws and announces
    /// winners. Safe to call any number of times; only the first call acts.
    pub async fn resolve(&self, message_id: MessageId) -> Resolution {
        let Some((_, slot)) = self.active.remove(&message_id) else {
            return Resolution::AlreadyResolved;
        };

        let mut instance = slot.lock().await;
        instance.state = GiveawayState::Ended;
        let channel = instance.channel;

        match self
            .board
            .refresh(channel, message_id, &instance.announcement())
            .await
        {
            Ok(()) => {}
            Err(BoardError::Gone) => {
                warn!(message = %message_id, "Giveaway announcement is gone, discarding giveaway");
                return Resolution::Discarded;
            }
            Err(err) => {
                warn!(message = %message_id, error = %err, "Failed to mark giveaway as ended");
            }
        }

        let winners = instance.draw();
        let entries = instance.entry_count();
        let notice = ResultNotice {
            prize: instance.prize.clone(),
            host: instance.host,
            winners: winners.clone(),
        };

        match self.board.announce(channel, message_id, &notice).await {
            Ok(()) => {}
            Err(BoardError::Gone) => {
                warn!(message = %message_id, "Giveaway channel is gone, discarding result");
                return Resolution::Discarded;
            }
            Err(err) => {
                warn!(message = %message_id, error = %err, "Failed to announce giveaway result");
            }
        }

        info!(
            tenant = %instance.tenant,
            message = %message_id,
            entries,
            winners = winners.len(),
            "Giveaway resolved"
        );

        if winners.is_empty() {
            Resolution::NoEntries
        } else {
            Resolution::Drawn { winners, entries }
        }
    }

    /// Ends a tenant's giveaway before its timer fires.
    pub async fn end_now(
        &self,
        tenant: TenantId,
        message_id: MessageId,
    ) -> Result<Resolution, GiveawayError> {
        let owned = match self.slot(message_id) {
            Some(slot) => slot.lock().await.tenant == tenant,
            None => false,
        };
        if !owned {
            return Err(GiveawayError::NotFound(message_id));
        }

        info!(tenant = %tenant, message = %message_id, "Giveaway ended early");
        Ok(self.resolve(message_id).await)
    }

    fn slot(&self, message_id: MessageId) -> Option<Arc<Mutex<GiveawayInstance>>> {
        self.active
            .get(&message_id)
            .map(|entry| Arc::clone(entry.value()))
    }

    fn schedule(&self, message_id: MessageId, duration: Duration) {
        let engine = self.clone();
        tokio::spawn(async move {
            tokio::time::sleep(duration).await;
            let resolution = engine.resolve(message_id).await;
            debug!(message = %message_id, ?resolution, "Giveaway timer fired");
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{BoardEvent, RecordingBoard};
    use hearth_common::test_utils::discord_fixtures::{test_channel_id, test_tenant_id, test_user_ids};
    use hearth_common::test_utils::init_test_logging;
    use tokio_test::{assert_err, assert_ok};

    fn engine() -> (tempfile::TempDir, GiveawayEngine<RecordingBoard>) {
        init_test_logging();
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(ConfigStore::new(dir.path().join("hearth_config.json")));
        (dir, GiveawayEngine::new(store, Arc::new(RecordingBoard::new())))
    }

    fn request(duration: &str, winners: u32) -> StartRequest {
        StartRequest {
            tenant: test_tenant_id(),
            origin_channel: test_channel_id(),
            channel: None,
            host: UserId(1),
            prize: "Nitro".to_string(),
            duration: Some(duration.to_string()),
            winners: Some(winners),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_start_publishes_and_registers() {
        let (_dir, engine) = engine();
        let started = assert_ok!(engine.start(request("10m", 2)).await);

        assert!(engine.is_active(started.message_id));
        assert_eq!(started.channel, test_channel_id());
        assert_eq!(started.duration, Duration::from_secs(600));
        assert_eq!(started.announcement.entries, 0);
        assert_eq!(started.announcement.winners, 2);
        assert_eq!(started.announcement.emoji, "🎉");
        assert_eq!(started.announcement.color, 0x5865F2);
        assert!(!started.announcement.ended);
    }

    #[tokio::test(start_paused = true)]
    async fn test_start_accepts_long_and_non_ascii_durations() {
        let (_dir, engine) = engine();
        let long = assert_ok!(engine.start(request("53w", 1)).await);
        assert_eq!(long.duration, Duration::from_secs(53 * 604_800));
        assert!(long.announcement.ends_at > Utc::now() + chrono::Duration::days(365));

        let arabic = assert_ok!(engine.start(request("٥m", 1)).await);
        assert_eq!(arabic.duration, Duration::from_secs(300));
        assert_eq!(engine.active_count(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_start_validation() {
        let (_dir, engine) = engine();
        assert!(matches!(
            engine.start(request("soon", 1)).await,
            Err(GiveawayError::InvalidDuration { .. })
        ));
        assert!(matches!(
            engine.start(request("1h", 0)).await,
            Err(GiveawayError::InvalidWinners)
        ));

        let mut blank = request("1h", 1);
        blank.prize = "  ".to_string();
        assert!(matches!(engine.start(blank).await, Err(GiveawayError::EmptyPrize)));
        assert_eq!(engine.active_count(), 0);
        assert!(engine.board().events().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_double_join_keeps_count() {
        let (_dir, engine) = engine();
        let started = engine.start(request("1h", 1)).await.unwrap();
        let user = test_user_ids(1)[0];

        assert_eq!(
            engine.join(started.message_id, user, false).await,
            JoinOutcome::Joined { entries: 1 }
        );
        assert_eq!(
            engine.join(started.message_id, user, false).await,
            JoinOutcome::AlreadyJoined
        );
        assert_eq!(engine.snapshot(started.message_id).await.unwrap().entry_count(), 1);
        assert_eq!(engine.board().latest(started.message_id).unwrap().entries, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_bots_and_unknown_messages() {
        let (_dir, engine) = engine();
        let started = engine.start(request("1h", 1)).await.unwrap();

        assert_eq!(
            engine.join(started.message_id, UserId(5), true).await,
            JoinOutcome::BotRejected
        );
        assert_eq!(
            engine.join(MessageId(999), UserId(5), false).await,
            JoinOutcome::NotFound
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_more_winners_than_entrants() {
        let (_dir, engine) = engine();
        let started = engine.start(request("1h", 3)).await.unwrap();
        let user = test_user_ids(1)[0];
        engine.join(started.message_id, user, false).await;

        let resolution = engine.resolve(started.message_id).await;
        assert_eq!(
            resolution,
            Resolution::Drawn {
                winners: vec![user],
                entries: 1
            }
        );
        assert!(engine.board().latest(started.message_id).unwrap().ended);
    }

    #[tokio::test(start_paused = true)]
    async fn test_no_entries_removes_instance() {
        let (_dir, engine) = engine();
        let started = engine.start(request("1h", 1)).await.unwrap();

        assert_eq!(engine.resolve(started.message_id).await, Resolution::NoEntries);
        assert!(!engine.is_active(started.message_id));

        let notices = engine.board().notices();
        assert_eq!(notices.len(), 1);
        assert!(notices[0].winners.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_double_resolve_draws_once() {
        let (_dir, engine) = engine();
        let started = engine.start(request("1h", 1)).await.unwrap();
        for user in test_user_ids(4) {
            engine.join(started.message_id, user, false).await;
        }

        let (first, second) = tokio::join!(
            engine.resolve(started.message_id),
            engine.resolve(started.message_id)
        );
        let drawn = [&first, &second]
            .iter()
            .filter(|r| matches!(r, Resolution::Drawn { .. }))
            .count();
        assert_eq!(drawn, 1);
        assert!([&first, &second].contains(&&Resolution::AlreadyResolved));
        assert_eq!(engine.board().notices().len(), 1);

        assert_eq!(
            engine.join(started.message_id, UserId(77), false).await,
            JoinOutcome::NotFound
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_timer_resolves_after_duration() {
        let (_dir, engine) = engine();
        let started = engine.start(request("30s", 1)).await.unwrap();
        engine.join(started.message_id, UserId(42), false).await;

        tokio::time::sleep(Duration::from_secs(29)).await;
        assert!(engine.is_active(started.message_id));

        tokio::time::sleep(Duration::from_secs(2)).await;
        assert!(!engine.is_active(started.message_id));
        assert_eq!(engine.board().notices()[0].winners, vec![UserId(42)]);

        // The timer's resolution makes a later manual end a no-op.
        assert_eq!(engine.resolve(started.message_id).await, Resolution::AlreadyResolved);
    }

    #[tokio::test(start_paused = true)]
    async fn test_end_now_checks_tenant() {
        let (_dir, engine) = engine();
        let started = engine.start(request("1h", 1)).await.unwrap();

        assert!(matches!(
            engine.end_now(TenantId(5), started.message_id).await,
            Err(GiveawayError::NotFound(_))
        ));
        assert_eq!(
            engine.end_now(test_tenant_id(), started.message_id).await.unwrap(),
            Resolution::NoEntries
        );
        assert_err!(engine.end_now(test_tenant_id(), started.message_id).await);
    }

    #[tokio::test(start_paused = true)]
    async fn test_deleted_channel_discards_silently() {
        let (_dir, engine) = engine();
        let started = engine.start(request("1h", 1)).await.unwrap();
        engine.join(started.message_id, UserId(9), false).await;
        engine.board().delete_channel();

        assert_eq!(engine.resolve(started.message_id).await, Resolution::Discarded);
        assert!(!engine.is_active(started.message_id));
        assert!(engine.board().notices().is_empty());
        assert!(!engine
            .board()
            .events()
            .iter()
            .any(|event| matches!(event, BoardEvent::Announced { .. })));
    }

    #[tokio::test(start_paused = true)]
    async fn test_channel_priority() {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(ConfigStore::new(dir.path().join("hearth_config.json")));
        store
            .modify_tenant(test_tenant_id(), |config| {
                config.giveaway.channel_id = Some(ChannelId(500));
                config.giveaway.duration = "2h".to_string();
                Ok::<_, hearth_config::ConfigError>(())
            })
            .unwrap();
        let engine = GiveawayEngine::new(store, Arc::new(RecordingBoard::new()));

        let mut explicit = request("1h", 1);
        explicit.channel = Some(ChannelId(700));
        assert_eq!(engine.start(explicit).await.unwrap().channel, ChannelId(700));

        let mut from_defaults = request("1h", 1);
        from_defaults.duration = None;
        let started = engine.start(from_defaults).await.unwrap();
        assert_eq!(started.channel, ChannelId(500));
        assert_eq!(started.duration, Duration::from_secs(7_200));
    }

    #[tokio::test(start_paused = true)]
    async fn test_origin_channel_is_last_resort() {
        let (_dir, engine) = engine();
        let started = engine.start(request("1h", 1)).await.unwrap();
        match &engine.board().events()[0] {
            BoardEvent::Published { channel, .. } => assert_eq!(*channel, test_channel_id()),
            other => panic!("unexpected event {other:?}"),
        }
        assert_eq!(started.channel, test_channel_id());
    }
    #[tokio::test(start_paused = true)]
    async fn test_full_lifecycle_with_timer() {
        let (_dir, engine) = engine();
        let started = engine.start(request("1m", 2)).await.unwrap();
        let entrants = test_user_ids(5);
        for (index, user) in entrants.iter().enumerate() {
            assert_eq!(
                engine.join(started.message_id, *user, false).await,
                JoinOutcome::Joined { entries: index + 1 }
            );
        }

        tokio::time::sleep(Duration::from_secs(61)).await;

        let notices = engine.board().notices();
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].winners.len(), 2);
        assert!(notices[0].winners.iter().all(|winner| entrants.contains(winner)));
        assert_ne!(notices[0].winners[0], notices[0].winners[1]);

        let last = engine.board().latest(started.message_id).unwrap();
        assert!(last.ended);
        assert_eq!(last.entries, 5);
        assert_eq!(engine.active_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_manual_end_then_timer_is_noop() {
        let (_dir, engine) = engine();
        let started = engine.start(request("5m", 1)).await.unwrap();
        engine.join(started.message_id, UserId(10), false).await;

        let ended = assert_ok!(engine.end_now(test_tenant_id(), started.message_id).await);
        assert_eq!(
            ended,
            Resolution::Drawn {
                winners: vec![UserId(10)],
                entries: 1
            }
        );

        tokio::time::sleep(Duration::from_secs(400)).await;
        assert_eq!(engine.board().notices().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_errors_map_to_hearth_errors() {
        let (_dir, engine) = engine();
        let err = engine.start(request("forever", 1)).await.unwrap_err();
        match hearth_common::HearthError::from(err) {
            hearth_common::HearthError::Validation { field, .. } => {
                assert_eq!(field.as_deref(), Some("duration"));
            }
            other => panic!("unexpected error {other:?}"),
        }
    }
}
