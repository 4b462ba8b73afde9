//! An in-memory announcement board for tests.

use crate::board::{Announcement, AnnouncementBoard, ResultNotice};
use crate::error::BoardError;
use async_trait::async_trait;
use hearth_common::{ChannelId, MessageId};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

/// A call made on the board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoardEvent {
    /// An announcement was posted.
    Published {
        /// Target channel.
        channel: ChannelId,
        /// Assigned message.
        message: MessageId,
        /// What was shown.
        announcement: Announcement,
    },
    /// An announcement was re-rendered.
    Refreshed {
        /// Announcement message.
        message: MessageId,
        /// What is now shown.
        announcement: Announcement,
    },
    /// A result was posted.
    Announced {
        /// Announcement message.
        message: MessageId,
        /// The result.
        notice: ResultNotice,
    },
}

/// Records every call and hands out sequential message ids.
#[derive(Debug, Default)]
pub struct RecordingBoard {
    events: Mutex<Vec<BoardEvent>>,
    next_id: AtomicU64,
    gone: AtomicBool,
}

impl RecordingBoard {
    /// Creates an empty board.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every later call fail as if the channel had been deleted.
    pub fn delete_channel(&self) {
        self.gone.store(true, Ordering::SeqCst);
    }

    /// Everything recorded so far.
    #[must_use]
    pub fn events(&self) -> Vec<BoardEvent> {
        self.events.lock().clone()
    }

    /// Every result notice recorded so far.
    #[must_use]
    pub fn notices(&self) -> Vec<ResultNotice> {
        self.events
            .lock()
            .iter()
            .filter_map(|event| match event {
                BoardEvent::Announced { notice, .. } => Some(notice.clone()),
                _ => None,
            })
            .collect()
    }

    /// The most recent rendering of `message`.
    #[must_use]
    pub fn latest(&self, message: MessageId) -> Option<Announcement> {
        self.events
            .lock()
            .iter()
            .rev()
            .find_map(|event| match event {
                BoardEvent::Published {
                    message: id,
                    announcement,
                    ..
                }
                | BoardEvent::Refreshed {
                    message: id,
                    announcement,
                } if *id == message => Some(announcement.clone()),
                _ => None,
            })
    }

    fn check(&self) -> Result<(), BoardError> {
        if self.gone.load(Ordering::SeqCst) {
            Err(BoardError::Gone)
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl AnnouncementBoard for RecordingBoard {
    async fn publish(
        &self,
        channel: ChannelId,
        announcement: &Announcement,
    ) -> Result<MessageId, BoardError> {
        self.check()?;
        let message = MessageId(self.next_id.fetch_add(1, Ordering::SeqCst) + 1);
        self.events.lock().push(BoardEvent::Published {
            channel,
            message,
            announcement: announcement.clone(),
        });
        Ok(message)
    }

    async fn refresh(
        &self,
        _channel: ChannelId,
        message: MessageId,
        announcement: &Announcement,
    ) -> Result<(), BoardError> {
        self.check()?;
        self.events.lock().push(BoardEvent::Refreshed {
            message,
            announcement: announcement.clone(),
        });
        Ok(())
    }

    async fn announce(
        &self,
        _channel: ChannelId,
        message: MessageId,
        notice: &ResultNotice,
    ) -> Result<(), BoardError> {
        self.check()?;
        self.events.lock().push(BoardEvent::Announced {
            message,
            notice: notice.clone(),
        });
        Ok(())
    }
}
