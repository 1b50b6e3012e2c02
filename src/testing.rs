//! In-memory fakes for the alert and chat platform seams.

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use parking_lot::Mutex;
use teloxide::types::{ChatId, MessageId};
use tokio::time::Instant;

use crate::alert::{AlertError, AlertSink};
use crate::platform::{ChatPlatform, MemberCapabilities, PlatformError};

/// Alert sink that records every message it is asked to send.
#[derive(Default)]
pub struct RecordingSink {
    messages: Mutex<Vec<String>>,
    fail: bool,
}

impl RecordingSink {
    /// A sink that records messages but reports every send as rejected.
    pub fn failing() -> Self {
        Self {
            messages: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().clone()
    }
}

#[async_trait]
impl AlertSink for RecordingSink {
    async fn send(&self, message: &str) -> Result<(), AlertError> {
        self.messages.lock().push(message.to_string());
        if self.fail {
            return Err(AlertError::Rejected {
                status: 401,
                body: "unauthorized".to_string(),
            });
        }
        Ok(())
    }
}

/// What the fake answers to a membership lookup.
#[derive(Debug, Clone, Copy)]
pub enum Membership {
    CanDelete,
    CannotDelete,
    Fails,
}

/// What the fake answers to a delete request.
#[derive(Debug, Clone, Copy)]
pub enum DeleteReply {
    Ok,
    NotFound,
    Fails,
    Panics,
}

/// Chat platform that answers from fixed replies and records calls.
pub struct FakePlatform {
    membership: Mutex<Membership>,
    delete_reply: Mutex<DeleteReply>,
    membership_calls: AtomicUsize,
    deletes: Mutex<Vec<(ChatId, MessageId, Instant)>>,
}

impl FakePlatform {
    pub fn new(membership: Membership, delete_reply: DeleteReply) -> Self {
        Self {
            membership: Mutex::new(membership),
            delete_reply: Mutex::new(delete_reply),
            membership_calls: AtomicUsize::new(0),
            deletes: Mutex::new(Vec::new()),
        }
    }

    pub fn set_membership(&self, membership: Membership) {
        *self.membership.lock() = membership;
    }

    pub fn membership_calls(&self) -> usize {
        self.membership_calls.load(Ordering::SeqCst)
    }

    pub fn deletes(&self) -> Vec<(ChatId, MessageId, Instant)> {
        self.deletes.lock().clone()
    }
}

#[async_trait]
impl ChatPlatform for FakePlatform {
    async fn own_membership(&self, _chat_id: ChatId) -> Result<MemberCapabilities, PlatformError> {
        self.membership_calls.fetch_add(1, Ordering::SeqCst);
        match *self.membership.lock() {
            Membership::CanDelete => Ok(MemberCapabilities {
                is_admin: true,
                can_delete_messages: true,
            }),
            Membership::CannotDelete => Ok(MemberCapabilities::default()),
            Membership::Fails => Err(PlatformError::Network("connection reset".to_string())),
        }
    }

    async fn delete_message(
        &self,
        chat_id: ChatId,
        message_id: MessageId,
    ) -> Result<(), PlatformError> {
        self.deletes.lock().push((chat_id, message_id, Instant::now()));
        match *self.delete_reply.lock() {
            DeleteReply::Ok => Ok(()),
            DeleteReply::NotFound => Err(PlatformError::MessageNotFound),
            DeleteReply::Fails => Err(PlatformError::Api(
                "Bad Request: message can't be deleted".to_string(),
            )),
            DeleteReply::Panics => panic!("malformed delete response"),
        }
    }
}
