//! Mock buyer/seller conversation.
//!
//! Nothing here is persisted or sent anywhere: a thread lives as long as the
//! widget showing it. The seller's first answer is scripted.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use uuid::Uuid;

use crate::listing::Listing;

/// Sender id used for the local user.
pub const CURRENT_USER_ID: &str = "current_user";

/// How long the UI waits before showing the scripted seller reply.
pub const SELLER_REPLY_DELAY: Duration = Duration::from_secs(2);

/// A single chat message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: String,
    pub text: String,
    pub sender_id: String,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub is_system: bool,
}

impl Message {
    fn new(text: impl Into<String>, sender_id: impl Into<String>, timestamp: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            text: text.into(),
            sender_id: sender_id.into(),
            timestamp,
            is_system: false,
        }
    }

    pub fn is_from_current_user(&self) -> bool {
        self.sender_id == CURRENT_USER_ID
    }
}

/// Row in a conversation list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatSession {
    pub id: String,
    pub partner_name: String,
    pub partner_avatar: String,
    pub last_message: String,
    pub unread_count: u32,
}

/// Conversation about one listing.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatThread {
    pub listing_id: String,
    pub listing_title: String,
    pub seller_id: String,
    pub seller_name: String,
    pub seller_avatar: Option<String>,
    #[serde(skip)]
    seller_location: String,
    pub messages: Vec<Message>,
}

impl ChatThread {
    /// Open a thread with the buyer's opening question.
    pub fn open(listing: &Listing) -> Self {
        Self::open_at(listing, Utc::now())
    }

    pub fn open_at(listing: &Listing, now: DateTime<Utc>) -> Self {
        let opening = Message::new(
            format!("Hi, is \"{}\" still available?", listing.title),
            CURRENT_USER_ID,
            now - chrono::Duration::minutes(1),
        );

        Self {
            listing_id: listing.id.clone(),
            listing_title: listing.title.clone(),
            seller_id: listing.seller.id.clone(),
            seller_name: listing.seller.name.clone(),
            seller_avatar: listing.seller.avatar.clone(),
            seller_location: listing.location.clone(),
            messages: vec![opening],
        }
    }

    /// Scripted answer to the opening question.
    ///
    /// Only produced while the thread holds nothing but that question, so
    /// calling it again after a reply (or after the buyer writes more) is a
    /// no-op.
    pub fn seller_reply(&mut self) -> Option<&Message> {
        let awaiting = matches!(self.messages.as_slice(), [only] if only.is_from_current_user());
        if !awaiting {
            return None;
        }

        let reply = Message::new(
            format!(
                "Yes, it is! I am in {}. When can you pick it up?",
                self.seller_location
            ),
            self.seller_id.clone(),
            Utc::now(),
        );
        self.messages.push(reply);
        self.messages.last()
    }

    /// Append a message from the local user. Blank input is ignored.
    pub fn send(&mut self, text: &str) -> Option<&Message> {
        if text.trim().is_empty() {
            return None;
        }
        self.messages
            .push(Message::new(text, CURRENT_USER_ID, Utc::now()));
        self.messages.last()
    }

    /// Summary row for a conversation list.
    pub fn summary(&self) -> ChatSession {
        ChatSession {
            id: self.listing_id.clone(),
            partner_name: self.seller_name.clone(),
            partner_avatar: self.seller_avatar.clone().unwrap_or_default(),
            last_message: self
                .messages
                .last()
                .map(|m| m.text.clone())
                .unwrap_or_default(),
            unread_count: self
                .messages
                .iter()
                .rev()
                .take_while(|m| !m.is_from_current_user())
                .count() as u32,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::fixtures;

    #[test]
    fn test_open_seeds_buyer_question() {
        let listing = fixtures::sample_listings().remove(0);
        let thread = ChatThread::open(&listing);

        assert_eq!(thread.messages.len(), 1);
        assert!(thread.messages[0].is_from_current_user());
        assert_eq!(
            thread.messages[0].text,
            "Hi, is \"Concepts of Physics (Vol 1 & 2) - HC Verma\" still available?"
        );
    }

    #[test]
    fn test_seller_replies_once() {
        let listing = fixtures::sample_listings().remove(0);
        let mut thread = ChatThread::open(&listing);

        let reply = thread.seller_reply().cloned().unwrap();
        assert_eq!(reply.sender_id, "s1");
        assert_eq!(
            reply.text,
            "Yes, it is! I am in Indiranagar, Bangalore. When can you pick it up?"
        );

        assert!(thread.seller_reply().is_none());
        assert_eq!(thread.messages.len(), 2);
    }

    #[test]
    fn test_no_reply_after_buyer_follow_up() {
        let listing = fixtures::sample_listings().remove(1);
        let mut thread = ChatThread::open(&listing);
        thread.send("Can you do 250?");

        assert!(thread.seller_reply().is_none());
    }

    #[test]
    fn test_blank_messages_are_ignored() {
        let listing = fixtures::sample_listings().remove(0);
        let mut thread = ChatThread::open(&listing);

        assert!(thread.send("   ").is_none());
        assert!(thread.send("").is_none());
        assert_eq!(thread.messages.len(), 1);

        let sent = thread.send("Is the pencil marking heavy?").cloned().unwrap();
        assert!(sent.is_from_current_user());
        assert_eq!(thread.messages.len(), 2);
    }

    #[test]
    fn test_summary_counts_unread_seller_messages() {
        let listing = fixtures::sample_listings().remove(0);
        let mut thread = ChatThread::open(&listing);
        assert_eq!(thread.summary().unread_count, 0);

        thread.seller_reply();
        let summary = thread.summary();
        assert_eq!(summary.partner_name, "Amit S.");
        assert_eq!(summary.unread_count, 1);
        assert!(summary.last_message.starts_with("Yes, it is!"));
    }
}
