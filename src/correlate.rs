//! Request/reply correlation
//!
//! A channel session carries exactly one outstanding request, so
//! correlation is a single slot bound to one (topic, event) pair: the
//! first inbound envelope matching both is captured, everything else on
//! the shared channel is dropped. Deliberately not a dispatch table —
//! the one-session-per-operation design rules out multiplexed requests.

use crate::wire::Envelope;

/// Single-slot matcher for one expected reply
#[derive(Debug)]
pub struct ReplySlot {
    topic: String,
    event: String,
    captured: Option<Envelope>,
}

impl ReplySlot {
    /// Bind a slot to the (topic, event) pair it waits for
    pub fn new(topic: impl Into<String>, event: impl Into<String>) -> Self {
        Self {
            topic: topic.into(),
            event: event.into(),
            captured: None,
        }
    }

    /// Offer an inbound envelope to the slot
    ///
    /// Returns true when the envelope satisfies the slot. A non-matching
    /// envelope, or any envelope after the slot is satisfied, is dropped.
    pub fn offer(&mut self, envelope: Envelope) -> bool {
        if self.captured.is_none()
            && envelope.topic == self.topic
            && envelope.event == self.event
        {
            self.captured = Some(envelope);
            return true;
        }

        tracing::trace!(
            topic = %envelope.topic,
            event = %envelope.event,
            "Dropping uncorrelated envelope"
        );
        false
    }

    /// Whether a matching envelope has been captured
    pub fn is_satisfied(&self) -> bool {
        self.captured.is_some()
    }

    /// Take the captured envelope, leaving the slot empty
    pub fn take(&mut self) -> Option<Envelope> {
        self.captured.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env(topic: &str, event: &str) -> Envelope {
        Envelope::new(topic, event, serde_json::json!({}))
    }

    #[test]
    fn test_first_match_is_captured() {
        let mut slot = ReplySlot::new("ui_agent:all", "ls_response");
        assert!(!slot.is_satisfied());
        assert!(slot.offer(env("ui_agent:all", "ls_response")));
        assert!(slot.is_satisfied());
        assert_eq!(slot.take().unwrap().event, "ls_response");
    }

    #[test]
    fn test_non_matching_traffic_is_dropped() {
        let mut slot = ReplySlot::new("ui_agent:all", "ls_response");
        assert!(!slot.offer(env("ui_agent:all", "presence_diff")));
        assert!(!slot.offer(env("other:topic", "ls_response")));
        assert!(!slot.is_satisfied());
    }

    #[test]
    fn test_both_topic_and_event_must_match() {
        let mut slot = ReplySlot::new("ui_agent:all", "ls_response");
        assert!(!slot.offer(env("other:topic", "presence_diff")));
        assert!(slot.offer(env("ui_agent:all", "ls_response")));
    }

    #[test]
    fn test_later_matches_after_satisfaction_are_dropped() {
        let mut slot = ReplySlot::new("t", "e");
        let mut first = env("t", "e");
        first.payload = serde_json::json!({"n": 1});
        let mut second = env("t", "e");
        second.payload = serde_json::json!({"n": 2});

        assert!(slot.offer(first));
        assert!(!slot.offer(second));
        assert_eq!(slot.take().unwrap().payload["n"], 1);
    }
}
