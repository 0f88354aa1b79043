//! Client-side view of the feed with optimistic like toggles.
//!
//! A toggle is applied to the rendered snapshot as soon as it is requested,
//! before the server has answered. The snapshot is thrown away whenever a
//! server-confirmed feed arrives; it is never merged with it.

use std::fmt::Display;

use log::warn;

use crate::modules::post::model::FeedPost;
use crate::modules::store::model::PostId;

/// What a failed server toggle does to the optimistic snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RevertPolicy {
    /// Leave the optimistic state on screen until the next confirmed feed.
    #[default]
    KeepOptimistic,
    /// Undo the optimistic flip.
    Revert,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ToggleTicket(u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Settlement {
    Confirmed,
    Reverted,
    /// The server failed but the policy keeps the optimistic state.
    Kept,
    /// The ticket was already settled or discarded by a confirmed feed.
    Stale,
}

#[derive(Debug, Clone, Copy)]
struct PendingToggle {
    ticket: ToggleTicket,
    post_id: PostId,
}

#[derive(Debug, Clone)]
pub struct OptimisticFeed {
    posts: Vec<FeedPost>,
    pending: Vec<PendingToggle>,
    next_ticket: u64,
    policy: RevertPolicy,
}

impl OptimisticFeed {
    pub fn new(confirmed: Vec<FeedPost>) -> Self {
        OptimisticFeed {
            posts: confirmed,
            pending: Vec::new(),
            next_ticket: 0,
            policy: RevertPolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: RevertPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// The snapshot to render.
    pub fn posts(&self) -> &[FeedPost] {
        &self.posts
    }

    pub fn is_pending(&self, post_id: PostId) -> bool {
        self.pending.iter().any(|pending| pending.post_id == post_id)
    }

    /// Flips the like on `post_id` immediately. Returns `None` and leaves
    /// the snapshot alone when the post is not in the feed.
    pub fn toggle_requested(&mut self, post_id: PostId) -> Option<ToggleTicket> {
        if !flip_like(&mut self.posts, post_id) {
            return None;
        }
        let ticket = ToggleTicket(self.next_ticket);
        self.next_ticket += 1;
        self.pending.push(PendingToggle { ticket, post_id });
        Some(ticket)
    }

    /// Records the server's answer for a toggle.
    pub fn settle<E: Display>(&mut self, ticket: ToggleTicket, outcome: Result<(), E>) -> Settlement {
        let Some(index) = self.pending.iter().position(|pending| pending.ticket == ticket) else {
            return Settlement::Stale;
        };
        let pending = self.pending.remove(index);
        match (outcome, self.policy) {
            (Ok(()), _) => Settlement::Confirmed,
            (Err(e), RevertPolicy::KeepOptimistic) => {
                warn!("Failed to toggle like on post {}: {}", pending.post_id, e);
                Settlement::Kept
            }
            (Err(e), RevertPolicy::Revert) => {
                warn!("Failed to toggle like on post {}, reverting: {}", pending.post_id, e);
                flip_like(&mut self.posts, pending.post_id);
                Settlement::Reverted
            }
        }
    }

    /// Replaces the snapshot wholesale with a server-confirmed feed and
    /// forgets every outstanding toggle.
    pub fn replace_confirmed(&mut self, confirmed: Vec<FeedPost>) {
        self.posts = confirmed;
        self.pending.clear();
    }
}

/// Flips `is_liked` on the matching post and moves its like count with it.
/// Returns whether a post was found.
pub fn flip_like(posts: &mut [FeedPost], post_id: PostId) -> bool {
    let Some(post) = posts.iter_mut().find(|post| post.id == post_id) else {
        return false;
    };
    if post.is_liked {
        post.likes = post.likes.saturating_sub(1);
    } else {
        post.likes += 1;
    }
    post.is_liked = !post.is_liked;
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn feed_post(id: PostId, likes: usize, is_liked: bool) -> FeedPost {
        FeedPost {
            id,
            image: "/a.png".to_string(),
            title: format!("post {id}"),
            content: "body".to_string(),
            created_at: Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap(),
            user_first_name: "John".to_string(),
            user_last_name: "Doe".to_string(),
            likes,
            is_liked,
        }
    }

    #[test]
    fn toggle_applies_before_confirmation() {
        let mut feed = OptimisticFeed::new(vec![feed_post(1, 0, false), feed_post(2, 1, true)]);

        assert!(feed.toggle_requested(1).is_some());
        assert!(feed.toggle_requested(2).is_some());

        assert_eq!((feed.posts()[0].likes, feed.posts()[0].is_liked), (1, true));
        assert_eq!((feed.posts()[1].likes, feed.posts()[1].is_liked), (0, false));
        assert!(feed.is_pending(1));
    }

    #[test]
    fn unknown_post_is_a_no_op() {
        let original = vec![feed_post(1, 3, false)];
        let mut feed = OptimisticFeed::new(original.clone());

        assert_eq!(feed.toggle_requested(99), None);
        assert_eq!(feed.posts(), &original[..]);
    }

    #[test]
    fn unlike_never_goes_negative() {
        let mut posts = vec![feed_post(1, 0, true)];
        assert!(flip_like(&mut posts, 1));
        assert_eq!(posts[0].likes, 0);
        assert!(!posts[0].is_liked);
    }

    #[test]
    fn confirmed_feed_replaces_optimistic_state() {
        let mut feed = OptimisticFeed::new(vec![feed_post(1, 0, false)]);
        let ticket = feed.toggle_requested(1).unwrap();

        let server = vec![feed_post(1, 4, false), feed_post(5, 0, false)];
        feed.replace_confirmed(server.clone());

        assert_eq!(feed.posts(), &server[..]);
        assert!(!feed.is_pending(1));
        assert_eq!(feed.settle(ticket, Ok::<(), String>(())), Settlement::Stale);
    }

    #[test]
    fn failure_keeps_optimistic_state_by_default() {
        let mut feed = OptimisticFeed::new(vec![feed_post(1, 0, false)]);
        let ticket = feed.toggle_requested(1).unwrap();

        assert_eq!(feed.settle(ticket, Err("disk full")), Settlement::Kept);
        assert!(feed.posts()[0].is_liked);
        assert!(!feed.is_pending(1));
    }

    #[test]
    fn failure_reverts_when_asked_to() {
        let mut feed = OptimisticFeed::new(vec![feed_post(1, 2, false)]).with_policy(RevertPolicy::Revert);
        let ticket = feed.toggle_requested(1).unwrap();

        assert_eq!(feed.settle(ticket, Err("disk full")), Settlement::Reverted);
        assert_eq!((feed.posts()[0].likes, feed.posts()[0].is_liked), (2, false));
    }

    #[test]
    fn success_confirms_once() {
        let mut feed = OptimisticFeed::new(vec![feed_post(1, 0, false)]);
        let ticket = feed.toggle_requested(1).unwrap();

        assert_eq!(feed.settle(ticket, Ok::<(), String>(())), Settlement::Confirmed);
        assert_eq!(feed.settle(ticket, Ok::<(), String>(())), Settlement::Stale);
        assert!(feed.posts()[0].is_liked);
    }
}
