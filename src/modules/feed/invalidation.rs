use log::debug;
use tokio::sync::watch;

/// Feed revision counter. Bumped after every successful mutation so that
/// anything rendering the feed knows its copy is stale and should refetch.
#[derive(Clone)]
pub struct FeedInvalidator {
    sender: watch::Sender<u64>,
}

impl FeedInvalidator {
    pub fn new() -> Self {
        let (sender, _) = watch::channel(0);
        FeedInvalidator { sender }
    }

    pub fn invalidate(&self) -> u64 {
        self.sender.send_modify(|revision| *revision += 1);
        let revision = self.revision();
        debug!("Feed invalidated, revision {}", revision);
        revision
    }

    pub fn revision(&self) -> u64 {
        *self.sender.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.sender.subscribe()
    }
}

impl Default for FeedInvalidator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn subscribers_see_each_invalidation() {
        let invalidator = FeedInvalidator::new();
        let mut receiver = invalidator.subscribe();

        assert_eq!(invalidator.invalidate(), 1);
        receiver.changed().await.unwrap();
        assert_eq!(*receiver.borrow_and_update(), 1);

        invalidator.clone().invalidate();
        assert_eq!(invalidator.revision(), 2);
    }
}
