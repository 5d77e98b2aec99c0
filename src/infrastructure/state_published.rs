use tokio::sync::{RwLock, mpsc};

/// A value holder notifying its subscribers of every change.
///
/// Each subscriber owns an unbounded queue, so transitions are neither lost nor
/// coalesced, and are received in publication order.
#[derive(Debug)]
pub struct Published<T> {
    inner: RwLock<PublishedInner<T>>,
}

#[derive(Debug)]
struct PublishedInner<T> {
    value: T,
    subscribers: Vec<mpsc::UnboundedSender<T>>,
}

impl<T: Clone + Send + Sync> Published<T> {
    /// Creates a new `Published` instance holding `value`.
    pub fn new(value: T) -> Self {
        Self {
            inner: RwLock::new(PublishedInner {
                value,
                subscribers: Vec::new(),
            }),
        }
    }

    /// Retrieves the current value.
    pub async fn get(&self) -> T {
        let inner = self.inner.read().await;
        inner.value.clone()
    }

    /// Subscribes to the changes published after this call.
    pub async fn subscribe(&self) -> Subscription<T> {
        let mut inner = self.inner.write().await;
        let (sender, receiver) = mpsc::unbounded_channel();
        inner.subscribers.push(sender);

        Subscription {
            snapshot: inner.value.clone(),
            receiver,
        }
    }

    /// Replaces the current value and notifies every live subscriber.
    pub(crate) async fn publish(&self, value: T) {
        let mut inner = self.inner.write().await;
        inner
            .subscribers
            .retain(|subscriber| subscriber.send(value.clone()).is_ok());
        inner.value = value;
    }

    /// Retrieves the number of live subscribers.
    pub async fn subscriber_count(&self) -> usize {
        let mut inner = self.inner.write().await;
        inner.subscribers.retain(|subscriber| !subscriber.is_closed());

        inner.subscribers.len()
    }
}

impl<T: Clone + Send + Sync + Default> Default for Published<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

/// A subscription to a [`Published`] value.
///
/// Dropping the subscription unsubscribes it, [`Subscription::dispose`] does so explicitly.
#[derive(Debug)]
pub struct Subscription<T> {
    snapshot: T,
    receiver: mpsc::UnboundedReceiver<T>,
}

impl<T> Subscription<T> {
    /// The value that was current when the subscription was made.
    pub fn snapshot(&self) -> &T {
        &self.snapshot
    }

    /// Waits for the next change.
    ///
    /// Returns `None` once the publisher is gone and every pending change has been received.
    pub async fn recv(&mut self) -> Option<T> {
        self.receiver.recv().await
    }

    /// Returns the next pending change without waiting.
    pub fn try_recv(&mut self) -> Option<T> {
        self.receiver.try_recv().ok()
    }

    /// Stops receiving changes.
    pub fn dispose(mut self) {
        self.receiver.close();
    }
}
