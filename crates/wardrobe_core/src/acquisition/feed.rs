//! Bounded channel carrying library picker results to the owning task.
//!
//! The picker resolves each selected item on its own task or thread and sends
//! the outcome through a cloned [`PickerFeedSender`]. Only the owner reads the
//! [`PickerFeed`], so session and catalog are never touched off-owner.
//!
//! Dismissal travels in-band. [`PickerFeedSender::dismiss`] finishes the feed
//! as soon as the owner reads it, whatever clones are still alive.
//! [`PickerFeedSender::dismiss_expecting`] carries the number of selected
//! items, and the feed keeps forwarding until that many results have arrived.
//! A feed whose senders are all dropped finishes as if dismissed.

use crate::acquisition::sink::PickerResultSink;
use crate::model::asset::PickerResult;
use log::debug;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TryRecvError;

/// Creates a connected sender/feed pair. A zero capacity is raised to one.
pub fn picker_feed(capacity: usize) -> (PickerFeedSender, PickerFeed) {
    let (tx, rx) = mpsc::channel(capacity.max(1));
    (
        PickerFeedSender { tx },
        PickerFeed {
            rx,
            forwarded: 0,
            expected: None,
            finished: false,
        },
    )
}

#[derive(Debug)]
enum FeedItem {
    Result(PickerResult),
    /// `Some(n)`: wait until `n` results were forwarded in total.
    Dismissed(Option<usize>),
}

/// One unit of progress read from a [`PickerFeed`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedStep {
    Result(PickerResult),
    /// The picker is done; nothing more will be forwarded.
    Finished,
}

/// Producer side, cloned once per in-flight resolution.
#[derive(Debug, Clone)]
pub struct PickerFeedSender {
    tx: mpsc::Sender<FeedItem>,
}

impl PickerFeedSender {
    /// Sends one result, waiting for capacity.
    ///
    /// Returns `false` when the feed has already been dropped by its owner.
    pub async fn deliver(&self, result: PickerResult) -> bool {
        self.tx.send(FeedItem::Result(result)).await.is_ok()
    }

    /// Blocking variant for platform callbacks running on plain threads.
    ///
    /// Must not be called from within an async runtime.
    pub fn blocking_deliver(&self, result: PickerResult) -> bool {
        self.tx.blocking_send(FeedItem::Result(result)).is_ok()
    }

    /// Picker dismissed; results still in flight are ignored.
    pub async fn dismiss(self) {
        self.send_dismissal(None).await;
    }

    /// Picker dismissed with `selected` items still resolving.
    ///
    /// The feed finishes once `selected` results (successes and failures)
    /// have arrived.
    pub async fn dismiss_expecting(self, selected: usize) {
        self.send_dismissal(Some(selected)).await;
    }

    /// Blocking variant of [`PickerFeedSender::dismiss`].
    pub fn blocking_dismiss(self) {
        // A closed feed has nobody left to tell.
        let _ = self.tx.blocking_send(FeedItem::Dismissed(None));
    }

    async fn send_dismissal(self, expected: Option<usize>) {
        if self.tx.send(FeedItem::Dismissed(expected)).await.is_err() {
            debug!("event=picker_dismiss module=acquisition status=noop reason=feed_closed");
        }
    }
}

/// Consumer side, owned by the task that owns the workflow.
#[derive(Debug)]
pub struct PickerFeed {
    rx: mpsc::Receiver<FeedItem>,
    forwarded: usize,
    expected: Option<usize>,
    finished: bool,
}

impl PickerFeed {
    /// Waits for the next result or for the end of the feed.
    ///
    /// Cancel-safe, so hosts can `select!` it against other intents. Keeps
    /// returning `Finished` once finished.
    pub async fn next_step(&mut self) -> FeedStep {
        loop {
            if self.is_finished() {
                return FeedStep::Finished;
            }
            let item = self.rx.recv().await;
            if let Some(step) = self.absorb(item) {
                return step;
            }
        }
    }

    /// Non-blocking variant of [`PickerFeed::next_step`]; `None` when
    /// nothing is ready yet.
    pub fn try_next_step(&mut self) -> Option<FeedStep> {
        loop {
            if self.is_finished() {
                return Some(FeedStep::Finished);
            }
            let item = match self.rx.try_recv() {
                Ok(item) => Some(item),
                Err(TryRecvError::Empty) => return None,
                Err(TryRecvError::Disconnected) => None,
            };
            if let Some(step) = self.absorb(item) {
                return Some(step);
            }
        }
    }

    /// Results forwarded so far.
    pub fn forwarded(&self) -> usize {
        self.forwarded
    }

    /// Forwards every result in arrival order, then completes the sink.
    ///
    /// Returns the number of results forwarded.
    pub async fn drain_into<S>(mut self, sink: &mut S) -> usize
    where
        S: PickerResultSink + ?Sized,
    {
        while let FeedStep::Result(result) = self.next_step().await {
            sink.on_result(result);
        }
        sink.on_complete();
        self.forwarded
    }

    fn is_finished(&mut self) -> bool {
        if !self.finished && self.expected.is_some_and(|n| self.forwarded >= n) {
            self.finish("expected_reached");
        }
        self.finished
    }

    fn absorb(&mut self, item: Option<FeedItem>) -> Option<FeedStep> {
        match item {
            Some(FeedItem::Result(result)) => {
                self.forwarded += 1;
                Some(FeedStep::Result(result))
            }
            Some(FeedItem::Dismissed(None)) => {
                self.finish("dismissed");
                Some(FeedStep::Finished)
            }
            Some(FeedItem::Dismissed(Some(expected))) => {
                self.expected = Some(expected);
                None
            }
            None => {
                self.finish("senders_dropped");
                Some(FeedStep::Finished)
            }
        }
    }

    fn finish(&mut self, reason: &str) {
        self.finished = true;
        // Late deliveries now fail fast instead of filling the buffer.
        self.rx.close();
        debug!(
            "event=picker_feed module=acquisition status=finished reason={reason} forwarded={}",
            self.forwarded
        );
    }
}
