//! Chat session — submissions, simulated latency, and delivery.
//!
//! DESIGN
//! ======
//! Each submission composes its answer immediately and schedules delivery
//! on a tokio task after `reply_delay`, keyed by a monotonically increasing
//! request id. A newer submission aborts the pending task and removes its
//! placeholder, and any reply that still slips through the channel with an
//! old id is discarded. Only the latest question is ever answered, in order.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::answer::{AnswerComposer, ResponseDescriptor};
use crate::random::RandomSource;
use crate::transcript::{MessageBlock, Transcript};

#[cfg(test)]
#[path = "chat_test.rs"]
mod tests;

pub type RequestId = u64;

#[derive(Debug)]
struct Reply {
    request_id: RequestId,
    answer: ResponseDescriptor,
}

#[derive(Debug)]
struct Pending {
    request_id: RequestId,
    handle: JoinHandle<()>,
}

/// One user's conversation with the scripted assistant.
pub struct ChatSession<R> {
    composer: AnswerComposer,
    random: R,
    transcript: Transcript,
    reply_delay: Duration,
    next_id: RequestId,
    pending: Option<Pending>,
    tx: mpsc::UnboundedSender<Reply>,
    rx: mpsc::UnboundedReceiver<Reply>,
}

impl<R: RandomSource> ChatSession<R> {
    #[must_use]
    pub fn new(composer: AnswerComposer, random: R, reply_delay: Duration) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            composer,
            random,
            transcript: Transcript::new(),
            reply_delay,
            next_id: 0,
            pending: None,
            tx,
            rx,
        }
    }

    #[must_use]
    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    #[must_use]
    pub fn composer(&self) -> &AnswerComposer {
        &self.composer
    }

    /// Id of the request awaiting delivery, if any.
    #[must_use]
    pub fn pending(&self) -> Option<RequestId> {
        self.pending.as_ref().map(|p| p.request_id)
    }

    /// Submit user text (typed or from a preset button).
    ///
    /// Blank input is ignored. Must be called from within a tokio runtime.
    pub fn submit(&mut self, text: &str) -> Option<RequestId> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }
        if let Some(stale) = self.cancel() {
            debug!(stale, "superseded pending reply");
        }

        self.transcript.append(MessageBlock::user(text));
        self.transcript.show_typing();

        let answer = self.composer.compose(text, &mut self.random);
        self.next_id += 1;
        let request_id = self.next_id;
        let tx = self.tx.clone();
        let delay = self.reply_delay;
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            // Receiver lives as long as the session; a send error means it is gone.
            let _ = tx.send(Reply { request_id, answer });
        });
        self.pending = Some(Pending { request_id, handle });
        debug!(request_id, ?delay, "reply scheduled");
        Some(request_id)
    }

    /// Wait for the pending reply and render it into the transcript.
    ///
    /// Returns `None` immediately when nothing is pending. Cancel-safe: the
    /// transcript only changes after a reply has been received.
    pub async fn next_reply(&mut self) -> Option<RequestId> {
        loop {
            let current = self.pending.as_ref()?.request_id;
            let reply = self.rx.recv().await?;
            if reply.request_id != current {
                debug!(stale = reply.request_id, current, "discarding superseded reply");
                continue;
            }
            self.pending = None;
            self.transcript.resolve(reply.answer);
            return Some(current);
        }
    }

    /// Abort the pending reply, if any, and remove its placeholder.
    pub fn cancel(&mut self) -> Option<RequestId> {
        let pending = self.pending.take()?;
        pending.handle.abort();
        self.transcript.clear_typing();
        Some(pending.request_id)
    }
}

impl<R> Drop for ChatSession<R> {
    fn drop(&mut self) {
        if let Some(pending) = self.pending.take() {
            pending.handle.abort();
        }
    }
}
