//! In-memory stand-ins for the quote API and the messaging channel.

use std::collections::{HashSet, VecDeque};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use crate::market_data::{Price, PriceSource, QuoteError};
use crate::notify::{DeliveryError, MessageSink};
use crate::state::SubscriberId;

/// Records successful sends; fails for recipients marked blocked or flaky.
#[derive(Default)]
pub struct RecordingSink {
    sent: Mutex<Vec<(SubscriberId, String)>>,
    blocked: Mutex<HashSet<SubscriberId>>,
    flaky: Mutex<HashSet<SubscriberId>>,
}

impl RecordingSink {
    pub fn block(&self, id: SubscriberId) {
        self.blocked.lock().unwrap().insert(id);
    }

    pub fn fail_transiently(&self, id: SubscriberId) {
        self.flaky.lock().unwrap().insert(id);
    }

    pub fn sent(&self) -> Vec<(SubscriberId, String)> {
        self.sent.lock().unwrap().clone()
    }

    pub fn recipients(&self) -> Vec<SubscriberId> {
        self.sent().into_iter().map(|(id, _)| id).collect()
    }
}

#[async_trait]
impl MessageSink for RecordingSink {
    async fn send_text(&self, recipient: SubscriberId, text: &str) -> Result<(), DeliveryError> {
        if self.blocked.lock().unwrap().contains(&recipient) {
            return Err(DeliveryError::RecipientGone("bot was blocked by the user".into()));
        }
        if self.flaky.lock().unwrap().contains(&recipient) {
            return Err(DeliveryError::Transient("connection reset".into()));
        }
        self.sent.lock().unwrap().push((recipient, text.to_string()));
        Ok(())
    }
}

/// One scripted response for [`ScriptedSource`].
pub enum Step {
    Price(Price),
    Fail,
    Hang,
    Panic,
}

/// Replays a fixed sequence of quote responses, then fails forever.
pub struct ScriptedSource {
    steps: Mutex<VecDeque<Step>>,
    calls: AtomicUsize,
}

impl ScriptedSource {
    pub fn new(steps: impl IntoIterator<Item = Step>) -> Self {
        Self {
            steps: Mutex::new(steps.into_iter().collect()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn prices(prices: &[Price]) -> Self {
        Self::new(prices.iter().copied().map(Step::Price))
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PriceSource for ScriptedSource {
    async fn fetch_price(&self) -> Result<Price, QuoteError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let step = self.steps.lock().unwrap().pop_front();
        match step {
            Some(Step::Price(price)) => Ok(price),
            Some(Step::Hang) => {
                std::future::pending::<()>().await;
                unreachable!()
            }
            Some(Step::Panic) => panic!("scripted panic"),
            Some(Step::Fail) | None => Err(QuoteError::Status(503)),
        }
    }
}
