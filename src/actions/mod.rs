//! Stake / unstake / claim-rewards intents and the runner that executes them
//! in the background.

pub mod iface;

use std::{
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    },
    time::Instant,
};

use log::{error, info};

use crate::{
    notify::{Notification, Notifier},
    pool::ReceiptType,
    tokens::{StakedTokenRecord, UnstakedTokenRecord},
};
use iface::{ActionExecutor, ActionHandler};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StakeRequest {
    pub tokens: Vec<UnstakedTokenRecord>,
    pub receipt_type: ReceiptType,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UnstakeRequest {
    pub tokens: Vec<StakedTokenRecord>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClaimRewardsRequest {
    pub tokens: Vec<StakedTokenRecord>,
}

/// The three handlers the page writes intents to.
#[derive(Clone)]
pub struct ActionHandlers {
    pub stake: Arc<dyn ActionHandler<StakeRequest>>,
    pub unstake: Arc<dyn ActionHandler<UnstakeRequest>>,
    pub claim_rewards: Arc<dyn ActionHandler<ClaimRewardsRequest>>,
}

impl ActionHandlers {
    /// A stake or unstake is running; selection edits are frozen meanwhile.
    pub fn stake_or_unstake_in_flight(&self) -> bool {
        self.stake.is_loading() || self.unstake.is_loading()
    }
}

/// Spawns each request on the tokio runtime and tracks how many are running.
///
/// Must be used from within a runtime.
pub struct ActionRunner<E: ActionExecutor> {
    executor: Arc<E>,
    in_flight: Arc<AtomicUsize>,
    notifier: Option<Arc<dyn Notifier>>,
}

impl<E: ActionExecutor> ActionRunner<E> {
    pub fn new(executor: E) -> Self {
        Self {
            executor: Arc::new(executor),
            in_flight: Arc::new(AtomicUsize::new(0)),
            notifier: None,
        }
    }

    /// Report the outcome of every request to `notifier`.
    pub fn with_notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = Some(notifier);
        self
    }
}

impl<E: ActionExecutor> ActionHandler<E::Request> for ActionRunner<E> {
    fn mutate(&self, request: E::Request) {
        self.in_flight.fetch_add(1, Ordering::SeqCst);

        let executor = Arc::clone(&self.executor);
        let in_flight = Arc::clone(&self.in_flight);
        let notifier = self.notifier.clone();

        tokio::spawn(async move {
            let started = Instant::now();
            let name = executor.name();

            // run on its own task so a panicking executor still settles
            let outcome = match tokio::spawn(async move { executor.execute(request).await }).await {
                Ok(Ok(signatures)) => {
                    info!(
                        "✅ [ACTIONS] {} settled in {}ms ({} transaction(s))",
                        name,
                        started.elapsed().as_millis(),
                        signatures.len()
                    );
                    Notification::success(format!("Successfully completed {name}"))
                }
                Ok(Err(e)) => {
                    error!("❌ [ACTIONS] {} failed: {:#}", name, e);
                    Notification::error(format!("Failed to {name}: {e}"))
                }
                Err(join_error) => {
                    error!("💥 [ACTIONS] {} task aborted: {}", name, join_error);
                    Notification::error(format!("Failed to {name}: task aborted"))
                }
            };

            in_flight.fetch_sub(1, Ordering::SeqCst);
            if let Some(notifier) = notifier {
                notifier.notify(outcome);
            }
        });
    }

    fn is_loading(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst) > 0
    }
}
