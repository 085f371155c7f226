//! Pool actor
//!
//! One task owns the [`Pool`] and drains a bounded command queue. After every
//! command the actor replaces the published [`PoolView`] before it replies, so
//! readers see the state before or after a commit, never a mix, and a caller
//! that awaited its reply always reads its own commit.

use crate::command::PoolCommand;
use parking_lot::RwLock;
use std::sync::Arc;
use swap_amm::{Pool, PoolView};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

pub(crate) struct PoolActor {
    pool: Pool,
    commands: mpsc::Receiver<PoolCommand>,
    view: Arc<RwLock<PoolView>>,
    processed: u64,
}

impl PoolActor {
    pub(crate) fn new(
        pool: Pool,
        commands: mpsc::Receiver<PoolCommand>,
        view: Arc<RwLock<PoolView>>,
    ) -> Self {
        Self {
            pool,
            commands,
            view,
            processed: 0,
        }
    }

    pub(crate) async fn run(mut self) {
        info!(
            "🏊 Pool actor started for {}",
            swap_types::shorten_address(&self.pool.account())
        );

        while let Some(command) = self.commands.recv().await {
            let stop = self.handle(command);
            self.processed += 1;
            if stop {
                break;
            }
        }

        info!(
            "Pool actor stopped - processed {} commands, sequence {}",
            self.processed,
            self.pool.sequence()
        );
    }

    fn publish(&self) {
        *self.view.write() = self.pool.view();
    }

    /// Apply one command and reply; `true` when the actor should stop
    fn handle(&mut self, command: PoolCommand) -> bool {
        match command {
            PoolCommand::Swap {
                caller,
                direction,
                input,
                min_output,
                reply,
            } => {
                let result = self
                    .pool
                    .execute_swap(&caller, direction, input, min_output);
                self.publish();
                respond(reply, result, "swap");
            }
            PoolCommand::AddLiquidity {
                caller,
                token_amount,
                eth_value,
                reply,
            } => {
                let result = self.pool.add_liquidity(&caller, token_amount, eth_value);
                self.publish();
                respond(reply, result, "add_liquidity");
            }
            PoolCommand::RemoveLiquidity {
                caller,
                shares,
                reply,
            } => {
                let result = self.pool.remove_liquidity(&caller, shares);
                self.publish();
                respond(reply, result, "remove_liquidity");
            }
            PoolCommand::Snapshot { reply } => {
                if reply.send(self.pool.state()).is_err() {
                    debug!("snapshot requester went away");
                }
            }
            PoolCommand::Restore { state, reply } => {
                let result = self.pool.restore_state(state);
                self.publish();
                respond(reply, result, "restore");
            }
            PoolCommand::Shutdown { reply } => {
                if reply.send(self.pool.state()).is_err() {
                    debug!("shutdown requester went away");
                }
                return true;
            }
        }
        false
    }
}

fn respond<T>(
    reply: tokio::sync::oneshot::Sender<swap_amm::Result<T>>,
    result: swap_amm::Result<T>,
    operation: &'static str,
) {
    // the commit already happened; a dropped caller only loses the receipt
    if reply.send(result).is_err() {
        warn!(operation, "caller dropped before the reply was sent");
    }
}
