//! Core graph engine: connections, traversal, clusters, centrality,
//! reinforcement, suggestions, and network statistics.
//!
//! All analytics read the edge set through [`connections`] helpers inside a
//! single snapshot transaction per call; only [`connections`] and
//! [`reinforce`] write.

pub mod centrality;
pub mod clusters;
pub mod connections;
pub mod error;
pub mod reinforce;
pub mod stats;
pub mod suggest;
pub mod traverse;
pub mod types;

mod nodes;

pub use error::{GraphError, Result};

use rusqlite::{Connection as Db, ErrorCode, Transaction, TransactionBehavior};
use std::time::Duration;

/// Run `op` inside an IMMEDIATE transaction, retrying on a busy database.
///
/// Every mutating operation in the engine goes through here so concurrent
/// writers to the same edge serialize instead of losing updates. Retries are
/// bounded by `retry_budget`; past that the caller gets
/// [`GraphError::ConflictRetryExhausted`] and may retry at its own level.
pub(crate) fn with_write_tx<T>(
    conn: &mut Db,
    retry_budget: u32,
    mut op: impl FnMut(&Transaction) -> Result<T>,
) -> Result<T> {
    let mut attempt: u32 = 0;
    loop {
        attempt += 1;

        let tx = match conn.transaction_with_behavior(TransactionBehavior::Immediate) {
            Ok(tx) => tx,
            Err(e) if is_busy(&e) => {
                if attempt > retry_budget {
                    return Err(GraphError::ConflictRetryExhausted { attempts: attempt });
                }
                std::thread::sleep(backoff(attempt));
                continue;
            }
            Err(e) => return Err(e.into()),
        };

        match op(&tx) {
            Ok(value) => match tx.commit() {
                Ok(()) => return Ok(value),
                Err(e) if is_busy(&e) => {
                    if attempt > retry_budget {
                        return Err(GraphError::ConflictRetryExhausted { attempts: attempt });
                    }
                    std::thread::sleep(backoff(attempt));
                }
                Err(e) => return Err(e.into()),
            },
            Err(GraphError::Db(e)) if is_busy(&e) => {
                drop(tx); // roll back before retrying
                if attempt > retry_budget {
                    return Err(GraphError::ConflictRetryExhausted { attempts: attempt });
                }
                std::thread::sleep(backoff(attempt));
            }
            Err(e) => return Err(e),
        }
    }
}

fn is_busy(e: &rusqlite::Error) -> bool {
    matches!(
        e,
        rusqlite::Error::SqliteFailure(inner, _)
            if inner.code == ErrorCode::DatabaseBusy || inner.code == ErrorCode::DatabaseLocked
    )
}

fn backoff(attempt: u32) -> Duration {
    Duration::from_millis(10 * u64::from(attempt))
}
