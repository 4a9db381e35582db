use std::sync::Arc;

use actix_web::{HttpMessage, HttpRequest};
use futures::future::BoxFuture;
use sea_orm::{DatabaseTransaction, TransactionTrait};

use crate::db::require_db;
use crate::error::AppError;
use crate::errors::ErrorCode;
use crate::state::app_state::AppState;

/// How many times `retry_txn` re-runs an operation aborted by the
/// isolation layer before giving up.
const STORAGE_CONFLICT_RETRIES: u32 = 3;

/// A shared transaction wrapper that can be injected into request extensions.
/// Handler tests use this to observe and roll back a handler's writes.
#[derive(Clone)]
pub struct SharedTxn(pub Arc<DatabaseTransaction>);

impl SharedTxn {
    /// Get a reference to the underlying database transaction
    pub fn transaction(&self) -> &DatabaseTransaction {
        &self.0
    }

    pub fn from_req(req: &HttpRequest) -> Option<Self> {
        req.extensions().get::<SharedTxn>().cloned()
    }
}

/// Execute a function within a database transaction
///
/// 1) If a SharedTxn is in request extensions → use it (no commit/rollback here)
/// 2) Otherwise → begin txn, run closure, commit on Ok / rollback on Err
pub async fn with_txn<R, F>(
    req: Option<&HttpRequest>,
    state: &AppState,
    f: F,
) -> Result<R, AppError>
where
    F: for<'t> FnOnce(&'t DatabaseTransaction) -> BoxFuture<'t, Result<R, AppError>>,
{
    // Extract any SharedTxn out of request extensions *before* awaiting to
    // avoid holding a RefCell borrow.
    let shared_txn: Option<SharedTxn> = req.and_then(SharedTxn::from_req);

    if let Some(shared) = shared_txn {
        return f(shared.transaction()).await;
    }

    let db = require_db(state)?;
    let txn = db.begin().await?;
    let out = f(&txn).await;

    match out {
        Ok(val) => {
            txn.commit().await?;
            Ok(val)
        }
        Err(err) => {
            // Best-effort rollback; preserve original error
            let _ = txn.rollback().await;
            Err(err)
        }
    }
}

/// Run `f` in a transaction, re-running the whole closure when the
/// isolation layer aborts it (`STORAGE_CONFLICT`). Nothing is retried
/// partially: each attempt is a fresh transaction.
pub async fn retry_txn<R, F>(
    req: Option<&HttpRequest>,
    state: &AppState,
    f: F,
) -> Result<R, AppError>
where
    F: for<'t> Fn(&'t DatabaseTransaction) -> BoxFuture<'t, Result<R, AppError>>,
{
    let mut attempt = 0;
    loop {
        match with_txn(req, state, &f).await {
            Err(err) if err.code() == ErrorCode::StorageConflict => {
                attempt += 1;
                if attempt >= STORAGE_CONFLICT_RETRIES {
                    return Err(err);
                }
                tracing::debug!(attempt, "retrying transaction after storage conflict");
            }
            other => return other,
        }
    }
}
