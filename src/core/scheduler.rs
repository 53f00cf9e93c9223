//! Bounded parallel scheduling of grammar items
//!
//! Every item runs on its own tokio task; a semaphore keeps at most `limit`
//! of them inside their recipe at once.

use std::sync::Arc;

use indicatif::ProgressBar;
use tokio::sync::Semaphore;

use crate::core::builder::BuildContext;
use crate::core::item::{GrammarItem, ItemOutcome};

/// Run every item with at most `limit` in flight
///
/// Returns one outcome per item, in input order. Completion order is not
/// defined. A panicking item is reported as failed without affecting others.
pub async fn run_all(
    ctx: Arc<BuildContext>,
    items: Vec<GrammarItem>,
    limit: usize,
    progress: &ProgressBar,
) -> Vec<ItemOutcome> {
    let semaphore = Arc::new(Semaphore::new(limit.max(1)));

    let (names, handles): (Vec<String>, Vec<_>) = items
        .into_iter()
        .map(|item| {
            let sem = semaphore.clone();
            let ctx = ctx.clone();
            let pb = progress.clone();
            let name = item.name.clone();

            let handle = tokio::spawn(async move {
                let Ok(_permit) = sem.acquire_owned().await else {
                    return ItemOutcome::crashed(&item.name, "scheduler shut down");
                };
                pb.set_message(item.name.clone());
                let outcome = ctx.run_item(&item).await;
                pb.inc(1);
                outcome
            });
            (name, handle)
        })
        .unzip();

    futures::future::join_all(handles)
        .await
        .into_iter()
        .zip(names)
        .map(|(joined, name)| {
            joined.unwrap_or_else(|e| {
                tracing::error!("Build task for {name} died: {e}");
                progress.inc(1);
                ItemOutcome::crashed(name, e.to_string())
            })
        })
        .collect()
}
