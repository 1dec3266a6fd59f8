use futures_util::future::join_all;
use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Runs `task` over every item with at most `concurrency` calls in flight.
///
/// A fixed set of workers share a claim index and each keeps pulling the next
/// unclaimed item until none are left, so every item is processed exactly
/// once. Outcomes come back paired with their item, in completion order per
/// worker. A `concurrency` of zero is treated as one.
pub async fn run_bounded<T, O, F, Fut>(items: Vec<T>, concurrency: usize, task: F) -> Vec<(T, O)>
where
    T: Clone,
    F: Fn(T) -> Fut,
    Fut: Future<Output = O>,
{
    if items.is_empty() {
        return Vec::new();
    }

    let worker_count = concurrency.max(1).min(items.len());
    let next = AtomicUsize::new(0);
    let (next, items, task) = (&next, &items, &task);

    let workers = (0..worker_count).map(|_| async move {
        let mut done = Vec::new();
        loop {
            let index = next.fetch_add(1, Ordering::Relaxed);
            let Some(item) = items.get(index) else {
                break;
            };
            let outcome = task(item.clone()).await;
            done.push((item.clone(), outcome));
        }
        done
    });

    join_all(workers).await.into_iter().flatten().collect()
}
