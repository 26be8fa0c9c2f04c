//! Detached execution of pipeline jobs.

use std::future::Future;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinHandle;
use tracing::{Instrument, debug, info_span, warn};

/// Spawns pipeline jobs as background tasks.
///
/// With a limit, at most that many jobs run at once and the rest wait for a
/// permit. A limit of zero leaves jobs unbounded. Jobs are never cancelled.
///
/// # Examples
///
/// ```
/// use aprendia_pipeline::JobRunner;
///
/// # #[tokio::main]
/// # async fn main() {
/// let runner = JobRunner::new(2);
/// let handle = runner.spawn("example", 1, async {});
/// handle.await.unwrap();
/// assert_eq!(runner.limit(), Some(2));
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct JobRunner {
    permits: Option<Arc<Semaphore>>,
    limit: usize,
}

impl JobRunner {
    pub fn new(max_concurrent_jobs: usize) -> Self {
        let permits =
            (max_concurrent_jobs > 0).then(|| Arc::new(Semaphore::new(max_concurrent_jobs)));
        Self {
            permits,
            limit: max_concurrent_jobs,
        }
    }

    /// Concurrency limit, or `None` when unbounded.
    pub fn limit(&self) -> Option<usize> {
        self.permits.as_ref().map(|_| self.limit)
    }

    /// Runs `job` for `studiable_id` in the background and returns immediately.
    pub fn spawn<F>(&self, kind: &'static str, studiable_id: u64, job: F) -> JoinHandle<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let permits = self.permits.clone();
        let span = info_span!("job", kind, studiable_id);
        tokio::spawn(
            async move {
                let _permit = match permits {
                    Some(semaphore) => match semaphore.acquire_owned().await {
                        Ok(permit) => Some(permit),
                        Err(_) => {
                            warn!("Job semaphore closed; running unbounded");
                            None
                        }
                    },
                    None => None,
                };
                debug!("Job running");
                job.await;
            }
            .instrument(span),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    #[tokio::test]
    async fn unbounded_runner_reports_no_limit() {
        let runner = JobRunner::new(0);
        assert_eq!(runner.limit(), None);
        runner.spawn("chapter", 1, async {}).await.unwrap();
    }

    #[tokio::test]
    async fn bounded_runner_caps_concurrency() {
        let runner = JobRunner::new(2);
        let running = Arc::new(AtomicUsize::new(0));
        let peak = Arc::new(AtomicUsize::new(0));

        let handles: Vec<_> = (0..6)
            .map(|i| {
                let running = Arc::clone(&running);
                let peak = Arc::clone(&peak);
                runner.spawn("chapter", i, async move {
                    let now = running.fetch_add(1, Ordering::SeqCst) + 1;
                    peak.fetch_max(now, Ordering::SeqCst);
                    tokio::time::sleep(Duration::from_millis(20)).await;
                    running.fetch_sub(1, Ordering::SeqCst);
                })
            })
            .collect();
        for handle in handles {
            handle.await.unwrap();
        }

        assert!(peak.load(Ordering::SeqCst) <= 2);
        assert_eq!(running.load(Ordering::SeqCst), 0);
    }
}
