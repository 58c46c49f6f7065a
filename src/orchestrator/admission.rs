//! 有界准入队列
//!
//! 同时最多 `capacity` 个任务在运行；其余任务按提交顺序（FIFO）等待，
//! 运行中的任务结束（无论成功失败）后才放行下一个。

use crate::error::SessionError;
use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinHandle;

/// 有界准入队列
#[derive(Debug, Clone)]
pub struct AdmissionQueue {
    permits: Arc<Semaphore>,
    active: Arc<AtomicUsize>,
    peak: Arc<AtomicUsize>,
    capacity: usize,
}

impl AdmissionQueue {
    /// 创建队列，容量至少为 1
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            permits: Arc::new(Semaphore::new(capacity)),
            active: Arc::new(AtomicUsize::new(0)),
            peak: Arc::new(AtomicUsize::new(0)),
            capacity,
        }
    }

    /// 提交任务
    ///
    /// 等到有空位后才启动任务（tokio 的 Semaphore 是公平的，所以先提交先放行），
    /// 返回任务句柄，await 句柄得到任务结果
    pub async fn submit<F>(&self, task: F) -> Result<JoinHandle<F::Output>, SessionError>
    where
        F: Future + Send + 'static,
        F::Output: Send + 'static,
    {
        let permit = self
            .permits
            .clone()
            .acquire_owned()
            .await
            .map_err(|_| SessionError::AdmissionClosed)?;
        let active = ActiveGuard::enter(&self.active, &self.peak);

        Ok(tokio::spawn(async move {
            let _permit = permit;
            let _active = active;
            task.await
        }))
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// 当前运行中的任务数
    pub fn active(&self) -> usize {
        self.active.load(Ordering::SeqCst)
    }

    /// 自上次重置以来的最大并发
    pub fn peak(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }

    pub fn reset_peak(&self) {
        self.peak.store(self.active(), Ordering::SeqCst);
    }
}

/// 运行计数，任务结束（包括 panic）时自动减一
struct ActiveGuard {
    active: Arc<AtomicUsize>,
}

impl ActiveGuard {
    fn enter(active: &Arc<AtomicUsize>, peak: &AtomicUsize) -> Self {
        let now = active.fetch_add(1, Ordering::SeqCst) + 1;
        peak.fetch_max(now, Ordering::SeqCst);
        Self {
            active: Arc::clone(active),
        }
    }
}

impl Drop for ActiveGuard {
    fn drop(&mut self) {
        self.active.fetch_sub(1, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use std::time::Duration;

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_burst_never_exceeds_capacity() {
        let queue = AdmissionQueue::new(3);
        let in_flight = Arc::new(AtomicUsize::new(0));
        let max_seen = Arc::new(AtomicUsize::new(0));

        let mut handles = Vec::new();
        for _ in 0..20 {
            let in_flight = Arc::clone(&in_flight);
            let max_seen = Arc::clone(&max_seen);
            let handle = queue
                .submit(async move {
                    let now = in_flight.fetch_add(1, Ordering::SeqCst) + 1;
                    max_seen.fetch_max(now, Ordering::SeqCst);
                    tokio::time::sleep(Duration::from_millis(10)).await;
                    in_flight.fetch_sub(1, Ordering::SeqCst);
                })
                .await
                .unwrap();
            handles.push(handle);
        }
        for handle in handles {
            handle.await.unwrap();
        }

        assert!(max_seen.load(Ordering::SeqCst) <= 3);
        assert!(queue.peak() <= 3);
        assert_eq!(queue.active(), 0);
    }

    #[tokio::test]
    async fn test_fifo_admission() {
        let queue = AdmissionQueue::new(1);
        let order = Arc::new(Mutex::new(Vec::new()));

        let mut handles = Vec::new();
        for i in 0..5 {
            let order = Arc::clone(&order);
            let handle = queue
                .submit(async move {
                    order.lock().unwrap().push(i);
                    tokio::task::yield_now().await;
                })
                .await
                .unwrap();
            handles.push(handle);
        }
        for handle in handles {
            handle.await.unwrap();
        }

        assert_eq!(*order.lock().unwrap(), vec![0, 1, 2, 3, 4]);
    }

    #[tokio::test]
    async fn test_panicking_task_frees_slot() {
        let queue = AdmissionQueue::new(1);

        let failed = queue
            .submit(async {
                panic!("boom");
            })
            .await
            .unwrap();
        assert!(failed.await.is_err());

        let ok = queue.submit(async { 7 }).await.unwrap();
        assert_eq!(ok.await.unwrap(), 7);
        assert_eq!(queue.active(), 0);
    }

    #[test]
    fn test_zero_capacity_is_clamped() {
        assert_eq!(AdmissionQueue::new(0).capacity(), 1);
    }
}
