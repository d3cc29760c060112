/// Aggregation worker pool — the consumer half of a scan.
///
/// A fixed number of named threads drain the shared task queue. Each task
/// credits its file size to every ancestor directory up to the scan root
/// under one acquisition of the aggregate lock. Workers are scoped threads,
/// so they borrow the aggregate and root directly and are guaranteed to have
/// exited before the enclosing `thread::scope` returns.
use crate::error::ScanError;
use crate::model::DirectoryAggregate;
use crate::scanner::FileTask;
use crossbeam_channel::Receiver;
use std::path::Path;
use std::thread::{self, Scope, ScopedJoinHandle};
use tracing::{trace, warn};

/// Spawn `count` workers consuming from `tasks`.
///
/// Each worker returns the number of tasks it processed once the queue is
/// closed and drained.
pub fn spawn_workers<'scope, 'env: 'scope>(
    scope: &'scope Scope<'scope, 'env>,
    count: usize,
    tasks: &Receiver<FileTask>,
    aggregate: &'env DirectoryAggregate,
    root: &'env Path,
) -> Result<Vec<ScopedJoinHandle<'scope, u64>>, ScanError> {
    let mut handles = Vec::with_capacity(count);
    for id in 0..count {
        let rx = tasks.clone();
        let handle = thread::Builder::new()
            .name(format!("dirsize-worker-{id}"))
            .spawn_scoped(scope, move || drain(&rx, aggregate, root))
            .map_err(|err| ScanError::WorkerPool {
                message: format!("failed to spawn worker {id}: {err}"),
            })?;
        handles.push(handle);
    }
    Ok(handles)
}

/// Process tasks until every sender has been dropped and the queue is empty.
fn drain(tasks: &Receiver<FileTask>, aggregate: &DirectoryAggregate, root: &Path) -> u64 {
    let mut processed = 0;
    for task in tasks.iter() {
        let credited = aggregate.credit_ancestors(&task.path, task.size, root);
        trace!(
            "Credited {} bytes from {} to {credited} directories",
            task.size,
            task.path.display()
        );
        processed += 1;
    }
    processed
}

/// Wait for every worker to finish and return the total tasks processed.
///
/// This is the barrier between aggregation and reduction. A panicked worker
/// fails the whole scan rather than yielding a silently incomplete total.
pub fn join_workers(handles: Vec<ScopedJoinHandle<'_, u64>>) -> Result<u64, ScanError> {
    let mut processed = 0;
    let mut panicked = 0;
    for handle in handles {
        match handle.join() {
            Ok(n) => processed += n,
            Err(_) => {
                warn!("Aggregation worker panicked");
                panicked += 1;
            }
        }
    }
    if panicked > 0 {
        return Err(ScanError::WorkerPool {
            message: format!("{panicked} worker(s) panicked"),
        });
    }
    Ok(processed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_pool_processes_every_task_exactly_once() {
        let root = PathBuf::from("/scan");
        let aggregate = DirectoryAggregate::new();
        aggregate.register_dir(&root);

        let processed = thread::scope(|s| {
            let (tx, rx) = crossbeam_channel::bounded(8);
            let handles = spawn_workers(s, 3, &rx, &aggregate, &root).unwrap();
            drop(rx);
            for i in 0..500u64 {
                let path = root.join(format!("d{}", i % 5)).join(format!("f{i}"));
                tx.send(FileTask { path, size: 2 }).unwrap();
            }
            drop(tx);
            join_workers(handles).unwrap()
        });

        assert_eq!(processed, 500);
        let map = aggregate.into_inner();
        assert_eq!(map[&root], 1_000);
        assert_eq!(map[&root.join("d0")], 200);
    }

    #[test]
    fn test_empty_queue_finishes_immediately() {
        let root = PathBuf::from("/scan");
        let aggregate = DirectoryAggregate::new();
        let processed = thread::scope(|s| {
            let (tx, rx) = crossbeam_channel::bounded::<FileTask>(1);
            let handles = spawn_workers(s, 4, &rx, &aggregate, &root).unwrap();
            drop(tx);
            join_workers(handles).unwrap()
        });
        assert_eq!(processed, 0);
        assert!(aggregate.is_empty());
    }
}
