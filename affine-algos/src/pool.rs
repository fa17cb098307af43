//! Many independent alignments on a fixed set of worker threads.
//!
//! Jobs and results travel over bounded channels, so producers block when the
//! workers fall behind and workers block when results are not consumed.
//! Each worker owns one [`Engine`]; only the scoring model is copied into every worker.

use crate::{AlignParams, Engine};
use affine_types::*;
use crossbeam_channel::{bounded, Receiver, Sender};
use log::debug;
use std::thread::{self, JoinHandle};

/// One pair to align. `tag` is echoed in the result, since results arrive in any order.
#[derive(Clone, Debug)]
pub struct Job {
    pub tag: usize,
    pub a: Sequence,
    pub b: Sequence,
}

#[derive(Clone, Debug)]
pub struct Finished {
    pub tag: usize,
    pub result: Result<Alignment, AlignError>,
}

pub struct AlignerPool {
    jobs: Option<Sender<Job>>,
    results: Receiver<Finished>,
    workers: Vec<JoinHandle<()>>,
}

impl AlignerPool {
    /// Start `workers` threads. Both queues hold at most `capacity` items.
    pub fn new(model: ScoringModel, params: AlignParams, workers: usize, capacity: usize) -> Self {
        assert!(workers > 0, "an aligner pool needs at least one worker");
        let (job_tx, job_rx) = bounded::<Job>(capacity);
        let (result_tx, result_rx) = bounded(capacity);
        let workers = (0..workers)
            .map(|id| {
                let jobs = job_rx.clone();
                let results = result_tx.clone();
                thread::spawn(move || {
                    let mut engine = Engine::new(model, params);
                    debug!("aligner worker {id} started");
                    let mut done = 0;
                    for Job { tag, a, b } in jobs {
                        let result = engine.align(&a, &b);
                        if results.send(Finished { tag, result }).is_err() {
                            break;
                        }
                        done += 1;
                    }
                    debug!("aligner worker {id} stopped after {done} jobs");
                })
            })
            .collect();
        Self {
            jobs: Some(job_tx),
            results: result_rx,
            workers,
        }
    }

    /// A handle to submit jobs from another thread. The pool keeps running until
    /// every sender is dropped and [`AlignerPool::finish`] was called.
    pub fn sender(&self) -> Result<Sender<Job>, AlignError> {
        self.jobs.clone().ok_or(AlignError::PoolClosed)
    }

    /// Submit a job, blocking while the job queue is full.
    pub fn submit(&self, job: Job) -> Result<(), AlignError> {
        self.jobs
            .as_ref()
            .ok_or(AlignError::PoolClosed)?
            .send(job)
            .map_err(|_| AlignError::PoolClosed)
    }

    /// Stop accepting jobs through the pool itself.
    pub fn finish(&mut self) {
        self.jobs = None;
    }

    /// Results as they are produced. Ends once all jobs are done and all senders are gone.
    pub fn results(&self) -> crossbeam_channel::Iter<'_, Finished> {
        self.results.iter()
    }

    /// Wait for all workers to exit. A panic in a worker is resumed here.
    pub fn join(mut self) {
        self.finish();
        for worker in self.workers.drain(..) {
            if let Err(panic) = worker.join() {
                std::panic::resume_unwind(panic);
            }
        }
    }
}

/// Align all `pairs` on `workers` threads and return the alignments in input order.
///
/// Fails with the error of the first failing pair.
pub fn align_batch(
    model: ScoringModel,
    params: AlignParams,
    pairs: &[(Sequence, Sequence)],
    workers: usize,
) -> Result<Vec<Alignment>, AlignError> {
    let mut pool = AlignerPool::new(model, params, workers, 2 * workers);
    let jobs = pool.sender()?;
    pool.finish();

    let mut out: Vec<Option<Result<Alignment, AlignError>>> = vec![None; pairs.len()];
    thread::scope(|scope| {
        scope.spawn(move || {
            for (tag, (a, b)) in pairs.iter().enumerate() {
                let job = Job {
                    tag,
                    a: a.clone(),
                    b: b.clone(),
                };
                if jobs.send(job).is_err() {
                    break;
                }
            }
        });
        for Finished { tag, result } in pool.results() {
            out[tag] = Some(result);
        }
    });
    pool.join();
    out.into_iter()
        .map(|r| r.unwrap_or(Err(AlignError::PoolClosed)))
        .collect()
}
