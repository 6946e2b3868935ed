//! # Action Contract
//!
//! The per-batch operations callers hand to the dispatchers. Each is invoked
//! exactly once per batch per dispatch call.
//!
//! Closures implement both traits directly:
//!
//! ```rust
//! use tasker_batch::action::{BatchProduce, BatchRun};
//!
//! let log = |batch: &[u32]| -> anyhow::Result<()> {
//!     println!("processing {} items", batch.len());
//!     Ok(())
//! };
//! log.run(&[1u32, 2, 3]).unwrap();
//!
//! let render = |batch: &[u32]| -> anyhow::Result<Vec<String>> {
//!     Ok(batch.iter().map(u32::to_string).collect())
//! };
//! assert_eq!(render.produce(&[7u32]).unwrap(), vec!["7".to_string()]);
//! ```

use std::sync::Arc;

/// Side-effecting batch operation
pub trait BatchRun<T> {
    fn run(&self, batch: &[T]) -> anyhow::Result<()>;
}

/// Batch operation producing an ordered result sequence
///
/// Returning an empty vector is valid and contributes nothing to the
/// assembled result; the output need not be 1:1 with the batch.
pub trait BatchProduce<T, R> {
    fn produce(&self, batch: &[T]) -> anyhow::Result<Vec<R>>;
}

impl<T, F> BatchRun<T> for F
where
    F: Fn(&[T]) -> anyhow::Result<()>,
{
    fn run(&self, batch: &[T]) -> anyhow::Result<()> {
        self(batch)
    }
}

impl<T, R, F> BatchProduce<T, R> for F
where
    F: Fn(&[T]) -> anyhow::Result<Vec<R>>,
{
    fn produce(&self, batch: &[T]) -> anyhow::Result<Vec<R>> {
        self(batch)
    }
}

/// Adapts a shared action so it can be handed to the dispatchers by value.
///
/// A newtype rather than a blanket `impl for Arc<A>`, which would overlap
/// with the closure impls.
#[derive(Debug)]
pub struct Shared<A: ?Sized>(pub Arc<A>);

impl<A: ?Sized> Clone for Shared<A> {
    fn clone(&self) -> Self {
        Self(Arc::clone(&self.0))
    }
}

impl<T, A: BatchRun<T> + ?Sized> BatchRun<T> for Shared<A> {
    fn run(&self, batch: &[T]) -> anyhow::Result<()> {
        self.0.run(batch)
    }
}

impl<T, R, A: BatchProduce<T, R> + ?Sized> BatchProduce<T, R> for Shared<A> {
    fn produce(&self, batch: &[T]) -> anyhow::Result<Vec<R>> {
        self.0.produce(batch)
    }
}
