//! Shared stream state and the nesting discipline between cursors.
//!
//! Every reader and writer handle borrows one [`Stream`] and remembers the
//! nesting depth it was created at. Only handles whose depth equals the
//! stream's active depth may act. Opening an array or object raises the active
//! depth for the duration of the child callback, which locks the parent; the
//! [`Scope`] guard lowers it again on every exit path.

use std::cell::{Cell, RefCell};

use crate::error::{Result, SbonError};

/// Default maximum compound nesting depth for decoding.
pub const DEFAULT_MAX_DEPTH: usize = 128;

/// Resource limits applied while decoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limits {
    /// Deepest array/object nesting that may be entered.
    pub max_depth: usize,
    /// Longest string, key or binary payload accepted, in bytes.
    pub max_length: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            max_length: usize::MAX,
        }
    }
}

impl Limits {
    /// No limits at all. Used for writing, where the caller controls the shape.
    pub fn unbounded() -> Self {
        Self {
            max_depth: usize::MAX,
            max_length: usize::MAX,
        }
    }
}

/// An underlying byte source or sink plus the active nesting depth.
pub struct Stream<S> {
    io: RefCell<S>,
    depth: Cell<usize>,
    limits: Limits,
}

impl<S> Stream<S> {
    pub fn new(io: S, limits: Limits) -> Self {
        Self {
            io: RefCell::new(io),
            depth: Cell::new(0),
            limits,
        }
    }

    pub fn limits(&self) -> Limits {
        self.limits
    }

    /// The depth of the handle that currently owns the stream.
    pub fn active_depth(&self) -> usize {
        self.depth.get()
    }

    /// Fails unless a handle at `depth` currently owns the stream.
    pub fn ensure_ready(&self, depth: usize) -> Result<()> {
        let active = self.depth.get();
        if active == depth {
            Ok(())
        } else {
            tracing::debug!(depth, active, "cursor used while a child is open");
            Err(SbonError::UseAfterChildActive)
        }
    }

    /// Runs `f` against the underlying source or sink.
    ///
    /// Callers must not invoke user callbacks from inside `f`.
    pub fn with<T>(&self, f: impl FnOnce(&mut S) -> T) -> T {
        f(&mut *self.io.borrow_mut())
    }

    /// Hands ownership of the stream from the handle at `depth` to a child.
    pub fn enter(&self, depth: usize) -> Result<Scope<'_, S>> {
        self.ensure_ready(depth)?;
        let child = depth + 1;
        if child > self.limits.max_depth {
            return Err(SbonError::DepthLimitExceeded(self.limits.max_depth));
        }
        self.depth.set(child);
        tracing::trace!(depth = child, "entered compound");
        Ok(Scope {
            stream: self,
            parent: depth,
        })
    }

    pub fn into_inner(self) -> S {
        self.io.into_inner()
    }
}

/// Guard returned by [`Stream::enter`]; hands the stream back to the parent
/// when dropped.
pub struct Scope<'a, S> {
    stream: &'a Stream<S>,
    parent: usize,
}

impl<S> Scope<'_, S> {
    /// Depth of the child handles created inside this scope.
    pub fn child_depth(&self) -> usize {
        self.parent + 1
    }
}

impl<S> Drop for Scope<'_, S> {
    fn drop(&mut self) {
        self.stream.depth.set(self.parent);
        tracing::trace!(depth = self.parent + 1, "left compound");
    }
}
