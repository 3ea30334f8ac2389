//! Boundary traits for the external time-series store and rendering engine.

use std::path::Path;

use crate::error::BackendError;
use crate::graph::GraphSpec;

/// Boxed error returned by a [`SeriesStore`].
pub type StoreError = Box<dyn std::error::Error + Send + Sync>;

/// The two primitives report assembly needs from the time-series store.
pub trait SeriesStore {
    /// Returns the timestamp (Unix seconds) of the most recent update in `path`.
    fn last_update(&self, path: &Path) -> Result<i64, StoreError>;

    /// Returns true if `path` exists and can be read as a series.
    fn is_available(&self, path: &Path) -> bool {
        path.is_file()
    }
}

impl<S: SeriesStore + ?Sized> SeriesStore for &S {
    fn last_update(&self, path: &Path) -> Result<i64, StoreError> {
        (**self).last_update(path)
    }

    fn is_available(&self, path: &Path) -> bool {
        (**self).is_available(path)
    }
}

/// Consumes a graph spec and produces exactly one image at its output path.
pub trait Renderer {
    type Error: BackendError + Send + Sync + 'static;

    fn render(&self, spec: GraphSpec) -> Result<(), Self::Error>;
}

impl<R: Renderer + ?Sized> Renderer for &R {
    type Error = R::Error;

    fn render(&self, spec: GraphSpec) -> Result<(), Self::Error> {
        (**self).render(spec)
    }
}
