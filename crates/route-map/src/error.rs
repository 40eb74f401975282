//! Map surface errors.

use crate::surface::SurfaceStatus;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MapError {
    /// The surface cannot accept drawing calls in its current state.
    #[error("map is not ready (status: {0:?})")]
    NotReady(SurfaceStatus),

    /// The mapping backend could not be acquired. Reported once; there is
    /// no automatic retry.
    #[error("map backend failed to load: {0}")]
    SdkLoad(String),

    #[error("no route at index {0}")]
    UnknownRoute(usize),
}
