//! Error types for tracklet operations.

use crate::types::TrackletId;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TrackletError {
    /// `fit` called on a tracklet built without a fitter.
    #[error("no fitter configured for tracklet {tracklet_id}")]
    MissingFitter { tracklet_id: TrackletId },
}

pub type Result<T> = std::result::Result<T, TrackletError>;
