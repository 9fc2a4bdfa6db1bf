use thiserror::Error;

/// Errors produced by the notification core.
///
/// Note that detaching an adapter that is not attached is *not* an error —
/// it is a silent no-op, mirroring "removing an unregistered listener is
/// silent". Only genuinely invalid requests surface here.
#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("index {index} out of bounds for adapter list of length {len}")]
    IndexOutOfBounds { index: usize, len: usize },

    #[error("notifier cannot store adapters")]
    AdaptersUnsupported,

    #[error("notifier cannot store a delivery flag")]
    DeliverUnsupported,
}

pub type Result<T> = std::result::Result<T, NotifyError>;
