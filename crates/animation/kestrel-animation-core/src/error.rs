//! Error types for the animation manager.

use thiserror::Error;

/// Which fixed-capacity pool rejected a creation.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum PoolKind {
    Clip,
    Curve,
    Key,
    Matrix,
}

/// Recoverable creation failures. A failed create leaves the manager
/// bit-identical to its pre-call state; capacity checks run before any pool
/// is touched.
#[derive(Error, Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum AnimError {
    #[error("{kind:?} pool exhausted")]
    PoolExhausted { kind: PoolKind },

    #[error("curve count mismatch in clip '{clip}'")]
    CurveCountMismatch { clip: String },

    #[error("library handle does not resolve")]
    UnknownLibrary,

    #[error("skeleton handle does not resolve")]
    UnknownSkeleton,
}
