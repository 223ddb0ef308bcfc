//! Error types for the rollout core library.
//!
//! Defines the error enum exposed by the public API, its stable codes, and a
//! convenient result alias.

use std::{fmt, sync::Arc};

use thiserror::Error;

macro_rules! define_error_codes {
    (
        $(#[$enum_meta:meta])*
        enum $CodeTy:ident for $ErrTy:ident {
            $(
                $(#[$variant_meta:meta])*
                $CodeVariant:ident => $ErrVariant:ident $( { $($pattern:tt)* } )? => $code:expr
            ),+ $(,)?
        }
    ) => {
        $(#[$enum_meta])*
        #[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
        #[non_exhaustive]
        pub enum $CodeTy {
            $(
                $(#[$variant_meta])*
                $CodeVariant,
            )+
        }

        impl $CodeTy {
            /// Return the stable machine-readable representation of this error code.
            #[must_use]
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$CodeVariant => $code,)+
                }
            }
        }

        impl fmt::Display for $CodeTy {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl $ErrTy {
            #[doc = concat!(
                "Retrieve the stable [`",
                stringify!($CodeTy),
                "`] for this error."
            )]
            #[must_use]
            pub const fn code(&self) -> $CodeTy {
                match self {
                    $(Self::$ErrVariant $( { $($pattern)* } )? => $CodeTy::$CodeVariant,)+
                }
            }
        }
    };
}

/// Error type produced by graph mutation and infection operations.
#[non_exhaustive]
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum RolloutError {
    /// A user index did not refer to a user in the graph.
    #[error("user index {index} is out of bounds for a graph of {users} users")]
    UnknownUser {
        /// The offending index.
        index: usize,
        /// Number of users in the graph.
        users: usize,
    },
    /// A user with the same identifier already exists.
    #[error("a user with id `{id}` already exists")]
    DuplicateUserId {
        /// The identifier that was inserted twice.
        id: Arc<str>,
    },
    /// No candidate's connected component fits within the limit.
    #[error(
        "there are no infections that maintain consistency and are under or equal to the limit of {limit} \
         ({candidates} candidates, smallest component {})",
        smallest_label(.smallest)
    )]
    InfeasibleLimit {
        /// The limit requested by the caller.
        limit: usize,
        /// Number of candidates that were examined.
        candidates: usize,
        /// Size of the smallest component reachable from any candidate, or
        /// `None` when there were no candidates.
        smallest: Option<usize>,
    },
    /// A lock guarding a shared graph was poisoned by a panicking holder.
    #[error("{resource} lock was poisoned")]
    LockPoisoned {
        /// Name of the guarded resource.
        resource: &'static str,
    },
}

fn smallest_label(smallest: &Option<usize>) -> String {
    smallest.map_or_else(|| "n/a".to_owned(), |size| size.to_string())
}

define_error_codes! {
    /// Stable codes describing [`RolloutError`] variants.
    enum RolloutErrorCode for RolloutError {
        /// A user index did not refer to a user in the graph.
        UnknownUser => UnknownUser { .. } => "ROLLOUT_UNKNOWN_USER",
        /// A user with the same identifier already exists.
        DuplicateUserId => DuplicateUserId { .. } => "ROLLOUT_DUPLICATE_USER_ID",
        /// No candidate's connected component fits within the limit.
        InfeasibleLimit => InfeasibleLimit { .. } => "ROLLOUT_INFEASIBLE_LIMIT",
        /// A lock guarding a shared graph was poisoned.
        LockPoisoned => LockPoisoned { .. } => "ROLLOUT_LOCK_POISONED",
    }
}

impl RolloutError {
    /// Returns `true` for the expected "limit too small" outcome of limited
    /// infection, as opposed to misuse of the API.
    #[must_use]
    pub const fn is_infeasible(&self) -> bool {
        matches!(self, Self::InfeasibleLimit { .. })
    }
}

/// Convenient alias for results returned by the core API.
pub type Result<T> = core::result::Result<T, RolloutError>;
