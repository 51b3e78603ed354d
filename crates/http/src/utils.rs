//! Utility macros used internally by the crate.

/// Returns early with an error if a condition is not met.
///
/// Works like `assert!`, but returns `Err($error)` instead of panicking.
///
/// ```ignore
/// ensure!(count < limits.field_num(), ProtocolError::too_many("too many header fields"));
/// ```
macro_rules! ensure {
    ($predicate:expr, $error:expr) => {
        if !$predicate {
            return Err($error.into());
        }
    };
}

pub(crate) use ensure;
