//! Crate error type plus the context-adding traits shared by [`error::Error`]
//! and [`result::Result`].

use std::fmt::Debug;
pub mod error;
pub mod result;

/// Wraps a failure with the object being worked on and the function that
/// failed, usually filled in with `function_path!()`.
pub trait WithDebugObjectAndFnName<S: Into<String>, O: Debug + 'static> {
    fn with_debug_object_and_fn_name(self, obj: O, fn_name: S) -> Self;
}

/// Prefixes a failure with a human readable message; the wrapped error is
/// indented below it when displayed.
pub trait WithMsg<S: Into<String>> {
    fn with_msg(self, msg: S) -> Self;
}
