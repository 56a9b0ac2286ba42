//! Optional process-wide error hook.
//!
//! Invoked with a context tag and the failure for handler, forward, email, and
//! outbound send failures. Tags: `send`, `noserver`, `invalidresponse` for
//! client sends; the action kind (`log`, `callback`, `forward`,
//! `desktopNotify`, `email`) for handler failures.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

use wozzit_core::WozzitError;

pub type ErrorHook = Arc<dyn Fn(&str, &WozzitError) + Send + Sync>;

pub const TAG_SEND: &str = "send";
pub const TAG_NO_SERVER: &str = "noserver";
pub const TAG_INVALID_RESPONSE: &str = "invalidresponse";

/// Log `err` under `tag` and hand it to the hook, if one is set.
pub fn report(hook: Option<&ErrorHook>, tag: &str, err: &WozzitError) {
    tracing::warn!(tag, error = %err, "wozzit failure");
    if let Some(hook) = hook {
        // hook panics stay inside report
        if catch_unwind(AssertUnwindSafe(|| hook(tag, err))).is_err() {
            tracing::error!(tag, "error hook panicked");
        }
    }
}
