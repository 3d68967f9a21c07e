//! Counter names and one-time descriptions.
//!
//! The client installs no exporter; without a recorder the `metrics` macros are
//! no-ops, and an embedding shell can install whichever recorder it likes.

use metrics::describe_counter;
use once_cell::sync::OnceCell;

pub const ANALYSIS_REQUESTS: &str = "analysis_requests_total";
pub const ANALYSIS_FAILURES: &str = "analysis_failures_total";
pub const ANALYSIS_JOINED: &str = "analysis_joined_total";
pub const ANALYSIS_REJECTED: &str = "analysis_rejected_total";
pub const PREVIEW_REQUESTS: &str = "preview_requests_total";
pub const PREVIEW_STALE: &str = "preview_stale_total";

/// One-time metrics registration (so series carry help text once a recorder exists).
pub fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!(ANALYSIS_REQUESTS, "Analysis requests sent to the service.");
        describe_counter!(
            ANALYSIS_FAILURES,
            "Analysis requests that ended in a failed state."
        );
        describe_counter!(
            ANALYSIS_JOINED,
            "Submissions that joined an in-flight analysis instead of sending."
        );
        describe_counter!(ANALYSIS_REJECTED, "Blank submissions rejected locally.");
        describe_counter!(PREVIEW_REQUESTS, "URL preview requests sent after debounce.");
        describe_counter!(
            PREVIEW_STALE,
            "Preview responses discarded because a newer URL superseded them."
        );
    });
}
