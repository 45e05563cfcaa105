//! Command implementations.

pub mod config;
pub mod import;
pub mod list;
pub mod report;
pub mod review;
pub mod scan;

pub use self::config::execute_config;
pub use self::import::{execute_import, import_dir, ImportSummary};
pub use self::list::execute_list;
pub use self::report::{build_report, execute_report};
pub use self::review::execute_review;
pub use self::scan::{execute_scan, scan_store};

use std::time::{SystemTime, UNIX_EPOCH};

/// Current time in Unix seconds.
pub(crate) fn unix_now() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}
