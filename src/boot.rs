use log::{error, info, warn};
use std::fs;
use std::path::Path;

/// Directories created on first run.
const REQUIRED_DIRS: &[&str] = &["website", "website/db", "website/templates"];

/// Admin pages render from these; without them the settings UI returns 500.
const CRITICAL_TEMPLATES: &[&str] = &[
    "website/templates/admin/base.html.tera",
    "website/templates/admin/login.html.tera",
    "website/templates/admin/setup.html.tera",
    "website/templates/admin/settings/index.html.tera",
    "website/templates/admin/settings/page.html.tera",
];

/// Outcome of the pre-launch checks.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct BootReport {
    pub warnings: u32,
    pub errors: u32,
}

impl BootReport {
    pub fn ok(&self) -> bool {
        self.errors == 0
    }
}

/// Run all boot checks. Call this before Rocket launches.
/// Creates missing directories and reports missing templates or an
/// unwritable database directory.
pub fn run() -> BootReport {
    info!("Clean Embed boot check starting...");
    let mut report = BootReport::default();

    // ── 1. Directories ─────────────────────────────────
    for dir in REQUIRED_DIRS {
        let path = Path::new(dir);
        if !path.exists() {
            match fs::create_dir_all(path) {
                Ok(_) => info!("  Created directory: {}", dir),
                Err(e) => {
                    error!("  FAILED to create directory {}: {}", dir, e);
                    report.errors += 1;
                }
            }
        }
    }

    // ── 2. Templates ───────────────────────────────────
    for file in CRITICAL_TEMPLATES {
        if !Path::new(file).exists() {
            warn!("  Missing template: {} (admin pages will 500)", file);
            report.warnings += 1;
        }
    }

    // ── 3. Database directory writable ──────────────────
    let db_dir = Path::new("website/db");
    if db_dir.exists() {
        let test_file = db_dir.join(".write_test");
        match fs::write(&test_file, "test") {
            Ok(_) => {
                let _ = fs::remove_file(&test_file);
            }
            Err(e) => {
                error!("  Database directory not writable: {}", e);
                report.errors += 1;
            }
        }
    }

    // ── Summary ─────────────────────────────────────────
    if !report.ok() {
        error!(
            "Boot check FAILED: {} error(s), {} warning(s).",
            report.errors, report.warnings
        );
    } else if report.warnings > 0 {
        warn!(
            "Boot check passed with {} warning(s). Some pages may not work correctly.",
            report.warnings
        );
    } else {
        info!("Boot check passed.");
    }
    report
}
