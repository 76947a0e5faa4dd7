//! Integrity validation for trajectory directories.
//!
//! Runs a check-list over a converted directory tree: structure, trajectory
//! file parsing, point time-ordering, coordinate bounds, and labels files.
//! Produces a report suitable for direct printing.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use crate::plt;
use crate::track::{Bounds, PORTO_BOUNDS};

/// Validation error types.
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    /// I/O failure while scanning the directory tree.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Settings for directory validation.
#[derive(Debug, Clone)]
pub struct ValidateOptions {
    /// Coordinate sanity bounds. Defaults to the Porto bounding box.
    pub bounds: Bounds,
}

impl Default for ValidateOptions {
    fn default() -> Self {
        ValidateOptions {
            bounds: PORTO_BOUNDS,
        }
    }
}

/// Validation check result.
#[derive(Debug, Clone)]
pub enum CheckStatus {
    /// Check passed.
    Ok,
    /// Check passed with a caveat.
    Warning(String),
    /// Check failed.
    Failed(String),
}

impl CheckStatus {
    fn is_ok(&self) -> bool {
        matches!(self, CheckStatus::Ok)
    }

    fn is_failed(&self) -> bool {
        matches!(self, CheckStatus::Failed(_))
    }
}

/// Individual validation check.
#[derive(Debug, Clone)]
pub struct ValidationCheck {
    /// Human-readable check name.
    pub name: String,
    /// Outcome of the check.
    pub status: CheckStatus,
}

impl ValidationCheck {
    fn ok(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            status: CheckStatus::Ok,
        }
    }

    fn warning(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            status: CheckStatus::Warning(message.into()),
        }
    }

    fn failed(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            status: CheckStatus::Failed(message.into()),
        }
    }
}

/// Complete validation report.
#[derive(Debug)]
pub struct ValidationReport {
    /// All checks, in execution order.
    pub checks: Vec<ValidationCheck>,
    /// The validated directory.
    pub dir: String,
}

impl ValidationReport {
    fn new(dir: impl Into<String>) -> Self {
        Self {
            checks: Vec::new(),
            dir: dir.into(),
        }
    }

    fn add_check(&mut self, check: ValidationCheck) {
        self.checks.push(check);
    }

    /// Whether any check failed.
    pub fn has_failures(&self) -> bool {
        self.checks.iter().any(|c| c.status.is_failed())
    }

    /// Whether any check produced a warning.
    pub fn has_warnings(&self) -> bool {
        self.checks
            .iter()
            .any(|c| matches!(c.status, CheckStatus::Warning(_)))
    }

    /// Number of passed checks.
    pub fn success_count(&self) -> usize {
        self.checks.iter().filter(|c| c.status.is_ok()).count()
    }

    /// Number of warnings.
    pub fn warning_count(&self) -> usize {
        self.checks
            .iter()
            .filter(|c| matches!(c.status, CheckStatus::Warning(_)))
            .count()
    }

    /// Number of failed checks.
    pub fn failure_count(&self) -> usize {
        self.checks.iter().filter(|c| c.status.is_failed()).count()
    }

    /// Format the report with colors (requires the `colorized_output` feature).
    pub fn format_colored(&self) -> String {
        #[cfg(feature = "colorized_output")]
        {
            use console::{style, Emoji};

            static OK: Emoji<'_, '_> = Emoji("✓", "[OK]");
            static WARN: Emoji<'_, '_> = Emoji("⚠", "[WARN]");
            static FAIL: Emoji<'_, '_> = Emoji("✗", "[FAIL]");

            let mut output = String::new();

            output.push_str(&format!(
                "{}\n",
                style("Trajectory Validation Report").bold().cyan()
            ));
            output.push_str(&format!("{}\n", style("============================").cyan()));
            output.push_str(&format!("{}: {}\n\n", style("Directory").bold(), self.dir));

            for check in &self.checks {
                let (symbol, color_fn): (_, fn(&str) -> console::StyledObject<&str>) =
                    match &check.status {
                        CheckStatus::Ok => (OK, |s| style(s).green()),
                        CheckStatus::Warning(_) => (WARN, |s| style(s).yellow()),
                        CheckStatus::Failed(_) => (FAIL, |s| style(s).red()),
                    };

                output.push_str(&format!("[{}] {}", symbol, color_fn(&check.name)));

                match &check.status {
                    CheckStatus::Ok => output.push('\n'),
                    CheckStatus::Warning(msg) => {
                        output.push_str(&format!(" - {}: {}\n", style("WARNING").yellow().bold(), msg));
                    }
                    CheckStatus::Failed(msg) => {
                        output.push_str(&format!(" - {}: {}\n", style("FAILED").red().bold(), msg));
                    }
                }
            }

            output.push('\n');
            output.push_str(&format!(
                "{}: {} passed, {} warnings, {} failed\n",
                style("Summary").bold(),
                style(self.success_count()).green(),
                style(self.warning_count()).yellow(),
                style(self.failure_count()).red()
            ));

            output.push('\n');
            if self.has_failures() {
                output.push_str(&format!("{}\n", style("Validation FAILED").red().bold()));
            } else if self.has_warnings() {
                output.push_str(&format!(
                    "{}\n",
                    style("Validation PASSED with warnings").yellow().bold()
                ));
            } else {
                output.push_str(&format!("{}\n", style("Validation PASSED").green().bold()));
            }

            output
        }

        #[cfg(not(feature = "colorized_output"))]
        {
            format!("{}", self)
        }
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Trajectory Validation Report")?;
        writeln!(f, "============================")?;
        writeln!(f, "Directory: {}", self.dir)?;
        writeln!(f)?;

        for check in &self.checks {
            let symbol = match &check.status {
                CheckStatus::Ok => "✓",
                CheckStatus::Warning(_) => "⚠",
                CheckStatus::Failed(_) => "✗",
            };

            write!(f, "[{}] {}", symbol, check.name)?;

            match &check.status {
                CheckStatus::Ok => writeln!(f)?,
                CheckStatus::Warning(msg) => writeln!(f, " - WARNING: {}", msg)?,
                CheckStatus::Failed(msg) => writeln!(f, " - FAILED: {}", msg)?,
            }
        }

        writeln!(f)?;
        writeln!(
            f,
            "Summary: {} passed, {} warnings, {} failed",
            self.success_count(),
            self.warning_count(),
            self.failure_count()
        )?;

        if self.has_failures() {
            writeln!(f)?;
            writeln!(f, "Validation FAILED")?;
        } else if self.has_warnings() {
            writeln!(f)?;
            writeln!(f, "Validation PASSED with warnings")?;
        } else {
            writeln!(f)?;
            writeln!(f, "Validation PASSED")?;
        }

        Ok(())
    }
}

/// Main validation entry point.
pub fn validate_directory(
    dir: &Path,
    options: &ValidateOptions,
) -> Result<ValidationReport, ValidationError> {
    let mut report = ValidationReport::new(dir.display().to_string());

    if !dir.is_dir() {
        report.add_check(ValidationCheck::failed(
            "Directory exists",
            format!("not a directory: {}", dir.display()),
        ));
        return Ok(report);
    }
    report.add_check(ValidationCheck::ok("Directory exists"));

    let taxi_dirs = find_taxi_dirs(dir)?;
    if taxi_dirs.is_empty() {
        report.add_check(ValidationCheck::failed(
            "Taxi directories present",
            "no taxi_* directories found",
        ));
        return Ok(report);
    }
    report.add_check(ValidationCheck::ok(format!(
        "Taxi directories present ({})",
        taxi_dirs.len()
    )));

    check_trajectory_files(&taxi_dirs, options, &mut report)?;
    check_labels_files(&taxi_dirs, &mut report)?;

    Ok(report)
}

fn find_taxi_dirs(dir: &Path) -> Result<Vec<PathBuf>, ValidationError> {
    let mut dirs: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| {
            p.is_dir()
                && p.file_name()
                    .map(|n| n.to_string_lossy().starts_with("taxi_"))
                    .unwrap_or(false)
        })
        .collect();
    dirs.sort();
    Ok(dirs)
}

fn plt_files(taxi_dir: &Path) -> Result<Vec<PathBuf>, ValidationError> {
    let trajectory_dir = taxi_dir.join("Trajectory");
    let scan_dir = if trajectory_dir.is_dir() {
        trajectory_dir
    } else {
        taxi_dir.to_path_buf()
    };

    let mut files: Vec<PathBuf> = fs::read_dir(scan_dir)?
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p.extension().is_some_and(|ext| ext == "plt"))
        .collect();
    files.sort();
    Ok(files)
}

fn check_trajectory_files(
    taxi_dirs: &[PathBuf],
    options: &ValidateOptions,
    report: &mut ValidationReport,
) -> Result<(), ValidationError> {
    let mut total_files = 0usize;
    let mut empty_files = 0usize;
    let mut parse_failures: Vec<String> = Vec::new();
    let mut order_violations: Vec<String> = Vec::new();
    let mut out_of_bounds = 0usize;
    let mut total_points = 0usize;

    for taxi_dir in taxi_dirs {
        for file in plt_files(taxi_dir)? {
            total_files += 1;

            let points = match plt::read_trip_file(&file) {
                Ok(points) => points,
                Err(e) => {
                    parse_failures.push(format!("{}: {}", file.display(), e));
                    continue;
                }
            };

            if points.is_empty() {
                empty_files += 1;
                continue;
            }

            if points.windows(2).any(|w| w[0].time > w[1].time) {
                order_violations.push(file.display().to_string());
            }

            total_points += points.len();
            out_of_bounds += points
                .iter()
                .filter(|p| !options.bounds.contains(p.lon, p.lat))
                .count();
        }
    }

    if parse_failures.is_empty() {
        report.add_check(ValidationCheck::ok(format!(
            "Trajectory files parse ({total_files} files)"
        )));
    } else {
        report.add_check(ValidationCheck::failed(
            "Trajectory files parse",
            format!(
                "{} of {} files failed, first: {}",
                parse_failures.len(),
                total_files,
                parse_failures[0]
            ),
        ));
    }

    if empty_files == 0 {
        report.add_check(ValidationCheck::ok("Trajectory files non-empty"));
    } else {
        report.add_check(ValidationCheck::warning(
            "Trajectory files non-empty",
            format!("{empty_files} empty files"),
        ));
    }

    if order_violations.is_empty() {
        report.add_check(ValidationCheck::ok("Points are time-ordered"));
    } else {
        report.add_check(ValidationCheck::failed(
            "Points are time-ordered",
            format!(
                "{} files out of order, first: {}",
                order_violations.len(),
                order_violations[0]
            ),
        ));
    }

    if out_of_bounds == 0 {
        report.add_check(ValidationCheck::ok(format!(
            "Coordinates within bounds ({total_points} points)"
        )));
    } else {
        report.add_check(ValidationCheck::warning(
            "Coordinates within bounds",
            format!("{out_of_bounds} of {total_points} points outside bounds"),
        ));
    }

    Ok(())
}

fn check_labels_files(
    taxi_dirs: &[PathBuf],
    report: &mut ValidationReport,
) -> Result<(), ValidationError> {
    let mut missing = 0usize;
    let mut unreadable: Vec<String> = Vec::new();
    let mut spans = 0usize;

    for taxi_dir in taxi_dirs {
        let labels_file = taxi_dir.join("labels.txt");
        if !labels_file.is_file() {
            missing += 1;
            continue;
        }
        match plt::read_labels_file(&labels_file) {
            Ok(file_spans) => spans += file_spans.len(),
            Err(e) => unreadable.push(format!("{}: {}", labels_file.display(), e)),
        }
    }

    if !unreadable.is_empty() {
        report.add_check(ValidationCheck::failed(
            "Labels files parse",
            format!("{} unreadable, first: {}", unreadable.len(), unreadable[0]),
        ));
    } else if missing > 0 {
        report.add_check(ValidationCheck::warning(
            "Labels files parse",
            format!("{missing} taxi directories without labels.txt"),
        ));
    } else {
        report.add_check(ValidationCheck::ok(format!(
            "Labels files parse ({spans} intervals)"
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::convert::{convert_csv, ConvertConfig};
    use std::fs;
    use tempfile::tempdir;

    fn converted_dir(root: &Path, polyline: &str) -> PathBuf {
        let input = root.join("trips.csv");
        fs::write(
            &input,
            format!(
                "TRIP_ID,CALL_TYPE,ORIGIN_CALL,ORIGIN_STAND,TAXI_ID,TIMESTAMP,DAY_TYPE,MISSING_DATA,POLYLINE\n\
                 10,C,,,1,1372636858,A,False,\"{polyline}\"\n"
            ),
        )
        .unwrap();
        let out = root.join("out");
        convert_csv(&input, &out, &ConvertConfig::default()).unwrap();
        out
    }

    #[test]
    fn test_valid_directory_passes() {
        let dir = tempdir().unwrap();
        let out = converted_dir(dir.path(), "[[-8.61,41.14],[-8.62,41.15]]");

        let report = validate_directory(&out, &ValidateOptions::default()).unwrap();
        assert!(!report.has_failures(), "{report}");
        assert!(!report.has_warnings(), "{report}");
    }

    #[test]
    fn test_out_of_bounds_points_warn() {
        let dir = tempdir().unwrap();
        let out = converted_dir(dir.path(), "[[-9.5,41.14],[-8.62,41.15]]");

        let report = validate_directory(&out, &ValidateOptions::default()).unwrap();
        assert!(report.has_warnings(), "{report}");
        assert!(!report.has_failures(), "{report}");
    }

    #[test]
    fn test_unparseable_file_fails() {
        let dir = tempdir().unwrap();
        let out = converted_dir(dir.path(), "[[-8.61,41.14]]");
        fs::write(
            out.join("taxi_001/Trajectory/bad.plt"),
            "h1\nh2\nh3\nh4\nh5\nh6\nnot,valid\n",
        )
        .unwrap();

        let report = validate_directory(&out, &ValidateOptions::default()).unwrap();
        assert!(report.has_failures(), "{report}");
    }

    #[test]
    fn test_missing_directory_fails() {
        let dir = tempdir().unwrap();
        let report =
            validate_directory(&dir.path().join("nope"), &ValidateOptions::default()).unwrap();
        assert!(report.has_failures());
    }

    #[test]
    fn test_report_display() {
        let mut report = ValidationReport::new("some/dir");
        report.add_check(ValidationCheck::ok("Check 1"));
        report.add_check(ValidationCheck::warning("Check 2", "a warning"));
        report.add_check(ValidationCheck::failed("Check 3", "broken"));

        let output = format!("{}", report);
        assert!(output.contains("✓"));
        assert!(output.contains("⚠"));
        assert!(output.contains("✗"));
        assert!(output.contains("1 passed, 1 warnings, 1 failed"));
        assert!(output.contains("Validation FAILED"));
    }
}
