use anyhow::Result;
use log::info;
use std::path::PathBuf;

use trajviz::validator::validate_directory;

use crate::cli::config::Config;

/// Validate trajectory directory integrity
pub fn run(dir: PathBuf, config: Option<PathBuf>) -> Result<()> {
    let options = Config::load(config.as_deref())?.validate_options();

    info!("trajviz Validator");
    info!("=================");
    info!("Directory: {}", dir.display());

    match validate_directory(&dir, &options) {
        Ok(report) => {
            #[cfg(feature = "colorized_output")]
            {
                println!("{}", report.format_colored());
            }

            #[cfg(not(feature = "colorized_output"))]
            {
                println!("{}", report);
            }

            if report.has_failures() {
                std::process::exit(1);
            }

            Ok(())
        }
        Err(e) => {
            eprintln!("Validation error: {e}");
            std::process::exit(1);
        }
    }
}
