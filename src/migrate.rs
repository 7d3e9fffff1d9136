/*
Licensed to the Apache Software Foundation (ASF) under one
or more contributor license agreements.  See the NOTICE file
distributed with this work for additional information
regarding copyright ownership.  The ASF licenses this file
to you under the Apache License, Version 2.0 (the
"License"); you may not use this file except in compliance
with the License.  You may obtain a copy of the License at

  http://www.apache.org/licenses/LICENSE-2.0

Unless required by applicable law or agreed to in writing,
software distributed under the License is distributed on an
"AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
KIND, either express or implied.  See the License for the
specific language governing permissions and limitations
under the License.
*/
use crate::config::RunConfig;
use crate::error::SwapError;
use crate::utils::file_replace::{Outcome, Rewriter};
use crate::utils::file_utils::walk_files;
use console::style;
use std::fmt;
use std::path::PathBuf;

/// Everything that happened during one run
#[derive(Debug, Default)]
pub struct Report {
    /// Files that were rewritten, in the order they were visited
    pub rewritten: Vec<PathBuf>,
    /// Files or directory entries that could not be processed, with the reason
    pub failed: Vec<(PathBuf, SwapError)>,
    /// Configured roots that don't exist
    pub missing_roots: Vec<PathBuf>,
    /// Eligible files with nothing to replace
    pub untouched: usize,
    /// Files without the migration's extension
    pub skipped: usize,
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} to update, {} unchanged, {} ignored, {} failed, {} missing directories",
            self.rewritten.len(),
            self.untouched,
            self.skipped,
            self.failed.len(),
            self.missing_roots.len()
        )
    }
}

/// Walk every configured root in order and rewrite each eligible file.
///
/// Per-file and per-directory problems are printed and recorded in the report;
/// they never stop the run. The only error returned is a failure to build the
/// rewrite patterns, before anything is touched.
pub fn run(config: &RunConfig) -> Result<Report, SwapError> {
    let migration = &config.migration;
    let rewriter = Rewriter::new(migration, config.dry_run)?;
    let mut report = Report::default();

    if !config.quiet {
        println!(
            "Starting migration from {} to {}...",
            migration.from, migration.to
        );
    }

    for root in &config.roots {
        if !root.is_dir() {
            println!("Directory not found: {}", root.display());
            report.missing_roots.push(root.clone());
            continue;
        }

        for entry in walk_files(root) {
            let path = match entry {
                Ok(path) => path,
                Err(e) => {
                    let path = e.path().map(PathBuf::from).unwrap_or_else(|| root.clone());
                    let error = SwapError::from(e);
                    // walkdir errors already name the entry
                    eprintln!("{} {error}", style("Skipping:").red());
                    report.failed.push((path, error));
                    continue;
                }
            };

            match rewriter.rewrite_file(&path) {
                Outcome::Skipped => report.skipped += 1,
                Outcome::Untouched => report.untouched += 1,
                Outcome::Rewritten => {
                    if !config.quiet {
                        let label = if config.dry_run {
                            "Would update:"
                        } else {
                            "Updated:"
                        };
                        println!("{} {}", style(label).green(), path.display());
                    }
                    report.rewritten.push(path);
                }
                Outcome::Failed(e) => {
                    eprintln!(
                        "{} {}: {e}",
                        style("Error processing").red(),
                        path.display()
                    );
                    report.failed.push((path, e));
                }
            }
        }
    }

    if !config.quiet {
        println!("Migration complete!");
    }
    Ok(report)
}
