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
use crate::cli::{AppArgs, Command, cli};
use crate::config::{Config, Migration, RunConfig};
use crate::error::SwapError;
use crate::init::generate_config;
use crate::migrate::run;
use clap_complete::{
    generate_to,
    shells::{Bash, Fish, Zsh},
};
use clap_mangen::Man;
use std::fs::File;
use std::path::{Path, PathBuf};

const BIN_NAME: &str = "depswap";

/// Run whatever the arguments ask for. Without a subcommand that's the migration.
pub fn match_arguments(app: &AppArgs, config: Config) -> Result<(), SwapError> {
    match &app.command {
        None => {
            let run_config = build_run_config(app, &config)?;
            let report = run(&run_config)?;
            if run_config.dry_run && !app.quiet {
                println!("Dry run, nothing was written. {report}");
            }
        }
        Some(Command::Config { file, force }) => {
            let path = generate_config(file.as_ref(), *force)?;
            if !app.quiet {
                println!("Config file created at {}", path.display());
            }
        }
        Some(Command::Generate { kind, out }) => {
            let out_dir = match out {
                Some(out) => out.clone(),
                None => std::env::current_dir()?,
            };
            let message = generate(kind, &out_dir)?;
            if !app.quiet {
                println!("{message}");
            }
        }
    }
    Ok(())
}

/// Write completions or man pages for `kind` into `out_dir`, returning what was done
fn generate(kind: &str, out_dir: &PathBuf) -> Result<&'static str, SwapError> {
    let mut cmd = cli();
    match kind {
        "bash" => {
            generate_to(Bash, &mut cmd, BIN_NAME, out_dir)?;
            Ok("Generated bash completions")
        }
        "zsh" => {
            generate_to(Zsh, &mut cmd, BIN_NAME, out_dir)?;
            Ok("Generated zsh completions")
        }
        "fish" => {
            generate_to(Fish, &mut cmd, BIN_NAME, out_dir)?;
            Ok("Generated fish completions")
        }
        "man" => {
            generate_manpages(cmd, out_dir, None)?;
            Ok("Manpages generated")
        }
        other => Err(SwapError::Other(format!("Unknown kind: {other}"))),
    }
}

/// Merge the command line over the config file
fn build_run_config(app: &AppArgs, config: &Config) -> Result<RunConfig, SwapError> {
    let configured = config.get_migration();
    let migration = Migration::new(
        app.from.clone().unwrap_or(configured.from),
        app.to.clone().unwrap_or(configured.to),
        app.extension.clone().unwrap_or(configured.extension),
    );
    let roots = if app.roots.is_empty() {
        config.get_roots()
    } else {
        app.roots.clone()
    };
    let directory = match &app.directory {
        Some(directory) => directory.clone(),
        None => config.get_base_directory()?,
    };
    RunConfig::new(&directory, &roots, migration, app.dry_run, app.quiet)
}

/// Helper to write manpages
fn write_man(cmd: &clap::Command, out_dir: &Path, name: &str) -> Result<(), SwapError> {
    let man = Man::new(cmd.clone());
    let mut file = File::create(out_dir.join(name))?;
    man.render(&mut file)?;
    Ok(())
}

/// Generate manpages for all subcommands. Otherwise we only get a manpage for the root command.
fn generate_manpages(
    cmd: clap::Command,
    out_dir: &PathBuf,
    parent: Option<String>,
) -> Result<(), SwapError> {
    let name = if let Some(parent) = parent {
        format!("{BIN_NAME}-{parent}.1")
    } else {
        format!("{BIN_NAME}.1")
    };
    write_man(&cmd, out_dir, &name)?;

    for subcommand in cmd.get_subcommands() {
        if subcommand.is_hide_set() {
            continue;
        }
        let sub_name = subcommand.get_name().to_string().replace('_', "-");
        generate_manpages(subcommand.clone(), out_dir, Some(sub_name))?;
    }
    Ok(())
}
