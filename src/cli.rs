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
use clap::{CommandFactory, Parser, Subcommand};
use std::path::PathBuf;

/// `depswap` rewrites `require()` and `import ... from` references to one JavaScript
/// dependency so they point at an API-compatible replacement, bcrypt to bcryptjs by default.
#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about,
    long_about = None,
    after_help = "\
EXAMPLES:
    # Rewrite bcrypt to bcryptjs under ./api and ./scripts
    depswap
    # See what would change under ./src without writing anything
    depswap --root src --dry-run
    # A different migration
    depswap --from request --to got --root lib

NOTES:
    - Installing the new package and removing the old one is up to you, e.g.
      `npm remove bcrypt && npm install bcryptjs`.
    - Check that your code still behaves as expected afterwards.
    - Running again is safe; files that were already rewritten are left alone."
)]
pub struct AppArgs {
    /// Path to config file
    #[arg(short = 'c', long = "config", env = "DEPSWAP_CONFIG")]
    pub file: Option<PathBuf>,

    /// Project directory that relative roots are resolved against. Defaults to the
    /// directory of a project config file, or the current directory otherwise.
    #[arg(short, long)]
    pub directory: Option<PathBuf>,

    /// A directory to scan. Can be given more than once, and replaces the configured roots.
    #[arg(short, long = "root", value_name = "DIR")]
    pub roots: Vec<PathBuf>,

    /// The dependency to replace
    #[arg(long)]
    pub from: Option<String>,

    /// The dependency to replace it with
    #[arg(long)]
    pub to: Option<String>,

    /// Only files whose name ends with this are rewritten
    #[arg(long)]
    pub extension: Option<String>,

    /// Show which files would change without writing them
    #[arg(short = 'n', long, default_value_t = false)]
    pub dry_run: bool,

    /// Make output quiet. Errors are still reported.
    #[arg(short, long, default_value_t = false, global = true)]
    pub quiet: bool,

    /// Run a helper command instead of the migration
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Generate a default config
    Config {
        /// Path to save the config file.
        #[arg(short, long)]
        file: Option<PathBuf>,

        /// Overwrite existing config file if it exists
        #[arg(long, default_value_t = false)]
        force: bool,
    },
    /// Generate completions or a manpage. This command is hidden by default since it should really be
    /// done at build time
    #[command(hide = true)]
    Generate {
        /// What to generate. Can be shell completion for bash, zsh, or fish; or manpages.
        #[arg(long, value_parser = ["bash", "zsh", "fish", "man"])]
        kind: String,
        /// An optional output path. If not specified, the current directory will be used instead
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

/// Parse the command line arguments, exiting with clap's message on failure
pub fn parse_args() -> AppArgs {
    match AppArgs::try_parse() {
        Ok(app) => app,
        Err(err) => err.exit(),
    }
}

pub fn cli() -> clap::Command {
    AppArgs::command()
}
