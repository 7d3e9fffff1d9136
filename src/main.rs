mod cli;
mod config;
mod error;
mod init;
mod migrate;
mod parse;
mod utils;

use cli::parse_args;
use config::Config;
use error::SwapError;

fn main() -> Result<(), SwapError> {
    let args = parse_args();

    let config = if let Some(config_path) = &args.file {
        Config::from_file(config_path)?
    } else {
        Config::load()
    };

    parse::match_arguments(&args, config)
}
