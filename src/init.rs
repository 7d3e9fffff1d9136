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
use crate::config::CONFIG_NAME;
use crate::error::SwapError;
use std::fs;
use std::path::{Path, PathBuf};
/// A basic sample configuration that can be initialized
/// by using the `config` command
const SAMPLE_CONFIG: &str = r#"# Dependency migration configuration
[migration]
# The dependency whose references get replaced
from = "bcrypt"
# Its API-compatible replacement
to = "bcryptjs"
# Only files whose name ends with this are looked at
extension = ".js"

[paths]
# Directories to scan, in order. Relative paths are resolved against
# the directory this file lives in.
roots = ["api", "scripts"]
"#;

/// Create a sample config file. Without a path it goes in the current directory.
pub fn generate_config(path: Option<&PathBuf>, force: bool) -> Result<PathBuf, SwapError> {
    let config_path = match path {
        Some(path) => path.clone(),
        None => PathBuf::from(CONFIG_NAME),
    };

    if config_path.exists() {
        if !force {
            return Err(SwapError::Other(format!(
                "Config file already exists at {}. Use --force to overwrite",
                config_path.display()
            )));
        }
        backup(&config_path)?;
    }
    fs::write(&config_path, SAMPLE_CONFIG)?;
    Ok(config_path)
}

fn backup(path: &Path) -> Result<(), SwapError> {
    let mut backup = path.as_os_str().to_os_string();
    backup.push(".bak");
    fs::copy(path, backup)?;
    Ok(())
}
