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

use crate::config::Migration;
use crate::error::SwapError;
use regex::{NoExpand, Regex};
use std::borrow::Cow;
use std::fs;
use std::path::Path;

/// What happened to a single file
#[derive(Debug)]
pub enum Outcome {
    /// The path doesn't have the migration's extension. It was never opened.
    Skipped,
    /// The file was read but references nothing that needs replacing
    Untouched,
    /// Every reference was replaced and the file written back (or would have
    /// been, in a dry run)
    Rewritten,
    /// Reading or writing failed
    Failed(SwapError),
}

/// Rewrites `require(...)` and `from ...` references to one dependency into
/// references to another.
///
/// Replacements always use single quotes, whatever the original used.
#[derive(Debug)]
pub struct Rewriter {
    extension: String,
    /// Literal references that mark a file as needing a rewrite
    needles: [String; 4],
    require_re: Regex,
    require_replacement: String,
    from_re: Regex,
    from_replacement: String,
    dry_run: bool,
}

impl Rewriter {
    pub fn new(migration: &Migration, dry_run: bool) -> Result<Self, SwapError> {
        let old = &migration.from;
        let name = regex::escape(old);
        Ok(Rewriter {
            extension: migration.extension.clone(),
            needles: [
                format!("require('{old}')"),
                format!("require(\"{old}\")"),
                format!("from '{old}'"),
                format!("from \"{old}\""),
            ],
            require_re: Regex::new(&format!(r#"require\(['"]{name}['"]\)"#))?,
            require_replacement: format!("require('{}')", migration.to),
            from_re: Regex::new(&format!(r#"from ['"]{name}['"]"#))?,
            from_replacement: format!("from '{}'", migration.to),
            dry_run,
        })
    }

    /// Only the path string is checked, nothing is read from disk
    pub fn is_eligible(&self, path: &Path) -> bool {
        path.as_os_str()
            .to_string_lossy()
            .ends_with(self.extension.as_str())
    }

    pub fn references_old(&self, content: &str) -> bool {
        self.needles.iter().any(|needle| content.contains(needle.as_str()))
    }

    /// Replace every reference in `content`. Borrows if there was nothing to do.
    pub fn substitute<'a>(&self, content: &'a str) -> Cow<'a, str> {
        match self
            .require_re
            .replace_all(content, NoExpand(&self.require_replacement))
        {
            Cow::Borrowed(_) => self
                .from_re
                .replace_all(content, NoExpand(&self.from_replacement)),
            Cow::Owned(updated) => {
                let replaced = self
                    .from_re
                    .replace_all(&updated, NoExpand(&self.from_replacement))
                    .into_owned();
                Cow::Owned(replaced)
            }
        }
    }

    /// Process one file. Errors never escape; they come back as [`Outcome::Failed`].
    pub fn rewrite_file(&self, path: &Path) -> Outcome {
        if !self.is_eligible(path) {
            return Outcome::Skipped;
        }
        match self.replace_in_file(path) {
            Ok(true) => Outcome::Rewritten,
            Ok(false) => Outcome::Untouched,
            Err(e) => Outcome::Failed(e),
        }
    }

    fn replace_in_file(&self, path: &Path) -> Result<bool, SwapError> {
        let content = fs::read_to_string(path)?;
        if !self.references_old(&content) {
            return Ok(false);
        }
        let new_content = self.substitute(&content);
        if !self.dry_run {
            fs::write(path, new_content.as_bytes())?;
        }
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn rewriter() -> Rewriter {
        Rewriter::new(&Migration::default(), false).unwrap()
    }

    /// Write `content` to a fresh file, rewrite it, and return the outcome and new content
    fn run_on(name: &str, content: &str) -> (Outcome, String) {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join(name);
        fs::write(&path, content).unwrap();
        let outcome = rewriter().rewrite_file(&path);
        (outcome, fs::read_to_string(&path).unwrap())
    }

    #[test]
    fn test_require_single_quotes() {
        let (outcome, content) = run_on("a.js", "const bcrypt = require('bcrypt');");
        assert!(matches!(outcome, Outcome::Rewritten));
        assert_eq!(content, "const bcrypt = require('bcryptjs');");
    }

    #[test]
    fn test_every_quote_style() {
        let test_cases = vec![
            ("require('bcrypt')", "require('bcryptjs')"),
            ("require(\"bcrypt\")", "require('bcryptjs')"),
            ("from 'bcrypt'", "from 'bcryptjs'"),
            ("from \"bcrypt\"", "from 'bcryptjs'"),
            ("import bcrypt from \"bcrypt\"", "import bcrypt from 'bcryptjs'"),
        ];
        for (input, expected) in test_cases {
            let (outcome, content) = run_on("a.js", input);
            assert!(matches!(outcome, Outcome::Rewritten), "{input}");
            assert_eq!(content, expected);
        }
    }

    #[test]
    fn test_mixed_file() {
        let input = "\
const bcrypt = require(\"bcrypt\");
const other = require('bcrypt');
import { hash } from 'bcrypt';
// bcrypt is mentioned here but not imported
const express = require('express');
";
        let expected = "\
const bcrypt = require('bcryptjs');
const other = require('bcryptjs');
import { hash } from 'bcryptjs';
// bcrypt is mentioned here but not imported
const express = require('express');
";
        let (_, content) = run_on("server.js", input);
        assert_eq!(content, expected);
    }

    #[test]
    fn test_unrelated_content_untouched() {
        let test_cases = vec![
            "const x = 1;",
            "const b = require('bcryptjs');",
            "const b = require('bcrypt-nodejs');",
            "import argon2 from \"argon2\";",
            "// require bcrypt later",
        ];
        for input in test_cases {
            let (outcome, content) = run_on("a.js", input);
            assert!(matches!(outcome, Outcome::Untouched), "{input}");
            assert_eq!(content, input);
        }
    }

    #[test]
    fn test_idempotent() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("a.js");
        fs::write(&path, "require(\"bcrypt\"); import x from 'bcrypt';").unwrap();

        let rewriter = rewriter();
        assert!(matches!(rewriter.rewrite_file(&path), Outcome::Rewritten));
        let once = fs::read_to_string(&path).unwrap();
        assert!(matches!(rewriter.rewrite_file(&path), Outcome::Untouched));
        assert_eq!(fs::read_to_string(&path).unwrap(), once);
    }

    #[test]
    fn test_other_extensions_skipped() {
        for name in ["a.ts", "a.jsx", "a.JS", "a.js.map", "js"] {
            let (outcome, content) = run_on(name, "require('bcrypt')");
            assert!(matches!(outcome, Outcome::Skipped), "{name}");
            assert_eq!(content, "require('bcrypt')");
        }
    }

    #[test]
    fn test_skipped_file_is_never_read() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("blob.bin");
        fs::write(&path, [0xff, 0xfe, 0x00]).unwrap();
        assert!(matches!(rewriter().rewrite_file(&path), Outcome::Skipped));
    }

    #[test]
    fn test_read_failures() {
        let tmp = TempDir::new().unwrap();
        assert!(matches!(
            rewriter().rewrite_file(&tmp.path().join("missing.js")),
            Outcome::Failed(SwapError::IoError(_))
        ));

        let path = tmp.path().join("latin1.js");
        fs::write(&path, b"require('bcrypt'); // caf\xe9").unwrap();
        assert!(matches!(
            rewriter().rewrite_file(&path),
            Outcome::Failed(SwapError::IoError(_))
        ));
        assert_eq!(fs::read(&path).unwrap(), b"require('bcrypt'); // caf\xe9");
    }

    #[test]
    fn test_write_failure() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("locked.js");
        fs::write(&path, "require('bcrypt')").unwrap();
        let mut permissions = fs::metadata(&path).unwrap().permissions();
        permissions.set_readonly(true);
        fs::set_permissions(&path, permissions).unwrap();

        // privileged users can write through the read-only bit
        if fs::OpenOptions::new().append(true).open(&path).is_ok() {
            return;
        }
        assert!(matches!(
            rewriter().rewrite_file(&path),
            Outcome::Failed(SwapError::IoError(_))
        ));
        assert_eq!(fs::read_to_string(&path).unwrap(), "require('bcrypt')");
    }

    #[test]
    fn test_dry_run_writes_nothing() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("a.js");
        fs::write(&path, "require('bcrypt')").unwrap();
        let rewriter = Rewriter::new(&Migration::default(), true).unwrap();
        assert!(matches!(rewriter.rewrite_file(&path), Outcome::Rewritten));
        assert_eq!(fs::read_to_string(&path).unwrap(), "require('bcrypt')");
    }

    #[test]
    fn test_names_are_literal() {
        let migration = Migration::new("@scope/lib.v1", "$lib", ".mjs");
        let rewriter = Rewriter::new(&migration, false).unwrap();

        assert_eq!(
            rewriter.substitute("import a from \"@scope/lib.v1\"; require('@scope/lib.v1')"),
            "import a from '$lib'; require('$lib')"
        );
        // `.` must not act as a wildcard
        assert!(!rewriter.references_old("require('@scope/libXv1')"));
        assert_eq!(
            rewriter.substitute("require('@scope/libXv1')"),
            "require('@scope/libXv1')"
        );
        assert!(rewriter.is_eligible(Path::new("src/index.mjs")));
        assert!(!rewriter.is_eligible(Path::new("src/index.js")));
    }
}
