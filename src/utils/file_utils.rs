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

use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Lazily list every file under `root`, at any depth. Directories are descended
/// into but never yielded. Symlinks are followed, so a linked directory is walked
/// like a real one; link loops come back as errors.
///
/// Entries that can't be read are yielded as `Err` so the caller can report them
/// and keep going.
pub fn walk_files(root: &Path) -> impl Iterator<Item = Result<PathBuf, walkdir::Error>> {
    WalkDir::new(root)
        .follow_links(true)
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) if entry.file_type().is_dir() => None,
            Ok(entry) => Some(Ok(entry.into_path())),
            Err(e) => Some(Err(e)),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_walk_files_nested() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path();
        let deep = root.join("a").join("b").join("c").join("d");
        fs::create_dir_all(&deep).unwrap();
        fs::create_dir_all(root.join("empty")).unwrap();
        fs::write(root.join("top.js"), "").unwrap();
        fs::write(root.join("a").join("mid.txt"), "").unwrap();
        fs::write(deep.join("bottom.js"), "").unwrap();

        let files: Vec<PathBuf> = walk_files(root).map(Result::unwrap).collect();
        let unique: HashSet<&PathBuf> = files.iter().collect();

        assert_eq!(files.len(), 3);
        assert_eq!(unique.len(), 3);
        assert!(unique.contains(&root.join("top.js")));
        assert!(unique.contains(&root.join("a").join("mid.txt")));
        assert!(unique.contains(&deep.join("bottom.js")));
    }

    #[test]
    fn test_walk_files_empty_root() {
        let tmp = TempDir::new().unwrap();
        assert_eq!(walk_files(tmp.path()).count(), 0);
    }

    #[cfg(unix)]
    #[test]
    fn test_walk_files_follows_links() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path().join("root");
        let outside = tmp.path().join("outside");
        fs::create_dir_all(&root).unwrap();
        fs::create_dir_all(&outside).unwrap();
        fs::write(outside.join("linked.js"), "").unwrap();
        std::os::unix::fs::symlink(&outside, root.join("vendor")).unwrap();

        let files: Vec<PathBuf> = walk_files(&root).map(Result::unwrap).collect();
        assert_eq!(files, vec![root.join("vendor").join("linked.js")]);
    }

    #[cfg(unix)]
    #[test]
    fn test_walk_files_reports_broken_link() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path();
        fs::write(root.join("ok.js"), "").unwrap();
        std::os::unix::fs::symlink(root.join("gone"), root.join("dangling.js")).unwrap();

        let (ok, errors): (Vec<_>, Vec<_>) = walk_files(root).partition(Result::is_ok);
        assert_eq!(ok.len(), 1);
        assert_eq!(errors.len(), 1);
    }
}
