// Copyright 2024 Google LLC
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//      http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Getting hold of the documentation sources.

use anyhow::{bail, Context};
use log::info;
use std::path::{Path, PathBuf};
use std::process::Command;
use walkdir::WalkDir;

pub const GODOT_REPO_URL: &str = "https://github.com/godotengine/godot.git";

/// Shallow clone the repository at `url` into `dir`, checking out `tag`.
///
/// Nothing is done if `dir` already exists.
pub fn clone_repository(url: &str, tag: &str, dir: &Path) -> anyhow::Result<()> {
    if dir.exists() {
        info!("Directory {} already exists. Skipping clone.", dir.display());
        return Ok(());
    }

    info!("Cloning {url} (tag: {tag}, depth: 1)...");
    let status = Command::new("git")
        .args(["clone", "--branch", tag, "--depth", "1", "--single-branch", url])
        .arg(dir)
        .status()
        .context("Could not run git, please ensure it is installed and in your PATH")?;
    if !status.success() {
        bail!("git clone of {url} at tag {tag} failed: {status}");
    }

    info!("Successfully cloned {url} at tag {tag}");
    Ok(())
}

/// Find all files below `root` with the given extension.
///
/// The paths are sorted to give a stable processing order.
pub fn find_files(root: &Path, extension: &str) -> anyhow::Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = entry.with_context(|| format!("Could not read {}", root.display()))?;
        let path = entry.path();
        if entry.file_type().is_file() && path.extension() == Some(extension.as_ref()) {
            files.push(path.to_path_buf());
        }
    }
    Ok(files)
}
