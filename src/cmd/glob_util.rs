//! Input expansion for the `translate` command.
//!
//! A path is taken literally unless it contains glob characters, in which
//! case every matching regular file is returned in sorted order.

use std::path::{Path, PathBuf};

/// Files named by a CLI input argument
#[derive(Debug)]
pub struct InputFiles {
    pub files: Vec<PathBuf>,
    pub from_glob: bool,
}

impl InputFiles {
    /// A single literal path keeps stdout as the default output
    pub fn is_single(&self) -> bool {
        !self.from_glob && self.files.len() == 1
    }
}

pub fn is_glob_pattern(path: &str) -> bool {
    path.contains(['*', '?', '['])
}

/// Expand a literal path or glob pattern.
///
/// Fails when a literal path is missing, the pattern is invalid or nothing
/// matches.
pub fn expand_inputs(input: &Path) -> anyhow::Result<InputFiles> {
    let pattern = input.to_string_lossy();

    if !is_glob_pattern(&pattern) {
        if !input.is_file() {
            anyhow::bail!("input file not found: {}", input.display());
        }
        return Ok(InputFiles {
            files: vec![input.to_path_buf()],
            from_glob: false,
        });
    }

    let paths = glob::glob(&pattern)
        .map_err(|e| anyhow::anyhow!("invalid glob pattern '{}': {}", pattern, e))?;

    let mut files = Vec::new();
    for entry in paths {
        let path =
            entry.map_err(|e| anyhow::anyhow!("cannot read match for '{}': {}", pattern, e))?;
        if path.is_file() {
            files.push(path);
        }
    }

    if files.is_empty() {
        anyhow::bail!("no files match pattern: {}", pattern);
    }
    files.sort();

    Ok(InputFiles {
        files,
        from_glob: true,
    })
}

/// Output path inside `dir` for the `index`-th input file
pub fn output_path(dir: &Path, input: &Path, index: usize) -> PathBuf {
    match input.file_name() {
        Some(name) => dir.join(name),
        None => dir.join(format!("translated_{}.sql", index)),
    }
}

/// Per-file outcome of a multi-file run
#[derive(Debug, Default)]
pub struct FileOutcomes {
    pub succeeded: usize,
    pub failed: Vec<(PathBuf, String)>,
}

impl FileOutcomes {
    pub fn success(&mut self) {
        self.succeeded += 1;
    }

    pub fn failure(&mut self, path: &Path, error: impl ToString) {
        self.failed.push((path.to_path_buf(), error.to_string()));
    }

    pub fn has_failures(&self) -> bool {
        !self.failed.is_empty()
    }
}
