use crate::error::{GoError, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Go module rooted at the directory holding `go.mod`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Module {
    pub root: PathBuf,
    pub path: String,
}

impl Module {
    /// Find the enclosing module of `start`, walking up parent directories.
    pub fn find(start: &Path) -> Result<Self> {
        let start = start
            .canonicalize()
            .map_err(|e| GoError::io(start, e))?;

        let mut dir = Some(start.as_path());
        while let Some(current) = dir {
            let go_mod = current.join("go.mod");
            if go_mod.is_file() {
                let contents = fs::read_to_string(&go_mod).map_err(|e| GoError::io(&go_mod, e))?;
                let path = parse_module_path(&contents).ok_or(GoError::InvalidModule(go_mod))?;
                log::debug!("Module {} at {}", path, current.display());
                return Ok(Self {
                    root: current.to_path_buf(),
                    path,
                });
            }
            dir = current.parent();
        }

        Err(GoError::NoModule(start))
    }

    /// Import path of a directory inside the module.
    pub fn import_path(&self, dir: &Path) -> Option<String> {
        let relative = dir.strip_prefix(&self.root).ok()?;
        let mut path = self.path.clone();
        for component in relative.components() {
            path.push('/');
            path.push_str(&component.as_os_str().to_string_lossy());
        }
        Some(path)
    }

    /// Directory of an import path inside the module.
    pub fn dir_of(&self, import_path: &str) -> Option<PathBuf> {
        if import_path == self.path {
            return Some(self.root.clone());
        }
        let rest = import_path.strip_prefix(&self.path)?.strip_prefix('/')?;
        Some(rest.split('/').fold(self.root.clone(), |dir, part| dir.join(part)))
    }

    /// Path relative to the module root with `/` separators.
    pub fn relative(&self, file: &Path) -> String {
        match file.strip_prefix(&self.root) {
            Ok(relative) => relative
                .components()
                .map(|c| c.as_os_str().to_string_lossy())
                .collect::<Vec<_>>()
                .join("/"),
            Err(_) => file.display().to_string(),
        }
    }
}

fn parse_module_path(contents: &str) -> Option<String> {
    for line in contents.lines() {
        let line = line.split("//").next().unwrap_or_default().trim();
        let Some(rest) = line.strip_prefix("module") else {
            continue;
        };
        if !rest.starts_with(char::is_whitespace) {
            continue;
        }
        let path = rest.trim().trim_matches(|c| c == '"' || c == '`');
        if !path.is_empty() {
            return Some(path.to_string());
        }
    }
    None
}
