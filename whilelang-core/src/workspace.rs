//! On-disk layout for sources and generated artifacts.
//!
//! ```text
//! <root>/origin/   source programs
//! <root>/ast/      <stem>.json
//! <root>/trace/    <stem>.trace.json
//! <root>/dist/     <stem>.py, <stem>.wat, <stem>.asm
//! ```
//!
//! Output buckets are created on first write.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use walkdir::WalkDir;

use crate::ast::Program;
use crate::error::CoreError;
use crate::interpreter::TraceEntry;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind {
    Ast,
    Trace,
    Python,
    Wat,
    Assembly,
}

impl ArtifactKind {
    pub fn bucket(self) -> &'static str {
        match self {
            ArtifactKind::Ast => "ast",
            ArtifactKind::Trace => "trace",
            ArtifactKind::Python | ArtifactKind::Wat | ArtifactKind::Assembly => "dist",
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            ArtifactKind::Ast => "json",
            ArtifactKind::Trace => "trace.json",
            ArtifactKind::Python => "py",
            ArtifactKind::Wat => "wat",
            ArtifactKind::Assembly => "asm",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Workspace {
    root: PathBuf,
}

impl Workspace {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Workspace { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn origin_dir(&self) -> PathBuf {
        self.root.join("origin")
    }

    pub fn read_source(&self, name: &str) -> Result<String, CoreError> {
        let path = self.origin_dir().join(name);
        if !path.is_file() {
            return Err(CoreError::SourceNotFound(path));
        }
        Ok(fs::read_to_string(&path)?)
    }

    /// Every file under `origin/`, relative to it, in sorted order.
    pub fn sources(&self) -> Result<Vec<String>, CoreError> {
        let origin = self.origin_dir();
        if !origin.is_dir() {
            return Err(CoreError::SourceNotFound(origin));
        }
        let mut names = Vec::new();
        for entry in WalkDir::new(&origin).sort_by_file_name() {
            let entry = entry.map_err(|err| CoreError::Io(err.into()))?;
            if !entry.file_type().is_file() {
                continue;
            }
            let relative = entry.path().strip_prefix(&origin).unwrap_or(entry.path());
            names.push(relative.to_string_lossy().replace('\\', "/"));
        }
        Ok(names)
    }

    /// Where an artifact for source `name` lands.
    pub fn artifact_path(&self, kind: ArtifactKind, name: &str) -> PathBuf {
        let file = format!("{}.{}", stem(name), kind.extension());
        self.root.join(kind.bucket()).join(file)
    }

    pub fn save(&self, kind: ArtifactKind, name: &str, contents: &str) -> Result<PathBuf, CoreError> {
        let path = self.artifact_path(kind, name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, contents)?;
        Ok(path)
    }

    pub fn save_ast(&self, name: &str, program: &Program) -> Result<PathBuf, CoreError> {
        self.save_json(ArtifactKind::Ast, name, program)
    }

    pub fn save_trace(&self, name: &str, trace: &[TraceEntry]) -> Result<PathBuf, CoreError> {
        self.save_json(ArtifactKind::Trace, name, trace)
    }

    fn save_json<T: Serialize + ?Sized>(
        &self,
        kind: ArtifactKind,
        name: &str,
        value: &T,
    ) -> Result<PathBuf, CoreError> {
        let json = serde_json::to_string_pretty(value)?;
        self.save(kind, name, &json)
    }
}

/// `loops/count.txt` -> `loops/count`; only the last extension is removed.
fn stem(name: &str) -> &str {
    let file_start = name.rfind('/').map_or(0, |index| index + 1);
    match name[file_start..].rfind('.') {
        Some(dot) if dot > 0 => &name[..file_start + dot],
        _ => name,
    }
}
