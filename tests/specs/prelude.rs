//! Shared helpers for CLI specs

#![allow(dead_code)]

pub use assert_cmd::Command;
pub use predicates::prelude::*;

use std::path::Path;
use tempfile::TempDir;

/// Host with nothing listening, for specs that must fail to connect
pub const CLOSED_HOST: &str = "127.0.0.1:9";

const SETTING_VARS: &[&str] = &[
    "TWR_HOST",
    "TWR_USERNAME",
    "TWR_PASSWORD",
    "TWR_OAUTH_TOKEN",
    "TWR_VERIFY_SSL",
    "TWR_FORMAT",
    "TWR_VERBOSE",
    "TWR_COLOR",
    "TWR_LOG",
];

/// A scratch directory used as both the working directory and `HOME`
pub struct Workspace {
    dir: TempDir,
}

impl Workspace {
    pub fn empty() -> Self {
        Self {
            dir: tempfile::tempdir().unwrap(),
        }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Write a file relative to the workspace root
    pub fn file(&self, relative: &str, content: &str) {
        let path = self.dir.path().join(relative);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(path, content).unwrap();
    }

    pub fn read(&self, relative: &str) -> String {
        std::fs::read_to_string(self.dir.path().join(relative)).unwrap()
    }

    /// `twr` isolated from the caller's settings
    pub fn twr(&self) -> Command {
        let mut cmd = Command::cargo_bin("twr").unwrap();
        cmd.current_dir(self.path()).env("HOME", self.path());
        for var in SETTING_VARS {
            cmd.env_remove(var);
        }
        cmd
    }
}
