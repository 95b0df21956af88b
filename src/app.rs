//! Process-level application metadata

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

/// Build metadata, usually injected at compile time through env vars
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildInfo {
    pub git_commit_log: String,
    pub build_time: String,
    /// Release name with any `refs/`-style prefix stripped
    pub git_release: String,
    pub rustc_version: String,
}

/// Running application: identity, environment, start time, build info
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppInfo {
    pub name: String,
    pub version: String,
    /// `dev`, `test`, `pro`, ...
    pub env: String,
    pub domain: String,
    pub root_dir: PathBuf,
    pub pid: u32,
    pub launch_time: DateTime<Local>,
    pub build: BuildInfo,
}

impl AppInfo {
    /// Info for the current process, launched now
    pub fn new(name: impl Into<String>, env: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: String::new(),
            env: env.into(),
            domain: String::new(),
            root_dir: PathBuf::new(),
            pid: std::process::id(),
            launch_time: Local::now(),
            build: BuildInfo::default(),
        }
    }

    /// Time since launch
    pub fn uptime(&self) -> Duration {
        (Local::now() - self.launch_time)
            .to_std()
            .unwrap_or(Duration::ZERO)
    }

    pub fn is_dev(&self) -> bool {
        self.env == "dev"
    }

    pub fn is_pro(&self) -> bool {
        self.env == "pro"
    }

    /// Record build metadata. `git_release` keeps only what follows its
    /// first `/` (`tags/v1.2.0` → `v1.2.0`).
    pub fn fill_build_info(
        &mut self,
        git_commit_log: &str,
        build_time: &str,
        git_release: &str,
        version: &str,
    ) {
        self.build.git_commit_log = git_commit_log.to_string();
        self.build.build_time = build_time.to_string();
        self.version = version.to_string();
        self.build.git_release = git_release
            .split_once('/')
            .map_or(git_release, |(_, rest)| rest)
            .to_string();
    }
}

impl fmt::Display for AppInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Build Info:\
             \n\tGit Commit Log: {}\
             \n\tGit Release Info: {}\
             \n\tBuild Time: {}\
             \n\tRustc Version: {}\
             \n\tLaunch Time: {}\
             \n\tApp Version: {}\
             \n\tEnvironment: {}\
             \n\tPID: {}",
            self.build.git_commit_log,
            self.build.git_release,
            self.build.build_time,
            self.build.rustc_version,
            self.launch_time.format("%Y-%m-%d %H:%M:%S"),
            self.version,
            self.env,
            self.pid,
        )
    }
}
