//! kitbag - shared support library for backend services
//!
//! ## Module Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                            CORE                              │
//! │  copier/     Copy between structs and maps (serde round trip │
//! │              or structural merge, picked by operand shape)   │
//! └──────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌──────────────────────────────────────────────────────────────┐
//! │                          AMBIENT                             │
//! │  error       KitError with codes and fix suggestions         │
//! │  logger/     tracing subscriber, line format, rotating file  │
//! │  config      toml/yaml/json files + env overrides            │
//! │  app         process metadata and build info                 │
//! └──────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌──────────────────────────────────────────────────────────────┐
//! │                         UTILITIES                            │
//! │  slices  stringutil/  crypto/  idutil  iputil  fileutil      │
//! │  httputil/                                                   │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Responsibilities
//!
//! | Module | Responsibility |
//! |--------|----------------|
//! | [`copier`] | `copy` / `copy_with_options`, `Copyable`, `impl_record!` |
//! | [`error`] | Error types with fix suggestions |
//! | [`logger`] | `init_logger`, `LineFormatter`, `RotatingFile`, `RequestContext` |
//! | [`config`] | `load`, `load_with_env` |
//! | [`slices`] | Set operations, grouping, checked integer conversion |
//! | [`stringutil`] | Case conversion, validators, similarity, pinyin, text helpers |
//! | [`crypto`] | Digests, HMAC, AES-CBC, RSA |
//! | [`idutil`] | Nano ids, snowflake ids |
//! | [`iputil`] | IP literal check, local address detection |
//! | [`fileutil`] | Path and file helpers, content-type detection |
//! | [`httputil`] | Async HTTP client, streaming POST |
//! | [`app`] | `AppInfo`, `BuildInfo` |

// ═══════════════════════════════════════════════════════════════
// CORE - structural copy
// ═══════════════════════════════════════════════════════════════
pub mod copier;

// ═══════════════════════════════════════════════════════════════
// AMBIENT - errors, logging, config, app metadata
// ═══════════════════════════════════════════════════════════════
pub mod app;
pub mod config;
pub mod error;
pub mod logger;

// ═══════════════════════════════════════════════════════════════
// UTILITIES
// ═══════════════════════════════════════════════════════════════
pub mod crypto;
pub mod fileutil;
pub mod httputil;
pub mod idutil;
pub mod iputil;
pub mod slices;
pub mod stringutil;

pub use copier::{copy, copy_with_options, CopyError, CopyOptions, Copyable, Shape};
pub use error::{FixSuggestion, KitError, Result};
pub use httputil::HttpClient;
pub use logger::{init_logger, LogConfig, RequestContext};
