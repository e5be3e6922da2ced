//! # repo-scribe
//!
//! Downloads source repositories, asks a language model to describe each
//! file, and stores those descriptions in a searchable index so code can be
//! found by what it does rather than by what it is called.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐   ┌──────────────┐   ┌──────────────┐   ┌──────────────┐
//! │    repo     │──▶│   generate   │──▶│    upsert    │──▶│    store     │
//! │ git clone + │   │  LLM prompt  │   │ key = sha256 │   │ SQLite + vec │
//! │    walk     │   │              │   │   (path)     │   │              │
//! └─────────────┘   └──────────────┘   └──────────────┘   └──────┬───────┘
//!                                                                 │
//!                                        ┌────────────────────────┤
//!                                        ▼                        ▼
//!                                   ┌──────────┐            ┌──────────┐
//!                                   │   CLI    │            │   HTTP   │
//!                                   │ (scribe) │            │  (axum)  │
//!                                   └──────────┘            └──────────┘
//! ```
//!
//! Every description is keyed by the SHA-256 of its normalized resource path
//! (`owner/repo/relative/path`), so describing a file again replaces its
//! previous description instead of adding another one.
//!
//! ## Quick Start
//!
//! ```bash
//! scribe init
//! scribe download https://github.com/octo/hello
//! scribe describe-repo octo/hello
//! scribe search "http middleware" --limit 5
//! scribe serve
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`identity`] | Path normalization and resource key derivation |
//! | [`upsert`] | Idempotent description upsert |
//! | [`store`] | Content index trait, SQLite and in-memory backends |
//! | [`generate`] | LLM description and explanation providers |
//! | [`embedding`] | Embedding provider abstraction |
//! | [`embed_cmd`] | Backfill missing or stale description vectors |
//! | [`ingest`] | Describe one file or a whole repository |
//! | [`repo`] | Download, walk, diff, and remove repositories |
//! | [`grep`] | Regex search over repository files |
//! | [`search`] | Semantic search over descriptions |
//! | [`get`] | Description lookup and on-demand explanation |
//! | [`server`] | HTTP API |
//! | [`context`] | Shared handles built from config |
//! | [`config`] | TOML configuration parsing |
//! | [`error`] | Error taxonomy |
//! | [`db`] | Database connection |
//! | [`migrate`] | Schema migrations |

pub mod config;
pub mod context;
pub mod db;
pub mod embed_cmd;
pub mod embedding;
pub mod error;
pub mod generate;
pub mod get;
pub mod grep;
pub mod identity;
pub mod ingest;
pub mod migrate;
pub mod models;
pub mod repo;
pub mod search;
pub mod server;
pub mod store;
pub mod upsert;
