//! # qcatalog
//!
//! A local-first catalog of company interview questions ingested from CSV
//! exports.
//!
//! Companies publish their interview question sets as loosely formatted CSV
//! files. qcatalog parses those exports with a tolerant line-based parser,
//! normalizes each row into a [`models::Question`], derives per-company
//! aggregates (difficulty histogram, ranked topics), archives the raw file,
//! and replaces the company's catalog in SQLite. Favorites and completion
//! progress are tracked locally alongside the catalog.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐   ┌───────────────┐   ┌───────────┐
//! │  CSV files   │──▶│   Pipeline     │──▶│  SQLite    │
//! │ file / dir   │   │ parse+derive  │   │  catalog   │
//! └──────────────┘   └──────┬────────┘   └─────┬─────┘
//!                           │                  │
//!                           ▼                  ▼
//!                    ┌─────────────┐    ┌─────────────┐
//!                    │  blob store  │    │  CLI (qcat)  │
//!                    │  raw files   │    │ list/filter │
//!                    └─────────────┘    └─────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```bash
//! qcat init                          # create database
//! qcat ingest acme.csv --company "Acme Corp"
//! qcat bulk ./exports                # ingest a directory of CSVs
//! qcat companies                     # list companies with aggregates
//! qcat questions acme-corp --difficulty Easy
//! qcat progress mark acme-corp 1     # track completion
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration parsing |
//! | [`models`] | Core data types |
//! | [`parse`] | Tolerant line-based CSV parsing |
//! | [`header`] | Column-to-role resolution |
//! | [`normalize`] | Row-to-question normalization |
//! | [`aggregate`] | Difficulty histogram and ranked topics |
//! | [`naming`] | Company names and slugs |
//! | [`ingest`] | Ingestion orchestration, single and bulk |
//! | [`store`] | Storage ports |
//! | [`sqlite_store`] | SQLite adapter |
//! | [`blob_fs`] | Filesystem blob archive |
//! | [`progress`] | Favorites and completion tracking |

pub mod aggregate;
pub mod blob_fs;
pub mod companies;
pub mod config;
pub mod error;
pub mod header;
pub mod ingest;
pub mod memory_store;
pub mod models;
pub mod naming;
pub mod normalize;
pub mod parse;
pub mod progress;
pub mod questions;
pub mod sqlite_store;
pub mod stats;
pub mod store;
