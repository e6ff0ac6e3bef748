//! Columnar, append-only card-replay index: dictionary-encoded metadata,
//! a narrow hot row for scanning and a wide cold row for retrieval, and a
//! whole-file binary archive for persistence.

pub mod archive;
pub mod bitmap;
pub mod byteio;
pub mod db;
pub mod dict;
pub mod error;
pub mod match_engine;
pub mod query;
pub mod row;
pub mod strtab;
pub mod topk;

pub use crate::db::{NewReplay, ReplayDb};
pub use crate::error::{Error, Result};
pub use crate::query::{Filter, QueryResult, ReplayRecord};
