//! Arcade engines (workspace facade crate).
//!
//! Re-exports the pure game engines, their shared types, and the
//! line-delimited JSON adapter under one `arcade_engines::{core,types,adapter}`
//! path while the implementation lives in dedicated crates under `crates/`.

pub use arcade_adapter as adapter;
pub use arcade_core as core;
pub use arcade_types as types;
