//! Impls - ports の実装
//!
//! - **InMemorySink**: メモリ上の描画先（テスト・埋め込み用）

pub mod inmem_sink;

pub use self::inmem_sink::{InMemorySink, Slot};
