//! Ports - 抽象化レイヤー
//!
//! 外部（時計・描画先）へのインターフェースを trait で定義し、
//! 実装の詳細を隠蔽します。

pub mod clock;
pub mod countdown_sink;

pub use self::clock::{Clock, FixedClock, SystemClock};
pub use self::countdown_sink::{CountdownSink, SlotUpdate};
