//! Parser Module
//!
//! calamineを使用したスプレッドシート解析の実装。
//! 入力ファイル全体を行の並びとして読み込みます。

mod workbook;

pub use workbook::{CalamineReader, SpreadsheetReader};
