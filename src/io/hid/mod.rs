// ============================================================================
// src/io/hid/mod.rs - Human Interface Device (HID) Subsystem
// ============================================================================
//!
//! # HIDサブシステム
//!
//! PS/2キーボード入力をUSB HIDキーボードレポートへ変換する。
//!
//! ## モジュール構成
//! - `ps2` - フレーミング、キュー、スキャンコードデコーダ
//! - `keymap` - スキャンコード → キーコード変換テーブル
//! - `mode` - 出力変換モード
//! - `sink` - HIDレポート送出先
//! - `keyboard` - 上記を束ねるポーリングドライバ

pub mod keyboard;
pub mod keymap;
pub mod mode;
pub mod ps2;
pub mod sink;

pub use keyboard::Ps2Keyboard;
pub use mode::{Mode, ModeContext, ModeEngine};
pub use sink::{BootKeyboardSink, HidSink, KeyboardReport};
