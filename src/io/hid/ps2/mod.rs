// ============================================================================
// src/io/hid/ps2/mod.rs - PS/2 Keyboard Input Module
// ============================================================================
//!
//! PS/2キーボード入力
//!
//! - クロック/データ線のビットフレーミング
//! - 割り込み → ポーリング間のスキャンコードキュー
//! - スキャンコードセット2のデコード
//!

mod constants;
mod decoder;
mod framer;
mod keycode;
mod port;
mod queue;

pub use constants::{frame, mode_switch, modifier, navigation, protocol};
pub use decoder::{Decoded, DecoderState, ModeStep, ScanCodeDecoder};
pub use framer::{BitFramer, frame_bits};
pub use keycode::{KeyCode, LogicalKeyEvent, Modifiers};
pub use port::Ps2Port;
pub use queue::{FRAME_QUEUE_CAPACITY, FRAME_QUEUE_SLOTS, FrameQueue};

pub use super::keymap::{KEYMAP_SIZE, Keymap, UsKeymap};
