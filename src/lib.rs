// ============================================================================
// src/lib.rs - PS/2 to USB HID Bridge Core
// ============================================================================
//!
//! # PS/2 → USB HID ブリッジ
//!
//! PS/2キーボードのシリアルビット列をスキャンコードに組み立て、
//! 論理キーイベントへデコードし、出力変換モードを通してHIDレポートとして送出する。
//!
//! ## パイプライン
//!
//! ```text
//! ┌───────────────┐   ┌──────────────┐   ┌────────────────┐   ┌────────────┐   ┌─────────┐
//! │  CLK IRQ      │──▶│  FrameQueue  │──▶│ ScanCodeDecoder│──▶│ ModeEngine │──▶│ HidSink │
//! │ (BitFramer)   │   │  (SPSC)      │   │  + Keymap      │   │            │   │         │
//! └───────────────┘   └──────────────┘   └────────────────┘   └────────────┘   └─────────┘
//!     割り込み                                  ポーリングコンテキスト
//! ```
//!
//! ## 使用例
//! ```ignore
//! static PORT: Ps2Port = Ps2Port::new();
//!
//! // クロック線の立ち下がり割り込み
//! fn on_clock_irq() {
//!     PORT.on_clock_falling_edge(data_pin_is_high(), millis());
//! }
//!
//! let mut keyboard = Ps2Keyboard::new(&PORT, usb_sink, &AdapterConfig::default())?;
//! loop {
//!     while let Some(event) = keyboard.read() {
//!         log::debug!("key {:?}", event.keycode);
//!     }
//! }
//! ```

#![cfg_attr(not(test), no_std)]

pub mod config;
pub mod error;
pub mod io;

pub use config::{AdapterConfig, ModeSwitchPolicy, ReverseOverflow};
pub use error::{AdapterError, ConfigError, ModeError, Result};
pub use io::hid::keyboard::Ps2Keyboard;
pub use io::hid::mode::{Mode, ModeContext, ModeEngine};
pub use io::hid::ps2::{
    FrameQueue, KeyCode, Keymap, LogicalKeyEvent, Modifiers, Ps2Port, ScanCodeDecoder, UsKeymap,
};
pub use io::hid::sink::{BootKeyboardSink, HidSink, KeyboardReport};
