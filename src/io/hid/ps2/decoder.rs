// ============================================================================
// src/io/hid/ps2/decoder.rs - Scan Code Set 2 Decoder
// ============================================================================
//!
//! PS/2スキャンコードセット2の状態機械。
//!
//! ```text
//!            0xF0                 0xE0
//!   IDLE ──────────▶ BREAK   IDLE ──────────▶ EXTENDED
//!     ▲                 │ 0xE0                    │ 0xF0
//!     │                 ▼                         ▼
//!     └──── terminal ── BREAK+EXTENDED ◀──────────┘
//! ```
//!
//! プレフィックス以外のバイトは、その時点のフラグで解決した後に
//! 両フラグをクリアする。修飾キーとナビゲーションキーはHIDシンクへ直接送り、
//! それ以外の押下だけを`LogicalKeyEvent`として返す。

use super::constants::{mode_switch, modifier, navigation, protocol};
use super::keycode::{KeyCode, LogicalKeyEvent, Modifiers};
use crate::io::hid::keymap::{Keymap, UsKeymap};
use crate::io::hid::sink::HidSink;

/// デコーダの持続状態
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DecoderState {
    /// 0xF0を受信済み
    pub break_pending: bool,
    /// 0xE0を受信済み
    pub extended_pending: bool,
    /// 現在押されている修飾キー
    pub modifier_mask: Modifiers,
}

/// モード切り替え方向
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeStep {
    Next,
    Previous,
}

/// 1バイト分のデコード結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decoded {
    /// プレフィックスバイト（解決待ち）
    Prefix,
    /// 修飾キーマスクが変化した（シンクへ送信済み）
    Modifiers(Modifiers),
    /// ナビゲーションキーの押下/解放（シンクへ送信済み）
    Navigation { key: KeyCode, pressed: bool },
    /// モード切り替え要求（解放時のみ）
    ModeSwitch(ModeStep),
    /// 論理キー押下
    Key(LogicalKeyEvent),
    /// 何もしないコード（通常キーの解放など）
    Ignored,
    /// プロトコルの番兵値（0x00/0xFF）
    Sentinel,
}

/// スキャンコードデコーダ
pub struct ScanCodeDecoder<K: Keymap = UsKeymap> {
    state: DecoderState,
    keymap: K,
}

impl ScanCodeDecoder<UsKeymap> {
    /// US配列で作成
    pub const fn new() -> Self {
        Self::with_keymap(UsKeymap)
    }
}

impl Default for ScanCodeDecoder<UsKeymap> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Keymap> ScanCodeDecoder<K> {
    /// キーマップを指定して作成
    pub const fn with_keymap(keymap: K) -> Self {
        Self {
            state: DecoderState {
                break_pending: false,
                extended_pending: false,
                modifier_mask: Modifiers::empty(),
            },
            keymap,
        }
    }

    /// スキャンコードを1バイト処理
    pub fn feed<S: HidSink>(&mut self, code: u8, sink: &mut S) -> Decoded {
        log::trace!("ps2: scan code {:#04x}", code);

        match code {
            protocol::BREAK_PREFIX => {
                self.state.break_pending = true;
                return Decoded::Prefix;
            }
            protocol::EXTENDED_PREFIX => {
                self.state.extended_pending = true;
                return Decoded::Prefix;
            }
            protocol::KEY_ERROR | protocol::OVERRUN => {
                log::warn!("ps2: keyboard reported {:#04x}, resynchronizing", code);
                self.clear_pending();
                return Decoded::Sentinel;
            }
            _ => {}
        }

        let released = self.state.break_pending;
        let extended = self.state.extended_pending;
        self.clear_pending();

        if let Some(bit) = modifier_bit(code, extended) {
            if released {
                self.state.modifier_mask.remove(bit);
            } else {
                self.state.modifier_mask.insert(bit);
            }
            sink.set_modifiers(self.state.modifier_mask);
            sink.send_report();
            return Decoded::Modifiers(self.state.modifier_mask);
        }

        if extended {
            if let Some(key) = navigation_key(code) {
                sink.set_key(if released { KeyCode::NONE } else { key });
                sink.send_report();
                return Decoded::Navigation {
                    key,
                    pressed: !released,
                };
            }

            // 押下は無視し、解放時にだけ切り替える（オートリピート対策）
            let step = match code {
                mode_switch::NEXT => Some(ModeStep::Next),
                mode_switch::PREVIOUS => Some(ModeStep::Previous),
                _ => None,
            };
            if let Some(step) = step {
                return if released {
                    Decoded::ModeSwitch(step)
                } else {
                    Decoded::Ignored
                };
            }

            // 拡張側の偽Shift（ナビゲーションキーの前後に送られる）
            if code == modifier::LEFT_SHIFT || code == modifier::RIGHT_SHIFT {
                return Decoded::Ignored;
            }
        }

        if released {
            return Decoded::Ignored;
        }

        Decoded::Key(LogicalKeyEvent::new(
            self.keymap.translate(code),
            self.state.modifier_mask,
        ))
    }

    #[inline]
    fn clear_pending(&mut self) {
        self.state.break_pending = false;
        self.state.extended_pending = false;
    }

    /// 現在の状態
    pub fn state(&self) -> DecoderState {
        self.state
    }

    /// 現在の修飾キーマスク
    pub fn modifiers(&self) -> Modifiers {
        self.state.modifier_mask
    }

    /// 状態を初期化（キーボード再接続時など）
    pub fn reset(&mut self) {
        self.state = DecoderState::default();
    }

    pub fn keymap(&self) -> &K {
        &self.keymap
    }
}

/// 修飾キーのスキャンコードに対応するビット
fn modifier_bit(code: u8, extended: bool) -> Option<Modifiers> {
    match (code, extended) {
        (modifier::LEFT_SHIFT, false) => Some(Modifiers::LEFT_SHIFT),
        (modifier::RIGHT_SHIFT, false) => Some(Modifiers::RIGHT_SHIFT),
        (modifier::ALT, false) => Some(Modifiers::LEFT_ALT),
        (modifier::ALT, true) => Some(Modifiers::RIGHT_ALT),
        (modifier::CTRL, false) => Some(Modifiers::LEFT_CTRL),
        (modifier::CTRL, true) => Some(Modifiers::RIGHT_CTRL),
        (modifier::LEFT_GUI, true) => Some(Modifiers::LEFT_GUI),
        (modifier::RIGHT_GUI, true) => Some(Modifiers::RIGHT_GUI),
        _ => None,
    }
}

/// 拡張ナビゲーションクラスタのキーコード
fn navigation_key(code: u8) -> Option<KeyCode> {
    let key = match code {
        navigation::HOME => KeyCode::HOME,
        navigation::END => KeyCode::END,
        navigation::PAGE_UP => KeyCode::PAGE_UP,
        navigation::PAGE_DOWN => KeyCode::PAGE_DOWN,
        navigation::UP => KeyCode::UP,
        navigation::LEFT => KeyCode::LEFT,
        navigation::DOWN => KeyCode::DOWN,
        navigation::RIGHT => KeyCode::RIGHT,
        navigation::DELETE => KeyCode::DELETE,
        _ => return None,
    };
    Some(key)
}
