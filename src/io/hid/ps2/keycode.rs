// ============================================================================
// src/io/hid/ps2/keycode.rs - Logical Keycodes, Modifiers and Key Events
// ============================================================================

use bitflags::bitflags;

/// 論理キーコード（HIDキーボードusage ID）
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct KeyCode(pub u16);

impl KeyCode {
    /// キーなし（HIDの空スロット）
    pub const NONE: Self = Self(0x00);

    // 文字キー
    pub const A: Self = Self(0x04);
    pub const B: Self = Self(0x05);
    pub const C: Self = Self(0x06);
    pub const D: Self = Self(0x07);
    pub const E: Self = Self(0x08);
    pub const F: Self = Self(0x09);
    pub const G: Self = Self(0x0A);
    pub const H: Self = Self(0x0B);
    pub const I: Self = Self(0x0C);
    pub const J: Self = Self(0x0D);
    pub const K: Self = Self(0x0E);
    pub const L: Self = Self(0x0F);
    pub const M: Self = Self(0x10);
    pub const N: Self = Self(0x11);
    pub const O: Self = Self(0x12);
    pub const P: Self = Self(0x13);
    pub const Q: Self = Self(0x14);
    pub const R: Self = Self(0x15);
    pub const S: Self = Self(0x16);
    pub const T: Self = Self(0x17);
    pub const U: Self = Self(0x18);
    pub const V: Self = Self(0x19);
    pub const W: Self = Self(0x1A);
    pub const X: Self = Self(0x1B);
    pub const Y: Self = Self(0x1C);
    pub const Z: Self = Self(0x1D);

    // 数字キー
    pub const KEY_1: Self = Self(0x1E);
    pub const KEY_2: Self = Self(0x1F);
    pub const KEY_3: Self = Self(0x20);
    pub const KEY_4: Self = Self(0x21);
    pub const KEY_5: Self = Self(0x22);
    pub const KEY_6: Self = Self(0x23);
    pub const KEY_7: Self = Self(0x24);
    pub const KEY_8: Self = Self(0x25);
    pub const KEY_9: Self = Self(0x26);
    pub const KEY_0: Self = Self(0x27);

    // 特殊キー
    pub const ENTER: Self = Self(0x28);
    pub const ESCAPE: Self = Self(0x29);
    pub const BACKSPACE: Self = Self(0x2A);
    pub const TAB: Self = Self(0x2B);
    pub const SPACE: Self = Self(0x2C);
    pub const MINUS: Self = Self(0x2D);
    pub const EQUAL: Self = Self(0x2E);
    pub const LEFT_BRACE: Self = Self(0x2F);
    pub const RIGHT_BRACE: Self = Self(0x30);
    pub const BACKSLASH: Self = Self(0x31);
    pub const SEMICOLON: Self = Self(0x33);
    pub const QUOTE: Self = Self(0x34);
    pub const TILDE: Self = Self(0x35);
    pub const COMMA: Self = Self(0x36);
    pub const PERIOD: Self = Self(0x37);
    pub const SLASH: Self = Self(0x38);
    pub const CAPS_LOCK: Self = Self(0x39);

    // ファンクションキー
    pub const F1: Self = Self(0x3A);
    pub const F2: Self = Self(0x3B);
    pub const F3: Self = Self(0x3C);
    pub const F4: Self = Self(0x3D);
    pub const F5: Self = Self(0x3E);
    pub const F6: Self = Self(0x3F);
    pub const F7: Self = Self(0x40);
    pub const F8: Self = Self(0x41);
    pub const F9: Self = Self(0x42);
    pub const F10: Self = Self(0x43);
    pub const F11: Self = Self(0x44);
    pub const F12: Self = Self(0x45);
    pub const SCROLL_LOCK: Self = Self(0x47);

    // ナビゲーションキー
    pub const HOME: Self = Self(0x4A);
    pub const PAGE_UP: Self = Self(0x4B);
    pub const DELETE: Self = Self(0x4C);
    pub const END: Self = Self(0x4D);
    pub const PAGE_DOWN: Self = Self(0x4E);
    pub const RIGHT: Self = Self(0x4F);
    pub const LEFT: Self = Self(0x50);
    pub const DOWN: Self = Self(0x51);
    pub const UP: Self = Self(0x52);

    // テンキー
    pub const NUM_LOCK: Self = Self(0x53);
    pub const KEYPAD_ASTERISK: Self = Self(0x55);
    pub const KEYPAD_MINUS: Self = Self(0x56);
    pub const KEYPAD_PLUS: Self = Self(0x57);
    pub const KEYPAD_1: Self = Self(0x59);
    pub const KEYPAD_2: Self = Self(0x5A);
    pub const KEYPAD_3: Self = Self(0x5B);
    pub const KEYPAD_4: Self = Self(0x5C);
    pub const KEYPAD_5: Self = Self(0x5D);
    pub const KEYPAD_6: Self = Self(0x5E);
    pub const KEYPAD_7: Self = Self(0x5F);
    pub const KEYPAD_8: Self = Self(0x60);
    pub const KEYPAD_9: Self = Self(0x61);
    pub const KEYPAD_0: Self = Self(0x62);
    pub const KEYPAD_PERIOD: Self = Self(0x63);

    /// 可視キーを持たないか
    #[inline]
    pub const fn is_none(self) -> bool {
        self.0 == 0
    }

    /// 英字または数字か（単語の構成文字）
    #[inline]
    pub const fn is_alphanumeric(self) -> bool {
        self.0 >= Self::A.0 && self.0 <= Self::KEY_0.0
    }
}

bitflags! {
    /// 修飾キーマスク（HID修飾バイトと同じ配置）
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Modifiers: u16 {
        const LEFT_CTRL = 1 << 0;
        const LEFT_SHIFT = 1 << 1;
        const LEFT_ALT = 1 << 2;
        const LEFT_GUI = 1 << 3;
        const RIGHT_CTRL = 1 << 4;
        const RIGHT_SHIFT = 1 << 5;
        const RIGHT_ALT = 1 << 6;
        const RIGHT_GUI = 1 << 7;

        /// 左右どちらかのShift
        const SHIFT = Self::LEFT_SHIFT.bits() | Self::RIGHT_SHIFT.bits();
    }
}

impl Modifiers {
    /// Shiftが押されているか
    pub fn shift(&self) -> bool {
        self.intersects(Self::SHIFT)
    }

    /// AltGr（右Alt）が押されているか
    pub fn alt_gr(&self) -> bool {
        self.contains(Self::RIGHT_ALT)
    }

    /// HIDレポートの修飾バイト
    pub fn report_byte(&self) -> u8 {
        (self.bits() & 0xFF) as u8
    }
}

/// 論理キーイベント（キー押下1回分）
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LogicalKeyEvent {
    /// 論理キーコード
    pub keycode: KeyCode,
    /// 押下時点の修飾キーマスク
    pub modifiers: Modifiers,
}

impl LogicalKeyEvent {
    pub const fn new(keycode: KeyCode, modifiers: Modifiers) -> Self {
        Self { keycode, modifiers }
    }
}
