// ============================================================================
// src/io/hid/ps2/constants.rs - PS/2 Scan Code Set 2 Constants
// ============================================================================

/// プロトコル制御バイト
pub mod protocol {
    pub const BREAK_PREFIX: u8 = 0xF0;     // キー解放プレフィックス
    pub const EXTENDED_PREFIX: u8 = 0xE0;  // 拡張キープレフィックス
    pub const KEY_ERROR: u8 = 0x00;        // キー検出エラー
    pub const OVERRUN: u8 = 0xFF;          // キーボード内部バッファ溢れ
}

/// 修飾キーのスキャンコード
pub mod modifier {
    pub const LEFT_SHIFT: u8 = 0x12;
    pub const RIGHT_SHIFT: u8 = 0x59;
    pub const ALT: u8 = 0x11;              // 拡張なし: 左Alt / 拡張: 右Alt
    pub const CTRL: u8 = 0x14;             // 拡張なし: 左Ctrl / 拡張: 右Ctrl
    pub const LEFT_GUI: u8 = 0x1F;         // 拡張のみ
    pub const RIGHT_GUI: u8 = 0x27;        // 拡張のみ
}

/// ナビゲーションクラスタ（拡張のみ）
pub mod navigation {
    pub const HOME: u8 = 0x6C;
    pub const END: u8 = 0x69;
    pub const PAGE_UP: u8 = 0x7D;
    pub const PAGE_DOWN: u8 = 0x7A;
    pub const UP: u8 = 0x75;
    pub const LEFT: u8 = 0x6B;
    pub const DOWN: u8 = 0x72;
    pub const RIGHT: u8 = 0x74;
    pub const DELETE: u8 = 0x71;
}

/// モード切り替え（拡張のみ、マルチメディア音量キーを流用）
pub mod mode_switch {
    pub const NEXT: u8 = 0x32;             // 音量+
    pub const PREVIOUS: u8 = 0x21;         // 音量-
}

/// フレーム構成
pub mod frame {
    pub const BITS_PER_FRAME: u8 = 11;     // start + 8 data + parity + stop
    pub const FIRST_DATA_BIT: u8 = 1;
    pub const LAST_DATA_BIT: u8 = 8;
}
