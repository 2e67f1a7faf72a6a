// ============================================================================
// src/io/hid/keymap.rs - Scan Code to Keycode Translation
// ============================================================================
//!
//! # キーマップ抽象化レイヤー
//!
//! スキャンコード（セット2）から論理キーコードへの変換をデコーダから分離し、
//! ロケールごとのテーブル差し替えを可能にする。
//!
//! ## 設計原則
//! - **関心の分離**: デコーダ（状態機械）とキーマップ（テーブルデータ）を分離
//! - **拡張性**: 新しいレイアウトはトレイト実装のみで追加可能
//! - **O(1)**: 配列インデックスによる参照

use super::ps2::KeyCode;

/// キーマップテーブルのエントリ数
pub const KEYMAP_SIZE: usize = 132;

// ============================================================================
// Keymap トレイト
// ============================================================================

/// キーボードレイアウトを表すトレイト
///
/// # 実装例
/// ```ignore
/// struct GermanKeymap;
///
/// impl Keymap for GermanKeymap {
///     fn translate(&self, scan_code: u8) -> KeyCode {
///         lookup(&GERMAN_TABLE, scan_code)
///     }
///     fn name(&self) -> &'static str { "German QWERTZ" }
/// }
/// ```
pub trait Keymap {
    /// スキャンコードを論理キーコードに変換
    ///
    /// テーブル外、または未割り当てのコードは`KeyCode::NONE`を返す。
    fn translate(&self, scan_code: u8) -> KeyCode;

    /// レイアウト名を取得
    fn name(&self) -> &'static str;
}

/// テーブル参照の共通実装
#[inline]
pub fn lookup(table: &[KeyCode; KEYMAP_SIZE], scan_code: u8) -> KeyCode {
    table
        .get(scan_code as usize)
        .copied()
        .unwrap_or(KeyCode::NONE)
}

// ============================================================================
// US キーマップ
// ============================================================================

/// US配列キーマップ
#[derive(Debug, Clone, Copy, Default)]
pub struct UsKeymap;

impl Keymap for UsKeymap {
    fn translate(&self, scan_code: u8) -> KeyCode {
        lookup(&US_TABLE, scan_code)
    }

    fn name(&self) -> &'static str {
        "US"
    }
}

const __: KeyCode = KeyCode::NONE;

/// セット2スキャンコード → HID usage（US配列）
///
/// 修飾キー（0x11/0x12/0x14/0x59）はデコーダが処理するため空欄。
#[rustfmt::skip]
pub static US_TABLE: [KeyCode; KEYMAP_SIZE] = [
    // 0x00
    __, KeyCode::F9, __, KeyCode::F5, KeyCode::F3, KeyCode::F1, KeyCode::F2, KeyCode::F12,
    // 0x08
    __, KeyCode::F10, KeyCode::F8, KeyCode::F6, KeyCode::F4, KeyCode::TAB, KeyCode::TILDE, __,
    // 0x10
    __, __, __, __, __, KeyCode::Q, KeyCode::KEY_1, __,
    // 0x18
    __, __, KeyCode::Z, KeyCode::S, KeyCode::A, KeyCode::W, KeyCode::KEY_2, __,
    // 0x20
    __, KeyCode::C, KeyCode::X, KeyCode::D, KeyCode::E, KeyCode::KEY_4, KeyCode::KEY_3, __,
    // 0x28
    __, KeyCode::SPACE, KeyCode::V, KeyCode::F, KeyCode::T, KeyCode::R, KeyCode::KEY_5, __,
    // 0x30
    __, KeyCode::N, KeyCode::B, KeyCode::H, KeyCode::G, KeyCode::Y, KeyCode::KEY_6, __,
    // 0x38
    __, __, KeyCode::M, KeyCode::J, KeyCode::U, KeyCode::KEY_7, KeyCode::KEY_8, __,
    // 0x40
    __, KeyCode::COMMA, KeyCode::K, KeyCode::I, KeyCode::O, KeyCode::KEY_0, KeyCode::KEY_9, __,
    // 0x48
    __, KeyCode::PERIOD, KeyCode::SLASH, KeyCode::L, KeyCode::SEMICOLON, KeyCode::P, KeyCode::MINUS, __,
    // 0x50
    __, __, KeyCode::QUOTE, __, KeyCode::LEFT_BRACE, KeyCode::EQUAL, __, __,
    // 0x58
    KeyCode::CAPS_LOCK, __, KeyCode::ENTER, KeyCode::RIGHT_BRACE, __, KeyCode::BACKSLASH, __, __,
    // 0x60
    __, __, __, __, __, __, KeyCode::BACKSPACE, __,
    // 0x68
    __, KeyCode::KEYPAD_1, __, KeyCode::KEYPAD_4, KeyCode::KEYPAD_7, __, __, __,
    // 0x70
    KeyCode::KEYPAD_0, KeyCode::KEYPAD_PERIOD, KeyCode::KEYPAD_2, KeyCode::KEYPAD_5,
    KeyCode::KEYPAD_6, KeyCode::KEYPAD_8, KeyCode::ESCAPE, KeyCode::NUM_LOCK,
    // 0x78
    KeyCode::F11, KeyCode::KEYPAD_PLUS, KeyCode::KEYPAD_3, KeyCode::KEYPAD_MINUS,
    KeyCode::KEYPAD_ASTERISK, KeyCode::KEYPAD_9, KeyCode::SCROLL_LOCK, __,
    // 0x80
    __, __, __, KeyCode::F7,
];
