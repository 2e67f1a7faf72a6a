// ============================================================================
// src/io/hid/sink.rs - HID Report Sink
// ============================================================================
//!
//! HIDキーボードレポートの送出先。
//!
//! USBスタックへの実際の送信はファームウェア側の責務で、このクレートは
//! `HidSink`トレイト越しに「修飾キー設定 → キー設定 → 送信」を順序通りに呼ぶ。
//! 各`send_report`は直前のレポートを上書きする（ステートフル）。

use super::ps2::{KeyCode, Modifiers};

/// HIDレポート送出先
pub trait HidSink {
    /// 次のレポートの修飾キーマスクを設定
    fn set_modifiers(&mut self, modifiers: Modifiers);
    /// 次のレポートのキースロットを設定（`KeyCode::NONE`で空）
    fn set_key(&mut self, key: KeyCode);
    /// 現在の内容でレポートを送信
    fn send_report(&mut self);
}

impl<S: HidSink + ?Sized> HidSink for &mut S {
    fn set_modifiers(&mut self, modifiers: Modifiers) {
        (**self).set_modifiers(modifiers);
    }

    fn set_key(&mut self, key: KeyCode) {
        (**self).set_key(key);
    }

    fn send_report(&mut self) {
        (**self).send_report();
    }
}

// ============================================================================
// ブートプロトコルレポート
// ============================================================================

/// キーボードレポートのバイト数
pub const KEYBOARD_REPORT_SIZE: usize = 8;

/// USB HIDブートプロトコルのキーボードレポート
///
/// ```text
/// Byte 0:   修飾キー（HID修飾バイト）
/// Byte 1:   予約（0x00）
/// Byte 2-7: キーコード（このブリッジは先頭スロットのみ使用）
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct KeyboardReport {
    pub modifier: u8,
    pub reserved: u8,
    pub keycodes: [u8; 6],
}

impl KeyboardReport {
    /// 全キー解放のレポート
    pub const fn empty() -> Self {
        Self {
            modifier: 0,
            reserved: 0,
            keycodes: [0; 6],
        }
    }

    /// 送信用のバイト列
    pub fn to_bytes(&self) -> [u8; KEYBOARD_REPORT_SIZE] {
        let mut buf = [0u8; KEYBOARD_REPORT_SIZE];
        buf[0] = self.modifier;
        buf[1] = self.reserved;
        buf[2..].copy_from_slice(&self.keycodes);
        buf
    }

    pub fn is_empty(&self) -> bool {
        self.modifier == 0 && self.keycodes.iter().all(|&k| k == 0)
    }
}

/// ブートプロトコルレポートを組み立てて送信関数へ渡すシンク
///
/// キーコードが8ビットに収まらない場合は空スロットとして送る。
pub struct BootKeyboardSink<F: FnMut(&KeyboardReport)> {
    report: KeyboardReport,
    transmit: F,
    sent: u32,
}

impl<F: FnMut(&KeyboardReport)> BootKeyboardSink<F> {
    pub fn new(transmit: F) -> Self {
        Self {
            report: KeyboardReport::empty(),
            transmit,
            sent: 0,
        }
    }

    /// 組み立て中のレポート
    pub fn report(&self) -> &KeyboardReport {
        &self.report
    }

    /// 送信済みレポート数
    pub fn sent(&self) -> u32 {
        self.sent
    }
}

impl<F: FnMut(&KeyboardReport)> HidSink for BootKeyboardSink<F> {
    fn set_modifiers(&mut self, modifiers: Modifiers) {
        self.report.modifier = modifiers.report_byte();
    }

    fn set_key(&mut self, key: KeyCode) {
        self.report.keycodes[0] = u8::try_from(key.0).unwrap_or(0);
    }

    fn send_report(&mut self) {
        (self.transmit)(&self.report);
        self.sent = self.sent.wrapping_add(1);
    }
}

// ============================================================================
// テスト用シンク
// ============================================================================

/// 記録された1操作
#[cfg(test)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SinkOp {
    Modifiers(Modifiers),
    Key(KeyCode),
    Send,
}

/// 全操作を記録するシンク
#[cfg(test)]
#[derive(Debug, Default)]
pub struct RecordingSink {
    ops: std::vec::Vec<SinkOp>,
    modifiers: Modifiers,
    key: KeyCode,
    reports: std::vec::Vec<(Modifiers, KeyCode)>,
}

#[cfg(test)]
impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ops(&self) -> &[SinkOp] {
        &self.ops
    }

    /// 送信されたレポートの列
    pub fn reports(&self) -> &[(Modifiers, KeyCode)] {
        &self.reports
    }

    /// ホストから見たキー押下の並び（キースロットが変化して空でなくなった時点）
    pub fn pressed_keys(&self) -> std::vec::Vec<KeyCode> {
        let mut held = KeyCode::NONE;
        let mut pressed = std::vec::Vec::new();
        for &(_, key) in &self.reports {
            if !key.is_none() && key != held {
                pressed.push(key);
            }
            held = key;
        }
        pressed
    }

    pub fn clear(&mut self) {
        self.ops.clear();
        self.reports.clear();
    }
}

#[cfg(test)]
impl HidSink for RecordingSink {
    fn set_modifiers(&mut self, modifiers: Modifiers) {
        self.modifiers = modifiers;
        self.ops.push(SinkOp::Modifiers(modifiers));
    }

    fn set_key(&mut self, key: KeyCode) {
        self.key = key;
        self.ops.push(SinkOp::Key(key));
    }

    fn send_report(&mut self) {
        self.ops.push(SinkOp::Send);
        self.reports.push((self.modifiers, self.key));
    }
}
