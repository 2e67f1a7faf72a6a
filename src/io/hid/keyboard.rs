// ============================================================================
// src/io/hid/keyboard.rs - PS/2 to HID Keyboard Driver
// ============================================================================
//!
//! # ポーリング型キーボードドライバ
//!
//! 割り込み側の`Ps2Port`からスキャンコードを取り出し、デコーダと
//! 変換モードを通してHIDシンクへ送る。
//!
//! ## アーキテクチャ
//!
//! ```text
//! ┌─────────────────┐     ┌─────────────────┐     ┌─────────────────┐     ┌──────────┐
//! │   Ps2Port       │────▶│ ScanCodeDecoder │────▶│   ModeEngine    │────▶│ HidSink  │
//! │  (Producer)     │     │                 │     │                 │     │          │
//! └─────────────────┘     └─────────────────┘     └─────────────────┘     └──────────┘
//!         ISR                              Ps2Keyboard (polling)
//! ```
//!
//! ## SPSC契約
//!
//! - Producer: クロック割り込みハンドラ（`Ps2Port::on_clock_falling_edge`）のみ
//! - Consumer: `Ps2Keyboard`の所有者のみ
//!
//! `Ps2Keyboard`は`Clone`不可で、ポートからの取り出しは`&mut self`経由に限られる。
//! 同じポートに2つの`Ps2Keyboard`を作らないこと。

use rand::RngCore;
use rand::rngs::SmallRng;

use super::keymap::{Keymap, UsKeymap};
use super::mode::{Mode, ModeEngine};
use super::ps2::{Decoded, LogicalKeyEvent, Modifiers, Ps2Port, ScanCodeDecoder};
use super::sink::HidSink;
use crate::config::AdapterConfig;
use crate::error::Result;

/// PS/2キーボードドライバ
pub struct Ps2Keyboard<'p, S: HidSink, K: Keymap = UsKeymap, R: RngCore = SmallRng> {
    port: &'p Ps2Port,
    decoder: ScanCodeDecoder<K>,
    engine: ModeEngine<R>,
    sink: S,
    /// `available`で先読みしたキー
    pending: Option<LogicalKeyEvent>,
}

impl<'p, S: HidSink> Ps2Keyboard<'p, S> {
    /// US配列と既定の乱数源で作成
    ///
    /// 設定のアイドルタイムアウトをポートへ反映する。
    /// 設定が不正な場合はエラーを返す。
    pub fn new(port: &'p Ps2Port, sink: S, config: &AdapterConfig) -> Result<Self> {
        config.validate()?;
        port.set_idle_timeout(config.idle_timeout_ms);
        log::info!(
            "ps2: keyboard attached, mode {}",
            config.initial_mode.name()
        );
        Ok(Self::with_parts(
            port,
            sink,
            ScanCodeDecoder::new(),
            ModeEngine::new(config),
        ))
    }
}

impl<'p, S: HidSink, K: Keymap, R: RngCore> Ps2Keyboard<'p, S, K, R> {
    /// 構成要素を指定して作成
    pub fn with_parts(
        port: &'p Ps2Port,
        sink: S,
        decoder: ScanCodeDecoder<K>,
        engine: ModeEngine<R>,
    ) -> Self {
        Self {
            port,
            decoder,
            engine,
            sink,
            pending: None,
        }
    }

    /// キューを処理し、次のキー押下を返す（ノンブロッキング）
    ///
    /// 修飾キー、ナビゲーションキー、モード切り替えはここで処理されて返らない。
    /// キーコード0の押下は空レポートだけを送り、読み進める。
    pub fn poll(&mut self) -> Option<LogicalKeyEvent> {
        while let Some(code) = self.port.pop_scan_code() {
            match self.decoder.feed(code, &mut self.sink) {
                Decoded::Key(event) => {
                    self.engine.apply(event, &mut self.sink);
                    if !event.keycode.is_none() {
                        return Some(event);
                    }
                }
                Decoded::ModeSwitch(step) => {
                    self.engine.step(step);
                }
                Decoded::Prefix
                | Decoded::Modifiers(_)
                | Decoded::Navigation { .. }
                | Decoded::Ignored
                | Decoded::Sentinel => {}
            }
        }
        None
    }

    /// キー押下が読み出せるか
    ///
    /// 見つかったキーは次の`read`まで保持される。
    pub fn available(&mut self) -> bool {
        if self.pending.is_none() {
            self.pending = self.poll();
        }
        self.pending.is_some()
    }

    /// 次のキー押下を取り出す
    pub fn read(&mut self) -> Option<LogicalKeyEvent> {
        self.pending.take().or_else(|| self.poll())
    }

    /// 現在のモード
    pub fn mode(&self) -> Mode {
        self.engine.mode()
    }

    /// モードを直接選択（変化した場合`true`）
    pub fn set_mode(&mut self, mode: Mode) -> bool {
        self.engine.set_mode(mode)
    }

    /// 現在押されている修飾キー
    pub fn modifiers(&self) -> Modifiers {
        self.decoder.modifiers()
    }

    pub fn engine(&self) -> &ModeEngine<R> {
        &self.engine
    }

    pub fn port(&self) -> &'p Ps2Port {
        self.port
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{AdapterError, ConfigError};
    use crate::io::hid::mode::test_util::FixedRng;
    use crate::io::hid::ps2::{KeyCode, frame_bits};
    use crate::io::hid::sink::RecordingSink;

    fn transmit(port: &Ps2Port, codes: &[u8]) {
        for &code in codes {
            for bit in frame_bits(code) {
                port.on_clock_falling_edge(bit, 0);
            }
        }
    }

    fn keyboard(port: &Ps2Port, mode: Mode) -> Ps2Keyboard<'_, RecordingSink, UsKeymap, FixedRng> {
        let config = AdapterConfig::default().with_initial_mode(mode);
        Ps2Keyboard::with_parts(
            port,
            RecordingSink::new(),
            ScanCodeDecoder::new(),
            ModeEngine::with_rng(&config, FixedRng(0)),
        )
    }

    #[test]
    fn test_rejects_invalid_config() {
        let port = Ps2Port::new();
        let mut config = AdapterConfig::default();
        config.idle_timeout_ms = 0;
        assert!(matches!(
            Ps2Keyboard::new(&port, RecordingSink::new(), &config),
            Err(AdapterError::Config(ConfigError::ZeroIdleTimeout))
        ));
    }

    #[test]
    fn test_new_applies_idle_timeout_to_port() {
        let port = Ps2Port::new();
        let mut config = AdapterConfig::default();
        config.idle_timeout_ms = 20;
        let _kbd = Ps2Keyboard::new(&port, RecordingSink::new(), &config).unwrap();
        assert_eq!(port.framer().idle_timeout(), 20);

        let bits = frame_bits(0x1C);
        for bit in &bits[..4] {
            port.on_clock_falling_edge(*bit, 1000);
        }
        for bit in bits {
            port.on_clock_falling_edge(bit, 1100);
        }
        assert_eq!(port.pop_scan_code(), Some(0x1C));
        assert_eq!(port.pop_scan_code(), None);
    }

    #[test]
    fn test_shifted_press_is_returned() {
        let port = Ps2Port::new();
        let mut kbd = keyboard(&port, Mode::Identity);
        transmit(&port, &[0x12, 0x1C, 0xF0, 0x1C, 0xF0, 0x12]);

        assert_eq!(
            kbd.read(),
            Some(LogicalKeyEvent::new(KeyCode::A, Modifiers::LEFT_SHIFT))
        );
        assert_eq!(kbd.read(), None);
        assert_eq!(kbd.modifiers(), Modifiers::empty());
        assert_eq!(kbd.sink().pressed_keys(), [KeyCode::A]);
    }

    #[test]
    fn test_available_keeps_event_for_read() {
        let port = Ps2Port::new();
        let mut kbd = keyboard(&port, Mode::Identity);
        assert!(!kbd.available());

        transmit(&port, &[0x2D]);
        assert!(kbd.available());
        assert!(kbd.available());
        assert_eq!(
            kbd.read().map(|event| event.keycode),
            Some(KeyCode::R)
        );
        assert!(!kbd.available());
    }

    #[test]
    fn test_unknown_code_sends_clear_and_continues() {
        let port = Ps2Port::new();
        let mut kbd = keyboard(&port, Mode::Identity);
        transmit(&port, &[0x02, 0x1A]);
        assert_eq!(kbd.read().map(|event| event.keycode), Some(KeyCode::Z));
        assert_eq!(
            &kbd.sink().reports()[..1],
            &[(Modifiers::empty(), KeyCode::NONE)]
        );
    }

    #[test]
    fn test_mode_switch_codes() {
        let port = Ps2Port::new();
        let mut kbd = keyboard(&port, Mode::Identity);
        transmit(&port, &[0xE0, 0x32, 0xE0, 0xF0, 0x32]);
        assert_eq!(kbd.poll(), None);
        assert_eq!(kbd.mode(), Mode::Digraph);

        transmit(&port, &[0xE0, 0xF0, 0x21, 0xE0, 0xF0, 0x21]);
        kbd.poll();
        assert_eq!(kbd.mode(), Mode::Identity);

        assert!(kbd.set_mode(Mode::WordReverse));
        assert_eq!(kbd.mode(), Mode::WordReverse);
        assert!(kbd.sink().ops().is_empty());
    }
}
