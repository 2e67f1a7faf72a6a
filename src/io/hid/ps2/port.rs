// ============================================================================
// src/io/hid/ps2/port.rs - PS/2 Port (Interrupt / Polling Boundary)
// ============================================================================
//!
//! ビットフレーマとスキャンコードキューを1つにまとめたISR側オブジェクト。
//!
//! ```text
//! ┌─────────────────┐     ┌─────────────────┐     ┌─────────────────┐
//! │  CLK falling    │────▶│   BitFramer     │────▶│   FrameQueue    │────▶ pop_scan_code()
//! │  edge IRQ       │     │  (ISR private)  │     │   (SPSC)        │      (polling)
//! └─────────────────┘     └─────────────────┘     └─────────────────┘
//! ```
//!
//! `const fn`で構築できるため、ファームウェアは`static`に置いて
//! 割り込みハンドラとメインループの双方から参照する。

use super::framer::BitFramer;
use super::queue::FrameQueue;

/// PS/2キーボードポート
pub struct Ps2Port {
    framer: BitFramer,
    queue: FrameQueue,
}

impl Ps2Port {
    pub const fn new() -> Self {
        Self {
            framer: BitFramer::new(),
            queue: FrameQueue::new(),
        }
    }

    /// アイドルタイムアウトを指定して作成
    pub const fn with_idle_timeout(idle_timeout_ms: u32) -> Self {
        Self {
            framer: BitFramer::with_idle_timeout(idle_timeout_ms),
            queue: FrameQueue::new(),
        }
    }

    /// クロック立ち下がり割り込みから呼ばれる
    ///
    /// フレーム完成時にキューへ1回だけpushする。満杯なら黙って破棄。
    #[inline]
    pub fn on_clock_falling_edge(&self, data_high: bool, now_ms: u32) {
        if let Some(code) = self.framer.on_falling_edge(data_high, now_ms) {
            let _ = self.queue.push(code);
        }
    }

    /// フレーマのアイドルタイムアウトを変更
    pub fn set_idle_timeout(&self, idle_timeout_ms: u32) {
        self.framer.set_idle_timeout(idle_timeout_ms);
    }

    /// 次のスキャンコードを取得（ノンブロッキング）
    #[inline]
    pub fn pop_scan_code(&self) -> Option<u8> {
        self.queue.pop()
    }

    /// 受信済みのスキャンコードがあるか
    pub fn has_scan_code(&self) -> bool {
        !self.queue.is_empty()
    }

    pub fn queue(&self) -> &FrameQueue {
        &self.queue
    }

    pub fn framer(&self) -> &BitFramer {
        &self.framer
    }
}

impl Default for Ps2Port {
    fn default() -> Self {
        Self::new()
    }
}
