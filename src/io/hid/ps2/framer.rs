// ============================================================================
// src/io/hid/ps2/framer.rs - PS/2 Bit Framer (ISR side)
// ============================================================================
//!
//! クロック線の立ち下がりごとに1ビットを受け取り、11ビットフレームを組み立てる。
//!
//! ```text
//! edge:  0      1  2  3  4  5  6  7  8   9       10
//!        start  d0 d1 d2 d3 d4 d5 d6 d7  parity  stop
//! ```
//!
//! パリティとストップビットは検証しない。前回のエッジから
//! アイドルタイムアウトを超えた場合は途中のフレームを破棄して再同期する。

use core::sync::atomic::{AtomicU8, AtomicU32, Ordering};

use super::constants::frame;
use crate::config::DEFAULT_IDLE_TIMEOUT_MS;

/// 11ビットフレーム組み立て器
///
/// 状態はISR専用だが、`static`に置けるようアトミックで保持する。
/// 使用するのは`load`/`store`のみ。
pub struct BitFramer {
    /// 現在のフレーム内ビット位置（0..=10）
    bit_count: AtomicU8,
    /// データビットのシフトレジスタ
    shift_register: AtomicU8,
    /// 前回エッジの時刻（ミリ秒）
    last_edge_ms: AtomicU32,
    /// 再同期までのアイドル時間（ミリ秒）
    idle_timeout_ms: AtomicU32,
}

impl BitFramer {
    /// 既定のタイムアウトで作成
    pub const fn new() -> Self {
        Self::with_idle_timeout(DEFAULT_IDLE_TIMEOUT_MS)
    }

    /// タイムアウトを指定して作成
    pub const fn with_idle_timeout(idle_timeout_ms: u32) -> Self {
        Self {
            bit_count: AtomicU8::new(0),
            shift_register: AtomicU8::new(0),
            last_edge_ms: AtomicU32::new(0),
            idle_timeout_ms: AtomicU32::new(idle_timeout_ms),
        }
    }

    /// 立ち下がりエッジ1回分を処理
    ///
    /// フレームが完成した場合のみデータバイトを返す。
    ///
    /// # Safety Contract
    /// ISR（またはそれと直列化されたコンテキスト）からのみ呼び出すこと。
    #[inline]
    pub fn on_falling_edge(&self, data_high: bool, now_ms: u32) -> Option<u8> {
        let mut bit_count = self.bit_count.load(Ordering::Relaxed);
        let mut incoming = self.shift_register.load(Ordering::Relaxed);

        let last = self.last_edge_ms.load(Ordering::Relaxed);
        if now_ms.wrapping_sub(last) > self.idle_timeout_ms.load(Ordering::Relaxed) {
            bit_count = 0;
            incoming = 0;
        }
        self.last_edge_ms.store(now_ms, Ordering::Relaxed);

        if (frame::FIRST_DATA_BIT..=frame::LAST_DATA_BIT).contains(&bit_count) && data_high {
            incoming |= 1 << (bit_count - frame::FIRST_DATA_BIT);
        }
        bit_count += 1;

        if bit_count == frame::BITS_PER_FRAME {
            self.bit_count.store(0, Ordering::Relaxed);
            self.shift_register.store(0, Ordering::Relaxed);
            return Some(incoming);
        }

        self.bit_count.store(bit_count, Ordering::Relaxed);
        self.shift_register.store(incoming, Ordering::Relaxed);
        None
    }

    /// 組み立て途中のフレームを破棄
    pub fn reset(&self) {
        self.bit_count.store(0, Ordering::Relaxed);
        self.shift_register.store(0, Ordering::Relaxed);
    }

    /// アイドルタイムアウトを変更（次のエッジから有効）
    pub fn set_idle_timeout(&self, idle_timeout_ms: u32) {
        self.idle_timeout_ms.store(idle_timeout_ms, Ordering::Relaxed);
    }

    /// 現在のアイドルタイムアウト（ミリ秒）
    pub fn idle_timeout(&self) -> u32 {
        self.idle_timeout_ms.load(Ordering::Relaxed)
    }

    /// 現在のフレーム内ビット位置
    pub fn bit_count(&self) -> u8 {
        self.bit_count.load(Ordering::Relaxed)
    }
}

impl Default for BitFramer {
    fn default() -> Self {
        Self::new()
    }
}

/// バイトを11ビットフレームのデータ線レベル列に展開（奇数パリティ）
///
/// テストやループバック検証用。
pub fn frame_bits(code: u8) -> [bool; 11] {
    let mut bits = [false; 11];
    for i in 0..8 {
        bits[1 + i] = (code >> i) & 1 != 0;
    }
    bits[9] = code.count_ones() % 2 == 0;
    bits[10] = true;
    bits
}
