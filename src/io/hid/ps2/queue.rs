// ============================================================================
// src/io/hid/ps2/queue.rs - Lock-Free SPSC Scan Code Queue
// ============================================================================
//!
//! 割り込み（Producer）からポーリングループ（Consumer）へスキャンコードを渡す
//! 固定長リングバッファ。
//!
//! ## SPSC契約
//! - Producer（ISR）は`head`のみを書き込む
//! - Consumer（ポーリング側）は`tail`のみを書き込む
//! - `head == tail` は空。`head`を進めると`tail`に一致する場合は満杯で、
//!   新しいコードを破棄する（未読の最古エントリは上書きしない）
//!
//! `head`は最後に書き込んだスロット、`tail`は最後に読み出したスロットを指す。

use core::sync::atomic::{AtomicU8, Ordering};
#[cfg(feature = "stats")]
use core::sync::atomic::AtomicU32;

/// リングバッファのスロット数
pub const FRAME_QUEUE_SLOTS: usize = 45;

/// 実際に保持できるコード数（1スロットは空/満杯の区別に使う）
pub const FRAME_QUEUE_CAPACITY: usize = FRAME_QUEUE_SLOTS - 1;

const _: () = assert!(
    FRAME_QUEUE_SLOTS <= u8::MAX as usize,
    "FRAME_QUEUE_SLOTS must fit in a u8 index"
);

/// ロックフリーSPSCスキャンコードキュー
pub struct FrameQueue {
    buffer: [AtomicU8; FRAME_QUEUE_SLOTS],
    head: AtomicU8,
    tail: AtomicU8,
    #[cfg(feature = "stats")]
    dropped: AtomicU32,
}

impl FrameQueue {
    pub const fn new() -> Self {
        const ZERO: AtomicU8 = AtomicU8::new(0);
        Self {
            buffer: [ZERO; FRAME_QUEUE_SLOTS],
            head: AtomicU8::new(0),
            tail: AtomicU8::new(0),
            #[cfg(feature = "stats")]
            dropped: AtomicU32::new(0),
        }
    }

    #[inline]
    const fn advance(index: u8) -> u8 {
        let next = index + 1;
        if next as usize >= FRAME_QUEUE_SLOTS { 0 } else { next }
    }

    /// コードを追加（Producer側）
    ///
    /// 満杯の場合はコードを破棄して`false`を返す。
    #[inline]
    pub fn push(&self, code: u8) -> bool {
        let head = self.head.load(Ordering::Relaxed);
        let tail = self.tail.load(Ordering::Acquire);

        let next = Self::advance(head);
        if next == tail {
            #[cfg(feature = "stats")]
            {
                let dropped = self.dropped.load(Ordering::Relaxed);
                self.dropped
                    .store(dropped.saturating_add(1), Ordering::Relaxed);
            }
            return false;
        }

        self.buffer[next as usize].store(code, Ordering::Relaxed);
        self.head.store(next, Ordering::Release);
        true
    }

    /// 最古のコードを取り出す（Consumer側）
    #[inline]
    pub fn pop(&self) -> Option<u8> {
        let tail = self.tail.load(Ordering::Relaxed);
        let head = self.head.load(Ordering::Acquire);

        if tail == head {
            return None;
        }

        let next = Self::advance(tail);
        let code = self.buffer[next as usize].load(Ordering::Relaxed);
        self.tail.store(next, Ordering::Release);
        Some(code)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.head.load(Ordering::Acquire) == self.tail.load(Ordering::Acquire)
    }

    /// 未読のコード数
    pub fn len(&self) -> usize {
        let head = self.head.load(Ordering::Acquire) as usize;
        let tail = self.tail.load(Ordering::Acquire) as usize;
        (head + FRAME_QUEUE_SLOTS - tail) % FRAME_QUEUE_SLOTS
    }

    pub const fn capacity(&self) -> usize {
        FRAME_QUEUE_CAPACITY
    }

    /// 溢れにより破棄したコード数
    #[cfg(feature = "stats")]
    pub fn dropped(&self) -> u32 {
        self.dropped.load(Ordering::Relaxed)
    }
}

impl Default for FrameQueue {
    fn default() -> Self {
        Self::new()
    }
}
