// ============================================================================
// src/io/log.rs - Serial Logging using the `log` crate
// ============================================================================
//!
//! ファームウェア用ロギング。
//!
//! ## 機能
//! - `log`クレートを使用した標準的なログインターフェース
//! - ファームウェアが登録したシリアル書き込み関数へ出力（ヒープ不要）
//! - コンパイル時のログレベルフィルタリング
//! - Spinlockによる出力の直列化
//!
//! 割り込みハンドラ（`Ps2Port::on_clock_falling_edge`）からはログを出さない。
//!
//! ## 使用方法
//! ```ignore
//! fn uart_write(s: &str) { /* ボードのUARTへ */ }
//!
//! ps2_hid_bridge::io::log::init(uart_write)?;
//! log::info!("bridge ready");
//! ```

use core::fmt::{self, Write};
use core::sync::atomic::{AtomicBool, AtomicU8, Ordering};
use log::{Level, LevelFilter, Log, Metadata, Record};
use spin::Mutex;

use crate::error::AdapterError;

/// シリアル書き込み関数
pub type SerialWrite = fn(&str);

// ============================================================================
// ログレベル定義
// ============================================================================

/// コンパイル時のログレベル（featureで変更可能）
#[cfg(feature = "verbose_logging")]
const MAX_LOG_LEVEL: LevelFilter = LevelFilter::Trace;

#[cfg(not(feature = "verbose_logging"))]
const MAX_LOG_LEVEL: LevelFilter = LevelFilter::Info;

// ============================================================================
// ロガー状態管理
// ============================================================================

/// ロガーの初期化状態
static LOGGER_INITIALIZED: AtomicBool = AtomicBool::new(false);

/// 現在のログレベル（実行時変更可能）
static CURRENT_LOG_LEVEL: AtomicU8 = AtomicU8::new(LevelFilter::Info as u8);

/// 登録されたシリアル書き込み関数
///
/// 1行ずつロックを取り、複数箇所からのログが混ざらないようにする。
static SERIAL_WRITER: Mutex<Option<SerialWrite>> = Mutex::new(None);

fn level_from_u8(raw: u8) -> LevelFilter {
    LevelFilter::iter()
        .nth(raw as usize)
        .unwrap_or(LevelFilter::Info)
}

// ============================================================================
// シリアルロガー実装
// ============================================================================

/// ログレベルのタグ
fn level_tag(level: Level) -> &'static str {
    match level {
        Level::Error => "[ERROR]",
        Level::Warn => "[WARN]",
        Level::Info => "[INFO]",
        Level::Debug => "[DEBUG]",
        Level::Trace => "[TRACE]",
    }
}

/// `"[LEVEL] target: message\n"`形式で1行書き出す
pub fn write_line<W: Write>(
    out: &mut W,
    level: Level,
    target: &str,
    args: fmt::Arguments<'_>,
) -> fmt::Result {
    writeln!(out, "{} {}: {}", level_tag(level), target, args)
}

/// 書き込み関数を`fmt::Write`として扱うアダプタ
struct SerialSink(SerialWrite);

impl Write for SerialSink {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        (self.0)(s);
        Ok(())
    }
}

/// シリアルロガー
pub struct SerialLogger;

impl Log for SerialLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= level_from_u8(CURRENT_LOG_LEVEL.load(Ordering::Relaxed))
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let guard = SERIAL_WRITER.lock();
        if let Some(write) = *guard {
            let _ = write_line(
                &mut SerialSink(write),
                record.level(),
                record.target(),
                *record.args(),
            );
        }
    }

    fn flush(&self) {}
}

/// グローバルロガーインスタンス
static LOGGER: SerialLogger = SerialLogger;

// ============================================================================
// 公開API
// ============================================================================

/// ロギングを初期化
///
/// 2回目以降の呼び出しは`AdapterError::LoggerAlreadySet`を返し、
/// 登録済みの書き込み関数はそのまま残る。
pub fn init(writer: SerialWrite) -> Result<(), AdapterError> {
    log::set_logger(&LOGGER)?;
    *SERIAL_WRITER.lock() = Some(writer);
    log::set_max_level(MAX_LOG_LEVEL);
    CURRENT_LOG_LEVEL.store(MAX_LOG_LEVEL as u8, Ordering::SeqCst);
    LOGGER_INITIALIZED.store(true, Ordering::SeqCst);
    Ok(())
}

/// 実行時にログレベルを変更（コンパイル時の上限を超えない）
pub fn set_log_level(level: LevelFilter) {
    let level = level.min(MAX_LOG_LEVEL);
    CURRENT_LOG_LEVEL.store(level as u8, Ordering::SeqCst);
    log::set_max_level(level);
}

/// 現在のログレベルを取得
pub fn current_log_level() -> LevelFilter {
    level_from_u8(CURRENT_LOG_LEVEL.load(Ordering::Relaxed))
}

/// ロガーが初期化済みかどうか
pub fn is_initialized() -> bool {
    LOGGER_INITIALIZED.load(Ordering::Relaxed)
}
