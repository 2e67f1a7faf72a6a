// ============================================================================
// tests/integration_test.rs - ブリッジ統合テスト
// ============================================================================
//!
//! クロック割り込みのビット列から HID レポートまでを通しで検証する。

use ps2_hid_bridge::io::hid::ps2::{FRAME_QUEUE_CAPACITY, frame_bits};
use ps2_hid_bridge::{
    AdapterConfig, BootKeyboardSink, HidSink, KeyCode, KeyboardReport, LogicalKeyEvent, Mode,
    ModeEngine, Modifiers, Ps2Keyboard, Ps2Port, ScanCodeDecoder, UsKeymap,
};
use rand::RngCore;

// ============================================================================
// テスト用部品
// ============================================================================

/// 送信されたレポートを記録するシンク
#[derive(Default)]
struct Recorder {
    modifiers: Modifiers,
    key: KeyCode,
    reports: Vec<(Modifiers, KeyCode)>,
}

impl Recorder {
    /// ホストから見たキー押下の並び
    fn pressed(&self) -> Vec<KeyCode> {
        let mut held = KeyCode::NONE;
        let mut out = Vec::new();
        for &(_, key) in &self.reports {
            if !key.is_none() && key != held {
                out.push(key);
            }
            held = key;
        }
        out
    }
}

impl HidSink for Recorder {
    fn set_modifiers(&mut self, modifiers: Modifiers) {
        self.modifiers = modifiers;
    }

    fn set_key(&mut self, key: KeyCode) {
        self.key = key;
    }

    fn send_report(&mut self) {
        self.reports.push((self.modifiers, self.key));
    }
}

struct FixedRng(u32);

impl RngCore for FixedRng {
    fn next_u32(&mut self) -> u32 {
        self.0
    }

    fn next_u64(&mut self) -> u64 {
        self.0 as u64
    }

    fn fill_bytes(&mut self, dst: &mut [u8]) {
        dst.fill(self.0 as u8);
    }
}

type TestKeyboard<'p> = Ps2Keyboard<'p, Recorder, UsKeymap, FixedRng>;

fn keyboard(port: &Ps2Port, mode: Mode, rng: u32) -> TestKeyboard<'_> {
    let config = AdapterConfig::default().with_initial_mode(mode);
    Ps2Keyboard::with_parts(
        port,
        Recorder::default(),
        ScanCodeDecoder::new(),
        ModeEngine::with_rng(&config, FixedRng(rng)),
    )
}

/// スキャンコード列をクロック割り込みとして流す
fn transmit(port: &Ps2Port, codes: &[u8], now: &mut u32) {
    for &code in codes {
        for bit in frame_bits(code) {
            port.on_clock_falling_edge(bit, *now);
        }
        *now += 1;
    }
}

/// 押して離す（通常キー）
fn tap(code: u8) -> [u8; 3] {
    [code, 0xF0, code]
}

fn drain(kbd: &mut TestKeyboard<'_>) -> Vec<LogicalKeyEvent> {
    std::iter::from_fn(|| kbd.read()).collect()
}

// ============================================================================
// フレーミングとキュー
// ============================================================================

#[test]
fn test_frames_below_capacity_read_back_in_order() {
    let port = Ps2Port::new();
    let codes: Vec<u8> = (1..=FRAME_QUEUE_CAPACITY as u8).collect();
    let mut now = 0;
    transmit(&port, &codes, &mut now);

    let read: Vec<u8> = std::iter::from_fn(|| port.pop_scan_code()).collect();
    assert_eq!(read, codes);
}

#[test]
fn test_overflow_drops_only_the_excess() {
    let port = Ps2Port::new();
    let codes: Vec<u8> = (1..=(FRAME_QUEUE_CAPACITY as u8 + 6)).collect();
    let mut now = 0;
    transmit(&port, &codes, &mut now);

    let read: Vec<u8> = std::iter::from_fn(|| port.pop_scan_code()).collect();
    assert_eq!(read, codes[..FRAME_QUEUE_CAPACITY]);
}

#[test]
fn test_idle_gap_resynchronizes_framer() {
    let port = Ps2Port::new();
    for bit in &frame_bits(0x1C)[..4] {
        port.on_clock_falling_edge(*bit, 100);
    }
    let mut now = 1_000;
    transmit(&port, &[0x1C], &mut now);
    assert_eq!(port.pop_scan_code(), Some(0x1C));
    assert_eq!(port.pop_scan_code(), None);
}

// ============================================================================
// デコーダ
// ============================================================================

#[test]
fn test_every_modifier_roundtrips() {
    let port = Ps2Port::new();
    let mut kbd = keyboard(&port, Mode::Identity, 0);
    let mut now = 0;

    let keys: [&[u8]; 8] = [
        &[0x12],
        &[0x59],
        &[0x11],
        &[0xE0, 0x11],
        &[0x14],
        &[0xE0, 0x14],
        &[0xE0, 0x1F],
        &[0xE0, 0x27],
    ];
    for press in keys {
        let before = kbd.modifiers();
        transmit(&port, press, &mut now);
        kbd.poll();
        assert_ne!(kbd.modifiers(), before);

        let release: Vec<u8> = match press {
            [0xE0, code] => vec![0xE0, 0xF0, *code],
            [code] => vec![0xF0, *code],
            _ => unreachable!(),
        };
        transmit(&port, &release, &mut now);
        kbd.poll();
        assert_eq!(kbd.modifiers(), before);
    }
}

#[test]
fn test_mode_index_clamps() {
    let port = Ps2Port::new();
    let mut kbd = keyboard(&port, Mode::Identity, 0);
    let mut now = 0;

    for _ in 0..8 {
        transmit(&port, &[0xE0, 0xF0, 0x21], &mut now);
    }
    kbd.poll();
    assert_eq!(kbd.mode(), Mode::Identity);

    for _ in 0..8 {
        transmit(&port, &[0xE0, 0xF0, 0x32], &mut now);
    }
    kbd.poll();
    assert_eq!(kbd.mode(), Mode::RandomInterject);
}

// ============================================================================
// 変換モード
// ============================================================================

#[test]
fn test_digraph_rz() {
    let port = Ps2Port::new();
    let mut kbd = keyboard(&port, Mode::Digraph, 0);
    let mut now = 0;
    transmit(&port, &tap(0x2D), &mut now);
    transmit(&port, &tap(0x1A), &mut now);
    assert_eq!(drain(&mut kbd).len(), 2);

    let sink = kbd.sink();
    assert_eq!(sink.pressed(), [KeyCode::R, KeyCode::BACKSPACE, KeyCode::Z]);
    assert!(sink.reports.contains(&(Modifiers::RIGHT_ALT, KeyCode::Z)));
}

#[test]
fn test_word_substitute_seven_letters() {
    let port = Ps2Port::new();
    let mut kbd = keyboard(&port, Mode::WordSubstitute, 0);
    let mut now = 0;
    // a s d f g h j
    for code in [0x1C, 0x1B, 0x23, 0x2B, 0x34, 0x33, 0x3B] {
        transmit(&port, &tap(code), &mut now);
    }
    drain(&mut kbd);

    assert_eq!(
        kbd.sink().pressed(),
        [
            KeyCode::H,
            KeyCode::O,
            KeyCode::D,
            KeyCode::O,
            KeyCode::R,
            KeyCode::H,
            KeyCode::J
        ]
    );
}

#[test]
fn test_word_reverse_abc() {
    let port = Ps2Port::new();
    let mut kbd = keyboard(&port, Mode::WordReverse, 0);
    let mut now = 0;
    // a b c space
    for code in [0x1C, 0x32, 0x21, 0x29] {
        transmit(&port, &tap(code), &mut now);
    }
    drain(&mut kbd);

    assert_eq!(
        kbd.sink().pressed(),
        [
            KeyCode::A,
            KeyCode::B,
            KeyCode::C,
            KeyCode::BACKSPACE,
            KeyCode::BACKSPACE,
            KeyCode::BACKSPACE,
            KeyCode::C,
            KeyCode::B,
            KeyCode::A,
            KeyCode::SPACE
        ]
    );
    assert_eq!(kbd.engine().context(Mode::WordReverse).count(), 0);
}

#[test]
fn test_navigation_keys_bypass_active_mode() {
    let port = Ps2Port::new();
    let mut kbd = keyboard(&port, Mode::WordReverse, 0);
    let mut now = 0;
    // a b
    transmit(&port, &tap(0x1C), &mut now);
    transmit(&port, &tap(0x32), &mut now);
    drain(&mut kbd);
    let before = *kbd.engine().context(Mode::WordReverse);

    // Home, Left, Delete
    for code in [0x6C, 0x6B, 0x71] {
        transmit(&port, &[0xE0, code, 0xE0, 0xF0, code], &mut now);
    }
    assert!(drain(&mut kbd).is_empty());
    assert_eq!(kbd.engine().context(Mode::WordReverse), &before);
    assert_eq!(
        kbd.sink().pressed()[2..],
        [KeyCode::HOME, KeyCode::LEFT, KeyCode::DELETE]
    );

    // 境界では元の単語がそのまま逆順になる
    transmit(&port, &tap(0x29), &mut now);
    drain(&mut kbd);
    assert_eq!(
        kbd.sink().pressed()[5..],
        [
            KeyCode::BACKSPACE,
            KeyCode::BACKSPACE,
            KeyCode::B,
            KeyCode::A,
            KeyCode::SPACE
        ]
    );
}

#[test]
fn test_digraph_unmapped_key_between_r_and_z() {
    let port = Ps2Port::new();
    let mut kbd = keyboard(&port, Mode::Digraph, 0);
    let mut now = 0;
    transmit(&port, &tap(0x2D), &mut now);
    // Menu（未割り当て）
    transmit(&port, &[0xE0, 0x2F, 0xE0, 0xF0, 0x2F], &mut now);
    transmit(&port, &tap(0x1A), &mut now);
    drain(&mut kbd);

    assert_eq!(kbd.sink().pressed(), [KeyCode::R, KeyCode::Z]);
    assert!(
        kbd.sink()
            .reports
            .iter()
            .all(|(mods, _)| !mods.contains(Modifiers::RIGHT_ALT))
    );
}

#[test]
fn test_random_interject_with_fixed_rng() {
    let port = Ps2Port::new();
    let mut kbd = keyboard(&port, Mode::RandomInterject, 10);
    let mut now = 0;
    transmit(&port, &tap(0x5A), &mut now);
    drain(&mut kbd);

    let reports = &kbd.sink().reports;
    assert_eq!(reports[0], (Modifiers::empty(), KeyCode::SPACE));
    assert_eq!(
        &reports[1..5],
        &[
            (Modifiers::LEFT_SHIFT, KeyCode::Z),
            (Modifiers::LEFT_SHIFT, KeyCode::A),
            (Modifiers::LEFT_SHIFT, KeyCode::P),
            (Modifiers::LEFT_SHIFT, KeyCode::KEY_1),
        ]
    );
    assert_eq!(reports[5], (Modifiers::empty(), KeyCode::ENTER));
}

// ============================================================================
// ブートプロトコル出力
// ============================================================================

#[test]
fn test_boot_sink_end_to_end() {
    let port = Ps2Port::new();
    let mut sent: Vec<[u8; 8]> = Vec::new();
    {
        let sink = BootKeyboardSink::new(|report: &KeyboardReport| sent.push(report.to_bytes()));
        let mut kbd = Ps2Keyboard::new(&port, sink, &AdapterConfig::default()).unwrap();
        let mut now = 0;
        transmit(&port, &[0x59], &mut now);
        transmit(&port, &tap(0x2D), &mut now);
        transmit(&port, &[0xF0, 0x59], &mut now);
        assert_eq!(
            kbd.read(),
            Some(LogicalKeyEvent::new(KeyCode::R, Modifiers::RIGHT_SHIFT))
        );
        assert_eq!(kbd.read(), None);
        assert_eq!(kbd.into_sink().sent(), 4);
    }

    assert_eq!(
        sent,
        [
            [0x20, 0, 0, 0, 0, 0, 0, 0],
            [0x20, 0, 0x15, 0, 0, 0, 0, 0],
            [0x20, 0, 0, 0, 0, 0, 0, 0],
            [0x00, 0, 0, 0, 0, 0, 0, 0],
        ]
    );
}
