//! Benchmarks for the outline scanner and widget splicer
//!
//! Run with: cargo bench outline

use csdedit::inspector::scan_csound;
use csdedit::widgets::{extract_widget_sections, CollectingHost};

#[global_allocator]
static ALLOC: divan::AllocProfiler = divan::AllocProfiler::system();

fn main() {
    divan::main();
}

fn synthetic_csd(instrument_count: usize) -> String {
    let mut text = String::from("<CsoundSynthesizer>\n<CsInstruments>\nsr = 44100\n");
    text.push_str("opcode lowpass, a, ak\nain, kcf xin\naout moogladder ain, kcf, 0.5\nxout aout\nendop\n");
    for i in 0..instrument_count {
        text.push_str(&format!(
            "instr {}\n\
             kamp linseg 0, 0.1, 0.5, 1, 0\n\
             a1 oscili kamp, {}, 1\n\
             ; room for one more voice\n\
             out a1\n\
             endin\n",
            i + 1,
            110 * (i + 1)
        ));
    }
    text.push_str("</CsInstruments>\n<CsScore>\nf 1 0 8192 10 1\n</CsScore>\n</CsoundSynthesizer>\n");
    text
}

// ============================================================================
// Outline scan
// ============================================================================

#[divan::bench(args = [10, 100, 1_000])]
fn scan_instruments(instrument_count: usize) {
    let text = synthetic_csd(instrument_count);
    divan::black_box(scan_csound(&text));
}

#[divan::bench(args = [1_000, 10_000])]
fn scan_comment_heavy(line_count: usize) {
    let mut text = String::from("<CsInstruments>\n");
    for i in 0..line_count {
        if i % 7 == 0 {
            text.push_str("/* block\ncomment\n*/\n");
        } else {
            text.push_str("; just a comment line\n");
        }
    }
    text.push_str("</CsInstruments>\n");
    divan::black_box(scan_csound(&text));
}

// ============================================================================
// Widget splicing
// ============================================================================

#[divan::bench(args = [10_000, 100_000])]
fn splice_panel(body_size: usize) {
    let mut text = format!(
        "<bsbPanel>{}</bsbPanel>{}",
        "x".repeat(512),
        "s".repeat(body_size)
    );
    let mut host = CollectingHost::default();
    divan::black_box(extract_widget_sections(&mut text, &mut host));
}
