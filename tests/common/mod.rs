//! Shared fixtures for integration tests

use csdedit::engine::NullEngine;
use csdedit::model::DocumentPage;
use csdedit::widgets::CollectingHost;

/// A small but complete .csd document with widgets, a UDO, two instruments
/// and a score section.
pub const SAMPLE_CSD: &str = "<CsoundSynthesizer>\n\
<CsOptions>\n\
-o dac\n\
</CsOptions>\n\
<CsInstruments>\n\
sr = 44100\n\
ksmps = 32\n\
\n\
#define FREQ #440#\n\
gisine ftgen 1, 0, 8192, 10, 1\n\
\n\
opcode lowpass, a, ak\n\
ain, kcf xin\n\
aout moogladder ain, kcf, 0.5\n\
xout aout\n\
endop\n\
\n\
;; voices\n\
instr 1\n\
a1 oscili 0.4, $FREQ, 1\n\
out a1\n\
endin\n\
\n\
instr 2\n\
a1 oscili 0.2, 220, 1\n\
a2 lowpass a1, 1000\n\
out a2\n\
endin\n\
</CsInstruments>\n\
<CsScore>\n\
i 1 0 4\n\
i 2 0 4\n\
</CsScore>\n\
</CsoundSynthesizer>\n\
<bsbPanel>\n\
<visible>true</visible>\n\
<x>50</x><y>70</y><width>400</width><height>300</height>\n\
</bsbPanel>\n\
<bsbPresets>\n\
<preset name=\"default\"/>\n\
</bsbPresets>\n";

/// A page wired to stub collaborators
pub fn page() -> DocumentPage {
    DocumentPage::new(
        Box::<CollectingHost>::default(),
        Box::<NullEngine>::default(),
    )
}
