//! Document page - one editor tab with its widgets and engine
//!
//! Ties a [`Document`] to its widget-layout collaborator and engine
//! transport, and owns the inspector for that document. Most methods are
//! thin forwarding; the interesting parts are widget splicing on load and
//! full-text composition on save.

use std::path::PathBuf;

use anyhow::Result;

use super::document::Document;
use crate::engine::{AudioEngine, RunOptions, Transport};
use crate::inspector::{Inspector, ScanMode, ScanOutcome, ScanScheduler};
use crate::widgets::{extract_widget_sections, WidgetHost};

/// One open document with its collaborators
pub struct DocumentPage {
    pub document: Document,
    widgets: Box<dyn WidgetHost + Send>,
    transport: Transport,
    inspector: Inspector,
    scheduler: ScanScheduler,
}

impl DocumentPage {
    pub fn new(
        widgets: Box<dyn WidgetHost + Send>,
        engine: Box<dyn AudioEngine + Send>,
    ) -> Self {
        Self {
            document: Document::new(),
            widgets,
            transport: Transport::new(engine),
            inspector: Inspector::new(ScanMode::Csound),
            scheduler: ScanScheduler::new(),
        }
    }

    pub fn widgets(&self) -> &dyn WidgetHost {
        self.widgets.as_ref()
    }

    pub fn widgets_mut(&mut self) -> &mut dyn WidgetHost {
        self.widgets.as_mut()
    }

    pub fn transport(&self) -> &Transport {
        &self.transport
    }

    /// Load document text, splicing out embedded widget sections first.
    /// Returns the number of panel blocks consumed.
    pub fn load_text(&mut self, text: &str) -> usize {
        let mut remaining = text.to_string();
        let consumed = extract_widget_sections(&mut remaining, self.widgets.as_mut());
        self.document.load_text(&remaining);
        self.scheduler.mark_dirty();
        consumed
    }

    /// Open a file into this page
    pub fn load_file(&mut self, path: PathBuf) -> std::io::Result<usize> {
        let content = std::fs::read_to_string(&path)?;
        self.document.set_file_name(path);
        Ok(self.load_text(&content))
    }

    /// Replace the text from an edit, marking the outline dirty
    pub fn set_text(&mut self, text: &str) {
        self.document.set_text(text);
        self.scheduler.mark_dirty();
    }

    /// The editor text without widget sections
    pub fn basic_text(&self) -> String {
        self.document.text()
    }

    /// The savable text: editor text plus serialized widget sections for
    /// `.csd` (and unsaved) documents, the bare text otherwise. Saving a
    /// non-csd file clears the widgets, which have nowhere to live.
    pub fn full_text(&mut self) -> String {
        let mut parts = vec![self.document.text()];
        if self.document.is_csd() {
            parts.push(self.widgets.widgets_xml());
            parts.push(self.widgets.presets_xml());
            parts.push("\n".to_string());
        } else {
            self.widgets.clear_widgets();
        }
        parts.concat()
    }

    /// Run the scanner now if the document changed since the last pass.
    /// Returns the fresh outcome, or None when nothing was owed or the
    /// document's mode has no scanner.
    pub fn refresh_outline(&mut self) -> Option<ScanOutcome> {
        let mode = self.document.mode.scan_mode()?;
        if !self.scheduler.try_begin() {
            return None;
        }
        let outcome = self.inspector.refresh(&self.document.text(), mode);
        if self.scheduler.finish() {
            tracing::trace!("document changed mid-scan, another pass owed");
        }
        self.document.scan = Some(outcome.clone());
        Some(outcome)
    }

    // === Engine forwarding ===

    pub fn play(&mut self, options: &RunOptions) -> Result<()> {
        self.transport.play(options, self.widgets.as_mut())
    }

    pub fn pause(&mut self) {
        self.transport.pause();
    }

    pub fn stop(&mut self) {
        self.transport.stop(self.widgets.as_mut());
    }

    pub fn queue_event(&mut self, event: &str, delay_ms: u64) {
        self.transport.queue_event(event, delay_ms);
    }

    pub fn record(&mut self, path: &std::path::Path) -> Result<()> {
        self.transport.start_recording(path)
    }

    pub fn stop_recording(&mut self) {
        self.transport.stop_recording();
    }
}

impl std::fmt::Debug for DocumentPage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DocumentPage")
            .field("document", &self.document.display_name())
            .field("transport", &self.transport)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::NullEngine;
    use crate::inspector::Category;
    use crate::widgets::{CollectingHost, DEFAULT_PANEL};

    fn page() -> DocumentPage {
        DocumentPage::new(
            Box::<CollectingHost>::default(),
            Box::<NullEngine>::default(),
        )
    }

    #[test]
    fn load_text_splices_widgets() {
        let mut page = page();
        let consumed =
            page.load_text("<bsbPanel>A</bsbPanel>some text<bsbPresets>B</bsbPresets>");
        assert_eq!(consumed, 1);
        assert_eq!(page.basic_text(), "some text");
    }

    #[test]
    fn load_text_without_panel_gets_default_layout() {
        let mut page = page();
        page.load_text("plain document");
        assert_eq!(page.widgets().widgets_xml(), DEFAULT_PANEL);
    }

    #[test]
    fn full_text_appends_widget_sections_for_csd() {
        let mut page = page();
        page.load_text("<bsbPanel>A</bsbPanel>body<bsbPresets>B</bsbPresets>");
        assert_eq!(
            page.full_text(),
            "body<bsbPanel>A</bsbPanel><bsbPresets>B</bsbPresets>\n"
        );
    }

    #[test]
    fn full_text_for_non_csd_clears_widgets() {
        let mut page = page();
        page.load_text("<bsbPanel>A</bsbPanel>kgoto top");
        page.document.set_file_name(PathBuf::from("patch.orc"));
        assert_eq!(page.full_text(), "kgoto top");
        assert_eq!(page.widgets().widgets_xml(), "");
    }

    #[test]
    fn spliced_structure_survives_a_save_load_cycle() {
        let mut page = page();
        page.load_text("<bsbPanel>A</bsbPanel>body<bsbPresets>B</bsbPresets>");
        let saved = page.full_text();

        let mut reloaded = self::page();
        reloaded.load_text(&saved);
        assert_eq!(reloaded.basic_text(), "body\n");
        assert_eq!(reloaded.widgets().widgets_xml(), "<bsbPanel>A</bsbPanel>");
        assert_eq!(
            reloaded.widgets().presets_xml(),
            "<bsbPresets>B</bsbPresets>"
        );
    }

    #[test]
    fn refresh_outline_runs_once_per_dirty() {
        let mut page = page();
        page.load_text("<CsInstruments>\ninstr 1\nendin\n</CsInstruments>\n");

        let outcome = page.refresh_outline().expect("first scan runs");
        assert_eq!(
            outcome
                .outline
                .category(Category::Instruments)
                .unwrap()
                .entries
                .len(),
            1
        );
        // Nothing changed: no second scan
        assert!(page.refresh_outline().is_none());

        page.set_text("<CsInstruments>\ninstr 1\nendin\ninstr 2\nendin\n</CsInstruments>\n");
        let outcome = page.refresh_outline().expect("dirty scan runs");
        assert_eq!(
            outcome
                .outline
                .category(Category::Instruments)
                .unwrap()
                .entries
                .len(),
            2
        );
    }

    #[test]
    fn sco_documents_have_no_outline() {
        let mut page = page();
        page.document.set_file_name(PathBuf::from("notes.sco"));
        page.set_text("i 1 0 1");
        assert!(page.refresh_outline().is_none());
    }

    #[test]
    fn play_and_stop_forward_to_the_engine() {
        let mut page = page();
        page.play(&RunOptions::default()).unwrap();
        assert!(page.transport().is_running());
        page.stop();
        assert!(!page.transport().is_running());
    }
}
