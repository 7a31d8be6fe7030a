//! Editor area - the set of open document pages
//!
//! Thin orchestration over per-tab pages: tracking the current page and
//! forwarding play/stop/outline calls to it. The outline scan only ever
//! runs against the current page.

use std::path::Path;

use anyhow::Result;

use super::page::DocumentPage;
use crate::engine::RunOptions;
use crate::inspector::ScanOutcome;

/// All open pages plus the current-tab index
#[derive(Debug, Default)]
pub struct EditorArea {
    pages: Vec<DocumentPage>,
    current: usize,
}

impl EditorArea {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// Add a page and make it current. Returns its index.
    pub fn add_page(&mut self, page: DocumentPage) -> usize {
        self.pages.push(page);
        self.current = self.pages.len() - 1;
        self.current
    }

    /// Close a page; the current tab clamps to the remaining range
    pub fn close_page(&mut self, index: usize) {
        if index < self.pages.len() {
            self.pages.remove(index);
            if self.current >= self.pages.len() && self.current > 0 {
                self.current = self.pages.len() - 1;
            }
        }
    }

    pub fn page(&self, index: usize) -> Option<&DocumentPage> {
        self.pages.get(index)
    }

    pub fn page_mut(&mut self, index: usize) -> Option<&mut DocumentPage> {
        self.pages.get_mut(index)
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn set_current(&mut self, index: usize) {
        if index < self.pages.len() {
            self.current = index;
        }
    }

    pub fn current_page(&self) -> Option<&DocumentPage> {
        self.pages.get(self.current)
    }

    pub fn current_page_mut(&mut self) -> Option<&mut DocumentPage> {
        self.pages.get_mut(self.current)
    }

    /// Index of the page showing `path`, if open
    pub fn find_by_path(&self, path: &Path) -> Option<usize> {
        self.pages
            .iter()
            .position(|p| p.document.file_path.as_deref() == Some(path))
    }

    // === Forwarding to the current page ===

    pub fn play_current(&mut self, options: &RunOptions) -> Result<()> {
        match self.current_page_mut() {
            Some(page) => page.play(options),
            None => Ok(()),
        }
    }

    pub fn pause_current(&mut self) {
        if let Some(page) = self.current_page_mut() {
            page.pause();
        }
    }

    pub fn stop_current(&mut self) {
        if let Some(page) = self.current_page_mut() {
            page.stop();
        }
    }

    /// Stop every page's engine (used at shutdown)
    pub fn stop_all(&mut self) {
        for page in &mut self.pages {
            page.stop();
        }
    }

    /// Scan the current page's document if it changed
    pub fn refresh_current_outline(&mut self) -> Option<ScanOutcome> {
        self.current_page_mut()?.refresh_outline()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::NullEngine;
    use crate::widgets::CollectingHost;
    use std::path::PathBuf;

    fn page() -> DocumentPage {
        DocumentPage::new(
            Box::<CollectingHost>::default(),
            Box::<NullEngine>::default(),
        )
    }

    #[test]
    fn add_page_becomes_current() {
        let mut area = EditorArea::new();
        assert!(area.is_empty());
        let first = area.add_page(page());
        let second = area.add_page(page());
        assert_eq!((first, second), (0, 1));
        assert_eq!(area.current_index(), 1);
    }

    #[test]
    fn close_clamps_current() {
        let mut area = EditorArea::new();
        area.add_page(page());
        area.add_page(page());
        area.add_page(page());
        assert_eq!(area.current_index(), 2);

        area.close_page(2);
        assert_eq!(area.current_index(), 1);
        area.close_page(0);
        assert_eq!(area.len(), 1);
        assert_eq!(area.current_index(), 0);
    }

    #[test]
    fn find_by_path() {
        let mut area = EditorArea::new();
        area.add_page(page());
        let mut named = page();
        named.document.set_file_name(PathBuf::from("/x/song.csd"));
        area.add_page(named);

        assert_eq!(area.find_by_path(Path::new("/x/song.csd")), Some(1));
        assert_eq!(area.find_by_path(Path::new("/x/other.csd")), None);
    }

    #[test]
    fn play_and_stop_target_the_current_page() {
        let mut area = EditorArea::new();
        area.add_page(page());
        area.add_page(page());

        area.play_current(&RunOptions::default()).unwrap();
        assert!(area.page(1).unwrap().transport().is_running());
        assert!(!area.page(0).unwrap().transport().is_running());

        area.set_current(0);
        area.play_current(&RunOptions::default()).unwrap();
        area.stop_all();
        assert!(!area.page(0).unwrap().transport().is_running());
        assert!(!area.page(1).unwrap().transport().is_running());
    }

    #[test]
    fn outline_refresh_targets_the_current_page() {
        let mut area = EditorArea::new();
        area.add_page(page());
        area.current_page_mut()
            .unwrap()
            .load_text("<CsInstruments>\ninstr 1\nendin\n</CsInstruments>\n");
        assert!(area.refresh_current_outline().is_some());
        assert!(area.refresh_current_outline().is_none());
    }

    #[test]
    fn empty_area_forwards_are_safe() {
        let mut area = EditorArea::new();
        area.play_current(&RunOptions::default()).unwrap();
        area.stop_current();
        area.pause_current();
        assert!(area.refresh_current_outline().is_none());
    }
}
