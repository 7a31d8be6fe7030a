//! Widget panel sections embedded in `.csd` documents
//!
//! A composite document can carry one `<bsbPanel>...</bsbPanel>` block
//! describing the runtime control widgets and one optional
//! `<bsbPresets>...</bsbPresets>` block with saved widget values. This
//! module owns the boundary-finding and splicing; deserializing the panel
//! payload is the job of an external widget-layout implementation behind
//! [`WidgetHost`].

mod splice;

pub use splice::extract_widget_sections;

/// Panel markup handed to the host when a document carries no panel at all,
/// so every document ends up with an associated layout.
pub const DEFAULT_PANEL: &str = "<bsbPanel><visible>true</visible><x>100</x><y>100</y>\
                                 <width>320</width><height>240</height></bsbPanel>";

/// The widget-layout collaborator
///
/// Load calls are fire-and-forget: implementations log their own parse
/// errors and never fail the caller. The serialization accessors supply the
/// save-time text for [`full_text`](crate::model::DocumentPage::full_text).
pub trait WidgetHost {
    /// Deserialize one `<bsbPanel>` block into the live layout
    fn load_panel_xml(&mut self, xml: &str);

    /// Deserialize one `<bsbPresets>` block
    fn load_presets_xml(&mut self, xml: &str);

    /// Serialized panel markup for saving
    fn widgets_xml(&self) -> String;

    /// Serialized presets markup for saving
    fn presets_xml(&self) -> String;

    /// Drop all widgets (used when saving to a non-csd file type)
    fn clear_widgets(&mut self) {}

    /// Flush accumulated widget values before the engine starts
    fn flush(&mut self) {}

    /// Notification that the engine stopped (flushes graph buffers)
    fn engine_stopped(&mut self) {}
}

/// Geometry fields of a panel descriptor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PanelGeometry {
    pub visible: bool,
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl Default for PanelGeometry {
    fn default() -> Self {
        Self {
            visible: true,
            x: 100,
            y: 100,
            width: 320,
            height: 240,
        }
    }
}

impl PanelGeometry {
    /// Pull the geometry fields out of panel markup by literal tag search.
    /// Missing or unparsable fields fall back to the defaults.
    pub fn from_panel_xml(xml: &str) -> Self {
        let defaults = Self::default();
        Self {
            visible: tag_text(xml, "visible")
                .map(|v| v == "true")
                .unwrap_or(defaults.visible),
            x: parse_tag(xml, "x").unwrap_or(defaults.x),
            y: parse_tag(xml, "y").unwrap_or(defaults.y),
            width: parse_tag(xml, "width").unwrap_or(defaults.width),
            height: parse_tag(xml, "height").unwrap_or(defaults.height),
        }
    }
}

/// Text between the first `<tag>` and the following `</tag>`, if both exist
fn tag_text<'a>(xml: &'a str, tag: &str) -> Option<&'a str> {
    let open = format!("<{}>", tag);
    let close = format!("</{}>", tag);
    let start = xml.find(&open)? + open.len();
    let end = xml[start..].find(&close)? + start;
    Some(&xml[start..end])
}

fn parse_tag<T: std::str::FromStr>(xml: &str, tag: &str) -> Option<T> {
    tag_text(xml, tag)?.trim().parse().ok()
}

/// A [`WidgetHost`] that just records what it was handed. Stands in for the
/// real layout in tests and in the CLI.
#[derive(Debug, Default)]
pub struct CollectingHost {
    pub panels: Vec<String>,
    pub presets: Vec<String>,
    pub cleared: bool,
    pub flushed: u32,
    pub stopped: u32,
}

impl WidgetHost for CollectingHost {
    fn load_panel_xml(&mut self, xml: &str) {
        self.panels.push(xml.to_string());
    }

    fn load_presets_xml(&mut self, xml: &str) {
        self.presets.push(xml.to_string());
    }

    fn widgets_xml(&self) -> String {
        self.panels.first().cloned().unwrap_or_default()
    }

    fn presets_xml(&self) -> String {
        self.presets.first().cloned().unwrap_or_default()
    }

    fn clear_widgets(&mut self) {
        self.panels.clear();
        self.presets.clear();
        self.cleared = true;
    }

    fn flush(&mut self) {
        self.flushed += 1;
    }

    fn engine_stopped(&mut self) {
        self.stopped += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_panel_geometry_matches_markup() {
        let geometry = PanelGeometry::from_panel_xml(DEFAULT_PANEL);
        assert_eq!(geometry, PanelGeometry::default());
        assert!(geometry.visible);
        assert_eq!((geometry.x, geometry.y), (100, 100));
        assert_eq!((geometry.width, geometry.height), (320, 240));
    }

    #[test]
    fn geometry_falls_back_per_field() {
        let xml = "<bsbPanel><visible>false</visible><x>5</x></bsbPanel>";
        let geometry = PanelGeometry::from_panel_xml(xml);
        assert!(!geometry.visible);
        assert_eq!(geometry.x, 5);
        assert_eq!(geometry.y, 100);
        assert_eq!(geometry.width, 320);
    }

    #[test]
    fn tag_text_requires_both_tags() {
        assert_eq!(tag_text("<x>7</x>", "x"), Some("7"));
        assert_eq!(tag_text("<x>7", "x"), None);
        assert_eq!(tag_text("7</x>", "x"), None);
    }
}
