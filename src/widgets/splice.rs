//! Extraction and removal of widget sections from document text
//!
//! Boundary finding is literal substring search, not XML parsing; nested
//! panel blocks are not supported. The panel payload itself goes to the
//! [`WidgetHost`] collaborator, which does parse XML.

use super::{WidgetHost, DEFAULT_PANEL};

const PANEL_OPEN: &str = "<bsbPanel";
const PANEL_CLOSE: &str = "</bsbPanel>";
const PRESETS_OPEN: &str = "<bsbPresets>";
const PRESETS_CLOSE: &str = "</bsbPresets>";

/// Extract and remove widget sections from `text`, handing them to `host`
///
/// Drains every `<bsbPanel>` block from the text, though only the first is
/// loaded into the host (one layout per document). A panel open tag with no
/// matching close tag aborts the whole operation: 0 is returned, no loader
/// is called, and the text is not modified further. When the document has
/// no panel at all the host receives the default panel instead, so every
/// document always gets a layout. Presets are optional; a missing
/// `</bsbPresets>` is logged and skipped.
///
/// Returns the number of panel blocks consumed.
pub fn extract_widget_sections(text: &mut String, host: &mut dyn WidgetHost) -> usize {
    let mut panels: Vec<String> = Vec::new();

    loop {
        let Some(start) = text.find(PANEL_OPEN) else {
            tracing::debug!("no more panels in document");
            break;
        };
        let Some(close) = text[start..].find(PANEL_CLOSE) else {
            tracing::warn!("did not find matching </bsbPanel> tag");
            return 0;
        };
        let end = start + close + PANEL_CLOSE.len();
        panels.push(text[start..end].to_string());
        text.replace_range(start..end, "");
    }

    if let Some(panel) = panels.first() {
        host.load_panel_xml(panel);

        if let Some(start) = text.find(PRESETS_OPEN) {
            match text[start..].find(PRESETS_CLOSE) {
                Some(close) => {
                    let end = start + close + PRESETS_CLOSE.len();
                    let presets = text[start..end].to_string();
                    host.load_presets_xml(&presets);
                    text.replace_range(start..end, "");
                }
                None => {
                    tracing::warn!("missing </bsbPresets> tag");
                }
            }
        }
    } else {
        host.load_panel_xml(DEFAULT_PANEL);
    }

    panels.len()
}

#[cfg(test)]
mod tests {
    use super::super::CollectingHost;
    use super::*;

    #[test]
    fn panel_and_presets_are_spliced_out() {
        let mut text =
            String::from("<bsbPanel>A</bsbPanel>some text<bsbPresets>B</bsbPresets>");
        let mut host = CollectingHost::default();

        let consumed = extract_widget_sections(&mut text, &mut host);

        assert_eq!(consumed, 1);
        assert_eq!(text, "some text");
        assert_eq!(host.panels, vec!["<bsbPanel>A</bsbPanel>"]);
        assert_eq!(host.presets, vec!["<bsbPresets>B</bsbPresets>"]);
    }

    #[test]
    fn missing_panel_synthesizes_the_default() {
        let mut text = String::from("<CsInstruments>\ninstr 1\nendin\n</CsInstruments>\n");
        let original = text.clone();
        let mut host = CollectingHost::default();

        let consumed = extract_widget_sections(&mut text, &mut host);

        assert_eq!(consumed, 0);
        assert_eq!(text, original);
        assert_eq!(host.panels, vec![DEFAULT_PANEL.to_string()]);
        assert!(host.presets.is_empty());
    }

    #[test]
    fn unterminated_panel_aborts_untouched() {
        let mut text = String::from("before<bsbPanel>no close tag anywhere");
        let original = text.clone();
        let mut host = CollectingHost::default();

        let consumed = extract_widget_sections(&mut text, &mut host);

        assert_eq!(consumed, 0);
        assert_eq!(text, original);
        assert!(host.panels.is_empty());
        assert!(host.presets.is_empty());
    }

    #[test]
    fn only_first_panel_is_loaded_but_all_are_drained() {
        let mut text = String::from(
            "<bsbPanel>one</bsbPanel>middle<bsbPanel>two</bsbPanel>rest",
        );
        let mut host = CollectingHost::default();

        let consumed = extract_widget_sections(&mut text, &mut host);

        assert_eq!(consumed, 2);
        assert_eq!(text, "middlerest");
        assert_eq!(host.panels, vec!["<bsbPanel>one</bsbPanel>"]);
    }

    #[test]
    fn presets_without_panel_are_left_alone() {
        // Presets are only consumed after a panel was found
        let mut text = String::from("text<bsbPresets>B</bsbPresets>");
        let mut host = CollectingHost::default();

        extract_widget_sections(&mut text, &mut host);

        assert_eq!(text, "text<bsbPresets>B</bsbPresets>");
        assert!(host.presets.is_empty());
        assert_eq!(host.panels, vec![DEFAULT_PANEL.to_string()]);
    }

    #[test]
    fn missing_presets_close_is_not_fatal() {
        let mut text = String::from("<bsbPanel>A</bsbPanel>body<bsbPresets>oops");
        let mut host = CollectingHost::default();

        let consumed = extract_widget_sections(&mut text, &mut host);

        assert_eq!(consumed, 1);
        assert_eq!(text, "body<bsbPresets>oops");
        assert_eq!(host.panels.len(), 1);
        assert!(host.presets.is_empty());
    }

    #[test]
    fn panel_with_attributes_is_recognized() {
        let mut text = String::from("<bsbPanel version=\"2\">A</bsbPanel>tail");
        let mut host = CollectingHost::default();

        let consumed = extract_widget_sections(&mut text, &mut host);

        assert_eq!(consumed, 1);
        assert_eq!(text, "tail");
        assert_eq!(host.panels, vec!["<bsbPanel version=\"2\">A</bsbPanel>"]);
    }
}
