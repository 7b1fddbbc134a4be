//! Seam for the content-editing widget. The form does not care how content is
//! edited; it only hands a string over and asks for one back, so a rich-text
//! widget (producing marked-up strings) and the plain-text fallback are
//! interchangeable behind this trait.

pub trait ContentEditor {
    fn set_content(&mut self, content: &str);

    /// The current content as a plain string, markup included.
    fn content(&self) -> String;
}

/// Plain-text editor used by the terminal driver.
#[derive(Debug, Default)]
pub struct PlainTextEditor {
    buffer: String,
}

impl ContentEditor for PlainTextEditor {
    fn set_content(&mut self, content: &str) {
        self.buffer = content.to_string();
    }

    fn content(&self) -> String {
        self.buffer.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_content() {
        let mut editor = PlainTextEditor::default();
        editor.set_content("<b>bold</b> plans");
        assert_eq!(editor.content(), "<b>bold</b> plans");
    }

    #[test]
    fn set_replaces_previous_content() {
        let mut editor = PlainTextEditor::default();
        editor.set_content("first");
        editor.set_content("second");
        assert_eq!(editor.content(), "second");
    }
}
