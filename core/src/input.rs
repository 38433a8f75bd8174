use crate::errors::SubmitRejected;

/// What a key press in the message box should do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Submit,
    InsertNewline,
    Ignore,
}

impl KeyAction {
    /// Enter submits, Shift+Enter inserts a line break.
    pub fn classify(key: &str, shift: bool) -> Self {
        match (key, shift) {
            ("Enter", false) => KeyAction::Submit,
            ("Enter", true) => KeyAction::InsertNewline,
            _ => KeyAction::Ignore,
        }
    }
}

/// Result of [`crate::ChatWidget::handle_key`].
#[derive(Debug)]
pub enum KeyOutcome<P> {
    Submitted(P),
    Rejected(SubmitRejected),
    /// `caret` is where the cursor belongs afterwards, in UTF-16 units.
    NewlineInserted { caret: usize },
    Ignored,
}

impl<P> KeyOutcome<P> {
    /// Whether the host should suppress the key's default behaviour.
    pub fn consumes_key(&self) -> bool {
        !matches!(self, KeyOutcome::Ignored)
    }
}

/// Replaces the selection `start..end` with a line break.
///
/// Offsets are UTF-16 code units, as a browser textarea reports them; `None`
/// means the end of the text. Returns the caret position after the break.
pub fn insert_newline(text: &mut String, selection: Option<(usize, usize)>) -> usize {
    let total = text.encode_utf16().count();
    let (start, end) = selection.unwrap_or((total, total));
    let start = start.min(total);
    let end = end.clamp(start, total);

    let range = utf16_to_byte(text, start)..utf16_to_byte(text, end);
    text.replace_range(range, "\n");
    start + 1
}

/// Byte index of the first char boundary at or after `offset` UTF-16 units.
fn utf16_to_byte(text: &str, offset: usize) -> usize {
    let mut units = 0;
    for (byte, ch) in text.char_indices() {
        if units >= offset {
            return byte;
        }
        units += ch.len_utf16();
    }
    text.len()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify() {
        assert_eq!(KeyAction::classify("Enter", false), KeyAction::Submit);
        assert_eq!(KeyAction::classify("Enter", true), KeyAction::InsertNewline);
        assert_eq!(KeyAction::classify("a", false), KeyAction::Ignore);
        assert_eq!(KeyAction::classify("Tab", true), KeyAction::Ignore);
    }

    #[test]
    fn test_ignored_keys_pass_through() {
        assert!(!KeyOutcome::<()>::Ignored.consumes_key());
        assert!(KeyOutcome::<()>::NewlineInserted { caret: 0 }.consumes_key());
        assert!(KeyOutcome::<()>::Rejected(SubmitRejected::Empty).consumes_key());
    }

    #[test]
    fn test_newline_at_caret() {
        let mut text = "oats banana".to_string();
        assert_eq!(insert_newline(&mut text, Some((4, 4))), 5);
        assert_eq!(text, "oats\n banana");
    }

    #[test]
    fn test_newline_replaces_selection() {
        let mut text = "oats and banana".to_string();
        assert_eq!(insert_newline(&mut text, Some((4, 9))), 5);
        assert_eq!(text, "oats\nbanana");
    }

    #[test]
    fn test_newline_without_selection_appends() {
        let mut text = "oats".to_string();
        assert_eq!(insert_newline(&mut text, None), 5);
        assert_eq!(text, "oats\n");
    }

    #[test]
    fn test_newline_counts_utf16_units() {
        // 🍎 is two UTF-16 units and four bytes
        let mut text = "🍎 crème".to_string();
        assert_eq!(insert_newline(&mut text, Some((3, 3))), 4);
        assert_eq!(text, "🍎 \ncrème");

        let mut text = "crème brûlée".to_string();
        insert_newline(&mut text, Some((5, 5)));
        assert_eq!(text, "crème\n brûlée");
    }

    #[test]
    fn test_newline_clamps_out_of_range_selection() {
        let mut text = "kale".to_string();
        assert_eq!(insert_newline(&mut text, Some((10, 2))), 5);
        assert_eq!(text, "kale\n");
    }
}
