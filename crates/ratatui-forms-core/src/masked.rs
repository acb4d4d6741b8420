//! Masked text controller: owns the editable slots behind a
//! [`MaskDescriptor`] and keeps the cursor stable across reformatting.
//!
//! Raw input characters are stored one per placeholder slot; literals are
//! never stored, only synthesized by [`MaskedState::formatted`]. The cursor
//! is tracked as a token index internally and exposed as an offset into the
//! formatted string, which is what a host needs to position a visible
//! caret.

use crate::mask::MaskDescriptor;
use crate::mask::MaskToken;

/// How [`MaskedState::paste`] treats literal characters in pasted text.
///
/// `Formatted` accepts both fully-formatted and raw pastes: a pasted
/// character equal to a literal the cursor just skipped is consumed
/// silently. `Raw` pushes every character through the insert path, so
/// literals in the paste are dropped like any other mismatch; use it for
/// masks with `Any`-class placeholders where a separator would otherwise
/// land in a slot.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PasteMode {
    #[default]
    Formatted,
    Raw,
}

#[derive(Clone, Debug)]
pub struct MaskedState {
    mask: MaskDescriptor,
    slots: Vec<Option<char>>,
    /// Token index, kept at a placeholder position or at the end of the mask.
    cursor: usize,
    paste_mode: PasteMode,
}

impl MaskedState {
    pub fn new(mask: MaskDescriptor) -> Self {
        let slots = vec![None; mask.placeholder_count()];
        let mut state = Self {
            mask,
            slots,
            cursor: 0,
            paste_mode: PasteMode::default(),
        };
        state.cursor = state.next_placeholder_at(0);
        state
    }

    pub fn with_paste_mode(mut self, paste_mode: PasteMode) -> Self {
        self.paste_mode = paste_mode;
        self
    }

    pub fn mask(&self) -> &MaskDescriptor {
        &self.mask
    }

    /// Filled slot characters in order, gaps skipped.
    pub fn raw(&self) -> String {
        self.slots.iter().flatten().collect()
    }

    /// The literal-inclusive display string. Literals always render; empty
    /// slots collapse, so a half-filled `"###-##"` shows as `"12-"`.
    pub fn formatted(&self) -> String {
        let mut out = String::new();
        let mut slot = 0;
        for token in self.mask.tokens() {
            match token {
                MaskToken::Literal(c) => out.push(*c),
                MaskToken::Placeholder { .. } => {
                    if let Some(c) = self.slots[slot] {
                        out.push(c);
                    }
                    slot += 1;
                }
            }
        }
        out
    }

    /// `true` once every non-optional placeholder holds a character.
    pub fn is_complete(&self) -> bool {
        let mut slot = 0;
        for token in self.mask.tokens() {
            if let MaskToken::Placeholder { optional, .. } = token {
                if !optional && self.slots[slot].is_none() {
                    return false;
                }
                slot += 1;
            }
        }
        true
    }

    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(Option::is_none)
    }

    /// Cursor as an offset into [`Self::formatted`].
    pub fn cursor(&self) -> usize {
        let mut offset = 0;
        let mut slot = 0;
        for token in self.mask.tokens().iter().take(self.cursor) {
            match token {
                MaskToken::Literal(_) => offset += 1,
                MaskToken::Placeholder { .. } => {
                    if self.slots[slot].is_some() {
                        offset += 1;
                    }
                    slot += 1;
                }
            }
        }
        offset
    }

    /// Places the cursor at a formatted offset, e.g. from a mouse click.
    pub fn set_cursor(&mut self, offset: usize) {
        let mut seen = 0;
        let mut slot = 0;
        for (i, token) in self.mask.tokens().iter().enumerate() {
            if seen >= offset {
                self.cursor = i;
                return;
            }
            match token {
                MaskToken::Literal(_) => seen += 1,
                MaskToken::Placeholder { .. } => {
                    if self.slots[slot].is_some() {
                        seen += 1;
                    }
                    slot += 1;
                }
            }
        }
        self.cursor = self.mask.len();
    }

    /// Validates `c` against the placeholder at the cursor (auto-advancing
    /// over literals first) and stores it. Returns `false` and leaves all
    /// state untouched when the character does not fit.
    pub fn insert(&mut self, c: char) -> bool {
        let target = self.next_placeholder_at(self.cursor);
        if target >= self.mask.len() {
            return false;
        }
        let Some(class) = self.mask.class_at(target) else {
            return false;
        };
        if !class.accepts(c) {
            return false;
        }
        let slot = self.slot_index(target);
        self.slots[slot] = Some(c);
        self.cursor = self.next_placeholder_at(target + 1);
        true
    }

    /// Clears the placeholder before the cursor, skipping backward over
    /// literals, and moves the cursor onto it. Returns `true` when a stored
    /// character was actually removed.
    pub fn backspace(&mut self) -> bool {
        let mut i = self.cursor;
        while i > 0 {
            i -= 1;
            if self.mask.tokens()[i].is_placeholder() {
                let slot = self.slot_index(i);
                let had = self.slots[slot].take().is_some();
                self.cursor = i;
                return had;
            }
        }
        false
    }

    /// Clears the placeholder at or after the cursor without moving it.
    pub fn delete(&mut self) -> bool {
        let target = self.next_placeholder_at(self.cursor);
        if target >= self.mask.len() {
            return false;
        }
        let slot = self.slot_index(target);
        self.slots[slot].take().is_some()
    }

    pub fn move_left(&mut self) {
        let mut i = self.cursor;
        while i > 0 {
            i -= 1;
            if self.mask.tokens()[i].is_placeholder() {
                self.cursor = i;
                return;
            }
        }
    }

    pub fn move_right(&mut self) {
        if self.cursor < self.mask.len() {
            self.cursor = self.next_placeholder_at(self.cursor + 1);
        }
    }

    /// First editable position.
    pub fn home(&mut self) {
        self.cursor = self.next_placeholder_at(0);
    }

    /// The natural append point: the first unfilled placeholder, or the end
    /// of the mask once everything is filled.
    pub fn end(&mut self) {
        let mut slot = 0;
        for (i, token) in self.mask.tokens().iter().enumerate() {
            if token.is_placeholder() {
                if self.slots[slot].is_none() {
                    self.cursor = i;
                    return;
                }
                slot += 1;
            }
        }
        self.cursor = self.mask.len();
    }

    /// Feeds every character through the insert path and returns how many
    /// were stored. Mismatches are dropped; see [`PasteMode`] for how
    /// literal characters in the paste are treated.
    pub fn paste(&mut self, text: &str) -> usize {
        let mut inserted = 0;
        let mut pending: Vec<char> = Vec::new();
        for c in text.chars() {
            if self.paste_mode == PasteMode::Formatted {
                if let Some(&front) = pending.first() {
                    if front == c {
                        pending.remove(0);
                        continue;
                    }
                    pending.clear();
                }
            }
            let before = self.next_placeholder_at(self.cursor);
            if self.insert(c) {
                inserted += 1;
                if self.paste_mode == PasteMode::Formatted {
                    pending = self.literal_run_after(before + 1);
                }
            }
        }
        inserted
    }

    pub fn clear(&mut self) {
        self.slots.fill(None);
        self.cursor = self.next_placeholder_at(0);
    }

    /// Replaces the content wholesale, as if `text` were pasted into an
    /// empty field. Used for external value bindings.
    pub fn set_text(&mut self, text: &str) {
        self.clear();
        self.paste(text);
    }

    fn next_placeholder_at(&self, from: usize) -> usize {
        let mut i = from;
        while i < self.mask.len() && !self.mask.tokens()[i].is_placeholder() {
            i += 1;
        }
        i
    }

    fn literal_run_after(&self, from: usize) -> Vec<char> {
        self.mask.tokens()[from.min(self.mask.len())..]
            .iter()
            .map_while(|t| match t {
                MaskToken::Literal(c) => Some(*c),
                MaskToken::Placeholder { .. } => None,
            })
            .collect()
    }

    fn slot_index(&self, token_index: usize) -> usize {
        self.mask.tokens()[..token_index]
            .iter()
            .filter(|t| t.is_placeholder())
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state(descriptor: &str) -> MaskedState {
        MaskedState::new(MaskDescriptor::parse(descriptor).unwrap())
    }

    #[test]
    fn insert_advances_past_literal_run() {
        let mut s = state("##-##");
        assert!(s.insert('1'));
        assert!(s.insert('2'));
        assert_eq!(s.formatted(), "12-");
        // Cursor skipped the '-' and sits before the third slot.
        assert_eq!(s.cursor(), 3);
        assert!(s.insert('3'));
        assert_eq!(s.formatted(), "12-3");
    }

    #[test]
    fn invalid_char_is_a_silent_no_op() {
        let mut s = state("###-##");
        s.insert('1');
        s.insert('2');
        let cursor = s.cursor();
        assert!(!s.insert('a'));
        assert_eq!(s.formatted(), "12-");
        assert_eq!(s.cursor(), cursor);
    }

    #[test]
    fn insert_at_host_cursor_rejects_letter() {
        // A click puts the caret at formatted offset 2, before the third slot.
        let mut s = state("###-##");
        s.paste("12");
        s.set_cursor(2);
        assert!(!s.insert('a'));
        assert_eq!(s.formatted(), "12-");
    }

    #[test]
    fn backspace_skips_literals_and_clears() {
        let mut s = state("##-##");
        s.paste("1234");
        assert_eq!(s.formatted(), "12-34");
        assert!(s.backspace());
        assert!(s.backspace());
        assert_eq!(s.formatted(), "12-");
        // Next backspace crosses the '-' and clears the second slot.
        assert!(s.backspace());
        assert_eq!(s.formatted(), "1-");
        assert_eq!(s.cursor(), 1);
    }

    #[test]
    fn backspace_on_empty_moves_nothing() {
        let mut s = state("##");
        assert!(!s.backspace());
        assert_eq!(s.cursor(), 0);
    }

    #[test]
    fn completion_requires_every_mandatory_slot() {
        let mut s = state("##:##");
        s.paste("123");
        assert!(!s.is_complete());
        s.paste("4");
        assert!(s.is_complete());
    }

    #[test]
    fn optional_slots_do_not_block_completion() {
        let mut s = state("###?");
        s.paste("12");
        assert!(s.is_complete());
        assert_eq!(s.formatted(), "12");
    }

    #[test]
    fn formatted_paste_keeps_any_class_slots_clean() {
        let mut s = state("X-X");
        assert_eq!(s.paste("a-b"), 2);
        assert_eq!(s.raw(), "ab");
        assert_eq!(s.formatted(), "a-b");
    }

    #[test]
    fn raw_paste_fills_any_class_slots_verbatim() {
        let mut s = state("X-X").with_paste_mode(PasteMode::Raw);
        s.paste("a-b");
        // The '-' lands in the second Any slot; 'b' has nowhere to go.
        assert_eq!(s.raw(), "a-");
    }

    #[test]
    fn paste_drops_mismatches() {
        let mut s = state("####");
        assert_eq!(s.paste("1a2b3"), 3);
        assert_eq!(s.formatted(), "123");
    }

    #[test]
    fn literal_positions_survive_completion() {
        let mut s = state("(###) ###");
        s.paste("123456");
        assert!(s.is_complete());
        let formatted = s.formatted();
        for (i, c) in formatted.chars().enumerate() {
            if let Some(lit) = s.mask().literal_at(i) {
                assert_eq!(c, lit);
            }
        }
        assert_eq!(formatted, "(123) 456");
    }

    #[test]
    fn end_lands_on_first_unfilled_slot() {
        let mut s = state("##-##");
        s.paste("12");
        s.home();
        assert_eq!(s.cursor(), 0);
        s.end();
        assert!(s.insert('3'));
        assert_eq!(s.formatted(), "12-3");
    }

    #[test]
    fn set_text_replaces_content() {
        let mut s = state("##/##");
        s.paste("1234");
        s.set_text("56");
        assert_eq!(s.formatted(), "56/");
        assert!(!s.is_complete());
    }
}
