use ratatui::buffer::Buffer;
use ratatui::style::Style;
use unicode_width::UnicodeWidthChar;

pub fn display_width(text: &str) -> usize {
    text.chars()
        .map(|c| UnicodeWidthChar::width(c).unwrap_or(0))
        .sum()
}

/// Display columns occupied by the first `char_count` characters.
pub fn width_before(text: &str, char_count: usize) -> usize {
    text.chars()
        .take(char_count)
        .map(|c| UnicodeWidthChar::width(c).unwrap_or(0))
        .sum()
}

/// Keeps `cursor_col` visible in a `viewport_w`-wide window.
pub fn scroll_into_view(scroll: u16, cursor_col: u16, viewport_w: u16) -> u16 {
    if viewport_w == 0 {
        return scroll;
    }
    if cursor_col < scroll {
        cursor_col
    } else if cursor_col >= scroll + viewport_w {
        cursor_col - viewport_w + 1
    } else {
        scroll
    }
}

/// Renders one line of text clipped to `max_cols` display columns starting
/// at `start_col`, wide-character aware. Zero-width characters are skipped;
/// a wide char straddling the left edge is dropped rather than half-drawn.
pub fn render_line_clipped(
    x: u16,
    y: u16,
    start_col: u16,
    max_cols: u16,
    buf: &mut Buffer,
    text: &str,
    style: Style,
) {
    if max_cols == 0 {
        return;
    }

    let start_col = start_col as usize;
    let max_cols = max_cols as usize;
    let mut col = 0usize;
    let mut out_cols = 0usize;
    let mut dx = 0u16;
    let mut tmp = [0u8; 4];

    for ch in text.chars() {
        let w = UnicodeWidthChar::width(ch).unwrap_or(0);
        if w == 0 {
            continue;
        }
        if col + w <= start_col {
            col += w;
            continue;
        }
        if col < start_col {
            col += w;
            continue;
        }
        if out_cols + w > max_cols {
            return;
        }

        let s = ch.encode_utf8(&mut tmp);
        if let Some(cell) = buf.cell_mut((x + dx, y)) {
            cell.set_style(style);
            cell.set_symbol(s);
        }
        dx += 1;
        out_cols += 1;
        col += w;

        if w == 2 {
            if out_cols >= max_cols {
                return;
            }
            if let Some(cell) = buf.cell_mut((x + dx, y)) {
                cell.set_style(style);
                cell.set_symbol("");
            }
            dx += 1;
            out_cols += 1;
        }
    }
}
