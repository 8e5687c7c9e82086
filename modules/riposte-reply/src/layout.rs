//! Caption layout math, kept pure so the wrap invariant is testable with
//! a fake measure function instead of rasterized glyphs.

/// Captions never shrink below this size on small canvases.
pub const MIN_FONT_SIZE: u32 = 48;
/// Larger canvases get proportionally larger captions: width / ratio.
pub const FONT_SIZE_RATIO: u32 = 15;
/// A rendered line must stay under this fraction of the canvas width.
pub const MAX_LINE_FRACTION: f32 = 0.9;
const LINE_HEIGHT_FACTOR: f32 = 1.2;

pub fn font_size(canvas_width: u32) -> u32 {
    MIN_FONT_SIZE.max(canvas_width / FONT_SIZE_RATIO)
}

pub fn line_height(font_size: u32) -> f32 {
    font_size as f32 * LINE_HEIGHT_FACTOR
}

pub fn stroke_width(font_size: u32) -> u32 {
    2.max(font_size / 20)
}

/// Greedy word wrap: accumulate words while the measured candidate line
/// stays under 90% of the canvas width; otherwise commit the current line
/// and start a new one with the overflowing word. A single word wider
/// than the limit still gets its own line.
pub fn wrap_words(text: &str, canvas_width: u32, measure: impl Fn(&str) -> f32) -> Vec<String> {
    let limit = canvas_width as f32 * MAX_LINE_FRACTION;

    let mut words = text.split_whitespace();
    let Some(first) = words.next() else {
        return Vec::new();
    };

    let mut lines = Vec::new();
    let mut current = first.to_string();

    for word in words {
        let candidate = format!("{current} {word}");
        if measure(&candidate) < limit {
            current = candidate;
        } else {
            lines.push(std::mem::replace(&mut current, word.to_string()));
        }
    }
    lines.push(current);

    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 10px per character, a stand-in for glyph advances.
    fn measure(s: &str) -> f32 {
        s.chars().count() as f32 * 10.0
    }

    #[test]
    fn font_size_scales_with_width_above_the_floor() {
        assert_eq!(font_size(100), MIN_FONT_SIZE);
        assert_eq!(font_size(720), MIN_FONT_SIZE);
        assert_eq!(font_size(1500), 100);
        assert_eq!(font_size(3000), 200);
    }

    #[test]
    fn stroke_width_has_a_floor_of_two() {
        assert_eq!(stroke_width(20), 2);
        assert_eq!(stroke_width(48), 2);
        assert_eq!(stroke_width(100), 5);
    }

    #[test]
    fn empty_text_produces_no_lines() {
        assert!(wrap_words("", 500, measure).is_empty());
        assert!(wrap_words("   ", 500, measure).is_empty());
    }

    #[test]
    fn short_text_stays_on_one_line() {
        let lines = wrap_words("КОГДА ТЕСТЫ", 500, measure);
        assert_eq!(lines, vec!["КОГДА ТЕСТЫ"]);
    }

    #[test]
    fn no_multi_word_line_exceeds_the_width_limit() {
        let text = "КОГДА ЛОГИ ГОВОРЯТ ЧТО ВСЁ ХОРОШО НО ПРОДАКШН МОЛЧИТ УЖЕ МИНУТ ДЕСЯТЬ";
        for canvas_width in [200_u32, 320, 500, 900] {
            let limit = canvas_width as f32 * MAX_LINE_FRACTION;
            let lines = wrap_words(text, canvas_width, measure);

            assert!(!lines.is_empty());
            for line in &lines {
                if line.contains(' ') {
                    assert!(
                        measure(line) < limit,
                        "line {line:?} measures {} against limit {limit} at width {canvas_width}",
                        measure(line)
                    );
                }
            }
        }
    }

    #[test]
    fn wrapping_preserves_all_words_in_order() {
        let text = "ОДИН ДВА ТРИ ЧЕТЫРЕ ПЯТЬ ШЕСТЬ СЕМЬ";
        let lines = wrap_words(text, 250, measure);
        let rejoined = lines.join(" ");
        assert_eq!(rejoined, text);
        assert!(lines.len() > 1);
    }

    #[test]
    fn oversized_single_word_gets_its_own_line() {
        let lines = wrap_words("СВЕРХДЛИННОЕОДНОСЛОВО ДА", 100, measure);
        assert_eq!(lines[0], "СВЕРХДЛИННОЕОДНОСЛОВО");
        assert_eq!(lines[1], "ДА");
    }
}
