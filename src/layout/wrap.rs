use crate::model::Line;

/// Greedy word wrap.
///
/// Words are separated by breakable whitespace and rejoined with a single
/// space. No-break spaces stay inside their word.
/// A word is moved to a new line when appending it would make the measured
/// width exceed `max_width`. A lone word wider than `max_width` is kept
/// whole on its own line; such lines report `fits(max_width) == false`.
///
/// `measure` returns the rendered width of a string in the same unit as
/// `max_width`.
pub fn wrap_text(text: &str, max_width: f32, measure: impl Fn(&str) -> f32) -> Vec<Line> {
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut current_w = 0.0f32;

    for word in text.split(is_break).filter(|w| !w.is_empty()) {
        if current.is_empty() {
            current.push_str(word);
            current_w = measure(&current);
            continue;
        }

        let candidate = format!("{current} {word}");
        let candidate_w = measure(&candidate);
        if candidate_w > max_width {
            lines.push(Line {
                text: std::mem::replace(&mut current, word.to_string()),
                width: current_w,
            });
            current_w = measure(&current);
        } else {
            current = candidate;
            current_w = candidate_w;
        }
    }

    if !current.is_empty() {
        lines.push(Line {
            text: current,
            width: current_w,
        });
    }
    lines
}

fn is_break(c: char) -> bool {
    c.is_whitespace() && !matches!(c, '\u{a0}' | '\u{202f}' | '\u{2007}')
}
