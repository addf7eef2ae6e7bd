use crate::text::char_len;

pub const MAX_POINTS: usize = 8;
const POINT_CHARS: usize = 80;

/// Word wrap by character count. Text that already fits stays on one line.
pub fn wrap_by_chars(text: &str, max_chars: usize) -> Vec<String> {
    if char_len(text) <= max_chars {
        return vec![text.to_string()];
    }

    let mut lines = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        if current.is_empty() {
            current.push_str(word);
        } else if char_len(&current) + 1 + char_len(word) <= max_chars {
            current.push(' ');
            current.push_str(word);
        } else {
            lines.push(std::mem::take(&mut current));
            current.push_str(word);
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

/// Word wrap by rendered width.
pub fn wrap_by_width(text: &str, max_width: u32, measure: impl Fn(&str) -> u32) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        let candidate = if current.is_empty() {
            word.to_string()
        } else {
            format!("{current} {word}")
        };
        if current.is_empty() || measure(&candidate) <= max_width {
            current = candidate;
        } else {
            lines.push(std::mem::replace(&mut current, word.to_string()));
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

/// Body text as bullet points: explicit lines and bullets are kept, prose is cut into
/// roughly 80-character pieces. At most eight points survive.
pub fn split_points(content: &str) -> Vec<String> {
    let has_bullets = content.contains('\n')
        || content.contains('•')
        || content.chars().take(5).any(|c| c == '-');

    let points: Vec<String> = if has_bullets {
        content
            .replace('•', "\n")
            .lines()
            .map(|line| line.trim().trim_start_matches(['•', '-']).trim().to_string())
            .filter(|line| !line.is_empty())
            .collect()
    } else {
        let mut points = Vec::new();
        let mut current = String::new();
        for word in content.split_whitespace() {
            if char_len(&current) + char_len(word) < POINT_CHARS {
                if !current.is_empty() {
                    current.push(' ');
                }
                current.push_str(word);
            } else {
                if !current.is_empty() {
                    points.push(std::mem::take(&mut current));
                }
                current.push_str(word);
            }
        }
        if !current.is_empty() {
            points.push(current);
        }
        points
    };

    points.into_iter().take(MAX_POINTS).collect()
}
