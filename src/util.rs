/// Deterministic initial placement: node `index` on a phyllotaxis spiral
/// around the origin, so a freshly loaded graph always starts from the same
/// layout before forces take over.
pub fn spiral_offset(index: usize) -> (f32, f32) {
    const GOLDEN_ANGLE: f32 = 2.399_963; // pi * (3 - sqrt(5))

    let radius = 10.0 * ((index as f32) + 0.5).sqrt();
    let angle = (index as f32) * GOLDEN_ANGLE;
    (radius * angle.cos(), radius * angle.sin())
}

/// Truncates a title for on-canvas labels, on a char boundary.
pub fn short_title(title: &str, max_chars: usize) -> String {
    if title.chars().count() <= max_chars {
        return title.to_owned();
    }

    let truncated = title
        .char_indices()
        .nth(max_chars.saturating_sub(1))
        .map(|(byte_index, _)| &title[..byte_index])
        .unwrap_or(title);
    format!("{}…", truncated.trim_end())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spiral_offsets_are_distinct_and_grow_outward() {
        let (x0, y0) = spiral_offset(0);
        let (x1, y1) = spiral_offset(1);
        let (x9, y9) = spiral_offset(9);
        assert!((x0, y0) != (x1, y1));
        let r1 = (x1 * x1 + y1 * y1).sqrt();
        let r9 = (x9 * x9 + y9 * y9).sqrt();
        assert!(r9 > r1);
    }

    #[test]
    fn short_title_keeps_short_strings_intact() {
        assert_eq!(short_title("Hello", 10), "Hello");
    }

    #[test]
    fn short_title_truncates_on_char_boundaries() {
        let truncated = short_title("Grüße aus der Rust-Welt", 8);
        assert!(truncated.ends_with('…'));
        assert!(truncated.chars().count() <= 8);
    }
}
