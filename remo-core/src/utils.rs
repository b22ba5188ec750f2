/// Deterministic display color for a name.
///
/// Java-style 31x string hash folded into the 24-bit RGB space, so the
/// same name always renders with the same color across runs.
pub fn color_for(name: &str) -> String {
    let mut h: u32 = 0;
    for ch in name.chars() {
        h = h.wrapping_mul(31).wrapping_add(ch as u32);
    }
    format!("#{:06X}", h % 0x0100_0000)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn stable_across_calls() {
        assert_eq!(color_for("early - GBOX"), color_for("early - GBOX"));
    }

    #[test]
    fn always_a_hex_triplet() {
        for name in ["", "a", "some very long analysis series name 12345"] {
            let color = color_for(name);
            assert_eq!(color.len(), 7);
            assert!(color.starts_with('#'));
            assert!(color[1..].chars().all(|c| c.is_ascii_hexdigit()));
        }
    }

    #[test]
    fn empty_name_is_black() {
        assert_eq!(color_for(""), "#000000");
    }
}
