// Copyright 2024-, SafeKart contributors.
// SPDX-License-Identifier: Apache-2.0

//! Placeholder symbol renderer.
//!
//! Draws a QR-looking 21x21 grid: the three finder patterns are fixed and the
//! remaining modules are taken from the BLAKE3 extended output of the text.
//! It is not a scannable code, only a deterministic picture of the text.

pub(super) const MEDIA_TYPE: &str = "image/svg+xml";

const SIZE: usize = 21;
const QUIET_ZONE: usize = 4;
const FINDER: usize = 7;

fn finder_module(row: usize, col: usize) -> Option<bool> {
    let origins = [(0, 0), (0, SIZE - FINDER), (SIZE - FINDER, 0)];
    for (top, left) in origins {
        // the finder plus its one module separator
        let rows = top.saturating_sub(1)..=(top + FINDER).min(SIZE - 1);
        let cols = left.saturating_sub(1)..=(left + FINDER).min(SIZE - 1);
        if !rows.contains(&row) || !cols.contains(&col) {
            continue;
        }
        if row < top || row >= top + FINDER || col < left || col >= left + FINDER {
            return Some(false);
        }
        let (r, c) = (row - top, col - left);
        let ring = r == 0 || r == FINDER - 1 || c == 0 || c == FINDER - 1;
        let core = (2..=4).contains(&r) && (2..=4).contains(&c);
        return Some(ring || core);
    }
    None
}

pub(super) fn render(text: &str) -> Vec<u8> {
    let mut hasher = blake3::Hasher::new();
    hasher.update(text.as_bytes());
    let mut bits = [0u8; (SIZE * SIZE).div_ceil(8)];
    hasher.finalize_xof().fill(&mut bits);

    let extent = SIZE + 2 * QUIET_ZONE;
    let mut path = String::new();
    for row in 0..SIZE {
        for col in 0..SIZE {
            let index = row * SIZE + col;
            let dark = finder_module(row, col)
                .unwrap_or_else(|| bits[index / 8] & (1 << (index % 8)) != 0);
            if dark {
                path.push_str(&format!(
                    "M{} {}h1v1h-1z",
                    col + QUIET_ZONE,
                    row + QUIET_ZONE
                ));
            }
        }
    }

    format!(
        concat!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 {extent} {extent}" "#,
            r#"shape-rendering="crispEdges">"#,
            r##"<rect width="{extent}" height="{extent}" fill="#ffffff"/>"##,
            r##"<path d="{path}" fill="#000000"/></svg>"##
        ),
        extent = extent,
        path = path
    )
    .into_bytes()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rendering_is_deterministic() {
        assert_eq!(render("hello"), render("hello"));
        assert_ne!(render("hello"), render("hello "));
    }

    #[test]
    fn finder_patterns_are_fixed() {
        // outer ring, separator and core of the top-left finder
        assert_eq!(finder_module(0, 0), Some(true));
        assert_eq!(finder_module(1, 1), Some(false));
        assert_eq!(finder_module(3, 3), Some(true));
        assert_eq!(finder_module(7, 7), Some(false));
        // bottom-right corner carries data
        assert_eq!(finder_module(20, 20), None);
    }

    #[test]
    fn output_is_an_svg_document() {
        let svg = String::from_utf8(render("https://safekart.example.com")).unwrap();
        assert!(svg.starts_with("<svg"));
        assert!(svg.ends_with("</svg>"));
        assert!(svg.contains(r#"viewBox="0 0 29 29""#));
    }
}
