//! SVG symbols for the logic gates, drawn in a 100x100 view box.
//!
//! Kept apart from [`crate::logic`] so gate evaluation never depends on
//! how a gate is drawn.

use serde::Serialize;

use crate::logic::Gate;

const AND_BODY: &str = "M10,10 V90 H50 A40,40 0 0,0 50,10 H10 Z";
const OR_BODY: &str = "M10,10 Q40,50 10,90 Q60,90 90,50 Q60,10 10,10 Z";
const NOT_BODY: &str = "M10,10 L10,90 L80,50 Z";

/// Inversion bubble on a gate output.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Bubble {
    pub cx: f64,
    pub cy: f64,
    pub r: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GateGlyph {
    pub body: &'static str,
    pub bubble: Option<Bubble>,
}

pub fn glyph(gate: Gate) -> GateGlyph {
    match gate {
        Gate::And => GateGlyph {
            body: AND_BODY,
            bubble: None,
        },
        Gate::Or => GateGlyph {
            body: OR_BODY,
            bubble: None,
        },
        Gate::Not => GateGlyph {
            body: NOT_BODY,
            bubble: Some(Bubble {
                cx: 85.0,
                cy: 50.0,
                r: 5.0,
            }),
        },
        Gate::Nand => GateGlyph {
            body: AND_BODY,
            bubble: Some(Bubble {
                cx: 95.0,
                cy: 50.0,
                r: 5.0,
            }),
        },
        Gate::Nor => GateGlyph {
            body: OR_BODY,
            bubble: Some(Bubble {
                cx: 95.0,
                cy: 50.0,
                r: 5.0,
            }),
        },
    }
}

impl GateGlyph {
    /// Render the glyph as an SVG fragment stroked with `currentColor`.
    pub fn to_svg(&self) -> String {
        let mut svg = format!(
            r#"<path d="{}" fill="none" stroke="currentColor" stroke-width="3" />"#,
            self.body
        );
        if let Some(bubble) = self.bubble {
            svg.push_str(&format!(
                r#"<circle cx="{}" cy="{}" r="{}" stroke="currentColor" stroke-width="3" fill="none" />"#,
                bubble.cx, bubble.cy, bubble.r
            ));
        }
        svg
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inverting_gates_have_bubbles() {
        for gate in Gate::ALL {
            let inverting = matches!(gate, Gate::Not | Gate::Nand | Gate::Nor);
            assert_eq!(glyph(gate).bubble.is_some(), inverting, "{}", gate);
        }
    }

    #[test]
    fn test_nand_shares_and_body() {
        assert_eq!(glyph(Gate::Nand).body, glyph(Gate::And).body);
        assert_eq!(glyph(Gate::Nor).body, glyph(Gate::Or).body);
    }

    #[test]
    fn test_svg_fragment() {
        let svg = glyph(Gate::Not).to_svg();
        assert!(svg.starts_with(r#"<path d="M10,10 L10,90 L80,50 Z""#));
        assert!(svg.contains(r#"<circle cx="85" cy="50" r="5""#));
        assert!(!glyph(Gate::Or).to_svg().contains("circle"));
    }
}
