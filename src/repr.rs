//! Representation tokens and selectors.
//!
//! A representation ("repr") names how an object is drawn: its geometric
//! detail (coarse hull or refined surface) and its draw style (surface,
//! edges, points). Collections carry a [`ReprSelector`]; objects may author
//! their own token which overrides the collection default.

use std::fmt;
use std::str::FromStr;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::PickError;

/// How a representation rasterizes its geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GeomStyle {
    /// Filled triangles.
    Surface,
    /// Edges only, no fill.
    EdgeOnly,
    /// Filled triangles with edges drawn on top.
    EdgeOnSurface,
    /// Vertices as single pixels.
    Points,
}

impl GeomStyle {
    /// Whether this style draws filled triangles.
    #[must_use]
    pub fn draws_surface(self) -> bool {
        matches!(self, Self::Surface | Self::EdgeOnSurface)
    }

    /// Whether this style draws edges.
    #[must_use]
    pub fn draws_edges(self) -> bool {
        matches!(self, Self::EdgeOnly | Self::EdgeOnSurface)
    }
}

/// A named rendering style for an object.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    JsonSchema,
)]
#[serde(rename_all = "camelCase")]
pub enum ReprToken {
    /// Coarse control cage, flat shaded. Ignores refine level.
    Hull,
    /// Coarse control cage, smooth shaded. Ignores refine level.
    SmoothHull,
    /// Coarse cage edges.
    Wire,
    /// Coarse cage with edges on top.
    WireOnSurf,
    /// Subdivided surface at the object's refine level.
    Refined,
    /// Edges of the subdivided surface.
    RefinedWire,
    /// Subdivided surface with its edges on top.
    RefinedWireOnSurf,
    /// Cage vertices.
    Points,
}

impl ReprToken {
    /// All tokens, in declaration order.
    pub const ALL: [Self; 8] = [
        Self::Hull,
        Self::SmoothHull,
        Self::Wire,
        Self::WireOnSurf,
        Self::Refined,
        Self::RefinedWire,
        Self::RefinedWireOnSurf,
        Self::Points,
    ];

    /// The token's canonical name.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Hull => "hull",
            Self::SmoothHull => "smoothHull",
            Self::Wire => "wire",
            Self::WireOnSurf => "wireOnSurf",
            Self::Refined => "refined",
            Self::RefinedWire => "refinedWire",
            Self::RefinedWireOnSurf => "refinedWireOnSurf",
            Self::Points => "points",
        }
    }

    /// Whether geometry for this repr depends on the object's refine level.
    #[must_use]
    pub fn honors_refine_level(self) -> bool {
        matches!(
            self,
            Self::Refined | Self::RefinedWire | Self::RefinedWireOnSurf
        )
    }

    /// Rasterization style.
    #[must_use]
    pub fn geom_style(self) -> GeomStyle {
        match self {
            Self::Hull | Self::SmoothHull | Self::Refined => GeomStyle::Surface,
            Self::Wire | Self::RefinedWire => GeomStyle::EdgeOnly,
            Self::WireOnSurf | Self::RefinedWireOnSurf => {
                GeomStyle::EdgeOnSurface
            }
            Self::Points => GeomStyle::Points,
        }
    }
}

impl fmt::Display for ReprToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReprToken {
    type Err = PickError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|token| token.as_str() == s)
            .ok_or_else(|| {
                PickError::InvalidInput(format!("unknown repr '{s}'"))
            })
    }
}

/// Ordered list of representations a collection accepts. The first entry is
/// the collection default.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReprSelector {
    tokens: Vec<ReprToken>,
}

impl ReprSelector {
    /// Selector with a single accepted repr.
    #[must_use]
    pub fn new(primary: ReprToken) -> Self {
        Self {
            tokens: vec![primary],
        }
    }

    /// Selector from an ordered token list.
    ///
    /// # Errors
    ///
    /// Returns [`PickError::InvalidInput`] if `tokens` is empty.
    pub fn from_tokens(tokens: Vec<ReprToken>) -> Result<Self, PickError> {
        if tokens.is_empty() {
            return Err(PickError::InvalidInput(
                "repr selector needs at least one token".into(),
            ));
        }
        Ok(Self { tokens })
    }

    /// The default repr for objects without an authored one.
    #[must_use]
    pub fn primary(&self) -> ReprToken {
        self.tokens[0]
    }

    /// Whether the selector lists `token`.
    #[must_use]
    pub fn contains(&self, token: ReprToken) -> bool {
        self.tokens.contains(&token)
    }

    /// Accepted tokens in priority order.
    #[must_use]
    pub fn tokens(&self) -> &[ReprToken] {
        &self.tokens
    }
}

impl From<ReprToken> for ReprSelector {
    fn from(token: ReprToken) -> Self {
        Self::new(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_parse_back() {
        for token in ReprToken::ALL {
            assert_eq!(token.as_str().parse::<ReprToken>().unwrap(), token);
        }
        assert!("shaded".parse::<ReprToken>().is_err());
    }

    #[test]
    fn only_refined_family_honors_refine_level() {
        assert!(!ReprToken::Hull.honors_refine_level());
        assert!(!ReprToken::WireOnSurf.honors_refine_level());
        assert!(ReprToken::Refined.honors_refine_level());
        assert!(ReprToken::RefinedWire.honors_refine_level());
        assert!(ReprToken::RefinedWireOnSurf.honors_refine_level());
    }

    #[test]
    fn serde_names_match_canonical_names() {
        #[derive(Serialize, Deserialize)]
        struct Wrapper {
            repr: ReprToken,
        }
        let text = toml::to_string(&Wrapper {
            repr: ReprToken::RefinedWireOnSurf,
        })
        .unwrap();
        assert!(text.contains("refinedWireOnSurf"));
    }

    #[test]
    fn empty_selector_rejected() {
        assert!(ReprSelector::from_tokens(Vec::new()).is_err());
        let sel = ReprSelector::from_tokens(vec![
            ReprToken::Refined,
            ReprToken::Hull,
        ])
        .unwrap();
        assert_eq!(sel.primary(), ReprToken::Refined);
        assert!(sel.contains(ReprToken::Hull));
    }
}
