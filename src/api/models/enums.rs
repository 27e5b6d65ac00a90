use serde::{Deserialize, Serialize};

/// Color scheme of the generated graphic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VisualStyle {
    #[default]
    Light,
    Dark,
}

/// Shape and line budget for the generated graphic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Complexity {
    Minimal,
    #[default]
    Standard,
    Detailed,
}

/// How much CSS/SMIL animation the graphic may carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnimationLevel {
    None,
    #[default]
    Subtle,
    Active,
}
