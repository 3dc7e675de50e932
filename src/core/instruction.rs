//! Instruction builder
//!
//! Maps a size-class label onto the natural-language edit instruction sent
//! upstream. Total over its input: unknown labels produce a generic
//! instruction that embeds the label text.

use serde::{Deserialize, Serialize};
use std::fmt;

const ROLE_PREAMBLE: &str = "**Role: Professional, high-end fashion retoucher.** High-quality fashion photography style. Critically important: ";

const KEEP_GARMENT: &str = "**It is absolutely critical to keep the clothing identical in style, type, and color, with NO alterations to the garment's design.**";

const KEEP_SCENE: &str = "You must maintain the model's position, composition, background, facial features, hair color, skin tone, and any text or logos on the clothing or in the background identical.";

const KEEP_SCENE_NO_FACE: &str = "You must maintain the model's position, composition, background, hair color, skin tone, and any text or logos on the clothing or in the background identical.";

/// Requested size class for every item in a batch
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransformSpec {
    ExtraSmall,
    Small,
    Medium,
    ExtraLarge,
    /// Anything else, kept verbatim (trimmed)
    Custom(String),
}

impl TransformSpec {
    /// Resolve a caller-supplied label. Matching is case-insensitive and
    /// collapses internal whitespace; unknown labels become [`TransformSpec::Custom`].
    pub fn parse(label: &str) -> Self {
        let normalized = label
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
            .to_lowercase();

        match normalized.as_str() {
            "xs" | "extra small" | "extra-small" | "size xs" => TransformSpec::ExtraSmall,
            "s" | "small" | "size s" => TransformSpec::Small,
            "m" | "medium" | "size m" => TransformSpec::Medium,
            "xl" | "plus-size" | "plus size" | "extra-large" | "extra large" | "size xl" => {
                TransformSpec::ExtraLarge
            }
            _ => TransformSpec::Custom(label.trim().to_string()),
        }
    }

    /// Short label, as accepted by [`TransformSpec::parse`]
    pub fn label(&self) -> &str {
        match self {
            TransformSpec::ExtraSmall => "xs",
            TransformSpec::Small => "s",
            TransformSpec::Medium => "m",
            TransformSpec::ExtraLarge => "xl",
            TransformSpec::Custom(label) => label,
        }
    }
}

impl fmt::Display for TransformSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Build the upstream edit instruction for a size class
pub fn build_instruction(spec: &TransformSpec) -> String {
    match spec {
        TransformSpec::ExtraSmall => format!(
            "{ROLE_PREAMBLE}Edit this photo to transform the model's body to a **size XS**, making her thinner but maintaining her original height. \
             Make her visibly thinner with a tiny waist, minimal curves, and slender limbs. {KEEP_GARMENT} \
             The outfit must be rendered as a **perfectly fitted size XS garment**, proportional to her new body shape, not loose. {KEEP_SCENE}"
        ),
        TransformSpec::Small => format!(
            "{ROLE_PREAMBLE}Edit this photo to transform the model's body to a **size S**, making her slimmer but maintaining her original height. \
             Make her visibly slender and athletic, with narrow shoulders and **subtle, natural curves**. {KEEP_GARMENT} \
             The outfit must be rendered as a **perfectly fitted size S garment**, with a tailored silhouette appropriate for her new body. {KEEP_SCENE}"
        ),
        TransformSpec::Medium => format!(
            "{ROLE_PREAMBLE}Edit this photo to transform the model's body to a **medium, size M**. \
             Make her appear with balanced proportions and **natural, moderate curves**. {KEEP_GARMENT} \
             The outfit must be rendered as a **size M garment**, with a well-fitted silhouette that's neither too loose nor too tight on her body. {KEEP_SCENE}"
        ),
        TransformSpec::ExtraLarge => format!(
            "{ROLE_PREAMBLE}Edit this photo to transform the model's body to a curvy, plus-size XL. \
             **Increase her overall scale** to make her appear bigger in the frame, including increasing her apparent height slightly to match a larger size. \
             Make her visibly and significantly fuller and wider: give her broad shoulders, thick arms, wider wrists, a fuller bust, a wide waist, curvy hips, and thick thighs and legs. {KEEP_GARMENT} \
             The outfit must be rendered as a **size XL garment**, appearing stretched and tightly fitted over her curves. {KEEP_SCENE_NO_FACE}"
        ),
        TransformSpec::Custom(label) => format!(
            "{ROLE_PREAMBLE}Edit this photo to transform the model's body to a {label} body type, adjusting her scale to match. {KEEP_GARMENT} \
             The outfit must be rendered in the size appropriate for the new body type. {KEEP_SCENE}"
        ),
    }
}
