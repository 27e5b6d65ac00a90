//! Prompt construction for the visual metaphor generator.
//!
//! Pure functions only: identical inputs always produce byte-identical
//! instruction strings, so prompt output is testable and cacheable.

use crate::models::enums::{AnimationLevel, Complexity, VisualStyle};

/// Canvas edge length in pixels.
pub const SVG_SIZE: u32 = 800;

/// Color palette for one visual style.
pub struct StylePalette {
    pub bg: &'static str,
    pub accent: &'static str,
    pub text: &'static str,
    pub muted: &'static str,
}

const LIGHT_PALETTE: StylePalette = StylePalette {
    bg: "#FFFFFF",
    accent: "#DC2626",
    text: "#171717",
    muted: "#737373",
};

const DARK_PALETTE: StylePalette = StylePalette {
    bg: "#0a0a0a",
    accent: "#DC2626",
    text: "#e8e8e8",
    muted: "#666666",
};

/// Palette for the chosen style.
pub fn palette(style: VisualStyle) -> &'static StylePalette {
    match style {
        VisualStyle::Light => &LIGHT_PALETTE,
        VisualStyle::Dark => &DARK_PALETTE,
    }
}

fn complexity_directive(complexity: Complexity) -> &'static str {
    match complexity {
        Complexity::Minimal => "Use 3-5 simple geometric shapes. Maximum 50 lines of SVG code.",
        Complexity::Standard => "Use 5-10 simple geometric shapes. Maximum 100 lines of SVG code.",
        Complexity::Detailed => "Use 10-20 simple geometric shapes. Maximum 150 lines of SVG code.",
    }
}

fn animation_directive(animation: AnimationLevel) -> &'static str {
    match animation {
        AnimationLevel::None => {
            "NO animation at all: omit <animate> elements and CSS @keyframes entirely."
        }
        AnimationLevel::Subtle => {
            "Include 1-2 subtle, slow, low-amplitude CSS animations (keyframes for pulse, glow, expand)."
        }
        AnimationLevel::Active => {
            "Include 3-5 fast, varied CSS animations (keyframes for pulse, glow, expand, rotation)."
        }
    }
}

/// System instruction for the SVG generation call. Deterministic for a
/// fixed (style, complexity, animation) triple.
pub fn system_prompt(
    style: VisualStyle,
    complexity: Complexity,
    animation: AnimationLevel,
) -> String {
    let colors = palette(style);
    let size = SVG_SIZE;

    format!(
        r#"You are a visual metaphor designer specializing in Swiss Design style SVG graphics.

DESIGN SYSTEM:
- Canvas: {size}x{size}px, viewBox="0 0 {size} {size}"
- Background: {bg}
- Primary accent: Swiss Red ({accent})
- Text color: {text}
- Muted color: {muted}
- Typography: IBM Plex Mono, font-size 24px for labels
- Style: Minimal, geometric, clean lines

SVG REQUIREMENTS:
1. Output ONLY valid SVG code, no markdown, no explanation
2. Start with <svg width="{size}" height="{size}" viewBox="0 0 {size} {size}" xmlns="http://www.w3.org/2000/svg">
3. Include <defs> with <style> for CSS animations when animations are allowed
4. Use simple geometric shapes (circles, lines, polygons, rects)
5. {complexity_directive}
6. {animation_directive}
7. NO title text in the SVG

ANIMATION PATTERNS (when allowed):
- Pulse: @keyframes pulse {{ 0%,100% {{ transform: scale(1); }} 50% {{ transform: scale(1.1); }} }}
- Glow: @keyframes glow {{ 0%,100% {{ opacity: 0.5; }} 50% {{ opacity: 1; }} }}
- Expand: use <animate> for radius or size changes

METAPHOR TYPES TO CHOOSE FROM:
- signal_noise: concentric circles + scattered noise dots, central bright core
- exoskeleton: hexagonal frame around pulsing human-like core
- network: nodes connected with lines, some nodes highlighted
- flow: directional arrows or wave patterns
- layers: horizontal stacked rectangles
- growth: ascending bars or branching tree
- portal: nested shapes creating depth illusion
- balance: symmetrical scales or mirrored elements
- compass: directional indicator, navigation metaphor
- dna: double helix pattern for transformation

Choose the most fitting metaphor based on the input concept.

OUTPUT:
Return ONLY the complete SVG code. No explanation, no markdown."#,
        bg = colors.bg,
        accent = colors.accent,
        text = colors.text,
        muted = colors.muted,
        complexity_directive = complexity_directive(complexity),
        animation_directive = animation_directive(animation),
    )
}

/// User instruction embedding the concept text.
pub fn user_prompt(text: &str, complexity: Complexity, animation: AnimationLevel) -> String {
    format!(
        r#"Create a visual metaphor SVG for this concept:

"{text}"

Generate a single SVG that visually represents this idea. Choose the most fitting metaphor type based on the content.
The visual should be immediately understandable and memorable.
{complexity_directive}
{animation_directive}
Do NOT include any title text in the SVG."#,
        complexity_directive = complexity_directive(complexity),
        animation_directive = animation_directive(animation),
    )
}

/// System instruction for the naming sub-call: a two-key JSON object
/// with short bilingual titles.
pub const TITLE_SYSTEM_PROMPT: &str = r#"You are naming visual metaphors.
Return ONLY valid JSON with keys "title" and "titleEn".
Rules:
- "title": Russian, 1-2 words, no punctuation
- "titleEn": English, 1-2 words, no punctuation
- Use Title Case when possible
Example output: {"title":"Экзоскелет","titleEn":"Exoskeleton"}"#;

/// User instruction for the naming sub-call.
pub fn title_user_prompt(text: &str) -> String {
    format!("Concept: \"{text}\"")
}

/// Fallback title: the first two words of the concept text with quote
/// characters stripped. Used when the naming sub-call yields nothing
/// usable for a field.
pub fn derive_title_from_text(text: &str) -> String {
    let cleaned = strip_quotes(text);
    let words: Vec<&str> = cleaned.split_whitespace().take(2).collect();
    if words.is_empty() {
        return "Metaphor".to_string();
    }
    words.join(" ")
}

/// Normalize a model-produced title to at most its first two
/// whitespace-delimited tokens, quotes stripped; empty input yields the
/// fallback.
pub fn normalize_title(title: &str, fallback: &str) -> String {
    let cleaned = strip_quotes(title);
    let words: Vec<&str> = cleaned.split_whitespace().take(2).collect();
    if words.is_empty() {
        return fallback.to_string();
    }
    words.join(" ")
}

fn strip_quotes(value: &str) -> String {
    value.replace(['"', '\'', '`'], "")
}
