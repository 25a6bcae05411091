//! Helpers shared by the SCSS, CSS and TypeScript emitters.

use crate::naming::{ensure_identifier, web_name};
use crate::palette::{Palette, Primitive};
use tokensync_conventions::{DetectedConventions, ImportStyle};
use tokensync_core::ColorValue;

/// Identifier body used for `$name` and `--name`
pub fn web_identifier(words: &[String], conventions: &DetectedConventions) -> String {
    ensure_identifier(web_name(words, conventions.separator)).0
}

pub fn web_color(color: &ColorValue, conventions: &DetectedConventions) -> String {
    color.web_hex(conventions.hex_case.is_upper())
}

/// Exact SCSS import line for the primitives module
pub fn scss_import(style: ImportStyle) -> &'static str {
    match style {
        ImportStyle::Use => "@use './Primitives.scss' as *;",
        ImportStyle::Import => "@import './Primitives';",
    }
}

/// Identifier of a primitive key, or `None` when the palette does not know it
pub fn primitive_name(palette: &Palette, key: &str, conventions: &DetectedConventions) -> Option<String> {
    palette
        .primitive(key)
        .map(|p| web_identifier(&p.words, conventions))
}

/// `@property` registration for a color custom property
pub fn property_block(name: &str, initial: &str, indent: &str) -> String {
    format!(
        "@property --{} {{\n{i}syntax: '<color>';\n{i}inherits: true;\n{i}initial-value: {};\n}}\n",
        name,
        initial,
        i = indent
    )
}

/// Renders primitives family by family, each group headed by `comment(title)`.
pub fn family_blocks<F, C>(palette: &Palette, comment: C, mut line: F) -> Vec<String>
where
    C: Fn(&str) -> String,
    F: FnMut(&Primitive) -> String,
{
    palette
        .families()
        .into_iter()
        .map(|(family, members)| {
            let mut block = comment(&crate::naming::title_case(family));
            for primitive in members {
                block.push_str(&line(primitive));
            }
            block
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scss_import_exact_text() {
        assert_eq!(scss_import(ImportStyle::Use), "@use './Primitives.scss' as *;");
        assert_eq!(scss_import(ImportStyle::Import), "@import './Primitives';");
    }

    #[test]
    fn test_web_color_follows_hex_case() {
        let mut conventions = DetectedConventions::best_practice();
        let color = ColorValue::from_hex("#0A84FF").unwrap();
        assert_eq!(web_color(&color, &conventions), "#0a84ff");
        conventions.hex_case = tokensync_conventions::HexCase::Upper;
        assert_eq!(web_color(&color, &conventions), "#0A84FF");
    }
}
