use crate::header::file_header;
use crate::naming::{code_identifier, title_case};
use crate::palette::{Palette, Primitive, Semantic};
use crate::{ColorEmitter, EmitContext};
use tokensync_common::{GeneratedFile, OutputFormat, ReferenceRole};
use tokensync_conventions::{
    DetectedConventions, NamingCase, SwiftContainer, SwiftPrimitiveFormat, SwiftSemanticFormat,
};
use tokensync_core::ColorValue;

const PRIMITIVES_TYPE: &str = "ColorPrimitives";
const SEMANTICS_TYPE: &str = "Colors";

/// SwiftUI emitter producing `ColorPrimitives.swift`, `Colors.swift` and, when the codebase
/// uses one, `ColorStyle.swift`.
pub struct SwiftEmitter;

impl SwiftEmitter {
    pub fn new() -> Self {
        Self
    }

    fn primitives_file(&self, palette: &Palette, ctx: &EmitContext<'_>) -> String {
        let conventions = ctx.conventions;
        let i = &conventions.swift_indent;
        let mut out = file_header(OutputFormat::Swift, "Primitive color palette", ctx.generated_at);
        out.push_str("\nimport SwiftUI\n\n");
        out.push_str(&container_open(conventions, PRIMITIVES_TYPE));

        let blocks: Vec<String> = palette
            .families()
            .into_iter()
            .map(|(family, members)| {
                let mut block = format!("{}// {}\n", i, title_case(family));
                for primitive in members {
                    block.push_str(&format!(
                        "{}static let {} = {}\n",
                        i,
                        swift_identifier(&primitive.words),
                        primitive_literal(&primitive.color, conventions)
                    ));
                }
                block
            })
            .collect();
        out.push_str(&blocks.join("\n"));
        out.push_str("}\n\n");

        match conventions.swift_primitive_format {
            SwiftPrimitiveFormat::HexLiteral => out.push_str(&hex_initializer(i)),
            SwiftPrimitiveFormat::StringHex => out.push_str(&hex_string_initializer(i)),
        }
        out
    }

    fn colors_file(&self, palette: &Palette, ctx: &EmitContext<'_>) -> String {
        let conventions = ctx.conventions;
        let i = &conventions.swift_indent;
        let mut out = file_header(OutputFormat::Swift, "Semantic colors", ctx.generated_at);
        out.push_str("\nimport SwiftUI\n\n");
        out.push_str(&container_open(conventions, SEMANTICS_TYPE));

        for semantic in &palette.semantics {
            let Some((light, dark)) = sides(palette, semantic) else {
                continue;
            };
            if let Some(description) = &semantic.description {
                out.push_str(&format!("{}/// {}\n", i, description));
            }
            let name = swift_identifier(&semantic.words);
            match conventions.swift_semantic_format {
                SwiftSemanticFormat::DynamicInit => {
                    let value = match dark {
                        Some(dark) => format!(
                            "Color(light: {}, dark: {})",
                            color_expression(light, conventions),
                            color_expression(dark, conventions)
                        ),
                        None => color_expression(light, conventions),
                    };
                    out.push_str(&format!("{}static let {} = {}\n", i, name, value));
                }
                SwiftSemanticFormat::LightDarkConstants => match dark {
                    Some(dark) => {
                        out.push_str(&format!(
                            "{}static let {}Light = {}\n",
                            i,
                            name,
                            primitive_ref(light, conventions)
                        ));
                        out.push_str(&format!(
                            "{}static let {}Dark = {}\n",
                            i,
                            name,
                            primitive_ref(dark, conventions)
                        ));
                    }
                    None => out.push_str(&format!(
                        "{}static let {} = {}\n",
                        i,
                        name,
                        primitive_ref(light, conventions)
                    )),
                },
            }
        }
        out.push_str("}\n");

        if conventions.swift_semantic_format == SwiftSemanticFormat::DynamicInit {
            out.push('\n');
            out.push_str(&format!("private extension Color {{\n{i}init(light: Color, dark: Color) {{\n"));
            out.push_str(&dynamic_body(i, "self.init", "light", "dark", 2));
            out.push_str(&format!("{i}}}\n}}\n"));
        }
        out
    }

    /// Fourth tier: `Color` computed properties that resolve through a private helper
    fn color_style_file(&self, palette: &Palette, ctx: &EmitContext<'_>) -> String {
        let conventions = ctx.conventions;
        let i = &conventions.swift_indent;
        let mut out = file_header(OutputFormat::Swift, "Color style accessors", ctx.generated_at);
        out.push_str("\nimport SwiftUI\n\nenum ColorStyle {\n");
        for semantic in &palette.semantics {
            let Some((light, dark)) = sides(palette, semantic) else {
                continue;
            };
            let dark = dark.unwrap_or(light);
            out.push_str(&format!(
                "{}static var {}: Color {{ color({}, {}) }}\n",
                i,
                swift_identifier(&semantic.words),
                color_expression(light, conventions),
                color_expression(dark, conventions)
            ));
        }
        out.push('\n');
        out.push_str(&format!(
            "{i}private static func color(_ light: Color, _ dark: Color) -> Color {{\n"
        ));
        out.push_str(&dynamic_body(i, "Color", "light", "dark", 2));
        out.push_str(&format!("{i}}}\n}}\n"));
        out
    }
}

impl Default for SwiftEmitter {
    fn default() -> Self {
        Self::new()
    }
}

impl ColorEmitter for SwiftEmitter {
    fn format(&self) -> OutputFormat {
        OutputFormat::Swift
    }

    fn emit(&self, palette: &Palette, ctx: &EmitContext<'_>) -> Vec<GeneratedFile> {
        if palette.is_empty() {
            return Vec::new();
        }
        let mut files = vec![
            GeneratedFile::new("ColorPrimitives.swift", self.primitives_file(palette, ctx), OutputFormat::Swift)
                .with_role(ReferenceRole::IosPrimitivesSwift),
            GeneratedFile::new("Colors.swift", self.colors_file(palette, ctx), OutputFormat::Swift)
                .with_role(ReferenceRole::IosColorsSwift),
        ];
        if ctx.conventions.swift_color_style {
            files.push(
                GeneratedFile::new("ColorStyle.swift", self.color_style_file(palette, ctx), OutputFormat::Swift)
                    .with_role(ReferenceRole::IosColorStyleSwift),
            );
        }
        files
    }
}

pub fn swift_identifier(words: &[String]) -> String {
    code_identifier(words, NamingCase::Camel)
}

/// `Color(hex: 0xRRGGBBAA)` or `"#RRGGBB"`
pub fn primitive_literal(color: &ColorValue, conventions: &DetectedConventions) -> String {
    match conventions.swift_primitive_format {
        SwiftPrimitiveFormat::HexLiteral => format!("Color(hex: 0x{})", color.rgba_digits()),
        SwiftPrimitiveFormat::StringHex => {
            format!("\"{}\"", color.web_hex(conventions.hex_case.is_upper()))
        }
    }
}

fn sides<'a>(palette: &'a Palette, semantic: &Semantic) -> Option<(&'a Primitive, Option<&'a Primitive>)> {
    let light = palette.primitive(&semantic.light)?;
    let dark = match &semantic.dark {
        Some(key) => Some(palette.primitive(key)?),
        None => None,
    };
    Some((light, dark))
}

fn container_open(conventions: &DetectedConventions, type_name: &str) -> String {
    match conventions.swift_container {
        SwiftContainer::Enum => format!("enum {} {{\n", type_name),
        SwiftContainer::Extension => "extension Color {\n".to_string(),
    }
}

/// Reference to a primitive constant from another file
fn primitive_ref(primitive: &Primitive, conventions: &DetectedConventions) -> String {
    let owner = match conventions.swift_container {
        SwiftContainer::Enum => PRIMITIVES_TYPE,
        SwiftContainer::Extension => "Color",
    };
    format!("{}.{}", owner, swift_identifier(&primitive.words))
}

/// A primitive as a `Color` value, converting string literals when needed
fn color_expression(primitive: &Primitive, conventions: &DetectedConventions) -> String {
    let reference = primitive_ref(primitive, conventions);
    match conventions.swift_primitive_format {
        SwiftPrimitiveFormat::HexLiteral => reference,
        SwiftPrimitiveFormat::StringHex => format!("Color(hexString: {})", reference),
    }
}

fn dynamic_body(i: &str, init: &str, light: &str, dark: &str, depth: usize) -> String {
    let pad = i.repeat(depth);
    format!(
        "{pad}{init}(uiColor: UIColor {{ traits in\n{pad}{i}traits.userInterfaceStyle == .dark ? UIColor({dark}) : UIColor({light})\n{pad}}})\n"
    )
}

fn rgba_init_lines(i: &str, source: &str) -> String {
    let pad = i.repeat(2);
    format!(
        "{pad}self.init(\n\
         {pad}{i}.sRGB,\n\
         {pad}{i}red: Double(({source} >> 24) & 0xFF) / 255,\n\
         {pad}{i}green: Double(({source} >> 16) & 0xFF) / 255,\n\
         {pad}{i}blue: Double(({source} >> 8) & 0xFF) / 255,\n\
         {pad}{i}opacity: Double({source} & 0xFF) / 255\n\
         {pad})\n"
    )
}

fn hex_initializer(i: &str) -> String {
    format!(
        "private extension Color {{\n{i}init(hex: UInt32) {{\n{}{i}}}\n}}\n",
        rgba_init_lines(i, "hex")
    )
}

fn hex_string_initializer(i: &str) -> String {
    let pad = i.repeat(2);
    format!(
        "extension Color {{\n\
         {i}init(hexString: String) {{\n\
         {pad}let digits = hexString.trimmingCharacters(in: CharacterSet(charactersIn: \"#\"))\n\
         {pad}var value: UInt64 = 0\n\
         {pad}Scanner(string: digits).scanHexInt64(&value)\n\
         {pad}let rgba = digits.count == 8 ? value : (value << 8) | 0xFF\n\
         {}\
         {i}}}\n\
         }}\n",
        rgba_init_lines(i, "rgba")
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{palette_from, scenario_dark, scenario_light};

    fn emit_with(conventions: &DetectedConventions) -> Vec<GeneratedFile> {
        let palette = palette_from(scenario_light(), scenario_dark());
        let ctx = EmitContext {
            conventions,
            generated_at: None,
        };
        SwiftEmitter::new().emit(&palette, &ctx)
    }

    #[test]
    fn test_enum_hex_literal_dynamic_init() {
        let files = emit_with(&DetectedConventions::best_practice());
        assert_eq!(files.len(), 2);
        assert!(files[0].content.contains("enum ColorPrimitives {\n    // Grey\n    static let grey50 = Color(hex: 0xF5F5F5FF)\n"));
        assert!(files[0].content.contains("private extension Color {\n    init(hex: UInt32) {"));
        assert!(files[1].content.contains(
            "    static let textPrimary = Color(light: ColorPrimitives.grey750, dark: ColorPrimitives.grey50)\n"
        ));
        assert!(files[1].content.contains("init(light: Color, dark: Color)"));
    }

    #[test]
    fn test_extension_string_hex_light_dark_constants() {
        let mut conventions = DetectedConventions::best_practice();
        conventions.swift_container = SwiftContainer::Extension;
        conventions.swift_primitive_format = SwiftPrimitiveFormat::StringHex;
        conventions.swift_semantic_format = SwiftSemanticFormat::LightDarkConstants;
        conventions.swift_indent = "  ".to_string();
        let files = emit_with(&conventions);
        assert!(files[0].content.contains("extension Color {\n  // Grey\n  static let grey50 = \"#f5f5f5\"\n"));
        assert!(files[1].content.contains("  static let textPrimaryLight = Color.grey750\n"));
        assert!(files[1].content.contains("  static let textPrimaryDark = Color.grey50\n"));
        assert!(!files[1].content.contains("init(light:"));
    }

    #[test]
    fn test_color_style_tier_is_optional() {
        let mut conventions = DetectedConventions::best_practice();
        conventions.swift_color_style = true;
        let files = emit_with(&conventions);
        assert_eq!(files.len(), 3);
        assert_eq!(files[2].filename, "ColorStyle.swift");
        assert!(files[2].content.contains(
            "static var textPrimary: Color { color(ColorPrimitives.grey750, ColorPrimitives.grey50) }"
        ));
        assert!(files[2].content.contains("private static func color(_ light: Color, _ dark: Color) -> Color {"));
    }

    #[test]
    fn test_translucent_color_puts_alpha_last() {
        let c = 29.0 / 255.0;
        let color = ColorValue::from_components([c, c, c], 0.5);
        let literal = primitive_literal(&color, &DetectedConventions::best_practice());
        assert_eq!(literal, "Color(hex: 0x1D1D1D80)");
    }
}
