use crate::dedup::WarningDeduplicator;
use crate::lint::Linter;
use crate::request::{Category, GenerationConfig, GenerationOutput, GenerationRequest};
use serde_json::{json, Value};
use tokensync_analyzer::DiffAnalyzer;
use tokensync_common::{GeneratedFile, Platform, ReferenceSet, Result, TokenSyncError, Warning, WarningKind};
use tokensync_conventions::{ConventionDetector, DetectedConventions};
use tokensync_core::{normalize, CycleReport, TokenGraph, TokenTree, UnknownTypeCounts};
use tokensync_emitters::composite::{BorderKind, GradientKind, MotionKind, OpacityKind, RadiusKind, ShadowKind};
use tokensync_emitters::{
    emit_colors, emit_composite, CompositeKind, CompositeSources, EmitContext, Palette, PaletteSources,
    SpacingKind, TypographyEmitter,
};
use tracing::{debug, info, warn};

/// Parsed token trees of one request
struct Inputs {
    light: TokenTree,
    dark: TokenTree,
    values: TokenTree,
    typography: Option<TokenTree>,
    primitives: Option<TokenTree>,
}

impl Inputs {
    fn parse(request: &GenerationRequest) -> Result<Self> {
        Ok(Self {
            light: parse_tree("light", &request.light)?,
            dark: parse_tree("dark", &request.dark)?,
            values: parse_tree("values", &request.values)?,
            typography: request
                .typography
                .as_ref()
                .map(|raw| parse_tree("typography", raw))
                .transpose()?,
            primitives: request
                .primitives
                .as_ref()
                .map(|raw| parse_tree("primitives", raw))
                .transpose()?,
        })
    }

    /// Labelled trees; primitives first so they win graph conflicts
    fn labelled(&self) -> Vec<(&'static str, &TokenTree)> {
        let mut trees = Vec::new();
        if let Some(primitives) = &self.primitives {
            trees.push(("primitives", primitives));
        }
        trees.push(("light", &self.light));
        trees.push(("dark", &self.dark));
        trees.push(("values", &self.values));
        if let Some(typography) = &self.typography {
            trees.push(("typography", typography));
        }
        trees
    }

    /// Graph of the primitives (when supplied) under one tree
    fn layered_graph(&self, tree: &TokenTree) -> TokenGraph {
        let mut trees = Vec::new();
        if let Some(primitives) = &self.primitives {
            trees.push(primitives);
        }
        trees.push(tree);
        TokenGraph::build(&trees)
    }
}

fn parse_tree(label: &str, raw: &Value) -> Result<TokenTree> {
    let normalized = normalize(raw);
    TokenTree::from_json(&normalized).map_err(|err| match err {
        TokenSyncError::InvalidInput(msg) => TokenSyncError::InvalidInput(format!("{} tokens: {}", label, msg)),
        other => other,
    })
}

/// Token generator - runs normalize, graph, detect, emit and analyze for one request
pub struct Generator {
    detector: ConventionDetector,
    analyzer: DiffAnalyzer,
    linter: Linter,
}

impl Generator {
    pub fn new() -> Self {
        Self {
            detector: ConventionDetector::new(),
            analyzer: DiffAnalyzer::new(),
            linter: Linter::new(),
        }
    }

    /// Conventions for a reference set, with the config's overrides applied. Low overall
    /// confidence is reported as an advisory warning.
    pub fn detect(
        &self,
        references: &ReferenceSet,
        force_best_practice: bool,
        config: &GenerationConfig,
    ) -> (DetectedConventions, Vec<Warning>) {
        let mut conventions = self.detector.detect(references, force_best_practice);
        if let Some(package) = &config.kotlin_package {
            conventions.kotlin_package = package.clone();
        }

        let mut warnings = Vec::new();
        if !conventions.is_best_practice() && conventions.overall_confidence < config.confidence_threshold {
            let weak: Vec<Value> = conventions
                .weak_dimensions(config.confidence_threshold)
                .into_iter()
                .map(|(dimension, score)| json!({ "dimension": dimension.to_string(), "confidence": score }))
                .collect();
            warn!(
                "Convention detection confidence {:.2} is below {:.2}",
                conventions.overall_confidence, config.confidence_threshold
            );
            warnings.push(
                Warning::new(
                    WarningKind::LowConfidence,
                    format!(
                        "Detected conventions have low confidence ({:.0}%); review the output or use best-practice mode",
                        conventions.overall_confidence * 100.0
                    ),
                )
                .with_detail(json!({ "overall": conventions.overall_confidence, "dimensions": weak })),
            );
        }
        (conventions, warnings)
    }

    pub fn generate(&self, request: &GenerationRequest) -> Result<GenerationOutput> {
        let config = &request.config;
        let inputs = Inputs::parse(request)?;
        let labelled = inputs.labelled();
        let mut warnings = self.input_warnings(&labelled);

        let graph_trees: Vec<&TokenTree> = labelled.iter().map(|(_, tree)| *tree).collect();
        let graph = TokenGraph::build(&graph_trees);
        let light_graph = inputs.layered_graph(&inputs.light);
        let dark_graph = inputs.layered_graph(&inputs.dark);

        // The merged graph keeps one edge per path, so every tree is also searched on its own
        let mut reports = vec![graph.detect_cycles(), light_graph.detect_cycles(), dark_graph.detect_cycles()];
        reports.extend(
            labelled
                .iter()
                .filter(|(label, _)| !matches!(*label, "primitives" | "light" | "dark"))
                .map(|(_, tree)| inputs.layered_graph(tree).detect_cycles()),
        );
        let cycles = CycleReport::merged(reports);
        if cycles.has_cycles {
            warn!("Found {} alias cycle(s)", cycles.cycles.len());
        }
        for (chain, cycle) in cycles.chains().into_iter().zip(&cycles.cycles) {
            warnings.push(
                Warning::new(WarningKind::Cycle, format!("Alias cycle: {}", chain)).with_detail(json!(cycle)),
            );
        }

        let (conventions, detect_warnings) = self.detect(&request.references, request.force_best_practice, config);
        warnings.extend(detect_warnings);
        info!(
            "Using {:?} conventions (confidence {:.2})",
            conventions.source, conventions.overall_confidence
        );

        let timestamp = request.generated_at.as_deref().filter(|_| config.include_timestamp);
        let ctx = EmitContext::new(&conventions).with_timestamp(timestamp);
        let platforms = &request.platforms;
        let max_depth = config.max_alias_depth;
        let mut files = Vec::new();

        let palette = if request.wants(Category::Colors) {
            if inputs.light.is_empty() {
                warnings.push(Warning::new(
                    WarningKind::MissingCategory,
                    "Colors were requested but the light tree has no tokens",
                ));
            }
            let (palette, palette_warnings) = Palette::collect(&PaletteSources {
                light: &inputs.light,
                dark: &inputs.dark,
                primitives: inputs.primitives.as_ref(),
                light_graph: &light_graph,
                dark_graph: &dark_graph,
                max_depth,
            });
            warnings.extend(palette_warnings);
            files.extend(emit_colors(&palette, platforms, &ctx));
            palette
        } else {
            Palette::default()
        };
        warnings.extend(self.linter.lint(&labelled, &palette));

        if request.wants(Category::Typography) {
            match &inputs.typography {
                Some(typography) => {
                    let sources = CompositeSources {
                        trees: vec![typography],
                        graph: &graph,
                        max_depth,
                    };
                    let (typography_files, typography_warnings) =
                        TypographyEmitter::new().emit(&sources, platforms, &ctx);
                    files.extend(typography_files);
                    warnings.extend(typography_warnings);
                }
                None => warnings.push(Warning::new(
                    WarningKind::MissingCategory,
                    "Typography was requested but no typography tokens were supplied",
                )),
            }
        }

        if request.wants(Category::Spacing) {
            let sources = CompositeSources {
                trees: vec![&inputs.values],
                graph: &graph,
                max_depth,
            };
            files.extend(emit_composite(&SpacingKind, &sources, platforms, &ctx));
        }

        if request.wants(Category::Effects) {
            let mut trees = vec![&inputs.values];
            trees.extend(inputs.typography.as_ref());
            let sources = CompositeSources {
                trees,
                graph: &graph,
                max_depth,
            };
            files.extend(effect_files(&RadiusKind, &sources, platforms, &ctx));
            files.extend(effect_files(&OpacityKind, &sources, platforms, &ctx));
            files.extend(effect_files(&ShadowKind, &sources, platforms, &ctx));
            files.extend(effect_files(&BorderKind, &sources, platforms, &ctx));
            files.extend(effect_files(&GradientKind, &sources, platforms, &ctx));
            files.extend(effect_files(&MotionKind, &sources, platforms, &ctx));
        }

        attach_references(&mut files, &request.references);
        WarningDeduplicator::deduplicate(&mut warnings);

        let analysis = if request.references.is_empty() {
            Vec::new()
        } else {
            self.analyzer.analyze_files(&files, &request.references)
        };
        let consistency = self.analyzer.analyze_consistency(&files);

        info!(
            "Generated {} files with {} warnings ({} analysed against references)",
            files.len(),
            warnings.len(),
            analysis.len()
        );

        Ok(GenerationOutput {
            files,
            warnings,
            conventions,
            analysis,
            consistency,
        })
    }

    /// Skipped leaves and unknown types across all inputs
    fn input_warnings(&self, labelled: &[(&'static str, &TokenTree)]) -> Vec<Warning> {
        let mut warnings = Vec::new();
        let mut unknown = UnknownTypeCounts::new();
        for (label, tree) in labelled {
            let mut malformed = 0;
            tree.walk_with_unknown(
                |_, node| {
                    if node.token_type.is_known() && node.value.is_malformed() {
                        malformed += 1;
                    }
                },
                &mut unknown,
            );
            let skipped = tree.skipped + malformed;
            if skipped > 0 {
                debug!("{} tokens: {} skipped leaves", label, skipped);
                warnings.push(
                    Warning::new(
                        WarningKind::SkippedToken,
                        format!("Skipped {} malformed token(s) in {} tokens", skipped, label),
                    )
                    .with_detail(json!({ "tree": label, "count": skipped })),
                );
            }
        }
        for (token_type, count) in unknown {
            warnings.push(
                Warning::new(
                    WarningKind::UnknownType,
                    format!("Skipped {} token(s) with unknown type {}", count, token_type),
                )
                .with_detail(json!({ "type": token_type, "count": count })),
            );
        }
        warnings
    }
}

impl Default for Generator {
    fn default() -> Self {
        Self::new()
    }
}

fn effect_files<K: CompositeKind>(
    kind: &K,
    sources: &CompositeSources<'_>,
    platforms: &[Platform],
    ctx: &EmitContext<'_>,
) -> Vec<GeneratedFile> {
    let files = emit_composite(kind, sources, platforms, ctx);
    debug!("{} emitter produced {} files", kind.word(), files.len());
    files
}

/// Pairs every generated file with the reference text of the role it fills
fn attach_references(files: &mut [GeneratedFile], references: &ReferenceSet) {
    for file in files.iter_mut() {
        if let Some(content) = file.role.and_then(|role| references.get(role)) {
            file.reference_content = Some(content.to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokensync_common::ReferenceRole;
    use tokensync_core::{alias_extensions, ColorValue};

    fn request() -> GenerationRequest {
        GenerationRequest::new(json!({}), json!({}), json!({}))
    }

    fn color(hex: &str) -> Value {
        json!({"$type": "color", "$value": ColorValue::from_hex(hex).unwrap().to_json()})
    }

    fn alias(target: &str, hex: &str) -> Value {
        json!({
            "$type": "color",
            "$value": ColorValue::from_hex(hex).unwrap().to_json(),
            "$extensions": alias_extensions(target)
        })
    }

    fn colors_request(light: Value, dark: Value) -> GenerationRequest {
        GenerationRequest::new(light, dark, json!({}))
            .with_platforms(vec![Platform::Web])
            .with_categories(vec![Category::Colors])
    }

    #[test]
    fn test_non_object_input_is_rejected() {
        let mut bad = request();
        bad.dark = json!([1, 2]);
        let err = Generator::new().generate(&bad).unwrap_err();
        assert!(err.to_string().contains("dark tokens"));
    }

    #[test]
    fn test_empty_input_is_not_an_error() {
        let output = Generator::new().generate(&request()).unwrap();
        assert!(output.files.is_empty());
        let kinds: Vec<WarningKind> = output.warnings.iter().map(|w| w.kind).collect();
        assert_eq!(kinds, vec![WarningKind::MissingCategory, WarningKind::MissingCategory]);
    }

    #[test]
    fn test_kotlin_package_override() {
        let config = GenerationConfig {
            kotlin_package: Some("com.acme.tokens".to_string()),
            ..GenerationConfig::default()
        };
        let (conventions, warnings) = Generator::new().detect(&ReferenceSet::new(), false, &config);
        assert_eq!(conventions.kotlin_package, "com.acme.tokens");
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_unknown_and_malformed_tokens_are_reported() {
        let mut req = request().with_categories(vec![Category::Spacing]);
        req.values = json!({
            "Integer": {
                "4": {"$type": "number", "$value": 4},
                "bad": {"$type": "number", "$value": "wide"},
                "odd": {"$type": "sparkle", "$value": 1}
            }
        });
        let output = Generator::new().generate(&req).unwrap();
        let skipped = output.warnings.iter().find(|w| w.kind == WarningKind::SkippedToken).unwrap();
        assert_eq!(skipped.detail.as_ref().unwrap()["count"], 1);
        let unknown = output.warnings.iter().find(|w| w.kind == WarningKind::UnknownType).unwrap();
        assert_eq!(unknown.detail.as_ref().unwrap()["type"], "sparkle");
    }

    #[test]
    fn test_reference_content_attached_by_role() {
        let mut files = vec![
            GeneratedFile::new("Colors.scss", String::new(), tokensync_common::OutputFormat::Scss)
                .with_role(ReferenceRole::WebColorsScss),
            GeneratedFile::new("Shadow.scss", String::new(), tokensync_common::OutputFormat::Scss),
        ];
        let refs = ReferenceSet::new().with(ReferenceRole::WebColorsScss, "$a: #fff;");
        attach_references(&mut files, &refs);
        assert_eq!(files[0].reference_content.as_deref(), Some("$a: #fff;"));
        assert!(files[1].reference_content.is_none());
    }

    #[test]
    fn test_dark_only_cycle_is_reported() {
        let req = colors_request(
            json!({"A": {"x": alias("Colour/Grey/0", "#ffffff"), "y": alias("Colour/Grey/0", "#ffffff")}}),
            json!({"A": {"x": alias("A/y", "#000000"), "y": alias("A/x", "#000000")}}),
        );
        let output = Generator::new().generate(&req).unwrap();
        let cycles: Vec<&Warning> = output.warnings.iter().filter(|w| w.kind == WarningKind::Cycle).collect();
        assert_eq!(cycles.len(), 1);
        assert_eq!(cycles[0].detail, Some(json!(["A/x", "A/y", "A/x"])));

        let colors = &output.file("Colors.scss").unwrap().content;
        assert!(colors.contains("--a-x: light-dark(#{$grey-0}, #{$grey-0});"));
    }

    #[test]
    fn test_dark_alias_chain_resolves_through_dark_tree() {
        let req = colors_request(
            json!({
                "Surface": {"primary": alias("Colour/Grey/0", "#ffffff")},
                "Button": {"bg": alias("Surface/primary", "#ffffff")}
            }),
            json!({
                "Surface": {"primary": alias("Colour/Grey/900", "#111111")},
                "Button": {"bg": alias("Surface/primary", "#111111")}
            }),
        )
        .with_primitives(json!({"Colour": {"Grey": {"0": color("#ffffff"), "900": color("#111111")}}}));
        let output = Generator::new().generate(&req).unwrap();
        assert!(output.warnings.iter().all(|w| w.kind != WarningKind::Cycle));

        let colors = &output.file("Colors.scss").unwrap().content;
        assert!(colors.contains("--surface-primary: light-dark(#{$grey-0}, #{$grey-900});"));
        assert!(colors.contains("--button-bg: light-dark(#{$grey-0}, #{$grey-900});"));
    }
}
