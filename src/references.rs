//! Reference file discovery: maps existing token sources in a codebase to the roles they fill.

use anyhow::{Context, Result};
use globset::{Glob, GlobBuilder, GlobSet, GlobSetBuilder};
use ignore::WalkBuilder;
use std::fs;
use std::path::{Path, PathBuf};
use tokensync_common::{ReferenceRole, ReferenceSet};
use tracing::{debug, info, warn};

/// File-name patterns per role, checked in order; the first match wins.
const ROLE_PATTERNS: &[(&str, ReferenceRole)] = &[
    ("*primitive*.scss", ReferenceRole::WebPrimitivesScss),
    ("*typography*.scss", ReferenceRole::WebTypographyScss),
    ("*colo*r*.scss", ReferenceRole::WebColorsScss),
    ("*primitive*.css", ReferenceRole::WebPrimitivesCss),
    ("*spacing*.css", ReferenceRole::WebSpacingCss),
    ("*colo*r*.css", ReferenceRole::WebColorsCss),
    ("*primitive*.ts", ReferenceRole::WebPrimitivesTs),
    ("*colo*r*.ts", ReferenceRole::WebColorsTs),
    ("*primitive*.swift", ReferenceRole::IosPrimitivesSwift),
    ("*colorstyle*.swift", ReferenceRole::IosColorStyleSwift),
    ("*typography*.swift", ReferenceRole::IosTypographySwift),
    ("*colo*r*.swift", ReferenceRole::IosColorsSwift),
    ("*primitive*.kt", ReferenceRole::AndroidPrimitivesKotlin),
    ("*typography*.kt", ReferenceRole::AndroidTypographyKotlin),
    ("*colo*r*.kt", ReferenceRole::AndroidColorsKotlin),
];

/// Configuration for reference discovery
#[derive(Debug, Clone)]
pub struct ReferenceDiscovery {
    pub max_file_size: u64,
    pub ignore_patterns: Vec<String>,
}

impl Default for ReferenceDiscovery {
    fn default() -> Self {
        Self {
            max_file_size: 512 * 1024, // 512KB
            ignore_patterns: vec![
                "**/node_modules/**".to_string(),
                "**/build/**".to_string(),
                "**/dist/**".to_string(),
                "**/.git/**".to_string(),
                "**/*.min.css".to_string(),
                "**/*.d.ts".to_string(),
            ],
        }
    }
}

/// Reference files found under one directory
#[derive(Debug, Default)]
pub struct DiscoveredReferences {
    pub references: ReferenceSet,
    pub files: Vec<(ReferenceRole, PathBuf)>,
}

impl ReferenceDiscovery {
    /// Walks `root` (honouring .gitignore) and groups matching files by role. Several files
    /// with one role are concatenated in path order.
    pub fn discover(&self, root: &Path) -> Result<DiscoveredReferences> {
        if !root.is_dir() {
            anyhow::bail!("Reference path is not a directory: {:?}", root);
        }
        let roles = role_matcher()?;
        let ignored = build_globset(&self.ignore_patterns)?;

        let mut found: Vec<(ReferenceRole, PathBuf)> = Vec::new();
        for entry in WalkBuilder::new(root).git_ignore(true).hidden(true).build() {
            let entry = match entry {
                Ok(e) => e,
                Err(err) => {
                    warn!("Error walking directory: {}", err);
                    continue;
                }
            };
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            let relative = path.strip_prefix(root).unwrap_or(path);
            if ignored.is_match(relative) {
                continue;
            }
            let Some(role) = role_for(&roles, path) else {
                continue;
            };
            match fs::metadata(path) {
                Ok(meta) if meta.len() > self.max_file_size => {
                    debug!("Skipping large reference file {:?} ({} bytes)", path, meta.len());
                }
                Ok(_) => found.push((role, path.to_path_buf())),
                Err(err) => warn!("Error reading metadata for {:?}: {}", path, err),
            }
        }
        found.sort_by(|a, b| a.0.cmp(&b.0).then_with(|| a.1.cmp(&b.1)));

        let mut discovered = DiscoveredReferences::default();
        for (role, path) in found {
            let content = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read reference file {:?}", path))?;
            let merged = match discovered.references.get(role) {
                Some(existing) => format!("{}\n{}", existing, content),
                None => content,
            };
            discovered.references.insert(role, merged);
            discovered.files.push((role, path));
        }
        info!(
            "Discovered {} reference file(s) for {} role(s) under {:?}",
            discovered.files.len(),
            discovered.references.files.len(),
            root
        );
        Ok(discovered)
    }
}

fn role_matcher() -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for (pattern, _) in ROLE_PATTERNS {
        let glob = GlobBuilder::new(pattern)
            .case_insensitive(true)
            .build()
            .with_context(|| format!("invalid role pattern '{}'", pattern))?;
        builder.add(glob);
    }
    builder.build().context("failed to build role glob set")
}

fn build_globset(patterns: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let glob = Glob::new(pattern).with_context(|| format!("invalid glob pattern '{}'", pattern))?;
        builder.add(glob);
    }
    builder.build().context("failed to build ignore glob set")
}

/// Role of a file by its name; the earliest pattern wins
fn role_for(roles: &GlobSet, path: &Path) -> Option<ReferenceRole> {
    let name = path.file_name()?;
    let index = roles.matches(name).into_iter().min()?;
    Some(ROLE_PATTERNS[index].1)
}

/// Parses a `role=path` argument
pub fn parse_reference_arg(arg: &str) -> Result<(ReferenceRole, PathBuf)> {
    let (role, path) = arg
        .split_once('=')
        .with_context(|| format!("Expected role=path, got '{}'", arg))?;
    let role = ReferenceRole::from_key(role).with_context(|| format!("Unknown reference role '{}'", role))?;
    Ok((role, PathBuf::from(path.trim())))
}
