//! Rename detection: a removed token and an added token carrying the same color.

use crate::extract::Declaration;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rename {
    pub from: String,
    pub to: String,
    pub value: String,
}

/// Two or more renames that all move one name family to another (`grey-*` to `gray-*`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FamilyRename {
    pub from: String,
    pub to: String,
    pub members: Vec<Rename>,
}

/// Pairs each removed name with the first unclaimed added name of the same color.
/// Names with no color value never pair.
pub fn detect_renames(
    removed: &[String],
    added: &[String],
    generated: &[Declaration],
    reference: &[Declaration],
) -> Vec<Rename> {
    let color_of = |decls: &[Declaration], name: &str| {
        decls
            .iter()
            .find(|d| d.canonical == name)
            .and_then(|d| d.color.clone())
    };

    let mut claimed = HashSet::new();
    let mut renames = Vec::new();
    for old in removed {
        let Some(color) = color_of(reference, old.as_str()) else {
            continue;
        };
        let candidate = added
            .iter()
            .find(|new| !claimed.contains(new.as_str()) && color_of(generated, new.as_str()).as_ref() == Some(&color));
        if let Some(new) = candidate {
            claimed.insert(new.as_str());
            renames.push(Rename {
                from: old.clone(),
                to: new.clone(),
                value: color,
            });
        }
    }
    renames
}

/// Name family: the canonical name without trailing numeric words
pub fn family_of(canonical: &str) -> String {
    let words: Vec<&str> = canonical.split('-').collect();
    let keep = words
        .iter()
        .rposition(|w| !w.chars().all(|c| c.is_ascii_digit()))
        .map(|i| i + 1)
        .unwrap_or(words.len());
    words[..keep].join("-")
}

fn suffix_of(canonical: &str, family: &str) -> String {
    canonical[family.len()..].to_string()
}

pub fn cluster_family_renames(renames: &[Rename]) -> Vec<FamilyRename> {
    let mut groups: BTreeMap<(String, String), Vec<Rename>> = BTreeMap::new();
    for rename in renames {
        let from = family_of(&rename.from);
        let to = family_of(&rename.to);
        if from == to || suffix_of(&rename.from, &from) != suffix_of(&rename.to, &to) {
            continue;
        }
        groups.entry((from, to)).or_default().push(rename.clone());
    }
    groups
        .into_iter()
        .filter(|(_, members)| members.len() >= 2)
        .map(|((from, to), members)| FamilyRename { from, to, members })
        .collect()
}
