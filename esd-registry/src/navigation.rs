//! The navigation trees that node ids come from.
//!
//! Four sections, each a forest of labelled nodes. Leaves are usually
//! registry node ids, but some leaves (coal-to-liquids, refining, the
//! renewable resources) have no dataset yet and resolve to nothing.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{RegistryError, Result};
use crate::Registry;

/// Embedded navigation trees.
pub const NAVIGATION_TREE: &str = include_str!("../../fixtures/navigation_tree.json");

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Section {
    KeyAssumptions,
    Demand,
    Transformation,
    Resources,
}

impl Section {
    pub const ALL: [Section; 4] = [
        Section::KeyAssumptions,
        Section::Demand,
        Section::Transformation,
        Section::Resources,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            Section::KeyAssumptions => "key-assumptions",
            Section::Demand => "demand",
            Section::Transformation => "transformation",
            Section::Resources => "resources",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Section::KeyAssumptions => "关键假设",
            Section::Demand => "需求",
            Section::Transformation => "技术",
            Section::Resources => "资源",
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Section {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Section::ALL
            .iter()
            .copied()
            .find(|sec| sec.key().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("Unknown section: {}", s))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeNode {
    pub id: String,
    pub label: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<TreeNode>,
}

impl TreeNode {
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    fn collect_leaves<'a>(&'a self, out: &mut Vec<&'a str>) {
        if self.is_leaf() {
            out.push(&self.id);
        }
        for child in &self.children {
            child.collect_leaves(out);
        }
    }

    /// Push the chain from `self` down to `id` onto `trail`.
    fn trail_to<'a>(&'a self, id: &str, trail: &mut Vec<&'a TreeNode>) -> bool {
        trail.push(self);
        if self.id == id || self.children.iter().any(|c| c.trail_to(id, trail)) {
            return true;
        }
        trail.pop();
        false
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NavigationTree {
    sections: BTreeMap<Section, Vec<TreeNode>>,
}

impl NavigationTree {
    pub fn builtin() -> Result<Self> {
        Self::from_json("navigation tree", NAVIGATION_TREE)
    }

    pub fn from_json(origin: &str, json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|source| RegistryError::Parse {
            origin: origin.to_string(),
            source,
        })
    }

    /// Top-level nodes of one section.
    pub fn section(&self, section: Section) -> &[TreeNode] {
        self.sections.get(&section).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Chain of nodes from the section root down to `id`, searching sections
    /// in order. Ids reused across sections (`wind`, `hydro`) match the first.
    pub fn path(&self, id: &str) -> Option<(Section, Vec<&TreeNode>)> {
        Section::ALL
            .iter()
            .find_map(|&section| self.path_in(section, id).map(|trail| (section, trail)))
    }

    /// Chain of nodes from the root of `section` down to `id`.
    pub fn path_in(&self, section: Section, id: &str) -> Option<Vec<&TreeNode>> {
        let mut trail = Vec::new();
        let found = self
            .section(section)
            .iter()
            .any(|root| root.trail_to(id, &mut trail));
        found.then_some(trail)
    }

    pub fn find(&self, id: &str) -> Option<&TreeNode> {
        self.path(id).and_then(|(_, trail)| trail.last().copied())
    }

    pub fn section_of(&self, id: &str) -> Option<Section> {
        self.path(id).map(|(section, _)| section)
    }

    /// Leaf ids of one section in display order.
    pub fn leaf_ids(&self, section: Section) -> Vec<&str> {
        let mut leaves = Vec::new();
        for root in self.section(section) {
            root.collect_leaves(&mut leaves);
        }
        leaves
    }

    /// Leaves of every section that the registry cannot resolve.
    pub fn unresolved_leaves(&self, registry: &Registry) -> Vec<(Section, &str)> {
        Section::ALL
            .iter()
            .flat_map(|&section| {
                self.leaf_ids(section)
                    .into_iter()
                    .filter(|id| !registry.contains(id))
                    .map(move |id| (section, id))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tree() -> NavigationTree {
        NavigationTree::builtin().unwrap()
    }

    #[test]
    fn sections_are_loaded() {
        let tree = tree();
        for section in Section::ALL {
            assert!(!tree.section(section).is_empty(), "{}", section);
        }
        assert_eq!(tree.section(Section::KeyAssumptions)[0].id, "macro");
    }

    #[test]
    fn path_to_technology_leaf() {
        let tree = tree();
        let (section, trail) = tree.path("EPLTCOAUSC").unwrap();
        assert_eq!(section, Section::Transformation);
        let ids: Vec<&str> = trail.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec!["power-generation", "coal-power", "coal-no-ccs", "EPLTCOAUSC"]);
    }

    #[test]
    fn reused_ids_resolve_per_section() {
        let tree = tree();
        assert_eq!(tree.section_of("wind"), Some(Section::Transformation));
        assert!(!tree.find("wind").unwrap().is_leaf());

        let trail = tree.path_in(Section::Resources, "wind").unwrap();
        assert_eq!(trail.last().unwrap().label, "风能");
        assert!(trail.last().unwrap().is_leaf());
    }

    #[test]
    fn unknown_ids() {
        let tree = tree();
        assert!(tree.find("nonexistent-node").is_none());
        assert!(tree.path_in(Section::Demand, "ECHPCOA").is_none());
    }

    #[test]
    fn leaves_mostly_resolve() {
        let tree = tree();
        let registry = Registry::builtin().unwrap();

        assert_eq!(
            tree.leaf_ids(Section::Demand),
            vec![
                "agriculture-energy",
                "industry-energy",
                "construction-energy",
                "transportation-energy",
                "service-energy",
                "residential-energy"
            ]
        );

        let unresolved: Vec<&str> = tree
            .unresolved_leaves(&registry)
            .into_iter()
            .map(|(_, id)| id)
            .collect();
        assert_eq!(
            unresolved,
            vec!["CTL", "CTH", "oil-refining", "coking", "wind", "solar", "hydro", "biomass"]
        );
    }

    #[test]
    fn section_keys_round_trip() {
        for section in Section::ALL {
            assert_eq!(section.key().parse::<Section>().unwrap(), section);
        }
        assert!("analysis".parse::<Section>().is_err());
    }
}
