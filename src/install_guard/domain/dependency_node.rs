use super::PackageRef;
use std::collections::{BTreeMap, HashSet};

/// One node of a resolved dependency tree.
///
/// A node for a key already visited elsewhere in the same scan is a stub:
/// it carries no children because that subtree is represented where it was
/// first fetched.
#[derive(Debug, Clone, PartialEq)]
pub struct DependencyNode {
    package: PackageRef,
    children: BTreeMap<String, DependencyNode>,
    stub: bool,
}

impl DependencyNode {
    pub fn new(package: PackageRef) -> Self {
        Self {
            package,
            children: BTreeMap::new(),
            stub: false,
        }
    }

    pub fn stub(package: PackageRef) -> Self {
        Self {
            package,
            children: BTreeMap::new(),
            stub: true,
        }
    }

    pub fn package(&self) -> &PackageRef {
        &self.package
    }

    pub fn children(&self) -> &BTreeMap<String, DependencyNode> {
        &self.children
    }

    pub fn is_stub(&self) -> bool {
        self.stub
    }

    /// Attaches a child under its package name. A later child with the same
    /// name replaces the earlier one.
    pub fn attach(&mut self, child: DependencyNode) {
        self.children
            .insert(child.package.name().to_string(), child);
    }

    /// Gives stubs the version their key finally resolved to.
    ///
    /// A stub is created for the key as requested, which for a dist-tag or a
    /// range may not be the version the first visit settled on.
    pub fn resolve_stubs(&mut self, resolution: &impl Fn(&str) -> Option<String>) {
        if self.stub {
            if let Some(version) = resolution(&self.package.key()) {
                self.package = self.package.with_version(version);
            }
        }
        for child in self.children.values_mut() {
            child.resolve_stubs(resolution);
        }
    }

    /// Total number of nodes in this tree, stubs included.
    pub fn node_count(&self) -> usize {
        1 + self
            .children
            .values()
            .map(DependencyNode::node_count)
            .sum::<usize>()
    }

    /// Serializes the tree into `name@version` keys with duplicates removed.
    ///
    /// Keys appear in pre-order of first occurrence.
    pub fn flatten(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        let mut keys = Vec::new();
        let mut stack = vec![self];

        while let Some(node) = stack.pop() {
            let key = node.package.key();
            if seen.insert(key.clone()) {
                keys.push(key);
            }
            // Reverse so the first child is popped first.
            stack.extend(node.children.values().rev());
        }

        keys
    }
}
