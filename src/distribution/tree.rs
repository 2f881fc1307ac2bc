//! Container Tree Builder
//!
//! Rebuilds the parent/child hierarchy of one collection from its flat
//! container list. Nodes live in an arena and refer to each other by index.

use std::collections::HashMap;

use crate::domain::{Container, ContainerId};

/// A container with its capacity figures, valid for one planning call
#[derive(Debug, Clone)]
pub struct ContainerNode<'a> {
    pub container: &'a Container,
    pub used_capacity: f64,
    pub total_capacity: f64,
    /// Arena indices of child nodes
    pub children: Vec<usize>,
}

#[derive(Debug, Clone)]
pub struct ContainerTree<'a> {
    nodes: Vec<ContainerNode<'a>>,
    roots: Vec<usize>,
}

impl<'a> ContainerTree<'a> {
    /// Build the forest. A container whose parent is not in `containers`
    /// is neither a root nor anyone's child, so it is unreachable.
    pub fn build(containers: &'a [Container]) -> Self {
        let mut index: HashMap<&ContainerId, usize> = HashMap::with_capacity(containers.len());
        let mut nodes: Vec<ContainerNode<'a>> = containers
            .iter()
            .enumerate()
            .map(|(i, container)| {
                index.insert(&container.id, i);
                ContainerNode {
                    container,
                    used_capacity: container.used_capacity(),
                    total_capacity: container.total_capacity(),
                    children: Vec::new(),
                }
            })
            .collect();

        let mut roots = Vec::new();
        let mut orphans = 0usize;
        for (i, container) in containers.iter().enumerate() {
            match &container.parent_id {
                None => roots.push(i),
                Some(parent_id) => match index.get(parent_id) {
                    Some(&parent) => nodes[parent].children.push(i),
                    None => orphans += 1,
                },
            }
        }

        if orphans > 0 {
            log::debug!("{} container(s) reference a parent outside the collection", orphans);
        }

        Self { nodes, roots }
    }

    pub fn nodes(&self) -> &[ContainerNode<'a>] {
        &self.nodes
    }

    pub fn node(&self, index: usize) -> &ContainerNode<'a> {
        &self.nodes[index]
    }

    pub fn roots(&self) -> &[usize] {
        &self.roots
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
