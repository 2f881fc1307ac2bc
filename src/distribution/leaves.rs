//! Leaf Resolver

use super::tree::ContainerTree;

/// Collect arena indices of nodes that hold objects directly, in DFS order.
///
/// A node is a leaf when it has no children or its type is a leaf type.
/// Each node is visited at most once, so a cyclic parent chain terminates.
pub fn find_leaf_nodes(tree: &ContainerTree<'_>) -> Vec<usize> {
    let mut leaves = Vec::new();
    let mut visited = vec![false; tree.len()];
    let mut stack: Vec<usize> = tree.roots().iter().rev().copied().collect();

    while let Some(index) = stack.pop() {
        if std::mem::replace(&mut visited[index], true) {
            log::warn!(
                "container {} reached twice during leaf search",
                tree.node(index).container.id
            );
            continue;
        }

        let node = tree.node(index);
        if node.children.is_empty() || node.container.is_leaf_container() {
            leaves.push(index);
        } else {
            stack.extend(node.children.iter().rev());
        }
    }

    leaves
}

/// Leaf nodes, or every container when no leaf is reachable
pub fn resolve_targets(tree: &ContainerTree<'_>) -> Vec<usize> {
    let leaves = find_leaf_nodes(tree);
    if leaves.is_empty() {
        (0..tree.len()).collect()
    } else {
        leaves
    }
}
