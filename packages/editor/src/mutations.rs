//! # Tree Mutations
//!
//! Path-addressed semantic operations on the source tree.
//!
//! ## Design
//!
//! 1. **Intent-preserving**: each mutation is one semantic operation
//! 2. **Validated**: `validate` checks targets before `apply` touches the tree
//! 3. **Minimal**: no generic "replace subtree" escape hatch
//!
//! Mutations address nodes by [`NodePath`], so a serialized mutation stays
//! meaningful across processes as long as the document shape is unchanged.

use pretext_parser::{find_by_path, find_by_path_mut, Node, NodePath};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Semantic mutations over the source tree.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum Mutation {
    /// Insert a node as the `index`-th child of `parent` (clamped).
    InsertNode {
        parent: NodePath,
        index: usize,
        node: Node,
    },

    /// Replace a node's character data (atomic replacement, not a diff).
    UpdateText { path: NodePath, content: String },

    /// Set or overwrite an attribute.
    SetAttribute {
        path: NodePath,
        name: String,
        value: String,
    },

    /// Drop an attribute if present.
    RemoveAttribute { path: NodePath, name: String },

    /// Remove a node and all its descendants.
    RemoveNode { path: NodePath },
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum MutationError {
    #[error("Node not found: {0}")]
    NodeNotFound(String),

    #[error("Parent not found: {0}")]
    ParentNotFound(String),

    #[error("The root element cannot be removed")]
    CannotRemoveRoot,
}

impl Mutation {
    /// Apply to the tree with validation.
    ///
    /// Path annotations are stale after a successful apply; the caller
    /// reassigns them as part of resynchronization.
    pub fn apply(&self, root: &mut Node) -> Result<(), MutationError> {
        self.validate(root)?;

        match self {
            Mutation::InsertNode {
                parent,
                index,
                node,
            } => {
                let parent_node = find_by_path_mut(root, parent)
                    .ok_or_else(|| MutationError::ParentNotFound(parent.to_string()))?;
                let at = (*index).min(parent_node.children.len());
                parent_node.children.insert(at, node.clone());
                Ok(())
            }

            Mutation::UpdateText { path, content } => {
                let node = find_by_path_mut(root, path)
                    .ok_or_else(|| MutationError::NodeNotFound(path.to_string()))?;
                node.text = if content.is_empty() {
                    None
                } else {
                    Some(content.clone())
                };
                Ok(())
            }

            Mutation::SetAttribute { path, name, value } => {
                let node = find_by_path_mut(root, path)
                    .ok_or_else(|| MutationError::NodeNotFound(path.to_string()))?;
                node.set_attr(name.clone(), value.clone());
                Ok(())
            }

            Mutation::RemoveAttribute { path, name } => {
                let node = find_by_path_mut(root, path)
                    .ok_or_else(|| MutationError::NodeNotFound(path.to_string()))?;
                node.remove_attr(name);
                Ok(())
            }

            Mutation::RemoveNode { path } => remove_node(root, path),
        }
    }

    /// Validate without applying.
    pub fn validate(&self, root: &Node) -> Result<(), MutationError> {
        match self {
            Mutation::InsertNode { parent, .. } => {
                find_by_path(root, parent)
                    .ok_or_else(|| MutationError::ParentNotFound(parent.to_string()))?;
                Ok(())
            }

            Mutation::UpdateText { path, .. }
            | Mutation::SetAttribute { path, .. }
            | Mutation::RemoveAttribute { path, .. } => {
                find_by_path(root, path)
                    .ok_or_else(|| MutationError::NodeNotFound(path.to_string()))?;
                Ok(())
            }

            Mutation::RemoveNode { path } => {
                if path.parent().is_none() {
                    return Err(MutationError::CannotRemoveRoot);
                }
                find_by_path(root, path)
                    .ok_or_else(|| MutationError::NodeNotFound(path.to_string()))?;
                Ok(())
            }
        }
    }
}

fn remove_node(root: &mut Node, path: &NodePath) -> Result<(), MutationError> {
    let parent_path = path.parent().ok_or(MutationError::CannotRemoveRoot)?;
    let step = path.steps().last().expect("non-root path has a last step");

    let parent = find_by_path_mut(root, &parent_path)
        .ok_or_else(|| MutationError::ParentNotFound(parent_path.to_string()))?;

    let mut seen = 0;
    let index = parent
        .children
        .iter()
        .position(|child| {
            if child.name == step.tag {
                seen += 1;
                seen == step.occurrence
            } else {
                false
            }
        })
        .ok_or_else(|| MutationError::NodeNotFound(path.to_string()))?;

    parent.children.remove(index);
    Ok(())
}
