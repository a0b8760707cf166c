//! DOM mutation errors

use crate::NodeId;

pub type DomResult<T> = Result<T, DomError>;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomError {
    #[error("no node {0} in this tree")]
    NotFound(NodeId),

    /// The insertion would create a cycle or the parent takes no children
    #[error("cannot insert node {child} under node {parent}")]
    HierarchyRequest { parent: NodeId, child: NodeId },

    #[error("node {0} cannot be inserted")]
    InvalidNodeType(NodeId),

    #[error("node {node} is not a child of node {parent}")]
    NotAChild { parent: NodeId, node: NodeId },
}
