//! The static tree of tag kinds and the subtype relation built on it.
//!
//! Every kind except `Missing` descends from `Found` through exactly one parent
//! edge. `Missing` sits outside the tree; "found or missing" is modeled as the
//! union of the two roots.
use super::tag::{Tag, TagKind};
use petgraph::algo::has_path_connecting;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::Direction;
use std::collections::HashMap;
use std::sync::LazyLock;

/// (child, parent) edges of the hierarchy.
const PARENT_EDGES: &[(TagKind, TagKind)] = &[
    (TagKind::Known, TagKind::Found),
    (TagKind::Unknown, TagKind::Found),
    (TagKind::Finite, TagKind::Known),
    (TagKind::Multiclass, TagKind::Finite),
    (TagKind::OrderedFactor, TagKind::Finite),
    (TagKind::Infinite, TagKind::Known),
    (TagKind::Continuous, TagKind::Infinite),
    (TagKind::Count, TagKind::Infinite),
    (TagKind::Image, TagKind::Known),
    (TagKind::GrayImage, TagKind::Image),
    (TagKind::ColorImage, TagKind::Image),
    (TagKind::Textual, TagKind::Known),
    (TagKind::ScientificTimeType, TagKind::Known),
    (TagKind::ScientificDate, TagKind::ScientificTimeType),
    (TagKind::ScientificTime, TagKind::ScientificTimeType),
    (TagKind::ScientificDateTime, TagKind::ScientificTimeType),
    (TagKind::Table, TagKind::Known),
    (TagKind::Sequence, TagKind::Known),
    (TagKind::Tuple, TagKind::Known),
];

pub static HIERARCHY: LazyLock<Hierarchy> = LazyLock::new(Hierarchy::build);

/// Kind-level tree. Edges point from child to parent.
#[derive(Debug)]
pub struct Hierarchy {
    graph: DiGraph<TagKind, ()>,
    index: HashMap<TagKind, NodeIndex>,
}

impl Hierarchy {
    fn build() -> Self {
        let mut graph = DiGraph::new();
        let index: HashMap<TagKind, NodeIndex> = TagKind::ALL
            .iter()
            .map(|&kind| (kind, graph.add_node(kind)))
            .collect();
        for (child, parent) in PARENT_EDGES {
            graph.add_edge(index[child], index[parent], ());
        }
        Self { graph, index }
    }

    pub fn parent(&self, kind: TagKind) -> Option<TagKind> {
        self.graph
            .neighbors_directed(self.index[&kind], Direction::Outgoing)
            .next()
            .map(|idx| self.graph[idx])
    }

    /// Direct children, in declaration order.
    pub fn children(&self, kind: TagKind) -> Vec<TagKind> {
        let mut kids: Vec<TagKind> = self
            .graph
            .neighbors_directed(self.index[&kind], Direction::Incoming)
            .map(|idx| self.graph[idx])
            .collect();
        kids.sort();
        kids
    }

    /// The chain of strict supertypes from the direct parent up to the root.
    pub fn supertypes(&self, kind: TagKind) -> Vec<TagKind> {
        let mut chain = Vec::new();
        let mut current = kind;
        while let Some(parent) = self.parent(current) {
            chain.push(parent);
            current = parent;
        }
        chain
    }

    /// Every strict descendant of `kind`, depth first.
    pub fn subtypes(&self, kind: TagKind) -> Vec<TagKind> {
        let mut out = Vec::new();
        for child in self.children(kind) {
            out.push(child);
            out.extend(self.subtypes(child));
        }
        out
    }

    /// Kinds without a parent: `Found` and `Missing`.
    pub fn roots(&self) -> Vec<TagKind> {
        TagKind::ALL
            .iter()
            .copied()
            .filter(|&k| self.parent(k).is_none())
            .collect()
    }

    /// Reflexive-transitive closure of the parent edges.
    pub fn descends(&self, kind: TagKind, ancestor: TagKind) -> bool {
        kind == ancestor
            || has_path_connecting(&self.graph, self.index[&kind], self.index[&ancestor], None)
    }
}

/// Answers whether `a` is a subtype of `b`.
///
/// Unions on the left must be covered member by member; unions on the right
/// need one member to cover the tag. Parametric tags only conform when the
/// supertype leaves the parameter open or the parameters match exactly.
/// Containers are covariant in their element tags.
pub fn is_subtype(a: &Tag, b: &Tag) -> bool {
    if let Tag::Union(members) = a {
        return members.iter().all(|m| is_subtype(m, b));
    }
    if let Tag::Union(members) = b {
        return members.iter().any(|m| is_subtype(a, m));
    }
    let (Some(ka), Some(kb)) = (a.kind(), b.kind()) else {
        return false;
    };
    HIERARCHY.descends(ka, kb) && parameters_conform(a, b)
}

fn parameters_conform(a: &Tag, b: &Tag) -> bool {
    match b {
        Tag::Finite(Some(n)) | Tag::Multiclass(Some(n)) | Tag::OrderedFactor(Some(n)) => {
            a.level_count() == Some(*n)
        }
        Tag::Image(Some(d)) | Tag::GrayImage(Some(d)) | Tag::ColorImage(Some(d)) => {
            a.dims() == Some(*d)
        }
        Tag::Sequence(inner_b) => match a {
            Tag::Sequence(inner_a) => is_subtype(inner_a, inner_b),
            _ => false,
        },
        Tag::Table(inner_b) => match a {
            Tag::Table(inner_a) => is_subtype(inner_a, inner_b),
            _ => false,
        },
        Tag::Tuple(items_b) => match a {
            Tag::Tuple(items_a) => {
                items_a.len() == items_b.len()
                    && items_a.iter().zip(items_b).all(|(x, y)| is_subtype(x, y))
            }
            _ => false,
        },
        _ => true,
    }
}
