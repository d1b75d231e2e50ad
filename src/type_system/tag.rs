//! Defines the scientific type tags and their parameters.
use super::hierarchy;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Width and height carried by the image tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Dims {
    pub width: usize,
    pub height: usize,
}

impl Dims {
    pub fn new(width: usize, height: usize) -> Self {
        Self { width, height }
    }
}

/// The parameter-free identity of a tag. These are the nodes of the static hierarchy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TagKind {
    Missing,
    Found,
    Known,
    Unknown,
    Finite,
    Multiclass,
    OrderedFactor,
    Infinite,
    Continuous,
    Count,
    Image,
    GrayImage,
    ColorImage,
    Textual,
    ScientificTimeType,
    ScientificDate,
    ScientificTime,
    ScientificDateTime,
    Table,
    Sequence,
    Tuple,
}

impl TagKind {
    pub const ALL: [TagKind; 21] = [
        TagKind::Missing,
        TagKind::Found,
        TagKind::Known,
        TagKind::Unknown,
        TagKind::Finite,
        TagKind::Multiclass,
        TagKind::OrderedFactor,
        TagKind::Infinite,
        TagKind::Continuous,
        TagKind::Count,
        TagKind::Image,
        TagKind::GrayImage,
        TagKind::ColorImage,
        TagKind::Textual,
        TagKind::ScientificTimeType,
        TagKind::ScientificDate,
        TagKind::ScientificTime,
        TagKind::ScientificDateTime,
        TagKind::Table,
        TagKind::Sequence,
        TagKind::Tuple,
    ];

    pub fn name(self) -> &'static str {
        match self {
            TagKind::Missing => "Missing",
            TagKind::Found => "Found",
            TagKind::Known => "Known",
            TagKind::Unknown => "Unknown",
            TagKind::Finite => "Finite",
            TagKind::Multiclass => "Multiclass",
            TagKind::OrderedFactor => "OrderedFactor",
            TagKind::Infinite => "Infinite",
            TagKind::Continuous => "Continuous",
            TagKind::Count => "Count",
            TagKind::Image => "Image",
            TagKind::GrayImage => "GrayImage",
            TagKind::ColorImage => "ColorImage",
            TagKind::Textual => "Textual",
            TagKind::ScientificTimeType => "ScientificTimeType",
            TagKind::ScientificDate => "ScientificDate",
            TagKind::ScientificTime => "ScientificTime",
            TagKind::ScientificDateTime => "ScientificDateTime",
            TagKind::Table => "Table",
            TagKind::Sequence => "Sequence",
            TagKind::Tuple => "Tuple",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|k| k.name() == name)
    }

    /// The unparameterized tag for this kind. Container kinds get their widest form.
    pub fn to_tag(self) -> Tag {
        match self {
            TagKind::Missing => Tag::Missing,
            TagKind::Found => Tag::Found,
            TagKind::Known => Tag::Known,
            TagKind::Unknown => Tag::Unknown,
            TagKind::Finite => Tag::Finite(None),
            TagKind::Multiclass => Tag::Multiclass(None),
            TagKind::OrderedFactor => Tag::OrderedFactor(None),
            TagKind::Infinite => Tag::Infinite,
            TagKind::Continuous => Tag::Continuous,
            TagKind::Count => Tag::Count,
            TagKind::Image => Tag::Image(None),
            TagKind::GrayImage => Tag::GrayImage(None),
            TagKind::ColorImage => Tag::ColorImage(None),
            TagKind::Textual => Tag::Textual,
            TagKind::ScientificTimeType => Tag::ScientificTimeType,
            TagKind::ScientificDate => Tag::ScientificDate,
            TagKind::ScientificTime => Tag::ScientificTime,
            TagKind::ScientificDateTime => Tag::ScientificDateTime,
            TagKind::Table => Tag::Table(Box::new(Tag::found_or_missing().into_sequence())),
            TagKind::Sequence => Tag::found_or_missing().into_sequence(),
            TagKind::Tuple => Tag::Tuple(Vec::new()),
        }
    }
}

impl fmt::Display for TagKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A scientific type.
///
/// Parametric tags carry their arity as data: `None` means "any arity" and is
/// the supertype of every concrete arity. `Union` members are kept flat, sorted
/// and free of redundant members when built through [`Tag::union`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Tag {
    Missing,
    Found,
    Known,
    Unknown,
    Finite(Option<usize>),
    Multiclass(Option<usize>),
    OrderedFactor(Option<usize>),
    Infinite,
    Continuous,
    Count,
    Image(Option<Dims>),
    GrayImage(Option<Dims>),
    ColorImage(Option<Dims>),
    Textual,
    ScientificTimeType,
    ScientificDate,
    ScientificTime,
    ScientificDateTime,
    /// A table whose columns are described by the inner (usually union of sequences) tag.
    Table(Box<Tag>),
    /// A variable-length homogeneous sequence of elements of the inner tag.
    Sequence(Box<Tag>),
    /// A fixed-size heterogeneous sequence, one tag per position.
    Tuple(Vec<Tag>),
    Union(Vec<Tag>),
}

impl Tag {
    pub fn kind(&self) -> Option<TagKind> {
        Some(match self {
            Tag::Missing => TagKind::Missing,
            Tag::Found => TagKind::Found,
            Tag::Known => TagKind::Known,
            Tag::Unknown => TagKind::Unknown,
            Tag::Finite(_) => TagKind::Finite,
            Tag::Multiclass(_) => TagKind::Multiclass,
            Tag::OrderedFactor(_) => TagKind::OrderedFactor,
            Tag::Infinite => TagKind::Infinite,
            Tag::Continuous => TagKind::Continuous,
            Tag::Count => TagKind::Count,
            Tag::Image(_) => TagKind::Image,
            Tag::GrayImage(_) => TagKind::GrayImage,
            Tag::ColorImage(_) => TagKind::ColorImage,
            Tag::Textual => TagKind::Textual,
            Tag::ScientificTimeType => TagKind::ScientificTimeType,
            Tag::ScientificDate => TagKind::ScientificDate,
            Tag::ScientificTime => TagKind::ScientificTime,
            Tag::ScientificDateTime => TagKind::ScientificDateTime,
            Tag::Table(_) => TagKind::Table,
            Tag::Sequence(_) => TagKind::Sequence,
            Tag::Tuple(_) => TagKind::Tuple,
            Tag::Union(_) => return None,
        })
    }

    /// Builds a normalized union: nested unions are flattened, duplicates and
    /// members that are subtypes of another member are dropped. A union of one
    /// member is that member; the empty union is the bottom tag.
    pub fn union(members: impl IntoIterator<Item = Tag>) -> Tag {
        let mut flat = Vec::new();
        for member in members {
            match member {
                Tag::Union(inner) => flat.extend(inner),
                other => flat.push(other),
            }
        }
        flat.sort();
        flat.dedup();

        let mut kept: Vec<Tag> = flat
            .iter()
            .enumerate()
            .filter(|&(i, m)| {
                !flat.iter().enumerate().any(|(j, o)| {
                    j != i && m.is_subtype(o) && (!o.is_subtype(m) || j < i)
                })
            })
            .map(|(_, m)| m.clone())
            .collect();

        if kept.len() == 1 {
            kept.remove(0)
        } else {
            Tag::Union(kept)
        }
    }

    /// `Union{Missing, Found}`: any value at all.
    pub fn found_or_missing() -> Tag {
        Tag::Union(vec![Tag::Missing, Tag::Found])
    }

    pub fn sequence(element: Tag) -> Tag {
        Tag::Sequence(Box::new(element))
    }

    pub fn into_sequence(self) -> Tag {
        Tag::sequence(self)
    }

    /// The table-type constructor `Table(T1, ..., Tn)`: any table each of whose
    /// columns has an element tag that is a subtype of some `Tj`.
    pub fn table_of(column_tags: impl IntoIterator<Item = Tag>) -> Tag {
        Tag::Table(Box::new(Tag::union(
            column_tags.into_iter().map(Tag::sequence),
        )))
    }

    pub fn is_subtype(&self, other: &Tag) -> bool {
        hierarchy::is_subtype(self, other)
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Tag::Missing)
    }

    /// True for `Missing` itself and for unions that include it.
    pub fn has_missing(&self) -> bool {
        match self {
            Tag::Missing => true,
            Tag::Union(members) => members.iter().any(Tag::has_missing),
            _ => false,
        }
    }

    /// The tag with `Missing` removed; `None` when nothing else remains.
    pub fn nonmissing(&self) -> Option<Tag> {
        match self {
            Tag::Missing => None,
            Tag::Union(members) => {
                let rest: Vec<Tag> = members.iter().filter(|m| !m.is_missing()).cloned().collect();
                if rest.is_empty() {
                    None
                } else {
                    Some(Tag::union(rest))
                }
            }
            other => Some(other.clone()),
        }
    }

    /// Re-attaches `Missing` to a tag when `missing` is set.
    pub fn with_missing(self, missing: bool) -> Tag {
        if missing {
            Tag::union([Tag::Missing, self])
        } else {
            self
        }
    }

    /// Level count of a finite tag, if fixed.
    pub fn level_count(&self) -> Option<usize> {
        match self {
            Tag::Finite(n) | Tag::Multiclass(n) | Tag::OrderedFactor(n) => *n,
            _ => None,
        }
    }

    pub fn dims(&self) -> Option<Dims> {
        match self {
            Tag::Image(d) | Tag::GrayImage(d) | Tag::ColorImage(d) => *d,
            _ => None,
        }
    }

    /// Element tag of a `Sequence`.
    pub fn element(&self) -> Option<&Tag> {
        match self {
            Tag::Sequence(inner) => Some(inner),
            _ => None,
        }
    }
}

fn write_list(f: &mut fmt::Formatter<'_>, items: &[Tag]) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{}", item)?;
    }
    Ok(())
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Tag::Finite(Some(n)) | Tag::Multiclass(Some(n)) | Tag::OrderedFactor(Some(n)) => {
                write!(f, "{}{{{}}}", self.kind().map_or("", TagKind::name), n)
            }
            Tag::Image(Some(d)) | Tag::GrayImage(Some(d)) | Tag::ColorImage(Some(d)) => {
                write!(
                    f,
                    "{}{{{},{}}}",
                    self.kind().map_or("", TagKind::name),
                    d.width,
                    d.height
                )
            }
            Tag::Table(inner) => write!(f, "Table{{{}}}", inner),
            Tag::Sequence(inner) => write!(f, "Sequence{{{}}}", inner),
            Tag::Tuple(items) => {
                f.write_str("Tuple{")?;
                write_list(f, items)?;
                f.write_str("}")
            }
            Tag::Union(items) => {
                f.write_str("Union{")?;
                write_list(f, items)?;
                f.write_str("}")
            }
            other => f.write_str(other.kind().map_or("", TagKind::name)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_union_flattens_and_sorts() {
        let a = Tag::union([Tag::Count, Tag::Missing]);
        let b = Tag::union([Tag::Missing, Tag::union([Tag::Count, Tag::Count])]);
        assert_eq!(a, b);
        assert_eq!(a, Tag::Union(vec![Tag::Missing, Tag::Count]));
    }

    #[test]
    fn test_union_absorbs_subtypes() {
        assert_eq!(Tag::union([Tag::Count, Tag::Infinite]), Tag::Infinite);
        assert_eq!(
            Tag::union([Tag::Multiclass(Some(3)), Tag::Finite(None)]),
            Tag::Finite(None)
        );
        // Different arities are unrelated and both survive.
        assert_eq!(
            Tag::union([Tag::Multiclass(Some(3)), Tag::Multiclass(Some(4))]),
            Tag::Union(vec![Tag::Multiclass(Some(3)), Tag::Multiclass(Some(4))])
        );
    }

    #[test]
    fn test_single_member_union_collapses() {
        assert_eq!(Tag::union([Tag::Continuous]), Tag::Continuous);
        assert_eq!(Tag::union(Vec::new()), Tag::Union(vec![]));
    }

    #[test]
    fn test_nonmissing() {
        let t = Tag::union([Tag::Missing, Tag::Continuous]);
        assert!(t.has_missing());
        assert_eq!(t.nonmissing(), Some(Tag::Continuous));
        assert_eq!(Tag::Missing.nonmissing(), None);
        assert_eq!(Tag::Count.with_missing(true), Tag::union([Tag::Count, Tag::Missing]));
    }

    #[rstest]
    #[case(Tag::Continuous, "Continuous")]
    #[case(Tag::Multiclass(Some(3)), "Multiclass{3}")]
    #[case(Tag::Finite(None), "Finite")]
    #[case(Tag::GrayImage(Some(Dims::new(10, 20))), "GrayImage{10,20}")]
    #[case(Tag::union([Tag::Missing, Tag::Count]), "Union{Missing, Count}")]
    #[case(Tag::sequence(Tag::Textual), "Sequence{Textual}")]
    #[case(Tag::Tuple(vec![Tag::Count, Tag::Textual]), "Tuple{Count, Textual}")]
    fn test_display(#[case] tag: Tag, #[case] expected: &str) {
        assert_eq!(tag.to_string(), expected);
    }

    #[test]
    fn test_kind_names_round_trip() {
        for kind in TagKind::ALL {
            assert_eq!(TagKind::from_name(kind.name()), Some(kind));
        }
    }
}
