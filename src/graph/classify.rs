//! Role classifier: partitions a family's people into head, spouse,
//! children, parents, siblings and everyone else.
//!
//! DESIGN
//! ======
//! Free-text relationship labels are turned into a typed `Relationship` by a
//! `RelationshipClassifier` exactly once per person. Partitioning, layout and
//! edge resolution only ever see `Relationship` and `Role`, never strings.
//!
//! Partitioning is a fixed-priority pass (first match wins, matched people
//! leave the pool): head, spouse, children, parents, siblings, other.

use serde::{Deserialize, Serialize};

use crate::family::{Person, PersonId, PersonType};

// =============================================================================
// TYPES
// =============================================================================

/// The partition a person lands in. Doubles as the node id prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Head,
    Spouse,
    Child,
    Parent,
    Sibling,
    Other,
}

impl Role {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Head => "head",
            Self::Spouse => "spouse",
            Self::Child => "child",
            Self::Parent => "parent",
            Self::Sibling => "sibling",
            Self::Other => "other",
        }
    }
}

/// Typed reading of a relationship label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Relationship {
    Head,
    Spouse,
    Child,
    Parent,
    Sibling,
}

/// Maps a relationship label to a typed relationship.
pub trait RelationshipClassifier {
    fn relationship(&self, label: &str) -> Option<Relationship>;
}

// =============================================================================
// LABEL CLASSIFIER
// =============================================================================

const HEAD_TERMS: &[&str] = &["head", "cabeza", "jefe"];
const SPOUSE_TERMS: &[&str] = &["spouse", "wife", "husband", "esposo", "esposa", "conyuge"];
const CHILD_TERMS: &[&str] = &["child", "daughter", "hijo", "hija"];
const PARENT_TERMS: &[&str] = &["parent", "father", "mother", "padre", "madre"];
const SIBLING_TERMS: &[&str] = &["sibling", "brother", "sister", "hermano", "hermana"];

/// Case-insensitive substring matching over English and Spanish terms.
///
/// Labels are folded before matching: lowercase, accents stripped, and
/// UTF-8-read-as-Latin-1 sequences such as `Ã³` repaired, so `Cónyuge`,
/// `CONYUGE` and `CÃ³nyuge` all read as a spouse.
#[derive(Debug, Clone, Copy, Default)]
pub struct LabelClassifier;

impl RelationshipClassifier for LabelClassifier {
    fn relationship(&self, label: &str) -> Option<Relationship> {
        let folded = fold(label);
        let table = [
            (HEAD_TERMS, Relationship::Head),
            (SPOUSE_TERMS, Relationship::Spouse),
            (CHILD_TERMS, Relationship::Child),
            (PARENT_TERMS, Relationship::Parent),
            (SIBLING_TERMS, Relationship::Sibling),
        ];
        table
            .into_iter()
            .find(|(terms, _)| terms.iter().any(|term| folded.contains(term)))
            .map(|(_, relationship)| relationship)
    }
}

fn fold(label: &str) -> String {
    let mut out = String::with_capacity(label.len());
    let mut chars = label.chars().peekable();
    while let Some(c) = chars.next() {
        let c = match (c, chars.peek()) {
            ('Ã' | 'ã', Some(&next)) if ('\u{80}'..='\u{BF}').contains(&next) => {
                chars.next();
                // Re-assemble the two-byte sequence C3 xx.
                char::from_u32(0xC0 | (u32::from(next) & 0x3F)).unwrap_or(next)
            }
            _ => c,
        };
        for lower in c.to_lowercase() {
            out.push(strip_accent(lower));
        }
    }
    out
}

fn strip_accent(c: char) -> char {
    match c {
        'á' | 'à' | 'â' | 'ä' | 'ã' => 'a',
        'é' | 'è' | 'ê' | 'ë' => 'e',
        'í' | 'ì' | 'î' | 'ï' => 'i',
        'ó' | 'ò' | 'ô' | 'ö' | 'õ' => 'o',
        'ú' | 'ù' | 'û' | 'ü' => 'u',
        'ñ' => 'n',
        'ç' => 'c',
        other => other,
    }
}

// =============================================================================
// PARTITIONS
// =============================================================================

/// Six disjoint partitions of a family's people.
#[derive(Debug, Clone, Default)]
pub struct Partitions<'a> {
    pub head: Option<&'a Person>,
    pub spouse: Option<&'a Person>,
    pub children: Vec<&'a Person>,
    pub parents: Vec<&'a Person>,
    pub siblings: Vec<&'a Person>,
    pub others: Vec<&'a Person>,
}

impl<'a> Partitions<'a> {
    /// Every classified person with their role, in partition order.
    pub fn iter(&self) -> impl Iterator<Item = (Role, &'a Person)> + '_ {
        let head = self.head.into_iter().map(|p| (Role::Head, p));
        let spouse = self.spouse.into_iter().map(|p| (Role::Spouse, p));
        let children = self.children.iter().map(|&p| (Role::Child, p));
        let parents = self.parents.iter().map(|&p| (Role::Parent, p));
        let siblings = self.siblings.iter().map(|&p| (Role::Sibling, p));
        let others = self.others.iter().map(|&p| (Role::Other, p));
        head.chain(spouse)
            .chain(children)
            .chain(parents)
            .chain(siblings)
            .chain(others)
    }

    /// Find a classified person by id, preferring members over visitors.
    #[must_use]
    pub fn find(&self, id: PersonId) -> Option<(Role, &'a Person)> {
        let mut matches = self.iter().filter(|(_, p)| p.id == id);
        let first = matches.next()?;
        if first.1.person_type == PersonType::Member {
            return Some(first);
        }
        matches
            .find(|(_, p)| p.person_type == PersonType::Member)
            .or(Some(first))
    }
}

/// Partition `people` by fixed priority.
///
/// The head is the member matching `head_id`, else the first person labelled
/// as head, else the first person in the list.
#[must_use]
pub fn classify<'a>(
    head_id: Option<PersonId>,
    people: &[&'a Person],
    classifier: &dyn RelationshipClassifier,
) -> Partitions<'a> {
    let mut pool: Vec<(&'a Person, Option<Relationship>)> = people
        .iter()
        .map(|&p| (p, p.label().and_then(|label| classifier.relationship(label))))
        .collect();

    let head_index = head_id
        .and_then(|id| {
            pool.iter()
                .position(|(p, _)| p.person_type == PersonType::Member && p.id == id)
        })
        .or_else(|| pool.iter().position(|(_, r)| *r == Some(Relationship::Head)))
        .or(if pool.is_empty() { None } else { Some(0) });
    let head = head_index.map(|i| pool.remove(i).0);

    let spouse = pool
        .iter()
        .position(|(_, r)| *r == Some(Relationship::Spouse))
        .map(|i| pool.remove(i).0);

    let children = take_all(&mut pool, Relationship::Child);
    let parents = take_all(&mut pool, Relationship::Parent);
    let siblings = take_all(&mut pool, Relationship::Sibling);
    let others = pool.into_iter().map(|(p, _)| p).collect();

    Partitions { head, spouse, children, parents, siblings, others }
}

/// Remove every pool entry with `relationship`, preserving order.
fn take_all<'a>(pool: &mut Vec<(&'a Person, Option<Relationship>)>, relationship: Relationship) -> Vec<&'a Person> {
    let (taken, rest): (Vec<_>, Vec<_>) = pool
        .drain(..)
        .partition(|(_, r)| *r == Some(relationship));
    *pool = rest;
    taken.into_iter().map(|(p, _)| p).collect()
}

#[cfg(test)]
#[path = "classify_test.rs"]
mod tests;
