//! Family records — the input side of the graph builder.
//!
//! DESIGN
//! ======
//! The family API returns loosely shaped JSON. `FamilyWire` mirrors it with
//! the person collections optional so that a record missing `members` or
//! `visitors` is reported as a shape error instead of silently becoming an
//! empty family. Conversion into `FamilyRecord` also stamps every person with
//! the collection it was read from.

pub mod loader;
pub mod source;

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

pub type FamilyId = i64;
pub type PersonId = i64;

// =============================================================================
// PEOPLE
// =============================================================================

/// Which collection of a family a person belongs to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PersonType {
    #[default]
    Member,
    Visitor,
}

impl PersonType {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Member => "member",
            Self::Visitor => "visitor",
        }
    }
}

/// A member or visitor of a family.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Person {
    pub id: PersonId,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub birth_date: Option<String>,
    #[serde(default)]
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo: Option<String>,
    /// Free-text label describing the person's role in their own family.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relationship: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default)]
    pub person_type: PersonType,
}

impl Person {
    #[must_use]
    pub fn full_name(&self) -> String {
        match (self.first_name.trim(), self.last_name.trim()) {
            ("", "") => format!("#{}", self.id),
            (first, "") => first.to_string(),
            ("", last) => last.to_string(),
            (first, last) => format!("{first} {last}"),
        }
    }

    /// The relationship label, if present and not blank.
    #[must_use]
    pub fn label(&self) -> Option<&str> {
        self.relationship
            .as_deref()
            .map(str::trim)
            .filter(|label| !label.is_empty())
    }
}

// =============================================================================
// LINKS
// =============================================================================

/// One side of a cross-family link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FamilyRef {
    pub id: FamilyId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub surname: Option<String>,
}

/// A recorded relationship between two families (in-laws and the like).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    pub id: i64,
    pub link_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub origin_family: FamilyRef,
    pub related_family: FamilyRef,
    /// The person whose relationship justifies the link.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connecting_member_id: Option<PersonId>,
}

impl Link {
    /// The side of the link that is not `family_id`.
    ///
    /// Returns `None` for self-links and for links that do not touch
    /// `family_id` at all.
    #[must_use]
    pub fn other_side(&self, family_id: FamilyId) -> Option<&FamilyRef> {
        let origin = self.origin_family.id;
        let related = self.related_family.id;
        if origin == related {
            return None;
        }
        if origin == family_id {
            Some(&self.related_family)
        } else if related == family_id {
            Some(&self.origin_family)
        } else {
            None
        }
    }

    /// Direction-independent identity: the unordered family pair plus link id.
    /// A link recorded on both families yields the same key from either side.
    #[must_use]
    pub fn pair_key(&self) -> (FamilyId, FamilyId, i64) {
        let a = self.origin_family.id;
        let b = self.related_family.id;
        (a.min(b), a.max(b), self.id)
    }
}

// =============================================================================
// FAMILY RECORD
// =============================================================================

/// A family with its people, links, and (in expanded mode) the families it
/// links to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FamilyRecord {
    pub id: FamilyId,
    #[serde(default)]
    pub surname: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default)]
    pub status: String,
    /// Member id of the head of family.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub head_id: Option<PersonId>,
    pub members: Vec<Person>,
    pub visitors: Vec<Person>,
    #[serde(default)]
    pub origin_links: Vec<Link>,
    #[serde(default)]
    pub related_links: Vec<Link>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub related_families: Vec<FamilyRecord>,
}

impl FamilyRecord {
    /// Members first, then visitors, in record order.
    pub fn people(&self) -> impl Iterator<Item = &Person> {
        self.members.iter().chain(self.visitors.iter())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty() && self.visitors.is_empty()
    }

    /// Every link touching this family, as origin or as related side.
    pub fn links(&self) -> impl Iterator<Item = &Link> {
        self.origin_links.iter().chain(self.related_links.iter())
    }

    /// Unique ids of the families on the other side of this family's links.
    #[must_use]
    pub fn linked_family_ids(&self) -> BTreeSet<FamilyId> {
        self.links()
            .filter_map(|link| link.other_side(self.id))
            .map(|side| side.id)
            .collect()
    }

    /// The member referenced by `head_id`, if it resolves.
    #[must_use]
    pub fn head(&self) -> Option<&Person> {
        let head_id = self.head_id?;
        self.members.iter().find(|m| m.id == head_id)
    }

    #[must_use]
    pub fn related_family(&self, family_id: FamilyId) -> Option<&FamilyRecord> {
        self.related_families.iter().find(|f| f.id == family_id)
    }

    #[must_use]
    pub fn display_label(&self) -> String {
        match self.display_name.as_deref().map(str::trim) {
            Some(name) if !name.is_empty() => name.to_string(),
            _ if self.surname.trim().is_empty() => format!("Family #{}", self.id),
            _ => format!("Family {}", self.surname.trim()),
        }
    }
}

// =============================================================================
// WIRE SHAPE
// =============================================================================

/// A family record missing a required collection.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ShapeError {
    #[error("family {family_id} record is missing `{field}`")]
    MissingCollection { family_id: FamilyId, field: &'static str },
}

impl crate::error::ErrorCode for ShapeError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::MissingCollection { .. } => "E_FAMILY_SHAPE",
        }
    }
}

/// Family record as returned by the family API.
#[derive(Debug, Deserialize)]
pub(crate) struct FamilyWire {
    id: FamilyId,
    #[serde(default)]
    surname: String,
    #[serde(default)]
    display_name: Option<String>,
    #[serde(default)]
    status: String,
    #[serde(default)]
    head_id: Option<PersonId>,
    members: Option<Vec<Person>>,
    visitors: Option<Vec<Person>>,
    #[serde(default)]
    origin_links: Vec<Link>,
    #[serde(default)]
    related_links: Vec<Link>,
}

impl TryFrom<FamilyWire> for FamilyRecord {
    type Error = ShapeError;

    fn try_from(wire: FamilyWire) -> Result<Self, Self::Error> {
        let family_id = wire.id;
        let members = wire
            .members
            .ok_or(ShapeError::MissingCollection { family_id, field: "members" })?;
        let visitors = wire
            .visitors
            .ok_or(ShapeError::MissingCollection { family_id, field: "visitors" })?;

        Ok(Self {
            id: wire.id,
            surname: wire.surname,
            display_name: wire.display_name,
            status: wire.status,
            head_id: wire.head_id,
            members: stamp(members, PersonType::Member),
            visitors: stamp(visitors, PersonType::Visitor),
            origin_links: wire.origin_links,
            related_links: wire.related_links,
            related_families: Vec::new(),
        })
    }
}

fn stamp(mut people: Vec<Person>, person_type: PersonType) -> Vec<Person> {
    for person in &mut people {
        person.person_type = person_type;
    }
    people
}

// =============================================================================
// TEST HELPERS
// =============================================================================


#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
