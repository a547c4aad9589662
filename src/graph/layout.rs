//! Layout engine: deterministic coordinates per role partition.
//!
//! Generations stack vertically (`LEVEL_HEIGHT` apart) around the head at
//! `(CENTER_X, BASE_Y)`. Only the relative ordering of the spacing constants
//! matters to consumers: `LEVEL_HEIGHT > SPOUSE_OFFSET > CHILD_SPACING >
//! SIBLING_STEP`.

use super::Position;
use super::classify::{Partitions, Role};
use crate::family::Person;

// Layout constants (in logical pixels).
pub const CENTER_X: f64 = 400.0;
pub const BASE_Y: f64 = 300.0;
pub const LEVEL_HEIGHT: f64 = 200.0;
pub const SPOUSE_OFFSET: f64 = 160.0;
pub const CHILD_SPACING: f64 = 140.0;
pub const SIBLING_STEP: f64 = 120.0;
pub const OTHER_STEP: f64 = 140.0;

/// A classified person with their assigned position.
#[derive(Debug, Clone, Copy)]
pub struct Placement<'a> {
    pub role: Role,
    pub person: &'a Person,
    pub position: Position,
}

/// Place every classified person. Output order matches `Partitions::iter`.
#[must_use]
pub fn place<'a>(partitions: &Partitions<'a>) -> Vec<Placement<'a>> {
    let mut placements = Vec::new();
    let mut push = |role: Role, person: &'a Person, x: f64, y: f64| {
        placements.push(Placement { role, person, position: Position::new(x, y) });
    };

    if let Some(head) = partitions.head {
        push(Role::Head, head, CENTER_X, BASE_Y);
    }
    if let Some(spouse) = partitions.spouse {
        push(Role::Spouse, spouse, CENTER_X + SPOUSE_OFFSET, BASE_Y);
    }

    let children_center = if partitions.spouse.is_some() {
        f64::midpoint(CENTER_X, CENTER_X + SPOUSE_OFFSET)
    } else {
        CENTER_X
    };
    for (child, x) in partitions
        .children
        .iter()
        .copied()
        .zip(spread(children_center, partitions.children.len(), CHILD_SPACING))
    {
        push(Role::Child, child, x, BASE_Y + LEVEL_HEIGHT);
    }

    for (parent, x) in partitions
        .parents
        .iter()
        .copied()
        .zip(spread(CENTER_X, partitions.parents.len(), SPOUSE_OFFSET))
    {
        push(Role::Parent, parent, x, BASE_Y - LEVEL_HEIGHT);
    }

    for (i, sibling) in partitions.siblings.iter().copied().enumerate() {
        #[allow(clippy::cast_precision_loss)]
        let step = (i + 1) as f64;
        push(Role::Sibling, sibling, CENTER_X - step * SIBLING_STEP, BASE_Y);
    }

    let others_start = CENTER_X + SPOUSE_OFFSET + CHILD_SPACING;
    for (i, other) in partitions.others.iter().copied().enumerate() {
        #[allow(clippy::cast_precision_loss)]
        let step = i as f64;
        push(Role::Other, other, others_start + step * OTHER_STEP, BASE_Y + LEVEL_HEIGHT / 2.0);
    }

    placements
}

/// Row for the `row`-th linked family, below the lowest primary node at
/// `floor`.
#[must_use]
pub fn linked_row_y(floor: f64, row: usize) -> f64 {
    #[allow(clippy::cast_precision_loss)]
    let rows = (row + 1) as f64;
    floor + rows * LEVEL_HEIGHT
}

/// Positions for `count` external people of a linked family, centered on
/// `center_x` along the row at `y`.
#[must_use]
pub fn linked_people(center_x: f64, y: f64, count: usize) -> Vec<Position> {
    spread(center_x, count, CHILD_SPACING)
        .map(|x| Position::new(x, y))
        .collect()
}

/// `count` x-coordinates `spacing` apart, centered on `center`.
fn spread(center: f64, count: usize, spacing: f64) -> impl Iterator<Item = f64> {
    #[allow(clippy::cast_precision_loss)]
    let width = count.saturating_sub(1) as f64 * spacing;
    let start = center - width / 2.0;
    (0..count).map(move |i| {
        #[allow(clippy::cast_precision_loss)]
        let offset = i as f64 * spacing;
        start + offset
    })
}

#[cfg(test)]
#[path = "layout_test.rs"]
mod tests;
