//! Lattice elements and the operations shared by every lattice shape.
//!
//! Elements are stored in a flat vector in construction order (x-major, like
//! `idx = x * DIM * DIM + y * DIM + z`). That order never changes, so anything
//! that iterates elements, such as face texturing, is stable for a given
//! construction even after many moves.

use std::fmt::{self, Write};

use rustc_hash::FxHashMap;
use tracing::warn;

use crate::geometry::{centered, Coord, Dims, Direction, Face};

/// Identifies one pivot handle: a row (horizontal turns) or a column (vertical turns).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PivotId {
    pub direction: Direction,
    pub index: usize,
}

impl fmt::Display for PivotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.direction, self.index)
    }
}

/// Which container currently holds an element.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Owner {
    Permanent,
    Pivot(PivotId),
}

/// One unit of a lattice.
#[derive(Clone, Debug, PartialEq)]
pub struct Element<M> {
    /// Doubled coordinate. Relative to the pivot offset while owned by a pivot.
    pub position: Coord,
    /// Materials in [`Face`] slot order.
    pub faces: [M; 6],
    pub owner: Owner,
}

impl<M> Element<M> {
    pub fn face(&self, face: Face) -> &M {
        &self.faces[face.slot()]
    }

    /// Real (undoubled) position.
    pub fn center(&self) -> [f64; 3] {
        let (x, y, z) = self.position;
        [x as f64 / 2.0, y as f64 / 2.0, z as f64 / 2.0]
    }
}

/// Builds a full lattice of `dims` elements, all showing `fill`.
pub fn build_lattice<M: Clone>(dims: Dims, fill: &M) -> Vec<Element<M>> {
    let (nx, ny, nz) = dims;
    let mut elements = Vec::with_capacity(nx * ny * nz);
    for x in 0..nx {
        for y in 0..ny {
            for z in 0..nz {
                elements.push(Element {
                    position: (centered(x, nx), centered(y, ny), centered(z, nz)),
                    faces: std::array::from_fn(|_| fill.clone()),
                    owner: Owner::Permanent,
                });
            }
        }
    }
    elements
}

/// Indices of permanent elements on the outer layer under `face`, in storage order.
pub fn face_members<M>(elements: &[Element<M>], dims: Dims, face: Face) -> Vec<usize> {
    elements
        .iter()
        .enumerate()
        .filter(|(_, element)| {
            element.owner == Owner::Permanent && face.covers(element.position, dims)
        })
        .map(|(index, _)| index)
        .collect()
}

/// Writes `images` into the `slot` of the listed elements, one image each.
///
/// Stops at whichever runs out first; elements left over keep their material.
/// Returns how many were written.
pub fn paint<M: Clone>(
    elements: &mut [Element<M>],
    members: &[usize],
    slot: Face,
    images: &[M],
) -> usize {
    if images.len() < members.len() {
        warn!(
            face = %slot,
            needed = members.len(),
            supplied = images.len(),
            "not enough images, leaving the rest untouched"
        );
    }
    let mut applied = 0;
    for (&index, image) in members.iter().zip(images) {
        elements[index].faces[slot.slot()] = image.clone();
        applied += 1;
    }
    applied
}

/// Groups element indices by their current owner.
pub fn group_by_owner<M>(elements: &[Element<M>]) -> FxHashMap<Owner, Vec<usize>> {
    let mut groups: FxHashMap<Owner, Vec<usize>> = FxHashMap::default();
    for (index, element) in elements.iter().enumerate() {
        groups.entry(element.owner).or_default().push(index);
    }
    groups
}

/// Formats every face of a lattice as a grid of material labels.
///
/// Each face is drawn as seen from outside the lattice, top row first, with
/// faces separated by a blank line. Missing cells show as `?`.
pub fn format_lattice<M: fmt::Display>(elements: &[Element<M>], dims: Dims) -> String {
    let mut output = String::new();
    for (face_number, face) in Face::ALL.into_iter().enumerate() {
        if face_number > 0 {
            output.push('\n');
        }
        let ((column_axis, column_sign), (row_axis, row_sign)) = face.plane();
        let columns = column_axis.size(dims);
        let rows = row_axis.size(dims);

        let mut cells = vec![vec![String::from("?"); columns]; rows];
        for index in face_members(elements, dims, face) {
            let element = &elements[index];
            let column = to_cell(column_sign * column_axis.get(element.position), columns);
            let row = to_cell(row_sign * row_axis.get(element.position), rows);
            cells[row][column] = element.face(face).to_string();
        }

        let width = cells.iter().flatten().map(String::len).max().unwrap_or(1);
        let _ = writeln!(output, "{face}");
        for row in cells.iter().rev() {
            let line = row
                .iter()
                .map(|label| format!("{label:<width$}"))
                .collect::<Vec<_>>()
                .join(" ");
            output.push_str(line.trim_end());
            output.push('\n');
        }
    }
    output
}

/// Converts a doubled coordinate back to a 0-based cell index.
#[inline(always)]
fn to_cell(doubled: i32, dim: usize) -> usize {
    ((doubled + dim as i32 - 1) / 2) as usize
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::boundary;
    use rustc_hash::FxHashSet;

    #[test]
    fn test_build_lattice_is_centered() {
        let elements = build_lattice((2, 2, 2), &'.');
        let positions: FxHashSet<Coord> = elements.iter().map(|e| e.position).collect();
        assert_eq!(positions.len(), 8);
        for x in [-1, 1] {
            for y in [-1, 1] {
                for z in [-1, 1] {
                    assert!(positions.contains(&(x, y, z)));
                }
            }
        }
        assert_eq!(elements[0].center(), [-0.5, -0.5, -0.5]);
    }

    #[test]
    fn test_build_lattice_storage_order_is_x_major() {
        let elements = build_lattice((3, 3, 3), &0u8);
        assert_eq!(elements[0].position, (-2, -2, -2));
        assert_eq!(elements[1].position, (-2, -2, 0));
        assert_eq!(elements[3].position, (-2, 0, -2));
        assert_eq!(elements[9].position, (0, -2, -2));
    }

    #[test]
    fn test_face_members_select_outer_layer() {
        let dims = (4, 4, 4);
        let elements = build_lattice(dims, &'.');
        for face in Face::ALL {
            let members = face_members(&elements, dims, face);
            assert_eq!(members.len(), 16, "{face} should have 16 cells");
            let (axis, sign) = face.normal();
            for index in members {
                assert_eq!(axis.get(elements[index].position), sign * boundary(4));
            }
        }
    }

    #[test]
    fn test_single_cell_is_on_every_face() {
        let elements = build_lattice((1, 1, 1), &'.');
        for face in Face::ALL {
            assert_eq!(face_members(&elements, (1, 1, 1), face), vec![0]);
        }
    }

    #[test]
    fn test_paint_with_too_few_images_leaves_rest_untouched() {
        let dims = (2, 2, 2);
        let mut elements = build_lattice(dims, &'.');
        let members = face_members(&elements, dims, Face::Top);
        let applied = paint(&mut elements, &members, Face::Top, &['a', 'b']);

        assert_eq!(applied, 2);
        assert_eq!(*elements[members[0]].face(Face::Top), 'a');
        assert_eq!(*elements[members[1]].face(Face::Top), 'b');
        assert_eq!(*elements[members[2]].face(Face::Top), '.');
        assert_eq!(*elements[members[3]].face(Face::Top), '.');
        // other slots of painted elements are untouched
        assert_eq!(*elements[members[0]].face(Face::Front), '.');
    }

    #[test]
    fn test_paint_ignores_surplus_images() {
        let dims = (1, 1, 1);
        let mut elements = build_lattice(dims, &'.');
        assert_eq!(paint(&mut elements, &[0], Face::Left, &['x', 'y', 'z']), 1);
        assert_eq!(*elements[0].face(Face::Left), 'x');
    }

    #[test]
    fn test_group_by_owner() {
        let mut elements = build_lattice((2, 2, 2), &'.');
        let pivot = PivotId {
            direction: Direction::Vertical,
            index: 1,
        };
        elements[5].owner = Owner::Pivot(pivot);
        elements[7].owner = Owner::Pivot(pivot);

        let groups = group_by_owner(&elements);
        assert_eq!(groups[&Owner::Pivot(pivot)], vec![5, 7]);
        assert_eq!(groups[&Owner::Permanent].len(), 6);
    }

    #[test]
    fn test_format_lattice_draws_faces_from_outside() {
        let dims = (2, 1, 1);
        let mut elements = build_lattice(dims, &'.');
        // left cell, right cell
        elements[0].faces = ['a', '.', 'b', 'L', 'u', 'd'];
        elements[1].faces = ['c', 'R', 'e', '.', 'v', 'w'];

        let output = format_lattice(&elements, dims);
        let expected = "\
front
a c

right
R

back
e b

left
L

top
u v

bottom
d w
";
        assert_eq!(output, expected);
    }
}
