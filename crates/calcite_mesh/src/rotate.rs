//! Element and variant rotation math, plus the UV quad rotations that keep
//! textures oriented (or world-locked) under them.

use calcite_assets::{Axis, ElementRotation, Face, VariantRotation};
use glam::{IVec3, Mat3, Vec3};

/// The rotation an element applies about its own origin, including the
/// rescale factor that stretches 45-degree diagonals back to full extent.
pub fn element_matrix(rotation: &ElementRotation) -> Mat3 {
    let radians = rotation.angle.to_radians();

    let rot = match rotation.axis {
        Axis::X => Mat3::from_rotation_x(radians),
        Axis::Y => Mat3::from_rotation_y(radians),
        Axis::Z => Mat3::from_rotation_z(radians),
    };

    if rotation.rescale {
        let scale = 1.0 / radians.cos().abs();
        let scale_vec = match rotation.axis {
            Axis::X => Vec3::new(1.0, scale, scale),
            Axis::Y => Vec3::new(scale, 1.0, scale),
            Axis::Z => Vec3::new(scale, scale, 1.0),
        };
        rot * Mat3::from_diagonal(scale_vec)
    } else {
        rot
    }
}

/// The whole-cell rotation a blockstate variant applies: x, then y, then z
/// quarter turns about the cell centre.
pub fn variant_matrix(rotation: VariantRotation) -> Mat3 {
    let rx = Mat3::from_rotation_x(f32::from(rotation.x).to_radians());
    let ry = Mat3::from_rotation_y(f32::from(rotation.y).to_radians());
    let rz = Mat3::from_rotation_z(f32::from(rotation.z).to_radians());
    rz * ry * rx
}

/// Applies a rotation about a pivot point.
pub fn rotate_about(m: Mat3, pivot: Vec3, point: Vec3) -> Vec3 {
    m * (point - pivot) + pivot
}

/// Rotates an integer direction by quarter turns, exactly.
fn rotate_dir_quarter(dir: IVec3, rotation: VariantRotation) -> IVec3 {
    let mut d = dir;

    for _ in 0..rotation.x / 90 {
        d = IVec3::new(d.x, -d.z, d.y);
    }
    for _ in 0..rotation.y / 90 {
        d = IVec3::new(d.z, d.y, -d.x);
    }
    for _ in 0..rotation.z / 90 {
        d = IVec3::new(-d.y, d.x, d.z);
    }

    d
}

/// Where a face points after variant rotation; cullfaces follow the
/// element geometry.
pub fn rotate_face(face: Face, rotation: VariantRotation) -> Face {
    if rotation.is_identity() {
        return face;
    }

    let [x, y, z] = face.normal();
    let rotated = rotate_dir_quarter(IVec3::new(x, y, z), rotation);

    match (rotated.x, rotated.y, rotated.z) {
        (0, -1, 0) => Face::Down,
        (0, 1, 0) => Face::Up,
        (0, 0, -1) => Face::North,
        (0, 0, 1) => Face::South,
        (-1, 0, 0) => Face::West,
        (1, 0, 0) => Face::East,
        _ => face,
    }
}

/// Rounds a rotated sampling direction back onto the grid. Lighting and
/// occlusion lookups always sample whole cells.
pub fn round_dir(v: Vec3) -> IVec3 {
    IVec3::new(
        v.x.round() as i32,
        v.y.round() as i32,
        v.z.round() as i32,
    )
}

/// Rotates the four corner UVs of a quad by quarter turns. Corners are in
/// bottom-left, bottom-right, top-right, top-left order; one step moves
/// each corner's texture coordinate to the next corner clockwise.
pub fn rotate_uv_quad(uvs: &mut [[f32; 2]; 4], steps: u16) {
    for _ in 0..steps % 4 {
        let [bl, br, tr, tl] = *uvs;
        *uvs = [br, tr, tl, bl];
    }
}

/// Extra quarter turns that keep a texture world-aligned under variant
/// rotation. Without uvlock the texture follows the geometry; with it, the
/// in-plane component of the rotation must be undone.
pub fn uvlock_steps(face: Face, rotation: VariantRotation) -> u16 {
    let x = rotation.x / 90 % 4;
    let y = rotation.y / 90 % 4;
    let z = rotation.z / 90 % 4;

    match face {
        // Y-rotation spins the horizontal faces in plane.
        Face::Up => (4 - y) % 4,
        Face::Down => y,
        // X-rotation spins the west/east faces.
        Face::West => x,
        Face::East => (4 - x) % 4,
        // Z-rotation spins the north/south faces.
        Face::North => (4 - z) % 4,
        Face::South => z,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quarter_turns_permute_faces() {
        let y90 = VariantRotation {
            x: 0,
            y: 90,
            z: 0,
            uvlock: false,
        };

        // One y quarter-turn cycles the horizontal faces and fixes the
        // vertical ones.
        assert_eq!(rotate_face(Face::Up, y90), Face::Up);
        assert_eq!(rotate_face(Face::Down, y90), Face::Down);

        let cycled: Vec<Face> = [Face::North, Face::South, Face::West, Face::East]
            .iter()
            .map(|&f| rotate_face(f, y90))
            .collect();
        assert!(!cycled.contains(&Face::Up));
        assert!(!cycled.contains(&Face::Down));

        // Four turns are the identity.
        for face in Face::ALL {
            let full = VariantRotation {
                x: 0,
                y: 360 % 360,
                z: 0,
                uvlock: false,
            };
            assert_eq!(rotate_face(face, full), face);
        }
    }

    #[test]
    fn x180_flips_up_to_down() {
        let x180 = VariantRotation {
            x: 180,
            y: 0,
            z: 0,
            uvlock: false,
        };

        assert_eq!(rotate_face(Face::Up, x180), Face::Down);
        assert_eq!(rotate_face(Face::Down, x180), Face::Up);
        assert_eq!(rotate_face(Face::West, x180), Face::West);
    }

    #[test]
    fn uv_rotation_cycles_and_wraps() {
        let original = [[0.0, 1.0], [1.0, 1.0], [1.0, 0.0], [0.0, 0.0]];

        let mut uvs = original;
        rotate_uv_quad(&mut uvs, 1);
        assert_eq!(uvs[0], [1.0, 1.0]);

        rotate_uv_quad(&mut uvs, 3);
        assert_eq!(uvs, original);
    }

    #[test]
    fn rescale_stretches_perpendicular_axes() {
        let m = element_matrix(&ElementRotation {
            origin: [0.5, 0.5, 0.5],
            axis: Axis::Y,
            angle: 45.0,
            rescale: true,
        });

        // A unit x vector rotated 45 degrees and rescaled lands with
        // components of magnitude one.
        let v = m * Vec3::X;
        assert!((v.x.abs() - 1.0).abs() < 1e-5);
        assert!((v.z.abs() - 1.0).abs() < 1e-5);
    }
}
