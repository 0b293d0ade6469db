//! Smooth lighting and ambient occlusion sampling against the bordered
//! chunk.

use glam::IVec3;

use crate::bordered::{BorderedChunk, BORDERED_SIZE};

/// Per-corner signs in (t1, t2) order for bottom-left, bottom-right,
/// top-right, top-left.
const CORNER_SIGNS: [(i32, i32); 4] = [(-1, -1), (1, -1), (1, 1), (-1, 1)];

fn clamp_cell(v: IVec3) -> IVec3 {
    v.clamp(IVec3::ZERO, IVec3::splat(BORDERED_SIZE as i32 - 1))
}

fn sky(bordered: &BorderedChunk, v: IVec3) -> u8 {
    let v = clamp_cell(v);
    bordered.sky_light(v.x, v.y, v.z)
}

fn block(bordered: &BorderedChunk, v: IVec3) -> u8 {
    let v = clamp_cell(v);
    bordered.block_light(v.x, v.y, v.z)
}

/// Smooth light for the four corners of one face.
///
/// Each corner averages the light of the four cells touching it in front
/// of the face: the front cell, its two tangent neighbors, and the
/// diagonal. Dark (zero) samples are replaced by the front cell's value so
/// faces against unloaded or solid cells do not drag the average down.
/// Sky and block light average independently; results are `(sky, block)`
/// pairs.
pub fn corner_light(
    bordered: &BorderedChunk,
    cell: IVec3,
    normal: IVec3,
    t1: IVec3,
    t2: IVec3,
) -> [(u8, u8); 4] {
    let front = cell + normal;

    let front_sky = sky(bordered, front);
    let front_block = block(bordered, front);

    CORNER_SIGNS.map(|(s1, s2)| {
        let side1 = front + t1 * s1;
        let side2 = front + t2 * s2;
        let corner = front + t1 * s1 + t2 * s2;

        let mut sky_sum = 0_u16;
        let mut block_sum = 0_u16;

        for sample in [front, side1, side2, corner] {
            let s = sky(bordered, sample);
            let b = block(bordered, sample);

            sky_sum += u16::from(if s == 0 { front_sky } else { s });
            block_sum += u16::from(if b == 0 { front_block } else { b });
        }

        ((sky_sum / 4) as u8, (block_sum / 4) as u8)
    })
}

/// Ambient occlusion for the four corners of one face: 0 (fully occluded)
/// through 3 (open). `occludes` judges one neighboring block id.
///
/// When both side neighbors occlude, the corner is fully dark regardless
/// of the diagonal, which kills light leaking through seam diagonals.
pub fn corner_ao(
    bordered: &BorderedChunk,
    cell: IVec3,
    normal: IVec3,
    t1: IVec3,
    t2: IVec3,
    occludes: impl Fn(u32) -> bool,
) -> [u8; 4] {
    let front = cell + normal;

    CORNER_SIGNS.map(|(s1, s2)| {
        let side1 = clamp_cell(front + t1 * s1);
        let side2 = clamp_cell(front + t2 * s2);
        let corner = clamp_cell(front + t1 * s1 + t2 * s2);

        let o1 = occludes(bordered.block_at(side1.x, side1.y, side1.z));
        let o2 = occludes(bordered.block_at(side2.x, side2.y, side2.z));
        let oc = occludes(bordered.block_at(corner.x, corner.y, corner.z));

        if o1 && o2 {
            0
        } else {
            3 - (u8::from(o1) + u8::from(o2) + u8::from(oc))
        }
    })
}
