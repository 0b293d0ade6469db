//! The fluid pass: water and lava surfaces are meshed from block ids
//! directly, independent of block models.

use calcite_assets::{BlockRegistry, RenderLayer, TextureIdRange};
use glam::{IVec3, Vec3};

use crate::bordered::BorderedChunk;
use crate::vertex::{pack_light, pack_uv, MeshData, PackedVertexLight, Vertex};

/// Fluid surfaces sit slightly below the cell top so shore blocks read.
const SURFACE_HEIGHT: f32 = 0.9;

/// A submerged side face starts below the cell so stacked fluid columns
/// do not show seams.
const SUBMERGED_START: f32 = -0.1;

/// Water biome-tints through the color table; lava does not.
const WATER_TINT: u8 = 50;
const NO_TINT: u8 = 0xff;

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum FluidKind {
    Water,
    Lava,
}

/// Which cells carry a fluid body. Kelp and seagrass are always
/// waterlogged, so their cells mesh water around the plant model.
pub fn fluid_kind(name: &str) -> Option<FluidKind> {
    match name {
        "minecraft:water" | "minecraft:kelp" | "minecraft:kelp_plant" | "minecraft:seagrass"
        | "minecraft:tall_seagrass" => Some(FluidKind::Water),
        "minecraft:lava" => Some(FluidKind::Lava),
        _ => None,
    }
}

pub struct FluidTextures {
    pub water: TextureIdRange,
    pub lava: TextureIdRange,
}

struct Neighbor {
    same_fluid: bool,
    occluding: bool,
    air: bool,
}

fn classify(registry: &BlockRegistry, id: u32, kind: FluidKind) -> Neighbor {
    if id == 0 {
        return Neighbor {
            same_fluid: false,
            occluding: false,
            air: true,
        };
    }

    let Some(state) = registry.state(id) else {
        return Neighbor {
            same_fluid: false,
            occluding: false,
            air: true,
        };
    };

    Neighbor {
        same_fluid: fluid_kind(&registry.info(state).name) == Some(kind),
        occluding: state.model.has_occluding,
        air: false,
    }
}

/// Meshes the fluid body of one cell.
#[allow(clippy::too_many_arguments)]
pub(crate) fn mesh_fluid(
    out: &mut MeshData,
    bordered: &BorderedChunk,
    registry: &BlockRegistry,
    textures: &FluidTextures,
    kind: FluidKind,
    cell: IVec3,
    origin: Vec3,
) {
    let (range, tint, layer) = match kind {
        FluidKind::Water => (&textures.water, WATER_TINT, RenderLayer::Alpha),
        FluidKind::Lava => (&textures.lava, NO_TINT, RenderLayer::Standard),
    };

    let sky = bordered.sky_light(cell.x, cell.y, cell.z);
    let block_light = bordered.block_light(cell.x, cell.y, cell.z);
    let light = pack_light(sky, block_light, 3, false);

    let packed = PackedVertexLight::new()
        .with_light(light)
        .with_tint_index(tint)
        .with_anim_count(range.count.min(127) as u8);

    let vertex = |pos: Vec3, u: f32, v: f32| Vertex {
        position: (origin + pos).to_array(),
        packed_uv: pack_uv(u, v),
        texture_id: range.base,
        packed_light: packed,
    };

    let mut quad = |corners: [Vertex; 4]| out.layer_mut(layer).push_quad(corners);

    let above = classify(
        registry,
        bordered.block_at(cell.x, cell.y + 1, cell.z),
        kind,
    );
    let below = classify(
        registry,
        bordered.block_at(cell.x, cell.y - 1, cell.z),
        kind,
    );

    let top = if above.same_fluid { 1.0 } else { SURFACE_HEIGHT };
    let bottom = if below.same_fluid { SUBMERGED_START } else { 0.0 };

    if !above.same_fluid && !above.occluding {
        quad([
            vertex(Vec3::new(0.0, top, 1.0), 0.0, 1.0),
            vertex(Vec3::new(1.0, top, 1.0), 1.0, 1.0),
            vertex(Vec3::new(1.0, top, 0.0), 1.0, 0.0),
            vertex(Vec3::new(0.0, top, 0.0), 0.0, 0.0),
        ]);
    }

    if below.air {
        quad([
            vertex(Vec3::new(0.0, 0.0, 0.0), 0.0, 1.0),
            vertex(Vec3::new(1.0, 0.0, 0.0), 1.0, 1.0),
            vertex(Vec3::new(1.0, 0.0, 1.0), 1.0, 0.0),
            vertex(Vec3::new(0.0, 0.0, 1.0), 0.0, 0.0),
        ]);
    }

    // Side faces: (direction, the two bottom corners left-to-right as seen
    // from outside).
    let sides: [(IVec3, Vec3, Vec3); 4] = [
        (IVec3::NEG_Z, Vec3::new(1.0, 0.0, 0.0), Vec3::new(0.0, 0.0, 0.0)),
        (IVec3::Z, Vec3::new(0.0, 0.0, 1.0), Vec3::new(1.0, 0.0, 1.0)),
        (IVec3::NEG_X, Vec3::new(0.0, 0.0, 0.0), Vec3::new(0.0, 0.0, 1.0)),
        (IVec3::X, Vec3::new(1.0, 0.0, 1.0), Vec3::new(1.0, 0.0, 0.0)),
    ];

    for (dir, left, right) in sides {
        let neighbor = classify(
            registry,
            bordered.block_at(cell.x + dir.x, cell.y + dir.y, cell.z + dir.z),
            kind,
        );

        if neighbor.same_fluid || neighbor.occluding {
            continue;
        }

        let lift = Vec3::new(0.0, top - bottom, 0.0);
        let base = Vec3::new(0.0, bottom, 0.0);

        quad([
            vertex(left + base, 0.0, 1.0),
            vertex(right + base, 1.0, 1.0),
            vertex(right + base + lift, 1.0, 0.0),
            vertex(left + base + lift, 0.0, 0.0),
        ]);
    }
}
