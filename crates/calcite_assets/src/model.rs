//! The resolved, render-ready block model data the mesher walks.

/// Draw-ordered buckets controlling blending and shader selection.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
pub enum RenderLayer {
    #[default]
    Standard,
    Flora,
    Leaves,
    Alpha,
}

impl RenderLayer {
    pub const COUNT: usize = 4;

    pub const ALL: [RenderLayer; Self::COUNT] = [
        RenderLayer::Standard,
        RenderLayer::Flora,
        RenderLayer::Leaves,
        RenderLayer::Alpha,
    ];

    pub const fn index(self) -> usize {
        self as usize
    }
}

/// A cube face, in the order block model JSON names them.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum Face {
    Down,
    Up,
    North,
    South,
    West,
    East,
}

impl Face {
    pub const COUNT: usize = 6;

    pub const ALL: [Face; Self::COUNT] = [
        Face::Down,
        Face::Up,
        Face::North,
        Face::South,
        Face::West,
        Face::East,
    ];

    pub const fn index(self) -> usize {
        self as usize
    }

    pub const fn opposite(self) -> Face {
        match self {
            Face::Down => Face::Up,
            Face::Up => Face::Down,
            Face::North => Face::South,
            Face::South => Face::North,
            Face::West => Face::East,
            Face::East => Face::West,
        }
    }

    /// The outward unit normal of this face on an axis-aligned element.
    pub const fn normal(self) -> [i32; 3] {
        match self {
            Face::Down => [0, -1, 0],
            Face::Up => [0, 1, 0],
            Face::North => [0, 0, -1],
            Face::South => [0, 0, 1],
            Face::West => [-1, 0, 0],
            Face::East => [1, 0, 0],
        }
    }

    pub fn from_name(name: &str) -> Option<Face> {
        Some(match name {
            "down" | "bottom" => Face::Down,
            "up" | "top" => Face::Up,
            "north" => Face::North,
            "south" => Face::South,
            "west" => Face::West,
            "east" => Face::East,
            _ => return None,
        })
    }
}

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Axis {
    X,
    Y,
    Z,
}

/// The per-face render record the mesher emits quads from.
#[derive(Clone, PartialEq, Debug)]
pub struct RenderableFace {
    /// UV rectangle in [0,1]^2: `[u0, v0, u1, v1]`.
    pub uv: [f32; 4],
    pub texture_id: u32,
    pub frame_count: u32,
    pub render_layer: RenderLayer,
    /// Extra in-plane texture rotation in degrees: 0, 90, 180 or 270.
    pub rotation: u16,
    /// The neighbor direction that culls this face, if any.
    pub cullface: Option<Face>,
    /// Index into the biome color table; -1 for untinted.
    pub tint_index: i32,
    /// False when the texture could not be resolved; the face is skipped.
    pub render: bool,
    pub transparency: bool,
    /// Decorrelates tiling on e.g. stone and sand via a position hash.
    pub random_flip: bool,
}

impl Default for RenderableFace {
    fn default() -> Self {
        Self {
            uv: [0.0, 0.0, 1.0, 1.0],
            texture_id: 0,
            frame_count: 1,
            render_layer: RenderLayer::Standard,
            rotation: 0,
            cullface: None,
            tint_index: -1,
            render: false,
            transparency: false,
            random_flip: false,
        }
    }
}

/// A rotation of a single element about an arbitrary origin, restricted to
/// the angles block models may use.
#[derive(Copy, Clone, PartialEq, Debug)]
pub struct ElementRotation {
    pub origin: [f32; 3],
    pub axis: Axis,
    /// One of -45, -22.5, 0, 22.5, 45 degrees.
    pub angle: f32,
    /// Rescale the element so rotated diagonals still span the cell.
    pub rescale: bool,
}

/// The whole-element rotation a blockstate variant applies, in quarter
/// turns about the cell centre.
#[derive(Copy, Clone, PartialEq, Eq, Default, Debug)]
pub struct VariantRotation {
    pub x: u16,
    pub y: u16,
    pub z: u16,
    pub uvlock: bool,
}

impl VariantRotation {
    pub fn is_identity(self) -> bool {
        self.x == 0 && self.y == 0 && self.z == 0
    }
}

/// An axis-aligned box within the unit cell, with six renderable faces.
#[derive(Clone, PartialEq, Debug)]
pub struct BlockElement {
    pub from: [f32; 3],
    pub to: [f32; 3],
    pub faces: [RenderableFace; Face::COUNT],
    pub rotation: Option<ElementRotation>,
    pub variant_rotation: VariantRotation,
    /// Whether this element is a full unit cube that can cull neighbors.
    pub occluding: bool,
    /// Whether ambient occlusion and directional shading apply.
    pub shade: bool,
}

impl BlockElement {
    pub fn face(&self, face: Face) -> &RenderableFace {
        &self.faces[face.index()]
    }

    /// The unit-cube test: only full cells occlude their neighbors.
    pub fn covers_unit_cube(&self) -> bool {
        self.from == [0.0, 0.0, 0.0] && self.to == [1.0, 1.0, 1.0]
    }
}

/// The resolved model for one block state: its elements plus aggregate
/// flags the mesher branches on without walking elements.
#[derive(Clone, PartialEq, Default, Debug)]
pub struct BlockModel {
    pub elements: Vec<BlockElement>,
    pub ambient_occlusion: bool,
    pub has_occluding: bool,
    pub has_transparency: bool,
    pub has_shaded: bool,
    pub has_glass: bool,
    pub has_leaves: bool,
    pub has_rotation: bool,
    pub has_variant_rotation: bool,
    pub random_horizontal_offset: bool,
    pub random_vertical_offset: bool,
}

impl BlockModel {
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Recomputes the aggregate flags from the elements. Called after
    /// blockstate resolution may have appended multipart elements.
    pub fn refresh_flags(&mut self) {
        self.has_occluding = false;
        self.has_transparency = false;
        self.has_shaded = false;
        self.has_rotation = false;
        self.has_variant_rotation = false;

        for element in &self.elements {
            self.has_occluding |= element.occluding;
            self.has_shaded |= element.shade;
            self.has_rotation |= element.rotation.is_some();
            self.has_variant_rotation |= !element.variant_rotation.is_identity();
            self.has_transparency |= element.faces.iter().any(|f| f.transparency);
        }
    }
}
