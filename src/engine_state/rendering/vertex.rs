//! Vertex data structures and layouts for voxel rendering.
//!
//! The encoder produces one [`ChunkVertexData`] per chunk regeneration: five
//! parallel attribute streams plus a vertex count. The bundle is handed to the
//! renderer once and then dropped; it is never kept by the world.

/// Number of vertices emitted per visible face (two triangles, no index buffer).
pub const VOXEL_FACE_VERTS: usize = 6;
/// Number of vertices for a block with all six faces visible.
pub const VOXEL_CUBE_VERTS: usize = VOXEL_FACE_VERTS * 6;

/// Components per position (x, y, z).
pub const VOXEL_VP_COMPS: usize = 3;
/// Components per normal (x, y, z, sun factor).
pub const VOXEL_VN_COMPS: usize = 4;
/// Components per texture coordinate (s, t).
pub const VOXEL_VT_COMPS: usize = 2;
/// Components per palette index.
pub const VOXEL_VPALIDX_COMPS: usize = 1;
/// Components per picking key (column, height, face).
pub const VOXEL_VPICKING_COMPS: usize = 3;

/// Scalar type of an attribute stream.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum StreamFormat {
    /// 32-bit floats
    Float32,
    /// 32-bit unsigned integers
    Uint32,
}

/// Describes one attribute stream for the renderer.
///
/// # Shader Attributes
/// - `location = 0`: position (vec3<f32>)
/// - `location = 1`: palette index (u32)
/// - `location = 2`: picking key (vec3<f32>)
/// - `location = 3`: texture coordinates (vec2<f32>)
/// - `location = 4`: normal and sun factor (vec4<f32>)
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct StreamLayout {
    /// Attribute name as used by the shaders
    pub name: &'static str,
    /// Shader input location
    pub shader_location: u32,
    /// Number of components per vertex
    pub components: usize,
    /// Scalar type of each component
    pub format: StreamFormat,
}

impl StreamLayout {
    /// Bytes per vertex in this stream.
    pub fn stride(&self) -> usize {
        self.components * 4
    }
}

/// Layouts of the five streams, in shader-location order.
pub const STREAM_LAYOUTS: [StreamLayout; 5] = [
    StreamLayout {
        name: "a_vp",
        shader_location: 0,
        components: VOXEL_VP_COMPS,
        format: StreamFormat::Float32,
    },
    StreamLayout {
        name: "a_vpal_idx",
        shader_location: 1,
        components: VOXEL_VPALIDX_COMPS,
        format: StreamFormat::Uint32,
    },
    StreamLayout {
        name: "a_vpicking",
        shader_location: 2,
        components: VOXEL_VPICKING_COMPS,
        format: StreamFormat::Float32,
    },
    StreamLayout {
        name: "a_vt",
        shader_location: 3,
        components: VOXEL_VT_COMPS,
        format: StreamFormat::Float32,
    },
    StreamLayout {
        name: "a_vn",
        shader_location: 4,
        components: VOXEL_VN_COMPS,
        format: StreamFormat::Float32,
    },
];

/// Parallel per-vertex attribute streams for one chunk.
///
/// Every stream holds exactly one entry per vertex. The streams are only ever
/// extended a whole face at a time through [`ChunkVertexData::push_face`], which
/// keeps them the same length.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ChunkVertexData {
    /// Vertex positions in encoder units
    pub positions: Vec<[f32; VOXEL_VP_COMPS]>,
    /// Palette texture layer per vertex
    pub palette_indices: Vec<u32>,
    /// Picking key per vertex
    pub picking: Vec<[f32; VOXEL_VPICKING_COMPS]>,
    /// Texture coordinates per vertex
    pub texcoords: Vec<[f32; VOXEL_VT_COMPS]>,
    /// Face normal in xyz, 1.0 in w when the face is sunlit
    pub normals: Vec<[f32; VOXEL_VN_COMPS]>,
}

/// The per-vertex values of one face, before they are copied into the streams.
pub struct FaceAttributes<'a> {
    /// The six corner positions
    pub positions: &'a [[f32; VOXEL_VP_COMPS]; VOXEL_FACE_VERTS],
    /// The six texture coordinates
    pub texcoords: &'a [[f32; VOXEL_VT_COMPS]; VOXEL_FACE_VERTS],
    /// Palette layer shared by all six vertices
    pub palette_index: u32,
    /// Picking key shared by all six vertices
    pub picking: [f32; VOXEL_VPICKING_COMPS],
    /// Normal and sun factor shared by all six vertices
    pub normal: [f32; VOXEL_VN_COMPS],
}

impl ChunkVertexData {
    /// Creates empty streams with room for `vertices` vertices each.
    pub fn with_capacity(vertices: usize) -> Self {
        ChunkVertexData {
            positions: Vec::with_capacity(vertices),
            palette_indices: Vec::with_capacity(vertices),
            picking: Vec::with_capacity(vertices),
            texcoords: Vec::with_capacity(vertices),
            normals: Vec::with_capacity(vertices),
        }
    }

    /// Appends one face's six vertices to every stream.
    pub fn push_face(&mut self, face: FaceAttributes<'_>) {
        self.positions.extend_from_slice(face.positions);
        self.texcoords.extend_from_slice(face.texcoords);
        for _ in 0..VOXEL_FACE_VERTS {
            self.palette_indices.push(face.palette_index);
            self.picking.push(face.picking);
            self.normals.push(face.normal);
        }
    }

    /// Releases the unused worst-case capacity of every stream.
    pub fn shrink_to_fit(&mut self) {
        self.positions.shrink_to_fit();
        self.palette_indices.shrink_to_fit();
        self.picking.shrink_to_fit();
        self.texcoords.shrink_to_fit();
        self.normals.shrink_to_fit();
    }

    /// Number of vertices shared by all streams.
    ///
    /// # Panics
    /// Panics if the streams disagree on their length.
    pub fn vertex_count(&self) -> usize {
        let count = self.positions.len();
        assert!(
            self.palette_indices.len() == count
                && self.picking.len() == count
                && self.texcoords.len() == count
                && self.normals.len() == count,
            "vertex stream size mismatch: {} positions, {} palette indices, {} picking keys, {} texcoords, {} normals",
            count,
            self.palette_indices.len(),
            self.picking.len(),
            self.texcoords.len(),
            self.normals.len(),
        );
        count
    }

    /// Number of faces encoded.
    pub fn face_count(&self) -> usize {
        self.vertex_count() / VOXEL_FACE_VERTS
    }

    /// Whether no faces were emitted.
    pub fn is_empty(&self) -> bool {
        self.vertex_count() == 0
    }

    /// Raw bytes of the position stream.
    pub fn position_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.positions)
    }

    /// Raw bytes of the palette index stream.
    pub fn palette_index_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.palette_indices)
    }

    /// Raw bytes of the picking key stream.
    pub fn picking_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.picking)
    }

    /// Raw bytes of the texture coordinate stream.
    pub fn texcoord_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.texcoords)
    }

    /// Raw bytes of the normal stream.
    pub fn normal_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.normals)
    }

    /// Every stream's bytes, in [`STREAM_LAYOUTS`] order.
    pub fn stream_bytes(&self) -> [&[u8]; 5] {
        [
            self.position_bytes(),
            self.palette_index_bytes(),
            self.picking_bytes(),
            self.texcoord_bytes(),
            self.normal_bytes(),
        ]
    }
}
