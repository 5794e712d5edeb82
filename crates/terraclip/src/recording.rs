//! # Recording Backend
//!
//! A `RenderBackend` that performs every operation on plain memory: the
//! height texture array is a `Vec<HeightTexel>`, the instance buffer a
//! `Vec<u8>`, and draws are kept as `DrawCommand`s until the next frame's
//! instance upload.

use terraclip_rendering::{
    DrawCommand, DrawSink, HeightTexel, InstanceParams, MeshId, RenderBackend, TextureId, UploadSink,
};

/// A static mesh as handed to the backend.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MeshRecord {
    /// Vertex grid coordinates.
    pub vertices: Vec<[u8; 2]>,
    /// Strip indices.
    pub indices: Vec<u16>,
}

/// A height texture array held in memory.
#[derive(Debug, Clone, PartialEq)]
pub struct TextureRecord {
    /// Texels along one edge.
    pub size: u32,
    /// Layer count.
    pub layers: u32,
    /// All layers, row-major, layer after layer.
    pub texels: Vec<HeightTexel>,
}

impl TextureRecord {
    /// One layer of the array.
    #[must_use]
    pub fn layer(&self, level: u32) -> &[HeightTexel] {
        let len = (self.size * self.size) as usize;
        let start = len * level as usize;
        &self.texels[start..start + len]
    }
}

/// Running totals across every frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RecordingTotals {
    /// `upload_region` calls.
    pub region_uploads: u64,
    /// Texels written by `upload_region`.
    pub texels_uploaded: u64,
    /// `issue_instanced_draw` calls.
    pub draws: u64,
    /// Instances drawn.
    pub instances_drawn: u64,
    /// Uploads rejected for falling outside the texture.
    pub rejected_uploads: u64,
}

/// Backend that records instead of rendering.
#[derive(Debug, Default)]
pub struct RecordingBackend {
    meshes: Vec<MeshRecord>,
    texture: Option<TextureRecord>,
    instance_bytes: Vec<u8>,
    frame_draws: Vec<DrawCommand>,
    waited: Vec<u64>,
    totals: RecordingTotals,
}

impl RecordingBackend {
    /// Creates an empty backend.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Meshes created so far.
    #[must_use]
    pub fn meshes(&self) -> &[MeshRecord] {
        &self.meshes
    }

    /// The height texture, once created.
    #[must_use]
    pub fn texture(&self) -> Option<&TextureRecord> {
        self.texture.as_ref()
    }

    /// Instance bytes of the latest frame.
    #[must_use]
    pub fn instance_bytes(&self) -> &[u8] {
        &self.instance_bytes
    }

    /// Draws issued since the latest instance upload.
    #[must_use]
    pub fn frame_draws(&self) -> &[DrawCommand] {
        &self.frame_draws
    }

    /// Instances of one recorded draw, decoded from the instance bytes.
    ///
    /// Returns `None` if the draw points outside the uploaded bytes.
    #[must_use]
    pub fn draw_instances(&self, command: &DrawCommand) -> Option<Vec<InstanceParams>> {
        let start = command.instance_buffer_offset;
        let end = start + command.instance_count as usize * InstanceParams::SIZE;
        let bytes = self.instance_bytes.get(start..end)?;
        Some(
            bytes
                .chunks_exact(InstanceParams::SIZE)
                .map(bytemuck::pod_read_unaligned)
                .collect(),
        )
    }

    /// Frames `wait_for_frame` was called with, in order.
    #[must_use]
    pub fn waited(&self) -> &[u64] {
        &self.waited
    }

    /// Totals across every frame.
    #[must_use]
    pub const fn totals(&self) -> RecordingTotals {
        self.totals
    }
}

impl UploadSink for RecordingBackend {
    fn upload_region(&mut self, level: u32, x: u32, y: u32, width: u32, height: u32, data: &[HeightTexel]) {
        let Some(texture) = self.texture.as_mut() else {
            tracing::warn!(level, "height upload before texture creation");
            self.totals.rejected_uploads += 1;
            return;
        };
        let size = texture.size;
        if level >= texture.layers
            || x + width > size
            || y + height > size
            || data.len() != (width * height) as usize
        {
            tracing::warn!(level, x, y, width, height, texels = data.len(), "rejected out-of-range upload");
            self.totals.rejected_uploads += 1;
            return;
        }

        if data.is_empty() {
            return;
        }

        let layer = (size * size * level) as usize;
        for (row, chunk) in data.chunks_exact(width as usize).enumerate() {
            let start = layer + ((y + row as u32) * size + x) as usize;
            texture.texels[start..start + width as usize].copy_from_slice(chunk);
        }
        self.totals.region_uploads += 1;
        self.totals.texels_uploaded += data.len() as u64;
    }

    fn wait_for_frame(&mut self, frame: u64) {
        self.waited.push(frame);
    }
}

impl DrawSink for RecordingBackend {
    fn upload_instances(&mut self, bytes: &[u8]) {
        self.instance_bytes.clear();
        self.instance_bytes.extend_from_slice(bytes);
        self.frame_draws.clear();
    }

    fn issue_instanced_draw(&mut self, command: &DrawCommand) {
        self.totals.draws += 1;
        self.totals.instances_drawn += u64::from(command.instance_count);
        self.frame_draws.push(command.clone());
    }
}

impl RenderBackend for RecordingBackend {
    fn create_static_mesh(&mut self, vertices: &[[u8; 2]], indices: &[u16]) -> MeshId {
        self.meshes.push(MeshRecord {
            vertices: vertices.to_vec(),
            indices: indices.to_vec(),
        });
        MeshId(self.meshes.len() as u32 - 1)
    }

    fn create_height_texture(&mut self, size: u32, layers: u32) -> TextureId {
        tracing::debug!(size, layers, "recording height texture");
        self.texture = Some(TextureRecord {
            size,
            layers,
            texels: vec![HeightTexel::default(); (size * size * layers) as usize],
        });
        TextureId(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texel(height: f32) -> HeightTexel {
        HeightTexel {
            height,
            coarse_height: height,
        }
    }

    #[test]
    fn test_upload_writes_rows() {
        let mut backend = RecordingBackend::new();
        backend.create_height_texture(4, 2);
        backend.upload_region(1, 1, 2, 2, 2, &[texel(1.0), texel(2.0), texel(3.0), texel(4.0)]);

        let layer = backend.texture().unwrap().layer(1);
        assert_eq!(layer[2 * 4 + 1].height, 1.0);
        assert_eq!(layer[2 * 4 + 2].height, 2.0);
        assert_eq!(layer[3 * 4 + 1].height, 3.0);
        assert_eq!(layer[3 * 4 + 2].height, 4.0);
        assert_eq!(backend.texture().unwrap().layer(0), &[HeightTexel::default(); 16]);
        assert_eq!(backend.totals().texels_uploaded, 4);
    }

    #[test]
    fn test_out_of_range_upload_is_rejected() {
        let mut backend = RecordingBackend::new();
        backend.upload_region(0, 0, 0, 1, 1, &[texel(1.0)]);
        backend.create_height_texture(4, 1);
        backend.upload_region(0, 3, 0, 2, 1, &[texel(1.0), texel(2.0)]);
        backend.upload_region(1, 0, 0, 1, 1, &[texel(1.0)]);

        assert_eq!(backend.totals().rejected_uploads, 3);
        assert_eq!(backend.totals().region_uploads, 0);
    }

    #[test]
    fn test_draw_instances_decode() {
        let mut backend = RecordingBackend::new();
        let params = [
            InstanceParams {
                level: 1.0,
                ..InstanceParams::default()
            },
            InstanceParams {
                level: 2.0,
                ..InstanceParams::default()
            },
        ];
        backend.upload_instances(bytemuck::cast_slice(&params));
        let command = DrawCommand {
            mesh: MeshId(0),
            kind: terraclip_rendering::BlockKind::MainBlock,
            index_range: 0..6,
            instance_count: 1,
            instance_buffer_offset: InstanceParams::SIZE,
        };
        backend.issue_instanced_draw(&command);

        assert_eq!(backend.draw_instances(&command).unwrap()[0].level, 2.0);
        assert_eq!(backend.frame_draws().len(), 1);

        let past_end = DrawCommand {
            instance_count: 2,
            ..command
        };
        assert!(backend.draw_instances(&past_end).is_none());
    }
}
