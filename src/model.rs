use std::io::BufRead;
use std::path::Path;

use anyhow::Context;
use bytemuck::{Pod, Zeroable};
use glam::Vec3;
use itertools::izip;

use crate::math::bounds::AABB;

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: Vec3,
    pub normal: Vec3,
}

impl Vertex {
    pub fn new(position: Vec3, normal: Vec3) -> Self {
        Self { position, normal }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Mesh {
    pub name: String,
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
}

impl Mesh {
    pub fn load_obj(path: impl AsRef<Path>) -> anyhow::Result<Mesh> {
        let path = path.as_ref();
        let (models, _materials) = tobj::load_obj(path, &Self::obj_load_options())
            .with_context(|| format!("Failed to parse OBJ file {}", path.display()))?;

        let name = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_else(|| "Model".to_string());

        Self::from_obj_models(name, &models)
    }

    /// Parses OBJ source from memory. Material libraries are not resolved.
    pub fn from_obj_reader(
        name: impl Into<String>,
        reader: &mut impl BufRead,
    ) -> anyhow::Result<Mesh> {
        let (models, _materials) =
            tobj::load_obj_buf(reader, &Self::obj_load_options(), |_| {
                Err(tobj::LoadError::OpenFileFailed)
            })
            .context("Failed to parse OBJ source")?;

        Self::from_obj_models(name, &models)
    }

    fn obj_load_options() -> tobj::LoadOptions {
        tobj::LoadOptions {
            triangulate: true,
            single_index: true,
            ..Default::default()
        }
    }

    /// Merges every object/group of the file into one mesh.
    fn from_obj_models(name: impl Into<String>, models: &[tobj::Model]) -> anyhow::Result<Mesh> {
        let mut mesh = Mesh {
            name: name.into(),
            ..Default::default()
        };

        if models.len() > 1 {
            log::debug!(
                "OBJ {} contains {} groups, merging them",
                mesh.name,
                models.len()
            );
        }

        let mut needs_normals = false;

        for model in models {
            let source = &model.mesh;
            if source.positions.is_empty() {
                continue;
            }

            let base = mesh.vertices.len() as u32;
            let positions = source.positions.chunks_exact(3).map(Vec3::from_slice);

            if source.normals.len() == source.positions.len() {
                let normals = source.normals.chunks_exact(3).map(Vec3::from_slice);
                mesh.vertices.extend(
                    izip!(positions, normals)
                        .map(|(position, normal)| Vertex::new(position, normal)),
                );
            } else {
                needs_normals = true;
                mesh.vertices
                    .extend(positions.map(|position| Vertex::new(position, Vec3::ZERO)));
            }

            mesh.indices
                .extend(source.indices.iter().map(|index| base + index));
        }

        if mesh.vertices.is_empty() || mesh.indices.is_empty() {
            return Err(anyhow::anyhow!("OBJ without faces: {}", mesh.name));
        }

        if let Some(index) = mesh
            .indices
            .iter()
            .find(|&&index| index as usize >= mesh.vertices.len())
        {
            return Err(anyhow::anyhow!(
                "OBJ {} references missing vertex {}",
                mesh.name,
                index
            ));
        }

        if needs_normals {
            mesh.compute_smooth_normals();
        }

        Ok(mesh)
    }

    /// Area-weighted vertex normals.
    pub fn compute_smooth_normals(&mut self) {
        for vertex in &mut self.vertices {
            vertex.normal = Vec3::ZERO;
        }

        for triangle in self.indices.chunks_exact(3) {
            let [a, b, c] = [triangle[0], triangle[1], triangle[2]].map(|i| i as usize);
            let face_normal = (self.vertices[b].position - self.vertices[a].position)
                .cross(self.vertices[c].position - self.vertices[a].position);

            for i in [a, b, c] {
                self.vertices[i].normal += face_normal;
            }
        }

        for vertex in &mut self.vertices {
            vertex.normal = vertex.normal.normalize_or_zero();
        }
    }

    pub fn bounds(&self) -> Option<AABB> {
        AABB::from_points(self.vertices.iter().map(|vertex| vertex.position))
    }

    /// Moves the bounding box center to the origin and scales the largest extent to 1.
    pub fn normalized(mut self) -> Self {
        let Some(bounds) = self.bounds() else {
            return self;
        };

        let center = bounds.center();
        let extent = bounds.size().max_element();
        let scale = if extent > f32::EPSILON { 1.0 / extent } else { 1.0 };

        for vertex in &mut self.vertices {
            vertex.position = (vertex.position - center) * scale;
        }

        self
    }

    pub fn translate(&mut self, offset: Vec3) {
        for vertex in &mut self.vertices {
            vertex.position += offset;
        }
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}
