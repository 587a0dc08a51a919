use glam::{Vec2, Vec3};
use lyon::math::point;
use lyon::path::Path;
use lyon::tessellation::{
    BuffersBuilder, FillOptions, FillRule, FillTessellator, FillVertex, VertexBuffers,
};

use crate::model::{Mesh, Vertex};
use crate::text::font::{Contour, Font};

#[derive(Debug, Clone)]
pub struct TextOptions {
    /// Height of an em in world units.
    pub size: f32,
    /// Extrusion along +Z.
    pub depth: f32,
    pub curve_segments: usize,
    /// Center the mesh on its bounding box.
    pub center: bool,
}

impl Default for TextOptions {
    fn default() -> Self {
        Self {
            size: 0.5,
            depth: 0.1,
            curve_segments: 12,
            center: true,
        }
    }
}

/// Builds an extruded, lit mesh for `text`. Text without any drawable glyph
/// yields an empty mesh.
pub fn build_text_mesh(font: &Font, text: &str, options: &TextOptions) -> anyhow::Result<Mesh> {
    let contours = font.layout(text, options.size, options.curve_segments);
    let mut mesh = Mesh {
        name: format!("Text ({text})"),
        ..Default::default()
    };

    if contours.is_empty() {
        return Ok(mesh);
    }

    let cap = tessellate_caps(&contours)?;
    push_cap(&mut mesh, &cap, options.depth, Vec3::Z);
    push_cap(&mut mesh, &cap, 0.0, Vec3::NEG_Z);

    for contour in &contours {
        push_walls(&mut mesh, contour, options.depth);
    }

    if options.center {
        if let Some(bounds) = mesh.bounds() {
            mesh.translate(-bounds.center());
        }
    }

    Ok(mesh)
}

fn tessellate_caps(contours: &[Contour]) -> anyhow::Result<VertexBuffers<Vec2, u32>> {
    let mut builder = Path::builder();
    for contour in contours {
        builder.begin(point(contour[0].x, contour[0].y));
        for vertex in &contour[1..] {
            builder.line_to(point(vertex.x, vertex.y));
        }
        builder.end(true);
    }
    let path = builder.build();

    let mut buffers: VertexBuffers<Vec2, u32> = VertexBuffers::new();
    let options = FillOptions::tolerance(0.001).with_fill_rule(FillRule::NonZero);

    FillTessellator::new()
        .tessellate_path(
            &path,
            &options,
            &mut BuffersBuilder::new(&mut buffers, |vertex: FillVertex| {
                let position = vertex.position();
                Vec2::new(position.x, position.y)
            }),
        )
        .map_err(|err| anyhow::anyhow!("Failed to tessellate text outline: {err:?}"))?;

    Ok(buffers)
}

fn push_cap(mesh: &mut Mesh, cap: &VertexBuffers<Vec2, u32>, z: f32, normal: Vec3) {
    let base = mesh.vertices.len() as u32;

    mesh.vertices.extend(
        cap.vertices
            .iter()
            .map(|vertex| Vertex::new(vertex.extend(z), normal)),
    );
    mesh.indices.extend(cap.indices.iter().map(|index| base + index));
}

fn push_walls(mesh: &mut Mesh, contour: &Contour, depth: f32) {
    for (i, &from) in contour.iter().enumerate() {
        let to = contour[(i + 1) % contour.len()];
        let edge = to - from;
        if edge.length_squared() <= f32::EPSILON {
            continue;
        }

        let normal = Vec3::new(edge.y, -edge.x, 0.0).normalize();
        let base = mesh.vertices.len() as u32;

        mesh.vertices.extend([
            Vertex::new(from.extend(0.0), normal),
            Vertex::new(to.extend(0.0), normal),
            Vertex::new(to.extend(depth), normal),
            Vertex::new(from.extend(depth), normal),
        ]);
        mesh.indices
            .extend([base, base + 1, base + 2, base, base + 2, base + 3]);
    }
}
