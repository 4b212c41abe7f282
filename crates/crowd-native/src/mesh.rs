use glam::Vec3;

#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
}

/// Axis-aligned box between `min` and `max` as a 36-vertex triangle list.
pub fn box_mesh(min: Vec3, max: Vec3) -> Vec<Vertex> {
    let center = (min + max) * 0.5;
    let half = (max - min) * 0.5;
    // (normal, u, v) per face
    let faces = [
        (Vec3::X, Vec3::Y, Vec3::Z),
        (Vec3::NEG_X, Vec3::Z, Vec3::Y),
        (Vec3::Y, Vec3::Z, Vec3::X),
        (Vec3::NEG_Y, Vec3::X, Vec3::Z),
        (Vec3::Z, Vec3::X, Vec3::Y),
        (Vec3::NEG_Z, Vec3::Y, Vec3::X),
    ];
    let mut vertices = Vec::with_capacity(36);
    for (normal, u, v) in faces {
        let face_center = center + normal * half;
        let du = u * half;
        let dv = v * half;
        let corners = [
            face_center - du - dv,
            face_center + du - dv,
            face_center + du + dv,
            face_center - du + dv,
        ];
        for i in [0, 1, 2, 0, 2, 3] {
            vertices.push(Vertex {
                position: corners[i].to_array(),
                normal: normal.to_array(),
            });
        }
    }
    vertices
}

/// Seated figure: a block rising from the seat origin.
pub fn human_mesh() -> Vec<Vertex> {
    box_mesh(Vec3::new(-0.16, 0.0, -0.12), Vec3::new(0.16, 1.05, 0.12))
}

/// Light wand: a thin stick growing up from the hand.
pub fn penlight_mesh() -> Vec<Vertex> {
    box_mesh(Vec3::new(-0.02, 0.0, -0.02), Vec3::new(0.02, 0.32, 0.02))
}

/// Unit box used for the per-block floor slabs; scaled per instance.
pub fn slab_mesh() -> Vec<Vertex> {
    box_mesh(Vec3::splat(-0.5), Vec3::splat(0.5))
}
