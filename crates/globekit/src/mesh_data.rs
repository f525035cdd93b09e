use glam::Vec3;
use std::f32::consts::{PI, TAU};

/// Raw mesh data that can be used by any rendering engine
#[derive(Debug, Clone)]
pub struct MeshData {
    pub positions: Vec<[f32; 3]>,
    pub normals: Vec<[f32; 3]>,
    pub uvs: Vec<[f32; 2]>,
    pub indices: Vec<u32>,
}

impl MeshData {
    /// UV sphere laid out like [`crate::projection::project`]: `u` runs with
    /// longitude from -180°, `v` from the north pole down. An equirectangular
    /// world map drapes over it with projected points landing on their pixels.
    ///
    /// The seam column is duplicated so `u` can reach 1.0. Triangles wind
    /// counter-clockwise seen from outside.
    pub fn uv_sphere(radius: f32, sectors: u32, stacks: u32) -> Self {
        let sectors = sectors.max(3);
        let stacks = stacks.max(2);
        let row = sectors + 1;
        let vertex_count = (row * (stacks + 1)) as usize;

        let mut positions = Vec::with_capacity(vertex_count);
        let mut normals = Vec::with_capacity(vertex_count);
        let mut uvs = Vec::with_capacity(vertex_count);

        for j in 0..=stacks {
            let v = j as f32 / stacks as f32;
            let phi = v * PI;
            for i in 0..=sectors {
                let u = i as f32 / sectors as f32;
                let theta = u * TAU;
                let normal = Vec3::new(-phi.sin() * theta.cos(), phi.cos(), phi.sin() * theta.sin());
                positions.push((normal * radius).to_array());
                normals.push(normal.to_array());
                uvs.push([u, v]);
            }
        }

        let mut indices = Vec::with_capacity((sectors * stacks * 6) as usize);
        for j in 0..stacks {
            for i in 0..sectors {
                let i0 = j * row + i;
                let i1 = i0 + 1;
                let i2 = i0 + row;
                let i3 = i2 + 1;
                indices.extend_from_slice(&[i0, i2, i1, i1, i2, i3]);
            }
        }

        Self {
            positions,
            normals,
            uvs,
            indices,
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}
