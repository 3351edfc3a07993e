// The music box cylinder: a revolved body plus pin boxes.
//
// The body is built vertically with the axle side at z = 0 and the crank
// side on top. Both ends expose a lip for the end caps to slide onto —
// modeled as recesses in the cap faces, leaving a thin ring wall of
// `lip_width_mm` at each end. The whole body is one closed surface of
// revolution: the wall profile polyline (axis → recess ceiling → inner
// lip wall → bottom annulus → outer wall → top annulus → inner lip wall →
// recess floor → axis) swept around Z in `radial_segments` steps.
//
// Pins are oriented boxes with their long side radial, twice as long as
// they protrude because half remains embedded in the wall. Body and pins
// are separate closed shells in one mesh; slicers union overlapping shells,
// so no boolean solid operations are required.

use crate::mesh::{MeshData, emit_quad, emit_tri};
use serde::{Deserialize, Serialize};
use std::f64::consts::TAU;

/// Cylinder and pin dimensions. All lengths in millimeters.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CylinderConfig {
    /// Total height of the cylinder, axle side at z = 0.
    pub z_height_mm: f64,
    /// Outer radius.
    pub radius_mm: f64,
    /// Ring wall thickness left at each end for the caps to grip.
    pub lip_width_mm: f64,
    /// Recess depth on the crank side (threaded spinner and ratchet).
    pub crank_lip_depth_mm: f64,
    /// Recess depth on the axle side (set screw against the plastic cap).
    pub axle_lip_depth_mm: f64,
    /// Pin cross-section edge length; also the protrusion height.
    pub pin_size_mm: f64,
    /// Angular resolution of the revolved body.
    pub radial_segments: u32,
}

impl Default for CylinderConfig {
    fn default() -> Self {
        // The target mechanism's dimensions.
        CylinderConfig {
            z_height_mm: 20.0,
            radius_mm: 6.5,
            lip_width_mm: 0.55,
            crank_lip_depth_mm: 5.0,
            axle_lip_depth_mm: 7.55,
            pin_size_mm: 0.6,
            radial_segments: 96,
        }
    }
}

/// The cylinder mesh under construction: the body from `build`, then one
/// `add_pin` per placement instruction.
#[derive(Debug)]
pub struct CylinderMesh {
    config: CylinderConfig,
    mesh: MeshData,
}

impl CylinderMesh {
    /// Build the pinless body.
    pub fn build(config: &CylinderConfig) -> Self {
        let r = config.radius_mm;
        let inner = (r - config.lip_width_mm).max(0.0);
        let h = config.z_height_mm;
        let axle = config.axle_lip_depth_mm;
        let crank = config.crank_lip_depth_mm;

        // Wall profile from axis to axis; each consecutive pair revolves
        // into one ring of facets. Traversal order makes the segment
        // normal (dz, -dr) point out of the solid everywhere.
        let profile = [
            [0.0, axle],
            [inner, axle],
            [inner, 0.0],
            [r, 0.0],
            [r, h],
            [inner, h],
            [inner, h - crank],
            [0.0, h - crank],
        ];

        let mut mesh = MeshData::default();
        revolve_profile(&profile, config.radial_segments, &mut mesh);
        CylinderMesh {
            config: config.clone(),
            mesh,
        }
    }

    /// Append one pin: a box at axial height `z_mm`, rotated about Z to
    /// `angle_rad`, protruding `pin_size_mm` beyond the outer wall with an
    /// equal length embedded inside it.
    pub fn add_pin(&mut self, z_mm: f64, angle_rad: f64) {
        let half_radial = self.config.pin_size_mm;
        let half_side = self.config.pin_size_mm / 2.0;

        // Local frame at the pin's angle: u radial, v tangential, z up.
        let (sin, cos) = angle_rad.sin_cos();
        let u = [cos, sin, 0.0];
        let v = [-sin, cos, 0.0];
        let center = [self.config.radius_mm * cos, self.config.radius_mm * sin, z_mm];

        let corner = |su: f64, sv: f64, sz: f64| -> [f32; 3] {
            [
                (center[0] + u[0] * su * half_radial + v[0] * sv * half_side) as f32,
                (center[1] + u[1] * su * half_radial + v[1] * sv * half_side) as f32,
                (center[2] + sz * half_side) as f32,
            ]
        };

        // Each face: outward normal in the local frame plus its 4 corners
        // (su, sv, sz), wound CCW from outside.
        #[rustfmt::skip]
        let faces: [([f64; 3], [[f64; 3]; 4]); 6] = [
            // +u (radial outer)
            ([u[0], u[1], 0.0], [[1.0, -1.0, -1.0], [1.0, 1.0, -1.0], [1.0, 1.0, 1.0], [1.0, -1.0, 1.0]]),
            // -u (buried end)
            ([-u[0], -u[1], 0.0], [[-1.0, 1.0, -1.0], [-1.0, -1.0, -1.0], [-1.0, -1.0, 1.0], [-1.0, 1.0, 1.0]]),
            // +v
            ([v[0], v[1], 0.0], [[1.0, 1.0, -1.0], [-1.0, 1.0, -1.0], [-1.0, 1.0, 1.0], [1.0, 1.0, 1.0]]),
            // -v
            ([-v[0], -v[1], 0.0], [[-1.0, -1.0, -1.0], [1.0, -1.0, -1.0], [1.0, -1.0, 1.0], [-1.0, -1.0, 1.0]]),
            // +z
            ([0.0, 0.0, 1.0], [[-1.0, -1.0, 1.0], [1.0, -1.0, 1.0], [1.0, 1.0, 1.0], [-1.0, 1.0, 1.0]]),
            // -z
            ([0.0, 0.0, -1.0], [[-1.0, 1.0, -1.0], [1.0, 1.0, -1.0], [1.0, -1.0, -1.0], [-1.0, -1.0, -1.0]]),
        ];

        for (normal, corners) in faces {
            let n = [normal[0] as f32, normal[1] as f32, normal[2] as f32];
            let c: [[f32; 3]; 4] =
                std::array::from_fn(|i| corner(corners[i][0], corners[i][1], corners[i][2]));
            emit_quad(&mut self.mesh, c[0], c[1], c[2], c[3], n);
        }
    }

    pub fn mesh(&self) -> &MeshData {
        &self.mesh
    }

    pub fn into_mesh(self) -> MeshData {
        self.mesh
    }
}

/// Sweep a wall profile polyline around the Z axis.
///
/// Segments whose endpoints coincide are skipped; segments with an endpoint
/// on the axis revolve into triangle fans instead of quad rings.
fn revolve_profile(profile: &[[f64; 2]], segments: u32, mesh: &mut MeshData) {
    let n = segments.max(3);

    for pair in profile.windows(2) {
        let [ra, za] = pair[0];
        let [rb, zb] = pair[1];
        if ra == rb && za == zb {
            continue;
        }
        if ra == 0.0 && rb == 0.0 {
            continue;
        }

        // Outward normal of this segment in the (r, z) plane.
        let dr = rb - ra;
        let dz = zb - za;
        let len = (dr * dr + dz * dz).sqrt();
        let (nr, nz) = (dz / len, -dr / len);

        for j in 0..n {
            let th0 = TAU * f64::from(j) / f64::from(n);
            let th1 = TAU * f64::from(j + 1) / f64::from(n);
            let mid = 0.5 * (th0 + th1);
            let normal = [
                (nr * mid.cos()) as f32,
                (nr * mid.sin()) as f32,
                nz as f32,
            ];

            let a0 = ring_point(ra, za, th0);
            let a1 = ring_point(ra, za, th1);
            let b0 = ring_point(rb, zb, th0);
            let b1 = ring_point(rb, zb, th1);

            if ra == 0.0 {
                emit_tri(mesh, a0, b1, b0, normal);
            } else if rb == 0.0 {
                emit_tri(mesh, a0, a1, b0, normal);
            } else {
                emit_quad(mesh, a0, a1, b1, b0, normal);
            }
        }
    }
}

fn ring_point(r: f64, z: f64, theta: f64) -> [f32; 3] {
    [(r * theta.cos()) as f32, (r * theta.sin()) as f32, z as f32]
}
