//! Painter's-algorithm rasterizer: value-typed draw commands, depth sort,
//! per-polygon shading (zone tint, dither, ambient occlusion, fog,
//! flicker), then scanline fill via `Frame`.

use engine_core::NEAR;
use glam::{Vec2, Vec3};

use crate::camera::Camera;
use crate::clip::clip_near;
use crate::color::Rgb;
use crate::frame::Frame;

/// What kind of surface a polygon belongs to; drives ambient occlusion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceKind {
    Floor,
    Ceiling,
    Wall,
    Pillar,
}

/// One deferred polygon draw. Plain value record, produced first, sorted by
/// depth, then executed.
#[derive(Debug, Clone)]
pub struct PolyCommand {
    /// World-space vertices, consistent winding.
    pub points: Vec<Vec3>,
    pub color: Rgb,
    /// Zone tint at the polygon's centroid.
    pub tint: Vec3,
    /// Optional edge stroke (shaded like the fill).
    pub edge: Option<Rgb>,
    pub kind: SurfaceKind,
    /// Horizontal distance from the camera; the painter's sort key.
    pub depth: f32,
}

/// One debris dot for the second pass.
#[derive(Debug, Clone, Copy)]
pub struct DebrisDot {
    pub position: Vec3,
    pub color: Rgb,
}

/// Static shading parameters for one frame.
#[derive(Debug, Clone, Copy)]
pub struct SceneParams {
    pub floor_y: f32,
    pub ceiling_y: f32,
    pub fog_start: f32,
    pub fog_end: f32,
    pub fog_color: Rgb,
    pub render_distance: f32,
    /// Global brightness from the light-flicker state machine.
    pub flicker: f32,
    pub debris_render_dist: f32,
}

impl SceneParams {
    /// Linear fog between start and end, clamped; both the input color and
    /// the fog color are flicker-scaled, so below fog-start the output is
    /// exactly the flicker-scaled input and at/beyond fog-end exactly the
    /// flicker-scaled fog color.
    pub fn apply_fog(&self, color: Rgb, distance: f32) -> Rgb {
        let lit = color.scale(self.flicker);
        if distance < self.fog_start {
            return lit;
        }
        let fog = self.fog_color.scale(self.flicker);
        if distance >= self.fog_end {
            return fog;
        }
        let amount = (distance - self.fog_start) / (self.fog_end - self.fog_start);
        lit.lerp(fog, amount)
    }

    /// Ambient occlusion factor for a surface at height `y`. Wall faces
    /// darken near the floor and ceiling; other surfaces are unaffected.
    fn ao_factor(&self, kind: SurfaceKind, y: f32) -> f32 {
        match kind {
            SurfaceKind::Wall | SurfaceKind::Pillar => {
                if y < self.floor_y + 20.0 {
                    0.7
                } else if y > self.ceiling_y - 20.0 {
                    0.8
                } else {
                    1.0
                }
            }
            _ => 1.0,
        }
    }
}

/// Cheap anti-banding dither keyed to integer world coordinates; a stable
/// value in [-2, 2].
pub fn surface_noise(x: f32, z: f32) -> i32 {
    let xi = x.floor() as i64;
    let zi = z.floor() as i64;
    ((xi.wrapping_mul(13) + zi.wrapping_mul(17)).rem_euclid(5) - 2) as i32
}

/// Screen-space margin outside which polygons are discarded.
const VIEWPORT_MARGIN: f32 = 500.0;

/// Executes sorted draw commands into a frame.
#[derive(Debug)]
pub struct Scene {
    pub params: SceneParams,
    commands: Vec<PolyCommand>,
}

impl Scene {
    pub fn new(params: SceneParams) -> Self {
        Self {
            params,
            commands: Vec::new(),
        }
    }

    pub fn push(&mut self, cmd: PolyCommand) {
        self.commands.push(cmd);
    }

    pub fn command_count(&self) -> usize {
        self.commands.len()
    }

    /// Sort all queued commands farthest-first and draw them. The queue is
    /// drained; a scene is reused across frames.
    pub fn draw(&mut self, frame: &mut Frame, camera: &Camera) {
        self.commands.sort_by(|a, b| {
            b.depth
                .partial_cmp(&a.depth)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        let commands = std::mem::take(&mut self.commands);
        for cmd in &commands {
            self.draw_polygon(frame, camera, cmd);
        }
    }

    /// The full per-polygon pipeline. Any rejection is silent; one bad
    /// polygon never aborts the frame.
    fn draw_polygon(&self, frame: &mut Frame, camera: &Camera, cmd: &PolyCommand) {
        if cmd.points.len() < 3 {
            return;
        }

        let cam_pts: Vec<Vec3> = cmd.points.iter().map(|&p| camera.world_to_camera(p)).collect();

        // Wholly behind the near plane.
        if cam_pts.iter().all(|p| p.z < NEAR) {
            return;
        }

        // Mean vertex distance doubles as the fog distance.
        let avg_dist =
            cam_pts.iter().map(|p| p.length()).sum::<f32>() / cam_pts.len() as f32;
        if avg_dist > self.params.render_distance * 1.5 {
            return;
        }

        // Stable per-polygon surface point for shading.
        let centroid = cmd.points.iter().copied().sum::<Vec3>() / cmd.points.len() as f32;

        let shaded = cmd
            .color
            .tint(cmd.tint)
            .offset(surface_noise(centroid.x, centroid.z))
            .scale(self.params.ao_factor(cmd.kind, centroid.y));
        let fogged = self.params.apply_fog(shaded, avg_dist);

        let clipped = clip_near(&cam_pts);
        if clipped.len() < 3 {
            return;
        }

        let mut screen: Vec<Vec2> = Vec::with_capacity(clipped.len());
        for p in &clipped {
            match camera.project(*p) {
                Some(s) => screen.push(s),
                None => return,
            }
        }

        // Bounding-box reject: fully off a margin-expanded viewport, or
        // degenerate to sub-pixel size.
        let min_x = screen.iter().map(|p| p.x).fold(f32::INFINITY, f32::min);
        let max_x = screen.iter().map(|p| p.x).fold(f32::NEG_INFINITY, f32::max);
        let min_y = screen.iter().map(|p| p.y).fold(f32::INFINITY, f32::min);
        let max_y = screen.iter().map(|p| p.y).fold(f32::NEG_INFINITY, f32::max);
        if max_x < -VIEWPORT_MARGIN
            || min_x > camera.width + VIEWPORT_MARGIN
            || max_y < -VIEWPORT_MARGIN
            || min_y > camera.height + VIEWPORT_MARGIN
        {
            return;
        }
        if (max_x - min_x) < 0.5 && (max_y - min_y) < 0.5 {
            return;
        }

        frame.fill_polygon(&screen, fogged);

        if let Some(edge) = cmd.edge {
            let edge_shaded = edge
                .tint(cmd.tint)
                .offset(surface_noise(centroid.x, centroid.z));
            let edge_fogged = self.params.apply_fog(edge_shaded, avg_dist);
            for i in 0..screen.len() {
                frame.draw_line(screen[i], screen[(i + 1) % screen.len()], edge_fogged);
            }
        }
    }

    /// Second pass: debris as distance-scaled discs, depth-sorted among
    /// themselves and drawn on top of the world geometry.
    pub fn draw_debris(&self, frame: &mut Frame, camera: &Camera, dots: &[DebrisDot]) {
        let max_dist = self.params.debris_render_dist;
        let max_sq = max_dist * max_dist;

        let mut visible: Vec<(f32, Vec2, i32, Rgb)> = Vec::new();
        for dot in dots {
            let dx = dot.position.x - camera.position.x;
            let dz = dot.position.z - camera.position.z;
            let dist_sq = dx * dx + dz * dz;
            if dist_sq > max_sq {
                continue;
            }
            let cam = camera.world_to_camera(dot.position);
            if cam.z <= NEAR {
                continue;
            }
            let Some(screen) = camera.project(cam) else {
                continue;
            };
            if screen.x < 0.0
                || screen.y < 0.0
                || screen.x >= camera.width
                || screen.y >= camera.height
            {
                continue;
            }
            let dist = dist_sq.sqrt();
            let size = ((3.0 * (1.0 - dist / max_dist)) as i32).max(1);
            let color = self.params.apply_fog(dot.color, dist);
            visible.push((cam.z, screen, size, color));
        }

        visible.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));
        for (_, screen, size, color) in visible {
            if size <= 1 {
                frame.set_pixel(screen.x as i32, screen.y as i32, color);
            } else {
                frame.fill_circle(screen, size, color);
            }
        }
    }
}
