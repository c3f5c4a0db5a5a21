//! World geometry emission: turns lattice cells around the camera into
//! draw commands for the rasterizer.
//!
//! Everything is rebuilt from the topology every frame; the rasterizer's
//! painter sort handles ordering, so emission order only matters for
//! coplanar detail (baseboards are pushed after their face).

use engine_core::*;
use glam::{Vec2, Vec3};
use physics::debris::DebrisPool;
use procgen::{GridPoint, Opening, Orientation, Topology, WallKey, WallState};
use renderer::{PolyCommand, Rgb, Scene, SurfaceKind};

use crate::destruction::DestructionEngine;

/// Baseboard strip height in world units.
const BASEBOARD_HEIGHT: f32 = 8.0;

/// Bottom of a doorway lintel, as a fraction of the wall height.
const DOOR_TOP_FRAC: f32 = 0.75;

/// Emit all visible geometry around the eye. Rubble walls spawn their
/// debris pile here, on first sight.
pub fn emit_scene(
    scene: &mut Scene,
    topo: &mut Topology,
    destruction: &mut DestructionEngine,
    debris: &mut DebrisPool,
    eye: Vec3,
) {
    let s = topo.spacing();
    let sf = s as f32;
    let cells = (RENDER_DISTANCE / sf).ceil() as i32 + 1;

    let ex = (eye.x / sf).floor() as i32;
    let ez = (eye.z / sf).floor() as i32;

    for cx in (ex - cells)..=(ex + cells) {
        for cz in (ez - cells)..=(ez + cells) {
            let x0 = (cx * s) as f32;
            let z0 = (cz * s) as f32;
            let center = Vec2::new(x0 + sf * 0.5, z0 + sf * 0.5);
            let dist = center.distance(Vec2::new(eye.x, eye.z));
            if dist > RENDER_DISTANCE + sf {
                continue;
            }

            let tint = topo.zone_at(center.x, center.y).tint;

            // Floor and ceiling tiles.
            scene.push(PolyCommand {
                points: vec![
                    Vec3::new(x0, FLOOR_Y, z0),
                    Vec3::new(x0 + sf, FLOOR_Y, z0),
                    Vec3::new(x0 + sf, FLOOR_Y, z0 + sf),
                    Vec3::new(x0, FLOOR_Y, z0 + sf),
                ],
                color: FLOOR_COLOR.into(),
                tint,
                edge: None,
                kind: SurfaceKind::Floor,
                depth: dist,
            });
            scene.push(PolyCommand {
                points: vec![
                    Vec3::new(x0, WALL_HEIGHT, z0),
                    Vec3::new(x0 + sf, WALL_HEIGHT, z0),
                    Vec3::new(x0 + sf, WALL_HEIGHT, z0 + sf),
                    Vec3::new(x0, WALL_HEIGHT, z0 + sf),
                ],
                color: CEILING_COLOR.into(),
                tint,
                edge: None,
                kind: SurfaceKind::Ceiling,
                depth: dist,
            });

            // The two walls owned by this cell's lattice point: along +x
            // and along +z. Each wall is emitted exactly once.
            let p = GridPoint::new(cx * s, cz * s);
            for other in [
                GridPoint::new((cx + 1) * s, cz * s),
                GridPoint::new(cx * s, (cz + 1) * s),
            ] {
                if let Some(key) = WallKey::new(p, other, s) {
                    emit_wall(scene, topo, destruction, debris, eye, key);
                }
            }

            if topo.pillar_at(p) {
                emit_pillar(scene, topo, eye, p);
            }
        }
    }
}

fn depth_to(eye: Vec3, x: f32, z: f32) -> f32 {
    Vec2::new(x - eye.x, z - eye.z).length()
}

/// Wall fill and trim colors for a damage level. More decayed walls render
/// darker with stronger trim contrast.
fn wall_colors(damage: f32) -> (Rgb, Rgb) {
    let base: Rgb = WALL_COLOR.into();
    let fill = if damage <= 0.0 {
        base
    } else if damage < 0.35 {
        base.scale(0.9)
    } else {
        base.scale(0.78)
    };
    (fill, fill.scale(0.72))
}

fn emit_wall(
    scene: &mut Scene,
    topo: &mut Topology,
    destruction: &mut DestructionEngine,
    debris: &mut DebrisPool,
    eye: Vec3,
    key: WallKey,
) {
    let state = topo.state(key);
    let damage = match state {
        WallState::Destroyed => return,
        WallState::Rubble => {
            destruction.spawn_rubble(topo, debris, key);
            return;
        }
        WallState::Intact => 0.0,
        WallState::Damaged(d) => d,
    };
    let (fill, trim) = wall_colors(damage);

    let s = topo.spacing();
    let sf = s as f32;
    let a = key.a();
    let orient = key.orientation();
    let (along0, perp) = match orient {
        Orientation::AlongX => (a.x as f32, a.z as f32),
        Orientation::AlongZ => (a.z as f32, a.x as f32),
    };
    let along1 = along0 + sf;

    match topo.opening(key).interval(&key, s) {
        None => {
            emit_slab(
                scene, topo, eye, orient, perp, along0, along1, FLOOR_Y, WALL_HEIGHT, fill, trim,
                true,
            );
        }
        Some((gap0, gap1)) => {
            emit_slab(
                scene, topo, eye, orient, perp, along0, gap0, FLOOR_Y, WALL_HEIGHT, fill, trim,
                true,
            );
            emit_slab(
                scene, topo, eye, orient, perp, gap1, along1, FLOOR_Y, WALL_HEIGHT, fill, trim,
                true,
            );
            // Doorways keep a lintel over the gap; hallways are open to
            // the ceiling.
            if topo.opening(key) == Opening::Doorway {
                emit_slab(
                    scene,
                    topo,
                    eye,
                    orient,
                    perp,
                    gap0,
                    gap1,
                    WALL_HEIGHT * DOOR_TOP_FRAC,
                    WALL_HEIGHT,
                    fill,
                    trim,
                    false,
                );
            }
        }
    }
}

/// A world-space point on a wall plane: `along` on the wall axis, `off`
/// across the thickness.
fn wall_point(orient: Orientation, perp: f32, along: f32, off: f32, y: f32) -> Vec3 {
    match orient {
        Orientation::AlongX => Vec3::new(along, y, perp + off),
        Orientation::AlongZ => Vec3::new(perp + off, y, along),
    }
}

/// One rectangular wall segment as a thin box: two long faces, two end
/// caps, a baseboard strip per face, and a bottom face for lintels.
#[allow(clippy::too_many_arguments)]
fn emit_slab(
    scene: &mut Scene,
    topo: &mut Topology,
    eye: Vec3,
    orient: Orientation,
    perp: f32,
    along0: f32,
    along1: f32,
    y0: f32,
    y1: f32,
    fill: Rgb,
    trim: Rgb,
    baseboard: bool,
) {
    if along1 - along0 < 1e-3 {
        return;
    }
    let ht = WALL_THICKNESS * 0.5;
    let mid = (along0 + along1) * 0.5;
    let center = wall_point(orient, perp, mid, 0.0, 0.0);
    let tint = topo.zone_at(center.x, center.z).tint;
    let depth = depth_to(eye, center.x, center.z);

    // Long faces on both sides of the centerline.
    for off in [-ht, ht] {
        scene.push(PolyCommand {
            points: vec![
                wall_point(orient, perp, along0, off, y1),
                wall_point(orient, perp, along1, off, y1),
                wall_point(orient, perp, along1, off, y0),
                wall_point(orient, perp, along0, off, y0),
            ],
            color: fill,
            tint,
            edge: Some(trim),
            kind: SurfaceKind::Wall,
            depth,
        });
        if baseboard {
            scene.push(PolyCommand {
                points: vec![
                    wall_point(orient, perp, along0, off, y0 + BASEBOARD_HEIGHT),
                    wall_point(orient, perp, along1, off, y0 + BASEBOARD_HEIGHT),
                    wall_point(orient, perp, along1, off, y0),
                    wall_point(orient, perp, along0, off, y0),
                ],
                color: trim,
                tint,
                edge: None,
                kind: SurfaceKind::Wall,
                depth,
            });
        }
    }

    // End caps across the thickness (visible through openings and at
    // destroyed neighbors).
    for along in [along0, along1] {
        scene.push(PolyCommand {
            points: vec![
                wall_point(orient, perp, along, -ht, y1),
                wall_point(orient, perp, along, ht, y1),
                wall_point(orient, perp, along, ht, y0),
                wall_point(orient, perp, along, -ht, y0),
            ],
            color: fill.scale(0.85),
            tint,
            edge: Some(trim),
            kind: SurfaceKind::Wall,
            depth,
        });
    }

    // Lintels are seen from below.
    if y0 > FLOOR_Y {
        scene.push(PolyCommand {
            points: vec![
                wall_point(orient, perp, along0, -ht, y0),
                wall_point(orient, perp, along1, -ht, y0),
                wall_point(orient, perp, along1, ht, y0),
                wall_point(orient, perp, along0, ht, y0),
            ],
            color: fill.scale(0.8),
            tint,
            edge: None,
            kind: SurfaceKind::Wall,
            depth,
        });
    }
}

/// A freestanding square pillar at a lattice point, floor to ceiling.
fn emit_pillar(scene: &mut Scene, topo: &mut Topology, eye: Vec3, p: GridPoint) {
    let h = PILLAR_SIZE * 0.5;
    let px = p.x as f32;
    let pz = p.z as f32;
    let tint = topo.zone_at(px, pz).tint;
    let depth = depth_to(eye, px, pz);
    let color: Rgb = PILLAR_COLOR.into();
    let trim = color.scale(0.7);

    let corners = [
        Vec2::new(px - h, pz - h),
        Vec2::new(px + h, pz - h),
        Vec2::new(px + h, pz + h),
        Vec2::new(px - h, pz + h),
    ];
    for i in 0..4 {
        let c0 = corners[i];
        let c1 = corners[(i + 1) % 4];
        scene.push(PolyCommand {
            points: vec![
                Vec3::new(c0.x, WALL_HEIGHT, c0.y),
                Vec3::new(c1.x, WALL_HEIGHT, c1.y),
                Vec3::new(c1.x, FLOOR_Y, c1.y),
                Vec3::new(c0.x, FLOOR_Y, c0.y),
            ],
            color,
            tint,
            edge: Some(trim),
            kind: SurfaceKind::Pillar,
            depth,
        });
    }
}
