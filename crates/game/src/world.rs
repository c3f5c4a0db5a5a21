//! The world engine: owns every simulation system, advances them in a
//! fixed per-tick order, and renders into a software frame.

use audio::{SoundEvent, SoundRequest};
use engine_core::*;
use glam::Vec3;
use input::FrameInput;
use physics::debris::DebrisPool;
use physics::raycast::target_wall;
use procgen::{GridPoint, Topology, WallKey};
use renderer::{Camera, DebrisDot, Frame, Rgb, Scene, SceneParams};

use crate::ambience::Ambience;
use crate::destruction::DestructionEngine;
use crate::player::Player;
use crate::save::{PlayerSave, SaveData, StatsSave, WorldSave};
use crate::scene::emit_scene;

/// Top-level game state. All cross-system effects flow through `update`,
/// in one fixed order per tick.
pub struct WorldEngine {
    pub topo: Topology,
    pub debris: DebrisPool,
    pub player: Player,
    destruction: DestructionEngine,
    ambience: Ambience,
    scene: Scene,
    play_time: f64,
    render_scale: f32,
    render_scale_target: f32,
    sounds: Vec<SoundRequest>,
}

impl WorldEngine {
    pub fn new(seed: u64, render_scale: f32) -> Self {
        let spacing = PILLAR_SPACING;
        // Spawn in the middle of the origin cell, clear of every wall line.
        let spawn = Vec3::new(spacing as f32 * 0.5, 0.0, spacing as f32 * 0.5);
        log::info!("World seed {}", seed);
        Self {
            topo: Topology::new(seed, spacing),
            debris: DebrisPool::new(),
            player: Player::new(spawn),
            destruction: DestructionEngine::new(),
            ambience: Ambience::new(seed),
            scene: Scene::new(SceneParams {
                floor_y: FLOOR_Y,
                ceiling_y: WALL_HEIGHT,
                fog_start: FOG_START,
                fog_end: FOG_END,
                fog_color: FOG_COLOR.into(),
                render_distance: RENDER_DISTANCE,
                flicker: 1.0,
                debris_render_dist: DEBRIS_RENDER_DIST,
            }),
            play_time: 0.0,
            render_scale: render_scale.clamp(0.1, 1.0),
            render_scale_target: render_scale.clamp(0.1, 1.0),
            sounds: Vec::new(),
        }
    }

    /// One simulation tick: player, destruction, ambience, debris, then
    /// the render-scale ease.
    pub fn update(&mut self, dt: f32, input: &FrameInput) {
        self.play_time += dt as f64;

        self.player.update(dt, input, &mut self.topo);

        if input.destroy {
            self.try_destroy();
        }

        if self.player.took_step() {
            let event = if self.player.is_crouched() {
                SoundEvent::CrouchFootstep
            } else {
                SoundEvent::PlayerFootstep
            };
            self.sounds.push(SoundRequest::centered(event));
        }

        self.ambience
            .update(dt, self.player.smoothed_yaw(), &mut self.sounds);

        let eye = self.player.smoothed_eye();
        self.debris.update(
            dt,
            GRAVITY,
            FLOOR_Y,
            eye.x,
            eye.z,
            DEBRIS_CULL_DIST,
            DEBRIS_MAX,
        );

        // Ease toward the target scale at a fixed rate.
        let step = RENDER_SCALE_TRANSITION_SPEED * dt;
        let d = self.render_scale_target - self.render_scale;
        self.render_scale += d.clamp(-step, step);
    }

    /// Cast from the smoothed camera pose and bring down the first solid
    /// wall within reach.
    fn try_destroy(&mut self) {
        let mut camera = Camera::new(1.0, 1.0);
        camera.position = self.player.smoothed_eye();
        camera.yaw = self.player.smoothed_yaw();
        camera.pitch = self.player.smoothed_pitch();

        let Some((key, dist)) = target_wall(
            &mut self.topo,
            camera.position,
            camera.forward(),
            DESTROY_REACH,
        ) else {
            return;
        };
        if self.destruction.destroy(&mut self.topo, &mut self.debris, key) {
            log::debug!("Destroyed wall at distance {:.1}", dist);
            self.player.add_shake(CAMERA_SHAKE_AMOUNT);
            self.sounds.push(SoundRequest::centered(SoundEvent::Destroy));
        }
    }

    /// Render the frame from the smoothed camera pose.
    pub fn render(&mut self, frame: &mut Frame) {
        let mut camera = Camera::new(frame.width() as f32, frame.height() as f32);
        camera.position = self.player.smoothed_eye();
        camera.yaw = self.player.smoothed_yaw();
        camera.pitch = self.player.smoothed_pitch();

        self.scene.params.flicker = self.ambience.flicker();
        let fog: Rgb = FOG_COLOR.into();
        frame.clear(fog.scale(self.scene.params.flicker));

        emit_scene(
            &mut self.scene,
            &mut self.topo,
            &mut self.destruction,
            &mut self.debris,
            camera.position,
        );
        self.scene.draw(frame, &camera);

        let dots: Vec<DebrisDot> = self
            .debris
            .iter()
            .map(|d| DebrisDot {
                position: d.position,
                color: Rgb::new(d.color[0], d.color[1], d.color[2]),
            })
            .collect();
        self.scene.draw_debris(frame, &camera, &dots);

        frame.draw_crosshair(Rgb::new(235, 235, 230));
    }

    /// Queued sound requests, draining the queue.
    pub fn take_sounds(&mut self) -> Vec<SoundRequest> {
        std::mem::take(&mut self.sounds)
    }

    /// Current resolution scale for the offscreen frame.
    pub fn render_scale(&self) -> f32 {
        self.render_scale
    }

    /// Flip between full and reduced resolution.
    pub fn toggle_render_scale(&mut self) {
        self.render_scale_target = if self.render_scale_target > RENDER_SCALE_LOW {
            RENDER_SCALE_LOW
        } else {
            RENDER_SCALE
        };
    }

    pub fn play_time(&self) -> f64 {
        self.play_time
    }

    // ── Persistence ─────────────────────────────────────────────────────

    pub fn snapshot(&self) -> SaveData {
        SaveData {
            player: PlayerSave {
                x: self.player.position.x,
                y: self.player.position.y,
                z: self.player.position.z,
                yaw: self.player.yaw,
                pitch: self.player.pitch,
            },
            world: WorldSave {
                seed: self.topo.seed(),
                destroyed_walls: self
                    .topo
                    .destroyed_keys()
                    .iter()
                    .map(|k| ((k.a().x, k.a().z), (k.b().x, k.b().z)))
                    .collect(),
            },
            stats: StatsSave {
                play_time: self.play_time,
            },
        }
    }

    /// Rebuild the world from a save. Debris and the rubble guard reset;
    /// piles respawn on sight.
    pub fn restore(&mut self, save: &SaveData) {
        let spacing = self.topo.spacing();
        let keys = save.world.destroyed_walls.iter().filter_map(|&(a, b)| {
            let key = WallKey::new(
                GridPoint::new(a.0, a.1),
                GridPoint::new(b.0, b.1),
                spacing,
            );
            if key.is_none() {
                log::warn!("Ignoring malformed destroyed wall {:?}-{:?}", a, b);
            }
            key
        });
        self.topo.restore(save.world.seed, keys);
        self.debris = DebrisPool::new();
        self.destruction = DestructionEngine::new();
        self.ambience = Ambience::new(save.world.seed);

        self.player.position = Vec3::new(save.player.x, save.player.y.max(0.0), save.player.z);
        self.player.yaw = save.player.yaw;
        self.player.pitch = save.player.pitch;
        self.player.snap_camera();

        self.play_time = save.stats.play_time;
        self.sounds.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f32 = 0.016;

    fn idle() -> FrameInput {
        FrameInput::default()
    }

    fn nearby_solid_wall(world: &mut WorldEngine) -> WallKey {
        let s = world.topo.spacing();
        // Edges of the spawn cell, all within destroy reach of its center.
        let candidates = [
            (GridPoint::new(0, 0), GridPoint::new(s, 0)),
            (GridPoint::new(0, 0), GridPoint::new(0, s)),
            (GridPoint::new(0, s), GridPoint::new(s, s)),
            (GridPoint::new(s, 0), GridPoint::new(s, s)),
        ];
        candidates
            .iter()
            .find_map(|&(a, b)| {
                let key = WallKey::new(a, b, s).unwrap();
                world.topo.state(key).is_solid().then_some(key)
            })
            .expect("spawn cell has no solid wall")
    }

    /// Two engines with the same seed and inputs stay in lockstep.
    #[test]
    fn update_is_deterministic() {
        let mut a = WorldEngine::new(42, 1.0);
        let mut b = WorldEngine::new(42, 1.0);
        let mut input = idle();
        input.move_forward = true;
        for i in 0..240 {
            input.jump = i == 30;
            input.crouch = i == 120;
            a.update(DT, &input);
            b.update(DT, &input);
        }
        assert_eq!(a.player.position, b.player.position);
        assert_eq!(a.debris.len(), b.debris.len());
        let sa: Vec<_> = a.take_sounds().iter().map(|s| s.event).collect();
        let sb: Vec<_> = b.take_sounds().iter().map(|s| s.event).collect();
        assert_eq!(sa, sb);
    }

    /// Aiming at a nearby wall and pressing destroy brings it down, spawns
    /// debris, queues the destroy sound and shakes the camera.
    #[test]
    fn destroy_action_levels_the_wall_ahead() {
        let mut world = WorldEngine::new(42, 1.0);
        let key = nearby_solid_wall(&mut world);
        let (wx, wz) = key.center();

        let p = world.player.position;
        world.player.yaw = (wx - p.x).atan2(wz - p.z);
        world.player.pitch = 0.0;
        world.player.snap_camera();

        let mut input = idle();
        input.destroy = true;
        world.update(DT, &input);

        assert_eq!(world.topo.destroyed_count(), 1);
        assert_eq!(world.debris.len(), DEBRIS_BASE_BURST);
        let sounds = world.take_sounds();
        assert!(sounds.iter().any(|s| s.event == SoundEvent::Destroy));

        // Holding the action on the now-empty gap does nothing more to
        // this wall.
        world.update(DT, &input);
        assert!(world.topo.destroyed_count() <= 2);
    }

    #[test]
    fn save_and_restore_preserve_destroyed_walls() {
        let mut world = WorldEngine::new(42, 1.0);
        let key = nearby_solid_wall(&mut world);
        let (wx, wz) = key.center();
        let p = world.player.position;
        world.player.yaw = (wx - p.x).atan2(wz - p.z);
        world.player.snap_camera();
        let mut input = idle();
        input.destroy = true;
        world.update(DT, &input);
        assert_eq!(world.topo.destroyed_count(), 1);

        let save = world.snapshot();
        assert_eq!(save.world.seed, 42);
        assert_eq!(save.world.destroyed_walls.len(), 1);

        let mut restored = WorldEngine::new(7, 1.0);
        restored.restore(&save);
        assert_eq!(restored.topo.seed(), 42);
        assert_eq!(restored.topo.destroyed_count(), 1);
        assert!(!restored.topo.state(key).is_solid());
        assert_eq!(restored.player.position.x, world.player.position.x);
        assert!(restored.debris.is_empty());
    }

    /// Rendering a ticked world puts maze geometry and a crosshair on
    /// screen.
    #[test]
    fn render_produces_a_non_empty_frame() {
        let mut world = WorldEngine::new(42, 1.0);
        world.update(DT, &idle());

        let mut frame = Frame::new(160, 120);
        world.render(&mut frame);

        let fog: Rgb = FOG_COLOR.into();
        let mut non_fog = 0;
        for y in 0..120 {
            for x in 0..160 {
                let [r, g, b] = frame.pixel(x, y).unwrap();
                if Rgb::new(r, g, b) != fog {
                    non_fog += 1;
                }
            }
        }
        assert!(non_fog > 1000, "expected visible geometry, got {}", non_fog);
    }

    #[test]
    fn render_scale_eases_toward_the_toggled_target() {
        let mut world = WorldEngine::new(42, 1.0);
        assert_eq!(world.render_scale(), 1.0);
        world.toggle_render_scale();
        world.update(0.1, &idle());
        let mid = world.render_scale();
        assert!(mid < 1.0 && mid > RENDER_SCALE_LOW, "scale moves gradually");
        for _ in 0..40 {
            world.update(0.1, &idle());
        }
        assert!((world.render_scale() - RENDER_SCALE_LOW).abs() < 1e-4);
        world.toggle_render_scale();
        for _ in 0..40 {
            world.update(0.1, &idle());
        }
        assert!((world.render_scale() - RENDER_SCALE).abs() < 1e-4);
    }

    /// The first tick queues the looping hum.
    #[test]
    fn hum_starts_on_the_first_tick() {
        let mut world = WorldEngine::new(42, 1.0);
        world.update(DT, &idle());
        let sounds = world.take_sounds();
        assert!(sounds.iter().any(|s| s.event == SoundEvent::Hum));
    }
}
