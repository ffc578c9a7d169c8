//! Three-lane obstacle dodger
//!
//! The player hops between fixed lanes at the bottom of the screen while
//! obstacles fall down random lanes. No levels; play continues until the last
//! life is lost.

use glam::Vec2;
use rand::Rng;

use super::Obstacle;
use crate::audio::Cue;
use crate::render::{Frame, SpriteInstance, colors, sprite_kind};
use crate::sim::{
    EntityId, EntityStore, ExitPolicy, Game, GameEvent, InputEvent, Rect, TickContext,
    collect_overlaps,
};
use crate::tuning::LaneDodgeTuning;

const LANE_LINE_WIDTH: f32 = 2.0;

#[derive(Debug, Clone)]
pub struct LaneDodge {
    tuning: LaneDodgeTuning,
    lane: usize,
    obstacles: EntityStore<Obstacle>,
}

impl Default for LaneDodge {
    fn default() -> Self {
        Self::new(LaneDodgeTuning::default())
    }
}

impl LaneDodge {
    pub fn new(tuning: LaneDodgeTuning) -> Self {
        let lane = tuning.lane_x.len() / 2;
        Self {
            tuning,
            lane,
            obstacles: EntityStore::new(),
        }
    }

    pub fn lanes(&self) -> usize {
        self.tuning.lane_x.len()
    }

    pub fn player_lane(&self) -> usize {
        self.lane
    }

    pub fn obstacles(&self) -> &EntityStore<Obstacle> {
        &self.obstacles
    }

    pub fn bounds(&self) -> Rect {
        Rect::new(0.0, 0.0, self.tuning.width, self.tuning.height)
    }

    fn lane_center(&self, lane: usize) -> f32 {
        self.tuning.lane_x.get(lane).copied().unwrap_or(0.0)
    }

    pub fn player_rect(&self) -> Rect {
        let size = self.tuning.player_size;
        Rect::new(
            self.lane_center(self.lane) - size / 2.0,
            self.tuning.height - self.tuning.player_bottom_margin - size,
            size,
            size,
        )
    }

    /// Drop an obstacle into `lane`, just above the top edge
    pub fn spawn_in_lane(&mut self, lane: usize) -> Option<EntityId> {
        if lane >= self.lanes() {
            return None;
        }
        let size = self.tuning.obstacle_size;
        let rect = Rect::new(self.lane_center(lane) - size / 2.0, -size, size, size);
        let id = self.obstacles.spawn(
            rect,
            Vec2::Y,
            Obstacle {
                lane: Some(lane as u8),
            },
        );
        log::trace!("Spawned obstacle {} in lane {}", id, lane);
        Some(id)
    }

    fn step(&mut self, delta: i32) {
        let max = self.lanes().saturating_sub(1) as i32;
        self.lane = (self.lane as i32 + delta).clamp(0, max) as usize;
    }

    /// Lane whose centre is closest to `x`
    fn nearest_lane(&self, x: f32) -> usize {
        self.tuning
            .lane_x
            .iter()
            .enumerate()
            .min_by(|(_, a), (_, b)| {
                (*a - x)
                    .abs()
                    .partial_cmp(&(*b - x).abs())
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
            .map(|(i, _)| i)
            .unwrap_or(0)
    }
}

impl Game for LaneDodge {
    fn name(&self) -> &'static str {
        "lane-dodge"
    }

    fn initial_lives(&self) -> u32 {
        self.tuning.lives
    }

    fn reset(&mut self, ctx: &mut TickContext<'_>) {
        self.obstacles.clear();
        self.lane = self.lanes() / 2;
        ctx.session.start_round(None);
    }

    fn handle_input(&mut self, input: &InputEvent, _ctx: &mut TickContext<'_>) {
        match *input {
            InputEvent::Move(dir) => self.step(dir.step()),
            InputEvent::Pointer(pos) => self.lane = self.nearest_lane(pos.x),
            // Tapping a screen half steps toward it
            InputEvent::Select(pos) => {
                if pos.x < self.tuning.width / 2.0 {
                    self.step(-1);
                } else {
                    self.step(1);
                }
            }
            InputEvent::Letter(_) => {}
        }
    }

    fn update(&mut self, dt: f32, ctx: &mut TickContext<'_>) {
        let chance = (self.tuning.spawn_rate * dt).clamp(0.0, 1.0) as f64;
        if chance > 0.0 && ctx.rng.random_bool(chance) {
            let lane = ctx.rng.random_range(0..self.lanes().max(1));
            self.spawn_in_lane(lane);
        }

        self.obstacles.advance(dt, self.tuning.fall_speed);

        let bounds = self.bounds();
        let report = self
            .obstacles
            .prune(&bounds, self.tuning.exit_policy, ctx.session);
        if report.exited > 0 && matches!(self.tuning.exit_policy, ExitPolicy::Credit(_)) {
            ctx.cue(Cue::Dodge);
        }
        for _ in 0..report.lives_lost {
            let remaining = ctx.session.lives;
            ctx.emit(GameEvent::LifeLost { remaining });
        }
    }

    fn evaluate(&mut self, ctx: &mut TickContext<'_>) {
        let player = self.player_rect();
        let hits = collect_overlaps(&mut self.obstacles, &player);
        for id in hits {
            log::debug!("Obstacle {} hit the player", id);
            ctx.cue(Cue::Hit);
            ctx.lose_life();
        }
        self.obstacles.remove_dead();
    }

    fn render(&self, frame: &mut Frame) {
        frame.push(SpriteInstance::new(
            &self.bounds(),
            colors::BACKGROUND,
            sprite_kind::BACKGROUND,
        ));
        // Dividers halfway between neighbouring lanes
        for pair in self.tuning.lane_x.windows(2) {
            let x = (pair[0] + pair[1]) / 2.0;
            frame.push(SpriteInstance::new(
                &Rect::new(
                    x - LANE_LINE_WIDTH / 2.0,
                    0.0,
                    LANE_LINE_WIDTH,
                    self.tuning.height,
                ),
                colors::LANE_LINE,
                sprite_kind::LANE_LINE,
            ));
        }
        frame.push(SpriteInstance::new(
            &self.player_rect(),
            colors::PLAYER,
            sprite_kind::PLAYER,
        ));
        for obstacle in self.obstacles.iter().filter(|e| e.alive) {
            frame.push(SpriteInstance::new(
                &obstacle.rect,
                colors::OBSTACLE,
                sprite_kind::OBSTACLE,
            ));
        }
    }
}
