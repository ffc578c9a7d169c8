//! Free-moving obstacle dodger
//!
//! The player slides along the bottom edge; obstacles fall at random x
//! positions. Dodging enough obstacles clears a level, which clears the screen
//! and speeds everything up. Clearing the last level wins.

use glam::Vec2;
use rand::Rng;

use super::Obstacle;
use crate::audio::Cue;
use crate::render::{Frame, SpriteInstance, colors, sprite_kind};
use crate::sim::progression::{LevelStep, Progression};
use crate::sim::{
    EntityId, EntityStore, ExitPolicy, Game, GameEvent, InputEvent, Outcome, Rect, TickContext,
    collect_overlaps,
};
use crate::tuning::FallingDodgeTuning;

#[derive(Debug, Clone)]
pub struct FallingDodge {
    tuning: FallingDodgeTuning,
    /// Left edge of the player
    player_x: f32,
    obstacles: EntityStore<Obstacle>,
    progression: Progression,
    /// Seconds since the last spawn
    spawn_timer: f32,
    /// Obstacles dodged on the current level
    dodged: u32,
}

impl Default for FallingDodge {
    fn default() -> Self {
        Self::new(FallingDodgeTuning::default())
    }
}

impl FallingDodge {
    pub fn new(tuning: FallingDodgeTuning) -> Self {
        let progression = Progression::new(tuning.max_level);
        let player_x = (tuning.width - tuning.player_width) / 2.0;
        Self {
            tuning,
            player_x,
            obstacles: EntityStore::new(),
            progression,
            spawn_timer: 0.0,
            dodged: 0,
        }
    }

    pub fn obstacles(&self) -> &EntityStore<Obstacle> {
        &self.obstacles
    }

    pub fn level(&self) -> u32 {
        self.progression.level()
    }

    pub fn dodged(&self) -> u32 {
        self.dodged
    }

    pub fn bounds(&self) -> Rect {
        Rect::new(0.0, 0.0, self.tuning.width, self.tuning.height)
    }

    pub fn player_rect(&self) -> Rect {
        Rect::new(
            self.player_x,
            self.tuning.height - self.tuning.player_bottom_margin - self.tuning.player_height,
            self.tuning.player_width,
            self.tuning.player_height,
        )
    }

    fn set_player_x(&mut self, x: f32) {
        let max = (self.tuning.width - self.tuning.player_width).max(0.0);
        self.player_x = x.clamp(0.0, max);
    }

    /// Drop an obstacle with its left edge at `x`, just above the top edge
    pub fn spawn_at(&mut self, x: f32) -> EntityId {
        let size = self.tuning.obstacle_size;
        let x = x.clamp(0.0, (self.tuning.width - size).max(0.0));
        let id = self.obstacles.spawn(
            Rect::new(x, -size, size, size),
            Vec2::Y,
            Obstacle { lane: None },
        );
        log::trace!("Spawned obstacle {} at x {:.0}", id, x);
        id
    }

    fn advance_level(&mut self, ctx: &mut TickContext<'_>) {
        match self.progression.advance_level() {
            LevelStep::Next(level) => {
                log::info!("Falling dodge reached level {}", level);
                self.obstacles.clear();
                self.dodged = 0;
                self.spawn_timer = 0.0;
                ctx.level_up(level);
            }
            LevelStep::Victory => {
                ctx.session.finish(Outcome::Victory);
            }
        }
    }
}

impl Game for FallingDodge {
    fn name(&self) -> &'static str {
        "falling-dodge"
    }

    fn initial_lives(&self) -> u32 {
        self.tuning.lives
    }

    fn reset(&mut self, ctx: &mut TickContext<'_>) {
        self.obstacles.clear();
        self.progression.reset();
        self.spawn_timer = 0.0;
        self.dodged = 0;
        self.set_player_x((self.tuning.width - self.tuning.player_width) / 2.0);
        ctx.session.level = self.progression.level();
        ctx.session.start_round(None);
    }

    fn handle_input(&mut self, input: &InputEvent, _ctx: &mut TickContext<'_>) {
        match *input {
            InputEvent::Move(dir) => {
                self.set_player_x(self.player_x + dir.step() as f32 * self.tuning.player_step)
            }
            InputEvent::Pointer(pos) | InputEvent::Select(pos) => {
                self.set_player_x(pos.x - self.tuning.player_width / 2.0)
            }
            InputEvent::Letter(_) => {}
        }
    }

    fn update(&mut self, dt: f32, ctx: &mut TickContext<'_>) {
        let level = self.progression.level();

        self.spawn_timer += dt;
        let interval = 1.0 / self.tuning.spawn_rate(level);
        if self.spawn_timer >= interval {
            self.spawn_timer -= interval;
            let max_x = (self.tuning.width - self.tuning.obstacle_size).max(0.0);
            let x = ctx.rng.random_range(0.0..=max_x);
            self.spawn_at(x);
        }

        self.obstacles.advance(dt, self.tuning.fall_speed(level));

        let bounds = self.bounds();
        let report = self
            .obstacles
            .prune(&bounds, self.tuning.exit_policy, ctx.session);
        for _ in 0..report.lives_lost {
            let remaining = ctx.session.lives;
            ctx.emit(GameEvent::LifeLost { remaining });
        }
        if self.tuning.exit_policy != ExitPolicy::LoseLife && report.exited > 0 {
            self.dodged += report.exited;
            ctx.cue(Cue::Dodge);
        }
    }

    fn evaluate(&mut self, ctx: &mut TickContext<'_>) {
        let player = self.player_rect();
        for id in collect_overlaps(&mut self.obstacles, &player) {
            log::debug!("Obstacle {} hit the player", id);
            ctx.cue(Cue::Hit);
            ctx.lose_life();
        }
        self.obstacles.remove_dead();

        if !ctx.session.is_over() && self.dodged >= self.tuning.dodges_per_level {
            self.advance_level(ctx);
        }
    }

    fn render(&self, frame: &mut Frame) {
        frame.push(SpriteInstance::new(
            &self.bounds(),
            colors::BACKGROUND,
            sprite_kind::BACKGROUND,
        ));
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT;
    use crate::sim::{Direction, DriverPhase, LoopDriver};

    /// No automatic spawns within a test's horizon
    fn manual(tuning: FallingDodgeTuning) -> FallingDodge {
        FallingDodge::new(FallingDodgeTuning {
            base_spawn_interval: 1000.0,
            min_spawn_interval: 1000.0,
            ..tuning
        })
    }

    fn run(driver: &mut LoopDriver<FallingDodge>, ticks: usize) -> Vec<GameEvent> {
        let mut events = Vec::new();
        for _ in 0..ticks {
            driver.tick(SIM_DT);
            events.extend(driver.drain_events());
        }
        events
    }

    #[test]
    fn test_player_moves_and_clamps() {
        let mut driver = LoopDriver::new(manual(FallingDodgeTuning::default()), 1);
        driver.start();
        assert_eq!(driver.game().player_rect().pos.x, 175.0);

        driver.push_input(InputEvent::Move(Direction::Right));
        driver.tick(SIM_DT);
        assert_eq!(driver.game().player_rect().pos.x, 215.0);

        driver.push_input(InputEvent::Pointer(Vec2::new(-50.0, 0.0)));
        driver.tick(SIM_DT);
        assert_eq!(driver.game().player_rect().pos.x, 0.0);

        driver.push_input(InputEvent::Select(Vec2::new(1000.0, 0.0)));
        driver.tick(SIM_DT);
        assert_eq!(driver.game().player_rect().pos.x, 350.0);
    }

    #[test]
    fn test_dodges_clear_a_level() {
        let mut driver = LoopDriver::new(
            manual(FallingDodgeTuning {
                dodges_per_level: 2,
                ..Default::default()
            }),
            1,
        );
        driver.start();
        driver.game_mut().spawn_at(0.0);
        driver.game_mut().spawn_at(360.0);

        // 630 px at 150 px/s
        let events = run(&mut driver, 300);
        assert!(events.contains(&GameEvent::LevelUp(2)));
        assert!(events.contains(&GameEvent::Cue(Cue::LevelUp)));
        assert_eq!(driver.session().level, 2);
        assert_eq!(driver.game().level(), 2);
        assert_eq!(driver.game().dodged(), 0);
        assert_eq!(driver.session().score, 2);
        assert_eq!(driver.phase(), DriverPhase::Running);
    }

    #[test]
    fn test_last_level_is_victory() {
        let mut driver = LoopDriver::new(
            manual(FallingDodgeTuning {
                dodges_per_level: 1,
                max_level: 1,
                ..Default::default()
            }),
            1,
        );
        driver.start();
        driver.game_mut().spawn_at(0.0);
        let events = run(&mut driver, 300);
        assert_eq!(driver.phase(), DriverPhase::Ended(Outcome::Victory));
        assert_eq!(
            events
                .iter()
                .filter(|e| matches!(e, GameEvent::Ended(_)))
                .count(),
            1
        );
        assert!(!events.iter().any(|e| matches!(e, GameEvent::LevelUp(_))));
    }

    #[test]
    fn test_hit_costs_a_life() {
        let mut driver = LoopDriver::new(manual(FallingDodgeTuning::default()), 1);
        driver.start();
        let x = driver.game().player_rect().pos.x;
        driver.game_mut().spawn_at(x);
        run(&mut driver, 300);
        assert_eq!(driver.session().lives, 2);
        assert_eq!(driver.session().score, 0);
        assert_eq!(driver.game().dodged(), 0);
    }

    #[test]
    fn test_lose_life_policy_does_not_count_as_dodge() {
        let mut driver = LoopDriver::new(
            manual(FallingDodgeTuning {
                exit_policy: ExitPolicy::LoseLife,
                dodges_per_level: 1,
                ..Default::default()
            }),
            1,
        );
        driver.start();
        driver.game_mut().spawn_at(0.0);
        let events = run(&mut driver, 300);
        assert_eq!(driver.session().lives, 2);
        assert_eq!(driver.game().level(), 1);
        assert!(events.contains(&GameEvent::LifeLost { remaining: 2 }));
    }

    #[test]
    fn test_spawns_on_cadence() {
        let mut driver = LoopDriver::new(FallingDodge::default(), 11);
        driver.start();
        // One spawn per second at level 1
        run(&mut driver, 61);
        assert_eq!(driver.game().obstacles().len(), 1);
    }
}
