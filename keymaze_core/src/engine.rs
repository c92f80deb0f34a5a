use tracing::{debug, info, trace};

use crate::{
    Direction, Outcome, Position,
    config::EngineConfig,
    level::{BUILTIN_LEVEL, GameState, LevelError, load_level_from_string},
};

/// A level reset scheduled by a death or a win.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingReset {
    pub reason: Outcome,
    pub frames_left: u32,
}

/// Owns the game state and advances it in response to moves and frames.
///
/// Every operation runs to completion before returning; no intermediate
/// state is ever observable through [`GridEngine::state`].
#[derive(Debug, Clone)]
pub struct GridEngine {
    /// Freshly loaded level, restored on every reset.
    initial: GameState,
    state: GameState,
    config: EngineConfig,
    frame: u64,
    pending_reset: Option<PendingReset>,
    last_outcome: Outcome,
}

impl GridEngine {
    pub fn new(initial: GameState, config: EngineConfig) -> Self {
        GridEngine {
            state: initial.clone(),
            initial,
            config,
            frame: 0,
            pending_reset: None,
            last_outcome: Outcome::None,
        }
    }

    pub fn from_map(map: &str, config: EngineConfig) -> Result<Self, LevelError> {
        Ok(Self::new(load_level_from_string(map)?, config))
    }

    /// Creates an engine on the embedded level.
    ///
    /// # Panics
    ///
    /// Panics if [`BUILTIN_LEVEL`] is malformed, which is a build defect.
    pub fn builtin(config: EngineConfig) -> Self {
        Self::from_map(BUILTIN_LEVEL, config).expect("built-in level must be well-formed")
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// The outcome of the most recent move, patrol step or scheduled reset.
    ///
    /// Frames on which [`GridEngine::tick`] does neither leave it untouched,
    /// so presentation can still read what happened last.
    pub fn last_outcome(&self) -> Outcome {
        self.last_outcome
    }

    pub fn pending_reset(&self) -> Option<PendingReset> {
        self.pending_reset
    }

    /// Frames counted since the level was last (re)loaded.
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Moves by a raw `(dx, dy)` vector. Anything but a unit step is a no-op.
    pub fn try_move_delta(&mut self, dx: isize, dy: isize) -> Vec<Outcome> {
        match Direction::from_delta(dx, dy) {
            Some(direction) => self.try_move(direction),
            None => {
                trace!(dx, dy, "ignoring non-unit move");
                self.finish(vec![Outcome::None])
            }
        }
    }

    /// Resolves one player move, including any push and key pickup.
    ///
    /// Returns a single outcome, or `[KeyCollected, AllKeysCollected]`
    /// when the last key is picked up.
    pub fn try_move(&mut self, direction: Direction) -> Vec<Outcome> {
        if self.pending_reset.is_some() && self.config.lock_input_during_reset {
            trace!(?direction, "input locked until reset");
            return self.finish(vec![Outcome::None]);
        }

        let outcomes = self.resolve_move(direction);
        if let Some(&ending) = outcomes.iter().find(|outcome| outcome.ends_round()) {
            self.schedule_reset(ending);
        }
        self.finish(outcomes)
    }

    /// Moves every enemy one patrol step in declaration order.
    ///
    /// Stops at the first enemy that ends up on the player and reports
    /// `Death`; the remaining enemies keep their positions for this tick.
    pub fn advance_enemies(&mut self) -> Outcome {
        let outcome = self.patrol();
        if outcome.ends_round() {
            self.schedule_reset(outcome);
        }
        self.last_outcome = outcome;
        outcome
    }

    /// Advances one frame of the external scheduler.
    ///
    /// Counts down a pending reset and performs it when due. Otherwise,
    /// every `enemy_step_frames` frames, advances the enemies; a pending
    /// reset only holds them back when `freeze_enemies_during_reset` is set.
    pub fn tick(&mut self) -> Outcome {
        self.frame += 1;

        if let Some(pending) = self.pending_reset.as_mut() {
            pending.frames_left = pending.frames_left.saturating_sub(1);
            if pending.frames_left == 0 {
                self.reset();
                self.last_outcome = Outcome::LevelReset;
                return Outcome::LevelReset;
            }
            if self.config.freeze_enemies_during_reset {
                return Outcome::None;
            }
        }

        let cadence = u64::from(self.config.enemy_step_frames.max(1));
        if self.frame % cadence == 0 {
            self.advance_enemies()
        } else {
            Outcome::None
        }
    }

    /// Discards the current state and restores the freshly loaded level.
    pub fn reset(&mut self) {
        info!("level reset");
        self.state = self.initial.clone();
        self.pending_reset = None;
        self.frame = 0;
        self.last_outcome = Outcome::None;
    }

    fn finish(&mut self, outcomes: Vec<Outcome>) -> Vec<Outcome> {
        if let Some(&last) = outcomes.last() {
            self.last_outcome = last;
        }
        outcomes
    }

    fn schedule_reset(&mut self, reason: Outcome) {
        if self.pending_reset.is_some() {
            return;
        }
        let frames_left = match reason {
            Outcome::Win => self.config.win_reset_frames,
            _ => self.config.death_reset_frames,
        };
        info!(?reason, frames_left, "round over, reset scheduled");
        self.pending_reset = Some(PendingReset {
            reason,
            frames_left,
        });
    }

    fn resolve_move(&mut self, direction: Direction) -> Vec<Outcome> {
        let (dx, dy) = direction.delta();
        let state = &mut self.state;
        let in_grid = |pos: Option<Position>| pos.filter(|&p| state.terrain.contains(p));

        let Some(target) = in_grid(state.player.offset(dx, dy)) else {
            trace!(?direction, "move off the grid");
            return vec![Outcome::None];
        };

        if state.enemy_at(target).is_some() {
            info!(x = target.x, y = target.y, "player walked into an enemy");
            return vec![Outcome::Death];
        }

        if state.is_door(target) {
            return if state.door.open {
                info!("player reached the open door");
                vec![Outcome::Win]
            } else {
                debug!(keys_remaining = state.keys_remaining(), "door is locked");
                vec![Outcome::DoorLocked]
            };
        }

        if let Some(block) = state.block_at(target) {
            // Door and enemy occupancy behind the block is deliberately not checked.
            let Some(behind) = in_grid(target.offset(dx, dy)) else {
                return vec![Outcome::None];
            };
            if state.is_wall(behind) || state.block_at(behind).is_some() {
                trace!(x = behind.x, y = behind.y, "push blocked");
                return vec![Outcome::None];
            }
            debug!(
                from_x = target.x,
                from_y = target.y,
                to_x = behind.x,
                to_y = behind.y,
                "block pushed"
            );
            state.blocks[block] = behind;
            state.player = target;
        } else if state.is_wall(target) {
            trace!(x = target.x, y = target.y, "bumped into a wall");
            return vec![Outcome::None];
        } else {
            state.player = target;
        }

        self.collect_key()
    }

    fn collect_key(&mut self) -> Vec<Outcome> {
        let state = &mut self.state;
        let Some(index) = state.uncollected_key_at(state.player) else {
            return vec![Outcome::None];
        };

        state.keys[index].collected = true;
        state.keys_collected += 1;
        debug!(
            collected = state.keys_collected,
            total = state.total_keys,
            "key collected"
        );

        if state.keys_collected == state.total_keys && !state.door.open {
            state.door.open = true;
            info!("all keys collected, door unlocked");
            vec![Outcome::KeyCollected, Outcome::AllKeysCollected]
        } else {
            vec![Outcome::KeyCollected]
        }
    }

    fn patrol(&mut self) -> Outcome {
        let state = &mut self.state;
        for index in 0..state.enemies.len() {
            let enemy = state.enemies[index];
            let next = enemy
                .position
                .offset(enemy.heading.dx(), 0)
                .filter(|&p| state.in_bounds(p) && !state.is_wall(p) && state.block_at(p).is_none());

            match next {
                Some(next) => state.enemies[index].position = next,
                None => {
                    state.enemies[index].heading = enemy.heading.reversed();
                    debug!(enemy = index, "enemy reversed");
                }
            }

            if state.enemies[index].position == state.player {
                info!(enemy = index, "enemy caught the player");
                return Outcome::Death;
            }
        }
        Outcome::None
    }
}
