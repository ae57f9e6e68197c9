//! Entity field
//!
//! Owns every on-field object for the current level attempt: roster
//! animals, drifting pickups, trees, berries and rotate stations. The
//! field moves entities per behavior, runs the spawn/expiry schedules,
//! and accumulates touch windows, synthesizing a `Touch` event when one
//! completes. Deciding what a gesture collects is the resolver's job
//! (see `collision`).

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::gesture::GestureEvent;
use crate::levels::{Animal, Behavior, Ingredient, LevelDefinition, Method, ViewKind};

use super::collision::{reach_radius, within_reach};

/// Entity lifecycle; leaves `Active` at most once and never re-enters it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Lifecycle {
    Active,
    /// A touch window is open (repeatable animals return to Active)
    Collecting,
    Collected,
    /// Single-use source spent (tree shaken out, station finished)
    Consumed,
    Expired,
}

/// What an entity is, and what collecting it yields
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum EntityKind {
    /// Free pickup, collected positionally (tilt) or by shaking
    Pickup { kind: Ingredient, method: Method },
    /// Roster animal; touch yield comes from [`Animal::yields`]
    Animal(Animal),
    /// Shake source that drops `kind` once
    Tree { kind: Ingredient },
    /// Rotate station that produces `kind` when spun enough
    Station { kind: Ingredient },
}

impl EntityKind {
    pub fn label(&self) -> &'static str {
        match self {
            EntityKind::Pickup { kind, .. } => kind.label(),
            EntityKind::Animal(animal) => animal.label(),
            EntityKind::Tree { .. } => "tree",
            EntityKind::Station { .. } => "station",
        }
    }
}

/// One on-field object
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entity {
    pub id: u32,
    pub kind: EntityKind,
    pub pos: Vec2,
    pub vel: Vec2,
    pub behavior: Behavior,
    pub lifecycle: Lifecycle,
    /// Field-elapsed second past which the entity expires uncollected
    pub expires_at: Option<f32>,
    /// Continuous touch proximity so far (seconds)
    pub catch_progress: f32,
    /// |RotateTick| units accumulated at this station
    pub rotate_progress: u32,
}

impl Entity {
    pub(crate) fn new(id: u32, kind: EntityKind, pos: Vec2, vel: Vec2, behavior: Behavior) -> Self {
        Self {
            id,
            kind,
            pos,
            vel,
            behavior,
            lifecycle: Lifecycle::Active,
            expires_at: None,
            catch_progress: 0.0,
            rotate_progress: 0,
        }
    }

    /// Still interactable this tick
    pub fn in_play(&self) -> bool {
        matches!(self.lifecycle, Lifecycle::Active | Lifecycle::Collecting)
    }
}

fn field_rng() -> Pcg32 {
    Pcg32::seed_from_u64(0)
}

/// All per-level-attempt field state; fully rebuilt on Retry/Restart
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Field {
    pub entities: Vec<Entity>,
    /// Seconds since the level (re)started
    pub elapsed: f32,
    pub view: ViewKind,
    next_id: u32,
    spawn_timer: f32,
    tree_timer: f32,
    berry_timer: f32,
    station_timer: f32,
    lay_timer: f32,
    #[serde(skip, default = "field_rng")]
    rng: Pcg32,
}

impl Field {
    /// Empty field, used outside gameplay
    pub fn empty() -> Self {
        Self {
            entities: Vec::new(),
            elapsed: 0.0,
            view: ViewKind::TopDown,
            next_id: 0,
            spawn_timer: 0.0,
            tree_timer: 0.0,
            berry_timer: 0.0,
            station_timer: 0.0,
            lay_timer: 0.0,
            rng: field_rng(),
        }
    }

    /// Populate from a level's roster with seeded placement
    pub fn populate(level: &LevelDefinition, seed: u64) -> Self {
        let mut field = Self {
            view: level.view,
            rng: Pcg32::seed_from_u64(seed),
            ..Self::empty()
        };
        for spec in level.animals {
            field.spawn_animal(spec.animal, spec.behavior);
        }
        // Two pickups are already waiting when play starts
        for _ in 0..2 {
            field.spawn_pickup(level);
        }
        log::info!(
            "field populated: {} entities ({:?})",
            field.entities.len(),
            level.view
        );
        field
    }

    fn alloc_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn entity(&self, id: u32) -> Option<&Entity> {
        self.entities.iter().find(|e| e.id == id)
    }

    /// Active pickups currently afield
    fn pickups_afield(&self) -> usize {
        self.entities
            .iter()
            .filter(|e| e.in_play() && matches!(e.kind, EntityKind::Pickup { .. }))
            .count()
    }

    fn count_kind(&self, matches: impl Fn(&EntityKind) -> bool) -> usize {
        self.entities
            .iter()
            .filter(|e| e.in_play() && matches(&e.kind))
            .count()
    }

    fn spawn_animal(&mut self, animal: Animal, behavior: Behavior) {
        let id = self.alloc_id();
        let (pos, vel) = match self.view {
            ViewKind::TopDown => {
                let pos = Vec2::new(
                    self.rng.random_range(ANIMAL_X_MIN..ANIMAL_X_MAX),
                    self.rng.random_range(ANIMAL_Y_MIN..ANIMAL_Y_MAX),
                );
                let angle = self.rng.random_range(0.0..std::f32::consts::TAU);
                let speed = match behavior {
                    Behavior::HazardRoam => HAZARD_SPEED,
                    Behavior::Static => 0.0,
                    _ => PATROL_SPEED,
                };
                (pos, Vec2::from_angle(angle) * speed)
            }
            ViewKind::Side => {
                // Chickens work the sky lane; everyone else walks the ground
                let y = if animal == Animal::Chicken {
                    SIDE_SKY_Y
                } else {
                    SIDE_GROUND_Y
                };
                let x = self.rng.random_range(ANIMAL_X_MIN..ANIMAL_X_MAX);
                let dir = if self.rng.random_range(0..2) == 0 {
                    1.0
                } else {
                    -1.0
                };
                (Vec2::new(x, y), Vec2::new(dir * PATROL_SPEED, 0.0))
            }
        };
        self.entities
            .push(Entity::new(id, EntityKind::Animal(animal), pos, vel, behavior));
    }

    /// Ingredient kinds the generic spawner may produce
    fn pickup_pool(level: &LevelDefinition) -> Vec<(Ingredient, Method)> {
        level
            .ingredients
            .iter()
            .filter(|need| matches!(need.method, Method::Tilt | Method::Shake))
            .filter(|need| !(level.tree_source && need.method == Method::Shake))
            .filter(|need| !(level.timed_berries && need.kind == Ingredient::Berry))
            .map(|need| (need.kind, need.method))
            .collect()
    }

    fn spawn_pickup(&mut self, level: &LevelDefinition) {
        let pool = Self::pickup_pool(level);
        if pool.is_empty() {
            return;
        }
        let (kind, method) = pool[self.rng.random_range(0..pool.len())];
        self.spawn_pickup_of(kind, method, None);
    }

    fn spawn_pickup_of(&mut self, kind: Ingredient, method: Method, lifetime: Option<f32>) {
        let id = self.alloc_id();
        let (pos, vel) = match self.view {
            ViewKind::TopDown => {
                let pos = Vec2::new(
                    self.rng.random_range(ITEM_X_MIN..ITEM_X_MAX),
                    self.rng.random_range(ITEM_Y_MIN..ITEM_Y_MAX),
                );
                let (dx, dy) = if kind == Ingredient::Fish {
                    (FISH_DRIFT_X, FISH_DRIFT_Y)
                } else {
                    (ITEM_DRIFT_X, ITEM_DRIFT_Y)
                };
                let sx = if self.rng.random_range(0..2) == 0 { dx } else { -dx };
                let sy = if self.rng.random_range(0..2) == 0 { dy } else { -dy };
                (pos, Vec2::new(sx, sy))
            }
            ViewKind::Side => {
                // Side-view pickups fall out of the sky toward the lane
                let x = self.rng.random_range(ITEM_X_MIN..ITEM_X_MAX);
                (Vec2::new(x, SIDE_SKY_Y), Vec2::new(0.0, ITEM_FALL_SPEED))
            }
        };
        let mut entity = Entity::new(
            id,
            EntityKind::Pickup { kind, method },
            pos,
            vel,
            Behavior::Static,
        );
        entity.expires_at = lifetime.map(|life| self.elapsed + life);
        self.entities.push(entity);
    }

    /// Drop a pickup at an exact spot (egg laying)
    fn drop_pickup_at(&mut self, kind: Ingredient, pos: Vec2) {
        let id = self.alloc_id();
        let vel = match self.view {
            ViewKind::TopDown => Vec2::ZERO,
            ViewKind::Side => Vec2::new(0.0, ITEM_FALL_SPEED),
        };
        self.entities.push(Entity::new(
            id,
            EntityKind::Pickup {
                kind,
                method: Method::Tilt,
            },
            pos,
            vel,
            Behavior::Static,
        ));
    }

    fn spawn_tree(&mut self, kind: Ingredient) {
        let id = self.alloc_id();
        let pos = Vec2::new(
            self.rng.random_range(ITEM_X_MIN..ITEM_X_MAX),
            self.rng.random_range(ITEM_Y_MIN..ITEM_Y_MAX),
        );
        let mut entity = Entity::new(
            id,
            EntityKind::Tree { kind },
            pos,
            Vec2::ZERO,
            Behavior::Static,
        );
        entity.expires_at = Some(self.elapsed + TREE_LIFETIME);
        self.entities.push(entity);
    }

    fn spawn_station(&mut self, kind: Ingredient) {
        let id = self.alloc_id();
        let pos = Vec2::new(
            self.rng.random_range(ITEM_X_MIN..ITEM_X_MAX),
            self.rng.random_range(ITEM_Y_MIN..ITEM_Y_MAX),
        );
        self.entities.push(Entity::new(
            id,
            EntityKind::Station { kind },
            pos,
            Vec2::ZERO,
            Behavior::Static,
        ));
    }

    /// Advance the field by one gameplay tick
    ///
    /// Moves entities, runs expiry and the spawn schedules, and returns
    /// the `Touch` events for any catch windows that completed.
    pub fn advance(
        &mut self,
        dt: f32,
        player: Vec2,
        level: &LevelDefinition,
    ) -> Vec<GestureEvent> {
        self.elapsed += dt;
        self.advance_motion(dt, player);
        self.expire();
        self.run_schedules(dt, level);
        self.update_catches(dt, player)
    }

    fn advance_motion(&mut self, dt: f32, player: Vec2) {
        let view = self.view;
        for entity in &mut self.entities {
            if !entity.in_play() {
                continue;
            }
            match entity.kind {
                EntityKind::Pickup { .. } => match view {
                    ViewKind::TopDown => {
                        entity.pos += entity.vel * dt;
                        bounce(
                            &mut entity.pos,
                            &mut entity.vel,
                            Vec2::new(ITEM_X_MIN, ITEM_Y_MIN),
                            Vec2::new(ITEM_X_MAX, ITEM_Y_MAX),
                        );
                    }
                    ViewKind::Side => {
                        entity.pos += entity.vel * dt;
                    }
                },
                EntityKind::Tree { .. } | EntityKind::Station { .. } => {}
                EntityKind::Animal(_) => {
                    match entity.behavior {
                        Behavior::Static => continue,
                        Behavior::Flee => {
                            if entity.pos.distance(player) < FLEE_TRIGGER {
                                let away = (entity.pos - player).normalize_or(Vec2::X);
                                entity.vel = away * FLEE_SPEED;
                            } else if entity.vel.length() > PATROL_SPEED {
                                // Calm back down to patrol pace
                                entity.vel = entity.vel.normalize_or(Vec2::X) * PATROL_SPEED;
                            }
                        }
                        Behavior::Patrol | Behavior::HazardRoam => {}
                    }
                    entity.pos += entity.vel * dt;
                    match view {
                        ViewKind::TopDown => bounce(
                            &mut entity.pos,
                            &mut entity.vel,
                            Vec2::new(ANIMAL_X_MIN, ANIMAL_Y_MIN),
                            Vec2::new(ANIMAL_X_MAX, ANIMAL_Y_MAX),
                        ),
                        ViewKind::Side => {
                            // Lane animals only walk along x
                            let y = entity.pos.y;
                            bounce(
                                &mut entity.pos,
                                &mut entity.vel,
                                Vec2::new(ANIMAL_X_MIN, y),
                                Vec2::new(ANIMAL_X_MAX, y),
                            );
                            entity.pos.y = y;
                        }
                    }
                }
            }
        }
    }

    fn expire(&mut self) {
        let elapsed = self.elapsed;
        for entity in &mut self.entities {
            if !entity.in_play() {
                continue;
            }
            let timed_out = entity.expires_at.is_some_and(|at| elapsed >= at);
            let off_lane = self.view == ViewKind::Side
                && matches!(entity.kind, EntityKind::Pickup { .. })
                && entity.pos.y > SIDE_DESPAWN_Y;
            if timed_out || off_lane {
                entity.lifecycle = Lifecycle::Expired;
            }
        }
    }

    fn run_schedules(&mut self, dt: f32, level: &LevelDefinition) {
        // Generic pickups
        self.spawn_timer += dt;
        let interval = if level.spawn_fast {
            SPAWN_INTERVAL_FAST
        } else {
            SPAWN_INTERVAL
        };
        if self.spawn_timer >= interval {
            self.spawn_timer = 0.0;
            let batch = if level.spawn_fast { 2 } else { 1 };
            for _ in 0..batch {
                if self.pickups_afield() >= MAX_FIELD_ITEMS {
                    break;
                }
                self.spawn_pickup(level);
            }
        }

        // Trees carry the shake ingredient and lapse if not shaken
        if level.tree_source {
            if let Some(kind) = level.shake_kind() {
                self.tree_timer += dt;
                if self.tree_timer >= TREE_INTERVAL {
                    self.tree_timer = 0.0;
                    if self.count_kind(|k| matches!(k, EntityKind::Tree { .. })) < MAX_TREES {
                        self.spawn_tree(kind);
                    }
                }
            }
        }

        // Berries appear on their own clock and auto-expire
        if level.timed_berries {
            self.berry_timer += dt;
            if self.berry_timer >= BERRY_INTERVAL {
                self.berry_timer = 0.0;
                let berries = self.count_kind(|k| {
                    matches!(
                        k,
                        EntityKind::Pickup {
                            kind: Ingredient::Berry,
                            ..
                        }
                    )
                });
                if berries < MAX_BERRIES {
                    self.spawn_pickup_of(Ingredient::Berry, Method::Tilt, Some(BERRY_LIFETIME));
                }
            }
        }

        // One rotate station at a time
        if let Some(kind) = level.rotate_kind() {
            self.station_timer += dt;
            if self.station_timer >= STATION_INTERVAL {
                self.station_timer = 0.0;
                if self.count_kind(|k| matches!(k, EntityKind::Station { .. })) == 0 {
                    self.spawn_station(kind);
                }
            }
        }

        // Non-flee chickens lay eggs where they stand
        self.lay_timer += dt;
        if self.lay_timer >= EGG_LAY_INTERVAL {
            self.lay_timer = 0.0;
            let layers: Vec<Vec2> = self
                .entities
                .iter()
                .filter(|e| {
                    e.in_play()
                        && e.kind == EntityKind::Animal(Animal::Chicken)
                        && e.behavior != Behavior::Flee
                })
                .map(|e| e.pos)
                .collect();
            for pos in layers {
                if self.pickups_afield() >= MAX_FIELD_ITEMS {
                    break;
                }
                self.drop_pickup_at(Ingredient::Egg, pos);
            }
        }
    }

    /// Accumulate touch windows; a window completing synthesizes `Touch`
    ///
    /// Progress resets to zero the moment proximity is lost, so a partial
    /// window never carries over.
    fn update_catches(&mut self, dt: f32, player: Vec2) -> Vec<GestureEvent> {
        let view = self.view;
        let mut completed = Vec::new();
        for entity in &mut self.entities {
            let EntityKind::Animal(animal) = entity.kind else {
                continue;
            };
            if !entity.in_play()
                || animal.yields().is_none()
                || entity.behavior == Behavior::HazardRoam
            {
                continue;
            }
            if within_reach(view, player, entity.pos, reach_radius(&entity.kind)) {
                entity.catch_progress += dt;
                entity.lifecycle = Lifecycle::Collecting;
                if entity.catch_progress >= TOUCH_HOLD {
                    completed.push(GestureEvent::Touch { entity: entity.id });
                    // Animals are repeatable: the window simply restarts
                    entity.catch_progress = 0.0;
                    entity.lifecycle = Lifecycle::Active;
                }
            } else {
                entity.catch_progress = 0.0;
                if entity.lifecycle == Lifecycle::Collecting {
                    entity.lifecycle = Lifecycle::Active;
                }
            }
        }
        completed
    }

    /// Drop entities that left play this tick
    pub fn sweep(&mut self) {
        self.entities.retain(|e| e.in_play());
    }
}

fn bounce(pos: &mut Vec2, vel: &mut Vec2, min: Vec2, max: Vec2) {
    if pos.x < min.x {
        pos.x = min.x;
        vel.x = vel.x.abs();
    } else if pos.x > max.x {
        pos.x = max.x;
        vel.x = -vel.x.abs();
    }
    if pos.y < min.y {
        pos.y = min.y;
        vel.y = vel.y.abs();
    } else if pos.y > max.y {
        pos.y = max.y;
        vel.y = -vel.y.abs();
    }
}
