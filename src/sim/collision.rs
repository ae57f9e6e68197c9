//! Proximity tests and collection/hazard resolution
//!
//! The resolver half of the field: pure proximity predicates plus one
//! `resolve` pass that applies a tick's gesture events to the entities in
//! reach and reports what to award. Catch-window timing lives in the
//! field; this module only consumes the `Touch` events it synthesizes.

use glam::Vec2;

use crate::consts::*;
use crate::gesture::GestureEvent;
use crate::levels::{Animal, Behavior, Ingredient, LevelDefinition, Method, ViewKind};
use crate::sim::field::{EntityKind, Field, Lifecycle};
use crate::sim::state::Player;

/// Interaction radius for collecting from an entity
pub fn reach_radius(kind: &EntityKind) -> f32 {
    match kind {
        EntityKind::Pickup { .. } => ITEM_RADIUS,
        EntityKind::Animal(_) => TOUCH_RADIUS,
        EntityKind::Tree { .. } => TREE_RADIUS,
        EntityKind::Station { .. } => ROTATE_RADIUS,
    }
}

/// Proximity: Euclidean distance top-down, lane overlap in side view
///
/// Side-view overlap requires the entity inside the ground lane band, so
/// a pickup still falling through the sky cannot be grabbed early.
pub fn within_reach(view: ViewKind, player: Vec2, pos: Vec2, radius: f32) -> bool {
    match view {
        ViewKind::TopDown => player.distance(pos) < radius,
        ViewKind::Side => (player.x - pos.x).abs() < radius && pos.y >= SIDE_LANE_Y,
    }
}

/// Every required (kind, count) pair met by the player's counters
pub fn level_cleared(player: &Player, level: &LevelDefinition) -> bool {
    level
        .ingredients
        .iter()
        .all(|need| player.count(need.kind) >= level.required(need.kind))
}

/// What one resolution pass produced
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Outcomes {
    /// Points to hand the ledger
    pub points: u32,
    /// Successful collections (one `Collected` cue each)
    pub collections: u32,
    /// A hazard fired: bee-blocked shake or roaming-hazard contact
    pub penalty: bool,
}

/// Apply one tick's events against every entity in reach
pub fn resolve(
    field: &mut Field,
    player: &mut Player,
    level: &LevelDefinition,
    events: &[GestureEvent],
) -> Outcomes {
    let mut out = Outcomes::default();
    let view = field.view;

    let shake = events.iter().any(|e| matches!(e, GestureEvent::Shake));
    let spin: u32 = events
        .iter()
        .filter_map(|e| match e {
            GestureEvent::RotateTick(delta) => Some(delta.unsigned_abs()),
            _ => None,
        })
        .sum();

    // A bee in range spoils the whole shake; honey still comes from
    // touching it
    let bee_blocked = shake
        && field.entities.iter().any(|e| {
            e.in_play()
                && e.kind == EntityKind::Animal(Animal::Bee)
                && within_reach(view, player.pos, e.pos, BEE_RADIUS)
        });
    if bee_blocked {
        out.penalty = true;
        log::debug!("shake blocked by a bee");
    }

    for entity in &mut field.entities {
        if !entity.in_play() {
            continue;
        }
        let near = within_reach(view, player.pos, entity.pos, reach_radius(&entity.kind));
        match entity.kind {
            EntityKind::Pickup { kind, method } => {
                if !near {
                    continue;
                }
                let collected = match method {
                    // Positional: overlap alone collects
                    Method::Tilt => true,
                    Method::Shake => shake && !bee_blocked,
                    _ => false,
                };
                if collected {
                    player.record(kind);
                    out.points += method.points();
                    out.collections += 1;
                    entity.lifecycle = Lifecycle::Collected;
                }
            }
            EntityKind::Tree { kind } => {
                if near && shake && !bee_blocked {
                    player.record(kind);
                    out.points += Method::Shake.points();
                    out.collections += 1;
                    entity.lifecycle = Lifecycle::Consumed;
                }
            }
            EntityKind::Station { kind } => {
                if near {
                    entity.rotate_progress += spin;
                    if entity.rotate_progress >= level.rotate_needed {
                        player.record(kind);
                        out.points += Method::Rotate.points();
                        out.collections += 1;
                        entity.lifecycle = Lifecycle::Consumed;
                    }
                } else {
                    // Symmetric with the catch window: walking away
                    // throws the spin away
                    entity.rotate_progress = 0;
                }
            }
            EntityKind::Animal(_) => {}
        }
    }

    // Completed touch windows, synthesized by the field this tick
    for event in events {
        let GestureEvent::Touch { entity } = event else {
            continue;
        };
        let Some(entity) = field.entities.iter_mut().find(|e| e.id == *entity) else {
            continue;
        };
        let EntityKind::Animal(animal) = entity.kind else {
            continue;
        };
        let Some(kind) = animal.yields() else {
            continue;
        };
        player.record(kind);
        out.points += Method::Touch.points();
        out.collections += 1;
        if animal == Animal::Pig {
            entity.vel *= PIG_SPOOK_FACTOR;
        }
    }

    // Roaming hazards: contact shoves the player and may take a fish back
    for entity in &mut field.entities {
        if !entity.in_play() || entity.behavior != Behavior::HazardRoam {
            continue;
        }
        if within_reach(view, player.pos, entity.pos, HAZARD_RADIUS) {
            out.penalty = true;
            let push = if player.pos.x >= entity.pos.x {
                HAZARD_PUSH
            } else {
                -HAZARD_PUSH
            };
            player.pos.x = (player.pos.x + push).clamp(PLAYER_X_MIN, PLAYER_X_MAX);
            if level.shark_steals_fish && player.take(Ingredient::Fish) {
                player.fish_stolen = true;
                log::debug!("shark took a fish back");
            }
        }
    }

    out
}
