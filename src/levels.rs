//! Static level content
//!
//! The eleven-level farm-to-feast campaign. Everything here is read-only
//! configuration consumed by the simulation; [`validate_all`] rejects a
//! malformed table before a session can ever run on it.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::ROTATE_NEEDED_DEFAULT;

/// Camera/projection kind of a level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ViewKind {
    /// Ground lane plus a sky lane; pickups fall toward the player
    Side,
    /// Free 2-D roaming
    TopDown,
}

/// Every collectible ingredient in the campaign
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Ingredient {
    Egg,
    Milk,
    Wheat,
    Bacon,
    Tomato,
    Berry,
    Honey,
    Duck,
    Chicken,
    Fish,
    Lemon,
    Carrot,
    Potato,
    Cheese,
    Dough,
    Turkey,
    Cranberry,
    Shell,
    Seaweed,
    Lamb,
    Herbs,
    Garlic,
    Grapes,
}

impl Ingredient {
    /// Number of ingredient kinds (sizes the per-kind counter array)
    pub const COUNT: usize = 23;

    /// Stable index into per-kind counter arrays
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn label(self) -> &'static str {
        match self {
            Ingredient::Egg => "egg",
            Ingredient::Milk => "milk",
            Ingredient::Wheat => "wheat",
            Ingredient::Bacon => "bacon",
            Ingredient::Tomato => "tomato",
            Ingredient::Berry => "berry",
            Ingredient::Honey => "honey",
            Ingredient::Duck => "duck",
            Ingredient::Chicken => "chicken",
            Ingredient::Fish => "fish",
            Ingredient::Lemon => "lemon",
            Ingredient::Carrot => "carrot",
            Ingredient::Potato => "potato",
            Ingredient::Cheese => "cheese",
            Ingredient::Dough => "dough",
            Ingredient::Turkey => "turkey",
            Ingredient::Cranberry => "cranberry",
            Ingredient::Shell => "shell",
            Ingredient::Seaweed => "seaweed",
            Ingredient::Lamb => "lamb",
            Ingredient::Herbs => "herbs",
            Ingredient::Garlic => "garlic",
            Ingredient::Grapes => "grapes",
        }
    }
}

/// Input modality that collects an ingredient
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Method {
    Tilt,
    Touch,
    Shake,
    Rotate,
}

impl Method {
    /// Points awarded per collection
    pub fn points(self) -> u32 {
        use crate::consts::{ROTATE_POINTS, SHAKE_POINTS, TILT_POINTS, TOUCH_POINTS};
        match self {
            Method::Tilt => TILT_POINTS,
            Method::Touch => TOUCH_POINTS,
            Method::Shake => SHAKE_POINTS,
            Method::Rotate => ROTATE_POINTS,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Method::Tilt => "tilt",
            Method::Touch => "touch",
            Method::Shake => "shake",
            Method::Rotate => "rotate",
        }
    }
}

/// Roster animals
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Animal {
    Chicken,
    Cow,
    Pig,
    Bee,
    Duck,
    Turkey,
    Lamb,
    Shark,
}

impl Animal {
    /// Ingredient a completed touch yields (None = not touch-collectible)
    pub fn yields(self) -> Option<Ingredient> {
        match self {
            Animal::Chicken => Some(Ingredient::Chicken),
            Animal::Cow => Some(Ingredient::Milk),
            Animal::Pig => Some(Ingredient::Bacon),
            Animal::Bee => Some(Ingredient::Honey),
            Animal::Duck => Some(Ingredient::Duck),
            Animal::Turkey => Some(Ingredient::Turkey),
            Animal::Lamb => Some(Ingredient::Lamb),
            Animal::Shark => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Animal::Chicken => "chicken",
            Animal::Cow => "cow",
            Animal::Pig => "pig",
            Animal::Bee => "bee",
            Animal::Duck => "duck",
            Animal::Turkey => "turkey",
            Animal::Lamb => "lamb",
            Animal::Shark => "shark",
        }
    }
}

/// Movement dispositions, dispatched once per tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Behavior {
    /// No movement (trees, stations)
    Static,
    /// Constant-velocity bounce inside the animal box
    Patrol,
    /// Patrol that steers directly away from a close player
    Flee,
    /// Patrol at hazard speed; contact is resolved as a hazard
    HazardRoam,
}

/// One required ingredient line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IngredientNeed {
    pub kind: Ingredient,
    pub method: Method,
    pub count: u8,
}

/// One roster line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnimalSpec {
    pub animal: Animal,
    pub behavior: Behavior,
}

/// Post-collection cooking step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CookingSpec {
    /// Button-hold phase label
    pub label: &'static str,
    /// Rotate phase label (double-phase cooks only)
    pub second: Option<&'static str>,
}

/// Static definition of one level
#[derive(Debug, Clone, Copy)]
pub struct LevelDefinition {
    pub name: &'static str,
    /// Dish shown on the clear screen
    pub dish: &'static str,
    pub view: ViewKind,
    pub ingredients: &'static [IngredientNeed],
    pub animals: &'static [AnimalSpec],
    /// Rotate ticks to finish one station
    pub rotate_needed: u32,
    /// Berries arrive on a timed schedule and expire uncollected
    pub timed_berries: bool,
    /// Shake-method ingredients grow on trees instead of free pickups
    pub tree_source: bool,
    /// Tighter spawn cadence, two pickups per wave
    pub spawn_fast: bool,
    /// The shark takes a collected fish back on contact
    pub shark_steals_fish: bool,
    pub cooking: Option<CookingSpec>,
}

impl LevelDefinition {
    /// Top-down level with default mechanics
    const fn new(
        name: &'static str,
        dish: &'static str,
        ingredients: &'static [IngredientNeed],
        animals: &'static [AnimalSpec],
    ) -> Self {
        Self {
            name,
            dish,
            view: ViewKind::TopDown,
            ingredients,
            animals,
            rotate_needed: ROTATE_NEEDED_DEFAULT,
            timed_berries: false,
            tree_source: false,
            spawn_fast: false,
            shark_steals_fish: false,
            cooking: None,
        }
    }

    const fn side_view(mut self) -> Self {
        self.view = ViewKind::Side;
        self
    }

    const fn with_rotate(mut self, needed: u32) -> Self {
        self.rotate_needed = needed;
        self
    }

    const fn with_berry_schedule(mut self) -> Self {
        self.timed_berries = true;
        self
    }

    const fn with_trees(mut self) -> Self {
        self.tree_source = true;
        self
    }

    const fn with_fast_spawns(mut self) -> Self {
        self.spawn_fast = true;
        self
    }

    const fn with_shark(mut self) -> Self {
        self.shark_steals_fish = true;
        self
    }

    const fn with_cooking(mut self, label: &'static str) -> Self {
        self.cooking = Some(CookingSpec { label, second: None });
        self
    }

    const fn with_double_cooking(mut self, first: &'static str, second: &'static str) -> Self {
        self.cooking = Some(CookingSpec {
            label: first,
            second: Some(second),
        });
        self
    }

    /// Intro pages shown before play: crowded levels get a second page
    pub fn intro_pages(&self) -> u8 {
        if self.ingredients.len() >= 4 { 2 } else { 1 }
    }

    /// Required count for a kind (0 when the level doesn't want it)
    pub fn required(&self, kind: Ingredient) -> u8 {
        self.ingredients
            .iter()
            .filter(|need| need.kind == kind)
            .map(|need| need.count)
            .sum()
    }

    /// Ingredient collected at rotate stations, if any
    pub fn rotate_kind(&self) -> Option<Ingredient> {
        self.ingredients
            .iter()
            .find(|need| need.method == Method::Rotate)
            .map(|need| need.kind)
    }

    /// Ingredient grown on trees (the first shake-method kind)
    pub fn shake_kind(&self) -> Option<Ingredient> {
        self.ingredients
            .iter()
            .find(|need| need.method == Method::Shake)
            .map(|need| need.kind)
    }
}

const fn need(kind: Ingredient, method: Method, count: u8) -> IngredientNeed {
    IngredientNeed {
        kind,
        method,
        count,
    }
}

const fn roam(animal: Animal, behavior: Behavior) -> AnimalSpec {
    AnimalSpec { animal, behavior }
}

/// The campaign, in play order
pub static LEVELS: [LevelDefinition; 11] = [
    LevelDefinition::new(
        "Sunny Morning",
        "Fried Egg + Milk",
        &[
            need(Ingredient::Egg, Method::Tilt, 2),
            need(Ingredient::Milk, Method::Touch, 2),
        ],
        &[
            roam(Animal::Chicken, Behavior::Patrol),
            roam(Animal::Cow, Behavior::Patrol),
        ],
    )
    .side_view(),
    LevelDefinition::new(
        "Pancake Prep",
        "Fluffy Pancakes",
        &[
            need(Ingredient::Egg, Method::Tilt, 2),
            need(Ingredient::Wheat, Method::Shake, 2),
        ],
        &[roam(Animal::Chicken, Behavior::Patrol)],
    )
    .side_view(),
    LevelDefinition::new(
        "Full Breakfast",
        "Hearty Brunch",
        &[
            need(Ingredient::Bacon, Method::Touch, 2),
            need(Ingredient::Egg, Method::Tilt, 2),
            need(Ingredient::Tomato, Method::Shake, 2),
        ],
        &[
            roam(Animal::Pig, Behavior::Patrol),
            roam(Animal::Chicken, Behavior::Patrol),
        ],
    ),
    LevelDefinition::new(
        "Healthy Bowl",
        "Berry Bliss Bowl",
        &[
            need(Ingredient::Milk, Method::Touch, 2),
            need(Ingredient::Berry, Method::Tilt, 2),
            need(Ingredient::Honey, Method::Touch, 2),
        ],
        &[
            roam(Animal::Cow, Behavior::Patrol),
            roam(Animal::Bee, Behavior::Patrol),
        ],
    )
    .with_berry_schedule()
    .with_cooking("Fermenting..."),
    LevelDefinition::new(
        "Poultry Chase",
        "Golden Roast",
        &[
            need(Ingredient::Duck, Method::Touch, 3),
            need(Ingredient::Chicken, Method::Touch, 3),
        ],
        &[
            roam(Animal::Duck, Behavior::Flee),
            roam(Animal::Chicken, Behavior::Flee),
        ],
    ),
    LevelDefinition::new(
        "Lakeside",
        "Citrus Fish",
        &[
            need(Ingredient::Fish, Method::Tilt, 3),
            need(Ingredient::Lemon, Method::Shake, 3),
        ],
        &[],
    )
    .with_trees()
    .with_fast_spawns(),
    LevelDefinition::new(
        "Hearty Stew",
        "Cozy Stew",
        &[
            need(Ingredient::Bacon, Method::Touch, 3),
            need(Ingredient::Carrot, Method::Shake, 4),
            need(Ingredient::Potato, Method::Tilt, 4),
        ],
        &[roam(Animal::Pig, Behavior::Patrol)],
    ),
    LevelDefinition::new(
        "Pizza Time",
        "Cheesy Pizza",
        &[
            need(Ingredient::Cheese, Method::Tilt, 3),
            need(Ingredient::Tomato, Method::Shake, 3),
            need(Ingredient::Dough, Method::Rotate, 2),
        ],
        &[],
    )
    .with_rotate(2)
    .with_cooking("Baking..."),
    LevelDefinition::new(
        "Thanksgiving",
        "Feast Turkey",
        &[
            need(Ingredient::Turkey, Method::Touch, 4),
            need(Ingredient::Cranberry, Method::Tilt, 5),
            need(Ingredient::Potato, Method::Rotate, 3),
        ],
        &[roam(Animal::Turkey, Behavior::Patrol)],
    )
    .with_rotate(2)
    .with_cooking("Making Sauce..."),
    LevelDefinition::new(
        "Ocean Bounty",
        "Grand Seafood Platter",
        &[
            need(Ingredient::Fish, Method::Tilt, 4),
            need(Ingredient::Shell, Method::Tilt, 5),
            need(Ingredient::Seaweed, Method::Shake, 5),
        ],
        &[roam(Animal::Shark, Behavior::HazardRoam)],
    )
    .with_shark()
    .with_fast_spawns(),
    LevelDefinition::new(
        "Gourmet",
        "Roasted Lamb",
        &[
            need(Ingredient::Lamb, Method::Touch, 4),
            need(Ingredient::Herbs, Method::Shake, 5),
            need(Ingredient::Garlic, Method::Tilt, 4),
            need(Ingredient::Grapes, Method::Rotate, 3),
        ],
        &[roam(Animal::Lamb, Behavior::Patrol)],
    )
    .with_rotate(3)
    .with_double_cooking("Roasting...", "Making Wine..."),
];

/// Level table integrity failures (build-time defects, never runtime)
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LevelDataError {
    #[error("level {level} lists no ingredients")]
    NoIngredients { level: usize },
    #[error("level {level} requires zero {kind}")]
    ZeroCount { level: usize, kind: &'static str },
    #[error("level {level} uses the {mechanic} mechanic outside top-down view")]
    NeedsTopDown {
        level: usize,
        mechanic: &'static str,
    },
    #[error("level {level} needs rotate ticks but its station count is zero")]
    RotateCountZero { level: usize },
    #[error("level {level} requires touching {kind} but no roster animal yields it")]
    MissingTouchSource { level: usize, kind: &'static str },
    #[error("level {level} grows trees without a shake-method ingredient")]
    TreeWithoutShake { level: usize },
    #[error("level {level} schedules berries it does not require")]
    BerriesNotRequired { level: usize },
    #[error("level {level} lets the shark steal fish but fish are not in play")]
    SharkWithoutFish { level: usize },
}

/// Validate a single level; `number` is the 1-based campaign position
pub fn validate(level: &LevelDefinition, number: usize) -> Result<(), LevelDataError> {
    if level.ingredients.is_empty() {
        return Err(LevelDataError::NoIngredients { level: number });
    }
    for need in level.ingredients {
        if need.count == 0 {
            return Err(LevelDataError::ZeroCount {
                level: number,
                kind: need.kind.label(),
            });
        }
        if need.method == Method::Rotate && level.view != ViewKind::TopDown {
            return Err(LevelDataError::NeedsTopDown {
                level: number,
                mechanic: "rotate",
            });
        }
        if need.method == Method::Touch {
            let sourced = level
                .animals
                .iter()
                .any(|spec| spec.animal.yields() == Some(need.kind));
            if !sourced {
                return Err(LevelDataError::MissingTouchSource {
                    level: number,
                    kind: need.kind.label(),
                });
            }
        }
    }
    if level.rotate_kind().is_some() && level.rotate_needed == 0 {
        return Err(LevelDataError::RotateCountZero { level: number });
    }
    if level.tree_source {
        if level.view != ViewKind::TopDown {
            return Err(LevelDataError::NeedsTopDown {
                level: number,
                mechanic: "tree",
            });
        }
        if level.shake_kind().is_none() {
            return Err(LevelDataError::TreeWithoutShake { level: number });
        }
    }
    if level.timed_berries && level.required(Ingredient::Berry) == 0 {
        return Err(LevelDataError::BerriesNotRequired { level: number });
    }
    if level.shark_steals_fish {
        let has_hazard = level
            .animals
            .iter()
            .any(|spec| spec.behavior == Behavior::HazardRoam);
        if !has_hazard || level.required(Ingredient::Fish) == 0 {
            return Err(LevelDataError::SharkWithoutFish { level: number });
        }
    }
    Ok(())
}

/// Validate the whole campaign table
pub fn validate_all() -> Result<(), LevelDataError> {
    for (index, level) in LEVELS.iter().enumerate() {
        validate(level, index + 1)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_campaign_table_is_valid() {
        assert_eq!(validate_all(), Ok(()));
    }

    #[test]
    fn test_campaign_shape() {
        assert_eq!(LEVELS.len(), 11);
        assert_eq!(LEVELS[0].view, ViewKind::Side);
        assert_eq!(LEVELS[1].view, ViewKind::Side);
        assert!(LEVELS[2..].iter().all(|l| l.view == ViewKind::TopDown));

        // Mechanic flags land where the campaign expects them
        assert!(LEVELS[3].timed_berries);
        assert!(LEVELS[5].tree_source && LEVELS[5].spawn_fast);
        assert!(LEVELS[9].shark_steals_fish);
        assert_eq!(LEVELS[7].rotate_needed, 2);
        assert_eq!(LEVELS[8].rotate_needed, 2);
        assert_eq!(LEVELS[10].rotate_needed, 3);

        // Only the gourmet finale needs a second intro page
        assert!(LEVELS[..10].iter().all(|l| l.intro_pages() == 1));
        assert_eq!(LEVELS[10].intro_pages(), 2);

        // Double-phase cooking only on the finale
        let double = LEVELS[10].cooking.and_then(|c| c.second);
        assert_eq!(double, Some("Making Wine..."));
    }

    #[test]
    fn test_touch_yields() {
        assert_eq!(Animal::Cow.yields(), Some(Ingredient::Milk));
        assert_eq!(Animal::Pig.yields(), Some(Ingredient::Bacon));
        assert_eq!(Animal::Bee.yields(), Some(Ingredient::Honey));
        assert_eq!(Animal::Shark.yields(), None);
    }

    #[test]
    fn test_rejects_empty_ingredients() {
        let level = LevelDefinition::new("Empty", "Nothing", &[], &[]);
        assert_eq!(
            validate(&level, 1),
            Err(LevelDataError::NoIngredients { level: 1 })
        );
    }

    #[test]
    fn test_rejects_zero_count() {
        static NEEDS: [IngredientNeed; 1] = [need(Ingredient::Egg, Method::Tilt, 0)];
        let level = LevelDefinition::new("Zero", "Nothing", &NEEDS, &[]);
        assert_eq!(
            validate(&level, 4),
            Err(LevelDataError::ZeroCount {
                level: 4,
                kind: "egg"
            })
        );
    }

    #[test]
    fn test_rejects_touch_without_source() {
        static NEEDS: [IngredientNeed; 1] = [need(Ingredient::Milk, Method::Touch, 2)];
        let level = LevelDefinition::new("No Cow", "Milk", &NEEDS, &[]);
        assert_eq!(
            validate(&level, 2),
            Err(LevelDataError::MissingTouchSource {
                level: 2,
                kind: "milk"
            })
        );
    }

    #[test]
    fn test_rejects_side_view_rotate() {
        static NEEDS: [IngredientNeed; 1] = [need(Ingredient::Dough, Method::Rotate, 2)];
        let level = LevelDefinition::new("Twist", "Pretzel", &NEEDS, &[]).side_view();
        assert_eq!(
            validate(&level, 3),
            Err(LevelDataError::NeedsTopDown {
                level: 3,
                mechanic: "rotate"
            })
        );
    }

    #[test]
    fn test_rejects_tree_without_shake() {
        static NEEDS: [IngredientNeed; 1] = [need(Ingredient::Fish, Method::Tilt, 3)];
        let level = LevelDefinition::new("Grove", "Fish", &NEEDS, &[]).with_trees();
        assert_eq!(
            validate(&level, 6),
            Err(LevelDataError::TreeWithoutShake { level: 6 })
        );
    }

    #[test]
    fn test_rejects_berries_not_required() {
        static NEEDS: [IngredientNeed; 1] = [need(Ingredient::Egg, Method::Tilt, 1)];
        let level = LevelDefinition::new("Berryless", "Egg", &NEEDS, &[]).with_berry_schedule();
        assert_eq!(
            validate(&level, 5),
            Err(LevelDataError::BerriesNotRequired { level: 5 })
        );
    }

    #[test]
    fn test_rejects_shark_without_fish() {
        static NEEDS: [IngredientNeed; 1] = [need(Ingredient::Shell, Method::Tilt, 2)];
        static ROSTER: [AnimalSpec; 1] = [roam(Animal::Shark, Behavior::HazardRoam)];
        let level = LevelDefinition::new("Dry Reef", "Shells", &NEEDS, &ROSTER).with_shark();
        assert_eq!(
            validate(&level, 10),
            Err(LevelDataError::SharkWithoutFish { level: 10 })
        );
    }

    #[test]
    fn test_required_sums_per_kind() {
        assert_eq!(LEVELS[0].required(Ingredient::Egg), 2);
        assert_eq!(LEVELS[0].required(Ingredient::Fish), 0);
        assert_eq!(LEVELS[10].required(Ingredient::Herbs), 5);
    }

    #[test]
    fn test_station_and_tree_kinds() {
        assert_eq!(LEVELS[7].rotate_kind(), Some(Ingredient::Dough));
        assert_eq!(LEVELS[0].rotate_kind(), None);
        assert_eq!(LEVELS[5].shake_kind(), Some(Ingredient::Lemon));
    }
}
