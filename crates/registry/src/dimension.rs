use serde::{Deserialize, Serialize};

use crate::error::RegistryError;
use crate::tag::Tag;

/// Light levels at which monsters may spawn, inclusive on both ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpawnLightRange {
    pub min: i32,
    pub max: i32,
}

impl Default for SpawnLightRange {
    fn default() -> Self {
        Self { min: 0, max: 7 }
    }
}

/// World geometry and game rules for one dimension type.
///
/// Immutable once parsed. Absent fields keep the values of
/// [`Dimension::default`], which describe the legacy 256-block overworld.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dimension {
    pub name: String,
    /// Lowest block y-coordinate.
    pub min_y: i32,
    /// Total height in blocks, starting at `min_y`.
    pub height: i32,
    /// Height within which portals and chorus fruit may teleport.
    pub logical_height: i32,
    pub coordinate_scale: f64,
    pub ambient_light: f32,
    /// Set when the sun is pinned to a fixed time of day.
    pub fixed_time: Option<i64>,
    pub has_skylight: bool,
    pub has_ceiling: bool,
    pub ultrawarm: bool,
    pub natural: bool,
    pub piglin_safe: bool,
    pub bed_works: bool,
    pub respawn_anchor_works: bool,
    pub has_raids: bool,
    pub infiniburn: String,
    pub effects: String,
    pub monster_spawn_light: SpawnLightRange,
    pub monster_spawn_block_light_limit: i32,
}

impl Default for Dimension {
    fn default() -> Self {
        Self {
            name: "minecraft:overworld".to_string(),
            min_y: 0,
            height: 256,
            logical_height: 256,
            coordinate_scale: 1.0,
            ambient_light: 0.0,
            fixed_time: None,
            has_skylight: true,
            has_ceiling: false,
            ultrawarm: false,
            natural: true,
            piglin_safe: false,
            bed_works: true,
            respawn_anchor_works: false,
            has_raids: true,
            infiniburn: "#minecraft:infiniburn_overworld".to_string(),
            effects: "minecraft:overworld".to_string(),
            monster_spawn_light: SpawnLightRange::default(),
            monster_spawn_block_light_limit: 0,
        }
    }
}

impl Dimension {
    /// Parse one dimension-type definition.
    ///
    /// Fields that are present but carry the wrong type are errors; fields that
    /// are absent take their defaults.
    pub fn from_tag(name: impl Into<String>, definition: &Tag) -> Result<Self, RegistryError> {
        let name = name.into();
        let fields = definition.expect_compound(&name)?;
        let mut dim = Dimension {
            name,
            ..Dimension::default()
        };

        let int = |key: &str| -> Result<Option<i32>, RegistryError> {
            fields
                .get(key)
                .map(|t| t.expect_i32(key))
                .transpose()
        };
        let flag = |key: &str, slot: &mut bool| -> Result<(), RegistryError> {
            if let Some(t) = fields.get(key) {
                *slot = t.expect_bool(key)?;
            }
            Ok(())
        };
        let text = |key: &str, slot: &mut String| -> Result<(), RegistryError> {
            if let Some(t) = fields.get(key) {
                *slot = t.expect_str(key)?.to_string();
            }
            Ok(())
        };

        if let Some(v) = int("min_y")? {
            dim.min_y = v;
        }
        if let Some(v) = int("height")? {
            dim.height = v;
        }
        if let Some(v) = int("logical_height")? {
            dim.logical_height = v;
        }
        if let Some(v) = int("monster_spawn_block_light_limit")? {
            dim.monster_spawn_block_light_limit = v;
        }
        if let Some(t) = fields.get("coordinate_scale") {
            dim.coordinate_scale = t.expect_f64("coordinate_scale")?;
        }
        if let Some(t) = fields.get("ambient_light") {
            dim.ambient_light = t.expect_f64("ambient_light")? as f32;
        }
        if let Some(t) = fields.get("fixed_time") {
            dim.fixed_time = Some(t.expect_i64("fixed_time")?);
        }
        if let Some(t) = fields.get("monster_spawn_light_level") {
            dim.monster_spawn_light = parse_spawn_light(t)?;
        }

        flag("has_skylight", &mut dim.has_skylight)?;
        flag("has_ceiling", &mut dim.has_ceiling)?;
        flag("ultrawarm", &mut dim.ultrawarm)?;
        flag("natural", &mut dim.natural)?;
        flag("piglin_safe", &mut dim.piglin_safe)?;
        flag("bed_works", &mut dim.bed_works)?;
        flag("respawn_anchor_works", &mut dim.respawn_anchor_works)?;
        flag("has_raids", &mut dim.has_raids)?;
        text("infiniburn", &mut dim.infiniburn)?;
        text("effects", &mut dim.effects)?;

        Ok(dim)
    }

    /// One past the highest block y-coordinate.
    pub fn max_y(&self) -> i32 {
        self.min_y + self.height
    }

    /// Number of 16-block segments in a column of this dimension.
    pub fn column_size(&self) -> usize {
        (self.height.max(0) as usize).div_ceil(16)
    }

    pub fn contains_y(&self, y: i32) -> bool {
        y >= self.min_y && y < self.max_y()
    }
}

/// Either a bare level, a `{min_inclusive, max_inclusive}` range, or such a
/// range nested under `value` next to a distribution `type`.
fn parse_spawn_light(tag: &Tag) -> Result<SpawnLightRange, RegistryError> {
    const KEY: &str = "monster_spawn_light_level";

    if tag.as_i64().is_some() {
        let level = tag.expect_i32(KEY)?;
        return Ok(SpawnLightRange {
            min: level,
            max: level,
        });
    }

    let range = match tag.get("value") {
        Some(inner @ Tag::Compound(_)) => inner,
        _ => tag,
    };
    range.expect_compound(KEY)?;
    let mut out = SpawnLightRange::default();
    if let Some(t) = range.get("min_inclusive") {
        out.min = t.expect_i32("min_inclusive")?;
    }
    if let Some(t) = range.get("max_inclusive") {
        out.max = t.expect_i32("max_inclusive")?;
    }
    Ok(out)
}
