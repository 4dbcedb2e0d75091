//! Stat registry: the fixed catalog of named numeric stat kinds.
//!
//! Kinds are registered on a [`StatRegistryBuilder`] during setup and frozen
//! into an immutable [`StatRegistry`] that is passed explicitly to every
//! computation. Each kind carries its default value, how multiple
//! contributions merge ([`CombineRule`]), which parts contribute
//! ([`StatSource`]) and the bounds the final value is clamped to.

use crate::fixed::Fixed64;
use crate::id::StatId;
use std::collections::HashMap;

/// Names of the stock stat kinds registered by [`StatRegistryBuilder::standard`].
pub mod names {
    pub const DURABILITY: &str = "durability";
    pub const MINING_SPEED: &str = "mining_speed";
    pub const HARVEST_TIER: &str = "harvest_tier";
    pub const ATTACK_DAMAGE: &str = "attack_damage";
    pub const ATTACK_SPEED: &str = "attack_speed";
}

// ---------------------------------------------------------------------------
// Kind definition
// ---------------------------------------------------------------------------

/// How several contributions to the same stat merge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CombineRule {
    /// Contributions are summed. Neutral element 0.
    Add,
    /// Contributions are multiplied. Neutral element 1.
    Multiply,
}

impl CombineRule {
    /// The value that leaves any contribution unchanged.
    pub fn neutral(self) -> Fixed64 {
        match self {
            CombineRule::Add => Fixed64::ZERO,
            CombineRule::Multiply => Fixed64::ONE,
        }
    }

    /// Merge `value` into `acc`. Saturates rather than overflowing.
    pub fn combine(self, acc: Fixed64, value: Fixed64) -> Fixed64 {
        match self {
            CombineRule::Add => acc.saturating_add(value),
            CombineRule::Multiply => acc.saturating_mul(value),
        }
    }
}

/// Which part slots contribute to a stat during aggregation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatSource {
    /// Every part contributes; contributions merge with the kind's rule.
    All,
    /// Only the primary (head) part contributes.
    Primary,
}

/// Inclusive range a finalized stat value is clamped to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatBounds {
    pub min: Fixed64,
    pub max: Fixed64,
}

impl StatBounds {
    /// The full Fixed64 range.
    pub const UNBOUNDED: Self = Self {
        min: Fixed64::MIN,
        max: Fixed64::MAX,
    };

    pub fn new(min: Fixed64, max: Fixed64) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, value: Fixed64) -> bool {
        value >= self.min && value <= self.max
    }

    pub fn clamp(&self, value: Fixed64) -> Fixed64 {
        value.clamp(self.min, self.max)
    }
}

/// A registered stat kind.
#[derive(Debug, Clone, PartialEq)]
pub struct StatKindDef {
    pub name: String,
    pub default: Fixed64,
    pub combine: CombineRule,
    pub source: StatSource,
    pub bounds: StatBounds,
}

// ---------------------------------------------------------------------------
// Builder
// ---------------------------------------------------------------------------

/// Builder for constructing an immutable [`StatRegistry`].
#[derive(Debug, Default)]
pub struct StatRegistryBuilder {
    kinds: Vec<StatKindDef>,
    name_to_id: HashMap<String, StatId>,
}

impl StatRegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// A builder pre-populated with the stock tool stats.
    pub fn standard() -> Self {
        let mut b = Self::new();
        let int = |v: i32| Fixed64::from_num(v);
        b.push(StatKindDef {
            name: names::DURABILITY.to_string(),
            default: Fixed64::ONE,
            combine: CombineRule::Add,
            source: StatSource::All,
            bounds: StatBounds::new(Fixed64::ONE, int(i32::MAX)),
        });
        b.push(StatKindDef {
            name: names::MINING_SPEED.to_string(),
            default: Fixed64::ONE,
            combine: CombineRule::Add,
            source: StatSource::Primary,
            bounds: StatBounds::new(Fixed64::from_bits(0x1999_9999), int(2048)),
        });
        b.push(StatKindDef {
            name: names::HARVEST_TIER.to_string(),
            default: Fixed64::ZERO,
            combine: CombineRule::Add,
            source: StatSource::Primary,
            bounds: StatBounds::new(Fixed64::ZERO, int(64)),
        });
        b.push(StatKindDef {
            name: names::ATTACK_DAMAGE.to_string(),
            default: Fixed64::ZERO,
            combine: CombineRule::Add,
            source: StatSource::Primary,
            bounds: StatBounds::new(Fixed64::ZERO, int(2048)),
        });
        b.push(StatKindDef {
            name: names::ATTACK_SPEED.to_string(),
            default: Fixed64::ONE,
            combine: CombineRule::Multiply,
            source: StatSource::All,
            bounds: StatBounds::new(Fixed64::ZERO, int(1024)),
        });
        b
    }

    /// Register an unbounded stat kind. Returns its ID.
    pub fn register(
        &mut self,
        name: &str,
        default: Fixed64,
        combine: CombineRule,
        source: StatSource,
    ) -> Result<StatId, StatRegistryError> {
        self.register_bounded(name, default, combine, source, StatBounds::UNBOUNDED)
    }

    /// Register a stat kind whose finalized values are clamped to `bounds`.
    pub fn register_bounded(
        &mut self,
        name: &str,
        default: Fixed64,
        combine: CombineRule,
        source: StatSource,
        bounds: StatBounds,
    ) -> Result<StatId, StatRegistryError> {
        if self.name_to_id.contains_key(name) {
            return Err(StatRegistryError::DuplicateKind(name.to_string()));
        }
        if bounds.min > bounds.max || !bounds.contains(default) {
            return Err(StatRegistryError::InvalidBounds {
                name: name.to_string(),
                default,
                bounds,
            });
        }
        if self.kinds.len() > usize::from(u16::MAX) {
            return Err(StatRegistryError::TooManyKinds);
        }
        Ok(self.push(StatKindDef {
            name: name.to_string(),
            default,
            combine,
            source,
            bounds,
        }))
    }

    fn push(&mut self, def: StatKindDef) -> StatId {
        let id = StatId(self.kinds.len() as u16);
        self.name_to_id.insert(def.name.clone(), id);
        self.kinds.push(def);
        id
    }

    /// Lookup stat ID by name.
    pub fn stat_id(&self, name: &str) -> Option<StatId> {
        self.name_to_id.get(name).copied()
    }

    /// Finalize into the immutable registry.
    pub fn build(self) -> StatRegistry {
        tracing::debug!(kinds = self.kinds.len(), "stat registry finalized");
        StatRegistry {
            kinds: self.kinds,
            name_to_id: self.name_to_id,
        }
    }
}

// ---------------------------------------------------------------------------
// Registry
// ---------------------------------------------------------------------------

/// Immutable stat registry. Frozen after build(); safe to share across threads.
#[derive(Debug)]
pub struct StatRegistry {
    kinds: Vec<StatKindDef>,
    name_to_id: HashMap<String, StatId>,
}

impl StatRegistry {
    /// The registry holding only the stock tool stats.
    pub fn standard() -> Self {
        StatRegistryBuilder::standard().build()
    }

    /// Look up a kind by name.
    pub fn get(&self, name: &str) -> Result<&StatKindDef, StatRegistryError> {
        self.name_to_id
            .get(name)
            .and_then(|id| self.kinds.get(usize::from(id.0)))
            .ok_or_else(|| StatRegistryError::UnknownKind(name.to_string()))
    }

    /// The registered default of the named kind.
    pub fn default_of(&self, name: &str) -> Result<Fixed64, StatRegistryError> {
        self.get(name).map(|def| def.default)
    }

    /// Resolve a name to its ID, failing for unregistered names.
    pub fn require(&self, name: &str) -> Result<StatId, StatRegistryError> {
        self.stat_id(name)
            .ok_or_else(|| StatRegistryError::UnknownKind(name.to_string()))
    }

    pub fn stat_id(&self, name: &str) -> Option<StatId> {
        self.name_to_id.get(name).copied()
    }

    pub fn kind(&self, id: StatId) -> Option<&StatKindDef> {
        self.kinds.get(usize::from(id.0))
    }

    pub fn contains(&self, id: StatId) -> bool {
        usize::from(id.0) < self.kinds.len()
    }

    /// Iterate kinds in registration order.
    pub fn iter(&self) -> impl Iterator<Item = (StatId, &StatKindDef)> {
        self.kinds
            .iter()
            .enumerate()
            .map(|(i, def)| (StatId(i as u16), def))
    }

    pub fn len(&self) -> usize {
        self.kinds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }
}

/// IDs of the stock stats, resolved once against a registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StandardStats {
    pub durability: StatId,
    pub mining_speed: StatId,
    pub harvest_tier: StatId,
    pub attack_damage: StatId,
    pub attack_speed: StatId,
}

impl StandardStats {
    pub fn resolve(registry: &StatRegistry) -> Result<Self, StatRegistryError> {
        Ok(Self {
            durability: registry.require(names::DURABILITY)?,
            mining_speed: registry.require(names::MINING_SPEED)?,
            harvest_tier: registry.require(names::HARVEST_TIER)?,
            attack_damage: registry.require(names::ATTACK_DAMAGE)?,
            attack_speed: registry.require(names::ATTACK_SPEED)?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum StatRegistryError {
    #[error("duplicate stat kind: {0}")]
    DuplicateKind(String),
    #[error("unknown stat kind: {0}")]
    UnknownKind(String),
    #[error("invalid bounds for stat kind {name}: default {default} outside {bounds:?}")]
    InvalidBounds {
        name: String,
        default: Fixed64,
        bounds: StatBounds,
    },
    #[error("too many stat kinds")]
    TooManyKinds,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixed(v: f64) -> Fixed64 {
        Fixed64::from_num(v)
    }

    #[test]
    fn register_and_lookup() {
        let mut b = StatRegistryBuilder::new();
        let luck = b
            .register("luck", fixed(1.0), CombineRule::Add, StatSource::All)
            .unwrap();
        let reg = b.build();
        assert_eq!(reg.len(), 1);
        assert_eq!(reg.stat_id("luck"), Some(luck));
        assert_eq!(reg.default_of("luck").unwrap(), fixed(1.0));
        assert_eq!(reg.get("luck").unwrap().combine, CombineRule::Add);
    }

    #[test]
    fn duplicate_kind_fails() {
        let mut b = StatRegistryBuilder::new();
        b.register("luck", fixed(0.0), CombineRule::Add, StatSource::All)
            .unwrap();
        let result = b.register("luck", fixed(2.0), CombineRule::Multiply, StatSource::All);
        match result {
            Err(StatRegistryError::DuplicateKind(name)) => assert_eq!(name, "luck"),
            other => panic!("expected DuplicateKind, got: {other:?}"),
        }
    }

    #[test]
    fn unknown_kind_fails() {
        let reg = StatRegistry::standard();
        match reg.get("velocity") {
            Err(StatRegistryError::UnknownKind(name)) => assert_eq!(name, "velocity"),
            other => panic!("expected UnknownKind, got: {other:?}"),
        }
        assert!(reg.default_of("velocity").is_err());
        assert!(reg.require("velocity").is_err());
    }

    #[test]
    fn default_outside_bounds_fails() {
        let mut b = StatRegistryBuilder::new();
        let result = b.register_bounded(
            "heat",
            fixed(10.0),
            CombineRule::Add,
            StatSource::All,
            StatBounds::new(fixed(0.0), fixed(5.0)),
        );
        assert!(matches!(result, Err(StatRegistryError::InvalidBounds { .. })));
        assert!(b.stat_id("heat").is_none());
    }

    #[test]
    fn inverted_bounds_fail() {
        let mut b = StatRegistryBuilder::new();
        let result = b.register_bounded(
            "heat",
            fixed(1.0),
            CombineRule::Add,
            StatSource::All,
            StatBounds::new(fixed(5.0), fixed(0.0)),
        );
        assert!(matches!(result, Err(StatRegistryError::InvalidBounds { .. })));
    }

    #[test]
    fn standard_catalog_contents() {
        let reg = StatRegistry::standard();
        assert_eq!(reg.len(), 5);

        let speed = reg.get(names::MINING_SPEED).unwrap();
        assert_eq!(speed.default, Fixed64::ONE);
        assert_eq!(speed.source, StatSource::Primary);

        let tier = reg.get(names::HARVEST_TIER).unwrap();
        assert_eq!(tier.default, Fixed64::ZERO);
        assert_eq!(tier.source, StatSource::Primary);

        let durability = reg.get(names::DURABILITY).unwrap();
        assert_eq!(durability.source, StatSource::All);
        assert_eq!(durability.combine, CombineRule::Add);

        let attack_speed = reg.get(names::ATTACK_SPEED).unwrap();
        assert_eq!(attack_speed.combine, CombineRule::Multiply);
    }

    #[test]
    fn standard_builder_accepts_custom_kinds() {
        let mut b = StatRegistryBuilder::standard();
        let reach = b
            .register("reach", fixed(3.0), CombineRule::Add, StatSource::All)
            .unwrap();
        assert_eq!(reach, StatId(5));
        assert!(b
            .register(names::MINING_SPEED, fixed(1.0), CombineRule::Add, StatSource::All)
            .is_err());
    }

    #[test]
    fn standard_stats_resolve() {
        let reg = StatRegistry::standard();
        let stats = StandardStats::resolve(&reg).unwrap();
        assert_eq!(reg.kind(stats.mining_speed).unwrap().name, names::MINING_SPEED);
        assert_eq!(reg.kind(stats.harvest_tier).unwrap().name, names::HARVEST_TIER);
    }

    #[test]
    fn standard_stats_missing_from_custom_registry() {
        let reg = StatRegistryBuilder::new().build();
        assert!(matches!(
            StandardStats::resolve(&reg),
            Err(StatRegistryError::UnknownKind(_))
        ));
    }

    #[test]
    fn iteration_follows_registration_order() {
        let reg = StatRegistry::standard();
        let order: Vec<&str> = reg.iter().map(|(_, def)| def.name.as_str()).collect();
        assert_eq!(
            order,
            vec![
                names::DURABILITY,
                names::MINING_SPEED,
                names::HARVEST_TIER,
                names::ATTACK_DAMAGE,
                names::ATTACK_SPEED
            ]
        );
    }

    #[test]
    fn combine_rules() {
        assert_eq!(CombineRule::Add.neutral(), fixed(0.0));
        assert_eq!(CombineRule::Multiply.neutral(), fixed(1.0));
        assert_eq!(CombineRule::Add.combine(fixed(2.0), fixed(3.0)), fixed(5.0));
        assert_eq!(CombineRule::Multiply.combine(fixed(2.0), fixed(3.0)), fixed(6.0));
        assert_eq!(CombineRule::Add.combine(Fixed64::MAX, fixed(1.0)), Fixed64::MAX);
    }

    #[test]
    fn bounds_clamp() {
        let bounds = StatBounds::new(fixed(0.0), fixed(10.0));
        assert_eq!(bounds.clamp(fixed(-3.0)), fixed(0.0));
        assert_eq!(bounds.clamp(fixed(30.0)), fixed(10.0));
        assert_eq!(bounds.clamp(fixed(4.5)), fixed(4.5));
    }

    #[test]
    fn error_display_messages() {
        let msg = format!("{}", StatRegistryError::DuplicateKind("luck".into()));
        assert!(msg.contains("duplicate stat kind"), "got: {msg}");
        let msg = format!("{}", StatRegistryError::UnknownKind("luck".into()));
        assert!(msg.contains("unknown stat kind"), "got: {msg}");
        assert!(msg.contains("luck"), "got: {msg}");
    }

    #[test]
    fn registry_is_capped_at_u16_ids() {
        let mut b = StatRegistryBuilder::new();
        let mut last = None;
        for i in 0..=usize::from(u16::MAX) {
            last = Some(
                b.register(&format!("kind_{i}"), fixed(0.0), CombineRule::Add, StatSource::All)
                    .unwrap(),
            );
        }
        assert_eq!(last, Some(StatId(u16::MAX)));

        let overflow = b.register("one_too_many", fixed(0.0), CombineRule::Add, StatSource::All);
        assert_eq!(overflow, Err(StatRegistryError::TooManyKinds));
        assert_eq!(b.stat_id("one_too_many"), None);

        let reg = b.build();
        assert_eq!(reg.len(), usize::from(u16::MAX) + 1);
        assert_eq!(reg.stat_id("kind_0"), Some(StatId(0)));
        assert_eq!(reg.stat_id("kind_65535"), Some(StatId(u16::MAX)));
        assert_eq!(reg.iter().last().map(|(id, _)| id), Some(StatId(u16::MAX)));
    }
}
