/// Oracle providing combat rules and balance tables.
///
/// This oracle defines the numeric constants behind hit chance, damage
/// floors and experience curves. It does NOT define combatant or skill data
/// (use [`DefinitionsOracle`](super::DefinitionsOracle) for that).
pub trait TablesOracle: Send + Sync {
    fn combat(&self) -> CombatParams;
    fn progression(&self) -> ProgressionParams;
}

#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CombatParams {
    pub hit_chance: HitChanceParams,
    pub damage: DamageParams,
}

impl Default for CombatParams {
    fn default() -> Self {
        Self {
            hit_chance: HitChanceParams::default(),
            damage: DamageParams::default(),
        }
    }
}

/// Percentages are whole numbers (90 = 90%).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct HitChanceParams {
    pub base: i32,
    pub accuracy_factor: i32,
    pub evasion_factor: i32,
    pub min: u32,
    pub max: u32,
}

impl HitChanceParams {
    pub const fn new(base: i32, accuracy_factor: i32, evasion_factor: i32, min: u32, max: u32) -> Self {
        Self {
            base,
            accuracy_factor,
            evasion_factor,
            min,
            max,
        }
    }
}

impl Default for HitChanceParams {
    fn default() -> Self {
        Self::new(90, 3, 2, 5, 95)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DamageParams {
    /// Floor applied after defense subtraction.
    pub minimum: u32,
    /// Base value for damage effects that leave their base unspecified.
    pub default_weapon_damage: i32,
    pub crit_multiplier: f64,
}

impl Default for DamageParams {
    fn default() -> Self {
        Self {
            minimum: 1,
            default_weapon_damage: 5,
            crit_multiplier: 1.5,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ProgressionParams {
    pub xp_base: u32,
    pub xp_factor: f64,
    /// Health granted per point of constitution.
    pub con_hp_factor: i32,
}

impl Default for ProgressionParams {
    fn default() -> Self {
        Self {
            xp_base: 100,
            xp_factor: 1.5,
            con_hp_factor: 5,
        }
    }
}

/// Table-backed [`TablesOracle`], usually loaded from `tables.toml`.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct BalanceTables {
    pub combat: CombatParams,
    pub progression: ProgressionParams,
}

impl BalanceTables {
    pub const fn new(combat: CombatParams, progression: ProgressionParams) -> Self {
        Self {
            combat,
            progression,
        }
    }
}

impl TablesOracle for BalanceTables {
    fn combat(&self) -> CombatParams {
        self.combat
    }

    fn progression(&self) -> ProgressionParams {
        self.progression
    }
}
