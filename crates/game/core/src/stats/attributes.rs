//! Primary attributes - the stored layer of the stat system.
//!
//! The five primary attributes are the only stats a template declares directly.
//! Bonuses, health, accuracy and the rest are derived from them on demand.

/// The five primary attributes that define a combatant.
///
/// - **STR** (Strength): Physical damage scaling
/// - **DEX** (Dexterity): Accuracy, evasion, initiative
/// - **INT** (Intelligence): Spell damage and shield scaling
/// - **CON** (Constitution): Maximum health
/// - **WIS** (Wisdom): Healing scaling
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, strum::EnumString, strum::Display,
)]
#[strum(serialize_all = "UPPERCASE")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "UPPERCASE"))]
pub enum Attribute {
    Str,
    Dex,
    Int,
    Con,
    Wis,
}

impl Attribute {
    /// All attributes in canonical encoding order.
    pub const ALL: [Attribute; 5] = [
        Attribute::Str,
        Attribute::Dex,
        Attribute::Int,
        Attribute::Con,
        Attribute::Wis,
    ];
}

/// Raw attribute scores of a combatant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "UPPERCASE"))]
pub struct Attributes {
    pub str: i32,
    pub dex: i32,
    pub int: i32,
    pub con: i32,
    pub wis: i32,
}

impl Attributes {
    /// Create attribute scores with specified values
    pub const fn new(str: i32, dex: i32, int: i32, con: i32, wis: i32) -> Self {
        Self {
            str,
            dex,
            int,
            con,
            wis,
        }
    }

    pub const fn get(&self, attribute: Attribute) -> i32 {
        match attribute {
            Attribute::Str => self.str,
            Attribute::Dex => self.dex,
            Attribute::Int => self.int,
            Attribute::Con => self.con,
            Attribute::Wis => self.wis,
        }
    }

    pub fn set(&mut self, attribute: Attribute, value: i32) {
        match attribute {
            Attribute::Str => self.str = value,
            Attribute::Dex => self.dex = value,
            Attribute::Int => self.int = value,
            Attribute::Con => self.con = value,
            Attribute::Wis => self.wis = value,
        }
    }
}

impl Default for Attributes {
    /// Default scores: all 10 (no bonus, no penalty)
    fn default() -> Self {
        Self::new(10, 10, 10, 10, 10)
    }
}
