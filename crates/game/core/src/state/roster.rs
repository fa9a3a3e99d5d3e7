//! Owning collection of every combatant in one encounter.

use super::{CombatantId, CombatantState, Team};

/// Health of one combatant at a point in time.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HealthSnapshot {
    pub id: CombatantId,
    pub team: Team,
    pub hp: u32,
    pub max_hp: u32,
}

impl HealthSnapshot {
    pub const fn is_alive(&self) -> bool {
        self.hp > 0
    }
}

/// Combatants of one encounter, addressed by [`CombatantId`].
///
/// Ids are dense indices assigned in insertion order and never reused, so the
/// roster order doubles as the stable tie-break order for initiative.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Roster {
    combatants: Vec<CombatantState>,
}

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Id the next inserted combatant will receive.
    pub fn next_id(&self) -> CombatantId {
        CombatantId(self.combatants.len() as u32)
    }

    /// Insert a combatant, overwriting its id with the next free one.
    pub fn push(&mut self, mut combatant: CombatantState) -> CombatantId {
        let id = self.next_id();
        combatant.id = id;
        self.combatants.push(combatant);
        id
    }

    pub fn get(&self, id: CombatantId) -> Option<&CombatantState> {
        self.combatants.get(id.index())
    }

    pub fn get_mut(&mut self, id: CombatantId) -> Option<&mut CombatantState> {
        self.combatants.get_mut(id.index())
    }

    pub fn iter(&self) -> impl Iterator<Item = &CombatantState> {
        self.combatants.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut CombatantState> {
        self.combatants.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.combatants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.combatants.is_empty()
    }

    pub fn living(&self) -> impl Iterator<Item = &CombatantState> {
        self.combatants.iter().filter(|c| c.is_alive())
    }

    /// All members of a team, living or not, in roster order.
    pub fn team(&self, team: Team) -> impl Iterator<Item = &CombatantState> {
        self.combatants.iter().filter(move |c| c.team == team)
    }

    pub fn living_on(&self, team: Team) -> impl Iterator<Item = &CombatantState> {
        self.team(team).filter(|c| c.is_alive())
    }

    /// True once every member of `team` is defeated (or the team is empty).
    pub fn is_wiped_out(&self, team: Team) -> bool {
        self.living_on(team).next().is_none()
    }

    /// Living teammates of `id`, including `id` itself.
    pub fn living_allies_of(&self, id: CombatantId) -> Vec<&CombatantState> {
        match self.get(id) {
            Some(me) => self.living_on(me.team).collect(),
            None => Vec::new(),
        }
    }

    /// Living members of the opposing team.
    pub fn living_enemies_of(&self, id: CombatantId) -> Vec<&CombatantState> {
        match self.get(id) {
            Some(me) => self.living_on(me.team.opposing()).collect(),
            None => Vec::new(),
        }
    }

    pub fn health_snapshot(&self) -> Vec<HealthSnapshot> {
        self.combatants
            .iter()
            .map(|c| HealthSnapshot {
                id: c.id,
                team: c.team,
                hp: c.hp(),
                max_hp: c.max_hp(),
            })
            .collect()
    }
}
