use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum WeaponType {
    OneHanded,
    TwoHanded,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Weapon {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: WeaponType,
}

/// Weapons a profession may wield in each hand.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfessionWeapons {
    #[serde(default)]
    pub main_hand: Vec<Weapon>,
    #[serde(default)]
    pub off_hand: Vec<Weapon>,
}

impl ProfessionWeapons {
    pub fn main_hand(&self, name: &str) -> Option<&Weapon> {
        self.main_hand.iter().find(|w| w.name == name)
    }
}

/// Profession and first weapon set chosen on the main screen.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeaponSelection {
    pub profession: Option<String>,
    pub main_hand: Option<String>,
    pub off_hand: Option<String>,
}

impl WeaponSelection {
    /// Off hand is only available while the main hand is not two-handed.
    pub fn can_offhand(&self, table: &BTreeMap<String, ProfessionWeapons>) -> bool {
        let Some(weapons) = self.profession.as_ref().and_then(|p| table.get(p)) else {
            return false;
        };
        match self.main_hand.as_deref().and_then(|name| weapons.main_hand(name)) {
            Some(weapon) => weapon.kind != WeaponType::TwoHanded,
            None => true,
        }
    }

    pub fn set_profession(
        &mut self,
        table: &BTreeMap<String, ProfessionWeapons>,
        profession: &str,
    ) -> Result<()> {
        if !table.contains_key(profession) {
            return Err(anyhow!("Unknown profession: {}", profession));
        }
        if self.profession.as_deref() != Some(profession) {
            self.profession = Some(profession.to_string());
            self.main_hand = None;
            self.off_hand = None;
        }
        Ok(())
    }

    pub fn cycle_profession(&mut self, table: &BTreeMap<String, ProfessionWeapons>) {
        let names: Vec<&String> = table.keys().collect();
        if let Some(next) = next_after(&names, self.profession.as_ref()) {
            let next = next.clone();
            self.profession = Some(next);
            self.main_hand = None;
            self.off_hand = None;
        }
    }

    pub fn cycle_main_hand(&mut self, table: &BTreeMap<String, ProfessionWeapons>) {
        let Some(weapons) = self.profession.as_ref().and_then(|p| table.get(p)) else {
            return;
        };
        let names: Vec<&String> = weapons.main_hand.iter().map(|w| &w.name).collect();
        if let Some(next) = next_after(&names, self.main_hand.as_ref()) {
            self.main_hand = Some(next.clone());
        }
        if !self.can_offhand(table) {
            self.off_hand = None;
        }
    }

    pub fn cycle_off_hand(&mut self, table: &BTreeMap<String, ProfessionWeapons>) {
        if !self.can_offhand(table) {
            self.off_hand = None;
            return;
        }
        let Some(weapons) = self.profession.as_ref().and_then(|p| table.get(p)) else {
            return;
        };
        let names: Vec<&String> = weapons.off_hand.iter().map(|w| &w.name).collect();
        if let Some(next) = next_after(&names, self.off_hand.as_ref()) {
            self.off_hand = Some(next.clone());
        }
    }

    /// Drop choices that the weapon table no longer supports.
    pub fn sanitize(&mut self, table: &BTreeMap<String, ProfessionWeapons>) {
        let Some(weapons) = self.profession.as_ref().and_then(|p| table.get(p)) else {
            *self = Self::default();
            return;
        };
        if let Some(mh) = &self.main_hand
            && weapons.main_hand(mh).is_none()
        {
            self.main_hand = None;
        }
        if let Some(oh) = &self.off_hand
            && !weapons.off_hand.iter().any(|w| &w.name == oh)
        {
            self.off_hand = None;
        }
        if !self.can_offhand(table) {
            self.off_hand = None;
        }
    }
}

fn next_after<'a>(names: &[&'a String], current: Option<&String>) -> Option<&'a String> {
    if names.is_empty() {
        return None;
    }
    let idx = current
        .and_then(|c| names.iter().position(|n| *n == c))
        .map(|i| (i + 1) % names.len())
        .unwrap_or(0);
    Some(names[idx])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extras::Catalog;

    fn table() -> BTreeMap<String, ProfessionWeapons> {
        Catalog::bundled().unwrap().professions().clone()
    }

    #[test]
    fn test_two_handed_main_hand_blocks_offhand() {
        let table = table();
        let mut selection = WeaponSelection::default();
        selection.set_profession(&table, "warrior").unwrap();
        selection.main_hand = Some("Sword".to_string());
        assert!(selection.can_offhand(&table));

        selection.main_hand = Some("Greatsword".to_string());
        assert!(!selection.can_offhand(&table));
    }

    #[test]
    fn test_unknown_profession_errors() {
        let mut selection = WeaponSelection::default();
        assert!(selection.set_profession(&table(), "bard").is_err());
        assert!(selection.profession.is_none());
    }

    #[test]
    fn test_cycle_main_hand_clears_offhand_for_two_handed() {
        let table = table();
        let mut selection = WeaponSelection::default();
        selection.set_profession(&table, "warrior").unwrap();
        selection.main_hand = Some("Mace".to_string());
        selection.off_hand = Some("Shield".to_string());

        // Mace is last in the list, cycling wraps to Greatsword.
        selection.cycle_main_hand(&table);
        assert_eq!(selection.main_hand.as_deref(), Some("Greatsword"));
        assert!(selection.off_hand.is_none());

        selection.cycle_off_hand(&table);
        assert!(selection.off_hand.is_none());
    }

    #[test]
    fn test_cycle_profession_resets_weapons() {
        let table = table();
        let mut selection = WeaponSelection::default();
        selection.cycle_profession(&table);
        let first = selection.profession.clone();
        assert!(first.is_some());

        selection.main_hand = Some("Staff".to_string());
        selection.cycle_profession(&table);
        assert_ne!(selection.profession, first);
        assert!(selection.main_hand.is_none());
    }

    #[test]
    fn test_sanitize_drops_unknown_weapons() {
        let table = table();
        let mut selection = WeaponSelection {
            profession: Some("elementalist".to_string()),
            main_hand: Some("Greatsword".to_string()),
            off_hand: Some("Dagger".to_string()),
        };
        selection.sanitize(&table);
        assert!(selection.main_hand.is_none());
        assert_eq!(selection.off_hand.as_deref(), Some("Dagger"));

        let mut unknown = WeaponSelection {
            profession: Some("bard".to_string()),
            ..Default::default()
        };
        unknown.sanitize(&table);
        assert_eq!(unknown, WeaponSelection::default());
    }
}
