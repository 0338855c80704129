pub mod weapons;

pub use weapons::{ProfessionWeapons, Weapon, WeaponSelection, WeaponType};
