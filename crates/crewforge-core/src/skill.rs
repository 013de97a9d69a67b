//! Skills and skill vectors.
//!
//! Every worker carries a fixed seven-entry skill vector. Stations require
//! either one skill or, for a few station types, the mean of two.

use std::fmt;
use std::ops::Index;

use serde::{Deserialize, Serialize};

/// The seven named skills, in canonical order.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Skill {
    Strength,
    Perception,
    Endurance,
    Charisma,
    Intelligence,
    Agility,
    Luck,
}

impl Skill {
    /// Number of skills in a vector.
    pub const COUNT: usize = 7;

    /// All skills in canonical order.
    pub const ALL: [Skill; Skill::COUNT] = [
        Skill::Strength,
        Skill::Perception,
        Skill::Endurance,
        Skill::Charisma,
        Skill::Intelligence,
        Skill::Agility,
        Skill::Luck,
    ];

    /// Position of this skill inside a [`SkillVector`].
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            Skill::Strength => "Strength",
            Skill::Perception => "Perception",
            Skill::Endurance => "Endurance",
            Skill::Charisma => "Charisma",
            Skill::Intelligence => "Intelligence",
            Skill::Agility => "Agility",
            Skill::Luck => "Luck",
        }
    }

    /// Parses a skill name, case-insensitively.
    ///
    /// Accepts full names and single-letter abbreviations (`"S"`, `"p"`, ...).
    /// The misspelling `"Chrisma"` found in some exported save data is
    /// accepted as Charisma.
    ///
    /// ```
    /// use crewforge_core::Skill;
    ///
    /// assert_eq!(Skill::from_name("agility"), Some(Skill::Agility));
    /// assert_eq!(Skill::from_name("I"), Some(Skill::Intelligence));
    /// assert_eq!(Skill::from_name("speed"), None);
    /// ```
    pub fn from_name(name: &str) -> Option<Skill> {
        let lower = name.trim().to_ascii_lowercase();
        let skill = match lower.as_str() {
            "strength" | "s" => Skill::Strength,
            "perception" | "p" => Skill::Perception,
            "endurance" | "e" => Skill::Endurance,
            "charisma" | "chrisma" | "c" => Skill::Charisma,
            "intelligence" | "i" => Skill::Intelligence,
            "agility" | "a" => Skill::Agility,
            "luck" | "l" => Skill::Luck,
            _ => return None,
        };
        Some(skill)
    }
}

impl fmt::Display for Skill {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A fixed seven-entry vector of non-negative skill values.
///
/// Used both for worker skills and for equipment bonuses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SkillVector([u32; Skill::COUNT]);

impl SkillVector {
    pub const fn new(values: [u32; Skill::COUNT]) -> Self {
        Self(values)
    }

    pub const fn zero() -> Self {
        Self([0; Skill::COUNT])
    }

    /// Creates a vector with a single non-zero entry.
    pub fn single(skill: Skill, value: u32) -> Self {
        Self::zero().with(skill, value)
    }

    pub fn get(&self, skill: Skill) -> u32 {
        self.0[skill.index()]
    }

    pub fn set(&mut self, skill: Skill, value: u32) {
        self.0[skill.index()] = value;
    }

    /// Returns a copy with `skill` set to `value`.
    pub fn with(mut self, skill: Skill, value: u32) -> Self {
        self.set(skill, value);
        self
    }

    /// Element-wise saturating sum.
    pub fn plus(&self, other: &SkillVector) -> SkillVector {
        let mut out = *self;
        for (slot, add) in out.0.iter_mut().zip(other.0.iter()) {
            *slot = slot.saturating_add(*add);
        }
        out
    }

    /// Saturating sum of all entries.
    pub fn total(&self) -> u32 {
        self.0.iter().fold(0u32, |acc, v| acc.saturating_add(*v))
    }

    pub fn is_zero(&self) -> bool {
        self.0.iter().all(|v| *v == 0)
    }

    /// Skill with the largest value; ties resolve to the earlier skill.
    ///
    /// Returns `None` for an all-zero vector.
    pub fn dominant(&self) -> Option<Skill> {
        let mut best: Option<(Skill, u32)> = None;
        for skill in Skill::ALL {
            let value = self.get(skill);
            if value == 0 {
                continue;
            }
            match best {
                Some((_, top)) if top >= value => {}
                _ => best = Some((skill, value)),
            }
        }
        best.map(|(skill, _)| skill)
    }

    pub fn values(&self) -> &[u32; Skill::COUNT] {
        &self.0
    }

    /// Iterates `(skill, value)` pairs in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = (Skill, u32)> + '_ {
        Skill::ALL.iter().map(move |s| (*s, self.get(*s)))
    }
}

impl Index<Skill> for SkillVector {
    type Output = u32;

    fn index(&self, skill: Skill) -> &u32 {
        &self.0[skill.index()]
    }
}

/// The skill (or skill pair) a station draws on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkillRequirement {
    Single(Skill),
    /// Mean of two skills per worker.
    Dual(Skill, Skill),
}

impl SkillRequirement {
    /// The contribution one skill vector makes toward this requirement.
    pub fn value(&self, skills: &SkillVector) -> f64 {
        match *self {
            SkillRequirement::Single(s) => f64::from(skills.get(s)),
            SkillRequirement::Dual(a, b) => {
                (f64::from(skills.get(a)) + f64::from(skills.get(b))) / 2.0
            }
        }
    }

    /// True if `skill` is one of the skills this requirement reads.
    pub fn involves(&self, skill: Skill) -> bool {
        match *self {
            SkillRequirement::Single(s) => s == skill,
            SkillRequirement::Dual(a, b) => a == skill || b == skill,
        }
    }

    /// The first named skill.
    pub fn primary(&self) -> Skill {
        match *self {
            SkillRequirement::Single(s) | SkillRequirement::Dual(s, _) => s,
        }
    }
}

impl fmt::Display for SkillRequirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkillRequirement::Single(s) => write!(f, "{}", s),
            SkillRequirement::Dual(a, b) => write!(f, "{}+{}", a, b),
        }
    }
}
