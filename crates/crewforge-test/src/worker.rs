//! Worker fixtures.

use crewforge_core::{Skill, SkillVector, Worker};

/// Builder for test workers. Unset skills are zero.
#[derive(Debug, Clone)]
pub struct WorkerBuilder {
    id: u64,
    skills: SkillVector,
    tag: Option<String>,
    name: Option<String>,
}

impl WorkerBuilder {
    pub fn new(id: u64) -> Self {
        Self {
            id,
            skills: SkillVector::zero(),
            tag: None,
            name: None,
        }
    }

    pub fn skill(mut self, skill: Skill, value: u32) -> Self {
        self.skills.set(skill, value);
        self
    }

    pub fn strength(self, value: u32) -> Self {
        self.skill(Skill::Strength, value)
    }

    pub fn perception(self, value: u32) -> Self {
        self.skill(Skill::Perception, value)
    }

    pub fn agility(self, value: u32) -> Self {
        self.skill(Skill::Agility, value)
    }

    pub fn intelligence(self, value: u32) -> Self {
        self.skill(Skill::Intelligence, value)
    }

    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn build(self) -> Worker {
        Worker {
            id: crewforge_core::WorkerId(self.id),
            name: self.name,
            skills: self.skills,
            tag: self.tag,
        }
    }
}

/// A worker with Strength, Perception and Agility set.
pub fn spa(id: u64, strength: u32, perception: u32, agility: u32) -> Worker {
    WorkerBuilder::new(id)
        .strength(strength)
        .perception(perception)
        .agility(agility)
        .build()
}
