use serde::{Deserialize, Serialize};

use super::StoryTable;

/// One story of the building.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Story {
    pub index: i32,
    /// Absolute elevation of the story's floor.
    pub level: f64,
    #[serde(default)]
    pub name: String,
}

impl Story {
    #[must_use]
    pub fn new(index: i32, level: f64) -> Self {
        Self {
            index,
            level,
            name: String::new(),
        }
    }
}

/// Story table ordered by elevation.
#[derive(Debug, Clone, PartialEq)]
pub struct Stories {
    stories: Vec<Story>,
}

impl Stories {
    /// Builds a table from stories in any order.
    #[must_use]
    pub fn new(mut stories: Vec<Story>) -> Self {
        stories.sort_by(|a, b| a.level.total_cmp(&b.level));
        Self { stories }
    }

    #[must_use]
    pub fn get(&self, floor_index: i32) -> Option<&Story> {
        self.stories.iter().find(|s| s.index == floor_index)
    }
}

impl Default for Stories {
    /// A single ground story at elevation zero.
    fn default() -> Self {
        Self::new(vec![Story::new(0, 0.0)])
    }
}

impl StoryTable for Stories {
    fn story_level(&self, floor_index: i32) -> Option<f64> {
        self.get(floor_index).map(|s| s.level)
    }

    fn level_given_floor(&self, elevation: f64, floor_index: i32) -> f64 {
        elevation - self.story_level(floor_index).unwrap_or(0.0)
    }

    fn floor_and_level(&self, elevation: f64) -> (i32, f64) {
        let story = self
            .stories
            .iter()
            .rev()
            .find(|s| s.level <= elevation)
            .or_else(|| self.stories.first());
        match story {
            Some(s) => (s.index, elevation - s.level),
            None => (0, elevation),
        }
    }
}
