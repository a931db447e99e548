//! Fixed mood and goal vocabularies
//!
//! Both are lowercase strings on the wire and parse case-insensitively.

use serde::{Deserialize, Serialize};

use crate::request::ValidationError;

/// How the user feels right now
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Mood {
    Happy,
    Focused,
    Energetic,
    Calm,
    Tired,
    Stressed,
    Anxious,
    Sad,
}

impl Mood {
    /// Every mood, in display order
    pub const ALL: [Mood; 8] = [
        Self::Happy,
        Self::Focused,
        Self::Energetic,
        Self::Calm,
        Self::Tired,
        Self::Stressed,
        Self::Anxious,
        Self::Sad,
    ];

    /// Wire/display label
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Happy => "happy",
            Self::Focused => "focused",
            Self::Energetic => "energetic",
            Self::Calm => "calm",
            Self::Tired => "tired",
            Self::Stressed => "stressed",
            Self::Anxious => "anxious",
            Self::Sad => "sad",
        }
    }
}

impl std::fmt::Display for Mood {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Mood {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        if wanted.is_empty() {
            return Err(ValidationError::MissingMood);
        }
        Self::ALL
            .into_iter()
            .find(|m| m.as_str() == wanted)
            .ok_or_else(|| ValidationError::UnknownMood(s.trim().to_string()))
    }
}

impl TryFrom<String> for Mood {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Mood> for String {
    fn from(mood: Mood) -> Self {
        mood.as_str().to_string()
    }
}

/// Something the user wants to spend the day on
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Goal {
    Work,
    Study,
    Exercise,
    Health,
    Social,
    Creative,
    Relaxation,
    Chores,
}

impl Goal {
    /// Every goal, in display order
    pub const ALL: [Goal; 8] = [
        Self::Work,
        Self::Study,
        Self::Exercise,
        Self::Health,
        Self::Social,
        Self::Creative,
        Self::Relaxation,
        Self::Chores,
    ];

    /// Wire/display label
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Work => "work",
            Self::Study => "study",
            Self::Exercise => "exercise",
            Self::Health => "health",
            Self::Social => "social",
            Self::Creative => "creative",
            Self::Relaxation => "relaxation",
            Self::Chores => "chores",
        }
    }
}

impl std::fmt::Display for Goal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Goal {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|g| g.as_str() == wanted)
            .ok_or_else(|| ValidationError::UnknownGoal(s.trim().to_string()))
    }
}

impl TryFrom<String> for Goal {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Goal> for String {
    fn from(goal: Goal) -> Self {
        goal.as_str().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mood_parse_case_insensitive() {
        assert_eq!("Focused".parse::<Mood>().unwrap(), Mood::Focused);
        assert_eq!("  calm ".parse::<Mood>().unwrap(), Mood::Calm);
    }

    #[test]
    fn test_mood_parse_errors() {
        assert_eq!("".parse::<Mood>(), Err(ValidationError::MissingMood));
        assert_eq!(
            "grumpy".parse::<Mood>(),
            Err(ValidationError::UnknownMood("grumpy".to_string()))
        );
    }

    #[test]
    fn test_mood_serde() {
        let json = serde_json::to_string(&Mood::Energetic).unwrap();
        assert_eq!(json, "\"energetic\"");

        let mood: Mood = serde_json::from_str("\"TIRED\"").unwrap();
        assert_eq!(mood, Mood::Tired);

        assert!(serde_json::from_str::<Mood>("\"bored\"").is_err());
    }

    #[test]
    fn test_goal_round_trip_labels() {
        for goal in Goal::ALL {
            assert_eq!(goal.as_str().parse::<Goal>().unwrap(), goal);
        }
    }

    #[test]
    fn test_goal_serde() {
        let goals: Vec<Goal> = serde_json::from_str(r#"["work", "Exercise"]"#).unwrap();
        assert_eq!(goals, vec![Goal::Work, Goal::Exercise]);
        assert!(serde_json::from_str::<Goal>("\"napping\"").is_err());
    }
}
