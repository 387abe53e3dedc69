use serde::{Deserialize, Serialize};

/// Difficulty level: how many letters take part in linkage groups
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    #[default]
    Easy,
    Medium,
    Advanced,
}

impl Difficulty {
    /// Percentage of all answer letters selected for linking
    pub fn mapping_percentage(&self) -> usize {
        match self {
            Difficulty::Easy => 100,
            Difficulty::Medium => 70,
            Difficulty::Advanced => 50,
        }
    }

    /// All levels, in increasing difficulty
    pub fn all_levels() -> &'static [Difficulty] {
        &[Difficulty::Easy, Difficulty::Medium, Difficulty::Advanced]
    }

    /// Key used in documents and saved state
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Advanced => "advanced",
        }
    }

    /// Name shown to players (easy is presented as "Normal")
    pub fn label(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Normal",
            Difficulty::Medium => "Medium",
            Difficulty::Advanced => "Advanced",
        }
    }
}

impl std::fmt::Display for Difficulty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Difficulty::Easy => write!(f, "Easy"),
            Difficulty::Medium => write!(f, "Medium"),
            Difficulty::Advanced => write!(f, "Advanced"),
        }
    }
}

impl std::str::FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "easy" | "normal" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "advanced" => Ok(Difficulty::Advanced),
            other => Err(format!("unknown difficulty '{}'", other)),
        }
    }
}

/// Notice shown before switching levels, if the switch changes pairing noticeably
pub fn level_change_message(from: Difficulty, to: Difficulty) -> Option<&'static str> {
    match (from, to) {
        (Difficulty::Easy, Difficulty::Advanced) => {
            Some("Less letters are paired in Advanced mode.")
        }
        (Difficulty::Advanced, Difficulty::Easy) => Some("More letters are paired in Normal mode."),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percentages() {
        assert_eq!(Difficulty::Easy.mapping_percentage(), 100);
        assert_eq!(Difficulty::Medium.mapping_percentage(), 70);
        assert_eq!(Difficulty::Advanced.mapping_percentage(), 50);
    }

    #[test]
    fn test_parse_and_serde() {
        assert_eq!("ADVANCED".parse::<Difficulty>(), Ok(Difficulty::Advanced));
        assert_eq!("normal".parse::<Difficulty>(), Ok(Difficulty::Easy));
        assert!("hard".parse::<Difficulty>().is_err());

        let json = serde_json::to_string(&Difficulty::Medium).unwrap();
        assert_eq!(json, "\"medium\"");
    }

    #[test]
    fn test_level_change_message() {
        assert!(level_change_message(Difficulty::Easy, Difficulty::Advanced).is_some());
        assert!(level_change_message(Difficulty::Advanced, Difficulty::Easy).is_some());
        assert!(level_change_message(Difficulty::Easy, Difficulty::Medium).is_none());
    }
}
