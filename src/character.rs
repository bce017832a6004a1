use serde::Deserialize;

/// The six ability scores from a character sheet, as sent by the client.
///
/// Scores missing from the payload default to 10 so a partially filled
/// sheet still produces a well-formed story prompt.
#[derive(Debug, Clone, Deserialize)]
pub struct AbilityScores {
    #[serde(default = "default_score")]
    pub str: i32,
    #[serde(default = "default_score")]
    pub dex: i32,
    #[serde(default = "default_score")]
    pub con: i32,
    #[serde(default = "default_score")]
    pub int: i32,
    #[serde(default = "default_score")]
    pub wis: i32,
    #[serde(default = "default_score")]
    pub cha: i32,
}

fn default_score() -> i32 {
    10
}

impl Default for AbilityScores {
    fn default() -> Self {
        AbilityScores {
            str: 10,
            dex: 10,
            con: 10,
            int: 10,
            wis: 10,
            cha: 10,
        }
    }
}

/// One character sheet as submitted with a generation request. Ephemeral:
/// built fresh per request, never stored.
///
/// Every field carries a serde default so any JSON object deserializes;
/// which fields must actually be filled in depends on the generation type
/// and is checked by [`CharacterData::first_incomplete_portrait_field`].
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CharacterData {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub gender: String,
    #[serde(default)]
    pub race: String,
    #[serde(default)]
    pub subrace: Option<String>,
    #[serde(default)]
    pub class: String,
    #[serde(default)]
    pub background: String,
    #[serde(default)]
    pub alignment: String,
    #[serde(default)]
    pub level: Option<u32>,
    #[serde(default)]
    pub equipment: String,
    #[serde(default)]
    pub appearance: String,
    #[serde(default)]
    pub setting: String,
    #[serde(default)]
    pub stats: AbilityScores,
}

impl CharacterData {
    /// First portrait-required field that is missing or blank after
    /// trimming, checked in the fixed order race, class, equipment,
    /// appearance, setting. `None` means the sheet is complete enough for
    /// a portrait.
    pub fn first_incomplete_portrait_field(&self) -> Option<&'static str> {
        let required: [(&'static str, &str); 5] = [
            ("race", &self.race),
            ("class", &self.class),
            ("equipment", &self.equipment),
            ("appearance", &self.appearance),
            ("setting", &self.setting),
        ];
        required
            .into_iter()
            .find(|(_, value)| value.trim().is_empty())
            .map(|(name, _)| name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete_sheet() -> CharacterData {
        CharacterData {
            race: "Elf".to_string(),
            class: "Wizard".to_string(),
            equipment: "staff and robes".to_string(),
            appearance: "tall, silver hair".to_string(),
            setting: "in a moonlit forest".to_string(),
            ..CharacterData::default()
        }
    }

    #[test]
    fn complete_sheet_passes_validation() {
        assert_eq!(complete_sheet().first_incomplete_portrait_field(), None);
    }

    #[test]
    fn reports_first_violation_in_fixed_order() {
        let mut data = complete_sheet();
        data.race = String::new();
        data.setting = String::new();
        assert_eq!(data.first_incomplete_portrait_field(), Some("race"));
    }

    #[test]
    fn whitespace_only_counts_as_missing() {
        let mut data = complete_sheet();
        data.equipment = "   \t".to_string();
        assert_eq!(data.first_incomplete_portrait_field(), Some("equipment"));
    }

    #[test]
    fn empty_object_deserializes_with_defaults() {
        let data: CharacterData = serde_json::from_str("{}").expect("deserialize");
        assert_eq!(data.name, "");
        assert_eq!(data.subrace, None);
        assert_eq!(data.level, None);
        assert_eq!(data.stats.str, 10);
        assert_eq!(data.first_incomplete_portrait_field(), Some("race"));
    }

    #[test]
    fn partial_stats_fill_in_remaining_scores() {
        let data: CharacterData =
            serde_json::from_str(r#"{"stats": {"int": 18, "cha": 8}}"#).expect("deserialize");
        assert_eq!(data.stats.int, 18);
        assert_eq!(data.stats.cha, 8);
        assert_eq!(data.stats.wis, 10);
    }
}
