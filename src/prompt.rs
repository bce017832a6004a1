//! Prompt construction for the two generation paths. Pure string building;
//! validation happens before any of this runs on the portrait path, and the
//! story path substitutes defaults for whatever the sheet left blank.

use crate::character::CharacterData;

const SUBRACE_DEFAULT: &str = "Standard";
const LEVEL_DEFAULT: u32 = 1;

fn or_unknown(value: &str) -> &str {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        "Unknown"
    } else {
        trimmed
    }
}

/// Narrative prompt asking for a 200-300 word origin story that motivates
/// the class choice and ties it to the background.
pub fn story_prompt(data: &CharacterData) -> String {
    let subrace = data
        .subrace
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .unwrap_or(SUBRACE_DEFAULT);
    format!(
        "Write a short, compelling origin story (around 200-300 words) for a Dungeons & Dragons character.\n\
         \n\
         Here are the character's details:\n\
         - Name: {name}\n\
         - Gender: {gender}\n\
         - Race: {race} ({subrace})\n\
         - Class: {class}\n\
         - Background: {background}\n\
         - Alignment: {alignment}\n\
         - Stats: STR({str}), DEX({dex}), CON({con}), INT({int}), WIS({wis}), CHA({cha})\n\
         \n\
         The story should hint at why they became a {class} and how their {background} background \
         shaped them. Make it engaging and give them a clear motivation for adventuring.",
        name = or_unknown(&data.name),
        gender = or_unknown(&data.gender),
        race = or_unknown(&data.race),
        subrace = subrace,
        class = or_unknown(&data.class),
        background = or_unknown(&data.background),
        alignment = or_unknown(&data.alignment),
        str = data.stats.str,
        dex = data.stats.dex,
        con = data.stats.con,
        int = data.stats.int,
        wis = data.stats.wis,
        cha = data.stats.cha,
    )
}

/// Visual prompt for a full-body portrait, with a fixed style directive and
/// an instruction to keep lettering out of the rendered image.
pub fn portrait_prompt(data: &CharacterData) -> String {
    format!(
        "Full body portrait of a Dungeons & Dragons character.\n\
         \n\
         The character is a level-{level} {gender} {race} {class}.\n\
         They have a {background} background and a {alignment} alignment.\n\
         \n\
         Appearance and Pose: {appearance}.\n\
         \n\
         Equipment: They are wearing and equipped with {equipment}.\n\
         \n\
         Setting: The scene is set {setting}.\n\
         \n\
         Style: Photorealistic, cinematic digital painting, epic and adventurous mood, \
         dramatic lighting, high detail, fantasy art, trending on ArtStation.\n\
         \n\
         Important: Do not include any text, letters, or words in the image.",
        level = data.level.unwrap_or(LEVEL_DEFAULT),
        gender = or_unknown(&data.gender),
        race = data.race.trim(),
        class = data.class.trim(),
        background = or_unknown(&data.background).to_lowercase(),
        alignment = or_unknown(&data.alignment).to_lowercase(),
        appearance = data.appearance.trim(),
        equipment = data.equipment.trim(),
        setting = data.setting.trim(),
    )
}
