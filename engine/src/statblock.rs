//! Plain-text statblock for the detail view.

use crate::ability_mod;
use crate::record::{Feature, Field, Monster};

const RULE: &str = "----------------------------------------";
const DEFAULT_LEGENDARY_ACTIONS: i64 = 3;

/// `14` -> `"14 (+2)"`. Non-numeric scores are printed as given.
pub fn format_ability(score: &Field) -> String {
    match score.as_i64().and_then(|s| i32::try_from(s).ok()) {
        Some(s) => format!("{} ({:+})", s, ability_mod(s)),
        None => score.to_string(),
    }
}

pub fn render_statblock(monster: &Monster) -> String {
    let r = &monster.record;
    let name = &monster.display_name;
    let mut lines: Vec<String> = Vec::new();

    lines.push(name.clone());
    let mut kind = format!(
        "{} {}",
        r.size.as_deref().unwrap_or("Medium"),
        r.creature_type.as_deref().unwrap_or("")
    )
    .trim_end()
    .to_string();
    if let Some(alignment) = r.alignment.as_deref().filter(|a| !a.is_empty()) {
        kind.push_str(", ");
        kind.push_str(alignment);
    }
    lines.push(kind);
    lines.push(RULE.to_string());

    property(&mut lines, "Armor Class", r.ac.as_ref());
    property(&mut lines, "Hit Points", r.hp.as_ref());
    property(&mut lines, "Speed", r.speed.as_ref());

    if !r.abilities.is_empty() {
        lines.push(RULE.to_string());
        let scores = r
            .abilities
            .iter()
            .map(|(k, v)| format!("{} {}", k.to_uppercase(), format_ability(v)))
            .collect::<Vec<_>>()
            .join("  ");
        lines.push(scores);
    }
    lines.push(RULE.to_string());

    property(&mut lines, "Saving Throws", r.saves.as_ref());
    property(&mut lines, "Skills", r.skills.as_ref());
    property(&mut lines, "Damage Immunities", r.immunities.as_ref());
    property(&mut lines, "Damage Resistance", r.resistance.as_ref());
    property(&mut lines, "Damage Vulnerability", r.vulnerability.as_ref());
    property(&mut lines, "Condition Immunities", r.conimmunities.as_ref());
    property(&mut lines, "Senses", r.senses.as_ref());
    property(&mut lines, "Languages", r.languages.as_ref());
    let challenge = r
        .cr_text()
        .map(|c| c.into_owned())
        .unwrap_or_else(|| monster.clean_cr.clone());
    lines.push(format!("Challenge {}", challenge));

    if !r.traits.is_empty() {
        lines.push(RULE.to_string());
        features(&mut lines, &r.traits);
    }
    if !r.actions.is_empty() {
        section(&mut lines, "Actions");
        features(&mut lines, &r.actions);
    }
    if !r.reactions.is_empty() {
        section(&mut lines, "Reactions");
        features(&mut lines, &r.reactions);
    }
    if !r.legendary.is_empty() {
        section(&mut lines, "Legendary Actions");
        let count = r
            .legendarynumber
            .as_ref()
            .and_then(Field::as_i64)
            .unwrap_or(DEFAULT_LEGENDARY_ACTIONS);
        lines.push(format!(
            "The {name} can take {count} legendary actions, choosing from the options below. \
             Only one option can be used at a time and only at the end of another creature's turn. \
             The {name} regains spent legendary actions at the start of its turn."
        ));
        features(&mut lines, &r.legendary);
    }

    for lair in &r.lairactions {
        section(&mut lines, "Lair Actions");
        if let Some(desc) = lair.description.as_deref().filter(|d| !d.is_empty()) {
            lines.push(desc.to_string());
        }
        for bullet in &lair.bullets {
            lines.push(format!("  - {}", bullet));
        }
    }

    if let Some(desc) = r.description.as_deref().filter(|d| !d.is_empty()) {
        lines.push(String::new());
        lines.push(format!("_{}_", desc));
    }

    lines.join("\n")
}

fn property(lines: &mut Vec<String>, label: &str, value: Option<&Field>) {
    if let Some(v) = value {
        let text = v.to_string();
        if !text.is_empty() {
            lines.push(format!("{} {}", label, text));
        }
    }
}

fn section(lines: &mut Vec<String>, title: &str) {
    lines.push(String::new());
    lines.push(title.to_string());
}

fn features(lines: &mut Vec<String>, list: &[Feature]) {
    for f in list {
        lines.push(format!("{}. {}", f.name, f.desc));
    }
}
