use bestiary::content::BuiltinSource;
use bestiary::record::Field;
use bestiary::statblock::{format_ability, render_statblock};
use bestiary::{load_monsters, Catalog, Monster, MonsterRecord};

fn imp() -> Monster {
    let record: MonsterRecord = serde_json::from_str(
        r#"{
            "name": "Imp",
            "size": "Tiny",
            "type": "fiend",
            "alignment": "lawful evil",
            "ac": 13,
            "hp": "10 (3d4 + 3)",
            "speed": "20 ft., fly 40 ft.",
            "abilities": { "str": 6, "dex": 17, "con": 13, "int": 11, "wis": 12, "cha": 14 },
            "senses": "darkvision 120 ft.",
            "languages": "Infernal, Common",
            "cr": "1 (200 XP)",
            "traits": [
                { "name": "Devil's Sight", "desc": "Magical darkness doesn't impede the imp's darkvision." }
            ],
            "actions": [
                { "name": "Sting", "desc": "Melee Weapon Attack: +5 to hit." }
            ]
        }"#,
    )
    .unwrap();
    Monster::decorate("imp.json", None, record)
}

#[test]
fn ability_scores_show_modifier() {
    assert_eq!(format_ability(&Field(serde_json::json!(14))), "14 (+2)");
    assert_eq!(format_ability(&Field(serde_json::json!(10))), "10 (+0)");
    assert_eq!(format_ability(&Field(serde_json::json!(9))), "9 (-1)");
    assert_eq!(format_ability(&Field::from("n/a")), "n/a");
    assert_eq!(
        format_ability(&Field(serde_json::json!(i32::MIN))),
        "-2147483648 (-1073741829)"
    );
}

#[test]
fn imp_statblock() {
    insta::assert_snapshot!(render_statblock(&imp()), @r###"
Imp
Tiny fiend, lawful evil
----------------------------------------
Armor Class 13
Hit Points 10 (3d4 + 3)
Speed 20 ft., fly 40 ft.
----------------------------------------
STR 6 (-2)  DEX 17 (+3)  CON 13 (+1)  INT 11 (+0)  WIS 12 (+1)  CHA 14 (+2)
----------------------------------------
Senses darkvision 120 ft.
Languages Infernal, Common
Challenge 1 (200 XP)
----------------------------------------
Devil's Sight. Magical darkness doesn't impede the imp's darkvision.

Actions
Sting. Melee Weapon Attack: +5 to hit.
"###);
}

#[test]
fn bare_record_still_renders() {
    let m = Monster::decorate("blob.json", None, MonsterRecord::default());
    let text = render_statblock(&m);
    assert!(text.starts_with("blob\nMedium\n"));
    assert!(text.contains("Challenge ?"));
}

#[test]
fn dragon_has_legendary_and_lair_sections() {
    let catalog = Catalog::from_report(load_monsters(&BuiltinSource::default()).unwrap());
    let dragon = catalog.find_by_file("adult-red-dragon.json").unwrap();
    let text = render_statblock(dragon);
    assert!(text.contains("Legendary Actions"));
    assert!(text.contains("The Adult Red Dragon can take 3 legendary actions"));
    assert!(text.contains("Lair Actions\nOn initiative count 20"));
    assert!(text.contains("  - A tremor shakes the lair."));
    assert!(text.contains("Damage Immunities fire"));
    assert!(text.ends_with("_Red dragons covet wealth above all else._"));
}
