use std::borrow::Cow;
use std::fmt;

use indexmap::IndexMap;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::cr::{clean_cr, parse_cr, CrValue};

/// A loosely typed statblock value: text, a number, or anything else JSON allows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Field(pub Value);

impl Field {
    /// Text form of string and number values; `None` for everything else.
    pub fn as_text(&self) -> Option<Cow<'_, str>> {
        match &self.0 {
            Value::String(s) => Some(Cow::Borrowed(s.as_str())),
            Value::Number(n) => Some(Cow::Owned(n.to_string())),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match &self.0 {
            Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f.floor() as i64)),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            Value::String(s) => f.write_str(s),
            Value::Null => Ok(()),
            other => write!(f, "{}", other),
        }
    }
}

impl From<&str> for Field {
    fn from(s: &str) -> Self {
        Field(Value::String(s.to_string()))
    }
}

/// Named trait, action, reaction, or legendary action.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Feature {
    #[serde(default, deserialize_with = "text_or_empty")]
    pub name: String,
    #[serde(default, deserialize_with = "text_or_empty")]
    pub desc: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct LairActions {
    #[serde(default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "lenient_list", skip_serializing_if = "Vec::is_empty")]
    pub bullets: Vec<String>,
}

/// One monster document as stored on disk. Nothing here is validated; every
/// field is optional and unknown keys are carried through untouched.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MonsterRecord {
    #[serde(default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "type", default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub creature_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cr: Option<Field>,
    #[serde(default, deserialize_with = "lenient_list", skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,

    #[serde(default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
    #[serde(default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub alignment: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ac: Option<Field>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hp: Option<Field>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speed: Option<Field>,
    #[serde(default, deserialize_with = "lenient_map", skip_serializing_if = "IndexMap::is_empty")]
    pub abilities: IndexMap<String, Field>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub saves: Option<Field>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skills: Option<Field>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub immunities: Option<Field>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resistance: Option<Field>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vulnerability: Option<Field>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conimmunities: Option<Field>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub senses: Option<Field>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub languages: Option<Field>,
    #[serde(default, deserialize_with = "lenient_list", skip_serializing_if = "Vec::is_empty")]
    pub traits: Vec<Feature>,
    #[serde(default, deserialize_with = "lenient_list", skip_serializing_if = "Vec::is_empty")]
    pub actions: Vec<Feature>,
    #[serde(default, deserialize_with = "lenient_list", skip_serializing_if = "Vec::is_empty")]
    pub reactions: Vec<Feature>,
    #[serde(default, deserialize_with = "lenient_list", skip_serializing_if = "Vec::is_empty")]
    pub legendary: Vec<Feature>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub legendarynumber: Option<Field>,
    #[serde(default, deserialize_with = "lenient_list", skip_serializing_if = "Vec::is_empty")]
    pub lairactions: Vec<LairActions>,
    #[serde(default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl MonsterRecord {
    /// Raw CR text; numeric CRs are rendered as their decimal text.
    pub fn cr_text(&self) -> Option<Cow<'_, str>> {
        self.cr.as_ref().and_then(Field::as_text)
    }

    /// Last tag, by convention the sourcebook the record came from.
    pub fn source_tag(&self) -> Option<&str> {
        self.tags.last().map(String::as_str).filter(|t| !t.is_empty())
    }

    /// Score for an ability key such as `"dex"`, matched case-insensitively.
    pub fn ability_score(&self, ability: &str) -> Option<i64> {
        self.abilities
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(ability))
            .and_then(|(_, v)| v.as_i64())
    }
}

fn scalar_text(value: Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Strings pass through, numbers and booleans become their text, anything
/// else reads as absent.
fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Value>::deserialize(deserializer)?.and_then(scalar_text))
}

fn text_or_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient_text(deserializer)?.unwrap_or_default())
}

/// A list whose unreadable elements are dropped. `null` or a non-array reads
/// as empty.
fn lenient_list<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let Some(Value::Array(items)) = Option::<Value>::deserialize(deserializer)? else {
        return Ok(Vec::new());
    };
    Ok(items
        .into_iter()
        .filter(|v| !v.is_null())
        .filter_map(|v| serde_json::from_value(v).ok())
        .collect())
}

#[derive(Deserialize)]
#[serde(untagged)]
enum MapOrOther {
    Map(IndexMap<String, Field>),
    Other(#[allow(dead_code)] Value),
}

/// Ordered map, or empty for `null` and non-objects.
fn lenient_map<'de, D>(deserializer: D) -> Result<IndexMap<String, Field>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match MapOrOther::deserialize(deserializer)? {
        MapOrOther::Map(map) => map,
        MapOrOther::Other(_) => IndexMap::new(),
    })
}

/// A loaded record with its derived display fields.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Monster {
    pub file: String,
    pub display_name: String,
    pub clean_cr: String,
    pub cr_sort: CrValue,
    pub source: Option<String>,
    pub record: MonsterRecord,
}

impl Monster {
    /// Derive display fields for a record loaded from `file`. `label` is the
    /// display name an index entry provided, if any.
    pub fn decorate(file: impl Into<String>, label: Option<&str>, record: MonsterRecord) -> Self {
        let file = file.into();
        let raw_cr = record.cr_text();
        let clean_cr = clean_cr(raw_cr.as_deref());
        let cr_sort = parse_cr(raw_cr.as_deref());
        let display_name = resolve_display_name(label, record.name.as_deref(), &file);
        let source = record.source_tag().map(str::to_string);
        Monster {
            file,
            display_name,
            clean_cr,
            cr_sort,
            source,
            record,
        }
    }

    pub fn creature_type(&self) -> Option<&str> {
        self.record.creature_type.as_deref()
    }
}

/// Display name resolution: index label, then the record's own name, then the
/// file name without its `.json` extension.
pub fn resolve_display_name(label: Option<&str>, name: Option<&str>, file: &str) -> String {
    label
        .filter(|l| !l.is_empty())
        .or_else(|| name.filter(|n| !n.is_empty()))
        .map(str::to_string)
        .unwrap_or_else(|| file.strip_suffix(".json").unwrap_or(file).to_string())
}

/// Record as written into a bundle: the record's own keys plus the file it
/// came from and its display name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BundledRecord {
    #[serde(rename = "_file", default, skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
    #[serde(rename = "_displayName", default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(flatten)]
    pub record: MonsterRecord,
}

impl From<&Monster> for BundledRecord {
    fn from(m: &Monster) -> Self {
        BundledRecord {
            file: Some(m.file.clone()),
            display_name: Some(m.display_name.clone()),
            record: m.record.clone(),
        }
    }
}
