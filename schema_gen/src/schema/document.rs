//! Decoded schema document
//!
//! Mirrors the YAML layout one to one. Enumerated options that are missing or
//! written as an empty string decode to `None`; `schema::defaults` turns them
//! into concrete values before anything else sees them.

use serde::de::{DeserializeOwned, IntoDeserializer};
use serde::{Deserialize, Deserializer};

use crate::schema::types::{
    ColumnFormat, Dbms, IndexDirection, IndexType, MatchType, ReferenceOption, Storage, TypeName,
};

/// Root of a schema file
#[derive(Debug, Default, Deserialize)]
pub struct SchemaDocument {
    #[serde(default)]
    pub config: Option<ConfigDocument>,
    #[serde(default)]
    pub tables: Vec<TableDocument>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ConfigDocument {
    #[serde(default, deserialize_with = "empty_as_none")]
    pub dbms: Option<Dbms>,
    #[serde(default, deserialize_with = "scalar_as_string")]
    pub version: Option<String>,
    #[serde(default, deserialize_with = "scalar_as_string")]
    pub database: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct TableDocument {
    pub id: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, alias = "engin", deserialize_with = "scalar_as_string")]
    pub engine: Option<String>,
    #[serde(default, deserialize_with = "scalar_as_string")]
    pub char_set: Option<String>,
    #[serde(default)]
    pub max_rows: Option<u64>,
    #[serde(default)]
    pub min_rows: Option<u64>,
    #[serde(default)]
    pub avg_row_length: Option<u64>,
    #[serde(default)]
    pub primary_key: Option<PrimaryKeyDocument>,
    #[serde(default)]
    pub columns: Vec<ColumnDocument>,
}

#[derive(Debug, Default, Deserialize)]
pub struct PrimaryKeyDocument {
    #[serde(default)]
    pub columns: Vec<IndexColumnDocument>,
    #[serde(default)]
    pub options: Option<IndexOptionDocument>,
}

#[derive(Debug, Deserialize)]
pub struct IndexColumnDocument {
    pub name: String,
    #[serde(default)]
    pub length: Option<u32>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub direction: Option<IndexDirection>,
}

#[derive(Debug, Default, Deserialize)]
pub struct IndexOptionDocument {
    #[serde(default, rename = "type", deserialize_with = "empty_as_none")]
    pub index_type: Option<IndexType>,
    #[serde(default)]
    pub key_block_size: Option<u32>,
    #[serde(default, deserialize_with = "scalar_as_string")]
    pub parser: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ColumnDocument {
    pub id: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type")]
    pub column_type: TypeDocument,
    #[serde(default)]
    pub null: bool,
    #[serde(default, deserialize_with = "scalar_as_string")]
    pub default: Option<String>,
    #[serde(default)]
    pub extra: Option<ExtraDocument>,
    #[serde(default)]
    pub reference: Vec<ReferenceDocument>,
}

#[derive(Debug, Deserialize)]
pub struct TypeDocument {
    pub name: TypeName,
    #[serde(default)]
    pub length: Option<u32>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ExtraDocument {
    #[serde(default)]
    pub auto_increment: bool,
    #[serde(default)]
    pub unique: bool,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub format: Option<ColumnFormat>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub storage: Option<Storage>,
}

#[derive(Debug, Deserialize)]
pub struct ReferenceDocument {
    pub table: String,
    #[serde(default, rename = "match", deserialize_with = "empty_as_none")]
    pub match_type: Option<MatchType>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub on_delete: Option<ReferenceOption>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub on_update: Option<ReferenceOption>,
    #[serde(default)]
    pub columns: Vec<IndexColumnDocument>,
}

/// Decode an enumerated option, treating null and `""` as unset
fn empty_as_none<'de, D, T>(deserializer: D) -> std::result::Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => {
            let value: serde::de::value::StrDeserializer<'_, D::Error> = value.into_deserializer();
            T::deserialize(value).map(Some)
        }
    }
}

/// Decode any scalar as text, treating null and `""` as unset
fn scalar_as_string<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<serde_yaml::Value> = Option::deserialize(deserializer)?;
    let text = match value {
        None | Some(serde_yaml::Value::Null) => None,
        Some(serde_yaml::Value::String(s)) => Some(s),
        Some(serde_yaml::Value::Number(n)) => Some(n.to_string()),
        Some(serde_yaml::Value::Bool(b)) => Some(b.to_string()),
        Some(other) => {
            return Err(serde::de::Error::custom(format!(
                "expected a scalar, found {:?}",
                other
            )))
        }
    };

    Ok(text.filter(|s| !s.is_empty()))
}
