//! Stored records
//!
//! A raw backend row is decoded into a [`Record`]: the columns every collection
//! shares plus an [`AssetFields`] variant carrying the category-specific shape.
//! The category is fixed by the variant, so a record can never change category.

use crate::category::Category;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Accept `"abc"` or `42` as an identifier.
pub(crate) fn id_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "expected string or number id, got {}",
            other
        ))),
    }
}

/// Nullable identifier; empty strings count as absent.
pub(crate) fn opt_id_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) if s.is_empty() => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(other) => Err(serde::de::Error::custom(format!(
            "expected string or number id, got {}",
            other
        ))),
    }
}

/// `null` tags decode to an empty list; `null` elements are dropped.
fn null_tags<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<Option<String>>>::deserialize(deserializer)?
        .unwrap_or_default()
        .into_iter()
        .flatten()
        .collect())
}

/// Text column; empty strings count as absent.
fn text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) if !s.is_empty() => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Deepfake {
    #[serde(default, deserialize_with = "text")]
    pub personagem: Option<String>,
    #[serde(default, deserialize_with = "text")]
    pub imagem_descritiva: Option<String>,
    #[serde(default, deserialize_with = "text")]
    pub duracao: Option<String>,
    #[serde(default, deserialize_with = "text")]
    pub versao: Option<String>,
    #[serde(default, deserialize_with = "text")]
    pub video_link: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VoiceClone {
    #[serde(default, deserialize_with = "text")]
    pub voz_nome: Option<String>,
    #[serde(default, deserialize_with = "text")]
    pub duracao: Option<String>,
    #[serde(default, deserialize_with = "text")]
    pub link_minimax: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OriginalVideo {
    #[serde(default, deserialize_with = "text")]
    pub nome_video: Option<String>,
    #[serde(default, deserialize_with = "text")]
    pub link_video_original: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TikTokAsset {
    #[serde(default, deserialize_with = "text")]
    pub nicho: Option<String>,
    #[serde(default, deserialize_with = "text")]
    pub tipo: Option<String>,
    #[serde(default, deserialize_with = "text")]
    pub genero: Option<String>,
    #[serde(default, deserialize_with = "text")]
    pub link_video: Option<String>,
}

/// Music tracks and sound effects share one shape.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Track {
    #[serde(default, deserialize_with = "text")]
    pub nome: Option<String>,
    #[serde(default, deserialize_with = "text")]
    pub momento_vsl: Option<String>,
    #[serde(default, deserialize_with = "text")]
    pub emocao: Option<String>,
    #[serde(default, deserialize_with = "text")]
    pub link_audio: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VeoAsset {
    #[serde(default, deserialize_with = "text")]
    pub produto_insert: Option<String>,
    #[serde(default, deserialize_with = "text")]
    pub dimensao: Option<String>,
    #[serde(default, deserialize_with = "text")]
    pub duracao: Option<String>,
    #[serde(default, deserialize_with = "text")]
    pub link_video: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SocialProof {
    #[serde(default, deserialize_with = "text")]
    pub nicho: Option<String>,
    #[serde(default, deserialize_with = "text")]
    pub genero: Option<String>,
    #[serde(default, deserialize_with = "text")]
    pub link_imagem: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UgcTestimonial {
    #[serde(default, deserialize_with = "text")]
    pub genero: Option<String>,
    #[serde(default, deserialize_with = "text")]
    pub duracao: Option<String>,
    #[serde(default, deserialize_with = "text")]
    pub idade: Option<String>,
    #[serde(default, deserialize_with = "text")]
    pub link_video: Option<String>,
}

/// Category-specific columns of a record.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum AssetFields {
    Deepfake(Deepfake),
    VoiceClone(VoiceClone),
    OriginalVideo(OriginalVideo),
    Tiktok(TikTokAsset),
    Music(Track),
    Sfx(Track),
    Veo(VeoAsset),
    SocialProof(SocialProof),
    Ugc(UgcTestimonial),
}

impl AssetFields {
    /// Decode the category-specific columns of a raw row.
    pub fn decode(category: Category, row: Value) -> Result<Self, serde_json::Error> {
        Ok(match category {
            Category::Deepfakes => AssetFields::Deepfake(serde_json::from_value(row)?),
            Category::VoiceClones => AssetFields::VoiceClone(serde_json::from_value(row)?),
            Category::OriginalVideos => AssetFields::OriginalVideo(serde_json::from_value(row)?),
            Category::Tiktok => AssetFields::Tiktok(serde_json::from_value(row)?),
            Category::Music => AssetFields::Music(serde_json::from_value(row)?),
            Category::Sfx => AssetFields::Sfx(serde_json::from_value(row)?),
            Category::Veo3 => AssetFields::Veo(serde_json::from_value(row)?),
            Category::SocialProof => AssetFields::SocialProof(serde_json::from_value(row)?),
            Category::UgcTestimonials => AssetFields::Ugc(serde_json::from_value(row)?),
        })
    }

    pub fn category(&self) -> Category {
        match self {
            AssetFields::Deepfake(_) => Category::Deepfakes,
            AssetFields::VoiceClone(_) => Category::VoiceClones,
            AssetFields::OriginalVideo(_) => Category::OriginalVideos,
            AssetFields::Tiktok(_) => Category::Tiktok,
            AssetFields::Music(_) => Category::Music,
            AssetFields::Sfx(_) => Category::Sfx,
            AssetFields::Veo(_) => Category::Veo3,
            AssetFields::SocialProof(_) => Category::SocialProof,
            AssetFields::Ugc(_) => Category::UgcTestimonials,
        }
    }

    /// Value of a descriptive column by its collection column name.
    pub fn column(&self, name: &str) -> Option<&str> {
        let value = match (self, name) {
            (AssetFields::Deepfake(d), "personagem") => &d.personagem,
            (AssetFields::Deepfake(d), "imagem_descritiva") => &d.imagem_descritiva,
            (AssetFields::Deepfake(d), "duracao") => &d.duracao,
            (AssetFields::Deepfake(d), "versao") => &d.versao,
            (AssetFields::Deepfake(d), "video_link") => &d.video_link,
            (AssetFields::VoiceClone(v), "voz_nome") => &v.voz_nome,
            (AssetFields::VoiceClone(v), "duracao") => &v.duracao,
            (AssetFields::VoiceClone(v), "link_minimax") => &v.link_minimax,
            (AssetFields::OriginalVideo(o), "nome_video") => &o.nome_video,
            (AssetFields::OriginalVideo(o), "link_video_original") => &o.link_video_original,
            (AssetFields::Tiktok(t), "nicho") => &t.nicho,
            (AssetFields::Tiktok(t), "tipo") => &t.tipo,
            (AssetFields::Tiktok(t), "genero") => &t.genero,
            (AssetFields::Tiktok(t), "link_video") => &t.link_video,
            (AssetFields::Music(t) | AssetFields::Sfx(t), "nome") => &t.nome,
            (AssetFields::Music(t) | AssetFields::Sfx(t), "momento_vsl") => &t.momento_vsl,
            (AssetFields::Music(t) | AssetFields::Sfx(t), "emocao") => &t.emocao,
            (AssetFields::Music(t) | AssetFields::Sfx(t), "link_audio") => &t.link_audio,
            (AssetFields::Veo(v), "produto_insert") => &v.produto_insert,
            (AssetFields::Veo(v), "dimensao") => &v.dimensao,
            (AssetFields::Veo(v), "duracao") => &v.duracao,
            (AssetFields::Veo(v), "link_video") => &v.link_video,
            (AssetFields::SocialProof(s), "nicho") => &s.nicho,
            (AssetFields::SocialProof(s), "genero") => &s.genero,
            (AssetFields::SocialProof(s), "link_imagem") => &s.link_imagem,
            (AssetFields::Ugc(u), "genero") => &u.genero,
            (AssetFields::Ugc(u), "duracao") => &u.duracao,
            (AssetFields::Ugc(u), "idade") => &u.idade,
            (AssetFields::Ugc(u), "link_video") => &u.link_video,
            _ => return None,
        };
        value.as_deref()
    }
}

#[derive(Deserialize)]
struct RowMeta {
    #[serde(deserialize_with = "id_string")]
    id: String,
    created_at: DateTime<Utc>,
    #[serde(default, deserialize_with = "null_tags")]
    tags: Vec<String>,
    #[serde(default, deserialize_with = "opt_id_string")]
    folder_id: Option<String>,
}

/// One row of a category's backing collection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Record {
    pub id: String,
    pub created_at: DateTime<Utc>,
    pub tags: Vec<String>,
    pub folder_id: Option<String>,
    #[serde(flatten)]
    pub fields: AssetFields,
}

impl Record {
    /// Decode a raw backend row belonging to `category`.
    pub fn from_row(category: Category, row: Value) -> Result<Self, serde_json::Error> {
        let meta: RowMeta = serde_json::from_value(row.clone())?;
        let fields = AssetFields::decode(category, row)?;
        Ok(Self {
            id: meta.id,
            created_at: meta.created_at,
            tags: meta.tags,
            folder_id: meta.folder_id,
            fields,
        })
    }

    pub fn category(&self) -> Category {
        self.fields.category()
    }

    /// Descriptive column value (see [`AssetFields::column`]).
    pub fn column(&self, name: &str) -> Option<&str> {
        self.fields.column(name)
    }

    /// Render the record as an edit form draft.
    ///
    /// Tags become a comma-separated `tags_string`, exactly what the save path
    /// parses back.
    pub fn to_draft(&self) -> Map<String, Value> {
        let mut draft = Map::new();
        for col in self.category().columns() {
            match *col {
                "tags" => {}
                "folder_id" => {
                    let value = self
                        .folder_id
                        .clone()
                        .map(Value::String)
                        .unwrap_or(Value::Null);
                    draft.insert("folder_id".to_string(), value);
                }
                name => {
                    if let Some(v) = self.column(name) {
                        draft.insert(name.to_string(), Value::String(v.to_string()));
                    }
                }
            }
        }
        draft.insert(
            "tags_string".to_string(),
            Value::String(self.tags.join(", ")),
        );
        draft
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_deepfake_row() {
        let row = json!({
            "id": "df-1",
            "created_at": "2024-05-01T12:00:00+00:00",
            "personagem": "Adele",
            "versao": "V2",
            "video_link": "https://drive.google.com/file/d/abc/view",
            "tags": ["vsl", "dramatico"],
            "folder_id": null
        });
        let rec = Record::from_row(Category::Deepfakes, row).unwrap();
        assert_eq!(rec.id, "df-1");
        assert_eq!(rec.category(), Category::Deepfakes);
        assert_eq!(rec.column("personagem"), Some("Adele"));
        assert_eq!(rec.column("versao"), Some("V2"));
        assert_eq!(rec.tags, vec!["vsl", "dramatico"]);
        assert!(rec.folder_id.is_none());
    }

    #[test]
    fn test_null_tags_and_numeric_ids() {
        let row = json!({
            "id": 42,
            "created_at": "2024-05-01T12:00:00.123456+00:00",
            "nome": "Epic",
            "tags": null,
            "folder_id": 7
        });
        let rec = Record::from_row(Category::Music, row).unwrap();
        assert_eq!(rec.id, "42");
        assert!(rec.tags.is_empty());
        assert_eq!(rec.folder_id.as_deref(), Some("7"));
    }

    #[test]
    fn test_null_tag_elements_are_dropped() {
        let row = json!({
            "id": "m9",
            "created_at": "2024-05-01T12:00:00Z",
            "nome": "Gappy",
            "tags": ["a", null, "b"]
        });
        let rec = Record::from_row(Category::Music, row).unwrap();
        assert_eq!(rec.tags, vec!["a", "b"]);
    }

    #[test]
    fn test_empty_strings_are_absent() {
        let row = json!({
            "id": "m1",
            "created_at": "2024-05-01T12:00:00Z",
            "nome": "",
            "momento_vsl": "Abertura",
            "folder_id": ""
        });
        let rec = Record::from_row(Category::Sfx, row).unwrap();
        assert_eq!(rec.column("nome"), None);
        assert_eq!(rec.column("momento_vsl"), Some("Abertura"));
        assert!(rec.folder_id.is_none());
    }

    #[test]
    fn test_missing_created_at_fails() {
        let row = json!({ "id": "x", "nome": "Epic" });
        assert!(Record::from_row(Category::Music, row).is_err());
    }

    #[test]
    fn test_column_outside_category_is_none() {
        let row = json!({ "id": "t", "created_at": "2024-05-01T12:00:00Z", "nicho": "Fitness" });
        let rec = Record::from_row(Category::Tiktok, row).unwrap();
        assert_eq!(rec.column("nicho"), Some("Fitness"));
        assert_eq!(rec.column("emocao"), None);
    }

    #[test]
    fn test_to_draft_joins_tags() {
        let row = json!({
            "id": "v1",
            "created_at": "2024-05-01T12:00:00Z",
            "voz_nome": "Locutor",
            "link_minimax": "https://minimax/1",
            "tags": ["grave", "masculina"],
            "folder_id": "f1"
        });
        let rec = Record::from_row(Category::VoiceClones, row).unwrap();
        let draft = rec.to_draft();
        assert_eq!(draft["voz_nome"], json!("Locutor"));
        assert_eq!(draft["tags_string"], json!("grave, masculina"));
        assert_eq!(draft["folder_id"], json!("f1"));
        assert!(!draft.contains_key("duracao"));
    }
}
