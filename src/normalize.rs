//! Record normalizer
//!
//! Projects every [`Record`] into the uniform [`AssetView`] used for listing,
//! searching and filtering. Pure and total: any decoded record maps to exactly
//! one view.

use crate::category::Category;
use crate::record::{AssetFields, Record};
use serde::Serialize;

/// Version label treated as "no version suffix".
pub const DEFAULT_VERSION: &str = "Final";

/// Title used when a record lacks the column its title is built from.
pub const PLACEHOLDER_TITLE: &str = "Asset";

const AUDIO_PLACEHOLDER: &str = "Asset de Áudio";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetType {
    Video,
    Audio,
    Image,
    Voice,
    Other,
}

/// Read-only display projection of a record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssetView {
    pub id: String,
    pub title: String,
    pub subtitle: String,
    pub image_url: String,
    pub link: String,
    pub duration: Option<String>,
    pub category: Category,
    pub asset_type: AssetType,
    pub tags: Vec<String>,
    #[serde(skip)]
    pub record: Record,
}

fn owned(value: &Option<String>) -> String {
    value.clone().unwrap_or_default()
}

fn title_or_placeholder(value: &Option<String>) -> String {
    value.clone().unwrap_or_else(|| PLACEHOLDER_TITLE.to_string())
}

/// Normalize one record.
pub fn normalize(record: &Record) -> AssetView {
    let category = record.category();
    let (title, subtitle, image_url, link, duration, asset_type) = match &record.fields {
        AssetFields::Deepfake(d) => {
            let name = title_or_placeholder(&d.personagem);
            let title = match d.versao.as_deref() {
                Some(v) if v != DEFAULT_VERSION => format!("{} {}", name, v),
                _ => name,
            };
            let subtitle = d.versao.clone().unwrap_or_else(|| DEFAULT_VERSION.to_string());
            (
                title,
                subtitle,
                owned(&d.imagem_descritiva),
                owned(&d.video_link),
                d.duracao.clone(),
                AssetType::Video,
            )
        }
        AssetFields::VoiceClone(v) => (
            title_or_placeholder(&v.voz_nome),
            "Voice Clone".to_string(),
            String::new(),
            owned(&v.link_minimax),
            v.duracao.clone(),
            AssetType::Voice,
        ),
        AssetFields::OriginalVideo(o) => (
            title_or_placeholder(&o.nome_video),
            "Vídeo Bruto".to_string(),
            String::new(),
            owned(&o.link_video_original),
            None,
            AssetType::Video,
        ),
        AssetFields::Tiktok(t) => (
            t.nicho.clone().unwrap_or_else(|| "TikTok".to_string()),
            owned(&t.tipo),
            String::new(),
            owned(&t.link_video),
            None,
            AssetType::Video,
        ),
        AssetFields::Music(t) | AssetFields::Sfx(t) => {
            let title = t
                .nome
                .clone()
                .or_else(|| t.momento_vsl.clone())
                .unwrap_or_else(|| AUDIO_PLACEHOLDER.to_string());
            let subtitle = format!(
                "{} • {}",
                t.emocao.as_deref().unwrap_or("Vibe Neutra"),
                t.momento_vsl.as_deref().unwrap_or("Geral")
            );
            (title, subtitle, String::new(), owned(&t.link_audio), None, AssetType::Audio)
        }
        AssetFields::Veo(v) => (
            title_or_placeholder(&v.produto_insert),
            owned(&v.dimensao),
            String::new(),
            owned(&v.link_video),
            v.duracao.clone(),
            AssetType::Video,
        ),
        AssetFields::SocialProof(s) => (
            s.nicho.clone().unwrap_or_else(|| "Social Proof".to_string()),
            owned(&s.genero),
            owned(&s.link_imagem),
            owned(&s.link_imagem),
            None,
            AssetType::Image,
        ),
        AssetFields::Ugc(u) => (
            match u.genero.as_deref() {
                Some(g) => format!("UGC: {}", g),
                None => PLACEHOLDER_TITLE.to_string(),
            },
            owned(&u.idade),
            String::new(),
            owned(&u.link_video),
            u.duracao.clone(),
            AssetType::Video,
        ),
    };

    AssetView {
        id: record.id.clone(),
        title,
        subtitle,
        image_url,
        link,
        duration,
        category,
        asset_type,
        tags: record.tags.clone(),
        record: record.clone(),
    }
}

impl AssetView {
    /// Thumbnail URL for the card view, if one can be derived.
    ///
    /// Audio categories never get one. Otherwise the cover image wins over the
    /// primary link.
    pub fn thumbnail(&self) -> Option<String> {
        if self.category.is_audio() {
            return None;
        }
        resolve_drive_image(&self.image_url).or_else(|| resolve_drive_image(&self.link))
    }

    /// Lower-cased `title + " " + tags` used by free-text search.
    pub fn search_text(&self) -> String {
        format!("{} {}", self.title, self.tags.join(" ")).to_lowercase()
    }
}

const IMAGE_EXTENSIONS: &[&str] = &[".jpeg", ".jpg", ".gif", ".png", ".webp", ".svg"];

/// Turn a Google Drive share link into a thumbnail URL.
///
/// Direct image URLs pass through unchanged; anything else is returned as-is.
pub fn resolve_drive_image(url: &str) -> Option<String> {
    if url.is_empty() {
        return None;
    }
    let lower = url.to_lowercase();
    if url.starts_with("http")
        && (IMAGE_EXTENSIONS.iter().any(|ext| lower.ends_with(ext)) || url.contains("base64"))
    {
        return Some(url.to_string());
    }
    if let Some(id) = drive_file_id(url) {
        return Some(format!("https://drive.google.com/thumbnail?id={}&sz=w1000", id));
    }
    Some(url.to_string())
}

fn drive_file_id(url: &str) -> Option<&str> {
    const MARKERS: &[&str] = &["/d/", "id="];
    for marker in MARKERS {
        let mut rest = url;
        while let Some(pos) = rest.find(marker) {
            let candidate = &rest[pos + marker.len()..];
            let len = candidate
                .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_' || c == '-'))
                .unwrap_or(candidate.len());
            if len >= 25 {
                return Some(&candidate[..len]);
            }
            rest = candidate;
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn rec(category: Category, fields: serde_json::Value) -> Record {
        let mut row = json!({ "id": "r1", "created_at": "2024-05-01T12:00:00Z", "tags": ["x"] });
        for (k, v) in fields.as_object().unwrap() {
            row[k] = v.clone();
        }
        Record::from_row(category, row).unwrap()
    }

    #[test]
    fn test_deepfake_title_with_version() {
        let view = normalize(&rec(Category::Deepfakes, json!({"personagem": "Adele", "versao": "V2"})));
        assert_eq!(view.title, "Adele V2");
        assert_eq!(view.subtitle, "V2");
        assert_eq!(view.asset_type, AssetType::Video);
    }

    #[test]
    fn test_deepfake_final_version_has_no_suffix() {
        let view = normalize(&rec(Category::Deepfakes, json!({"personagem": "Adele", "versao": "Final"})));
        assert_eq!(view.title, "Adele");
        let view = normalize(&rec(Category::Deepfakes, json!({"personagem": "Adele"})));
        assert_eq!(view.title, "Adele");
        assert_eq!(view.subtitle, "Final");
    }

    #[test]
    fn test_audio_title_fallbacks() {
        let view = normalize(&rec(Category::Music, json!({"nome": "Epic", "momento_vsl": "CTA"})));
        assert_eq!(view.title, "Epic");
        assert_eq!(view.subtitle, "Vibe Neutra • CTA");

        let view = normalize(&rec(Category::Sfx, json!({"momento_vsl": "Abertura", "emocao": "Tensão"})));
        assert_eq!(view.title, "Abertura");
        assert_eq!(view.subtitle, "Tensão • Abertura");

        let view = normalize(&rec(Category::Music, json!({})));
        assert_eq!(view.title, "Asset de Áudio");
        assert_eq!(view.subtitle, "Vibe Neutra • Geral");
        assert_eq!(view.asset_type, AssetType::Audio);
    }

    #[test]
    fn test_fixed_titles_and_types() {
        let v = normalize(&rec(Category::Tiktok, json!({"tipo": "Hook"})));
        assert_eq!((v.title.as_str(), v.subtitle.as_str()), ("TikTok", "Hook"));

        let v = normalize(&rec(Category::SocialProof, json!({"link_imagem": "https://x/a.png"})));
        assert_eq!(v.title, "Social Proof");
        assert_eq!(v.image_url, "https://x/a.png");
        assert_eq!(v.link, "https://x/a.png");
        assert_eq!(v.asset_type, AssetType::Image);

        let v = normalize(&rec(Category::UgcTestimonials, json!({"genero": "MULHER", "idade": "ADULTO"})));
        assert_eq!(v.title, "UGC: MULHER");
        assert_eq!(v.subtitle, "ADULTO");

        let v = normalize(&rec(Category::VoiceClones, json!({"voz_nome": "Locutor", "duracao": "0:15"})));
        assert_eq!(v.asset_type, AssetType::Voice);
        assert_eq!(v.duration.as_deref(), Some("0:15"));
    }

    #[test]
    fn test_missing_title_column_uses_placeholder() {
        let v = normalize(&rec(Category::OriginalVideos, json!({})));
        assert_eq!(v.title, PLACEHOLDER_TITLE);
        let v = normalize(&rec(Category::Veo3, json!({"dimensao": "1080x1920"})));
        assert_eq!(v.title, PLACEHOLDER_TITLE);
    }

    #[test]
    fn test_search_text_includes_tags() {
        let v = normalize(&rec(Category::VoiceClones, json!({"voz_nome": "Locutor"})));
        assert_eq!(v.search_text(), "locutor x");
    }

    #[test]
    fn test_resolve_drive_image() {
        let share = "https://drive.google.com/file/d/1AbCdEfGhIjKlMnOpQrStUvWxYz012/view?usp=sharing";
        assert_eq!(
            resolve_drive_image(share).unwrap(),
            "https://drive.google.com/thumbnail?id=1AbCdEfGhIjKlMnOpQrStUvWxYz012&sz=w1000"
        );
        let open = "https://drive.google.com/open?id=1AbCdEfGhIjKlMnOpQrStUvWxYz012";
        assert!(resolve_drive_image(open).unwrap().contains("thumbnail?id=1AbCdEfGhIjKlMnOpQrStUvWxYz012"));
        assert_eq!(resolve_drive_image("https://cdn/x.PNG").unwrap(), "https://cdn/x.PNG");
        assert_eq!(resolve_drive_image("https://example.com/page").unwrap(), "https://example.com/page");
        assert_eq!(resolve_drive_image(""), None);
    }

    #[test]
    fn test_audio_has_no_thumbnail() {
        let v = normalize(&rec(Category::Music, json!({"link_audio": "https://cdn/a.png"})));
        assert_eq!(v.thumbnail(), None);
        let v = normalize(&rec(Category::Tiktok, json!({"link_video": "https://cdn/a.png"})));
        assert_eq!(v.thumbnail().as_deref(), Some("https://cdn/a.png"));
    }
}
