//! Category registry
//!
//! The nine fixed content categories, each backed by its own collection in the
//! hosted backend. Static; nothing here changes at runtime.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Name of the collection that stores folders for every category.
pub const FOLDERS_TABLE: &str = "folders";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Category {
    Deepfakes,
    VoiceClones,
    OriginalVideos,
    Tiktok,
    Music,
    Sfx,
    Veo3,
    SocialProof,
    UgcTestimonials,
}

/// Write allow-lists keyed by collection name.
///
/// Every list carries `tags` and `folder_id`.
const TABLE_SCHEMAS: &[(&str, &[&str])] = &[
    (
        "deepfakes",
        &["personagem", "imagem_descritiva", "duracao", "versao", "video_link", "tags", "folder_id"],
    ),
    ("voice_clones", &["voz_nome", "duracao", "link_minimax", "tags", "folder_id"]),
    ("original_videos", &["nome_video", "link_video_original", "tags", "folder_id"]),
    ("tiktok_assets", &["nicho", "tipo", "genero", "link_video", "tags", "folder_id"]),
    ("musicas", &["nome", "momento_vsl", "emocao", "link_audio", "tags", "folder_id"]),
    ("sfx", &["nome", "momento_vsl", "emocao", "link_audio", "tags", "folder_id"]),
    ("veo_assets", &["produto_insert", "dimensao", "duracao", "link_video", "tags", "folder_id"]),
    ("social_proof", &["nicho", "genero", "link_imagem", "tags", "folder_id"]),
    ("ugc_testimonials", &["genero", "duracao", "idade", "link_video", "tags", "folder_id"]),
];

/// Look up the write allow-list for a collection.
pub fn allowed_columns(table: &str) -> Option<&'static [&'static str]> {
    TABLE_SCHEMAS
        .iter()
        .find(|(name, _)| *name == table)
        .map(|(_, cols)| *cols)
}

impl Category {
    /// All categories in sidebar order.
    pub const ALL: [Category; 9] = [
        Category::Deepfakes,
        Category::VoiceClones,
        Category::OriginalVideos,
        Category::Tiktok,
        Category::Music,
        Category::Sfx,
        Category::Veo3,
        Category::SocialProof,
        Category::UgcTestimonials,
    ];

    /// Display label shown in the sidebar and headers
    pub fn label(&self) -> &'static str {
        match self {
            Category::Deepfakes => "Deepfakes",
            Category::VoiceClones => "Voz para Clonar",
            Category::OriginalVideos => "Vídeos Originais",
            Category::Tiktok => "Tik Tok",
            Category::Music => "Músicas",
            Category::Sfx => "SFX",
            Category::Veo3 => "VEO 3",
            Category::SocialProof => "Provas Sociais",
            Category::UgcTestimonials => "Depoimentos UGC",
        }
    }

    /// Backing collection name
    pub fn table(&self) -> &'static str {
        match self {
            Category::Deepfakes => "deepfakes",
            Category::VoiceClones => "voice_clones",
            Category::OriginalVideos => "original_videos",
            Category::Tiktok => "tiktok_assets",
            Category::Music => "musicas",
            Category::Sfx => "sfx",
            Category::Veo3 => "veo_assets",
            Category::SocialProof => "social_proof",
            Category::UgcTestimonials => "ugc_testimonials",
        }
    }

    /// Short name used on the command line
    pub fn slug(&self) -> &'static str {
        match self {
            Category::Deepfakes => "deepfakes",
            Category::VoiceClones => "voice-clones",
            Category::OriginalVideos => "original-videos",
            Category::Tiktok => "tiktok",
            Category::Music => "music",
            Category::Sfx => "sfx",
            Category::Veo3 => "veo3",
            Category::SocialProof => "social-proof",
            Category::UgcTestimonials => "ugc",
        }
    }

    /// Upper-case identifier (`MUSIC`, `VOICE_CLONES`, ...)
    pub fn id(&self) -> &'static str {
        match self {
            Category::Deepfakes => "DEEPFAKES",
            Category::VoiceClones => "VOICE_CLONES",
            Category::OriginalVideos => "ORIGINAL_VIDEOS",
            Category::Tiktok => "TIKTOK",
            Category::Music => "MUSIC",
            Category::Sfx => "SFX",
            Category::Veo3 => "VEO3",
            Category::SocialProof => "SOCIAL_PROOF",
            Category::UgcTestimonials => "UGC_TESTIMONIALS",
        }
    }

    pub fn from_table(table: &str) -> Option<Category> {
        Category::ALL.iter().copied().find(|c| c.table() == table)
    }

    /// Columns this category may write (see [`allowed_columns`]).
    pub fn columns(&self) -> &'static [&'static str] {
        allowed_columns(self.table()).unwrap_or(&[])
    }

    /// Columns the record form refuses to submit without.
    pub fn required_columns(&self) -> &'static [&'static str] {
        match self {
            Category::Deepfakes => &["personagem", "video_link"],
            Category::VoiceClones => &["voz_nome", "link_minimax"],
            Category::OriginalVideos => &["nome_video", "link_video_original"],
            Category::Tiktok => &["link_video"],
            Category::Music | Category::Sfx => &["nome", "link_audio"],
            Category::Veo3 => &["produto_insert", "link_video"],
            Category::SocialProof => &["link_imagem"],
            Category::UgcTestimonials => &["link_video"],
        }
    }

    /// Audio-like categories get a placeholder instead of a thumbnail.
    pub fn is_audio(&self) -> bool {
        matches!(self, Category::VoiceClones | Category::Music | Category::Sfx)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        Category::ALL
            .iter()
            .copied()
            .find(|c| {
                c.slug().eq_ignore_ascii_case(needle)
                    || c.table().eq_ignore_ascii_case(needle)
                    || c.id().eq_ignore_ascii_case(needle)
            })
            .ok_or_else(|| {
                let names: Vec<&str> = Category::ALL.iter().map(|c| c.slug()).collect();
                format!("unknown category '{}' (expected one of: {})", s, names.join(", "))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_category_has_allow_list() {
        for cat in Category::ALL {
            let cols = allowed_columns(cat.table()).unwrap();
            assert!(cols.contains(&"tags"), "{} missing tags", cat.table());
            assert!(cols.contains(&"folder_id"), "{} missing folder_id", cat.table());
        }
    }

    #[test]
    fn test_required_columns_are_writable() {
        for cat in Category::ALL {
            for col in cat.required_columns() {
                assert!(cat.columns().contains(col), "{} / {}", cat.table(), col);
            }
        }
    }

    #[test]
    fn test_unknown_table_has_no_allow_list() {
        assert!(allowed_columns("folders").is_none());
        assert!(allowed_columns("users").is_none());
    }

    #[test]
    fn test_parse_category_names() {
        assert_eq!("music".parse::<Category>().unwrap(), Category::Music);
        assert_eq!("musicas".parse::<Category>().unwrap(), Category::Music);
        assert_eq!("VOICE_CLONES".parse::<Category>().unwrap(), Category::VoiceClones);
        assert_eq!("ugc".parse::<Category>().unwrap(), Category::UgcTestimonials);
        assert!("podcasts".parse::<Category>().is_err());
    }

    #[test]
    fn test_from_table_roundtrip() {
        for cat in Category::ALL {
            assert_eq!(Category::from_table(cat.table()), Some(cat));
        }
        assert_eq!(Category::from_table("nope"), None);
    }
}
