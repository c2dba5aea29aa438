//! Filter engine
//!
//! A record is visible when it passes, in order: free-text search, the category
//! gate, and the filter block of the active category. Each category owns one
//! [`FilterBlock`] of independent equality / tag-membership selections; an unset
//! selection always passes.

use crate::category::Category;
use crate::error::FilterError;
use crate::normalize::AssetView;
use crate::record::Record;
use crate::snapshot::Relations;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Which categories are being browsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum Scope {
    #[default]
    All,
    Category(Category),
}

impl Scope {
    pub fn category(&self) -> Option<Category> {
        match self {
            Scope::All => None,
            Scope::Category(c) => Some(*c),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Scope::All => "Todos",
            Scope::Category(c) => c.label(),
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Scope {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            return Ok(Scope::All);
        }
        s.parse::<Category>().map(Scope::Category)
    }
}

pub const KEY_TAGS: &str = "tags";
pub const KEY_ONLY_WITH_VOICE: &str = "only_with_voice";
pub const KEY_ONLY_WITH_ORIGINAL: &str = "only_with_original";

/// Filter selections for one category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterBlock {
    /// Music and SFX
    Audio {
        momento_vsl: Option<String>,
        emocao: Option<String>,
        tag: Option<String>,
    },
    TikTok {
        nicho: Option<String>,
        genero: Option<String>,
        tipo: Option<String>,
    },
    Veo {
        produto_insert: Option<String>,
        dimensao: Option<String>,
        tag: Option<String>,
    },
    SocialProof {
        nicho: Option<String>,
        genero: Option<String>,
    },
    Ugc {
        genero: Option<String>,
        idade: Option<String>,
    },
    Deepfakes {
        personagem: Option<String>,
        versao: Option<String>,
        tag: Option<String>,
        only_with_voice: bool,
        only_with_original: bool,
    },
    VoiceClones {
        tag: Option<String>,
        duracao: Option<String>,
    },
}

fn column_is(view: &AssetView, column: &str, wanted: &Option<String>) -> bool {
    match wanted {
        None => true,
        Some(w) => view.record.column(column) == Some(w.as_str()),
    }
}

fn has_tag(view: &AssetView, wanted: &Option<String>) -> bool {
    match wanted {
        None => true,
        Some(w) => view.tags.iter().any(|t| t == w),
    }
}

impl FilterBlock {
    /// Block with every selection unset, or `None` for categories without filters.
    pub fn default_for(category: Category) -> Option<Self> {
        Some(match category {
            Category::Music | Category::Sfx => FilterBlock::Audio {
                momento_vsl: None,
                emocao: None,
                tag: None,
            },
            Category::Tiktok => FilterBlock::TikTok {
                nicho: None,
                genero: None,
                tipo: None,
            },
            Category::Veo3 => FilterBlock::Veo {
                produto_insert: None,
                dimensao: None,
                tag: None,
            },
            Category::SocialProof => FilterBlock::SocialProof {
                nicho: None,
                genero: None,
            },
            Category::UgcTestimonials => FilterBlock::Ugc {
                genero: None,
                idade: None,
            },
            Category::Deepfakes => FilterBlock::Deepfakes {
                personagem: None,
                versao: None,
                tag: None,
                only_with_voice: false,
                only_with_original: false,
            },
            Category::VoiceClones => FilterBlock::VoiceClones {
                tag: None,
                duracao: None,
            },
            Category::OriginalVideos => return None,
        })
    }

    /// Filter keys in display order. Keys are collection column names.
    pub fn keys(&self) -> &'static [&'static str] {
        match self {
            FilterBlock::Audio { .. } => &["momento_vsl", "emocao", KEY_TAGS],
            FilterBlock::TikTok { .. } => &["nicho", "genero", "tipo"],
            FilterBlock::Veo { .. } => &["produto_insert", "dimensao", KEY_TAGS],
            FilterBlock::SocialProof { .. } => &["nicho", "genero"],
            FilterBlock::Ugc { .. } => &["genero", "idade"],
            FilterBlock::Deepfakes { .. } => &[
                "personagem",
                "versao",
                KEY_TAGS,
                KEY_ONLY_WITH_VOICE,
                KEY_ONLY_WITH_ORIGINAL,
            ],
            FilterBlock::VoiceClones { .. } => &[KEY_TAGS, "duracao"],
        }
    }

    pub fn is_toggle(key: &str) -> bool {
        key == KEY_ONLY_WITH_VOICE || key == KEY_ONLY_WITH_ORIGINAL
    }

    fn slot_mut(&mut self, key: &str) -> Option<&mut Option<String>> {
        match (self, key) {
            (FilterBlock::Audio { momento_vsl, .. }, "momento_vsl") => Some(momento_vsl),
            (FilterBlock::Audio { emocao, .. }, "emocao") => Some(emocao),
            (FilterBlock::Audio { tag, .. }, KEY_TAGS) => Some(tag),
            (FilterBlock::TikTok { nicho, .. }, "nicho") => Some(nicho),
            (FilterBlock::TikTok { genero, .. }, "genero") => Some(genero),
            (FilterBlock::TikTok { tipo, .. }, "tipo") => Some(tipo),
            (FilterBlock::Veo { produto_insert, .. }, "produto_insert") => Some(produto_insert),
            (FilterBlock::Veo { dimensao, .. }, "dimensao") => Some(dimensao),
            (FilterBlock::Veo { tag, .. }, KEY_TAGS) => Some(tag),
            (FilterBlock::SocialProof { nicho, .. }, "nicho") => Some(nicho),
            (FilterBlock::SocialProof { genero, .. }, "genero") => Some(genero),
            (FilterBlock::Ugc { genero, .. }, "genero") => Some(genero),
            (FilterBlock::Ugc { idade, .. }, "idade") => Some(idade),
            (FilterBlock::Deepfakes { personagem, .. }, "personagem") => Some(personagem),
            (FilterBlock::Deepfakes { versao, .. }, "versao") => Some(versao),
            (FilterBlock::Deepfakes { tag, .. }, KEY_TAGS) => Some(tag),
            (FilterBlock::VoiceClones { tag, .. }, KEY_TAGS) => Some(tag),
            (FilterBlock::VoiceClones { duracao, .. }, "duracao") => Some(duracao),
            _ => None,
        }
    }

    fn toggle_mut(&mut self, key: &str) -> Option<&mut bool> {
        match (self, key) {
            (FilterBlock::Deepfakes { only_with_voice, .. }, KEY_ONLY_WITH_VOICE) => {
                Some(only_with_voice)
            }
            (FilterBlock::Deepfakes { only_with_original, .. }, KEY_ONLY_WITH_ORIGINAL) => {
                Some(only_with_original)
            }
            _ => None,
        }
    }

    /// Current selection for `key`, rendered as text (`None` when unset).
    pub fn value(&self, key: &str) -> Option<String> {
        let mut probe = self.clone();
        if let Some(flag) = probe.toggle_mut(key) {
            return flag.then(|| "on".to_string());
        }
        probe.slot_mut(key).and_then(|slot| slot.clone())
    }

    /// True when at least one selection is set.
    pub fn is_active(&self) -> bool {
        self.keys().iter().any(|k| self.value(k).is_some())
    }

    /// Does `view` pass every selection of this block?
    pub fn matches(&self, view: &AssetView, relations: &Relations) -> bool {
        match self {
            FilterBlock::Audio {
                momento_vsl,
                emocao,
                tag,
            } => {
                column_is(view, "momento_vsl", momento_vsl)
                    && column_is(view, "emocao", emocao)
                    && has_tag(view, tag)
            }
            FilterBlock::TikTok {
                nicho,
                genero,
                tipo,
            } => {
                column_is(view, "nicho", nicho)
                    && column_is(view, "genero", genero)
                    && column_is(view, "tipo", tipo)
            }
            FilterBlock::Veo {
                produto_insert,
                dimensao,
                tag,
            } => {
                column_is(view, "produto_insert", produto_insert)
                    && column_is(view, "dimensao", dimensao)
                    && has_tag(view, tag)
            }
            FilterBlock::SocialProof { nicho, genero } => {
                column_is(view, "nicho", nicho) && column_is(view, "genero", genero)
            }
            FilterBlock::Ugc { genero, idade } => {
                column_is(view, "genero", genero) && column_is(view, "idade", idade)
            }
            FilterBlock::Deepfakes {
                personagem,
                versao,
                tag,
                only_with_voice,
                only_with_original,
            } => {
                column_is(view, "personagem", personagem)
                    && column_is(view, "versao", versao)
                    && has_tag(view, tag)
                    && (!only_with_voice || relations.has_voice(&view.title))
                    && (!only_with_original || relations.has_original(&view.title))
            }
            FilterBlock::VoiceClones { tag, duracao } => {
                has_tag(view, tag) && column_is(view, "duracao", duracao)
            }
        }
    }
}

fn parse_toggle(value: &str) -> Result<bool, FilterError> {
    match value.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" | "" => Ok(false),
        other => Err(FilterError::InvalidToggle(other.to_string())),
    }
}

/// One filter block per category, every selection unset by default.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterSelections {
    blocks: BTreeMap<Category, FilterBlock>,
}

impl Default for FilterSelections {
    fn default() -> Self {
        let blocks = Category::ALL
            .iter()
            .filter_map(|c| FilterBlock::default_for(*c).map(|b| (*c, b)))
            .collect();
        Self { blocks }
    }
}

impl FilterSelections {
    pub fn block(&self, category: Category) -> Option<&FilterBlock> {
        self.blocks.get(&category)
    }

    fn block_mut(&mut self, category: Category) -> Result<&mut FilterBlock, FilterError> {
        self.blocks
            .get_mut(&category)
            .ok_or(FilterError::NoFilters(category))
    }

    /// Set one selection. An empty value clears it.
    pub fn set(&mut self, category: Category, key: &str, value: &str) -> Result<(), FilterError> {
        let block = self.block_mut(category)?;
        if let Some(flag) = block.toggle_mut(key) {
            *flag = parse_toggle(value)?;
            return Ok(());
        }
        let available = block.keys().join(", ");
        match block.slot_mut(key) {
            Some(slot) => {
                *slot = if value.is_empty() {
                    None
                } else {
                    Some(value.to_string())
                };
                Ok(())
            }
            None => Err(FilterError::UnknownFilter {
                category,
                key: key.to_string(),
                available,
            }),
        }
    }

    /// Flip a boolean toggle; returns the new state.
    pub fn toggle(&mut self, category: Category, key: &str) -> Result<bool, FilterError> {
        let block = self.block_mut(category)?;
        let available = block.keys().join(", ");
        match block.toggle_mut(key) {
            Some(flag) => {
                *flag = !*flag;
                Ok(*flag)
            }
            None => Err(FilterError::UnknownFilter {
                category,
                key: key.to_string(),
                available,
            }),
        }
    }

    pub fn clear_category(&mut self, category: Category) {
        if let Some(fresh) = FilterBlock::default_for(category) {
            self.blocks.insert(category, fresh);
        }
    }

    pub fn clear_all(&mut self) {
        *self = Self::default();
    }

    pub fn is_active(&self, category: Category) -> bool {
        self.block(category).map(FilterBlock::is_active).unwrap_or(false)
    }
}

/// Visibility predicate for the current view.
pub struct FilterEngine<'a> {
    scope: Scope,
    selections: &'a FilterSelections,
    relations: &'a Relations,
}

impl<'a> FilterEngine<'a> {
    pub fn new(scope: Scope, selections: &'a FilterSelections, relations: &'a Relations) -> Self {
        Self {
            scope,
            selections,
            relations,
        }
    }

    pub fn matches(&self, view: &AssetView, search: &str) -> bool {
        if !search.is_empty() && !view.search_text().contains(&search.to_lowercase()) {
            return false;
        }

        let Scope::Category(active) = self.scope else {
            return true;
        };
        if view.category != active {
            return false;
        }

        match self.selections.block(active) {
            Some(block) => block.matches(view, self.relations),
            None => true,
        }
    }
}

/// Distinct values available for one filter key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilterOption {
    pub key: &'static str,
    pub values: Vec<String>,
}

/// Values present in a category's records, per filter key, in first-seen order.
pub fn filter_options(category: Category, records: &[Record]) -> Vec<FilterOption> {
    let Some(block) = FilterBlock::default_for(category) else {
        return Vec::new();
    };

    block
        .keys()
        .iter()
        .filter(|k| !FilterBlock::is_toggle(k))
        .map(|key| {
            let mut values: Vec<String> = Vec::new();
            let mut push = |v: &str| {
                if !v.is_empty() && !values.iter().any(|x| x == v) {
                    values.push(v.to_string());
                }
            };
            for rec in records {
                if *key == KEY_TAGS {
                    rec.tags.iter().for_each(|t| push(t));
                } else if let Some(v) = rec.column(key) {
                    push(v);
                }
            }
            FilterOption { key, values }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::normalize;
    use serde_json::json;

    fn view(category: Category, id: &str, fields: serde_json::Value) -> AssetView {
        let mut row = json!({ "id": id, "created_at": "2024-05-01T12:00:00Z" });
        for (k, v) in fields.as_object().unwrap() {
            row[k] = v.clone();
        }
        normalize(&Record::from_row(category, row).unwrap())
    }

    #[test]
    fn test_search_matches_title_and_tags() {
        let sel = FilterSelections::default();
        let rel = Relations::default();
        let engine = FilterEngine::new(Scope::All, &sel, &rel);
        let v = view(Category::Music, "m1", json!({"nome": "Epic Rise", "tags": ["Trailer"]}));
        assert!(engine.matches(&v, ""));
        assert!(engine.matches(&v, "epic"));
        assert!(engine.matches(&v, "TRAILER"));
        assert!(engine.matches(&v, "rise trailer"));
        assert!(!engine.matches(&v, "calm"));
    }

    #[test]
    fn test_category_gate() {
        let sel = FilterSelections::default();
        let rel = Relations::default();
        let music = view(Category::Music, "m1", json!({"nome": "A"}));
        let sfx = view(Category::Sfx, "s1", json!({"nome": "A"}));
        let engine = FilterEngine::new(Scope::Category(Category::Music), &sel, &rel);
        assert!(engine.matches(&music, ""));
        assert!(!engine.matches(&sfx, ""));
    }

    #[test]
    fn test_emotion_filter_exact_match() {
        let mut sel = FilterSelections::default();
        sel.set(Category::Music, "emocao", "Urgência").unwrap();
        let rel = Relations::default();
        let engine = FilterEngine::new(Scope::Category(Category::Music), &sel, &rel);

        let hit = view(Category::Music, "1", json!({"emocao": "Urgência", "tags": ["calm"]}));
        let miss = view(Category::Music, "2", json!({"emocao": "urgência", "momento_vsl": "Urgência"}));
        let unset = view(Category::Music, "3", json!({"tags": ["Urgência"]}));
        assert!(engine.matches(&hit, ""));
        assert!(!engine.matches(&miss, ""));
        assert!(!engine.matches(&unset, ""));
    }

    #[test]
    fn test_tag_filter_is_membership() {
        let mut sel = FilterSelections::default();
        sel.set(Category::Veo3, "tags", "produto").unwrap();
        let rel = Relations::default();
        let engine = FilterEngine::new(Scope::Category(Category::Veo3), &sel, &rel);
        assert!(engine.matches(&view(Category::Veo3, "1", json!({"tags": ["a", "produto"]})), ""));
        assert!(!engine.matches(&view(Category::Veo3, "2", json!({"tags": ["produtos"]})), ""));
    }

    #[test]
    fn test_inactive_block_is_ignored_under_all_scope() {
        let mut sel = FilterSelections::default();
        sel.set(Category::Tiktok, "nicho", "Fitness").unwrap();
        let rel = Relations::default();
        let engine = FilterEngine::new(Scope::All, &sel, &rel);
        assert!(engine.matches(&view(Category::Tiktok, "1", json!({"nicho": "Beleza"})), ""));
    }

    #[test]
    fn test_deepfake_relation_toggles() {
        let voice = view(Category::VoiceClones, "v", json!({"voz_nome": "Adele"}));
        let original = view(Category::OriginalVideos, "o", json!({"nome_video": "x", "tags": ["beyonce"]}));
        let rel = Relations::from_assets(&[voice, original]);

        let adele = view(Category::Deepfakes, "d1", json!({"personagem": "Adele"}));
        let beyonce = view(Category::Deepfakes, "d2", json!({"personagem": "Beyonce"}));

        let mut sel = FilterSelections::default();
        assert!(sel.toggle(Category::Deepfakes, KEY_ONLY_WITH_VOICE).unwrap());
        let engine = FilterEngine::new(Scope::Category(Category::Deepfakes), &sel, &rel);
        assert!(engine.matches(&adele, ""));
        assert!(!engine.matches(&beyonce, ""));

        let mut sel = FilterSelections::default();
        sel.set(Category::Deepfakes, KEY_ONLY_WITH_ORIGINAL, "on").unwrap();
        let engine = FilterEngine::new(Scope::Category(Category::Deepfakes), &sel, &rel);
        assert!(!engine.matches(&adele, ""));
        assert!(engine.matches(&beyonce, ""));
    }

    #[test]
    fn test_unknown_filter_key_rejected() {
        let mut sel = FilterSelections::default();
        let err = sel.set(Category::SocialProof, "emocao", "x").unwrap_err();
        assert!(matches!(err, FilterError::UnknownFilter { .. }));
        assert_eq!(
            sel.set(Category::OriginalVideos, "nome_video", "x"),
            Err(FilterError::NoFilters(Category::OriginalVideos))
        );
        assert!(matches!(
            sel.set(Category::Deepfakes, KEY_ONLY_WITH_VOICE, "maybe"),
            Err(FilterError::InvalidToggle(_))
        ));
    }

    #[test]
    fn test_empty_value_clears_and_clear_category() {
        let mut sel = FilterSelections::default();
        sel.set(Category::UgcTestimonials, "genero", "MULHER").unwrap();
        assert!(sel.is_active(Category::UgcTestimonials));
        sel.set(Category::UgcTestimonials, "genero", "").unwrap();
        assert!(!sel.is_active(Category::UgcTestimonials));

        sel.set(Category::UgcTestimonials, "idade", "ADULTO").unwrap();
        sel.clear_category(Category::UgcTestimonials);
        assert_eq!(sel, FilterSelections::default());
    }

    #[test]
    fn test_filter_options_distinct_in_order() {
        let recs: Vec<Record> = [
            json!({"id": "1", "created_at": "2024-05-01T12:00:00Z", "emocao": "Alívio", "tags": ["a", "b"]}),
            json!({"id": "2", "created_at": "2024-05-01T12:00:00Z", "emocao": "Urgência", "tags": ["b"]}),
            json!({"id": "3", "created_at": "2024-05-01T12:00:00Z", "emocao": "Alívio", "momento_vsl": "CTA"}),
        ]
        .into_iter()
        .map(|r| Record::from_row(Category::Music, r).unwrap())
        .collect();

        let opts = filter_options(Category::Music, &recs);
        assert_eq!(opts.len(), 3);
        assert_eq!(opts[0].key, "momento_vsl");
        assert_eq!(opts[0].values, vec!["CTA"]);
        assert_eq!(opts[1].values, vec!["Alívio", "Urgência"]);
        assert_eq!(opts[2].values, vec!["a", "b"]);
        assert!(filter_options(Category::OriginalVideos, &recs).is_empty());
    }

    #[test]
    fn test_scope_parse() {
        assert_eq!("all".parse::<Scope>().unwrap(), Scope::All);
        assert_eq!("sfx".parse::<Scope>().unwrap(), Scope::Category(Category::Sfx));
    }
}
