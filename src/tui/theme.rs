//! Ratatui styles shared by every screen

use crate::category::Category;
use ratatui::style::{Color, Modifier, Style};

pub const GOLD: Color = Color::Rgb(212, 175, 55);
pub const INK: Color = Color::Rgb(24, 24, 27);

pub struct Styles;

impl Styles {
    pub fn title() -> Style {
        Style::default().fg(GOLD).add_modifier(Modifier::BOLD)
    }

    pub fn header() -> Style {
        Style::default().fg(Color::White).add_modifier(Modifier::BOLD)
    }

    pub fn primary() -> Style {
        Style::default().fg(Color::White)
    }

    pub fn secondary() -> Style {
        Style::default().fg(Color::Gray)
    }

    pub fn muted() -> Style {
        Style::default().fg(Color::DarkGray)
    }

    pub fn emphasis() -> Style {
        Style::default().fg(GOLD).add_modifier(Modifier::BOLD)
    }

    pub fn success() -> Style {
        Style::default().fg(Color::Green)
    }

    pub fn warning() -> Style {
        Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
    }

    pub fn error() -> Style {
        Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)
    }

    pub fn border() -> Style {
        Style::default().fg(Color::DarkGray)
    }

    pub fn border_focused() -> Style {
        Style::default().fg(GOLD)
    }

    pub fn selected() -> Style {
        Style::default().fg(INK).bg(GOLD).add_modifier(Modifier::BOLD)
    }

    pub fn tag() -> Style {
        Style::default().fg(Color::Cyan)
    }

    pub fn input() -> Style {
        Style::default().fg(Color::White).add_modifier(Modifier::UNDERLINED)
    }
}

/// Accent colour per category, used for badges and headers.
pub fn category_style(category: Category) -> Style {
    let color = match category {
        Category::Deepfakes => Color::Magenta,
        Category::VoiceClones => Color::LightMagenta,
        Category::OriginalVideos => Color::LightBlue,
        Category::Tiktok => Color::LightRed,
        Category::Music => Color::LightGreen,
        Category::Sfx => Color::Green,
        Category::Veo3 => Color::LightCyan,
        Category::SocialProof => Color::Yellow,
        Category::UgcTestimonials => Color::LightYellow,
    };
    Style::default().fg(color)
}
