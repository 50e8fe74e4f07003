use serde::Deserialize;

use crate::app::error::ErrorCode;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    En,
    Ru,
}

/// Everything the renderer may need to put into words.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKey {
    Error(ErrorCode),
    Success,
    FeedsHeading,
    ItemsHeading,
    Untitled,
}

impl MessageKey {
    pub fn key(self) -> &'static str {
        match self {
            MessageKey::Error(code) => code.key(),
            MessageKey::Success => "success",
            MessageKey::FeedsHeading => "feeds",
            MessageKey::ItemsHeading => "posts",
            MessageKey::Untitled => "untitled",
        }
    }
}

/// Message lookup for one locale.
#[derive(Debug, Clone, Copy, Default)]
pub struct Catalog {
    locale: Locale,
}

impl Catalog {
    pub fn new(locale: Locale) -> Self {
        Self { locale }
    }

    pub fn locale(&self) -> Locale {
        self.locale
    }

    pub fn message(&self, key: MessageKey) -> &'static str {
        match self.locale {
            Locale::En => english(key),
            Locale::Ru => russian(key),
        }
    }
}

fn english(key: MessageKey) -> &'static str {
    match key {
        MessageKey::Error(ErrorCode::Required) => "Must not be empty",
        MessageKey::Error(ErrorCode::InvalidUrl) => "Link must be a valid URL",
        MessageKey::Error(ErrorCode::DuplicateUrl) => "RSS already exists",
        MessageKey::Error(ErrorCode::NetworkError) => {
            "Network error. Check your connection or try again later."
        }
        MessageKey::Error(ErrorCode::ParsingError) => "Resource does not contain valid RSS",
        MessageKey::Success => "RSS loaded successfully",
        MessageKey::FeedsHeading => "Feeds",
        MessageKey::ItemsHeading => "Posts",
        MessageKey::Untitled => "(Untitled)",
    }
}

fn russian(key: MessageKey) -> &'static str {
    match key {
        MessageKey::Error(ErrorCode::Required) => "Не должно быть пустым",
        MessageKey::Error(ErrorCode::InvalidUrl) => "Ссылка должна быть валидным URL",
        MessageKey::Error(ErrorCode::DuplicateUrl) => "RSS уже существует",
        MessageKey::Error(ErrorCode::NetworkError) => {
            "Ошибка сети. Проверьте подключение или попробуйте позже."
        }
        MessageKey::Error(ErrorCode::ParsingError) => "Ресурс не содержит валидный RSS",
        MessageKey::Success => "RSS успешно загружен",
        MessageKey::FeedsHeading => "Фиды",
        MessageKey::ItemsHeading => "Посты",
        MessageKey::Untitled => "(Без названия)",
    }
}
