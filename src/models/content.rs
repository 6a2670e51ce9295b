use serde::{Deserialize, Serialize};

use crate::envelope::{RegistryError, TaggedUnion, TypeRegistry};

pub const APP_TYPE: &str = "healum.com/proto/go.micro.srv.static.App";
pub const RECIPE_TYPE: &str = "healum.com/proto/go.micro.srv.static.Recipe";
pub const VIDEO_TYPE: &str = "healum.com/proto/go.micro.srv.static.Video";
pub const ARTICLE_TYPE: &str = "healum.com/proto/go.micro.srv.static.Article";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct App {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recipe {
    pub title: String,
    #[serde(default)]
    pub ingredients: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub serves: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Video {
    pub title: String,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_secs: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Article {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    /// Optional pointer at another content item, itself a typed envelope.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub related: Option<Box<ContentItem>>,
}

/// The polymorphic "content item" slot: exactly one of the concrete content
/// shapes. The serde tag mirrors the wire discriminators so variants that
/// embed other content items round-trip through the same representation the
/// registry dispatches on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "@type")]
pub enum ContentItem {
    #[serde(rename = "healum.com/proto/go.micro.srv.static.App")]
    App(App),
    #[serde(rename = "healum.com/proto/go.micro.srv.static.Recipe")]
    Recipe(Recipe),
    #[serde(rename = "healum.com/proto/go.micro.srv.static.Video")]
    Video(Video),
    #[serde(rename = "healum.com/proto/go.micro.srv.static.Article")]
    Article(Article),
}

impl TaggedUnion for ContentItem {
    fn discriminator(&self) -> &'static str {
        match self {
            ContentItem::App(_) => APP_TYPE,
            ContentItem::Recipe(_) => RECIPE_TYPE,
            ContentItem::Video(_) => VIDEO_TYPE,
            ContentItem::Article(_) => ARTICLE_TYPE,
        }
    }
}

/// Build the content-item registry. Called once at startup; a duplicate
/// discriminator here is a configuration fault and aborts boot.
pub fn content_registry() -> Result<TypeRegistry<ContentItem>, RegistryError> {
    let mut registry = TypeRegistry::new();
    registry.register(APP_TYPE, ContentItem::App, |item| match item {
        ContentItem::App(v) => Some(v),
        _ => None,
    })?;
    registry.register(RECIPE_TYPE, ContentItem::Recipe, |item| match item {
        ContentItem::Recipe(v) => Some(v),
        _ => None,
    })?;
    registry.register(VIDEO_TYPE, ContentItem::Video, |item| match item {
        ContentItem::Video(v) => Some(v),
        _ => None,
    })?;
    registry.register(ARTICLE_TYPE, ContentItem::Article, |item| match item {
        ContentItem::Article(v) => Some(v),
        _ => None,
    })?;
    Ok(registry)
}
