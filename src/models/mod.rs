pub mod content;
pub mod survey;

pub use content::{content_registry, ContentItem};
pub use survey::{survey_registry, SurveyAnswer};
