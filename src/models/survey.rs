use serde::{Deserialize, Serialize};

use crate::envelope::{RegistryError, TaggedUnion, TypeRegistry};

pub const TEXT_ANSWER_TYPE: &str = "healum.com/proto/go.micro.srv.survey.TextAnswer";
pub const CONTACT_ANSWER_TYPE: &str = "healum.com/proto/go.micro.srv.survey.ContactAnswer";
pub const CHOICE_ANSWER_TYPE: &str = "healum.com/proto/go.micro.srv.survey.ChoiceAnswer";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextAnswer {
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContactAnswer {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChoiceAnswer {
    pub selections: Vec<String>,
}

/// The polymorphic "survey answer" slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "@type")]
pub enum SurveyAnswer {
    #[serde(rename = "healum.com/proto/go.micro.srv.survey.TextAnswer")]
    Text(TextAnswer),
    #[serde(rename = "healum.com/proto/go.micro.srv.survey.ContactAnswer")]
    Contact(ContactAnswer),
    #[serde(rename = "healum.com/proto/go.micro.srv.survey.ChoiceAnswer")]
    Choice(ChoiceAnswer),
}

impl TaggedUnion for SurveyAnswer {
    fn discriminator(&self) -> &'static str {
        match self {
            SurveyAnswer::Text(_) => TEXT_ANSWER_TYPE,
            SurveyAnswer::Contact(_) => CONTACT_ANSWER_TYPE,
            SurveyAnswer::Choice(_) => CHOICE_ANSWER_TYPE,
        }
    }
}

/// Build the survey-answer registry. Called once at startup.
pub fn survey_registry() -> Result<TypeRegistry<SurveyAnswer>, RegistryError> {
    let mut registry = TypeRegistry::new();
    registry.register(TEXT_ANSWER_TYPE, SurveyAnswer::Text, |answer| match answer {
        SurveyAnswer::Text(v) => Some(v),
        _ => None,
    })?;
    registry.register(CONTACT_ANSWER_TYPE, SurveyAnswer::Contact, |answer| match answer {
        SurveyAnswer::Contact(v) => Some(v),
        _ => None,
    })?;
    registry.register(CHOICE_ANSWER_TYPE, SurveyAnswer::Choice, |answer| match answer {
        SurveyAnswer::Choice(v) => Some(v),
        _ => None,
    })?;
    Ok(registry)
}
