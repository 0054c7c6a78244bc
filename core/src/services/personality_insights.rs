//! Personality Insights v3.

use serde::Deserialize;

use crate::http::HttpMethod;
use crate::operation::{Operation, Param, ParamLocation::*};
use crate::response::ResponseKind;
use crate::service::ServiceInfo;

pub const INFO: ServiceInfo = ServiceInfo {
    name: "personality_insights",
    api_version: "v3",
    default_url: "https://api.us-south.personality-insights.watson.cloud.ibm.com",
    versioned: true,
};

const PROFILE_PARAMS: &[Param] = &[
    Param::required("content", Body),
    Param::optional("raw_scores", Query),
    Param::optional("csv_headers", Query),
    Param::optional("consumption_preferences", Query),
    Param::optional("Content-Language", Header),
    Param::optional("Accept-Language", Header),
];

/// Build a profile from text, HTML or a JSON content-items document.
pub const PROFILE: Operation = Operation {
    name: "profile",
    method: HttpMethod::Post,
    path: "/v3/profile",
    params: PROFILE_PARAMS,
    accept: Some("application/json"),
    response: ResponseKind::Model,
};

/// The same profile rendered as CSV.
pub const PROFILE_AS_CSV: Operation = Operation {
    name: "profile_as_csv",
    method: HttpMethod::Post,
    path: "/v3/profile",
    params: PROFILE_PARAMS,
    accept: Some("text/csv"),
    response: ResponseKind::Bytes,
};

pub const OPERATIONS: &[Operation] = &[PROFILE, PROFILE_AS_CSV];

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct Profile {
    pub processed_language: String,
    pub word_count: u64,
    pub word_count_message: Option<String>,
    #[serde(default)]
    pub personality: Vec<Trait>,
    #[serde(default)]
    pub needs: Vec<Trait>,
    #[serde(default)]
    pub values: Vec<Trait>,
    #[serde(default)]
    pub warnings: Vec<Warning>,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct Trait {
    pub trait_id: String,
    pub name: String,
    pub category: String,
    pub percentile: f64,
    pub raw_score: Option<f64>,
    pub significant: Option<bool>,
    #[serde(default)]
    pub children: Vec<Trait>,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct Warning {
    pub warning_id: String,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::operation::Arguments;

    #[test]
    fn csv_profile_asks_for_csv() {
        let args = Arguments::new().bytes("content", b"I like dogs".to_vec(), "text/plain;charset=utf-8");
        let request = PROFILE_AS_CSV.build_request(&args).unwrap();
        assert_eq!(request.header("Accept"), Some("text/csv"));
        assert_eq!(PROFILE_AS_CSV.response, ResponseKind::Bytes);
    }

    #[test]
    fn nested_traits_decode() {
        let profile: Profile = serde_json::from_str(
            r#"{"processed_language":"en","word_count":1500,
                "personality":[{"trait_id":"big5_openness","name":"Openness","category":"personality",
                "percentile":0.8,"children":[{"trait_id":"facet_adventurousness","name":"Adventurousness",
                "category":"personality","percentile":0.7}]}]}"#,
        )
        .unwrap();
        assert_eq!(profile.personality[0].children[0].name, "Adventurousness");
    }
}
