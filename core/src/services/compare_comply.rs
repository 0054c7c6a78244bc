//! Compare and Comply v1.

use serde::Deserialize;
use serde_json::Value;

use crate::http::HttpMethod;
use crate::operation::{Operation, Param, ParamLocation::*};
use crate::response::ResponseKind;
use crate::service::ServiceInfo;

pub const INFO: ServiceInfo = ServiceInfo {
    name: "compare-comply",
    api_version: "v1",
    default_url: "https://api.us-south.compare-comply.watson.cloud.ibm.com",
    versioned: true,
};

pub const CONVERT_TO_HTML: Operation = Operation {
    name: "convert_to_html",
    method: HttpMethod::Post,
    path: "/v1/html_conversion",
    params: &[
        Param::required("file", Form),
        Param::optional("model", Query),
    ],
    accept: Some("application/json"),
    response: ResponseKind::Model,
};

pub const CLASSIFY_ELEMENTS: Operation = Operation {
    name: "classify_elements",
    method: HttpMethod::Post,
    path: "/v1/element_classification",
    params: &[
        Param::required("file", Form),
        Param::optional("model", Query),
    ],
    accept: Some("application/json"),
    response: ResponseKind::Object,
};

pub const COMPARE_DOCUMENTS: Operation = Operation {
    name: "compare_documents",
    method: HttpMethod::Post,
    path: "/v1/comparison",
    params: &[
        Param::required("file_1", Form),
        Param::required("file_2", Form),
        Param::optional("file_1_label", Query),
        Param::optional("file_2_label", Query),
        Param::optional("model", Query),
    ],
    accept: Some("application/json"),
    response: ResponseKind::Model,
};

pub const OPERATIONS: &[Operation] = &[CONVERT_TO_HTML, CLASSIFY_ELEMENTS, COMPARE_DOCUMENTS];

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct HtmlReturn {
    pub num_pages: Option<String>,
    pub author: Option<String>,
    pub publication_date: Option<String>,
    pub title: Option<String>,
    pub html: Option<String>,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct CompareReturn {
    pub model_id: Option<String>,
    pub model_version: Option<String>,
    #[serde(default)]
    pub documents: Vec<Document>,
    #[serde(default)]
    pub aligned_elements: Vec<Value>,
    #[serde(default)]
    pub unaligned_elements: Vec<Value>,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct Document {
    pub title: Option<String>,
    pub html: Option<String>,
    pub hash: Option<String>,
    pub label: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::multipart::FormPart;
    use crate::operation::Arguments;

    #[test]
    fn comparison_sends_both_files_and_labels() {
        let args = Arguments::new()
            .file("file_1", FormPart::file("", "contract_A.pdf", b"%PDF-A".to_vec()))
            .file("file_2", FormPart::file("", "contract_B.pdf", b"%PDF-B".to_vec()))
            .text("file_1_label", "before")
            .text("file_2_label", "after");
        let request = COMPARE_DOCUMENTS.build_request(&args).unwrap();
        let form = request.form().unwrap();
        assert_eq!(form.get("file_1").unwrap().filename.as_deref(), Some("contract_A.pdf"));
        assert_eq!(form.get("file_2").unwrap().content, b"%PDF-B");
        assert_eq!(request.query_value("file_1_label"), Some("before"));
    }
}
