//! Operation catalog for the Watson services.
//!
//! Each module exports the service's `INFO`, one `Operation` constant per
//! supported endpoint and the result models those operations decode into.
//! Operations whose answer has no fixed schema declare `ResponseKind::Object`;
//! audio, model files and CSV declare `ResponseKind::Bytes`.

pub mod assistant;
pub mod compare_comply;
pub mod discovery;
pub mod language_translator;
pub mod natural_language_classifier;
pub mod natural_language_understanding;
pub mod personality_insights;
pub mod speech_to_text;
pub mod text_to_speech;
pub mod tone_analyzer;
pub mod visual_recognition;

use crate::service::ServiceInfo;

/// Every service in the catalog.
pub const ALL: &[ServiceInfo] = &[
    assistant::INFO,
    compare_comply::INFO,
    discovery::INFO,
    language_translator::INFO,
    natural_language_classifier::INFO,
    natural_language_understanding::INFO,
    personality_insights::INFO,
    speech_to_text::INFO,
    text_to_speech::INFO,
    tone_analyzer::INFO,
    visual_recognition::INFO,
];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::operation::{Operation, ParamLocation};

    fn operations() -> Vec<Operation> {
        let mut all = Vec::new();
        all.extend_from_slice(assistant::OPERATIONS);
        all.extend_from_slice(compare_comply::OPERATIONS);
        all.extend_from_slice(discovery::OPERATIONS);
        all.extend_from_slice(language_translator::OPERATIONS);
        all.extend_from_slice(natural_language_classifier::OPERATIONS);
        all.extend_from_slice(natural_language_understanding::OPERATIONS);
        all.extend_from_slice(personality_insights::OPERATIONS);
        all.extend_from_slice(speech_to_text::OPERATIONS);
        all.extend_from_slice(text_to_speech::OPERATIONS);
        all.extend_from_slice(tone_analyzer::OPERATIONS);
        all.extend_from_slice(visual_recognition::OPERATIONS);
        all
    }

    #[test]
    fn service_names_are_unique() {
        let mut names: Vec<_> = ALL.iter().map(|info| info.name).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), ALL.len());
    }

    #[test]
    fn every_path_placeholder_is_a_required_path_param() {
        for op in operations() {
            for segment in op.path.split('/') {
                if let Some(name) = segment.strip_prefix('{').and_then(|s| s.strip_suffix('}')) {
                    let param = op
                        .param(name)
                        .unwrap_or_else(|| panic!("{}: no param for {{{name}}}", op.name));
                    assert_eq!(param.location, ParamLocation::Path, "{}", op.name);
                    assert!(param.required, "{}: {name} must be required", op.name);
                }
            }
        }
    }

    #[test]
    fn descriptors_do_not_mix_body_styles() {
        for op in operations() {
            let has = |location: ParamLocation| op.params.iter().any(|p| p.location == location);
            let form = has(ParamLocation::Form) || has(ParamLocation::ClassKeyedForm);
            let styles = [form, has(ParamLocation::BodyField), has(ParamLocation::Body)];
            assert!(
                styles.iter().filter(|present| **present).count() <= 1,
                "{} mixes body styles",
                op.name
            );
        }
    }

    #[test]
    fn parameter_names_are_unique_per_operation() {
        for op in operations() {
            let mut names: Vec<_> = op.params.iter().map(|p| p.name).collect();
            names.sort_unstable();
            let before = names.len();
            names.dedup();
            assert_eq!(before, names.len(), "{}", op.name);
        }
    }
}
