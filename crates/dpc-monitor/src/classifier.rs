//! # Event Classifier
//!
//! Maps a live event type to the profile rule it threatens, by matching
//! rule categories against a keyword table. The classifier only annotates;
//! compliance is decided by full-profile evaluation, never here.

use std::collections::BTreeMap;

use dpc_core::EventType;
use dpc_rules::{ComplianceProfile, ComplianceRule};

/// Event-type → rule-category keyword table.
#[derive(Debug, Clone)]
pub struct EventClassifier {
    keywords: BTreeMap<EventType, Vec<String>>,
}

impl EventClassifier {
    /// A classifier with the built-in keyword table.
    pub fn new() -> Self {
        let keywords = EventType::all()
            .iter()
            .map(|&t| {
                let words = default_keywords(t).iter().map(|w| (*w).to_string()).collect();
                (t, words)
            })
            .collect();
        Self { keywords }
    }

    /// Builder: replace the keywords for one event type.
    pub fn with_keywords(mut self, event_type: EventType, keywords: &[&str]) -> Self {
        self.keywords.insert(
            event_type,
            keywords.iter().map(|k| k.to_ascii_lowercase()).collect(),
        );
        self
    }

    /// Keywords matched for an event type.
    pub fn keywords(&self, event_type: EventType) -> &[String] {
        self.keywords.get(&event_type).map(Vec::as_slice).unwrap_or(&[])
    }

    /// The first rule in profile order whose category contains one of the
    /// event type's keywords (case-insensitive), or `None`.
    pub fn classify<'p>(
        &self,
        event_type: EventType,
        profile: &'p ComplianceProfile,
    ) -> Option<&'p ComplianceRule> {
        let keywords = self.keywords(event_type);
        if keywords.is_empty() {
            return None;
        }
        profile.rules.iter().find(|rule| {
            let category = rule.category.to_ascii_lowercase();
            keywords.iter().any(|k| category.contains(k.as_str()))
        })
    }
}

impl Default for EventClassifier {
    fn default() -> Self {
        Self::new()
    }
}

fn default_keywords(event_type: EventType) -> &'static [&'static str] {
    match event_type {
        EventType::Normal => &[],
        EventType::PositionReferenceLoss => &["position reference", "reference", "dgps", "hpr"],
        EventType::ThrusterFault => &["thruster", "propulsion"],
        EventType::PowerAlarm => &["power", "ups", "backup", "electrical"],
        EventType::GeneratorFailure => &["generator", "power", "electrical"],
        EventType::PositionExcursion => &["position", "watch circle", "operational limit"],
        EventType::SensorFault => &["sensor", "gyro", "mru", "wind"],
        EventType::CommunicationLoss => &["communication", "network", "control system"],
    }
}
