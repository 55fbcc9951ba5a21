mod rules;
mod triage;

pub use rules::{Action, MatchRule, RuleSet};
pub use triage::{triage, FatalMarker, Triage, TriagePolicy, FATAL_MARKERS, SCENE_LOAD_FAILURE};
