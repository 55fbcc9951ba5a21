//! Classification of lines caught by the generic `Error:` / `Warning:` rule.
//!
//! The denylist is accumulated vendor knowledge and is kept as data in its
//! historical order. Disabled entries stay listed as comments.

/// A substring, or a pair of substrings that must both appear.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FatalMarker {
    Contains(&'static str),
    ContainsBoth(&'static str, &'static str),
}

impl FatalMarker {
    pub fn matches(&self, text: &str) -> bool {
        match self {
            FatalMarker::Contains(s) => text.contains(s),
            FatalMarker::ContainsBoth(a, b) => text.contains(a) && text.contains(b),
        }
    }
}

use FatalMarker::{Contains, ContainsBoth};

/// Always fatal, whatever the strictness setting.
pub const SCENE_LOAD_FAILURE: &str = "Cannot load scene";

pub const FATAL_MARKERS: &[FatalMarker] = &[
    Contains("could not get a license"),
    // Contains("Error: Cannot find procedure "),
    Contains("This scene does not have any renderable cameras"),
    ContainsBoth("Error: Camera", "does not exist"),
    Contains("Warning: The post-processing failed while attempting to rename file"),
    Contains("Error: Failed to open IFF file for reading"),
    Contains("Error: An exception has occurred, rendering aborted."),
    Contains("Cannot open project"),
    Contains("Could not open file. :"),
    Contains("Error reading file. :"),
    Contains("Error: Scene was not loaded properly, please check the scene name"),
    Contains("Error: Graphics card capabilities are insufficient for rendering."),
    // Contains("Error: No object matches name:"),
    ContainsBoth(
        "Error: The attribute ",
        "was locked in a referenced file, and cannot be unlocked.",
    ),
    Contains("Not enough storage is available to process this command."),
    Contains("Error: (Mayatomr) : mental ray has stopped with errors, see the log"),
    Contains(
        "Warning: (Mayatomr.Scene) : no render camera found, final scene will be incomplete and can't be rendered",
    ),
    Contains("mental ray: out of memory"),
    Contains("The specified module could not be found."),
    Contains("Error: (Mayatomr.Export) : mental ray startup failed with errors"),
    Contains(
        "Number of arguments on call to preLayerScript does not match number of parameters in procedure definition.",
    ),
    Contains("Error: rman Fatal:"),
    Contains("rman Error:"),
    Contains("Error: There was a fatal error rendering the scene."),
    Contains("Could not obtain a license"),
    Contains("Could not read V-Ray environment variable"),
    ContainsBoth("error 101003:", "can't create file"),
    Contains("can't create file (No such file or directory)"),
    Contains("Fatal Error:"),
    Contains("Error writing render region to raw image file."),
    Contains("Error: OctaneRender is not activated!"),
    Contains("Error: R12001"),
    // Contains("was not found on MAYA_PLUG_IN_PATH."),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TriagePolicy {
    pub strict_error_checking: bool,
    pub suppress_warnings: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Triage {
    Fail(String),
    Tolerate(String),
    Suppress,
}

pub fn triage(text: &str, policy: TriagePolicy) -> Triage {
    if text.contains(SCENE_LOAD_FAILURE) {
        return Triage::Fail(text.to_string());
    }

    if !policy.strict_error_checking {
        return Triage::Tolerate(format!(
            "Strict error checking off, ignoring the following error or warning: {text}"
        ));
    }

    if FATAL_MARKERS.iter().any(|m| m.matches(text)) {
        return Triage::Fail(format!(
            "Strict error checking on, caught the following error or warning.\n{text}\n\
             If this error message is unavoidable but not fatal, disable the Maya job \
             setting Strict Error Checking."
        ));
    }

    if policy.suppress_warnings && text.contains("Warning:") {
        return Triage::Suppress;
    }

    Triage::Tolerate(format!(
        "Strict error checking on, ignoring the following unrecognized error or warning: {text}"
    ))
}
