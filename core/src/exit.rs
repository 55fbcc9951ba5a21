use serde::Serialize;

/// Maya could not parse its command line.
pub const EXIT_BAD_COMMAND_LINE: i32 = 206;
/// Renderer-reported error that jobs may opt to ignore.
pub const EXIT_IGNORABLE: i32 = 211;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ExitOutcome {
    Success { note: Option<String> },
    Failure { reason: String },
}

impl ExitOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, ExitOutcome::Success { .. })
    }
}

pub fn classify(exit_code: i32, ignore_211: bool) -> ExitOutcome {
    match exit_code {
        0 => ExitOutcome::Success { note: None },
        EXIT_BAD_COMMAND_LINE => ExitOutcome::Failure {
            reason: "Maya could not parse the command line. Two common causes for this are \
                     using the wrong project directory, or using a drive root ( i.e. \"c:\\\" ) \
                     as the output directory."
                .to_string(),
        },
        EXIT_IGNORABLE if ignore_211 => ExitOutcome::Success {
            note: Some(
                "Renderer reported an error with error code 211. This will be ignored, since \
                 the option to ignore it is specified in the Job Properties."
                    .to_string(),
            ),
        },
        code => ExitOutcome::Failure {
            reason: format!(
                "Renderer returned non-zero error code {code}. Check the renderer's output."
            ),
        },
    }
}
