use std::fmt;

use serde::Serialize;

/// Arguments passed to the `Render` executable, one token per argument.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CommandLine {
    args: Vec<String>,
}

impl CommandLine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn arg(&mut self, a: impl Into<String>) -> &mut Self {
        self.args.push(a.into());
        self
    }

    pub fn args<I, S>(&mut self, args: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// `flag value`, skipped entirely when `value` is blank.
    pub fn opt(&mut self, flag: &str, value: &str) -> &mut Self {
        let value = value.trim();
        if !value.is_empty() {
            self.arg(flag).arg(value);
        }
        self
    }

    pub fn as_slice(&self) -> &[String] {
        &self.args
    }

    pub fn into_vec(self) -> Vec<String> {
        self.args
    }

    pub fn len(&self) -> usize {
        self.args.len()
    }

    pub fn is_empty(&self) -> bool {
        self.args.is_empty()
    }

    /// Position of the first occurrence of `flag`.
    pub fn position(&self, flag: &str) -> Option<usize> {
        self.args.iter().position(|a| a == flag)
    }

    /// Value following the first occurrence of `flag`.
    pub fn value_of(&self, flag: &str) -> Option<&str> {
        let i = self.position(flag)?;
        self.args.get(i + 1).map(String::as_str)
    }
}

impl fmt::Display for CommandLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, a) in self.args.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            if a.is_empty() || a.contains(char::is_whitespace) {
                write!(f, "\"{a}\"")?;
            } else {
                f.write_str(a)?;
            }
        }
        Ok(())
    }
}

/// Split free-form user options on whitespace, honouring double quotes.
pub fn split_options(raw: &str) -> Vec<String> {
    let mut out = Vec::new();
    let mut cur = String::new();
    let mut in_quotes = false;
    let mut has_token = false;

    for c in raw.chars() {
        match c {
            '"' => {
                in_quotes = !in_quotes;
                has_token = true;
            }
            c if c.is_whitespace() && !in_quotes => {
                if has_token {
                    out.push(std::mem::take(&mut cur));
                    has_token = false;
                }
            }
            c => {
                cur.push(c);
                has_token = true;
            }
        }
    }
    if has_token {
        out.push(cur);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opt_skips_blank_values() {
        let mut cmd = CommandLine::new();
        cmd.opt("-x", "1920").opt("-y", "  ").arg("-r");
        assert_eq!(cmd.as_slice(), ["-x", "1920", "-r"]);
        assert_eq!(cmd.value_of("-x"), Some("1920"));
    }

    #[test]
    fn display_quotes_tokens_with_spaces() {
        let mut cmd = CommandLine::new();
        cmd.args(["-r", "sw", "-rd", "/renders/my shot"]);
        assert_eq!(cmd.to_string(), "-r sw -rd \"/renders/my shot\"");
    }

    #[test]
    fn split_options_respects_quotes() {
        assert_eq!(
            split_options(r#"-preRender "setAttr a 1" -x 10"#),
            vec!["-preRender", "setAttr a 1", "-x", "10"]
        );
        assert_eq!(split_options(r#"-im """#), vec!["-im", ""]);
        assert!(split_options("   ").is_empty());
    }
}
