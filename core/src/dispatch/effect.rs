use serde::Serialize;

/// Outcome of handling one output line.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Effect {
    UpdateProgress(f64),
    UpdateStatus(String),
    /// Keep the line out of the task log.
    SuppressLine,
    /// The render must stop.
    Fail(String),
    LogWarning(String),
    LogInfo(String),
}

/// Effects produced by a single line, in application order. Empty means the
/// line matched nothing, or matched without changing anything.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Effects(Vec<Effect>);

impl Effects {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn one(effect: Effect) -> Self {
        Self(vec![effect])
    }

    pub fn push(&mut self, effect: Effect) {
        self.0.push(effect);
    }

    pub fn is_noop(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Effect> {
        self.0.iter()
    }

    pub fn failure(&self) -> Option<&str> {
        self.0.iter().find_map(|e| match e {
            Effect::Fail(reason) => Some(reason.as_str()),
            _ => None,
        })
    }

    pub fn is_suppressed(&self) -> bool {
        self.0.iter().any(|e| matches!(e, Effect::SuppressLine))
    }

    pub fn progress(&self) -> Option<f64> {
        self.0.iter().rev().find_map(|e| match e {
            Effect::UpdateProgress(p) => Some(*p),
            _ => None,
        })
    }

    pub fn status(&self) -> Option<&str> {
        self.0.iter().rev().find_map(|e| match e {
            Effect::UpdateStatus(s) => Some(s.as_str()),
            _ => None,
        })
    }
}

impl From<Effect> for Effects {
    fn from(effect: Effect) -> Self {
        Self::one(effect)
    }
}

impl Extend<Effect> for Effects {
    fn extend<I: IntoIterator<Item = Effect>>(&mut self, iter: I) {
        self.0.extend(iter);
    }
}

impl IntoIterator for Effects {
    type Item = Effect;
    type IntoIter = std::vec::IntoIter<Effect>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a Effects {
    type Item = &'a Effect;
    type IntoIter = std::slice::Iter<'a, Effect>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
