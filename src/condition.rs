//! Status conditions.
//!
//! A [`Conditions`] set keeps at most one [`Condition`] per type, in the order
//! the types were first set. Setting a condition that carries the same
//! type, status, reason and message as the stored one is a no-op, so callers
//! can report state on every reconcile without churning transition times.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

pub const STATUS_TRUE: &str = "True";
pub const STATUS_FALSE: &str = "False";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Condition {
    #[serde(rename = "type")]
    pub condition_type: String,
    pub status: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub reason: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub message: String,
    pub last_transition_time: DateTime<Utc>,
}

impl Condition {
    pub fn new(condition_type: impl Into<String>, status: impl Into<String>) -> Self {
        Self {
            condition_type: condition_type.into(),
            status: status.into(),
            reason: String::new(),
            message: String::new(),
            last_transition_time: Utc::now(),
        }
    }

    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = reason.into();
        self
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Compares everything except the transition time.
    pub fn same_state(&self, other: &Condition) -> bool {
        self.condition_type == other.condition_type
            && self.status == other.status
            && self.reason == other.reason
            && self.message == other.message
    }

    /// Takes `other`'s fields and refreshes the transition time, unless the
    /// two already describe the same state.
    pub fn update(&mut self, other: Condition) {
        if self.same_state(&other) {
            return;
        }
        self.condition_type = other.condition_type;
        self.status = other.status;
        self.reason = other.reason;
        self.message = other.message;
        self.last_transition_time = next_transition_time(self.last_transition_time);
    }
}

// Never hand out a time at or before the previous one, even if the clock
// stalls or steps back.
fn next_transition_time(previous: DateTime<Utc>) -> DateTime<Utc> {
    let now = Utc::now();
    if now > previous {
        now
    } else {
        previous + Duration::nanoseconds(1)
    }
}

/// Ordered collection of conditions, at most one per type.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Conditions {
    #[serde(default)]
    pub conditions: Vec<Condition>,
}

impl Conditions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn find_condition(&self, condition_type: &str) -> Option<(usize, &Condition)> {
        self.conditions
            .iter()
            .enumerate()
            .find(|(_, c)| c.condition_type == condition_type)
    }

    pub fn find_condition_mut(&mut self, condition_type: &str) -> Option<(usize, &mut Condition)> {
        self.conditions
            .iter_mut()
            .enumerate()
            .find(|(_, c)| c.condition_type == condition_type)
    }

    /// Adds `condition`, or merges it into the stored one of the same type.
    pub fn set_condition(&mut self, mut condition: Condition) {
        match self.find_condition_mut(&condition.condition_type) {
            Some((_, found)) => found.update(condition),
            None => {
                condition.last_transition_time = Utc::now();
                self.conditions.push(condition);
            }
        }
    }

    /// Removes the named types. Unknown types are ignored.
    pub fn delete_condition(&mut self, condition_types: &[&str]) {
        for condition_type in condition_types {
            if let Some((index, _)) = self.find_condition(condition_type) {
                self.conditions.remove(index);
            }
        }
    }

    pub fn has_condition(&self, condition_type: &str) -> bool {
        self.find_condition(condition_type).is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    pub fn len(&self) -> usize {
        self.conditions.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Condition> {
        self.conditions.iter()
    }
}

#[cfg(test)]
mod tests;
