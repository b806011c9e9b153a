// Copyright (C) 2026 PlanMorph Software
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The generic "entity + transition table + activity log" shape shared by
//! every lifecycle.

use crate::error::CoreError;
use planmorph_audit::{ActivityAction, ActivityEvent, Actor};
use planmorph_domain::{StatusMachine, TransitionTrigger};
use planmorph_notify::PendingDelivery;
use serde_json::{Map, Value};

/// A validated status change, ready to be persisted.
///
/// Applying a transition is the caller's job: write `to` together with any
/// derived fields and `activity` in one transaction, then hand `delivery`
/// to the dispatcher once the transaction has committed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition<S: StatusMachine> {
    /// The status before the change.
    pub from: S,
    /// The status after the change.
    pub to: S,
    /// What caused the change.
    pub trigger: TransitionTrigger,
    /// The activity-log entry to write alongside the change.
    pub activity: ActivityEvent,
    /// Notifications to send after commit.
    pub delivery: PendingDelivery,
}

impl<S: StatusMachine> Transition<S> {
    /// Validates `from -> to` against the machine's table and builds the
    /// transition.
    ///
    /// The activity entry records the trigger and both statuses. It carries
    /// no notifications until [`Self::with_delivery`] is called.
    ///
    /// # Arguments
    ///
    /// * `from` - The current status
    /// * `to` - The requested status
    /// * `trigger` - What is causing the change
    /// * `actor` - Who is causing it
    ///
    /// # Errors
    ///
    /// Returns an error if the table does not permit the change.
    pub fn plan(from: S, to: S, trigger: TransitionTrigger, actor: Actor) -> Result<Self, CoreError> {
        from.validate_transition(to, trigger)?;

        let mut details: Map<String, Value> = Map::new();
        details.insert(String::from("trigger"), Value::from(trigger.as_str()));
        if from != to {
            details.insert(String::from("from"), Value::from(from.as_str()));
            details.insert(String::from("to"), Value::from(to.as_str()));
        }

        Ok(Self {
            from,
            to,
            trigger,
            activity: ActivityEvent::new(
                S::ENTITY,
                ActivityAction::Updated,
                actor,
                Some(Value::Object(details)),
            ),
            delivery: PendingDelivery::none(),
        })
    }

    /// Moves a planned transition onto the status actually stored.
    ///
    /// Used when the entity changed between planning and writing. The
    /// trigger, actor, extra details and notifications are kept; the table
    /// is consulted again for `current -> to`.
    ///
    /// # Errors
    ///
    /// Returns an error if the table does not permit the change from
    /// `current`.
    pub fn rebase(mut self, current: S, to: S) -> Result<Self, CoreError> {
        current.validate_transition(to, self.trigger)?;

        if let Some(Value::Object(details)) = self.activity.details.as_mut() {
            details.remove("from");
            details.remove("to");
            if current != to {
                details.insert(String::from("from"), Value::from(current.as_str()));
                details.insert(String::from("to"), Value::from(to.as_str()));
            }
        }
        self.from = current;
        self.to = to;
        Ok(self)
    }

    /// Returns true if the status actually changes.
    #[must_use]
    pub fn changes_status(&self) -> bool {
        self.from != self.to
    }

    /// Attaches the notifications to send after commit.
    #[must_use]
    pub fn with_delivery(mut self, delivery: PendingDelivery) -> Self {
        self.delivery = delivery;
        self
    }

    /// Marks the activity entry as a message rather than a plain update.
    #[must_use]
    pub fn as_message(mut self) -> Self {
        self.activity.action = ActivityAction::MessageAdded;
        self
    }

    /// Adds a key to the activity details.
    #[must_use]
    pub fn with_detail(mut self, key: &str, value: impl Into<Value>) -> Self {
        if let Some(Value::Object(details)) = self.activity.details.as_mut() {
            details.insert(key.to_string(), value.into());
        }
        self
    }
}

/// Builds the activity entry for a newly created entity.
///
/// # Arguments
///
/// * `actor` - Who created it
/// * `details` - Extra context such as derived fields
#[must_use]
pub fn creation_event<S: StatusMachine>(actor: Actor, details: Map<String, Value>) -> ActivityEvent {
    let mut details: Map<String, Value> = details;
    details.insert(String::from("status"), Value::from(S::initial().as_str()));
    ActivityEvent::new(
        S::ENTITY,
        ActivityAction::Created,
        actor,
        Some(Value::Object(details)),
    )
}
