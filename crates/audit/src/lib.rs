// Copyright (C) 2026 PlanMorph Software
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all
)]

use planmorph_domain::{DomainError, EntityKind};
use serde::Serialize;
use serde_json::Value;
use std::str::FromStr;

/// The kind of party that performed an action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ActorType {
    /// A member of the public, identified only by what they submitted.
    Client,
    /// An authenticated staff account.
    Admin,
    /// The backend itself (bootstrap, maintenance).
    System,
}

impl ActorType {
    /// Returns the string representation used for persistence.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Client => "client",
            Self::Admin => "admin",
            Self::System => "system",
        }
    }
}

impl FromStr for ActorType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "client" => Ok(Self::Client),
            "admin" => Ok(Self::Admin),
            "system" => Ok(Self::System),
            _ => Err(DomainError::InvalidValue {
                field: "actor_type",
                value: s.to_string(),
            }),
        }
    }
}

/// Represents the party performing an action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Actor {
    /// The kind of party.
    pub actor_type: ActorType,
    /// The admin account id, when the actor is an admin.
    pub id: Option<i64>,
    /// A display name or email for the activity feed.
    pub name: Option<String>,
}

impl Actor {
    /// Creates a client actor.
    ///
    /// # Arguments
    ///
    /// * `name` - The name the client gave, if any
    #[must_use]
    pub const fn client(name: Option<String>) -> Self {
        Self {
            actor_type: ActorType::Client,
            id: None,
            name,
        }
    }

    /// Creates an admin actor.
    ///
    /// # Arguments
    ///
    /// * `id` - The admin account id
    /// * `name` - The admin's email or display name
    #[must_use]
    pub const fn admin(id: i64, name: String) -> Self {
        Self {
            actor_type: ActorType::Admin,
            id: Some(id),
            name: Some(name),
        }
    }

    /// Creates the system actor.
    #[must_use]
    pub const fn system() -> Self {
        Self {
            actor_type: ActorType::System,
            id: None,
            name: None,
        }
    }
}

/// What happened to an entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityAction {
    Created,
    Updated,
    MessageAdded,
}

impl ActivityAction {
    /// Returns the string representation used for persistence.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Updated => "updated",
            Self::MessageAdded => "message_added",
        }
    }
}

impl FromStr for ActivityAction {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "created" => Ok(Self::Created),
            "updated" => Ok(Self::Updated),
            "message_added" => Ok(Self::MessageAdded),
            _ => Err(DomainError::InvalidValue {
                field: "action",
                value: s.to_string(),
            }),
        }
    }
}

/// An activity-log entry awaiting persistence.
///
/// Every state-affecting operation produces exactly one event, written in
/// the same transaction as the mutation it describes. The entity id is
/// bound at write time because newly created rows do not have one yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivityEvent {
    /// The kind of entity affected.
    pub entity: EntityKind,
    /// What happened.
    pub action: ActivityAction,
    /// Who did it.
    pub actor: Actor,
    /// Structured context: patched fields, status change, plan snapshot.
    pub details: Option<Value>,
}

impl ActivityEvent {
    /// Creates a new `ActivityEvent`.
    ///
    /// # Arguments
    ///
    /// * `entity` - The kind of entity affected
    /// * `action` - What happened
    /// * `actor` - Who did it
    /// * `details` - Optional structured context
    #[must_use]
    pub const fn new(
        entity: EntityKind,
        action: ActivityAction,
        actor: Actor,
        details: Option<Value>,
    ) -> Self {
        Self {
            entity,
            action,
            actor,
            details,
        }
    }
}

/// A stored activity-log entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActivityRecord {
    pub id: i64,
    pub entity_kind: EntityKind,
    pub entity_id: i64,
    pub action: ActivityAction,
    pub actor: Actor,
    pub details: Option<Value>,
    pub created_at: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_actor_constructors() {
        let client: Actor = Actor::client(Some(String::from("Jane Doe")));
        assert_eq!(client.actor_type, ActorType::Client);
        assert_eq!(client.id, None);
        assert_eq!(client.name.as_deref(), Some("Jane Doe"));

        let admin: Actor = Actor::admin(7, String::from("ops@planmorph.software"));
        assert_eq!(admin.actor_type, ActorType::Admin);
        assert_eq!(admin.id, Some(7));

        let system: Actor = Actor::system();
        assert_eq!(system.actor_type, ActorType::System);
        assert_eq!(system.name, None);
    }

    #[test]
    fn test_actor_type_strings_parse_back() {
        for actor_type in [ActorType::Client, ActorType::Admin, ActorType::System] {
            let parsed: Result<ActorType, DomainError> = actor_type.as_str().parse();
            assert_eq!(parsed, Ok(actor_type));
        }
        assert!("robot".parse::<ActorType>().is_err());
    }

    #[test]
    fn test_activity_action_strings_parse_back() {
        for action in [
            ActivityAction::Created,
            ActivityAction::Updated,
            ActivityAction::MessageAdded,
        ] {
            let parsed: Result<ActivityAction, DomainError> = action.as_str().parse();
            assert_eq!(parsed, Ok(action));
        }
        assert!("deleted".parse::<ActivityAction>().is_err());
    }

    #[test]
    fn test_activity_event_carries_details() {
        let event: ActivityEvent = ActivityEvent::new(
            EntityKind::SupportTicket,
            ActivityAction::Created,
            Actor::client(Some(String::from("Jane Doe"))),
            Some(json!({"category": "bug", "plan": "basic"})),
        );

        assert_eq!(event.entity, EntityKind::SupportTicket);
        assert_eq!(event.action, ActivityAction::Created);
        assert_eq!(
            event.details.as_ref().and_then(|d| d.get("plan")),
            Some(&json!("basic"))
        );
    }

    #[test]
    fn test_activity_event_equality() {
        let make = || {
            ActivityEvent::new(
                EntityKind::ProjectRequest,
                ActivityAction::Updated,
                Actor::admin(1, String::from("ops@planmorph.software")),
                None,
            )
        };
        assert_eq!(make(), make());
    }
}
