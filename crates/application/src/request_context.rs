//! Request context carrying the acting account through the services
//!
//! There is no ambient "current user": every service operation that acts on
//! behalf of someone receives a `RequestContext` naming the acting account.
//!
//! # Examples
//!
//! ```
//! use application::RequestContext;
//! use domain::UserAccountId;
//!
//! let actor = UserAccountId::new();
//! let ctx = RequestContext::new(actor);
//!
//! assert_eq!(ctx.actor_id(), actor);
//! assert!(!ctx.request_id().is_nil());
//! ```

use chrono::{DateTime, NaiveDate, Utc};
use domain::UserAccountId;
use uuid::Uuid;

/// Acting account plus request metadata used for tracing
#[derive(Debug, Clone)]
pub struct RequestContext {
    actor_id: UserAccountId,
    request_id: Uuid,
    timestamp: DateTime<Utc>,
}

impl RequestContext {
    /// Create a context for the given acting account
    ///
    /// Generates a time-ordered request ID and captures the current time.
    #[must_use]
    pub fn new(actor_id: UserAccountId) -> Self {
        Self {
            actor_id,
            request_id: Uuid::now_v7(),
            timestamp: Utc::now(),
        }
    }

    /// Create a context correlated with an upstream request ID
    #[must_use]
    pub fn with_request_id(actor_id: UserAccountId, request_id: Uuid) -> Self {
        Self {
            actor_id,
            request_id,
            timestamp: Utc::now(),
        }
    }

    /// Pin the request time, used as "today" for age and birth-date checks
    #[must_use]
    pub fn at(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }

    #[must_use]
    pub const fn actor_id(&self) -> UserAccountId {
        self.actor_id
    }

    #[must_use]
    pub const fn request_id(&self) -> Uuid {
        self.request_id
    }

    #[must_use]
    pub const fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    /// Calendar date of the request in UTC
    #[must_use]
    pub fn today(&self) -> NaiveDate {
        self.timestamp.date_naive()
    }
}
