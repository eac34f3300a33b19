//! Pre-built Test Fixtures
//!
//! Ready-to-use, predictable values for unit and integration tests.

use chrono::{DateTime, Duration, TimeZone, Utc};
use core_kernel::{ManualClock, UserId};
use domain_claims::{Actor, Role};
use domain_food::GeoLocation;

/// Fixture for temporal test data
pub struct TemporalFixtures;

impl TemporalFixtures {
    /// The instant tests start from
    pub fn start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 9, 14, 17, 0, 0).single().unwrap_or_else(Utc::now)
    }

    /// A typical expiry a few hours after `start`
    pub fn evening_expiry() -> DateTime<Utc> {
        Self::start() + Duration::hours(5)
    }

    /// A clock frozen at `start`
    pub fn clock() -> ManualClock {
        ManualClock::at(Self::start())
    }
}

/// Fixture for pickup locations
pub struct LocationFixtures;

impl LocationFixtures {
    pub fn community_kitchen() -> GeoLocation {
        GeoLocation::new(19.0760, 72.8777)
    }
}

/// Fixture for callers
pub struct ActorFixtures;

impl ActorFixtures {
    /// A fresh donor
    pub fn donor() -> Actor {
        Actor::new(UserId::new(), [Role::Donor])
    }

    /// A fresh receiver
    pub fn receiver() -> Actor {
        Actor::new(UserId::new(), [Role::Receiver])
    }

    /// A caller holding both roles
    pub fn donor_and_receiver() -> Actor {
        Actor::new(UserId::new(), [Role::Donor, Role::Receiver])
    }
}
