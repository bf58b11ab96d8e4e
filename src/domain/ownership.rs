use uuid::Uuid;

/// Owner resolution over the three resource kinds. Each variant carries the
/// owner id already resolved through the resource's parent chain: a sensor's
/// owner is its system's owner, a measurement's owner is its sensor's
/// system's owner.
///
/// Adding a resource kind means adding a variant here; the exhaustive match
/// in `owned_by` then fails to compile until the new kind is handled, so an
/// unhandled kind can never silently pass the check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceOwner {
    System { owner: Uuid },
    Sensor { system_owner: Uuid },
    Measurement { sensor_system_owner: Uuid },
}

impl ResourceOwner {
    /// True iff the resource is transitively owned by `identity`.
    pub fn owned_by(self, identity: Uuid) -> bool {
        match self {
            ResourceOwner::System { owner } => owner == identity,
            ResourceOwner::Sensor { system_owner } => system_owner == identity,
            ResourceOwner::Measurement { sensor_system_owner } => sensor_system_owner == identity,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn system_owner_must_match_identity() {
        let alice = Uuid::new_v4();
        let bob = Uuid::new_v4();
        assert!(ResourceOwner::System { owner: alice }.owned_by(alice));
        assert!(!ResourceOwner::System { owner: alice }.owned_by(bob));
    }

    #[test]
    fn sensor_resolves_through_system() {
        let alice = Uuid::new_v4();
        let bob = Uuid::new_v4();
        assert!(ResourceOwner::Sensor { system_owner: alice }.owned_by(alice));
        assert!(!ResourceOwner::Sensor { system_owner: alice }.owned_by(bob));
    }

    #[test]
    fn measurement_resolves_through_sensor_chain() {
        let alice = Uuid::new_v4();
        let bob = Uuid::new_v4();
        let owner = ResourceOwner::Measurement { sensor_system_owner: alice };
        assert!(owner.owned_by(alice));
        assert!(!owner.owned_by(bob));
    }
}
