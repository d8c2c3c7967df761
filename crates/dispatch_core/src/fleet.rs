//! Fleet snapshot: a deterministic view of the Idle fleet for policy input.

use bevy_ecs::prelude::Entity;

use crate::ecs::{Ambulance, AmbulanceState, UnitId};
use crate::errors::EngineError;
use crate::network::LocationId;
use crate::routing::TravelTimeProvider;

/// One Idle unit, annotated with the travel time to a call origin.
#[derive(Debug, Clone)]
pub struct UnitCandidate {
    pub entity: Entity,
    pub unit_id: UnitId,
    pub location: LocationId,
    /// `None` when the origin is unreachable from the unit's location.
    pub travel_ms: Option<u64>,
}

/// Snapshot of the Idle fleet at one dispatch attempt, sorted by unit id.
#[derive(Debug, Clone, Default)]
pub struct FleetSnapshot {
    pub units: Vec<UnitCandidate>,
}

impl FleetSnapshot {
    /// Build a snapshot for a call at `origin`. Units may arrive in any
    /// iteration order; the snapshot sorts by unit id so selection never
    /// depends on query order.
    pub fn collect<'a, I>(
        units: I,
        origin: LocationId,
        travel: &dyn TravelTimeProvider,
    ) -> Result<Self, EngineError>
    where
        I: IntoIterator<Item = (Entity, &'a UnitId, &'a Ambulance)>,
    {
        let mut out = Vec::new();
        for (entity, unit_id, ambulance) in units {
            if ambulance.state != AmbulanceState::Idle {
                continue;
            }
            let travel_ms = travel.travel_time(ambulance.location, origin)?;
            out.push(UnitCandidate {
                entity,
                unit_id: unit_id.clone(),
                location: ambulance.location,
                travel_ms,
            });
        }
        out.sort_by(|a, b| a.unit_id.cmp(&b.unit_id));
        Ok(Self { units: out })
    }

    /// Reachable candidates ordered by ascending travel time, ties broken by
    /// unit id.
    pub fn ranked(&self) -> Vec<&UnitCandidate> {
        let mut reachable: Vec<&UnitCandidate> = self
            .units
            .iter()
            .filter(|unit| unit.travel_ms.is_some())
            .collect();
        reachable.sort_by(|a, b| {
            a.travel_ms
                .cmp(&b.travel_ms)
                .then_with(|| a.unit_id.cmp(&b.unit_id))
        });
        reachable
    }

    pub fn get(&self, entity: Entity) -> Option<&UnitCandidate> {
        self.units.iter().find(|unit| unit.entity == entity)
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::NetworkError;

    /// Provider with a fixed travel time per origin, for snapshot tests.
    struct FixedTravel;

    impl TravelTimeProvider for FixedTravel {
        fn travel_time(
            &self,
            from: LocationId,
            _to: LocationId,
        ) -> Result<Option<u64>, NetworkError> {
            match from.0 {
                0 => Ok(Some(300_000)),
                1 => Ok(Some(60_000)),
                2 => Ok(Some(60_000)),
                _ => Ok(None),
            }
        }
    }

    fn unit_at(location: u32) -> Ambulance {
        Ambulance::new(LocationId(location))
    }

    #[test]
    fn ranked_orders_by_travel_then_unit_id() {
        let far = unit_at(0);
        let near_b = unit_at(1);
        let near_a = unit_at(2);
        let units = vec![
            (Entity::from_raw(10), UnitId("U3".into()), &far),
            (Entity::from_raw(11), UnitId("U2".into()), &near_b),
            (Entity::from_raw(12), UnitId("U1".into()), &near_a),
        ];
        let snapshot = FleetSnapshot::collect(
            units.iter().map(|(e, id, a)| (*e, id, *a)),
            LocationId(9),
            &FixedTravel,
        )
        .expect("snapshot");

        let ranked: Vec<&str> = snapshot
            .ranked()
            .iter()
            .map(|u| u.unit_id.0.as_str())
            .collect();
        // The two 60s units tie; U1 beats U2 on id, and the 300s unit is last.
        assert_eq!(ranked, vec!["U1", "U2", "U3"]);
    }

    #[test]
    fn non_idle_and_unreachable_units_are_filtered() {
        let mut busy = unit_at(1);
        busy.transition_to(AmbulanceState::Dispatched).expect("dispatch");
        let stranded = unit_at(7);
        let idle = unit_at(0);
        let units = vec![
            (Entity::from_raw(1), UnitId("U1".into()), &busy),
            (Entity::from_raw(2), UnitId("U2".into()), &stranded),
            (Entity::from_raw(3), UnitId("U3".into()), &idle),
        ];
        let snapshot = FleetSnapshot::collect(
            units.iter().map(|(e, id, a)| (*e, id, *a)),
            LocationId(9),
            &FixedTravel,
        )
        .expect("snapshot");

        // Busy unit never enters the snapshot; the stranded one stays in the
        // snapshot but out of the ranking.
        assert_eq!(snapshot.units.len(), 2);
        assert!(snapshot.get(Entity::from_raw(1)).is_none());
        let ranked = snapshot.ranked();
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].unit_id.0, "U3");
    }
}
