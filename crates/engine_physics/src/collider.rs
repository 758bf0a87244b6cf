// crates/engine_physics/src/collider.rs
use engine_ecs::Entity;
use engine_shared::{Rect, Team};

/// One object's bounding box as registered for the current tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Collider {
    pub owner: Entity,
    pub rect: Rect,
    pub team: Team,
}

/// Which colliders an overlap query should report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TeamFilter {
    #[default]
    Any,
    Only(Team),
    HostileTo(Team),
}

impl TeamFilter {
    pub fn accepts(self, team: Team) -> bool {
        match self {
            TeamFilter::Any => true,
            TeamFilter::Only(t) => t == team,
            TeamFilter::HostileTo(t) => t.is_hostile_to(team),
        }
    }
}

/// Brute-force AABB test of `rect` against every collider but `exclude`'s.
pub fn overlapping<'a>(
    colliders: &'a [Collider],
    rect: &'a Rect,
    exclude: Entity,
    filter: TeamFilter,
) -> impl Iterator<Item = &'a Collider> + 'a {
    colliders
        .iter()
        .filter(move |c| c.owner != exclude && filter.accepts(c.team) && c.rect.overlaps(rect))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collider(index: u32, x: f32, team: Team) -> Collider {
        Collider {
            owner: Entity::new(index, 0),
            rect: Rect::new(x, 0.0, 10.0, 10.0),
            team,
        }
    }

    #[test]
    fn skips_self_and_disjoint_boxes() {
        let colliders = [
            collider(0, 0.0, Team::Player),
            collider(1, 5.0, Team::Enemy),
            collider(2, 50.0, Team::Enemy),
        ];
        let probe = Rect::new(0.0, 0.0, 10.0, 10.0);
        let hits: Vec<_> = overlapping(&colliders, &probe, Entity::new(0, 0), TeamFilter::Any)
            .map(|c| c.owner.index())
            .collect();
        assert_eq!(hits, vec![1]);
    }

    #[test]
    fn team_filters() {
        let colliders = [
            collider(0, 0.0, Team::Player),
            collider(1, 0.0, Team::Enemy),
            collider(2, 0.0, Team::None),
        ];
        let probe = Rect::new(0.0, 0.0, 10.0, 10.0);
        let count = |filter| overlapping(&colliders, &probe, Entity::NULL, filter).count();

        assert_eq!(count(TeamFilter::Any), 3);
        assert_eq!(count(TeamFilter::Only(Team::Enemy)), 1);
        assert_eq!(count(TeamFilter::HostileTo(Team::Player)), 1);
        assert_eq!(count(TeamFilter::HostileTo(Team::None)), 0);
    }
}
