//! Ground detection from the contacts of the last completed step.

use glam::Vec2;

use crate::physics::{BodyHandle, ContactRecord, PhysicsWorld};

/// What the actor is standing on, if anything.
///
/// Rebuilt from scratch every time it is needed; never stored across ticks.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct GroundingResult {
    /// Surface normal pointing toward the actor (+Y is up).
    pub normal: Vec2,
    /// How far the actor is sunk into the surface.
    pub penetration: f32,
    /// Impulse the solver applied through this contact.
    pub impulse: Vec2,
    /// Contact point on the supporting body's surface.
    pub point: Vec2,
    /// The supporting body, or `None` when airborne.
    pub body: Option<BodyHandle>,
}

impl GroundingResult {
    pub fn is_grounded(&self) -> bool {
        self.body.is_some()
    }

    /// Jump permission: the surface slope |n.x / n.y| must be below the
    /// actor's current friction.
    ///
    /// Friction is a control signal here, not a material property: it is 0
    /// while a move key is held, so a moving actor cannot jump.
    pub fn allows_jump(&self, friction: f32) -> bool {
        self.body.is_some() && (self.normal.x / self.normal.y).abs() < friction
    }
}

/// Pick the most upward-facing contact touching `actor`.
///
/// Contacts are one step stale. Only normals with y > 0 qualify, so walls and
/// ceilings never count as ground; on equal normals the first contact wins.
pub fn analyze<W: PhysicsWorld>(world: &W, actor: BodyHandle) -> GroundingResult {
    ground_from_contacts(actor, world.contacts(actor))
}

pub fn ground_from_contacts(
    actor: BodyHandle,
    contacts: impl IntoIterator<Item = ContactRecord>,
) -> GroundingResult {
    let mut best = GroundingResult::default();
    for contact in contacts {
        // The engine's normal runs from body_a to body_b; flip it so it points
        // from the surface to the actor, and read the point off the surface.
        let (normal, surface, point) = if contact.body_b == actor {
            (contact.normal, contact.body_a, contact.point_a)
        } else if contact.body_a == actor {
            (-contact.normal, contact.body_b, contact.point_b)
        } else {
            continue;
        };

        if normal.y > best.normal.y {
            best = GroundingResult {
                normal,
                penetration: -contact.distance,
                impulse: contact.impulse,
                point,
                body: Some(surface),
            };
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use rapier2d::prelude::RigidBodyHandle;

    struct Bodies {
        actor: BodyHandle,
        others: Vec<BodyHandle>,
    }

    fn bodies(n: usize) -> Bodies {
        let handle = |i: usize| BodyHandle(RigidBodyHandle::from_raw_parts(i as u32, 0));
        Bodies {
            actor: handle(0),
            others: (1..=n).map(handle).collect(),
        }
    }

    /// Contact as seen from the surface's side: actor is `body_b`, so the
    /// engine normal already points at the actor.
    fn under(actor: BodyHandle, surface: BodyHandle, normal: Vec2) -> ContactRecord {
        ContactRecord {
            body_a: surface,
            body_b: actor,
            normal,
            distance: -0.25,
            point_a: Vec2::new(1.0, 2.0),
            point_b: Vec2::new(1.0, 1.75),
            impulse: Vec2::new(0.0, 15.0),
        }
    }

    #[test]
    fn no_contacts_means_airborne() {
        let b = bodies(0);
        let ground = ground_from_contacts(b.actor, Vec::new());
        assert!(!ground.is_grounded());
        assert!(!ground.allows_jump(100.0));
    }

    #[test]
    fn picks_most_upward_normal() {
        let b = bodies(3);
        let contacts = vec![
            under(b.actor, b.others[0], Vec2::new(0.0, 1.0)),
            under(b.actor, b.others[1], Vec2::new(0.1, 0.9)),
            under(b.actor, b.others[2], Vec2::new(-0.2, 0.3)),
        ];
        let ground = ground_from_contacts(b.actor, contacts);
        assert_eq!(ground.body, Some(b.others[0]));
        assert_eq!(ground.normal, Vec2::new(0.0, 1.0));
        assert_eq!(ground.penetration, 0.25);
        assert_eq!(ground.point, Vec2::new(1.0, 2.0));
        assert_eq!(ground.impulse, Vec2::new(0.0, 15.0));
    }

    #[test]
    fn ties_go_to_first_seen() {
        let b = bodies(2);
        let first = under(b.actor, b.others[0], Vec2::Y);
        let second = under(b.actor, b.others[1], Vec2::Y);

        let ground = ground_from_contacts(b.actor, vec![first, second]);
        assert_eq!(ground.body, Some(b.others[0]));

        let ground = ground_from_contacts(b.actor, vec![second, first]);
        assert_eq!(ground.body, Some(b.others[1]));
    }

    #[test]
    fn normal_is_flipped_when_actor_is_first_body() {
        let b = bodies(1);
        let contact = ContactRecord {
            body_a: b.actor,
            body_b: b.others[0],
            normal: Vec2::NEG_Y,
            distance: 0.0,
            point_a: Vec2::new(0.0, 64.0),
            point_b: Vec2::new(0.0, 63.5),
            impulse: Vec2::ZERO,
        };
        let ground = ground_from_contacts(b.actor, vec![contact]);
        assert_eq!(ground.normal, Vec2::Y);
        assert_eq!(ground.body, Some(b.others[0]));
        assert_eq!(ground.point, Vec2::new(0.0, 63.5));
    }

    #[test]
    fn walls_and_ceilings_are_not_ground() {
        let b = bodies(2);
        let contacts = vec![
            under(b.actor, b.others[0], Vec2::X),
            under(b.actor, b.others[1], Vec2::NEG_Y),
        ];
        assert!(!ground_from_contacts(b.actor, contacts).is_grounded());
    }

    #[test]
    fn unrelated_contacts_are_ignored() {
        let b = bodies(2);
        let contact = under(b.others[0], b.others[1], Vec2::Y);
        assert!(!ground_from_contacts(b.actor, vec![contact]).is_grounded());
    }

    #[test]
    fn jump_gate_follows_friction() {
        let b = bodies(1);
        let ground = ground_from_contacts(b.actor, vec![under(b.actor, b.others[0], Vec2::new(0.5, 0.9))]);
        // |0.5 / 0.9| = 0.556
        assert!(ground.allows_jump(1.0));
        assert!(!ground.allows_jump(0.4));
        assert!(!ground.allows_jump(0.0));
    }
}
