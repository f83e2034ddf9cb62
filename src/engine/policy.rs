use rand::{Rng, RngCore};

use crate::types::{Direction, DirectionSet};

/// Decides where an entity goes when it reaches a cell center.
///
/// `open` always contains [`Direction::None`]. The answer must be a member of
/// `open`; the movement resolver treats anything else as a contract violation.
pub trait CrossroadPolicy {
    fn choose(&mut self, open: DirectionSet) -> Direction;
}

/// Intended direction first, then straight on, else stop at the center.
#[derive(Clone, Copy, Debug)]
pub struct PlayerPolicy {
    intended: Direction,
    current: Direction,
}

impl PlayerPolicy {
    pub fn new(intended: Direction, current: Direction) -> Self {
        Self { intended, current }
    }
}

impl CrossroadPolicy for PlayerPolicy {
    fn choose(&mut self, open: DirectionSet) -> Direction {
        if open.contains(self.intended) {
            return self.intended;
        }
        if open.contains(self.current) {
            return self.current;
        }
        Direction::None
    }
}

/// New movement direction to apply right away when the player's intent
/// changes: a full reversal or a start from standstill does not wait for the
/// next crossroad.
pub fn immediate_turn(current: Direction, intended: Direction) -> Option<Direction> {
    if current.is_stationary() || current.opposite() == Some(intended) {
        Some(intended)
    } else {
        None
    }
}

/// Corridors are followed; at real junctions a random exit is taken, never
/// the way back and never standing still.
#[derive(Debug)]
pub struct GhostPolicy<'a, R: RngCore> {
    current: Direction,
    rng: &'a mut R,
}

impl<'a, R: RngCore> GhostPolicy<'a, R> {
    pub fn new(current: Direction, rng: &'a mut R) -> Self {
        Self { current, rng }
    }
}

impl<R: RngCore> CrossroadPolicy for GhostPolicy<'_, R> {
    fn choose(&mut self, open: DirectionSet) -> Direction {
        if open.len() == 2 && open.contains(Direction::None) {
            return open
                .iter()
                .find(|dir| !dir.is_stationary())
                .unwrap_or(Direction::None);
        }

        let mut exits = open;
        exits.remove(Direction::None);
        if let Some(reverse) = self.current.opposite() {
            exits.remove(reverse);
        }
        let exits: Vec<Direction> = exits.iter().collect();
        if exits.is_empty() {
            return Direction::None;
        }
        exits[self.rng.random_range(0..exits.len())]
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;

    fn set(dirs: &[Direction]) -> DirectionSet {
        dirs.iter().copied().collect()
    }

    fn every_open_set() -> Vec<DirectionSet> {
        (0u8..16)
            .map(|mask| {
                let mut open: DirectionSet = Direction::AXES
                    .iter()
                    .enumerate()
                    .filter(|(bit, _)| mask & (1 << bit) != 0)
                    .map(|(_, dir)| *dir)
                    .collect();
                open.insert(Direction::None);
                open
            })
            .collect()
    }

    #[test]
    fn player_prefers_intent_then_current_then_stops() {
        let open = set(&[Direction::Up, Direction::Right, Direction::None]);
        assert_eq!(
            PlayerPolicy::new(Direction::Up, Direction::Right).choose(open),
            Direction::Up
        );
        assert_eq!(
            PlayerPolicy::new(Direction::Down, Direction::Right).choose(open),
            Direction::Right
        );
        assert_eq!(
            PlayerPolicy::new(Direction::Down, Direction::Left).choose(open),
            Direction::None
        );
    }

    #[test]
    fn player_choice_is_always_open_for_every_combination() {
        for open in every_open_set() {
            for intended in Direction::ALL {
                for current in Direction::ALL {
                    let chosen = PlayerPolicy::new(intended, current).choose(open);
                    assert!(
                        open.contains(chosen),
                        "{chosen:?} not in {open:?} (intended {intended:?}, current {current:?})"
                    );
                }
            }
        }
    }

    #[test]
    fn immediate_turn_only_on_reversal_or_standstill() {
        assert_eq!(
            immediate_turn(Direction::Right, Direction::Left),
            Some(Direction::Left)
        );
        assert_eq!(
            immediate_turn(Direction::None, Direction::Up),
            Some(Direction::Up)
        );
        assert_eq!(immediate_turn(Direction::Right, Direction::Up), None);
        assert_eq!(immediate_turn(Direction::Right, Direction::Right), None);
        assert_eq!(immediate_turn(Direction::Up, Direction::None), None);
    }

    #[test]
    fn ghost_follows_corridor_even_when_it_reverses() {
        let mut rng = StdRng::seed_from_u64(7);
        let dead_end = set(&[Direction::Left, Direction::None]);
        let chosen = GhostPolicy::new(Direction::Right, &mut rng).choose(dead_end);
        assert_eq!(chosen, Direction::Left);
    }

    #[test]
    fn ghost_never_reverses_or_stops_at_junctions() {
        let open = set(&[
            Direction::Up,
            Direction::Left,
            Direction::Right,
            Direction::None,
        ]);
        let mut rng = StdRng::seed_from_u64(11);
        let mut seen = DirectionSet::empty();
        for _ in 0..200 {
            let chosen = GhostPolicy::new(Direction::Right, &mut rng).choose(open);
            assert_ne!(chosen, Direction::Left);
            assert_ne!(chosen, Direction::None);
            seen.insert(chosen);
        }
        assert_eq!(seen, set(&[Direction::Up, Direction::Right]));
    }

    #[test]
    fn enclosed_ghost_stands_still() {
        let mut rng = StdRng::seed_from_u64(3);
        let chosen =
            GhostPolicy::new(Direction::Up, &mut rng).choose(set(&[Direction::None]));
        assert_eq!(chosen, Direction::None);
    }

    #[test]
    fn same_seed_gives_same_ghost_choices() {
        let open = set(&[
            Direction::Up,
            Direction::Down,
            Direction::Left,
            Direction::Right,
            Direction::None,
        ]);
        let mut a = StdRng::seed_from_u64(99);
        let mut b = StdRng::seed_from_u64(99);
        for _ in 0..50 {
            assert_eq!(
                GhostPolicy::new(Direction::Up, &mut a).choose(open),
                GhostPolicy::new(Direction::Up, &mut b).choose(open)
            );
        }
    }

    fn arb_direction() -> impl Strategy<Value = Direction> {
        prop_oneof![
            Just(Direction::Up),
            Just(Direction::Down),
            Just(Direction::Left),
            Just(Direction::Right),
            Just(Direction::None),
        ]
    }

    proptest! {
        #[test]
        fn prop_ghost_choice_is_open(
            mask in 0u8..16,
            current in arb_direction(),
            seed in any::<u64>(),
        ) {
            let open = every_open_set()[mask as usize];
            let mut rng = StdRng::seed_from_u64(seed);
            let chosen = GhostPolicy::new(current, &mut rng).choose(open);
            prop_assert!(open.contains(chosen));
            if open.len() > 2 {
                prop_assert_ne!(chosen, Direction::None);
                prop_assert_ne!(Some(chosen), current.opposite());
            }
        }
    }
}
