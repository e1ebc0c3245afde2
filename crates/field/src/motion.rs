//! Per-point drift: an endless chain of eased transitions around each origin.
//!
//! Every point owns at most one in-flight [`Transition`]. When it completes,
//! a new one is issued at once, starting at the old one's end time with a fresh
//! random target and duration, so chains never synchronize across points.
//! Transitions are stamped with the scheduler's generation; [`MotionScheduler::cancel`]
//! bumps the generation and drops them all.

use glam::DVec2;
use plexus_core::{FieldConfig, Xorshift64};

use crate::field::{Field, Point};

/// Circular ease-in-out: symmetric, monotonic, no overshoot. Maps [0, 1] onto [0, 1].
pub fn circ_in_out(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    if t < 0.5 {
        (1.0 - (1.0 - (2.0 * t).powi(2)).sqrt()) / 2.0
    } else {
        ((1.0 - (-2.0 * t + 2.0).powi(2)).sqrt() + 1.0) / 2.0
    }
}

/// One eased move of a point's position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transition {
    from: DVec2,
    to: DVec2,
    start: f64,
    duration: f64,
    generation: u64,
}

impl Transition {
    /// Where the point ends up.
    pub fn to(&self) -> DVec2 {
        self.to
    }

    /// Start time in seconds since mount.
    pub fn start(&self) -> f64 {
        self.start
    }

    /// `start + duration`.
    pub fn end(&self) -> f64 {
        self.start + self.duration
    }

    /// Seconds, in `[min_duration, max_duration)`.
    pub fn duration(&self) -> f64 {
        self.duration
    }

    /// Eased position at `now`, held at the endpoints outside the interval.
    pub fn sample(&self, now: f64) -> DVec2 {
        let t = (now - self.start) / self.duration;
        self.from.lerp(self.to, circ_in_out(t))
    }
}

#[derive(Debug, Clone, Copy)]
struct DriftParams {
    drift: f64,
    min_duration: f64,
    max_duration: f64,
}

impl DriftParams {
    /// Draw order is x, y, then duration.
    fn issue(self, point: &Point, start: f64, generation: u64, rng: &mut Xorshift64) -> Transition {
        let origin = point.origin();
        let to = DVec2::new(
            rng.next_around(origin.x, self.drift),
            rng.next_around(origin.y, self.drift),
        );
        Transition {
            from: point.position(),
            to,
            start,
            duration: rng.next_range(self.min_duration, self.max_duration),
            generation,
        }
    }
}

/// Owns one transition chain per point.
///
/// Driven by [`advance`](Self::advance) with the host's clock; there are no
/// timers or callbacks, so cancelling is just dropping the transitions.
#[derive(Debug, Clone)]
pub struct MotionScheduler {
    params: DriftParams,
    transitions: Vec<Option<Transition>>,
    generation: u64,
}

impl MotionScheduler {
    /// Durations must be positive; [`FieldConfig::validate`] guarantees it.
    pub fn new(config: &FieldConfig) -> Self {
        Self {
            params: DriftParams {
                drift: config.drift,
                min_duration: config.min_duration,
                max_duration: config.max_duration,
            },
            transitions: Vec::new(),
            generation: 0,
        }
    }

    /// Issues the first transition for every point, all starting at `now`.
    pub fn start(&mut self, field: &Field, rng: &mut Xorshift64, now: f64) {
        let (params, generation) = (self.params, self.generation);
        self.transitions = field
            .points()
            .iter()
            .map(|p| Some(params.issue(p, now, generation, rng)))
            .collect();
    }

    /// Moves every point to its eased position at `now`.
    ///
    /// Each transition that has ended snaps its point to the target and is
    /// replaced immediately; a long gap can complete several in a row.
    /// Returns how many transitions completed. A non-finite `now` moves nothing.
    pub fn advance(&mut self, field: &mut Field, rng: &mut Xorshift64, now: f64) -> usize {
        if !now.is_finite() {
            return 0;
        }
        let (params, generation) = (self.params, self.generation);
        let mut completed = 0;
        for (point, slot) in field.points_mut().iter_mut().zip(self.transitions.iter_mut()) {
            let Some(mut current) = slot.take() else {
                continue;
            };
            if current.generation != generation {
                continue;
            }
            while now >= current.end() {
                point.position = current.to;
                completed += 1;
                current = params.issue(point, current.end(), generation, rng);
            }
            point.position = current.sample(now);
            *slot = Some(current);
        }
        completed
    }

    /// Drops every in-flight transition; nothing is issued again until [`start`](Self::start).
    pub fn cancel(&mut self) {
        self.generation += 1;
        self.transitions.clear();
    }

    /// Number of points with a transition in flight.
    pub fn pending(&self) -> usize {
        self.transitions.iter().filter(|t| t.is_some()).count()
    }

    /// In-flight transition of point `index`, if any.
    pub fn transition(&self, index: usize) -> Option<&Transition> {
        self.transitions.get(index).and_then(Option::as_ref)
    }

    /// Bumped by every [`cancel`](Self::cancel).
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup(seed: u64) -> (Field, MotionScheduler, Xorshift64) {
        let config = FieldConfig::new(400.0, 300.0, seed);
        let mut rng = Xorshift64::new(seed);
        let field = Field::generate(&config, &mut rng).unwrap();
        let mut motion = MotionScheduler::new(&config);
        motion.start(&field, &mut rng, 0.0);
        (field, motion, rng)
    }

    #[test]
    fn easing_hits_endpoints_and_midpoint() {
        assert_eq!(circ_in_out(0.0), 0.0);
        assert_eq!(circ_in_out(1.0), 1.0);
        assert!((circ_in_out(0.5) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn easing_is_symmetric_and_monotonic() {
        let mut last = 0.0;
        for i in 0..=1000 {
            let t = i as f64 / 1000.0;
            let v = circ_in_out(t);
            assert!(v >= last - 1e-12, "not monotonic at {t}");
            assert!((v + circ_in_out(1.0 - t) - 1.0).abs() < 1e-9, "not symmetric at {t}");
            last = v;
        }
    }

    #[test]
    fn easing_clamps_out_of_range_input() {
        assert_eq!(circ_in_out(-3.0), 0.0);
        assert_eq!(circ_in_out(7.0), 1.0);
    }

    #[test]
    fn start_issues_one_transition_per_point() {
        let (field, motion, _) = setup(1);
        assert_eq!(motion.pending(), field.len());
        for i in 0..field.len() {
            let t = motion.transition(i).unwrap();
            assert_eq!(t.start(), 0.0);
            assert!((1.0..2.0).contains(&t.duration()), "duration {}", t.duration());
            let origin = field.points()[i].origin();
            assert!((t.to() - origin).abs().max_element() <= 50.0);
        }
    }

    #[test]
    fn points_stay_put_at_time_zero() {
        let (mut field, mut motion, mut rng) = setup(2);
        let before: Vec<DVec2> = field.points().iter().map(Point::position).collect();
        assert_eq!(motion.advance(&mut field, &mut rng, 0.0), 0);
        let after: Vec<DVec2> = field.points().iter().map(Point::position).collect();
        assert_eq!(before, after);
    }

    #[test]
    fn completion_snaps_to_target_and_reissues_from_end_time() {
        let (mut field, mut motion, mut rng) = setup(3);
        let first = *motion.transition(0).unwrap();
        motion.advance(&mut field, &mut rng, first.end());
        let next = motion.transition(0).unwrap();
        assert_eq!(next.start(), first.end());
        assert_eq!(field.points()[0].position(), first.to());
        assert_eq!(motion.pending(), field.len());
    }

    #[test]
    fn long_gap_completes_several_transitions() {
        let (mut field, mut motion, mut rng) = setup(4);
        // Every duration is under 2 s, so 10 s completes at least 5 per point.
        let completed = motion.advance(&mut field, &mut rng, 10.0);
        assert!(completed >= 5 * field.len(), "completed {completed}");
        assert!(motion.transition(0).unwrap().end() > 10.0);
    }

    #[test]
    fn chains_are_decorrelated() {
        let (field, motion, _) = setup(5);
        let ends: Vec<f64> = (0..field.len()).map(|i| motion.transition(i).unwrap().end()).collect();
        let distinct = ends.windows(2).filter(|w| w[0] != w[1]).count();
        assert!(distinct > ends.len() / 2);
    }

    #[test]
    fn cancel_stops_all_motion() {
        let (mut field, mut motion, mut rng) = setup(6);
        motion.advance(&mut field, &mut rng, 0.5);
        motion.cancel();
        assert_eq!(motion.pending(), 0);
        assert_eq!(motion.generation(), 1);
        let frozen: Vec<DVec2> = field.points().iter().map(Point::position).collect();
        assert_eq!(motion.advance(&mut field, &mut rng, 50.0), 0);
        let after: Vec<DVec2> = field.points().iter().map(Point::position).collect();
        assert_eq!(frozen, after);
    }

    #[test]
    fn non_finite_time_is_ignored() {
        let (mut field, mut motion, mut rng) = setup(7);
        let before: Vec<DVec2> = field.points().iter().map(Point::position).collect();
        for now in [f64::INFINITY, f64::NAN, f64::NEG_INFINITY] {
            assert_eq!(motion.advance(&mut field, &mut rng, now), 0);
        }
        let after: Vec<DVec2> = field.points().iter().map(Point::position).collect();
        assert_eq!(before, after);
        assert_eq!(motion.pending(), field.len());
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn positions_stay_within_drift_box(seed: u64, times in prop::collection::vec(0.0f64..30.0, 1..8)) {
                let (mut field, mut motion, mut rng) = setup(seed);
                let mut times = times;
                times.sort_by(f64::total_cmp);
                for now in times {
                    motion.advance(&mut field, &mut rng, now);
                    for p in field.points() {
                        let offset = (p.position() - p.origin()).abs();
                        prop_assert!(offset.max_element() <= 50.0 + 1e-9, "offset {offset:?}");
                    }
                    prop_assert_eq!(motion.pending(), field.len());
                }
            }
        }
    }
}
