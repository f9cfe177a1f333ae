use coinfall_test_fixtures::timelines;
use coinfall_timeline_core::{
    parse_timeline_json, Config, EventPolicy, PlaybackDriver, Roster, TimelineEvent,
};

fn cfg(checkpoint_interval: usize, event_policy: EventPolicy) -> Config {
    Config {
        frame_duration_ms: 10.0,
        checkpoint_interval,
        event_policy,
        ..Config::default()
    }
}

fn driver(cfg: Config) -> PlaybackDriver {
    let json = timelines::json("falling-run").expect("fixture");
    let timeline = parse_timeline_json(&json, &cfg).expect("timeline");
    PlaybackDriver::new(timeline, cfg).expect("driver")
}

/// Roster reached by replaying frames one by one from the setup state.
fn replayed(cfg: Config, index: usize) -> Roster {
    let mut d = driver(cfg);
    for i in 0..=index {
        d.seek_frame(i);
    }
    d.roster().clone()
}

fn one_shots(events: &[TimelineEvent]) -> usize {
    events
        .iter()
        .filter(|e| {
            matches!(
                e,
                TimelineEvent::CoinCollected { .. } | TimelineEvent::Flipped { .. }
            )
        })
        .count()
}

#[test]
fn scrubbing_backward_matches_sequential_state() {
    for interval in [1, 3, 64] {
        let c = cfg(interval, EventPolicy::Once);
        for target in 0..12 {
            let mut d = driver(c.clone());
            d.seek(1.0);
            d.seek_frame(target);
            assert_eq!(d.frame_index(), Some(target));
            assert_eq!(
                d.roster(),
                &replayed(c.clone(), target),
                "interval={interval} target={target}"
            );
        }
    }
}

#[test]
fn scrubbing_forward_matches_sequential_state() {
    let c = cfg(4, EventPolicy::Once);
    for target in 0..12 {
        let mut d = driver(c.clone());
        d.seek_frame(target);
        assert_eq!(d.roster(), &replayed(c.clone(), target), "target={target}");
    }
}

#[test]
fn rewind_emits_state_but_no_one_shots() {
    let mut d = driver(cfg(64, EventPolicy::Once));
    let first = d.seek(1.0).clone();
    assert_eq!(one_shots(&first.events), 4);

    let back = d.seek_frame(2).clone();
    assert_eq!(one_shots(&back.events), 0);
    assert!(back
        .events
        .contains(&TimelineEvent::FrameChanged { from: Some(11), to: 2 }));
    assert!(back
        .events
        .contains(&TimelineEvent::ScoreChanged { old: 30.5, new: 1.5 }));
    let c1 = back.changes.iter().find(|c| c.id.0 == "c1").expect("c1 restored");
    assert_eq!(c1.delta.collected, Some(false));
    let p = back.changes.iter().find(|c| c.id.0 == "p").expect("p moved");
    assert_eq!(p.delta.y, Some(30.0));
    assert_eq!(p.delta.flipped, Some(false));

    // Replaying forward re-applies state without re-firing one-shots.
    let again = d.seek(1.0).clone();
    assert_eq!(one_shots(&again.events), 0);
    assert!(d.roster().get(&"c1".into()).unwrap().collected);
    assert_eq!(
        again.events.last(),
        Some(&TimelineEvent::PlaybackEnded { score: 30.5 })
    );
}

#[test]
fn every_visit_policy_refires() {
    let mut d = driver(cfg(64, EventPolicy::EveryVisit));
    // c1 twice (frames 3 and 4), c2 once, two flips.
    assert_eq!(one_shots(&d.seek(1.0).events), 5);
    d.seek_frame(2);
    assert_eq!(one_shots(&d.seek(1.0).events), 5);
}

#[test]
fn reset_clears_guards() {
    let mut d = driver(cfg(64, EventPolicy::Once));
    d.seek(1.0);
    d.reset();
    assert_eq!(d.frame_index(), None);
    assert_eq!(d.score(), 0.0);
    assert!(!d.is_finished());
    assert_eq!(one_shots(&d.seek(1.0).events), 4);
}

#[test]
fn seeking_to_current_frame_is_quiet() {
    let mut d = driver(cfg(64, EventPolicy::Once));
    d.seek_frame(5);
    let out = d.seek_frame(5);
    assert!(out.is_empty());
    assert_eq!(out.frame_index, Some(5));
}
