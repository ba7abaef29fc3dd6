use std::cell::RefCell;
use std::rc::Rc;

use anyhow::Result;
use rune_config::RuneConfig;
use rune_transition::{
    AnimatedProperty, AnimationBinding, AnimationState, Bounds, Interpolator, LayoutOutput,
    LayoutSnapshot, NoopCompleteListener, PropertyAnimation, TimingAnimator, TransitionAnimator,
    TransitionEvent, TransitionKey, TransitionManager, TransitionSet, TransitionSpec,
};

type Completed = Rc<RefCell<Vec<TransitionKey>>>;

fn manager_with_listener() -> (TransitionManager, Completed) {
    let completed = Completed::default();
    let sink = Rc::clone(&completed);
    let manager =
        TransitionManager::new(move |key: &TransitionKey| sink.borrow_mut().push(key.clone()));
    (manager, completed)
}

fn linear(duration_ms: f32) -> TimingAnimator {
    TimingAnimator::new(duration_ms).with_interpolator(Interpolator::Linear)
}

fn at_x(key: &str, x: f32) -> LayoutOutput {
    LayoutOutput::new(key, Bounds::new(x, 0.0, 50.0, 50.0))
}

fn x_transition(duration_ms: f32) -> TransitionSet {
    TransitionSpec::create(TransitionSpec::all_keys())
        .animate(AnimatedProperty::X)
        .animator(linear(duration_ms))
        .into()
}

fn snapshot(
    transitions: TransitionSet,
    outputs: impl IntoIterator<Item = LayoutOutput>,
) -> Result<LayoutSnapshot> {
    Ok(LayoutSnapshot::from_outputs(transitions, outputs)?)
}

fn x_of(manager: &TransitionManager, key: &str) -> f32 {
    manager
        .animated_value(key, AnimatedProperty::X)
        .unwrap_or(f32::NAN)
}

#[test]
fn completion_fires_once_per_key() -> Result<()> {
    let (mut manager, completed) = manager_with_listener();
    let current = snapshot(TransitionSet::default(), [at_x("a", 0.0), at_x("b", 0.0)])?;
    let next = snapshot(
        TransitionSet::parallel([
            TransitionSpec::create("a")
                .animate(AnimatedProperty::X)
                .animator(linear(50.0)),
            TransitionSpec::create("b")
                .animate(AnimatedProperty::X)
                .animator(linear(100.0)),
        ]),
        [at_x("a", 10.0), at_x("b", 10.0)],
    )?;

    manager.setup_transitions(&current, &next);
    assert_eq!(manager.running_count(), 2);

    manager.update(50.0);
    assert_eq!(*completed.borrow(), vec![TransitionKey::new("a")]);
    assert!(manager.is_animating("b"));

    manager.update(50.0);
    assert_eq!(
        *completed.borrow(),
        vec![TransitionKey::new("a"), TransitionKey::new("b")]
    );
    assert!(!manager.has_running_animations());

    let events: Vec<TransitionEvent> = manager.drain_events().collect();
    let states: Vec<(String, AnimationState)> = events
        .iter()
        .map(|e| (e.transition_key().to_string(), e.state()))
        .collect();
    assert_eq!(
        states,
        vec![
            ("a".to_string(), AnimationState::Animating),
            ("b".to_string(), AnimationState::Animating),
            ("a".to_string(), AnimationState::Complete),
            ("b".to_string(), AnimationState::Complete),
        ]
    );
    Ok(())
}

#[test]
fn disappearing_key_is_cancelled() -> Result<()> {
    let (mut manager, completed) = manager_with_listener();
    let first = snapshot(TransitionSet::default(), [at_x("a", 0.0), at_x("b", 0.0)])?;
    let second = snapshot(x_transition(100.0), [at_x("a", 10.0), at_x("b", 10.0)])?;
    manager.setup_transitions(&first, &second);
    manager.update(20.0);
    manager.drain_events().for_each(drop);

    // "b" is gone from the next frame; "a" keeps its target.
    let third = snapshot(x_transition(100.0), [at_x("a", 10.0)])?;
    manager.setup_transitions(&second, &third);

    assert_eq!(manager.state("b"), AnimationState::Idle);
    assert!(manager.animated_value("b", AnimatedProperty::X).is_none());
    assert!(manager.is_animating("a"));
    assert_eq!(
        manager.drain_events().collect::<Vec<_>>(),
        vec![TransitionEvent::Cancelled {
            transition_key: TransitionKey::new("b"),
        }]
    );

    manager.update(100.0);
    assert_eq!(*completed.borrow(), vec![TransitionKey::new("a")]);
    Ok(())
}

#[test]
fn retarget_starts_from_interrupted_value() -> Result<()> {
    let (mut manager, completed) = manager_with_listener();
    let first = snapshot(TransitionSet::default(), [at_x("a", 0.0)])?;
    let second = snapshot(x_transition(100.0), [at_x("a", 100.0)])?;
    manager.setup_transitions(&first, &second);

    manager.update(50.0);
    assert!((x_of(&manager, "a") - 50.0).abs() < 0.01);

    let third = snapshot(x_transition(100.0), [at_x("a", 0.0)])?;
    manager.setup_transitions(&second, &third);
    assert_eq!(manager.running_count(), 1);
    assert!((x_of(&manager, "a") - 50.0).abs() < 0.01);

    manager.update(50.0);
    assert!((x_of(&manager, "a") - 25.0).abs() < 0.01);

    manager.update(50.0);
    assert_eq!(*completed.borrow(), vec![TransitionKey::new("a")]);

    // The key stayed animating through the retarget: one start, one completion.
    let events: Vec<TransitionEvent> = manager.drain_events().collect();
    assert_eq!(events.len(), 2);
    assert_eq!(events[0].state(), AnimationState::Animating);
    assert_eq!(events[1].state(), AnimationState::Complete);
    Ok(())
}

#[test]
fn unchanged_target_keeps_running_binding() -> Result<()> {
    let created: Rc<RefCell<Vec<PropertyAnimation>>> = Rc::default();
    let sink = Rc::clone(&created);
    let animator = move |animation: PropertyAnimation| -> Box<dyn AnimationBinding> {
        sink.borrow_mut().push(animation.clone());
        linear(100.0).create_animation(animation)
    };

    let mut manager = TransitionManager::default();
    let current = snapshot(TransitionSet::default(), [at_x("a", 0.0)])?;
    let next = snapshot(
        TransitionSpec::create("a")
            .animate(AnimatedProperty::X)
            .animator(animator)
            .into(),
        [at_x("a", 10.0)],
    )?;

    manager.setup_transitions(&current, &next);
    manager.update(50.0);
    manager.setup_transitions(&current, &next);

    assert_eq!(created.borrow().len(), 1);
    assert_eq!(manager.running_count(), 1);
    assert!((x_of(&manager, "a") - 5.0).abs() < 0.01);
    Ok(())
}

#[test]
fn default_spring_settles_and_completes() -> Result<()> {
    let (mut manager, completed) = manager_with_listener();
    let current = snapshot(TransitionSet::default(), [at_x("card", 0.0)])?;
    let next = snapshot(
        TransitionSpec::create("card")
            .animate(AnimatedProperty::X)
            .into(),
        [at_x("card", 200.0)],
    )?;

    manager.setup_transitions(&current, &next);
    let mut frames = 0;
    while manager.has_running_animations() && frames < 1_000 {
        manager.update(16.0);
        frames += 1;
    }

    assert!(!manager.has_running_animations(), "spring never settled");
    assert_eq!(*completed.borrow(), vec![TransitionKey::new("card")]);
    Ok(())
}

#[test]
fn disabled_by_config_file() -> Result<()> {
    let config = RuneConfig::from_toml_str(
        r#"
        [transitions]
        enabled = false
        "#,
    )?;
    let mut manager = TransitionManager::with_config(NoopCompleteListener, &config.transitions);
    assert!(!manager.is_enabled());

    let current = snapshot(TransitionSet::default(), [at_x("a", 0.0)])?;
    let next = snapshot(x_transition(100.0), [at_x("a", 10.0)])?;
    manager.setup_transitions(&current, &next);
    manager.update(200.0);

    assert_eq!(manager.running_count(), 0);
    assert_eq!(manager.state("a"), AnimationState::Idle);
    assert_eq!(manager.pending_event_count(), 0);
    Ok(())
}

#[test]
fn stop_all_cancels_every_key() -> Result<()> {
    let (mut manager, completed) = manager_with_listener();
    let current = snapshot(TransitionSet::default(), [at_x("a", 0.0), at_x("b", 0.0)])?;
    let next = snapshot(x_transition(100.0), [at_x("a", 10.0), at_x("b", 10.0)])?;

    manager.setup_transitions(&current, &next);
    assert_eq!(manager.stop_all(), 2);
    manager.update(200.0);

    assert!(completed.borrow().is_empty());
    assert_eq!(manager.events_for_key("a").len(), 2);
    assert_eq!(
        manager.events_for_key("b").last().map(|e| e.state()),
        Some(AnimationState::Cancelled)
    );
    Ok(())
}

#[test]
fn finished_sibling_does_not_complete_interrupted_key() -> Result<()> {
    let (mut manager, completed) = manager_with_listener();
    let at = |x: f32, y: f32| LayoutOutput::new("a", Bounds::new(x, y, 50.0, 50.0));

    let first = snapshot(TransitionSet::default(), [at(0.0, 0.0)])?;
    let second = snapshot(
        TransitionSet::parallel([
            TransitionSpec::create("a")
                .animate(AnimatedProperty::X)
                .animator(linear(100.0)),
            TransitionSpec::create("a")
                .animate(AnimatedProperty::Y)
                .animator(linear(10.0)),
        ]),
        [at(100.0, 10.0)],
    )?;
    manager.setup_transitions(&first, &second);
    manager.update(20.0);
    assert!(manager.animated_value("a", AnimatedProperty::Y).is_none());

    let third = snapshot(TransitionSet::default(), [at(50.0, 10.0)])?;
    manager.setup_transitions(&second, &third);
    manager.update(200.0);

    assert!(completed.borrow().is_empty());
    let states: Vec<AnimationState> = manager.drain_events().map(|e| e.state()).collect();
    assert_eq!(
        states,
        vec![AnimationState::Animating, AnimationState::Cancelled]
    );
    Ok(())
}

#[test]
fn config_file_drives_default_animator() -> Result<()> {
    let config = RuneConfig::from_toml_str(
        r#"
        [transitions]
        animator = "timing"

        [transitions.timing]
        duration_ms = 40.0
        "#,
    )?;
    let completed = Completed::default();
    let sink = Rc::clone(&completed);
    let mut manager = TransitionManager::with_config(
        move |key: &TransitionKey| sink.borrow_mut().push(key.clone()),
        &config.transitions,
    );

    let current = snapshot(TransitionSet::default(), [at_x("a", 0.0)])?;
    let next = snapshot(
        TransitionSpec::create("a")
            .animate(AnimatedProperty::X)
            .into(),
        [at_x("a", 10.0)],
    )?;

    manager.setup_transitions(&current, &next);
    manager.update(39.0);
    assert!(manager.is_animating("a"));
    manager.update(1.0);
    assert_eq!(*completed.borrow(), vec![TransitionKey::new("a")]);
    Ok(())
}

#[test]
fn config_file_spring_stiffness_changes_motion() -> Result<()> {
    let stiff = RuneConfig::from_toml_str(
        r#"
        [transitions.spring]
        stiffness = 1000.0
        "#,
    )?;
    let current = snapshot(TransitionSet::default(), [at_x("a", 0.0)])?;
    let next = snapshot(
        TransitionSpec::create("a")
            .animate(AnimatedProperty::X)
            .into(),
        [at_x("a", 100.0)],
    )?;

    let mut default_manager = TransitionManager::default();
    let mut stiff_manager =
        TransitionManager::with_config(NoopCompleteListener, &stiff.transitions);
    for manager in [&mut default_manager, &mut stiff_manager] {
        manager.setup_transitions(&current, &next);
        manager.update(16.0);
    }

    assert!(x_of(&stiff_manager, "a") > x_of(&default_manager, "a"));
    Ok(())
}
