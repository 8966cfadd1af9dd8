//! FSM unit tests

use std::time::Duration;

use appdeploy::deploy::fsm::{DeploymentFsm, FsmSettings, PollEvent, PollState};
use appdeploy::models::deployment::{DeploymentOutcome, DeploymentProgress, RemoteApplication};

fn progress(succeeded: i64, failed: i64, total: i64) -> DeploymentProgress {
    DeploymentProgress {
        phase: "DEPLOYING".to_string(),
        total_steps: total,
        succeeded_steps: succeeded,
        failed_steps: failed,
    }
}

fn app(deployment_id: Option<&str>) -> RemoteApplication {
    RemoteApplication {
        id: "app-1".to_string(),
        name: "web".to_string(),
        current_deployment_id: deployment_id.map(str::to_string),
        ..Default::default()
    }
}

fn short_settings() -> FsmSettings {
    FsmSettings {
        poll_interval: Duration::from_secs(10),
        deployment_timeout: Duration::from_secs(30),
    }
}

fn polling_fsm() -> DeploymentFsm {
    let mut fsm = DeploymentFsm::new("app-1", FsmSettings::default());
    fsm.process(PollEvent::Tick).unwrap();
    fsm.process(PollEvent::AppObserved(app(Some("dep-1")))).unwrap();
    fsm
}

#[test]
fn test_fsm_initial_state() {
    let fsm = DeploymentFsm::new("app-1", FsmSettings::default());
    assert_eq!(fsm.state(), &PollState::AwaitingDeploymentId);
    assert!(fsm.outcome().is_none());
    assert_eq!(fsm.ticks(), 0);
    assert_eq!(fsm.elapsed(), Duration::ZERO);
}

#[test]
fn test_fsm_deploy_success_flow() {
    let mut fsm = polling_fsm();
    assert_eq!(
        fsm.state(),
        &PollState::Polling {
            deployment_id: "dep-1".to_string()
        }
    );

    fsm.process(PollEvent::Tick).unwrap();
    fsm.process(PollEvent::ProgressObserved(progress(5, 0, 5))).unwrap();
    assert_eq!(
        fsm.state(),
        &PollState::Converging {
            deployment_id: "dep-1".to_string()
        }
    );

    fsm.process(PollEvent::Converged(app(None))).unwrap();
    assert_eq!(fsm.outcome(), Some(DeploymentOutcome::Success(app(None))));
}

#[test]
fn test_fsm_failed_precedence() {
    let mut fsm = polling_fsm();

    fsm.process(PollEvent::Tick).unwrap();
    fsm.process(PollEvent::ProgressObserved(progress(3, 1, 5))).unwrap();

    assert!(matches!(fsm.state(), PollState::Failed(_)));
    assert!(matches!(
        fsm.outcome(),
        Some(DeploymentOutcome::Failed { .. })
    ));
}

#[test]
fn test_fsm_all_steps_succeeded_wins_over_failed_count() {
    let mut fsm = polling_fsm();

    fsm.process(PollEvent::Tick).unwrap();
    fsm.process(PollEvent::ProgressObserved(progress(5, 2, 5))).unwrap();
    assert!(matches!(fsm.state(), PollState::Converging { .. }));

    fsm.process(PollEvent::Converged(app(None))).unwrap();
    assert!(fsm.outcome().unwrap().is_success());
}

#[test]
fn test_fsm_times_out_after_deadline() {
    let mut fsm = DeploymentFsm::new("app-1", short_settings());

    let mut polling_ticks = 0;
    loop {
        fsm.process(PollEvent::Tick).unwrap();
        if fsm.state().is_terminal() {
            break;
        }
        polling_ticks += 1;
        fsm.process(PollEvent::AppObserved(app(None))).unwrap();
    }

    assert_eq!(polling_ticks, 4);
    assert_eq!(polling_ticks, fsm.max_polling_ticks());
    assert_eq!(
        fsm.outcome(),
        Some(DeploymentOutcome::TimedOut {
            app_id: "app-1".to_string()
        })
    );
}

#[test]
fn test_fsm_terminates_within_bound() {
    // Stalled, slowly progressing and late-failing rollouts
    let scripts: Vec<Vec<DeploymentProgress>> = vec![
        vec![progress(0, 0, 5)],
        vec![progress(1, 0, 5), progress(2, 0, 5), progress(3, 0, 5)],
        vec![progress(1, 0, 5), progress(1, 0, 5), progress(2, 1, 5)],
        vec![progress(4, 0, 5), progress(5, 0, 5)],
    ];

    for script in scripts {
        let mut fsm = DeploymentFsm::new("app-1", short_settings());
        let bound = fsm.max_polling_ticks() + 1;
        let mut ticks = 0;
        let mut snapshots = script.iter().cycle();

        while !fsm.state().is_terminal() {
            ticks += 1;
            assert!(ticks <= bound, "no terminal state after {} ticks", bound);

            fsm.process(PollEvent::Tick).unwrap();
            match fsm.state().clone() {
                PollState::AwaitingDeploymentId => {
                    fsm.process(PollEvent::AppObserved(app(Some("dep-1")))).unwrap();
                }
                PollState::Polling { .. } => {
                    let snapshot = snapshots.next().unwrap().clone();
                    fsm.process(PollEvent::ProgressObserved(snapshot)).unwrap();
                    if let PollState::Converging { .. } = fsm.state() {
                        fsm.process(PollEvent::Converged(app(None))).unwrap();
                    }
                }
                _ => {}
            }
        }

        // Terminal states reject further events
        let terminal = fsm.state().clone();
        assert!(fsm.process(PollEvent::Tick).is_err());
        assert!(fsm.process(PollEvent::ProgressObserved(progress(5, 0, 5))).is_err());
        assert_eq!(fsm.state(), &terminal);
    }
}

#[test]
fn test_fsm_invalid_transition() {
    let mut fsm = DeploymentFsm::new("app-1", FsmSettings::default());

    // No deployment id yet
    let result = fsm.process(PollEvent::ProgressObserved(progress(1, 0, 5)));
    assert!(result.is_err());

    let result = fsm.process(PollEvent::Converged(app(None)));
    assert!(result.is_err());
    assert_eq!(fsm.state(), &PollState::AwaitingDeploymentId);
}

#[test]
fn test_progress_line() {
    let fsm = polling_fsm();
    let line = fsm.progress_line(
        "dep-1",
        &DeploymentProgress {
            phase: "ACTIVE".to_string(),
            total_steps: 5,
            succeeded_steps: 3,
            failed_steps: 0,
        },
    );
    assert_eq!(
        line,
        "Waiting for app (app-1) deployment (dep-1) to become active. Phase: ACTIVE (3/5)"
    );
}
