use std::collections::HashSet;
use wardrobe_core::{
    AcquisitionConfig, AcquisitionError, AcquisitionMethod, AcquisitionWorkflow, AssetRef,
    AssetResolutionError, GarmentEntry, GarmentId, ImageHandle, MediaFilter, SessionOutcome,
    SessionStatus, WorkflowPhase, DEFAULT_LABEL,
};

fn workflow() -> AcquisitionWorkflow {
    AcquisitionWorkflow::new(AcquisitionConfig::default()).unwrap()
}

fn photo(byte: u8) -> AssetRef {
    AssetRef::library_import(ImageHandle::from_bytes(vec![byte]))
}

fn shot(byte: u8) -> AssetRef {
    AssetRef::live_capture(ImageHandle::from_bytes(vec![byte]))
}

fn listed_ids(workflow: &AcquisitionWorkflow) -> Vec<GarmentId> {
    workflow.catalog().list().iter().map(GarmentEntry::id).collect()
}

fn open_session(workflow: &mut AcquisitionWorkflow, method: AcquisitionMethod) {
    workflow.start_acquisition().unwrap();
    workflow.choose_method(method).unwrap();
    workflow.launch_picker().unwrap();
}

fn commit_library(workflow: &mut AcquisitionWorkflow, bytes: &[u8]) -> Vec<GarmentId> {
    open_session(workflow, AcquisitionMethod::Library);
    workflow
        .deliver_batch(bytes.iter().map(|byte| Ok(photo(*byte))))
        .unwrap();
    match workflow.complete().unwrap() {
        SessionOutcome::Committed { ids, .. } => ids,
        other => panic!("expected commit, got {other:?}"),
    }
}

#[test]
fn library_import_commits_valid_assets_in_arrival_order() {
    let mut workflow = workflow();
    open_session(&mut workflow, AcquisitionMethod::Library);

    let assets = [photo(1), photo(2), photo(3)];
    workflow.deliver(Ok(assets[0].clone())).unwrap();
    workflow
        .deliver(Err(AssetResolutionError::Decode("corrupt heic".to_string())))
        .unwrap();
    workflow.deliver(Ok(assets[1].clone())).unwrap();
    workflow.deliver(Ok(assets[2].clone())).unwrap();

    let outcome = workflow.complete().unwrap();
    let SessionOutcome::Committed { ids, dropped } = outcome else {
        panic!("expected commit, got {outcome:?}");
    };
    assert_eq!(dropped, 1);
    assert_eq!(ids, listed_ids(&workflow));

    let entries = workflow.catalog().list();
    assert_eq!(entries.len(), 3);
    let unique: HashSet<_> = entries.iter().map(GarmentEntry::id).collect();
    assert_eq!(unique.len(), 3);
    for (entry, asset) in entries.iter().zip(assets.iter()) {
        assert_eq!(entry.label(), DEFAULT_LABEL);
        assert_eq!(entry.asset(), asset);
    }
    assert_eq!(workflow.phase(), WorkflowPhase::Idle);
}

#[test]
fn camera_dismissed_without_capture_leaves_catalog_unchanged() {
    let mut workflow = workflow();
    commit_library(&mut workflow, &[1, 2]);
    let before = workflow.catalog().snapshot();
    let revision = workflow.catalog().revision();

    open_session(&mut workflow, AcquisitionMethod::Camera);
    let outcome = workflow.deliver_capture(None).unwrap();

    assert_eq!(outcome, SessionOutcome::Cancelled { dropped: 0 });
    assert_eq!(workflow.catalog().snapshot(), before);
    assert_eq!(workflow.catalog().revision(), revision);
    assert_eq!(workflow.phase(), WorkflowPhase::Idle);
}

#[test]
fn camera_capture_appends_one_entry() {
    let mut workflow = workflow();
    open_session(&mut workflow, AcquisitionMethod::Camera);
    let request_phase = workflow.phase();
    assert_eq!(
        request_phase,
        WorkflowPhase::Session {
            method: AcquisitionMethod::Camera,
            status: SessionStatus::AwaitingResult,
        }
    );

    let outcome = workflow.deliver_capture(Some(shot(7))).unwrap();
    let SessionOutcome::Committed { ids, dropped } = outcome else {
        panic!("expected commit, got {outcome:?}");
    };
    assert_eq!(dropped, 0);
    assert_eq!(ids.len(), 1);
    assert_eq!(workflow.catalog().list()[0].asset(), &shot(7));
}

#[test]
fn cancelling_library_picker_discards_partial_results() {
    let mut workflow = workflow();
    let existing = commit_library(&mut workflow, &[1]);

    open_session(&mut workflow, AcquisitionMethod::Library);
    workflow
        .deliver_batch(vec![
            Err(AssetResolutionError::Unsupported),
            Err(AssetResolutionError::Decode("zero bytes".to_string())),
        ])
        .unwrap();
    let outcome = workflow.complete().unwrap();

    assert_eq!(outcome, SessionOutcome::Cancelled { dropped: 2 });
    assert_eq!(listed_ids(&workflow), existing);
}

#[test]
fn choose_method_during_active_session_has_no_effect() {
    let mut workflow = workflow();
    let existing = commit_library(&mut workflow, &[1, 2]);

    open_session(&mut workflow, AcquisitionMethod::Library);
    workflow.deliver(Ok(photo(3))).unwrap();

    let err = workflow
        .choose_method(AcquisitionMethod::Camera)
        .unwrap_err();
    assert_eq!(err, AcquisitionError::SessionActive(AcquisitionMethod::Library));
    let err = workflow.start_acquisition().unwrap_err();
    assert_eq!(err, AcquisitionError::SessionActive(AcquisitionMethod::Library));
    let err = workflow.cancel_prompt().unwrap_err();
    assert_eq!(err, AcquisitionError::SessionActive(AcquisitionMethod::Library));

    assert_eq!(listed_ids(&workflow), existing);
    assert_eq!(
        workflow.phase(),
        WorkflowPhase::Session {
            method: AcquisitionMethod::Library,
            status: SessionStatus::AwaitingResult,
        }
    );

    let SessionOutcome::Committed { ids, .. } = workflow.complete().unwrap() else {
        panic!("expected the original session to commit");
    };
    assert_eq!(ids.len(), 1);
    assert_eq!(workflow.catalog().len(), 3);
}

#[test]
fn picker_calls_without_session_are_rejected() {
    let mut workflow = workflow();
    assert_eq!(
        workflow.deliver(Ok(photo(1))).unwrap_err(),
        AcquisitionError::NoActiveSession
    );
    assert_eq!(
        workflow.complete().unwrap_err(),
        AcquisitionError::NoActiveSession
    );
    assert_eq!(
        workflow.launch_picker().unwrap_err(),
        AcquisitionError::NoActiveSession
    );
    assert!(workflow.catalog().is_empty());
}

#[test]
fn delivery_before_launch_is_rejected() {
    let mut workflow = workflow();
    workflow.start_acquisition().unwrap();
    workflow.choose_method(AcquisitionMethod::Library).unwrap();

    let err = workflow.deliver(Ok(photo(1))).unwrap_err();
    assert_eq!(
        err,
        AcquisitionError::InvalidTransition {
            status: SessionStatus::MethodChosen,
            action: "deliver result",
        }
    );
}

#[test]
fn launch_reports_picker_configuration() {
    let config = AcquisitionConfig {
        selection_limit: 0,
        ..AcquisitionConfig::default()
    };
    let mut workflow = AcquisitionWorkflow::new(config).unwrap();

    workflow.start_acquisition().unwrap();
    workflow.choose_method(AcquisitionMethod::Library).unwrap();
    let request = workflow.launch_picker().unwrap();
    assert_eq!(request.method, AcquisitionMethod::Library);
    assert_eq!(request.selection_cap, None);
    assert_eq!(request.media_filter, MediaFilter::Images);

    workflow.complete().unwrap();
    workflow.start_acquisition().unwrap();
    workflow.choose_method(AcquisitionMethod::Camera).unwrap();
    assert_eq!(workflow.launch_picker().unwrap().selection_cap, Some(1));
}

#[test]
fn library_results_over_default_limit_are_dropped() {
    let mut workflow = workflow();
    open_session(&mut workflow, AcquisitionMethod::Library);
    workflow
        .deliver_batch((0..7).map(|byte| Ok(photo(byte))))
        .unwrap();

    let outcome = workflow.complete().unwrap();
    let SessionOutcome::Committed { ids, dropped } = outcome else {
        panic!("expected commit, got {outcome:?}");
    };
    assert_eq!(ids.len(), 5);
    assert_eq!(dropped, 2);
}

#[test]
fn delete_and_relabel_route_to_catalog() {
    let mut workflow = workflow();
    let ids = commit_library(&mut workflow, &[1, 2, 3]);

    assert!(workflow.relabel_requested(ids[0], "Rain jacket"));
    assert_eq!(workflow.catalog().list()[0].label(), "Rain jacket");

    assert!(workflow.delete_requested(ids[1]));
    assert!(!workflow.delete_requested(ids[1]));
    assert_eq!(listed_ids(&workflow), vec![ids[0], ids[2]]);
}

#[test]
fn duplicate_images_become_separate_entries() {
    let mut workflow = workflow();
    let ids = commit_library(&mut workflow, &[4, 4, 4]);
    assert_eq!(ids.len(), 3);
    let unique: HashSet<_> = ids.into_iter().collect();
    assert_eq!(unique.len(), 3);
}

#[test]
fn capture_into_library_session_is_rejected() {
    let mut workflow = workflow();
    open_session(&mut workflow, AcquisitionMethod::Library);
    workflow.deliver(Ok(photo(1))).unwrap();

    let err = workflow.deliver_capture(Some(shot(2))).unwrap_err();
    assert_eq!(
        err,
        AcquisitionError::InvalidTransition {
            status: SessionStatus::AwaitingResult,
            action: "deliver capture",
        }
    );
    assert_eq!(
        workflow.phase(),
        WorkflowPhase::Session {
            method: AcquisitionMethod::Library,
            status: SessionStatus::AwaitingResult,
        }
    );
    assert!(workflow.catalog().is_empty());

    let SessionOutcome::Committed { ids, dropped } = workflow.complete().unwrap() else {
        panic!("library session should still commit its own result");
    };
    assert_eq!((ids.len(), dropped), (1, 0));
}

#[test]
fn abort_discards_partial_library_batch() {
    let mut workflow = workflow();
    let existing = commit_library(&mut workflow, &[1]);
    let revision = workflow.catalog().revision();

    open_session(&mut workflow, AcquisitionMethod::Library);
    workflow
        .deliver_batch(vec![Ok(photo(2)), Ok(photo(3))])
        .unwrap();

    assert_eq!(
        workflow.abort_session().unwrap(),
        SessionOutcome::Cancelled { dropped: 0 }
    );
    assert_eq!(workflow.phase(), WorkflowPhase::Idle);
    assert_eq!(listed_ids(&workflow), existing);
    assert_eq!(workflow.catalog().revision(), revision);
    assert_eq!(
        workflow.abort_session().unwrap_err(),
        AcquisitionError::NoActiveSession
    );
}
