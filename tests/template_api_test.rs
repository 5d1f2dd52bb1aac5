// ==========================================
// milestone template integration tests
// ==========================================

mod test_helpers;

use std::sync::Arc;

use pipetrak_progress::api::{ApiError, ComponentApi, TemplateApi};
use pipetrak_progress::domain::audit::AuditAction;
use pipetrak_progress::domain::milestone::MilestoneWeight;
use pipetrak_progress::domain::types::ComponentType;
use pipetrak_progress::repository::{
    audit_repo::AuditLogRepository, component_repo::ComponentRepository,
    template_repo::TemplateRepository,
};

use test_helpers::{component_fixture, create_test_db, open_test_connection};

struct TestEnv {
    template_api: TemplateApi,
    component_api: ComponentApi,
    component_repo: Arc<ComponentRepository>,
    audit_repo: Arc<AuditLogRepository>,
    _temp: tempfile::NamedTempFile,
}

fn setup() -> TestEnv {
    let (temp, db_path) = create_test_db().expect("test db");
    let conn = open_test_connection(&db_path);

    let component_repo = Arc::new(ComponentRepository::new(conn.clone()));
    let template_repo = Arc::new(TemplateRepository::new(conn.clone()));
    let audit_repo = Arc::new(AuditLogRepository::new(conn));

    TestEnv {
        template_api: TemplateApi::new(template_repo),
        component_api: ComponentApi::new(component_repo.clone()),
        component_repo,
        audit_repo,
        _temp: temp,
    }
}

fn weights(pairs: &[(&str, f64)]) -> Vec<MilestoneWeight> {
    pairs
        .iter()
        .map(|(name, weight)| MilestoneWeight::new(*name, *weight))
        .collect()
}

fn spool_weights() -> Vec<MilestoneWeight> {
    weights(&[
        ("Received", 10.0),
        ("Erected", 40.0),
        ("Welded", 40.0),
        ("Tested", 10.0),
    ])
}

#[test]
fn test_create_and_reload_template() {
    let env = setup();

    let result = env
        .template_api
        .update_template_weights("P1", ComponentType::Spool, spool_weights(), None, false, "alice")
        .unwrap();
    assert_eq!(result.milestone_count, 4);
    assert_eq!(result.recomputed_components, 0);

    let template = env
        .template_api
        .get_template("P1", ComponentType::Spool)
        .unwrap()
        .unwrap();
    assert_eq!(template.weights.len(), 4);
    // order preserved
    assert_eq!(template.weights[0].name, "Received");
    assert_eq!(template.weights[3].name, "Tested");
}

#[test]
fn test_weight_sum_must_be_exactly_100() {
    let env = setup();

    let err = env
        .template_api
        .update_template_weights(
            "P1",
            ComponentType::Spool,
            weights(&[("Received", 50.0), ("Tested", 45.0)]),
            None,
            false,
            "alice",
        )
        .unwrap_err();
    match err {
        ApiError::WeightSumError { actual_sum } => assert_eq!(actual_sum, 95.0),
        other => panic!("expected WeightSumError, got {:?}", other),
    }

    // nothing persisted
    assert!(env
        .template_api
        .get_template("P1", ComponentType::Spool)
        .unwrap()
        .is_none());
}

#[test]
fn test_repeating_decimal_thirds_accepted() {
    let env = setup();

    // 33.34 + 33.33 + 33.33 lands on 100.00 in hundredths
    env.template_api
        .update_template_weights(
            "P1",
            ComponentType::Valve,
            weights(&[("Received", 33.34), ("Installed", 33.33), ("Tested", 33.33)]),
            None,
            false,
            "alice",
        )
        .unwrap();
}

#[test]
fn test_invalid_weight_sets_rejected() {
    let env = setup();

    // out of range
    let err = env
        .template_api
        .update_template_weights(
            "P1",
            ComponentType::Spool,
            weights(&[("Received", 110.0), ("Tested", -10.0)]),
            None,
            false,
            "alice",
        )
        .unwrap_err();
    assert!(matches!(err, ApiError::WeightValidation(_)));

    // all zero reports the sum, same as any other mismatch
    let err = env
        .template_api
        .update_template_weights(
            "P1",
            ComponentType::Spool,
            weights(&[("Received", 0.0), ("Tested", 0.0)]),
            None,
            false,
            "alice",
        )
        .unwrap_err();
    assert!(matches!(err, ApiError::WeightSumError { actual_sum } if actual_sum == 0.0));

    // duplicate names
    let err = env
        .template_api
        .update_template_weights(
            "P1",
            ComponentType::Spool,
            weights(&[("Received", 50.0), ("Received", 50.0)]),
            None,
            false,
            "alice",
        )
        .unwrap_err();
    assert!(matches!(err, ApiError::WeightValidation(_)));

    // empty set
    let err = env
        .template_api
        .update_template_weights("P1", ComponentType::Spool, vec![], None, false, "alice")
        .unwrap_err();
    assert!(matches!(err, ApiError::WeightValidation(_)));
}

#[test]
fn test_stale_lock_token_rejected() {
    let env = setup();

    env.template_api
        .update_template_weights("P1", ComponentType::Spool, spool_weights(), None, false, "alice")
        .unwrap();
    let loaded = env
        .template_api
        .get_template("P1", ComponentType::Spool)
        .unwrap()
        .unwrap();

    // bob edits and commits first
    env.template_api
        .update_template_weights(
            "P1",
            ComponentType::Spool,
            weights(&[("Received", 20.0), ("Erected", 30.0), ("Welded", 30.0), ("Tested", 20.0)]),
            Some(loaded.updated_at),
            false,
            "bob",
        )
        .unwrap();

    // alice still holds the old token
    let err = env
        .template_api
        .update_template_weights(
            "P1",
            ComponentType::Spool,
            spool_weights(),
            Some(loaded.updated_at),
            false,
            "alice",
        )
        .unwrap_err();
    assert!(matches!(err, ApiError::ConcurrentModification { .. }));

    // bob's edit survived
    let current = env
        .template_api
        .get_template("P1", ComponentType::Spool)
        .unwrap()
        .unwrap();
    assert_eq!(current.weights[0].weight, 20.0);
}

#[test]
fn test_update_without_token_rejected_once_template_exists() {
    let env = setup();

    env.template_api
        .update_template_weights("P1", ComponentType::Spool, spool_weights(), None, false, "alice")
        .unwrap();

    // bob never loaded the template and supplies no token
    let err = env
        .template_api
        .update_template_weights(
            "P1",
            ComponentType::Spool,
            weights(&[("Received", 25.0), ("Erected", 25.0), ("Welded", 25.0), ("Tested", 25.0)]),
            None,
            false,
            "bob",
        )
        .unwrap_err();
    assert!(matches!(err, ApiError::ConcurrentModification { .. }));

    // alice's weights untouched
    let current = env
        .template_api
        .get_template("P1", ComponentType::Spool)
        .unwrap()
        .unwrap();
    assert_eq!(current.weights, spool_weights());

    // cloning over an existing target is still a deliberate replace
    env.template_api
        .update_template_weights("SRC", ComponentType::Spool, spool_weights(), None, false, "carol")
        .unwrap();
    env.template_api
        .clone_template("SRC", "P1", ComponentType::Spool, "carol")
        .unwrap();
}

#[test]
fn test_lock_token_strictly_advances_on_every_commit() {
    let env = setup();

    env.template_api
        .update_template_weights("P1", ComponentType::Spool, spool_weights(), None, false, "alice")
        .unwrap();
    let first = env
        .template_api
        .get_template("P1", ComponentType::Spool)
        .unwrap()
        .unwrap();

    // back-to-back commits land within the same millisecond on a fast
    // machine; each token must still be strictly greater than the last
    let mut token = first.updated_at;
    for _ in 0..3 {
        let result = env
            .template_api
            .update_template_weights(
                "P1",
                ComponentType::Spool,
                spool_weights(),
                Some(token),
                false,
                "alice",
            )
            .unwrap();
        assert!(result.updated_at > token);
        token = result.updated_at;
    }

    // the original token is now stale no matter how quickly this ran
    let err = env
        .template_api
        .update_template_weights(
            "P1",
            ComponentType::Spool,
            spool_weights(),
            Some(first.updated_at),
            false,
            "bob",
        )
        .unwrap_err();
    assert!(matches!(err, ApiError::ConcurrentModification { .. }));
}

#[test]
fn test_milestone_updates_drive_percent_complete() {
    let env = setup();

    env.template_api
        .update_template_weights("P1", ComponentType::Spool, spool_weights(), None, false, "alice")
        .unwrap();
    env.component_api
        .register_components(vec![component_fixture("C1", "P1", "2")])
        .unwrap();

    let percent = env
        .component_api
        .update_milestone_state("C1", "Received", true)
        .unwrap();
    assert_eq!(percent, 10.0);

    let percent = env
        .component_api
        .update_milestone_state("C1", "Erected", true)
        .unwrap();
    assert_eq!(percent, 50.0);

    // unchecking rolls the percent back
    let percent = env
        .component_api
        .update_milestone_state("C1", "Received", false)
        .unwrap();
    assert_eq!(percent, 40.0);
}

#[test]
fn test_milestone_name_must_exist_in_template() {
    let env = setup();

    env.template_api
        .update_template_weights("P1", ComponentType::Spool, spool_weights(), None, false, "alice")
        .unwrap();
    env.component_api
        .register_components(vec![component_fixture("C1", "P1", "2")])
        .unwrap();
    env.component_api
        .update_milestone_state("C1", "Received", true)
        .unwrap();

    // a mistyped name must fail loudly, not sit in the table contributing 0
    let err = env
        .component_api
        .update_milestone_state("C1", "Recieved", true)
        .unwrap_err();
    assert!(matches!(err, ApiError::InvalidInput(_)));

    let c1 = env.component_repo.find_by_id("C1").unwrap().unwrap();
    assert_eq!(c1.percent_complete, 10.0);

    // unknown component is a not-found, not a silent insert
    let err = env
        .component_api
        .update_milestone_state("GHOST", "Received", true)
        .unwrap_err();
    assert!(matches!(err, ApiError::NotFound(_)));
}

#[test]
fn test_retroactive_recompute_rewrites_existing_percents() {
    let env = setup();

    env.template_api
        .update_template_weights("P1", ComponentType::Spool, spool_weights(), None, false, "alice")
        .unwrap();
    env.component_api
        .register_components(vec![
            component_fixture("C1", "P1", "2"),
            component_fixture("C2", "P1", "4"),
        ])
        .unwrap();
    env.component_api
        .update_milestone_state("C1", "Received", true)
        .unwrap();
    env.component_api
        .update_milestone_state("C1", "Erected", true)
        .unwrap();

    let loaded = env
        .template_api
        .get_template("P1", ComponentType::Spool)
        .unwrap()
        .unwrap();
    let result = env
        .template_api
        .update_template_weights(
            "P1",
            ComponentType::Spool,
            weights(&[("Received", 5.0), ("Erected", 25.0), ("Welded", 50.0), ("Tested", 20.0)]),
            Some(loaded.updated_at),
            true,
            "alice",
        )
        .unwrap();
    assert_eq!(result.recomputed_components, 2);

    let c1 = env.component_repo.find_by_id("C1").unwrap().unwrap();
    assert_eq!(c1.percent_complete, 30.0); // 5 + 25 under the new weights
    let c2 = env.component_repo.find_by_id("C2").unwrap().unwrap();
    assert_eq!(c2.percent_complete, 0.0);
}

#[test]
fn test_without_retroactive_existing_percents_untouched() {
    let env = setup();

    env.template_api
        .update_template_weights("P1", ComponentType::Spool, spool_weights(), None, false, "alice")
        .unwrap();
    env.component_api
        .register_components(vec![component_fixture("C1", "P1", "2")])
        .unwrap();
    env.component_api
        .update_milestone_state("C1", "Received", true)
        .unwrap();

    let loaded = env
        .template_api
        .get_template("P1", ComponentType::Spool)
        .unwrap()
        .unwrap();
    env.template_api
        .update_template_weights(
            "P1",
            ComponentType::Spool,
            weights(&[("Received", 5.0), ("Erected", 25.0), ("Welded", 50.0), ("Tested", 20.0)]),
            Some(loaded.updated_at),
            false,
            "alice",
        )
        .unwrap();

    let c1 = env.component_repo.find_by_id("C1").unwrap().unwrap();
    assert_eq!(c1.percent_complete, 10.0); // still the old weight
}

#[test]
fn test_clone_template_between_projects() {
    let env = setup();

    env.template_api
        .update_template_weights("SRC", ComponentType::Spool, spool_weights(), None, false, "alice")
        .unwrap();

    let result = env
        .template_api
        .clone_template("SRC", "DST", ComponentType::Spool, "alice")
        .unwrap();
    assert_eq!(result.milestone_count, 4);

    let cloned = env
        .template_api
        .get_template("DST", ComponentType::Spool)
        .unwrap()
        .unwrap();
    assert_eq!(cloned.weights, spool_weights());

    // cloning a missing source fails cleanly
    let err = env
        .template_api
        .clone_template("SRC", "DST", ComponentType::Valve, "alice")
        .unwrap_err();
    assert!(matches!(err, ApiError::NotFound(_)));
}

#[test]
fn test_template_writes_audited() {
    let env = setup();

    env.template_api
        .update_template_weights("P1", ComponentType::Spool, spool_weights(), None, false, "alice")
        .unwrap();
    env.template_api
        .update_template_weights("SRC", ComponentType::Spool, spool_weights(), None, false, "alice")
        .unwrap();
    env.template_api
        .clone_template("SRC", "P1", ComponentType::Spool, "bob")
        .unwrap();

    let updates = env
        .audit_repo
        .list_by_action("P1", AuditAction::UpdateTemplateWeights)
        .unwrap();
    assert_eq!(updates.len(), 1);

    let clones = env
        .audit_repo
        .list_by_action("P1", AuditAction::CloneTemplate)
        .unwrap();
    assert_eq!(clones.len(), 1);
    assert_eq!(clones[0].actor, "bob");

    let payload = clones[0].payload_json.as_ref().expect("template payload");
    assert_eq!(payload["component_type"], "SPOOL");
    assert_eq!(payload["new_weights"].as_array().unwrap().len(), 4);
}
