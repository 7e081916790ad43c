//! Every registered check run end to end against lagged mock services

mod common;

use apiprobe::checks::{
    CHECKS, CheckResult, OPT_CLEANUP, OPT_INCLUDE_KNOWN_ISSUES, get_check,
};
use apiprobe_testkit::{MockPetstore, MockSuperheroApi};
use apiprobe::fixtures;
use common::{Harness, LAG, contract, options};
use std::time::Duration;

async fn run(harness: &Harness, name: &str, overrides: &[(&str, bool)]) -> CheckResult {
    let check = get_check(name).unwrap();
    let opts = options(name, overrides);
    check.run(&harness.ctx, &opts).await.unwrap()
}

fn failures(result: &CheckResult) -> Vec<String> {
    result
        .scenario_results
        .iter()
        .filter(|r| !r.passed)
        .map(|r| format!("{}: {:?}", r.scenario, r.error))
        .collect()
}

#[tokio::test]
async fn test_every_check_passes() {
    let harness = Harness::lagged().await;

    for name in CHECKS.keys() {
        let result = run(&harness, name, &[]).await;
        assert!(result.passed, "{name} failed: {:?}", failures(&result));
        assert_eq!(result.check_name, *name);
        assert!(!result.scenario_results.is_empty());
    }

    assert_eq!(harness.superhero.hero_count(), 0);
    assert_eq!(harness.petstore.user_count(), 0);
}

#[tokio::test]
async fn test_known_issues_skipped_by_default() {
    let harness = Harness::lagged().await;

    let result = run(&harness, "superhero-delete", &[]).await;
    let skipped: Vec<_> = result
        .scenario_results
        .iter()
        .filter(|r| r.is_skipped())
        .map(|r| r.scenario.as_str())
        .collect();

    assert!(result.passed);
    assert_eq!(
        skipped,
        ["delete hero with unused id", "delete hero with invalid id"]
    );
    assert_eq!(result.message.as_deref(), Some("3 passed, 0 failed, 2 skipped"));
}

#[tokio::test]
async fn test_known_issues_fail_against_faithful_mock() {
    let harness = Harness::start(
        MockSuperheroApi::new().with_lag(LAG).with_phone_dropped(),
        MockPetstore::with_lag(LAG),
    )
    .await;

    let result = run(&harness, "superhero-create", &[(OPT_INCLUDE_KNOWN_ISSUES, true)]).await;
    assert!(!result.passed);
    let failed = failures(&result);
    assert_eq!(failed.len(), 1, "{failed:?}");
    assert!(failed[0].starts_with("create hero and compare body"));

    // The delete of an unknown id answers 200 rather than 204
    let result = run(&harness, "superhero-delete", &[(OPT_INCLUDE_KNOWN_ISSUES, true)]).await;
    let failed = failures(&result);
    assert_eq!(failed.len(), 2, "{failed:?}");
    assert!(failed.iter().all(|f| f.contains("204")));
}

#[tokio::test]
async fn test_phone_known_issue_passes_when_service_keeps_phone() {
    let harness = Harness::lagged().await;

    let result = run(&harness, "superhero-read", &[(OPT_INCLUDE_KNOWN_ISSUES, true)]).await;
    assert!(result.passed, "{:?}", failures(&result));
    assert!(result.scenario_results.iter().all(|r| !r.is_skipped()));
}

#[tokio::test]
async fn test_cleanup_disabled_leaves_data() {
    let harness = Harness::lagged().await;

    let result = run(&harness, "superhero-create", &[(OPT_CLEANUP, false)]).await;
    assert!(result.passed, "{:?}", failures(&result));
    assert_eq!(harness.superhero.hero_count(), 2);

    let result = run(&harness, "user-lifecycle", &[(OPT_CLEANUP, false)]).await;
    assert!(result.passed, "{:?}", failures(&result));
    assert!(harness.petstore.has_user("Just created expected user"));
    assert!(harness.petstore.has_user("uniqueUsername"));
}

#[tokio::test]
async fn test_failing_scenario_does_not_abort_check() {
    let harness = Harness::lagged().await;

    // Heroes left behind make the ordered list comparison fail
    let created = run(&harness, "superhero-create", &[(OPT_CLEANUP, false)]).await;
    assert!(created.passed);

    let result = run(&harness, "superhero-read", &[(OPT_CLEANUP, false)]).await;
    let failed = failures(&result);
    assert!(!result.passed);
    assert_eq!(failed.len(), 1, "{failed:?}");
    assert!(failed[0].starts_with("list and compare created heroes"));
    assert_eq!(result.scenario_results.len(), 8);
}

#[tokio::test]
async fn test_user_cleanup_waits_out_stale_reads() {
    // Longer than the poll interval, so a delete stays visible for several reads
    let lag = Duration::from_millis(500);
    let harness = Harness::start_with(
        MockSuperheroApi::new(),
        MockPetstore::with_lag(lag),
        contract(),
    )
    .await;
    let users = &harness.ctx.users;

    let mut stale = fixtures::steve_rogers();
    stale.first_name = Some("Old".to_string());
    let username = stale.username.clone().unwrap();
    users.create_user(&stale).await.unwrap();
    users.get_user_by_name(&username).await.unwrap();

    // The first scenario recreates this user and must not read the old record
    let result = run(&harness, "user-lifecycle", &[]).await;
    assert!(result.passed, "{:?}", failures(&result));

    for user in [
        fixtures::default_user(),
        fixtures::steve_rogers(),
        fixtures::jonathan_crane(),
    ] {
        let name = user.username.unwrap();
        let response = users.get_user(&name).await.unwrap();
        assert_eq!(response.status(), 404, "{name} still readable after cleanup");
    }
}
