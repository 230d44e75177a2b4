//! End-to-end reconciliation over HTTP against a mock platform.

use std::time::Duration;

use serde_json::{Value, json};
use wiremock::matchers::{body_json, body_partial_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};
use zonescoper_core::{
    Grouping, GroupingLabels, HttpPlatform, MappedTeamReconciler, MonitorOptions,
    MonitorTeamReconciler, RequestConfig, RetentionSet, SecurePlatform, Team, TeamAction,
    TeamZoneMapping, ZoneAction, ZoneReconciler, ZoneTable,
};

fn platform(server: &MockServer) -> HttpPlatform {
    HttpPlatform::new(
        RequestConfig::new(server.uri(), "token")
            .with_base_delay(Duration::from_millis(10))
            .with_timeout(Duration::from_secs(5)),
    )
}

fn namespace(product: &str, cluster: &str, ns: &str) -> Value {
    json!({
        "uid": format!("{cluster}/{ns}"),
        "type": "k8s_namespace",
        "name": ns,
        "labels": {
            "product": product,
            "kubernetes.cluster.name": cluster,
            "kubernetes.namespace.name": ns
        }
    })
}

async fn mount_zones(server: &MockServer, zones: Value) {
    Mock::given(method("GET"))
        .and(path("/platform/v1/zones"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": zones })))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_new_group_creates_and_scopes_zone() {
    let server = MockServer::start().await;
    mount_zones(&server, json!([{"id": 1, "name": "Entire Infrastructure", "isSystem": true}])).await;
    Mock::given(method("GET"))
        .and(path("/api/mds/getEntities"))
        .and(query_param("type", "k8s_namespace"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "entities": [
                namespace("TeamX", "c1", "a"),
                namespace("TeamX", "c1", "b"),
                namespace("", "c1", "kube-system"),
            ]
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/platform/v1/zones"))
        .and(body_json(json!({
            "name": "TeamX",
            "description": "Zone for 'TeamX'",
            "scopes": [{"rules": "", "targetType": "kubernetes"}]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 42,
            "name": "TeamX",
            "description": "Zone for 'TeamX'",
            "scopes": [{"rules": "", "targetType": "kubernetes"}]
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/platform/v1/zones/42"))
        .and(body_json(json!({
            "id": 42,
            "name": "TeamX",
            "description": "Zone for 'TeamX'",
            "scopes": [{
                "rules": "clusterId in (\"c1\") and namespace in (\"a\",\"b\")",
                "targetType": "kubernetes"
            }]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 42,
            "name": "TeamX",
            "scopes": [{
                "rules": "clusterId in (\"c1\") and namespace in (\"a\",\"b\")",
                "targetType": "kubernetes"
            }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let platform = platform(&server);
    let mut zones: ZoneTable = platform.fetch_zones().await.unwrap().into_iter().collect();
    let entities = platform.fetch_entities().await.unwrap();
    let grouping = Grouping::from_entities(&entities, &GroupingLabels::new("product"));
    assert_eq!(grouping.len(), 1);

    let report = ZoneReconciler::new(&platform)
        .reconcile(&grouping, &mut zones, &RetentionSet::default())
        .await;

    assert_eq!(report.outcomes.len(), 1);
    assert_eq!(report.outcomes[0].action, ZoneAction::Created);
    assert!(report.prune_candidates.is_empty());
    assert_eq!(zones.zone_id("TeamX"), Some(42));
}

#[tokio::test]
async fn test_rejected_update_does_not_abort_the_run() {
    let server = MockServer::start().await;
    mount_zones(
        &server,
        json!([
            {"id": 5, "name": "Alpha", "scopes": []},
            {"id": 6, "name": "Beta", "scopes": []}
        ]),
    )
    .await;
    Mock::given(method("PUT"))
        .and(path("/platform/v1/zones/5"))
        .respond_with(ResponseTemplate::new(422).set_body_string("bad rule"))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/platform/v1/zones/6"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 6, "name": "Beta"})))
        .expect(1)
        .mount(&server)
        .await;

    let platform = platform(&server);
    let mut zones: ZoneTable = platform.fetch_zones().await.unwrap().into_iter().collect();
    let entities: Vec<zonescoper_core::Entity> = serde_json::from_value(json!([
        namespace("Alpha", "c1", "a"),
        namespace("Beta", "c1", "b"),
    ]))
    .unwrap();
    let grouping = Grouping::from_entities(&entities, &GroupingLabels::new("product"));

    let report = ZoneReconciler::new(&platform)
        .reconcile(&grouping, &mut zones, &RetentionSet::default())
        .await;

    assert_eq!(report.failures(), 1);
    assert!(matches!(
        &report.outcomes[0].action,
        ZoneAction::Failed(e) if e.contains("Alpha") && e.contains("422")
    ));
    assert_eq!(report.outcomes[1].action, ZoneAction::Updated);
}

#[tokio::test]
async fn test_mapping_binds_known_zones_only() {
    let server = MockServer::start().await;
    mount_zones(&server, json!([{"id": 7, "name": "ZoneFoo"}])).await;
    Mock::given(method("GET"))
        .and(path("/platform/v1/teams"))
        .and(query_param("filter", "name:TeamA"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": []})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/platform/v1/teams"))
        .and(body_partial_json(json!({
            "name": "TeamA",
            "description": "TeamA",
            "zoneIds": [7],
            "isDefaultTeam": false,
            "standardTeamRole": "ROLE_TEAM_READ"
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": 300, "name": "TeamA"})))
        .expect(1)
        .mount(&server)
        .await;

    let platform = platform(&server);
    let zones: ZoneTable = platform.fetch_zones().await.unwrap().into_iter().collect();
    let template: Team = serde_json::from_value(json!({
        "id": 3,
        "version": 4,
        "name": "template",
        "isDefaultTeam": true,
        "standardTeamRole": "ROLE_TEAM_READ"
    }))
    .unwrap();
    let mut mapping = TeamZoneMapping::new();
    mapping.insert(
        "TeamA".to_string(),
        vec!["ZoneFoo".to_string(), "ZoneBar".to_string()],
    );

    let report = MappedTeamReconciler::new(&platform, &template)
        .reconcile(&mapping, &zones)
        .await;

    assert_eq!(report.outcomes[0].action, TeamAction::Created);
    assert_eq!(report.outcomes[0].zone_ids, vec![7]);
}

#[tokio::test]
async fn test_monitor_dry_run_only_looks_up() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/platform/v1/teams"))
        .and(query_param("filter", "name:mon-Billing"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{"id": 11, "name": "mon-Billing-old"}]
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/platform/v1/teams"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&server)
        .await;

    let platform = platform(&server);
    let entities: Vec<zonescoper_core::Entity> =
        serde_json::from_value(json!([namespace("Billing", "c1", "pay")])).unwrap();
    let grouping = Grouping::from_entities(&entities, &GroupingLabels::new("product"));
    let options = MonitorOptions {
        prefix: "mon-".into(),
        grouping_label: "product".into(),
        dry_run: true,
    };
    let template = Team::default();

    let report = MonitorTeamReconciler::new(&platform, &template, options)
        .reconcile(&grouping)
        .await;

    assert_eq!(report.outcomes[0].name, "mon-Billing");
    assert_eq!(report.outcomes[0].action, TeamAction::WouldCreate);
}
