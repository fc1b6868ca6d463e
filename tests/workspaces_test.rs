//! Workspace, variable and OAuth client endpoints against a mock service.

mod common;

use common::{WORKSPACE_ID, api};
use mockito::{Matcher, Server};
use serde_json::{Value, json};
use tfc_endpoints::tfc_oauth_clients::github_oauth_client_payload;
use tfc_endpoints::tfc_workspaces::workspace_create_payload;
use tfc_endpoints::{
    Endpoint, PageParams, Tfc, TfcConfig, TfcError, VariableCategory, VariablePayload,
};

const ORG: &str = "terrasnek_unittest";
const VAR_ID: &str = "var-EavQ1LztoRTQHSNT";
const OAUTH_CLIENT_ID: &str = "oc-XKFwG6ggfA9n7t1K";
const OAUTH_TOKEN_ID: &str = "ot-KaeqH4cy72VPXFQT";

fn workspace(name: &str) -> Value {
    json!({
        "id": WORKSPACE_ID,
        "type": "workspaces",
        "attributes": { "name": name, "auto-apply": false },
        "relationships": {
            "organization": { "data": { "id": ORG, "type": "organizations" } }
        }
    })
}

fn variable(value: &str) -> Value {
    json!({
        "data": {
            "id": VAR_ID,
            "type": "vars",
            "attributes": { "key": "region", "value": value, "category": "terraform" },
            "relationships": {
                "configurable": { "data": { "id": WORKSPACE_ID, "type": "workspaces" } }
            }
        }
    })
}

fn oauth_client() -> Value {
    json!({
        "data": {
            "id": OAUTH_CLIENT_ID,
            "type": "oauth-clients",
            "attributes": { "service-provider": "github" },
            "relationships": {
                "oauth-tokens": { "data": [ { "id": OAUTH_TOKEN_ID, "type": "oauth-tokens" } ] }
            }
        }
    })
}

#[tokio::test]
async fn test_workspaces() {
    let mut server = Server::new_async().await;
    let org_path = format!("/api/v2/organizations/{ORG}/workspaces");
    let ws_path = format!("/api/v2/workspaces/{WORKSPACE_ID}");

    let create = server
        .mock("POST", org_path.as_str())
        .match_header("authorization", "Bearer test-token")
        .match_header("content-type", "application/vnd.api+json")
        .match_body(Matcher::PartialJson(json!({
            "data": {
                "type": "workspaces",
                "attributes": {
                    "name": "terrasnek",
                    "vcs-repo": { "identifier": "acme/infra", "oauth-token-id": OAUTH_TOKEN_ID }
                }
            }
        })))
        .with_status(201)
        .with_body(json!({ "data": workspace("terrasnek") }).to_string())
        .create_async()
        .await;
    let list = server
        .mock("GET", org_path.as_str())
        .match_header("authorization", "Bearer test-token")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("page[number]".into(), "1".into()),
            Matcher::UrlEncoded("page[size]".into(), "20".into()),
        ]))
        .with_status(200)
        .with_body(json!({ "data": [workspace("terrasnek")] }).to_string())
        .create_async()
        .await;
    let show = server
        .mock("GET", ws_path.as_str())
        .match_header("authorization", "Bearer test-token")
        .with_status(200)
        .with_body(json!({ "data": workspace("terrasnek") }).to_string())
        .create_async()
        .await;
    let update = server
        .mock("PATCH", ws_path.as_str())
        .match_header("authorization", "Bearer test-token")
        .match_body(Matcher::PartialJson(json!({
            "data": { "attributes": { "name": "terrasnek-renamed" } }
        })))
        .with_status(200)
        .with_body(json!({ "data": workspace("terrasnek-renamed") }).to_string())
        .create_async()
        .await;
    let destroy = server
        .mock("DELETE", ws_path.as_str())
        .match_header("authorization", "Bearer test-token")
        .with_status(204)
        .create_async()
        .await;

    let api = api(&server);
    let workspaces = api.workspaces();
    assert!(workspaces.required_entitlements().is_empty());

    let created = workspaces
        .create(&workspace_create_payload("terrasnek", Some((OAUTH_TOKEN_ID, "acme/infra"))))
        .await
        .unwrap();
    assert_eq!(created.data.id, WORKSPACE_ID);
    assert_eq!(created.data.related_id("organization"), Some(ORG));

    let listed = workspaces.list(PageParams::new(1, 20)).await.unwrap();
    assert_eq!(listed.ids(), vec![WORKSPACE_ID]);

    let shown = workspaces.show(WORKSPACE_ID).await.unwrap();
    assert_eq!(shown.data.attributes, created.data.attributes);

    let renamed = workspaces
        .update(
            WORKSPACE_ID,
            &json!({
                "data": { "type": "workspaces", "attributes": { "name": "terrasnek-renamed" } }
            }),
        )
        .await
        .unwrap();
    assert_eq!(renamed.data.attribute("name"), Some(&json!("terrasnek-renamed")));

    assert!(workspaces.destroy(WORKSPACE_ID).await.unwrap().is_none());

    create.assert_async().await;
    list.assert_async().await;
    show.assert_async().await;
    update.assert_async().await;
    destroy.assert_async().await;
}

#[tokio::test]
async fn test_variables() {
    let mut server = Server::new_async().await;
    let vars_path = format!("/api/v2/workspaces/{WORKSPACE_ID}/vars");
    let var_path = format!("{vars_path}/{VAR_ID}");

    let create = server
        .mock("POST", vars_path.as_str())
        .match_header("authorization", "Bearer test-token")
        .match_header("content-type", "application/vnd.api+json")
        .match_body(Matcher::Json(json!({
            "data": {
                "type": "vars",
                "attributes": {
                    "key": "region",
                    "value": "eu-west-1",
                    "category": "terraform",
                    "sensitive": false,
                    "hcl": false
                }
            }
        })))
        .with_status(201)
        .with_body(variable("eu-west-1").to_string())
        .create_async()
        .await;
    let list = server
        .mock("GET", vars_path.as_str())
        .match_header("authorization", "Bearer test-token")
        .with_status(200)
        .with_body(json!({ "data": [variable("eu-west-1")["data"].clone()] }).to_string())
        .create_async()
        .await;
    let update = server
        .mock("PATCH", var_path.as_str())
        .match_header("authorization", "Bearer test-token")
        .match_body(Matcher::PartialJson(json!({
            "data": { "attributes": { "value": "us-east-2" } }
        })))
        .with_status(200)
        .with_body(variable("us-east-2").to_string())
        .create_async()
        .await;
    let destroy = server
        .mock("DELETE", var_path.as_str())
        .match_header("authorization", "Bearer test-token")
        .with_status(204)
        .create_async()
        .await;

    let api = api(&server);
    let vars = api.variables();

    let payload = VariablePayload::new("region", "eu-west-1").category(VariableCategory::Terraform);
    let created = vars
        .create(WORKSPACE_ID, &payload.to_document().unwrap())
        .await
        .unwrap();
    assert_eq!(created.data.related_id("configurable"), Some(WORKSPACE_ID));

    let listed = vars.list(WORKSPACE_ID).await.unwrap();
    assert!(listed.find(VAR_ID).is_some());

    let updated = vars
        .update(
            WORKSPACE_ID,
            VAR_ID,
            &json!({ "data": { "type": "vars", "attributes": { "value": "us-east-2" } } }),
        )
        .await
        .unwrap();
    assert_eq!(updated.data.attribute("value"), Some(&json!("us-east-2")));

    assert!(vars.destroy(WORKSPACE_ID, VAR_ID).await.unwrap().is_none());

    create.assert_async().await;
    list.assert_async().await;
    update.assert_async().await;
    destroy.assert_async().await;
}

#[tokio::test]
async fn test_oauth_clients() {
    let mut server = Server::new_async().await;
    let org_path = format!("/api/v2/organizations/{ORG}/oauth-clients");
    let client_path = format!("/api/v2/oauth-clients/{OAUTH_CLIENT_ID}");

    let create = server
        .mock("POST", org_path.as_str())
        .match_header("authorization", "Bearer test-token")
        .match_header("content-type", "application/vnd.api+json")
        .match_body(Matcher::PartialJson(json!({
            "data": {
                "type": "oauth-clients",
                "attributes": { "service-provider": "github", "oauth-token-string": "gh-token" }
            }
        })))
        .with_status(201)
        .with_body(oauth_client().to_string())
        .create_async()
        .await;
    let list = server
        .mock("GET", org_path.as_str())
        .match_header("authorization", "Bearer test-token")
        .with_status(200)
        .with_body(json!({ "data": [oauth_client()["data"].clone()] }).to_string())
        .create_async()
        .await;
    let show = server
        .mock("GET", client_path.as_str())
        .match_header("authorization", "Bearer test-token")
        .with_status(200)
        .with_body(oauth_client().to_string())
        .create_async()
        .await;
    let destroy = server
        .mock("DELETE", client_path.as_str())
        .match_header("authorization", "Bearer test-token")
        .with_status(204)
        .create_async()
        .await;

    let api = api(&server);
    let clients = api.oauth_clients();

    let created = clients
        .create(&github_oauth_client_payload("gh-token"))
        .await
        .unwrap();
    assert_eq!(created.data.related_ids("oauth-tokens"), vec![OAUTH_TOKEN_ID]);

    assert_eq!(clients.list().await.unwrap().ids(), vec![OAUTH_CLIENT_ID]);
    assert_eq!(clients.show(OAUTH_CLIENT_ID).await.unwrap(), created);
    assert!(clients.destroy(OAUTH_CLIENT_ID).await.unwrap().is_none());

    create.assert_async().await;
    list.assert_async().await;
    show.assert_async().await;
    destroy.assert_async().await;
}

#[tokio::test]
async fn org_scoped_calls_fail_before_any_request() {
    let mut server = Server::new_async().await;
    let list = server
        .mock("GET", Matcher::Any)
        .expect(0)
        .create_async()
        .await;
    let create = server
        .mock("POST", Matcher::Any)
        .expect(0)
        .create_async()
        .await;

    let cfg = TfcConfig::new("test-token").with_base_url(server.url());
    let api = Tfc::new(cfg).unwrap();

    let err = api
        .workspaces()
        .list(PageParams::default())
        .await
        .unwrap_err();
    assert!(matches!(err, TfcError::MissingOrganization));
    let err = api
        .oauth_clients()
        .create(&github_oauth_client_payload("gh"))
        .await
        .unwrap_err();
    assert!(matches!(err, TfcError::MissingOrganization));

    list.assert_async().await;
    create.assert_async().await;
}
