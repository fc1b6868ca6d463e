//! Shared fixtures for the integration tests.

#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use serde_json::{Map, Value, json};
use tfc_endpoints::{Tfc, TfcConfig};

pub const TOKEN: &str = "test-token";
pub const WORKSPACE_ID: &str = "ws-SihZTyXKfNXUWuUa";
pub const RUN_ID: &str = "run-CZcmD7eagjhyX0vN";

/// Client pointed at a mock server, polling every few milliseconds.
pub fn api(server: &mockito::Server) -> Tfc {
    let cfg = TfcConfig::new(TOKEN)
        .with_base_url(server.url())
        .with_org_name("terrasnek_unittest")
        .with_polling(5, 20, 2_000);
    Tfc::new(cfg).unwrap()
}

/// JSON body of a run as `GET /runs/:id` returns it.
pub fn run_body(status: &str, confirmable: bool, timestamps: &[(&str, &str)]) -> String {
    let mut ts = Map::new();
    for (k, v) in timestamps {
        ts.insert((*k).to_string(), Value::String((*v).to_string()));
    }
    json!({
        "data": {
            "id": RUN_ID,
            "type": "runs",
            "attributes": {
                "status": status,
                "is-destroy": false,
                "message": "Queued manually via the Terraform Enterprise API",
                "canceled-at": null,
                "actions": {
                    "is-cancelable": true,
                    "is-confirmable": confirmable,
                    "is-discardable": confirmable,
                    "is-force-cancelable": false
                },
                "status-timestamps": ts
            },
            "relationships": {
                "workspace": { "data": { "id": WORKSPACE_ID, "type": "workspaces" } }
            },
            "links": { "self": format!("/api/v2/runs/{RUN_ID}") }
        }
    })
    .to_string()
}

/// A run that plans on the second `show` and then reflects whichever action
/// was taken on it.
#[derive(Clone, Default)]
pub struct FakeRun {
    shows: Arc<AtomicUsize>,
    action: Arc<AtomicUsize>,
}

pub const NO_ACTION: usize = 0;
pub const APPLIED: usize = 1;
pub const DISCARDED: usize = 2;
pub const CANCELED: usize = 3;

impl FakeRun {
    pub fn record(&self, action: usize) {
        self.action.store(action, Ordering::SeqCst);
    }

    pub fn show_count(&self) -> usize {
        self.shows.load(Ordering::SeqCst)
    }

    pub fn next_show(&self) -> Vec<u8> {
        let n = self.shows.fetch_add(1, Ordering::SeqCst);
        let queued = ("plan-queueable-at", "2021-05-24T07:38:04+00:00");
        let planned = ("planned-at", "2021-05-24T07:38:25+00:00");

        let body = match self.action.load(Ordering::SeqCst) {
            APPLIED => run_body(
                "applying",
                false,
                &[queued, planned, ("applying-at", "2021-05-24T07:39:01+00:00")],
            ),
            DISCARDED => run_body(
                "discarded",
                false,
                &[queued, planned, ("discarded-at", "2021-05-24T07:39:02+00:00")],
            ),
            CANCELED => run_body(
                "canceled",
                false,
                &[queued, ("force-canceled-at", "2021-05-24T07:39:03+00:00")],
            ),
            _ if n == 0 => run_body("pending", false, &[queued]),
            _ => run_body("planned", true, &[queued, planned]),
        };
        body.into_bytes()
    }
}
