//! End-to-end scenarios for the run console
//!
//! These tests drive the orchestrator and the bundle form against a
//! scripted in-memory tester API, covering the full submit-and-stream
//! flow, reattachment to an in-progress run, and the bundle editing
//! round trip. No network is involved.

use std::collections::VecDeque;
use std::path::Path;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use gnxi_console::api::{
    ConsoleApi, Device, DeviceRegistry, FileResponse, PromptBundle, PromptBundleSet, PromptSchema,
    RunRequest, Test, TestCatalog,
};
use gnxi_console::console::{
    BundleForm, FieldGroup, OutputSink, RunOrchestrator, RunState, TickOutcome,
};
use gnxi_console::{Error, Result};

/// Scripted response for one `/run/output` fetch
enum Fetch {
    Chunk(&'static str),
    Empty,
    Fail,
}

/// In-memory tester service with scriptable output and failure injection
#[derive(Default)]
struct FakeTester {
    devices: DeviceRegistry,
    bundles: Mutex<PromptBundleSet>,
    schema: PromptSchema,
    catalog: TestCatalog,
    order: Vec<String>,
    fetches: Mutex<VecDeque<Fetch>>,
    submitted: Mutex<Vec<RunRequest>>,
    uploads: Mutex<Vec<String>>,
    registry_down: bool,
}

impl FakeTester {
    /// A tester with one device, one bundle, and a three-test catalog
    fn seeded() -> Self {
        let device = Device {
            address: "10.0.0.1:9339".to_string(),
            ..Device::default()
        };
        let bundle = PromptBundle {
            name: "lab".to_string(),
            prompts: [("username".to_string(), "admin".to_string())].into(),
            files: [("ca_cert".to_string(), "ca.crt".to_string())].into(),
        };
        let tests = ["provision", "gnoi os install", "gnoi reset"]
            .iter()
            .map(|name| Test {
                name: name.to_string(),
                ..Test::default()
            })
            .collect();
        Self {
            devices: [("r1".to_string(), device)].into(),
            bundles: Mutex::new([("lab".to_string(), bundle)].into()),
            schema: PromptSchema {
                prompts: vec!["username".to_string(), "password".to_string()],
                files: vec!["ca_cert".to_string(), "ca_key".to_string()],
            },
            catalog: [("suite".to_string(), tests)].into(),
            order: vec!["provision".to_string(), "gnoi os install".to_string()],
            ..Self::default()
        }
    }

    /// Queue scripted output fetches. Must be called after the console's
    /// startup probe (which consumes one fetch itself) except when a test
    /// wants the probe to find a run in progress.
    fn script_output(&self, fetches: Vec<Fetch>) {
        *self.fetches.lock().unwrap() = fetches.into();
    }
}

#[async_trait]
impl ConsoleApi for &FakeTester {
    async fn get_devices(&self) -> Result<DeviceRegistry> {
        if self.registry_down {
            return Err(Error::api("/target", 502));
        }
        Ok(self.devices.clone())
    }

    async fn get_device(&self, name: &str) -> Result<Device> {
        self.devices
            .get(name)
            .cloned()
            .ok_or_else(|| Error::api("/target", 400))
    }

    async fn set_device(&self, _name: &str, _device: &Device) -> Result<()> {
        Ok(())
    }

    async fn delete_device(&self, _name: &str) -> Result<()> {
        Ok(())
    }

    async fn get_bundles(&self) -> Result<PromptBundleSet> {
        if self.registry_down {
            return Err(Error::api("/prompts", 502));
        }
        Ok(self.bundles.lock().unwrap().clone())
    }

    async fn get_schema(&self) -> Result<PromptSchema> {
        Ok(self.schema.clone())
    }

    async fn set_bundle(&self, bundle: &PromptBundle) -> Result<()> {
        self.bundles
            .lock()
            .unwrap()
            .insert(bundle.name.clone(), bundle.clone());
        Ok(())
    }

    async fn delete_bundle(&self, name: &str) -> Result<()> {
        self.bundles.lock().unwrap().remove(name);
        Ok(())
    }

    async fn get_tests(&self) -> Result<TestCatalog> {
        Ok(self.catalog.clone())
    }

    async fn get_test_order(&self) -> Result<Vec<String>> {
        Ok(self.order.clone())
    }

    async fn submit_run(&self, request: &RunRequest) -> Result<()> {
        self.submitted.lock().unwrap().push(request.clone());
        Ok(())
    }

    async fn fetch_output(&self) -> Result<Option<String>> {
        match self.fetches.lock().unwrap().pop_front() {
            Some(Fetch::Chunk(s)) => Ok(Some(s.to_string())),
            Some(Fetch::Empty) | None => Ok(None),
            Some(Fetch::Fail) => Err(Error::api("/run/output", 500)),
        }
    }

    async fn upload_file(&self, path: &Path) -> Result<FileResponse> {
        self.uploads
            .lock()
            .unwrap()
            .push(path.display().to_string());
        Ok(FileResponse {
            filename: format!("4f2a-{}", path.file_name().unwrap().to_string_lossy()),
        })
    }

    async fn delete_file(&self, _name: &str) -> Result<()> {
        Ok(())
    }
}

#[derive(Default)]
struct RecordingSink {
    chunks: Vec<String>,
}

impl OutputSink for RecordingSink {
    fn append(&mut self, chunk: &str) {
        self.chunks.push(chunk.to_string());
    }

    fn scroll_to_bottom(&mut self) {}
}

fn console(tester: &FakeTester) -> RunOrchestrator<&FakeTester, RecordingSink> {
    RunOrchestrator::new(tester, RecordingSink::default(), Duration::from_millis(1))
}

#[tokio::test]
async fn full_run_streams_to_completion() {
    let tester = FakeTester::seeded();

    let mut console = console(&tester);
    assert!(!console.startup().await);
    tester.script_output(vec![
        Fetch::Chunk("\u{1b}[1mgnoi.os\u{1b}[0m\n"),
        Fetch::Empty,
        Fetch::Chunk("\u{1b}[32;1mInstall success\u{1b}[0m\n"),
        Fetch::Chunk("E0F"),
    ]);
    console.select_device("r1").unwrap();
    console.select_bundle("lab").unwrap();
    console.submit().await.unwrap();
    console.stream().await.unwrap();

    assert_eq!(console.state(), RunState::Idle);
    assert!(!console.form().is_disabled());
    assert_eq!(
        console.output(),
        "<strong class=\"underline\">gnoi.os</strong>\n\
         <strong class=\"green\">Install success</strong>\n"
    );

    let submitted = tester.submitted.lock().unwrap();
    assert_eq!(
        *submitted,
        [RunRequest {
            prompts: "lab".to_string(),
            device: "r1".to_string(),
            tests: vec!["provision".to_string(), "gnoi os install".to_string()],
        }]
    );
}

#[tokio::test]
async fn edited_order_is_submitted() {
    let tester = FakeTester::seeded();

    let mut console = console(&tester);
    console.startup().await;
    tester.script_output(vec![Fetch::Chunk("E0F")]);
    console.select_device("r1").unwrap();
    console.select_bundle("lab").unwrap();
    console.add_test("gnoi reset").unwrap();
    console.move_test(2, 0).unwrap();
    console.remove_test(2).unwrap();
    console.submit().await.unwrap();
    console.stream().await.unwrap();

    let submitted = tester.submitted.lock().unwrap();
    assert_eq!(submitted[0].tests, ["gnoi reset", "provision"]);
}

#[tokio::test]
async fn reattaches_to_run_in_progress() {
    let tester = FakeTester::seeded();
    tester.script_output(vec![
        Fetch::Chunk("resumed mid-run\n"),
        Fetch::Chunk("tail\n"),
        Fetch::Chunk("E0F"),
    ]);

    let mut console = console(&tester);
    assert!(console.startup().await);
    assert_eq!(console.state(), RunState::Streaming);
    assert!(console.form().is_disabled());

    console.stream().await.unwrap();
    assert_eq!(console.output(), "resumed mid-run\ntail\n");
    // Nothing was submitted; the console only attached to the stream.
    assert!(tester.submitted.lock().unwrap().is_empty());
}

#[tokio::test]
async fn survives_transport_failures_until_sentinel() {
    let tester = FakeTester::seeded();

    let mut console = console(&tester);
    console.startup().await;
    tester.script_output(vec![
        Fetch::Fail,
        Fetch::Chunk("a"),
        Fetch::Fail,
        Fetch::Fail,
        Fetch::Chunk("b"),
        Fetch::Chunk("E0F"),
    ]);
    console.select_device("r1").unwrap();
    console.select_bundle("lab").unwrap();
    console.submit().await.unwrap();
    console.stream().await.unwrap();

    assert_eq!(console.output(), "ab");
    assert_eq!(console.state(), RunState::Idle);
}

#[tokio::test]
async fn registry_outage_leaves_console_usable_but_blocks_submit() {
    let tester = FakeTester {
        registry_down: true,
        ..FakeTester::seeded()
    };

    let mut console = console(&tester);
    assert!(!console.startup().await);
    assert_eq!(console.state(), RunState::Idle);
    assert!(console.devices().is_empty());
    assert!(console.bundles().is_empty());
    // Validation blocks submission without a valid selection.
    assert!(matches!(
        console.select_device("r1"),
        Err(Error::UnknownDevice(_))
    ));
}

#[tokio::test]
async fn stray_ticks_after_completion_are_ignored() {
    let tester = FakeTester::seeded();

    let mut console = console(&tester);
    console.startup().await;
    tester.script_output(vec![
        Fetch::Chunk("out"),
        Fetch::Chunk("E0F"),
        Fetch::Chunk("late"),
    ]);
    console.select_device("r1").unwrap();
    console.select_bundle("lab").unwrap();
    console.submit().await.unwrap();

    assert_eq!(console.poll_once().await, TickOutcome::Appended);
    assert_eq!(console.poll_once().await, TickOutcome::Finished);
    assert_eq!(console.state(), RunState::Completed);
    assert_eq!(console.poll_once().await, TickOutcome::Ignored);
    assert_eq!(console.poll_once().await, TickOutcome::Ignored);
    assert_eq!(console.output(), "out");
}

#[tokio::test]
async fn bundle_edit_round_trip_through_upload() {
    let tester = FakeTester::seeded();

    let schema = (&tester).get_schema().await.unwrap();
    let bundles = (&tester).get_bundles().await.unwrap();

    let mut form = BundleForm::build(&schema);
    form.hydrate(bundles.get("lab"));
    form.set_field(FieldGroup::Prompts, "password", "hunter2")
        .unwrap();

    // A completed upload patches its handle into the form without
    // disturbing the in-progress edit.
    let response = (&tester).upload_file(Path::new("ca.key")).await.unwrap();
    form.set_field(FieldGroup::Files, "ca_key", &response.filename)
        .unwrap();

    form.validate().unwrap();
    let bundle = form.serialize();
    (&tester).set_bundle(&bundle).await.unwrap();

    let saved = tester.bundles.lock().unwrap()["lab"].clone();
    assert_eq!(saved.name, "lab");
    assert_eq!(saved.prompts["username"], "admin");
    assert_eq!(saved.prompts["password"], "hunter2");
    assert_eq!(saved.files["ca_cert"], "ca.crt");
    assert_eq!(saved.files["ca_key"], "4f2a-ca.key");
    assert_eq!(*tester.uploads.lock().unwrap(), ["ca.key"]);
}

#[tokio::test]
async fn deselecting_a_bundle_clears_the_form() {
    let tester = FakeTester::seeded();
    let schema = (&tester).get_schema().await.unwrap();
    let bundles = (&tester).get_bundles().await.unwrap();

    let mut form = BundleForm::build(&schema);
    form.hydrate(bundles.get("lab"));
    assert_eq!(form.value("prompts_username"), Some("admin"));

    form.hydrate(None);
    for field in form.fields() {
        assert_eq!(field.value, "", "{} not cleared", field.name);
    }
}
