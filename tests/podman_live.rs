//! Integration tests against a real podman.
//!
//! Tests are skipped if podman is not available or SKIP_CONTAINER_TESTS=1.

use isopod::command::CreateContainer;
use isopod::config::IsopodConfig;
use isopod::managers::{EngineContext, ProbeOutcome};
use serial_test::serial;
use tempfile::TempDir;
use test_tag::tag;

/// Check if container tests should run.
fn should_run_container_tests() -> bool {
    if let Ok(value) = std::env::var("SKIP_CONTAINER_TESTS")
        && (value == "1" || value.eq_ignore_ascii_case("true"))
    {
        return false;
    }

    std::process::Command::new("podman")
        .arg("info")
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false)
}

fn in_memory_config() -> IsopodConfig {
    let mut config = IsopodConfig::default();
    config.log.persist = false;
    config
}

async fn default_storage_context() -> EngineContext {
    EngineContext::from_config(&in_memory_config())
        .await
        .expect("Failed to build context")
}

#[tokio::test]
#[serial]
#[tag(integration, container)]
async fn test_listings_parse_live_output() {
    if !should_run_container_tests() {
        eprintln!("Skipping container tests (podman not available or SKIP_CONTAINER_TESTS=1)");
        return;
    }

    let context = default_storage_context().await;

    let containers = context.containers().list().await.unwrap();
    let images = context.images().list().await.unwrap();
    let volumes = context.volumes().list().await.unwrap();
    let networks = context.networks().list().await.unwrap();
    let pods = context.pods().list().await.unwrap();

    for table in [&containers, &images, &volumes, &networks, &pods] {
        for row in table.data_rows() {
            assert_eq!(row.len(), table.header().len());
        }
    }

    // The default network always exists
    assert!(!networks.is_empty());
    assert_eq!(context.log().len().await, 5);
}

#[tokio::test]
#[serial]
#[tag(integration, container)]
async fn test_isolated_root_probe() {
    if !should_run_container_tests() {
        eprintln!("Skipping container tests");
        return;
    }

    let temp = TempDir::new().unwrap();
    let mut config = in_memory_config();
    config.root.path = Some(temp.path().join("root"));

    let context = EngineContext::from_config(&config).await.unwrap();
    let outcome = context.system().probe_and_recover().await.unwrap();

    assert!(matches!(
        outcome,
        ProbeOutcome::Healthy | ProbeOutcome::Recovered
    ));
}

#[tokio::test]
#[serial]
#[tag(integration, container)]
async fn test_volume_create_and_remove() {
    if !should_run_container_tests() {
        eprintln!("Skipping container tests");
        return;
    }

    let context = default_storage_context().await;
    let name = "isopod-test-volume";
    let _ = context.volumes().remove(name).await;

    let created = context.volumes().create(name).await.unwrap();
    assert!(created.success(), "{}", created.stderr_text());

    let listed = context.volumes().list().await.unwrap();
    let column = listed.column("Volume Name").unwrap();
    assert!(listed.data_rows().iter().any(|row| row[column] == name));

    let removed = context.volumes().remove(name).await.unwrap();
    assert!(removed.success(), "{}", removed.stderr_text());
}

#[tokio::test]
#[serial]
#[tag(integration, container)]
async fn test_container_lifecycle() {
    if !should_run_container_tests() {
        eprintln!("Skipping container tests");
        return;
    }

    let context = default_storage_context().await;
    let containers = context.containers();
    let name = "isopod-test-c1";
    let _ = containers.remove(name).await;

    let pulled = context
        .images()
        .pull("docker.io/library/alpine:latest")
        .await
        .unwrap();
    if !pulled.success() {
        eprintln!("Skipping lifecycle test, pull failed: {}", pulled.stderr_text());
        return;
    }

    let request = CreateContainer::new(name, "docker.io/library/alpine:latest")
        .with_command("sleep 60")
        .with_flags(true, false, false);
    let created = containers.create(request).await.unwrap();
    assert!(created.success(), "{}", created.stderr_text());

    let listed = containers.list().await.unwrap();
    let names = listed.column("NAMES").unwrap();
    assert!(listed.data_rows().iter().any(|row| row[names] == name));

    let removed = containers.remove(name).await.unwrap();
    assert!(removed.success(), "{}", removed.stderr_text());
}
