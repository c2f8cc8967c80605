//! Full lifecycle test against the live mock server.
//!
//! # Design
//! Starts the mock server on a random port, then exercises every adapter
//! operation over real HTTP through `UreqTransport`.

use dbclient_core::{
    AdapterConfig, ClientAttributes, ConfigError, DatabaseClientAdapter, FilterSpec,
    PaginationSpec, SortOrder, SortSpec, UreqTransport,
};

const PROFILE: &str = "integration";

fn start_server() -> std::net::SocketAddr {
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
            mock_server::run(listener).await
        })
        .unwrap();
    });

    addr
}

fn adapter(addr: std::net::SocketAddr) -> DatabaseClientAdapter<UreqTransport> {
    let config = AdapterConfig {
        base_url: format!("http://{addr}"),
        url_path: "/clients/".to_string(),
        timeout_secs: Some(5),
        max_body_bytes: None,
    };
    DatabaseClientAdapter::new(&config, UreqTransport::from_config(&config)).unwrap()
}

#[test]
fn crud_lifecycle() {
    let adapter = adapter(start_server());

    // Step 1: nothing stored yet.
    assert_eq!(adapter.count_by(PROFILE, None, false).unwrap(), 0);
    assert!(adapter.get_by_id("web", PROFILE).unwrap().is_none());

    // Step 2: create two clients.
    let web = ClientAttributes::new("web")
        .with_attribute("client_name", "Web Portal")
        .with_attribute("status", "active")
        .with_attribute("tags", serde_json::json!(["a", "b"]));
    let created = adapter.create(&web, PROFILE).unwrap();
    assert_eq!(created.client_id, "web");
    let meta = created.meta.clone().unwrap();
    assert_eq!(meta.resource_type.as_deref(), Some("dbClient"));
    assert!(meta.created.is_some());
    assert_eq!(meta.created, meta.last_modified);

    let cli = ClientAttributes::new("cli")
        .with_attribute("client_name", "Command Line")
        .with_attribute("status", "revoked")
        .with_attribute("tags", serde_json::json!(["a"]));
    adapter.create(&cli, PROFILE).unwrap();

    // Step 3: duplicate create is an HTTP error.
    let err = adapter.create(&web, PROFILE).unwrap_err();
    assert!(err.is_transport());

    // Step 4: get returns what was stored.
    let fetched = adapter.get_by_id("web", PROFILE).unwrap().unwrap();
    assert_eq!(fetched, created);

    // Step 5: filtered list and count.
    let filters = FilterSpec {
        tags_filter: vec!["a".into(), "b".into()],
        ..FilterSpec::default()
    };
    let page = adapter
        .list_by(PROFILE, Some(&filters), None, None, true)
        .unwrap();
    assert_eq!(page.items.len(), 1);
    assert_eq!(page.items[0].client_id, "web");
    assert!(page.cursor.is_none());

    let tagged_a = FilterSpec {
        tags_filter: vec!["a".into()],
        ..FilterSpec::default()
    };
    assert_eq!(adapter.count_by(PROFILE, Some(&tagged_a), false).unwrap(), 2);
    assert_eq!(adapter.count_by(PROFILE, Some(&tagged_a), true).unwrap(), 1);

    // Step 6: sorted page echoes the cursor.
    let pagination = PaginationSpec {
        count: Some(1),
        cursor: Some("1".into()),
    };
    let sort = SortSpec {
        sort_by: Some("client_name".into()),
        sort_order: SortOrder::Ascending,
        secondary_sort_by: None,
    };
    let page = adapter
        .list_by(PROFILE, None, Some(&pagination), Some(&sort), false)
        .unwrap();
    assert_eq!(page.items.len(), 1);
    assert_eq!(page.items[0].client_id, "web");
    assert_eq!(page.cursor.as_deref(), Some("1"));

    // Step 7: update keeps the stored creation time.
    let renamed = fetched.clone().with_attribute("client_name", "Web Portal 2");
    let updated = adapter.update(&renamed, PROFILE).unwrap();
    assert_eq!(updated.client_name(), Some("Web Portal 2"));
    let updated_meta = updated.meta.unwrap();
    assert_eq!(updated_meta.created, meta.created);
    assert!(updated_meta.last_modified_at() >= meta.last_modified_at());

    // Step 8: delete, then delete again.
    assert!(adapter.delete("web", PROFILE).unwrap());
    assert!(!adapter.delete("web", PROFILE).unwrap());

    // Step 9: gone.
    assert!(adapter.get_by_id("web", PROFILE).unwrap().is_none());
    assert_eq!(adapter.count_by(PROFILE, None, false).unwrap(), 1);
}

#[test]
fn ids_with_reserved_characters_round_trip() {
    let adapter = adapter(start_server());
    let id = "team a/prod?#1";

    adapter.create(&ClientAttributes::new(id), PROFILE).unwrap();
    let fetched = adapter.get_by_id(id, PROFILE).unwrap().unwrap();
    assert_eq!(fetched.client_id, id);

    assert!(adapter.delete(id, PROFILE).unwrap());
    assert!(adapter.get_by_id(id, PROFILE).unwrap().is_none());
}

#[test]
fn relative_url_path_is_rejected_at_construction() {
    let config = AdapterConfig {
        url_path: "clients".to_string(),
        ..AdapterConfig::default()
    };
    let result = DatabaseClientAdapter::new(&config, UreqTransport::from_config(&config));
    assert!(matches!(result, Err(ConfigError::Invalid { field: "url_path", .. })));
}

#[test]
fn update_of_unknown_client_is_an_error() {
    let adapter = adapter(start_server());
    let err = adapter
        .update(&ClientAttributes::new("ghost"), PROFILE)
        .unwrap_err();
    assert!(matches!(
        err,
        dbclient_core::ApiError::HttpError { status: 404, .. }
    ));
}
