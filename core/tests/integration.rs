//! End-to-end tests against the live mock server.
//!
//! # Design
//! Starts the mock server on a random port, then drives every client
//! operation over real HTTP through the default `UreqTransport`. Validates
//! request construction, the `Api-Key` header, query encoding and response
//! handling against an actual server.

use std::io::{BufRead, BufReader, Read, Write};

use rocketreach_core::{params, ApiError, BulkLookupOptions, ManagementLevel, RocketReachClient};
use serde_json::{json, Value};

/// Start the mock server on its own thread and return its base URL.
fn start_mock_server() -> String {
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

    format!("http://{addr}")
}

fn client(base_url: &str) -> RocketReachClient {
    RocketReachClient::with_base_url(mock_server::API_KEY, base_url).unwrap()
}

/// Accept one connection on a plain socket, answer `{}` and return the raw
/// request head exactly as it arrived on the wire.
fn capture_one_request() -> (String, std::thread::JoinHandle<String>) {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();

    let handle = std::thread::spawn(move || {
        let (stream, _) = listener.accept().unwrap();
        let mut reader = BufReader::new(stream.try_clone().unwrap());

        let mut head = String::new();
        loop {
            let mut line = String::new();
            reader.read_line(&mut line).unwrap();
            if line == "\r\n" || line.is_empty() {
                break;
            }
            head.push_str(&line);
        }

        let length = head
            .lines()
            .find_map(|l| {
                let (name, value) = l.split_once(':')?;
                name.trim()
                    .eq_ignore_ascii_case("content-length")
                    .then(|| value.trim().parse::<usize>().unwrap())
            })
            .unwrap_or(0);
        let mut body = vec![0; length];
        reader.read_exact(&mut body).unwrap();

        let mut stream = stream;
        stream
            .write_all(
                b"HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: 2\r\nConnection: close\r\n\r\n{}",
            )
            .unwrap();
        head
    });

    (format!("http://{addr}"), handle)
}

fn names(body: &Value) -> Vec<&str> {
    body["profiles"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|p| p["name"].as_str())
        .collect()
}

#[test]
fn post_sends_single_content_type_header() {
    let (base, server) = capture_one_request();
    let response = client(&base)
        .search_people(&params(json!({"query": {"name": ["Ada Park"]}})))
        .unwrap();
    assert_eq!(response.body, json!({}));

    let head = server.join().unwrap();
    let content_types: Vec<&str> = head
        .lines()
        .filter(|l| l.to_ascii_lowercase().starts_with("content-type:"))
        .collect();
    assert_eq!(content_types.len(), 1, "request head:\n{head}");
    assert!(content_types[0].contains("application/json"));
    assert!(head.lines().any(|l| l.eq_ignore_ascii_case(&format!("api-key: {}", mock_server::API_KEY))));
}

#[test]
fn pass_through_operations() {
    let base = start_mock_server();
    let client = client(&base);

    // account
    let account = client.get_account().unwrap();
    assert_eq!(account.status, 200);
    assert_eq!(account.body["state"], "registered");

    let key = client.create_api_key().unwrap();
    assert_eq!(key.status, 201);
    assert!(key.body["api_key"].is_string());

    // people
    let person = client.lookup_person(&params(json!({"id": 4}))).unwrap();
    assert_eq!(person.body["name"], "Margaret Chen");

    let status = client
        .check_person_status(&params(json!({"ids": ["1", "2"]})))
        .unwrap();
    assert_eq!(status.body.as_array().unwrap().len(), 2);

    let found = client
        .search_people(&params(json!({"query": {"current_employer": ["globex.com"]}})))
        .unwrap();
    assert_eq!(found.body["profiles"].as_array().unwrap().len(), 1);

    // companies
    let company = client.lookup_company(&params(json!({"domain": "acme.com"}))).unwrap();
    assert_eq!(company.body["name"], "Acme Corp");

    let companies = client.search_companies(&params(json!({"query": {}}))).unwrap();
    assert_eq!(companies.body["companies"].as_array().unwrap().len(), 2);

    // bulk
    let queued = client
        .bulk_lookup(&[json!({"name": "Ada Park"})], &BulkLookupOptions::default())
        .unwrap();
    assert_eq!(queued.body["profile_list"], "API Bulk Lookup");
    assert_eq!(queued.body["count"], 1);

    // npi, profile-company
    let npi = client.get_npi_contact(&params(json!({"npi": 1234567890u64}))).unwrap();
    assert_eq!(npi.body["name"], "Dr. Jane Doe");

    let joined = client.lookup_profile_company(&params(json!({"id": 8}))).unwrap();
    assert_eq!(joined.body["company"]["domain"], "globex.com");
}

#[test]
fn http_failures_pass_through() {
    let base = start_mock_server();

    let err = client(&base)
        .lookup_company(&params(json!({"domain": "nowhere.invalid"})))
        .unwrap_err();
    assert!(matches!(err, ApiError::Http { status: 404, .. }));

    let wrong_key = RocketReachClient::with_base_url("wrong-key", &base).unwrap();
    let err = wrong_key.get_account().unwrap_err();
    assert!(matches!(err, ApiError::Http { status: 401, .. }));
}

#[test]
fn unreachable_host_is_transport_error() {
    // Bind then drop to get a port nothing listens on.
    let addr = std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap();
    let err = client(&format!("http://{addr}")).get_account().unwrap_err();
    assert!(matches!(err, ApiError::Transport(_)));
}

#[test]
fn company_accessors() {
    let base = start_mock_server();
    let client = client(&base);

    assert_eq!(
        client.get_company_tech_stack("acme.com").unwrap(),
        vec![json!("Rust"), json!("PostgreSQL"), json!("Kubernetes")]
    );
    assert_eq!(client.get_company_competitors("acme.com").unwrap().len(), 2);
    assert_eq!(client.get_company_industries("acme.com").unwrap()[0], "Software");
    assert_eq!(client.get_company_growth("acme.com").unwrap().len(), 2);
    assert_eq!(client.get_company_funding("acme.com").unwrap(), vec![json!("Road Runner Capital")]);
    assert_eq!(client.get_company_size("acme.com").unwrap(), json!(120));
    assert!(client.is_publicly_traded("acme.com").unwrap());

    // Globex has a sparse record.
    assert!(!client.is_publicly_traded("globex.com").unwrap());
    let err = client.get_company_competitors("globex.com").unwrap_err();
    assert_eq!(err.to_string(), "No competitor information available");
    let err = client.get_company_size("globex.com").unwrap_err();
    assert!(err.is_not_available());

    // Unknown company is a transport-tier failure, not "not available".
    let err = client.is_publicly_traded("nowhere.invalid").unwrap_err();
    assert!(!err.is_not_available());
}

#[test]
fn company_searches() {
    let base = start_mock_server();
    let client = client(&base);

    let by_tech = client.search_companies_by_tech(&["Java"]).unwrap();
    assert_eq!(by_tech.body["companies"][0]["domain"], "globex.com");

    let by_size = client.search_companies_by_size(100, 500).unwrap();
    assert_eq!(by_size.body["companies"].as_array().unwrap().len(), 1);
    assert_eq!(by_size.body["companies"][0]["domain"], "acme.com");

    let by_revenue = client.search_companies_by_revenue(1_000_000, 10_000_000).unwrap();
    assert_eq!(by_revenue.body["companies"].as_array().unwrap().len(), 1);
    assert_eq!(by_revenue.body["companies"][0]["domain"], "globex.com");

    let nearby = client.search_companies_by_location("Austin, TX", 50).unwrap();
    assert_eq!(nearby.body["companies"].as_array().unwrap().len(), 1);
    assert_eq!(nearby.body["companies"][0]["domain"], "acme.com");

    let nowhere = client.search_companies_by_location_in("Berlin, Germany", 25, "km").unwrap();
    assert_eq!(nowhere.body["companies"], json!([]));
}

#[test]
fn org_structure() {
    let base = start_mock_server();
    let client = client(&base);

    let employees = client.search_company_employees("acme.com").unwrap();
    assert_eq!(employees.body["profiles"].as_array().unwrap().len(), 7);

    let engineering = client.get_department_structure("acme.com", "Engineering").unwrap();
    assert_eq!(engineering.body["profiles"].as_array().unwrap().len(), 4);

    let leaders = client.get_leadership_team("acme.com").unwrap();
    assert_eq!(names(&leaders.body), vec!["Ada Park", "Grace Hall", "Linus Ortiz"]);

    let chart = client.get_org_chart("acme.com").unwrap();
    assert_eq!(chart.company["name"], "Acme Corp");
    let h = &chart.hierarchy;
    assert_eq!(h[&ManagementLevel::CLevel]["Executive"].len(), 2);
    assert_eq!(h[&ManagementLevel::Vp]["Engineering"].len(), 1);
    assert_eq!(h[&ManagementLevel::Director]["Engineering"].len(), 1);
    assert_eq!(h[&ManagementLevel::Manager]["Engineering"].len(), 1);
    assert_eq!(h[&ManagementLevel::IndividualContributor]["Engineering"].len(), 1);
    assert_eq!(h[&ManagementLevel::IndividualContributor]["Sales"].len(), 1);

    let reports = client.get_direct_reports(4).unwrap();
    let names: Vec<&str> = reports.iter().filter_map(|r| r["name"].as_str()).collect();
    assert_eq!(names, vec!["Ken Adams", "Dennis Ruiz"]);

    let err = client.get_org_chart("nowhere.invalid").unwrap_err();
    assert!(matches!(err, ApiError::Http { status: 404, .. }));
}
