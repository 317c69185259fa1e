//! Integration tests for the scraper
//!
//! These tests use wiremock to stand in for the statistics site and run each
//! mode end-to-end, from directory pages to the JSON artifact.

use podium::config::{Config, HttpConfig, OutputConfig, ProxyConfig, SiteConfig};
use podium::crawler::{Coordinator, Mode};
use podium::{ConfigError, PodiumError};
use std::path::Path;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration pointing at the mock site
///
/// Output files land in `dir`; the proxy list holds `proxies` verbatim.
fn create_test_config(base_url: &str, dir: &Path, proxies: &str) -> Config {
    let proxy_file = dir.join("proxies.txt");
    std::fs::write(&proxy_file, proxies).expect("Failed to write proxy list");

    Config {
        site: SiteConfig {
            base_url: base_url.to_string(),
            letters: vec!["a".to_string()],
        },
        http: HttpConfig {
            user_agent: "podium-test".to_string(),
            request_timeout_secs: 5,
            probe_timeout_secs: 1,
            max_attempts: 2,
            retry_delay_ms: 10, // Very short for testing
            workers: 4,
        },
        proxy: ProxyConfig {
            file: proxy_file.display().to_string(),
            probe_url: None,
        },
        output: OutputConfig {
            athletes_path: dir.join("full_stats.json").display().to_string(),
            nations_path: dir.join("fullStat_nation.json").display().to_string(),
            sports_path: dir.join("full_sport_by_country.json").display().to_string(),
            nations_cache: dir.join("nations.html").display().to_string(),
        },
    }
}

/// A port nothing listens on
fn dead_port() -> u16 {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("Failed to bind");
    listener.local_addr().expect("No local addr").port()
}

async fn mount_page(server: &MockServer, page: &str, body: String) {
    Mock::given(method("GET"))
        .and(path(page))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(body)
                .insert_header("content-type", "text/html"),
        )
        .mount(server)
        .await;
}

fn medal_block(code: &str, sport: &str, country: &str) -> String {
    format!(
        r#"<div class="medaille visible">
             <div class="the-medal" data-medal="{code}"></div>
             <div class="m-sport">{sport}</div>
             <img class="f" title="{country}">
             <a class="m-event">
               <div class="m-eventname">Men's +100kg</div>
               <div class="m-event-am">2012</div>
               <div class="m-event-stadt">London</div>
             </a>
           </div>"#
    )
}

fn athlete_page(first: &str, last: &str, country: &str, medals: &[String]) -> String {
    format!(
        r#"<html><body>
             <div class="vn">{first}</div><div class="nn">{last}</div>
             <div class="legende"><img title="{country}"></div>
             <div class="top m">{}</div>
           </body></html>"#,
        medals.concat()
    )
}

fn directory_page(class: &str, cards: &[(&str, &str)]) -> String {
    let cards: String = cards
        .iter()
        .map(|(href, name)| {
            format!(r#"<a class="card {class} visible" href="{href}"><div class="bez">{name}</div></a>"#)
        })
        .collect();
    format!("<html><body>{}</body></html>", cards)
}

fn read_json(path: &str) -> serde_json::Value {
    let text = std::fs::read_to_string(path).expect("Output file missing");
    serde_json::from_str(&text).expect("Output is not JSON")
}

#[tokio::test]
async fn test_athletes_run_end_to_end() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    let dir = TempDir::new().unwrap();

    mount_page(
        &mock_server,
        "/olympic-athletes/a",
        directory_page(
            "athlet",
            &[
                ("/olympic-athletes/athlete/teddy-riner-1", "Teddy Riner"),
                ("/olympic-athletes/athlete/missing-2", "Missing"),
                // Listed twice on the same letter page
                ("/olympic-athletes/athlete/teddy-riner-1", "Teddy Riner"),
            ],
        ),
    )
    .await;

    mount_page(
        &mock_server,
        "/olympic-athletes/athlete/teddy-riner-1",
        athlete_page(
            "Teddy",
            "Riner",
            "France",
            &[
                medal_block("1", "Judo", "France"),
                medal_block("3", "Judo", "France"),
                medal_block("9", "Judo", "France"),
            ],
        ),
    )
    .await;

    Mock::given(method("GET"))
        .and(path("/olympic-athletes/athlete/missing-2"))
        .respond_with(ResponseTemplate::new(404))
        .expect(2)
        .mount(&mock_server)
        .await;

    // Empty proxy list: every request goes direct
    let config = create_test_config(&base_url, dir.path(), "");
    let output_path = config.output.athletes_path.clone();

    let coordinator = Coordinator::new(config).expect("Failed to create coordinator");
    let report = coordinator.run(Mode::Athletes).await.expect("Run failed");

    assert_eq!(report.listed, 2, "duplicate athlete URLs should collapse");
    assert_eq!(report.processed, 1);
    assert_eq!(report.skipped.len(), 1);
    assert!(report.skipped[0].url.ends_with("/missing-2"));
    assert_eq!(report.output_path.as_deref(), Some(Path::new(&output_path)));

    let json = read_json(&output_path);
    assert_eq!(json["by_country"]["France"]["gold"], 1);
    assert_eq!(json["by_country"]["France"]["silver"], 0);
    assert_eq!(json["by_country"]["France"]["bronze"], 1);
    assert_eq!(json["by_country_and_sport"]["France"]["Judo"]["gold"], 1);
    assert_eq!(json["by_country_and_sport"]["France"]["Judo"]["bronze"], 1);

    let athlete = &json["athletes"][0];
    assert_eq!(athlete["name"]["first"], "Teddy");
    assert_eq!(athlete["name"]["last"], "Riner");
    assert_eq!(athlete["country"], "France");
    assert_eq!(athlete["medals"].as_array().map(Vec::len), Some(3));
    assert_eq!(athlete["medals"][0]["type"], "gold");
    assert_eq!(athlete["medals"][0]["event"], "Men's +100kg");
    assert_eq!(athlete["medals"][2]["type"], "unknown");
}

#[tokio::test]
async fn test_failed_letter_page_stays_out_of_athlete_counts() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    let dir = TempDir::new().unwrap();

    mount_page(
        &mock_server,
        "/olympic-athletes/a",
        directory_page(
            "athlet",
            &[("/olympic-athletes/athlete/teddy-riner-1", "Teddy Riner")],
        ),
    )
    .await;
    mount_page(
        &mock_server,
        "/olympic-athletes/athlete/teddy-riner-1",
        athlete_page("Teddy", "Riner", "France", &[medal_block("1", "Judo", "France")]),
    )
    .await;

    Mock::given(method("GET"))
        .and(path("/olympic-athletes/b"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&mock_server)
        .await;

    let mut config = create_test_config(&base_url, dir.path(), "");
    config.site.letters = vec!["a".to_string(), "b".to_string()];

    let coordinator = Coordinator::new(config).expect("Failed to create coordinator");
    let report = coordinator.run(Mode::Athletes).await.expect("Run failed");

    assert_eq!(report.listed, 1);
    assert_eq!(report.processed, 1);
    assert_eq!(report.skipped_listings, 1);
    assert_eq!(report.skipped_items(), 0);
    assert_eq!(report.completed(), report.listed);
    assert!(report.skipped[0].url.ends_with("/olympic-athletes/b"));
    assert!(!report.is_complete());
}

#[tokio::test]
async fn test_nations_run_keeps_directory_order() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    let dir = TempDir::new().unwrap();

    mount_page(
        &mock_server,
        "/nations",
        directory_page(
            "nation",
            &[
                ("/nation/zimbabwe", "Zimbabwe"),
                ("/nation/albania", "Albania"),
                ("/nation/atlantis", "Atlantis"),
            ],
        ),
    )
    .await;

    mount_page(
        &mock_server,
        "/nation/zimbabwe",
        r#"<div class="rnd teaser">
             <div><div class="the-medal" data-medal="1"></div><span class="mal">3</span></div>
             <div><div class="the-medal" data-medal="2"></div><span class="mal">4</span></div>
             <div><div class="the-medal" data-medal="3"></div><span class="mal">1</span></div>
           </div>"#
            .to_string(),
    )
    .await;

    // Bronze label missing
    mount_page(
        &mock_server,
        "/nation/albania",
        r#"<div class="rnd teaser">
             <div><div class="the-medal" data-medal="1"></div><span class="mal">0</span></div>
             <div><div class="the-medal" data-medal="2"></div><span class="mal">1</span></div>
             <div><div class="the-medal" data-medal="3"></div></div>
           </div>"#
            .to_string(),
    )
    .await;

    Mock::given(method("GET"))
        .and(path("/nation/atlantis"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let config = create_test_config(&base_url, dir.path(), "");
    let output_path = config.output.nations_path.clone();

    let coordinator = Coordinator::new(config).expect("Failed to create coordinator");
    let report = coordinator.run(Mode::Nations).await.expect("Run failed");

    assert_eq!(report.listed, 3);
    assert_eq!(report.processed, 2);
    assert_eq!(report.skipped.len(), 1);

    let json = read_json(&output_path);
    assert_eq!(
        json,
        serde_json::json!([
            {"country": "Zimbabwe", "gold": 3, "silver": 4, "bronze": 1},
            {"country": "Albania", "gold": 0, "silver": 1, "bronze": 0}
        ])
    );
}

#[tokio::test]
async fn test_nations_run_prefers_local_directory() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    let dir = TempDir::new().unwrap();

    // The live directory must not be requested
    Mock::given(method("GET"))
        .and(path("/nations"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    mount_page(
        &mock_server,
        "/nation/japan",
        r#"<div class="rnd teaser">
             <div><div class="the-medal" data-medal="1"></div><span class="mal">1,000</span></div>
           </div>"#
            .to_string(),
    )
    .await;

    let config = create_test_config(&base_url, dir.path(), "");
    std::fs::write(
        &config.output.nations_cache,
        directory_page("nation", &[("/nation/japan", "Japan")]),
    )
    .unwrap();
    let output_path = config.output.nations_path.clone();

    let coordinator = Coordinator::new(config).expect("Failed to create coordinator");
    coordinator.run(Mode::Nations).await.expect("Run failed");

    let json = read_json(&output_path);
    assert_eq!(json[0]["country"], "Japan");
    assert_eq!(json[0]["gold"], 1000);
}

#[tokio::test]
async fn test_sports_run_builds_table() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    let dir = TempDir::new().unwrap();

    mount_page(
        &mock_server,
        "/olympic-sports",
        directory_page(
            "sport",
            &[("/olympic-sports/judo", "Judo"), ("/olympic-sports/fencing", "Fencing")],
        ),
    )
    .await;

    let nation_card = |country: &str, gold: u32, silver: u32, bronze: u32| {
        format!(
            r#"<div class="card nation visible">
                 <img class="f" title="{country}">
                 <div class="medals">
                   <div><div class="the-medal" data-medal="1"></div><span class="mal">{gold}</span></div>
                   <div><div class="the-medal" data-medal="2"></div><span class="mal">{silver}</span></div>
                   <div><div class="the-medal" data-medal="3"></div><span class="mal">{bronze}</span></div>
                 </div>
               </div>"#
        )
    };

    mount_page(
        &mock_server,
        "/olympic-sports/judo",
        format!(
            r#"<div class="top" data-which="n">{}{}</div>"#,
            nation_card("Japan", 48, 21, 27),
            nation_card("France", 16, 14, 27)
        ),
    )
    .await;

    mount_page(
        &mock_server,
        "/olympic-sports/fencing",
        format!(
            r#"<div class="top" data-which="n">{}</div>"#,
            nation_card("France", 44, 42, 34)
        ),
    )
    .await;

    let config = create_test_config(&base_url, dir.path(), "");
    let output_path = config.output.sports_path.clone();

    let coordinator = Coordinator::new(config).expect("Failed to create coordinator");
    let report = coordinator.run(Mode::Sports).await.expect("Run failed");
    assert!(report.is_complete());

    let json = read_json(&output_path);
    assert_eq!(
        json["France"]["Fencing"],
        serde_json::json!({"gold": 44, "silver": 42, "bronze": 34})
    );
    assert_eq!(json["France"]["Judo"]["gold"], 16);
    assert_eq!(json["Japan"]["Judo"]["bronze"], 27);
    assert!(json["Japan"].get("Fencing").is_none());
}

#[tokio::test]
async fn test_dead_proxies_fall_back_to_direct() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    let dir = TempDir::new().unwrap();

    mount_page(
        &mock_server,
        "/olympic-sports",
        directory_page("sport", &[("/olympic-sports/judo", "Judo")]),
    )
    .await;
    mount_page(
        &mock_server,
        "/olympic-sports/judo",
        r#"<div class="top" data-which="n"></div>"#.to_string(),
    )
    .await;

    let proxies = format!(
        "127.0.0.1,{},user,secret\n127.0.0.1,{},user,secret\n",
        dead_port(),
        dead_port()
    );
    let config = create_test_config(&base_url, dir.path(), &proxies);

    let coordinator = Coordinator::new(config).expect("Failed to create coordinator");
    let report = coordinator.run(Mode::Sports).await.expect("Run failed");

    assert!(report.is_complete());
    assert_eq!(report.processed, 1);
}

#[tokio::test]
async fn test_missing_proxy_file_aborts() {
    let dir = TempDir::new().unwrap();
    let mut config = create_test_config("http://127.0.0.1:1", dir.path(), "");
    config.proxy.file = dir.path().join("absent.txt").display().to_string();

    let result = Coordinator::new(config);
    assert!(matches!(
        result,
        Err(PodiumError::Config(ConfigError::ProxyFileMissing { .. }))
    ));
}

#[tokio::test]
async fn test_empty_directory_aborts_without_output() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    let dir = TempDir::new().unwrap();

    mount_page(
        &mock_server,
        "/olympic-sports",
        "<html><body>maintenance</body></html>".to_string(),
    )
    .await;

    let config = create_test_config(&base_url, dir.path(), "");
    let output_path = config.output.sports_path.clone();

    let coordinator = Coordinator::new(config).expect("Failed to create coordinator");
    let result = coordinator.run(Mode::Sports).await;

    assert!(matches!(result, Err(PodiumError::DirectoryUnavailable { .. })));
    assert!(!Path::new(&output_path).exists());
}
