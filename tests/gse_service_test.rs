use mockito::{Matcher, Mock, Server, ServerGuard};
use pretty_assertions::assert_eq;
use std::io::Write;

use gse_pod::api::{ClientConfig, FeatureService, GseClient, PolygonGeometry};
use gse_pod::error::PodError;
use gse_pod::pod::PodCode;
use gse_pod::resolver::{PodResolver, Stage};

const POD: &str = "IT058E00000001";
const POD_PATH: &str = "/TIAD2/POD_AC/FeatureServer/12/query";
const SUBSTATION_PATH: &str = "/TIAD2/Aree_Convenzionali/FeatureServer/0/query";
const MUNICIPALITY_PATH: &str = "/TIAD2/Comuni/FeatureServer/10/query";

const SQUARE: &str = r#"{"rings": [[[12.4, 41.8], [12.6, 41.8], [12.6, 42.0], [12.4, 41.8]]]}"#;

fn client_config(server: &ServerGuard) -> ClientConfig {
    ClientConfig::default().with_base_url(server.url()).with_timeout(5)
}

fn resolver(server: &ServerGuard) -> PodResolver {
    PodResolver::new(client_config(server)).unwrap()
}

async fn pod_mock(server: &mut ServerGuard, body: &str, hits: usize) -> Mock {
    server
        .mock("GET", POD_PATH)
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("where".to_string(), format!("COD_POD='{}'", POD)),
            Matcher::UrlEncoded("outFields".to_string(), "COD_POD,COD_AC".to_string()),
            Matcher::UrlEncoded("f".to_string(), "json".to_string()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(body)
        .expect(hits)
        .create_async()
        .await
}

async fn substation_mock(
    server: &mut ServerGuard,
    substation: &str,
    body: &str,
    hits: usize,
) -> Mock {
    server
        .mock("GET", SUBSTATION_PATH)
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("where".to_string(), format!("COD_AC='{}'", substation)),
            Matcher::UrlEncoded("outFields".to_string(), "COD_AC,RAG_SOC".to_string()),
            Matcher::UrlEncoded("returnGeometry".to_string(), "true".to_string()),
            Matcher::UrlEncoded("f".to_string(), "json".to_string()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(body)
        .expect(hits)
        .create_async()
        .await
}

async fn municipality_mock(server: &mut ServerGuard, body: &str, hits: usize) -> Mock {
    server
        .mock("POST", MUNICIPALITY_PATH)
        .match_header("content-type", "application/x-www-form-urlencoded")
        .match_body(Matcher::AllOf(vec![
            Matcher::Regex("geometry=%7B%22rings%22".to_string()),
            Matcher::Regex("geometryType=esriGeometryPolygon".to_string()),
            Matcher::Regex("spatialRel=esriSpatialRelIntersects".to_string()),
            Matcher::Regex("outFields=COMUNE%2CCOD_REG%2CCOD_PROV".to_string()),
            Matcher::Regex("f=json".to_string()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(body)
        .expect(hits)
        .create_async()
        .await
}

fn substation_body(supplier: Option<&str>, geometry: &str) -> String {
    let attributes = match supplier {
        Some(name) => format!(r#"{{"COD_AC": "AC0042", "RAG_SOC": "{}"}}"#, name),
        None => r#"{"COD_AC": "AC0042"}"#.to_string(),
    };
    format!(
        r#"{{"features": [{{"attributes": {}, "geometry": {}}}]}}"#,
        attributes, geometry
    )
}

const FOUND_POD: &str =
    r#"{"features": [{"attributes": {"COD_POD": "IT058E00000001", "COD_AC": "AC0042"}}]}"#;

#[tokio::test]
async fn test_full_resolution() {
    let mut server = Server::new_async().await;
    let pod = pod_mock(&mut server, FOUND_POD, 1).await;
    let substation = substation_mock(
        &mut server,
        "AC0042",
        &substation_body(Some("Acme Energy"), SQUARE),
        1,
    )
    .await;
    let municipalities = municipality_mock(
        &mut server,
        r#"{"features": [{"attributes": {"COMUNE": "Roma", "COD_REG": 12, "COD_PROV": 58}}]}"#,
        1,
    )
    .await;

    let result = resolver(&server).resolve(POD).await.unwrap();

    assert_eq!(result.pod, POD);
    assert_eq!(result.substation, "AC0042");
    assert_eq!(result.supplier, "Acme Energy");
    assert_eq!(result.regions, "Lazio");
    assert_eq!(result.provinces, "Roma");
    assert_eq!(result.municipalities, "Roma");

    pod.assert_async().await;
    substation.assert_async().await;
    municipalities.assert_async().await;
}

#[tokio::test]
async fn test_multi_municipality_aggregation() {
    let mut server = Server::new_async().await;
    let _pod = pod_mock(&mut server, FOUND_POD, 1).await;
    let _substation =
        substation_mock(&mut server, "AC0042", &substation_body(Some("Acme Energy"), SQUARE), 1).await;
    let _municipalities = municipality_mock(
        &mut server,
        r#"{"features": [
            {"attributes": {"COMUNE": "Roma", "COD_REG": 12, "COD_PROV": 58}},
            {"attributes": {"COMUNE": "Roma", "COD_REG": "12", "COD_PROV": "058"}},
            {"attributes": {"COMUNE": "Latina", "COD_REG": 12, "COD_PROV": 59}},
            {"attributes": {"COMUNE": "Napoli", "COD_REG": 15, "COD_PROV": 63}}
        ]}"#,
        1,
    )
    .await;

    let result = resolver(&server).resolve(POD).await.unwrap();

    assert_eq!(result.regions, "Lazio, Campania");
    assert_eq!(result.provinces, "Roma, Latina, Napoli");
    assert_eq!(result.municipalities, "Roma, Roma, Latina, Napoli");
}

#[tokio::test]
async fn test_unknown_pod_stops_after_first_query() {
    let mut server = Server::new_async().await;
    let pod = pod_mock(&mut server, r#"{"features": []}"#, 1).await;
    let substation = server.mock("GET", SUBSTATION_PATH).expect(0).create_async().await;
    let municipalities = server.mock("POST", MUNICIPALITY_PATH).expect(0).create_async().await;

    let error = resolver(&server).resolve(POD).await.unwrap_err();

    assert!(error.is_resolution_failure());
    assert!(error.is_not_found());
    assert!(matches!(
        error,
        PodError::Resolution {
            stage: Stage::LocatingSubstation,
            ..
        }
    ));
    pod.assert_async().await;
    substation.assert_async().await;
    municipalities.assert_async().await;
}

#[tokio::test]
async fn test_invalid_pod_makes_no_request() {
    let mut server = Server::new_async().await;
    let any = server
        .mock("GET", Matcher::Any)
        .expect(0)
        .create_async()
        .await;

    for code in ["IT058E0000001", "it058e00000001", "IT058E00000001' OR '1'='1"] {
        let error = resolver(&server).resolve(code).await.unwrap_err();
        assert!(matches!(error, PodError::InvalidInput(_)));
    }
    any.assert_async().await;
}

#[tokio::test]
async fn test_server_error_is_connectivity_failure() {
    let mut server = Server::new_async().await;
    let _pod = server
        .mock("GET", POD_PATH)
        .match_query(Matcher::Any)
        .with_status(503)
        .create_async()
        .await;

    let error = resolver(&server).resolve(POD).await.unwrap_err();

    assert!(error.is_resolution_failure());
    assert!(error.is_connectivity());
    assert!(!error.is_not_found());
    assert!(matches!(error.root_cause(), PodError::HttpStatus { status: 503, .. }));
}

#[tokio::test]
async fn test_connection_refused_is_connectivity_failure() {
    // Nothing listens on the discard port in the test environment
    let config = ClientConfig::default()
        .with_base_url("http://127.0.0.1:9")
        .with_timeout(5);
    let error = PodResolver::new(config).unwrap().resolve(POD).await.unwrap_err();

    assert!(error.is_connectivity());
    assert!(error.to_string().contains("POD resolution failed"));
}

#[tokio::test]
async fn test_arcgis_error_envelope() {
    let mut server = Server::new_async().await;
    let _pod = pod_mock(
        &mut server,
        r#"{"error": {"code": 400, "message": "Unable to complete operation.", "details": ["Invalid query parameters."]}}"#,
        1,
    )
    .await;

    let error = resolver(&server).resolve(POD).await.unwrap_err();

    match error.root_cause() {
        PodError::ApiError { code, message, .. } => {
            assert_eq!(code, "400");
            assert!(message.contains("Invalid query parameters."));
        }
        other => panic!("expected ApiError, got {:?}", other),
    }
}

#[tokio::test]
async fn test_html_response_is_api_error() {
    let mut server = Server::new_async().await;
    let _pod = server
        .mock("GET", POD_PATH)
        .match_query(Matcher::Any)
        .with_status(200)
        .with_header("content-type", "text/html")
        .with_body("<html><body>Service unavailable</body></html>")
        .create_async()
        .await;

    let error = resolver(&server).resolve(POD).await.unwrap_err();
    assert!(matches!(
        error.root_cause(),
        PodError::ApiError { code, .. } if code == "INVALID_RESPONSE"
    ));
}

#[tokio::test]
async fn test_missing_supplier_uses_placeholder() {
    let mut server = Server::new_async().await;
    let _pod = pod_mock(&mut server, FOUND_POD, 1).await;
    let _substation = substation_mock(&mut server, "AC0042", &substation_body(None, SQUARE), 1).await;
    let _municipalities = municipality_mock(
        &mut server,
        r#"{"features": [{"attributes": {"COMUNE": "Roma", "COD_REG": 12, "COD_PROV": 58}}]}"#,
        1,
    )
    .await;

    let result = resolver(&server).resolve(POD).await.unwrap();
    assert_eq!(result.supplier, "Non specificato");
}

#[tokio::test]
async fn test_numeric_substation_code() {
    let mut server = Server::new_async().await;
    let _pod = pod_mock(
        &mut server,
        r#"{"features": [{"attributes": {"COD_POD": "IT058E00000001", "COD_AC": 1234}}]}"#,
        1,
    )
    .await;
    let substation = substation_mock(&mut server, "1234", r#"{"features": []}"#, 1).await;

    let error = resolver(&server).resolve(POD).await.unwrap_err();
    assert!(error.is_not_found());
    assert!(matches!(error, PodError::Resolution { stage: Stage::FetchingDetail, .. }));
    substation.assert_async().await;
}

#[tokio::test]
async fn test_ringless_substation_skips_spatial_query() {
    let mut server = Server::new_async().await;
    let _pod = pod_mock(&mut server, FOUND_POD, 1).await;
    let _substation = substation_mock(
        &mut server,
        "AC0042",
        &substation_body(Some("Acme Energy"), r#"{"rings": []}"#),
        1,
    )
    .await;
    let municipalities = server.mock("POST", MUNICIPALITY_PATH).expect(0).create_async().await;

    let error = resolver(&server).resolve(POD).await.unwrap_err();

    assert!(error.is_not_found());
    assert!(matches!(
        error,
        PodError::Resolution {
            stage: Stage::IntersectingGeometry,
            ..
        }
    ));
    municipalities.assert_async().await;
}

#[tokio::test]
async fn test_no_intersecting_municipalities_is_failure() {
    let mut server = Server::new_async().await;
    let _pod = pod_mock(&mut server, FOUND_POD, 1).await;
    let _substation =
        substation_mock(&mut server, "AC0042", &substation_body(Some("Acme Energy"), SQUARE), 1).await;
    let _municipalities = municipality_mock(&mut server, r#"{"features": []}"#, 1).await;

    let error = resolver(&server).resolve(POD).await.unwrap_err();
    assert!(error.is_not_found());
    assert!(error.to_string().contains("AC0042"));
}

#[tokio::test]
async fn test_spatial_query_defaults_to_wgs84() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", MUNICIPALITY_PATH)
        .match_body(Matcher::Regex(
            "%22spatialReference%22%3A%7B%22wkid%22%3A4326%7D".to_string(),
        ))
        .with_status(200)
        .with_body(r#"{"features": [{"attributes": {"COMUNE": "Roma", "COD_REG": 12, "COD_PROV": 58}}]}"#)
        .expect(1)
        .create_async()
        .await;

    let client = GseClient::new(client_config(&server)).unwrap();
    let geometry: PolygonGeometry = serde_json::from_str(SQUARE).unwrap();
    let municipalities = client.query_municipalities(&geometry).await.unwrap();

    assert_eq!(municipalities.len(), 1);
    assert_eq!(municipalities[0].name, "Roma");
    mock.assert_async().await;
}

#[tokio::test]
async fn test_closed_resolver_makes_no_request() {
    let mut server = Server::new_async().await;
    let any = server
        .mock("GET", Matcher::Any)
        .expect(0)
        .create_async()
        .await;

    let mut resolver = resolver(&server);
    resolver.close();
    assert!(resolver.is_closed());

    let error = resolver.resolve(POD).await.unwrap_err();
    assert!(matches!(error.root_cause(), PodError::SessionClosed));
    any.assert_async().await;
}

#[tokio::test]
async fn test_null_istat_codes_fall_back() {
    let mut server = Server::new_async().await;
    let _pod = pod_mock(&mut server, FOUND_POD, 1).await;
    let _substation =
        substation_mock(&mut server, "AC0042", &substation_body(Some("Acme Energy"), SQUARE), 1).await;
    let _municipalities = municipality_mock(
        &mut server,
        r#"{"features": [
            {"attributes": {"COMUNE": "Ignoto", "COD_REG": null, "COD_PROV": 58}},
            {"attributes": {"COMUNE": "Roma", "COD_REG": 12, "COD_PROV": 58}}
        ]}"#,
        1,
    )
    .await;

    let result = resolver(&server).resolve(POD).await.unwrap();

    assert_eq!(result.regions, "Regione n/d, Lazio");
    assert_eq!(result.provinces, "Roma");
    assert_eq!(result.municipalities, "Ignoto, Roma");
}

#[tokio::test]
async fn test_requests_carry_configured_user_agent() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", POD_PATH)
        .match_query(Matcher::Any)
        .match_header("user-agent", "gse-pod-test/1.0")
        .with_status(200)
        .with_body(r#"{"features": []}"#)
        .expect(1)
        .create_async()
        .await;

    let mut config = client_config(&server);
    config.user_agent = "gse-pod-test/1.0".to_string();
    let client = GseClient::new(config).unwrap();
    let pod: PodCode = POD.parse().unwrap();

    assert!(client.find_substation(&pod).await.unwrap().is_none());
    mock.assert_async().await;
}

#[tokio::test(flavor = "multi_thread")]
async fn test_slow_response_reports_configured_timeout() {
    let mut server = Server::new_async().await;
    let _pod = server
        .mock("GET", POD_PATH)
        .match_query(Matcher::Any)
        .with_status(200)
        .with_chunked_body(|w| {
            std::thread::sleep(std::time::Duration::from_secs(3));
            w.write_all(br#"{"features": []}"#)
        })
        .create_async()
        .await;

    let config = ClientConfig::default()
        .with_base_url(server.url())
        .with_timeout(1);
    let error = PodResolver::new(config).unwrap().resolve(POD).await.unwrap_err();

    assert!(error.is_connectivity());
    assert!(matches!(error.root_cause(), PodError::Timeout(1)));
}
