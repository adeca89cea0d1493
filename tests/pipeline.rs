use std::sync::Arc;

use wss_extract::enrich::mock::StaticSource;
use wss_extract::enrich::{EnrichmentGateway, GatewayPolicy};
use wss_extract::gazetteer::Gazetteer;
use wss_extract::ocr::{FragmentDumpEngine, OcrEngine, OcrService};
use wss_extract::record::{CenterKind, UnitKind};
use wss_extract::validate::ValidationKind;
use wss_extract::{Extraction, Extractor};

fn fixture(name: &str) -> String {
    std::fs::read_to_string(format!("tests/fixtures/{}.txt", name)).unwrap()
}

fn extractor() -> Extractor {
    let source = StaticSource::new()
        .with("Toko Sederhana", StaticSource::sample("Jl. Merdeka No. 1, Denpasar"))
        .with("Pasar Badung", StaticSource::sample("Jl. Gajah Mada, Denpasar"));
    Extractor::new(
        Gazetteer::default(),
        EnrichmentGateway::new(Arc::new(source), GatewayPolicy::default()),
    )
}

async fn run(name: &str) -> Extraction {
    extractor().extract_text(&fixture(name)).await.unwrap()
}

#[tokio::test]
async fn dauh_puri_full_record() {
    let x = run("dauh_puri").await;
    assert!(x.is_valid(), "{:?}", x.validation);
    let r = &x.record;
    assert_eq!(r.admin.map_id, "5171030005000300");
    assert_eq!(r.admin.village, "DAUH PURI");
    assert_eq!(r.businesses.len(), 7);

    let enriched: Vec<_> = r
        .businesses
        .iter()
        .filter(|b| b.enrichment.is_some())
        .map(|b| b.name.as_str())
        .collect();
    assert_eq!(enriched, vec!["Toko Sederhana", "Pasar Badung"]);

    assert_eq!(r.segments.len(), 2);
    let kampung = &r.segments[0];
    assert_eq!(kampung.name, "KAMPUNG BARU");
    assert_eq!(kampung.sub_sls_code, "03");
    assert_eq!(kampung.unit, UnitKind::Environment);
    assert_eq!(
        (kampung.households, kampung.residential_buildings, kampung.vacant_residential),
        (150, 142, 8)
    );
    assert_eq!(kampung.business_count, 3);
    assert_eq!(kampung.total_load, 168);

    let taman = &r.segments[1];
    assert_eq!(taman.households, 100);
    // the market header itself is listed under TAMAN SARI
    assert_eq!(taman.business_count, 4);
    assert_eq!(taman.total_load, 119);

    for s in &r.segments {
        assert_eq!(s.total_load, s.expected_total());
    }

    let pasar = r
        .economic_centers
        .iter()
        .find(|c| c.name == "Pasar Badung")
        .unwrap();
    assert_eq!(pasar.kind, CenterKind::Pasar);
    assert_eq!(pasar.estimated_umkm, 100);
    assert!(pasar.enrichment.is_some());

    assert_eq!(r.totals().total_load, 168 + 119);
}

#[tokio::test]
async fn livestock_surroundings_shrink_centers() {
    let x = run("peternakan").await;
    assert!(x.is_valid());
    let r = &x.record;

    let env = &r.environments[0];
    assert_eq!(env.name, "PERKAMBINGAN SARI");
    assert_eq!(env.code, "01");
    assert!(env.synthesized);

    let estimate = |name: &str| {
        r.economic_centers
            .iter()
            .find(|c| c.name == name)
            .map(|c| c.estimated_umkm)
    };
    assert_eq!(estimate("Pasar Hewan Sembung"), Some(50));
    assert_eq!(estimate("Supermarket Tani Jaya"), Some(40));

    let totals: Vec<u32> = r.segments.iter().map(|s| s.total_load).collect();
    assert_eq!(totals, vec![117, 116]);
    let sawah = &r.segments[1];
    assert_eq!(sawah.load_code, 14);
    assert!(!sawah.classifiers_agree);

    assert_eq!(r.context.target_environment, "perkambingan");
    assert_eq!(r.context.target_line, Some(6));
    let names: Vec<_> = r.context.businesses.iter().map(|b| b.name.as_str()).collect();
    assert_eq!(names, vec!["Pasar Hewan Sembung", "Supermarket Tani Jaya"]);
    assert_eq!(r.context.business_count, 2);
}

#[tokio::test]
async fn missing_header_is_reported_not_fatal() {
    let x = run("no_header").await;
    let v = x.validation.as_ref().unwrap();
    assert_eq!(v.kind, ValidationKind::IncompleteMapData);
    assert!(v.fields.contains(&"map_id".to_string()));
    assert!(!v.fields.contains(&"regency".to_string()));

    let r = &x.record;
    assert_eq!(r.admin.regency, "DENPASAR");
    assert!(!r.segments.is_empty());
    assert!(r.segments.iter().all(|s| s.unit == UnitKind::Street));
    assert_eq!(r.segments[0].name, "Jl. Gatot Subroto");
}

#[tokio::test]
async fn fragments_below_threshold_are_dropped() {
    let ocr = OcrService::new(|| Ok(Box::new(FragmentDumpEngine) as Box<dyn OcrEngine>));
    let dump = serde_json::json!([
        { "text": "PROVINSI : [51] BALI", "confidence": 0.93 },
        { "text": "KABUPATEN : [71] DENPASAR", "confidence": 0.88 },
        { "text": "Toko Hantu", "confidence": 0.005 },
        { "text": "Warung Bu Made", "confidence": 0.6 }
    ]);
    let bytes = serde_json::to_vec(&dump).unwrap();

    let x = extractor().extract_image(&ocr, &bytes).await.unwrap();
    let names: Vec<_> = x.record.businesses.iter().map(|b| b.name.as_str()).collect();
    assert_eq!(names, vec!["Warung Bu Made"]);
    assert_eq!(x.record.admin.province, "BALI");
    assert!(ocr.is_initialized());
}

#[tokio::test]
async fn resynthesize_after_edit() {
    let x = run("dauh_puri").await;
    let mut record = x.record;
    record.environments.truncate(1);
    let again = wss_extract::pipeline::resynthesize(record).unwrap();
    assert_eq!(again.record.segments.len(), 1);
    assert_eq!(again.record.segments[0].total_load, 168);
}
