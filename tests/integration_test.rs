use medid_resolver::config::ResolverConfig;
use medid_resolver::db::{DictionaryStore, SeedSource, SqliteDictionaryStore};
use medid_resolver::resolution::ResolutionEngine;
use medid_resolver::types::{Fragment, MatchOutcome};
use std::path::Path;
use tempfile::TempDir;

/// Seed an on-disk dictionary with the built-in sample list
fn seeded_store(dir: &Path) -> Result<SqliteDictionaryStore, Box<dyn std::error::Error>> {
    let store = SqliteDictionaryStore::new(dir.join("meds_db.sqlite"));
    let names = SeedSource::BuiltIn.load()?;
    let summary = store.seed(&names)?;
    println!("Seeded {} names into {}", summary.total, store.path().display());
    Ok(store)
}

#[test]
fn test_end_to_end_ocr_batch() -> Result<(), Box<dyn std::error::Error>> {
    let temp_dir = TempDir::new()?;
    let store = seeded_store(temp_dir.path())?;
    let engine = ResolutionEngine::new(store, &ResolverConfig::default());

    // Shape emitted by the OCR stage
    let fragments: Vec<Fragment> = serde_json::from_str(
        r#"[
            {"text": "Paracetamol", "confidence": 0.99},
            {"text": "Ibuprophen", "confidence": 0.91},
            {"text": "Dosage: Take one tablet daily", "confidence": 0.88},
            {"text": "Azithromycin 500mg", "confidence": 0.95},
            {"text": "Montelukasst", "confidence": 0.84},
            {"text": "Doxycyllline", "confidence": 0.83},
            {"text": "Batch No. 12345", "confidence": 0.97},
            {"text": "Losartannn", "confidence": 0.9}
        ]"#,
    )?;

    let records = engine.resolve(&fragments)?;
    assert_eq!(records.len(), fragments.len());

    let summary: Vec<(&str, Option<&str>, bool)> = records
        .iter()
        .map(|r| (r.original_text.as_str(), r.standard_name.as_deref(), r.exact_match))
        .collect();

    assert_eq!(
        summary,
        vec![
            ("Paracetamol", Some("paracetamol"), true),
            ("Ibuprophen", Some("ibuprofen"), false),
            ("Dosage: Take one tablet daily", None, false),
            // exact only applies to the whole fragment, and a zero-distance token is not fuzzy
            ("Azithromycin 500mg", None, false),
            ("Montelukasst", Some("montelukast"), false),
            ("Doxycyllline", Some("doxycycline"), false),
            ("Batch No. 12345", None, false),
            ("Losartannn", Some("losartan"), false),
        ]
    );

    for record in &records {
        assert_eq!(record.is_medicine, record.standard_name.is_some());
        assert!(!record.exact_match || record.is_medicine);
        assert_eq!(record.confidence, if record.is_medicine { 1.0 } else { 0.0 });
    }

    Ok(())
}

#[test]
fn test_reference_dictionary_scenarios() -> Result<(), Box<dyn std::error::Error>> {
    let temp_dir = TempDir::new()?;
    let store = SqliteDictionaryStore::new(temp_dir.path().join("meds.sqlite"));
    store.seed(["paracetamol", "ibuprofen"])?;
    let engine = ResolutionEngine::new(store, &ResolverConfig::default());

    let records = engine.resolve_texts(&["Paracetamol", "Ibuprophen", "Batch No. 12345"])?;
    assert!(matches!(records[0].outcome, MatchOutcome::Exact { .. }));
    assert!(matches!(
        &records[1].outcome,
        MatchOutcome::Fuzzy { name, .. } if name == "ibuprofen"
    ));
    assert_eq!(records[2].outcome, MatchOutcome::NoMatch);

    let records = engine.resolve_texts(&["XyzUnknownDrug99"])?;
    assert!(!records[0].is_medicine);
    assert!(records[0].standard_name.is_none());

    // every token three characters or fewer
    let records = engine.resolve_texts(&["Tab 5mg x10", "ibu pro fen"])?;
    assert!(records.iter().all(|r| !r.is_medicine));

    Ok(())
}

#[test]
fn test_reseeding_keeps_one_copy_of_each_name() -> Result<(), Box<dyn std::error::Error>> {
    let temp_dir = TempDir::new()?;
    let store = seeded_store(temp_dir.path())?;
    let before = store.load_all()?;

    let again = store.seed(&SeedSource::BuiltIn.load()?)?;
    assert_eq!(again.inserted, 0);
    assert_eq!(store.load_all()?, before);
    assert_eq!(before.len(), 22);

    Ok(())
}

#[test]
fn test_order_is_preserved_for_large_batches() -> Result<(), Box<dyn std::error::Error>> {
    let temp_dir = TempDir::new()?;
    let store = seeded_store(temp_dir.path())?;
    let engine = ResolutionEngine::new(store, &ResolverConfig::default());

    let texts: Vec<String> = (0..200)
        .map(|i| match i % 4 {
            0 => "Metformin".to_string(),
            1 => format!("Lot {}", i),
            2 => format!("Omeprazol {}mg", i),
            _ => format!("fragment-{}", i),
        })
        .collect();
    let fragments: Vec<Fragment> = texts.iter().map(|t| Fragment::new(t.as_str())).collect();

    let sequential = engine.resolve(&fragments)?;
    let parallel = engine.resolve_parallel(&fragments)?;

    assert_eq!(sequential.len(), 200);
    assert_eq!(sequential, parallel);
    for (record, text) in sequential.iter().zip(&texts) {
        assert_eq!(&record.original_text, text);
    }
    assert_eq!(sequential[2].standard_name.as_deref(), Some("omeprazole"));

    Ok(())
}

#[test]
fn test_missing_store_fails_whole_batch() {
    let temp_dir = TempDir::new().unwrap();
    let store = SqliteDictionaryStore::new(temp_dir.path().join("never_seeded.sqlite"));
    let engine = ResolutionEngine::new(store, &ResolverConfig::default());

    let err = engine
        .resolve_texts(&["Paracetamol", "Ibuprophen"])
        .unwrap_err();
    assert!(err.is_store_unavailable());
}

#[test]
fn test_seed_from_csv_file() -> Result<(), Box<dyn std::error::Error>> {
    let temp_dir = TempDir::new()?;
    let csv_path = temp_dir.path().join("data.csv");
    std::fs::write(
        &csv_path,
        "text,label\nCardiprene,MED_NAME\nExp 12/2026,OTHER\nNeurozol,MED_NAME\n",
    )?;

    let store = SqliteDictionaryStore::new(temp_dir.path().join("meds.sqlite"));
    store.seed(&SeedSource::Csv(csv_path).load()?)?;
    assert_eq!(store.load_all()?, vec!["cardiprene", "neurozol"]);

    // the engine only borrows the store handle
    let engine = ResolutionEngine::new(&store, &ResolverConfig::default());
    let records = engine.resolve_texts(&["Cardiprine 5mg", "Exp 12/2026"])?;
    assert_eq!(records[0].standard_name.as_deref(), Some("cardiprene"));
    assert!(!records[1].is_medicine);
    drop(engine);
    assert_eq!(store.count()?, 2);

    Ok(())
}
