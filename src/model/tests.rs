use super::*;
use crate::utils::CardError;

/// 创建测试用的nuisance
fn create_test_nuisance() -> Nuisance {
    let mut nuisance = Nuisance::new("jer", "lnN");
    nuisance.set_effect("zh", "monojet_2018_signal", "1");
    nuisance.set_effect("wz", "monojet_2017_signal", "1.05");
    nuisance
}

#[test]
fn test_process_identity() {
    let p1 = Process::new(0, "zh");
    let p2 = Process::new(0, "zh");
    let p3 = Process::new(1, "zh");
    let p4 = Process::new(0, "wz");

    assert_eq!(p1, p2);
    assert_ne!(p1, p3);
    assert_ne!(p1, p4);

    let mut set = std::collections::HashSet::new();
    set.insert(p1);
    set.insert(p2);
    set.insert(p3);
    assert_eq!(set.len(), 2);
}

#[test]
fn test_signal_classification() {
    assert!(Process::new(0, "zh").is_signal());
    assert!(Process::new(-1, "ggh").is_signal());
    assert!(!Process::new(2, "top").is_signal());
}

#[test]
fn test_effect_lookup_default() {
    let nuisance = create_test_nuisance();

    assert_eq!(nuisance.get_effect("zh", "monojet_2018_signal"), "1");
    // 未记录的组合返回占位值，从不失败
    assert_eq!(nuisance.get_effect("top", "monojet_2018_signal"), NO_EFFECT);
    assert_eq!(nuisance.get_effect("zh", "unknown_region"), NO_EFFECT);
}

#[test]
fn test_effect_numeric_view() {
    let mut nuisance = create_test_nuisance();
    nuisance.set_effect("top", "monojet_2018_signal", NO_EFFECT);

    assert_eq!(nuisance.effect_value("zh", "monojet_2018_signal"), 1.0);
    assert_eq!(nuisance.effect_value("wz", "monojet_2017_signal"), 1.05);
    assert_eq!(nuisance.effect_value("top", "monojet_2018_signal"), 0.0);
    assert_eq!(nuisance.effect_value("qcd", "monojet_2018_signal"), 0.0);
}

#[test]
fn test_set_effect_overwrites() {
    let mut nuisance = create_test_nuisance();
    nuisance.set_effect("zh", "monojet_2018_signal", 2);
    assert_eq!(nuisance.get_effect("zh", "monojet_2018_signal"), "2");
    assert_eq!(nuisance.effects.len(), 2);
}

#[test]
fn test_affects_process() {
    let nuisance = create_test_nuisance();

    assert!(nuisance.affects_process("zh", None));
    assert!(nuisance.affects_process("zh", Some("monojet_2018_signal")));
    assert!(!nuisance.affects_process("zh", Some("monojet_2017_signal")));
    assert!(!nuisance.affects_process("top", None));
}

#[test]
fn test_collection_add_duplicate() {
    let mut collection = NuisanceCollection::new();
    collection.add_nuisance(create_test_nuisance()).unwrap();

    let result = collection.add_nuisance(Nuisance::new("jer", "shape"));
    assert!(matches!(result, Err(CardError::DuplicateKey(_))));

    // 失败后集合保持不变
    assert_eq!(collection.len(), 1);
    assert_eq!(collection.get("jer").unwrap().kind, "lnN");
}

#[test]
fn test_collection_remove_missing() {
    let mut collection = NuisanceCollection::new();
    let result = collection.remove_nuisance("jer");
    assert!(matches!(result, Err(CardError::NotFound(_))));
}

#[test]
fn test_collection_effect_lookup() {
    let mut collection = NuisanceCollection::new();
    collection.add_nuisance(create_test_nuisance()).unwrap();

    // nuisance存在、组合未记录：返回占位值
    assert_eq!(
        collection
            .get_nuisance_effect("jer", "top", "monojet_2018_signal")
            .unwrap(),
        NO_EFFECT
    );
    // nuisance不存在：返回NotFound
    assert!(matches!(
        collection.get_nuisance_effect("jes", "zh", "monojet_2018_signal"),
        Err(CardError::NotFound(_))
    ));
}

#[test]
fn test_collection_preserves_order() {
    let mut collection = NuisanceCollection::new();
    for name in ["jer", "btag", "jes", "prefiring"] {
        collection.add_nuisance(Nuisance::new(name, "lnN")).unwrap();
    }
    collection.remove_nuisance("btag").unwrap();

    let names: Vec<&str> = collection.names().collect();
    assert_eq!(names, vec!["jer", "jes", "prefiring"]);
}

#[test]
fn test_report_is_sorted() {
    let nuisance = create_test_nuisance();
    let report = nuisance.report();

    assert_eq!(report.name, "jer");
    assert_eq!(report.kind, "lnN");
    assert_eq!(report.effects.len(), 2);
    assert_eq!(report.effects[0].process, "wz");
    assert_eq!(report.effects[1].process, "zh");

    let json = serde_json::to_string(&report).unwrap();
    assert!(json.contains("\"monojet_2018_signal\""));
}
