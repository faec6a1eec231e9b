use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

use datacard_manager::{CardManager, NewProcess, Process};

fn example_card() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/data/example_card.txt")
}

#[test]
fn test_drop_process_scenario() {
    let mut manager = CardManager::new(example_card()).unwrap();
    let columns_before = manager.process_region_pairs().unwrap().len();

    manager.drop_process("top").unwrap();

    // top的shapes行消失，其余保留
    assert_eq!(manager.blocks.shape.len(), 2);
    assert!(manager
        .blocks
        .shape
        .iter()
        .all(|line| !line.contains("top")));

    // jmax减一
    assert!(manager.blocks.header[1].starts_with("jmax 1"));

    // process与nuisance块各少一个数值列，zh/wz相对顺序不变
    assert_eq!(
        manager.process_region_pairs().unwrap().len(),
        columns_before - 1
    );
    manager.refresh_model().unwrap();
    assert_eq!(
        manager.processes,
        vec![Process::new(0, "zh"), Process::new(1, "wz")]
    );

    // 编辑结果仍是可写出、可重新加载的合法卡
    let dir = TempDir::new().unwrap();
    let outfile = dir.path().join("dropped.txt");
    manager.write(&outfile, false).unwrap();
    let reloaded = CardManager::new(&outfile).unwrap();
    assert_eq!(reloaded.processes.len(), 2);
}

#[test]
fn test_add_process_roundtrip() {
    let mut manager = CardManager::new(example_card()).unwrap();

    let mut nuisance_effects = HashMap::new();
    nuisance_effects.insert("jer".to_string(), ("lnN".to_string(), "1.2".to_string()));

    manager
        .add_process(&NewProcess {
            name: "qcd".to_string(),
            region: "monojet_2018_signal".to_string(),
            id: 3,
            workspace_file: "combined_model.root".to_string(),
            histogram: "wspace_2018:qcd_monojet_2018_signal".to_string(),
            systematic: None,
            rate: "1.0".to_string(),
            nuisance_effects,
        })
        .unwrap();
    manager.refresh_model().unwrap();

    assert!(manager.processes.contains(&Process::new(3, "qcd")));
    assert!(manager.blocks.header[1].starts_with("jmax 3"));

    let dir = TempDir::new().unwrap();
    let outfile = dir.path().join("added.txt");
    manager.write(&outfile, false).unwrap();

    let reloaded = CardManager::new(&outfile).unwrap();
    assert_eq!(
        reloaded
            .nuisances
            .get_nuisance_effect("jer", "qcd", "monojet_2018_signal")
            .unwrap(),
        "1.2"
    );
}

#[test]
fn test_drop_uncertainty_pattern() {
    let mut manager = CardManager::new(example_card()).unwrap();

    let removed = manager.drop_uncertainty("CMS_.*").unwrap();
    assert_eq!(removed, 1);

    manager.refresh_model().unwrap();
    assert!(!manager.nuisances.contains("CMS_eff_btag_udsg"));
    assert!(manager.nuisances.contains("jer"));
}

#[test]
fn test_path_rewriting_against_card_directory() {
    let cardfile = example_card();
    let card_dir = cardfile.parent().unwrap();
    let mut manager = CardManager::new(&cardfile).unwrap();

    assert_eq!(manager.workspace_file_paths(), vec!["combined_model.root"]);

    manager.make_paths_absolute().unwrap();
    let paths = manager.workspace_file_paths();
    assert_eq!(paths.len(), 1);
    assert_eq!(
        Path::new(&paths[0]),
        card_dir.join("combined_model.root").as_path()
    );

    // 幂等：重复应用不再变化
    let shape_before = manager.blocks.shape.clone();
    manager.make_paths_absolute().unwrap();
    assert_eq!(manager.blocks.shape, shape_before);

    // 去目录化恢复原始引用
    manager.make_paths_basename().unwrap();
    assert_eq!(manager.workspace_file_paths(), vec!["combined_model.root"]);
}

#[test]
fn test_write_with_workspace_copy() {
    let mut manager = CardManager::new(example_card()).unwrap();

    let dir = TempDir::new().unwrap();
    let outfile = dir.path().join("export/card.txt");
    manager.write(&outfile, true).unwrap();

    // workspace文件被拷贝到输出目录，引用改写为文件名
    assert!(dir.path().join("export/combined_model.root").exists());
    assert_eq!(manager.workspace_file_paths(), vec!["combined_model.root"]);

    let reloaded = CardManager::new(&outfile).unwrap();
    assert_eq!(
        reloaded.workspace_file_paths(),
        vec!["combined_model.root"]
    );
}

#[test]
fn test_rename_signal_processes_end_to_end() {
    let mut manager = CardManager::new(example_card()).unwrap();

    manager
        .rename_signal_processes(&["signal_zh".to_string()], &["zh".to_string()])
        .unwrap();
    manager.refresh_model().unwrap();

    let names: Vec<&str> = manager.processes.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["signal_zh", "wz", "top"]);

    // shapes行中的过程名token一并更新
    assert!(manager.blocks.shape[0].contains("signal_zh"));

    let dir = TempDir::new().unwrap();
    let outfile = dir.path().join("renamed.txt");
    manager.write(&outfile, false).unwrap();
    let reloaded = CardManager::new(&outfile).unwrap();
    assert!(reloaded
        .nuisances
        .get("jer")
        .unwrap()
        .affects_process("signal_zh", None));
}
